//! Maven output parser
//!
//! Parses the dependency convergence report printed by the enforcer into
//! structured [`Conflict`](crate::model::Conflict) trees.

mod convergence;

pub use convergence::{ParseError, ParseErrorKind};

#[cfg(test)]
mod tests;

use regex::Regex;
use std::sync::LazyLock;

/// Regex for the line opening one conflict report
/// Format: `Dependency convergence error for <token> paths to dependency are:`
///
/// Groups:
/// 1. coordinate token of the conflicting artifact
static CONVERGENCE_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Dependency convergence error for (\S+) paths to dependency are:\s*$")
        .expect("Invalid convergence header regex")
});

/// Regex for one path entry
/// Format: `<indent><tree markers><coordinates> [annotations]`
/// Example: `    +-org.jboss.logging:jboss-logging:jar:3.3.0.Final:compile`
///
/// Groups:
/// 1. leading indentation
/// 2. the coordinate token and anything after it
static PATH_ENTRY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)[^\sA-Za-z0-9]*\s*(\S.*)$").expect("Invalid path entry regex")
});

/// Maven log level prefix (`[ERROR] `, `[WARNING] `) that newer Maven
/// versions put in front of every line of a multi-line message
static LOG_LEVEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?:ERROR|WARNING|WARN|INFO|DEBUG)\] ?").expect("Invalid log level regex")
});

/// Parser for Maven command output
pub struct Parser;

impl Parser {
    /// Whether `line` opens a convergence conflict report
    pub fn is_convergence_header(line: &str) -> bool {
        CONVERGENCE_HEADER_REGEX.is_match(line)
    }

    fn header_token(line: &str) -> Option<&str> {
        CONVERGENCE_HEADER_REGEX
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    fn strip_log_level(line: &str) -> &str {
        match LOG_LEVEL_REGEX.find(line) {
            Some(m) => &line[m.end()..],
            None => line,
        }
    }
}
