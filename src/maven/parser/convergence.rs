//! Dependency convergence report parser
//!
//! Maven prints one block per conflicting artifact:
//!
//! ```text
//! Dependency convergence error for org.slf4j:slf4j-api:jar:1.7.25 paths to dependency are:
//! +-com.example:app:jar:1.0.0
//!   +-ch.qos.logback:logback-classic:jar:1.2.3:compile
//!     +-org.slf4j:slf4j-api:jar:1.7.25:compile
//! and
//! +-com.example:app:jar:1.0.0
//!   +-org.slf4j:slf4j-api:jar:1.7.21:compile
//!
//! ```
//!
//! Tree depth is carried by indentation only. The first indented line of a
//! run fixes the indent step; every later line must be indented by an exact
//! multiple of it.

use thiserror::Error;

use super::{PATH_ENTRY_REGEX, Parser};
use crate::model::{Conflict, Dependency, ModelError, NodeId, VersionPolicy};

/// A malformed convergence report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error line {line}: {kind}")]
pub struct ParseError {
    /// 1-based input line
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("expected a dependency path entry, found '{0}'")]
    ExpectedPathEntry(String),

    #[error(transparent)]
    Coordinates(#[from] ModelError),

    #[error("indentation of {width} is not a multiple of the indent step {step}")]
    Indentation { width: usize, step: usize },

    #[error("path entry is not indented below its root")]
    MissingIndent,

    #[error("path entry at depth {depth} has no parent (deepest open level is {deepest})")]
    Orphan { depth: usize, deepest: usize },

    #[error("convergence data incomplete")]
    Incomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Looking,
    FoundDependency,
    ProcessChildren,
}

/// Single-pass state machine over report lines
struct ConvergenceReader<'a> {
    policy: &'a VersionPolicy,
    state: State,
    conflicts: Vec<Conflict>,
    /// Indent step, fixed by the first indented line of the run
    indent_step: Option<usize>,
    /// Indentation of the current path's root line
    root_indent: usize,
    /// Open nodes of the current path; index = depth
    path: Vec<NodeId>,
}

impl<'a> ConvergenceReader<'a> {
    fn new(policy: &'a VersionPolicy) -> Self {
        Self {
            policy,
            state: State::Looking,
            conflicts: Vec::new(),
            indent_step: None,
            root_indent: 0,
            path: Vec::new(),
        }
    }

    fn process_line(&mut self, line: &str) -> Result<(), ParseErrorKind> {
        let line = Parser::strip_log_level(line);

        match self.state {
            State::Looking => {
                if let Some(token) = Parser::header_token(line) {
                    self.open_conflict(token)?;
                }
            }
            State::FoundDependency => {
                let (indent, token) = split_entry(line)?;
                let root = Dependency::parse(token)?;
                if let Some(conflict) = self.conflicts.last_mut() {
                    self.path = vec![conflict.add_root(root)];
                }
                self.root_indent = indent;
                self.state = State::ProcessChildren;
            }
            State::ProcessChildren => {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed == "]" {
                    self.state = State::Looking;
                } else if trimmed == "and" || trimmed == "," {
                    self.state = State::FoundDependency;
                } else if let Some(token) = Parser::header_token(line) {
                    // next report started without a separating blank line
                    self.open_conflict(token)?;
                } else {
                    self.add_child(line)?;
                }
            }
        }
        Ok(())
    }

    fn open_conflict(&mut self, token: &str) -> Result<(), ParseErrorKind> {
        let target = Dependency::parse(token)?;
        self.conflicts.push(Conflict::new(target));
        self.path.clear();
        self.state = State::FoundDependency;
        Ok(())
    }

    fn add_child(&mut self, line: &str) -> Result<(), ParseErrorKind> {
        let (indent, token) = split_entry(line)?;
        if indent <= self.root_indent {
            return Err(ParseErrorKind::MissingIndent);
        }

        let width = indent - self.root_indent;
        let step = *self.indent_step.get_or_insert(width);
        if width % step != 0 {
            return Err(ParseErrorKind::Indentation { width, step });
        }

        let depth = width / step;
        if depth > self.path.len() {
            return Err(ParseErrorKind::Orphan {
                depth,
                deepest: self.path.len().saturating_sub(1),
            });
        }

        let dependency = Dependency::parse(token)?;
        self.path.truncate(depth);
        let parent = self.path[depth - 1];
        if let Some(conflict) = self.conflicts.last_mut() {
            let node = conflict.add_child(parent, dependency, self.policy);
            self.path.push(node);
        }
        Ok(())
    }
}

/// Split a path entry into (indent width, coordinate token)
fn split_entry(line: &str) -> Result<(usize, &str), ParseErrorKind> {
    PATH_ENTRY_REGEX
        .captures(line)
        .and_then(|caps| Some((caps.get(1)?.as_str().len(), caps.get(2)?.as_str())))
        .ok_or_else(|| ParseErrorKind::ExpectedPathEntry(line.trim().to_string()))
}

impl Parser {
    /// Parse a convergence report into its conflicts, in report order
    ///
    /// Lines outside a report block are ignored, so the full output of a
    /// Maven run can be passed in as-is.
    pub fn parse_convergence<I, S>(
        lines: I,
        policy: &VersionPolicy,
    ) -> Result<Vec<Conflict>, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut reader = ConvergenceReader::new(policy);
        let mut line_number = 0;

        for line in lines {
            line_number += 1;
            reader
                .process_line(line.as_ref())
                .map_err(|kind| ParseError {
                    line: line_number,
                    kind,
                })?;
        }

        if reader.state != State::Looking {
            return Err(ParseError {
                line: line_number,
                kind: ParseErrorKind::Incomplete,
            });
        }

        Ok(reader.conflicts)
    }
}
