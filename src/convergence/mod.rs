//! Iterative convergence
//!
//! Alternates between asking the build for its convergence report and
//! applying the edits that resolve it, until the report is clean.

mod controller;

pub use controller::{ConvergenceController, ConvergenceReport};

use std::fmt;

use thiserror::Error;

use crate::maven::{MavenError, ParseError};
use crate::pom::PomError;
use crate::resolve::{CircularDependency, EditDecision, ResolveError};

/// Errors that stop the convergence loop
#[derive(Error, Debug)]
pub enum ConvergenceError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Maven(#[from] MavenError),

    #[error(transparent)]
    Manifest(#[from] PomError),

    #[error(
        "Convergence stuck after {iterations} iterations with {remaining} conflicts remaining: {reason}{}",
        circular_note(.circular)
    )]
    Stuck {
        iterations: usize,
        remaining: usize,
        reason: StuckReason,
        /// Circular paths skipped before giving up
        circular: Vec<CircularDependency>,
    },
}

/// Why the loop gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StuckReason {
    /// The build reported exactly the same conflicts again
    Unchanged,
    /// The previous batch changed no manifest
    NoProgress,
    /// The conflict count did not go down between two iterations
    CountUnchanged(usize),
    /// The configured iteration limit was reached
    IterationLimit(usize),
}

impl fmt::Display for StuckReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged => f.write_str("the conflict report did not change"),
            Self::NoProgress => f.write_str("the last batch changed no manifest"),
            Self::CountUnchanged(count) => {
                write!(f, "the report still lists {count} conflicts after the last batch")
            }
            Self::IterationLimit(limit) => write!(f, "iteration limit of {limit} reached"),
        }
    }
}

fn circular_note(circular: &[CircularDependency]) -> String {
    if circular.is_empty() {
        return String::new();
    }
    let cycles: Vec<String> = circular.iter().map(ToString::to_string).collect();
    format!(" (skipped circular paths: {})", cycles.join("; "))
}

/// Produces the build's diagnostic output for one iteration
pub trait DiagnosticSource {
    fn diagnostics(&mut self) -> Result<Vec<String>, ConvergenceError>;
}

/// Applies a batch of edits and persists it
pub trait ManifestSink {
    /// Returns whether any manifest changed
    fn apply(&mut self, decisions: &[EditDecision]) -> Result<bool, ConvergenceError>;
}
