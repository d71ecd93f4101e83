//! Maven command execution layer
//!
//! This module handles running Maven and parsing its convergence report.

pub mod constants;
mod executor;
/// Parser module (public for integration testing)
pub mod parser;

pub use executor::{MavenExecutor, MavenOutput};
pub use parser::{ParseError, ParseErrorKind, Parser};

use std::io;
use thiserror::Error;

/// Errors that can occur when executing Maven
#[derive(Error, Debug)]
pub enum MavenError {
    #[error("mvn command failed (exit code {exit_code}): {message}")]
    CommandFailed { message: String, exit_code: i32 },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("mvn is not installed or not in PATH")]
    MavenNotFound,
}
