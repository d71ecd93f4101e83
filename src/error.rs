//! Top-level error type

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::convergence::ConvergenceError;
use crate::pom::PomError;
use crate::resolve::ResolveError;

#[derive(Error, Debug)]
pub enum AngelError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("No pom.xml in {}", .0.display())]
    MissingManifest(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Manifest(#[from] PomError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Convergence(#[from] ConvergenceError),

    #[error("Failed to read confirmation: {0}")]
    Prompt(#[source] io::Error),
}
