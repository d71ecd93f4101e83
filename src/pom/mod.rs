//! `pom.xml` manipulation
//!
//! Edits are spliced into the original text so that untouched bytes stay
//! exactly as the user wrote them. Everything this tool inserts carries
//! `angel:tracking="managed"` and can be stripped again.

mod document;
mod index;
mod locator;
mod mutator;

pub use document::PomDocument;
pub use locator::find_module_manifests;
pub use mutator::StripOutcome;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Attribute marking tool-owned elements
pub const TRACKING_ATTRIBUTE: &str = "angel:tracking";
pub const TRACKING_VALUE: &str = "managed";

/// Namespace declaration added to `<project>` while tagged content exists
pub const NAMESPACE_ATTRIBUTE: &str = "xmlns:angel";
pub const NAMESPACE_URI: &str = "http://unhuman.com/angel";

/// Comments bracketing regions written by older releases
pub const LEGACY_START_COMMENT: &str = "DependencyAngel Start";
pub const LEGACY_END_COMMENT: &str = "DependencyAngel End";

/// Errors raised while reading, editing or writing a manifest
#[derive(Error, Debug)]
pub enum PomError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Malformed manifest {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("{} has no <{element}>", .path.display())]
    MissingElement { path: PathBuf, element: String },

    #[error("{} references undefined property ${{{name}}}", .path.display())]
    MissingProperty { path: PathBuf, name: String },

    #[error("Failed to scan {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}
