//! Data models for dependency convergence
//!
//! This module contains manifest-independent structures representing
//! Maven concepts like artifact identities, versions, scopes and the
//! conflict trees reported by the enforcer.

mod artifact;
mod conflict;
mod dependency;
mod scope;
mod version;

pub use artifact::{ArtifactId, ArtifactSet};
pub use conflict::{Conflict, ConflictPathNode, NodeId};
pub use dependency::Dependency;
pub use scope::Scope;
pub use version::{Version, VersionPolicy, property_name};

use thiserror::Error;

/// Errors raised while interpreting coordinates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid artifact identifier '{0}' (expected group:artifact)")]
    InvalidArtifactId(String),

    #[error("Invalid dependency coordinates '{0}'")]
    InvalidCoordinates(String),
}
