//! Conflict resolution
//!
//! Turns parsed [`Conflict`](crate::model::Conflict) trees into the
//! manifest edits that make the dependency graph converge.

mod aggregator;
mod occurrence;
mod registry;

pub use aggregator::{ConflictResolution, ResolutionAggregator, VersionOverrides};
pub use occurrence::{CircularDependency, PathOccurrence, ResolvedOccurrenceSet, extract_occurrences};
pub use registry::ModuleRegistry;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ArtifactId, Scope, Version};
use crate::pom::PomError;

/// Errors raised while deciding manifest edits
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(
        "Conflict {conflict}: path rooted at {root} has {children} declared dependencies (expected 1)"
    )]
    StructuralInvariant {
        conflict: ArtifactId,
        root: ArtifactId,
        children: usize,
    },

    #[error("Circular dependency: {module} reaches {conflict} through itself")]
    CircularDependency {
        module: ArtifactId,
        conflict: ArtifactId,
    },

    #[error(transparent)]
    Manifest(#[from] PomError),
}

/// How to react to a reported path whose root declares nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CircularPolicy {
    /// Warn, drop the path for this iteration and keep going
    #[default]
    Skip,
    /// Abort the run
    Fail,
}

/// A single manifest edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditDecision {
    /// Update a direct declaration of `artifact` in place
    UpdateExplicit {
        artifact: ArtifactId,
        version: Version,
        scope: Option<Scope>,
        artifact_type: Option<String>,
        classifier: Option<String>,
    },

    /// Cut the transitive edge from `declaring` to `excluded`
    AddExclusion {
        declaring: ArtifactId,
        excluded: ArtifactId,
    },

    /// Pin `artifact` with a new tool-owned declaration
    AddForcedDependency {
        artifact: ArtifactId,
        version: Version,
        scope: Option<Scope>,
        artifact_type: Option<String>,
        classifier: Option<String>,
    },
}

impl EditDecision {
    /// The artifact whose declaration this edit touches
    pub fn target(&self) -> &ArtifactId {
        match self {
            Self::UpdateExplicit { artifact, .. } | Self::AddForcedDependency { artifact, .. } => {
                artifact
            }
            Self::AddExclusion { declaring, .. } => declaring,
        }
    }
}

impl fmt::Display for EditDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpdateExplicit {
                artifact, version, ..
            } => write!(f, "update {artifact} to {version}"),
            Self::AddExclusion {
                declaring,
                excluded,
            } => write!(f, "exclude {excluded} from {declaring}"),
            Self::AddForcedDependency {
                artifact, version, ..
            } => write!(f, "force {artifact} to {version}"),
        }
    }
}
