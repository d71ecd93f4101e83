//! Per-path occurrence extraction

use std::fmt;

use super::{ModuleRegistry, ResolveError};
use crate::model::{ArtifactId, Conflict, Dependency, Scope, Version, VersionPolicy};

/// Leaf occurrences of one conflicting artifact beneath one declaring
/// dependency
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOccurrenceSet {
    /// The dependency declared in the module manifest
    pub declaring: Dependency,

    /// The conflicting artifact
    pub conflict: ArtifactId,

    pub leaves: Vec<Dependency>,
}

impl ResolvedOccurrenceSet {
    /// Whether the manifest declares the conflicting artifact directly
    pub fn is_explicit(&self) -> bool {
        self.declaring.id == self.conflict
    }

    /// Whether `other` describes the same (declaring, conflict) pair
    pub fn same_key(&self, other: &ResolvedOccurrenceSet) -> bool {
        self.declaring.id == other.declaring.id && self.conflict == other.conflict
    }

    /// Fold another set with the same key into this one
    pub fn merge(&mut self, other: ResolvedOccurrenceSet) {
        self.leaves.extend(other.leaves);
    }

    fn conflict_leaves(&self) -> impl Iterator<Item = &Dependency> {
        self.leaves.iter().filter(|leaf| leaf.matches(&self.conflict))
    }

    /// Newest version of the conflicting artifact found in this set
    pub fn latest_version(&self, policy: &VersionPolicy) -> Option<&Version> {
        self.conflict_leaves()
            .map(|leaf| &leaf.version)
            .reduce(|best, candidate| policy.max(&self.conflict, best, candidate))
    }

    /// Whether the declaring dependency's edge to the conflict must be cut
    /// when `chosen` is the version being pinned
    pub fn needs_exclusion(&self, chosen: &Version, policy: &VersionPolicy) -> bool {
        if self.leaves.len() > 1 {
            return true;
        }
        self.latest_version(policy)
            .is_some_and(|latest| policy.compare(&self.conflict, chosen, latest).is_gt())
    }

    pub fn resolved_scope(&self) -> Option<Scope> {
        common(self.leaves.iter().map(|leaf| leaf.scope.as_ref()))
    }

    pub fn resolved_type(&self) -> Option<String> {
        common(self.leaves.iter().map(|leaf| leaf.artifact_type.as_ref()))
    }

    pub fn resolved_classifier(&self) -> Option<String> {
        common(self.leaves.iter().map(|leaf| leaf.classifier.as_ref()))
    }
}

/// The single value shared by every item, or `None` when any item lacks it
/// or two items disagree
pub(super) fn common<'a, T, I>(values: I) -> Option<T>
where
    T: Clone + PartialEq + 'a,
    I: IntoIterator<Item = Option<&'a T>>,
{
    let mut shared: Option<&T> = None;
    for value in values {
        let value = value?;
        match shared {
            Some(existing) if existing != value => return None,
            _ => shared = Some(value),
        }
    }
    shared.cloned()
}

/// A reported path whose root declares nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircularDependency {
    /// The module at the root of the path
    pub module: ArtifactId,

    /// The conflicting artifact
    pub conflict: ArtifactId,

    /// Whether `module` is one of this build's own modules
    pub internal: bool,
}

impl fmt::Display for CircularDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.internal { "internal module" } else { "artifact" };
        write!(f, "{kind} {} reaches {} through itself", self.module, self.conflict)
    }
}

/// What one reported path contributes
#[derive(Debug, Clone, PartialEq)]
pub enum PathOccurrence {
    Resolved(ResolvedOccurrenceSet),
    Circular(CircularDependency),
}

/// Extract one occurrence per reported path of `conflict`
pub fn extract_occurrences(
    conflict: &Conflict,
    registry: &ModuleRegistry,
) -> Result<Vec<PathOccurrence>, ResolveError> {
    conflict
        .roots()
        .iter()
        .map(|&root| {
            let root_node = conflict.node(root);
            match root_node.children() {
                [] => Ok(PathOccurrence::Circular(CircularDependency {
                    module: root_node.dependency.id.clone(),
                    conflict: conflict.id().clone(),
                    internal: registry.contains(&root_node.dependency.id),
                })),
                [declaring] => Ok(PathOccurrence::Resolved(ResolvedOccurrenceSet {
                    declaring: conflict.node(*declaring).dependency.clone(),
                    conflict: conflict.id().clone(),
                    leaves: conflict
                        .leaves_under(*declaring)
                        .into_iter()
                        .cloned()
                        .collect(),
                })),
                children => Err(ResolveError::StructuralInvariant {
                    conflict: conflict.id().clone(),
                    root: root_node.dependency.id.clone(),
                    children: children.len(),
                }),
            }
        })
        .collect()
}
