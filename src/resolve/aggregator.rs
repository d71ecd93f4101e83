//! Resolution aggregator
//!
//! Merges the occurrences of every reported path of a conflict and decides
//! the edits: pin the newest version once, and exclude the conflicting
//! artifact from every declaring dependency that would otherwise drag in a
//! different version.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::occurrence::common;
use super::{
    CircularDependency, CircularPolicy, EditDecision, ModuleRegistry, PathOccurrence,
    ResolveError, ResolvedOccurrenceSet, extract_occurrences,
};
use crate::model::{ArtifactId, Conflict, Version, VersionPolicy};

/// Versions previously forced by this tool, recovered when stripping
///
/// Keyed by the version property name (`<group>-<artifact>.version`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionOverrides(BTreeMap<String, Version>);

impl VersionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Property name holding the forced version of `artifact`
    pub fn property_key(artifact: &ArtifactId) -> String {
        format!("{}-{}.version", artifact.group, artifact.artifact)
    }

    pub fn insert(&mut self, property: impl Into<String>, version: Version) {
        self.0.insert(property.into(), version);
    }

    pub fn extend(&mut self, other: VersionOverrides) {
        self.0.extend(other.0);
    }

    pub fn get(&self, artifact: &ArtifactId) -> Option<&Version> {
        self.0.get(&Self::property_key(artifact))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Edits decided for one conflict
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictResolution {
    pub artifact: ArtifactId,
    pub decisions: Vec<EditDecision>,
    /// Paths dropped under [`CircularPolicy::Skip`]
    pub circular: Vec<CircularDependency>,
}

/// Decides edits for conflicts
#[derive(Debug, Clone, Copy)]
pub struct ResolutionAggregator<'a> {
    policy: &'a VersionPolicy,
    registry: &'a ModuleRegistry,
    overrides: &'a VersionOverrides,
    circular_policy: CircularPolicy,
}

impl<'a> ResolutionAggregator<'a> {
    pub fn new(
        policy: &'a VersionPolicy,
        registry: &'a ModuleRegistry,
        overrides: &'a VersionOverrides,
        circular_policy: CircularPolicy,
    ) -> Self {
        Self {
            policy,
            registry,
            overrides,
            circular_policy,
        }
    }

    pub fn policy(&self) -> &'a VersionPolicy {
        self.policy
    }

    /// Decide the edits for one conflict
    pub fn resolve(&self, conflict: &Conflict) -> Result<ConflictResolution, ResolveError> {
        let artifact = conflict.id().clone();
        let mut sets: Vec<ResolvedOccurrenceSet> = Vec::new();
        let mut circular = Vec::new();

        for occurrence in extract_occurrences(conflict, self.registry)? {
            match occurrence {
                PathOccurrence::Resolved(set) => {
                    match sets.iter_mut().find(|existing| existing.same_key(&set)) {
                        Some(existing) => existing.merge(set),
                        None => sets.push(set),
                    }
                }
                PathOccurrence::Circular(cycle) => match self.circular_policy {
                    CircularPolicy::Skip => {
                        warn!("Skipping circular path: {cycle}");
                        circular.push(cycle);
                    }
                    CircularPolicy::Fail => {
                        return Err(ResolveError::CircularDependency {
                            module: cycle.module,
                            conflict: cycle.conflict,
                        });
                    }
                },
            }
        }

        let Some(version) = self.latest_version(&artifact, &sets) else {
            return Ok(ConflictResolution {
                artifact,
                decisions: Vec::new(),
                circular,
            });
        };

        let leaves = || sets.iter().flat_map(|set| set.leaves.iter());
        let scope = common(leaves().map(|leaf| leaf.scope.as_ref()));
        let artifact_type = common(leaves().map(|leaf| leaf.artifact_type.as_ref()));
        let classifier = common(leaves().map(|leaf| leaf.classifier.as_ref()));

        debug!(
            conflict = %artifact,
            %version,
            scope = ?scope,
            paths = sets.len(),
            "Resolving conflict"
        );

        let mut decisions = Vec::new();
        if sets.iter().any(ResolvedOccurrenceSet::is_explicit) {
            decisions.push(EditDecision::UpdateExplicit {
                artifact: artifact.clone(),
                version: version.clone(),
                scope,
                artifact_type,
                classifier,
            });
        } else {
            decisions.push(EditDecision::AddForcedDependency {
                artifact: artifact.clone(),
                version: version.clone(),
                scope,
                artifact_type,
                classifier,
            });
        }

        for set in &sets {
            if !set.is_explicit() && set.needs_exclusion(&version, self.policy) {
                decisions.push(EditDecision::AddExclusion {
                    declaring: set.declaring.id.clone(),
                    excluded: artifact.clone(),
                });
            }
        }

        Ok(ConflictResolution {
            artifact,
            decisions,
            circular,
        })
    }

    /// Newest leaf version, raised to a previously forced version if that
    /// one is newer
    fn latest_version(&self, artifact: &ArtifactId, sets: &[ResolvedOccurrenceSet]) -> Option<Version> {
        let latest = sets
            .iter()
            .filter_map(|set| set.latest_version(self.policy))
            .reduce(|best, candidate| self.policy.max(artifact, best, candidate));

        match (latest, self.overrides.get(artifact)) {
            (Some(latest), Some(forced)) => Some(self.policy.max(artifact, latest, forced).clone()),
            (latest, _) => latest.cloned(),
        }
    }
}
