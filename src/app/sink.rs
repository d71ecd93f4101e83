//! Applying edit batches to the build's manifests

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::convergence::{ConvergenceError, ManifestSink};
use crate::pom::{PomDocument, PomError};
use crate::resolve::EditDecision;

/// Sends edits to the root manifest, and exclusions the root cannot take
/// to the module manifests declaring the dependency
#[derive(Debug, Clone)]
pub struct PomSink {
    root: PathBuf,
    modules: Vec<PathBuf>,
}

impl PomSink {
    pub fn new(root: impl Into<PathBuf>, modules: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            modules,
        }
    }

    fn apply_one(
        root: &mut PomDocument,
        modules: &mut [PomDocument],
        decision: &EditDecision,
    ) -> Result<(), PomError> {
        debug!("Applying: {decision}");
        match decision {
            EditDecision::UpdateExplicit {
                artifact,
                version,
                scope,
                artifact_type,
                classifier,
            } => {
                let mut found = root.update_explicit(
                    artifact,
                    version,
                    scope.as_ref(),
                    artifact_type.as_deref(),
                    classifier.as_deref(),
                )?;
                for module in modules.iter_mut() {
                    match module.update_explicit(
                        artifact,
                        version,
                        scope.as_ref(),
                        artifact_type.as_deref(),
                        classifier.as_deref(),
                    ) {
                        Ok(declared) => found |= declared,
                        // module inherits the property from the root
                        Err(PomError::MissingProperty { name, .. }) => {
                            if !root.set_property(&name, version.as_str())? {
                                return Err(PomError::MissingProperty {
                                    path: module.path().to_path_buf(),
                                    name,
                                });
                            }
                            found = true;
                        }
                        Err(e) => return Err(e),
                    }
                }
                if !found {
                    warn!("No manifest declares {artifact}; pinning it in the root instead");
                    root.add_forced_dependency(
                        artifact,
                        version,
                        scope.as_ref(),
                        artifact_type.as_deref(),
                        classifier.as_deref(),
                    )?;
                }
            }
            EditDecision::AddExclusion {
                declaring,
                excluded,
            } => {
                if !root.add_exclusion(declaring, excluded)? {
                    let mut found = false;
                    for module in modules.iter_mut() {
                        found |= module.add_exclusion(declaring, excluded)?;
                    }
                    if !found {
                        warn!("No manifest declares {declaring}; cannot exclude {excluded}");
                    }
                }
            }
            EditDecision::AddForcedDependency {
                artifact,
                version,
                scope,
                artifact_type,
                classifier,
            } => root.add_forced_dependency(
                artifact,
                version,
                scope.as_ref(),
                artifact_type.as_deref(),
                classifier.as_deref(),
            )?,
        }
        Ok(())
    }
}

impl ManifestSink for PomSink {
    fn apply(&mut self, decisions: &[EditDecision]) -> Result<bool, ConvergenceError> {
        let mut root = PomDocument::load(&self.root)?;
        let mut modules = self
            .modules
            .iter()
            .map(PomDocument::load)
            .collect::<Result<Vec<_>, _>>()?;

        for decision in decisions {
            Self::apply_one(&mut root, &mut modules, decision)?;
        }

        let mut changed = root.save()?;
        for module in &mut modules {
            changed |= module.save()?;
        }
        Ok(changed)
    }
}
