//! Registry of the build's own modules

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use super::ResolveError;
use crate::model::ArtifactId;
use crate::pom::PomDocument;

/// Identities of every module manifest in the build, built once per run
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: BTreeSet<ArtifactId>,
}

impl ModuleRegistry {
    /// Read the identity of every given manifest
    pub fn from_manifests<I, P>(manifests: I) -> Result<Self, ResolveError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut registry = Self::default();
        for manifest in manifests {
            let manifest = manifest.as_ref();
            let identity = PomDocument::load(manifest)?.identity()?;
            debug!(module = %identity, path = %manifest.display(), "Registered module");
            registry.register(identity);
        }
        Ok(registry)
    }

    pub fn register(&mut self, id: ArtifactId) {
        self.modules.insert(id);
    }

    pub fn contains(&self, id: &ArtifactId) -> bool {
        self.modules.contains(id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
