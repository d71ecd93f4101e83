//! Dependency coordinates as printed by Maven

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::{ArtifactId, ModelError, Scope, Version};

/// A dependency occurrence parsed from a coordinate token
///
/// Accepted token shapes:
///
/// ```text
/// group:artifact:version
/// group:artifact:type:version
/// group:artifact:type:version:scope
/// group:artifact:type:classifier:version:scope
/// ```
///
/// With more than six fields, everything between the type and the version
/// is the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub id: ArtifactId,
    pub version: Version,
    pub scope: Option<Scope>,

    /// Maven `<type>` (packaging of the dependency, e.g. `jar`, `pom`)
    pub artifact_type: Option<String>,

    pub classifier: Option<String>,

    /// Artifacts excluded from this dependency's transitive graph
    pub exclusions: BTreeSet<ArtifactId>,
}

impl Dependency {
    pub fn new(id: ArtifactId, version: Version) -> Self {
        Self {
            id,
            version,
            scope: None,
            artifact_type: None,
            classifier: None,
            exclusions: BTreeSet::new(),
        }
    }

    /// Parse a coordinate token
    ///
    /// Anything after the first whitespace (e.g. Maven's
    /// `(version managed from ...)` annotations) is ignored.
    pub fn parse(token: &str) -> Result<Self, ModelError> {
        let coordinates = token.split_whitespace().next().unwrap_or_default();
        let fields: Vec<&str> = coordinates.split(':').collect();

        let classifier_fields;
        let (group, artifact, artifact_type, classifier, version, scope) = match fields[..] {
            [g, a, v] => (g, a, None, None, v, None),
            [g, a, t, v] => (g, a, Some(t), None, v, None),
            [g, a, t, v, s] => (g, a, Some(t), None, v, Some(s)),
            // classifier may itself contain colons
            [g, a, t, ref middle @ .., v, s] => {
                classifier_fields = middle.join(":");
                (g, a, Some(t), Some(classifier_fields.as_str()), v, Some(s))
            }
            _ => return Err(ModelError::InvalidCoordinates(token.trim().to_string())),
        };

        if group.is_empty() || artifact.is_empty() || version.is_empty() {
            return Err(ModelError::InvalidCoordinates(token.trim().to_string()));
        }

        let non_empty = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_string);

        Ok(Self {
            id: ArtifactId::new(group, artifact),
            version: Version::new(version),
            scope: non_empty(scope).map(|s| Scope::parse(&s)),
            artifact_type: non_empty(artifact_type),
            classifier: non_empty(classifier),
            exclusions: BTreeSet::new(),
        })
    }

    pub fn matches(&self, id: &ArtifactId) -> bool {
        &self.id == id
    }
}

impl FromStr for Dependency {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id.group, self.id.artifact)?;
        if let Some(artifact_type) = &self.artifact_type {
            write!(f, ":{artifact_type}")?;
        }
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        write!(f, ":{}", self.version)?;
        if let Some(scope) = &self.scope {
            write!(f, ":{scope}")?;
        }
        Ok(())
    }
}
