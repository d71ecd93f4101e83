//! Artifact identity model

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::ModelError;

/// Identity of a Maven artifact irrespective of version (`group:artifact`)
///
/// Versions and scopes are only ever compared between two occurrences that
/// share the same `ArtifactId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId {
    /// Maven `groupId`
    pub group: String,

    /// Maven `artifactId`
    pub artifact: String,
}

impl ArtifactId {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
        }
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

impl FromStr for ArtifactId {
    type Err = ModelError;

    /// Parse a plain `group:artifact` pair
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once(':') {
            Some((group, artifact))
                if !group.trim().is_empty()
                    && !artifact.trim().is_empty()
                    && !artifact.contains(':') =>
            {
                Ok(Self::new(group.trim(), artifact.trim()))
            }
            _ => Err(ModelError::InvalidArtifactId(s.to_string())),
        }
    }
}

/// An ordered set of artifact identities
///
/// Used for the banned / preserved / non-semantic lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet(BTreeSet<ArtifactId>);

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &ArtifactId) -> bool {
        self.0.contains(id)
    }

    pub fn extend(&mut self, other: &ArtifactSet) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ArtifactId> for ArtifactSet {
    fn from_iter<T: IntoIterator<Item = ArtifactId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_artifact_id() {
        let id: ArtifactId = "org.slf4j:slf4j-api".parse().unwrap();
        assert_eq!(id.group, "org.slf4j");
        assert_eq!(id.artifact, "slf4j-api");
        assert_eq!(id.to_string(), "org.slf4j:slf4j-api");
    }

    #[test]
    fn test_parse_artifact_id_trims_whitespace() {
        let id: ArtifactId = "  com.example : lib ".parse().unwrap();
        assert_eq!(id, ArtifactId::new("com.example", "lib"));
    }

    #[test]
    fn test_parse_artifact_id_rejects_malformed() {
        assert!("no-colon".parse::<ArtifactId>().is_err());
        assert!(":artifact".parse::<ArtifactId>().is_err());
        assert!("group:".parse::<ArtifactId>().is_err());
        assert!("a:b:c".parse::<ArtifactId>().is_err());
    }

    #[test]
    fn test_artifact_set_extend() {
        let mut set: ArtifactSet = [ArtifactId::new("a", "b")].into_iter().collect();
        let other: ArtifactSet = [ArtifactId::new("a", "b"), ArtifactId::new("c", "d")]
            .into_iter()
            .collect();
        set.extend(&other);
        assert_eq!(set.len(), 2);
        assert!(set.contains(&ArtifactId::new("c", "d")));
    }
}
