//! Version ordering
//!
//! Versions are only compared between occurrences of the same artifact.
//! Two regimes exist:
//!
//! - *semantic*: at least three dot-separated leading segments, the first
//!   three numeric (e.g. `1.2.3`, `0.1.0.2`, `2.0.0-SNAPSHOT`)
//! - *legacy*: anything else (e.g. `1`, `1.extra`, `Finchley.SR2`)
//!
//! A semantic version always outranks a legacy one. Within a regime,
//! segments compare numerically when both are numbers, otherwise
//! lexically; a version with more segments wins when the shared prefix is
//! equal; a missing `-suffix` wins over a present one.

use std::cmp::Ordering;
use std::fmt;

use super::{ArtifactId, ArtifactSet};

/// A raw version string as reported by Maven
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this "version" is a `${property}` reference
    pub fn is_property_reference(&self) -> bool {
        property_name(&self.0).is_some()
    }

    fn parts(&self) -> VersionParts<'_> {
        let (prefix, suffix) = match self.0.split_once('-') {
            Some((prefix, suffix)) => (prefix, Some(suffix)),
            None => (self.0.as_str(), None),
        };
        VersionParts {
            segments: prefix.split('.').collect(),
            suffix,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract `name` from a `${name}` reference
pub fn property_name(value: &str) -> Option<&str> {
    value
        .trim()
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|name| !name.is_empty())
}

struct VersionParts<'a> {
    segments: Vec<&'a str>,
    suffix: Option<&'a str>,
}

impl VersionParts<'_> {
    fn looks_semantic(&self) -> bool {
        self.segments.len() >= 3 && self.segments[..3].iter().all(|s| is_number(s))
    }
}

fn is_number(segment: &str) -> bool {
    segment.parse::<i64>().is_ok()
}

/// Ordering rules for versions, aware of artifacts configured as
/// non-semantic
#[derive(Debug, Clone, Default)]
pub struct VersionPolicy {
    non_semantic: ArtifactSet,
}

impl VersionPolicy {
    pub fn new(non_semantic: ArtifactSet) -> Self {
        Self { non_semantic }
    }

    /// Whether `version` of `artifact` is treated as semantic
    pub fn is_semantic(&self, artifact: &ArtifactId, version: &Version) -> bool {
        !self.non_semantic.contains(artifact) && version.parts().looks_semantic()
    }

    /// Compare two versions of the same artifact
    pub fn compare(&self, artifact: &ArtifactId, left: &Version, right: &Version) -> Ordering {
        let left_semantic = self.is_semantic(artifact, left);
        let right_semantic = self.is_semantic(artifact, right);
        match (left_semantic, right_semantic) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }

        let left = left.parts();
        let right = right.parts();

        for (index, segment) in left.segments.iter().enumerate() {
            let Some(other) = right.segments.get(index) else {
                return Ordering::Greater;
            };
            match compare_segment(segment, other) {
                Ordering::Equal => continue,
                ordering => return ordering,
            }
        }

        if left.segments.len() == right.segments.len() {
            compare_suffix(left.suffix, right.suffix)
        } else {
            // right side carries more segments
            Ordering::Less
        }
    }

    /// The greater of two versions of the same artifact (`left` on ties)
    pub fn max<'a>(
        &self,
        artifact: &ArtifactId,
        left: &'a Version,
        right: &'a Version,
    ) -> &'a Version {
        if self.compare(artifact, right, left) == Ordering::Greater {
            right
        } else {
            left
        }
    }
}

fn compare_segment(left: &str, right: &str) -> Ordering {
    match (left.parse::<i64>(), right.parse::<i64>()) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Ok(_)) => Ordering::Less,
        (Err(_), Err(_)) => left.cmp(right),
    }
}

/// A missing suffix beats a present one (pre-release qualifiers)
fn compare_suffix(left: Option<&str>, right: Option<&str>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => left.cmp(right),
    }
}
