//! Manifest edits
//!
//! Every operation is idempotent: applying the same call twice leaves the
//! text as the first call did.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use super::document::{Fragment, PomDocument};
use super::index::ElementId;
use super::{
    LEGACY_END_COMMENT, LEGACY_START_COMMENT, NAMESPACE_ATTRIBUTE, NAMESPACE_URI, PomError,
};
use crate::model::{ArtifactId, ArtifactSet, Scope, Version, property_name};
use crate::resolve::VersionOverrides;

static NAMESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"\s+{}\s*=\s*(?:"[^"]*"|'[^']*')"#,
        regex::escape(NAMESPACE_ATTRIBUTE)
    ))
    .expect("Invalid namespace regex")
});

/// Result of [`PomDocument::strip`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripOutcome {
    /// Tool-owned elements and legacy regions removed
    pub removed: usize,

    /// Versions the removed content had forced
    pub overrides: VersionOverrides,
}

impl PomDocument {
    /// Update every direct declaration of `artifact` in place
    ///
    /// `type`, `scope` and `classifier` elements are only rewritten when
    /// present, and deleted when the new value is `None`. A version given as
    /// a property reference is left alone. Returns whether a declaration
    /// exists.
    pub fn update_explicit(
        &mut self,
        artifact: &ArtifactId,
        version: &Version,
        scope: Option<&Scope>,
        artifact_type: Option<&str>,
        classifier: Option<&str>,
    ) -> Result<bool, PomError> {
        let count = self.declarations(artifact).len();

        for nth in 0..count {
            if !version.is_property_reference() {
                let Some(declaration) = self.declarations(artifact).get(nth).copied() else {
                    break;
                };
                if let Some(node) = self.child(declaration, "version") {
                    let current = self.text(node).unwrap_or_default();
                    match property_name(&current) {
                        Some(name) => {
                            let name = name.to_string();
                            if !self.set_property(&name, version.as_str())? {
                                return Err(PomError::MissingProperty {
                                    path: self.path().to_path_buf(),
                                    name,
                                });
                            }
                        }
                        None => self.set_text(node, version.as_str())?,
                    }
                }
            }

            let fields = [
                ("type", artifact_type),
                ("scope", scope.map(Scope::as_str)),
                ("classifier", classifier),
            ];
            for (tag, value) in fields {
                let Some(declaration) = self.declarations(artifact).get(nth).copied() else {
                    break;
                };
                let Some(node) = self.child(declaration, tag) else {
                    continue;
                };
                match value {
                    Some(value) => self.set_text(node, value)?,
                    None => self.remove(node)?,
                }
            }
        }

        if count > 0 {
            debug!(path = %self.path().display(), %artifact, %version, "Updated explicit declaration");
        }
        Ok(count > 0)
    }

    /// Exclude `excluded` from every declaration of `declaring`
    ///
    /// Returns whether `declaring` is declared here.
    pub fn add_exclusion(
        &mut self,
        declaring: &ArtifactId,
        excluded: &ArtifactId,
    ) -> Result<bool, PomError> {
        let count = self.declarations(declaring).len();

        for nth in 0..count {
            let Some(declaration) = self.declarations(declaring).get(nth).copied() else {
                break;
            };
            if self.excludes(declaration, excluded) {
                continue;
            }

            let exclusion = Fragment::element("exclusion")
                .tracked()
                .with_child(Fragment::text("groupId", &excluded.group))
                .with_child(Fragment::text("artifactId", &excluded.artifact));
            match self.child(declaration, "exclusions") {
                Some(exclusions) => self.append_child(exclusions, &exclusion)?,
                None => self.append_child(
                    declaration,
                    &Fragment::element("exclusions").tracked().with_child(exclusion),
                )?,
            }
            self.ensure_namespace()?;
            debug!(path = %self.path().display(), %declaring, %excluded, "Added exclusion");
        }

        Ok(count > 0)
    }

    /// Pin `artifact` with a tool-owned declaration
    ///
    /// The version goes through a `<group-artifact.version>` property when
    /// the manifest has a `<properties>` section. A versionless declaration
    /// of the artifact gets a tool-owned `<version>` instead of a second
    /// declaration.
    pub fn add_forced_dependency(
        &mut self,
        artifact: &ArtifactId,
        version: &Version,
        scope: Option<&Scope>,
        artifact_type: Option<&str>,
        classifier: Option<&str>,
    ) -> Result<(), PomError> {
        if self.target_dependencies().is_none() {
            let root = self.root();
            self.append_child(root, &Fragment::element("dependencies").tracked())?;
            self.ensure_namespace()?;
        }

        let version_text = self.store_version(artifact, version)?;

        let section = self.target_dependencies().ok_or_else(|| self.missing("dependencies"))?;
        for declaration in self.declarations_in(section, artifact) {
            let Some(node) = self.child(declaration, "version") else {
                self.append_child(declaration, &Fragment::text("version", &version_text).tracked())?;
                self.ensure_namespace()?;
                info!("Pinned {artifact} to {version} on its existing declaration");
                return Ok(());
            };

            let current = self.text(node).unwrap_or_default();
            if current == version_text {
                return Ok(());
            }
            if self.element(declaration).tracked || self.element(node).tracked {
                self.set_text(node, &version_text)?;
                info!("Re-pinned {artifact} from {current} to {version}");
                return Ok(());
            }
            warn!(
                "{} already declares {artifact} at {current}; adding a second declaration at {version}",
                self.path().display()
            );
        }

        let fragment = Fragment::element("dependency")
            .tracked()
            .with_child(Fragment::text("groupId", &artifact.group))
            .with_child(Fragment::text("artifactId", &artifact.artifact))
            .with_optional_text("type", artifact_type.filter(|t| !t.trim().is_empty()))
            .with_child(Fragment::text("version", &version_text))
            .with_optional_text("scope", scope.map(Scope::as_str))
            .with_optional_text("classifier", classifier.filter(|c| !c.trim().is_empty()));
        let section = self.target_dependencies().ok_or_else(|| self.missing("dependencies"))?;
        self.append_child(section, &fragment)?;
        self.ensure_namespace()?;

        info!("Forced {artifact} to {version}");
        Ok(())
    }

    /// Set an existing `<properties>` entry; returns whether it exists
    pub fn set_property(&mut self, name: &str, value: &str) -> Result<bool, PomError> {
        let Some(property) = self
            .find_path(&["properties"])
            .and_then(|properties| self.child(properties, name))
        else {
            return Ok(false);
        };
        self.set_text(property, value)?;
        Ok(true)
    }

    /// Remove everything this tool added
    ///
    /// Tool-owned exclusions of `preserve`d artifacts survive. Regions
    /// between legacy start/end comments are removed as a whole.
    pub fn strip(&mut self, preserve: &ArtifactSet) -> Result<StripOutcome, PomError> {
        let mut outcome = StripOutcome::default();
        outcome.removed += self.strip_legacy_regions(&mut outcome.overrides)?;

        while let Some(id) = self.next_strippable(preserve) {
            let forced: Vec<_> = (id..self.index().elements().len())
                .filter(|&inner| inner == id || self.index().is_descendant(inner, id))
                .filter(|&inner| self.element(inner).tracked)
                .filter_map(|inner| self.forced_version(inner))
                .collect();
            for (property, version) in forced {
                outcome.overrides.insert(property, version);
            }
            self.remove(id)?;
            outcome.removed += 1;
        }

        if !self.index().elements().iter().any(|element| element.tracked) {
            self.remove_namespace()?;
        }

        if outcome.removed > 0 {
            info!(
                "Stripped {} tool-owned entries from {}",
                outcome.removed,
                self.path().display()
            );
        }
        Ok(outcome)
    }

    /// Remove user-written exclusions of artifacts outside `preserve`
    ///
    /// Containers left without any exclusion are removed too. Returns the
    /// number of exclusions removed.
    pub fn strip_untagged_exclusions(&mut self, preserve: &ArtifactSet) -> Result<usize, PomError> {
        let mut removed = 0;
        while let Some(id) = self.next_user_exclusion(preserve) {
            self.remove(id)?;
            removed += 1;
        }
        while let Some(id) = self.next_empty_exclusions() {
            self.remove(id)?;
        }
        if removed > 0 {
            info!("Removed {removed} exclusions from {}", self.path().display());
        }
        Ok(removed)
    }

    /// Create a tool-owned `<dependencyManagement><dependencies>` section;
    /// returns whether one was created
    pub fn ensure_dependency_management(&mut self) -> Result<bool, PomError> {
        if let Some(management) = self.find_path(&["dependencyManagement"]) {
            if self.child(management, "dependencies").is_some() {
                return Ok(false);
            }
            self.append_child(management, &Fragment::element("dependencies").tracked())?;
        } else {
            let fragment = Fragment::element("dependencyManagement")
                .tracked()
                .with_child(Fragment::element("dependencies"));
            match self.find_path(&["dependencies"]) {
                Some(dependencies) => self.insert_before(dependencies, &fragment)?,
                None => {
                    let root = self.root();
                    self.append_child(root, &fragment)?;
                }
            }
        }
        self.ensure_namespace()?;
        info!("Added dependencyManagement to {}", self.path().display());
        Ok(true)
    }

    pub fn has_dependency_management(&self) -> bool {
        self.find_path(&["dependencyManagement", "dependencies"]).is_some()
    }

    /// Whether any dependency section declares `artifact`
    pub fn declares(&self, artifact: &ArtifactId) -> bool {
        !self.declarations(artifact).is_empty()
    }

    // Lookup

    /// Section edits go to: managed dependencies when present
    fn target_dependencies(&self) -> Option<ElementId> {
        self.find_path(&["dependencyManagement", "dependencies"])
            .or_else(|| self.find_path(&["dependencies"]))
    }

    fn declarations(&self, artifact: &ArtifactId) -> Vec<ElementId> {
        [
            self.find_path(&["dependencyManagement", "dependencies"]),
            self.find_path(&["dependencies"]),
        ]
        .into_iter()
        .flatten()
        .flat_map(|section| self.declarations_in(section, artifact))
        .collect()
    }

    fn declarations_in(&self, section: ElementId, artifact: &ArtifactId) -> Vec<ElementId> {
        self.children_named(section, "dependency")
            .into_iter()
            .filter(|&dependency| self.coordinates(dependency).as_ref() == Some(artifact))
            .collect()
    }

    /// `groupId:artifactId` of a `<dependency>` or `<exclusion>`
    fn coordinates(&self, id: ElementId) -> Option<ArtifactId> {
        Some(ArtifactId::new(
            self.child_text(id, "groupId")?,
            self.child_text(id, "artifactId")?,
        ))
    }

    fn excludes(&self, declaration: ElementId, excluded: &ArtifactId) -> bool {
        let Some(exclusions) = self.child(declaration, "exclusions") else {
            return false;
        };
        self.children_named(exclusions, "exclusion")
            .into_iter()
            .any(|exclusion| {
                matches_pattern(self.child_text(exclusion, "groupId").as_deref(), &excluded.group)
                    && matches_pattern(
                        self.child_text(exclusion, "artifactId").as_deref(),
                        &excluded.artifact,
                    )
            })
    }

    fn parent_named(&self, id: ElementId, name: &str) -> Option<ElementId> {
        self.element(id)
            .parent
            .filter(|&parent| self.element(parent).name == name)
    }

    /// Whether a stripped element must stay to keep a preserved exclusion
    fn is_preserved(&self, id: ElementId, preserve: &ArtifactSet) -> bool {
        let element = self.element(id);
        match element.name.as_str() {
            "exclusion" => self
                .coordinates(id)
                .is_some_and(|artifact| preserve.contains(&artifact)),
            "exclusions" => element.children.iter().any(|&child| {
                self.element(child).name == "exclusion" && self.is_preserved(child, preserve)
            }),
            _ => false,
        }
    }

    fn next_strippable(&self, preserve: &ArtifactSet) -> Option<ElementId> {
        (0..self.index().elements().len())
            .find(|&id| self.element(id).tracked && !self.is_preserved(id, preserve))
    }

    fn next_user_exclusion(&self, preserve: &ArtifactSet) -> Option<ElementId> {
        (0..self.index().elements().len()).find(|&id| {
            let element = self.element(id);
            element.name == "exclusion"
                && !element.tracked
                && self
                    .parent_named(id, "exclusions")
                    .and_then(|exclusions| self.parent_named(exclusions, "dependency"))
                    .is_some()
                && !self.is_preserved(id, preserve)
        })
    }

    fn next_empty_exclusions(&self) -> Option<ElementId> {
        (0..self.index().elements().len()).find(|&id| {
            let element = self.element(id);
            element.name == "exclusions"
                && element.children.is_empty()
                && self.parent_named(id, "dependency").is_some()
        })
    }

    /// Version forced by a tool-owned element, keyed by property name
    fn forced_version(&self, id: ElementId) -> Option<(String, Version)> {
        let element = self.element(id);
        let (property, version) = if element.name.ends_with(".version") {
            (element.name.clone(), self.text(id)?)
        } else if element.name == "version" {
            let dependency = self.parent_named(id, "dependency")?;
            (
                VersionOverrides::property_key(&self.coordinates(dependency)?),
                self.text(id)?,
            )
        } else if element.name == "dependency" {
            (
                VersionOverrides::property_key(&self.coordinates(id)?),
                self.child_text(id, "version")?,
            )
        } else {
            return None;
        };

        if version.is_empty() || property_name(&version).is_some() {
            return None;
        }
        Some((property, Version::new(version)))
    }

    // Editing helpers

    /// Store `version` in `<properties>` when that section exists; returns
    /// the text to use in `<version>`
    fn store_version(&mut self, artifact: &ArtifactId, version: &Version) -> Result<String, PomError> {
        if version.is_property_reference() {
            return Ok(version.to_string());
        }
        let Some(properties) = self.find_path(&["properties"]) else {
            return Ok(version.to_string());
        };

        let property = VersionOverrides::property_key(artifact);
        match self.child(properties, &property) {
            Some(existing) => self.set_text(existing, version.as_str())?,
            None => {
                self.append_child(
                    properties,
                    &Fragment::text(property.as_str(), version.as_str()).tracked(),
                )?;
                self.ensure_namespace()?;
            }
        }
        Ok(format!("${{{property}}}"))
    }

    /// Remove regions bracketed by legacy comments, recording the
    /// `*.version` properties inside them
    fn strip_legacy_regions(&mut self, overrides: &mut VersionOverrides) -> Result<usize, PomError> {
        let mut regions = 0;
        loop {
            let markers: Vec<(usize, usize, bool)> = self
                .index()
                .comments()
                .iter()
                .filter_map(|comment| match comment.text.as_str() {
                    LEGACY_START_COMMENT => Some((comment.start, comment.end, true)),
                    LEGACY_END_COMMENT => Some((comment.start, comment.end, false)),
                    _ => None,
                })
                .collect();

            let Some(&(start, _, opens)) = markers.first() else {
                break;
            };
            let end = match markers.get(1) {
                Some(&(_, end, false)) if opens => end,
                _ => {
                    return Err(PomError::Malformed {
                        path: self.path().to_path_buf(),
                        reason: format!(
                            "unbalanced <!-- {LEGACY_START_COMMENT} --> / <!-- {LEGACY_END_COMMENT} --> comments"
                        ),
                    });
                }
            };

            for (id, element) in self.index().elements().iter().enumerate() {
                if element.start > start && element.end < end && element.name.ends_with(".version") {
                    if let Some(version) = self.text(id).filter(|v| !v.is_empty()) {
                        overrides.insert(element.name.clone(), Version::new(version));
                    }
                }
            }

            self.remove_span(start, end)?;
            regions += 1;
        }
        Ok(regions)
    }

    fn root_open_tag(&self) -> Range<usize> {
        let root = self.element(self.root());
        root.start..root.open_end
    }

    fn ensure_namespace(&mut self) -> Result<(), PomError> {
        if NAMESPACE_REGEX.is_match(&self.as_str()[self.root_open_tag()]) {
            return Ok(());
        }
        let root = self.root();
        self.add_attribute(root, NAMESPACE_ATTRIBUTE, NAMESPACE_URI)
    }

    fn remove_namespace(&mut self) -> Result<(), PomError> {
        let tag = self.root_open_tag();
        let Some(found) = NAMESPACE_REGEX.find(&self.as_str()[tag.clone()]) else {
            return Ok(());
        };
        self.splice(tag.start + found.start()..tag.start + found.end(), "")
    }
}

/// Exclusion coordinate match; `*` matches anything
fn matches_pattern(pattern: Option<&str>, value: &str) -> bool {
    matches!(pattern, Some(pattern) if pattern == "*" || pattern == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POM: &str = r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.example</groupId>
  <artifactId>app</artifactId>
  <dependencies>
    <dependency>
      <groupId>com.fasterxml.jackson.core</groupId>
      <artifactId>jackson-databind</artifactId>
      <version>2.9.0</version>
      <scope>test</scope>
    </dependency>
    <dependency>
      <groupId>com.codingrodent</groupId>
      <artifactId>jackson-json-crypto</artifactId>
      <version>1.1.0</version>
    </dependency>
  </dependencies>
</project>
"#;

    fn doc(source: &str) -> PomDocument {
        PomDocument::from_source("pom.xml", source).unwrap()
    }

    fn id(coordinates: &str) -> ArtifactId {
        coordinates.parse().unwrap()
    }

    #[test]
    fn test_update_explicit_rewrites_version_and_drops_scope() {
        let mut pom = doc(POM);
        let found = pom
            .update_explicit(
                &id("com.fasterxml.jackson.core:jackson-databind"),
                &Version::new("2.9.10"),
                None,
                Some("jar"),
                None,
            )
            .unwrap();

        assert!(found);
        assert!(pom.as_str().contains("<version>2.9.10</version>"));
        assert!(!pom.as_str().contains("<scope>test</scope>"));
        // type is only rewritten when present
        assert!(!pom.as_str().contains("<type>"));
    }

    #[test]
    fn test_update_explicit_missing_declaration() {
        let mut pom = doc(POM);
        let found = pom
            .update_explicit(&id("org.slf4j:slf4j-api"), &Version::new("1.7.30"), None, None, None)
            .unwrap();
        assert!(!found);
        assert!(!pom.is_dirty());
    }

    #[test]
    fn test_update_explicit_through_property() {
        let mut pom = doc(
            "<project>\n  <properties>\n    <slf4j.version>1.7.21</slf4j.version>\n  </properties>\n  <dependencies>\n    <dependency>\n      <groupId>org.slf4j</groupId>\n      <artifactId>slf4j-api</artifactId>\n      <version>${slf4j.version}</version>\n    </dependency>\n  </dependencies>\n</project>\n",
        );
        pom.update_explicit(&id("org.slf4j:slf4j-api"), &Version::new("1.7.30"), None, None, None)
            .unwrap();
        assert!(pom.as_str().contains("<slf4j.version>1.7.30</slf4j.version>"));
        assert!(pom.as_str().contains("<version>${slf4j.version}</version>"));
    }

    #[test]
    fn test_update_explicit_undefined_property() {
        let mut pom = doc(
            "<project>\n  <dependencies>\n    <dependency>\n      <groupId>org.slf4j</groupId>\n      <artifactId>slf4j-api</artifactId>\n      <version>${slf4j.version}</version>\n    </dependency>\n  </dependencies>\n</project>\n",
        );
        let err = pom
            .update_explicit(&id("org.slf4j:slf4j-api"), &Version::new("1.7.30"), None, None, None)
            .unwrap_err();
        assert!(matches!(err, PomError::MissingProperty { name, .. } if name == "slf4j.version"));
    }

    #[test]
    fn test_add_exclusion_is_idempotent() {
        let mut pom = doc(POM);
        let declaring = id("com.codingrodent:jackson-json-crypto");
        let excluded = id("org.jboss.logging:jboss-logging");

        assert!(pom.add_exclusion(&declaring, &excluded).unwrap());
        let once = pom.as_str().to_string();
        assert!(pom.add_exclusion(&declaring, &excluded).unwrap());
        assert_eq!(pom.as_str(), once);

        assert!(once.contains(
            "      <version>1.1.0</version>\n      <exclusions angel:tracking=\"managed\">\n        <exclusion angel:tracking=\"managed\">\n          <groupId>org.jboss.logging</groupId>\n          <artifactId>jboss-logging</artifactId>\n        </exclusion>\n      </exclusions>\n    </dependency>"
        ));
        assert!(once.starts_with(
            "<project xmlns=\"http://maven.apache.org/POM/4.0.0\" xmlns:angel=\"http://unhuman.com/angel\">"
        ));
    }

    #[test]
    fn test_add_exclusion_respects_wildcard() {
        let mut pom = doc(
            "<project>\n  <dependencies>\n    <dependency>\n      <groupId>a</groupId>\n      <artifactId>b</artifactId>\n      <exclusions>\n        <exclusion>\n          <groupId>*</groupId>\n          <artifactId>*</artifactId>\n        </exclusion>\n      </exclusions>\n    </dependency>\n  </dependencies>\n</project>\n",
        );
        assert!(pom.add_exclusion(&id("a:b"), &id("c:d")).unwrap());
        assert!(!pom.is_dirty());
    }

    #[test]
    fn test_add_exclusion_unknown_declaring() {
        let mut pom = doc(POM);
        assert!(!pom.add_exclusion(&id("x:y"), &id("c:d")).unwrap());
    }

    #[test]
    fn test_forced_dependency_uses_properties() {
        let mut pom = doc(
            "<project>\n  <properties>\n    <java.version>17</java.version>\n  </properties>\n  <dependencies>\n  </dependencies>\n</project>\n",
        );
        let artifact = id("org.slf4j:slf4j-api");
        pom.add_forced_dependency(&artifact, &Version::new("1.7.30"), Some(&Scope::Compile), Some("jar"), None)
            .unwrap();

        assert_eq!(
            pom.as_str(),
            "<project xmlns:angel=\"http://unhuman.com/angel\">\n  <properties>\n    <java.version>17</java.version>\n    <org.slf4j-slf4j-api.version angel:tracking=\"managed\">1.7.30</org.slf4j-slf4j-api.version>\n  </properties>\n  <dependencies>\n    <dependency angel:tracking=\"managed\">\n      <groupId>org.slf4j</groupId>\n      <artifactId>slf4j-api</artifactId>\n      <type>jar</type>\n      <version>${org.slf4j-slf4j-api.version}</version>\n      <scope>compile</scope>\n    </dependency>\n  </dependencies>\n</project>\n"
        );

        let once = pom.as_str().to_string();
        pom.add_forced_dependency(&artifact, &Version::new("1.7.30"), Some(&Scope::Compile), Some("jar"), None)
            .unwrap();
        assert_eq!(pom.as_str(), once);
    }

    #[test]
    fn test_forced_dependency_creates_dependencies_section() {
        let mut pom = doc("<project>\n  <artifactId>app</artifactId>\n</project>\n");
        pom.add_forced_dependency(&id("a:b"), &Version::new("1.0"), None, None, None)
            .unwrap();
        assert!(pom.as_str().contains(
            "  <dependencies angel:tracking=\"managed\">\n    <dependency angel:tracking=\"managed\">\n      <groupId>a</groupId>\n      <artifactId>b</artifactId>\n      <version>1.0</version>\n    </dependency>\n  </dependencies>\n</project>"
        ));
    }

    #[test]
    fn test_forced_dependency_pins_versionless_declaration() {
        let mut pom = doc(
            "<project>\n  <dependencies>\n    <dependency>\n      <groupId>a</groupId>\n      <artifactId>b</artifactId>\n    </dependency>\n  </dependencies>\n</project>\n",
        );
        pom.add_forced_dependency(&id("a:b"), &Version::new("2.0"), None, None, None)
            .unwrap();
        assert!(pom.as_str().contains(
            "      <artifactId>b</artifactId>\n      <version angel:tracking=\"managed\">2.0</version>\n    </dependency>"
        ));
        assert_eq!(pom.as_str().matches("<dependency>").count(), 1);
    }

    #[test]
    fn test_forced_dependency_repins_tracked_declaration() {
        let mut pom = doc("<project>\n  <artifactId>app</artifactId>\n</project>\n");
        pom.add_forced_dependency(&id("a:b"), &Version::new("1.0"), None, None, None)
            .unwrap();
        pom.add_forced_dependency(&id("a:b"), &Version::new("1.1"), None, None, None)
            .unwrap();
        assert!(pom.as_str().contains("<version>1.1</version>"));
        assert_eq!(pom.as_str().matches("<dependency ").count(), 1);
    }

    #[test]
    fn test_forced_dependency_targets_dependency_management() {
        let mut pom = doc(POM);
        assert!(pom.ensure_dependency_management().unwrap());
        assert!(!pom.ensure_dependency_management().unwrap());
        assert!(pom.has_dependency_management());

        pom.add_forced_dependency(&id("a:b"), &Version::new("1.0"), None, None, None)
            .unwrap();
        assert!(pom.as_str().contains(
            "  <dependencyManagement angel:tracking=\"managed\">\n    <dependencies>\n      <dependency angel:tracking=\"managed\">"
        ));
    }

    #[test]
    fn test_strip_restores_original() {
        let mut pom = doc(POM);
        pom.ensure_dependency_management().unwrap();
        pom.add_forced_dependency(&id("org.jboss.logging:jboss-logging"), &Version::new("3.3.0.Final"), None, None, None)
            .unwrap();
        pom.add_exclusion(&id("com.codingrodent:jackson-json-crypto"), &id("org.jboss.logging:jboss-logging"))
            .unwrap();

        let outcome = pom.strip(&ArtifactSet::new()).unwrap();
        assert_eq!(pom.as_str(), POM);
        assert_eq!(outcome.removed, 2);
        assert_eq!(
            outcome.overrides.get(&id("org.jboss.logging:jboss-logging")),
            Some(&Version::new("3.3.0.Final"))
        );
    }

    #[test]
    fn test_strip_keeps_preserved_exclusions() {
        let mut pom = doc(POM);
        let declaring = id("com.codingrodent:jackson-json-crypto");
        pom.add_exclusion(&declaring, &id("log4j:log4j")).unwrap();
        pom.add_exclusion(&declaring, &id("org.jboss.logging:jboss-logging")).unwrap();

        let preserve: ArtifactSet = [id("log4j:log4j")].into_iter().collect();
        pom.strip(&preserve).unwrap();

        assert!(pom.as_str().contains("<artifactId>log4j</artifactId>"));
        assert!(!pom.as_str().contains("jboss-logging"));
        assert!(pom.as_str().contains("xmlns:angel"));
    }

    #[test]
    fn test_strip_never_touches_user_content() {
        let mut pom = doc(POM);
        let outcome = pom.strip(&ArtifactSet::new()).unwrap();
        assert_eq!(outcome.removed, 0);
        assert!(!pom.is_dirty());
    }

    #[test]
    fn test_strip_legacy_region() {
        let source = "<project>\n  <properties>\n    <!-- DependencyAngel Start -->\n    <a-b.version>1.2.3</a-b.version>\n    <!-- DependencyAngel End -->\n  </properties>\n</project>\n";
        let mut pom = doc(source);
        let outcome = pom.strip(&ArtifactSet::new()).unwrap();

        assert_eq!(pom.as_str(), "<project>\n  <properties>\n  </properties>\n</project>\n");
        assert_eq!(outcome.removed, 1);
        assert_eq!(outcome.overrides.get(&id("a:b")), Some(&Version::new("1.2.3")));
    }

    #[test]
    fn test_strip_unbalanced_legacy_region() {
        let mut pom = doc("<project>\n  <!-- DependencyAngel Start -->\n</project>\n");
        assert!(matches!(
            pom.strip(&ArtifactSet::new()),
            Err(PomError::Malformed { .. })
        ));

        let mut pom = doc("<project>\n  <!-- DependencyAngel End -->\n</project>\n");
        assert!(pom.strip(&ArtifactSet::new()).is_err());
    }

    #[test]
    fn test_strip_untagged_exclusions() {
        let source = "<project>\n  <dependencies>\n    <dependency>\n      <groupId>a</groupId>\n      <artifactId>b</artifactId>\n      <exclusions>\n        <exclusion>\n          <groupId>c</groupId>\n          <artifactId>d</artifactId>\n        </exclusion>\n      </exclusions>\n    </dependency>\n    <dependency>\n      <groupId>e</groupId>\n      <artifactId>f</artifactId>\n      <exclusions>\n        <exclusion>\n          <groupId>g</groupId>\n          <artifactId>h</artifactId>\n        </exclusion>\n        <exclusion>\n          <groupId>c</groupId>\n          <artifactId>d</artifactId>\n        </exclusion>\n      </exclusions>\n    </dependency>\n  </dependencies>\n</project>\n";
        let mut pom = doc(source);
        let preserve: ArtifactSet = [id("g:h")].into_iter().collect();

        assert_eq!(pom.strip_untagged_exclusions(&preserve).unwrap(), 2);
        assert!(pom.as_str().contains(
            "      <artifactId>b</artifactId>\n    </dependency>"
        ));
        assert!(pom.as_str().contains("<groupId>g</groupId>"));
        assert!(!pom.as_str().contains("<groupId>c</groupId>"));
    }

    #[test]
    fn test_declares() {
        let pom = doc(POM);
        assert!(pom.declares(&id("com.codingrodent:jackson-json-crypto")));
        assert!(!pom.declares(&id("org.jboss.logging:jboss-logging")));
    }
}
