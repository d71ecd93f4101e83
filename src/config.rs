//! Project configuration (`.angel.toml`)
//!
//! Stored next to the root `pom.xml` so a project remembers which artifacts
//! are banned, which exclusions it keeps and which artifacts use
//! non-semantic versions. Command-line values are merged on top and the
//! result written back.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::maven::constants::goals;
use crate::model::{ArtifactId, ArtifactSet};
use crate::resolve::CircularPolicy;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("{}: {message}", .path.as_deref().map_or_else(|| "config".into(), |p| p.display().to_string()))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },

    #[error("Invalid {field} entry '{value}': expected groupId:artifactId")]
    InvalidArtifact { field: &'static str, value: String },

    #[error("Invalid environment entry '{0}': expected KEY=VALUE")]
    InvalidEnv(String),
}

/// On-disk configuration; a missing file means all defaults
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AngelConfig {
    /// Artifacts that must never come back; their exclusions always survive
    pub banned: Vec<String>,

    /// Exclusions to keep across clean cycles
    pub preserve_exclusions: Vec<String>,

    /// Artifacts whose versions are compared without semantic rules
    pub non_semantic: Vec<String>,

    /// Maven arguments producing the convergence report
    pub goals: Vec<String>,

    pub circular_policy: CircularPolicy,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,

    /// Extra environment for Maven
    pub env: BTreeMap<String, String>,
}

impl Default for AngelConfig {
    fn default() -> Self {
        Self {
            banned: Vec::new(),
            preserve_exclusions: Vec::new(),
            non_semantic: Vec::new(),
            goals: vec![goals::ANALYZE.to_string()],
            circular_policy: CircularPolicy::default(),
            max_iterations: None,
            env: BTreeMap::new(),
        }
    }
}

/// Values given on the command line
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub banned: Vec<String>,
    pub preserve_exclusions: Vec<String>,
    pub non_semantic: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub circular_policy: Option<CircularPolicy>,
    pub max_iterations: Option<usize>,
}

/// Validated configuration used by a run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub banned: ArtifactSet,
    pub preserve_exclusions: ArtifactSet,
    pub non_semantic: ArtifactSet,
    pub goals: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub circular_policy: CircularPolicy,
    pub max_iterations: Option<usize>,
}

impl Settings {
    /// Exclusions that survive stripping: banned plus explicitly preserved
    pub fn preserved(&self) -> ArtifactSet {
        let mut preserved = self.banned.clone();
        preserved.extend(&self.preserve_exclusions);
        preserved
    }
}

impl AngelConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&contents).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| {
            let mut message = e.message().to_owned();
            if let Some(span) = e.span() {
                let line = toml_str[..span.start].matches('\n').count() + 1;
                message = format!("line {line}: {message}");
            }
            ConfigError::Parse {
                path: None,
                message,
            }
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |message: String| ConfigError::Write {
            path: path.to_path_buf(),
            message,
        };
        let contents = toml::to_string_pretty(self).map_err(|e| write_error(e.to_string()))?;
        fs::write(path, contents).map_err(|e| write_error(e.to_string()))
    }

    /// Layer command-line values on top; artifact lists are unioned
    pub fn merge(&mut self, overrides: ConfigOverrides) {
        union_into(&mut self.banned, overrides.banned);
        union_into(&mut self.preserve_exclusions, overrides.preserve_exclusions);
        union_into(&mut self.non_semantic, overrides.non_semantic);
        self.env.extend(overrides.env);
        if let Some(policy) = overrides.circular_policy {
            self.circular_policy = policy;
        }
        if overrides.max_iterations.is_some() {
            self.max_iterations = overrides.max_iterations;
        }
    }

    pub fn validate(&self) -> Result<Settings, ConfigError> {
        Ok(Settings {
            banned: artifact_set("banned", &self.banned)?,
            preserve_exclusions: artifact_set("preserve_exclusions", &self.preserve_exclusions)?,
            non_semantic: artifact_set("non_semantic", &self.non_semantic)?,
            goals: self.goals.clone(),
            env: self.env.clone(),
            circular_policy: self.circular_policy,
            max_iterations: self.max_iterations,
        })
    }
}

fn union_into(target: &mut Vec<String>, extra: Vec<String>) {
    for value in extra {
        let value = value.trim().to_string();
        if !value.is_empty() && !target.contains(&value) {
            target.push(value);
        }
    }
}

fn artifact_set(field: &'static str, values: &[String]) -> Result<ArtifactSet, ConfigError> {
    values
        .iter()
        .map(|value| {
            value
                .parse::<ArtifactId>()
                .map_err(|_| ConfigError::InvalidArtifact {
                    field,
                    value: value.clone(),
                })
        })
        .collect()
}

/// Parse `KEY=VALUE` entries
pub fn parse_env<I, S>(entries: I) -> Result<BTreeMap<String, String>, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .filter(|entry| !entry.as_ref().trim().is_empty())
        .map(|entry| {
            let entry = entry.as_ref();
            match entry.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    Ok((key.trim().to_string(), value.to_string()))
                }
                _ => Err(ConfigError::InvalidEnv(entry.to_string())),
            }
        })
        .collect()
}
