//! Common test utilities for integration tests.
//!
//! Provides a temporary Maven project on disk and a scripted stand-in for
//! the Maven convergence report.
//!
//! Note: Each integration test file compiles as a separate crate,
//! so not all helpers are used in every test file. We suppress
//! dead_code warnings at the module level.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use angel::convergence::{ConvergenceError, DiagnosticSource};

/// Single-module project whose root depends on logback and kafka, both of
/// which pull in different slf4j versions
pub const APP_POM: &str = r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.example</groupId>
  <artifactId>app</artifactId>
  <version>1.0.0</version>
  <properties>
    <java.version>17</java.version>
  </properties>
  <dependencies>
    <dependency>
      <groupId>ch.qos.logback</groupId>
      <artifactId>logback-classic</artifactId>
      <version>1.2.3</version>
    </dependency>
    <dependency>
      <groupId>org.apache.kafka</groupId>
      <artifactId>kafka-clients</artifactId>
      <version>2.0.0</version>
    </dependency>
  </dependencies>
</project>
"#;

/// Enforcer report for [`APP_POM`]
pub const SLF4J_REPORT: &str = "\
[WARNING]
Dependency convergence error for org.slf4j:slf4j-api:jar:1.7.25:compile paths to dependency are:
+-com.example:app:jar:1.0.0
  +-ch.qos.logback:logback-classic:jar:1.2.3:compile
    +-org.slf4j:slf4j-api:jar:1.7.25:compile
and
+-com.example:app:jar:1.0.0
  +-org.apache.kafka:kafka-clients:jar:2.0.0:compile
    +-org.slf4j:slf4j-api:jar:1.7.30:compile

";

/// A temporary Maven project directory
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// A project whose root manifest is `pom`
    pub fn with_root(pom: &str) -> Self {
        let project = Self::new();
        project.write("pom.xml", pom);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write a file, creating parent directories
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create directory");
        }
        fs::write(&path, contents).expect("Failed to write file");
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.join(relative)).expect("Failed to read file")
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.join(relative).exists()
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Replays canned convergence reports, then reports a clean build
pub struct ScriptedReports {
    reports: VecDeque<String>,
    pub calls: usize,
}

impl ScriptedReports {
    pub fn new(reports: &[&str]) -> Self {
        Self {
            reports: reports.iter().map(|r| r.to_string()).collect(),
            calls: 0,
        }
    }
}

impl DiagnosticSource for ScriptedReports {
    fn diagnostics(&mut self) -> Result<Vec<String>, ConvergenceError> {
        self.calls += 1;
        Ok(self
            .reports
            .pop_front()
            .map(|report| report.lines().map(str::to_string).collect())
            .unwrap_or_default())
    }
}
