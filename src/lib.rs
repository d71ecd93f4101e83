//! Dependency Angel - Maven dependency convergence resolver
//!
//! Reads the dependency-convergence report Maven prints, decides which
//! version of each conflicting artifact to pin and which transitive edges to
//! exclude, and edits `pom.xml` files until the report is clean.
//!
//! This library provides:
//! - [`app`]: The clean / confirm / converge workflow
//! - [`cli`]: Command-line definition
//! - [`config`]: Per-project settings
//! - [`convergence`]: The iteration loop
//! - [`maven`]: Maven execution and report parsing
//! - [`model`]: Artifacts, versions and conflict trees
//! - [`pom`]: Span-preserving `pom.xml` editing
//! - [`resolve`]: Turning conflicts into edits

pub mod app;
pub mod cli;
pub mod config;
pub mod convergence;
pub mod error;
pub mod maven;
pub mod model;
pub mod pom;
pub mod resolve;
