//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigError, ConfigOverrides, parse_env};
use crate::resolve::CircularPolicy;

#[derive(Parser, Debug, Clone)]
#[command(name = "dependency-angel")]
#[command(about = "Resolve Maven dependency convergence conflicts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project directory containing the root pom.xml
    pub directory: PathBuf,

    /// Banned dependencies; their exclusions are always kept
    #[arg(short, long, value_delimiter = ',', value_name = "GROUP:ARTIFACT")]
    pub banned: Vec<String>,

    /// Exclusions to keep when cleaning
    #[arg(short, long, value_delimiter = ',', value_name = "GROUP:ARTIFACT")]
    pub preserve_exclusions: Vec<String>,

    /// Artifacts whose versions are not semantic
    #[arg(short = 'N', long, value_delimiter = ',', value_name = "GROUP:ARTIFACT")]
    pub non_semantic: Vec<String>,

    /// Extra environment for Maven
    #[arg(short, long, value_delimiter = ',', value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Only remove previously added entries
    #[arg(short, long)]
    pub clean_only: bool,

    /// Keep previously added entries
    #[arg(short, long, conflicts_with = "clean_only")]
    pub no_clean: bool,

    /// Also remove user-written exclusions when cleaning
    #[arg(long)]
    pub strip_user_exclusions: bool,

    /// Pin versions in a dependencyManagement section of the root pom.xml
    #[arg(long)]
    pub manage_dependencies: bool,

    /// What to do with circular dependency paths
    #[arg(long, value_enum)]
    pub circular: Option<CircularPolicy>,

    /// Give up after this many edit batches
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Show Maven output
    #[arg(short, long)]
    pub display_output: bool,

    /// Do not ask before modifying files
    #[arg(short, long)]
    pub skip_prompts: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn overrides(&self) -> Result<ConfigOverrides, ConfigError> {
        Ok(ConfigOverrides {
            banned: self.banned.clone(),
            preserve_exclusions: self.preserve_exclusions.clone(),
            non_semantic: self.non_semantic.clone(),
            env: parse_env(&self.env)?,
            circular_policy: self.circular,
            max_iterations: self.max_iterations,
        })
    }
}
