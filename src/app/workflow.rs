//! A full run: load settings, clean, confirm, converge

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::confirm::{AutoConfirm, Confirm, PromptConfirm};
use super::sink::PomSink;
use crate::cli::Cli;
use crate::config::{AngelConfig, Settings};
use crate::convergence::{ConvergenceController, ConvergenceReport, DiagnosticSource};
use crate::error::AngelError;
use crate::maven::MavenExecutor;
use crate::maven::constants::files;
use crate::model::VersionPolicy;
use crate::pom::{PomDocument, find_module_manifests};
use crate::resolve::{ModuleRegistry, ResolutionAggregator, VersionOverrides};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user declined the confirmation prompt
    Declined,
    /// Only cleaning was requested
    Cleaned { removed: usize },
    Converged(ConvergenceReport),
}

pub struct App {
    cli: Cli,
}

impl App {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run against the real `mvn`, prompting on stdin unless told not to
    pub fn run(&self) -> Result<Outcome, AngelError> {
        let settings = self.load_settings()?;
        let mut executor = MavenExecutor::new(&self.cli.directory)
            .with_goals(settings.goals.clone())
            .with_env(settings.env.clone())
            .with_display_output(self.cli.display_output);

        let mut confirm: Box<dyn Confirm> = if self.cli.skip_prompts {
            Box::new(AutoConfirm)
        } else {
            Box::new(PromptConfirm::stdio())
        };
        self.run_with(&settings, confirm.as_mut(), &mut executor)
    }

    /// Validate the project and merge command-line values into its config.
    /// Nothing is written until a run is confirmed.
    pub fn load_settings(&self) -> Result<Settings, AngelError> {
        self.root_manifest()?;
        let (_, config) = self.merged_config()?;
        Ok(config.validate()?)
    }

    /// Write command-line values back to the project config when they add
    /// anything to it
    fn save_settings(&self) -> Result<(), AngelError> {
        let (stored, config) = self.merged_config()?;
        if config != stored {
            let path = self.cli.directory.join(files::CONFIG);
            config.save(&path)?;
            info!("Saved settings to {}", path.display());
        }
        Ok(())
    }

    fn merged_config(&self) -> Result<(AngelConfig, AngelConfig), AngelError> {
        let stored = AngelConfig::load(&self.cli.directory.join(files::CONFIG))?;
        let mut config = stored.clone();
        config.merge(self.cli.overrides()?);
        Ok((stored, config))
    }

    pub fn run_with<C, S>(
        &self,
        settings: &Settings,
        confirm: &mut C,
        source: &mut S,
    ) -> Result<Outcome, AngelError>
    where
        C: Confirm + ?Sized,
        S: DiagnosticSource + ?Sized,
    {
        let root = self.root_manifest()?;
        let modules = find_module_manifests(&self.cli.directory)?;
        let registry = ModuleRegistry::from_manifests(std::iter::once(&root).chain(&modules))?;
        info!(
            "Found {} manifests under {}",
            registry.len(),
            self.cli.directory.display()
        );

        let prompt = format!(
            "This will modify pom.xml files under {}. Continue?",
            self.cli.directory.display()
        );
        if !confirm.confirm(&prompt).map_err(AngelError::Prompt)? {
            info!("Aborted, nothing changed");
            return Ok(Outcome::Declined);
        }
        self.save_settings()?;

        let preserved = settings.preserved();
        let mut overrides = VersionOverrides::new();
        let mut removed = 0;
        if !self.cli.no_clean {
            for manifest in std::iter::once(&root).chain(&modules) {
                let mut document = PomDocument::load(manifest)?;
                let outcome = document.strip(&preserved)?;
                removed += outcome.removed;
                overrides.extend(outcome.overrides);
                if self.cli.strip_user_exclusions {
                    removed += document.strip_untagged_exclusions(&preserved)?;
                }
                document.save()?;
            }
            info!("pom.xml files cleaned");
        }

        if self.cli.clean_only {
            return Ok(Outcome::Cleaned { removed });
        }

        if self.cli.manage_dependencies {
            let mut document = PomDocument::load(&root)?;
            document.ensure_dependency_management()?;
            document.save()?;
        }

        let policy = VersionPolicy::new(settings.non_semantic.clone());
        let aggregator =
            ResolutionAggregator::new(&policy, &registry, &overrides, settings.circular_policy);
        let controller =
            ConvergenceController::new(aggregator).with_max_iterations(settings.max_iterations);
        let mut sink = PomSink::new(&root, modules);

        let report = controller.run(source, &mut sink)?;
        for cycle in &report.circular {
            warn!("Skipped circular path: {cycle}");
        }
        Ok(Outcome::Converged(report))
    }

    fn root_manifest(&self) -> Result<PathBuf, AngelError> {
        let directory: &Path = &self.cli.directory;
        if !directory.is_dir() {
            return Err(AngelError::NotADirectory(directory.to_path_buf()));
        }
        let manifest = directory.join(files::POM);
        if !manifest.is_file() {
            return Err(AngelError::MissingManifest(directory.to_path_buf()));
        }
        Ok(manifest)
    }
}
