//! Maven command executor
//!
//! Handles running Maven and capturing its output.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};

use super::MavenError;
use super::constants::{self, errors, flags, goals};
use super::parser::Parser;
use crate::convergence::{ConvergenceError, DiagnosticSource};

/// Captured output of one Maven run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenOutput {
    pub exit_code: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

/// Executor for Maven commands
#[derive(Debug, Clone)]
pub struct MavenExecutor {
    /// Directory Maven runs in (holds the root pom.xml)
    project_dir: PathBuf,

    /// Program to launch plus any arguments placed before ours
    program: String,
    program_args: Vec<String>,

    /// Goals run to obtain a convergence report
    goals: Vec<String>,

    /// Extra environment for the Maven process
    env: BTreeMap<String, String>,

    /// Echo Maven's output through the log
    display_output: bool,
}

impl MavenExecutor {
    /// Create an executor running `mvn dependency:analyze` in `project_dir`
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            program: constants::MVN_COMMAND.to_string(),
            program_args: Vec::new(),
            goals: vec![goals::ANALYZE.to_string()],
            env: BTreeMap::new(),
            display_output: false,
        }
    }

    /// Replace the launched program (e.g. a wrapper script)
    pub fn with_command(mut self, program: impl Into<String>, args: Vec<String>) -> Self {
        self.program = program.into();
        self.program_args = args;
        self
    }

    pub fn with_goals(mut self, goals: Vec<String>) -> Self {
        if !goals.is_empty() {
            self.goals = goals;
        }
        self
    }

    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn with_display_output(mut self, display_output: bool) -> Self {
        self.display_output = display_output;
        self
    }

    /// Run Maven with the given arguments
    ///
    /// Automatically adds `--batch-mode` to ensure parseable output. A
    /// non-zero exit is still a success when stdout carries a convergence
    /// report, since the enforcer fails the build exactly when it prints
    /// one.
    pub fn run(&self, args: &[String]) -> Result<MavenOutput, MavenError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.program_args)
            .arg(flags::BATCH_MODE)
            .args(args)
            .current_dir(&self.project_dir)
            .envs(&self.env);

        debug!(program = %self.program, ?args, dir = %self.project_dir.display(), "Running maven");

        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MavenError::MavenNotFound
            } else {
                MavenError::IoError(e)
            }
        })?;

        let stdout = split_lines(&output.stdout);
        let stderr = split_lines(&output.stderr);
        let exit_code = output.status.code().unwrap_or(-1);

        for line in &stdout {
            if self.display_output {
                info!(target: "mvn", "{line}");
            } else {
                debug!(target: "mvn", "{line}");
            }
        }
        for line in &stderr {
            debug!(target: "mvn", stream = "stderr", "{line}");
        }

        let has_report = stdout.iter().any(|line| Parser::is_convergence_header(line));
        if has_report {
            debug!("Found convergence report in maven output");
        }

        if output.status.success() || has_report {
            Ok(MavenOutput {
                exit_code,
                stdout,
                stderr,
            })
        } else {
            Err(MavenError::CommandFailed {
                message: failure_message(&stdout, &stderr),
                exit_code,
            })
        }
    }

    /// Run the configured goals
    pub fn analyze(&self) -> Result<MavenOutput, MavenError> {
        self.run(&self.goals)
    }
}

impl DiagnosticSource for MavenExecutor {
    fn diagnostics(&mut self) -> Result<Vec<String>, ConvergenceError> {
        Ok(self.analyze()?.stdout)
    }
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Maven reports errors on stdout; fall back to those when stderr is empty
fn failure_message(stdout: &[String], stderr: &[String]) -> String {
    if stderr.iter().any(|line| !line.trim().is_empty()) {
        return stderr.join("\n");
    }
    stdout
        .iter()
        .filter(|line| line.starts_with(errors::ERROR_PREFIX))
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}
