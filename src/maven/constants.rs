//! Maven-specific constants
//!
//! Centralized definitions for the Maven binary, flags, and goals.

/// Maven command binary name
#[cfg(not(windows))]
pub const MVN_COMMAND: &str = "mvn";

/// Maven command binary name
#[cfg(windows)]
pub const MVN_COMMAND: &str = "mvn.cmd";

/// Maven goals
pub mod goals {
    /// Default goal run to obtain a convergence report
    pub const ANALYZE: &str = "dependency:analyze";
}

/// Maven command flags
pub mod flags {
    /// Non-interactive, uncoloured output for parsing
    pub const BATCH_MODE: &str = "--batch-mode";
}

/// Manifest file names
pub mod files {
    pub const POM: &str = "pom.xml";

    /// Per-project settings file
    pub const CONFIG: &str = ".angel.toml";
}

/// Error detection patterns in Maven output
pub mod errors {
    /// Prefix Maven puts on error lines (printed on stdout)
    pub const ERROR_PREFIX: &str = "[ERROR]";
}
