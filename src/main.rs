//! Dependency Angel
//!
//! Binary entry point.

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use angel::app::{App, Outcome};
use angel::cli::Cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match App::new(cli).run()? {
        Outcome::Declined => {}
        Outcome::Cleaned { removed } => info!("Removed {removed} entries"),
        Outcome::Converged(report) => info!(
            "Dependencies converged after {} iterations ({} edits applied)",
            report.iterations, report.decisions_applied
        ),
    }
    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
