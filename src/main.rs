use anyhow::{Context, Result};
use clap::Parser;
use featcmp::cli::Cli;
use featcmp::config::Config;
use featcmp::logging::setup_logging;
use log::warn;

/// Exit status when `--deny-drift` is set and drift was found
const DRIFT_EXIT_CODE: i32 = 2;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    setup_logging(config.log_level).context("failed to initialize logging")?;

    let report = featcmp::generate(&config).with_context(|| {
        format!(
            "feature comparison against {} failed",
            config.systemd_repo.display()
        )
    })?;

    if config.deny_drift && report.has_drift() {
        warn!(
            "{} drift diagnostics, failing because of --deny-drift",
            report.diagnostics.len()
        );
        std::process::exit(DRIFT_EXIT_CODE);
    }

    Ok(())
}
