//! scour - Parallel Secure-Delete Tool
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use scour::config::{CliArgs, RunConfig};
use scour::progress::{print_header, print_summary};
use scour::sweep::SweepCoordinator;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Exit status after a normal run. Completion is reported as an alert so
/// wrapping scripts never mistake a destructive run for a no-op;
/// --exit-zero opts into conventional exit semantics.
const ALERT_EXIT_STATUS: u8 = 1;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = RunConfig::from_args(args).context("Invalid configuration")?;

    // Create coordinator; this performs the one-time eraser check and fails
    // before any file is touched when the utility is missing
    let coordinator = SweepCoordinator::new(config.clone())
        .context("Failed to initialize secure-delete run")?;

    // Setup signal handler for graceful shutdown
    let shutdown_flag = coordinator.shutdown_flag();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, finishing current targets...");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    // Print header
    if config.show_progress {
        print_header(
            &config.targets,
            config.worker_count,
            &coordinator.eraser_description(),
        );
    }

    // Run
    let report = coordinator.run().context("Secure-delete run failed")?;

    // Print summary
    print_summary(&report, config.dry_run);

    if report.interrupted {
        info!("Run was interrupted before completion");
    }

    if report.has_errors() {
        info!(errors = report.errors.len(), "Run completed with errors");
    }

    if config.exit_zero {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(ALERT_EXIT_STATUS))
    }
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("scour=debug,warn")
    } else {
        EnvFilter::new("scour=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
