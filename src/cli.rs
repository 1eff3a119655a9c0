use std::path::{Path, PathBuf};

use argh::FromArgs;
use thiserror::Error;
use tracing as trc;

use crate::metrics::{self, RunSeries};
use crate::report::Comparison;

/// An error that indicates that the program should exit with the given code
#[derive(Error, Debug)]
#[error("Program exited {0}")]
struct Exit(i32);

#[derive(FromArgs)]
/// Compare average FPS and frame time between two performance log captures.
struct Args {
    /// path to the backup (baseline) capture
    #[argh(option, default = "PathBuf::from(\"backup.json\")")]
    backup: PathBuf,

    /// path to the sourcery (optimized) capture
    #[argh(option, default = "PathBuf::from(\"sourcery.json\")")]
    sourcery: PathBuf,
}

/// Start program logic
fn start() -> eyre::Result<()> {
    let args: Args = trc::debug_span!("Parsing commandline args").in_scope(|| argh::from_env());

    let backup = load_run("backup", &args.backup)?;
    let sourcery = load_run("sourcery", &args.sourcery)?;

    match Comparison::of_runs(&backup, &sourcery) {
        Some(comparison) => println!("{}", comparison),
        None => println!("Not enough data in one of the logs."),
    }

    Ok(())
}

/// Load one capture file and extract its metric series
fn load_run(name: &str, path: &Path) -> eyre::Result<RunSeries> {
    trc::info_span!("Loading capture", run = name, path = %path.display()).in_scope(|| {
        let snapshots = metrics::load_snapshots(path)?;
        let series = metrics::extract_metrics(&snapshots);

        trc::info!(
            "Extracted {} of {} snapshots",
            series.fps.len(),
            snapshots.len()
        );

        Ok(series)
    })
}

/// Run the CLI
pub fn run() {
    // Install tracing for logs
    install_tracing();
    // Install color error printing
    color_eyre::install().expect("Could not install error handler");

    // Start the application and capture errors
    match start() {
        // Do nothing for happy runs!
        Ok(()) => (),
        // Handle errors
        Err(report) => {
            // If the error is an exit code
            if let Some(e) = report.downcast_ref::<Exit>() {
                let code = e.0;

                // If the code is zero, exit cleanly
                if code == 0 {
                    std::process::exit(0);

                // If the code is non-zero print the error and then exit with that code
                } else {
                    trc::error!("{:?}", report);
                    std::process::exit(e.0);
                }
            // If the error is any other kind of error print it and exit 1
            } else {
                trc::error!("{:?}", report);
                std::process::exit(1);
            }
        }
    }
}

fn install_tracing() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, fmt::format::FmtSpan, EnvFilter};

    // Build the tracing layers
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_span_events(FmtSpan::FULL);
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    // Add all of the layers to the subscriber and initialize it
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();
}
