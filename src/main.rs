//! hfsel CLI entry point
//!
//! This is the executable the CI pipeline invokes. It handles argument
//! parsing, diagnostic routing, and error display; the actual pipeline lives
//! in [`hfsel::cli`].
//!
//! Stdout carries exactly one thing: the JSON selector document. All
//! diagnostics go to stderr so the output stays pipeable into `jq` or a
//! workflow variable.

use anyhow::Result;
use clap::Parser;
use hfsel::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    // Execute the pipeline
    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

/// Route diagnostics to stderr at the requested verbosity.
///
/// `--verbose` and `--quiet` take precedence over `RUST_LOG`; with neither
/// flag set, `RUST_LOG` applies and defaults to `info`.
fn init_tracing(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
