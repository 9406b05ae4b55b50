//! Command-line interface for hfsel.
//!
//! There is a single operation: read a changed-path list, resolve the
//! per-environment release graphs through helmfile, and print the affected
//! release selectors as JSON. Everything on the command line configures that
//! one pipeline run; there are no subcommands.
//!
//! The JSON document is the only thing written to stdout. Diagnostics go to
//! stderr through `tracing`, so the output can be piped straight into `jq`
//! or a pipeline variable.


use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use crate::core::HfselError;
use crate::graph::build_graphs;
use crate::helmfile::HelmfileRenderer;
use crate::matcher::match_changed_paths;
use crate::selectors::SelectorOutput;
use crate::tenants::discover_environments;

/// Command-line arguments for one selector computation.
///
/// Typical CI usage pipes a diff in and feeds the JSON onward:
///
/// ```bash
/// git --no-pager diff --name-only origin/main HEAD | hfsel | jq
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "hfsel",
    about = "Compute helmfile selector arguments for the releases affected by a git diff",
    version,
    long_about = "hfsel resolves every environment's releases with `helmfile build`, matches \
                  the changed file paths from a diff against the values and secrets files \
                  those releases reference, and prints per-environment `--selector` arguments \
                  as JSON for the deployment pipeline."
)]
pub struct Cli {
    /// File containing changed paths, one per line (defaults to stdin).
    ///
    /// The expected content is `git diff --name-only` output: one changed
    /// file path per line, UTF-8 encoded. Blank lines are ignored.
    #[arg(value_name = "DIFF_FILE")]
    pub diff_file: Option<PathBuf>,

    /// Root directory holding per-environment tenant configuration.
    ///
    /// Every non-symlink subdirectory (except `meta`) is one environment,
    /// with its renderer configuration at `<DIR>/<environment>.yaml`.
    #[arg(long, value_name = "DIR", default_value = "tenants")]
    pub tenants_dir: PathBuf,

    /// Helmfile binary to invoke for rendering.
    ///
    /// Either a name resolved through PATH or a path to an executable.
    #[arg(long, value_name = "BIN", env = "HFSEL_HELMFILE", default_value = "helmfile")]
    pub helmfile_bin: String,

    /// Enable verbose output for debugging.
    ///
    /// Shows every helmfile invocation, its timing, and the indexing and
    /// matching counts on stderr. Equivalent to `RUST_LOG=debug`. Mutually
    /// exclusive with `--quiet`.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all diagnostics except errors.
    ///
    /// The JSON document on stdout is unaffected. Mutually exclusive with
    /// `--verbose`.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Run the full pipeline: discover, render, match, print.
    ///
    /// On success the selector document has been written to stdout and the
    /// process should exit zero, including when no release is affected. Any
    /// error aborts before a single byte of JSON is emitted.
    pub async fn execute(self) -> Result<()> {
        let environments = discover_environments(&self.tenants_dir)?;
        let renderer = HelmfileRenderer::new(&self.helmfile_bin)?;
        let graphs = build_graphs(&renderer, &self.tenants_dir, &environments).await?;

        let diff = self.read_diff().await?;
        let changed_paths = diff.lines().filter(|line| !line.trim().is_empty()).count();
        let changes = match_changed_paths(diff.lines(), &graphs);

        let output = SelectorOutput::build(&environments, &changes);
        tracing::info!(
            "{} of {} environments affected by {} changed paths",
            output.helmfile.len(),
            environments.len(),
            changed_paths
        );
        println!("{}", output.to_json()?);

        Ok(())
    }

    /// Read the changed-path list from the positional file or stdin.
    ///
    /// Input that is not valid UTF-8 is fatal, matching the contract that
    /// changed paths are text lines.
    async fn read_diff(&self) -> Result<String> {
        match &self.diff_file {
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read changed paths from {}", path.display())),
            None => {
                let mut buffer = Vec::new();
                tokio::io::stdin()
                    .read_to_end(&mut buffer)
                    .await
                    .context("failed to read changed paths from stdin")?;
                let text = String::from_utf8(buffer).map_err(|e| {
                    HfselError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
                })?;
                Ok(text)
            }
        }
    }
}
