//! hfsel - helmfile selector computation for CI pipelines
//!
//! Given the changed file paths from a source-control diff, hfsel determines
//! which Helm releases, across which deployment environments, are affected,
//! and emits machine-readable `--selector` arguments so the pipeline
//! redeploys only those releases.
//!
//! # Pipeline Overview
//!
//! Every run rebuilds its state from scratch; nothing is cached between
//! invocations:
//!
//! 1. **Discover** environments from the tenants directory layout (one
//!    subdirectory per environment, `meta` and symlinks excluded).
//! 2. **Render** each environment's releases by running `helmfile build`
//!    against `<tenants>/<environment>.yaml`, in parallel across
//!    environments.
//! 3. **Index** the rendered manifests into per-environment release graphs:
//!    which values and secrets files each installed release references.
//! 4. **Match** the diff's changed paths against those file references by
//!    suffix, deduplicating into one change record per affected release.
//! 5. **Serialize** the per-environment selector strings as a single JSON
//!    document on stdout.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface and pipeline orchestration
//! - [`core`] - Error taxonomy shared by every stage
//! - [`tenants`] - Environment discovery from the tenants directory
//! - [`helmfile`] - External renderer invocation and manifest parsing
//! - [`graph`] - Per-environment release graph indexing
//! - [`matcher`] - Suffix matching of changed paths into change records
//! - [`selectors`] - Selector rendering and JSON output document
//!
//! # Output Format
//!
//! ```json
//! {"helmfile": [{"env": "dev-us", "selector": "--selector 'name=checkout,tenant=core'"}]}
//! ```
//!
//! An environment appears only if at least one of its releases is affected;
//! a diff touching nothing yields `{"helmfile": []}` and exit code zero.
//!
//! # Library Usage
//!
//! The stages are usable directly, with the renderer abstracted behind
//! [`helmfile::ManifestRenderer`] so tests can substitute canned manifests:
//!
//! ```rust,no_run
//! use hfsel::graph::build_graphs;
//! use hfsel::helmfile::HelmfileRenderer;
//! use hfsel::matcher::match_changed_paths;
//! use hfsel::selectors::SelectorOutput;
//! use hfsel::tenants::discover_environments;
//! use std::path::Path;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let tenants = Path::new("tenants");
//! let environments = discover_environments(tenants)?;
//! let renderer = HelmfileRenderer::new("helmfile")?;
//! let graphs = build_graphs(&renderer, tenants, &environments).await?;
//!
//! let changes = match_changed_paths("tenants/dev-us/checkout/values.yaml".lines(), &graphs);
//! let output = SelectorOutput::build(&environments, &changes);
//! println!("{}", output.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod constants;
pub mod core;
pub mod graph;
pub mod helmfile;
pub mod matcher;
pub mod selectors;
pub mod tenants;
