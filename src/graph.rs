//! Per-environment index of release values and secrets files.
//!
//! The indexer walks one environment's rendered manifest documents and
//! records, for every installed release, which configuration files that
//! release reads. The resulting [`ReleaseGraph`] is the lookup structure the
//! change matcher runs suffix queries against.
//!
//! Building is schema-strict where it matters: a release that claims to be
//! installed but lacks a `name` or `labels.tenant` aborts the run instead of
//! being silently dropped, since dropping it would mean an affected release
//! never gets redeployed.

use std::path::Path;

use anyhow::Result;
use futures::future::join_all;
use serde_yaml::Value;

use crate::core::HfselError;
use crate::helmfile::{Document, ManifestRenderer};
use crate::tenants::environment_config_path;

/// One configuration-file dependency of one release.
///
/// Created while indexing a single environment's manifest stream and owned
/// by that environment's [`ReleaseGraph`] afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuesFileRef {
    /// Tenant label of the owning release
    pub tenant: String,
    /// Name of the owning release
    pub name: String,
    /// Path of the referenced values or secrets file, as rendered
    pub file: String,
}

/// All values/secrets file references for one environment.
#[derive(Debug, Clone)]
pub struct ReleaseGraph {
    /// Environment this index was built for
    pub environment: String,
    /// Every file reference of every installed release, duplicates included
    pub values_files: Vec<ValuesFileRef>,
}

impl ReleaseGraph {
    /// Index one environment's rendered manifest documents.
    ///
    /// For every release under a document's `releases` collection:
    /// non-installed releases are skipped outright, installed releases
    /// contribute one [`ValuesFileRef`] per plain-string entry in their
    /// `values` and `secrets` lists. Inline mapping entries embed literal
    /// values rather than referencing a file, so they contribute nothing.
    ///
    /// Duplicate references are kept; the matcher deduplicates the final
    /// change set, not this index.
    ///
    /// # Errors
    ///
    /// Returns [`HfselError::ReleaseSchemaError`] for an installed release
    /// with a missing or mistyped `installed`, `name`, `labels.tenant`,
    /// `values`, or `secrets` field, and [`HfselError::ManifestParseError`]
    /// when a document's `releases` is not a sequence.
    pub fn from_documents(environment: impl Into<String>, documents: &[Document]) -> Result<Self> {
        let environment = environment.into();
        let mut values_files = Vec::new();

        for document in documents {
            let Some(releases) = document.get("releases") else {
                continue;
            };
            let releases =
                releases.as_sequence().ok_or_else(|| HfselError::ManifestParseError {
                    environment: environment.clone(),
                    reason: "'releases' is not a sequence".to_string(),
                })?;

            for release in releases {
                // Disabled releases are skipped before any field validation,
                // so a half-written release that is not installed cannot
                // abort the run.
                let installed = release.get("installed").and_then(Value::as_bool).ok_or_else(
                    || HfselError::ReleaseSchemaError {
                        environment: environment.clone(),
                        field: "installed".to_string(),
                    },
                )?;
                if !installed {
                    continue;
                }

                let name = release.get("name").and_then(Value::as_str).ok_or_else(|| {
                    HfselError::ReleaseSchemaError {
                        environment: environment.clone(),
                        field: "name".to_string(),
                    }
                })?;

                let tenant = release
                    .get("labels")
                    .and_then(|labels| labels.get("tenant"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| HfselError::ReleaseSchemaError {
                        environment: environment.clone(),
                        field: "labels.tenant".to_string(),
                    })?;

                for key in ["values", "secrets"] {
                    let Some(entries) = release.get(key) else {
                        continue;
                    };
                    let entries =
                        entries.as_sequence().ok_or_else(|| HfselError::ReleaseSchemaError {
                            environment: environment.clone(),
                            field: key.to_string(),
                        })?;

                    for entry in entries {
                        if let Value::String(file) = entry {
                            values_files.push(ValuesFileRef {
                                tenant: tenant.to_string(),
                                name: name.to_string(),
                                file: file.clone(),
                            });
                        }
                    }
                }
            }
        }

        tracing::debug!(
            target: "graph",
            "Indexed {} values file references for environment {}",
            values_files.len(),
            environment
        );

        Ok(Self { environment, values_files })
    }
}

/// Build the release graph of every environment, rendering in parallel.
///
/// Each environment's configuration file is validated to exist before the
/// first render starts, so a broken layout fails fast without spawning any
/// external process. Renders are independent per environment and run
/// concurrently; the returned vector keeps `environments` order regardless
/// of completion order, and any single failure fails the whole build.
pub async fn build_graphs<R: ManifestRenderer>(
    renderer: &R,
    tenants_dir: &Path,
    environments: &[String],
) -> Result<Vec<ReleaseGraph>> {
    if environments.is_empty() {
        return Ok(Vec::new());
    }

    let mut config_paths = Vec::with_capacity(environments.len());
    for environment in environments {
        let config_path = environment_config_path(tenants_dir, environment);
        if !config_path.is_file() {
            return Err(HfselError::EnvironmentConfigNotFound {
                environment: environment.clone(),
                path: config_path.display().to_string(),
            }
            .into());
        }
        config_paths.push(config_path);
    }

    // Create async tasks for each environment
    let futures: Vec<_> = environments
        .iter()
        .zip(&config_paths)
        .map(|(environment, config_path)| async move {
            let documents = renderer.render(environment, config_path).await?;
            ReleaseGraph::from_documents(environment.as_str(), &documents)
        })
        .collect();

    // Execute all renders in parallel and collect results
    let results = join_all(futures).await;

    // Convert Vec<Result<ReleaseGraph>> to Result<Vec<ReleaseGraph>>
    results.into_iter().collect()
}
