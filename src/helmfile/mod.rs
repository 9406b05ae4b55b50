//! Integration with the external helmfile renderer.
//!
//! An environment's release set is resolved by running `helmfile build`
//! against that environment's configuration file and parsing the resulting
//! multi-document YAML stream. The stream is kept as generic YAML values so
//! the indexing logic stays decoupled from helmfile's exact output schema.
//!
//! The [`ManifestRenderer`] trait is the seam for tests: production code uses
//! [`HelmfileRenderer`], tests substitute a stub that returns canned
//! documents without spawning a process.

pub mod command_builder;

pub use command_builder::{HelmfileCommand, HelmfileCommandOutput};

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use crate::core::HfselError;

/// One rendered manifest document, kept as untyped YAML.
pub type Document = serde_yaml::Value;

/// Resolves one environment's configuration into rendered manifest documents.
///
/// Implementations must be usable from concurrent per-environment tasks, so
/// the returned future is `Send` and `render` takes `&self`.
pub trait ManifestRenderer: Send + Sync {
    /// Render the given environment's configuration file.
    ///
    /// A non-zero exit, a timeout, or unparsable output is fatal for the
    /// whole run; implementations return an error rather than a partial
    /// document stream.
    fn render(
        &self,
        environment: &str,
        config_path: &Path,
    ) -> impl std::future::Future<Output = Result<Vec<Document>>> + Send;
}

/// Production renderer backed by the `helmfile` binary.
pub struct HelmfileRenderer {
    program: String,
}

impl HelmfileRenderer {
    /// Create a renderer, verifying the binary can be resolved up front.
    ///
    /// Checking once here means a missing binary is reported before any
    /// per-environment work starts, instead of once per render.
    ///
    /// # Errors
    ///
    /// Returns [`HfselError::HelmfileNotFound`] if `program` is not on `PATH`
    /// and is not a path to an executable file.
    pub fn new(program: impl Into<String>) -> Result<Self> {
        let program = program.into();
        match which::which(&program) {
            Ok(resolved) => {
                tracing::debug!(
                    target: "helmfile",
                    "Using helmfile binary at {}",
                    resolved.display()
                );
                Ok(Self { program })
            }
            Err(_) => Err(HfselError::HelmfileNotFound.into()),
        }
    }
}

impl ManifestRenderer for HelmfileRenderer {
    async fn render(&self, environment: &str, config_path: &Path) -> Result<Vec<Document>> {
        let stdout = HelmfileCommand::build(&self.program, environment, config_path)
            .with_context(environment)
            .execute_stdout()
            .await?;
        parse_documents(environment, &stdout)
    }
}

/// Parse a multi-document YAML stream into individual documents.
///
/// An empty stream yields an empty vector. Any document that fails to parse
/// aborts the whole stream with [`HfselError::ManifestParseError`].
pub fn parse_documents(environment: &str, raw: &str) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for deserializer in serde_yaml::Deserializer::from_str(raw) {
        let document =
            Document::deserialize(deserializer).map_err(|e| HfselError::ManifestParseError {
                environment: environment.to_string(),
                reason: e.to_string(),
            })?;
        documents.push(document);
    }
    Ok(documents)
}
