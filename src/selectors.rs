//! Rendering matched changes into the final per-environment JSON document.
//!
//! The deployment pipeline consumes one JSON object of shape
//! `{"helmfile": [{"env": ..., "selector": ...}, ...]}` where each entry
//! carries the space-joined selector tokens for every affected release in
//! that environment. Environments with no affected releases are omitted
//! entirely, and entries follow discovery order.

use anyhow::Result;
use serde::Serialize;

use crate::matcher::Change;

/// Selector arguments for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentSelector {
    /// Environment name
    pub env: String,
    /// Space-joined `--selector` tokens, one per affected release
    pub selector: String,
}

/// The complete output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorOutput {
    /// One entry per environment with at least one affected release
    pub helmfile: Vec<EnvironmentSelector>,
}

impl SelectorOutput {
    /// Group changes by environment, preserving the given environment order.
    ///
    /// `changes` is expected to be the matcher's sorted, deduplicated output;
    /// within an environment the selector tokens keep that order. An
    /// environment whose filtered change set is empty contributes no entry,
    /// and a change can only reach the output through an environment named in
    /// `environments`.
    pub fn build(environments: &[String], changes: &[Change]) -> Self {
        let mut helmfile = Vec::new();

        for environment in environments {
            let selector = changes
                .iter()
                .filter(|change| change.environment == *environment)
                .map(Change::render)
                .collect::<Vec<_>>()
                .join(" ");

            if !selector.is_empty() {
                helmfile.push(EnvironmentSelector { env: environment.clone(), selector });
            }
        }

        Self { helmfile }
    }

    /// Serialize as the single-line JSON document printed to stdout.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
