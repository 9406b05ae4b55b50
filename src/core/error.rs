//! Error handling for hfsel
//!
//! This module defines the strongly-typed error taxonomy for the selector
//! pipeline. Every fatal condition the tool can hit maps to one variant of
//! [`HfselError`]; call sites wrap these in [`anyhow::Error`] with
//! `.context()` so the chain printed on exit names both the failing stage and
//! the underlying cause.
//!
//! # Error Categories
//!
//! - **Configuration**: [`HfselError::TenantsDirNotFound`],
//!   [`HfselError::EnvironmentConfigNotFound`]: the tenants layout on disk
//!   does not match what the pipeline expects. Raised before any renderer is
//!   invoked.
//! - **External tool**: [`HfselError::HelmfileNotFound`],
//!   [`HfselError::HelmfileCommandError`],
//!   [`HfselError::ManifestParseError`]: the manifest renderer is missing,
//!   exited non-zero (or timed out), or produced a stream that is not valid
//!   multi-document YAML.
//! - **Schema**: [`HfselError::ReleaseSchemaError`]: a rendered release is
//!   missing a required field. The tool never guesses defaults.
//! - **Input/IO**: [`HfselError::IoError`]: filesystem scans and the changed
//!   path stream (including undecodable input).
//!
//! None of these are retried; the tool runs once per pipeline invocation and
//! leaves retry policy to the pipeline. There is deliberately no partial-result
//! mode: any variant aborts the run before the JSON document is emitted.

use thiserror::Error;

/// The main error type for hfsel operations.
///
/// Each variant represents one specific failure mode and carries the context
/// needed to diagnose it from a CI log: the environment being processed, the
/// path that was missing, or the stderr of the failed external command.
#[derive(Error, Debug)]
pub enum HfselError {
    /// Helmfile invocation failed during execution.
    ///
    /// Raised when the renderer returns a non-zero exit code, or when it
    /// exceeds the build timeout (a timeout is reported through the same
    /// variant with an explanatory `stderr`).
    #[error("helmfile operation failed: {operation}")]
    HelmfileCommandError {
        /// The helmfile operation that failed (e.g. "build")
        operation: String,
        /// The error output from the helmfile command
        stderr: String,
    },

    /// Helmfile executable not found in PATH.
    ///
    /// The renderer binary (default `helmfile`, overridable via
    /// `--helmfile-bin` / `HFSEL_HELMFILE`) could not be located.
    #[error("helmfile is not installed or not found in PATH")]
    HelmfileNotFound,

    /// The tenants root directory does not exist or is not a directory.
    #[error("tenants directory not found: {path}")]
    TenantsDirNotFound {
        /// The path that was expected to be the tenants root
        path: String,
    },

    /// A discovered environment has no renderer configuration file.
    ///
    /// Discovery found the environment directory, but the sibling
    /// `<environment>.yaml` the renderer consumes is missing.
    #[error("no configuration file for environment '{environment}': {path}")]
    EnvironmentConfigNotFound {
        /// The environment whose configuration is missing
        environment: String,
        /// The configuration file path that was expected to exist
        path: String,
    },

    /// Renderer output failed to parse as a multi-document YAML stream.
    #[error("invalid helmfile build output for environment '{environment}'")]
    ManifestParseError {
        /// The environment whose rendered stream failed to parse
        environment: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// A rendered release object is missing a required field.
    ///
    /// Raised for a missing or mistyped `installed`, `name`, or
    /// `labels.tenant`. Non-installed releases are exempt: they are skipped
    /// before `name` and `labels.tenant` are read.
    #[error("release in environment '{environment}' has a missing or invalid '{field}' field")]
    ReleaseSchemaError {
        /// The environment containing the malformed release
        environment: String,
        /// The required field that was missing or had the wrong type
        field: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
