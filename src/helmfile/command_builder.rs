//! Type-safe helmfile command builder for consistent command execution
//!
//! This module provides a fluent API for building and executing helmfile
//! commands, ensuring consistent timeout handling, logging, and error mapping
//! for every renderer invocation.

use anyhow::{Context, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::HELMFILE_BUILD_TIMEOUT;
use crate::core::HfselError;

/// Builder for constructing and executing helmfile commands.
///
/// Every invocation of the external renderer goes through this builder so
/// that timeout management, argv logging, and non-zero-exit error mapping
/// behave identically no matter which environment is being rendered.
///
/// # Examples
///
/// ```rust,ignore
/// use hfsel::helmfile::command_builder::HelmfileCommand;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let stdout = HelmfileCommand::build("helmfile", "dev-us", Path::new("tenants/dev-us.yaml"))
///     .with_context("dev-us")
///     .execute_stdout()
///     .await?;
/// # Ok(())
/// # }
/// ```
///
/// # Default Configuration
///
/// New commands capture stdout/stderr and carry the
/// [`HELMFILE_BUILD_TIMEOUT`] (5 minutes). A timeout is surfaced through the
/// same error variant as a non-zero exit, so callers treat both as the one
/// fatal external-tool condition.
pub struct HelmfileCommand {
    /// Program to invoke (default "helmfile", overridable for stubs)
    program: String,

    /// Command arguments to pass to helmfile (e.g. ["build", "--environment", "dev-us"])
    args: Vec<String>,

    /// Maximum duration to wait for command completion (None = no timeout)
    timeout_duration: Option<Duration>,

    /// Optional context string for log lines (typically the environment name)
    context: Option<String>,
}

impl HelmfileCommand {
    /// Creates a new helmfile command builder with the default timeout.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout_duration: Some(HELMFILE_BUILD_TIMEOUT),
            context: None,
        }
    }

    /// Adds a single argument to the command.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set a custom timeout for the command (None for no timeout).
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Set a context for logging (typically the environment name).
    ///
    /// The context is included in debug log lines to distinguish between
    /// concurrent renders when environments are processed in parallel.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Execute the command and return the captured output.
    ///
    /// Returns [`HfselError::HelmfileNotFound`] when the program cannot be
    /// spawned, and [`HfselError::HelmfileCommandError`] for a non-zero exit
    /// or a timeout.
    pub async fn execute(self) -> Result<HelmfileCommandOutput> {
        let start = std::time::Instant::now();
        let operation = self.args.first().cloned().unwrap_or_else(|| "unknown".to_string());

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        if let Some(ref ctx) = self.context {
            tracing::debug!(
                target: "helmfile",
                "({}) Executing command: {} {}",
                ctx,
                self.program,
                self.args.join(" ")
            );
        } else {
            tracing::debug!(
                target: "helmfile",
                "Executing command: {} {}",
                self.program,
                self.args.join(" ")
            );
        }

        let output_future = cmd.output();

        let output = if let Some(duration) = self.timeout_duration {
            match timeout(duration, output_future).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        target: "helmfile",
                        "Command timed out after {} seconds: {} {}",
                        duration.as_secs(),
                        self.program,
                        self.args.join(" ")
                    );
                    return Err(HfselError::HelmfileCommandError {
                        operation,
                        stderr: format!(
                            "helmfile command timed out after {} seconds. \
                             Try running the command manually: {} {}",
                            duration.as_secs(),
                            self.program,
                            self.args.join(" ")
                        ),
                    }
                    .into());
                }
            }
        } else {
            output_future.await
        };

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(HfselError::HelmfileNotFound).with_context(|| {
                    format!("failed to execute {} {}", self.program, self.args.join(" "))
                });
            }
            Err(e) => {
                return Err(e).context(format!(
                    "failed to execute {} {}",
                    self.program,
                    self.args.join(" ")
                ));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);

            tracing::warn!(
                target: "helmfile",
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::warn!(target: "helmfile", "{}", stderr.trim());
            }

            return Err(HfselError::HelmfileCommandError {
                operation,
                stderr: stderr.to_string(),
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stderr.is_empty() {
            if let Some(ref ctx) = self.context {
                tracing::debug!(target: "helmfile", "({}) {}", ctx, stderr.trim());
            } else {
                tracing::debug!(target: "helmfile", "{}", stderr.trim());
            }
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            if let Some(ref ctx) = self.context {
                tracing::info!(
                    target: "helmfile::perf",
                    "({}) helmfile {} took {:.2}s",
                    ctx,
                    operation,
                    elapsed.as_secs_f64()
                );
            } else {
                tracing::info!(
                    target: "helmfile::perf",
                    "helmfile {} took {:.2}s",
                    operation,
                    elapsed.as_secs_f64()
                );
            }
        } else if elapsed.as_millis() > 100 {
            if let Some(ref ctx) = self.context {
                tracing::debug!(
                    target: "helmfile::perf",
                    "({}) helmfile {} took {}ms",
                    ctx,
                    operation,
                    elapsed.as_millis()
                );
            } else {
                tracing::debug!(
                    target: "helmfile::perf",
                    "helmfile {} took {}ms",
                    operation,
                    elapsed.as_millis()
                );
            }
        }

        Ok(HelmfileCommandOutput { stdout, stderr })
    }

    /// Execute the command and return only stdout.
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout)
    }
}

/// Output from a helmfile command
#[derive(Debug)]
pub struct HelmfileCommandOutput {
    /// Standard output from the helmfile command
    pub stdout: String,
    /// Standard error output from the helmfile command
    pub stderr: String,
}

// Convenience builders for the operations hfsel performs.

impl HelmfileCommand {
    /// Create a `helmfile build` command for one environment.
    ///
    /// This is the renderer invocation contract: the environment name and the
    /// path to that environment's configuration file.
    pub fn build(
        program: impl Into<String>,
        environment: &str,
        config_path: impl AsRef<std::path::Path>,
    ) -> Self {
        Self::new(program).args([
            "build",
            "--environment",
            environment,
            "--file",
            &config_path.as_ref().display().to_string(),
        ])
    }
}
