//! Common test utilities and fixtures for hfsel integration tests
//!
//! This module consolidates frequently used test patterns to reduce duplication
//! and improve test maintainability.

// Allow dead code because these utilities are used across different test files
// and not all utilities are used in every test file
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Test tenants-layout builder for running the binary end to end.
///
/// Lays out a temporary project directory with a `tenants/` tree and a stub
/// renderer directory, so tests exercise the real pipeline without a real
/// helmfile installation.
pub struct TestTenants {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    root: PathBuf,
    tenants_dir: PathBuf,
    stub_dir: PathBuf,
}

impl TestTenants {
    /// Create a new test layout with an empty tenants directory
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().join("project");
        let tenants_dir = root.join("tenants");
        let stub_dir = temp_dir.path().join("stub");

        fs::create_dir_all(&tenants_dir)?;
        fs::create_dir_all(&stub_dir)?;

        Ok(Self { _temp_dir: temp_dir, root, tenants_dir, stub_dir })
    }

    /// Get the project root the binary runs in
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the tenants directory path
    pub fn tenants_path(&self) -> &Path {
        &self.tenants_dir
    }

    /// Create one environment directory plus its renderer configuration file
    pub fn add_environment(&self, name: &str) -> Result<()> {
        fs::create_dir_all(self.tenants_dir.join(name))?;
        fs::write(
            self.tenants_dir.join(format!("{name}.yaml")),
            "environments: {}\n",
        )
        .with_context(|| format!("Failed to write configuration for {name}"))?;
        Ok(())
    }

    /// Create an environment directory without its configuration file
    pub fn add_environment_dir_only(&self, name: &str) -> Result<()> {
        fs::create_dir_all(self.tenants_dir.join(name))?;
        Ok(())
    }

    /// Create the reserved `meta` aggregation directory
    pub fn add_meta_dir(&self) -> Result<()> {
        fs::create_dir_all(self.tenants_dir.join("meta"))?;
        Ok(())
    }

    /// Create a loose file directly under the tenants directory
    pub fn add_loose_file(&self, name: &str, content: &str) -> Result<()> {
        fs::write(self.tenants_dir.join(name), content)?;
        Ok(())
    }

    /// Symlink `link_name` to an existing environment directory
    #[cfg(unix)]
    pub fn add_symlinked_environment(&self, link_name: &str, target: &str) -> Result<()> {
        std::os::unix::fs::symlink(
            self.tenants_dir.join(target),
            self.tenants_dir.join(link_name),
        )?;
        Ok(())
    }

    /// Write a file under the project root, creating parent directories
    pub fn write_file(&self, relative: &str, content: &str) -> Result<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(())
    }

    /// Install a stub helmfile that prints a canned manifest per environment.
    ///
    /// The stub parses `--environment` from its arguments and cats the
    /// matching canned stream; an environment with no canned stream makes it
    /// exit non-zero, which doubles as a check that excluded environments
    /// are never rendered.
    #[cfg(unix)]
    pub fn install_stub_helmfile(&self, streams: &[(&str, &str)]) -> Result<PathBuf> {
        let streams_dir = self.stub_dir.join("streams");
        fs::create_dir_all(&streams_dir)?;
        for (environment, stream) in streams {
            fs::write(streams_dir.join(format!("{environment}.out")), stream)?;
        }

        let script = format!(
            r#"#!/bin/sh
# Test stand-in for helmfile: prints the canned manifest for --environment.
env=""
while [ $# -gt 0 ]; do
    case "$1" in
        --environment) env="$2"; shift 2 ;;
        *) shift ;;
    esac
done
if [ -z "$env" ] || [ ! -f "{streams}/$env.out" ]; then
    echo "no canned manifest for environment '$env'" >&2
    exit 3
fi
cat "{streams}/$env.out"
"#,
            streams = streams_dir.display()
        );

        let path = self.stub_dir.join("helmfile");
        fs::write(&path, script)?;
        make_executable(&path)?;
        Ok(path)
    }

    /// Install a stub helmfile that always fails
    #[cfg(unix)]
    pub fn install_failing_helmfile(&self, exit_code: i32, stderr_message: &str) -> Result<PathBuf> {
        let script = format!("#!/bin/sh\necho \"{stderr_message}\" >&2\nexit {exit_code}\n");
        let path = self.stub_dir.join("helmfile");
        fs::write(&path, script)?;
        make_executable(&path)?;
        Ok(path)
    }

    /// Run hfsel with the standard layout flags plus `extra_args`, feeding
    /// `diff` on stdin
    pub fn run_hfsel(
        &self,
        helmfile_bin: &Path,
        extra_args: &[&str],
        diff: &str,
    ) -> Result<CommandOutput> {
        let mut command = Command::new(env!("CARGO_BIN_EXE_hfsel"));
        command
            .arg("--tenants-dir")
            .arg(&self.tenants_dir)
            .arg("--helmfile-bin")
            .arg(helmfile_bin)
            .args(extra_args);
        self.run_command(command, diff.as_bytes())
    }

    /// Run hfsel with exactly `args`, feeding `diff` on stdin
    pub fn run_hfsel_raw(&self, args: &[&str], diff: &str) -> Result<CommandOutput> {
        let mut command = Command::new(env!("CARGO_BIN_EXE_hfsel"));
        command.args(args);
        self.run_command(command, diff.as_bytes())
    }

    /// Run hfsel with the standard layout flags, feeding raw bytes on stdin
    pub fn run_hfsel_bytes(
        &self,
        helmfile_bin: &Path,
        stdin_bytes: &[u8],
    ) -> Result<CommandOutput> {
        let mut command = Command::new(env!("CARGO_BIN_EXE_hfsel"));
        command
            .arg("--tenants-dir")
            .arg(&self.tenants_dir)
            .arg("--helmfile-bin")
            .arg(helmfile_bin);
        self.run_command(command, stdin_bytes)
    }

    fn run_command(&self, mut command: Command, stdin_bytes: &[u8]) -> Result<CommandOutput> {
        command
            .current_dir(&self.root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().context("Failed to spawn hfsel")?;
        {
            let mut stdin = child.stdin.take().context("stdin was not piped")?;
            // The binary may exit before reading stdin (error paths abort
            // early), so a broken pipe here is not a harness failure.
            match stdin.write_all(stdin_bytes) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(e) => return Err(e).context("Failed to write diff to stdin"),
            }
        }
        let output = child.wait_with_output().context("Failed to run hfsel")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Command output helper
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Parse stdout as the JSON selector document
    pub fn json(&self) -> Result<serde_json::Value> {
        serde_json::from_str(self.stdout.trim())
            .with_context(|| format!("stdout is not valid JSON: {:?}", self.stdout))
    }
}

/// Render a minimal manifest stream with one release
pub fn manifest_stream(name: &str, tenant: &str, installed: bool, files: &[&str]) -> String {
    let mut out = String::from("releases:\n");
    out.push_str(&format!("  - name: {name}\n"));
    out.push_str(&format!("    installed: {installed}\n"));
    out.push_str("    labels:\n");
    out.push_str(&format!("      tenant: {tenant}\n"));
    if !files.is_empty() {
        out.push_str("    values:\n");
        for file in files {
            out.push_str(&format!("      - {file}\n"));
        }
    }
    out
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)?;
    Ok(())
}
