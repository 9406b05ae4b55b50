//! Environment discovery from the tenants directory layout.
//!
//! Deployment environments are declared by the filesystem: every
//! subdirectory of the tenants root is one environment, and a sibling
//! `<environment>.yaml` file holds that environment's renderer
//! configuration. Symlinked directories and the reserved `meta` aggregation
//! directory are not environments.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::HfselError;

/// Name of the reserved aggregation directory that is never an environment.
pub const META_DIR: &str = "meta";

/// List the environments configured under `tenants_dir`.
///
/// Returns entry names that are real directories (not symlinks) and not the
/// reserved [`META_DIR`]. Order follows the directory listing; callers treat
/// it as the display order for output, nothing more.
///
/// # Errors
///
/// Returns [`HfselError::TenantsDirNotFound`] if `tenants_dir` does not
/// exist or is not a directory, and [`HfselError::IoError`] if the listing
/// itself fails partway.
pub fn discover_environments(tenants_dir: &Path) -> Result<Vec<String>> {
    if !tenants_dir.is_dir() {
        return Err(HfselError::TenantsDirNotFound {
            path: tenants_dir.display().to_string(),
        }
        .into());
    }

    let mut environments = Vec::new();
    for entry in std::fs::read_dir(tenants_dir).map_err(HfselError::from)? {
        let entry = entry.map_err(HfselError::from)?;
        let file_type = entry.file_type().map_err(HfselError::from)?;

        // file_type() does not follow symlinks, so a symlinked directory
        // reports is_symlink, not is_dir.
        if file_type.is_symlink() || !file_type.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name == META_DIR {
            continue;
        }

        environments.push(name);
    }

    tracing::debug!(
        target: "tenants",
        "Discovered {} environments: {:?}",
        environments.len(),
        environments
    );

    Ok(environments)
}

/// Path of the renderer configuration file for one environment.
pub fn environment_config_path(tenants_dir: &Path, environment: &str) -> PathBuf {
    tenants_dir.join(format!("{environment}.yaml"))
}
