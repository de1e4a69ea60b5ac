//! Per-session Chrome profile directory management
//!
//! Every launched browser gets its own UUID-named user data directory so
//! concurrent sessions never contend on Chrome's SingletonLock. Directories
//! are removed when the owning session shuts down.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// RAII wrapper for a browser profile directory
///
/// Removes the directory on drop unless `into_path()` transferred
/// ownership to another cleanup mechanism (the session wrapper).
#[derive(Debug)]
pub struct BrowserProfile {
    path: PathBuf,
    cleanup_on_drop: bool,
}

impl BrowserProfile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            cleanup_on_drop: true,
        }
    }

    /// Get reference to the profile directory path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the profile and return the path, disabling auto-cleanup
    pub fn into_path(mut self) -> PathBuf {
        self.cleanup_on_drop = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for BrowserProfile {
    fn drop(&mut self) {
        if self.cleanup_on_drop && self.path.exists() {
            debug!("removing profile directory {}", self.path.display());
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                warn!(
                    "failed to remove profile directory {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Create a unique profile directory under `root` (or the system temp
/// directory when `root` is `None`).
///
/// Uses `create_dir` rather than `create_dir_all` so an improbable UUID
/// collision fails loudly instead of silently sharing a profile.
pub fn create_unique_profile(root: Option<&Path>) -> Result<BrowserProfile> {
    let base = root.map_or_else(std::env::temp_dir, Path::to_path_buf);
    let path = base.join(format!("pagepool_profile_{}", Uuid::new_v4()));

    std::fs::create_dir(&path)
        .with_context(|| format!("failed to create profile directory {}", path.display()))?;

    debug!("created profile directory {}", path.display());
    Ok(BrowserProfile::new(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_directory_is_removed_on_drop() {
        let profile = create_unique_profile(None).unwrap();
        let path = profile.path().to_path_buf();
        assert!(path.exists());
        drop(profile);
        assert!(!path.exists());
    }

    #[test]
    fn into_path_disables_cleanup() {
        let profile = create_unique_profile(None).unwrap();
        let path = profile.into_path();
        assert!(path.exists());
        std::fs::remove_dir_all(&path).unwrap();
    }
}
