//! Global context for autobuild operations.
//!
//! Provides centralized access to the working directory, the global
//! configuration home, and package/workspace discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::MANIFEST_NAME;
use crate::util::config::{global_config_dir, project_config_path};

/// Global context containing paths used by every command.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global autobuild data (~/.autobuild/)
    home: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext from the process environment.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let home = global_config_dir().unwrap_or_else(|| PathBuf::from(".autobuild"));
        Ok(GlobalContext { cwd, home })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Resolve a user-supplied directory against the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Find the package root: the nearest directory, starting at `start`
    /// (or cwd) and searching upward, that contains `package.json`.
    pub fn find_package_root(&self, start: Option<&Path>) -> Result<PathBuf> {
        let origin = start.map(|p| self.resolve(p)).unwrap_or_else(|| self.cwd.clone());
        let mut current = origin.clone();
        loop {
            if current.join(MANIFEST_NAME).is_file() {
                return Ok(current);
            }
            if !current.pop() {
                anyhow::bail!(
                    "could not find `{}` in `{}` or any parent directory",
                    MANIFEST_NAME,
                    origin.display()
                );
            }
        }
    }

    /// Find the parent workspace of a package.
    ///
    /// An explicit `parent` wins; otherwise the directory directly above
    /// `root` is used when it has its own `package.json`.
    pub fn find_parent_root(&self, root: &Path, parent: Option<&Path>) -> Option<PathBuf> {
        if let Some(parent) = parent {
            return Some(self.resolve(parent));
        }
        root.parent()
            .filter(|dir| dir.join(MANIFEST_NAME).is_file())
            .map(Path::to_path_buf)
    }

    /// Get the project configuration path for a package root.
    pub fn project_config_path(&self, root: &Path) -> PathBuf {
        project_config_path(root)
    }
}
