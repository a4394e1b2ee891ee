//! Configuration file support for autobuild.
//!
//! autobuild supports two configuration file locations:
//! - Global: `~/.autobuild/config.toml` - User-wide defaults
//! - Project: `.autobuild/config.toml` - Package-specific overrides
//!
//! Project config takes precedence over global config. CLI flags take
//! precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// autobuild configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Library bundler settings
    pub bundler: ToolConfig,

    /// Declaration generator settings
    pub declarations: ToolConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Number of parallel build tasks (None = one per CPU)
    pub jobs: Option<usize>,

    /// Exit non-zero when any build task fails
    pub strict: bool,

    /// Skip LICENSE and CONTRIBUTORS sync after building
    pub no_sync: bool,
}

/// External tool invocation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Program name or path (None = built-in default)
    pub program: Option<PathBuf>,

    /// Extra arguments appended to every invocation
    pub args: Vec<String>,
}

impl ToolConfig {
    fn merge(&mut self, other: ToolConfig) {
        if other.program.is_some() {
            self.program = other.program;
        }
        if !other.args.is_empty() {
            self.args = other.args;
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
        if other.build.strict {
            self.build.strict = true;
        }
        if other.build.no_sync {
            self.build.no_sync = true;
        }

        self.bundler.merge(other.bundler);
        self.declarations.merge(other.declarations);
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.autobuild/config.toml)
/// 2. Global config (~/.autobuild/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global autobuild config directory (~/.autobuild).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".autobuild"))
}

/// Get the project config path (.autobuild/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".autobuild").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.build.jobs.is_none());
        assert!(!config.build.strict);
        assert!(config.bundler.program.is_none());
        assert!(config.declarations.args.is_empty());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[build]
jobs = 4
strict = true

[bundler]
program = "node_modules/.bin/esbuild"
args = ["--target=es2020"]
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.build.jobs, Some(4));
        assert!(config.build.strict);
        assert_eq!(
            config.bundler.program,
            Some(PathBuf::from("node_modules/.bin/esbuild"))
        );
        assert_eq!(config.bundler.args, ["--target=es2020"]);
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.build.jobs = Some(4);
        base.bundler.program = Some(PathBuf::from("esbuild"));

        let mut override_cfg = Config::default();
        override_cfg.bundler.program = Some(PathBuf::from("/opt/esbuild"));
        override_cfg.build.no_sync = true;

        base.merge(override_cfg);

        assert_eq!(base.bundler.program, Some(PathBuf::from("/opt/esbuild")));
        assert_eq!(base.build.jobs, Some(4)); // Not overridden
        assert!(base.build.no_sync);
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");
        std::fs::write(&global, "[build]\njobs = 2\n[declarations]\nargs = [\"--no-check\"]\n")
            .unwrap();
        std::fs::write(&project, "[build]\njobs = 8\n").unwrap();

        let config = load_config(&global, &project);
        assert_eq!(config.build.jobs, Some(8));
        assert_eq!(config.declarations.args, ["--no-check"]);
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[build\n").unwrap();

        let config = Config::load_or_default(&path);
        assert!(config.build.jobs.is_none());
    }
}
