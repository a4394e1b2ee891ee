//! Sync workspace metadata into a member package.
//!
//! - `LICENSE` is copied verbatim from the workspace root.
//! - `CONTRIBUTORS.yaml` is filtered down to the authors whose `repo`
//!   field names this package, with `repo` itself stripped.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::Style;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::util::format::format_move;
use crate::util::fs::{copy_file, read_to_string, write_string};
use crate::util::shell::{Shell, Status};

/// License file name.
pub const LICENSE_NAME: &str = "LICENSE";

/// Contributor registry file name.
pub const CONTRIBUTORS_NAME: &str = "CONTRIBUTORS.yaml";

/// Contributor registry shape errors.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to parse contributor registry: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("contributor registry must map authors to entries: {}", path.display())]
    NotAMapping { path: PathBuf },

    #[error("cannot determine package name from {}", root.display())]
    NoPackageName { root: PathBuf },
}

/// A file that was synced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synced {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Copy `LICENSE` from `monorepo` into `root`.
pub fn sync_license(root: &Path, monorepo: &Path, shell: &Shell) -> Result<Synced> {
    let src = monorepo.join(LICENSE_NAME);
    let out = root.join(LICENSE_NAME);
    copy_file(&src, &out)?;

    report_sync(shell, &src, &out);
    Ok(Synced { from: src, to: out })
}

/// Write the contributors of this package from `monorepo`'s registry into
/// `root`. The package is identified by the name of the `root` directory.
pub fn sync_contributors(root: &Path, monorepo: &Path, shell: &Shell) -> Result<Synced> {
    let package = root
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SyncError::NoPackageName {
            root: root.to_path_buf(),
        })?;

    let src = monorepo.join(CONTRIBUTORS_NAME);
    let registry = load_registry(&src)?;
    let filtered = filter_contributors(&registry, package);
    tracing::debug!(
        "Kept {} of {} contributor(s) for `{}`",
        filtered.len(),
        registry.len(),
        package
    );

    let content = serde_yaml::to_string(&Value::Mapping(filtered))
        .context("failed to serialize contributor registry")?;
    let out = root.join(CONTRIBUTORS_NAME);
    write_string(&out, &content)?;

    report_sync(shell, &src, &out);
    Ok(Synced { from: src, to: out })
}

fn load_registry(path: &Path) -> Result<Mapping> {
    let raw = read_to_string(path)?;
    let value: Value = serde_yaml::from_str(&raw).map_err(|source| SyncError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Mapping(map) => Ok(map),
        // An empty file parses as null.
        Value::Null => Ok(Mapping::new()),
        _ => Err(SyncError::NotAMapping {
            path: path.to_path_buf(),
        }
        .into()),
    }
}

/// Keep the authors whose `repo` is `package` or a list containing it.
///
/// Author order is preserved. Kept entries lose their `repo` key.
pub fn filter_contributors(registry: &Mapping, package: &str) -> Mapping {
    let mut kept = Mapping::new();

    for (author, data) in registry {
        let Value::Mapping(fields) = data else {
            continue;
        };
        if !names_package(fields.get("repo"), package) {
            continue;
        }

        let mut fields = fields.clone();
        fields.remove("repo");
        kept.insert(author.clone(), Value::Mapping(fields));
    }

    kept
}

fn names_package(repo: Option<&Value>, package: &str) -> bool {
    match repo {
        Some(Value::String(name)) => name == package,
        Some(Value::Sequence(names)) => names.iter().any(|n| n.as_str() == Some(package)),
        _ => false,
    }
}

fn report_sync(shell: &Shell, from: &Path, to: &Path) {
    shell.status(
        Status::Sync,
        format_move(
            &shell.display_path(from),
            &shell.display_path(to),
            &Style::new().magenta(),
            shell.palette(),
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REGISTRY: &str = r#"
alice:
  email: alice@example.com
  repo: demo
bob:
  email: bob@example.com
  repo: [other, demo]
carol:
  email: carol@example.com
  repo: other
dave: ~
erin:
  email: erin@example.com
"#;

    fn registry() -> Mapping {
        serde_yaml::from_str(REGISTRY).unwrap()
    }

    #[test]
    fn test_filter_keeps_scalar_and_list_matches() {
        let kept = filter_contributors(&registry(), "demo");
        let authors: Vec<_> = kept.keys().filter_map(Value::as_str).collect();
        assert_eq!(authors, ["alice", "bob"]);
    }

    #[test]
    fn test_filter_strips_repo() {
        let kept = filter_contributors(&registry(), "demo");
        let alice = kept.get("alice").and_then(Value::as_mapping).unwrap();
        assert!(alice.get("repo").is_none());
        assert_eq!(
            alice.get("email").and_then(Value::as_str),
            Some("alice@example.com")
        );
    }

    #[test]
    fn test_filter_no_matches() {
        assert!(filter_contributors(&registry(), "unknown").is_empty());
    }

    #[test]
    fn test_sync_license() {
        let tmp = TempDir::new().unwrap();
        let pkg = tmp.path().join("demo");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(tmp.path().join(LICENSE_NAME), "MIT License\n").unwrap();

        let synced = sync_license(&pkg, tmp.path(), &Shell::quiet()).unwrap();
        assert_eq!(synced.to, pkg.join(LICENSE_NAME));
        assert_eq!(
            std::fs::read_to_string(pkg.join(LICENSE_NAME)).unwrap(),
            "MIT License\n"
        );
    }

    #[test]
    fn test_sync_license_missing_source() {
        let tmp = TempDir::new().unwrap();
        let pkg = tmp.path().join("demo");
        assert!(sync_license(&pkg, tmp.path(), &Shell::quiet()).is_err());
    }

    #[test]
    fn test_sync_contributors() {
        let tmp = TempDir::new().unwrap();
        let pkg = tmp.path().join("demo");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(tmp.path().join(CONTRIBUTORS_NAME), REGISTRY).unwrap();

        sync_contributors(&pkg, tmp.path(), &Shell::quiet()).unwrap();

        let written = std::fs::read_to_string(pkg.join(CONTRIBUTORS_NAME)).unwrap();
        let parsed: Mapping = serde_yaml::from_str(&written).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed.contains_key("alice"));
        assert!(parsed.contains_key("bob"));
        assert!(!written.contains("repo"));
    }

    #[test]
    fn test_sync_contributors_rejects_sequence_registry() {
        let tmp = TempDir::new().unwrap();
        let pkg = tmp.path().join("demo");
        std::fs::write(tmp.path().join(CONTRIBUTORS_NAME), "- alice\n- bob\n").unwrap();

        let err = sync_contributors(&pkg, tmp.path(), &Shell::quiet()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SyncError>(),
            Some(SyncError::NotAMapping { .. })
        ));
    }
}
