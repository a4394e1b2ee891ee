//! Implementation of `autobuild build`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Result};

use crate::builder::orchestrator::{
    build_as_manifest, BuildReport, OrchestratorOptions, TaskOutcome,
};
use crate::builder::toolchain::Toolchain;
use crate::core::manifest::SkipReason;
use crate::ops::sync::{sync_contributors, sync_license};
use crate::util::format::format_duration;
use crate::util::shell::{Shell, Status};

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Workspace root whose dependencies stay external and whose
    /// metadata is synced.
    pub parent: Option<PathBuf>,

    /// Skip license and contributor sync
    pub no_sync: bool,

    /// Fail when any task fails
    pub strict: bool,

    /// Number of parallel jobs
    pub jobs: Option<usize>,
}

/// Build the package at `root` and sync workspace metadata into it.
///
/// Task failures are printed as warnings. With `strict`, they also make
/// the call fail once everything has settled.
pub fn build(
    root: &Path,
    toolchain: &Toolchain,
    shell: &Shell,
    opts: &BuildOptions,
) -> Result<BuildReport> {
    let start = Instant::now();
    shell.status(Status::Generating, "output...");

    let report = build_as_manifest(
        root,
        opts.parent.as_deref(),
        toolchain,
        shell,
        &OrchestratorOptions { jobs: opts.jobs },
    )?;

    for (key, reason) in &report.skipped {
        tracing::debug!("Skipped export `{}`: {}", key, describe_skip(reason));
    }

    for failed in report.failures() {
        if let TaskOutcome::Rejected(err) = &failed.outcome {
            shell.warn(format!("{} failed: {:#}", failed.task.label(), err));
        }
    }

    match opts.parent.as_deref() {
        Some(monorepo) if !opts.no_sync => {
            sync_license(root, monorepo, shell)?;
            sync_contributors(root, monorepo, shell)?;
        }
        Some(_) => tracing::debug!("Sync disabled"),
        None => tracing::debug!("No workspace root, skipping sync"),
    }

    shell.status(
        Status::Done,
        format!("in {}", format_duration(start.elapsed(), shell.palette())),
    );

    let failed = report.failures().count();
    if opts.strict && failed > 0 {
        bail!(
            "{} of {} task(s) failed\n\
             hint: run with --verbose for tool output",
            failed,
            report.tasks.len()
        );
    }

    Ok(report)
}

fn describe_skip(reason: &SkipReason) -> &'static str {
    match reason {
        SkipReason::NotAnObject => "entry is not an object",
        SkipReason::MissingSource => "entry has no string `src`",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::bundler::{Bundler, WrittenOutput};
    use crate::builder::declarations::DeclarationGenerator;
    use crate::builder::task::{BundleRequest, DeclarationEntry};
    use crate::util::fs::write_string;
    use tempfile::TempDir;

    struct WritingBundler;

    impl Bundler for WritingBundler {
        fn name(&self) -> &str {
            "writing"
        }

        fn bundle(&self, request: &BundleRequest) -> Result<Vec<Result<WrittenOutput>>> {
            Ok(request
                .outputs
                .iter()
                .map(|target| {
                    write_string(&target.file, "export {};\n")?;
                    Ok(WrittenOutput::from_target(target))
                })
                .collect())
        }
    }

    struct FailingDeclarations;

    impl DeclarationGenerator for FailingDeclarations {
        fn name(&self) -> &str {
            "failing"
        }

        fn generate(&self, _entries: &[DeclarationEntry]) -> Result<Vec<String>> {
            bail!("type error")
        }
    }

    fn package(tmp: &TempDir) -> PathBuf {
        let root = tmp.path().join("demo");
        write_string(
            &root.join("package.json"),
            r#"{
                "name": "demo",
                "exports": {
                    ".": {
                        "src": "./src/index.ts",
                        "import": "./out/index.mjs",
                        "types": "./out/index.d.ts"
                    }
                }
            }"#,
        )
        .unwrap();
        write_string(&root.join("src/index.ts"), "export const a = 1;\n").unwrap();
        write_string(&tmp.path().join("package.json"), r#"{"name": "ws"}"#).unwrap();
        root
    }

    fn toolchain() -> Toolchain {
        Toolchain::new(WritingBundler, FailingDeclarations)
    }

    #[test]
    fn test_build_tolerates_failures() {
        let tmp = TempDir::new().unwrap();
        let root = package(&tmp);

        let report = build(&root, &toolchain(), &Shell::quiet(), &BuildOptions::default()).unwrap();
        assert_eq!(report.failures().count(), 1);
        assert!(root.join("out/index.mjs").exists());
    }

    #[test]
    fn test_build_strict_fails() {
        let tmp = TempDir::new().unwrap();
        let root = package(&tmp);
        let opts = BuildOptions {
            strict: true,
            ..Default::default()
        };

        let err = build(&root, &toolchain(), &Shell::quiet(), &opts).unwrap_err();
        assert!(err.to_string().contains("1 of 2 task(s) failed"));
    }

    #[test]
    fn test_build_syncs_from_parent() {
        let tmp = TempDir::new().unwrap();
        let root = package(&tmp);
        std::fs::write(tmp.path().join("LICENSE"), "MIT\n").unwrap();
        std::fs::write(
            tmp.path().join("CONTRIBUTORS.yaml"),
            "alice:\n  repo: demo\nbob:\n  repo: other\n",
        )
        .unwrap();

        let opts = BuildOptions {
            parent: Some(tmp.path().to_path_buf()),
            ..Default::default()
        };
        build(&root, &toolchain(), &Shell::quiet(), &opts).unwrap();

        assert_eq!(std::fs::read_to_string(root.join("LICENSE")).unwrap(), "MIT\n");
        let contributors = std::fs::read_to_string(root.join("CONTRIBUTORS.yaml")).unwrap();
        assert!(contributors.contains("alice"));
        assert!(!contributors.contains("bob"));
    }

    #[test]
    fn test_build_missing_license_fails_sync() {
        let tmp = TempDir::new().unwrap();
        let root = package(&tmp);
        let opts = BuildOptions {
            parent: Some(tmp.path().to_path_buf()),
            ..Default::default()
        };

        assert!(build(&root, &toolchain(), &Shell::quiet(), &opts).is_err());
        // Outputs were still written before sync ran.
        assert!(root.join("out/index.mjs").exists());
    }

    #[test]
    fn test_build_no_sync() {
        let tmp = TempDir::new().unwrap();
        let root = package(&tmp);
        let opts = BuildOptions {
            parent: Some(tmp.path().to_path_buf()),
            no_sync: true,
            ..Default::default()
        };

        build(&root, &toolchain(), &Shell::quiet(), &opts).unwrap();
        assert!(!root.join("LICENSE").exists());
    }
}
