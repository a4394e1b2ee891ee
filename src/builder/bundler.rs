//! Library bundler interface and the esbuild-backed implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::task::{BundleRequest, OutputTarget, Plugin};
use crate::util::fs::ensure_parent;
use crate::util::process::ProcessBuilder;

/// A file pair written by a bundler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutput {
    pub file: PathBuf,
    pub source_map: Option<PathBuf>,
}

impl WrittenOutput {
    /// The output described by a target, as written.
    pub fn from_target(target: &OutputTarget) -> Self {
        WrittenOutput {
            file: target.file.clone(),
            source_map: target.map_file(),
        }
    }
}

/// Produces library bundles.
///
/// Implementations must be shareable across build threads.
pub trait Bundler: Send + Sync {
    /// Name for logs.
    fn name(&self) -> &str;

    /// Bundle `request.input` and write every requested output.
    ///
    /// The outer error means nothing could be bundled. Otherwise there is
    /// one result per `request.outputs` entry, in order; a failed write
    /// does not stop the others.
    fn bundle(&self, request: &BundleRequest) -> Result<Vec<Result<WrittenOutput>>>;
}

/// Bundler that drives the `esbuild` CLI.
///
/// esbuild strips TypeScript natively, so [`Plugin::TypeScript`] needs no
/// flag; [`Plugin::Minify`] maps to `--minify`.
///
/// Each external pattern becomes one `--external:` flag. esbuild also
/// applies a bare package pattern to that package's subpaths, so
/// `--external:chalk` keeps `chalk/ansi` external even though
/// [`ExternalPredicate::is_external`] would inline it.
///
/// [`ExternalPredicate::is_external`]: crate::core::external::ExternalPredicate::is_external
#[derive(Debug, Clone)]
pub struct EsbuildBundler {
    program: PathBuf,
    extra_args: Vec<String>,
}

impl EsbuildBundler {
    /// Default program name.
    pub const PROGRAM: &'static str = "esbuild";

    pub fn new(program: impl Into<PathBuf>) -> Self {
        EsbuildBundler {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Append arguments to every invocation.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// The command that writes one output target.
    pub fn command(&self, request: &BundleRequest, target: &OutputTarget) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.program)
            .arg(&request.input)
            .arg("--bundle")
            .arg("--platform=node")
            .arg("--log-level=warning")
            .arg(format!("--format={}", target.format))
            .arg(format!("--outfile={}", target.file.display()));

        if target.sourcemap {
            cmd = cmd.arg("--sourcemap");
        }
        for plugin in &request.plugins {
            match plugin {
                Plugin::TypeScript => {}
                Plugin::Minify => cmd = cmd.arg("--minify"),
            }
        }
        cmd = cmd.args(
            request
                .external
                .patterns()
                .iter()
                .map(|pattern| format!("--external:{}", pattern)),
        );
        cmd.args(&self.extra_args)
    }

    fn write(&self, request: &BundleRequest, target: &OutputTarget) -> Result<WrittenOutput> {
        ensure_parent(&target.file)?;
        self.command(request, target)
            .exec_and_check()
            .with_context(|| format!("failed to bundle {}", display(&request.input)))?;
        Ok(WrittenOutput::from_target(target))
    }
}

impl Default for EsbuildBundler {
    fn default() -> Self {
        EsbuildBundler::new(Self::PROGRAM)
    }
}

impl Bundler for EsbuildBundler {
    fn name(&self) -> &str {
        Self::PROGRAM
    }

    fn bundle(&self, request: &BundleRequest) -> Result<Vec<Result<WrittenOutput>>> {
        if !request.input.is_file() {
            anyhow::bail!("entry source not found: {}", display(&request.input));
        }
        Ok(request
            .outputs
            .iter()
            .map(|target| self.write(request, target))
            .collect())
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
