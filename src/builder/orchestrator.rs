//! Manifest-driven build orchestration.
//!
//! One run loads `package.json`, computes the external predicate once,
//! plans a library task and/or a declaration task per export entry, and
//! runs every task on the rayon pool. Every task settles: a failing entry
//! never cancels its siblings and never fails the run.

use std::path::{Path, PathBuf};

use console::Style;
use rayon::prelude::*;

use crate::builder::task::{plan_tasks, BuildTask, BundleRequest, DeclarationTask, TaskKind};
use crate::builder::toolchain::Toolchain;
use crate::core::external::resolve_external;
use crate::core::manifest::{Manifest, ManifestError, SkipReason};
use crate::util::format::format_path;
use crate::util::fs::write_string;
use crate::util::shell::{Shell, Status};

/// How a task settled.
#[derive(Debug)]
pub enum TaskOutcome {
    Fulfilled,
    Rejected(anyhow::Error),
}

impl TaskOutcome {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, TaskOutcome::Fulfilled)
    }
}

/// A task after it settled, with whatever it managed to write.
#[derive(Debug)]
pub struct SettledTask {
    pub task: BuildTask,
    pub artifacts: Vec<PathBuf>,
    pub outcome: TaskOutcome,
}

/// Result of one orchestration run.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Settled tasks, in planning order.
    pub tasks: Vec<SettledTask>,
    /// Export keys left out of the build.
    pub skipped: Vec<(String, SkipReason)>,
}

impl BuildReport {
    /// Tasks that failed.
    pub fn failures(&self) -> impl Iterator<Item = &SettledTask> {
        self.tasks.iter().filter(|t| !t.outcome.is_fulfilled())
    }

    /// Whether every task succeeded.
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Every file written by the run, in planning order.
    pub fn artifacts(&self) -> impl Iterator<Item = &Path> {
        self.tasks
            .iter()
            .flat_map(|t| t.artifacts.iter().map(PathBuf::as_path))
    }
}

/// Options for a single orchestration run.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorOptions {
    /// Worker threads for the run (None = the global rayon pool).
    pub jobs: Option<usize>,
}

/// Build every export of the package at `root`.
///
/// `parent_root`, when given, names the workspace whose dependencies are
/// also kept external. Only structural manifest problems fail the call;
/// task failures are reported in the returned [`BuildReport`].
pub fn build_as_manifest(
    root: &Path,
    parent_root: Option<&Path>,
    toolchain: &Toolchain,
    shell: &Shell,
    opts: &OrchestratorOptions,
) -> Result<BuildReport, ManifestError> {
    let manifest = Manifest::load_dir(root)?;
    let exports = manifest.exports()?;
    let parent = parent_root.map(Manifest::load_dir).transpose()?;

    let external = resolve_external(&manifest, parent.as_ref());
    let plan = plan_tasks(exports, root, &external);
    tracing::debug!(
        "Planned {} task(s), skipped {} export(s)",
        plan.tasks.len(),
        plan.skipped.len()
    );

    let tasks = run_tasks(plan.tasks, toolchain, shell, opts.jobs);
    Ok(BuildReport {
        tasks,
        skipped: plan.skipped,
    })
}

/// Run tasks concurrently and wait for all of them to settle.
pub fn run_tasks(
    tasks: Vec<BuildTask>,
    toolchain: &Toolchain,
    shell: &Shell,
    jobs: Option<usize>,
) -> Vec<SettledTask> {
    let progress = shell.progress(tasks.len() as u64, "building");

    let run = || {
        tasks
            .into_par_iter()
            .map(|task| {
                let settled = run_task(task, toolchain, shell);
                progress.inc(1);
                settled
            })
            .collect::<Vec<SettledTask>>()
    };

    match jobs {
        Some(j) => match rayon::ThreadPoolBuilder::new().num_threads(j).build() {
            Ok(pool) => pool.install(run),
            Err(e) => {
                tracing::warn!("Failed to create a {}-thread pool: {}", j, e);
                run()
            }
        },
        None => run(),
    }
}

fn run_task(task: BuildTask, toolchain: &Toolchain, shell: &Shell) -> SettledTask {
    tracing::debug!("Starting {}", task.label());
    let mut artifacts = Vec::new();

    let result = match &task.kind {
        TaskKind::Library(request) => build_library(request, toolchain, shell, &mut artifacts),
        TaskKind::Declarations(decl) => build_declarations(decl, toolchain, shell, &mut artifacts),
    };

    let outcome = match result {
        Ok(()) => TaskOutcome::Fulfilled,
        Err(e) => {
            tracing::debug!("{} failed: {:#}", task.label(), e);
            TaskOutcome::Rejected(e)
        }
    };

    SettledTask {
        task,
        artifacts,
        outcome,
    }
}

fn build_library(
    request: &BundleRequest,
    toolchain: &Toolchain,
    shell: &Shell,
    artifacts: &mut Vec<PathBuf>,
) -> anyhow::Result<()> {
    let results = toolchain.bundler().bundle(request)?;

    let mut first_error = None;
    for result in results {
        match result {
            Ok(written) => {
                report_output(shell, &written.file, &Style::new().yellow());
                artifacts.push(written.file);
                if let Some(map) = written.source_map {
                    report_output(shell, &map, &Style::new().yellow().bright().dim());
                    artifacts.push(map);
                }
            }
            Err(e) if first_error.is_none() => first_error = Some(e),
            Err(e) => tracing::warn!("{:#}", e),
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn build_declarations(
    task: &DeclarationTask,
    toolchain: &Toolchain,
    shell: &Shell,
    artifacts: &mut Vec<PathBuf>,
) -> anyhow::Result<()> {
    let content = toolchain
        .declarations()
        .generate(std::slice::from_ref(&task.entry))?
        .into_iter()
        .next()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "{} returned no declarations for {}",
                toolchain.declarations().name(),
                task.entry.file_path.display()
            )
        })?;

    write_string(&task.output, &content)?;
    report_output(shell, &task.output, &Style::new().blue());
    artifacts.push(task.output.clone());
    Ok(())
}

fn report_output(shell: &Shell, path: &Path, emphasis: &Style) {
    let shown = shell.display_path(path);
    shell.status(
        Status::Output,
        format_path(&shown, emphasis, shell.palette()),
    );
}
