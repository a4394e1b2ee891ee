//! Build tasks planned from a manifest's `exports`.
//!
//! Planning is pure: it turns validated export entries into
//! [`BuildTask`]s without touching the filesystem or any tool.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::external::ExternalPredicate;
use crate::core::manifest::{EntrySpec, Export, ExportEntry, SkipReason};

/// Module format of a library output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// ES module (`import`)
    Esm,
    /// CommonJS (`require`)
    Cjs,
}

impl OutputFormat {
    /// Name used on bundler command lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Esm => "esm",
            OutputFormat::Cjs => "cjs",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file a library bundle writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub file: PathBuf,
    pub format: OutputFormat,
    pub sourcemap: bool,
}

impl OutputTarget {
    /// An output with a companion source map.
    pub fn with_sourcemap(file: PathBuf, format: OutputFormat) -> Self {
        OutputTarget {
            file,
            format,
            sourcemap: true,
        }
    }

    /// `<file>.map`, if this target requests a source map.
    pub fn map_file(&self) -> Option<PathBuf> {
        if !self.sourcemap {
            return None;
        }
        let mut name = self.file.clone().into_os_string();
        name.push(".map");
        Some(PathBuf::from(name))
    }
}

/// Transform applied to every library bundle, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plugin {
    /// TypeScript to JavaScript.
    TypeScript,
    /// Minification.
    Minify,
}

/// The fixed transform pipeline.
pub const DEFAULT_PLUGINS: [Plugin; 2] = [Plugin::TypeScript, Plugin::Minify];

/// Everything a bundler needs to produce one entry's library outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRequest {
    pub plugins: Vec<Plugin>,
    pub external: ExternalPredicate,
    pub input: PathBuf,
    pub outputs: Vec<OutputTarget>,
}

/// Input to the declaration generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationEntry {
    pub file_path: PathBuf,
}

/// Declaration bundle for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationTask {
    pub entry: DeclarationEntry,
    pub output: PathBuf,
}

/// What a task produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Library(BundleRequest),
    Declarations(DeclarationTask),
}

/// A unit of work bound to one export entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTask {
    /// The `exports` key this task was planned from.
    pub key: String,
    pub kind: TaskKind,
}

impl BuildTask {
    /// Short label for logs: `./name (library)`.
    pub fn label(&self) -> String {
        let kind = match self.kind {
            TaskKind::Library(_) => "library",
            TaskKind::Declarations(_) => "declarations",
        };
        format!("{} ({})", self.key, kind)
    }
}

/// Tasks planned for a manifest, plus the entries that were left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPlan {
    pub tasks: Vec<BuildTask>,
    pub skipped: Vec<(String, SkipReason)>,
}

/// Plan every task for `exports`, resolving paths against `root`.
///
/// Malformed entries are recorded as skipped and produce no task.
pub fn plan_tasks(exports: &[Export], root: &Path, external: &ExternalPredicate) -> TaskPlan {
    let mut plan = TaskPlan::default();

    for export in exports {
        match &export.spec {
            EntrySpec::Skip(reason) => {
                tracing::debug!("Skipping export `{}`: {:?}", export.key, reason);
                plan.skipped.push((export.key.clone(), *reason));
            }
            EntrySpec::Build(entry) if !entry.has_outputs() => {
                tracing::debug!("Export `{}` declares no outputs", export.key);
            }
            EntrySpec::Build(entry) => {
                plan.tasks
                    .extend(plan_entry(&export.key, entry, root, external));
            }
        }
    }

    plan
}

fn plan_entry(
    key: &str,
    entry: &ExportEntry,
    root: &Path,
    external: &ExternalPredicate,
) -> Vec<BuildTask> {
    let input = resolve(root, &entry.src);
    let mut tasks = Vec::new();

    let mut outputs = Vec::new();
    if let Some(import) = &entry.import {
        outputs.push(OutputTarget::with_sourcemap(resolve(root, import), OutputFormat::Esm));
    }
    if let Some(require) = &entry.require {
        outputs.push(OutputTarget::with_sourcemap(resolve(root, require), OutputFormat::Cjs));
    }

    if !outputs.is_empty() {
        tasks.push(BuildTask {
            key: key.to_string(),
            kind: TaskKind::Library(BundleRequest {
                plugins: DEFAULT_PLUGINS.to_vec(),
                external: external.clone(),
                input: input.clone(),
                outputs,
            }),
        });
    }

    if let Some(types) = &entry.types {
        tasks.push(BuildTask {
            key: key.to_string(),
            kind: TaskKind::Declarations(DeclarationTask {
                entry: DeclarationEntry { file_path: input },
                output: resolve(root, types),
            }),
        });
    }

    tasks
}

/// Join a manifest-relative path onto `root`, dropping a leading `./`.
fn resolve(root: &Path, relative: &str) -> PathBuf {
    let relative = Path::new(relative);
    root.join(relative.strip_prefix(".").unwrap_or(relative))
}
