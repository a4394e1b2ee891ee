//! Library and declaration builds.
//!
//! Export entries become [`BuildTask`]s, which run against a
//! [`Toolchain`] of external tools.

pub mod bundler;
pub mod declarations;
pub mod orchestrator;
pub mod task;
pub mod toolchain;

pub use bundler::{Bundler, EsbuildBundler, WrittenOutput};
pub use declarations::{DeclarationGenerator, DtsBundleGenerator};
pub use orchestrator::{
    build_as_manifest, run_tasks, BuildReport, OrchestratorOptions, SettledTask, TaskOutcome,
};
pub use task::{plan_tasks, BuildTask, BundleRequest, OutputFormat, OutputTarget, TaskKind};
pub use toolchain::Toolchain;
