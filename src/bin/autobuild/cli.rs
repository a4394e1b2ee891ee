//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use autobuild::util::shell::ColorChoice;

/// autobuild - build library bundles and type declarations from package.json exports
#[derive(Parser)]
#[command(name = "autobuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build every export of the current package
    Build(BuildArgs),

    /// Sync LICENSE and CONTRIBUTORS.yaml from the workspace root
    Sync(SyncArgs),

    /// Show which modules are kept out of bundles
    Externals(ExternalsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Where the package and its workspace live.
#[derive(Args)]
pub struct PackageArgs {
    /// Package directory (default: nearest directory with a package.json)
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Workspace root (default: the parent directory, if it has a package.json)
    #[arg(long, value_name = "DIR")]
    pub parent: Option<PathBuf>,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub package: PackageArgs,

    /// Do not sync LICENSE and CONTRIBUTORS.yaml after building
    #[arg(long)]
    pub no_sync: bool,

    /// Exit with an error if any task fails
    #[arg(long)]
    pub strict: bool,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct SyncArgs {
    #[command(flatten)]
    pub package: PackageArgs,

    /// Only copy LICENSE
    #[arg(long, conflicts_with = "contributors_only")]
    pub license_only: bool,

    /// Only filter CONTRIBUTORS.yaml
    #[arg(long)]
    pub contributors_only: bool,
}

#[derive(Args)]
pub struct ExternalsArgs {
    #[command(flatten)]
    pub package: PackageArgs,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
