//! Command implementations

pub mod build;
pub mod completions;
pub mod externals;
pub mod sync;

use std::path::PathBuf;

use anyhow::Result;

use autobuild::util::GlobalContext;

use crate::cli::PackageArgs;

/// The package a command operates on.
pub struct PackageLocation {
    pub ctx: GlobalContext,
    pub root: PathBuf,
    pub parent: Option<PathBuf>,
}

impl PackageLocation {
    /// Resolve `--path` and `--parent` against the working directory.
    pub fn find(args: &PackageArgs) -> Result<Self> {
        let ctx = GlobalContext::new()?;
        let root = ctx.find_package_root(args.path.as_deref())?;
        let parent = ctx.find_parent_root(&root, args.parent.as_deref());

        tracing::debug!("Package root: {}", root.display());
        if let Some(parent) = &parent {
            tracing::debug!("Workspace root: {}", parent.display());
        }

        Ok(PackageLocation { ctx, root, parent })
    }
}
