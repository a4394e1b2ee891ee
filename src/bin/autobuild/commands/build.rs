//! `autobuild build` command

use std::path::Path;

use anyhow::Result;

use crate::cli::BuildArgs;
use crate::commands::PackageLocation;
use autobuild::builder::Toolchain;
use autobuild::ops::autobuild_build::{build, BuildOptions};
use autobuild::util::config::load_config;
use autobuild::util::Shell;

pub fn execute(args: BuildArgs, shell: &Shell) -> Result<()> {
    let location = PackageLocation::find(&args.package)?;
    let ctx = &location.ctx;

    // Load configuration (global + project)
    let config = load_config(&ctx.config_path(), &ctx.project_config_path(&location.root));

    let mut search_roots: Vec<&Path> = vec![location.root.as_path()];
    search_roots.extend(location.parent.as_deref());
    let toolchain = Toolchain::from_config(&config, &search_roots);

    // CLI flags win over config
    let opts = BuildOptions {
        parent: location.parent.clone(),
        no_sync: args.no_sync || config.build.no_sync,
        strict: args.strict || config.build.strict,
        jobs: args.jobs.or(config.build.jobs),
    };

    let report = build(&location.root, &toolchain, shell, &opts)?;
    tracing::debug!(
        "{} task(s), {} artifact(s), {} failed",
        report.tasks.len(),
        report.artifacts().count(),
        report.failures().count()
    );

    Ok(())
}
