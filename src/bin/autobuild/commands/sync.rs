//! `autobuild sync` command

use anyhow::{bail, Result};

use crate::cli::SyncArgs;
use crate::commands::PackageLocation;
use autobuild::ops::sync::{sync_contributors, sync_license};
use autobuild::util::Shell;

pub fn execute(args: SyncArgs, shell: &Shell) -> Result<()> {
    let location = PackageLocation::find(&args.package)?;

    let Some(monorepo) = location.parent.as_deref() else {
        bail!(
            "no workspace root found above {}\n\
             hint: pass --parent <DIR>",
            location.root.display()
        );
    };

    if !args.contributors_only {
        sync_license(&location.root, monorepo, shell)?;
    }
    if !args.license_only {
        sync_contributors(&location.root, monorepo, shell)?;
    }

    Ok(())
}
