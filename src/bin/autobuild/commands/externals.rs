//! `autobuild externals` command
//!
//! Prints the module patterns kept out of bundles, one per line.

use anyhow::Result;

use crate::cli::ExternalsArgs;
use crate::commands::PackageLocation;
use autobuild::core::{resolve_external, Manifest};

pub fn execute(args: ExternalsArgs) -> Result<()> {
    let location = PackageLocation::find(&args.package)?;

    let manifest = Manifest::load_dir(&location.root)?;
    let parent = location
        .parent
        .as_deref()
        .map(Manifest::load_dir)
        .transpose()?;

    let external = resolve_external(&manifest, parent.as_ref());
    for pattern in external.patterns() {
        println!("{}", pattern);
    }

    Ok(())
}
