//! The pair of external tools a build drives.

use std::path::{Path, PathBuf};

use crate::builder::bundler::{Bundler, EsbuildBundler};
use crate::builder::declarations::{DeclarationGenerator, DtsBundleGenerator};
use crate::util::config::{Config, ToolConfig};
use crate::util::process::find_tool;

/// Bundler and declaration generator used for one run.
pub struct Toolchain {
    bundler: Box<dyn Bundler>,
    declarations: Box<dyn DeclarationGenerator>,
}

impl Toolchain {
    /// Create a toolchain from explicit collaborators.
    pub fn new(
        bundler: impl Bundler + 'static,
        declarations: impl DeclarationGenerator + 'static,
    ) -> Self {
        Toolchain {
            bundler: Box::new(bundler),
            declarations: Box::new(declarations),
        }
    }

    /// Create the default CLI-backed toolchain.
    ///
    /// Programs are looked up in `node_modules/.bin` of each search root,
    /// then PATH. A program that cannot be found is still configured by
    /// name, so the failure surfaces per task rather than up front.
    pub fn from_config(config: &Config, search_roots: &[&Path]) -> Self {
        let bundler_program = locate(&config.bundler, EsbuildBundler::PROGRAM, search_roots);
        let dts_program = locate(&config.declarations, DtsBundleGenerator::PROGRAM, search_roots);

        Toolchain::new(
            EsbuildBundler::new(bundler_program).with_args(config.bundler.args.clone()),
            DtsBundleGenerator::new(dts_program).with_args(config.declarations.args.clone()),
        )
    }

    /// The library bundler.
    pub fn bundler(&self) -> &dyn Bundler {
        self.bundler.as_ref()
    }

    /// The declaration generator.
    pub fn declarations(&self) -> &dyn DeclarationGenerator {
        self.declarations.as_ref()
    }
}

fn locate(tool: &ToolConfig, default: &str, search_roots: &[&Path]) -> PathBuf {
    let name = tool
        .program
        .clone()
        .unwrap_or_else(|| PathBuf::from(default));

    match find_tool(&name, search_roots) {
        Some(path) => {
            tracing::debug!("Using {} at {}", default, path.display());
            path
        }
        None => {
            tracing::warn!("`{}` not found in node_modules/.bin or PATH", name.display());
            name
        }
    }
}
