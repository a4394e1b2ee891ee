//! Declaration bundle generator interface and the
//! `dts-bundle-generator` implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::builder::task::DeclarationEntry;
use crate::util::fs::read_to_string;
use crate::util::process::ProcessBuilder;

/// Produces bundled `.d.ts` text for entry sources.
pub trait DeclarationGenerator: Send + Sync {
    /// Name for logs.
    fn name(&self) -> &str;

    /// Generate one declaration bundle per entry, in the same order.
    fn generate(&self, entries: &[DeclarationEntry]) -> Result<Vec<String>>;
}

/// Generator that drives the `dts-bundle-generator` CLI.
///
/// The tool writes to a file, so each entry is generated into a scratch
/// directory and read back.
#[derive(Debug, Clone)]
pub struct DtsBundleGenerator {
    program: PathBuf,
    extra_args: Vec<String>,
}

impl DtsBundleGenerator {
    /// Default program name.
    pub const PROGRAM: &'static str = "dts-bundle-generator";

    pub fn new(program: impl Into<PathBuf>) -> Self {
        DtsBundleGenerator {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Append arguments to every invocation.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// The command that writes `entry`'s bundle to `out_file`.
    pub fn command(&self, entry: &DeclarationEntry, out_file: &std::path::Path) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .arg("--silent")
            .arg("-o")
            .arg(out_file)
            .args(&self.extra_args)
            .arg(&entry.file_path)
    }

    fn generate_one(&self, entry: &DeclarationEntry, scratch: &TempDir, index: usize) -> Result<String> {
        let out_file = scratch.path().join(format!("{}.d.ts", index));
        self.command(entry, &out_file).exec_and_check().with_context(|| {
            format!(
                "failed to generate declarations for {}",
                entry.file_path.display()
            )
        })?;
        read_to_string(&out_file)
    }
}

impl Default for DtsBundleGenerator {
    fn default() -> Self {
        DtsBundleGenerator::new(Self::PROGRAM)
    }
}

impl DeclarationGenerator for DtsBundleGenerator {
    fn name(&self) -> &str {
        Self::PROGRAM
    }

    fn generate(&self, entries: &[DeclarationEntry]) -> Result<Vec<String>> {
        let scratch = TempDir::new().context("failed to create scratch directory")?;
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| self.generate_one(entry, &scratch, index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_command_line() {
        let entry = DeclarationEntry {
            file_path: PathBuf::from("src/index.ts"),
        };
        let cmd = DtsBundleGenerator::default()
            .with_args(vec!["--no-check".to_string()])
            .command(&entry, Path::new("scratch/0.d.ts"));

        assert_eq!(cmd.get_program(), Path::new("dts-bundle-generator"));
        assert_eq!(
            cmd.get_args(),
            ["--silent", "-o", "scratch/0.d.ts", "--no-check", "src/index.ts"]
        );
    }

    #[test]
    fn test_missing_program_fails() {
        let generator = DtsBundleGenerator::new("autobuild-no-such-dts-tool");
        let entry = DeclarationEntry {
            file_path: PathBuf::from("src/index.ts"),
        };
        assert!(generator.generate(&[entry]).is_err());
    }

    #[test]
    fn test_no_entries() {
        let generator = DtsBundleGenerator::new("autobuild-no-such-dts-tool");
        assert_eq!(generator.generate(&[]).unwrap(), Vec::<String>::new());
    }
}
