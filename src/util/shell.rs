//! Centralized shell output and progress management.
//!
//! The Shell module provides a unified API for all CLI output:
//! - Tagged status lines (`output <path>`, `sync <move>`)
//! - A progress bar for build task fan-out (via indicatif)
//! - Path display relative to the working directory
//!
//! A `Shell` is created once per invocation and passed by reference into
//! every operation. Quiet mode suppresses all of it; fatal errors are
//! printed by the binary.

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::util::format::Palette;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: no status lines, no progress
    Quiet,
    /// Default: status messages + progress bars
    #[default]
    Normal,
    /// --verbose: status messages, debug logs, no progress bars
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status tags for output lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// An artifact was written.
    Output,
    /// A metadata file was synced from the workspace.
    Sync,
    /// A run is starting.
    Generating,
    /// A run finished.
    Done,
    /// A task failed but the run continues.
    Warning,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Output => "output",
            Status::Sync => "sync",
            Status::Generating => "generating",
            Status::Done => "done",
            Status::Warning => "warning",
        }
    }

    fn style(&self) -> Style {
        match self {
            Status::Output | Status::Sync => Style::new().green().dim(),
            Status::Generating => Style::new().blue(),
            Status::Done => Style::new().green(),
            Status::Warning => Style::new().yellow().bold(),
        }
    }
}

/// Central shell for all CLI output.
pub struct Shell {
    verbosity: Verbosity,
    palette: Palette,
    /// Paths are displayed relative to this directory when possible
    display_base: Option<PathBuf>,
    /// Bar currently drawn, if any; status lines are printed above it
    active: Mutex<Option<ProgressBar>>,
}

impl Shell {
    /// Create a new shell.
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal() && console::colors_enabled_stderr(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            palette: Palette::new(use_color),
            display_base: None,
            active: Mutex::new(None),
        }
    }

    /// Create a shell from CLI flags. Quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Shell::new(verbosity, color)
    }

    /// A shell that prints nothing and never colors.
    pub fn quiet() -> Self {
        Shell::new(Verbosity::Quiet, ColorChoice::Never)
    }

    /// Display paths relative to `base`.
    pub fn with_display_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.display_base = Some(base.into());
        self
    }

    /// Check if shell is in quiet mode.
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    /// Check if shell is in verbose mode.
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// The palette used for formatting.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Render a path for display, relative to the display base if set.
    pub fn display_path(&self, path: &Path) -> String {
        self.display_base
            .as_deref()
            .and_then(|base| pathdiff::diff_paths(path, base))
            .filter(|rel| !rel.as_os_str().is_empty())
            .unwrap_or_else(|| path.to_path_buf())
            .display()
            .to_string()
    }

    /// Print a status line: `{tag} {message}`.
    ///
    /// Nothing is printed in quiet mode.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() {
            return;
        }

        let line = format!("{} {}", self.palette.paint(&status.style(), status.as_str()), msg);
        match self.active.lock().ok().and_then(|guard| guard.clone()) {
            Some(pb) => pb.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        }
    }

    /// Print a warning line.
    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    /// Create a progress bar over `total` units of work.
    ///
    /// In quiet or verbose mode, or with fewer than two units, the bar is
    /// never drawn.
    pub fn progress(&self, total: u64, msg: impl Display) -> Progress<'_> {
        let pb = if self.is_quiet() || self.is_verbose() || total < 2 {
            None
        } else {
            let pb = ProgressBar::new(total);
            if let Ok(style) =
                ProgressStyle::default_bar().template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb.set_message(msg.to_string());
            if let Ok(mut active) = self.active.lock() {
                *active = Some(pb.clone());
            }
            Some(pb)
        };

        Progress { shell: self, pb }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}

/// Progress bar that respects shell mode. Cleared on drop.
pub struct Progress<'a> {
    shell: &'a Shell,
    pb: Option<ProgressBar>,
}

impl Progress<'_> {
    /// Advance by `delta` units.
    pub fn inc(&self, delta: u64) {
        if let Some(pb) = &self.pb {
            pb.inc(delta);
        }
    }

    /// Current position.
    pub fn position(&self) -> u64 {
        self.pb.as_ref().map(ProgressBar::position).unwrap_or(0)
    }
}

impl Drop for Progress<'_> {
    fn drop(&mut self) {
        if let Some(pb) = self.pb.take() {
            pb.finish_and_clear();
            if let Ok(mut active) = self.shell.active.lock() {
                *active = None;
            }
        }
    }
}
