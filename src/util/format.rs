//! Compact path and duration rendering for status lines.
//!
//! Paths are rendered with a dimmed parent and an emphasized file name.
//! Moves between two paths share their common prefix, so
//! `pkg/LICENSE -> pkg/child/LICENSE` renders as `pkg (LICENSE => child/LICENSE)`.

use std::path::MAIN_SEPARATOR_STR as SEP;
use std::time::Duration;

use console::Style;

/// Color capability used by every formatter in this module.
///
/// Passed explicitly rather than read from a global so that tests and
/// quiet runs can render plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    use_color: bool,
}

impl Palette {
    /// Create a palette that emits ANSI styling when `use_color` is set.
    pub fn new(use_color: bool) -> Self {
        Palette { use_color }
    }

    /// A palette that never emits escape codes.
    pub fn plain() -> Self {
        Palette { use_color: false }
    }

    /// Whether escape codes are emitted.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Apply a style to some text.
    pub fn paint(&self, style: &Style, text: impl std::fmt::Display) -> String {
        style
            .clone()
            .force_styling(self.use_color)
            .apply_to(text)
            .to_string()
    }

    /// Dim some text.
    pub fn dim(&self, text: impl std::fmt::Display) -> String {
        self.paint(&Style::new().dim(), text)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::new(console::colors_enabled_stderr())
    }
}

/// Where two paths diverge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathDiff {
    /// Segments shared by both paths, joined by the separator.
    pub common: String,
    /// Remainder of the source path after `common`.
    pub from: String,
    /// Remainder of the destination path after `common`.
    pub to: String,
}

/// Compute the divergence point between two paths.
///
/// Operates on the literal segments: no normalization, no symlink
/// resolution, no case folding. A segment missing from the shorter path
/// never equals a present one.
pub fn diff_path(from: &str, to: &str) -> PathDiff {
    let from_parts: Vec<&str> = from.split(SEP).collect();
    let to_parts: Vec<&str> = to.split(SEP).collect();

    for i in 0..from_parts.len().max(to_parts.len()) {
        if from_parts.get(i) != to_parts.get(i) {
            return PathDiff {
                common: join_segments(&from_parts[..i.min(from_parts.len())]),
                from: join_segments(from_parts.get(i..).unwrap_or_default()),
                to: join_segments(to_parts.get(i..).unwrap_or_default()),
            };
        }
    }

    PathDiff {
        common: from.to_string(),
        from: String::new(),
        to: String::new(),
    }
}

fn join_segments(parts: &[&str]) -> String {
    parts.join(SEP)
}

/// Render a path with a dimmed parent and an emphasized file name.
pub fn format_path(raw: &str, emphasis: &Style, palette: &Palette) -> String {
    let trimmed = raw.trim_end_matches(SEP);
    let trimmed = if trimmed.is_empty() { raw } else { trimmed };

    match trimmed.rsplit_once(SEP) {
        None => palette.paint(emphasis, trimmed),
        Some(("", base)) => format!("{}{}", palette.dim(SEP), palette.paint(emphasis, base)),
        Some((dir, base)) => format!(
            "{}{}{}",
            palette.dim(dir),
            palette.dim(SEP),
            palette.paint(emphasis, base)
        ),
    }
}

/// Render a move from one path to another around their common prefix.
///
/// A move onto itself renders as `<path> (self)`.
pub fn format_move(from: &str, to: &str, emphasis: &Style, palette: &Palette) -> String {
    let diff = diff_path(from, to);
    let from_suffix = placeholder(&diff.from);
    let to_suffix = placeholder(&diff.to);

    if from_suffix == "." && to_suffix == "." {
        return format!(
            "{} {}",
            format_path(&diff.common, emphasis, palette),
            palette.dim("(self)")
        );
    }

    [
        palette.dim(&diff.common),
        palette.dim(" ("),
        format_path(from_suffix, &emphasis.clone().dim(), palette),
        palette.dim(" => "),
        format_path(to_suffix, emphasis, palette),
        palette.dim(")"),
    ]
    .concat()
}

fn placeholder(suffix: &str) -> &str {
    if suffix.is_empty() {
        "."
    } else {
        suffix
    }
}

/// Render an elapsed duration as `N ms` or `S s M ms`.
pub fn format_duration(duration: Duration, palette: &Palette) -> String {
    let cyan = Style::new().cyan();
    let millis = duration.as_millis();
    if millis < 1000 {
        return format!("{} {}", palette.paint(&cyan, millis), palette.dim("ms"));
    }
    let ms = millis % 1000;
    let s = millis / 1000;
    format!(
        "{} {} {} {}",
        palette.paint(&cyan, s),
        palette.dim("s"),
        palette.paint(&cyan, ms),
        palette.dim("ms")
    )
}
