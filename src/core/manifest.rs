//! `package.json` manifest parsing and schema.
//!
//! Only the fields the orchestrator needs are lifted into typed form:
//! `name`, the keys of `dependencies`, and the `exports` map. Each export
//! entry is validated once, up front, into an [`EntrySpec`].
//!
//! Example of an `exports` map:
//!
//! ```json
//! {
//!   "exports": {
//!     "./name": {
//!       "src": "./src/name.ts",
//!       "types": "./out/name.d.ts",
//!       "import": "./out/name.js",
//!       "require": "./out/name.cjs"
//!     }
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "package.json";

/// Structural manifest failure. Any of these aborts a build.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest is not a JSON object: {}", path.display())]
    NotAnObject { path: PathBuf },

    #[error("invalid package.json: {} (missing or non-object `exports`)", path.display())]
    InvalidExports { path: PathBuf },
}

/// A validated export entry with a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    /// Entry source, relative to the manifest directory.
    pub src: String,
    /// Declaration bundle output.
    pub types: Option<String>,
    /// ES module output.
    pub import: Option<String>,
    /// CommonJS output.
    pub require: Option<String>,
}

impl ExportEntry {
    /// Whether this entry produces any output at all.
    pub fn has_outputs(&self) -> bool {
        self.types.is_some() || self.import.is_some() || self.require.is_some()
    }
}

/// Why an export entry was left out of the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry value is a string, number, array, etc.
    NotAnObject,
    /// The entry has no string `src`.
    MissingSource,
}

/// Result of validating one export entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySpec {
    Build(ExportEntry),
    Skip(SkipReason),
}

impl EntrySpec {
    /// Validate a raw `exports` value.
    pub fn from_value(value: &Value) -> EntrySpec {
        let Some(fields) = value.as_object() else {
            return EntrySpec::Skip(SkipReason::NotAnObject);
        };
        let Some(src) = fields.get("src").and_then(Value::as_str) else {
            return EntrySpec::Skip(SkipReason::MissingSource);
        };

        EntrySpec::Build(ExportEntry {
            src: src.to_string(),
            types: output_field(fields, "types"),
            import: output_field(fields, "import"),
            require: output_field(fields, "require"),
        })
    }
}

/// Empty strings count as unset.
fn output_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// One `exports` key with its validated entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub key: String,
    pub spec: EntrySpec,
}

/// A parsed `package.json`.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    name: Option<String>,
    dependencies: Vec<String>,
    exports: Option<Vec<Export>>,
}

impl Manifest {
    /// Load the manifest in `dir`.
    pub fn load_dir(dir: &Path) -> Result<Manifest, ManifestError> {
        Manifest::load(&dir.join(MANIFEST_NAME))
    }

    /// Load a manifest file.
    pub fn load(path: &Path) -> Result<Manifest, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Manifest::parse(&contents, path)
    }

    /// Parse manifest text. `path` is used for error messages and as the
    /// base directory for relative entry paths.
    pub fn parse(contents: &str, path: &Path) -> Result<Manifest, ManifestError> {
        let value: Value = serde_json::from_str(contents).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Manifest::from_value(value, path)
    }

    /// Build a manifest from an already-parsed JSON document.
    pub fn from_value(value: Value, path: &Path) -> Result<Manifest, ManifestError> {
        let Value::Object(mut doc) = value else {
            return Err(ManifestError::NotAnObject {
                path: path.to_path_buf(),
            });
        };

        let name = doc.get("name").and_then(Value::as_str).map(str::to_string);

        // A non-object `dependencies` contributes nothing.
        let dependencies = match doc.get("dependencies") {
            Some(Value::Object(deps)) => deps.keys().cloned().collect(),
            _ => Vec::new(),
        };

        let exports = match doc.remove("exports") {
            Some(Value::Object(entries)) => Some(
                entries
                    .into_iter()
                    .map(|(key, value)| Export {
                        spec: EntrySpec::from_value(&value),
                        key,
                    })
                    .collect(),
            ),
            _ => None,
        };

        Ok(Manifest {
            path: path.to_path_buf(),
            name,
            dependencies,
            exports,
        })
    }

    /// Path of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the manifest.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// The `name` field, if present.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Keys of the `dependencies` table in declaration order, unfiltered.
    pub fn dependency_names(&self) -> &[String] {
        &self.dependencies
    }

    /// The validated `exports` map.
    ///
    /// Fails when `exports` is missing or not an object.
    pub fn exports(&self) -> Result<&[Export], ManifestError> {
        self.exports
            .as_deref()
            .ok_or_else(|| ManifestError::InvalidExports {
                path: self.path.clone(),
            })
    }
}
