//! Core data structures for autobuild.
//!
//! - Package manifests and their export entries
//! - Dependency name validation
//! - The external-module predicate

pub mod external;
pub mod manifest;
pub mod package_name;

pub use external::{collect_dependencies, resolve_external, ExternalPredicate};
pub use manifest::{
    EntrySpec, Export, ExportEntry, Manifest, ManifestError, SkipReason, MANIFEST_NAME,
};
pub use package_name::is_valid_package_name;
