//! autobuild - build library bundles and type declarations for a
//! package from its `package.json` exports.
//!
//! This crate provides the core library functionality for autobuild,
//! including manifest loading, external dependency resolution, and
//! concurrent build orchestration.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use builder::{build_as_manifest, BuildReport, Toolchain};
pub use core::{ExternalPredicate, Manifest};
pub use util::context::GlobalContext;
