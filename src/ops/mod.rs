//! High-level operations.
//!
//! This module contains the implementation of autobuild commands.

pub mod autobuild_build;
pub mod sync;

pub use autobuild_build::{build, BuildOptions};
pub use sync::{filter_contributors, sync_contributors, sync_license, SyncError, Synced};
