//! Shared utilities

pub mod config;
pub mod context;
pub mod format;
pub mod fs;
pub mod process;
pub mod shell;

pub use config::Config;
pub use context::GlobalContext;
pub use format::Palette;
pub use shell::Shell;
