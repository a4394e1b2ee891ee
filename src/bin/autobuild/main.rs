//! autobuild CLI - build library bundles and declarations for a package

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use autobuild::util::Shell;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("autobuild=debug")
    } else if cli.quiet {
        EnvFilter::new("autobuild=error")
    } else {
        EnvFilter::new("autobuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color);
    let shell = match std::env::current_dir() {
        Ok(cwd) => shell.with_display_base(cwd),
        Err(_) => shell,
    };

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &shell),
        Commands::Sync(args) => commands::sync::execute(args, &shell),
        Commands::Externals(args) => commands::externals::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
