//! Probe CLI - application debugging tool.
//!
//! Provides commands for:
//! - `router`: Describe routes
//! - `events`: Describe event listeners
//! - `container`: Describe services and parameters

mod commands;
mod error;
mod manifest;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ContainerArgs, EventsArgs, RouterArgs};
use output::Output;

/// Probe - describe routes, event listeners and container entries.
#[derive(Parser, Debug)]
#[command(name = "probe", version, about)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Display routes.
    Router(RouterArgs),
    /// Display configured listeners.
    Events(EventsArgs),
    /// Display services and parameters.
    Container(ContainerArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Router(args) => args.execute(),
        Commands::Events(args) => args.execute(),
        Commands::Container(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
