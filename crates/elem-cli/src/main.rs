//! elem CLI - HTML builder demos.
//!
//! Provides commands for:
//! - `demo`: Render one of the bundled demo pages
//! - `fmt`: Re-indent an HTML file with the configured layout

mod commands;
mod error;
mod output;
mod pages;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{DemoArgs, FmtArgs};
use output::Output;

/// elem - programmatic HTML builder.
#[derive(Parser)]
#[command(name = "elem", version, about)]
struct Cli {
    /// Enable info-level logging (overrides `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a bundled demo page.
    Demo(DemoArgs),
    /// Re-indent an HTML document.
    Fmt(FmtArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise RUST_LOG applies (ERROR when unset)
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
        Commands::Demo(args) => args.execute(),
        Commands::Fmt(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
