//! mdpush CLI - publish markdown documents into a JCR content repository.
//!
//! Provides commands for:
//! - `sync`: Render matching markdown files and upsert them remotely
//! - `render`: Print the rendered HTML and frontmatter of one file

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RenderArgs, SyncArgs};
use output::Output;

/// mdpush - markdown to JCR publisher.
#[derive(Parser)]
#[command(name = "mdpush", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render markdown files and sync them into the content repository.
    Sync(SyncArgs),
    /// Render one markdown file and print the result.
    Render(RenderArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Sync(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Sync(args) => args.execute(),
        Commands::Render(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {}", error::error_chain(&err)));
        std::process::exit(1);
    }
}
