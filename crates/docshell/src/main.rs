//! docshell CLI - single-page static documentation site assembler.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "docshell")]
#[command(about = "Wrap extracted API documentation in a publishable HTML page")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (defaults to docshell.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output, including captured command output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default docshell.toml
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        yes: bool,
    },

    /// Regenerate the documentation page
    Build {
        /// Output HTML file (defaults to config or "doc/index.html")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop when the extraction command fails
        #[arg(long)]
        fail_fast: bool,

        /// Print each command line before running it
        #[arg(long)]
        debug: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(cli.config, yes).await?;
        }
        Commands::Build {
            output,
            fail_fast,
            debug,
        } => {
            let options = commands::build::BuildOptions {
                output,
                fail_fast,
                debug,
                verbose: cli.verbose,
            };
            commands::build::run(cli.config, options).await?;
        }
    }

    Ok(())
}
