//! Docket CLI - versioned API reference generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "docket")]
#[command(about = "Versioned API reference generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to docket.toml config file
    #[arg(short, long, default_value = "docket.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default docket.toml
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        yes: bool,
    },

    /// Build the documentation site
    Build {
        /// Documentation records (JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory (defaults to config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the page to stdout instead of writing files
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// Version being built, overriding the config
        #[arg(long, value_name = "VERSION")]
        doc_version: Option<String>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Preview built documentation
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve
        #[arg(short, long, default_value = "dist")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `build --stdout` output stays clean
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Build {
            input,
            output,
            stdout,
            doc_version,
            no_minify,
        } => {
            let args = commands::build::BuildArgs {
                input,
                output,
                stdout,
                version: doc_version,
                minify: if no_minify { Some(false) } else { None },
            };
            commands::build::run(&cli.config, args).await?;
        }
        Commands::Serve { port, dir } => {
            commands::serve::run(port, dir).await?;
        }
    }

    Ok(())
}
