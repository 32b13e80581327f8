//! Overlay CLI - Remote-Control Session Replay
//!
//! Features:
//! - Replay scripted remote/touch input against the transport controls
//! - Validate controls configuration files
//! - Print key-repeat acceleration sequences

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod script;

/// Overlay CLI - Transport controls toolkit
#[derive(Parser)]
#[command(name = "overlay-cli")]
#[command(author = "Purple Squirrel Media")]
#[command(version)]
#[command(about = "Replay and inspect TV remote-control sessions", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Controls configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scripted session
    Replay {
        /// Script file (JSON)
        script: PathBuf,
    },

    /// Validate and print the effective configuration
    Config,

    /// Print seek speeds for a sequence of debounced bursts
    Speeds {
        /// Direction (forward, rewind)
        #[arg(short, long, default_value = "forward")]
        direction: String,

        /// Number of consecutive bursts
        #[arg(short, long, default_value = "10")]
        bursts: u32,

        /// Presses per burst
        #[arg(short, long, default_value = "2")]
        presses: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if cli.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    overlay_core::init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Replay { script } => {
            commands::replay(&script, config, &cli.format).await?;
        }
        Commands::Config => {
            commands::show_config(&config, &cli.format);
        }
        Commands::Speeds { direction, bursts, presses } => {
            commands::speeds(&direction, bursts, presses, &cli.format);
        }
    }

    Ok(())
}
