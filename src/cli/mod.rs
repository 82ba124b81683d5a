//! CLI parser and dispatch.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::load_settings;

#[derive(Parser)]
#[command(name = "pinsort")]
#[command(about = "Parcel scan logging and PIN-code reconciliation")]
#[command(version)]
pub struct Cli {
    /// Data directory (overrides config file)
    #[arg(long, short = 't', global = true)]
    target: Option<PathBuf>,

    /// Config file path (default: pinsort.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Scan label images and log them into the working session
    Scan {
        /// Image file(s) to scan
        images: Vec<PathBuf>,
    },

    /// Show the working session and archive summary
    Status,

    /// Finalize the working session into an exported manifest
    Finalize {
        /// Operator name stamped on the manifest
        #[arg(short = 'O', long, env = "PINSORT_OPERATOR")]
        operator: Option<String>,
        /// Output directory for the manifest CSV (default: config export_dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Manage finalized session history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List archived manifests
    List,
    /// Re-export an archived manifest as CSV
    Export {
        /// Session id (e.g. B482913)
        session_id: String,
        /// Output directory (default: config export_dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Clear archived manifests and the working snapshot
    Clear {
        /// Confirm clearing
        #[arg(long)]
        confirm: bool,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(target) = cli.target {
        settings.data_dir = target;
    }

    match cli.command {
        Commands::Scan { images } => commands::cmd_scan(&settings, &images).await,
        Commands::Status => commands::cmd_status(&settings),
        Commands::Finalize { operator, out } => {
            commands::cmd_finalize(&settings, operator, out).await
        }
        Commands::History { command } => match command {
            HistoryCommands::List => commands::cmd_history_list(&settings),
            HistoryCommands::Export { session_id, out } => {
                commands::cmd_history_export(&settings, &session_id, out)
            }
            HistoryCommands::Clear { confirm } => commands::cmd_history_clear(&settings, confirm),
        },
    }
}
