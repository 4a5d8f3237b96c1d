//! Dost CLI: the main entry point.
//!
//! Commands:
//! - `init`    Create the config directory, config.toml and a secrets template
//! - `chat`    Interactive tutoring session with slash commands and PDF export
//! - `ask`     Send a single question, optionally exporting the exchange
//! - `doctor`  Diagnose configuration, credentials, font and provider

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "dost",
    about = "Dost: a DSA tutor chat for the terminal",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create ~/.dost with a default config and secrets template
    Init,

    /// Start an interactive chat session
    Chat {
        /// Write the transcript as a PDF to this path when the session ends
        #[arg(long, value_name = "PATH")]
        export_on_exit: Option<PathBuf>,
    },

    /// Ask a single question and print the reply
    Ask {
        /// The question to send
        #[arg(short, long)]
        message: String,

        /// Also export the exchange as a PDF to this path
        #[arg(long, value_name = "PATH")]
        pdf: Option<PathBuf>,
    },

    /// Diagnose configuration and connectivity
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so replies on stdout stay clean
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Chat { export_on_exit } => commands::chat::run(export_on_exit).await?,
        Commands::Ask { message, pdf } => commands::ask::run(message, pdf).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
