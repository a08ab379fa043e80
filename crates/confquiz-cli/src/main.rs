//! confquiz CLI — play confidence-rated quiz sessions from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use confquiz_core::model::Locale;

mod commands;

#[derive(Parser)]
#[command(name = "confquiz", version, about = "Confidence-rated quiz client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a quiz session
    Play {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Question language: en or de (overrides the config)
        #[arg(long)]
        language: Option<Locale>,

        /// Seed for the option order, for reproducible sessions
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Check that the quiz service is reachable
    Health {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter confquiz.toml
    Init,

    /// Render an exported session result
    Show {
        /// Result JSON written by `confquiz play`
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("confquiz=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            config,
            language,
            seed,
        } => commands::play::execute(config, language, seed).await,
        Commands::Health { config } => commands::health::execute(config).await,
        Commands::Init => commands::init::execute(),
        Commands::Show { file } => commands::show::execute(file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
