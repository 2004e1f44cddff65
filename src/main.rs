//! docent CLI entry point

use clap::{Parser, Subcommand};
use docent::{
    commands::{cmd_ask, cmd_ingest, cmd_serve, cmd_status, print_answer, print_ingest_stats, print_status},
    config::Config,
};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "docent")]
#[command(version, about = "Question answering over a fixed set of crawled pages", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the configured links and build the vector index
    Ingest,

    /// Ask a single question against the index
    Ask {
        /// The question
        question: String,

        /// Number of chunks to retrieve
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Serve /ask and /health over HTTP
    Serve,

    /// Show index status
    Status,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Ingest => {
            let stats = cmd_ingest(&config).await?;
            print_ingest_stats(&stats, &config);
        }
        Commands::Ask { question, k } => {
            let k = k.unwrap_or(config.retrieval.k);
            let answer = cmd_ask(&config, &question, k).await?;
            print_answer(&answer);
        }
        Commands::Serve => {
            cmd_serve(config).await?;
        }
        Commands::Status => {
            let status = cmd_status(&config)?;
            print_status(&status);
        }
    }

    Ok(())
}
