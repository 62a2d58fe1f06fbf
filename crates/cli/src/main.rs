//! semsearch CLI
//!
//! Runs the semantic search HTTP service, or answers a one-off query
//! against a directory of text files.

mod commands;
mod documents;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{SearchCommand, ServeCommand};
use semsearch_core::logging::{self, LogFormat};
use semsearch_core::AppConfig;
use std::path::PathBuf;

/// semsearch - in-memory semantic search
#[derive(Parser, Debug)]
#[command(name = "semsearch")]
#[command(about = "In-memory semantic search over text documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: ./semsearch.yaml)
    #[arg(short, long, global = true, env = "SEMSEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Embedding provider (trigram, ollama)
    #[arg(short, long, global = true)]
    provider: Option<String>,

    /// Embedding model identifier
    #[arg(short, long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP search service
    Serve(ServeCommand),

    /// Index a directory in memory and run one query
    Search(SearchCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(
            cli.provider,
            cli.model,
            cli.log_level,
            cli.log_format,
            cli.verbose,
            cli.no_color,
        );

    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_format)?;

    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!(
        "Embedding: provider={}, model={}, dimensions={}",
        config.embedding.provider,
        config.embedding.model,
        config.embedding.dimensions
    );

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Search(_) => "search",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(config).await,
        Commands::Search(cmd) => cmd.execute(config).await,
    };

    match &result {
        Ok(()) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result.with_context(|| format!("semsearch {} failed", command_name))
}
