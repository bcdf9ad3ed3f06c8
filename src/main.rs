//! quotepick: mode-aware RAG quote recommendation service
//!
//! Embeds user input, retrieves candidate quotes by vector similarity and
//! asks a language model to pick the one that fits the requested tone.

use anyhow::Result;
use clap::{Parser, Subcommand};
use quotepick::{
    config::Config,
    embedding::{Embedder, GeminiEmbedder},
    ingest,
    llm::{Generator, GeminiGenerator},
    pipeline::{PickOptions, QuotePicker},
    server::{AppState, HttpServer},
    store::{PostgrestStore, QuoteStore},
    types::Mode,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "quotepick")]
#[command(about = "Mode-aware quote recommendation service")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Listen address (overrides config)
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Pick a single quote from the command line
    Pick {
        /// Input text (may be empty for random mode)
        #[arg(default_value = "")]
        text: String,

        /// Mode: harsh, comfort or random
        #[arg(short, long, default_value = "comfort")]
        mode: Mode,
    },

    /// Ingest a JSON file of quotes into the store
    Ingest {
        /// Path to the quote file
        path: PathBuf,
    },

    /// Report configuration and credential status
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Serve { listen } => serve(config, listen).await,
        Commands::Pick { text, mode } => pick_once(config, text, mode).await,
        Commands::Ingest { path } => ingest_quotes(config, path).await,
        Commands::Check => check(config),
    }
}

/// Construct the shared client handles and the pipeline.
///
/// Fails fast when credentials are missing: a service that cannot reach its
/// collaborators should not start.
fn build_picker(config: &Config) -> Result<(Arc<QuotePicker>, Arc<dyn QuoteStore>)> {
    let embedder: Arc<dyn Embedder> = Arc::new(GeminiEmbedder::new(&config.embedding)?);
    let generator: Arc<dyn Generator> = Arc::new(GeminiGenerator::new(&config.llm)?);
    let store: Arc<dyn QuoteStore> = Arc::new(PostgrestStore::new(&config.store)?);

    let picker = Arc::new(QuotePicker::new(
        embedder,
        store.clone(),
        generator,
        PickOptions::from(config.retrieval.clone()),
    ));
    Ok((picker, store))
}

async fn serve(mut config: Config, listen: Option<String>) -> Result<()> {
    if let Some(listen) = listen {
        config.http.listen_addr = listen;
    }
    config.warn_missing_credentials();

    let (picker, store) = build_picker(&config)?;
    let state = AppState { picker, store };

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received ctrl-c, shutting down");
            let _ = shutdown_tx.send(());
        }
    });

    HttpServer::new(config.http.clone(), state)
        .run(shutdown_rx)
        .await
}

async fn pick_once(config: Config, text: String, mode: Mode) -> Result<()> {
    let (picker, _store) = build_picker(&config)?;
    let picked = picker.pick(&text, mode).await?;

    println!("{}", picked.quote.text);
    println!("  - {} ({})", picked.quote.author, picked.quote.source);
    Ok(())
}

async fn ingest_quotes(config: Config, path: PathBuf) -> Result<()> {
    let embedder = GeminiEmbedder::new(&config.embedding)?;
    let store = PostgrestStore::new(&config.store)?;

    let summary = ingest::ingest_file(&path, &embedder, &store).await?;
    println!(
        "Ingested {} quotes ({} failed)",
        summary.inserted, summary.failed
    );
    Ok(())
}

fn check(config: Config) -> Result<()> {
    let present = |set: bool| if set { "present" } else { "missing" };

    println!("listen address:    {}", config.http.listen_addr);
    println!("embedding model:   {} ({} dims)", config.embedding.model, config.embedding.dimensions);
    println!("llm model:         {}", config.llm.model);
    println!(
        "retrieval:         threshold={}, top_k={}",
        config.retrieval.match_threshold, config.retrieval.top_k
    );
    println!("google api key:    {}", present(config.embedding.api_key.is_some()));
    println!("supabase url:      {}", present(config.store.url.is_some()));
    println!("supabase key:      {}", present(config.store.service_key.is_some()));

    config.warn_missing_credentials();
    Ok(())
}
