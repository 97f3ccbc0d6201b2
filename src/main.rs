use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod backend;
mod components;
mod config;
mod corpus;
mod db;
mod err_responses;
mod error;
mod icons;
mod revindex;
mod search_trigger;
mod server;

use backend::Backend;
use db::Db;
use error::AppError;
use revindex::{Index, SearchResults};
use search_trigger::{
    HttpTransport, MemoryContainer, Outcome, PhraseEncoding, SearchTrigger, SharedInput,
};

/// Tool for creating an index on texts and searching phrases in it
#[derive(Parser)]
#[command(name = "revsearch")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build index by files in dir
    #[command(alias = "b")]
    Build {
        dir: PathBuf,
        /// Clear database before saving index
        #[arg(short, long)]
        clear: bool,
        /// Write the index to this file instead of the database
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Find phrase in the index
    #[command(alias = "f")]
    Find {
        phrase: String,
        /// Search an index file instead of the database
        #[arg(short, long)]
        index: Option<PathBuf>,
    },
    /// Start server for searching phrases. Main page is on /
    #[command(alias = "s")]
    Start {
        /// Serve an index file instead of the database
        #[arg(short, long)]
        index: Option<PathBuf>,
    },
    /// Search a running server and print the rendered rows
    #[command(alias = "q")]
    Query {
        phrase: String,
        #[arg(long, default_value = "http://localhost:8080")]
        server: String,
        /// Send the phrase without percent-encoding it
        #[arg(long)]
        raw: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .ok();

    let config = config::get_config()?;

    match Cli::parse().command {
        Command::Build { dir, clear, output } => {
            let index = Index::build(corpus::load_documents(&dir).await?);
            match output {
                Some(path) => {
                    index.save(std::fs::File::create(&path)?)?;
                    tracing::info!(path = %path.display(), "Saved index to file");
                }
                None => {
                    let db = Db::connect(&config).await?;
                    let saved = save_to_db(&db, &index, clear).await;
                    db.close().await;
                    saved?;
                }
            }
        }
        Command::Find { phrase, index } => {
            let backend = open_backend(index, &config).await?;
            let found = backend.find(&phrase).await;
            if let Backend::Database(db) = backend {
                db.close().await;
            }
            print_entries(&found?);
        }
        Command::Start { index } => {
            let backend = open_backend(index, &config).await?;
            server::start(&config.addr, server::AppState { backend }).await?;
        }
        Command::Query { phrase, server, raw } => {
            let container = Arc::new(MemoryContainer::default());
            let trigger = SearchTrigger::new(
                Arc::new(HttpTransport::default()),
                Arc::new(SharedInput::new(phrase)),
                container.clone(),
                format!("{}/find", server.trim_end_matches('/')),
            )
            .encoding(if raw {
                PhraseEncoding::Raw
            } else {
                PhraseEncoding::Percent
            });

            match trigger.trigger_search().await?? {
                Outcome::Rendered { .. } => {
                    let view = container.current().unwrap_or_default();
                    if view.is_empty() {
                        println!("No entries");
                    }
                    for line in view.lines() {
                        println!("{line}");
                    }
                }
                outcome => tracing::debug!(?outcome, "Nothing rendered"),
            }
        }
    }

    Ok(())
}

async fn open_backend(
    index: Option<PathBuf>,
    config: &config::AppConfig,
) -> Result<Backend, AppError> {
    match index {
        Some(path) => Backend::from_index_file(&path).await,
        None => Ok(Backend::Database(Db::connect(config).await?)),
    }
}

async fn save_to_db(db: &Db, index: &Index, clear: bool) -> Result<(), AppError> {
    if clear {
        println!("Clearing database");
        db.drop_all().await?;
    }
    db.init().await?;
    db.save_index(index).await
}

fn print_entries(results: &SearchResults) {
    if results.is_empty() {
        println!("No entries");
        return;
    }
    println!("Entries:");
    for (title, amount) in results {
        println!("{title}; entries: {amount}");
    }
}
