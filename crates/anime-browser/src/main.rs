//! Anime browser CLI application.

use anime_browser::{browse, view, Action, Store};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use jikan::JikanClient;
use shared::{Config, LogConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Search anime and read details from the Jikan API", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search anime by title
    Search {
        query: String,

        /// Result page, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Print the search state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the full record of one anime
    Detail {
        /// MyAnimeList id
        id: u32,

        /// Print the detail state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive search with debounced input
    Browse,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let mut log_config = LogConfig::from_config(&config, "anime-browser");
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    if matches!(args.command, Command::Browse) {
        // Keep the terminal for the view
        log_config.console = false;
    }
    shared::logging::init(log_config)?;

    info!(config_file = %args.config.display(), "Anime browser starting");

    let client = JikanClient::new(&config.jikan).context("Failed to create Jikan client")?;
    let (mut store, mut completions) = Store::new(Arc::new(client), config.search.min_query_len);

    match args.command {
        Command::Search { query, page, json } => {
            if query.trim().is_empty() {
                bail!("Search query must not be empty");
            }
            store.dispatch(Action::Search { query, page });
            store.run_until_idle(&mut completions).await;

            let search = &store.state().search;
            if let Some(error) = &search.error {
                bail!("Search failed: {}", error);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(search)?);
            } else {
                print!("{}", view::render_search(search));
            }
        }
        Command::Detail { id, json } => {
            store.dispatch(Action::OpenDetail(id));
            store.run_until_idle(&mut completions).await;

            let detail = &store.state().detail;
            if let Some(error) = &detail.error {
                bail!("Failed to load anime {}: {}", id, error);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(detail)?);
            } else {
                print!("{}", view::render_detail(detail));
            }
        }
        Command::Browse => {
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            browse::run(store, completions, stdin, &mut stdout, config.search.debounce()).await?;
        }
    }

    info!("Anime browser finished");
    Ok(())
}
