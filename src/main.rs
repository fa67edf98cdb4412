//! quran-drawer: debounced Quran search drawer with an audio play/pause control
//!
//! Usage:
//!   quran-drawer                 - Interactive drawer on stdin
//!   quran-drawer search <query>  - One-shot search, JSON on stdout
//!   quran-drawer history         - Show search history
//!   quran-drawer history --clear - Forget search history
//!   quran-drawer history --remove <id> - Forget one entry

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use uuid::Uuid;

use quran_drawer::app::App;
use quran_drawer::audio::AudioPlayer;
use quran_drawer::backend::api::BackendClient;
use quran_drawer::backend::types::{SearchRequest, SearchService};
use quran_drawer::config::Config;
use quran_drawer::error::ConfigError;
use quran_drawer::history::SearchHistory;
use quran_drawer::search::SearchDrawer;
use quran_drawer::store::{AppStore, AudioPlayerSettings};
use quran_drawer::telemetry::{TelemetrySink, TracingTelemetry};

#[derive(Debug, Parser)]
#[command(name = "quran-drawer", version, about = "Debounced Quran search drawer")]
struct Cli {
    /// Config file (defaults to <config dir>/quran-drawer/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Search API base URL
    #[arg(long, global = true)]
    search_url: Option<String>,

    /// Quiet period before a typed query is searched
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,

    /// Translation ids to include, comma separated
    #[arg(long, global = true, value_delimiter = ',')]
    translations: Option<Vec<u32>>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Interactive search drawer (default)
    Drawer,
    /// Run a single search and print the JSON response
    Search { query: String },
    /// Show, prune or clear the search history
    History {
        #[arg(long)]
        clear: bool,

        /// Remove one entry by id
        #[arg(long, conflicts_with = "clear")]
        remove: Option<Uuid>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config);
    tracing::debug!(?config, "configuration loaded");

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = rt.block_on(async {
        match cli.command.unwrap_or(CliCommand::Drawer) {
            CliCommand::Drawer => run_drawer(config).await,
            CliCommand::Search { query } => run_search(config, query).await,
            CliCommand::History { clear, remove } => run_history(config, clear, remove),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

type AppResult = Result<(), Box<dyn std::error::Error>>;

fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = &cli.search_url {
        config.search_api_url.clone_from(url);
    }
    if let Some(ms) = cli.debounce_ms {
        config.debounce_ms = ms;
    }
    if let Some(ids) = &cli.translations {
        config.translations.clone_from(ids);
    }
    config.validate()?;
    Ok(config)
}

fn init_logging(config: &Config) {
    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn build_client(config: &Config) -> Result<Arc<BackendClient>, ConfigError> {
    let client = BackendClient::new(&config.search_api_url, &config.api_url, config.request_timeout())?;
    Ok(Arc::new(client))
}

fn load_history(config: &Config) -> (SearchHistory, Option<PathBuf>) {
    let Some(path) = SearchHistory::default_path() else {
        return (SearchHistory::with_limit(config.history_limit), None);
    };
    match SearchHistory::load(&path, config.history_limit) {
        Ok(history) => (history, Some(path)),
        Err(e) => {
            tracing::warn!("Ignoring unreadable search history {:?}: {}", path, e);
            (SearchHistory::with_limit(config.history_limit), Some(path))
        }
    }
}

async fn run_drawer(config: Config) -> AppResult {
    tracing::info!("Starting search drawer...");

    let backend = build_client(&config)?;
    let (history, history_path) = load_history(&config);
    let store = AppStore::new(
        config.translations.clone(),
        AudioPlayerSettings {
            playback_rate: config.playback_rate,
            reciter_id: config.reciter_id,
            ..AudioPlayerSettings::default()
        },
        history,
    );
    let telemetry: Arc<dyn TelemetrySink> = Arc::new(TracingTelemetry);

    let (drawer, drawer_task) =
        SearchDrawer::spawn(Arc::clone(&backend), store.clone(), Arc::clone(&telemetry), config.debounce());
    let audio = AudioPlayer::new(backend, store.clone());

    App::new(drawer, audio, store, telemetry, history_path).run().await?;

    // Dropping the last handle lets the drawer loop finish
    drawer_task.await?;
    Ok(())
}

async fn run_search(config: Config, query: String) -> AppResult {
    let backend = build_client(&config)?;
    let request = SearchRequest::quick(query, config.translations.clone());
    let response = backend
        .get_search_results(&request)
        .await?
        .with_service(SearchService::Kalimat);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn run_history(config: Config, clear: bool, remove: Option<Uuid>) -> AppResult {
    let (history, path) = load_history(&config);
    if clear || remove.is_some() {
        let message = match remove {
            Some(id) if history.remove(id) => "Removed history entry",
            Some(_) => "No history entry with that id",
            None => {
                history.clear();
                "Search history cleared"
            }
        };
        if let Some(path) = &path {
            history.save(path)?;
        }
        println!("{}", message);
        return Ok(());
    }

    if history.is_empty() {
        println!("No search history");
    }
    for entry in history.entries() {
        println!("{}\t{}\t{}", entry.id, entry.query, entry.source.as_str());
    }
    Ok(())
}
