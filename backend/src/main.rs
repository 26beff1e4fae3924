mod config;
mod core;
mod infra;

use std::sync::Arc;

use config::Config;
use core::search::MovieCatalog;
use infra::file_storage::FileStorage;
use infra::omdb::OmdbClient;
use infra::terminal::TerminalInput;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    // Load .env (silently ignore if missing; production uses real env vars)
    let dotenv = dotenvy::dotenv();
    init_tracing();
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let config = Config::from_env();
    let cli_mode = std::env::args().any(|a| a == "--cli");

    if cli_mode {
        run_cli(config);
    } else {
        run_web(config);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// The client must be built outside any async runtime:
/// reqwest::blocking::Client spins up its own.
fn build_client(config: &Config) -> OmdbClient {
    let client = match OmdbClient::new(config.omdb.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build OMDb client: {e}");
            std::process::exit(1);
        }
    };
    if !client.has_api_key() {
        warn!("OMDB_API_KEY not set; searches will ask for a key instead of hitting the network.");
    } else if !client.validate_api_key() {
        warn!("OMDb rejected the configured API key");
    }
    client
}

fn open_storage(config: &Config) -> FileStorage {
    match FileStorage::open(&config.data_dir) {
        Ok(storage) => storage,
        Err(e) => {
            error!("Failed to open data directory {}: {e}", config.data_dir.display());
            std::process::exit(1);
        }
    }
}

/// Interactive terminal menu.
fn run_cli(config: Config) {
    let storage = open_storage(&config);
    let client = build_client(&config);

    let mut app = core::app::App::new(Box::new(client), storage, TerminalInput);
    app.run();
}

/// JSON API server, the default mode.
fn run_web(config: Config) {
    let storage = open_storage(&config);
    let client = build_client(&config);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create async runtime: {e}");
            std::process::exit(1);
        }
    };

    // Keep a handle out here so the blocking client is never dropped
    // inside the runtime.
    let catalog: Arc<dyn MovieCatalog> = Arc::new(client);
    let app = infra::web::router(Arc::clone(&catalog), Box::new(storage));

    let result = rt.block_on(infra::web::start_server(app, config.port));
    drop(rt);

    if let Err(e) = result {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}
