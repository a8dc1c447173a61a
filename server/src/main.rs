//! Main entry point for the Golf card-game server.

use golf_server::{cli, config, manager, server, store};

use anyhow::Context;
use clap::Parser;
use config::{Config, StoreBackend};
use manager::GameManager;
use server::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use store::escapist::HttpDocDbClient;
use store::{DocDbGameStore, GameStore, InMemoryGameStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::ServerCli::parse();

    // Show everything at DEBUG with --debug, otherwise keep other crates at
    // WARN to reduce noise.
    let log_filter = if cli.debug {
        "debug".to_string()
    } else {
        "golf_server=info,golf_shared=info,warn".to_string()
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(cli.debug)
        .with_thread_ids(cli.debug)
        .with_file(cli.debug)
        .with_line_number(cli.debug)
        .init();

    let config_path: PathBuf = cli.config.clone();

    let mut cfg = Config::load_or_create(&config_path)
        .with_context(|| format!("loading or creating config '{}'", config_path.display()))?;

    // Apply CLI overrides in-memory (non-persistent by default)
    if let Some(listen) = cli.listen {
        cfg.listen = listen;
    }
    if let Some(backend) = cli.backend {
        cfg.backend = backend;
    }
    if let Some(url) = cli.doc_db_url {
        cfg.doc_db_url = url;
    }

    if cli.persist {
        cfg.save(&config_path)
            .with_context(|| format!("saving updated config '{}'", config_path.display()))?;
    }

    tracing::info!(config = %config_path.display(), backend = ?cfg.backend);

    let game_store: Arc<dyn GameStore> = match cfg.backend {
        StoreBackend::Memory => Arc::new(InMemoryGameStore::new()),
        StoreBackend::DocDb => Arc::new(DocDbGameStore::new(Arc::new(HttpDocDbClient::new(
            cfg.doc_db_url.clone(),
        )))),
    };

    let manager_tx = server::spawn_manager(GameManager::new(game_store));
    let state = AppState::new(manager_tx);

    let addr: SocketAddr = cfg
        .listen
        .parse()
        .with_context(|| format!("invalid listen address '{}'", cfg.listen))?;

    tracing::info!(%addr, "starting server");
    server::run_server(addr, state).await?;
    Ok(())
}
