use clap::Parser;
use std::path::PathBuf;

use crate::config::StoreBackend;

/// Server CLI for golf-server
#[derive(Parser, Debug, Clone)]
#[command(name = "golf-server", version, about = "Golf card-game server")]
pub struct ServerCli {
    /// Path to config file
    #[arg(long, default_value = "golf-server.toml")]
    pub config: PathBuf,

    /// Listen address (overrides config)
    #[arg(long)]
    pub listen: Option<String>,

    /// Game store backend (overrides config)
    #[arg(long, value_enum)]
    pub backend: Option<StoreBackend>,

    /// Document store base URL (overrides config)
    #[arg(long)]
    pub doc_db_url: Option<String>,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Persist CLI overrides back to the config file
    #[arg(long, default_value_t = false)]
    pub persist: bool,
}
