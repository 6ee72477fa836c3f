//! Shared helpers for CLI commands.

use std::sync::Arc;

use anyhow::{Context, Result};
use ranking_core::store::shared;
use ranking_core::{Config, GameType, RecordPath, RestRecordStore};
use tracing::{info, warn};

use crate::cli::Args;

/// Load the config file, falling back to defaults, then apply CLI overrides.
pub fn load_config(args: &Args) -> Config {
    let mut config = if args.config.exists() {
        match Config::load(&args.config) {
            Ok(c) => {
                info!("Loaded config from {:?}", args.config);
                c
            }
            Err(e) => {
                warn!("Failed to load config: {}, using defaults", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Some(url) = &args.database_url {
        config.store.database_url = url.clone();
    }
    if let Some(auth) = &args.auth {
        config.store.auth = Some(auth.clone());
    }
    if let Some(secret) = &args.export_secret {
        config.export.secret = secret.clone();
    }

    config
}

/// Connect the process-wide record store.
pub fn open_store(config: &Config) -> Result<Arc<RestRecordStore>> {
    shared::init(&config.store).context(
        "Could not open the database. Set store.database_url, --database-url, or RANKING_DATABASE_URL.",
    )
}

pub fn resolve_path(config: &Config, game: Option<GameType>, legacy: bool) -> RecordPath {
    let game = game.unwrap_or(config.default_game);
    if legacy {
        RecordPath::Legacy
    } else {
        config.record_path(game)
    }
}
