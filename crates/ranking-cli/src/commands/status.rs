//! Status command implementation.

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use ranking_core::{Config, RecordStore};

use crate::cli_utils;

/// Check that the database answers
pub fn run(config: &Config) -> Result<()> {
    let store = cli_utils::open_store(config)?;

    match store.check_connection() {
        Ok(()) => {
            println!("{} Connected to {}", "✓".green(), config.store.database_url);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            bail!("Connection check failed")
        }
    }
}
