//! Configuration.
//!
//! `Config` is read from a TOML file:
//!
//! ```toml
//! default_game = "memotest"
//!
//! [store]
//! database_url = "https://example-default-rtdb.firebaseio.com"
//! poll_interval_ms = 1000
//!
//! [export]
//! secret = "ranking"
//! output_dir = "."
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;
use crate::game::{GameType, RecordPath};

/// Record store polling configuration.
pub mod polling {
    use std::time::Duration;

    /// Delay between two reads of a subscribed path.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

    /// Lower bound for configured poll intervals.
    pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

    /// Global timeout for a single HTTP request.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Lower bound for configured request timeouts.
    pub const MIN_TIMEOUT: Duration = Duration::from_secs(1);
}

/// Export gate configuration.
pub mod export {
    /// Shared secret used when none is configured.
    pub const DEFAULT_SECRET: &str = "ranking";
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_game: GameType,
    pub store: StoreConfig,
    pub export: ExportConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn record_path(&self, game: GameType) -> RecordPath {
        RecordPath::for_game(game, self.store.legacy_path)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the realtime database, without trailing `.json`.
    pub database_url: String,
    /// Database secret or ID token passed as the `auth` query parameter.
    pub auth: Option<String>,
    pub poll_interval_ms: u64,
    pub timeout_secs: u64,
    /// Read the flat `usuarios` tree instead of `games/<game>/usuarios`.
    pub legacy_path: bool,
}

impl StoreConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms).max(polling::MIN_POLL_INTERVAL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs).max(polling::MIN_TIMEOUT)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            auth: None,
            poll_interval_ms: polling::DEFAULT_POLL_INTERVAL.as_millis() as u64,
            timeout_secs: polling::DEFAULT_TIMEOUT.as_secs(),
            legacy_path: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Not a credential: anyone with the config or the binary can read it.
    pub secret: String,
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            secret: export::DEFAULT_SECRET.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}
