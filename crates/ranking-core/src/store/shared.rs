//! Process-wide record store connection.
//!
//! Initialized once at startup and handed to controllers by `Arc`; it lives
//! until the process exits.

use std::sync::{Arc, OnceLock};

use crate::config::StoreConfig;
use crate::error::{Error, Result};

use super::RestRecordStore;

static STORE: OnceLock<Arc<RestRecordStore>> = OnceLock::new();

/// Create the shared store. Fails if it already exists.
pub fn init(config: &StoreConfig) -> Result<Arc<RestRecordStore>> {
    let store = Arc::new(RestRecordStore::new(config)?);
    STORE
        .set(Arc::clone(&store))
        .map_err(|_| Error::StoreAlreadyInitialized)?;
    Ok(store)
}

/// The shared store, if `init` has run.
pub fn get() -> Option<Arc<RestRecordStore>> {
    STORE.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_once() {
        let config = StoreConfig {
            database_url: "https://db.example.com".to_string(),
            ..StoreConfig::default()
        };

        let first = init(&config).unwrap();
        assert!(Arc::ptr_eq(&first, &get().unwrap()));
        assert!(matches!(init(&config), Err(Error::StoreAlreadyInitialized)));
    }
}
