//! Engine builder for flexible configuration
//!
//! Collects the store handle and configuration, then validates both when the
//! engine is built.

use crate::config::Config;
use crate::engine::Engine;
use crate::error::{GeoSampleError, Result};
use crate::storage::{GeoStore, MemoryStore};
use std::path::Path;
use std::sync::Arc;

/// Builder for an [`Engine`] over an injected store.
pub struct EngineBuilder {
    store: Option<Arc<dyn GeoStore>>,
    config: Config,
}

impl EngineBuilder {
    /// Create a new builder with default configuration and no store.
    pub fn new() -> Self {
        Self {
            store: None,
            config: Config::default(),
        }
    }

    /// Set the store the engine queries.
    pub fn store(mut self, store: Arc<dyn GeoStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the engine configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Load the configuration from a JSON file, or TOML when the path ends
    /// in `.toml` and the `toml` feature is enabled.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            GeoSampleError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        let is_toml = path.extension().is_some_and(|ext| ext == "toml");
        self.config = if is_toml {
            Self::parse_toml(&text)?
        } else {
            Config::from_json(&text).map_err(|e| GeoSampleError::Config(e.to_string()))?
        };
        Ok(self)
    }

    #[cfg(feature = "toml")]
    fn parse_toml(text: &str) -> Result<Config> {
        Config::from_toml(text).map_err(|e| GeoSampleError::Config(e.to_string()))
    }

    #[cfg(not(feature = "toml"))]
    fn parse_toml(_text: &str) -> Result<Config> {
        Err(GeoSampleError::Config(
            "TOML configuration requires the `toml` feature".to_string(),
        ))
    }

    /// Build the engine. Without a store, an empty [`MemoryStore`] is used.
    pub fn build(self) -> Result<Engine> {
        let store = match self.store {
            Some(store) => store,
            None => {
                log::debug!("No store configured, using an empty in-memory store");
                Arc::new(MemoryStore::new())
            }
        };
        Engine::new(store, self.config)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
