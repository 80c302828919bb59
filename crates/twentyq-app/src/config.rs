use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use twentyq_core::game::config::EngineConfig;
use twentyq_core::game::serialization::load_catalog;
use twentyq_core::model::catalog::{Catalog, CatalogError};

pub const DEFAULT_WIN_DISPLAY_MS: u64 = 1_500;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Host-side settings: everything the engine itself has no notion of.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub win_display: Duration,
    pub poll_interval: Duration,
    pub engine: EngineConfig,
    pub catalog: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            win_display: Duration::from_millis(DEFAULT_WIN_DISPLAY_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            engine: EngineConfig::default(),
            catalog: None,
        }
    }
}

impl AppConfig {
    /// Defaults with engine policy taken from `TWENTYQ_*` variables.
    pub fn from_env() -> Self {
        Self {
            engine: EngineConfig::from_env(),
            ..Self::default()
        }
    }

    pub fn load_catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        match self.catalog.as_ref() {
            Some(path) => load_catalog(path).map(Arc::new),
            None => Ok(Arc::new(Catalog::standard())),
        }
    }
}
