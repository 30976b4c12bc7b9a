//! Infrastructure wiring for the HTTP layer.
//!
//! `AppServices` is built once at startup and handed to every handler through
//! an `Extension`; there is no process-wide database handle.

use std::sync::Arc;

use stockbook_infra::{db, InMemoryItemStore, ItemService, ItemStore};

use crate::config::Config;

/// Store handle shared by all handlers.
pub type DynItemStore = Arc<dyn ItemStore>;

pub struct AppServices {
    pub items: ItemService<DynItemStore>,
    pub config: Config,
}

impl AppServices {
    pub fn new(store: DynItemStore, config: Config) -> Self {
        Self {
            items: ItemService::new(store),
            config,
        }
    }

    /// In-memory store (dev/test).
    pub fn in_memory(config: Config) -> Self {
        Self::new(Arc::new(InMemoryItemStore::new()), config)
    }

    pub fn store(&self) -> &DynItemStore {
        self.items.store()
    }
}

/// Select and connect the store described by `config`.
///
/// A database that stays unreachable through every retry is not fatal: the
/// store falls back to a lazily connecting pool so the server still starts and
/// `/health` reports the outage.
pub async fn build_services(config: Config) -> anyhow::Result<AppServices> {
    let Some(url) = config.database_url.clone() else {
        tracing::warn!("DATABASE_URL not set; using in-memory store (data is lost on restart)");
        return Ok(AppServices::in_memory(config));
    };

    let store = match db::connect_with_retry(&url, &config.pool).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("database unavailable at startup, continuing degraded: {e}");
            db::connect_lazy(&url, &config.pool)?
        }
    };

    Ok(AppServices::new(Arc::new(store), config))
}
