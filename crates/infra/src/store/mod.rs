//! Entity store boundary.
//!
//! The store trait plus an in-memory implementation (tests/dev) and a SQLite
//! implementation (default runtime backend).

pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

use std::sync::Arc;

pub use in_memory::InMemoryEntityStore;
pub use r#trait::{EntityStore, StoreError};
pub use sqlite::SqliteEntityStore;

use crate::config::{AppConfig, StoreBackend};

/// Open the store selected by `config`, running schema migration for SQLite.
pub async fn open(config: &AppConfig) -> Result<Arc<dyn EntityStore>, StoreError> {
    match config.store {
        StoreBackend::Memory => {
            tracing::info!("using in-memory entity store");
            Ok(Arc::new(InMemoryEntityStore::new()))
        }
        StoreBackend::Sqlite => {
            let store = SqliteEntityStore::connect(&config.database_url, config.max_connections).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
    }
}
