//! Infrastructure layer: entity storage, token resolution, reporting, config.

pub mod config;
pub mod report;
pub mod resolver;
pub mod store;

pub use config::{AppConfig, ConfigError, StoreBackend};
pub use resolver::{record_movement, ResolveError, Resolver};
pub use store::{EntityStore, InMemoryEntityStore, SqliteEntityStore, StoreError};
