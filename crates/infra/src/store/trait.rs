use thiserror::Error;

use stockroom_core::{LocationId, MovementId, ProductId};
use stockroom_inventory::{Location, LocationFields, Movement, MovementFields, Product, ProductFields};

/// Entity store operation error.
///
/// These are storage failures. Input validation happens before a store is called,
/// and dangling references are not errors at this layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl Into<i64>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Persistent records for products, locations and movements.
///
/// The store knows nothing about relationships between the three tables:
/// references are plain ids, deletes never cascade and never check for
/// referrers. "Products at a location" and similar queries are explicit
/// filters over the list operations.
///
/// Ordering contract:
/// - `list_products` / `list_locations`: ascending id
/// - `list_movements`: ascending `(timestamp, id)`
/// - `find_*_by_name`: exact, case-sensitive match; lowest id wins
#[async_trait::async_trait]
pub trait EntityStore: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;
    async fn list_locations(&self) -> Result<Vec<Location>, StoreError>;
    async fn list_movements(&self) -> Result<Vec<Movement>, StoreError>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;
    async fn get_location(&self, id: LocationId) -> Result<Option<Location>, StoreError>;
    async fn get_movement(&self, id: MovementId) -> Result<Option<Movement>, StoreError>;

    async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, StoreError>;
    async fn find_location_by_name(&self, name: &str) -> Result<Option<Location>, StoreError>;

    /// Persist a new product and return it with its assigned id.
    async fn create_product(&self, fields: ProductFields) -> Result<Product, StoreError>;
    async fn create_location(&self, fields: LocationFields) -> Result<Location, StoreError>;
    /// A movement without a timestamp is stamped with the current UTC instant.
    async fn create_movement(&self, fields: MovementFields) -> Result<Movement, StoreError>;

    /// Full field overwrite.
    async fn update_product(&self, id: ProductId, fields: ProductFields) -> Result<Product, StoreError>;
    async fn update_location(&self, id: LocationId, fields: LocationFields) -> Result<Location, StoreError>;
    /// Full field overwrite; the timestamp is only replaced when `fields` carries one.
    async fn update_movement(&self, id: MovementId, fields: MovementFields) -> Result<Movement, StoreError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError>;
    async fn delete_location(&self, id: LocationId) -> Result<(), StoreError>;
    async fn delete_movement(&self, id: MovementId) -> Result<(), StoreError>;
}
