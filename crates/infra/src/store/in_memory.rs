use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use stockroom_core::entity::first_named;
use stockroom_core::{LocationId, MovementId, ProductId};
use stockroom_inventory::{Location, LocationFields, Movement, MovementFields, Product, ProductFields};

use super::r#trait::{EntityStore, StoreError};

/// Rows are kept in ascending id order; ids are never reused.
#[derive(Debug, Default)]
struct Tables {
    products: Vec<Product>,
    locations: Vec<Location>,
    movements: Vec<Movement>,
    last_product_id: i64,
    last_location_id: i64,
    last_movement_id: i64,
}

/// In-memory entity store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    tables: RwLock<Tables>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.read()?.products.clone())
    }

    async fn list_locations(&self) -> Result<Vec<Location>, StoreError> {
        Ok(self.read()?.locations.clone())
    }

    async fn list_movements(&self) -> Result<Vec<Movement>, StoreError> {
        let mut movements = self.read()?.movements.clone();
        movements.sort_by_key(|m| (m.timestamp, m.id));
        Ok(movements)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.read()?.products.iter().find(|p| p.id == id).cloned())
    }

    async fn get_location(&self, id: LocationId) -> Result<Option<Location>, StoreError> {
        Ok(self.read()?.locations.iter().find(|l| l.id == id).cloned())
    }

    async fn get_movement(&self, id: MovementId) -> Result<Option<Movement>, StoreError> {
        Ok(self.read()?.movements.iter().find(|m| m.id == id).cloned())
    }

    async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        Ok(first_named(&self.read()?.products, name).cloned())
    }

    async fn find_location_by_name(&self, name: &str) -> Result<Option<Location>, StoreError> {
        Ok(first_named(&self.read()?.locations, name).cloned())
    }

    async fn create_product(&self, fields: ProductFields) -> Result<Product, StoreError> {
        let mut tables = self.write()?;
        tables.last_product_id += 1;
        let product = Product::from_fields(ProductId::new(tables.last_product_id), fields);
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn create_location(&self, fields: LocationFields) -> Result<Location, StoreError> {
        let mut tables = self.write()?;
        tables.last_location_id += 1;
        let location = Location::from_fields(LocationId::new(tables.last_location_id), fields);
        tables.locations.push(location.clone());
        Ok(location)
    }

    async fn create_movement(&self, fields: MovementFields) -> Result<Movement, StoreError> {
        let mut tables = self.write()?;
        tables.last_movement_id += 1;
        let movement = Movement::from_fields(MovementId::new(tables.last_movement_id), Utc::now(), fields);
        tables.movements.push(movement.clone());
        Ok(movement)
    }

    async fn update_product(&self, id: ProductId, fields: ProductFields) -> Result<Product, StoreError> {
        let mut tables = self.write()?;
        let product = tables
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("product", id))?;
        product.overwrite(fields);
        Ok(product.clone())
    }

    async fn update_location(&self, id: LocationId, fields: LocationFields) -> Result<Location, StoreError> {
        let mut tables = self.write()?;
        let location = tables
            .locations
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| StoreError::not_found("location", id))?;
        location.overwrite(fields);
        Ok(location.clone())
    }

    async fn update_movement(&self, id: MovementId, fields: MovementFields) -> Result<Movement, StoreError> {
        let mut tables = self.write()?;
        let movement = tables
            .movements
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::not_found("movement", id))?;
        movement.overwrite(fields);
        Ok(movement.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        if tables.products.len() == before {
            return Err(StoreError::not_found("product", id));
        }
        Ok(())
    }

    async fn delete_location(&self, id: LocationId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let before = tables.locations.len();
        tables.locations.retain(|l| l.id != id);
        if tables.locations.len() == before {
            return Err(StoreError::not_found("location", id));
        }
        Ok(())
    }

    async fn delete_movement(&self, id: MovementId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let before = tables.movements.len();
        tables.movements.retain(|m| m.id != id);
        if tables.movements.len() == before {
            return Err(StoreError::not_found("movement", id));
        }
        Ok(())
    }
}
