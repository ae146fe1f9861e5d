//! Token → id resolution for the movement form.
//!
//! A token is either a numeric id (taken as-is, never checked for existence) or
//! a name. Unknown names become new catalog entries, so resolving looks like a
//! read but may write.

use thiserror::Error;

use stockroom_core::{LocationId, ProductId};
use stockroom_inventory::movement::PRODUCT_REQUIRED;
use stockroom_inventory::{
    CheckedMovementRequest, LocationFields, Movement, MovementFields, ProductFields, Token,
};

use crate::store::{EntityStore, StoreError};

#[derive(Debug, Error)]
pub enum ResolveError {
    /// A product token was blank; there is nothing to resolve.
    #[error("{}", PRODUCT_REQUIRED)]
    BlankProduct,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves id-or-name tokens against a store, creating entities for new names.
///
/// Concurrent resolutions of the same new name may both create an entity;
/// later lookups then pick the lowest id.
pub struct Resolver<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> Resolver<'a, S>
where
    S: EntityStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn resolve_product(&self, raw: &str) -> Result<ProductId, ResolveError> {
        let token = Token::classify(raw).ok_or(ResolveError::BlankProduct)?;
        Ok(self.resolve_product_token(&token).await?)
    }

    /// Blank input means "no location".
    pub async fn resolve_location(&self, raw: &str) -> Result<Option<LocationId>, StoreError> {
        match Token::classify(raw) {
            None => Ok(None),
            Some(token) => self.resolve_location_token(&token).await.map(Some),
        }
    }

    pub async fn resolve_product_token(&self, token: &Token) -> Result<ProductId, StoreError> {
        let name = match token {
            Token::NumericId(id) => return Ok(ProductId::new(*id)),
            Token::NameText(name) => name,
        };

        if let Some(existing) = self.store.find_product_by_name(name).await? {
            return Ok(existing.id);
        }

        let created = self.store.create_product(ProductFields::named(name.as_str())).await?;
        tracing::info!(product_id = %created.id, name = %created.name, "created product from movement token");
        Ok(created.id)
    }

    pub async fn resolve_location_token(&self, token: &Token) -> Result<LocationId, StoreError> {
        let name = match token {
            Token::NumericId(id) => return Ok(LocationId::new(*id)),
            Token::NameText(name) => name,
        };

        if let Some(existing) = self.store.find_location_by_name(name).await? {
            return Ok(existing.id);
        }

        let created = self.store.create_location(LocationFields::named(name.as_str())).await?;
        tracing::info!(location_id = %created.id, name = %created.name, "created location from movement token");
        Ok(created.id)
    }
}

/// Resolve every token of a checked movement request and persist the movement.
///
/// Tokens are resolved product first, then source, then destination, so a name
/// used for both endpoints creates one location.
pub async fn record_movement<S>(store: &S, request: CheckedMovementRequest) -> Result<Movement, StoreError>
where
    S: EntityStore + ?Sized,
{
    let resolver = Resolver::new(store);

    let product_id = resolver.resolve_product_token(&request.product).await?;
    let from_location = match &request.from_location {
        Some(token) => Some(resolver.resolve_location_token(token).await?),
        None => None,
    };
    let to_location = match &request.to_location {
        Some(token) => Some(resolver.resolve_location_token(token).await?),
        None => None,
    };

    let movement = store
        .create_movement(MovementFields {
            product_id,
            from_location,
            to_location,
            qty: request.qty,
            timestamp: None,
        })
        .await?;

    tracing::info!(
        movement_id = %movement.id,
        product_id = %movement.product_id,
        qty = movement.qty,
        "recorded movement"
    );
    Ok(movement)
}
