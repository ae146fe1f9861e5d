//! Read-side views assembled from full store snapshots.
//!
//! Every view loads the tables it needs in full and joins in memory, which is
//! fine at single-user scale.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stockroom_core::{LocationId, MovementId, ProductId};
use stockroom_inventory::{compute_balances, BalanceRow, NameBook, Product};

use crate::store::{EntityStore, StoreError};

/// A movement with its references rendered as display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementLine {
    pub id: MovementId,
    pub timestamp: DateTime<Utc>,
    pub product_id: ProductId,
    pub product_name: String,
    pub from_location_id: Option<LocationId>,
    pub from_location: String,
    pub to_location_id: Option<LocationId>,
    pub to_location: String,
    pub qty: i64,
}

/// A product with the name of the location its standing quantity sits at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductLine {
    #[serde(flatten)]
    pub product: Product,
    pub location_name: String,
}

/// Current stock per (product, location), non-zero rows only.
pub async fn balances<S>(store: &S) -> Result<Vec<BalanceRow>, StoreError>
where
    S: EntityStore + ?Sized,
{
    let products = store.list_products().await?;
    let locations = store.list_locations().await?;
    let movements = store.list_movements().await?;

    let rows = compute_balances(&products, &locations, &movements);
    tracing::debug!(
        products = products.len(),
        movements = movements.len(),
        rows = rows.len(),
        "computed balances"
    );
    Ok(rows)
}

/// All movements, newest first, with display names for every reference.
pub async fn movement_log<S>(store: &S) -> Result<Vec<MovementLine>, StoreError>
where
    S: EntityStore + ?Sized,
{
    let products = store.list_products().await?;
    let locations = store.list_locations().await?;
    let mut movements = store.list_movements().await?;
    movements.reverse();

    let names = NameBook::new(&products, &locations);
    Ok(movements
        .into_iter()
        .map(|m| MovementLine {
            id: m.id,
            timestamp: m.timestamp,
            product_id: m.product_id,
            product_name: names.product_name(m.product_id).to_string(),
            from_location_id: m.from_location,
            from_location: names.location_name(m.from_location).to_string(),
            to_location_id: m.to_location,
            to_location: names.location_name(m.to_location).to_string(),
            qty: m.qty,
        })
        .collect())
}

/// Products in id order, each with its location's display name.
pub async fn product_catalog<S>(store: &S) -> Result<Vec<ProductLine>, StoreError>
where
    S: EntityStore + ?Sized,
{
    let products = store.list_products().await?;
    let locations = store.list_locations().await?;
    let names = NameBook::new(&[], &locations);

    Ok(products
        .into_iter()
        .map(|product| {
            let location_name = names.location_name(product.location_id).to_string();
            ProductLine {
                product,
                location_name,
            }
        })
        .collect())
}

/// Products whose standing quantity is attributed to `location_id`.
pub async fn products_at_location<S>(store: &S, location_id: LocationId) -> Result<Vec<Product>, StoreError>
where
    S: EntityStore + ?Sized,
{
    Ok(store
        .list_products()
        .await?
        .into_iter()
        .filter(|p| p.location_id == Some(location_id))
        .collect())
}
