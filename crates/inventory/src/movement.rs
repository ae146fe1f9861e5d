use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, LocationId, MovementId, ProductId};

use crate::token::Token;

pub const QUANTITY_NOT_A_NUMBER: &str = "Quantity must be a number.";
pub const QUANTITY_TOO_SMALL: &str = "Quantity must be at least 1.";
pub const PRODUCT_REQUIRED: &str = "Please enter a product name or id.";
pub const PRODUCT_NOT_SELECTED: &str = "Please select a product.";
pub const ENDPOINT_REQUIRED: &str = "Choose at least one of From or To location (enter name or id).";
pub const LOCATION_NOT_AN_ID: &str = "Locations must be selected by id.";

/// A recorded transfer of `qty` units of one product.
///
/// Either endpoint may be absent: no source means stock arriving from outside,
/// no destination means stock leaving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    pub timestamp: DateTime<Utc>,
    pub product_id: ProductId,
    pub from_location: Option<LocationId>,
    pub to_location: Option<LocationId>,
    pub qty: i64,
}

impl Movement {
    pub fn from_fields(id: MovementId, timestamp: DateTime<Utc>, fields: MovementFields) -> Self {
        Self {
            id,
            timestamp: fields.timestamp.unwrap_or(timestamp),
            product_id: fields.product_id,
            from_location: fields.from_location,
            to_location: fields.to_location,
            qty: fields.qty,
        }
    }

    /// Overwrite every mutable field. The timestamp is kept unless `fields` carries one.
    pub fn overwrite(&mut self, fields: MovementFields) {
        if let Some(ts) = fields.timestamp {
            self.timestamp = ts;
        }
        self.product_id = fields.product_id;
        self.from_location = fields.from_location;
        self.to_location = fields.to_location;
        self.qty = fields.qty;
    }

    /// Signed balance changes this movement contributes, keyed by (product, location).
    pub fn deltas(&self) -> impl Iterator<Item = ((ProductId, LocationId), i128)> + '_ {
        let qty = i128::from(self.qty);
        let out = self.from_location.map(|loc| ((self.product_id, loc), -qty));
        let into = self.to_location.map(|loc| ((self.product_id, loc), qty));
        out.into_iter().chain(into)
    }
}

/// Every writable movement field. `timestamp: None` means "now" on create and
/// "unchanged" on edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementFields {
    pub product_id: ProductId,
    pub from_location: Option<LocationId>,
    pub to_location: Option<LocationId>,
    pub qty: i64,
    pub timestamp: Option<DateTime<Utc>>,
}

/// A movement as typed into the record form: free-text tokens, not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementRequest {
    pub product: String,
    pub from_location: String,
    pub to_location: String,
    pub qty: i64,
}

/// A movement request whose tokens passed the form checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedMovementRequest {
    pub product: Token,
    pub from_location: Option<Token>,
    pub to_location: Option<Token>,
    pub qty: i64,
}

impl MovementRequest {
    /// Apply the record-form checks in order: product present, at least one
    /// endpoint, positive quantity.
    pub fn check(self) -> DomainResult<CheckedMovementRequest> {
        let product =
            Token::classify(&self.product).ok_or_else(|| DomainError::validation(PRODUCT_REQUIRED))?;
        let from_location = Token::classify(&self.from_location);
        let to_location = Token::classify(&self.to_location);

        if from_location.is_none() && to_location.is_none() {
            return Err(DomainError::validation(ENDPOINT_REQUIRED));
        }
        if self.qty <= 0 {
            return Err(DomainError::validation(QUANTITY_TOO_SMALL));
        }

        Ok(CheckedMovementRequest {
            product,
            from_location,
            to_location,
            qty: self.qty,
        })
    }
}

/// A movement as submitted from the edit form, where every reference is an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementEdit {
    pub product: String,
    pub from_location: String,
    pub to_location: String,
    pub qty: i64,
}

impl MovementEdit {
    pub fn check(self) -> DomainResult<MovementFields> {
        let product_id = match Token::classify(&self.product) {
            Some(Token::NumericId(id)) => ProductId::new(id),
            _ => return Err(DomainError::validation(PRODUCT_NOT_SELECTED)),
        };
        let from_location = location_id_field(&self.from_location)?;
        let to_location = location_id_field(&self.to_location)?;

        if from_location.is_none() && to_location.is_none() {
            return Err(DomainError::validation(ENDPOINT_REQUIRED));
        }
        if self.qty <= 0 {
            return Err(DomainError::validation(QUANTITY_TOO_SMALL));
        }

        Ok(MovementFields {
            product_id,
            from_location,
            to_location,
            qty: self.qty,
            timestamp: None,
        })
    }
}

/// Blank → no location; digits → that id; anything else is rejected.
pub fn location_id_field(raw: &str) -> DomainResult<Option<LocationId>> {
    match Token::classify(raw) {
        None => Ok(None),
        Some(Token::NumericId(id)) => Ok(Some(LocationId::new(id))),
        Some(Token::NameText(_)) => Err(DomainError::validation(LOCATION_NOT_AN_ID)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(product: &str, from: &str, to: &str, qty: i64) -> MovementRequest {
        MovementRequest {
            product: product.to_string(),
            from_location: from.to_string(),
            to_location: to.to_string(),
            qty,
        }
    }

    fn movement(from: Option<i64>, to: Option<i64>, qty: i64) -> Movement {
        Movement {
            id: MovementId::new(1),
            timestamp: Utc::now(),
            product_id: ProductId::new(9),
            from_location: from.map(LocationId::new),
            to_location: to.map(LocationId::new),
            qty,
        }
    }

    #[test]
    fn transfer_yields_two_independent_deltas() {
        let deltas: Vec<_> = movement(Some(1), Some(2), 4).deltas().collect();
        assert_eq!(
            deltas,
            vec![
                ((ProductId::new(9), LocationId::new(1)), -4),
                ((ProductId::new(9), LocationId::new(2)), 4),
            ]
        );
    }

    #[test]
    fn endpointless_movement_has_no_deltas() {
        assert_eq!(movement(None, None, 4).deltas().count(), 0);
    }

    #[test]
    fn check_classifies_tokens() {
        let checked = request(" Widget ", "1", "", 3).check().unwrap();
        assert_eq!(checked.product, Token::NameText("Widget".to_string()));
        assert_eq!(checked.from_location, Some(Token::NumericId(1)));
        assert_eq!(checked.to_location, None);
        assert_eq!(checked.qty, 3);
    }

    #[test]
    fn check_reports_product_before_endpoints_and_quantity() {
        let err = request("  ", "", "", 0).check().unwrap_err();
        assert_eq!(err, DomainError::validation(PRODUCT_REQUIRED));
    }

    #[test]
    fn check_reports_endpoints_before_quantity() {
        let err = request("Widget", "", " ", 0).check().unwrap_err();
        assert_eq!(err, DomainError::validation(ENDPOINT_REQUIRED));
    }

    #[test]
    fn check_rejects_non_positive_quantity() {
        let err = request("Widget", "Warehouse", "", -2).check().unwrap_err();
        assert_eq!(err, DomainError::validation(QUANTITY_TOO_SMALL));
    }

    #[test]
    fn edit_requires_numeric_product() {
        let edit = MovementEdit {
            product: "Widget".to_string(),
            from_location: "1".to_string(),
            to_location: String::new(),
            qty: 1,
        };
        assert_eq!(edit.check().unwrap_err(), DomainError::validation(PRODUCT_NOT_SELECTED));
    }

    #[test]
    fn edit_rejects_location_names() {
        let edit = MovementEdit {
            product: "3".to_string(),
            from_location: "Warehouse".to_string(),
            to_location: String::new(),
            qty: 1,
        };
        assert_eq!(edit.check().unwrap_err(), DomainError::validation(LOCATION_NOT_AN_ID));
    }

    #[test]
    fn overwrite_keeps_timestamp_when_not_given() {
        let mut m = movement(Some(1), None, 2);
        let before = m.timestamp;
        m.overwrite(MovementFields {
            product_id: ProductId::new(4),
            from_location: None,
            to_location: Some(LocationId::new(5)),
            qty: 7,
            timestamp: None,
        });
        assert_eq!(m.timestamp, before);
        assert_eq!(m.product_id, ProductId::new(4));
        assert_eq!(m.to_location, Some(LocationId::new(5)));
        assert_eq!(m.qty, 7);
    }
}
