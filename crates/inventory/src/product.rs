use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, LocationId, ProductId};

/// A catalog product.
///
/// `quantity` is standing stock declared when the product is created or edited.
/// It counts toward a balance only when `location_id` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,
    pub location_id: Option<LocationId>,
}

impl Product {
    pub fn from_fields(id: ProductId, fields: ProductFields) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            quantity: fields.quantity,
            location_id: fields.location_id,
        }
    }

    /// The location this product's standing quantity is attributed to, if any.
    pub fn seeded_stock(&self) -> Option<(LocationId, i64)> {
        self.location_id.map(|loc| (loc, self.quantity))
    }

    /// Overwrite every mutable field.
    pub fn overwrite(&mut self, fields: ProductFields) {
        self.name = fields.name;
        self.description = fields.description;
        self.quantity = fields.quantity;
        self.location_id = fields.location_id;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Every writable product field (create and full-overwrite edit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,
    pub location_id: Option<LocationId>,
}

impl ProductFields {
    /// Bare catalog entry: no description, zero quantity, no location.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            quantity: 0,
            location_id: None,
        }
    }

    /// Normalize and check submitted fields.
    ///
    /// The name is trimmed and must be non-empty; a blank description becomes `None`.
    /// Quantity may be negative.
    pub fn validate(self) -> DomainResult<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Product name is required."));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            name,
            description,
            quantity: self.quantity,
            location_id: self.location_id,
        })
    }
}
