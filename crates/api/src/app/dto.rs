use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult};
use stockroom_inventory::movement::{location_id_field, QUANTITY_NOT_A_NUMBER};
use stockroom_inventory::{
    CheckedMovementRequest, LocationFields, MovementEdit, MovementFields, MovementRequest, ProductFields,
};

// -------------------------
// Request DTOs
// -------------------------
//
// Fields arrive as raw form strings; coercion and checks happen in the
// `into_*` methods so every rejection carries a user-facing message.

#[derive(Debug, Default, Deserialize)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<String>,
    pub location: Option<String>,
}

impl ProductForm {
    /// Checks run in order: quantity parses, name present, location is an id.
    pub fn into_fields(self) -> DomainResult<ProductFields> {
        let quantity = parse_quantity(self.quantity.as_deref())?;
        let fields = ProductFields {
            name: self.name.unwrap_or_default(),
            description: self.description,
            quantity,
            location_id: None,
        }
        .validate()?;
        let location_id = location_id_field(self.location.as_deref().unwrap_or_default())?;

        Ok(ProductFields { location_id, ..fields })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationForm {
    pub name: Option<String>,
    pub address: Option<String>,
}

impl LocationForm {
    pub fn into_fields(self) -> DomainResult<LocationFields> {
        LocationFields {
            name: self.name.unwrap_or_default(),
            address: self.address,
        }
        .validate()
    }
}

/// Record-movement form: product and endpoints are free-text id-or-name tokens.
#[derive(Debug, Default, Deserialize)]
pub struct MovementForm {
    pub product: Option<String>,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub qty: Option<String>,
}

impl MovementForm {
    pub fn into_request(self) -> DomainResult<CheckedMovementRequest> {
        let qty = parse_quantity(self.qty.as_deref())?;
        MovementRequest {
            product: self.product.unwrap_or_default(),
            from_location: self.from_location.unwrap_or_default(),
            to_location: self.to_location.unwrap_or_default(),
            qty,
        }
        .check()
    }

    /// Edit form: same field names, but every reference must be an id.
    pub fn into_edit(self) -> DomainResult<MovementFields> {
        let qty = parse_quantity(self.qty.as_deref())?;
        MovementEdit {
            product: self.product.unwrap_or_default(),
            from_location: self.from_location.unwrap_or_default(),
            to_location: self.to_location.unwrap_or_default(),
            qty,
        }
        .check()
    }
}

/// Missing quantity counts as 0; anything present must parse as an integer.
pub fn parse_quantity(raw: Option<&str>) -> DomainResult<i64> {
    match raw {
        None => Ok(0),
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| DomainError::validation(QUANTITY_NOT_A_NUMBER)),
    }
}

// -------------------------
// Response helpers
// -------------------------

/// List body: `{ "items": [...] }`.
///
/// Serialized straight into the response so wide balance quantities never pass
/// through `serde_json::Value`, which only holds 64-bit integers.
#[derive(Debug, Serialize)]
pub struct Items<T> {
    pub items: Vec<T>,
}

impl<T> Items<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

/// Body returned by every successful write.
pub fn ack(id: impl serde::Serialize, message: &str) -> serde_json::Value {
    serde_json::json!({ "id": id, "message": message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::LocationId;
    use stockroom_inventory::movement::{ENDPOINT_REQUIRED, PRODUCT_REQUIRED, QUANTITY_TOO_SMALL};

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn product_form_checks_quantity_before_name() {
        let form = ProductForm {
            name: some(""),
            quantity: some("ten"),
            ..Default::default()
        };
        assert_eq!(form.into_fields().unwrap_err(), DomainError::validation(QUANTITY_NOT_A_NUMBER));
    }

    #[test]
    fn product_form_defaults_quantity_and_location() {
        let fields = ProductForm {
            name: some("Widget"),
            ..Default::default()
        }
        .into_fields()
        .unwrap();
        assert_eq!(fields.quantity, 0);
        assert_eq!(fields.location_id, None);
    }

    #[test]
    fn product_form_takes_location_id() {
        let fields = ProductForm {
            name: some("Widget"),
            quantity: some(" -4 "),
            location: some("3"),
            ..Default::default()
        }
        .into_fields()
        .unwrap();
        assert_eq!(fields.quantity, -4);
        assert_eq!(fields.location_id, Some(LocationId::new(3)));
    }

    #[test]
    fn empty_quantity_is_not_a_number() {
        assert_eq!(parse_quantity(Some("")).unwrap_err(), DomainError::validation(QUANTITY_NOT_A_NUMBER));
        assert_eq!(parse_quantity(None).unwrap(), 0);
    }

    #[test]
    fn quantity_range_is_i64() {
        assert_eq!(parse_quantity(Some("9223372036854775807")).unwrap(), i64::MAX);
        assert_eq!(parse_quantity(Some("-9223372036854775808")).unwrap(), i64::MIN);
        assert_eq!(
            parse_quantity(Some("9223372036854775808")).unwrap_err(),
            DomainError::validation(QUANTITY_NOT_A_NUMBER)
        );
    }

    #[test]
    fn wide_balances_serialize_as_plain_numbers() {
        let body = Items::new(vec![stockroom_inventory::BalanceRow::new(
            "Widget",
            "Warehouse",
            i128::from(i64::MAX) + 1,
        )]);
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(
            json,
            r#"{"items":[{"product_name":"Widget","location_name":"Warehouse","qty":9223372036854775808}]}"#
        );
    }

    #[test]
    fn movement_form_validation_order() {
        let bad_qty = MovementForm {
            qty: some("x"),
            ..Default::default()
        };
        assert_eq!(bad_qty.into_request().unwrap_err(), DomainError::validation(QUANTITY_NOT_A_NUMBER));

        let no_product = MovementForm::default();
        assert_eq!(no_product.into_request().unwrap_err(), DomainError::validation(PRODUCT_REQUIRED));

        let no_endpoints = MovementForm {
            product: some("Widget"),
            qty: some("2"),
            ..Default::default()
        };
        assert_eq!(no_endpoints.into_request().unwrap_err(), DomainError::validation(ENDPOINT_REQUIRED));

        let missing_qty = MovementForm {
            product: some("Widget"),
            to_location: some("Store"),
            ..Default::default()
        };
        assert_eq!(missing_qty.into_request().unwrap_err(), DomainError::validation(QUANTITY_TOO_SMALL));
    }
}
