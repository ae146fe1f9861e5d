//! Display-name lookup with placeholders for dangling references.

use std::collections::HashMap;

use stockroom_core::{LocationId, ProductId};

use crate::{Location, Product};

pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
pub const UNKNOWN_LOCATION: &str = "Unknown Location";
pub const NO_LOCATION: &str = "---";

/// Id → name index over a snapshot of products and locations.
#[derive(Debug, Default)]
pub struct NameBook<'a> {
    products: HashMap<ProductId, &'a str>,
    locations: HashMap<LocationId, &'a str>,
}

impl<'a> NameBook<'a> {
    pub fn new(products: &'a [Product], locations: &'a [Location]) -> Self {
        Self {
            products: products.iter().map(|p| (p.id, p.name.as_str())).collect(),
            locations: locations.iter().map(|l| (l.id, l.name.as_str())).collect(),
        }
    }

    pub fn product_name(&self, id: ProductId) -> &'a str {
        self.products.get(&id).copied().unwrap_or(UNKNOWN_PRODUCT)
    }

    /// `"---"` when there is no location, `"Unknown Location"` when the id dangles.
    pub fn location_name(&self, id: Option<LocationId>) -> &'a str {
        match id {
            None => NO_LOCATION,
            Some(id) => self.locations.get(&id).copied().unwrap_or(UNKNOWN_LOCATION),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LocationFields, ProductFields};

    #[test]
    fn resolves_known_and_placeholder_names() {
        let products = vec![Product::from_fields(ProductId::new(1), ProductFields::named("Widget"))];
        let locations = vec![Location::from_fields(LocationId::new(1), LocationFields::named("Warehouse"))];
        let names = NameBook::new(&products, &locations);

        assert_eq!(names.product_name(ProductId::new(1)), "Widget");
        assert_eq!(names.product_name(ProductId::new(2)), UNKNOWN_PRODUCT);
        assert_eq!(names.location_name(Some(LocationId::new(1))), "Warehouse");
        assert_eq!(names.location_name(Some(LocationId::new(9))), UNKNOWN_LOCATION);
        assert_eq!(names.location_name(None), NO_LOCATION);
    }
}
