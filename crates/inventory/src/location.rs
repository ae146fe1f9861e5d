use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, LocationId};

/// A storage location. Names are not unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub address: Option<String>,
}

impl Location {
    pub fn from_fields(id: LocationId, fields: LocationFields) -> Self {
        Self {
            id,
            name: fields.name,
            address: fields.address,
        }
    }

    pub fn overwrite(&mut self, fields: LocationFields) {
        self.name = fields.name;
        self.address = fields.address;
    }
}

impl Entity for Location {
    type Id = LocationId;

    fn id(&self) -> LocationId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationFields {
    pub name: String,
    pub address: Option<String>,
}

impl LocationFields {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
        }
    }

    pub fn validate(self) -> DomainResult<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Location name is required."));
        }

        let address = self
            .address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        Ok(Self { name, address })
    }
}
