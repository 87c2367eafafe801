//! Facility kind catalog — the set of descriptors a game can found.
//!
//! Loaded from JSON (see `data/facility_kinds.json`) or built from the
//! descriptors compiled into the crate. Kind names are unique.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::FacilityError;
use crate::kind::FacilityKindDescriptor;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("facility kind '{0}' is defined more than once")]
    DuplicateKind(String),
    #[error("invalid facility kind: {0}")]
    Invalid(#[from] FacilityError),
}

/// Ordered, name-unique collection of facility kinds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityCatalog {
    kinds: Vec<FacilityKindDescriptor>,
}

impl FacilityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding every built-in descriptor.
    pub fn builtin() -> Self {
        Self {
            kinds: FacilityKindDescriptor::builtin(),
        }
    }

    /// Parse and validate a JSON array of descriptors.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let kinds: Vec<FacilityKindDescriptor> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for kind in kinds {
            catalog.insert(kind)?;
        }
        Ok(catalog)
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add a descriptor, rejecting invalid ones and duplicate names.
    pub fn insert(&mut self, kind: FacilityKindDescriptor) -> Result<(), CatalogError> {
        kind.validate()?;
        if self.get(&kind.name).is_some() {
            return Err(CatalogError::DuplicateKind(kind.name));
        }
        self.kinds.push(kind);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FacilityKindDescriptor> {
        self.kinds.iter().find(|k| k.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FacilityKindDescriptor> {
        self.kinds.iter()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
