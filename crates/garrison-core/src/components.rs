//! Unit components stored in the roster world.
//!
//! Units are owned by the `hecs::World`; facilities only hold their
//! `Entity` handles.

use std::borrow::Borrow;

use garrison_logic::UnitKind;
use serde::{Deserialize, Serialize};

/// Stable identifier of a mobile unit, persisted in save files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for UnitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UnitId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mobile unit component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileUnit {
    pub id: UnitId,
    pub kind: UnitKind,
}

impl MobileUnit {
    pub fn new(id: impl Into<String>, kind: UnitKind) -> Self {
        Self {
            id: UnitId::new(id),
            kind,
        }
    }
}

/// Marker for a unit destroyed this turn; swept from the roster when the
/// turn advances.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Destroyed;

/// Index of a facility within its theater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FacilityId(pub usize);

impl std::fmt::Display for FacilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "facility#{}", self.0)
    }
}
