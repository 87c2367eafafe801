//! Garrison Core - facilities, unit roster, and save/load
//!
//! Mobile units live in a `hecs` world that owns them. Facilities host units
//! by holding their `Entity` handles without owning them, and persist those
//! links as unit ids only, resolved in a second pass after a load has
//! rebuilt every unit.
//!
//! # Example
//!
//! ```rust,no_run
//! use garrison_core::prelude::*;
//!
//! let mut theater = Theater::with_builtin();
//! let base = theater.found_facility("airbase", "Ramstein", [12, 7]).unwrap();
//! let sqn = theater.spawn_unit("86 TAW/1", UnitKind::Air).unwrap();
//! theater.attach(base, sqn).unwrap();
//!
//! let mut save = Vec::new();
//! theater.save(&mut save).unwrap();
//! let restored = Theater::load(&save[..], FacilityCatalog::builtin()).unwrap();
//! ```

pub mod components;
pub mod facility;
pub mod index;
pub mod persistence;
pub mod theater;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::facility::{Facility, FacilityBase, ResolveReport};
    pub use crate::index::UnitIndex;
    pub use crate::persistence::SaveError;
    pub use crate::theater::Theater;
    pub use garrison_logic::{
        CapacityTier, DamageModel, FacilityCatalog, FacilityError, FacilityKindDescriptor,
        UnitKind,
    };
}
