//! Pure facility logic for Garrison.
//!
//! Everything here is plain data and functions: no ECS, no I/O, no logging.
//! Callers pass in unit handles and kinds; results come back as values or
//! typed errors, which keeps the rules unit-testable and lets the runtime
//! crate decide how units are stored and what gets reported.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Name-unique set of facility kinds, loadable from JSON |
//! | [`efficiency`] | Tier → output multiplier curves |
//! | [`error`] | Typed failures of strict facility operations |
//! | [`kind`] | Per-kind descriptors: hosted unit kind, capacity, launch/receive gating |
//! | [`registry`] | Bounded, kind-filtered attachment registry |
//! | [`tier`] | Capacity tiers and the damage model that produces them |
//! | [`unit`] | Mobile unit kinds |

pub mod catalog;
pub mod efficiency;
pub mod error;
pub mod kind;
pub mod registry;
pub mod tier;
pub mod unit;

pub use catalog::{CatalogError, FacilityCatalog};
pub use efficiency::EfficiencyCurve;
pub use error::FacilityError;
pub use kind::FacilityKindDescriptor;
pub use registry::AttachmentRegistry;
pub use tier::{CapacityTier, DamageModel};
pub use unit::UnitKind;
