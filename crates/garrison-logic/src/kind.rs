//! Facility kind descriptors.
//!
//! A [`FacilityKindDescriptor`] is the per-kind strategy composed into every
//! facility: which unit kind it hosts, how many, its efficiency curve, and the
//! worst tiers at which it can still launch or receive units. Adding a new
//! kind of facility means supplying a new descriptor value.

use serde::{Deserialize, Serialize};

use crate::efficiency::EfficiencyCurve;
use crate::error::FacilityError;
use crate::tier::CapacityTier;
use crate::unit::UnitKind;

/// Static description of one facility kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityKindDescriptor {
    pub name: String,
    /// The only unit kind this facility may host.
    pub unit_kind: UnitKind,
    pub max_capacity: usize,
    pub curve: EfficiencyCurve,
    /// Worst tier that still allows launching units. `None` for kinds that
    /// never launch.
    #[serde(default)]
    pub launch_floor: Option<CapacityTier>,
    /// Worst tier that still allows receiving units. `None` for kinds that
    /// never receive.
    #[serde(default)]
    pub receive_floor: Option<CapacityTier>,
}

impl FacilityKindDescriptor {
    pub fn airbase() -> Self {
        Self {
            name: "airbase".into(),
            unit_kind: UnitKind::Air,
            max_capacity: 4,
            curve: EfficiencyCurve::AIRBASE,
            launch_floor: Some(CapacityTier::ModeratelyDegraded),
            receive_floor: Some(CapacityTier::HeavilyDegraded),
        }
    }

    pub fn naval_base() -> Self {
        Self {
            name: "naval_base".into(),
            unit_kind: UnitKind::Naval,
            max_capacity: 6,
            curve: EfficiencyCurve::NAVAL_BASE,
            launch_floor: Some(CapacityTier::HeavilyDegraded),
            receive_floor: Some(CapacityTier::HeavilyDegraded),
        }
    }

    /// Ground supply depot: hosts units but performs no launch operations.
    pub fn supply_depot() -> Self {
        Self {
            name: "supply_depot".into(),
            unit_kind: UnitKind::Ground,
            max_capacity: 8,
            curve: EfficiencyCurve::DEPOT,
            launch_floor: None,
            receive_floor: Some(CapacityTier::HeavilyDegraded),
        }
    }

    /// All descriptors compiled into the crate.
    pub fn builtin() -> Vec<Self> {
        vec![Self::airbase(), Self::naval_base(), Self::supply_depot()]
    }

    pub fn validate(&self) -> Result<(), FacilityError> {
        if self.name.trim().is_empty() {
            return Err(FacilityError::OperationFailure(
                "facility kind needs a name".into(),
            ));
        }
        if self.max_capacity == 0 {
            return Err(FacilityError::OperationFailure(format!(
                "facility kind '{}' must host at least one unit",
                self.name
            )));
        }
        for floor in [self.launch_floor, self.receive_floor].into_iter().flatten() {
            if floor == CapacityTier::OutOfOperation {
                return Err(FacilityError::OperationFailure(format!(
                    "facility kind '{}' cannot operate while out of operation",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Output multiplier for the given tier.
    pub fn efficiency(&self, tier: CapacityTier) -> f32 {
        self.curve.multiplier(tier)
    }

    /// Whether units can be launched from a facility in `tier`.
    pub fn can_launch(&self, tier: CapacityTier) -> bool {
        self.launch_floor.is_some_and(|floor| tier <= floor)
    }

    /// Whether units can be received by a facility in `tier`.
    pub fn can_receive(&self, tier: CapacityTier) -> bool {
        self.receive_floor.is_some_and(|floor| tier <= floor)
    }
}
