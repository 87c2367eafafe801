//! Capacity tiers and the damage model that produces them.
//!
//! A facility's operational ability is summarized by one of five ordered
//! tiers. The tier is derived from accumulated damage points by a
//! [`DamageModel`]; everything downstream (efficiency, launch/receive gating)
//! depends only on the tier, never on the raw damage value.

use serde::{Deserialize, Serialize};

use crate::error::FacilityError;

/// Operational state of a facility, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CapacityTier {
    Full,
    SlightlyDegraded,
    ModeratelyDegraded,
    HeavilyDegraded,
    OutOfOperation,
}

impl CapacityTier {
    /// All tiers, best first.
    pub const ALL: [CapacityTier; 5] = [
        CapacityTier::Full,
        CapacityTier::SlightlyDegraded,
        CapacityTier::ModeratelyDegraded,
        CapacityTier::HeavilyDegraded,
        CapacityTier::OutOfOperation,
    ];

    /// Whether the facility does anything at all in this tier.
    pub fn is_operational(self) -> bool {
        self != Self::OutOfOperation
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::SlightlyDegraded => "slightly degraded",
            Self::ModeratelyDegraded => "moderately degraded",
            Self::HeavilyDegraded => "heavily degraded",
            Self::OutOfOperation => "out of operation",
        }
    }
}

impl std::fmt::Display for CapacityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps accumulated damage points to a [`CapacityTier`].
///
/// Thresholds are fractions of `max_damage` and must be strictly ascending.
/// Damage below `slight` is `Full`; damage at or above `destroyed` is
/// `OutOfOperation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageModel {
    pub max_damage: f32,
    pub slight: f32,
    pub moderate: f32,
    pub heavy: f32,
    pub destroyed: f32,
}

impl Default for DamageModel {
    fn default() -> Self {
        Self {
            max_damage: 100.0,
            slight: 0.1,
            moderate: 0.35,
            heavy: 0.6,
            destroyed: 0.9,
        }
    }
}

impl DamageModel {
    /// Check that the thresholds are usable.
    pub fn validate(&self) -> Result<(), FacilityError> {
        if self.max_damage.is_nan() || self.max_damage <= 0.0 {
            return Err(FacilityError::OperationFailure(format!(
                "damage model max_damage must be positive, got {}",
                self.max_damage
            )));
        }
        let thresholds = [self.slight, self.moderate, self.heavy, self.destroyed];
        if thresholds.iter().any(|t| !(0.0..=1.0).contains(t)) {
            return Err(FacilityError::OperationFailure(
                "damage thresholds must lie in [0, 1]".into(),
            ));
        }
        if thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(FacilityError::OperationFailure(
                "damage thresholds must be strictly ascending".into(),
            ));
        }
        Ok(())
    }

    /// Tier for the given accumulated damage. Negative damage counts as none.
    pub fn tier(&self, damage: f32) -> CapacityTier {
        let fraction = damage.max(0.0) / self.max_damage;
        if fraction < self.slight {
            CapacityTier::Full
        } else if fraction < self.moderate {
            CapacityTier::SlightlyDegraded
        } else if fraction < self.heavy {
            CapacityTier::ModeratelyDegraded
        } else if fraction < self.destroyed {
            CapacityTier::HeavilyDegraded
        } else {
            CapacityTier::OutOfOperation
        }
    }

    /// Damage points at which `tier` begins.
    pub fn tier_floor(&self, tier: CapacityTier) -> f32 {
        let fraction = match tier {
            CapacityTier::Full => 0.0,
            CapacityTier::SlightlyDegraded => self.slight,
            CapacityTier::ModeratelyDegraded => self.moderate,
            CapacityTier::HeavilyDegraded => self.heavy,
            CapacityTier::OutOfOperation => self.destroyed,
        };
        fraction * self.max_damage
    }
}
