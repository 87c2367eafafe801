//! Per-kind efficiency curves.
//!
//! A curve maps a [`CapacityTier`] to an output multiplier in `[0, 1]`. The
//! four operational tiers carry configurable values; `OutOfOperation` is
//! always `0.0`. Curves are validated at construction, so `multiplier` is a
//! total function that never fails.

use serde::{Deserialize, Serialize};

use crate::error::FacilityError;
use crate::tier::CapacityTier;

/// Tier → multiplier mapping for one facility kind.
///
/// Serialized as the four operational multipliers, best tier first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f32; 4]", into = "[f32; 4]")]
pub struct EfficiencyCurve {
    full: f32,
    slightly_degraded: f32,
    moderately_degraded: f32,
    heavily_degraded: f32,
}

impl EfficiencyCurve {
    /// The airbase curve: 1.0 / 0.7 / 0.4 / 0.2 / 0.0.
    pub const AIRBASE: EfficiencyCurve = EfficiencyCurve {
        full: 1.0,
        slightly_degraded: 0.7,
        moderately_degraded: 0.4,
        heavily_degraded: 0.2,
    };

    pub const NAVAL_BASE: EfficiencyCurve = EfficiencyCurve {
        full: 1.0,
        slightly_degraded: 0.8,
        moderately_degraded: 0.5,
        heavily_degraded: 0.25,
    };

    pub const DEPOT: EfficiencyCurve = EfficiencyCurve {
        full: 1.0,
        slightly_degraded: 0.75,
        moderately_degraded: 0.5,
        heavily_degraded: 0.25,
    };

    /// Build a curve, rejecting values outside `[0, 1]` and curves that
    /// improve as damage increases.
    pub fn new(
        full: f32,
        slightly_degraded: f32,
        moderately_degraded: f32,
        heavily_degraded: f32,
    ) -> Result<Self, FacilityError> {
        let points = [full, slightly_degraded, moderately_degraded, heavily_degraded];
        if points.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return Err(FacilityError::OperationFailure(format!(
                "efficiency multipliers must lie in [0, 1]: {:?}",
                points
            )));
        }
        if points.windows(2).any(|w| w[1] > w[0]) {
            return Err(FacilityError::OperationFailure(format!(
                "efficiency must not increase with damage: {:?}",
                points
            )));
        }
        Ok(Self {
            full,
            slightly_degraded,
            moderately_degraded,
            heavily_degraded,
        })
    }

    pub fn multiplier(&self, tier: CapacityTier) -> f32 {
        match tier {
            CapacityTier::Full => self.full,
            CapacityTier::SlightlyDegraded => self.slightly_degraded,
            CapacityTier::ModeratelyDegraded => self.moderately_degraded,
            CapacityTier::HeavilyDegraded => self.heavily_degraded,
            CapacityTier::OutOfOperation => 0.0,
        }
    }
}

impl TryFrom<[f32; 4]> for EfficiencyCurve {
    type Error = FacilityError;

    fn try_from(points: [f32; 4]) -> Result<Self, Self::Error> {
        Self::new(points[0], points[1], points[2], points[3])
    }
}

impl From<EfficiencyCurve> for [f32; 4] {
    fn from(curve: EfficiencyCurve) -> Self {
        [
            curve.full,
            curve.slightly_degraded,
            curve.moderately_degraded,
            curve.heavily_degraded,
        ]
    }
}
