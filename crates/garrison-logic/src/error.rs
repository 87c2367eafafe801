//! Errors raised by facility operations.

use thiserror::Error;

use crate::unit::UnitKind;

/// Failure of a strict facility operation.
///
/// Every variant leaves the facility unchanged. The load-time resolution pass
/// never produces these; it drops bad references instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FacilityError {
    /// The unit handed to `add` does not exist.
    #[error("unit is absent")]
    ArgumentInvalid,
    #[error("facility is at capacity ({capacity} units)")]
    CapacityExceeded { capacity: usize },
    #[error("facility hosts {expected} units, got {found}")]
    KindMismatch { expected: UnitKind, found: UnitKind },
    #[error("unit is already attached")]
    AlreadyAttached,
    #[error("operation failed: {0}")]
    OperationFailure(String),
}
