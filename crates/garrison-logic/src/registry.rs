//! Bounded, kind-filtered attachment registry.
//!
//! Holds non-owning handles to the units a facility hosts, in attachment
//! order. The handle type is whatever the host uses to refer to units
//! (an ECS entity, an index, an id); the registry only needs to compare them.
//! The caller passes the unit's kind alongside the handle so the registry can
//! enforce its kind constraint without knowing how units are stored.

use crate::error::FacilityError;
use crate::unit::UnitKind;

#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentRegistry<H> {
    slots: Vec<H>,
    max_capacity: usize,
    required_kind: UnitKind,
}

impl<H: Copy + PartialEq> AttachmentRegistry<H> {
    pub fn new(max_capacity: usize, required_kind: UnitKind) -> Self {
        Self {
            slots: Vec::with_capacity(max_capacity),
            max_capacity,
            required_kind,
        }
    }

    /// Attach a unit.
    ///
    /// Checks capacity, then kind, then duplicates; the first failing check
    /// is reported and the registry is left unchanged.
    pub fn add(&mut self, unit: H, kind: UnitKind) -> Result<(), FacilityError> {
        if self.slots.len() >= self.max_capacity {
            return Err(FacilityError::CapacityExceeded {
                capacity: self.max_capacity,
            });
        }
        if kind != self.required_kind {
            return Err(FacilityError::KindMismatch {
                expected: self.required_kind,
                found: kind,
            });
        }
        if self.contains(unit) {
            return Err(FacilityError::AlreadyAttached);
        }
        self.slots.push(unit);
        Ok(())
    }

    /// Detach the first entry matching `unit`. Returns whether anything was
    /// removed.
    pub fn remove(&mut self, unit: H) -> bool {
        match self.slots.iter().position(|h| *h == unit) {
            Some(idx) => {
                self.slots.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Lenient attach used when restoring from a save: anything `add` would
    /// reject is ignored. Returns whether the unit was attached.
    pub fn restore(&mut self, unit: H, kind: UnitKind) -> bool {
        self.add(unit, kind).is_ok()
    }

    /// Drop every handle for which `keep` returns false. Returns how many
    /// were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(H) -> bool) -> usize {
        let before = self.slots.len();
        self.slots.retain(|h| keep(*h));
        before - self.slots.len()
    }

    pub fn contains(&self, unit: H) -> bool {
        self.slots.contains(&unit)
    }

    pub fn count(&self) -> usize {
        self.slots.len()
    }

    pub fn has_capacity(&self) -> bool {
        self.count() < self.max_capacity
    }

    /// Attached handles in attachment order.
    pub fn handles(&self) -> &[H] {
        &self.slots
    }

    pub fn iter(&self) -> impl Iterator<Item = H> + '_ {
        self.slots.iter().copied()
    }
}
