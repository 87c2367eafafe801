//! Identifier → unit lookup used by the resolution pass.

use std::collections::HashMap;

use garrison_logic::UnitKind;
use hecs::{Entity, World};

use crate::components::{Destroyed, MobileUnit, UnitId};

/// Every live unit in a roster, keyed by its stable id.
#[derive(Debug, Clone, Default)]
pub struct UnitIndex {
    units: HashMap<UnitId, (Entity, UnitKind)>,
}

impl UnitIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every unit in `world` that is not marked destroyed.
    ///
    /// Fails with the offending id if two units share one.
    pub fn build(world: &World) -> Result<Self, UnitId> {
        let mut index = Self::new();
        for (entity, (unit, destroyed)) in world
            .query::<(&MobileUnit, Option<&Destroyed>)>()
            .iter()
        {
            if destroyed.is_some() {
                continue;
            }
            if !index.insert(unit.id.clone(), entity, unit.kind) {
                return Err(unit.id.clone());
            }
        }
        Ok(index)
    }

    /// Returns false, leaving the index unchanged, if `id` is already present.
    pub fn insert(&mut self, id: UnitId, entity: Entity, kind: UnitKind) -> bool {
        if self.units.contains_key(&id) {
            return false;
        }
        self.units.insert(id, (entity, kind));
        true
    }

    pub fn get(&self, id: &str) -> Option<(Entity, UnitKind)> {
        self.units.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.units.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
