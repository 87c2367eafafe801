//! Theater of operations — owns the unit roster and every facility.
//!
//! This is the orchestrator the facility code reports to: it validates
//! handles, logs gameplay-visible failures, prunes facilities when units are
//! destroyed, and drives save/load.

use std::io::{Read, Write};

use garrison_logic::{CapacityTier, DamageModel, FacilityCatalog, FacilityError, UnitKind};
use hecs::{Entity, World};

use crate::components::{Destroyed, FacilityId, MobileUnit};
use crate::facility::{Facility, FacilityBase};
use crate::index::UnitIndex;
use crate::persistence::{self, SaveError};

pub struct Theater {
    /// Unit roster. Owns every `MobileUnit`.
    pub world: World,
    /// Current turn number.
    pub turn: u32,
    facilities: Vec<Facility>,
    catalog: FacilityCatalog,
    damage_model: DamageModel,
}

impl Theater {
    /// Create an empty theater. Fails if the damage model is unusable.
    pub fn new(
        catalog: FacilityCatalog,
        damage_model: DamageModel,
    ) -> Result<Self, FacilityError> {
        damage_model.validate()?;
        Ok(Self::from_parts(
            World::new(),
            Vec::new(),
            catalog,
            damage_model,
            0,
        ))
    }

    /// Empty theater with the built-in facility kinds and default damage model.
    pub fn with_builtin() -> Self {
        Self::from_parts(
            World::new(),
            Vec::new(),
            FacilityCatalog::builtin(),
            DamageModel::default(),
            0,
        )
    }

    pub(crate) fn from_parts(
        world: World,
        facilities: Vec<Facility>,
        catalog: FacilityCatalog,
        damage_model: DamageModel,
        turn: u32,
    ) -> Self {
        Self {
            world,
            turn,
            facilities,
            catalog,
            damage_model,
        }
    }

    pub fn catalog(&self) -> &FacilityCatalog {
        &self.catalog
    }

    pub fn damage_model(&self) -> &DamageModel {
        &self.damage_model
    }

    /// End the turn: despawn units destroyed during it, then bump the counter.
    pub fn advance_turn(&mut self) {
        self.sweep_destroyed();
        self.turn += 1;
    }

    // ── Units ──────────────────────────────────────────────────────────

    /// Spawn a unit. Ids must be unique among live units.
    pub fn spawn_unit(
        &mut self,
        id: impl Into<String>,
        kind: UnitKind,
    ) -> Result<Entity, FacilityError> {
        let unit = MobileUnit::new(id, kind);
        if self.find_unit(unit.id.as_str()).is_some() {
            return Err(FacilityError::OperationFailure(format!(
                "unit id '{}' is already in use",
                unit.id
            )));
        }
        log::debug!("Spawned {} unit {}", unit.kind, unit.id);
        Ok(self.world.spawn((unit,)))
    }

    /// Mark a unit destroyed and free any facility slots it occupied.
    /// Returns false if the unit does not exist.
    pub fn destroy_unit(&mut self, unit: Entity) -> bool {
        if self.world.insert_one(unit, Destroyed).is_err() {
            return false;
        }
        let freed: usize = self
            .facilities
            .iter_mut()
            .map(|f| f.prune_detached(&self.world))
            .sum();
        log::info!("Unit {:?} destroyed, {} facility slots freed", unit, freed);
        true
    }

    /// Despawn every unit marked destroyed. Returns how many were removed.
    pub fn sweep_destroyed(&mut self) -> usize {
        let wrecks: Vec<Entity> = self
            .world
            .query::<&Destroyed>()
            .iter()
            .map(|(e, _)| e)
            .collect();
        for e in &wrecks {
            let _ = self.world.despawn(*e);
        }
        if !wrecks.is_empty() {
            log::debug!("Swept {} destroyed units from the roster", wrecks.len());
        }
        wrecks.len()
    }

    pub fn find_unit(&self, id: &str) -> Option<Entity> {
        self.world
            .query::<(&MobileUnit, Option<&Destroyed>)>()
            .iter()
            .find(|(_, (u, destroyed))| destroyed.is_none() && u.id.as_str() == id)
            .map(|(e, _)| e)
    }

    /// Every unit not marked destroyed, in roster order.
    pub fn live_units(&self) -> Vec<(Entity, MobileUnit)> {
        self.world
            .query::<(&MobileUnit, Option<&Destroyed>)>()
            .iter()
            .filter(|(_, (_, destroyed))| destroyed.is_none())
            .map(|(e, (u, _))| (e, u.clone()))
            .collect()
    }

    pub fn unit_index(&self) -> Result<UnitIndex, SaveError> {
        UnitIndex::build(&self.world)
            .map_err(|id| SaveError::Corrupt(format!("unit id '{}' appears twice", id)))
    }

    // ── Facilities ─────────────────────────────────────────────────────

    /// Found a facility of a catalog kind.
    pub fn found_facility(
        &mut self,
        kind: &str,
        name: impl Into<String>,
        location: [i32; 2],
    ) -> Result<FacilityId, FacilityError> {
        let descriptor = self.catalog.get(kind).cloned().ok_or_else(|| {
            FacilityError::OperationFailure(format!("unknown facility kind '{}'", kind))
        })?;
        let facility = Facility::new(descriptor, FacilityBase::new(name, location));
        log::info!("Founded {} '{}' at {:?}", kind, facility.name(), location);
        self.facilities.push(facility);
        Ok(FacilityId(self.facilities.len() - 1))
    }

    pub fn facility(&self, id: FacilityId) -> Option<&Facility> {
        self.facilities.get(id.0)
    }

    pub fn facilities(&self) -> impl Iterator<Item = (FacilityId, &Facility)> + '_ {
        self.facilities
            .iter()
            .enumerate()
            .map(|(i, f)| (FacilityId(i), f))
    }

    pub fn facility_count(&self) -> usize {
        self.facilities.len()
    }

    fn facility_mut(&mut self, id: FacilityId) -> Result<&mut Facility, FacilityError> {
        self.facilities
            .get_mut(id.0)
            .ok_or_else(|| FacilityError::OperationFailure(format!("no such facility: {}", id)))
    }

    /// Attach a unit to a facility.
    pub fn attach(&mut self, facility: FacilityId, unit: Entity) -> Result<(), FacilityError> {
        let world = &self.world;
        let target = self.facilities.get_mut(facility.0).ok_or_else(|| {
            FacilityError::OperationFailure(format!("no such facility: {}", facility))
        })?;
        match target.add(world, unit) {
            Ok(()) => {
                log::debug!("Attached {:?} to {}", unit, target.name());
                Ok(())
            }
            Err(e) => {
                log::warn!("Cannot attach {:?} to {}: {}", unit, target.name(), e);
                Err(e)
            }
        }
    }

    /// Detach a unit. Returns false if it was not attached.
    pub fn detach(&mut self, facility: FacilityId, unit: Entity) -> bool {
        match self.facilities.get_mut(facility.0) {
            Some(target) => {
                let removed = target.remove(unit);
                if removed {
                    log::debug!("Detached {:?} from {}", unit, target.name());
                }
                removed
            }
            None => false,
        }
    }

    /// Apply damage and return the resulting tier.
    pub fn apply_damage(
        &mut self,
        facility: FacilityId,
        points: f32,
    ) -> Result<CapacityTier, FacilityError> {
        let model = self.damage_model;
        let target = self.facility_mut(facility)?;
        let before = target.tier(&model);
        target.apply_damage(points);
        let after = target.tier(&model);
        if after != before {
            log::info!("{} is now {}", target.name(), after);
        }
        Ok(after)
    }

    pub fn repair(
        &mut self,
        facility: FacilityId,
        points: f32,
    ) -> Result<CapacityTier, FacilityError> {
        let model = self.damage_model;
        let target = self.facility_mut(facility)?;
        target.repair(points);
        Ok(target.tier(&model))
    }

    pub fn tier(&self, facility: FacilityId) -> Option<CapacityTier> {
        self.facility(facility).map(|f| f.tier(&self.damage_model))
    }

    // ── Save / load ────────────────────────────────────────────────────

    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save_theater(writer, self)
    }

    pub fn load<R: Read>(reader: R, catalog: FacilityCatalog) -> Result<Self, SaveError> {
        persistence::load_theater(reader, catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_rejects_duplicate_ids() {
        let mut theater = Theater::with_builtin();
        theater.spawn_unit("36 TFW", UnitKind::Air).unwrap();
        assert!(theater.spawn_unit("36 TFW", UnitKind::Air).is_err());
    }

    #[test]
    fn test_destroyed_id_can_be_reused() {
        let mut theater = Theater::with_builtin();
        let first = theater.spawn_unit("36 TFW", UnitKind::Air).unwrap();
        assert!(theater.destroy_unit(first));
        assert!(theater.spawn_unit("36 TFW", UnitKind::Air).is_ok());
    }

    #[test]
    fn test_unknown_facility_kind() {
        let mut theater = Theater::with_builtin();
        assert!(matches!(
            theater.found_facility("launch_complex", "Site 9", [0, 0]),
            Err(FacilityError::OperationFailure(_))
        ));
    }

    #[test]
    fn test_attach_to_missing_facility() {
        let mut theater = Theater::with_builtin();
        let unit = theater.spawn_unit("a", UnitKind::Air).unwrap();
        assert!(theater.attach(FacilityId(3), unit).is_err());
        assert!(!theater.detach(FacilityId(3), unit));
    }

    #[test]
    fn test_destroy_frees_slot() {
        let mut theater = Theater::with_builtin();
        let base = theater.found_facility("airbase", "Sembach", [5, 5]).unwrap();
        let units: Vec<_> = (0..4)
            .map(|i| theater.spawn_unit(format!("sqn-{i}"), UnitKind::Air).unwrap())
            .collect();
        for u in &units {
            theater.attach(base, *u).unwrap();
        }
        assert!(!theater.facility(base).unwrap().has_capacity());

        assert!(theater.destroy_unit(units[1]));
        let facility = theater.facility(base).unwrap();
        assert_eq!(facility.count(), 3);
        assert!(facility.has_capacity());
        assert!(!facility.contains(units[1]));
    }

    #[test]
    fn test_advance_turn_sweeps_destroyed_units() {
        let mut theater = Theater::with_builtin();
        let base = theater.found_facility("airbase", "Hahn", [4, 4]).unwrap();
        let a = theater.spawn_unit("50 TFW/1", UnitKind::Air).unwrap();
        let b = theater.spawn_unit("50 TFW/2", UnitKind::Air).unwrap();
        theater.attach(base, a).unwrap();
        theater.attach(base, b).unwrap();

        theater.destroy_unit(a);
        assert_eq!(theater.world.len(), 2);

        theater.advance_turn();
        assert_eq!(theater.turn, 1);
        assert_eq!(theater.world.len(), 1);
        assert!(!theater.world.contains(a));
        assert!(theater.find_unit("50 TFW/1").is_none());
        assert_eq!(theater.facility(base).unwrap().attached_units(&theater.world), vec![b]);
        assert_eq!(theater.sweep_destroyed(), 0);
    }

    #[test]
    fn test_wrong_kind_rejected_before_and_after_filling() {
        let mut theater = Theater::with_builtin();
        let base = theater.found_facility("airbase", "Ramstein", [12, 7]).unwrap();
        let tank = theater.spawn_unit("3 AD", UnitKind::Ground).unwrap();
        assert!(matches!(
            theater.attach(base, tank),
            Err(FacilityError::KindMismatch { .. })
        ));

        for i in 0..4 {
            let sqn = theater.spawn_unit(format!("86 TAW/{i}"), UnitKind::Air).unwrap();
            theater.attach(base, sqn).unwrap();
        }
        assert_eq!(
            theater.attach(base, tank),
            Err(FacilityError::CapacityExceeded { capacity: 4 })
        );
    }

    #[test]
    fn test_destroy_unknown_unit() {
        let mut theater = Theater::with_builtin();
        let unit = theater.spawn_unit("a", UnitKind::Air).unwrap();
        theater.world.despawn(unit).unwrap();
        assert!(!theater.destroy_unit(unit));
    }

    #[test]
    fn test_damage_and_repair_change_tier() {
        let mut theater = Theater::with_builtin();
        let base = theater.found_facility("airbase", "Zweibrücken", [2, 8]).unwrap();
        assert_eq!(theater.apply_damage(base, 40.0).unwrap(), CapacityTier::ModeratelyDegraded);
        assert_eq!(theater.apply_damage(base, 25.0).unwrap(), CapacityTier::HeavilyDegraded);
        assert!(!theater.facility(base).unwrap().can_launch(theater.damage_model()));
        assert_eq!(theater.repair(base, 65.0).unwrap(), CapacityTier::Full);
        assert!(theater.apply_damage(FacilityId(9), 1.0).is_err());
    }

    #[test]
    fn test_new_validates_damage_model() {
        let bad = DamageModel {
            heavy: 0.2,
            ..DamageModel::default()
        };
        assert!(Theater::new(FacilityCatalog::builtin(), bad).is_err());
    }

    #[test]
    fn test_live_units_skip_destroyed() {
        let mut theater = Theater::with_builtin();
        let a = theater.spawn_unit("a", UnitKind::Air).unwrap();
        theater.spawn_unit("b", UnitKind::Naval).unwrap();
        theater.destroy_unit(a);
        let ids: Vec<_> = theater
            .live_units()
            .into_iter()
            .map(|(_, u)| u.id.0)
            .collect();
        assert_eq!(ids, vec!["b".to_string()]);
        assert_eq!(theater.unit_index().unwrap().len(), 1);
    }
}
