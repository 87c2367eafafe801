//! Save/Load for a theater of operations.
//!
//! Uses bincode for the save file and serde_json for a readable export of the
//! same data. Units and facilities are written as independent flat records;
//! a facility record names its hosted units by id only.
//!
//! Loading runs in two phases:
//! 1. [`PendingLoad::from_save`] spawns every saved unit into a fresh roster
//!    and rebuilds every facility in the pending-resolution state.
//! 2. [`PendingLoad::finish`] indexes the roster once and resolves each
//!    facility against that index exactly once.
//!
//! Any failure in phase 1 returns before a single facility is resolved.

use std::io::{Read, Write};

use garrison_logic::{DamageModel, FacilityCatalog, UnitKind};
use hecs::World;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{FacilityId, MobileUnit, UnitId};
use crate::facility::Facility;
use crate::index::UnitIndex;
use crate::theater::Theater;

/// Version number for save file format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Base facility fields, written ahead of the attachment fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityBaseRecord {
    /// Catalog name of the facility kind.
    pub kind: String,
    pub name: String,
    pub location: [i32; 2],
    pub damage: f32,
}

/// One facility: base fields, then the hosted unit ids in attachment order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub base: FacilityBaseRecord,
    pub unit_count: u32,
    pub unit_ids: Vec<UnitId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub id: UnitId,
    pub kind: UnitKind,
}

/// Serializable snapshot of a theater.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub turn: u32,
    pub damage_model: DamageModel,
    /// Live units only; destroyed units are not saved.
    pub units: Vec<UnitRecord>,
    pub facilities: Vec<FacilityRecord>,
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("Unknown facility kind '{0}'")]
    UnknownFacilityKind(String),
    #[error("Corrupt save: {0}")]
    Corrupt(String),
}

/// Capture the current state of `theater`.
pub fn snapshot(theater: &Theater) -> SaveData {
    let units = theater
        .live_units()
        .into_iter()
        .map(|(_, unit)| UnitRecord {
            id: unit.id,
            kind: unit.kind,
        })
        .collect();
    let facilities = theater
        .facilities()
        .map(|(_, f)| f.to_record(&theater.world))
        .collect();
    SaveData {
        version: SAVE_VERSION,
        turn: theater.turn,
        damage_model: *theater.damage_model(),
        units,
        facilities,
    }
}

/// Save the theater to a writer
pub fn save_theater<W: Write>(writer: W, theater: &Theater) -> Result<(), SaveError> {
    let data = snapshot(theater);
    bincode::serialize_into(writer, &data)?;
    log::info!(
        "Saved turn {}: {} units, {} facilities",
        data.turn,
        data.units.len(),
        data.facilities.len()
    );
    Ok(())
}

/// Load a theater from a reader, resolving every facility's units.
pub fn load_theater<R: Read>(reader: R, catalog: FacilityCatalog) -> Result<Theater, SaveError> {
    let data: SaveData = bincode::deserialize_from(reader)?;
    PendingLoad::from_save(data, catalog)?.finish()
}

/// Write the theater as pretty-printed JSON.
pub fn export_json<W: Write>(writer: W, theater: &Theater) -> Result<(), SaveError> {
    serde_json::to_writer_pretty(writer, &snapshot(theater))?;
    Ok(())
}

/// Load a theater from JSON written by [`export_json`].
pub fn import_json<R: Read>(reader: R, catalog: FacilityCatalog) -> Result<Theater, SaveError> {
    let data: SaveData = serde_json::from_reader(reader)?;
    PendingLoad::from_save(data, catalog)?.finish()
}

/// A load whose units all exist but whose facilities are not yet resolved.
pub struct PendingLoad {
    world: World,
    facilities: Vec<Facility>,
    catalog: FacilityCatalog,
    damage_model: DamageModel,
    turn: u32,
}

impl PendingLoad {
    /// Phase 1: reconstruct every unit and facility.
    pub fn from_save(data: SaveData, catalog: FacilityCatalog) -> Result<Self, SaveError> {
        if data.version != SAVE_VERSION {
            return Err(SaveError::VersionMismatch {
                expected: SAVE_VERSION,
                found: data.version,
            });
        }
        data.damage_model
            .validate()
            .map_err(|e| SaveError::Corrupt(e.to_string()))?;

        let mut world = World::new();
        for unit in data.units {
            world.spawn((MobileUnit {
                id: unit.id,
                kind: unit.kind,
            },));
        }

        let facilities = data
            .facilities
            .into_iter()
            .map(|record| Facility::from_record(record, &catalog))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            world,
            facilities,
            catalog,
            damage_model: data.damage_model,
            turn: data.turn,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Ids each facility needs resolved.
    pub fn staged_references(&self) -> impl Iterator<Item = (FacilityId, &[UnitId])> + '_ {
        self.facilities
            .iter()
            .enumerate()
            .map(|(i, f)| (FacilityId(i), f.staged_ids()))
    }

    /// Phase 2: index the roster and resolve every facility once.
    pub fn finish(mut self) -> Result<Theater, SaveError> {
        let index = UnitIndex::build(&self.world)
            .map_err(|id| SaveError::Corrupt(format!("unit id '{}' appears twice", id)))?;

        let mut dropped = 0;
        for facility in &mut self.facilities {
            let report = facility.resolve(&index);
            if report.dropped() > 0 {
                log::warn!(
                    "{}: resolved {} of {} saved units",
                    facility.name(),
                    report.attached,
                    report.staged
                );
            }
            dropped += report.dropped();
        }

        log::info!(
            "Loaded turn {}: {} units, {} facilities, {} unit references dropped",
            self.turn,
            index.len(),
            self.facilities.len(),
            dropped
        );

        Ok(Theater::from_parts(
            self.world,
            self.facilities,
            self.catalog,
            self.damage_model,
            self.turn,
        ))
    }
}
