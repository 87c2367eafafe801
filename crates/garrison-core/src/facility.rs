//! Facilities: a kind descriptor, base state, and hosted units.
//!
//! A facility is either live, holding `Entity` handles to the units it hosts,
//! or pending resolution, holding only the unit ids read from a save. The two
//! never coexist. Loading puts a facility in the pending state; a single
//! [`Facility::resolve`] call against a complete [`UnitIndex`] makes it live.
//!
//! Saving writes unit ids, never unit data, so the save format has no cycle
//! between facilities and the units they host.

use garrison_logic::{
    AttachmentRegistry, CapacityTier, DamageModel, FacilityCatalog, FacilityError,
    FacilityKindDescriptor,
};
use hecs::{Entity, World};

use crate::components::{Destroyed, MobileUnit, UnitId};
use crate::index::UnitIndex;
use crate::persistence::{FacilityBaseRecord, FacilityRecord, SaveError};

/// State shared by every facility kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityBase {
    pub name: String,
    /// Map hex (column, row).
    pub location: [i32; 2],
    /// Accumulated damage points, never negative.
    pub damage: f32,
}

impl FacilityBase {
    pub fn new(name: impl Into<String>, location: [i32; 2]) -> Self {
        Self {
            name: name.into(),
            location,
            damage: 0.0,
        }
    }

    pub fn to_record(&self, kind: &str) -> FacilityBaseRecord {
        FacilityBaseRecord {
            kind: kind.to_string(),
            name: self.name.clone(),
            location: self.location,
            damage: self.damage,
        }
    }

    pub fn from_record(record: &FacilityBaseRecord) -> Self {
        Self {
            name: record.name.clone(),
            location: record.location,
            damage: record.damage.max(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Attachments {
    Live(AttachmentRegistry<Entity>),
    PendingResolution(Vec<UnitId>),
}

/// Outcome of a resolution pass. `attached < staged` means some references
/// were dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveReport {
    pub staged: usize,
    pub attached: usize,
}

impl ResolveReport {
    pub fn dropped(&self) -> usize {
        self.staged - self.attached
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Facility {
    kind: FacilityKindDescriptor,
    base: FacilityBase,
    attachments: Attachments,
}

impl Facility {
    /// A fresh, live facility with nothing attached.
    pub fn new(kind: FacilityKindDescriptor, base: FacilityBase) -> Self {
        let registry = AttachmentRegistry::new(kind.max_capacity, kind.unit_kind);
        Self {
            kind,
            base,
            attachments: Attachments::Live(registry),
        }
    }

    pub fn kind(&self) -> &FacilityKindDescriptor {
        &self.kind
    }

    pub fn base(&self) -> &FacilityBase {
        &self.base
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    // ── Capacity tier and gating ───────────────────────────────────────

    pub fn tier(&self, model: &DamageModel) -> CapacityTier {
        model.tier(self.base.damage)
    }

    pub fn efficiency(&self, model: &DamageModel) -> f32 {
        self.kind.efficiency(self.tier(model))
    }

    pub fn can_launch(&self, model: &DamageModel) -> bool {
        self.kind.can_launch(self.tier(model))
    }

    pub fn can_receive(&self, model: &DamageModel) -> bool {
        self.kind.can_receive(self.tier(model))
    }

    pub fn apply_damage(&mut self, points: f32) {
        self.base.damage = (self.base.damage + points.max(0.0)).max(0.0);
    }

    pub fn repair(&mut self, points: f32) {
        self.base.damage = (self.base.damage - points.max(0.0)).max(0.0);
    }

    // ── Attachment registry ────────────────────────────────────────────

    /// Attach a unit from `world`.
    ///
    /// Fails with `ArgumentInvalid` if the entity is gone, has no
    /// `MobileUnit`, or is destroyed, and with `OperationFailure` while the
    /// facility still awaits resolution. Slots held by dead units are freed
    /// first, then the registry's capacity, kind and duplicate checks apply.
    pub fn add(&mut self, world: &World, unit: Entity) -> Result<(), FacilityError> {
        if !is_live(world, unit) {
            return Err(FacilityError::ArgumentInvalid);
        }
        let kind = world
            .get::<&MobileUnit>(unit)
            .map_err(|_| FacilityError::ArgumentInvalid)?
            .kind;
        match &mut self.attachments {
            Attachments::Live(registry) => {
                registry.retain(|e| is_live(world, e));
                registry.add(unit, kind)
            }
            Attachments::PendingResolution(_) => Err(FacilityError::OperationFailure(format!(
                "{} has unresolved unit references",
                self.base.name
            ))),
        }
    }

    /// Detach a unit. Returns false if it was not attached.
    pub fn remove(&mut self, unit: Entity) -> bool {
        match &mut self.attachments {
            Attachments::Live(registry) => registry.remove(unit),
            Attachments::PendingResolution(_) => false,
        }
    }

    /// Number of occupied slots, including units destroyed since attachment
    /// that have not been pruned yet.
    pub fn count(&self) -> usize {
        match &self.attachments {
            Attachments::Live(registry) => registry.count(),
            Attachments::PendingResolution(_) => 0,
        }
    }

    pub fn has_capacity(&self) -> bool {
        self.count() < self.kind.max_capacity
    }

    pub fn contains(&self, unit: Entity) -> bool {
        match &self.attachments {
            Attachments::Live(registry) => registry.contains(unit),
            Attachments::PendingResolution(_) => false,
        }
    }

    /// Attached units still alive in `world`, in attachment order.
    pub fn attached_units(&self, world: &World) -> Vec<Entity> {
        match &self.attachments {
            Attachments::Live(registry) => {
                registry.iter().filter(|e| is_live(world, *e)).collect()
            }
            Attachments::PendingResolution(_) => Vec::new(),
        }
    }

    /// Drop handles to units that were despawned or destroyed. Returns how
    /// many slots were freed.
    pub fn prune_detached(&mut self, world: &World) -> usize {
        match &mut self.attachments {
            Attachments::Live(registry) => registry.retain(|e| is_live(world, e)),
            Attachments::PendingResolution(_) => 0,
        }
    }

    // ── Persistence ────────────────────────────────────────────────────

    pub fn is_pending(&self) -> bool {
        matches!(self.attachments, Attachments::PendingResolution(_))
    }

    /// Unit ids awaiting resolution; empty once live.
    pub fn staged_ids(&self) -> &[UnitId] {
        match &self.attachments {
            Attachments::PendingResolution(ids) => ids,
            Attachments::Live(_) => &[],
        }
    }

    /// Write the base state followed by the ids of the hosted units in
    /// attachment order. Units no longer alive are left out. A facility
    /// still pending resolution writes its staged ids back unchanged.
    pub fn to_record(&self, world: &World) -> FacilityRecord {
        let unit_ids: Vec<UnitId> = match &self.attachments {
            Attachments::Live(registry) => registry
                .iter()
                .filter(|e| is_live(world, *e))
                .filter_map(|e| world.get::<&MobileUnit>(e).ok().map(|u| u.id.clone()))
                .collect(),
            Attachments::PendingResolution(ids) => ids.clone(),
        };
        FacilityRecord {
            base: self.base.to_record(&self.kind.name),
            unit_count: unit_ids.len() as u32,
            unit_ids,
        }
    }

    /// Rebuild a facility from its record. The result is pending resolution:
    /// the referenced units may not exist yet.
    pub fn from_record(
        record: FacilityRecord,
        catalog: &FacilityCatalog,
    ) -> Result<Self, SaveError> {
        let kind = catalog
            .get(&record.base.kind)
            .ok_or_else(|| SaveError::UnknownFacilityKind(record.base.kind.clone()))?
            .clone();
        if record.unit_count as usize != record.unit_ids.len() {
            return Err(SaveError::Corrupt(format!(
                "facility '{}' declares {} units but lists {}",
                record.base.name,
                record.unit_count,
                record.unit_ids.len()
            )));
        }
        Ok(Self {
            kind,
            base: FacilityBase::from_record(&record.base),
            attachments: Attachments::PendingResolution(record.unit_ids),
        })
    }

    /// Turn staged ids into attached units.
    ///
    /// Ids missing from `index`, of the wrong kind, repeated, or beyond
    /// capacity are skipped without error. Staged ids are cleared either way.
    /// Call once per facility after every saved unit has been spawned and
    /// indexed; on a live facility this does nothing.
    pub fn resolve(&mut self, index: &UnitIndex) -> ResolveReport {
        let staged = match &mut self.attachments {
            Attachments::PendingResolution(ids) => std::mem::take(ids),
            Attachments::Live(_) => return ResolveReport::default(),
        };
        let mut registry = AttachmentRegistry::new(self.kind.max_capacity, self.kind.unit_kind);
        for id in &staged {
            if let Some((entity, kind)) = index.get(id.as_str()) {
                registry.restore(entity, kind);
            }
        }
        let report = ResolveReport {
            staged: staged.len(),
            attached: registry.count(),
        };
        self.attachments = Attachments::Live(registry);
        report
    }
}

fn is_live(world: &World, unit: Entity) -> bool {
    world.contains(unit) && world.get::<&Destroyed>(unit).is_err()
}
