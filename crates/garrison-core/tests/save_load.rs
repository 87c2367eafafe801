//! Integration tests for the facility save/load pipeline.
//!
//! Exercises: attach → FacilityRecord → pending facility → UnitIndex → resolve,
//! both on a single facility and through a full theater save file.

use garrison_core::facility::{Facility, FacilityBase};
use garrison_core::persistence::{self, FacilityRecord, PendingLoad, SaveError};
use garrison_core::prelude::*;
use hecs::World;

// ── Helpers ────────────────────────────────────────────────────────────

fn spawn_air(world: &mut World, ids: &[&str]) -> Vec<hecs::Entity> {
    ids.iter()
        .map(|id| world.spawn((MobileUnit::new(*id, UnitKind::Air),)))
        .collect()
}

fn airbase() -> Facility {
    Facility::new(
        FacilityKindDescriptor::airbase(),
        FacilityBase::new("Ramstein", [12, 7]),
    )
}

fn ids_of(world: &World, units: &[hecs::Entity]) -> Vec<String> {
    units
        .iter()
        .map(|e| world.get::<&MobileUnit>(*e).unwrap().id.0.clone())
        .collect()
}

// ── Single facility ────────────────────────────────────────────────────

#[test]
fn airbase_end_to_end_scenario() {
    let mut world = World::new();
    let units = spawn_air(&mut world, &["sqn-a", "sqn-b", "sqn-c", "sqn-d", "sqn-e"]);
    let mut base = airbase();

    for u in &units[..4] {
        base.add(&world, *u).unwrap();
    }
    assert_eq!(
        base.add(&world, units[4]),
        Err(FacilityError::CapacityExceeded { capacity: 4 })
    );
    assert_eq!(base.count(), 4);

    let record = base.to_record(&world);
    assert_eq!(record.unit_count, 4);
    assert_eq!(
        record.unit_ids,
        ["sqn-a", "sqn-b", "sqn-c", "sqn-d"].map(UnitId::new).to_vec()
    );

    let mut restored = Facility::from_record(record, &FacilityCatalog::builtin()).unwrap();
    assert_eq!(restored.staged_ids().len(), 4);
    assert_eq!(restored.count(), 0);

    // A fresh roster that lost one of the four squadrons.
    let mut new_world = World::new();
    spawn_air(&mut new_world, &["sqn-a", "sqn-c", "sqn-d"]);
    let report = restored.resolve(&UnitIndex::build(&new_world).unwrap());

    assert_eq!(report.staged, 4);
    assert_eq!(report.attached, 3);
    assert_eq!(restored.count(), 3);
    assert!(restored.staged_ids().is_empty());
    assert_eq!(
        ids_of(&new_world, &restored.attached_units(&new_world)),
        vec!["sqn-a", "sqn-c", "sqn-d"]
    );
}

#[test]
fn roundtrip_preserves_attachment_order() {
    let mut world = World::new();
    let units = spawn_air(&mut world, &["d", "b", "a", "c"]);
    let mut base = airbase();
    for u in [units[2], units[0], units[3], units[1]] {
        base.add(&world, u).unwrap();
    }
    let expected = ids_of(&world, &base.attached_units(&world));

    let record = base.to_record(&world);
    let bytes = bincode::serialize(&record).unwrap();
    let decoded: FacilityRecord = bincode::deserialize(&bytes).unwrap();

    let mut restored = Facility::from_record(decoded, &FacilityCatalog::builtin()).unwrap();
    restored.resolve(&UnitIndex::build(&world).unwrap());

    assert_eq!(ids_of(&world, &restored.attached_units(&world)), expected);
    assert_eq!(expected, vec!["a", "d", "c", "b"]);
}

#[test]
fn resolve_with_one_missing_reference() {
    let names = ["a", "b", "c", "d"];
    for missing in 0..names.len() {
        let mut world = World::new();
        let units = spawn_air(&mut world, &names);
        let mut base = airbase();
        for u in &units {
            base.add(&world, *u).unwrap();
        }
        let record = base.to_record(&world);
        world.despawn(units[missing]).unwrap();

        let mut restored = Facility::from_record(record, &FacilityCatalog::builtin()).unwrap();
        let report = restored.resolve(&UnitIndex::build(&world).unwrap());
        assert_eq!(report.attached, 3);
        assert_eq!(report.dropped(), 1);
        assert!(restored.staged_ids().is_empty());
        assert!(!restored.contains(units[missing]));
    }
}

// ── Full theater ───────────────────────────────────────────────────────

fn populated_theater() -> (Theater, FacilityId, FacilityId) {
    let mut theater = Theater::with_builtin();
    let airbase = theater
        .found_facility("airbase", "Bitburg", [7, 3])
        .unwrap();
    let depot = theater
        .found_facility("supply_depot", "Depot Kaiserslautern", [8, 5])
        .unwrap();

    for i in 0..3 {
        let u = theater.spawn_unit(format!("36 TFW/{i}"), UnitKind::Air).unwrap();
        theater.attach(airbase, u).unwrap();
    }
    for i in 0..2 {
        let u = theater.spawn_unit(format!("3 AD/{i}"), UnitKind::Ground).unwrap();
        theater.attach(depot, u).unwrap();
    }
    // Unattached unit still belongs to the roster.
    theater.spawn_unit("6th Fleet", UnitKind::Naval).unwrap();
    theater.apply_damage(airbase, 40.0).unwrap();
    theater.advance_turn();
    (theater, airbase, depot)
}

#[test]
fn theater_bincode_roundtrip() {
    let (theater, airbase, depot) = populated_theater();

    let mut save = Vec::new();
    theater.save(&mut save).unwrap();
    let loaded = Theater::load(&save[..], FacilityCatalog::builtin()).unwrap();

    assert_eq!(loaded.turn, 1);
    assert_eq!(loaded.live_units().len(), 6);
    assert_eq!(loaded.facility_count(), 2);
    assert_eq!(loaded.tier(airbase), Some(CapacityTier::ModeratelyDegraded));

    for id in [airbase, depot] {
        let before = theater.facility(id).unwrap();
        let after = loaded.facility(id).unwrap();
        assert!(!after.is_pending());
        assert_eq!(after.name(), before.name());
        assert_eq!(
            ids_of(&loaded.world, &after.attached_units(&loaded.world)),
            ids_of(&theater.world, &before.attached_units(&theater.world)),
        );
    }
}

#[test]
fn theater_json_roundtrip() {
    let (theater, airbase, _) = populated_theater();

    let mut json = Vec::new();
    persistence::export_json(&mut json, &theater).unwrap();
    let text = String::from_utf8(json.clone()).unwrap();
    assert!(text.contains("\"unit_count\": 3"));
    assert!(text.contains("36 TFW/0"));

    let loaded = persistence::import_json(&json[..], FacilityCatalog::builtin()).unwrap();
    assert_eq!(loaded.facility(airbase).unwrap().count(), 3);
}

#[test]
fn destroyed_units_are_not_saved_or_resolved() {
    let (mut theater, airbase, _) = populated_theater();
    let lost = theater.find_unit("36 TFW/1").unwrap();
    theater.destroy_unit(lost);

    let data = persistence::snapshot(&theater);
    assert_eq!(data.units.len(), 5);
    assert_eq!(data.facilities[airbase.0].unit_count, 2);

    let loaded = PendingLoad::from_save(data, FacilityCatalog::builtin())
        .unwrap()
        .finish()
        .unwrap();
    assert_eq!(loaded.facility(airbase).unwrap().count(), 2);
}

#[test]
fn stale_reference_does_not_block_load() {
    let (theater, airbase, depot) = populated_theater();
    let mut data = persistence::snapshot(&theater);
    data.facilities[airbase.0].unit_ids.push(UnitId::new("ghost"));
    data.facilities[airbase.0].unit_count += 1;
    // A ground unit listed on the airbase is dropped, not an error.
    data.facilities[airbase.0].unit_ids.push(UnitId::new("3 AD/0"));
    data.facilities[airbase.0].unit_count += 1;

    let loaded = PendingLoad::from_save(data, FacilityCatalog::builtin())
        .unwrap()
        .finish()
        .unwrap();
    assert_eq!(loaded.facility(airbase).unwrap().count(), 3);
    assert_eq!(loaded.facility(depot).unwrap().count(), 2);
}

#[test]
fn missing_kind_in_catalog_aborts_load() {
    let (theater, _, _) = populated_theater();
    let mut save = Vec::new();
    theater.save(&mut save).unwrap();

    let mut narrow = FacilityCatalog::new();
    narrow.insert(FacilityKindDescriptor::airbase()).unwrap();
    assert!(matches!(
        Theater::load(&save[..], narrow),
        Err(SaveError::UnknownFacilityKind(k)) if k == "supply_depot"
    ));
}

#[test]
fn resaving_is_stable() {
    let (theater, _, _) = populated_theater();
    let mut first = Vec::new();
    theater.save(&mut first).unwrap();
    let loaded = Theater::load(&first[..], FacilityCatalog::builtin()).unwrap();
    let mut second = Vec::new();
    loaded.save(&mut second).unwrap();
    assert_eq!(first, second);
}
