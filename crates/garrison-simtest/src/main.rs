//! Garrison Headless Harness
//!
//! Validates the facility catalog data and the attach/save/load pipeline.
//! Runs entirely in-process — no rendering, no turn engine.
//!
//! Usage:
//!   cargo run -p garrison-simtest
//!   cargo run -p garrison-simtest -- --verbose

use garrison_core::persistence::{self, PendingLoad};
use garrison_core::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;

// ── Facility catalog (same JSON the game loads) ─────────────────────────
const CATALOG_JSON: &str = include_str!("../../../data/facility_kinds.json");

/// Loose view of a catalog entry, read independently of the typed loader.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct RawKind {
    name: String,
    unit_kind: String,
    max_capacity: usize,
    curve: Vec<f32>,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn check(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    if verbose {
        tracing_subscriber::fmt()
            .with_max_level(LevelFilter::DEBUG)
            .with_target(false)
            .without_time()
            .init();
    }
    println!("=== Garrison Facility Harness ===\n");

    let mut results = Vec::new();

    // 1. Catalog data validation
    results.extend(validate_catalog());

    // 2. Efficiency curves and gating
    results.extend(validate_gating());

    // 3. Airbase end-to-end scenario
    results.extend(validate_airbase_scenario());

    // 4. Randomized attach/destroy/save/load sweep
    results.extend(validate_random_sweep(200));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Catalog ──────────────────────────────────────────────────────────

fn validate_catalog() -> Vec<TestResult> {
    println!("--- Facility Catalog ---");
    let mut results = Vec::new();

    let raw: Vec<RawKind> = match serde_json::from_str(CATALOG_JSON) {
        Ok(r) => r,
        Err(e) => {
            results.push(TestResult::check(
                "catalog_parse",
                false,
                format!("JSON parse error: {}", e),
            ));
            return results;
        }
    };

    results.push(TestResult::check(
        "catalog_curves_have_four_points",
        raw.iter().all(|k| k.curve.len() == 4),
        format!("{} kinds", raw.len()),
    ));

    match FacilityCatalog::from_json(CATALOG_JSON) {
        Ok(catalog) => {
            results.push(TestResult::check(
                "catalog_typed_load",
                catalog.len() == raw.len(),
                format!("{} kinds loaded", catalog.len()),
            ));
            let missing: Vec<String> = FacilityKindDescriptor::builtin()
                .into_iter()
                .filter(|k| catalog.get(&k.name) != Some(k))
                .map(|k| k.name)
                .collect();
            results.push(TestResult::check(
                "catalog_matches_builtin",
                missing.is_empty(),
                if missing.is_empty() {
                    "all built-in kinds present".to_string()
                } else {
                    format!("differs: {:?}", missing)
                },
            ));
        }
        Err(e) => results.push(TestResult::check("catalog_typed_load", false, e.to_string())),
    }

    results
}

// ── 2. Gating ───────────────────────────────────────────────────────────

fn validate_gating() -> Vec<TestResult> {
    println!("--- Efficiency & Gating ---");
    let mut results = Vec::new();
    let model = DamageModel::default();
    let airbase = FacilityKindDescriptor::airbase();

    let mut mismatches = Vec::new();
    let mut damage = 0.0f32;
    while damage <= model.max_damage * 1.2 {
        let tier = model.tier(damage);
        let expected = match tier {
            CapacityTier::Full => 1.0,
            CapacityTier::SlightlyDegraded => 0.7,
            CapacityTier::ModeratelyDegraded => 0.4,
            CapacityTier::HeavilyDegraded => 0.2,
            CapacityTier::OutOfOperation => 0.0,
        };
        if airbase.efficiency(tier) != expected {
            mismatches.push(damage);
        }
        damage += 0.5;
    }
    results.push(TestResult::check(
        "airbase_efficiency_sweep",
        mismatches.is_empty(),
        format!("{} damage values off-curve", mismatches.len()),
    ));

    let launch_ok = CapacityTier::ALL.iter().all(|t| {
        airbase.can_launch(*t)
            == !matches!(t, CapacityTier::HeavilyDegraded | CapacityTier::OutOfOperation)
    });
    let receive_ok = CapacityTier::ALL
        .iter()
        .all(|t| airbase.can_receive(*t) == (*t != CapacityTier::OutOfOperation));
    results.push(TestResult::check("airbase_launch_gate", launch_ok, "launch floor"));
    results.push(TestResult::check("airbase_receive_gate", receive_ok, "receive floor"));

    let zero_when_out = FacilityKindDescriptor::builtin()
        .iter()
        .all(|k| k.efficiency(CapacityTier::OutOfOperation) == 0.0);
    results.push(TestResult::check(
        "out_of_operation_zero",
        zero_when_out,
        "every kind",
    ));

    results
}

// ── 3. Airbase scenario ─────────────────────────────────────────────────

fn validate_airbase_scenario() -> Vec<TestResult> {
    println!("--- Airbase Scenario ---");
    let mut results = Vec::new();
    let mut theater = Theater::with_builtin();
    let base = match theater.found_facility("airbase", "Ramstein", [12, 7]) {
        Ok(b) => b,
        Err(e) => {
            results.push(TestResult::check("found_airbase", false, e.to_string()));
            return results;
        }
    };

    // Kind is checked while the base still has room; once full, capacity wins.
    let tank = theater.spawn_unit("3 AD", UnitKind::Ground).ok();
    let wrong_kind = tank.map(|t| theater.attach(base, t));
    results.push(TestResult::check(
        "ground_unit_rejected",
        matches!(wrong_kind, Some(Err(FacilityError::KindMismatch { .. }))),
        format!("{:?}", wrong_kind),
    ));

    let units: Vec<_> = (0..5)
        .filter_map(|i| theater.spawn_unit(format!("86 TAW/{i}"), UnitKind::Air).ok())
        .collect();
    let first_four =
        units.len() == 5 && units[..4].iter().all(|u| theater.attach(base, *u).is_ok());
    results.push(TestResult::check("attach_four", first_four, "4 squadrons"));
    if !first_four {
        return results;
    }

    let fifth = theater.attach(base, units[4]);
    results.push(TestResult::check(
        "fifth_rejected",
        matches!(fifth, Err(FacilityError::CapacityExceeded { capacity: 4 })),
        format!("{:?}", fifth),
    ));

    let late_tank = tank.map(|t| theater.attach(base, t));
    results.push(TestResult::check(
        "full_base_reports_capacity_first",
        matches!(late_tank, Some(Err(FacilityError::CapacityExceeded { .. }))),
        format!("{:?}", late_tank),
    ));

    let data = persistence::snapshot(&theater);
    let record = &data.facilities[base.0];
    results.push(TestResult::check(
        "record_lists_ids",
        record.unit_count == 4 && record.unit_ids.len() == 4,
        format!("unit_count={}", record.unit_count),
    ));

    // Drop one squadron from the save before reloading.
    let mut trimmed = data.clone();
    trimmed.units.retain(|u| u.id.as_str() != "86 TAW/2");
    let pending = match PendingLoad::from_save(trimmed, FacilityCatalog::builtin()) {
        Ok(p) => p,
        Err(e) => {
            results.push(TestResult::check("pending_load", false, e.to_string()));
            return results;
        }
    };
    let staged = pending
        .staged_references()
        .find(|(id, _)| *id == base)
        .map(|(_, ids)| ids.len())
        .unwrap_or(0);
    results.push(TestResult::check(
        "staged_before_resolve",
        staged == 4,
        format!("{} staged", staged),
    ));

    match pending.finish() {
        Ok(loaded) => {
            let count = loaded.facility(base).map(|f| f.count()).unwrap_or(0);
            let pending_left = loaded.facilities().any(|(_, f)| f.is_pending());
            results.push(TestResult::check(
                "resolved_three_of_four",
                count == 3 && !pending_left,
                format!("{} attached", count),
            ));
        }
        Err(e) => results.push(TestResult::check("resolve", false, e.to_string())),
    }

    results
}

// ── 4. Random sweep ─────────────────────────────────────────────────────

fn validate_random_sweep(steps: usize) -> Vec<TestResult> {
    println!("--- Random Sweep ---");
    let mut rng = rand::thread_rng();
    let mut theater = Theater::with_builtin();
    let kinds = ["airbase", "naval_base", "supply_depot"];
    let facilities: Vec<FacilityId> = kinds
        .iter()
        .enumerate()
        .filter_map(|(i, k)| theater.found_facility(k, format!("site-{i}"), [i as i32, 0]).ok())
        .collect();

    let mut violations = Vec::new();
    let mut next_id = 0;
    for step in 0..steps {
        match rng.gen_range(0..10) {
            0..=4 => {
                let kind = *UnitKind::ALL.choose(&mut rng).unwrap_or(&UnitKind::Air);
                if let Ok(unit) = theater.spawn_unit(format!("u{next_id}"), kind) {
                    next_id += 1;
                    if let Some(f) = facilities.choose(&mut rng) {
                        let _ = theater.attach(*f, unit);
                    }
                }
            }
            5..=6 => {
                let live = theater.live_units();
                if let Some((unit, _)) = live.choose(&mut rng) {
                    theater.destroy_unit(*unit);
                }
            }
            7 => {
                if let Some(f) = facilities.choose(&mut rng) {
                    let _ = theater.apply_damage(*f, rng.gen_range(0.0..30.0));
                }
            }
            _ => {
                theater.advance_turn();
                let mut bytes = Vec::new();
                let reloaded = theater
                    .save(&mut bytes)
                    .and_then(|_| Theater::load(&bytes[..], FacilityCatalog::builtin()));
                match reloaded {
                    Ok(t) => theater = t,
                    Err(e) => violations.push(format!("step {}: reload failed: {}", step, e)),
                }
            }
        }

        for (id, f) in theater.facilities() {
            let attached = f.attached_units(&theater.world);
            if f.count() > f.kind().max_capacity {
                violations.push(format!("step {}: {} over capacity", step, id));
            }
            if attached.len() != f.count() {
                violations.push(format!("step {}: {} holds dead units", step, id));
            }
            let wrong_kind = attached.iter().any(|e| {
                theater
                    .world
                    .get::<&MobileUnit>(*e)
                    .map(|u| u.kind != f.kind().unit_kind)
                    .unwrap_or(true)
            });
            if wrong_kind {
                violations.push(format!("step {}: {} hosts wrong kind", step, id));
            }
            if f.is_pending() {
                violations.push(format!("step {}: {} left pending", step, id));
            }
        }
    }

    vec![TestResult::check(
        "random_sweep_invariants",
        violations.is_empty(),
        if violations.is_empty() {
            format!("{} steps, {} units spawned", steps, next_id)
        } else {
            violations.join("; ")
        },
    )]
}
