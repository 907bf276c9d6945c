//! Stardrift Headless Simulation Harness
//!
//! Validates pure rescue logic and vessel data without the ECS engine.
//! Runs entirely in-process — no world, no rendering.
//!
//! Usage:
//!   cargo run -p stardrift-simtest
//!   cargo run -p stardrift-simtest -- --verbose

use serde::Deserialize;
use stardrift_logic::chemistry::{self, Solution};
use stardrift_logic::naming;
use stardrift_logic::news::{self, ArticleError};
use stardrift_logic::objectives::{all_terminal, tally, ObjectiveStatus, ScanOutcome};
use stardrift_logic::respiration::{self, breath_constants, Atmosphere};
use stardrift_logic::vitals::{self, Damage, DamageKind, MobState};

// ── Vessel manifest (same JSON the engine embeds) ───────────────────────
const MANIFEST_JSON: &str = include_str!("../../../data/vessel_manifest.json");

#[derive(Debug, Deserialize)]
struct AtmosphereSpec {
    o2: f32,
    pressure: f32,
}

#[derive(Debug, Deserialize)]
struct VictimSpec {
    brute: f32,
    burn: f32,
    toxin: f32,
    airloss: f32,
    critical: bool,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct CargoSpec {
    label: String,
}

#[derive(Debug, Deserialize)]
struct VesselSpec {
    id: String,
    name_template: String,
    atmosphere: AtmosphereSpec,
    victims: Vec<VictimSpec>,
    cargo: Vec<CargoSpec>,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Stardrift Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Vessel manifest validation
    results.extend(validate_vessel_manifest(verbose));

    // 2. Vitals thresholds
    results.extend(validate_vitals(verbose));

    // 3. Respiration cycle sweep
    results.extend(validate_respiration(verbose));

    // 4. Chemistry conservation
    results.extend(validate_chemistry(verbose));

    // 5. Naming round trip
    results.extend(validate_naming(verbose));

    // 6. Objective tally truth table
    results.extend(validate_objectives(verbose));

    // 7. News feed rules
    results.extend(validate_news(verbose));

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

// ── 1. Vessel Manifest ──────────────────────────────────────────────────

fn validate_vessel_manifest(_verbose: bool) -> Vec<TestResult> {
    println!("--- Vessel Manifest ---");
    let mut results = Vec::new();

    let manifest: Vec<VesselSpec> = match serde_json::from_str(MANIFEST_JSON) {
        Ok(m) => m,
        Err(e) => {
            results.push(TestResult {
                name: "manifest_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "manifest_not_empty".into(),
        passed: !manifest.is_empty(),
        detail: format!("{} vessel templates loaded", manifest.len()),
    });

    // Ids must be unique
    let mut ids: Vec<&str> = manifest.iter().map(|v| v.id.as_str()).collect();
    ids.sort_unstable();
    let unique = ids.windows(2).all(|w| w[0] != w[1]);
    results.push(TestResult {
        name: "manifest_unique_ids".into(),
        passed: unique,
        detail: if unique {
            "all template ids unique".into()
        } else {
            "duplicate template ids found".into()
        },
    });

    // Name templates must yield a serial designation
    let bad_names: Vec<_> = manifest
        .iter()
        .filter(|v| {
            let name = naming::format_serial(&v.name_template, 123);
            naming::designation(&name) != Some("123")
        })
        .collect();
    results.push(TestResult {
        name: "manifest_name_templates".into(),
        passed: bad_names.is_empty(),
        detail: if bad_names.is_empty() {
            "all name templates end in a serial".into()
        } else {
            format!(
                "{} templates without a trailing serial: {}",
                bad_names.len(),
                bad_names
                    .iter()
                    .map(|v| v.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        },
    });

    // Atmospheres must be physical
    let bad_atmo: Vec<_> = manifest
        .iter()
        .filter(|v| {
            v.atmosphere.o2 < 0.0
                || v.atmosphere.o2 > 1.0
                || v.atmosphere.pressure < 0.0
                || v.atmosphere.pressure > 2.0
        })
        .collect();
    results.push(TestResult {
        name: "manifest_physical_atmospheres".into(),
        passed: bad_atmo.is_empty(),
        detail: if bad_atmo.is_empty() {
            "all atmospheres within physical bounds".into()
        } else {
            format!("{} vessels with implausible atmosphere", bad_atmo.len())
        },
    });

    // Every vessel needs at least one objective aboard
    let bare: Vec<_> = manifest
        .iter()
        .filter(|v| v.victims.is_empty() && v.cargo.is_empty())
        .collect();
    results.push(TestResult {
        name: "manifest_has_objectives".into(),
        passed: bare.is_empty(),
        detail: if bare.is_empty() {
            "every vessel carries victims or cargo".into()
        } else {
            format!(
                "{} vessels with nothing aboard: {}",
                bare.len(),
                bare.iter().map(|v| v.id.as_str()).collect::<Vec<_>>().join(", ")
            )
        },
    });

    // Victims must spawn alive (rescuable), not dead on arrival
    let dead_on_arrival: Vec<_> = manifest
        .iter()
        .flat_map(|v| v.victims.iter().map(move |s| (v.id.as_str(), s)))
        .filter(|(_, s)| {
            let total = s.brute + s.burn + s.toxin + s.airloss;
            vitals::mob_state(total) == MobState::Dead
        })
        .collect();
    results.push(TestResult {
        name: "manifest_victims_rescuable".into(),
        passed: dead_on_arrival.is_empty(),
        detail: if dead_on_arrival.is_empty() {
            "no victim spawns dead".into()
        } else {
            format!("{} victims spawn dead", dead_on_arrival.len())
        },
    });

    // At least one critical objective somewhere keeps the failure path live
    let critical_count = manifest
        .iter()
        .flat_map(|v| v.victims.iter())
        .filter(|s| s.critical)
        .count();
    results.push(TestResult {
        name: "manifest_critical_present".into(),
        passed: critical_count > 0,
        detail: format!("{} critical victims across all templates", critical_count),
    });

    results
}

// ── 2. Vitals ───────────────────────────────────────────────────────────

fn validate_vitals(verbose: bool) -> Vec<TestResult> {
    println!("--- Vitals ---");
    let mut results = Vec::new();

    let cases = [
        (0.0, MobState::Alive),
        (99.0, MobState::Alive),
        (vitals::CRITICAL_THRESHOLD, MobState::Critical),
        (150.0, MobState::Critical),
        (vitals::DEAD_THRESHOLD, MobState::Dead),
    ];
    let all_match = cases.iter().all(|(total, state)| vitals::mob_state(*total) == *state);
    results.push(TestResult {
        name: "vitals_state_tiers".into(),
        passed: all_match,
        detail: format!("{} threshold cases", cases.len()),
    });

    let mut damage = Damage::new(10.0, 0.0, 0.0, 50.0);
    damage.heal(DamageKind::Airloss, 100.0);
    results.push(TestResult {
        name: "vitals_heal_floor".into(),
        passed: damage.airloss == 0.0 && damage.total() == 10.0,
        detail: format!("over-heal floors at zero (total {})", damage.total()),
    });

    if verbose {
        println!("  critical at {}, dead at {}", vitals::CRITICAL_THRESHOLD, vitals::DEAD_THRESHOLD);
    }

    results
}

// ── 3. Respiration ──────────────────────────────────────────────────────

fn validate_respiration(verbose: bool) -> Vec<TestResult> {
    println!("--- Respiration ---");
    let mut results = Vec::new();

    // Standard air sustains breathing indefinitely.
    let standard = Atmosphere::standard();
    let mut saturation = breath_constants::MAX_SATURATION;
    let mut suffocated = false;
    for cycle in 0..200 {
        saturation = respiration::clamp_saturation(saturation - breath_constants::CYCLE_DELAY);
        if cycle % 2 == 0 {
            saturation =
                respiration::clamp_saturation(saturation + respiration::saturation_gain(&standard));
        }
        if respiration::is_suffocating(saturation) {
            suffocated = true;
        }
    }
    results.push(TestResult {
        name: "respiration_standard_sustains".into(),
        passed: !suffocated,
        detail: format!("final saturation {:.1}", saturation),
    });

    // Vacuum exposure hits the suffocation threshold within a few cycles.
    let mut saturation = breath_constants::MAX_SATURATION;
    let mut cycles_until_suffocating = None;
    for cycle in 0..50 {
        saturation = respiration::clamp_saturation(saturation - breath_constants::CYCLE_DELAY);
        if respiration::is_suffocating(saturation) {
            cycles_until_suffocating = Some(cycle + 1);
            break;
        }
    }
    results.push(TestResult {
        name: "respiration_vacuum_suffocates".into(),
        passed: matches!(cycles_until_suffocating, Some(c) if c <= 10),
        detail: format!("suffocating after {:?} cycles", cycles_until_suffocating),
    });

    // Gain scales monotonically with oxygen fraction.
    let gains: Vec<f32> = [0.05, 0.10, 0.16, 0.21]
        .iter()
        .map(|&o2| respiration::saturation_gain(&Atmosphere { o2, pressure: 1.0 }))
        .collect();
    let monotonic = gains.windows(2).all(|w| w[0] <= w[1]);
    results.push(TestResult {
        name: "respiration_gain_monotonic".into(),
        passed: monotonic,
        detail: format!("gains {:?}", gains),
    });

    if verbose {
        println!(
            "  cycle {}s, threshold {}, damage {}/cycle",
            breath_constants::CYCLE_DELAY,
            breath_constants::SUFFOCATION_THRESHOLD,
            breath_constants::SUFFOCATION_DAMAGE
        );
    }

    results
}

// ── 4. Chemistry ────────────────────────────────────────────────────────

fn validate_chemistry(verbose: bool) -> Vec<TestResult> {
    println!("--- Chemistry ---");
    let mut results = Vec::new();

    // Split conserves volume.
    let mut solution = Solution::with_reagents(30.0, &[("epinephrine", 12.0), ("dylovene", 6.0)]);
    let before = solution.total_volume();
    let taken = solution.split(9.0);
    let conserved = (before - solution.total_volume() - taken.total_volume()).abs() < 0.001;
    results.push(TestResult {
        name: "chemistry_split_conserves".into(),
        passed: conserved,
        detail: format!(
            "{:.1} = {:.1} + {:.1}",
            before,
            solution.total_volume(),
            taken.total_volume()
        ),
    });

    // Metabolism drains to empty and reports everything consumed.
    let mut stream = Solution::with_reagents(50.0, &[("bicaridine", 4.0)]);
    let mut consumed_total = 0.0;
    for _ in 0..20 {
        for (_, qty) in chemistry::metabolise(&mut stream, 0.5, 1.0) {
            consumed_total += qty;
        }
    }
    results.push(TestResult {
        name: "chemistry_metabolise_drains".into(),
        passed: stream.is_empty() && (consumed_total - 4.0).abs() < 0.001,
        detail: format!("{:.1} units metabolised", consumed_total),
    });

    // Dose capping.
    let capped = chemistry::injection_dose(5.0, 3.0, 100.0) == 3.0
        && chemistry::injection_dose(5.0, 100.0, 2.0) == 2.0
        && chemistry::injection_dose(5.0, 100.0, 100.0) == 5.0;
    results.push(TestResult {
        name: "chemistry_dose_caps".into(),
        passed: capped,
        detail: "dose limited by reservoir and target space".into(),
    });

    // Every stocked medicine maps to a damage group.
    let medicines = ["epinephrine", "bicaridine", "dermaline", "dylovene"];
    let all_active = medicines.iter().all(|id| chemistry::reagent_effect(id).is_some());
    results.push(TestResult {
        name: "chemistry_medicines_active".into(),
        passed: all_active && chemistry::reagent_effect("saline").is_none(),
        detail: format!("{} medicines, unknown reagents inert", medicines.len()),
    });

    if verbose {
        println!("  default dose {}u", chemistry::DEFAULT_TRANSFER_AMOUNT);
    }

    results
}

// ── 5. Naming ───────────────────────────────────────────────────────────

fn validate_naming(_verbose: bool) -> Vec<TestResult> {
    println!("--- Naming ---");
    let mut results = Vec::new();

    let serials_ok = (0..1000).all(|serial| {
        let name = naming::format_serial("SDV Kestrel {}", serial);
        naming::designation(&name) == Some(format!("{:03}", serial).as_str())
    });
    results.push(TestResult {
        name: "naming_serial_sweep".into(),
        passed: serials_ok,
        detail: "all 1000 serials produce 3-digit designations".into(),
    });

    results.push(TestResult {
        name: "naming_blank_rejected".into(),
        passed: naming::designation("").is_none() && naming::designation("  ").is_none(),
        detail: "blank names yield no designation".into(),
    });

    results
}

// ── 6. Objectives ───────────────────────────────────────────────────────

fn validate_objectives(verbose: bool) -> Vec<TestResult> {
    use ObjectiveStatus::*;
    println!("--- Objectives ---");
    let mut results = Vec::new();

    let failed = Failed { critical: false };
    let failed_critical = Failed { critical: true };

    // Success iff any completion, for every size up to 8.
    let mut exhaustive_ok = true;
    for n in 1..=8usize {
        for completed in 0..=n {
            let mut statuses = vec![failed; n];
            for status in statuses.iter_mut().take(completed) {
                *status = Completed;
            }
            let expected = ScanOutcome::AllResolved {
                success: completed > 0,
            };
            if tally(&statuses) != expected {
                exhaustive_ok = false;
            }
        }
    }
    results.push(TestResult {
        name: "objectives_outcome_table".into(),
        passed: exhaustive_ok,
        detail: "all terminal mixes up to 8 objectives".into(),
    });

    // Critical failure short-circuits regardless of the rest.
    let critical_ok = tally(&[Completed, failed_critical]) == ScanOutcome::CriticalFailure
        && tally(&[Pending, failed_critical]) == ScanOutcome::CriticalFailure;
    results.push(TestResult {
        name: "objectives_critical_short_circuit".into(),
        passed: critical_ok,
        detail: "critical failure overrides completions and pendings".into(),
    });

    // Debounce re-validation rejects reversion, tolerates terminal flips.
    let revalidation_ok = all_terminal(&[Completed, failed])
        && !all_terminal(&[Completed, Pending])
        && all_terminal(&[failed, failed]);
    results.push(TestResult {
        name: "objectives_debounce_revalidation".into(),
        passed: revalidation_ok,
        detail: "pending reverts abort, terminal flips don't".into(),
    });

    if verbose {
        println!("  debounce window {}s", stardrift_logic::objectives::DEBOUNCE_DELAY);
    }

    results
}

// ── 7. News ─────────────────────────────────────────────────────────────

fn validate_news(_verbose: bool) -> Vec<TestResult> {
    println!("--- News ---");
    let mut results = Vec::new();

    let rules_ok = news::validate_article("Title", "Body").is_ok()
        && news::validate_article("", "Body") == Err(ArticleError::EmptyTitle)
        && news::validate_article(&"t".repeat(news::MAX_TITLE_LEN + 1), "b")
            == Err(ArticleError::TitleTooLong {
                len: news::MAX_TITLE_LEN + 1,
            });
    results.push(TestResult {
        name: "news_validation".into(),
        passed: rules_ok,
        detail: "title and length rules enforced".into(),
    });

    let cooldown_ok = news::can_share(0.0, None)
        && !news::can_share(news::SHARE_COOLDOWN - 1.0, Some(0.0))
        && news::can_share(news::SHARE_COOLDOWN, Some(0.0));
    results.push(TestResult {
        name: "news_share_cooldown".into(),
        passed: cooldown_ok,
        detail: format!("{}s cooldown between shares", news::SHARE_COOLDOWN),
    });

    results
}
