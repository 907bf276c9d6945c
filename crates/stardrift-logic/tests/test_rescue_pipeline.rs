//! Integration tests spanning the pure rescue logic.
//!
//! Exercises: suffocation → damage → mob state → treatment → objective
//! tally, the way the full simulation composes the modules each tick.
//!
//! All tests are pure logic — no ECS, no engine.

use stardrift_logic::chemistry::{self, Solution};
use stardrift_logic::naming;
use stardrift_logic::objectives::{all_terminal, tally, ObjectiveStatus, ScanOutcome};
use stardrift_logic::respiration::{self, breath_constants, Atmosphere};
use stardrift_logic::vitals::{mob_state, Damage, DamageKind, MobState};

// ── Helpers ────────────────────────────────────────────────────────────

/// Run breath cycles against an atmosphere, returning final (saturation, damage).
fn breathe_cycles(atmo: &Atmosphere, cycles: u32, mut saturation: f32) -> (f32, Damage) {
    let mut damage = Damage::NONE;

    for _ in 0..cycles {
        saturation = respiration::clamp_saturation(saturation - breath_constants::CYCLE_DELAY);
        saturation =
            respiration::clamp_saturation(saturation + respiration::saturation_gain(atmo));

        if respiration::is_suffocating(saturation) {
            damage.apply(DamageKind::Airloss, breath_constants::SUFFOCATION_DAMAGE);
        } else {
            damage.heal(DamageKind::Airloss, breath_constants::RECOVERY_HEAL);
        }
    }

    (saturation, damage)
}

// ── Suffocation → treatment loop ───────────────────────────────────────

#[test]
fn vacuum_exposure_accumulates_airloss() {
    let (saturation, damage) = breathe_cycles(&Atmosphere::VACUUM, 30, breath_constants::MAX_SATURATION);

    assert_eq!(saturation, breath_constants::MIN_SATURATION);
    assert!(damage.airloss > 0.0);
    // Thirty cycles in vacuum is survivable but not healthy.
    assert!(damage.airloss >= 20.0);
}

#[test]
fn standard_air_never_suffocates() {
    let (saturation, damage) = breathe_cycles(&Atmosphere::standard(), 100, breath_constants::MAX_SATURATION);

    assert!(saturation > breath_constants::SUFFOCATION_THRESHOLD);
    assert_eq!(damage.airloss, 0.0);
}

#[test]
fn rescue_breathing_recovers_after_exposure() {
    // Suffocate, then breathe standard air again: damage heals back down.
    let (saturation, mut damage) = breathe_cycles(&Atmosphere::VACUUM, 20, breath_constants::MAX_SATURATION);
    // Saturation has to climb back over the threshold before healing
    // starts, so budget extra cycles beyond the arithmetic minimum.
    let cycles_to_heal =
        (damage.airloss / breath_constants::RECOVERY_HEAL).ceil() as u32 + 10;

    let mut sat = saturation;
    for _ in 0..cycles_to_heal {
        sat = respiration::clamp_saturation(sat - breath_constants::CYCLE_DELAY);
        sat = respiration::clamp_saturation(sat + respiration::saturation_gain(&Atmosphere::standard()));
        if !respiration::is_suffocating(sat) {
            damage.heal(DamageKind::Airloss, breath_constants::RECOVERY_HEAL);
        }
    }

    assert_eq!(damage.airloss, 0.0);
    assert_eq!(mob_state(damage.total()), MobState::Alive);
}

#[test]
fn epinephrine_course_stabilises_a_critical_patient() {
    let mut damage = Damage::new(40.0, 0.0, 0.0, 70.0);
    assert_eq!(mob_state(damage.total()), MobState::Critical);

    // A 10-unit epinephrine dose metabolised over time heals 30 airloss.
    let mut stream = Solution::new(chemistry::CHEM_STREAM_CAPACITY);
    let mut reservoir = Solution::with_reagents(30.0, &[("epinephrine", 30.0)]);
    let dose = chemistry::injection_dose(
        10.0,
        reservoir.total_volume(),
        stream.available_volume(),
    );
    for (id, qty) in reservoir.split(dose).reagents {
        stream.add(&id, qty);
    }

    while !stream.is_empty() {
        for (id, used) in chemistry::metabolise(&mut stream, 0.5, 1.0) {
            if let Some((kind, per_unit)) = chemistry::reagent_effect(&id) {
                damage.heal(kind, per_unit * used);
            }
        }
    }

    assert!((damage.airloss - 40.0).abs() < 0.001);
    assert_eq!(mob_state(damage.total()), MobState::Alive);
}

// ── Objective bookkeeping over a simulated event ───────────────────────

#[test]
fn rescue_event_tally_progression() {
    use ObjectiveStatus::*;

    // Three victims, none treated yet.
    let mut statuses = vec![Pending, Pending, Pending];
    assert_eq!(
        tally(&statuses),
        ScanOutcome::InProgress {
            completed: 0,
            failed: 0
        }
    );

    // Two stabilised, one lost.
    statuses[0] = Completed;
    statuses[1] = Completed;
    statuses[2] = Failed { critical: false };
    assert_eq!(tally(&statuses), ScanOutcome::AllResolved { success: true });
    assert!(all_terminal(&statuses));

    // One patient deteriorates during the debounce window: the event must
    // not end on that timer firing.
    statuses[0] = Pending;
    assert!(!all_terminal(&statuses));
}

#[test]
fn critical_objective_loss_overrides_everything() {
    use ObjectiveStatus::*;

    let statuses = [Completed, Completed, Failed { critical: true }];
    assert_eq!(tally(&statuses), ScanOutcome::CriticalFailure);
}

// ── Naming round trip ──────────────────────────────────────────────────

#[test]
fn generated_names_produce_announcable_designations() {
    for serial in [0, 7, 99, 999] {
        let name = naming::format_serial("SDV Kestrel {}", serial);
        let designation = naming::designation(&name).expect("generated name has a last token");
        assert_eq!(designation, format!("{:03}", serial));
    }
}
