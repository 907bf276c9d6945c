//! Integration tests for the full distress signal event lifecycle.
//!
//! Exercises: launch → FTL arrival → objective registration → treatment
//! → debounce → teardown, plus the failure and misconfiguration paths.

use hecs::Entity;
use rand::rngs::StdRng;
use rand::SeedableRng;

use stardrift_core::components::{
    DistressObjective, DistressSignal, Grid, Humanoid, Position, Vitals,
};
use stardrift_core::engine::SimulationEngine;
use stardrift_core::generation::{VesselTemplate, VictimSpec};
use stardrift_core::systems::{world_position, DistressConfig};
use stardrift_logic::objectives::DEBOUNCE_DELAY;
use stardrift_logic::respiration::Atmosphere;
use stardrift_logic::vitals::Damage;

// ── Helpers ────────────────────────────────────────────────────────────

fn victim(brute: f32, critical: bool) -> VictimSpec {
    VictimSpec {
        brute,
        burn: 0.0,
        toxin: 0.0,
        airloss: 0.0,
        critical,
    }
}

/// A vessel with breathable air so test victims neither heal nor
/// deteriorate on their own.
fn calm_template(id: &str, victims: Vec<VictimSpec>) -> VesselTemplate {
    VesselTemplate {
        id: id.to_string(),
        name_template: format!("SDV {} {{}}", id),
        atmosphere: Atmosphere::standard(),
        victims,
        cargo: Vec::new(),
    }
}

fn launch(engine: &mut SimulationEngine, template: VesselTemplate) -> Entity {
    let id = template.id.clone();
    engine.registry.register(template);
    let config = DistressConfig {
        vessel_pool: vec![id],
        ..DistressConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(42);
    engine
        .start_distress_signal_with_rng(config, &mut rng)
        .expect("event launches")
}

fn run_seconds(engine: &mut SimulationEngine, seconds: f64) {
    let steps = (seconds / 1.0).ceil() as usize;
    for _ in 0..steps {
        engine.update(1.0);
    }
}

fn rule_grid(engine: &SimulationEngine, rule: Entity) -> Entity {
    engine
        .world
        .get::<&DistressSignal>(rule)
        .expect("rule alive")
        .grid
        .expect("rule has grid")
}

fn victims_of(engine: &SimulationEngine, grid: Entity) -> Vec<Entity> {
    engine
        .world
        .query::<(&Humanoid, &Position)>()
        .iter()
        .filter(|(_, (_, position))| position.grid == Some(grid))
        .map(|(entity, _)| entity)
        .collect()
}

fn heal(engine: &mut SimulationEngine, mob: Entity) {
    engine.world.get::<&mut Vitals>(mob).unwrap().damage = Damage::NONE;
}

fn kill(engine: &mut SimulationEngine, mob: Entity) {
    engine.world.get::<&mut Vitals>(mob).unwrap().damage = Damage::new(250.0, 0.0, 0.0, 0.0);
}

// ── Launch ─────────────────────────────────────────────────────────────

#[test]
fn launch_announces_designation_and_travels() {
    let mut engine = SimulationEngine::new();
    let rule = launch(&mut engine, calm_template("Pelican", vec![victim(20.0, false)]));

    let grid = rule_grid(&engine, rule);
    let grid_name = engine.world.get::<&Grid>(grid).unwrap().name.clone();
    let designation = grid_name.split_whitespace().last().unwrap().to_string();

    let signal = engine.world.get::<&DistressSignal>(rule).unwrap();
    assert_eq!(signal.designation.as_deref(), Some(designation.as_str()));
    assert_eq!(signal.chosen_vessel.as_deref(), Some("Pelican"));
    drop(signal);

    // The launch broadcast names the vessel.
    let announcement = engine.announcements.latest().unwrap().text.clone();
    assert!(announcement.contains(&designation));

    // Spawned on its own map, then FTLs into the default map.
    assert_ne!(
        engine.world.get::<&Grid>(grid).unwrap().map,
        SimulationEngine::DEFAULT_MAP
    );
    run_seconds(&mut engine, 25.0);
    let grid_comp = engine.world.get::<&Grid>(grid).unwrap();
    assert_eq!(grid_comp.map, SimulationEngine::DEFAULT_MAP);
    // Arrival point magnitude within the announced band.
    let distance = grid_comp.origin.length();
    assert!((500.0..=5000.0).contains(&distance));
}

// ── Success path ───────────────────────────────────────────────────────

#[test]
fn treated_victims_end_event_in_success() {
    let mut engine = SimulationEngine::new();
    let rule = launch(
        &mut engine,
        calm_template("Gull", vec![victim(20.0, false), victim(35.0, false)]),
    );
    let grid = rule_grid(&engine, rule);

    run_seconds(&mut engine, 25.0);
    assert!(engine.world.contains(rule), "event still running untreated");

    let victims = victims_of(&engine, grid);
    assert_eq!(victims.len(), 2);
    let expected_positions: Vec<_> = victims
        .iter()
        .map(|&mob| world_position(&engine.world, mob).unwrap())
        .collect();

    for &mob in &victims {
        heal(&mut engine, mob);
    }

    // One tick records the provisional success and arms the debounce.
    engine.update(1.0);
    let signal = engine.world.get::<&DistressSignal>(rule).unwrap();
    assert!(signal.objectives_completed);
    assert!(signal.debounce.is_some());
    drop(signal);
    assert!(engine.world.contains(rule), "debounce holds the event open");

    // The window passes undisturbed: event ends in success.
    run_seconds(&mut engine, DEBOUNCE_DELAY + 2.0);
    assert!(!engine.world.contains(rule));
    assert!(!engine.world.contains(grid));
    assert_eq!(engine.grid_count(), 0);

    // Survivors were detached before deletion and kept their spots.
    for (&mob, (map, pos)) in victims.iter().zip(expected_positions) {
        let position = engine.world.get::<&Position>(mob).unwrap();
        assert_eq!(position.grid, None);
        assert_eq!(position.map, map);
        assert_eq!(position.local, pos);
    }

    let announcement = engine.announcements.latest().unwrap().text.clone();
    assert!(announcement.contains("concluded"));
}

// ── Failure paths ──────────────────────────────────────────────────────

#[test]
fn critical_victim_death_ends_event_immediately() {
    let mut engine = SimulationEngine::new();
    let rule = launch(
        &mut engine,
        calm_template("Heron", vec![victim(20.0, true), victim(20.0, false), victim(20.0, false)]),
    );
    let grid = rule_grid(&engine, rule);
    run_seconds(&mut engine, 25.0);

    let critical_victim = engine
        .world
        .query::<(&DistressObjective, &Position)>()
        .iter()
        .find(|(_, (objective, position))| objective.critical && position.grid == Some(grid))
        .map(|(entity, _)| entity)
        .unwrap();
    let bystanders: Vec<Entity> = victims_of(&engine, grid)
        .into_iter()
        .filter(|&mob| mob != critical_victim)
        .collect();

    kill(&mut engine, critical_victim);
    engine.update(1.0);

    // No debounce on a critical failure; the event is gone at once.
    assert!(!engine.world.contains(rule));
    assert!(!engine.world.contains(grid));
    assert!(
        engine.announcements.latest().unwrap().text.contains("lost"),
        "failure announced"
    );

    // Living bystanders were still evacuated; the body went down with
    // the vessel.
    for mob in bystanders {
        assert!(engine.world.contains(mob));
        assert_eq!(engine.world.get::<&Position>(mob).unwrap().grid, None);
    }
    assert!(!engine.world.contains(critical_victim));
}

#[test]
fn all_objectives_failed_ends_event_in_failure() {
    let mut engine = SimulationEngine::new();
    let rule = launch(&mut engine, calm_template("Skua", vec![victim(20.0, false)]));
    let grid = rule_grid(&engine, rule);
    run_seconds(&mut engine, 25.0);

    let victims = victims_of(&engine, grid);
    kill(&mut engine, victims[0]);
    engine.update(1.0);

    let signal = engine.world.get::<&DistressSignal>(rule).unwrap();
    assert!(!signal.objectives_completed);
    assert!(signal.debounce.is_some());
    drop(signal);

    run_seconds(&mut engine, DEBOUNCE_DELAY + 2.0);
    assert!(!engine.world.contains(rule));
    assert!(!engine.world.contains(victims[0]), "the dead are not evacuated");
    assert!(engine.announcements.latest().unwrap().text.contains("lost"));
}

#[test]
fn mixed_outcome_counts_as_success() {
    let mut engine = SimulationEngine::new();
    let rule = launch(
        &mut engine,
        calm_template("Tern", vec![victim(20.0, false), victim(20.0, false)]),
    );
    let grid = rule_grid(&engine, rule);
    run_seconds(&mut engine, 25.0);

    let victims = victims_of(&engine, grid);
    heal(&mut engine, victims[0]);
    kill(&mut engine, victims[1]);
    engine.update(1.0);

    assert!(engine
        .world
        .get::<&DistressSignal>(rule)
        .unwrap()
        .objectives_completed);

    run_seconds(&mut engine, DEBOUNCE_DELAY + 2.0);
    assert!(!engine.world.contains(rule));
    assert!(engine.announcements.latest().unwrap().text.contains("concluded"));
}

// ── Debounce re-validation ─────────────────────────────────────────────

#[test]
fn reverted_objective_cancels_the_debounce_window() {
    let mut engine = SimulationEngine::new();
    let rule = launch(&mut engine, calm_template("Fulmar", vec![victim(20.0, false)]));
    let grid = rule_grid(&engine, rule);
    run_seconds(&mut engine, 25.0);

    let victims = victims_of(&engine, grid);
    heal(&mut engine, victims[0]);
    engine.update(1.0);
    assert!(engine.world.get::<&DistressSignal>(rule).unwrap().debounce.is_some());

    // The patient deteriorates inside the window.
    engine.world.get::<&mut Vitals>(victims[0]).unwrap().damage =
        Damage::new(10.0, 0.0, 0.0, 0.0);
    run_seconds(&mut engine, DEBOUNCE_DELAY + 2.0);

    // The timer fired, re-validated, and stood down.
    assert!(engine.world.contains(rule), "event survives the reversion");
    assert!(engine.world.get::<&DistressSignal>(rule).unwrap().debounce.is_none());

    // Treat them again: the event can still conclude successfully.
    heal(&mut engine, victims[0]);
    run_seconds(&mut engine, DEBOUNCE_DELAY + 3.0);
    assert!(!engine.world.contains(rule));
    assert!(engine.announcements.latest().unwrap().text.contains("concluded"));
}

// ── Misconfiguration ───────────────────────────────────────────────────

#[test]
fn vessel_with_nothing_aboard_is_scrapped() {
    let mut engine = SimulationEngine::new();
    let rule = launch(&mut engine, calm_template("Ghost", Vec::new()));
    let grid = rule_grid(&engine, rule);
    let announcements_at_launch = engine.announcements.len();

    engine.update(1.0);

    assert!(!engine.world.contains(rule));
    assert!(!engine.world.contains(grid));
    // Scrapping is silent: no pass/fail broadcast for a misconfigured event.
    assert_eq!(engine.announcements.len(), announcements_at_launch);
}

#[test]
fn objectives_register_against_the_running_event() {
    let mut engine = SimulationEngine::new();
    let rule = launch(&mut engine, calm_template("Petrel", vec![victim(20.0, false)]));

    engine.update(1.0);

    let signal = engine.world.get::<&DistressSignal>(rule).unwrap();
    assert_eq!(signal.objectives.len(), 1);
    let objective_entity = signal.objectives[0];
    drop(signal);

    let objective = engine.world.get::<&DistressObjective>(objective_entity).unwrap();
    assert_eq!(objective.rule, Some(rule));
    assert!(!objective.failed);
}

// ── Save/load across a running event ───────────────────────────────────

#[test]
fn event_survives_a_save_load_cycle() {
    let mut engine = SimulationEngine::new();
    let rule_before = launch(&mut engine, calm_template("Osprey", vec![victim(20.0, false)]));
    run_seconds(&mut engine, 25.0);
    assert!(engine.world.contains(rule_before));

    let mut buffer = Vec::new();
    engine.save_to(&mut buffer).unwrap();
    let mut restored =
        SimulationEngine::from_loaded(stardrift_core::persistence::load_simulation(buffer.as_slice()).unwrap());

    // The event resumes: registration repopulates on the first tick.
    restored.update(1.0);
    let (rule, signal) = {
        let mut query = restored.world.query::<&DistressSignal>();
        let (rule, signal) = query.iter().next().expect("rule restored");
        (rule, signal.clone())
    };
    assert_eq!(signal.objectives.len(), 1);
    let grid = signal.grid.expect("grid relinked");

    // And it can still conclude.
    let victims = victims_of(&restored, grid);
    for &mob in &victims {
        heal(&mut restored, mob);
    }
    restored.update(1.0);
    run_seconds(&mut restored, DEBOUNCE_DELAY + 2.0);
    assert!(!restored.world.contains(rule));
    assert!(restored.announcements.latest().unwrap().text.contains("concluded"));
}

#[test]
fn candidate_pool_launch_uses_builtin_content() {
    let mut engine = SimulationEngine::new();
    let mut rng = StdRng::seed_from_u64(7);

    let rule = engine
        .start_distress_signal_with_rng(DistressConfig::default(), &mut rng)
        .unwrap();

    let signal = engine.world.get::<&DistressSignal>(rule).unwrap();
    let chosen = signal.chosen_vessel.clone().unwrap();
    assert!(DistressConfig::default().vessel_pool.contains(&chosen));
    // Designation is the serial at the end of the generated name.
    let designation = signal.designation.clone().unwrap();
    assert_eq!(designation.len(), 3);
    assert!(designation.chars().all(|c| c.is_ascii_digit()));
}
