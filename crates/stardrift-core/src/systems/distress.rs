//! Distress signal event lifecycle.
//!
//! A distress signal spawns a derelict vessel on its own map, announces
//! its arrival, and FTLs it into the playable space. Objectives aboard
//! the vessel register themselves against the event; the active tick
//! tallies them and, once every objective is terminal, arms a debounce
//! timer so a provisional outcome must stay stable before the event
//! ends. Teardown evacuates living mobs, deletes the vessel, and
//! announces the result.

use std::collections::HashMap;

use hecs::{Entity, World};
use rand::Rng;
use serde::{Deserialize, Serialize};

use stardrift_logic::naming;
use stardrift_logic::objectives::{
    all_terminal, tally, ObjectiveStatus, ScanOutcome, DEBOUNCE_DELAY,
};

use crate::components::{
    Color, DistressObjective, DistressSignal, Grid, Humanoid, MapId, Position, Vec2, Vitals,
};
use crate::engine::{TimerQueue, TimerTask};
use crate::generation::{spawn_vessel, VesselRegistry};

use super::{delete_grid, ftl_travel, place_on_map, set_iff_color, AnnouncementLog, FTL_TRAVEL_TIME};

/// Minimum distance of the announced arrival point from the map origin.
pub const ARRIVAL_OFFSET_MIN: f32 = 500.0;

/// Maximum distance of the announced arrival point from the map origin.
pub const ARRIVAL_OFFSET_MAX: f32 = 5000.0;

/// Broadcast color for distress traffic.
pub const DISTRESS_ANNOUNCEMENT_COLOR: Color = Color::new(0x18, 0xab, 0xf5);

/// Configuration for launching a distress signal event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistressConfig {
    /// Vessel template ids the event picks from, uniformly at random.
    pub vessel_pool: Vec<String>,
    /// Transponder color for the spawned vessel.
    pub color: Color,
}

impl Default for DistressConfig {
    fn default() -> Self {
        Self {
            vessel_pool: vec!["derelict_kestrel".to_string(), "derelict_meridian".to_string()],
            color: Color::default(),
        }
    }
}

/// Why a distress signal event failed to launch.
#[derive(Debug)]
pub enum DistressStartError {
    /// The config listed no vessels to pick from.
    EmptyVesselPool,
    /// The chosen id matched no registered vessel template.
    UnknownVessel(String),
    /// The spawned vessel's name yielded no usable callsign.
    MissingDesignation,
}

/// Lookup from spawned vessel grid to its owning event rule.
///
/// Populated when an event starts, dropped when it ends; objective
/// registration resolves its event here instead of scanning every rule.
#[derive(Debug, Default)]
pub struct DistressIndex {
    rules_by_grid: HashMap<Entity, Entity>,
}

impl DistressIndex {
    pub fn register(&mut self, grid: Entity, rule: Entity) {
        self.rules_by_grid.insert(grid, rule);
    }

    pub fn remove(&mut self, grid: Entity) {
        self.rules_by_grid.remove(&grid);
    }

    pub fn rule_for(&self, grid: Entity) -> Option<Entity> {
        self.rules_by_grid.get(&grid).copied()
    }

    pub fn len(&self) -> usize {
        self.rules_by_grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules_by_grid.is_empty()
    }

    /// Rebuild from live rule components, e.g. after loading a save.
    pub fn rebuild(world: &World) -> Self {
        let mut index = Self::default();
        for (rule, signal) in world.query::<&DistressSignal>().iter() {
            if let Some(grid) = signal.grid {
                index.register(grid, rule);
            }
        }
        index
    }
}

/// Launch a distress signal event.
///
/// Picks a vessel template, spawns it onto `fresh_map`, announces the
/// signal, and sends the vessel toward a random point on `default_map`.
/// Content errors (unknown template, unusable name) log and abort; no
/// rule entity is left behind.
#[allow(clippy::too_many_arguments)]
pub fn start_distress_signal(
    world: &mut World,
    registry: &VesselRegistry,
    index: &mut DistressIndex,
    announcements: &mut AnnouncementLog,
    config: DistressConfig,
    fresh_map: MapId,
    default_map: MapId,
    next_grid_id: &mut u32,
    sim_time: f64,
    rng: &mut impl Rng,
) -> Result<Entity, DistressStartError> {
    if config.vessel_pool.is_empty() {
        log::error!("Distress signal event configured with an empty vessel pool.");
        return Err(DistressStartError::EmptyVesselPool);
    }

    let chosen = config.vessel_pool[rng.gen_range(0..config.vessel_pool.len())].clone();
    let Some(template) = registry.get(&chosen) else {
        log::error!("Distress signal event failed to resolve vessel id '{}'.", chosen);
        return Err(DistressStartError::UnknownVessel(chosen));
    };

    let grid = spawn_vessel(world, template, fresh_map, *next_grid_id, rng);
    *next_grid_id += 1;

    set_iff_color(world, grid, config.color);

    let name = world
        .get::<&Grid>(grid)
        .map(|g| g.name.clone())
        .unwrap_or_default();
    let Some(designation) = naming::designation(&name).map(str::to_string) else {
        log::error!("Distress signal vessel '{}' produced no designation.", chosen);
        delete_grid(world, grid);
        return Err(DistressStartError::MissingDesignation);
    };

    // Arrival point: random direction, magnitude uniform in the offset band.
    let offset = Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU))
        * rng.gen_range(ARRIVAL_OFFSET_MIN..ARRIVAL_OFFSET_MAX);

    let mut signal = DistressSignal::new(config.vessel_pool.clone(), config.color);
    signal.chosen_vessel = Some(chosen.clone());
    signal.grid = Some(grid);
    signal.grid_id = world.get::<&Grid>(grid).map(|g| g.id).ok();
    signal.designation = Some(designation.clone());
    let rule = world.spawn((signal,));

    index.register(grid, rule);

    let arrival = offset.rounded();
    announcements.dispatch(
        format!(
            "Automated distress signal received from vessel {}. Estimated arrival point: {:.0}, {:.0}.",
            designation, arrival.x, arrival.y
        ),
        DISTRESS_ANNOUNCEMENT_COLOR,
        sim_time,
    );

    ftl_travel(world, grid, offset, default_map, FTL_TRAVEL_TIME);

    log::info!(
        "Distress signal event started: vessel '{}' as {} ({} aboard)",
        chosen,
        designation,
        template.victims.len() + template.cargo.len()
    );
    Ok(rule)
}

/// Snapshot the status of each registered objective. A registered entity
/// that no longer exists counts as a non-critical failure.
fn objective_statuses(world: &World, objectives: &[Entity]) -> Vec<ObjectiveStatus> {
    objectives
        .iter()
        .map(|&entity| match world.get::<&DistressObjective>(entity) {
            Ok(objective) if objective.failed => ObjectiveStatus::Failed {
                critical: objective.critical,
            },
            Ok(objective) if objective.completed => ObjectiveStatus::Completed,
            Ok(_) => ObjectiveStatus::Pending,
            Err(_) => ObjectiveStatus::Failed { critical: false },
        })
        .collect()
}

/// One evaluation tick for an active distress signal event.
pub fn distress_active_tick(
    world: &mut World,
    rule: Entity,
    index: &mut DistressIndex,
    timers: &mut TimerQueue,
    announcements: &mut AnnouncementLog,
    sim_time: f64,
) {
    let (debouncing, objectives, grid) = match world.get::<&DistressSignal>(rule) {
        Ok(signal) => (
            signal.debounce.is_some(),
            signal.objectives.clone(),
            signal.grid,
        ),
        Err(_) => return,
    };

    // Waiting out the confirmation window; the timer re-validates.
    if debouncing {
        return;
    }

    if objectives.is_empty() {
        log::error!("Distress signal rule {:?} has no objectives; scrapping the event.", rule);
        if let Some(grid) = grid {
            index.remove(grid);
            delete_grid(world, grid);
        }
        end_distress_signal(world, rule, index, timers, announcements, sim_time);
        return;
    }

    let statuses = objective_statuses(world, &objectives);
    match tally(&statuses) {
        ScanOutcome::CriticalFailure => {
            log::info!("Distress signal rule {:?}: critical objective failed.", rule);
            if let Ok(mut signal) = world.get::<&mut DistressSignal>(rule) {
                signal.objectives_completed = false;
            }
            end_distress_signal(world, rule, index, timers, announcements, sim_time);
        }
        ScanOutcome::AllResolved { success } => {
            // Record the provisional outcome and arm the debounce; the
            // event only ends if the result survives the window.
            if let Ok(mut signal) = world.get::<&mut DistressSignal>(rule) {
                signal.objectives_completed = success;
                let timer = timers.schedule(
                    sim_time + DEBOUNCE_DELAY,
                    TimerTask::DistressDebounce { rule },
                );
                signal.debounce = Some(timer);
            }
            log::debug!(
                "Distress signal rule {:?} provisionally {}; debounce armed",
                rule,
                if success { "succeeded" } else { "failed" }
            );
        }
        ScanOutcome::InProgress { .. } => {}
    }
}

/// Debounce timer callback: confirm the provisional outcome.
///
/// Ends the event only if every objective is still terminal; a reversion
/// to pending clears the window and evaluation resumes next tick.
pub fn handle_debounce_fired(
    world: &mut World,
    rule: Entity,
    index: &mut DistressIndex,
    timers: &mut TimerQueue,
    announcements: &mut AnnouncementLog,
    sim_time: f64,
) {
    let objectives = match world.get::<&DistressSignal>(rule) {
        Ok(signal) => signal.objectives.clone(),
        // Rule already ended through another path.
        Err(_) => return,
    };

    let statuses = objective_statuses(world, &objectives);
    if all_terminal(&statuses) {
        end_distress_signal(world, rule, index, timers, announcements, sim_time);
    } else {
        if let Ok(mut signal) = world.get::<&mut DistressSignal>(rule) {
            signal.debounce = None;
        }
        log::debug!(
            "Distress signal rule {:?}: objective reverted during debounce; resuming",
            rule
        );
    }
}

/// Tear down a distress signal event.
///
/// Living humanoids aboard the vessel are detached (capturing their world
/// positions), the vessel and everything still attached is deleted, and
/// the survivors are re-placed on the containing map at their captured
/// spots. Detachment must precede deletion: grid deletion takes every
/// attached entity with it.
pub fn end_distress_signal(
    world: &mut World,
    rule: Entity,
    index: &mut DistressIndex,
    timers: &mut TimerQueue,
    announcements: &mut AnnouncementLog,
    sim_time: f64,
) {
    let Ok(signal) = world.get::<&DistressSignal>(rule).map(|s| (*s).clone()) else {
        return;
    };

    if let Some(timer) = signal.debounce {
        timers.cancel(timer);
    }

    let designation = signal
        .designation
        .clone()
        .unwrap_or_else(|| "UNKNOWN".to_string());

    match signal.grid {
        Some(grid_entity) => match world.get::<&Grid>(grid_entity).map(|g| (g.map, g.origin)) {
            Ok((map, origin)) => {
                // Capture survivors and their world positions.
                let survivors: Vec<(Entity, Vec2)> = world
                    .query::<(&Humanoid, &Vitals, &Position)>()
                    .iter()
                    .filter(|(_, (_, vitals, position))| {
                        position.grid == Some(grid_entity) && !vitals.is_dead()
                    })
                    .map(|(entity, (_, _, position))| (entity, origin + position.local))
                    .collect();

                // Detach before deletion; attachment at deletion time
                // means going down with the ship.
                for (mob, _) in &survivors {
                    if let Ok(mut position) = world.get::<&mut Position>(*mob) {
                        position.grid = None;
                        position.grid_id = None;
                    }
                }

                delete_grid(world, grid_entity);

                for (mob, world_pos) in &survivors {
                    place_on_map(world, *mob, map, *world_pos);
                }

                index.remove(grid_entity);

                let text = if signal.objectives_completed {
                    format!(
                        "Rescue operation aboard vessel {} is concluded. Survivors recovered.",
                        designation
                    )
                } else {
                    format!(
                        "Contact with vessel {} has been lost. The rescue operation failed.",
                        designation
                    )
                };
                announcements.dispatch(text, DISTRESS_ANNOUNCEMENT_COLOR, sim_time);

                log::info!(
                    "Distress signal {} ended: {} ({} evacuated)",
                    designation,
                    if signal.objectives_completed { "success" } else { "failure" },
                    survivors.len()
                );
            }
            Err(_) => {
                log::error!("Distress signal vessel was already gone at teardown.");
            }
        },
        None => {
            log::error!("Distress signal has no associated grid.");
        }
    }

    let _ = world.despawn(rule);
}
