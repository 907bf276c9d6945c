//! Generic objective evaluation.
//!
//! Runs once per tick over every objective of every kind. An objective
//! with no owning event discovers it here, by looking up the grid it
//! currently occupies; objectives that can't resolve a grid, or whose
//! grid belongs to no active event, are failed permanently. Registered
//! objectives are then driven by their kind-specific predicates: failure
//! is checked first and is permanent, completion is re-evaluated every
//! pass and may regress until the event ends.

use hecs::{Entity, World};

use stardrift_logic::vitals::MobState;

use crate::components::{DistressObjective, DistressSignal, ObjectiveKind, Position, Vitals};

use super::{grid_of, DistressIndex};

/// Evaluate every live objective once.
pub fn evaluate_objectives(world: &mut World, index: &DistressIndex) {
    let candidates: Vec<Entity> = world
        .query::<&DistressObjective>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();

    for entity in candidates {
        let Ok((was_failed, registered)) = world
            .get::<&DistressObjective>(entity)
            .map(|objective| (objective.failed, objective.rule))
        else {
            continue;
        };

        // Even terminal objectives register, so their event can count
        // them; they just aren't re-evaluated.
        let rule = match registered {
            Some(rule) => rule,
            None => match register_objective(world, index, entity, was_failed) {
                Some(rule) => rule,
                None => continue,
            },
        };

        if was_failed {
            continue;
        }

        let rule_grid = world
            .get::<&DistressSignal>(rule)
            .ok()
            .and_then(|signal| signal.grid);
        let Ok(kind) = world.get::<&DistressObjective>(entity).map(|o| o.kind) else {
            continue;
        };

        if objective_failed(world, entity, kind) {
            if let Ok(mut objective) = world.get::<&mut DistressObjective>(entity) {
                objective.failed = true;
            }
            continue;
        }

        let completed = objective_completed(world, entity, kind, rule_grid);
        if let Ok(mut objective) = world.get::<&mut DistressObjective>(entity) {
            objective.completed = completed;
        }
    }
}

/// Attach an unregistered objective to the event whose vessel it sits on.
///
/// Returns the rule entity. An objective that can't be located is failed
/// permanently, unless it was already failed (then it's left alone
/// quietly; there is nothing further to lose).
fn register_objective(
    world: &mut World,
    index: &DistressIndex,
    entity: Entity,
    already_failed: bool,
) -> Option<Entity> {
    let grid = {
        let position = world.get::<&Position>(entity);
        match position {
            Ok(position) => {
                let grid = position.grid;
                drop(position);
                grid
            }
            Err(_) => {
                drop(position);
                if !already_failed {
                    fail_permanently(world, entity, "lacks a position");
                }
                return None;
            }
        }
    };

    let Some(grid) = grid else {
        if !already_failed {
            fail_permanently(world, entity, "is not located on any grid");
        }
        return None;
    };

    let Some(rule) = index.rule_for(grid) else {
        if !already_failed {
            fail_permanently(world, entity, "could not find a matching distress signal");
        }
        return None;
    };

    if let Ok(mut objective) = world.get::<&mut DistressObjective>(entity) {
        objective.rule = Some(rule);
    }
    if let Ok(mut signal) = world.get::<&mut DistressSignal>(rule) {
        if !signal.objectives.contains(&entity) {
            signal.objectives.push(entity);
        }
    }
    log::debug!("Objective {:?} registered with rule {:?}", entity, rule);
    Some(rule)
}

fn fail_permanently(world: &mut World, entity: Entity, reason: &str) {
    log::error!("Distress signal objective attached to {:?} {}.", entity, reason);
    if let Ok(mut objective) = world.get::<&mut DistressObjective>(entity) {
        objective.failed = true;
    }
}

/// Whether this objective can no longer be completed.
fn objective_failed(world: &World, subject: Entity, kind: ObjectiveKind) -> bool {
    match kind {
        // A dead patient is past saving; otherwise only the event timing
        // out fails the rescue.
        ObjectiveKind::RescueVictim => world
            .get::<&Vitals>(subject)
            .map(|vitals| vitals.is_dead())
            .unwrap_or(true),
        ObjectiveKind::RecoverCargo => false,
    }
}

/// Whether this objective's conditions are currently met.
fn objective_completed(
    world: &World,
    subject: Entity,
    kind: ObjectiveKind,
    rule_grid: Option<Entity>,
) -> bool {
    let on_rule_grid = match (grid_of(world, subject), rule_grid) {
        (Some(grid), Some(rule_grid)) => grid == rule_grid,
        _ => false,
    };

    match kind {
        ObjectiveKind::RescueVictim => {
            // The patient must be alive, fully treated, and back aboard
            // the vessel so the event can account for them.
            on_rule_grid
                && world
                    .get::<&Vitals>(subject)
                    .map(|vitals| vitals.state() == MobState::Alive && !vitals.damage.any())
                    .unwrap_or(false)
        }
        ObjectiveKind::RecoverCargo => on_rule_grid,
    }
}
