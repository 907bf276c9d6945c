//! Per-tick breathing over every mob with lungs.
//!
//! Each respirator accumulates frame time until a cycle is due, drains
//! saturation, and (if the mob can breathe) draws on the containing
//! grid's atmosphere. Detached mobs breathe vacuum. Suffocation deals
//! airloss damage through `Vitals`; breathing normally again heals it.

use hecs::{Entity, World};
use rand::Rng;

use stardrift_logic::respiration::{self, breath_constants, Atmosphere, BreathPhase};
use stardrift_logic::vitals::{DamageKind, MobState};

use crate::components::{Grid, Position, Respirator, Vitals};

/// Seconds between audible gasps from a suffocating mob.
pub const GASP_COOLDOWN: f64 = 8.0;

/// The atmosphere an entity is currently exposed to.
fn containing_atmosphere(world: &World, entity: Entity) -> Atmosphere {
    let Ok(pos) = world.get::<&Position>(entity) else {
        return Atmosphere::VACUUM;
    };
    match pos.grid {
        Some(grid) => world
            .get::<&Grid>(grid)
            .map(|g| g.atmosphere)
            .unwrap_or(Atmosphere::VACUUM),
        None => Atmosphere::VACUUM,
    }
}

/// Advance every respirator by `dt` seconds.
pub fn respirator_system(world: &mut World, dt: f32, sim_time: f64) {
    // Resolve atmospheres first; the mutation pass can't read other
    // entities' grids.
    let breathers: Vec<(Entity, Atmosphere)> = world
        .query::<(&Respirator, &Position)>()
        .iter()
        .map(|(entity, _)| (entity, containing_atmosphere(world, entity)))
        .collect();

    for (entity, atmo) in breathers {
        let Ok(mut respirator) = world.get::<&mut Respirator>(entity) else {
            continue;
        };
        let Ok(mut vitals) = world.get::<&mut Vitals>(entity) else {
            continue;
        };

        let state = vitals.state();
        if state == MobState::Dead {
            continue;
        }

        respirator.accumulated += dt;
        if respirator.accumulated < breath_constants::CYCLE_DELAY {
            continue;
        }
        respirator.accumulated -= breath_constants::CYCLE_DELAY;

        respirator.saturation =
            respiration::clamp_saturation(respirator.saturation - breath_constants::CYCLE_DELAY);

        // A critical mob only breathes while it has assisted breaths left.
        if state == MobState::Alive || respirator.crit_breaths > 0 {
            if respirator.phase == BreathPhase::Inhaling {
                respirator.saturation = respiration::clamp_saturation(
                    respirator.saturation + respiration::saturation_gain(&atmo),
                );
            }
            respirator.phase = respirator.phase.flip();
            respirator.crit_breaths = respirator
                .crit_breaths
                .saturating_sub(1)
                .min(breath_constants::MAX_CRIT_BREATHS);
        }

        if respiration::is_suffocating(respirator.saturation) {
            if sim_time >= respirator.last_gasp_at + GASP_COOLDOWN {
                respirator.last_gasp_at = sim_time;
                log::debug!("Entity {:?} gasps for air", entity);
            }

            respirator.suffocation_cycles += 1;
            if respirator.suffocation_cycles == 2 {
                log::info!("Entity {:?} started suffocating", entity);
            }
            respirator.alerting =
                respirator.suffocation_cycles >= breath_constants::ALERT_CYCLE_THRESHOLD;

            vitals
                .damage
                .apply(DamageKind::Airloss, breath_constants::SUFFOCATION_DAMAGE);
        } else {
            if respirator.suffocation_cycles >= 2 {
                log::info!("Entity {:?} stopped suffocating", entity);
            }
            respirator.suffocation_cycles = 0;
            respirator.alerting = false;

            vitals
                .damage
                .heal(DamageKind::Airloss, breath_constants::RECOVERY_HEAL);
        }
    }
}

/// Give a critical mob rescue breaths, keeping it breathing for a few
/// cycles. Returns false if the target can't receive them (not critical,
/// or has no lungs).
pub fn perform_cpr(world: &mut World, target: Entity, rng: &mut impl Rng) -> bool {
    let state = match world.get::<&Vitals>(target) {
        Ok(vitals) => vitals.state(),
        Err(_) => return false,
    };
    if state != MobState::Critical {
        return false;
    }

    let Ok(mut respirator) = world.get::<&mut Respirator>(target) else {
        return false;
    };
    respirator.crit_breaths = (respirator.crit_breaths + rng.gen_range(2..4))
        .min(breath_constants::MAX_CRIT_BREATHS);
    log::debug!("Entity {:?} received rescue breaths", target);
    true
}
