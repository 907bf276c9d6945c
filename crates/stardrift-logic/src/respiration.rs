//! Breathing cycle and suffocation math.
//!
//! Every mob with lungs runs the same loop: saturation drains continuously,
//! an inhale in breathable air tops it back up, and once saturation falls
//! below the suffocation threshold the mob starts taking airloss damage
//! each cycle until it breathes again. Mobs in critical condition cannot
//! breathe on their own; rescue breaths grant a bounded number of assisted
//! cycles.

use serde::{Deserialize, Serialize};

/// Configuration constants for the breathing loop.
pub mod breath_constants {
    /// Seconds between breath cycles (one inhale or one exhale).
    pub const CYCLE_DELAY: f32 = 2.0;

    /// Saturation ceiling.
    pub const MAX_SATURATION: f32 = 15.0;

    /// Saturation floor.
    pub const MIN_SATURATION: f32 = -10.0;

    /// Below this saturation the mob is suffocating.
    pub const SUFFOCATION_THRESHOLD: f32 = 2.5;

    /// Airloss damage dealt per suffocating cycle.
    pub const SUFFOCATION_DAMAGE: f32 = 1.0;

    /// Airloss healed per cycle once breathing normally again.
    pub const RECOVERY_HEAL: f32 = 1.5;

    /// Suffocating cycles before the low-oxygen alert is raised.
    pub const ALERT_CYCLE_THRESHOLD: u32 = 3;

    /// Cap on stored assisted (rescue) breaths.
    pub const MAX_CRIT_BREATHS: u32 = 6;

    /// Normal oxygen fraction aboard a healthy vessel.
    pub const NORMAL_O2: f32 = 0.21;

    /// Oxygen fraction below which air stops being fully effective.
    pub const LOW_O2: f32 = 0.16;

    /// Pressure below which lungs can't draw a useful breath.
    pub const MIN_PRESSURE: f32 = 0.8;
}

/// Gas state of one grid's shared atmosphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Atmosphere {
    /// Oxygen fraction (0.21 = Earth normal).
    pub o2: f32,
    /// Pressure in atmospheres (1.0 = one standard).
    pub pressure: f32,
}

impl Atmosphere {
    pub const VACUUM: Self = Self {
        o2: 0.0,
        pressure: 0.0,
    };

    pub fn standard() -> Self {
        Self {
            o2: breath_constants::NORMAL_O2,
            pressure: 1.0,
        }
    }

    /// Whether an unprotected mob can breathe here at all.
    pub fn breathable(&self) -> bool {
        self.o2 > 0.0 && self.pressure >= breath_constants::MIN_PRESSURE
    }
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self::standard()
    }
}

/// Which half of the breath cycle comes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreathPhase {
    Inhaling,
    Exhaling,
}

impl BreathPhase {
    pub fn flip(self) -> Self {
        match self {
            Self::Inhaling => Self::Exhaling,
            Self::Exhaling => Self::Inhaling,
        }
    }
}

/// Saturation restored by one inhale in the given atmosphere.
///
/// A full breath of standard air covers the drain of a whole cycle pair
/// (inhale + exhale) plus margin, so saturation climbs back toward the cap.
/// Thin or oxygen-poor air scales the gain down linearly; unbreathable air
/// yields nothing.
pub fn saturation_gain(atmo: &Atmosphere) -> f32 {
    use breath_constants::*;

    if !atmo.breathable() {
        return 0.0;
    }

    let o2_factor = (atmo.o2 / NORMAL_O2).min(1.0);
    let pressure_factor = atmo.pressure.min(1.0);

    CYCLE_DELAY * 2.5 * o2_factor * pressure_factor
}

/// Clamp saturation into its legal range.
pub fn clamp_saturation(saturation: f32) -> f32 {
    saturation.clamp(
        breath_constants::MIN_SATURATION,
        breath_constants::MAX_SATURATION,
    )
}

/// Whether this saturation level means the mob is suffocating.
pub fn is_suffocating(saturation: f32) -> bool {
    saturation < breath_constants::SUFFOCATION_THRESHOLD
}
