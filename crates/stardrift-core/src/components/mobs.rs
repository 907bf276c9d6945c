//! Mob components: identity, vitals, breathing, bloodstream.

use serde::{Deserialize, Serialize};
use stardrift_logic::chemistry::{self, Solution};
use stardrift_logic::respiration::{breath_constants, BreathPhase};
use stardrift_logic::vitals::{self, Damage, MobState};

/// Marker for humanoid mobs (crew, victims, responders).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Humanoid;

/// Display name for a person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonName {
    pub given: String,
    pub family: String,
}

impl PersonName {
    pub fn new(given: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            given: given.into(),
            family: family.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.given, self.family)
    }
}

/// Accumulated damage. Mob state is always derived from the total.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Vitals {
    pub damage: Damage,
}

impl Vitals {
    pub fn new(damage: Damage) -> Self {
        Self { damage }
    }

    pub fn state(&self) -> MobState {
        vitals::mob_state(self.damage.total())
    }

    pub fn is_dead(&self) -> bool {
        self.state() == MobState::Dead
    }
}

/// Breathing state for a mob with lungs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Respirator {
    /// Oxygen saturation; below the threshold the mob suffocates.
    pub saturation: f32,
    /// Next half of the breath cycle.
    pub phase: BreathPhase,
    /// Time accumulated toward the next cycle.
    pub accumulated: f32,
    /// Consecutive suffocating cycles.
    pub suffocation_cycles: u32,
    /// Assisted breaths remaining (granted by rescue breathing while
    /// critical).
    pub crit_breaths: u32,
    /// Set while suffocation has persisted past the alert threshold.
    pub alerting: bool,
    /// Sim time of the last audible gasp, for rate limiting.
    pub last_gasp_at: f64,
}

impl Default for Respirator {
    fn default() -> Self {
        Self {
            saturation: breath_constants::MAX_SATURATION,
            phase: BreathPhase::Inhaling,
            accumulated: 0.0,
            suffocation_cycles: 0,
            crit_breaths: 0,
            alerting: false,
            last_gasp_at: f64::NEG_INFINITY,
        }
    }
}

/// Bloodstream reagents and how fast they metabolise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChemStream {
    pub solution: Solution,
    /// Units of each reagent consumed per second.
    pub metabolism_rate: f32,
}

impl Default for ChemStream {
    fn default() -> Self {
        Self {
            solution: Solution::new(chemistry::CHEM_STREAM_CAPACITY),
            metabolism_rate: chemistry::DEFAULT_METABOLISM_RATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stardrift_logic::vitals::DamageKind;

    #[test]
    fn test_vitals_state_tracks_damage() {
        let mut vitals = Vitals::default();
        assert_eq!(vitals.state(), MobState::Alive);

        vitals.damage.apply(DamageKind::Airloss, 150.0);
        assert_eq!(vitals.state(), MobState::Critical);
        assert!(!vitals.is_dead());

        vitals.damage.apply(DamageKind::Brute, 60.0);
        assert!(vitals.is_dead());
    }

    #[test]
    fn test_respirator_starts_saturated() {
        let respirator = Respirator::default();
        assert_eq!(respirator.saturation, breath_constants::MAX_SATURATION);
        assert_eq!(respirator.phase, BreathPhase::Inhaling);
        assert_eq!(respirator.suffocation_cycles, 0);
    }
}
