//! Damage model and mob state determination.
//!
//! Damage is tracked in four groups. A mob's state (alive, critical, dead)
//! is derived from the running total, never stored independently, so the
//! two can't drift apart.

use serde::{Deserialize, Serialize};

/// Total damage at which a mob falls into critical condition.
pub const CRITICAL_THRESHOLD: f32 = 100.0;

/// Total damage at which a mob dies.
pub const DEAD_THRESHOLD: f32 = 200.0;

/// Damage groups tracked per mob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageKind {
    /// Blunt trauma, cuts, fractures.
    Brute,
    /// Heat and chemical burns.
    Burn,
    /// Poisoning.
    Toxin,
    /// Oxygen deprivation.
    Airloss,
}

/// Accumulated damage for one mob, by group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Damage {
    pub brute: f32,
    pub burn: f32,
    pub toxin: f32,
    pub airloss: f32,
}

impl Damage {
    pub const NONE: Self = Self {
        brute: 0.0,
        burn: 0.0,
        toxin: 0.0,
        airloss: 0.0,
    };

    pub fn new(brute: f32, burn: f32, toxin: f32, airloss: f32) -> Self {
        Self {
            brute,
            burn,
            toxin,
            airloss,
        }
    }

    pub fn total(&self) -> f32 {
        self.brute + self.burn + self.toxin + self.airloss
    }

    /// Whether any group carries damage.
    pub fn any(&self) -> bool {
        self.total() > 0.0
    }

    pub fn apply(&mut self, kind: DamageKind, amount: f32) {
        let slot = self.slot_mut(kind);
        *slot = (*slot + amount).max(0.0);
    }

    /// Heal `amount` from one group, flooring at zero.
    pub fn heal(&mut self, kind: DamageKind, amount: f32) {
        let slot = self.slot_mut(kind);
        *slot = (*slot - amount).max(0.0);
    }

    fn slot_mut(&mut self, kind: DamageKind) -> &mut f32 {
        match kind {
            DamageKind::Brute => &mut self.brute,
            DamageKind::Burn => &mut self.burn,
            DamageKind::Toxin => &mut self.toxin,
            DamageKind::Airloss => &mut self.airloss,
        }
    }
}

/// Mob condition, derived from total damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MobState {
    Alive,
    /// Unconscious and unable to act or breathe unassisted.
    Critical,
    Dead,
}

/// Derive the mob state for a damage total.
pub fn mob_state(total_damage: f32) -> MobState {
    if total_damage >= DEAD_THRESHOLD {
        MobState::Dead
    } else if total_damage >= CRITICAL_THRESHOLD {
        MobState::Critical
    } else {
        MobState::Alive
    }
}

/// Whether the mob can act on its own (move, breathe, use items).
pub fn is_incapacitated(state: MobState) -> bool {
    matches!(state, MobState::Critical | MobState::Dead)
}
