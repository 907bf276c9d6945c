//! Solutions, injection transfers, and reagent metabolism.
//!
//! A solution is a bag of reagent quantities with a volume cap. Injectors
//! move a fixed dose from their reservoir into a mob's chem stream; the
//! metabolism step then burns reagents down over time and reports what was
//! consumed so effects can be applied.

use serde::{Deserialize, Serialize};

use crate::vitals::DamageKind;

/// Default injector dose per use.
pub const DEFAULT_TRANSFER_AMOUNT: f32 = 5.0;

/// Default chem stream capacity for a humanoid bloodstream.
pub const CHEM_STREAM_CAPACITY: f32 = 50.0;

/// Default units of each reagent metabolised per second.
pub const DEFAULT_METABOLISM_RATE: f32 = 0.5;

/// A mixture of reagents with a maximum volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Reagent id and quantity, one entry per distinct reagent.
    pub reagents: Vec<(String, f32)>,
    /// Volume cap in units.
    pub max_volume: f32,
}

impl Solution {
    pub fn new(max_volume: f32) -> Self {
        Self {
            reagents: Vec::new(),
            max_volume,
        }
    }

    /// Build a solution from (id, quantity) pairs.
    pub fn with_reagents(max_volume: f32, reagents: &[(&str, f32)]) -> Self {
        let mut solution = Self::new(max_volume);
        for (id, qty) in reagents {
            solution.add(id, *qty);
        }
        solution
    }

    pub fn total_volume(&self) -> f32 {
        self.reagents.iter().map(|(_, qty)| qty).sum()
    }

    pub fn available_volume(&self) -> f32 {
        (self.max_volume - self.total_volume()).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.total_volume() <= 0.0
    }

    /// Add a reagent, merging with an existing entry and capping at the
    /// volume limit. Returns the quantity actually added.
    pub fn add(&mut self, id: &str, quantity: f32) -> f32 {
        let accepted = quantity.min(self.available_volume());
        if accepted <= 0.0 {
            return 0.0;
        }

        if let Some(entry) = self.reagents.iter_mut().find(|(rid, _)| rid == id) {
            entry.1 += accepted;
        } else {
            self.reagents.push((id.to_string(), accepted));
        }
        accepted
    }

    /// Remove up to `amount` units, taking a proportional share of every
    /// reagent, and return them as a new solution.
    pub fn split(&mut self, amount: f32) -> Solution {
        let total = self.total_volume();
        let mut taken = Solution::new(amount);

        if total <= 0.0 || amount <= 0.0 {
            return taken;
        }

        let fraction = (amount / total).min(1.0);
        for (id, qty) in &mut self.reagents {
            let moved = *qty * fraction;
            *qty -= moved;
            taken.reagents.push((id.clone(), moved));
        }
        self.reagents.retain(|(_, qty)| *qty > 0.0001);

        taken
    }
}

/// Burn reagents down for one time step.
///
/// Removes up to `rate * dt` units of each reagent and returns the
/// consumed (id, quantity) pairs for effect application.
pub fn metabolise(solution: &mut Solution, rate: f32, dt: f32) -> Vec<(String, f32)> {
    let budget = rate * dt;
    let mut consumed = Vec::new();

    if budget <= 0.0 {
        return consumed;
    }

    for (id, qty) in &mut solution.reagents {
        let used = qty.min(budget);
        if used > 0.0 {
            *qty -= used;
            consumed.push((id.clone(), used));
        }
    }
    solution.reagents.retain(|(_, qty)| *qty > 0.0001);

    consumed
}

/// Healing effect of one unit of a metabolised reagent.
///
/// Returns the damage group healed and the amount per unit. Unknown
/// reagents are inert.
pub fn reagent_effect(id: &str) -> Option<(DamageKind, f32)> {
    match id {
        "epinephrine" => Some((DamageKind::Airloss, 3.0)),
        "bicaridine" => Some((DamageKind::Brute, 2.0)),
        "dermaline" => Some((DamageKind::Burn, 2.0)),
        "dylovene" => Some((DamageKind::Toxin, 2.0)),
        _ => None,
    }
}

/// Dose actually moved by an injection: the configured transfer amount,
/// capped by what the reservoir holds and the space the target has left.
pub fn injection_dose(transfer_amount: f32, source_volume: f32, target_space: f32) -> f32 {
    transfer_amount.min(source_volume).min(target_space).max(0.0)
}
