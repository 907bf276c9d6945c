//! Item components.

use serde::{Deserialize, Serialize};
use stardrift_logic::chemistry::{self, Solution};

/// A chemical injector: holds a reservoir and delivers a fixed dose per use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Injector {
    /// Reagent reservoir.
    pub solution: Solution,
    /// Units moved per injection.
    pub transfer_amount: f32,
    /// Restrict injection targets to mobs (no decanting into containers).
    pub only_mobs: bool,
}

impl Injector {
    pub fn new(solution: Solution) -> Self {
        Self {
            solution,
            transfer_amount: chemistry::DEFAULT_TRANSFER_AMOUNT,
            only_mobs: true,
        }
    }

    pub fn with_transfer_amount(mut self, amount: f32) -> Self {
        self.transfer_amount = amount;
        self
    }
}

/// Marker for cargo worth recovering from a derelict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalvageCargo {
    pub label: String,
}
