//! Distress signal event components.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::engine::TimerId;

use super::Color;

/// Runtime state of one active distress signal event.
///
/// Created when the event starts, mutated by the controller during its
/// active tick, destroyed (with its spawned vessel) when the event ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistressSignal {
    /// Vessel template ids the event may spawn.
    pub vessel_pool: Vec<String>,
    /// Id of the template actually chosen, set once at start.
    pub chosen_vessel: Option<String>,
    /// Transponder color applied to the spawned vessel.
    pub color: Color,
    /// The spawned vessel grid, set once at start.
    #[serde(skip)]
    pub grid: Option<Entity>,
    /// Stable id of the spawned grid, for serialization.
    pub grid_id: Option<u32>,
    /// Short callsign derived from the vessel's generated name.
    pub designation: Option<String>,
    /// Objectives registered with this event. Rebuilt lazily after a
    /// load; objective entities re-register through grid containment.
    #[serde(skip)]
    pub objectives: Vec<Entity>,
    /// Whether the rescue succeeded, recorded when all objectives reach a
    /// terminal state.
    pub objectives_completed: bool,
    /// Pending debounce timer, if the event is waiting out the
    /// confirmation window. Cleared on load; the next tick re-arms it.
    pub debounce: Option<TimerId>,
}

impl DistressSignal {
    pub fn new(vessel_pool: Vec<String>, color: Color) -> Self {
        Self {
            vessel_pool,
            chosen_vessel: None,
            color,
            grid: None,
            grid_id: None,
            designation: None,
            objectives: Vec::new(),
            objectives_completed: false,
            debounce: None,
        }
    }
}

/// What an objective's subject must achieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveKind {
    /// The subject must be alive, fully treated, and back aboard the
    /// event's vessel. Never fails on its own; only the event ending
    /// fails it.
    RescueVictim,
    /// The subject must be aboard the event's vessel.
    RecoverCargo,
}

/// One success/failure condition attached to an entity aboard the
/// distressed vessel.
///
/// An objective discovers its event lazily, by grid containment, the
/// first time it is evaluated. `failed` is permanent; `completed` may
/// revert to pending while the event runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistressObjective {
    pub kind: ObjectiveKind,
    /// Owning event rule, set at most once at registration.
    #[serde(skip)]
    pub rule: Option<Entity>,
    /// Failure of this objective ends the event immediately.
    pub critical: bool,
    /// Conditions currently met.
    pub completed: bool,
    /// No longer possible to complete.
    pub failed: bool,
}

impl DistressObjective {
    pub fn new(kind: ObjectiveKind) -> Self {
        Self {
            kind,
            rule: None,
            critical: false,
            completed: false,
            failed: false,
        }
    }

    pub fn critical(kind: ObjectiveKind) -> Self {
        Self {
            critical: true,
            ..Self::new(kind)
        }
    }

    /// Completed or failed, either way no longer pending.
    pub fn is_terminal(&self) -> bool {
        self.completed || self.failed
    }
}
