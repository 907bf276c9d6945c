//! Stardrift Core - Deep Space Rescue Simulation Engine
//!
//! An ECS-based simulation of distress-signal rescue operations: derelict
//! vessels spawn as grids full of injured crew, responders keep them
//! breathing and treat their injuries, and the event controller decides
//! whether the rescue succeeded.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Grids (vessels), mobs, items, distress event rules
//! - **Components**: Pure data attached to entities (Position, Vitals, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! Pure gameplay rules (breathing math, damage thresholds, objective
//! tallying) live in `stardrift-logic`; this crate hosts them in a world.
//!
//! # Example
//!
//! ```rust,no_run
//! use stardrift_core::prelude::*;
//! use stardrift_core::systems::DistressConfig;
//!
//! let mut engine = SimulationEngine::new();
//!
//! // Launch a distress signal event
//! engine.start_distress_signal(DistressConfig::default());
//!
//! // Run simulation
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod components;
pub mod engine;
pub mod generation;
pub mod persistence;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::SimulationEngine;
}
