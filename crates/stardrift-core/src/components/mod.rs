//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod common;
mod distress;
mod items;
mod mobs;
mod station;

pub use common::*;
pub use distress::*;
pub use items::*;
pub use mobs::*;
pub use station::*;
