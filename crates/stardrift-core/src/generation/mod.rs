//! Content generation - vessel templates and naming

mod names;
mod vessel;

pub use names::*;
pub use vessel::*;
