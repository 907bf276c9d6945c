//! Pure gameplay logic for Stardrift.
//!
//! This crate contains all rescue-simulation rules that are independent of
//! any ECS, engine, or runtime. Functions take plain data and return
//! results, making them unit-testable and portable between the headless
//! harness and the full simulation.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`vitals`] | Damage model, Alive/Critical/Dead state thresholds |
//! | [`respiration`] | Atmosphere data, breathing cycle, suffocation math |
//! | [`chemistry`] | Solutions, injection transfers, reagent metabolism |
//! | [`naming`] | Vessel serial formatting and callsign derivation |
//! | [`objectives`] | Rescue objective tallying and debounce re-validation |
//! | [`news`] | Shipboard news feed validation and share gating |

pub mod chemistry;
pub mod naming;
pub mod news;
pub mod objectives;
pub mod respiration;
pub mod vitals;
