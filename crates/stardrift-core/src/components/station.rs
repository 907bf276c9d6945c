//! Grid and vessel components.

use serde::{Deserialize, Serialize};
use stardrift_logic::respiration::Atmosphere;

use super::{Color, MapId, Vec2};

/// A spawned structure: a vessel or station occupying a region of a map.
///
/// Entities located on the grid carry positions relative to `origin`.
/// Deleting a grid despawns everything still attached to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    /// Stable id, unique per simulation, used for save/load relinking.
    pub id: u32,
    /// Generated display name, e.g. "SDV Kestrel 014".
    pub name: String,
    /// World position of the grid's origin on its map.
    pub origin: Vec2,
    /// The map this grid currently occupies.
    pub map: MapId,
    /// Shared gas state for everything aboard.
    pub atmosphere: Atmosphere,
}

impl Grid {
    pub fn new(id: u32, name: impl Into<String>, map: MapId) -> Self {
        Self {
            id,
            name: name.into(),
            origin: Vec2::ZERO,
            map,
            atmosphere: Atmosphere::standard(),
        }
    }

    pub fn with_atmosphere(mut self, atmosphere: Atmosphere) -> Self {
        self.atmosphere = atmosphere;
        self
    }
}

/// Identification transponder shown to sensor consoles.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IffMarker {
    pub color: Color,
}

/// An in-progress FTL relocation. Present only while the grid is in
/// transit; removed on arrival.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FtlJourney {
    /// World position to arrive at.
    pub destination: Vec2,
    /// Map to arrive on.
    pub dest_map: MapId,
    /// Seconds of travel remaining.
    pub remaining: f32,
}
