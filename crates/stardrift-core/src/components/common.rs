//! Common components used across multiple entity types.

use hecs::Entity;
use serde::{Deserialize, Serialize};

/// 2D position vector
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }

    /// Unit vector from an angle in radians.
    pub fn from_angle(radians: f32) -> Self {
        Self {
            x: radians.cos(),
            y: radians.sin(),
        }
    }

    /// Component-wise rounding, for human-readable coordinates.
    pub fn rounded(&self) -> Self {
        Self {
            x: self.x.round(),
            y: self.y.round(),
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// RGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex string. Returns `None` on malformed input.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        // Distress-signal blue.
        Self::new(0, 127, 255)
    }
}

/// Identifier for one space (map) the simulation plays out in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapId(pub u32);

/// Spatial position component - where an entity is located.
///
/// An entity is either attached to a grid (local coordinates relative to
/// the grid's origin) or free-floating on a map (local coordinates are
/// world coordinates). `grid` is the live handle; `grid_id` is the stable
/// id used for save/load relinking, since `Entity` is not serializable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    /// Position relative to the grid origin, or world position if detached.
    pub local: Vec2,
    /// The grid entity this position is relative to.
    #[serde(skip)]
    pub grid: Option<Entity>,
    /// Stable id of the attached grid, for serialization.
    pub grid_id: Option<u32>,
    /// The map this entity occupies (authoritative only while detached;
    /// attached entities follow their grid's map).
    pub map: MapId,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            local: Vec2::ZERO,
            grid: None,
            grid_id: None,
            map: MapId(0),
        }
    }
}

impl Position {
    pub fn on_grid(local: Vec2, grid: Entity, grid_id: u32) -> Self {
        Self {
            local,
            grid: Some(grid),
            grid_id: Some(grid_id),
            map: MapId(0),
        }
    }

    pub fn on_map(local: Vec2, map: MapId) -> Self {
        Self {
            local,
            grid: None,
            grid_id: None,
            map,
        }
    }
}
