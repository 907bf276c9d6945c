//! Global announcement broadcast log.

use serde::{Deserialize, Serialize};

use crate::components::Color;

/// One global broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub text: String,
    pub color: Color,
    /// Sim time the broadcast went out.
    pub time: f64,
}

/// Collects every global broadcast made during the simulation.
///
/// Presentation layers read from here; the simulation only appends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnouncementLog {
    entries: Vec<Announcement>,
}

impl AnnouncementLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcast to everyone.
    pub fn dispatch(&mut self, text: impl Into<String>, color: Color, time: f64) {
        let text = text.into();
        log::info!("[Broadcast] {}", text);
        self.entries.push(Announcement { text, color, time });
    }

    pub fn entries(&self) -> &[Announcement] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&Announcement> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
