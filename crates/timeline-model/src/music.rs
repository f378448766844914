//! Background music bed settings.

use serde::{Deserialize, Serialize};

use crate::time::TimePoint;

/// Timelines shorter than this get the music bed as one unfaded piece.
pub const SHORT_TIMELINE_THRESHOLD: TimePoint = TimePoint::from_secs(3);

/// Default fade applied at both ends of every music loop.
pub const DEFAULT_MUSIC_FADE: TimePoint = TimePoint::from_secs(1);

/// A music track looped underneath the whole timeline on its own lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicBed {
    /// Relative path from the project root to the music asset.
    #[serde(default)]
    pub source_path: Option<String>,

    /// Duration of the music asset; the bed loops it as needed.
    pub asset_duration: TimePoint,

    /// Sustain level in `[0.0, 1.0]`.
    #[serde(default = "default_volume")]
    pub volume: f64,

    /// Fade length at the head and tail of every loop.
    #[serde(default = "default_fade")]
    pub fade_duration: TimePoint,
}

fn default_volume() -> f64 {
    1.0
}

fn default_fade() -> TimePoint {
    DEFAULT_MUSIC_FADE
}

impl MusicBed {
    pub fn new(asset_duration: TimePoint) -> Self {
        Self {
            source_path: None,
            asset_duration,
            volume: 1.0,
            fade_duration: DEFAULT_MUSIC_FADE,
        }
    }

    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }
}
