//! Clip descriptors: the immutable input of a timeline build.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Orientation, Size};
use crate::lane::MediaKind;
use crate::time::{TimePoint, TimeRange};

/// Caller-assigned clip identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(pub String);

impl ClipId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClipId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ClipId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One source clip as the caller wants it placed on the timeline.
///
/// Track-presence flags, durations, and geometry are expected to be
/// resolved (probed) before a build; the engine never touches media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipDescriptor {
    /// Caller-assigned identifier.
    pub id: ClipId,

    /// Relative path from the project root to the source asset.
    #[serde(default)]
    pub source_path: Option<String>,

    /// Portion of the source asset to use.
    pub source_range: TimeRange,

    /// Playback speed factor (1.0 = real time). The placed duration is the
    /// source duration multiplied by this factor.
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,

    /// Whether the source carries an audio track.
    #[serde(default = "default_true")]
    pub has_audio: bool,

    /// Whether the source carries a video track.
    #[serde(default = "default_true")]
    pub has_video: bool,

    /// Explicitly silenced.
    #[serde(default)]
    pub is_muted: bool,

    /// Playback volume in `[0.0, 1.0]`.
    #[serde(default = "default_volume")]
    pub volume: f64,

    /// Transition length requested for the boundary with the next clip.
    /// `None` uses the global default; zero asks for a hard cut.
    #[serde(default)]
    pub requested_transition_duration: Option<TimePoint>,

    /// Natural size of the video track.
    #[serde(default)]
    pub natural_size: Size,

    /// Orientation of the video track.
    #[serde(default)]
    pub orientation: Orientation,
}

fn default_scale_factor() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_volume() -> f64 {
    1.0
}

impl ClipDescriptor {
    /// A real-time clip with audio and video at full volume.
    pub fn new(id: impl Into<ClipId>, source_range: TimeRange) -> Self {
        Self {
            id: id.into(),
            source_path: None,
            source_range,
            scale_factor: 1.0,
            has_audio: true,
            has_video: true,
            is_muted: false,
            volume: 1.0,
            requested_transition_duration: None,
            natural_size: Size::default(),
            orientation: Orientation::default(),
        }
    }

    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_transition(mut self, duration: TimePoint) -> Self {
        self.requested_transition_duration = Some(duration);
        self
    }

    pub fn with_geometry(mut self, natural_size: Size, orientation: Orientation) -> Self {
        self.natural_size = natural_size;
        self.orientation = orientation;
        self
    }

    pub fn muted(mut self) -> Self {
        self.is_muted = true;
        self
    }

    pub fn video_only(mut self) -> Self {
        self.has_audio = false;
        self.has_video = true;
        self
    }

    pub fn audio_only(mut self) -> Self {
        self.has_audio = true;
        self.has_video = false;
        self
    }

    /// Whether the clip carries the given media type.
    pub fn bears(&self, kind: MediaKind) -> bool {
        match kind {
            MediaKind::Audio => self.has_audio,
            MediaKind::Video => self.has_video,
        }
    }

    /// Duration on the output timeline; `None` if the scale factor cannot be
    /// applied.
    pub fn checked_placed_duration(&self) -> Option<TimePoint> {
        self.source_range.duration().checked_scale(self.scale_factor)
    }

    /// Duration on the output timeline.
    ///
    /// # Panics
    ///
    /// Panics if the scale factor is not finite; builds validate this first.
    pub fn placed_duration(&self) -> TimePoint {
        self.source_range.duration().scale(self.scale_factor)
    }

    /// Whether the clip plays at a speed other than real time.
    pub fn is_varispeed(&self) -> bool {
        self.scale_factor != 1.0
    }

    /// Whether the clip's audio is silenced, either explicitly or because
    /// varispeed clips are muted by configuration.
    pub fn is_effectively_muted(&self, mute_on_speed_change: bool) -> bool {
        self.is_muted || (mute_on_speed_change && self.is_varispeed())
    }
}
