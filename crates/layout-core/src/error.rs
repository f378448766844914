//! Build failures.

use segue_timeline_model::{ClipId, MediaKind, TimeRange};

use crate::volume::AutomationLane;

/// Why a timeline could not be built.
///
/// Every variant is local and deterministic: the same input fails the same
/// way, and a failed build produces no partial output.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// Transition decisions that would force a negative pass-through, or
    /// that do not line up with the clip list.
    #[error("Invalid transition: {message}")]
    InvalidTransition { message: String },

    /// Two ramps on one automation lane share a positive-length span.
    #[error("Overlapping automation on {lane}: {incoming} overlaps {existing}")]
    OverlappingAutomation {
        lane: AutomationLane,
        existing: TimeRange,
        incoming: TimeRange,
    },

    /// Lane alternation was broken, or two clips on one lane overlap.
    #[error("Lane assignment conflict on {kind} lanes at clip {index}: {message}")]
    LaneAssignmentConflict {
        kind: MediaKind,
        index: usize,
        message: String,
    },

    /// A transition names a neighbour that has no lane for the medium.
    #[error("Transition at boundary {boundary} needs {kind} from clip {clip}, which has none")]
    MissingMediaForLane {
        boundary: usize,
        clip: ClipId,
        kind: MediaKind,
    },

    /// A clip descriptor that cannot be placed.
    #[error("Invalid clip {clip}: {message}")]
    InvalidClip { clip: ClipId, message: String },

    /// A music bed that cannot be tiled.
    #[error("Invalid music bed: {message}")]
    InvalidMusicBed { message: String },

    /// Render size or fill settings that cannot produce a transform.
    #[error("Invalid composition: {message}")]
    InvalidComposition { message: String },
}

impl BuildError {
    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition {
            message: msg.into(),
        }
    }

    pub fn invalid_clip(clip: &ClipId, msg: impl Into<String>) -> Self {
        Self::InvalidClip {
            clip: clip.clone(),
            message: msg.into(),
        }
    }

    pub fn invalid_music_bed(msg: impl Into<String>) -> Self {
        Self::InvalidMusicBed {
            message: msg.into(),
        }
    }

    /// Short machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::OverlappingAutomation { .. } => "overlapping_automation",
            Self::LaneAssignmentConflict { .. } => "lane_assignment_conflict",
            Self::MissingMediaForLane { .. } => "missing_media_for_lane",
            Self::InvalidClip { .. } => "invalid_clip",
            Self::InvalidMusicBed { .. } => "invalid_music_bed",
            Self::InvalidComposition { .. } => "invalid_composition",
        }
    }
}
