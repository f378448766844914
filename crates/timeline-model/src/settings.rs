//! Everything besides the clip list that a timeline build depends on.

use serde::{Deserialize, Serialize};

use crate::geometry::{FillMode, Size};
use crate::music::MusicBed;
use crate::transition::TransitionConfig;

/// Output-frame settings used when deriving per-layer transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CompositionConfig {
    /// How each clip is fitted into the render size.
    #[serde(default)]
    pub fill_mode: FillMode,

    /// Fixed render size. When unset, the first video clip decides.
    #[serde(default)]
    pub preferred_render_size: Option<Size>,
}

/// Complete build configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BuildConfig {
    /// Transition planning settings.
    #[serde(default)]
    pub transition: TransitionConfig,

    /// Output-frame settings.
    #[serde(default)]
    pub composition: CompositionConfig,

    /// Optional background music bed.
    #[serde(default)]
    pub music: Option<MusicBed>,
}

impl BuildConfig {
    pub fn with_transition(transition: TransitionConfig) -> Self {
        Self {
            transition,
            ..Self::default()
        }
    }
}
