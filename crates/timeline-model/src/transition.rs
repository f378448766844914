//! Transition settings shared by every boundary of a timeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::time::TimePoint;

/// Visual curve applied across a transition window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransitionCurve {
    /// No transitions; clips butt-join.
    None,
    /// Outgoing layer fades out over the still-visible incoming layer.
    Fade,
    /// Outgoing fades out while incoming fades in.
    #[default]
    Dissolve,
}

impl FromStr for TransitionCurve {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(TransitionCurve::None),
            "fade" => Ok(TransitionCurve::Fade),
            "dissolve" => Ok(TransitionCurve::Dissolve),
            _ => Err(ParseValueError::new("transition curve", s)),
        }
    }
}

impl fmt::Display for TransitionCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransitionCurve::None => "none",
            TransitionCurve::Fade => "fade",
            TransitionCurve::Dissolve => "dissolve",
        };
        write!(f, "{name}")
    }
}

/// Whether transition durations follow the outgoing clip's speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScalePolicy {
    /// Use the configured duration as-is.
    #[default]
    Fixed,
    /// Multiply the duration by the outgoing clip's scale factor.
    ScaleWithSpeed,
}

/// Global transition configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Duration used at every boundary unless the outgoing clip overrides it.
    pub default_duration: TimePoint,

    /// Scaling rule for transition durations.
    #[serde(default)]
    pub scale_policy: ScalePolicy,

    /// Curve applied across every accepted transition.
    #[serde(default)]
    pub curve: TransitionCurve,

    /// Silence clips played at a speed other than 1.0.
    #[serde(default)]
    pub mute_on_speed_change: bool,
}

impl TransitionConfig {
    /// Hard cuts everywhere.
    pub fn none() -> Self {
        Self {
            default_duration: TimePoint::ZERO,
            scale_policy: ScalePolicy::Fixed,
            curve: TransitionCurve::None,
            mute_on_speed_change: false,
        }
    }

    pub fn dissolve(duration: TimePoint) -> Self {
        Self {
            default_duration: duration,
            curve: TransitionCurve::Dissolve,
            ..Self::none()
        }
    }

    pub fn fade(duration: TimePoint) -> Self {
        Self {
            default_duration: duration,
            curve: TransitionCurve::Fade,
            ..Self::none()
        }
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self::dissolve(TimePoint::from_secs(1))
    }
}

/// Failure to parse a named setting from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value:?}")]
pub struct ParseValueError {
    kind: &'static str,
    value: String,
}

impl ParseValueError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
