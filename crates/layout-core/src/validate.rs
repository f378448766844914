//! Clip validation ahead of a build.

use std::collections::HashSet;

use segue_timeline_model::{
    common_timescale, ClipDescriptor, ScalePolicy, TimePoint, TransitionConfig,
    PREFERRED_TIMESCALE,
};

use crate::error::BuildError;

/// Check every clip can be placed. Returns the placed durations in clip
/// order.
///
/// Rejects duplicate ids, a scale factor that is not a positive finite
/// number, a volume outside `[0, 1]`, an empty source range, a negative
/// transition request, and video clips without a usable natural size.
pub fn validate_clips(clips: &[ClipDescriptor]) -> Result<Vec<TimePoint>, BuildError> {
    let mut seen = HashSet::with_capacity(clips.len());
    for clip in clips {
        if !seen.insert(&clip.id) {
            return Err(BuildError::invalid_clip(&clip.id, "duplicate clip id"));
        }
        if !(clip.volume.is_finite() && (0.0..=1.0).contains(&clip.volume)) {
            return Err(BuildError::invalid_clip(
                &clip.id,
                format!("volume {} is outside [0, 1]", clip.volume),
            ));
        }
        if let Some(requested) = clip.requested_transition_duration {
            if requested.is_negative() {
                return Err(BuildError::invalid_clip(
                    &clip.id,
                    format!("requested transition {requested} is negative"),
                ));
            }
        }
        if clip.has_video {
            let size = clip.natural_size;
            if size.is_zero() || !size.width.is_finite() || !size.height.is_finite() {
                return Err(BuildError::invalid_clip(
                    &clip.id,
                    format!("natural size {size} is not usable"),
                ));
            }
        }
    }
    placed_durations(clips)
}

/// Placed duration of every clip, failing on anything that cannot be
/// placed on the timeline.
pub fn placed_durations(clips: &[ClipDescriptor]) -> Result<Vec<TimePoint>, BuildError> {
    clips.iter().map(placed_duration).collect()
}

fn placed_duration(clip: &ClipDescriptor) -> Result<TimePoint, BuildError> {
    if !(clip.scale_factor.is_finite() && clip.scale_factor > 0.0) {
        return Err(BuildError::invalid_clip(
            &clip.id,
            format!("scale factor {} must be positive and finite", clip.scale_factor),
        ));
    }
    if !clip.source_range.duration().is_positive() {
        return Err(BuildError::invalid_clip(&clip.id, "source range is empty"));
    }
    match clip.checked_placed_duration() {
        Some(duration) if duration.is_positive() => Ok(duration),
        Some(_) => Err(BuildError::invalid_clip(
            &clip.id,
            "placed duration rounds to zero",
        )),
        None => Err(BuildError::invalid_clip(
            &clip.id,
            "placed duration overflows",
        )),
    }
}

/// Check that every time the layout will combine shares one representable
/// timescale, and that the whole timeline fits on it. Returns that
/// timescale.
///
/// Placed durations and transition candidates are the only inputs to the
/// layout arithmetic. When all of their timescales divide a common `u32`
/// timescale and the total length fits on it, every position, head, tail
/// and pass-through derived from them is representable too.
pub fn check_timescales(
    clips: &[ClipDescriptor],
    durations: &[TimePoint],
    config: &TransitionConfig,
) -> Result<u32, BuildError> {
    let mut timescale = config.default_duration.timescale();
    if config.scale_policy == ScalePolicy::ScaleWithSpeed {
        // scaled candidates land on lcm(timescale, PREFERRED_TIMESCALE)
        timescale = common_timescale([timescale, PREFERRED_TIMESCALE]).ok_or_else(|| {
            BuildError::invalid_transition(format!(
                "default transition {} cannot be scaled",
                config.default_duration
            ))
        })?;
    }

    let mut total = TimePoint::ZERO;
    for (clip, &duration) in clips.iter().zip(durations) {
        let request = clip.requested_transition_duration.map(|r| r.timescale());
        timescale = common_timescale([timescale, duration.timescale(), request.unwrap_or(1)])
            .ok_or_else(|| {
                BuildError::invalid_clip(
                    &clip.id,
                    format!(
                        "timescale {} is incompatible with the rest of the timeline",
                        request.map_or(duration.timescale(), |r| r.max(duration.timescale()))
                    ),
                )
            })?;
        total = total.checked_add(duration).ok_or_else(|| {
            BuildError::invalid_clip(&clip.id, "timeline length overflows")
        })?;
    }

    let ticks = total.value() as i128 * (timescale / total.timescale()) as i128;
    if ticks > i64::MAX as i128 {
        return Err(BuildError::invalid_transition(format!(
            "timeline of {total} does not fit on timescale {timescale}"
        )));
    }
    Ok(timescale)
}
