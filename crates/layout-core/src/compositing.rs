//! Compositing instructions for the rendering backend.
//!
//! Instructions are emitted in timeline order: each video clip's
//! pass-through, then the transition into the next clip. A pass-through
//! shows one lane unmodified; a transition blends exactly two lanes with the
//! opacity ramps picked by the configured curve.

use serde::{Deserialize, Serialize};

use segue_timeline_model::{ClipId, Lane, MediaKind, TimeRange, TransitionCurve};

use crate::error::BuildError;
use crate::layout::PlacedClip;

/// Linear opacity change across an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpacityRamp {
    pub start: f64,
    pub end: f64,
}

impl OpacityRamp {
    pub const VISIBLE: OpacityRamp = OpacityRamp {
        start: 1.0,
        end: 1.0,
    };
    pub const FADE_OUT: OpacityRamp = OpacityRamp {
        start: 1.0,
        end: 0.0,
    };
    pub const FADE_IN: OpacityRamp = OpacityRamp {
        start: 0.0,
        end: 1.0,
    };

    /// Opacity at `progress` in `[0, 1]`.
    pub fn at(&self, progress: f64) -> f64 {
        let progress = progress.clamp(0.0, 1.0);
        self.start + (self.end - self.start) * progress
    }

    /// `(outgoing, incoming)` ramps for a curve.
    ///
    /// A dissolve crossfades both layers. A fade only takes the outgoing
    /// layer down and leaves the incoming layer visible underneath. A
    /// disabled curve has no blend at all.
    pub fn pair_for(curve: TransitionCurve) -> Option<(OpacityRamp, OpacityRamp)> {
        match curve {
            TransitionCurve::Dissolve => Some((Self::FADE_OUT, Self::FADE_IN)),
            TransitionCurve::Fade => Some((Self::FADE_OUT, Self::VISIBLE)),
            TransitionCurve::None => None,
        }
    }
}

/// What the backend does over an instruction's range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum InstructionMode {
    /// Show one lane unmodified.
    Passthrough { lane: Lane, clip_id: ClipId },
    /// Blend two lanes.
    Transition {
        from_lane: Lane,
        to_lane: Lane,
        from_clip: ClipId,
        to_clip: ClipId,
        from_opacity: OpacityRamp,
        to_opacity: OpacityRamp,
    },
}

/// One time-stamped step of the video composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositingInstruction {
    pub time_range: TimeRange,
    #[serde(flatten)]
    pub mode: InstructionMode,
}

impl CompositingInstruction {
    /// Lanes whose frames the backend must have for this instruction.
    pub fn required_lanes(&self) -> Vec<Lane> {
        match &self.mode {
            InstructionMode::Passthrough { lane, .. } => vec![*lane],
            InstructionMode::Transition {
                from_lane, to_lane, ..
            } => vec![*from_lane, *to_lane],
        }
    }

    /// Clips shown during this instruction, outgoing first.
    pub fn clip_ids(&self) -> Vec<&ClipId> {
        match &self.mode {
            InstructionMode::Passthrough { clip_id, .. } => vec![clip_id],
            InstructionMode::Transition {
                from_clip, to_clip, ..
            } => vec![from_clip, to_clip],
        }
    }

    pub fn is_transition(&self) -> bool {
        matches!(self.mode, InstructionMode::Transition { .. })
    }
}

/// Emit instructions for a placed timeline.
///
/// Fails with [`BuildError::MissingMediaForLane`] when a transition touches a
/// clip that has no video lane, and with [`BuildError::InvalidTransition`]
/// when a clip has a tail transition but `curve` is disabled.
pub fn derive_instructions(
    placed: &[PlacedClip],
    curve: TransitionCurve,
) -> Result<Vec<CompositingInstruction>, BuildError> {
    let ramps = OpacityRamp::pair_for(curve);
    let mut instructions = Vec::with_capacity(placed.len() * 2);

    for (i, clip) in placed.iter().enumerate() {
        if let Some(lane) = clip.video_lane {
            instructions.push(CompositingInstruction {
                time_range: clip.passthrough_range,
                mode: InstructionMode::Passthrough {
                    lane,
                    clip_id: clip.clip_id.clone(),
                },
            });
        }

        if !clip.has_tail_transition() {
            continue;
        }
        let Some(next) = placed.get(i + 1) else {
            continue;
        };
        let Some((from_opacity, to_opacity)) = ramps else {
            return Err(BuildError::invalid_transition(format!(
                "boundary {i} has a {} transition but the curve is {curve}",
                clip.tail_transition_range.duration()
            )));
        };
        let from_lane = video_lane(clip, i)?;
        let to_lane = video_lane(next, i)?;
        instructions.push(CompositingInstruction {
            time_range: clip.tail_transition_range,
            mode: InstructionMode::Transition {
                from_lane,
                to_lane,
                from_clip: clip.clip_id.clone(),
                to_clip: next.clip_id.clone(),
                from_opacity,
                to_opacity,
            },
        });
    }

    Ok(instructions)
}

fn video_lane(clip: &PlacedClip, boundary: usize) -> Result<Lane, BuildError> {
    clip.video_lane.ok_or_else(|| BuildError::MissingMediaForLane {
        boundary,
        clip: clip.clip_id.clone(),
        kind: MediaKind::Video,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout;
    use crate::planner::plan_transitions;
    use segue_timeline_model::{ClipDescriptor, TimePoint, TransitionConfig};

    fn clip(id: &str, s: u32) -> ClipDescriptor {
        ClipDescriptor::new(id, TimeRange::from_secs(0, s))
    }

    fn instructions(
        clips: &[ClipDescriptor],
        config: &TransitionConfig,
    ) -> Result<Vec<CompositingInstruction>, BuildError> {
        let decisions = plan_transitions(clips, config)?;
        let placed = layout(clips, &decisions)?;
        derive_instructions(&placed, config.curve)
    }

    #[test]
    fn test_scenario_instruction_order() {
        let clips = [clip("a", 10), clip("b", 8), clip("c", 12)];
        let list = instructions(&clips, &TransitionConfig::dissolve(TimePoint::from_secs(2))).unwrap();
        let ranges: Vec<_> = list.iter().map(|i| (i.time_range, i.is_transition())).collect();
        assert_eq!(
            ranges,
            vec![
                (TimeRange::from_secs(0, 8), false),
                (TimeRange::from_secs(8, 2), true),
                (TimeRange::from_secs(10, 4), false),
                (TimeRange::from_secs(14, 2), true),
                (TimeRange::from_secs(16, 10), false),
            ]
        );
        assert_eq!(list[1].required_lanes(), vec![Lane::A, Lane::B]);
        assert_eq!(list[3].required_lanes(), vec![Lane::B, Lane::A]);
        assert_eq!(list[2].required_lanes(), vec![Lane::B]);
    }

    #[test]
    fn test_dissolve_and_fade_ramps() {
        let clips = [clip("a", 4), clip("b", 4)];
        let dissolve = instructions(&clips, &TransitionConfig::dissolve(TimePoint::from_secs(1))).unwrap();
        let InstructionMode::Transition {
            from_opacity,
            to_opacity,
            ..
        } = dissolve[1].mode
        else {
            panic!("expected transition");
        };
        assert_eq!(from_opacity, OpacityRamp::FADE_OUT);
        assert_eq!(to_opacity, OpacityRamp::FADE_IN);

        let fade = instructions(&clips, &TransitionConfig::fade(TimePoint::from_secs(1))).unwrap();
        let InstructionMode::Transition {
            from_opacity,
            to_opacity,
            ..
        } = fade[1].mode
        else {
            panic!("expected transition");
        };
        assert_eq!(from_opacity, OpacityRamp::FADE_OUT);
        assert_eq!(to_opacity, OpacityRamp::VISIBLE);
    }

    #[test]
    fn test_hard_cuts_emit_only_passthroughs() {
        let clips = [clip("a", 4), clip("b", 4), clip("c", 4)];
        let list = instructions(&clips, &TransitionConfig::none()).unwrap();
        assert_eq!(list.len(), 3);
        assert!(list.iter().all(|i| !i.is_transition()));
    }

    #[test]
    fn test_transition_into_audio_only_clip_fails() {
        let clips = [clip("a", 4), clip("b", 4).audio_only()];
        let err = instructions(&clips, &TransitionConfig::default()).unwrap_err();
        assert_eq!(
            err,
            BuildError::MissingMediaForLane {
                boundary: 0,
                clip: ClipId::new("b"),
                kind: MediaKind::Video,
            }
        );
    }

    #[test]
    fn test_disabled_curve_rejects_planned_transition() {
        let clips = [clip("a", 4), clip("b", 4)];
        let decisions = plan_transitions(&clips, &TransitionConfig::default()).unwrap();
        let placed = layout(&clips, &decisions).unwrap();

        let err = derive_instructions(&placed, TransitionCurve::None).unwrap_err();
        assert_eq!(err.kind(), "invalid_transition");
        assert!(OpacityRamp::pair_for(TransitionCurve::None).is_none());
    }

    #[test]
    fn test_opacity_sampling() {
        assert_eq!(OpacityRamp::FADE_OUT.at(0.25), 0.75);
        assert_eq!(OpacityRamp::FADE_IN.at(2.0), 1.0);
    }
}
