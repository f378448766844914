//! Frame compositor: samples a render plan at output frame times.
//!
//! Backends that draw frame by frame use this to learn which lanes are
//! visible, at what opacity, and with which transform.

use serde::{Deserialize, Serialize};

use segue_layout_core::InstructionMode;
use segue_timeline_model::{AffineTransform, ClipId, Lane, TimePoint};

use crate::plan::RenderPlan;

/// One visible layer in a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSample {
    pub lane: Lane,
    pub clip_id: ClipId,
    pub opacity: f64,
    pub transform: AffineTransform,
}

/// A single frame's composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameComposition {
    /// Frame number.
    pub frame_index: u64,

    /// Exact frame time.
    pub time: TimePoint,

    /// Visible layers, bottom first. Empty for frames with no video.
    pub layers: Vec<LayerSample>,
}

/// Number of frames needed to cover `duration` at `fps`.
pub fn frame_count(duration: TimePoint, fps: u32) -> u64 {
    if fps == 0 || !duration.is_positive() {
        return 0;
    }
    (duration.as_secs_f64() * fps as f64).ceil() as u64
}

/// Compute the composition for each frame of the plan.
pub fn compute_compositions(plan: &RenderPlan, fps: u32) -> Vec<FrameComposition> {
    let total_frames = frame_count(plan.duration, fps);
    (0..total_frames)
        .map_while(|frame| compose_frame(plan, frame, fps))
        .collect()
}

/// Composition of a single frame. `None` when the frame time cannot be
/// represented at `fps`.
pub fn compose_frame(plan: &RenderPlan, frame_index: u64, fps: u32) -> Option<FrameComposition> {
    let value = i64::try_from(frame_index).ok()?;
    let time = TimePoint::new(value, fps).ok()?;
    Some(FrameComposition {
        frame_index,
        time,
        layers: sample_layers(plan, time),
    })
}

fn sample_layers(plan: &RenderPlan, time: TimePoint) -> Vec<LayerSample> {
    let Some(step) = plan.step_at(time) else {
        return vec![];
    };
    let transform_of = |clip_id: &ClipId| {
        step.layers
            .iter()
            .find(|l| &l.clip_id == clip_id)
            .map(|l| l.transform)
            .unwrap_or_default()
    };

    match &step.instruction.mode {
        InstructionMode::Passthrough { lane, clip_id } => vec![LayerSample {
            lane: *lane,
            clip_id: clip_id.clone(),
            opacity: 1.0,
            transform: transform_of(clip_id),
        }],
        InstructionMode::Transition {
            from_lane,
            to_lane,
            from_clip,
            to_clip,
            from_opacity,
            to_opacity,
        } => {
            let range = step.instruction.time_range;
            let elapsed = time.as_secs_f64() - range.start().as_secs_f64();
            let progress = elapsed / range.duration().as_secs_f64();
            // the incoming layer sits underneath the outgoing one
            vec![
                LayerSample {
                    lane: *to_lane,
                    clip_id: to_clip.clone(),
                    opacity: to_opacity.at(progress),
                    transform: transform_of(to_clip),
                },
                LayerSample {
                    lane: *from_lane,
                    clip_id: from_clip.clone(),
                    opacity: from_opacity.at(progress),
                    transform: transform_of(from_clip),
                },
            ]
        }
    }
}
