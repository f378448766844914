//! Render plan: a built timeline regrouped for backends.

use serde::{Deserialize, Serialize};

use segue_common::error::{SegueError, SegueResult};
use segue_layout_core::{AutomationLane, CompositingInstruction, LayerTransform, Timeline, VolumeRamp};
use segue_timeline_model::{Lane, Size, TimePoint};

/// One compositing instruction with its layer transforms joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStep {
    #[serde(flatten)]
    pub instruction: CompositingInstruction,
    pub layers: Vec<LayerTransform>,
}

/// Ramps for one audio lane in time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioLanePlan {
    pub lane: AutomationLane,
    pub ramps: Vec<VolumeRamp>,
}

/// Audio side of a plan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioPlan {
    pub lanes: Vec<AudioLanePlan>,
}

impl AudioPlan {
    pub fn lane(&self, lane: AutomationLane) -> Option<&AudioLanePlan> {
        self.lanes.iter().find(|l| l.lane == lane)
    }

    /// Gain of `lane` at `time`.
    ///
    /// Consecutive ramps form one envelope. Outside every ramp the lane is
    /// silent.
    pub fn level_at(&self, lane: AutomationLane, time: TimePoint) -> f64 {
        self.lane(lane)
            .and_then(|l| l.ramps.iter().find_map(|r| r.level_at(time)))
            .unwrap_or(0.0)
    }
}

/// Everything a backend needs to render one timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPlan {
    pub render_size: Size,
    pub duration: TimePoint,
    pub video: Vec<VideoStep>,
    pub audio: AudioPlan,
}

impl RenderPlan {
    /// Join instructions with transforms and group ramps per lane.
    pub fn from_timeline(timeline: &Timeline) -> SegueResult<Self> {
        if timeline.transforms.entries.len() != timeline.instructions.len() {
            return Err(SegueError::render(format!(
                "timeline has {} instructions but {} transform entries",
                timeline.instructions.len(),
                timeline.transforms.entries.len()
            )));
        }

        let video = timeline
            .instructions
            .iter()
            .zip(&timeline.transforms.entries)
            .map(|(instruction, entry)| {
                if entry.time_range != instruction.time_range {
                    return Err(SegueError::render(format!(
                        "transforms for {} do not line up with instruction at {}",
                        entry.time_range, instruction.time_range
                    )));
                }
                Ok(VideoStep {
                    instruction: instruction.clone(),
                    layers: entry.layers.clone(),
                })
            })
            .collect::<SegueResult<Vec<_>>>()?;

        let mut lanes: Vec<AudioLanePlan> = Lane::ALL
            .iter()
            .map(|&lane| AudioLanePlan {
                lane: AutomationLane::Clip(lane),
                ramps: timeline.audio_mix.lane(lane).to_vec(),
            })
            .collect();
        if let Some(music) = &timeline.music {
            lanes.push(AudioLanePlan {
                lane: AutomationLane::Music,
                ramps: music.ramps.clone(),
            });
        }

        Ok(Self {
            render_size: timeline.transforms.render_size,
            duration: timeline.duration,
            video,
            audio: AudioPlan { lanes },
        })
    }

    /// Video step covering `time`.
    pub fn step_at(&self, time: TimePoint) -> Option<&VideoStep> {
        self.video
            .iter()
            .find(|s| s.instruction.time_range.contains_time(time))
    }
}
