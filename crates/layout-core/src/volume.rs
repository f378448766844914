//! Volume automation.
//!
//! Every audio-bearing clip gets ramps on its audio lane: a fade-in over its
//! head transition, a sustain over its pass-through, and a fade-out over its
//! tail transition. Silenced clips get a single `0 → 0` ramp over their whole
//! inserted range. Ramps on one lane never overlap; an overlapping
//! submission fails the build instead of being dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

use segue_timeline_model::{ClipDescriptor, ClipId, Lane, TimePoint, TimeRange, TransitionConfig};

use crate::error::BuildError;
use crate::layout::PlacedClip;

/// Audio lane a ramp belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationLane {
    /// One of the two clip audio lanes.
    Clip(Lane),
    /// The background music lane.
    Music,
}

impl fmt::Display for AutomationLane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomationLane::Clip(lane) => write!(f, "audio lane {lane}"),
            AutomationLane::Music => write!(f, "music lane"),
        }
    }
}

/// Linear gain change over a time range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeRamp {
    /// Clip the ramp belongs to; `None` for music.
    pub clip_id: Option<ClipId>,
    pub lane: AutomationLane,
    pub time_range: TimeRange,
    pub start_level: f64,
    pub end_level: f64,
}

impl VolumeRamp {
    /// Level at `time`, interpolated linearly. `None` outside the range.
    pub fn level_at(&self, time: TimePoint) -> Option<f64> {
        if !self.time_range.contains_time(time) {
            return None;
        }
        let elapsed = time.as_secs_f64() - self.time_range.start().as_secs_f64();
        let progress = elapsed / self.time_range.duration().as_secs_f64();
        Some(self.start_level + (self.end_level - self.start_level) * progress)
    }

    pub fn is_silent(&self) -> bool {
        self.start_level == 0.0 && self.end_level == 0.0
    }
}

/// Ramps accumulated for one lane in start order, checked for overlap on
/// every push.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneAutomation {
    lane: AutomationLane,
    ramps: Vec<VolumeRamp>,
}

impl LaneAutomation {
    pub fn new(lane: AutomationLane) -> Self {
        Self {
            lane,
            ramps: Vec::new(),
        }
    }

    pub fn lane(&self) -> AutomationLane {
        self.lane
    }

    /// Add a ramp on this lane.
    ///
    /// Fails with [`BuildError::OverlappingAutomation`] if the ramp shares a
    /// positive-length span with a ramp already on the lane. Ramps that only
    /// touch at a boundary are fine.
    ///
    /// Positive ramps on the lane are disjoint and sorted, so only the last
    /// one starting before the incoming end can overlap it. Pushing in time
    /// order appends.
    pub fn push(
        &mut self,
        clip_id: Option<ClipId>,
        time_range: TimeRange,
        start_level: f64,
        end_level: f64,
    ) -> Result<(), BuildError> {
        let before_end = self
            .ramps
            .partition_point(|r| r.time_range.start() < time_range.end());
        let nearest = self.ramps[..before_end]
            .iter()
            .rev()
            .find(|r| !r.time_range.is_empty());
        if let Some(existing) = nearest.filter(|r| r.time_range.overlaps(&time_range)) {
            return Err(BuildError::OverlappingAutomation {
                lane: self.lane,
                existing: existing.time_range,
                incoming: time_range,
            });
        }

        let at = self
            .ramps
            .partition_point(|r| r.time_range.start() <= time_range.start());
        self.ramps.insert(at, VolumeRamp {
            clip_id,
            lane: self.lane,
            time_range,
            start_level,
            end_level,
        });
        Ok(())
    }

    pub fn ramps(&self) -> &[VolumeRamp] {
        &self.ramps
    }

    pub fn len(&self) -> usize {
        self.ramps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ramps.is_empty()
    }

    pub fn into_ramps(self) -> Vec<VolumeRamp> {
        self.ramps
    }
}

/// Clip ramps grouped per audio lane, each in time order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioMix {
    pub lane_a: Vec<VolumeRamp>,
    pub lane_b: Vec<VolumeRamp>,
}

impl AudioMix {
    pub fn lane(&self, lane: Lane) -> &[VolumeRamp] {
        match lane {
            Lane::A => &self.lane_a,
            Lane::B => &self.lane_b,
        }
    }

    pub fn ramp_count(&self) -> usize {
        self.lane_a.len() + self.lane_b.len()
    }

    /// All ramps belonging to one clip.
    pub fn ramps_for(&self, clip_id: &ClipId) -> impl Iterator<Item = &VolumeRamp> + '_ {
        let clip_id = clip_id.clone();
        self.lane_a
            .iter()
            .chain(&self.lane_b)
            .filter(move |r| r.clip_id.as_ref() == Some(&clip_id))
    }
}

/// Derive ramps for every audio-bearing placed clip.
///
/// `clips` and `placed` must be the input and output of the same layout.
pub fn derive_volume_automation(
    clips: &[ClipDescriptor],
    placed: &[PlacedClip],
    config: &TransitionConfig,
) -> Result<AudioMix, BuildError> {
    let mut lanes = [
        LaneAutomation::new(AutomationLane::Clip(Lane::A)),
        LaneAutomation::new(AutomationLane::Clip(Lane::B)),
    ];

    for (clip, placement) in clips.iter().zip(placed) {
        let Some(lane) = placement.audio_lane else {
            continue;
        };
        let automation = &mut lanes[lane.index()];
        let id = Some(clip.id.clone());

        if clip.is_effectively_muted(config.mute_on_speed_change) {
            automation.push(id, placement.inserted_range(), 0.0, 0.0)?;
            continue;
        }

        let volume = clip.volume;
        if placement.has_head_transition() {
            automation.push(id.clone(), placement.head_transition_range, 0.0, volume)?;
        }
        automation.push(id.clone(), placement.passthrough_range, volume, volume)?;
        if placement.has_tail_transition() {
            automation.push(id, placement.tail_transition_range, volume, 0.0)?;
        }
    }

    let [lane_a, lane_b] = lanes;
    Ok(AudioMix {
        lane_a: lane_a.into_ramps(),
        lane_b: lane_b.into_ramps(),
    })
}
