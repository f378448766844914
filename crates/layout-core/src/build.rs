//! Whole-timeline build.

use serde::{Deserialize, Serialize};

use segue_timeline_model::{BuildConfig, ClipDescriptor, TimePoint};

use crate::compositing::{derive_instructions, CompositingInstruction};
use crate::error::BuildError;
use crate::layout::{layout, timeline_duration, verify_lanes, PlacedClip};
use crate::music::{derive_music_track, MusicTrack};
use crate::planner::{plan_transitions, TransitionDecision};
use crate::transform::{derive_transforms, TransformTable};
use crate::validate::{check_timescales, validate_clips};
use crate::volume::{derive_volume_automation, AudioMix};

/// Outcome of a successful build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    /// At least one clip was placed.
    Built,
    /// The clip list was empty; the timeline is empty but valid.
    EmptyInput,
}

/// A fully derived timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub status: BuildStatus,
    pub decisions: Vec<TransitionDecision>,
    pub placed: Vec<PlacedClip>,
    pub duration: TimePoint,
    pub audio_mix: AudioMix,
    pub instructions: Vec<CompositingInstruction>,
    pub transforms: TransformTable,
    #[serde(default)]
    pub music: Option<MusicTrack>,
}

impl Timeline {
    /// The timeline produced for an empty clip list.
    pub fn empty() -> Self {
        Self {
            status: BuildStatus::EmptyInput,
            decisions: vec![],
            placed: vec![],
            duration: TimePoint::ZERO,
            audio_mix: AudioMix::default(),
            instructions: vec![],
            transforms: TransformTable::default(),
            music: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status == BuildStatus::EmptyInput
    }

    /// Number of accepted transitions.
    pub fn transition_count(&self) -> usize {
        self.decisions.iter().filter(|d| d.is_accepted()).count()
    }
}

/// Build a timeline from scratch.
///
/// Runs validation, planning, layout, lane verification, volume automation,
/// compositing, transforms and the music bed in that order. The first
/// failure is returned and nothing else is produced.
pub fn build(clips: &[ClipDescriptor], config: &BuildConfig) -> Result<Timeline, BuildError> {
    if clips.is_empty() {
        tracing::info!("Clip list is empty, nothing to lay out");
        return Ok(Timeline::empty());
    }

    let durations = validate_clips(clips)?;
    let timescale = check_timescales(clips, &durations, &config.transition)?;
    tracing::debug!(timescale, "Common timescale");
    let decisions = plan_transitions(clips, &config.transition)?;
    let placed = layout(clips, &decisions)?;
    verify_lanes(&placed)?;

    let duration = timeline_duration(&placed);
    let audio_mix = derive_volume_automation(clips, &placed, &config.transition)?;
    let instructions = derive_instructions(&placed, config.transition.curve)?;
    let transforms = derive_transforms(clips, &instructions, &config.composition)?;
    let music = config
        .music
        .as_ref()
        .map(|bed| derive_music_track(duration, bed))
        .transpose()?;

    let timeline = Timeline {
        status: BuildStatus::Built,
        decisions,
        placed,
        duration,
        audio_mix,
        instructions,
        transforms,
        music,
    };

    tracing::info!(
        clips = clips.len(),
        transitions = timeline.transition_count(),
        instructions = timeline.instructions.len(),
        ramps = timeline.audio_mix.ramp_count(),
        duration = %timeline.duration,
        "Built timeline"
    );

    Ok(timeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use segue_timeline_model::{MusicBed, TimeRange, TransitionConfig};

    fn secs(s: i64) -> TimePoint {
        TimePoint::from_secs(s)
    }

    fn clip(id: &str, s: u32) -> ClipDescriptor {
        ClipDescriptor::new(id, TimeRange::from_secs(0, s))
    }

    #[test]
    fn test_empty_input_is_flagged_not_failed() {
        let timeline = build(&[], &BuildConfig::default()).unwrap();
        assert!(timeline.is_empty());
        assert_eq!(timeline.duration, TimePoint::ZERO);
        assert!(timeline.music.is_none());
    }

    #[test]
    fn test_scenario_totals() {
        let config = BuildConfig::with_transition(TransitionConfig::dissolve(secs(2)));
        let timeline = build(&[clip("a", 10), clip("b", 8), clip("c", 12)], &config).unwrap();
        assert_eq!(timeline.status, BuildStatus::Built);
        assert_eq!(timeline.duration, secs(26));
        assert_eq!(timeline.transition_count(), 2);
        assert_eq!(timeline.instructions.len(), 5);
        assert_eq!(timeline.transforms.entries.len(), 5);
    }

    #[test]
    fn test_music_bed_covers_timeline() {
        let mut config = BuildConfig::with_transition(TransitionConfig::none());
        config.music = Some(MusicBed::new(secs(4)));
        let timeline = build(&[clip("a", 5), clip("b", 5)], &config).unwrap();
        let music = timeline.music.unwrap();
        let covered: TimePoint = music.pieces.iter().map(|p| p.time_range.duration()).sum();
        assert_eq!(covered, secs(10));
    }

    #[test]
    fn test_first_failure_is_returned() {
        let err = build(&[clip("a", 5), clip("b", 5).with_volume(-0.1)], &BuildConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_clip");
    }
}
