//! Editing session with atomic rebuilds.
//!
//! Every edit is applied to a copy of the clip list, the whole timeline is
//! rebuilt from the copy, and the copy replaces the live state only when the
//! build succeeds. A rejected edit leaves the session exactly as it was.

use segue_timeline_model::{BuildConfig, ClipDescriptor, ClipId, MusicBed, TimePoint, TimeRange};

use crate::build::{build, Timeline};
use crate::error::BuildError;

/// Single-writer owner of a clip list, its configuration and the last good
/// build.
#[derive(Debug, Clone)]
pub struct EditSession {
    clips: Vec<ClipDescriptor>,
    config: BuildConfig,
    timeline: Timeline,
}

impl EditSession {
    /// Start a session, building the initial timeline.
    pub fn new(clips: Vec<ClipDescriptor>, config: BuildConfig) -> Result<Self, BuildError> {
        let timeline = build(&clips, &config)?;
        Ok(Self {
            clips,
            config,
            timeline,
        })
    }

    pub fn clips(&self) -> &[ClipDescriptor] {
        &self.clips
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Last successful build.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn into_parts(self) -> (Vec<ClipDescriptor>, BuildConfig, Timeline) {
        (self.clips, self.config, self.timeline)
    }

    pub fn push_clip(&mut self, clip: ClipDescriptor) -> Result<&Timeline, BuildError> {
        self.edit_clips(|clips| {
            clips.push(clip);
            Ok(())
        })
    }

    pub fn insert_clip(&mut self, index: usize, clip: ClipDescriptor) -> Result<&Timeline, BuildError> {
        self.edit_clips(|clips| {
            if index > clips.len() {
                return Err(BuildError::invalid_clip(
                    &clip.id,
                    format!("insert position {index} is past the end ({})", clips.len()),
                ));
            }
            clips.insert(index, clip);
            Ok(())
        })
    }

    pub fn remove_clip(&mut self, id: &ClipId) -> Result<&Timeline, BuildError> {
        self.edit_clips(|clips| {
            let index = position(clips, id)?;
            clips.remove(index);
            Ok(())
        })
    }

    /// Move a clip to `to`, counted after removal from its old position.
    pub fn move_clip(&mut self, id: &ClipId, to: usize) -> Result<&Timeline, BuildError> {
        self.edit_clips(|clips| {
            let from = position(clips, id)?;
            let clip = clips.remove(from);
            if to > clips.len() {
                return Err(BuildError::invalid_clip(
                    id,
                    format!("move target {to} is past the end ({})", clips.len()),
                ));
            }
            clips.insert(to, clip);
            Ok(())
        })
    }

    /// Set the transition into the next clip. `None` restores the default.
    pub fn set_transition_duration(
        &mut self,
        id: &ClipId,
        duration: Option<TimePoint>,
    ) -> Result<&Timeline, BuildError> {
        self.edit_clip(id, |clip| clip.requested_transition_duration = duration)
    }

    /// Choose which part of the source asset the clip uses.
    pub fn select_range(&mut self, id: &ClipId, source_range: TimeRange) -> Result<&Timeline, BuildError> {
        self.edit_clip(id, |clip| clip.source_range = source_range)
    }

    pub fn set_volume(&mut self, id: &ClipId, volume: f64) -> Result<&Timeline, BuildError> {
        self.edit_clip(id, |clip| clip.volume = volume)
    }

    pub fn set_muted(&mut self, id: &ClipId, muted: bool) -> Result<&Timeline, BuildError> {
        self.edit_clip(id, |clip| clip.is_muted = muted)
    }

    pub fn set_music(&mut self, music: Option<MusicBed>) -> Result<&Timeline, BuildError> {
        let config = BuildConfig {
            music,
            ..self.config.clone()
        };
        self.set_config(config)
    }

    pub fn set_config(&mut self, config: BuildConfig) -> Result<&Timeline, BuildError> {
        let timeline = build(&self.clips, &config)?;
        self.config = config;
        Ok(self.commit_timeline(timeline))
    }

    fn edit_clip(
        &mut self,
        id: &ClipId,
        change: impl FnOnce(&mut ClipDescriptor),
    ) -> Result<&Timeline, BuildError> {
        self.edit_clips(|clips| {
            let index = position(clips, id)?;
            change(&mut clips[index]);
            Ok(())
        })
    }

    fn edit_clips(
        &mut self,
        change: impl FnOnce(&mut Vec<ClipDescriptor>) -> Result<(), BuildError>,
    ) -> Result<&Timeline, BuildError> {
        let mut clips = self.clips.clone();
        change(&mut clips)?;
        let timeline = build(&clips, &self.config)?;
        self.clips = clips;
        Ok(self.commit_timeline(timeline))
    }

    fn commit_timeline(&mut self, timeline: Timeline) -> &Timeline {
        tracing::debug!(
            clips = self.clips.len(),
            duration = %timeline.duration,
            "Committed edit"
        );
        self.timeline = timeline;
        &self.timeline
    }
}

fn position(clips: &[ClipDescriptor], id: &ClipId) -> Result<usize, BuildError> {
    clips
        .iter()
        .position(|c| &c.id == id)
        .ok_or_else(|| BuildError::invalid_clip(id, "no such clip"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::BuildStatus;
    use segue_timeline_model::TransitionConfig;

    fn secs(s: i64) -> TimePoint {
        TimePoint::from_secs(s)
    }

    fn clip(id: &str, s: u32) -> ClipDescriptor {
        ClipDescriptor::new(id, TimeRange::from_secs(0, s))
    }

    fn session() -> EditSession {
        EditSession::new(
            vec![clip("a", 10), clip("b", 8), clip("c", 12)],
            BuildConfig::with_transition(TransitionConfig::dissolve(secs(2))),
        )
        .unwrap()
    }

    #[test]
    fn test_starts_with_built_timeline() {
        let session = session();
        assert_eq!(session.timeline().duration, secs(26));
    }

    #[test]
    fn test_empty_session() {
        let mut session = EditSession::new(vec![], BuildConfig::default()).unwrap();
        assert_eq!(session.timeline().status, BuildStatus::EmptyInput);
        let timeline = session.push_clip(clip("a", 3)).unwrap();
        assert_eq!(timeline.status, BuildStatus::Built);
    }

    #[test]
    fn test_remove_and_move() {
        let mut session = session();
        session.remove_clip(&ClipId::new("b")).unwrap();
        assert_eq!(session.timeline().duration, secs(20));

        session.move_clip(&ClipId::new("c"), 0).unwrap();
        let order: Vec<_> = session.clips().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["c", "a"]);
    }

    #[test]
    fn test_failed_edit_keeps_previous_state() {
        let mut session = session();
        let before = session.timeline().clone();

        let err = session.set_volume(&ClipId::new("b"), 3.0).unwrap_err();
        assert!(matches!(err, BuildError::InvalidClip { .. }));
        assert_eq!(session.timeline(), &before);
        assert!((session.clips()[1].volume - 1.0).abs() < 1e-9);

        assert!(session.remove_clip(&ClipId::new("zzz")).is_err());
        assert_eq!(session.clips().len(), 3);
    }

    #[test]
    fn test_transition_and_range_edits_rebuild() {
        let mut session = session();
        session
            .set_transition_duration(&ClipId::new("a"), Some(TimePoint::ZERO))
            .unwrap();
        assert_eq!(session.timeline().duration, secs(28));

        session
            .select_range(&ClipId::new("c"), TimeRange::from_secs(2, 4))
            .unwrap();
        assert_eq!(session.timeline().duration, secs(20));
    }

    #[test]
    fn test_mute_and_music() {
        let mut session = session();
        session.set_muted(&ClipId::new("a"), true).unwrap();
        let ramps: Vec<_> = session
            .timeline()
            .audio_mix
            .ramps_for(&ClipId::new("a"))
            .collect();
        assert_eq!(ramps.len(), 1);
        assert!(ramps[0].is_silent());

        session.set_music(Some(MusicBed::new(secs(30)))).unwrap();
        assert!(session.timeline().music.is_some());

        let bad = session.set_music(Some(MusicBed::new(TimePoint::ZERO)));
        assert!(bad.is_err());
        assert!(session.config().music.is_some());
    }
}
