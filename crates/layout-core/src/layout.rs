//! Timeline layout: lane assignment and per-clip range splitting.
//!
//! A single left-to-right sweep places every clip at a cursor. Consecutive
//! clips overlap by exactly the accepted transition between them, so clip
//! `i`'s tail range and clip `i + 1`'s head range are the same range.
//! Audio-bearing and video-bearing clips alternate between [`Lane::A`] and
//! [`Lane::B`] independently, which keeps overlapping neighbours on
//! different lanes.

use serde::{Deserialize, Serialize};

use segue_timeline_model::{ClipDescriptor, ClipId, Lane, MediaKind, TimePoint, TimeRange};

use crate::error::BuildError;
use crate::planner::TransitionDecision;
use crate::validate::placed_durations;

/// A clip positioned on the output timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedClip {
    pub clip_id: ClipId,

    /// Position in the input clip list.
    pub index: usize,

    /// `None` when the clip carries no audio.
    pub audio_lane: Option<Lane>,

    /// `None` when the clip carries no video.
    pub video_lane: Option<Lane>,

    pub placed_at: TimePoint,
    pub placed_duration: TimePoint,

    /// Shared with the previous clip's tail; zero-length at `placed_at`
    /// when there is no incoming transition.
    pub head_transition_range: TimeRange,

    /// The part of the clip shown alone.
    pub passthrough_range: TimeRange,

    /// Shared with the next clip's head; zero-length at the pass-through
    /// end when there is no outgoing transition.
    pub tail_transition_range: TimeRange,

    /// Union of head, pass-through and tail.
    pub inserted: TimeRange,
}

impl PlacedClip {
    /// The range the clip occupies on its lanes.
    pub fn inserted_range(&self) -> TimeRange {
        self.inserted
    }

    /// Lane used for `kind`, if the clip carries it.
    pub fn lane(&self, kind: MediaKind) -> Option<Lane> {
        match kind {
            MediaKind::Audio => self.audio_lane,
            MediaKind::Video => self.video_lane,
        }
    }

    pub fn has_head_transition(&self) -> bool {
        !self.head_transition_range.is_empty()
    }

    pub fn has_tail_transition(&self) -> bool {
        !self.tail_transition_range.is_empty()
    }
}

/// Place `clips` using one decision per boundary.
///
/// Fails with [`BuildError::InvalidTransition`] when the decision list does
/// not match the clips or a decision would make a pass-through negative.
/// Nothing is clamped.
pub fn layout(
    clips: &[ClipDescriptor],
    decisions: &[TransitionDecision],
) -> Result<Vec<PlacedClip>, BuildError> {
    let boundaries = clips.len().saturating_sub(1);
    if decisions.len() != boundaries {
        return Err(BuildError::invalid_transition(format!(
            "expected {boundaries} transition decisions for {} clips, got {}",
            clips.len(),
            decisions.len()
        )));
    }
    for (i, decision) in decisions.iter().enumerate() {
        if decision.outgoing != i {
            return Err(BuildError::invalid_transition(format!(
                "decision {i} names outgoing clip {}",
                decision.outgoing
            )));
        }
        if decision.duration.is_negative() {
            return Err(BuildError::invalid_transition(format!(
                "boundary {i} has negative duration {}",
                decision.duration
            )));
        }
    }

    let durations = placed_durations(clips)?;
    let mut placed = Vec::with_capacity(clips.len());
    let mut at_time = TimePoint::ZERO;
    let mut audio_count = 0;
    let mut video_count = 0;

    for (i, (clip, &placed_duration)) in clips.iter().zip(&durations).enumerate() {
        let head = match i {
            0 => TimePoint::ZERO,
            _ => decisions[i - 1].duration,
        };
        let tail = decisions.get(i).map_or(TimePoint::ZERO, |d| d.duration);

        let passthrough = placed_duration
            .checked_sub(head)
            .and_then(|rest| rest.checked_sub(tail))
            .ok_or_else(|| {
                BuildError::invalid_transition(format!(
                    "clip {}: {placed_duration} minus a {head} head and a {tail} tail is not representable",
                    clip.id
                ))
            })?;
        if passthrough.is_negative() {
            return Err(BuildError::invalid_transition(format!(
                "clip {} ({placed_duration}) cannot hold a {head} head and a {tail} tail",
                clip.id
            )));
        }

        let head_range = span(at_time, head)?;
        let passthrough_range = span(head_range.end(), passthrough)?;
        let tail_range = span(passthrough_range.end(), tail)?;
        let inserted = head_range
            .union(&passthrough_range)
            .and_then(|r| r.union(&tail_range))
            .map_err(|e| BuildError::invalid_transition(e.to_string()))?;

        let audio_lane = clip.has_audio.then(|| {
            let lane = Lane::for_index(audio_count);
            audio_count += 1;
            lane
        });
        let video_lane = clip.has_video.then(|| {
            let lane = Lane::for_index(video_count);
            video_count += 1;
            lane
        });

        placed.push(PlacedClip {
            clip_id: clip.id.clone(),
            index: i,
            audio_lane,
            video_lane,
            placed_at: at_time,
            placed_duration,
            head_transition_range: head_range,
            passthrough_range,
            tail_transition_range: tail_range,
            inserted,
        });

        at_time = tail_range.start();
    }

    Ok(placed)
}

fn span(start: TimePoint, duration: TimePoint) -> Result<TimeRange, BuildError> {
    TimeRange::new(start, duration).map_err(|e| BuildError::invalid_transition(e.to_string()))
}

/// End of the last placed clip.
pub fn timeline_duration(placed: &[PlacedClip]) -> TimePoint {
    placed
        .iter()
        .map(|p| p.inserted_range().end())
        .max()
        .unwrap_or(TimePoint::ZERO)
}

/// Check lane alternation and that no two clips on one lane overlap.
pub fn verify_lanes(placed: &[PlacedClip]) -> Result<(), BuildError> {
    for kind in [MediaKind::Audio, MediaKind::Video] {
        let mut previous: Option<(Lane, usize)> = None;
        let mut lane_ends: [Option<TimePoint>; 2] = [None, None];

        for clip in placed {
            let Some(lane) = clip.lane(kind) else {
                continue;
            };
            if let Some((prev_lane, prev_index)) = previous {
                if prev_lane == lane {
                    return Err(BuildError::LaneAssignmentConflict {
                        kind,
                        index: clip.index,
                        message: format!(
                            "clip {} shares lane {lane} with preceding clip {prev_index}",
                            clip.clip_id
                        ),
                    });
                }
            }

            let range = clip.inserted_range();
            if let Some(end) = lane_ends[lane.index()] {
                if range.start() < end {
                    return Err(BuildError::LaneAssignmentConflict {
                        kind,
                        index: clip.index,
                        message: format!(
                            "clip {} starts at {} before lane {lane} is free at {end}",
                            clip.clip_id,
                            range.start()
                        ),
                    });
                }
            }
            lane_ends[lane.index()] = Some(range.end());
            previous = Some((lane, clip.index));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::plan_transitions;
    use segue_timeline_model::TransitionConfig;

    fn secs(s: i64) -> TimePoint {
        TimePoint::from_secs(s)
    }

    fn clip(id: &str, s: u32) -> ClipDescriptor {
        ClipDescriptor::new(id, TimeRange::from_secs(0, s))
    }

    fn place(clips: &[ClipDescriptor], transition: i64) -> Vec<PlacedClip> {
        let decisions =
            plan_transitions(clips, &TransitionConfig::dissolve(secs(transition))).unwrap();
        layout(clips, &decisions).unwrap()
    }

    #[test]
    fn test_three_clip_scenario() {
        let placed = place(&[clip("a", 10), clip("b", 8), clip("c", 12)], 2);

        assert_eq!(placed[0].passthrough_range, TimeRange::from_secs(0, 8));
        assert_eq!(placed[0].tail_transition_range, TimeRange::from_secs(8, 2));
        assert_eq!(placed[1].head_transition_range, TimeRange::from_secs(8, 2));
        assert_eq!(placed[1].passthrough_range, TimeRange::from_secs(10, 4));
        assert_eq!(placed[1].tail_transition_range, TimeRange::from_secs(14, 2));
        assert_eq!(placed[2].passthrough_range, TimeRange::from_secs(16, 10));
        assert_eq!(timeline_duration(&placed), secs(26));
    }

    #[test]
    fn test_first_and_last_have_no_outer_transitions() {
        let placed = place(&[clip("a", 5), clip("b", 5)], 1);
        assert!(!placed[0].has_head_transition());
        assert_eq!(placed[0].head_transition_range.start(), TimePoint::ZERO);
        assert!(!placed[1].has_tail_transition());
        assert_eq!(placed[1].tail_transition_range.start(), secs(9));
    }

    #[test]
    fn test_hard_cuts_butt_join() {
        let placed = place(&[clip("a", 3), clip("b", 4), clip("c", 5)], 0);
        assert_eq!(placed[1].inserted_range(), TimeRange::from_secs(3, 4));
        assert_eq!(placed[2].inserted_range(), TimeRange::from_secs(7, 5));
        assert_eq!(timeline_duration(&placed), secs(12));
    }

    #[test]
    fn test_lanes_alternate_per_medium() {
        let clips = vec![
            clip("a", 5),
            clip("b", 5).video_only(),
            clip("c", 5),
            clip("d", 5).audio_only(),
        ];
        let placed = place(&clips, 1);
        let video: Vec<_> = placed.iter().map(|p| p.video_lane).collect();
        let audio: Vec<_> = placed.iter().map(|p| p.audio_lane).collect();
        assert_eq!(video, vec![Some(Lane::A), Some(Lane::B), Some(Lane::A), None]);
        assert_eq!(audio, vec![Some(Lane::A), None, Some(Lane::B), Some(Lane::A)]);
        verify_lanes(&placed).unwrap();
    }

    #[test]
    fn test_clip_without_media_still_occupies_time() {
        let mut blank = clip("blank", 2);
        blank.has_audio = false;
        blank.has_video = false;
        let placed = place(&[clip("a", 3), blank, clip("b", 3)], 0);
        assert_eq!(placed[1].audio_lane, None);
        assert_eq!(placed[1].video_lane, None);
        assert_eq!(placed[2].placed_at, secs(5));
        assert_eq!(placed[2].video_lane, Some(Lane::B));
    }

    #[test]
    fn test_inserted_range_covers_all_parts() {
        let placed = place(&[clip("a", 10), clip("b", 8), clip("c", 12)], 2);
        assert_eq!(placed[0].inserted_range(), TimeRange::from_secs(0, 10));
        assert_eq!(placed[1].inserted_range(), TimeRange::from_secs(8, 8));
        assert_eq!(placed[2].inserted_range(), TimeRange::from_secs(14, 12));
        for p in &placed {
            let parts = p
                .head_transition_range
                .union(&p.passthrough_range)
                .and_then(|r| r.union(&p.tail_transition_range))
                .unwrap();
            assert_eq!(p.inserted, parts);
            assert_eq!(p.inserted.duration(), p.placed_duration);
        }
    }

    #[test]
    fn test_unrepresentable_passthrough_is_an_error() {
        let clips = vec![clip("a", 1), clip("b", 1), clip("c", 1)];
        let decisions = vec![
            TransitionDecision::accepted(0, TimePoint::new(1, 65_537).unwrap()),
            TransitionDecision::accepted(1, TimePoint::new(1, 65_539).unwrap()),
        ];
        let err = layout(&clips, &decisions).unwrap_err();
        assert_eq!(err.kind(), "invalid_transition");
        assert!(err.to_string().contains("not representable"));
    }

    #[test]
    fn test_decision_count_mismatch_is_invalid() {
        let err = layout(&[clip("a", 3), clip("b", 3)], &[]).unwrap_err();
        assert!(matches!(err, BuildError::InvalidTransition { .. }));
    }

    #[test]
    fn test_oversized_decision_is_not_clamped() {
        let clips = vec![clip("a", 3), clip("b", 3)];
        let decisions = vec![TransitionDecision::accepted(0, secs(4))];
        let err = layout(&clips, &decisions).unwrap_err();
        assert!(matches!(err, BuildError::InvalidTransition { .. }));
    }

    #[test]
    fn test_verify_detects_broken_alternation() {
        let mut placed = place(&[clip("a", 5), clip("b", 5)], 1);
        placed[1].video_lane = Some(Lane::A);
        let err = verify_lanes(&placed).unwrap_err();
        assert!(matches!(
            err,
            BuildError::LaneAssignmentConflict {
                kind: MediaKind::Video,
                index: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_verify_detects_same_lane_overlap() {
        // pull c back so it overlaps a on lane A
        let mut placed = place(&[clip("a", 5), clip("b", 5), clip("c", 5)], 1);
        placed[2].placed_at = secs(3);
        let err = verify_lanes(&placed).unwrap_err();
        assert!(matches!(err, BuildError::LaneAssignmentConflict { index: 2, .. }));
    }
}
