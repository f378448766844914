//! Transition planning.
//!
//! Decides, for every boundary between clip `i` and clip `i + 1`, whether a
//! transition window exists and how long it is.
//!
//! # Rules
//!
//! 1. A disabled curve means hard cuts everywhere.
//! 2. The candidate is the outgoing clip's own request, or the configured
//!    default, scaled by the outgoing clip's speed when the policy says so.
//! 3. The outgoing clip can spend what its head transition left over; the
//!    incoming clip can spend its whole placed duration.
//! 4. A candidate that reaches either span is rejected outright. Candidates
//!    are never shortened to fit.

use serde::{Deserialize, Serialize};

use segue_timeline_model::{ClipDescriptor, ScalePolicy, TimePoint, TransitionConfig, TransitionCurve};

use crate::error::BuildError;
use crate::validate::placed_durations;

/// Why a boundary ended up without a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionRejection {
    /// The configured curve is `none`.
    CurveDisabled,
    /// The candidate duration was zero.
    NotRequested,
    /// The outgoing clip has too little time left after its head transition.
    ExceedsOutgoing,
    /// The incoming clip is too short.
    ExceedsIncoming,
}

/// Outcome for one boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionDecision {
    /// Index of the outgoing clip; the incoming clip is `outgoing + 1`.
    pub outgoing: usize,

    /// Candidate duration that was considered (after speed scaling).
    pub requested: TimePoint,

    /// Accepted duration; zero when there is no transition.
    pub duration: TimePoint,

    /// Set whenever `duration` is zero.
    pub rejection: Option<TransitionRejection>,
}

impl TransitionDecision {
    pub fn accepted(outgoing: usize, duration: TimePoint) -> Self {
        Self {
            outgoing,
            requested: duration,
            duration,
            rejection: None,
        }
    }

    pub fn rejected(outgoing: usize, requested: TimePoint, why: TransitionRejection) -> Self {
        Self {
            outgoing,
            requested,
            duration: TimePoint::ZERO,
            rejection: Some(why),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.duration.is_positive()
    }

    pub fn incoming(&self) -> usize {
        self.outgoing + 1
    }
}

/// Plan every boundary of `clips`. Returns `clips.len() - 1` decisions (none
/// for zero or one clip).
pub fn plan_transitions(
    clips: &[ClipDescriptor],
    config: &TransitionConfig,
) -> Result<Vec<TransitionDecision>, BuildError> {
    let durations = placed_durations(clips)?;
    let mut decisions = Vec::with_capacity(clips.len().saturating_sub(1));
    let mut head = TimePoint::ZERO;

    for (i, pair) in clips.windows(2).enumerate() {
        let outgoing_span = durations[i].checked_sub(head).ok_or_else(|| {
            BuildError::invalid_transition(format!(
                "boundary {i}: {} minus its head {head} is not representable",
                durations[i]
            ))
        })?;
        let decision = decide(i, &pair[0], outgoing_span, durations[i + 1], config)?;
        tracing::debug!(
            boundary = i,
            outgoing = %pair[0].id,
            incoming = %pair[1].id,
            requested = %decision.requested,
            duration = %decision.duration,
            rejection = ?decision.rejection,
            "Planned transition"
        );
        head = decision.duration;
        decisions.push(decision);
    }

    Ok(decisions)
}

fn decide(
    index: usize,
    outgoing: &ClipDescriptor,
    outgoing_span: TimePoint,
    incoming_span: TimePoint,
    config: &TransitionConfig,
) -> Result<TransitionDecision, BuildError> {
    let base = outgoing
        .requested_transition_duration
        .unwrap_or(config.default_duration);
    if base.is_negative() {
        return Err(BuildError::invalid_clip(
            &outgoing.id,
            format!("transition duration {base} is negative"),
        ));
    }
    let candidate = match config.scale_policy {
        ScalePolicy::Fixed => base,
        ScalePolicy::ScaleWithSpeed => base.checked_scale(outgoing.scale_factor).ok_or_else(|| {
            BuildError::invalid_clip(&outgoing.id, "transition duration cannot be scaled")
        })?,
    };

    let decision = if config.curve == TransitionCurve::None {
        TransitionDecision::rejected(index, candidate, TransitionRejection::CurveDisabled)
    } else if candidate.is_zero() {
        TransitionDecision::rejected(index, candidate, TransitionRejection::NotRequested)
    } else if outgoing_span <= candidate {
        TransitionDecision::rejected(index, candidate, TransitionRejection::ExceedsOutgoing)
    } else if incoming_span <= candidate {
        TransitionDecision::rejected(index, candidate, TransitionRejection::ExceedsIncoming)
    } else {
        TransitionDecision::accepted(index, candidate)
    };
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use segue_timeline_model::TimeRange;

    fn clip(id: &str, secs: u32) -> ClipDescriptor {
        ClipDescriptor::new(id, TimeRange::from_secs(0, secs))
    }

    fn secs(s: i64) -> TimePoint {
        TimePoint::from_secs(s)
    }

    #[test]
    fn test_default_duration_accepted_everywhere() {
        let clips = vec![clip("a", 10), clip("b", 8), clip("c", 12)];
        let decisions = plan_transitions(&clips, &TransitionConfig::dissolve(secs(2))).unwrap();
        assert_eq!(decisions.len(), 2);
        assert!(decisions.iter().all(|d| d.duration == secs(2) && d.rejection.is_none()));
        assert_eq!(decisions[1].incoming(), 2);
    }

    #[test]
    fn test_no_boundaries_for_single_clip() {
        let decisions = plan_transitions(&[clip("a", 3)], &TransitionConfig::default()).unwrap();
        assert!(decisions.is_empty());
        assert!(plan_transitions(&[], &TransitionConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_request_longer_than_outgoing_is_rejected() {
        let clips = vec![clip("a", 3).with_transition(secs(5)), clip("b", 10)];
        let decisions = plan_transitions(&clips, &TransitionConfig::default()).unwrap();
        assert_eq!(decisions[0].duration, TimePoint::ZERO);
        assert_eq!(decisions[0].requested, secs(5));
        assert_eq!(decisions[0].rejection, Some(TransitionRejection::ExceedsOutgoing));
    }

    #[test]
    fn test_request_equal_to_span_is_rejected() {
        let clips = vec![clip("a", 10), clip("b", 2)];
        let decisions = plan_transitions(&clips, &TransitionConfig::dissolve(secs(2))).unwrap();
        assert_eq!(decisions[0].rejection, Some(TransitionRejection::ExceedsIncoming));
        assert!(!decisions[0].is_accepted());
    }

    #[test]
    fn test_head_transition_reduces_outgoing_span() {
        // b is 4s; 2s of it is already spent on the head transition from a,
        // so a 2s tail would leave no pass-through.
        let clips = vec![clip("a", 10), clip("b", 4), clip("c", 10)];
        let decisions = plan_transitions(&clips, &TransitionConfig::dissolve(secs(2))).unwrap();
        assert!(decisions[0].is_accepted());
        assert_eq!(decisions[1].rejection, Some(TransitionRejection::ExceedsOutgoing));
    }

    #[test]
    fn test_zero_request_is_a_hard_cut() {
        let clips = vec![clip("a", 10).with_transition(TimePoint::ZERO), clip("b", 10)];
        let decisions = plan_transitions(&clips, &TransitionConfig::default()).unwrap();
        assert_eq!(decisions[0].rejection, Some(TransitionRejection::NotRequested));
    }

    #[test]
    fn test_disabled_curve_rejects_everything() {
        let mut config = TransitionConfig::dissolve(secs(1));
        config.curve = TransitionCurve::None;
        let decisions = plan_transitions(&[clip("a", 10), clip("b", 10)], &config).unwrap();
        assert_eq!(decisions[0].rejection, Some(TransitionRejection::CurveDisabled));
    }

    #[test]
    fn test_scale_with_speed_policy() {
        let clips = vec![clip("a", 20).with_scale_factor(0.5), clip("b", 10)];
        let mut config = TransitionConfig::dissolve(secs(2));
        config.scale_policy = ScalePolicy::ScaleWithSpeed;
        let decisions = plan_transitions(&clips, &config).unwrap();
        assert_eq!(decisions[0].duration, secs(1));

        config.scale_policy = ScalePolicy::Fixed;
        let decisions = plan_transitions(&clips, &config).unwrap();
        assert_eq!(decisions[0].duration, secs(2));
    }

    #[test]
    fn test_invalid_clip_is_reported() {
        let clips = vec![clip("a", 10).with_scale_factor(-1.0), clip("b", 10)];
        let err = plan_transitions(&clips, &TransitionConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::InvalidClip { .. }));
    }
}
