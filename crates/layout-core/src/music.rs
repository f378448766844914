//! Background music bed.
//!
//! The music asset is looped from time zero until the timeline ends. Each
//! loop fades in and out on its own lane; very short timelines get one
//! constant-level ramp instead.

use serde::{Deserialize, Serialize};

use segue_timeline_model::{MusicBed, TimePoint, TimeRange, SHORT_TIMELINE_THRESHOLD};

use crate::error::BuildError;
use crate::volume::{AutomationLane, LaneAutomation, VolumeRamp};

/// One loop of the music asset placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicPiece {
    /// Where the loop plays on the timeline.
    pub time_range: TimeRange,
    /// Portion of the asset used, always starting at zero.
    pub source_range: TimeRange,
}

/// The tiled music lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicTrack {
    pub pieces: Vec<MusicPiece>,
    pub ramps: Vec<VolumeRamp>,
}

/// Tile `bed` across `[0, duration)`.
pub fn derive_music_track(duration: TimePoint, bed: &MusicBed) -> Result<MusicTrack, BuildError> {
    if !bed.asset_duration.is_positive() {
        return Err(BuildError::invalid_music_bed(format!(
            "asset duration {} must be positive",
            bed.asset_duration
        )));
    }
    if !(bed.volume.is_finite() && (0.0..=1.0).contains(&bed.volume)) {
        return Err(BuildError::invalid_music_bed(format!(
            "volume {} is outside [0, 1]",
            bed.volume
        )));
    }
    if bed.fade_duration.is_negative() {
        return Err(BuildError::invalid_music_bed(format!(
            "fade duration {} is negative",
            bed.fade_duration
        )));
    }

    let mut pieces = Vec::new();
    let mut at = TimePoint::ZERO;
    while at < duration {
        let length = exact(duration.checked_sub(at))?.min(bed.asset_duration);
        let time_range = range(at, length)?;
        pieces.push(MusicPiece {
            time_range,
            source_range: range(TimePoint::ZERO, length)?,
        });
        at = time_range.end();
    }

    let mut lane = LaneAutomation::new(AutomationLane::Music);
    let volume = bed.volume;
    if duration < SHORT_TIMELINE_THRESHOLD {
        if duration.is_positive() {
            lane.push(None, range(TimePoint::ZERO, duration)?, volume, volume)?;
        }
    } else {
        for piece in &pieces {
            let length = piece.time_range.duration();
            let half = length
                .checked_div(2)
                .ok_or_else(|| BuildError::invalid_music_bed("loop length overflows"))?;
            let fade = bed.fade_duration.min(half);
            let start = piece.time_range.start();
            let end = piece.time_range.end();

            if fade.is_positive() {
                lane.push(None, range(start, fade)?, 0.0, volume)?;
            }
            let sustain = exact(length.checked_sub(fade).and_then(|l| l.checked_sub(fade)))?;
            if sustain.is_positive() {
                lane.push(None, range(exact(start.checked_add(fade))?, sustain)?, volume, volume)?;
            }
            if fade.is_positive() {
                lane.push(None, range(exact(end.checked_sub(fade))?, fade)?, volume, 0.0)?;
            }
        }
    }

    tracing::debug!(
        pieces = pieces.len(),
        ramps = lane.len(),
        duration = %duration,
        "Tiled music bed"
    );

    Ok(MusicTrack {
        pieces,
        ramps: lane.into_ramps(),
    })
}

fn range(start: TimePoint, duration: TimePoint) -> Result<TimeRange, BuildError> {
    TimeRange::new(start, duration).map_err(|e| BuildError::invalid_music_bed(e.to_string()))
}

fn exact(time: Option<TimePoint>) -> Result<TimePoint, BuildError> {
    time.ok_or_else(|| {
        BuildError::invalid_music_bed("fade and loop timescales have no common timescale")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: i64) -> TimePoint {
        TimePoint::from_secs(s)
    }

    #[test]
    fn test_pieces_tile_the_timeline() {
        let track = derive_music_track(secs(25), &MusicBed::new(secs(10))).unwrap();
        let ranges: Vec<_> = track.pieces.iter().map(|p| p.time_range).collect();
        assert_eq!(
            ranges,
            vec![
                TimeRange::from_secs(0, 10),
                TimeRange::from_secs(10, 10),
                TimeRange::from_secs(20, 5),
            ]
        );
        assert_eq!(track.pieces[2].source_range, TimeRange::from_secs(0, 5));
    }

    #[test]
    fn test_each_loop_fades_in_and_out() {
        let track = derive_music_track(secs(20), &MusicBed::new(secs(10))).unwrap();
        let shape: Vec<_> = track
            .ramps
            .iter()
            .map(|r| (r.time_range, r.start_level, r.end_level))
            .collect();
        assert_eq!(
            shape,
            vec![
                (TimeRange::from_secs(0, 1), 0.0, 1.0),
                (TimeRange::from_secs(1, 8), 1.0, 1.0),
                (TimeRange::from_secs(9, 1), 1.0, 0.0),
                (TimeRange::from_secs(10, 1), 0.0, 1.0),
                (TimeRange::from_secs(11, 8), 1.0, 1.0),
                (TimeRange::from_secs(19, 1), 1.0, 0.0),
            ]
        );
        assert!(track.ramps.iter().all(|r| r.clip_id.is_none()));
    }

    #[test]
    fn test_fade_shrinks_for_short_loop() {
        // last loop is 1s, so each fade is half a second
        let track = derive_music_track(secs(11), &MusicBed::new(secs(10))).unwrap();
        let tail: Vec<_> = track.ramps[3..].iter().map(|r| r.time_range).collect();
        let half = TimePoint::from_millis(500);
        assert_eq!(
            tail,
            vec![
                TimeRange::new(secs(10), half).unwrap(),
                TimeRange::new(secs(10) + half, half).unwrap(),
            ]
        );
    }

    #[test]
    fn test_short_timeline_gets_single_sustain() {
        let mut bed = MusicBed::new(secs(30));
        bed.volume = 0.4;
        let track = derive_music_track(TimePoint::from_millis(2500), &bed).unwrap();
        assert_eq!(track.pieces.len(), 1);
        assert_eq!(track.ramps.len(), 1);
        assert_eq!(track.ramps[0].time_range.duration(), TimePoint::from_millis(2500));
        assert_eq!((track.ramps[0].start_level, track.ramps[0].end_level), (0.4, 0.4));
    }

    #[test]
    fn test_zero_length_asset_is_rejected() {
        let err = derive_music_track(secs(10), &MusicBed::new(TimePoint::ZERO)).unwrap_err();
        assert!(matches!(err, BuildError::InvalidMusicBed { .. }));
    }

    #[test]
    fn test_incompatible_fade_timescale_is_rejected() {
        let mut bed = MusicBed::new(TimePoint::new(196_612, 65_537).unwrap());
        bed.fade_duration = TimePoint::new(1, 65_539).unwrap();
        let err = derive_music_track(secs(4), &bed).unwrap_err();
        assert!(matches!(err, BuildError::InvalidMusicBed { .. }));
    }

    #[test]
    fn test_long_timeline_tiles_quickly() {
        let track = derive_music_track(secs(60_000), &MusicBed::new(secs(3))).unwrap();
        assert_eq!(track.pieces.len(), 20_000);
        assert_eq!(track.ramps.len(), 60_000);
        assert!(track
            .ramps
            .windows(2)
            .all(|w| w[0].time_range.end() <= w[1].time_range.start()));
    }
}
