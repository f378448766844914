//! Per-layer geometric transforms.
//!
//! Maps each clip's oriented source frame into the render size according to
//! the fill mode, and keys the result by the compositing instruction it is
//! used in so the backend can join the two by time range.

use serde::{Deserialize, Serialize};

use segue_timeline_model::{
    AffineTransform, ClipDescriptor, ClipId, CompositionConfig, FillMode, Lane, Orientation, Size,
    TimePoint, TimeRange,
};

use crate::compositing::{CompositingInstruction, InstructionMode};
use crate::error::BuildError;

/// Transform for one visible layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerTransform {
    pub clip_id: ClipId,
    pub lane: Lane,
    pub transform: AffineTransform,
}

/// Transforms in effect for one compositing instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformEntry {
    /// Same range as the instruction this entry belongs to.
    pub time_range: TimeRange,
    /// Time the transforms are set at.
    pub at: TimePoint,
    /// One layer for a pass-through, outgoing then incoming for a transition.
    pub layers: Vec<LayerTransform>,
}

/// One entry per compositing instruction, in instruction order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformTable {
    pub render_size: Size,
    pub entries: Vec<TransformEntry>,
}

impl TransformTable {
    /// Entry whose range equals `time_range`.
    pub fn entry_for(&self, time_range: &TimeRange) -> Option<&TransformEntry> {
        self.entries.iter().find(|e| &e.time_range == time_range)
    }

    /// Transform of `clip_id` during the instruction covering `time_range`.
    pub fn transform_for(&self, clip_id: &ClipId, time_range: &TimeRange) -> Option<&AffineTransform> {
        self.entry_for(time_range)?
            .layers
            .iter()
            .find(|l| &l.clip_id == clip_id)
            .map(|l| &l.transform)
    }
}

/// Natural size as displayed, with width and height exchanged for portrait
/// orientations.
pub fn oriented_size(natural_size: Size, orientation: Orientation) -> Size {
    if orientation.is_portrait() {
        natural_size.swapped()
    } else {
        natural_size
    }
}

/// The configured render size, or the oriented size of the first video
/// clip, or the default frame size when there is no video at all.
pub fn render_size(clips: &[ClipDescriptor], composition: &CompositionConfig) -> Size {
    if let Some(size) = composition.preferred_render_size {
        return size;
    }
    clips
        .iter()
        .find(|c| c.has_video)
        .map(|c| oriented_size(c.natural_size, c.orientation))
        .unwrap_or_default()
}

/// Transform that rotates a source frame upright, scales it for the fill
/// mode and centres it in `render_size`.
///
/// Built as scale, then translate, then rotate; each step is prepended, so a
/// point is rotated first and the translation is in pre-scale units.
pub fn layer_transform(
    orientation: Orientation,
    render_size: Size,
    natural_size: Size,
    fill_mode: FillMode,
) -> AffineTransform {
    let oriented = oriented_size(natural_size, orientation);
    let ratio_x = render_size.width / oriented.width;
    let ratio_y = render_size.height / oriented.height;
    let (scale_x, scale_y) = match fill_mode {
        FillMode::Fill => (ratio_x, ratio_y),
        FillMode::AspectFit => {
            let s = ratio_x.min(ratio_y);
            (s, s)
        }
        FillMode::AspectFill => {
            let s = ratio_x.max(ratio_y);
            (s, s)
        }
    };

    // after rotation the frame sits in a quadrant other than the first
    let (rotate_x, rotate_y, degrees) = match orientation {
        Orientation::Right => (0.0, 0.0, 0.0),
        Orientation::Up => (oriented.width, 0.0, 90.0),
        Orientation::Down => (0.0, oriented.height, -90.0),
        Orientation::Left => (oriented.width, oriented.height, 180.0),
    };
    let center_x = (render_size.width / scale_x - oriented.width) / 2.0;
    let center_y = (render_size.height / scale_y - oriented.height) / 2.0;

    AffineTransform::IDENTITY
        .scaled_by(scale_x, scale_y)
        .translated_by(center_x + rotate_x, center_y + rotate_y)
        .rotated_by(f64::to_radians(degrees))
}

/// Build the transform table for `instructions`.
pub fn derive_transforms(
    clips: &[ClipDescriptor],
    instructions: &[CompositingInstruction],
    composition: &CompositionConfig,
) -> Result<TransformTable, BuildError> {
    let size = render_size(clips, composition);
    if size.is_zero() || !size.width.is_finite() || !size.height.is_finite() {
        return Err(BuildError::InvalidComposition {
            message: format!("render size {size} is not usable"),
        });
    }

    let layer = |clip_id: &ClipId, lane: Lane| -> Result<LayerTransform, BuildError> {
        let clip = clips.iter().find(|c| &c.id == clip_id).ok_or_else(|| {
            BuildError::InvalidComposition {
                message: format!("instruction names unknown clip {clip_id}"),
            }
        })?;
        Ok(LayerTransform {
            clip_id: clip_id.clone(),
            lane,
            transform: layer_transform(
                clip.orientation,
                size,
                clip.natural_size,
                composition.fill_mode,
            ),
        })
    };

    let entries = instructions
        .iter()
        .map(|instruction| -> Result<TransformEntry, BuildError> {
            let layers = match &instruction.mode {
                InstructionMode::Passthrough { lane, clip_id } => vec![layer(clip_id, *lane)?],
                InstructionMode::Transition {
                    from_lane,
                    to_lane,
                    from_clip,
                    to_clip,
                    ..
                } => vec![layer(from_clip, *from_lane)?, layer(to_clip, *to_lane)?],
            };
            Ok(TransformEntry {
                time_range: instruction.time_range,
                at: instruction.time_range.start(),
                layers,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TransformTable {
        render_size: size,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_maps(t: &AffineTransform, from: (f64, f64), to: (f64, f64)) {
        let (x, y) = t.apply(from.0, from.1);
        assert!(
            (x - to.0).abs() < 1e-6 && (y - to.1).abs() < 1e-6,
            "{from:?} mapped to ({x}, {y}), expected {to:?}"
        );
    }

    #[test]
    fn test_landscape_same_size_is_identity() {
        let size = Size::new(1920.0, 1080.0);
        let t = layer_transform(Orientation::Right, size, size, FillMode::AspectFill);
        assert_maps(&t, (0.0, 0.0), (0.0, 0.0));
        assert_maps(&t, (1920.0, 1080.0), (1920.0, 1080.0));
    }

    #[test]
    fn test_aspect_fit_letterboxes() {
        let render = Size::new(1920.0, 1080.0);
        let natural = Size::new(1080.0, 1080.0);
        let t = layer_transform(Orientation::Right, render, natural, FillMode::AspectFit);
        assert_maps(&t, (0.0, 0.0), (420.0, 0.0));
        assert_maps(&t, (1080.0, 1080.0), (1500.0, 1080.0));
    }

    #[test]
    fn test_aspect_fill_crops() {
        let render = Size::new(1080.0, 1080.0);
        let natural = Size::new(1920.0, 1080.0);
        let t = layer_transform(Orientation::Right, render, natural, FillMode::AspectFill);
        assert_maps(&t, (0.0, 0.0), (-420.0, 0.0));
        assert_maps(&t, (1920.0, 1080.0), (1500.0, 1080.0));
    }

    #[test]
    fn test_fill_stretches() {
        let render = Size::new(1000.0, 1000.0);
        let natural = Size::new(500.0, 250.0);
        let t = layer_transform(Orientation::Right, render, natural, FillMode::Fill);
        assert_maps(&t, (500.0, 250.0), (1000.0, 1000.0));
    }

    #[test]
    fn test_portrait_is_rotated_into_frame() {
        // a 1920x1080 portrait recording shown in a 1080x1920 frame
        let natural = Size::new(1920.0, 1080.0);
        let render = Size::new(1080.0, 1920.0);
        let t = layer_transform(Orientation::Up, render, natural, FillMode::AspectFill);
        assert_maps(&t, (0.0, 0.0), (1080.0, 0.0));
        assert_maps(&t, (1920.0, 1080.0), (0.0, 1920.0));

        let t = layer_transform(Orientation::Down, render, natural, FillMode::AspectFill);
        assert_maps(&t, (0.0, 0.0), (0.0, 1920.0));
        assert_maps(&t, (1920.0, 1080.0), (1080.0, 0.0));
    }

    #[test]
    fn test_upside_down_landscape() {
        let size = Size::new(1920.0, 1080.0);
        let t = layer_transform(Orientation::Left, size, size, FillMode::AspectFit);
        assert_maps(&t, (0.0, 0.0), (1920.0, 1080.0));
        assert_maps(&t, (1920.0, 1080.0), (0.0, 0.0));
    }

    #[test]
    fn test_render_size_follows_first_video_clip() {
        let clips = vec![
            ClipDescriptor::new("music", TimeRange::from_secs(0, 2)).audio_only(),
            ClipDescriptor::new("phone", TimeRange::from_secs(0, 2))
                .with_geometry(Size::new(1280.0, 720.0), Orientation::Up),
        ];
        let size = render_size(&clips, &CompositionConfig::default());
        assert_eq!(size, Size::new(720.0, 1280.0));

        let fixed = CompositionConfig {
            preferred_render_size: Some(Size::new(640.0, 480.0)),
            ..CompositionConfig::default()
        };
        assert_eq!(render_size(&clips, &fixed), Size::new(640.0, 480.0));
    }
}
