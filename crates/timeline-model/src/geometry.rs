//! Frame geometry: sizes, orientations, fill modes, and affine transforms.
//!
//! These types describe how an oriented source frame is mapped into the
//! output render size. The engine only computes the mapping; applying it to
//! pixels is the rendering backend's job.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::transition::ParseValueError;

/// A frame size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width and height exchanged.
    pub fn swapped(&self) -> Size {
        Size {
            width: self.height,
            height: self.width,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Default for Size {
    fn default() -> Self {
        Size::new(1920.0, 1080.0)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Orientation of a source video track, derived from its preferred transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Portrait.
    Up,
    /// Portrait, upside down.
    Down,
    /// Landscape, rotated 180 degrees.
    Left,
    /// Landscape (identity transform).
    #[default]
    Right,
}

impl Orientation {
    /// Classify the rotation part `(a, b, c, d)` of a track's preferred
    /// transform.
    pub fn from_preferred_transform(a: f64, b: f64, c: f64, d: f64) -> Orientation {
        if a == 0.0 && b == 1.0 && c == -1.0 && d == 0.0 {
            Orientation::Up
        } else if a == 0.0 && b == -1.0 && c == 1.0 && d == 0.0 {
            Orientation::Down
        } else if a == 1.0 && b == 0.0 && c == 0.0 && d == 1.0 {
            Orientation::Right
        } else {
            Orientation::Left
        }
    }

    /// Whether frames must be rotated by 90 degrees to display upright.
    pub fn is_portrait(self) -> bool {
        matches!(self, Orientation::Up | Orientation::Down)
    }
}

/// How a source frame is fitted into the render size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Stretch independently on both axes.
    Fill,
    /// Scale uniformly so the whole frame is visible.
    AspectFit,
    /// Scale uniformly so the render area is covered.
    #[default]
    AspectFill,
}

impl FromStr for FillMode {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "fill" => Ok(FillMode::Fill),
            "aspect_fit" | "fit" => Ok(FillMode::AspectFit),
            "aspect_fill" => Ok(FillMode::AspectFill),
            _ => Err(ParseValueError::new("fill mode", s)),
        }
    }
}

/// A 2D affine transform `[a b 0; c d 0; tx ty 1]` (row-vector convention).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Prepend a scale: the result scales first, then applies `self`.
    pub fn scaled_by(&self, sx: f64, sy: f64) -> AffineTransform {
        AffineTransform {
            a: self.a * sx,
            b: self.b * sx,
            c: self.c * sy,
            d: self.d * sy,
            tx: self.tx,
            ty: self.ty,
        }
    }

    /// Prepend a translation.
    pub fn translated_by(&self, tx: f64, ty: f64) -> AffineTransform {
        AffineTransform {
            tx: self.a * tx + self.c * ty + self.tx,
            ty: self.b * tx + self.d * ty + self.ty,
            ..*self
        }
    }

    /// Prepend a rotation by `radians`.
    pub fn rotated_by(&self, radians: f64) -> AffineTransform {
        let (sin, cos) = radians.sin_cos();
        AffineTransform {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            tx: self.tx,
            ty: self.ty,
        }
    }

    /// Map a point through the transform.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
