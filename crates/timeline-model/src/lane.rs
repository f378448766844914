//! The fixed two-lane track model.
//!
//! Each media type gets exactly two composition lanes. Consecutive clips of
//! that media type alternate between them so that a clip can overlap its
//! neighbour during a transition without colliding with itself.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two composition lanes of a media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lane {
    A,
    B,
}

impl Lane {
    /// Both lanes, in index order.
    pub const ALL: [Lane; 2] = [Lane::A, Lane::B];

    /// Lane for the n-th clip of a media type: A, B, A, B, ...
    pub fn for_index(index: usize) -> Lane {
        if index % 2 == 0 {
            Lane::A
        } else {
            Lane::B
        }
    }

    /// The opposite lane.
    pub fn other(self) -> Lane {
        match self {
            Lane::A => Lane::B,
            Lane::B => Lane::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Lane::A => 0,
            Lane::B => 1,
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lane::A => write!(f, "A"),
            Lane::B => write!(f, "B"),
        }
    }
}

/// Media type carried by a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternation() {
        assert_eq!(Lane::for_index(0), Lane::A);
        assert_eq!(Lane::for_index(1), Lane::B);
        assert_eq!(Lane::for_index(2), Lane::A);
        for i in 0..10 {
            assert_ne!(Lane::for_index(i), Lane::for_index(i + 1));
            assert_eq!(Lane::for_index(i), Lane::for_index(i + 2));
        }
    }

    #[test]
    fn test_other_and_index() {
        assert_eq!(Lane::A.other(), Lane::B);
        assert_eq!(Lane::B.other().other(), Lane::B);
        assert_eq!(Lane::ALL.map(Lane::index), [0, 1]);
    }
}
