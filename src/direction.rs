//! Scan directions along which directional polynomials are evaluated.
use serde::{Deserialize, Serialize};

/// One of the four 3×3 scan directions (image coordinates, y down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Left ↔ right; responds to vertical edges.
    Horizontal,
    /// Up ↔ down; responds to horizontal edges.
    Vertical,
    /// Top-left ↔ bottom-right.
    DiagMain,
    /// Top-right ↔ bottom-left.
    DiagAnti,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagMain,
        Direction::DiagAnti,
    ];

    /// Unit step `(dx, dy)` pointing "forward" along the direction.
    #[inline]
    pub fn step(self) -> (i32, i32) {
        match self {
            Direction::Horizontal => (1, 0),
            Direction::Vertical => (0, 1),
            Direction::DiagMain => (1, 1),
            Direction::DiagAnti => (-1, 1),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Horizontal => "horizontal",
            Direction::Vertical => "vertical",
            Direction::DiagMain => "diag-main",
            Direction::DiagAnti => "diag-anti",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
