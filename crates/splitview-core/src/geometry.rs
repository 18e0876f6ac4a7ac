#![forbid(unsafe_code)]

//! Axis geometry shared by the engine and its hosts.

use serde::{Deserialize, Serialize};

/// The axis items are laid out along.
///
/// A `Horizontal` engine places items left to right and sizes widths; the
/// orthogonal dimension is the height. `Vertical` is the transpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    #[default]
    Vertical,
}

impl Orientation {
    /// The perpendicular axis.
    #[must_use]
    pub const fn orthogonal(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Whether this is the horizontal axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal)
    }
}

/// A pointer location in host coordinates.
///
/// Coordinates are signed so that drags may leave the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    /// Create a pointer position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The coordinate that moves along `orientation`.
    ///
    /// Horizontal engines read `x`, vertical engines read `y`.
    #[must_use]
    pub const fn along(self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }
}
