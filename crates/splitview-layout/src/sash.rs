//! Dividers between adjacent items.
//!
//! A sash carries no state of its own beyond what the last layout pass
//! computed: its position along the axis and which directions it can move.

use serde::{Deserialize, Serialize};

/// Which way a sash can currently be dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SashState {
    /// Neither direction can change any size.
    #[default]
    Disabled,
    /// Pinned at its minimum: can only move toward larger coordinates.
    Minimum,
    /// Pinned at its maximum: can only move toward smaller coordinates.
    Maximum,
    /// Free in both directions.
    Enabled,
}

/// Divider between item `i` and item `i + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sash {
    position: u32,
    state: SashState,
}

impl Sash {
    /// Offset of the divider along the axis (end of the preceding item).
    #[must_use]
    pub const fn position(&self) -> u32 {
        self.position
    }

    /// Drag affordance computed by the last layout pass.
    #[must_use]
    pub const fn state(&self) -> SashState {
        self.state
    }

    pub(crate) fn update(&mut self, position: u32, state: SashState) {
        self.position = position;
        self.state = state;
    }
}

/// Per-item bounds snapshot used to derive sash states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ItemBounds {
    pub size: u32,
    pub minimum: u32,
    pub maximum: u32,
}

impl ItemBounds {
    fn can_collapse(self) -> bool {
        self.size > self.minimum
    }

    fn can_expand(self) -> bool {
        self.maximum > self.size
    }
}

/// Compute one state per sash (`bounds.len() - 1` of them).
///
/// Moving sash `i` toward smaller coordinates needs some item at or before
/// `i` that can shrink and some item after it that can grow; moving toward
/// larger coordinates is the mirror image.
pub(crate) fn sash_states(bounds: &[ItemBounds]) -> Vec<SashState> {
    if bounds.len() < 2 {
        return Vec::new();
    }

    let collapses_down = running_any(bounds.iter().map(|b| b.can_collapse()));
    let expands_down = running_any(bounds.iter().map(|b| b.can_expand()));
    let mut collapses_up = running_any(bounds.iter().rev().map(|b| b.can_collapse()));
    collapses_up.reverse();
    let mut expands_up = running_any(bounds.iter().rev().map(|b| b.can_expand()));
    expands_up.reverse();

    (0..bounds.len() - 1)
        .map(|index| {
            let at_minimum = !(collapses_down[index] && expands_up[index + 1]);
            let at_maximum = !(expands_down[index] && collapses_up[index + 1]);
            match (at_minimum, at_maximum) {
                (true, true) => SashState::Disabled,
                (true, false) => SashState::Minimum,
                (false, true) => SashState::Maximum,
                (false, false) => SashState::Enabled,
            }
        })
        .collect()
}

/// Prefix-OR of `flags`.
fn running_any(flags: impl Iterator<Item = bool>) -> Vec<bool> {
    let mut any = false;
    flags
        .map(|flag| {
            any |= flag;
            any
        })
        .collect()
}
