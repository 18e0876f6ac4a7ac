//! Divider drag lifecycle.
//!
//! The machine turns raw pointer events into deterministic transitions. It
//! knows nothing about item sizes: the engine reacts to the emitted effects
//! (snapshot a baseline on `Started`, resize on `Moved`, settle on `Ended`
//! or `Canceled`).
//!
//! ```text
//! Idle -> Dragging -> Idle
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use splitview_core::geometry::{Orientation, PointerPosition};

/// Raw pointer input addressed to the divider layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SashPointerEvent {
    Down {
        sash_index: usize,
        pointer_id: u32,
        position: PointerPosition,
    },
    Move {
        pointer_id: u32,
        position: PointerPosition,
    },
    Up {
        pointer_id: u32,
        position: PointerPosition,
    },
    /// Pointer capture lost. `None` cancels whatever pointer is dragging.
    Cancel { pointer_id: Option<u32> },
}

impl SashPointerEvent {
    fn pointer_id(&self) -> Option<u32> {
        match *self {
            Self::Down { pointer_id, .. }
            | Self::Move { pointer_id, .. }
            | Self::Up { pointer_id, .. } => Some(pointer_id),
            Self::Cancel { pointer_id } => pointer_id,
        }
    }
}

/// Drag lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SashDragState {
    #[default]
    Idle,
    Dragging {
        sash_index: usize,
        pointer_id: u32,
        /// Axis coordinate at pointer-down.
        start: i32,
        /// Axis coordinate of the last applied move.
        current: i32,
    },
}

/// Why an event produced no state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SashDragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    PointerMismatch,
    BelowHysteresis,
}

/// Effect emitted by one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum SashDragEffect {
    Started {
        sash_index: usize,
        pointer_id: u32,
        start: i32,
    },
    Moved {
        sash_index: usize,
        /// Change since the previous applied move.
        delta: i32,
        /// Change since pointer-down; the engine resizes by this.
        total_delta: i32,
    },
    Ended {
        sash_index: usize,
        total_delta: i32,
    },
    Canceled {
        sash_index: usize,
        total_delta: i32,
    },
    Noop {
        reason: SashDragNoopReason,
    },
}

/// One state-machine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SashDragTransition {
    pub transition_id: u64,
    pub from: SashDragState,
    pub to: SashDragState,
    pub effect: SashDragEffect,
}

/// Runtime lifecycle machine for divider drags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SashDragMachine {
    state: SashDragState,
    update_hysteresis: u16,
    transition_counter: u64,
}

impl SashDragMachine {
    /// Machine that skips moves shorter than `update_hysteresis` along the
    /// axis. `0` applies every move.
    #[must_use]
    pub const fn new(update_hysteresis: u16) -> Self {
        Self {
            state: SashDragState::Idle,
            update_hysteresis,
            transition_counter: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SashDragState {
        self.state
    }

    #[must_use]
    pub const fn update_hysteresis(&self) -> u16 {
        self.update_hysteresis
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, SashDragState::Dragging { .. })
    }

    /// Sash being dragged, if any.
    #[must_use]
    pub const fn active_sash(&self) -> Option<usize> {
        match self.state {
            SashDragState::Dragging { sash_index, .. } => Some(sash_index),
            SashDragState::Idle => None,
        }
    }

    /// Reset to `Idle`, returning a `Canceled` transition if a drag was live.
    pub fn force_cancel(&mut self) -> Option<SashDragTransition> {
        let from = self.state;
        let SashDragState::Dragging {
            sash_index,
            start,
            current,
            ..
        } = from
        else {
            return None;
        };
        self.state = SashDragState::Idle;
        Some(self.record(
            from,
            SashDragEffect::Canceled {
                sash_index,
                total_delta: current.saturating_sub(start),
            },
        ))
    }

    /// Apply one pointer event.
    ///
    /// `orientation` selects which pointer coordinate is read.
    pub fn apply_event(
        &mut self,
        event: &SashPointerEvent,
        orientation: Orientation,
    ) -> Result<SashDragTransition, SashDragError> {
        if event.pointer_id() == Some(0) {
            return Err(SashDragError::ZeroPointerId);
        }

        let from = self.state;
        let effect = match (self.state, *event) {
            (
                SashDragState::Idle,
                SashPointerEvent::Down {
                    sash_index,
                    pointer_id,
                    position,
                },
            ) => {
                let start = position.along(orientation);
                self.state = SashDragState::Dragging {
                    sash_index,
                    pointer_id,
                    start,
                    current: start,
                };
                SashDragEffect::Started {
                    sash_index,
                    pointer_id,
                    start,
                }
            }
            (SashDragState::Idle, _) => SashDragEffect::Noop {
                reason: SashDragNoopReason::IdleWithoutActiveDrag,
            },
            (SashDragState::Dragging { .. }, SashPointerEvent::Down { .. }) => {
                SashDragEffect::Noop {
                    reason: SashDragNoopReason::ActiveDragAlreadyInProgress,
                }
            }
            (
                SashDragState::Dragging {
                    sash_index,
                    pointer_id,
                    start,
                    current,
                },
                SashPointerEvent::Move {
                    pointer_id: incoming,
                    position,
                },
            ) => {
                let coordinate = position.along(orientation);
                if incoming != pointer_id {
                    SashDragEffect::Noop {
                        reason: SashDragNoopReason::PointerMismatch,
                    }
                } else if coordinate.abs_diff(current) < u32::from(self.update_hysteresis) {
                    SashDragEffect::Noop {
                        reason: SashDragNoopReason::BelowHysteresis,
                    }
                } else {
                    self.state = SashDragState::Dragging {
                        sash_index,
                        pointer_id,
                        start,
                        current: coordinate,
                    };
                    SashDragEffect::Moved {
                        sash_index,
                        delta: coordinate.saturating_sub(current),
                        total_delta: coordinate.saturating_sub(start),
                    }
                }
            }
            (
                SashDragState::Dragging {
                    sash_index,
                    pointer_id,
                    start,
                    ..
                },
                SashPointerEvent::Up {
                    pointer_id: incoming,
                    position,
                },
            ) => {
                if incoming != pointer_id {
                    SashDragEffect::Noop {
                        reason: SashDragNoopReason::PointerMismatch,
                    }
                } else {
                    self.state = SashDragState::Idle;
                    SashDragEffect::Ended {
                        sash_index,
                        total_delta: position.along(orientation).saturating_sub(start),
                    }
                }
            }
            (
                SashDragState::Dragging {
                    sash_index,
                    pointer_id,
                    start,
                    current,
                },
                SashPointerEvent::Cancel { pointer_id: incoming },
            ) => {
                if incoming.is_some_and(|incoming| incoming != pointer_id) {
                    SashDragEffect::Noop {
                        reason: SashDragNoopReason::PointerMismatch,
                    }
                } else {
                    self.state = SashDragState::Idle;
                    SashDragEffect::Canceled {
                        sash_index,
                        total_delta: current.saturating_sub(start),
                    }
                }
            }
        };

        Ok(self.record(from, effect))
    }

    fn record(&mut self, from: SashDragState, effect: SashDragEffect) -> SashDragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        SashDragTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state,
            effect,
        }
    }
}

/// Drag input errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SashDragError {
    ZeroPointerId,
    SashOutOfRange { sash_index: usize, sash_count: usize },
}

impl fmt::Display for SashDragError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPointerId => write!(f, "pointer id must be non-zero"),
            Self::SashOutOfRange {
                sash_index,
                sash_count,
            } => write!(
                f,
                "sash index {sash_index} out of range (sash count {sash_count})"
            ),
        }
    }
}

impl std::error::Error for SashDragError {}
