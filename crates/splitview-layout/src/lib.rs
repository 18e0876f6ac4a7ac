#![forbid(unsafe_code)]

//! Allocation engine and divider drag controller.
//!
//! [`SplitView`] distributes a container's length among an ordered list of
//! [`SizableItem`]s, honoring per-item minimums, maximums, snap thresholds,
//! and priorities. [`SashDragMachine`] turns pointer events on a divider
//! into resize deltas; the engine owns one and exposes it through
//! [`SplitView::handle_sash_event`].

pub mod drag;
pub mod options;
pub mod priority;
pub mod proportions;
pub mod sash;
mod collapse;
mod split_view;

pub use drag::{
    SashDragEffect, SashDragError, SashDragMachine, SashDragNoopReason, SashDragState,
    SashDragTransition, SashPointerEvent,
};
pub use options::{
    ItemDescriptor, SashDragTuning, SplitViewDescriptor, SplitViewError, SplitViewOptions,
    SplitViewOptionsError,
};
pub use priority::{PriorityIndexes, apply_priority_order};
pub use proportions::Proportions;
pub use sash::{Sash, SashState};
pub use split_view::{ItemPlacement, LayoutSnapshot, Sizing, SplitView, SplitViewEvents};

pub use splitview_core::geometry::{Orientation, PointerPosition};
pub use splitview_core::item::{ItemId, LayoutPriority, SizableItem, SizeChangeNotifier};
