#![forbid(unsafe_code)]

//! splitview public facade crate.
//!
//! Re-exports the engine, the item contract, and the drag controller from
//! the internal crates, plus a top-level [`Error`] that folds every
//! fallible operation's error into one type.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use splitview_core::event::{Emitter, SubscriptionId};
pub use splitview_core::geometry::{Orientation, PointerPosition};
pub use splitview_core::item::{
    ItemId, ItemIdAllocator, ItemIdError, LayoutPriority, SizableItem, SizeChangeNotifier,
    SizeChangeRequest,
};

#[cfg(feature = "tracing-json")]
pub use splitview_core::logging::init_json_logging;

// --- Layout re-exports -----------------------------------------------------

pub use splitview_layout::{
    ItemDescriptor, ItemPlacement, LayoutSnapshot, Sash, SashDragEffect, SashDragError,
    SashDragMachine, SashDragNoopReason, SashDragState, SashDragTransition, SashDragTuning,
    SashPointerEvent, SashState, Sizing, SplitView, SplitViewDescriptor, SplitViewError,
    SplitViewEvents, SplitViewOptions, SplitViewOptionsError,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for splitview hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Construction or insertion failed.
    SplitView(SplitViewError),
    /// A pointer event was rejected.
    Drag(SashDragError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SplitView(err) => write!(f, "{err}"),
            Self::Drag(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SplitView(err) => Some(err),
            Self::Drag(err) => Some(err),
        }
    }
}

impl From<SplitViewError> for Error {
    fn from(err: SplitViewError) -> Self {
        Self::SplitView(err)
    }
}

impl From<SplitViewOptionsError> for Error {
    fn from(err: SplitViewOptionsError) -> Self {
        Self::SplitView(err.into())
    }
}

impl From<ItemIdError> for Error {
    fn from(err: ItemIdError) -> Self {
        Self::SplitView(err.into())
    }
}

impl From<SashDragError> for Error {
    fn from(err: SashDragError) -> Self {
        Self::Drag(err)
    }
}

/// Standard result type for splitview APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, ItemId, LayoutPriority, Orientation, PointerPosition, Result, SashPointerEvent,
        SizableItem, Sizing, SplitView, SplitViewOptions,
    };

    pub use crate::{core, layout};
}

pub use splitview_core as core;
pub use splitview_layout as layout;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use splitview_harness::TestItem;

    fn build() -> Result<SplitView> {
        let mut view = SplitView::with_options(SplitViewOptions::new(Orientation::Vertical))?;
        view.layout(90, 30);
        for minimum in [10, 20, 30] {
            view.add_item(TestItem::new(minimum).boxed(), Sizing::Distribute, None, false)?;
        }
        view.handle_sash_event(&SashPointerEvent::Down {
            sash_index: 1,
            pointer_id: 1,
            position: PointerPosition::new(0, 60),
        })?;
        Ok(view)
    }

    #[test]
    fn errors_convert_through_question_mark() {
        let view = build().expect("valid session");
        assert_eq!(view.item_sizes(), vec![30, 30, 30]);
        assert!(view.is_dragging());
    }

    #[test]
    fn drag_errors_surface_as_facade_errors() {
        let mut view = SplitView::new(Orientation::Horizontal);
        let err: Error = view
            .handle_sash_event(&SashPointerEvent::Down {
                sash_index: 0,
                pointer_id: 1,
                position: PointerPosition::default(),
            })
            .map_err(Error::from)
            .expect_err("no sashes");
        assert!(err.to_string().contains("out of range"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
