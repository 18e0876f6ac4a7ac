//! Engine configuration.

use std::fmt;

use serde::{Deserialize, Serialize};
use splitview_core::geometry::Orientation;
use splitview_core::item::ItemIdError;

/// Drag behavior tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SashDragTuning {
    /// Minimum axis travel between applied pointer moves. `0` applies every
    /// move.
    pub update_hysteresis: u16,
}

/// Initial size and visibility of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    pub size: u32,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

fn visible_by_default() -> bool {
    true
}

impl ItemDescriptor {
    #[must_use]
    pub const fn visible(size: u32) -> Self {
        Self {
            size,
            visible: true,
        }
    }

    #[must_use]
    pub const fn hidden(cached_size: u32) -> Self {
        Self {
            size: cached_size,
            visible: false,
        }
    }
}

/// A complete initial layout: container size plus one entry per item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SplitViewDescriptor {
    pub size: u32,
    pub items: Vec<ItemDescriptor>,
}

/// Options accepted by [`SplitView::with_options`](crate::SplitView::with_options)
/// and [`SplitView::from_descriptor`](crate::SplitView::from_descriptor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitViewOptions {
    pub orientation: Orientation,
    /// Redistribute container resizes by saved proportions. When false the
    /// whole delta flows through the last item in priority order.
    pub proportional_layout: bool,
    pub drag: SashDragTuning,
    pub descriptor: Option<SplitViewDescriptor>,
}

impl Default for SplitViewOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            proportional_layout: true,
            drag: SashDragTuning::default(),
            descriptor: None,
        }
    }
}

impl SplitViewOptions {
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn proportional_layout(mut self, enabled: bool) -> Self {
        self.proportional_layout = enabled;
        self
    }

    #[must_use]
    pub fn drag(mut self, drag: SashDragTuning) -> Self {
        self.drag = drag;
        self
    }

    #[must_use]
    pub fn descriptor(mut self, descriptor: SplitViewDescriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    /// Reject descriptors whose visible sizes overflow the size type.
    pub fn validate(&self) -> Result<(), SplitViewOptionsError> {
        if let Some(descriptor) = &self.descriptor {
            let mut total: u32 = 0;
            for item in descriptor.items.iter().filter(|item| item.visible) {
                total = total
                    .checked_add(item.size)
                    .ok_or(SplitViewOptionsError::DescriptorSizeOverflow)?;
            }
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitViewOptionsError {
    DescriptorSizeOverflow,
    MissingDescriptor,
    UnexpectedDescriptor,
    DescriptorItemCountMismatch { descriptor: usize, items: usize },
}

impl fmt::Display for SplitViewOptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DescriptorSizeOverflow => write!(f, "descriptor item sizes overflow u32"),
            Self::MissingDescriptor => write!(f, "options carry no descriptor"),
            Self::UnexpectedDescriptor => {
                write!(f, "descriptor given without items; use from_descriptor")
            }
            Self::DescriptorItemCountMismatch { descriptor, items } => write!(
                f,
                "descriptor lists {descriptor} items but {items} were supplied"
            ),
        }
    }
}

impl std::error::Error for SplitViewOptionsError {}

/// Errors from fallible engine construction and insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitViewError {
    Options(SplitViewOptionsError),
    ItemId(ItemIdError),
    InvalidItemBounds {
        index: usize,
        minimum: u32,
        maximum: u32,
    },
}

impl fmt::Display for SplitViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Options(error) => write!(f, "invalid split view options: {error}"),
            Self::ItemId(error) => write!(f, "item id allocation failed: {error}"),
            Self::InvalidItemBounds {
                index,
                minimum,
                maximum,
            } => write!(
                f,
                "item {index} has minimum {minimum} above maximum {maximum}"
            ),
        }
    }
}

impl std::error::Error for SplitViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Options(error) => Some(error),
            Self::ItemId(error) => Some(error),
            Self::InvalidItemBounds { .. } => None,
        }
    }
}

impl From<SplitViewOptionsError> for SplitViewError {
    fn from(error: SplitViewOptionsError) -> Self {
        Self::Options(error)
    }
}

impl From<ItemIdError> for SplitViewError {
    fn from(error: ItemIdError) -> Self {
        Self::ItemId(error)
    }
}
