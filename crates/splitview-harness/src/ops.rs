//! Operation streams against a live engine.
//!
//! [`SplitOp`] names every public mutation in a serializable form so a
//! failing stream can be logged, replayed, and hashed. [`Workbench`] applies
//! ops to an engine populated with [`TestItem`]s; [`check_invariants`]
//! asserts the allocation invariants after each one.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use splitview_core::geometry::{Orientation, PointerPosition};
use splitview_core::item::{ItemId, LayoutPriority};
use splitview_layout::{
    SashDragError, SashPointerEvent, Sizing, SplitView, SplitViewError, SplitViewOptions,
};

use crate::item::TestItem;

/// Deterministic generator for seeded streams.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    /// Uniform in `min..=max`.
    pub fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        debug_assert!(min <= max);
        if min == max {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + (self.next_u64() % span) as u32
    }

    pub fn next_i32_range(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        let span = u64::from(max.abs_diff(min)) + 1;
        min.wrapping_add((self.next_u64() % span) as i32)
    }

    pub fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }

    pub fn choose_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 0
    }
}

/// Serializable mirror of [`Sizing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpSizing {
    Exact { size: u32 },
    Split { index: usize },
    Distribute,
    Invisible { cached_visible_size: u32 },
}

impl From<OpSizing> for Sizing {
    fn from(sizing: OpSizing) -> Self {
        match sizing {
            OpSizing::Exact { size } => Self::Exact(size),
            OpSizing::Split { index } => Self::Split(index),
            OpSizing::Distribute => Self::Distribute,
            OpSizing::Invisible {
                cached_visible_size,
            } => Self::Invisible {
                cached_visible_size,
            },
        }
    }
}

/// One public engine mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SplitOp {
    Add {
        minimum: u32,
        maximum: Option<u32>,
        snap: Option<u32>,
        priority: LayoutPriority,
        sizing: OpSizing,
        index: Option<usize>,
    },
    Remove {
        index: usize,
        distribute: bool,
    },
    Move {
        from: usize,
        to: usize,
    },
    ResizeItem {
        index: usize,
        size: u32,
    },
    SetVisible {
        index: usize,
        visible: bool,
    },
    Layout {
        size: u32,
        orthogonal_size: u32,
    },
    /// Pointer down on the sash, one move by `delta`, pointer up.
    Drag {
        sash_index: usize,
        delta: i32,
    },
    RequestSize {
        index: usize,
        size: Option<u32>,
    },
    DistributeViewSizes,
}

impl SplitOp {
    /// Draw an op that is valid for the current shape of `view`.
    pub fn random(view: &SplitView, rng: &mut Lcg) -> Self {
        let len = view.len();
        let mut kinds = vec![0usize, 1];
        if len > 0 {
            kinds.extend([2, 4, 5, 7, 8]);
        }
        if len > 1 {
            kinds.extend([3, 6]);
        }

        match kinds[rng.choose_index(kinds.len())] {
            0 => {
                let minimum = rng.next_u32_range(0, 40);
                let maximum = (!rng.choose_bool()).then(|| minimum + rng.next_u32_range(0, 200));
                let snap = (rng.next_u32_range(0, 3) == 0).then(|| rng.next_u32_range(1, 30));
                let priority = match rng.next_u32_range(0, 2) {
                    0 => LayoutPriority::Low,
                    1 => LayoutPriority::Normal,
                    _ => LayoutPriority::High,
                };
                let sizing = match rng.next_u32_range(0, 3) {
                    0 => OpSizing::Exact {
                        size: rng.next_u32_range(0, 300),
                    },
                    1 if len > 0 => OpSizing::Split {
                        index: rng.choose_index(len),
                    },
                    2 => OpSizing::Invisible {
                        cached_visible_size: rng.next_u32_range(0, 200),
                    },
                    _ => OpSizing::Distribute,
                };
                let index = rng.choose_bool().then(|| rng.choose_index(len + 1));
                Self::Add {
                    minimum,
                    maximum,
                    snap,
                    priority,
                    sizing,
                    index,
                }
            }
            2 => Self::Remove {
                index: rng.choose_index(len),
                distribute: rng.choose_bool(),
            },
            3 => Self::Move {
                from: rng.choose_index(len),
                to: rng.choose_index(len),
            },
            4 => Self::ResizeItem {
                index: rng.choose_index(len),
                size: rng.next_u32_range(0, 600),
            },
            5 => Self::SetVisible {
                index: rng.choose_index(len),
                visible: rng.choose_bool(),
            },
            6 => Self::Drag {
                sash_index: rng.choose_index(len - 1),
                delta: rng.next_i32_range(-250, 250),
            },
            7 => Self::RequestSize {
                index: rng.choose_index(len),
                size: rng.choose_bool().then(|| rng.next_u32_range(0, 400)),
            },
            8 => Self::DistributeViewSizes,
            _ => Self::Layout {
                size: rng.next_u32_range(0, 1200),
                orthogonal_size: rng.next_u32_range(0, 80),
            },
        }
    }
}

/// Failure while applying an op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    SplitView(SplitViewError),
    Drag(SashDragError),
    Trace(String),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SplitView(error) => write!(f, "split view error: {error}"),
            Self::Drag(error) => write!(f, "drag error: {error}"),
            Self::Trace(message) => write!(f, "trace serialization failed: {message}"),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SplitView(error) => Some(error),
            Self::Drag(error) => Some(error),
            Self::Trace(_) => None,
        }
    }
}

impl From<SplitViewError> for HarnessError {
    fn from(error: SplitViewError) -> Self {
        Self::SplitView(error)
    }
}

impl From<SashDragError> for HarnessError {
    fn from(error: SashDragError) -> Self {
        Self::Drag(error)
    }
}

/// Engine plus a test handle for every item it holds.
#[derive(Debug)]
pub struct Workbench {
    view: SplitView,
    items: BTreeMap<ItemId, TestItem>,
}

impl Workbench {
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        Self {
            view: SplitView::new(orientation),
            items: BTreeMap::new(),
        }
    }

    pub fn with_options(options: SplitViewOptions) -> Result<Self, SplitViewError> {
        Ok(Self {
            view: SplitView::with_options(options)?,
            items: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn view(&self) -> &SplitView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut SplitView {
        &mut self.view
    }

    /// Handle for the item currently at `index`.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&TestItem> {
        let id = self.view.item_ids().get(index).copied()?;
        self.items.get(&id)
    }

    pub fn apply(&mut self, op: &SplitOp) -> Result<(), HarnessError> {
        match *op {
            SplitOp::Add {
                minimum,
                maximum,
                snap,
                priority,
                sizing,
                index,
            } => {
                let mut item = TestItem::new(minimum).with_priority(priority);
                if let Some(maximum) = maximum {
                    item = item.with_maximum(maximum);
                }
                if let Some(snap) = snap {
                    item = item.with_snap(snap);
                }
                let id = self.view.add_item(item.boxed(), sizing.into(), index, false)?;
                self.items.insert(id, item);
            }
            SplitOp::Remove { index, distribute } => {
                let id = self.view.item_ids().get(index).copied();
                let sizing = distribute.then_some(Sizing::Distribute);
                if self.view.remove_item(index, sizing).is_some()
                    && let Some(id) = id
                {
                    self.items.remove(&id);
                }
            }
            SplitOp::Move { from, to } => self.view.move_item(from, to),
            SplitOp::ResizeItem { index, size } => self.view.resize_item(index, size),
            SplitOp::SetVisible { index, visible } => self.view.set_item_visible(index, visible),
            SplitOp::Layout {
                size,
                orthogonal_size,
            } => self.view.layout(size, orthogonal_size),
            SplitOp::Drag { sash_index, delta } => self.drag(sash_index, delta)?,
            SplitOp::RequestSize { index, size } => {
                if let Some(item) = self.item(index) {
                    item.request_size(size);
                }
                self.view.process_size_changes();
            }
            SplitOp::DistributeViewSizes => self.view.distribute_view_sizes(),
        }
        Ok(())
    }

    fn drag(&mut self, sash_index: usize, delta: i32) -> Result<(), HarnessError> {
        let orientation = self.view.orientation();
        let start = self
            .view
            .sashes()
            .get(sash_index)
            .map_or(0, |sash| i32::try_from(sash.position()).unwrap_or(i32::MAX));
        let end = start.saturating_add(delta);
        let pointer_id = 1;
        self.view.handle_sash_event(&SashPointerEvent::Down {
            sash_index,
            pointer_id,
            position: pointer_at(orientation, start),
        })?;
        self.view.handle_sash_event(&SashPointerEvent::Move {
            pointer_id,
            position: pointer_at(orientation, end),
        })?;
        self.view.handle_sash_event(&SashPointerEvent::Up {
            pointer_id,
            position: pointer_at(orientation, end),
        })?;
        Ok(())
    }
}

/// Pointer position with `coordinate` on the engine's axis.
#[must_use]
pub fn pointer_at(orientation: Orientation, coordinate: i32) -> PointerPosition {
    match orientation {
        Orientation::Horizontal => PointerPosition::new(coordinate, 0),
        Orientation::Vertical => PointerPosition::new(0, coordinate),
    }
}

/// A broken allocation invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    SashCount {
        items: usize,
        sashes: usize,
    },
    HiddenItemHasSize {
        index: usize,
        size: u32,
    },
    OutOfBounds {
        index: usize,
        size: u32,
        minimum: u32,
        maximum: Option<u32>,
    },
    ContentMismatch {
        content: u64,
        container: u32,
    },
    PlacementMismatch {
        index: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SashCount { items, sashes } => {
                write!(f, "{items} items but {sashes} sashes")
            }
            Self::HiddenItemHasSize { index, size } => {
                write!(f, "hidden item {index} has size {size}")
            }
            Self::OutOfBounds {
                index,
                size,
                minimum,
                maximum,
            } => write!(
                f,
                "item {index} size {size} outside [{minimum}, {maximum:?}]"
            ),
            Self::ContentMismatch { content, container } => {
                write!(f, "content {content} does not fill container {container}")
            }
            Self::PlacementMismatch { index } => {
                write!(f, "placement {index} disagrees with item sizes")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Largest number of disjoint spans [`fill_is_feasible`] tracks.
const MAX_FILL_SPANS: usize = 64;

/// Whether the visible items can sum to exactly the container size, each
/// within `[minimum, maximum]` and snapping items also at 0.
///
/// `None` when the reachable totals fragment past [`MAX_FILL_SPANS`].
pub fn fill_is_feasible(view: &SplitView) -> Option<bool> {
    let mut spans: Vec<(u64, u64)> = vec![(0, 0)];
    for index in 0..view.len() {
        let (Some(item), Some(true)) = (view.item(index), view.is_item_visible(index)) else {
            continue;
        };
        let minimum = u64::from(item.minimum_size());
        let maximum = item.maximum_size().map_or(u64::from(u32::MAX), u64::from);
        let mut next: Vec<(u64, u64)> = spans
            .iter()
            .map(|&(lo, hi)| (lo + minimum, hi + maximum))
            .collect();
        if item.snap_size().is_some_and(|snap| snap > 0) {
            next.extend_from_slice(&spans);
        }
        next.sort_unstable();
        spans.clear();
        for (lo, hi) in next {
            match spans.last_mut() {
                Some(last) if lo <= last.1.saturating_add(1) => last.1 = last.1.max(hi),
                _ => spans.push((lo, hi)),
            }
        }
        if spans.len() > MAX_FILL_SPANS {
            return None;
        }
    }
    let size = u64::from(view.size());
    Some(spans.iter().any(|&(lo, hi)| lo <= size && size <= hi))
}

/// Check the invariants that hold whenever no drag is in progress.
///
/// Content must equal the container whenever [`fill_is_feasible`] says
/// some assignment of sizes can.
pub fn check_invariants(view: &SplitView) -> Result<(), InvariantViolation> {
    if view.sash_count() != view.len().saturating_sub(1) {
        return Err(InvariantViolation::SashCount {
            items: view.len(),
            sashes: view.sash_count(),
        });
    }

    for index in 0..view.len() {
        let (Some(item), Some(size), Some(visible)) = (
            view.item(index),
            view.item_size(index),
            view.is_item_visible(index),
        ) else {
            continue;
        };
        if !visible {
            if size != 0 {
                return Err(InvariantViolation::HiddenItemHasSize { index, size });
            }
            continue;
        }
        let minimum = item.minimum_size();
        let maximum = item.maximum_size();
        let collapsed = size == 0 && item.snap_size().is_some_and(|snap| snap > 0);
        if !collapsed && (size < minimum || maximum.is_some_and(|maximum| size > maximum)) {
            return Err(InvariantViolation::OutOfBounds {
                index,
                size,
                minimum,
                maximum,
            });
        }
    }

    if fill_is_feasible(view) == Some(true) && view.content_size() != u64::from(view.size()) {
        return Err(InvariantViolation::ContentMismatch {
            content: view.content_size(),
            container: view.size(),
        });
    }

    let mut offset: u32 = 0;
    for (index, placement) in view.placements().iter().enumerate() {
        if view.item_size(index) != Some(placement.size) || placement.offset != offset {
            return Err(InvariantViolation::PlacementMismatch { index });
        }
        offset = offset.saturating_add(placement.size);
    }
    Ok(())
}
