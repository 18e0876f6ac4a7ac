//! The allocation engine.
//!
//! [`SplitView`] owns an ordered list of items and the sashes between them,
//! and keeps one invariant after every public call: each visible item's size
//! sits inside its bounds, and the sizes sum to the container size unless
//! the bounds make that impossible. All redistribution funnels through
//! [`SplitView::resize`] (a clamp-and-propagate pass on both sides of a
//! pivot) and [`SplitView::distribute_empty_space`] (a trailing absorb pass).
//!
//! # Re-entrancy
//!
//! Items never call back into the engine. A [`SizeChangeNotifier`] only
//! enqueues a request; the engine drains the queue at the end of
//! [`SplitView::layout`], when a drag ends, or when the host calls
//! [`SplitView::process_size_changes`]. Requests made during a drag wait for
//! the drag to finish.
//!
//! [`SizeChangeNotifier`]: splitview_core::item::SizeChangeNotifier

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use splitview_core::event::Emitter;
use splitview_core::geometry::Orientation;
use splitview_core::item::{
    ItemId, ItemIdAllocator, NotifierHandle, SizableItem, SizeChangeQueue,
};
use splitview_core::{debug, debug_span, trace, warn};

use crate::collapse::{CollapseCandidate, plan_open_items};
use crate::drag::{
    SashDragEffect, SashDragError, SashDragMachine, SashDragState, SashDragTransition,
    SashPointerEvent,
};
use crate::options::{SplitViewError, SplitViewOptions, SplitViewOptionsError};
use crate::priority::{PriorityIndexes, apply_priority_order};
use crate::proportions::Proportions;
use crate::sash::{ItemBounds, Sash, sash_states};

/// How a newly added item is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sizing {
    /// Start at exactly this size, then settle.
    Exact(u32),
    /// Take half the current size of the item at this index.
    Split(usize),
    /// Start at the item's minimum, then equalize all flexible items.
    Distribute,
    /// Start hidden; `cached_visible_size` is restored when shown.
    Invisible { cached_visible_size: u32 },
}

/// Where one item landed after a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPlacement {
    pub id: ItemId,
    /// Sum of the sizes of every preceding item.
    pub offset: u32,
    pub size: u32,
}

/// Payload of [`SplitViewEvents::did_layout`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub size: u32,
    pub orthogonal_size: u32,
    pub placements: Vec<ItemPlacement>,
}

/// Per-engine observer lists.
#[derive(Debug)]
pub struct SplitViewEvents {
    pub did_add_item: Emitter<ItemId>,
    pub did_remove_item: Emitter<ItemId>,
    /// Fires once per finished drag, whether it ended or was canceled.
    pub did_sash_end: Emitter<()>,
    /// Replays the latest snapshot to late subscribers.
    pub did_layout: Emitter<LayoutSnapshot>,
}

impl Default for SplitViewEvents {
    fn default() -> Self {
        Self {
            did_add_item: Emitter::new(),
            did_remove_item: Emitter::new(),
            did_sash_end: Emitter::new(),
            did_layout: Emitter::replaying(),
        }
    }
}

struct ManagedItem {
    id: ItemId,
    item: Box<dyn SizableItem>,
    size: u32,
    visible: bool,
    /// Size to restore when a hidden item is shown again.
    cached_visible_size: Option<u32>,
    _subscription: NotifierHandle,
}

impl ManagedItem {
    fn minimum(&self) -> u32 {
        if self.visible {
            self.item.minimum_size()
        } else {
            0
        }
    }

    fn maximum(&self) -> u32 {
        if self.visible {
            self.item.maximum_size().unwrap_or(u32::MAX)
        } else {
            0
        }
    }

    fn snaps(&self) -> bool {
        self.item.snap_size().is_some_and(|snap| snap > 0)
    }

    /// Lower bound used for slack accounting: a snapping item can always
    /// reach 0.
    fn effective_minimum(&self) -> u32 {
        if self.snaps() { 0 } else { self.minimum() }
    }

    fn is_collapsed(&self) -> bool {
        self.visible && self.size == 0 && self.snaps()
    }

    /// Plain clamp into `[minimum, maximum]`.
    fn clamp_bounds(&self, proposed: u32) -> u32 {
        proposed.max(self.minimum()).min(self.maximum())
    }

    /// Clamp used while propagating a resize: below the minimum, a snapping
    /// item collapses to 0 once the proposal drops under its snap size.
    fn clamp_snapping(&self, proposed: i64) -> u32 {
        let maximum = i64::from(self.maximum());
        let proposed = proposed.clamp(0, maximum);
        let minimum = i64::from(self.minimum());
        let clamped = if proposed >= minimum {
            proposed
        } else {
            match self.item.snap_size() {
                Some(snap) if proposed < i64::from(snap) => 0,
                _ => minimum.min(maximum),
            }
        };
        u32::try_from(clamped).unwrap_or(u32::MAX)
    }

    fn candidate(&self) -> CollapseCandidate {
        CollapseCandidate {
            minimum: u64::from(self.minimum()),
            maximum: u64::from(self.maximum()),
            collapsible: self.visible && self.snaps(),
            collapsed: self.is_collapsed(),
            size: u64::from(self.size),
        }
    }

    fn bounds(&self) -> ItemBounds {
        ItemBounds {
            size: self.size,
            minimum: self.effective_minimum(),
            maximum: self.maximum(),
        }
    }
}

/// Signed distance from `content` to `target`.
fn gap(target: u64, content: u64) -> i64 {
    i64::try_from(target).unwrap_or(i64::MAX) - i64::try_from(content).unwrap_or(i64::MAX)
}

/// One-dimensional constrained layout engine.
pub struct SplitView {
    orientation: Orientation,
    size: u32,
    orthogonal_size: u32,
    proportional_layout: bool,
    items: Vec<ManagedItem>,
    sashes: Vec<Sash>,
    proportions: Proportions,
    placements: Vec<ItemPlacement>,
    drag: SashDragMachine,
    /// Sizes captured at pointer-down; every move resizes from these.
    drag_baseline: Vec<u32>,
    ids: ItemIdAllocator,
    changes: SizeChangeQueue,
    events: SplitViewEvents,
}

impl fmt::Debug for SplitView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitView")
            .field("orientation", &self.orientation)
            .field("size", &self.size)
            .field("orthogonal_size", &self.orthogonal_size)
            .field("proportional_layout", &self.proportional_layout)
            .field("placements", &self.placements)
            .field("sashes", &self.sashes)
            .field("drag", &self.drag.state())
            .field("pending_changes", &self.changes.len())
            .finish_non_exhaustive()
    }
}

impl SplitView {
    /// Empty engine with default options.
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        Self::build(&SplitViewOptions::new(orientation))
    }

    /// Empty engine. Fails when `options` carries a descriptor; use
    /// [`from_descriptor`](Self::from_descriptor) for that.
    pub fn with_options(options: SplitViewOptions) -> Result<Self, SplitViewError> {
        options.validate()?;
        if options.descriptor.is_some() {
            return Err(SplitViewOptionsError::UnexpectedDescriptor.into());
        }
        Ok(Self::build(&options))
    }

    /// Engine rebuilt from a persisted layout.
    ///
    /// `items` pair one-to-one with the descriptor entries. No layout pass
    /// runs: sizes are taken as given and proportions are saved from them,
    /// so the next [`layout`](Self::layout) scales the restored ratios.
    pub fn from_descriptor(
        options: SplitViewOptions,
        items: Vec<Box<dyn SizableItem>>,
    ) -> Result<Self, SplitViewError> {
        options.validate()?;
        let Some(descriptor) = options.descriptor.clone() else {
            return Err(SplitViewOptionsError::MissingDescriptor.into());
        };
        if descriptor.items.len() != items.len() {
            return Err(SplitViewOptionsError::DescriptorItemCountMismatch {
                descriptor: descriptor.items.len(),
                items: items.len(),
            }
            .into());
        }
        for (index, item) in items.iter().enumerate() {
            if let Some(maximum) = item.maximum_size()
                && item.minimum_size() > maximum
            {
                return Err(SplitViewError::InvalidItemBounds {
                    index,
                    minimum: item.minimum_size(),
                    maximum,
                });
            }
        }

        let mut view = Self::build(&options);
        view.size = descriptor.size;
        for (index, (item, entry)) in items.into_iter().zip(&descriptor.items).enumerate() {
            let sizing = if entry.visible {
                Sizing::Exact(entry.size)
            } else {
                Sizing::Invisible {
                    cached_visible_size: entry.size,
                }
            };
            view.add_item(item, sizing, Some(index), true)?;
        }
        view.save_proportions();
        debug!(
            items = view.items.len(),
            size = view.size,
            "split view restored from descriptor"
        );
        Ok(view)
    }

    /// Replace the id source. Ids already handed out are kept.
    #[must_use]
    pub fn with_id_allocator(mut self, ids: ItemIdAllocator) -> Self {
        self.ids = ids;
        self
    }

    fn build(options: &SplitViewOptions) -> Self {
        Self {
            orientation: options.orientation,
            size: 0,
            orthogonal_size: 0,
            proportional_layout: options.proportional_layout,
            items: Vec::new(),
            sashes: Vec::new(),
            proportions: Proportions::new(),
            placements: Vec::new(),
            drag: SashDragMachine::new(options.drag.update_hysteresis),
            drag_baseline: Vec::new(),
            ids: ItemIdAllocator::new(),
            changes: SizeChangeQueue::new(),
            events: SplitViewEvents::default(),
        }
    }

    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Container size along the axis.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    #[must_use]
    pub const fn orthogonal_size(&self) -> u32 {
        self.orthogonal_size
    }

    #[must_use]
    pub const fn proportional_layout(&self) -> bool {
        self.proportional_layout
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn sash_count(&self) -> usize {
        self.sashes.len()
    }

    /// Sashes as of the last layout pass.
    #[must_use]
    pub fn sashes(&self) -> &[Sash] {
        &self.sashes
    }

    /// Item placements as of the last layout pass.
    #[must_use]
    pub fn placements(&self) -> &[ItemPlacement] {
        &self.placements
    }

    #[must_use]
    pub fn proportions(&self) -> Option<&[f64]> {
        self.proportions.get()
    }

    #[must_use]
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|managed| managed.id).collect()
    }

    #[must_use]
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|managed| managed.id == id)
    }

    #[must_use]
    pub fn item(&self, index: usize) -> Option<&dyn SizableItem> {
        self.items.get(index).map(|managed| managed.item.as_ref())
    }

    /// Current size of the item at `index`.
    #[must_use]
    pub fn item_size(&self, index: usize) -> Option<u32> {
        self.items.get(index).map(|managed| managed.size)
    }

    #[must_use]
    pub fn item_sizes(&self) -> Vec<u32> {
        self.items.iter().map(|managed| managed.size).collect()
    }

    #[must_use]
    pub fn is_item_visible(&self, index: usize) -> Option<bool> {
        self.items.get(index).map(|managed| managed.visible)
    }

    /// Size a hidden item will ask for when shown. `None` for visible items.
    #[must_use]
    pub fn cached_visible_size(&self, index: usize) -> Option<u32> {
        self.items
            .get(index)
            .and_then(|managed| managed.cached_visible_size)
    }

    /// Sum of item sizes.
    #[must_use]
    pub fn content_size(&self) -> u64 {
        self.items.iter().map(|managed| u64::from(managed.size)).sum()
    }

    /// Smallest container that satisfies every item. Snapping items count
    /// as 0.
    #[must_use]
    pub fn minimum_size(&self) -> u64 {
        self.items
            .iter()
            .map(|managed| u64::from(managed.effective_minimum()))
            .sum()
    }

    /// Largest container the items can fill, or `None` when unbounded or
    /// empty.
    #[must_use]
    pub fn maximum_size(&self) -> Option<u64> {
        if self.items.is_empty() {
            return None;
        }
        let mut total: u64 = 0;
        for managed in &self.items {
            if managed.visible {
                total += u64::from(managed.item.maximum_size()?);
            }
        }
        Some(total)
    }

    #[must_use]
    pub const fn drag_state(&self) -> SashDragState {
        self.drag.state()
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    #[must_use]
    pub const fn events(&self) -> &SplitViewEvents {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut SplitViewEvents {
        &mut self.events
    }

    /// Switch axis. The container's two dimensions trade places; item sizes
    /// are untouched until the next [`layout`](Self::layout).
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if orientation == self.orientation {
            return;
        }
        self.cancel_drag_for_mutation();
        std::mem::swap(&mut self.size, &mut self.orthogonal_size);
        self.orientation = orientation;
        debug!(?orientation, size = self.size, "orientation changed");
    }

    /// Insert an item at `index` (default: the end).
    ///
    /// Unless `skip_layout` is set, the engine settles with the new item
    /// absorbing last, then equalizes flexible items for
    /// [`Sizing::Distribute`].
    pub fn add_item(
        &mut self,
        mut item: Box<dyn SizableItem>,
        sizing: Sizing,
        index: Option<usize>,
        skip_layout: bool,
    ) -> Result<ItemId, SplitViewError> {
        let id = self.ids.allocate()?;
        let (size, visible, cached_visible_size) = match sizing {
            Sizing::Exact(size) => (size, true, None),
            Sizing::Split(source) => (self.item_size(source).map_or(0, |size| size / 2), true, None),
            Sizing::Distribute => (item.minimum_size(), true, None),
            Sizing::Invisible {
                cached_visible_size,
            } => (0, false, Some(cached_visible_size)),
        };

        let (notifier, subscription) = self.changes.notifier(id);
        item.attach(notifier);
        if !visible {
            item.set_visible(false);
        }

        let index = self.insert_managed(
            ManagedItem {
                id,
                item,
                size,
                visible,
                cached_visible_size,
                _subscription: subscription,
            },
            index.unwrap_or(self.items.len()),
        );
        debug!(id = id.get(), index, size, visible, "item added");
        self.events.did_add_item.fire(id);

        if !skip_layout {
            self.settle(&self.priorities().pin_last(index));
            if sizing == Sizing::Distribute && self.equalize_flexible() {
                self.settle(&self.priorities());
            }
            self.commit();
        }
        Ok(id)
    }

    /// Remove the item at `index` and hand it back. Out-of-range indexes
    /// return `None` and change nothing.
    pub fn remove_item(
        &mut self,
        index: usize,
        sizing: Option<Sizing>,
    ) -> Option<Box<dyn SizableItem>> {
        let ManagedItem {
            id,
            item,
            _subscription: subscription,
            ..
        } = self.detach_managed(index)?;
        drop(subscription);
        self.changes.discard(id);
        debug!(id = id.get(), index, "item removed");
        self.events.did_remove_item.fire(id);

        self.settle(&self.priorities());
        if sizing == Some(Sizing::Distribute) && self.equalize_flexible() {
            self.settle(&self.priorities());
        }
        self.commit();
        Some(item)
    }

    /// Move an item, keeping its id, size, and visibility.
    pub fn move_item(&mut self, from: usize, to: usize) {
        let Some(managed) = self.detach_managed(from) else {
            return;
        };
        let index = self.insert_managed(managed, to);
        trace!(from, to = index, "item moved");
        self.relayout(&self.priorities().pin_last(index));
    }

    /// Ask for a specific size; the rest of the layout absorbs the
    /// difference.
    pub fn resize_item(&mut self, index: usize, size: u32) {
        let container = self.size;
        let Some(managed) = self.items.get_mut(index) else {
            return;
        };
        let ceiling = managed.maximum().min(container);
        managed.size = size.max(managed.minimum()).min(ceiling);
        trace!(index, requested = size, size = managed.size, "item resized");
        self.relayout(&self.priorities().pin_last(index));
    }

    /// Hide or show the item at `index`.
    ///
    /// Hiding caches the current size and frees it for the other items.
    /// Showing restores the cached size (clamped) and takes the space back,
    /// with this item giving way last.
    pub fn set_item_visible(&mut self, index: usize, visible: bool) {
        let Some(managed) = self.items.get_mut(index) else {
            return;
        };
        if managed.visible == visible {
            return;
        }
        self.cancel_drag_for_mutation();
        let managed = &mut self.items[index];
        if visible {
            managed.visible = true;
            let restored = managed.cached_visible_size.take().unwrap_or(0);
            managed.size = managed.clamp_bounds(restored);
        } else {
            managed.cached_visible_size = Some(managed.size);
            managed.size = 0;
            managed.visible = false;
        }
        managed.item.set_visible(visible);
        debug!(index, visible, "item visibility changed");

        self.distribute_empty_space_toward(Some(index));
        self.layout_views();
        self.save_proportions();
    }

    /// Lay out into a new container size.
    ///
    /// With valid saved proportions each item is rescaled from them;
    /// otherwise the whole delta flows through `resize` at the last item.
    /// Queued size-change requests are processed afterwards.
    pub fn layout(&mut self, size: u32, orthogonal_size: u32) {
        let span = debug_span!(
            "splitview.layout",
            size,
            orthogonal_size,
            items = self.items.len()
        );
        let _guard = span.enter();

        let previous = u64::from(self.size).max(self.content_size());
        self.size = size;
        self.orthogonal_size = orthogonal_size;

        if let Some(targets) = self.proportional_targets(size) {
            for (managed, target) in self.items.iter_mut().zip(targets) {
                managed.size = managed.clamp_snapping(target);
            }
        } else if let Some(last) = self.items.len().checked_sub(1) {
            let delta = i64::from(size) - i64::try_from(previous).unwrap_or(i64::MAX);
            let (low, high) = self.priorities().resolved();
            self.resize(last, delta, None, Some(&low), Some(&high));
        }

        if self.minimum_size() > u64::from(size) {
            warn!(
                size,
                minimum = self.minimum_size(),
                "container smaller than item minimums; layout overflows"
            );
        }

        self.distribute_empty_space();
        let applied = self.apply_size_changes();
        self.layout_views();
        if applied > 0 {
            self.save_proportions();
        }
    }

    fn proportional_targets(&self, size: u32) -> Option<Vec<i64>> {
        if !self.proportional_layout {
            return None;
        }
        self.proportions.for_count(self.items.len())?;
        self.proportions.scale(size)
    }

    /// Move the boundary after item `index` by `delta`, returning the delta
    /// actually applied.
    ///
    /// Items at or before `index` (nearest first) absorb `delta` within their
    /// bounds; items after it (nearest first) absorb the opposite of what
    /// the first side took. `baseline` replaces the current sizes as the
    /// starting point when it has one entry per item. `index == len()` acts
    /// on the last item; anything beyond is a no-op.
    pub fn resize(
        &mut self,
        index: usize,
        delta: i64,
        baseline: Option<&[u32]>,
        low_priority: Option<&[usize]>,
        high_priority: Option<&[usize]>,
    ) -> i64 {
        let count = self.items.len();
        if count == 0 || index > count {
            return 0;
        }
        let sizes = match baseline {
            Some(baseline) if baseline.len() == count => baseline.to_vec(),
            _ => self.item_sizes(),
        };
        let pivot = index.min(count - 1);
        let low = low_priority.unwrap_or(&[]);
        let high = high_priority.unwrap_or(&[]);

        let mut up: Vec<usize> = (0..=pivot).rev().collect();
        let mut down: Vec<usize> = (pivot + 1..count).collect();
        apply_priority_order(&mut up, low, high);
        apply_priority_order(&mut down, low, high);

        let (min_up, max_up) = up.iter().fold((0i64, 0i64), |(shrink, grow), &i| {
            let managed = &self.items[i];
            let size = i64::from(sizes[i]);
            (
                shrink + i64::from(managed.effective_minimum()) - size,
                grow + i64::from(managed.maximum()) - size,
            )
        });
        let (min_down, max_down) = if down.is_empty() {
            (i64::MIN, i64::MAX)
        } else {
            down.iter().fold((0i64, 0i64), |(shrink, grow), &i| {
                let managed = &self.items[i];
                let size = i64::from(sizes[i]);
                (
                    shrink + size - i64::from(managed.maximum()),
                    grow + size - i64::from(managed.effective_minimum()),
                )
            })
        };
        let clamped = delta.max(min_up.max(min_down)).min(max_up.min(max_down));

        let mut remaining = clamped;
        let mut applied = 0i64;
        for &i in &up {
            let base = i64::from(sizes[i]);
            let managed = &mut self.items[i];
            let next = managed.clamp_snapping(base + remaining);
            let moved = i64::from(next) - base;
            remaining -= moved;
            applied += moved;
            managed.size = next;
        }

        let mut remaining = applied;
        for &i in &down {
            let base = i64::from(sizes[i]);
            let managed = &mut self.items[i];
            let next = managed.clamp_snapping(base - remaining);
            remaining += i64::from(next) - base;
            managed.size = next;
        }

        // A snap can free or claim more than the other side takes.
        let mut expected: u64 = sizes.iter().map(|&size| u64::from(size)).sum();
        if down.is_empty() {
            expected = expected.saturating_add_signed(clamped);
        }
        if self.content_size() != expected {
            let order: Vec<usize> = up.iter().chain(&down).copied().collect();
            self.fill_to(&order, expected);
            applied = up
                .iter()
                .map(|&i| i64::from(self.items[i].size) - i64::from(sizes[i]))
                .sum();
        }

        trace!(index, requested = delta, applied, "resize");
        applied
    }

    /// Hand the gap between content and container to items from last to
    /// first, `Low` priority first and `High` last.
    pub fn distribute_empty_space(&mut self) {
        self.distribute_empty_space_toward(None);
    }

    fn distribute_empty_space_toward(&mut self, pinned: Option<usize>) {
        let container = u64::from(self.size);
        if self.content_size() == container {
            return;
        }
        let mut order: Vec<usize> = (0..self.items.len()).rev().collect();
        let mut priorities = self.priorities();
        priorities.pinned = pinned;
        priorities.apply(&mut order);

        let unabsorbed = self.fill_to(&order, container);
        trace!(unabsorbed, "empty space distributed");
    }

    /// Bring the content size to `target`, returning what could not be
    /// placed.
    ///
    /// Open items absorb in `order`, each within its bounds. If that leaves
    /// a gap, snapping items are reopened or collapsed per
    /// [`plan_open_items`] and the open items absorb again.
    fn fill_to(&mut self, order: &[usize], target: u64) -> i64 {
        let residual = self.absorb(order, gap(target, self.content_size()), &[]);
        if residual == 0 {
            return 0;
        }
        let candidates: Vec<CollapseCandidate> =
            self.items.iter().map(ManagedItem::candidate).collect();
        let Some(open) = plan_open_items(&candidates, target) else {
            return residual;
        };
        for (managed, &open) in self.items.iter_mut().zip(&open) {
            if !managed.visible || !managed.snaps() {
                continue;
            }
            if !open {
                managed.size = 0;
            } else if managed.size == 0 {
                managed.size = managed.clamp_bounds(0);
            }
        }
        debug!(residual, target, "snapping items replanned");
        self.absorb(order, gap(target, self.content_size()), &open)
    }

    /// Hand `residual` to items in `order`, each clamped to its bounds.
    /// Collapsed items are skipped unless `open` marks them.
    fn absorb(&mut self, order: &[usize], mut residual: i64, open: &[bool]) -> i64 {
        for &index in order {
            if residual == 0 {
                break;
            }
            let managed = &mut self.items[index];
            if managed.is_collapsed() && !open.get(index).copied().unwrap_or(false) {
                continue;
            }
            let target = (i64::from(managed.size) + residual).clamp(0, i64::from(u32::MAX));
            let next = managed.clamp_bounds(u32::try_from(target).unwrap_or(u32::MAX));
            residual -= i64::from(next) - i64::from(managed.size);
            managed.size = next;
        }
        residual
    }

    /// Give every flexible item (maximum above minimum) the same share of
    /// the space they jointly hold, then settle.
    pub fn distribute_view_sizes(&mut self) {
        if self.equalize_flexible() {
            self.relayout(&self.priorities());
        }
    }

    /// Set flexible items to their mean size. Returns `false` when there
    /// are none.
    fn equalize_flexible(&mut self) -> bool {
        let flexible: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, managed)| managed.maximum() > managed.minimum() && !managed.is_collapsed())
            .map(|(index, _)| index)
            .collect();
        if flexible.is_empty() {
            return false;
        }
        let total: u64 = flexible
            .iter()
            .map(|&index| u64::from(self.items[index].size))
            .sum();
        let share = u32::try_from(total / flexible.len() as u64).unwrap_or(u32::MAX);
        for &index in &flexible {
            let managed = &mut self.items[index];
            managed.size = managed.clamp_bounds(share);
        }
        debug!(flexible = flexible.len(), share, "view sizes distributed");
        true
    }

    /// Drive the divider drag controller with one pointer event.
    pub fn handle_sash_event(
        &mut self,
        event: &SashPointerEvent,
    ) -> Result<SashDragTransition, SashDragError> {
        if let SashPointerEvent::Down { sash_index, .. } = *event
            && !self.drag.is_active()
            && sash_index >= self.sashes.len()
        {
            return Err(SashDragError::SashOutOfRange {
                sash_index,
                sash_count: self.sashes.len(),
            });
        }

        let transition = self.drag.apply_event(event, self.orientation)?;
        match transition.effect {
            SashDragEffect::Started { .. } => {
                self.drag_baseline = self.item_sizes();
                debug!(effect = ?transition.effect, "sash drag started");
            }
            SashDragEffect::Moved {
                sash_index,
                total_delta,
                ..
            } => {
                let baseline = std::mem::take(&mut self.drag_baseline);
                self.resize(sash_index, i64::from(total_delta), Some(&baseline), None, None);
                self.drag_baseline = baseline;
                self.distribute_empty_space();
                self.layout_views();
            }
            SashDragEffect::Ended { .. } | SashDragEffect::Canceled { .. } => {
                debug!(effect = ?transition.effect, "sash drag finished");
                self.finish_drag();
            }
            SashDragEffect::Noop { .. } => {}
        }
        Ok(transition)
    }

    /// Apply queued size-change requests, returning how many were applied.
    ///
    /// Requests are coalesced per item (last one wins) and applied in the
    /// order each item first asked. Deferred while a drag is in progress.
    pub fn process_size_changes(&mut self) -> usize {
        let applied = self.apply_size_changes();
        if applied > 0 {
            self.commit();
        }
        applied
    }

    /// Size half of [`process_size_changes`](Self::process_size_changes):
    /// items are not laid out.
    fn apply_size_changes(&mut self) -> usize {
        if self.drag.is_active() || self.changes.is_empty() {
            return 0;
        }
        let mut latest: FxHashMap<ItemId, Option<u32>> = FxHashMap::default();
        let mut order = Vec::new();
        for request in self.changes.drain() {
            if latest.insert(request.id, request.size).is_none() {
                order.push(request.id);
            }
        }

        let mut applied = 0;
        for id in order {
            let Some(index) = self.index_of(id) else {
                continue;
            };
            let requested = latest.get(&id).copied().flatten();
            let managed = &mut self.items[index];
            managed.size = managed.clamp_bounds(requested.unwrap_or(managed.size));
            trace!(id = id.get(), index, size = managed.size, "size change applied");
            self.settle(&self.priorities().pin_last(index));
            applied += 1;
        }
        applied
    }

    fn finish_drag(&mut self) {
        self.drag_baseline.clear();
        self.save_proportions();
        self.events.did_sash_end.fire(());
        self.process_size_changes();
    }

    /// Structural changes invalidate the drag baseline.
    fn cancel_drag_for_mutation(&mut self) {
        if self.drag.force_cancel().is_some() {
            debug!("sash drag canceled by structural change");
            self.drag_baseline.clear();
            self.events.did_sash_end.fire(());
        }
    }

    fn insert_managed(&mut self, managed: ManagedItem, index: usize) -> usize {
        self.cancel_drag_for_mutation();
        let index = index.min(self.items.len());
        self.items.insert(index, managed);
        if self.items.len() > 1 {
            let sash = index.saturating_sub(1).min(self.sashes.len());
            self.sashes.insert(sash, Sash::default());
        }
        index
    }

    fn detach_managed(&mut self, index: usize) -> Option<ManagedItem> {
        if index >= self.items.len() {
            return None;
        }
        self.cancel_drag_for_mutation();
        let managed = self.items.remove(index);
        if let Some(last) = self.sashes.len().checked_sub(1) {
            self.sashes.remove(index.saturating_sub(1).min(last));
        }
        Some(managed)
    }

    fn priorities(&self) -> PriorityIndexes {
        PriorityIndexes::from_priorities(self.items.iter().map(|managed| managed.item.priority()))
    }

    /// Settle and commit.
    fn relayout(&mut self, order: &PriorityIndexes) {
        self.settle(order);
        self.commit();
    }

    /// Close the gap to the container through the last item, then absorb
    /// leftovers. Items are not laid out.
    fn settle(&mut self, order: &PriorityIndexes) {
        let span = debug_span!("splitview.settle", items = self.items.len(), size = self.size);
        let _guard = span.enter();

        if let Some(last) = self.items.len().checked_sub(1) {
            let delta = gap(u64::from(self.size), self.content_size());
            let (low, high) = order.resolved();
            self.resize(last, delta, None, Some(&low), Some(&high));
        }
        self.distribute_empty_space_toward(order.pinned);
    }

    /// Push sizes out to every item once and snapshot proportions.
    fn commit(&mut self) {
        self.layout_views();
        self.save_proportions();
    }

    fn layout_views(&mut self) {
        let orthogonal_size = self.orthogonal_size;
        self.placements.clear();
        let mut offset: u32 = 0;
        for managed in &mut self.items {
            self.placements.push(ItemPlacement {
                id: managed.id,
                offset,
                size: managed.size,
            });
            managed.item.layout(managed.size, orthogonal_size);
            offset = offset.saturating_add(managed.size);
        }

        let bounds: Vec<ItemBounds> = self.items.iter().map(ManagedItem::bounds).collect();
        let mut position: u32 = 0;
        for ((sash, state), managed) in self
            .sashes
            .iter_mut()
            .zip(sash_states(&bounds))
            .zip(&self.items)
        {
            position = position.saturating_add(managed.size);
            sash.update(position, state);
        }

        self.events.did_layout.fire(LayoutSnapshot {
            size: self.size,
            orthogonal_size,
            placements: self.placements.clone(),
        });
    }

    fn save_proportions(&mut self) {
        let sizes = self.item_sizes();
        self.proportions.save(&sizes);
    }
}
