#![forbid(unsafe_code)]

//! The sizable item contract.
//!
//! An engine never owns geometry of its own: it asks each item for its
//! bounds, decides a size, and hands that size back through
//! [`SizableItem::layout`]. Items that change their intrinsic size out of
//! band report it through a [`SizeChangeNotifier`], which enqueues a request
//! rather than calling back into the engine.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

/// Stable identifier for a managed item.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Lowest valid item ID.
    pub const MIN: Self = Self(1);

    /// Create a new item ID, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, ItemIdError> {
        if raw == 0 {
            return Err(ItemIdError::Zero);
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next ID, or an error on overflow.
    pub fn checked_next(self) -> Result<Self, ItemIdError> {
        let Some(next) = self.0.checked_add(1) else {
            return Err(ItemIdError::Overflow { current: self });
        };
        Self::new(next)
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Monotonic ID source owned by whoever creates items.
///
/// Each engine holds its own allocator unless the host passes one in, so two
/// engines never share mutable counter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemIdAllocator {
    next: ItemId,
}

impl ItemIdAllocator {
    /// Start allocating at [`ItemId::MIN`].
    #[must_use]
    pub const fn new() -> Self {
        Self { next: ItemId::MIN }
    }

    /// Start allocating at `next`.
    #[must_use]
    pub const fn starting_at(next: ItemId) -> Self {
        Self { next }
    }

    /// The ID the next call to [`allocate`](Self::allocate) returns.
    #[must_use]
    pub const fn peek(&self) -> ItemId {
        self.next
    }

    /// Hand out the next ID.
    pub fn allocate(&mut self) -> Result<ItemId, ItemIdError> {
        let current = self.next;
        self.next = current.checked_next()?;
        Ok(current)
    }
}

/// Item identifier errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemIdError {
    Zero,
    Overflow { current: ItemId },
}

impl fmt::Display for ItemIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "item id must be non-zero"),
            Self::Overflow { current } => write!(f, "item id overflow after {}", current.get()),
        }
    }
}

impl std::error::Error for ItemIdError {}

/// Order in which items absorb size changes.
///
/// `Low` items are resized first and so move the most; `High` items are
/// resized last and so move the least. `Normal` keeps positional order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPriority {
    Low,
    #[default]
    Normal,
    High,
}

/// Capability contract every managed item satisfies.
///
/// Sizes are measured along the engine's axis. `maximum_size` of `None` is
/// unbounded. Callers must keep `minimum_size <= maximum_size`.
pub trait SizableItem {
    /// Smallest size the item accepts while visible.
    fn minimum_size(&self) -> u32;

    /// Largest size the item accepts, or `None` for unbounded.
    fn maximum_size(&self) -> Option<u32>;

    /// Collapse threshold: proposed sizes below it snap to 0 instead of
    /// clamping up to the minimum.
    fn snap_size(&self) -> Option<u32> {
        None
    }

    /// Order in which this item absorbs size changes.
    fn priority(&self) -> LayoutPriority {
        LayoutPriority::Normal
    }

    /// Receive the allocated size and the orthogonal dimension.
    fn layout(&mut self, size: u32, orthogonal_size: u32);

    /// Hide/show hook for items that support it.
    fn set_visible(&mut self, _visible: bool) {}

    /// Receive the notifier through which the item reports its own size
    /// changes. Called once when the item is added.
    fn attach(&mut self, _notifier: SizeChangeNotifier) {}
}

/// One queued size-change report.
///
/// `size: None` means "my bounds changed, re-clamp my current size".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeChangeRequest {
    pub id: ItemId,
    pub size: Option<u32>,
}

type PendingQueue = RefCell<VecDeque<SizeChangeRequest>>;

/// Engine-owned FIFO of size-change requests.
#[derive(Debug, Default)]
pub struct SizeChangeQueue {
    pending: Rc<PendingQueue>,
}

impl SizeChangeQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a notifier for `id` plus the handle that keeps it attached.
    ///
    /// Dropping the handle detaches the notifier; later requests are ignored.
    #[must_use]
    pub fn notifier(&self, id: ItemId) -> (SizeChangeNotifier, NotifierHandle) {
        let attached = Rc::new(Cell::new(true));
        let notifier = SizeChangeNotifier {
            id,
            queue: Rc::downgrade(&self.pending),
            attached: Rc::clone(&attached),
        };
        (notifier, NotifierHandle { attached })
    }

    /// Take every pending request in arrival order.
    pub fn drain(&self) -> Vec<SizeChangeRequest> {
        self.pending.borrow_mut().drain(..).collect()
    }

    /// Drop pending requests for `id`.
    pub fn discard(&self, id: ItemId) {
        self.pending.borrow_mut().retain(|request| request.id != id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

/// Item-side end of the size-change channel.
#[derive(Debug, Clone)]
pub struct SizeChangeNotifier {
    id: ItemId,
    queue: Weak<PendingQueue>,
    attached: Rc<Cell<bool>>,
}

impl SizeChangeNotifier {
    /// The item this notifier reports for.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// Whether the owning engine still listens.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached.get() && self.queue.strong_count() > 0
    }

    /// Enqueue a size-change request. Returns `false` once detached.
    pub fn request(&self, size: Option<u32>) -> bool {
        if !self.attached.get() {
            return false;
        }
        let Some(queue) = self.queue.upgrade() else {
            return false;
        };
        queue.borrow_mut().push_back(SizeChangeRequest { id: self.id, size });
        true
    }
}

/// Engine-side subscription handle; detaches its notifier on drop.
#[derive(Debug)]
pub struct NotifierHandle {
    attached: Rc<Cell<bool>>,
}

impl Drop for NotifierHandle {
    fn drop(&mut self) {
        self.attached.set(false);
    }
}
