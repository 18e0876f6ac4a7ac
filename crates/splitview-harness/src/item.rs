//! Shared-state sizable item.

use std::cell::RefCell;
use std::rc::Rc;

use splitview_core::item::{LayoutPriority, SizableItem, SizeChangeNotifier};

#[derive(Debug)]
struct TestItemState {
    minimum: u32,
    maximum: Option<u32>,
    snap: Option<u32>,
    priority: LayoutPriority,
    visible: bool,
    layouts: Vec<(u32, u32)>,
    notifier: Option<SizeChangeNotifier>,
}

/// Item double. Clones share state, so a test keeps one clone as a handle
/// while the engine owns another.
#[derive(Debug, Clone)]
pub struct TestItem {
    state: Rc<RefCell<TestItemState>>,
}

impl TestItem {
    /// Unbounded item with the given minimum.
    #[must_use]
    pub fn new(minimum: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(TestItemState {
                minimum,
                maximum: None,
                snap: None,
                priority: LayoutPriority::Normal,
                visible: true,
                layouts: Vec::new(),
                notifier: None,
            })),
        }
    }

    #[must_use]
    pub fn with_maximum(self, maximum: u32) -> Self {
        self.state.borrow_mut().maximum = Some(maximum);
        self
    }

    #[must_use]
    pub fn with_snap(self, snap: u32) -> Self {
        self.state.borrow_mut().snap = Some(snap);
        self
    }

    #[must_use]
    pub fn with_priority(self, priority: LayoutPriority) -> Self {
        self.state.borrow_mut().priority = priority;
        self
    }

    /// A boxed clone for handing to the engine.
    #[must_use]
    pub fn boxed(&self) -> Box<dyn SizableItem> {
        Box::new(self.clone())
    }

    /// Change bounds without telling the engine. Pair with
    /// [`request_size`](Self::request_size)`(None)` to have them applied.
    pub fn set_bounds(&self, minimum: u32, maximum: Option<u32>) {
        let mut state = self.state.borrow_mut();
        state.minimum = minimum;
        state.maximum = maximum;
    }

    /// Report a size change through the attached notifier. Returns `false`
    /// when not attached.
    pub fn request_size(&self, size: Option<u32>) -> bool {
        self.state
            .borrow()
            .notifier
            .as_ref()
            .is_some_and(|notifier| notifier.request(size))
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.state
            .borrow()
            .notifier
            .as_ref()
            .is_some_and(SizeChangeNotifier::is_attached)
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    /// Last `(size, orthogonal_size)` received.
    #[must_use]
    pub fn last_layout(&self) -> Option<(u32, u32)> {
        self.state.borrow().layouts.last().copied()
    }

    #[must_use]
    pub fn layout_count(&self) -> usize {
        self.state.borrow().layouts.len()
    }

    pub fn clear_layouts(&self) {
        self.state.borrow_mut().layouts.clear();
    }
}

impl SizableItem for TestItem {
    fn minimum_size(&self) -> u32 {
        self.state.borrow().minimum
    }

    fn maximum_size(&self) -> Option<u32> {
        self.state.borrow().maximum
    }

    fn snap_size(&self) -> Option<u32> {
        self.state.borrow().snap
    }

    fn priority(&self) -> LayoutPriority {
        self.state.borrow().priority
    }

    fn layout(&mut self, size: u32, orthogonal_size: u32) {
        self.state.borrow_mut().layouts.push((size, orthogonal_size));
    }

    fn set_visible(&mut self, visible: bool) {
        self.state.borrow_mut().visible = visible;
    }

    fn attach(&mut self, notifier: SizeChangeNotifier) {
        self.state.borrow_mut().notifier = Some(notifier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let handle = TestItem::new(10).with_maximum(40).with_snap(5);
        let mut owned = handle.boxed();
        owned.layout(25, 7);
        owned.set_visible(false);
        assert_eq!(handle.last_layout(), Some((25, 7)));
        assert!(!handle.is_visible());
        assert_eq!(owned.maximum_size(), Some(40));
        assert_eq!(owned.snap_size(), Some(5));
    }

    #[test]
    fn unattached_item_cannot_request() {
        let item = TestItem::new(0);
        assert!(!item.is_attached());
        assert!(!item.request_size(Some(10)));
    }

    #[test]
    fn bounds_changes_are_visible_to_the_engine_side() {
        let handle = TestItem::new(10);
        let owned = handle.boxed();
        handle.set_bounds(30, Some(60));
        assert_eq!(owned.minimum_size(), 30);
        assert_eq!(owned.maximum_size(), Some(60));
    }
}
