//! Processing order for size redistribution.
//!
//! Every pass that spreads a delta across several items walks them in some
//! order and lets each absorb what its bounds allow. The order decides who
//! moves: earlier items absorb first. `Low` priority items are pulled to the
//! front, `High` priority items pushed to the back, and a single *pinned*
//! index (the item the caller just sized explicitly) goes last of all.

use splitview_core::item::LayoutPriority;

/// Move `value` to the front of `list` if present.
pub(crate) fn push_to_start(list: &mut Vec<usize>, value: usize) {
    if let Some(position) = list.iter().position(|&entry| entry == value) {
        list.remove(position);
        list.insert(0, value);
    }
}

/// Move `value` to the back of `list` if present.
pub(crate) fn push_to_end(list: &mut Vec<usize>, value: usize) {
    if let Some(position) = list.iter().position(|&entry| entry == value) {
        list.remove(position);
        list.push(value);
    }
}

/// Priority buckets used to reorder one side of a resize.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityIndexes {
    /// Indexes that absorb first.
    pub low: Vec<usize>,
    /// Indexes that absorb last.
    pub high: Vec<usize>,
    /// Index that absorbs after everything else.
    pub pinned: Option<usize>,
}

impl PriorityIndexes {
    /// Bucket positions by their declared priority.
    pub fn from_priorities(priorities: impl IntoIterator<Item = LayoutPriority>) -> Self {
        let mut indexes = Self::default();
        for (index, priority) in priorities.into_iter().enumerate() {
            match priority {
                LayoutPriority::Low => indexes.low.push(index),
                LayoutPriority::High => indexes.high.push(index),
                LayoutPriority::Normal => {}
            }
        }
        indexes
    }

    /// Pin `index` to absorb last.
    #[must_use]
    pub fn pin_last(mut self, index: usize) -> Self {
        self.pinned = Some(index);
        self
    }

    /// Flatten into `(low, high)` lists with the pinned index moved to the
    /// very end of `high`.
    #[must_use]
    pub fn resolved(&self) -> (Vec<usize>, Vec<usize>) {
        let Some(pinned) = self.pinned else {
            return (self.low.clone(), self.high.clone());
        };
        let low = self.low.iter().copied().filter(|&i| i != pinned).collect();
        let mut high: Vec<usize> = self.high.iter().copied().filter(|&i| i != pinned).collect();
        high.push(pinned);
        (low, high)
    }

    /// Reorder `order` in place.
    pub fn apply(&self, order: &mut Vec<usize>) {
        let (low, high) = self.resolved();
        apply_priority_order(order, &low, &high);
    }
}

/// Pull `low` to the front and push `high` to the back, keeping the relative
/// order of everything else. An index listed in both ends up at the front.
pub fn apply_priority_order(order: &mut Vec<usize>, low: &[usize], high: &[usize]) {
    for &index in high {
        push_to_end(order, index);
    }
    for &index in low.iter().rev() {
        push_to_start(order, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_helpers_ignore_missing_values() {
        let mut list = vec![3, 2, 1];
        push_to_start(&mut list, 9);
        push_to_end(&mut list, 9);
        assert_eq!(list, vec![3, 2, 1]);
        push_to_end(&mut list, 3);
        assert_eq!(list, vec![2, 1, 3]);
        push_to_start(&mut list, 1);
        assert_eq!(list, vec![1, 2, 3]);
    }

    #[test]
    fn low_first_high_last() {
        let mut order = vec![4, 3, 2, 1, 0];
        apply_priority_order(&mut order, &[1, 0], &[3]);
        assert_eq!(order, vec![1, 0, 4, 2, 3]);
    }

    #[test]
    fn from_priorities_buckets_by_position() {
        let indexes = PriorityIndexes::from_priorities([
            LayoutPriority::High,
            LayoutPriority::Normal,
            LayoutPriority::Low,
            LayoutPriority::High,
        ]);
        assert_eq!(indexes.low, vec![2]);
        assert_eq!(indexes.high, vec![0, 3]);
        assert_eq!(indexes.pinned, None);
    }

    #[test]
    fn pinned_index_goes_after_high_priority() {
        let indexes = PriorityIndexes::from_priorities([
            LayoutPriority::High,
            LayoutPriority::Normal,
            LayoutPriority::Normal,
        ])
        .pin_last(1);
        let mut order = vec![2, 1, 0];
        indexes.apply(&mut order);
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn pinned_low_priority_item_still_goes_last() {
        let indexes = PriorityIndexes::from_priorities([
            LayoutPriority::Low,
            LayoutPriority::Normal,
        ])
        .pin_last(0);
        assert_eq!(indexes.resolved(), (vec![], vec![0]));
        let mut order = vec![1, 0];
        indexes.apply(&mut order);
        assert_eq!(order, vec![1, 0]);
    }
}
