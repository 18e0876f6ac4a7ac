//! Choosing which snapping items stay open.
//!
//! A snapping item may sit at 0 or anywhere in `[minimum, maximum]`; every
//! other item only in its range. When greedy absorption leaves a gap, the
//! engine asks [`plan_open_items`] for an open/collapsed assignment whose
//! ranges can sum to the container exactly, then absorbs again.

/// Give up past this many disjoint reachable spans.
const MAX_SPANS: usize = 64;

/// What the planner needs to know about one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CollapseCandidate {
    pub minimum: u64,
    pub maximum: u64,
    /// Visible and snapping: 0 is a legal size.
    pub collapsible: bool,
    /// Currently collapsed; the plan keeps it that way when it can.
    pub collapsed: bool,
    pub size: u64,
}

/// Sort and merge touching or overlapping spans.
fn merge_spans(mut spans: Vec<(u64, u64)>) -> Vec<(u64, u64)> {
    spans.sort_unstable();
    let mut merged: Vec<(u64, u64)> = Vec::with_capacity(spans.len());
    for (lo, hi) in spans {
        match merged.last_mut() {
            Some(last) if lo <= last.1.saturating_add(1) => last.1 = last.1.max(hi),
            _ => merged.push((lo, hi)),
        }
    }
    merged
}

fn spans_contain(spans: &[(u64, u64)], value: u64) -> bool {
    spans.iter().any(|&(lo, hi)| lo <= value && value <= hi)
}

/// Share in `[minimum, maximum]` that leaves a prefix-reachable remainder,
/// closest to `current`.
fn open_share(prefix: &[(u64, u64)], target: u64, item: &CollapseCandidate) -> Option<u64> {
    prefix
        .iter()
        .filter(|&&(lo, _)| lo <= target)
        .filter_map(|&(lo, hi)| {
            let low = item.minimum.max(target.saturating_sub(hi));
            let high = item.maximum.min(target - lo);
            (low <= high).then(|| item.size.clamp(low, high))
        })
        .min_by_key(|&share| share.abs_diff(item.size))
}

/// One flag per item: `true` when it should be open.
///
/// `None` when no assignment fills `target`, or the search grew past
/// [`MAX_SPANS`].
pub(crate) fn plan_open_items(items: &[CollapseCandidate], target: u64) -> Option<Vec<bool>> {
    let mut reachable: Vec<Vec<(u64, u64)>> = Vec::with_capacity(items.len() + 1);
    reachable.push(vec![(0, 0)]);
    for item in items {
        let prefix = reachable.last()?;
        let mut next: Vec<(u64, u64)> = prefix
            .iter()
            .map(|&(lo, hi)| (lo + item.minimum, hi + item.maximum))
            .collect();
        if item.collapsible {
            next.extend_from_slice(prefix);
        }
        let next = merge_spans(next);
        if next.len() > MAX_SPANS {
            return None;
        }
        reachable.push(next);
    }
    if !spans_contain(reachable.last()?, target) {
        return None;
    }

    let mut remaining = target;
    let mut open = vec![true; items.len()];
    for (index, item) in items.iter().enumerate().rev() {
        let prefix = &reachable[index];
        let closed = (item.collapsible && spans_contain(prefix, remaining)).then_some((false, 0));
        let opened = open_share(prefix, remaining, item).map(|share| (true, share));
        let (is_open, share) = if item.collapsed {
            closed.or(opened)?
        } else {
            opened.or(closed)?
        };
        open[index] = is_open;
        remaining -= share;
    }
    Some(open)
}
