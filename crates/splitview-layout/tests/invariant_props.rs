//! Property tests for the allocation invariants.

use proptest::prelude::*;
use splitview_harness::{TestItem, check_invariants};
use splitview_layout::{
    ItemDescriptor, Orientation, Sizing, SplitView, SplitViewDescriptor, SplitViewOptions,
};

/// `(minimum, maximum)` pairs; the first item is always unbounded so the
/// container can be filled.
fn bounds_strategy() -> impl Strategy<Value = Vec<(u32, Option<u32>)>> {
    prop::collection::vec((0u32..60, prop::option::of(0u32..200)), 1..7).prop_map(|mut items| {
        items[0].1 = None;
        items
            .into_iter()
            .map(|(minimum, extra)| (minimum, extra.map(|extra| minimum + extra)))
            .collect()
    })
}

fn build(size: u32, bounds: &[(u32, Option<u32>)]) -> SplitView {
    let mut view = SplitView::new(Orientation::Horizontal);
    view.layout(size, 16);
    for &(minimum, maximum) in bounds {
        let mut item = TestItem::new(minimum);
        if let Some(maximum) = maximum {
            item = item.with_maximum(maximum);
        }
        view.add_item(item.boxed(), Sizing::Distribute, None, false)
            .expect("add");
    }
    view
}

fn minimum_total(bounds: &[(u32, Option<u32>)]) -> u32 {
    bounds.iter().map(|&(minimum, _)| minimum).sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn layout_fills_container_within_bounds(
        bounds in bounds_strategy(),
        initial in 0u32..1000,
        next in 0u32..1000,
    ) {
        let mut view = build(initial, &bounds);
        prop_assert!(check_invariants(&view).is_ok(), "{:?}", check_invariants(&view));
        view.layout(next, 16);
        prop_assert!(check_invariants(&view).is_ok(), "{:?}", check_invariants(&view));
        if minimum_total(&bounds) <= next {
            prop_assert_eq!(view.content_size(), u64::from(next));
        }
    }

    #[test]
    fn finite_maximums_fill_when_capacity_allows(
        count in 1usize..6,
        minimum in 0u32..40,
        extra in 0u32..100,
        size in 0u32..800,
    ) {
        let maximum = minimum + extra;
        let mut view = SplitView::new(Orientation::Vertical);
        view.layout(size, 8);
        for _ in 0..count {
            view.add_item(
                TestItem::new(minimum).with_maximum(maximum).boxed(),
                Sizing::Distribute,
                None,
                false,
            )
            .expect("add");
        }
        let count = u64::from(u32::try_from(count).expect("small"));
        let size64 = u64::from(size);
        if count * u64::from(minimum) <= size64 && size64 <= count * u64::from(maximum) {
            prop_assert_eq!(view.content_size(), size64);
        }
        prop_assert!(check_invariants(&view).is_ok());
    }

    #[test]
    fn resize_then_inverse_restores_sizes(
        sizes in prop::collection::vec(100u32..300, 2..7),
        pivot in any::<prop::sample::Index>(),
        delta in -50i64..=50,
    ) {
        let total: u32 = sizes.iter().sum();
        let options = SplitViewOptions::new(Orientation::Horizontal).descriptor(SplitViewDescriptor {
            size: total,
            items: sizes.iter().map(|&size| ItemDescriptor::visible(size)).collect(),
        });
        let items = sizes.iter().map(|_| TestItem::new(0).boxed()).collect();
        let mut view = SplitView::from_descriptor(options, items).expect("descriptor");
        let index = pivot.index(sizes.len());

        let applied = view.resize(index, delta, None, None, None);
        prop_assert_eq!(applied, delta);
        view.resize(index, -delta, None, None, None);
        prop_assert_eq!(view.item_sizes(), sizes);
    }

    #[test]
    fn add_then_remove_without_layout_is_neutral(
        bounds in bounds_strategy(),
        size in 0u32..800,
        incoming in 0u32..300,
        position in any::<prop::sample::Index>(),
    ) {
        prop_assume!(minimum_total(&bounds) <= size);
        let mut view = build(size, &bounds);
        let before = view.item_sizes();
        let sashes = view.sash_count();

        let index = position.index(view.len() + 1);
        view.add_item(TestItem::new(0).boxed(), Sizing::Exact(incoming), Some(index), true)
            .expect("add");
        prop_assert_eq!(view.sash_count(), sashes + 1);
        prop_assert!(view.remove_item(index, None).is_some());

        prop_assert_eq!(view.item_sizes(), before);
        prop_assert_eq!(view.sash_count(), sashes);
    }

    #[test]
    fn distribute_view_sizes_is_idempotent(
        bounds in bounds_strategy(),
        size in 0u32..900,
    ) {
        prop_assume!(minimum_total(&bounds) <= size);
        let mut view = build(size, &bounds);
        view.distribute_view_sizes();
        let once = view.item_sizes();
        view.distribute_view_sizes();
        prop_assert_eq!(view.item_sizes(), once);
    }

    #[test]
    fn drag_keeps_total_and_bounds(
        bounds in bounds_strategy(),
        size in 0u32..900,
        moves in prop::collection::vec(-300i32..300, 1..6),
    ) {
        prop_assume!(bounds.len() > 1 && minimum_total(&bounds) <= size);
        let mut view = build(size, &bounds);
        let sash = view.sash_count() - 1;
        let start = i32::try_from(view.sashes()[sash].position()).expect("fits");
        let down = splitview_layout::SashPointerEvent::Down {
            sash_index: sash,
            pointer_id: 1,
            position: splitview_layout::PointerPosition::new(start, 0),
        };
        view.handle_sash_event(&down).expect("down");
        for offset in moves {
            let event = splitview_layout::SashPointerEvent::Move {
                pointer_id: 1,
                position: splitview_layout::PointerPosition::new(start + offset, 0),
            };
            view.handle_sash_event(&event).expect("move");
            prop_assert_eq!(view.content_size(), u64::from(size));
        }
        view.handle_sash_event(&splitview_layout::SashPointerEvent::Cancel { pointer_id: None })
            .expect("cancel");
        prop_assert!(!view.is_dragging());
        prop_assert!(check_invariants(&view).is_ok(), "{:?}", check_invariants(&view));
    }
}
