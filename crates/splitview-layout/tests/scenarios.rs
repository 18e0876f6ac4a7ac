//! End-to-end allocation scenarios through the public API.
//!
//! Run with: `cargo test -p splitview-layout --test scenarios`

use std::cell::RefCell;
use std::rc::Rc;

use splitview_harness::TestItem;
use splitview_harness::ops::{check_invariants, pointer_at};
use splitview_layout::{
    ItemDescriptor, LayoutPriority, Orientation, SashPointerEvent, SashState, SizableItem, Sizing,
    SplitView, SplitViewDescriptor, SplitViewOptions,
};

fn distributed(size: u32, items: &[TestItem]) -> SplitView {
    let mut view = SplitView::new(Orientation::Horizontal);
    view.layout(size, 24);
    for item in items {
        view.add_item(item.boxed(), Sizing::Distribute, None, false)
            .expect("add");
    }
    view
}

fn drag(view: &mut SplitView, sash_index: usize, delta: i32) {
    let orientation = view.orientation();
    let start = i32::try_from(view.sashes()[sash_index].position()).expect("fits i32");
    view.handle_sash_event(&SashPointerEvent::Down {
        sash_index,
        pointer_id: 7,
        position: pointer_at(orientation, start),
    })
    .expect("down");
    view.handle_sash_event(&SashPointerEvent::Move {
        pointer_id: 7,
        position: pointer_at(orientation, start + delta),
    })
    .expect("move");
    view.handle_sash_event(&SashPointerEvent::Up {
        pointer_id: 7,
        position: pointer_at(orientation, start + delta),
    })
    .expect("up");
}

#[test]
fn three_equal_minimums_share_container_evenly() {
    let view = distributed(
        300,
        &[TestItem::new(50), TestItem::new(50), TestItem::new(50)],
    );
    assert_eq!(view.item_sizes(), vec![100, 100, 100]);
    let offsets: Vec<u32> = view.placements().iter().map(|p| p.offset).collect();
    assert_eq!(offsets, vec![0, 100, 200]);
}

#[test]
fn sash_drag_transfers_space_between_neighbours() {
    let mut view = distributed(200, &[TestItem::new(50), TestItem::new(50)]);
    assert_eq!(view.item_sizes(), vec![100, 100]);
    drag(&mut view, 0, 30);
    assert_eq!(view.item_sizes(), vec![130, 70]);
    assert_eq!(view.sashes()[0].position(), 130);
}

#[test]
fn sash_drag_is_clamped_by_following_minimum() {
    let mut view = distributed(200, &[TestItem::new(50), TestItem::new(90)]);
    assert_eq!(view.item_sizes(), vec![100, 100]);
    drag(&mut view, 0, 30);
    assert_eq!(view.item_sizes(), vec![110, 90]);
    assert_eq!(view.sashes()[0].state(), SashState::Maximum);
}

#[test]
fn container_growth_follows_saved_proportions() {
    let mut view = distributed(200, &[TestItem::new(50), TestItem::new(50)]);
    assert_eq!(view.proportions(), Some(&[0.5, 0.5][..]));
    view.layout(400, 24);
    assert_eq!(view.item_sizes(), vec![200, 200]);
}

#[test]
fn dragged_ratio_survives_container_resizes() {
    let mut view = distributed(200, &[TestItem::new(50), TestItem::new(50)]);
    drag(&mut view, 0, 30);
    view.layout(400, 24);
    assert_eq!(view.item_sizes(), vec![260, 140]);
    view.layout(200, 24);
    assert_eq!(view.item_sizes(), vec![130, 70]);
}

#[test]
fn restored_layout_scales_on_first_layout() {
    let options = SplitViewOptions::new(Orientation::Vertical).descriptor(SplitViewDescriptor {
        size: 400,
        items: vec![
            ItemDescriptor::visible(100),
            ItemDescriptor::hidden(80),
            ItemDescriptor::visible(300),
        ],
    });
    let panes = [TestItem::new(20), TestItem::new(20), TestItem::new(20)];
    let mut view = SplitView::from_descriptor(options, panes.iter().map(TestItem::boxed).collect())
        .expect("descriptor");
    assert_eq!(view.item_sizes(), vec![100, 0, 300]);
    assert!(!panes[1].is_visible());

    view.layout(800, 30);
    assert_eq!(view.item_sizes(), vec![200, 0, 600]);
    assert_eq!(panes[2].last_layout(), Some((600, 30)));

    view.set_item_visible(1, true);
    assert_eq!(view.item_sizes(), vec![200, 80, 520]);
}

#[test]
fn high_priority_item_absorbs_last() {
    let options = SplitViewOptions::new(Orientation::Horizontal)
        .proportional_layout(false)
        .descriptor(SplitViewDescriptor {
            size: 300,
            items: vec![ItemDescriptor::visible(100); 3],
        });
    let items = vec![
        TestItem::new(10).boxed(),
        TestItem::new(10).boxed(),
        TestItem::new(10).with_priority(LayoutPriority::High).boxed(),
    ];
    let mut view = SplitView::from_descriptor(options, items).expect("descriptor");
    view.layout(360, 24);
    assert_eq!(view.item_sizes(), vec![100, 160, 100]);
    view.layout(240, 24);
    assert_eq!(view.item_sizes(), vec![100, 40, 100]);
}

#[test]
fn collapsing_item_snaps_shut_and_reopens() {
    let sidebar = TestItem::new(60).with_snap(30);
    let mut view = distributed(300, &[sidebar.clone(), TestItem::new(60)]);
    assert_eq!(view.item_sizes(), vec![150, 150]);

    drag(&mut view, 0, -130);
    assert_eq!(view.item_sizes(), vec![0, 300]);
    assert_eq!(view.sashes()[0].state(), SashState::Minimum);

    drag(&mut view, 0, 80);
    assert_eq!(view.item_sizes(), vec![80, 220]);
    assert_eq!(sidebar.last_layout(), Some((80, 24)));
}

#[test]
fn collapse_is_refused_when_neighbour_is_capped() {
    let sidebar = TestItem::new(50).with_snap(25);
    let mut view = distributed(200, &[sidebar.clone(), TestItem::new(0).with_maximum(180)]);
    assert_eq!(view.item_sizes(), vec![100, 100]);

    drag(&mut view, 0, -80);
    assert_eq!(view.item_sizes(), vec![50, 150]);
    assert_eq!(view.content_size(), 200);
    check_invariants(&view).expect("invariants after drag");
    assert_eq!(sidebar.last_layout(), Some((50, 24)));

    view.layout(200, 24);
    assert_eq!(view.item_sizes(), vec![50, 150]);
    check_invariants(&view).expect("invariants after layout");
}

#[test]
fn distributed_insert_lays_out_each_item_once() {
    let first = TestItem::new(20);
    let mut view = distributed(300, &[first.clone()]);
    first.clear_layouts();
    let second = TestItem::new(20);
    view.add_item(second.boxed(), Sizing::Distribute, None, false)
        .expect("add");
    assert_eq!(view.item_sizes(), vec![150, 150]);
    assert_eq!(first.layout_count(), 1);
    assert_eq!(second.layout_count(), 1);
}

#[test]
fn events_report_structure_and_layout() {
    let added = Rc::new(RefCell::new(Vec::new()));
    let removed = Rc::new(RefCell::new(Vec::new()));
    let mut view = SplitView::new(Orientation::Horizontal);
    {
        let added = Rc::clone(&added);
        view.events_mut()
            .did_add_item
            .subscribe(move |id| added.borrow_mut().push(*id));
        let removed = Rc::clone(&removed);
        view.events_mut()
            .did_remove_item
            .subscribe(move |id| removed.borrow_mut().push(*id));
    }
    view.layout(100, 10);
    let first = view
        .add_item(TestItem::new(0).boxed(), Sizing::Distribute, None, false)
        .expect("add");
    let second = view
        .add_item(TestItem::new(0).boxed(), Sizing::Distribute, Some(0), false)
        .expect("add");
    assert_eq!(view.item_ids(), vec![second, first]);
    view.remove_item(1, None);

    assert_eq!(*added.borrow(), vec![first, second]);
    assert_eq!(*removed.borrow(), vec![first]);
    let snapshot = view.events().did_layout.last().expect("layout fired");
    assert_eq!(snapshot.placements.len(), 1);
    assert_eq!(snapshot.placements[0].size, 100);
}

#[test]
fn bounds_change_is_applied_on_next_layout() {
    let panel = TestItem::new(20);
    let mut view = distributed(300, &[panel.clone(), TestItem::new(20)]);
    panel.set_bounds(200, None);
    assert!(panel.request_size(None));
    view.layout(300, 24);
    assert_eq!(view.item_sizes(), vec![200, 100]);
}

#[test]
fn removed_item_is_handed_back_and_detached() {
    let panel = TestItem::new(20);
    let mut view = distributed(300, &[TestItem::new(20), panel.clone()]);
    assert!(panel.is_attached());
    let item = view.remove_item(1, None).expect("in range");
    assert_eq!(item.minimum_size(), 20);
    assert!(!panel.is_attached());
    assert_eq!(view.item_sizes(), vec![300]);
    assert_eq!(view.sash_count(), 0);
}
