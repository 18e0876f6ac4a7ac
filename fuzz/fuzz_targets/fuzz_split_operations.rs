#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use splitview_harness::{OpSizing, SplitOp, Workbench, check_invariants};
use splitview_layout::{LayoutPriority, Orientation, SplitViewOptions};

#[derive(Debug, Arbitrary)]
struct Session {
    vertical: bool,
    proportional: bool,
    ops: Vec<FuzzOp>,
}

#[derive(Debug, Arbitrary)]
enum FuzzOp {
    Add {
        minimum: u16,
        extra: Option<u16>,
        snap: Option<u8>,
        priority: u8,
        sizing: u8,
        index: Option<u8>,
    },
    Remove {
        index: u8,
        distribute: bool,
    },
    Move {
        from: u8,
        to: u8,
    },
    ResizeItem {
        index: u8,
        size: u16,
    },
    SetVisible {
        index: u8,
        visible: bool,
    },
    Layout {
        size: u16,
        orthogonal_size: u16,
    },
    Drag {
        sash_index: u8,
        delta: i16,
    },
    RequestSize {
        index: u8,
        size: Option<u16>,
    },
    DistributeViewSizes,
}

impl FuzzOp {
    fn into_op(self) -> SplitOp {
        match self {
            Self::Add {
                minimum,
                extra,
                snap,
                priority,
                sizing,
                index,
            } => {
                let minimum = u32::from(minimum);
                SplitOp::Add {
                    minimum,
                    maximum: extra.map(|extra| minimum + u32::from(extra)),
                    snap: snap.map(u32::from),
                    priority: match priority % 3 {
                        0 => LayoutPriority::Low,
                        1 => LayoutPriority::Normal,
                        _ => LayoutPriority::High,
                    },
                    sizing: match sizing % 4 {
                        0 => OpSizing::Exact {
                            size: u32::from(sizing) * 4,
                        },
                        1 => OpSizing::Split {
                            index: usize::from(sizing / 4),
                        },
                        2 => OpSizing::Distribute,
                        _ => OpSizing::Invisible {
                            cached_visible_size: u32::from(sizing),
                        },
                    },
                    index: index.map(usize::from),
                }
            }
            Self::Remove { index, distribute } => SplitOp::Remove {
                index: usize::from(index),
                distribute,
            },
            Self::Move { from, to } => SplitOp::Move {
                from: usize::from(from),
                to: usize::from(to),
            },
            Self::ResizeItem { index, size } => SplitOp::ResizeItem {
                index: usize::from(index),
                size: u32::from(size),
            },
            Self::SetVisible { index, visible } => SplitOp::SetVisible {
                index: usize::from(index),
                visible,
            },
            Self::Layout {
                size,
                orthogonal_size,
            } => SplitOp::Layout {
                size: u32::from(size),
                orthogonal_size: u32::from(orthogonal_size),
            },
            Self::Drag { sash_index, delta } => SplitOp::Drag {
                sash_index: usize::from(sash_index),
                delta: i32::from(delta),
            },
            Self::RequestSize { index, size } => SplitOp::RequestSize {
                index: usize::from(index),
                size: size.map(u32::from),
            },
            Self::DistributeViewSizes => SplitOp::DistributeViewSizes,
        }
    }
}

fuzz_target!(|session: Session| {
    let orientation = if session.vertical {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    };
    let options = SplitViewOptions::new(orientation).proportional_layout(session.proportional);
    let Ok(mut bench) = Workbench::with_options(options) else {
        return;
    };

    for op in session.ops.into_iter().take(256) {
        // Out-of-range indices are rejected or ignored; neither may corrupt state.
        let _ = bench.apply(&op.into_op());
        let view = bench.view();
        assert!(!view.is_dragging(), "drag left open");
        if let Err(violation) = check_invariants(view) {
            panic!("invariant broken: {violation}");
        }
        assert_eq!(view.sash_count(), view.len().saturating_sub(1));
    }
});
