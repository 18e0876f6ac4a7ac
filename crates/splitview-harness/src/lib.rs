#![forbid(unsafe_code)]

//! Test harness for splitview.
//!
//! - [`item::TestItem`]: a sizable item whose bounds can be changed from the
//!   outside and which records every size it is handed.
//! - [`ops`]: a serializable operation vocabulary, a seeded generator, and an
//!   invariant checker for operation-stream testing.
//! - [`trace`]: JSONL layout traces with BLAKE3 checksums for determinism
//!   checks.

pub mod item;
pub mod ops;
pub mod trace;

pub use item::TestItem;
pub use ops::{
    HarnessError, InvariantViolation, Lcg, OpSizing, SplitOp, Workbench, check_invariants,
    fill_is_feasible,
};
pub use trace::{LayoutTrace, TraceStep};
