#![forbid(unsafe_code)]

//! Core: the boundary between the splitview engine and the items it sizes.
//!
//! # Role in splitview
//! `splitview-core` owns the vocabulary every other crate speaks: the
//! [`SizableItem`](item::SizableItem) capability contract, stable item
//! identifiers, the per-instance [`Emitter`](event::Emitter) observer list,
//! the size-change notification queue, and axis geometry.
//!
//! # How it fits in the system
//! `splitview-layout` consumes these types to run the allocation engine and
//! the divider drag controller. Hosts implement `SizableItem` for whatever
//! they render (a DOM node, a terminal widget, a test double) and never see
//! the engine's internal bookkeeping.

pub mod event;
pub mod geometry;
pub mod item;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};
