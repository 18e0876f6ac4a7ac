#![forbid(unsafe_code)]

//! Engine log macros.
//!
//! The layout engine logs settles and drags at `debug`, per-item absorption
//! at `trace`, and starvation at `warn`. With the `tracing` feature these
//! are the `tracing` macros. Without it they expand to nothing, and
//! `debug_span!` yields a [`NoopSpan`] so `span.enter()` still type-checks.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, trace, warn};

#[cfg(not(feature = "tracing"))]
mod disabled {
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Expands to [`NoopSpan`](crate::logging::NoopSpan).
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}

/// Stand-in for `tracing::Span`.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[must_use]
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }
}

#[cfg(not(feature = "tracing"))]
pub struct NoopGuard;

/// Install a JSON-formatting subscriber filtered by `RUST_LOG`.
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .is_ok()
}

#[cfg(all(test, not(feature = "tracing")))]
mod tests {
    #[test]
    fn disabled_macros_accept_structured_fields() {
        crate::debug!(count = 3, "message {}", 3);
        crate::trace!(index = 1, "trace");
        crate::warn!("starved");
        let span = crate::debug_span!("splitview.test", items = 2);
        let _guard = span.enter();
    }
}
