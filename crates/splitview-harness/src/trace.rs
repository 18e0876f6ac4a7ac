//! Golden layout traces.
//!
//! A trace is one JSON object per applied op:
//!
//! ```json
//! {"step":0,"op":{"op":"layout","size":300,"orthogonal_size":20},"size":300,"sizes":[],"sashes":[]}
//! ```
//!
//! The BLAKE3 digest of the JSONL text identifies a run; two runs of the
//! same op stream must produce the same digest.

use serde::Serialize;
use splitview_layout::{Sash, SplitView};

use crate::ops::{HarnessError, SplitOp, Workbench};

/// Checksum prefix so digests are self-describing in logs.
const CHECKSUM_PREFIX: &str = "blake3:";

/// Engine state after one op.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceStep {
    pub step: usize,
    pub op: SplitOp,
    pub size: u32,
    pub sizes: Vec<u32>,
    pub sashes: Vec<Sash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proportions: Option<Vec<f64>>,
}

impl TraceStep {
    #[must_use]
    pub fn capture(step: usize, op: SplitOp, view: &SplitView) -> Self {
        Self {
            step,
            op,
            size: view.size(),
            sizes: view.item_sizes(),
            sashes: view.sashes().to_vec(),
            proportions: view.proportions().map(<[f64]>::to_vec),
        }
    }
}

/// Ordered JSONL record of a run.
#[derive(Debug, Clone, Default)]
pub struct LayoutTrace {
    lines: Vec<String>,
}

impl LayoutTrace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply every op to `bench`, recording the state after each.
    pub fn run(bench: &mut Workbench, ops: &[SplitOp]) -> Result<Self, HarnessError> {
        let mut trace = Self::new();
        for (step, op) in ops.iter().enumerate() {
            bench.apply(op)?;
            trace.record(&TraceStep::capture(step, op.clone(), bench.view()))?;
        }
        Ok(trace)
    }

    pub fn record(&mut self, step: &TraceStep) -> Result<(), HarnessError> {
        let line =
            serde_json::to_string(step).map_err(|error| HarnessError::Trace(error.to_string()))?;
        self.lines.push(line);
        Ok(())
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn to_jsonl(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// BLAKE3 digest of [`to_jsonl`](Self::to_jsonl), prefixed `blake3:`.
    #[must_use]
    pub fn checksum(&self) -> String {
        let hash = blake3::hash(self.to_jsonl().as_bytes());
        format!("{CHECKSUM_PREFIX}{}", hash.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use splitview_core::geometry::Orientation;

    use super::*;

    #[test]
    fn empty_trace_has_stable_checksum() {
        let a = LayoutTrace::new();
        let b = LayoutTrace::new();
        assert_eq!(a.checksum(), b.checksum());
        assert!(a.checksum().starts_with(CHECKSUM_PREFIX));
        assert_eq!(a.to_jsonl(), "");
    }

    #[test]
    fn records_one_line_per_op() {
        let mut bench = Workbench::new(Orientation::Horizontal);
        let ops = [
            SplitOp::Layout {
                size: 120,
                orthogonal_size: 4,
            },
            SplitOp::DistributeViewSizes,
        ];
        let trace = LayoutTrace::run(&mut bench, &ops).expect("run");
        assert_eq!(trace.lines().len(), 2);
        assert!(trace.lines()[0].starts_with(r#"{"step":0,"op":{"op":"layout""#));
        assert!(trace.to_jsonl().ends_with('\n'));
    }
}
