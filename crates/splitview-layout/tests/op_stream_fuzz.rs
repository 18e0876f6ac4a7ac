//! Property/fuzz-style invariants for random operation streams.
//!
//! Every public mutation is drawn from a seeded generator and applied to a
//! workbench; the allocation invariants are checked after each step and the
//! whole run must replay to the same trace checksum.

use proptest::prelude::*;
use splitview_harness::{LayoutTrace, Lcg, SplitOp, TraceStep, Workbench, check_invariants};
use splitview_layout::{Orientation, SplitViewOptions};

fn run_sequence(seed: u64, steps: usize, proportional: bool) -> (LayoutTrace, Vec<SplitOp>) {
    let options = SplitViewOptions::new(Orientation::Horizontal).proportional_layout(proportional);
    let mut bench = Workbench::with_options(options).expect("options");
    let mut rng = Lcg::new(seed);
    let mut trace = LayoutTrace::new();
    let mut applied = Vec::with_capacity(steps);

    for step in 0..steps {
        let op = SplitOp::random(bench.view(), &mut rng);
        let outcome = bench.apply(&op);
        assert!(
            outcome.is_ok(),
            "op failed at step {step}, seed={seed}, op={op:?}, err={outcome:?}"
        );
        if let Err(violation) = check_invariants(bench.view()) {
            panic!("invariant broken at step {step}, seed={seed}, op={op:?}: {violation}");
        }
        assert!(!bench.view().is_dragging());
        trace
            .record(&TraceStep::capture(step, op.clone(), bench.view()))
            .expect("record");
        applied.push(op);
    }

    (trace, applied)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_operation_sequences_preserve_invariants(
        seed in any::<u64>(),
        steps in 20usize..120,
        proportional in any::<bool>(),
    ) {
        run_sequence(seed, steps, proportional);
    }

    #[test]
    fn random_operation_sequences_replay_deterministically(
        seed in any::<u64>(),
        steps in 20usize..80,
    ) {
        let (first, operations) = run_sequence(seed, steps, true);

        let mut bench = Workbench::new(Orientation::Horizontal);
        let replay = LayoutTrace::run(&mut bench, &operations).expect("replay");
        prop_assert_eq!(replay.checksum(), first.checksum());
    }
}

#[test]
fn fuzz_seed_corpus_preserves_invariants() {
    let seeds = [
        0_u64,
        1,
        2,
        3,
        5,
        8,
        13,
        21,
        34,
        55,
        89,
        144,
        u32::MAX as u64,
        (u32::MAX as u64) + 1,
        u64::MAX - 1,
        u64::MAX,
    ];

    for seed in seeds {
        run_sequence(seed, 180, true);
        run_sequence(seed, 180, false);
    }
}
