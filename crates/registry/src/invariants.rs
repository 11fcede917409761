//! Protocol invariants checked against generated submission histories.

use proptest::prelude::*;

use crate::{Contribution, DeferredRegistry, MergedIndex};

const BUCKETS: &[&str] = &["pkgA", "pkgB", "com_rs"];

#[derive(Debug, Clone)]
enum Op {
	Submit(Contribution),
	Initialize,
}

fn contribution() -> impl Strategy<Value = Contribution> {
	(
		0..BUCKETS.len(),
		prop::collection::vec("[a-z]{1,6}", 0..4),
	)
		.prop_map(|(b, entries)| Contribution::new(BUCKETS[b], entries))
}

fn history() -> impl Strategy<Value = Vec<Op>> {
	prop::collection::vec(
		prop_oneof![
			6 => contribution().prop_map(Op::Submit),
			1 => Just(Op::Initialize),
		],
		0..40,
	)
}

/// Replays `ops` and finishes with one more initialization.
fn replay(ops: &[Op]) -> std::sync::Arc<MergedIndex> {
	let reg = DeferredRegistry::new();
	for op in ops {
		match op {
			Op::Submit(c) => {
				reg.submit(c.clone());
			}
			Op::Initialize => {
				reg.initialize();
			}
		}
	}
	reg.initialize();
	reg.merged_index()
}

fn submitted(ops: &[Op]) -> impl Iterator<Item = &Contribution> {
	ops.iter().filter_map(|op| match op {
		Op::Submit(c) => Some(c),
		Op::Initialize => None,
	})
}

/// Invariant: bucket contents equal the concatenation of submitted entries in call order,
/// whichever side of initialization each submission landed on.
fn inv_order_preservation(ops: &[Op]) {
	let index = replay(ops);
	for key in BUCKETS {
		let expected: Vec<&str> = submitted(ops)
			.filter(|c| c.bucket.as_str() == *key)
			.flat_map(|c| c.entries.iter().map(|e| e.as_str()))
			.collect();
		let actual: Vec<&str> = index
			.get(key)
			.map(|e| e.iter().map(|e| e.as_str()).collect())
			.unwrap_or_default();
		assert_eq!(actual, expected, "bucket {key}");
	}
}

#[test]
fn test_order_preservation() {
	proptest!(|(ops in history())| {
		inv_order_preservation(&ops);
	});
}

/// Invariant: every submitted contribution is merged exactly once.
fn inv_no_loss(ops: &[Op]) {
	let index = replay(ops);
	let contributions = submitted(ops).count();
	let entries: usize = submitted(ops).map(Contribution::len).sum();

	assert_eq!(index.contribution_count(), contributions);
	assert_eq!(index.entry_count(), entries);
	assert_eq!(index.iter().map(|(_, e)| e.len()).sum::<usize>(), entries);
}

#[test]
fn test_no_loss() {
	proptest!(|(ops in history())| {
		inv_no_loss(&ops);
	});
}

/// Invariant: extra initializations never change the resulting index.
fn inv_idempotent_initialization(ops: &[Op]) {
	let once = replay(ops);

	let mut doubled = Vec::with_capacity(ops.len() * 2);
	for op in ops {
		doubled.push(op.clone());
		if matches!(op, Op::Initialize) {
			doubled.push(Op::Initialize);
		}
	}

	assert_eq!(*replay(&doubled), *once);
}

#[test]
fn test_idempotent_initialization() {
	proptest!(|(ops in history())| {
		inv_idempotent_initialization(&ops);
	});
}

/// Invariant: moving the initialization point leaves the index unchanged when relative
/// submission order is fixed.
fn inv_late_vs_early_equivalence(contributions: &[Contribution], split: usize) {
	let split = split.min(contributions.len());

	let all_early: Vec<Op> = contributions.iter().cloned().map(Op::Submit).collect();

	let mut split_ops: Vec<Op> = contributions[..split].iter().cloned().map(Op::Submit).collect();
	split_ops.push(Op::Initialize);
	split_ops.extend(contributions[split..].iter().cloned().map(Op::Submit));

	assert_eq!(*replay(&split_ops), *replay(&all_early));
}

#[test]
fn test_late_vs_early_equivalence() {
	proptest!(|(
		contributions in prop::collection::vec(contribution(), 0..20),
		split in 0usize..20
	)| {
		inv_late_vs_early_equivalence(&contributions, split);
	});
}
