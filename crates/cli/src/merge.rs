//! Loads fragment files concurrently and merges them through one registry.
//!
//! Every file is read by its own task and reads complete in whatever order the blocking pool
//! finishes them. Parsed fragments are then submitted strictly in the order the files were given.
//! The coordinator's initialization is a separate task that waits until the first `init_after`
//! fragments have been handed over, so those are buffered and the rest are delivered directly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use implreg_fragment::Fragment;
use implreg_registry::{DeferredRegistry, Delivery, Initialization, MergedIndex};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

/// Result of merging one group of fragments.
#[derive(Debug)]
pub struct MergeReport {
	pub index: Arc<MergedIndex>,
	/// Fragments parsed and submitted.
	pub loaded: usize,
	/// Fragments skipped because they could not be read or parsed.
	pub failed: usize,
	/// Contributions submitted before the coordinator was ready.
	pub buffered: usize,
	/// Contributions delivered directly.
	pub direct: usize,
	/// Contributions the coordinator refused.
	pub rejected: usize,
}

impl MergeReport {
	fn record(&mut self, deliveries: Vec<Delivery>) {
		self.loaded += 1;
		for delivery in deliveries {
			match delivery {
				Delivery::Buffered { .. } => self.buffered += 1,
				Delivery::Delivered(_) => self.direct += 1,
				Delivery::Rejected(_) => self.rejected += 1,
			}
		}
	}

	async fn await_coordinator(&mut self, coordinator: &mut Option<JoinHandle<Initialization>>) {
		let Some(handle) = coordinator.take() else {
			return;
		};
		match handle.await {
			Ok(Initialization::Drained { rejected, .. }) => self.rejected += rejected,
			Ok(_) => {}
			Err(err) => tracing::error!(error = %err, "merge.coordinator.join_failed"),
		}
	}
}

/// Merges `files` into a fresh registry, submitting them in the given order.
///
/// `init_after` is clamped to the number of files; `None` initializes after the last one.
pub async fn merge_files(files: Vec<PathBuf>, init_after: Option<usize>) -> MergeReport {
	let registry = Arc::new(DeferredRegistry::new());
	let count = files.len();
	let threshold = init_after.unwrap_or(count).min(count);
	let (arrived_tx, mut arrived_rx) = watch::channel(0usize);

	let mut coordinator = Some({
		let registry = Arc::clone(&registry);
		tokio::spawn(async move {
			if arrived_rx.wait_for(|n| *n >= threshold).await.is_err() {
				tracing::debug!("merge.coordinator.senders_gone");
			}
			registry.initialize()
		})
	});

	let mut reads = JoinSet::new();
	let mut read_index = HashMap::with_capacity(count);
	for (index, path) in files.into_iter().enumerate() {
		let handle = reads.spawn(async move { (index, load_fragment(&path).await) });
		read_index.insert(handle.id(), index);
	}

	let mut report = MergeReport {
		index: Arc::default(),
		loaded: 0,
		failed: 0,
		buffered: 0,
		direct: 0,
		rejected: 0,
	};

	// `slots[i]` is `Some` once file `i` has been read; the inner `None` marks a failed read.
	let mut slots: Vec<Option<Option<Fragment>>> = (0..count).map(|_| None).collect();
	let mut next = 0;

	while let Some(joined) = reads.join_next_with_id().await {
		let (index, fragment) = match joined {
			Ok((_, read)) => read,
			Err(err) => {
				tracing::error!(error = %err, "merge.task.join_failed");
				match read_index.get(&err.id()) {
					Some(&index) => (index, None),
					None => continue,
				}
			}
		};
		slots[index] = Some(fragment);

		while let Some(fragment) = slots.get_mut(next).and_then(Option::take) {
			if next == threshold {
				report.await_coordinator(&mut coordinator).await;
			}
			match fragment {
				Some(fragment) => report.record(fragment.submit(&registry)),
				None => report.failed += 1,
			}
			next += 1;
			arrived_tx.send_modify(|n| *n += 1);
		}
	}
	drop(arrived_tx);
	report.await_coordinator(&mut coordinator).await;

	// Covers a coordinator task that panicked before initializing.
	if let Initialization::Drained { rejected, .. } = registry.initialize() {
		report.rejected += rejected;
	}

	report.index = registry.merged_index();
	tracing::debug!(
		loaded = report.loaded,
		failed = report.failed,
		buffered = report.buffered,
		direct = report.direct,
		rejected = report.rejected,
		"merge.done"
	);
	report
}

async fn load_fragment(path: &Path) -> Option<Fragment> {
	let source = match tokio::fs::read_to_string(path).await {
		Ok(source) => source,
		Err(err) => {
			tracing::warn!(path = %path.display(), error = %err, "merge.fragment.read_failed");
			return None;
		}
	};
	match Fragment::parse(&source) {
		Ok(fragment) => {
			tracing::trace!(
				path = %path.display(),
				contributions = fragment.contributions.len(),
				entries = fragment.entry_count(),
				"merge.fragment.parsed"
			);
			Some(fragment)
		}
		Err(err) => {
			tracing::warn!(path = %path.display(), error = %err, "merge.fragment.parse_failed");
			None
		}
	}
}

#[cfg(test)]
mod tests;
