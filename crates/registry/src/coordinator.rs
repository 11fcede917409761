//! Single consumer owning the merged index.
//!
//! # Role
//!
//! The coordinator is the direct-delivery path: every contribution that reaches the index goes
//! through [`Coordinator::register`], whether it was drained from the pending buffer or delivered
//! straight from a producer.
//!
//! # Concurrency
//!
//! - **Reads:** Wait-free (atomic load of the current snapshot).
//! - **Writes:** Lock-free with linearizability (CAS retry loop on registration).

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::RwLock;

use crate::contribution::{BucketKey, Contribution};
use crate::error::ContributionError;
use crate::merged::MergedIndex;
use crate::observer::IndexObserver;

/// Outcome of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merge {
	/// Bucket that received the entries.
	pub bucket: BucketKey,
	/// Entries appended by this contribution.
	pub added: usize,
	/// Bucket length after the merge.
	pub bucket_len: usize,
}

/// Owner of the merged index.
pub struct Coordinator {
	snap: ArcSwap<MergedIndex>,
	observers: RwLock<Vec<Arc<dyn IndexObserver>>>,
}

impl Default for Coordinator {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for Coordinator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let snap = self.snap.load();
		f.debug_struct("Coordinator")
			.field("buckets", &snap.len())
			.field("entries", &snap.entry_count())
			.field("observers", &self.observers.read().len())
			.finish()
	}
}

impl Coordinator {
	/// Creates a coordinator with an empty index.
	pub fn new() -> Self {
		Self {
			snap: ArcSwap::from_pointee(MergedIndex::new()),
			observers: RwLock::new(Vec::new()),
		}
	}

	/// Adds an observer notified after every merge.
	pub fn observe<O>(&self, observer: O)
	where
		O: IndexObserver + 'static,
	{
		self.observers.write().push(Arc::new(observer));
	}

	/// Returns the current read-only snapshot.
	pub fn snapshot(&self) -> Arc<MergedIndex> {
		self.snap.load_full()
	}

	/// Appends a contribution to its bucket.
	///
	/// Rejected contributions are logged and leave the index untouched.
	pub fn register(&self, contribution: Contribution) -> Result<Merge, ContributionError> {
		if let Err(err) = contribution.bucket.validate() {
			tracing::warn!(
				bucket = ?contribution.bucket.as_str(),
				entries = contribution.len(),
				error = %err,
				"registry.register.rejected"
			);
			return Err(err);
		}

		let published = loop {
			let old = self.snap.load_full();
			let new = Arc::new(old.merged_with(&contribution));
			let prev = self.snap.compare_and_swap(&old, Arc::clone(&new));
			if Arc::ptr_eq(&prev, &old) {
				break new;
			}
			// CAS failed, retry against the newer snapshot
		};

		let merge = Merge {
			added: contribution.len(),
			bucket_len: published.get(contribution.bucket.as_str()).map_or(0, <[_]>::len),
			bucket: contribution.bucket,
		};
		tracing::trace!(
			bucket = %merge.bucket,
			added = merge.added,
			bucket_len = merge.bucket_len,
			"registry.register.merged"
		);

		let observers = self.observers.read().clone();
		for observer in &observers {
			observer.on_merge(&merge.bucket, &published);
		}

		Ok(merge)
	}
}
