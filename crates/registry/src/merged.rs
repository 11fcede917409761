//! Immutable merged-index snapshots.
//!
//! # Role
//!
//! [`MergedIndex`] is the read side handed to renderers. The coordinator never mutates a published
//! snapshot; each merge builds a successor that shares untouched buckets with its predecessor.
//!
//! # Invariants
//!
//! - Entry order inside a bucket is arrival order (see `invariants::test_order_preservation`).
//! - A successor never loses buckets or entries of its predecessor.

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::contribution::{BucketKey, Contribution, ImplEntry};

/// Bucket key to accumulated entries.
#[derive(Debug, Clone, Default)]
pub struct MergedIndex {
	buckets: FxHashMap<BucketKey, Arc<[ImplEntry]>>,
	contributions: usize,
	entries: usize,
}

impl MergedIndex {
	/// Creates an empty index.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the entries of one bucket.
	pub fn get(&self, bucket: &str) -> Option<&[ImplEntry]> {
		self.buckets.get(bucket).map(|entries| &**entries)
	}

	pub fn contains_bucket(&self, bucket: &str) -> bool {
		self.buckets.contains_key(bucket)
	}

	/// Number of buckets.
	pub fn len(&self) -> usize {
		self.buckets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.buckets.is_empty()
	}

	/// Number of contributions merged so far.
	pub fn contribution_count(&self) -> usize {
		self.contributions
	}

	/// Number of entries across all buckets.
	pub fn entry_count(&self) -> usize {
		self.entries
	}

	/// Iterates buckets in unspecified order.
	pub fn iter(&self) -> impl Iterator<Item = (&BucketKey, &[ImplEntry])> + '_ {
		self.buckets.iter().map(|(key, entries)| (key, &**entries))
	}

	/// Iterates buckets sorted by key, for deterministic rendering.
	pub fn iter_sorted(&self) -> impl Iterator<Item = (&BucketKey, &[ImplEntry])> + '_ {
		let mut keys: Vec<&BucketKey> = self.buckets.keys().collect();
		keys.sort_unstable();
		keys.into_iter().map(|key| (key, &*self.buckets[key]))
	}

	/// Copies the index into plain owned collections.
	pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
		self.iter()
			.map(|(key, entries)| {
				(
					key.to_string(),
					entries.iter().map(|e| e.as_str().to_owned()).collect(),
				)
			})
			.collect()
	}

	/// Builds the successor snapshot with `contribution` appended to its bucket.
	pub(crate) fn merged_with(&self, contribution: &Contribution) -> Self {
		let added = contribution.entries.len();

		let mut buckets = self.buckets.clone();
		let slot = buckets.entry(contribution.bucket.clone()).or_insert_with(|| Arc::<[ImplEntry]>::from(Vec::new()));
		if added > 0 {
			let mut combined = Vec::with_capacity(slot.len() + added);
			combined.extend(slot.iter().cloned());
			combined.extend(contribution.entries.iter().cloned());
			*slot = Arc::from(combined);
		}

		Self {
			buckets,
			contributions: self.contributions + 1,
			entries: self.entries + added,
		}
	}
}

impl PartialEq for MergedIndex {
	/// Two indices are equal when they hold the same buckets with the same entry sequences.
	fn eq(&self, other: &Self) -> bool {
		self.buckets.len() == other.buckets.len()
			&& self
				.buckets
				.iter()
				.all(|(key, entries)| other.buckets.get(key).is_some_and(|o| o[..] == entries[..]))
	}
}

impl Eq for MergedIndex {}

impl Serialize for MergedIndex {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
		for (key, entries) in self.iter_sorted() {
			map.serialize_entry(key, entries)?;
		}
		map.end()
	}
}

#[cfg(test)]
mod tests;
