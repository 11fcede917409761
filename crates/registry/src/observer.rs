//! Merge notification hooks for index consumers.

use std::sync::Arc;

use crate::contribution::BucketKey;
use crate::merged::MergedIndex;

/// Receives every snapshot the coordinator publishes.
///
/// Called after the merge is visible through [`crate::Coordinator::snapshot`] and outside all
/// registry locks, so implementations may submit further contributions.
pub trait IndexObserver: Send + Sync {
	/// `bucket` is the bucket that just grew; `index` is the snapshot containing the change.
	fn on_merge(&self, bucket: &BucketKey, index: &Arc<MergedIndex>);
}

impl<F> IndexObserver for F
where
	F: Fn(&BucketKey, &Arc<MergedIndex>) + Send + Sync,
{
	fn on_merge(&self, bucket: &BucketKey, index: &Arc<MergedIndex>) {
		self(bucket, index)
	}
}
