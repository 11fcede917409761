//! Link-time producers.
//!
//! Any crate linked into the final binary can declare implementor contributions with
//! [`implementors!`](crate::implementors). They are collected through `inventory` and handed to a
//! registry by [`submit_static_fragments`], the same way a page loads its generated fragment
//! scripts.

use crate::contribution::Contribution;
use crate::registry::DeferredRegistry;

/// A contribution declared at compile time.
#[derive(Debug)]
pub struct StaticFragment {
	/// Bucket the entries belong to.
	pub bucket: &'static str,
	/// Pre-rendered implementor entries, in display order.
	pub entries: &'static [&'static str],
	/// Submission ordering hint (lower first).
	pub priority: i16,
	/// Crate that declared the fragment.
	pub crate_name: &'static str,
}

inventory::collect!(StaticFragment);

impl StaticFragment {
	pub const fn new(
		bucket: &'static str,
		entries: &'static [&'static str],
		priority: i16,
		crate_name: &'static str,
	) -> Self {
		Self {
			bucket,
			entries,
			priority,
			crate_name,
		}
	}

	/// Converts the declaration into an owned contribution.
	pub fn contribution(&self) -> Contribution {
		Contribution::new(self.bucket, self.entries.iter().copied())
	}
}

/// Returns every collected fragment in submission order.
///
/// Sorted by priority, then bucket key. Fragments that tie keep collection order.
pub fn static_fragments() -> Vec<&'static StaticFragment> {
	let mut fragments: Vec<&'static StaticFragment> = inventory::iter::<StaticFragment>.into_iter().collect();
	fragments.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.bucket.cmp(b.bucket)));
	fragments
}

/// Submits every collected fragment to `registry`; returns how many were submitted.
pub fn submit_static_fragments(registry: &DeferredRegistry) -> usize {
	let fragments = static_fragments();
	for fragment in &fragments {
		tracing::trace!(
			bucket = fragment.bucket,
			entries = fragment.entries.len(),
			crate_name = fragment.crate_name,
			"registry.static_fragment.submit"
		);
		registry.submit(fragment.contribution());
	}
	fragments.len()
}

/// Declares a link-time implementor contribution.
///
/// ```ignore
/// implreg_registry::implementors!("com_rs" => [
///     "impl<'a, T, U> From<&'a ComPtr<T>> for ComPtr<U>",
/// ]);
/// implreg_registry::implementors!("com_rs" => ["impl Clone for ComPtr<T>"], priority = -1);
/// ```
#[macro_export]
macro_rules! implementors {
	(@priority $priority:expr) => {
		$priority
	};
	(@priority) => {
		0
	};
	($bucket:expr => [$($entry:expr),* $(,)?] $(, priority = $priority:expr)? $(,)?) => {
		$crate::inventory::submit! {
			$crate::fragments::StaticFragment::new(
				$bucket,
				&[$($entry),*],
				$crate::implementors!(@priority $($priority)?),
				env!("CARGO_PKG_NAME"),
			)
		}
	};
}
