//! Generated implementor fragments.
//!
//! A documentation build emits one fragment source per documented trait. Each fragment assigns
//! implementor entries to one or more buckets:
//!
//! ```text
//! (function() {var implementors = {};
//! implementors['com_rs'] = ["impl&lt;T&gt; From&lt;&amp;ComPtr&lt;T&gt;&gt; for ComPtr&lt;U&gt;",];
//! ...
//! })()
//! ```
//!
//! [`Fragment::parse`] turns that text into registry contributions; [`Fragment::to_source`] writes
//! it back. Which trait a fragment belongs to is encoded in its location, see
//! [`TraitPath::from_fragment_path`].

mod error;
mod parse;
mod trait_path;
mod write;

use implreg_registry::{Contribution, DeferredRegistry, Delivery};

pub use crate::error::FragmentError;
pub use crate::trait_path::TraitPath;

/// Contributions carried by one fragment source, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
	pub contributions: Vec<Contribution>,
}

impl Fragment {
	pub fn new(contributions: Vec<Contribution>) -> Self {
		Self { contributions }
	}

	/// Parses fragment source text.
	///
	/// ```
	/// use implreg_fragment::Fragment;
	///
	/// let fragment = Fragment::parse(r#"implementors['com_rs'] = ["impl Clone for ComPtr",];"#)?;
	/// assert_eq!(fragment.contributions[0].bucket.as_str(), "com_rs");
	/// # Ok::<(), implreg_fragment::FragmentError>(())
	/// ```
	pub fn parse(source: &str) -> Result<Self, FragmentError> {
		parse::parse_contributions(source).map(Self::new)
	}

	/// Writes the fragment in generated-source form.
	pub fn to_source(&self) -> String {
		write::write_source(&self.contributions)
	}

	/// Total entries across all contributions.
	pub fn entry_count(&self) -> usize {
		self.contributions.iter().map(Contribution::len).sum()
	}

	/// Submits every contribution to `registry` in source order.
	pub fn submit(self, registry: &DeferredRegistry) -> Vec<Delivery> {
		self.contributions
			.into_iter()
			.map(|contribution| registry.submit(contribution))
			.collect()
	}
}
