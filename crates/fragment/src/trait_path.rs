use std::fmt;
use std::path::{Component, Path};

use serde::Serialize;

/// `::`-separated path of the trait a fragment documents, e.g. `core::convert::From`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TraitPath(String);

impl TraitPath {
	/// Creates a trait path from its `::` form.
	pub fn new(path: impl Into<String>) -> Self {
		Self(path.into())
	}

	/// Derives the trait path from a fragment location relative to the implementors root.
	///
	/// `core/convert/trait.From.js` becomes `core::convert::From`. Returns `None` when the file
	/// name is not `trait.<Name>.<ext>` or a component is not plain UTF-8.
	pub fn from_fragment_path(relative: &Path) -> Option<Self> {
		let mut segments = Vec::new();
		for component in relative.parent().into_iter().flat_map(Path::components) {
			match component {
				Component::Normal(segment) => segments.push(segment.to_str()?.to_owned()),
				Component::CurDir => {}
				_ => return None,
			}
		}

		let stem = relative.file_stem()?.to_str()?;
		let name = stem.strip_prefix("trait.")?;
		if name.is_empty() {
			return None;
		}
		segments.push(name.to_owned());

		Some(Self(segments.join("::")))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Final segment, the trait's own name.
	pub fn name(&self) -> &str {
		self.0.rsplit("::").next().unwrap_or(&self.0)
	}
}

impl fmt::Display for TraitPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
