//! Fragment discovery on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use implreg_fragment::TraitPath;

/// Directory name rustdoc writes fragments under.
const IMPLEMENTORS_DIR: &str = "implementors";

/// Fragment files found under one root, grouped by the trait they document.
#[derive(Debug, Default)]
pub struct Discovery {
	pub root: PathBuf,
	pub traits: BTreeMap<TraitPath, Vec<PathBuf>>,
	/// Files with a matching extension whose name is not `trait.<Name>.<ext>`.
	pub ignored: Vec<PathBuf>,
}

impl Discovery {
	pub fn fragment_count(&self) -> usize {
		self.traits.values().map(Vec::len).sum()
	}
}

/// Resolves the directory to walk: `root/implementors` when it exists, `root` otherwise.
pub fn fragments_root(root: &Path) -> PathBuf {
	let nested = root.join(IMPLEMENTORS_DIR);
	if nested.is_dir() { nested } else { root.to_path_buf() }
}

/// Walks `root` for fragment files with one of `extensions`.
///
/// Paths inside each trait group are sorted so submission order is stable across runs.
pub fn discover(root: &Path, extensions: &[String]) -> Discovery {
	let root = fragments_root(root);
	let mut discovery = Discovery {
		root: root.clone(),
		..Discovery::default()
	};

	for entry in WalkBuilder::new(&root).standard_filters(false).build() {
		let entry = match entry {
			Ok(entry) => entry,
			Err(err) => {
				tracing::warn!(error = %err, "load.walk.error");
				continue;
			}
		};
		if !entry.file_type().is_some_and(|t| t.is_file()) {
			continue;
		}

		let path = entry.into_path();
		let matches_ext = path
			.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| extensions.iter().any(|want| want == ext));
		if !matches_ext {
			continue;
		}

		let Ok(relative) = path.strip_prefix(&root) else {
			continue;
		};
		match TraitPath::from_fragment_path(relative) {
			Some(trait_path) => discovery.traits.entry(trait_path).or_default().push(path),
			None => {
				tracing::debug!(path = %path.display(), "load.walk.not_a_trait_fragment");
				discovery.ignored.push(path);
			}
		}
	}

	for files in discovery.traits.values_mut() {
		files.sort();
	}
	discovery.ignored.sort();

	tracing::debug!(
		root = %discovery.root.display(),
		traits = discovery.traits.len(),
		fragments = discovery.fragment_count(),
		ignored = discovery.ignored.len(),
		"load.discovered"
	);
	discovery
}

/// Keeps only traits whose full path or final segment equals `filter`.
pub fn retain_trait(discovery: &mut Discovery, filter: &str) {
	discovery
		.traits
		.retain(|path, _| path.as_str() == filter || path.name() == filter);
}
