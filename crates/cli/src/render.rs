//! Index output formats.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use implreg_fragment::TraitPath;
use implreg_registry::MergedIndex;
use serde::Deserialize;

/// Output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
	/// Pretty-printed JSON object.
	#[default]
	Json,
	/// Indented listing, one entry per line.
	Text,
}

/// Renders a single index (the `merge` command).
pub fn render_index(index: &MergedIndex, format: Format) -> anyhow::Result<String> {
	match format {
		Format::Json => Ok(serde_json::to_string_pretty(index)? + "\n"),
		Format::Text => {
			let mut out = String::new();
			write_buckets(&mut out, index, "");
			Ok(out)
		}
	}
}

/// Renders one index per trait (the `scan` command).
pub fn render_traits(traits: &BTreeMap<TraitPath, Arc<MergedIndex>>, format: Format) -> anyhow::Result<String> {
	match format {
		Format::Json => {
			let by_name: BTreeMap<&str, &MergedIndex> = traits.iter().map(|(path, index)| (path.as_str(), &**index)).collect();
			Ok(serde_json::to_string_pretty(&by_name)? + "\n")
		}
		Format::Text => {
			let mut out = String::new();
			for (path, index) in traits {
				let _ = writeln!(out, "{path}");
				write_buckets(&mut out, index, "  ");
			}
			Ok(out)
		}
	}
}

fn write_buckets(out: &mut String, index: &MergedIndex, indent: &str) {
	for (bucket, entries) in index.iter_sorted() {
		let _ = writeln!(out, "{indent}{bucket} ({})", entries.len());
		for entry in entries {
			let _ = writeln!(out, "{indent}  {entry}");
		}
	}
}
