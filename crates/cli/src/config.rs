//! `implreg.toml` configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::render::Format;

/// File looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "implreg.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to parse {path}: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub load: LoadConfig,
	pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
	/// Fragment file extensions considered by `scan`.
	pub extensions: Vec<String>,
	/// Fragments submitted before the coordinator initializes. `None` means all of them.
	pub init_after: Option<usize>,
}

impl Default for LoadConfig {
	fn default() -> Self {
		Self {
			extensions: vec!["js".to_string()],
			init_after: None,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
	pub format: Format,
}

impl Config {
	/// Parses configuration text; `origin` only labels errors.
	pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
		toml::from_str(text).map_err(|source| ConfigError::Parse {
			path: origin.to_path_buf(),
			source,
		})
	}

	/// Loads `explicit` if given, otherwise `implreg.toml` in `cwd` when present, otherwise defaults.
	pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
		let path = match explicit {
			Some(path) => path.to_path_buf(),
			None => {
				let candidate = cwd.join(DEFAULT_CONFIG_FILE);
				if !candidate.is_file() {
					tracing::debug!("config.default");
					return Ok(Self::default());
				}
				candidate
			}
		};

		let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
			path: path.clone(),
			source,
		})?;
		let config = Self::from_toml(&text, &path)?;
		tracing::debug!(path = %path.display(), "config.loaded");
		Ok(config)
	}
}
