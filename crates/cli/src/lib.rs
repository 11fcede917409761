//! Front end for merging generated implementor fragments.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;

pub mod cli;
pub mod config;
pub mod load;
pub mod merge;
pub mod render;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::render::Format;

/// Installs the stderr log subscriber.
///
/// `IMPLREG_LOG` wins over `RUST_LOG`; without either, `verbose` picks between debug output for
/// this workspace and warnings only.
pub fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("IMPLREG_LOG")
		.or_else(|_| EnvFilter::try_from_default_env())
		.unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("implreg=debug,implreg_cli=debug,implreg_registry=debug,info")
			} else {
				EnvFilter::new("warn")
			}
		});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();
}

/// Effective settings after layering CLI flags over the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	pub extensions: Vec<String>,
	pub init_after: Option<usize>,
	pub format: Format,
}

impl Settings {
	pub fn resolve(cli: &Cli, config: Config) -> Self {
		Self {
			extensions: config.load.extensions,
			init_after: cli.init_after.or(config.load.init_after),
			format: cli.format.unwrap_or(config.output.format),
		}
	}
}

/// Runs one command and returns the rendered output.
pub async fn run(cli: Cli, cwd: &Path) -> anyhow::Result<String> {
	let config = Config::load(cli.config.as_deref(), cwd).context("loading configuration")?;
	let settings = Settings::resolve(&cli, config);
	tracing::debug!(?settings, "cli.settings");

	match cli.command {
		Command::Merge { files } => {
			let files = files.into_iter().map(|f| cwd.join(f)).collect();
			let report = merge::merge_files(files, settings.init_after).await;
			tracing::info!(
				loaded = report.loaded,
				failed = report.failed,
				buckets = report.index.len(),
				entries = report.index.entry_count(),
				"cli.merge.done"
			);
			render::render_index(&report.index, settings.format)
		}
		Command::Scan { root, trait_filter } => {
			let root = cwd.join(root);
			anyhow::ensure!(root.is_dir(), "{} is not a directory", root.display());

			let mut discovery = load::discover(&root, &settings.extensions);
			if let Some(filter) = &trait_filter {
				load::retain_trait(&mut discovery, filter);
				anyhow::ensure!(!discovery.traits.is_empty(), "no fragments for trait {filter}");
			}

			let mut traits = BTreeMap::new();
			for (trait_path, files) in discovery.traits {
				let report = merge::merge_files(files, settings.init_after).await;
				tracing::info!(
					trait_path = %trait_path,
					loaded = report.loaded,
					failed = report.failed,
					buckets = report.index.len(),
					"cli.scan.trait_merged"
				);
				traits.insert(trait_path, report.index);
			}
			render::render_traits(&traits, settings.format)
		}
	}
}
