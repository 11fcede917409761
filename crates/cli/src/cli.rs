//! CLI schema for the implreg binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::render::Format;

#[derive(Parser, Debug)]
#[command(name = "implreg")]
#[command(about = "Merge generated implementor fragments into one index")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file (defaults to ./implreg.toml when present)
	#[arg(long, short = 'c', value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Output format
	#[arg(long, short = 'f', value_enum, global = true)]
	pub format: Option<Format>,

	/// Fragments submitted before the coordinator initializes (default: all)
	#[arg(long, value_name = "N", global = true)]
	pub init_after: Option<usize>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
	/// Merge fragments of a single trait
	Merge {
		/// Fragment files, submitted in the given order
		#[arg(required = true, value_name = "FILE")]
		files: Vec<PathBuf>,
	},
	/// Merge every trait fragment found under a documentation directory
	Scan {
		/// Documentation output or `implementors` directory
		#[arg(value_name = "DIR")]
		root: PathBuf,

		/// Only this trait (full path or bare name)
		#[arg(long = "trait", value_name = "PATH")]
		trait_filter: Option<String>,
	},
}

#[cfg(test)]
mod tests;
