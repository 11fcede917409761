//! implreg binary.

use std::io::Write as _;

use anyhow::Context as _;
use clap::Parser;
use implreg_cli::cli::Cli;
#[allow(unused_imports, reason = "used by the implreg_cli library target")]
use {
	ignore as _, implreg_fragment as _, implreg_registry as _, serde as _, serde_json as _,
	thiserror as _, toml as _, tracing as _, tracing_subscriber as _,
};
#[cfg(test)]
use {pretty_assertions as _, tempfile as _};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	implreg_cli::setup_tracing(cli.verbose);

	let cwd = std::env::current_dir().context("resolving working directory")?;
	let output = implreg_cli::run(cli, &cwd).await?;

	let mut stdout = std::io::stdout().lock();
	stdout.write_all(output.as_bytes())?;
	stdout.flush()?;
	Ok(())
}
