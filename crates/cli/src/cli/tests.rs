use clap::CommandFactory;

use super::*;

fn parse(args: &[&str]) -> Cli {
	Cli::try_parse_from(std::iter::once("implreg").chain(args.iter().copied())).unwrap()
}

#[test]
fn schema_is_consistent() {
	Cli::command().debug_assert();
}

#[test]
fn merge_takes_files_in_order() {
	let cli = parse(&["merge", "b.js", "a.js"]);
	assert_eq!(
		cli.command,
		Command::Merge {
			files: vec![PathBuf::from("b.js"), PathBuf::from("a.js")],
		}
	);
	assert_eq!(cli.format, None);
	assert_eq!(cli.init_after, None);
}

#[test]
fn merge_requires_a_file() {
	assert!(Cli::try_parse_from(["implreg", "merge"]).is_err());
}

#[test]
fn global_options_after_subcommand() {
	let cli = parse(&["scan", "target/doc", "--trait", "From", "-f", "text", "--init-after", "2", "-v"]);
	assert_eq!(
		cli.command,
		Command::Scan {
			root: PathBuf::from("target/doc"),
			trait_filter: Some("From".into()),
		}
	);
	assert_eq!(cli.format, Some(Format::Text));
	assert_eq!(cli.init_after, Some(2));
	assert!(cli.verbose);
}

#[test]
fn unknown_format_is_rejected() {
	assert!(Cli::try_parse_from(["implreg", "--format", "yaml", "merge", "a.js"]).is_err());
}
