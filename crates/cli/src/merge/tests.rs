use std::path::Path;

use implreg_fragment::Fragment;
use implreg_registry::Contribution;
use pretty_assertions::assert_eq;

use super::*;

fn write_fragment(dir: &Path, name: &str, contributions: Vec<Contribution>) -> PathBuf {
	let path = dir.join(name);
	std::fs::write(&path, Fragment::new(contributions).to_source()).unwrap();
	path
}

fn bucket(index: &MergedIndex, key: &str) -> Vec<String> {
	index
		.get(key)
		.map(|e| e.iter().map(|e| e.as_str().to_owned()).collect())
		.unwrap_or_default()
}

#[tokio::test]
async fn initializing_last_buffers_everything() {
	let dir = tempfile::tempdir().unwrap();
	let files = vec![
		write_fragment(dir.path(), "a.js", vec![Contribution::new("alpha", ["a1", "a2"])]),
		write_fragment(
			dir.path(),
			"b.js",
			vec![
				Contribution::new("beta", ["b1"]),
				Contribution::new("beta", ["b2"]),
			],
		),
	];

	let report = merge_files(files, None).await;

	assert_eq!(report.loaded, 2);
	assert_eq!(report.failed, 0);
	assert_eq!(report.buffered, 3);
	assert_eq!(report.direct, 0);
	assert_eq!(bucket(&report.index, "alpha"), vec!["a1", "a2"]);
	assert_eq!(bucket(&report.index, "beta"), vec!["b1", "b2"]);
}

#[tokio::test]
async fn early_initialization_gives_the_same_index() {
	let dir = tempfile::tempdir().unwrap();
	let mut files = Vec::new();
	for i in 0..6 {
		files.push(write_fragment(
			dir.path(),
			&format!("f{i}.js"),
			vec![Contribution::new(format!("pkg{i}"), [format!("impl{i}")])],
		));
	}

	let late = merge_files(files.clone(), None).await;
	let early = merge_files(files.clone(), Some(0)).await;
	let middle = merge_files(files, Some(3)).await;

	assert_eq!(*early.index, *late.index);
	assert_eq!(*middle.index, *late.index);
	assert_eq!(early.buffered + early.direct, 6);
	assert_eq!(middle.buffered + middle.direct, 6);
	assert_eq!(middle.buffered, 3);
	assert_eq!(middle.direct, 3);
}

#[tokio::test]
async fn same_bucket_entries_follow_file_order() {
	let dir = tempfile::tempdir().unwrap();
	let mut files = Vec::new();
	for i in 0..8 {
		files.push(write_fragment(
			dir.path(),
			&format!("f{i}.js"),
			vec![Contribution::new("shared", [format!("e{i}")])],
		));
	}
	let expected: Vec<String> = (0..8).map(|i| format!("e{i}")).collect();

	for init_after in [None, Some(0), Some(4)] {
		for _ in 0..20 {
			let report = merge_files(files.clone(), init_after).await;
			assert_eq!(bucket(&report.index, "shared"), expected);
		}
	}

	let report = merge_files(files, Some(5)).await;
	assert_eq!(report.buffered, 5);
	assert_eq!(report.direct, 3);
}

#[tokio::test]
async fn failed_reads_do_not_stall_later_files() {
	let dir = tempfile::tempdir().unwrap();
	let first = write_fragment(dir.path(), "first.js", vec![Contribution::new("k", ["one"])]);
	let missing = dir.path().join("missing.js");
	let last = write_fragment(dir.path(), "last.js", vec![Contribution::new("k", ["two"])]);

	let report = merge_files(vec![first, missing, last], Some(2)).await;

	assert_eq!(report.failed, 1);
	assert_eq!(report.buffered, 1);
	assert_eq!(report.direct, 1);
	assert_eq!(bucket(&report.index, "k"), vec!["one", "two"]);
}

#[tokio::test]
async fn unreadable_and_malformed_fragments_are_skipped() {
	let dir = tempfile::tempdir().unwrap();
	let good = write_fragment(dir.path(), "good.js", vec![Contribution::new("ok", ["x"])]);
	let broken = dir.path().join("broken.js");
	std::fs::write(&broken, "implementors['k'] = [\"unterminated").unwrap();
	let missing = dir.path().join("missing.js");

	let report = merge_files(vec![good, broken, missing], Some(10)).await;

	assert_eq!(report.loaded, 1);
	assert_eq!(report.failed, 2);
	assert_eq!(bucket(&report.index, "ok"), vec!["x"]);
	assert_eq!(report.index.len(), 1);
}

#[tokio::test]
async fn rejected_contributions_are_counted() {
	let dir = tempfile::tempdir().unwrap();
	let file = write_fragment(
		dir.path(),
		"bad.js",
		vec![Contribution::new("", ["x"]), Contribution::new("good", ["y"])],
	);

	let report = merge_files(vec![file], None).await;

	assert_eq!(report.rejected, 1);
	assert_eq!(report.index.len(), 1);
}

#[tokio::test]
async fn no_files_yields_empty_index() {
	let report = merge_files(Vec::new(), None).await;
	assert!(report.index.is_empty());
	assert_eq!(report.loaded, 0);
}
