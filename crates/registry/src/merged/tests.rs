use pretty_assertions::assert_eq;

use super::*;

fn entries(index: &MergedIndex, bucket: &str) -> Vec<String> {
	index
		.get(bucket)
		.map(|e| e.iter().map(|e| e.as_str().to_owned()).collect())
		.unwrap_or_default()
}

#[test]
fn merge_appends_without_touching_predecessor() {
	let first = MergedIndex::new().merged_with(&Contribution::new("pkgA", ["impl1"]));
	let second = first.merged_with(&Contribution::new("pkgA", ["impl2"]));

	assert_eq!(entries(&first, "pkgA"), vec!["impl1"]);
	assert_eq!(entries(&second, "pkgA"), vec!["impl1", "impl2"]);
	assert_eq!(second.contribution_count(), 2);
	assert_eq!(second.entry_count(), 2);
}

#[test]
fn empty_contribution_creates_bucket() {
	let index = MergedIndex::new().merged_with(&Contribution::new("pkgA", Vec::<String>::new()));

	assert!(index.contains_bucket("pkgA"));
	assert_eq!(index.get("pkgA"), Some(&[][..]));
	assert_eq!(index.entry_count(), 0);
	assert_eq!(index.contribution_count(), 1);
}

#[test]
fn untouched_buckets_are_shared() {
	let a = MergedIndex::new().merged_with(&Contribution::new("pkgA", ["x"]));
	let b = a.merged_with(&Contribution::new("pkgB", ["y"]));

	let before = a.buckets.get("pkgA").unwrap();
	let after = b.buckets.get("pkgA").unwrap();
	assert!(Arc::ptr_eq(before, after));
}

#[test]
fn equality_ignores_bucket_insertion_order() {
	let ab = MergedIndex::new()
		.merged_with(&Contribution::new("pkgA", ["x"]))
		.merged_with(&Contribution::new("pkgB", ["y"]));
	let ba = MergedIndex::new()
		.merged_with(&Contribution::new("pkgB", ["y"]))
		.merged_with(&Contribution::new("pkgA", ["x"]));

	assert_eq!(ab, ba);
}

#[test]
fn equality_respects_entry_order() {
	let xy = MergedIndex::new().merged_with(&Contribution::new("pkgA", ["x", "y"]));
	let yx = MergedIndex::new().merged_with(&Contribution::new("pkgA", ["y", "x"]));

	assert_ne!(xy, yx);
}

#[test]
fn sorted_iteration_and_serialization() {
	let index = MergedIndex::new()
		.merged_with(&Contribution::new("zeta", ["z1"]))
		.merged_with(&Contribution::new("alpha", ["a1", "a2"]));

	let keys: Vec<&str> = index.iter_sorted().map(|(k, _)| k.as_str()).collect();
	assert_eq!(keys, vec!["alpha", "zeta"]);

	let json = serde_json::to_string(&index).unwrap();
	assert_eq!(json, r#"{"alpha":["a1","a2"],"zeta":["z1"]}"#);
}

#[test]
fn to_map_copies_everything() {
	let index = MergedIndex::new()
		.merged_with(&Contribution::new("pkgA", ["x"]))
		.merged_with(&Contribution::new("pkgA", ["x"]));

	let map = index.to_map();
	assert_eq!(map.len(), 1);
	assert_eq!(map["pkgA"], vec!["x".to_string(), "x".to_string()]);
}
