/// Reasons the coordinator refuses to merge a contribution.
///
/// Rejections are logged and skipped; they never reach the producer as a failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContributionError {
	#[error("bucket key is empty")]
	EmptyBucketKey,

	#[error("bucket key {key:?} contains control character {ch:?}")]
	ControlCharacter { key: String, ch: char },
}
