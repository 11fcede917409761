//! Contribution payload types.
//!
//! A [`Contribution`] is what one producer hands to the registry: a bucket key and the ordered
//! implementor entries it contributes to that bucket. Entries are opaque markup blobs; nothing in
//! this crate looks inside them.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ContributionError;

/// Namespace an entry belongs to, usually the name of the crate that holds the implementations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey(Arc<str>);

impl BucketKey {
	/// Creates a bucket key without inspecting it.
	pub fn new(key: impl Into<Arc<str>>) -> Self {
		Self(key.into())
	}

	/// Returns the key as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Checks the key is usable as an index bucket.
	///
	/// Keys are accepted unchecked on submission; the coordinator calls this when merging.
	pub fn validate(&self) -> Result<(), ContributionError> {
		if self.0.trim().is_empty() {
			return Err(ContributionError::EmptyBucketKey);
		}
		if let Some(ch) = self.0.chars().find(|c| c.is_control()) {
			return Err(ContributionError::ControlCharacter {
				key: self.0.to_string(),
				ch,
			});
		}
		Ok(())
	}
}

impl fmt::Display for BucketKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for BucketKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl std::borrow::Borrow<str> for BucketKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&str> for BucketKey {
	fn from(key: &str) -> Self {
		Self::new(key)
	}
}

impl From<String> for BucketKey {
	fn from(key: String) -> Self {
		Self::new(key)
	}
}

/// One pre-rendered implementor description.
///
/// Cloning is a reference count bump, so merged buckets can share entries across snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImplEntry(Arc<str>);

impl ImplEntry {
	pub fn new(markup: impl Into<Arc<str>>) -> Self {
		Self(markup.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ImplEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for ImplEntry {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<&str> for ImplEntry {
	fn from(markup: &str) -> Self {
		Self::new(markup)
	}
}

impl From<String> for ImplEntry {
	fn from(markup: String) -> Self {
		Self::new(markup)
	}
}

macro_rules! str_serde {
	($ty:ident) => {
		impl Serialize for $ty {
			fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
				serializer.serialize_str(&self.0)
			}
		}

		impl<'de> Deserialize<'de> for $ty {
			fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
				String::deserialize(deserializer).map(Self::from)
			}
		}
	};
}

str_serde!(BucketKey);
str_serde!(ImplEntry);

/// Atomic unit of data delivered by one producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
	pub bucket: BucketKey,
	pub entries: Vec<ImplEntry>,
}

impl Contribution {
	/// Builds a contribution from anything string-like.
	///
	/// ```
	/// use implreg_registry::Contribution;
	///
	/// let c = Contribution::new("com_rs", ["impl From<&ComPtr<T>> for ComPtr<U>"]);
	/// assert_eq!(c.bucket.as_str(), "com_rs");
	/// assert_eq!(c.entries.len(), 1);
	/// ```
	pub fn new<K, I>(bucket: K, entries: I) -> Self
	where
		K: Into<BucketKey>,
		I: IntoIterator,
		I::Item: Into<ImplEntry>,
	{
		Self {
			bucket: bucket.into(),
			entries: entries.into_iter().map(Into::into).collect(),
		}
	}

	/// Number of entries carried.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
