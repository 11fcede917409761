//! Deferred implementor registry.
//!
//! Generated documentation fragments each contribute implementor entries, keyed by the crate they
//! belong to, to one cross-reference index. A fragment cannot know whether the index owner is up
//! yet, so it deposits its [`Contribution`] with a [`DeferredRegistry`], which buffers until
//! [`DeferredRegistry::initialize`] and delivers directly afterwards.
//!
//! # Modules
//!
//! - [`contribution`] - Bucket keys, opaque entries, contributions
//! - [`registry`] - Buffering, initialization, delivery
//! - [`coordinator`] - Merge path and snapshot publication
//! - [`merged`] - Read-only merged-index snapshots
//! - [`global`] - Process-wide instance
//! - `fragments` - Link-time producers (`static-fragments` feature)
//!
//! # Example
//!
//! ```
//! use implreg_registry::{Contribution, DeferredRegistry};
//!
//! let registry = DeferredRegistry::new();
//! registry.submit(Contribution::new("pkgA", ["impl1"]));
//! registry.initialize();
//! registry.submit(Contribution::new("pkgA", ["impl2"]));
//!
//! let index = registry.merged_index();
//! let entries: Vec<&str> = index.get("pkgA").unwrap().iter().map(|e| e.as_str()).collect();
//! assert_eq!(entries, ["impl1", "impl2"]);
//! ```

pub mod contribution;
pub mod coordinator;
mod error;
#[cfg(feature = "static-fragments")]
pub mod fragments;
pub mod global;
pub mod merged;
mod observer;
pub mod pending;
pub mod registry;

#[cfg(test)]
mod invariants;

pub use contribution::{BucketKey, Contribution, ImplEntry};
pub use coordinator::{Coordinator, Merge};
pub use error::ContributionError;
#[cfg(feature = "static-fragments")]
pub use fragments::{StaticFragment, static_fragments, submit_static_fragments};
#[cfg(feature = "static-fragments")]
#[doc(hidden)]
pub use inventory;
pub use merged::MergedIndex;
pub use observer::IndexObserver;
pub use pending::PendingBuffer;
pub use registry::{DeferredRegistry, Delivery, Initialization, RegistryState};
