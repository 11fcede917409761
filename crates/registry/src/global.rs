//! Process-wide registry instance.
//!
//! Producers that have no way to receive a `&DeferredRegistry` reach the shared instance through
//! [`registry`]. Everything else should take the registry by reference.

use std::sync::{Arc, LazyLock};

use crate::contribution::Contribution;
use crate::merged::MergedIndex;
use crate::registry::{DeferredRegistry, Delivery, Initialization};

static REGISTRY: LazyLock<DeferredRegistry> = LazyLock::new(DeferredRegistry::new);

#[cfg(feature = "static-fragments")]
static STATIC_FRAGMENTS: std::sync::Once = std::sync::Once::new();

/// Returns the shared registry.
pub fn registry() -> &'static DeferredRegistry {
	&REGISTRY
}

/// Submits to the shared registry.
pub fn submit(contribution: Contribution) -> Delivery {
	REGISTRY.submit(contribution)
}

/// Initializes the shared registry.
///
/// Link-time fragments declared with [`implementors!`](crate::implementors) are submitted first,
/// once per process.
pub fn initialize() -> Initialization {
	#[cfg(feature = "static-fragments")]
	STATIC_FRAGMENTS.call_once(|| {
		let count = crate::fragments::submit_static_fragments(&REGISTRY);
		tracing::debug!(count, "registry.static_fragments.submitted");
	});
	REGISTRY.initialize()
}

/// Returns the shared registry's current snapshot.
pub fn merged_index() -> Arc<MergedIndex> {
	REGISTRY.merged_index()
}
