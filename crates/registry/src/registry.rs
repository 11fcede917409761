//! Deferred registry: load-order independent delivery into the coordinator.
//!
//! # Mental Model
//!
//! Producers call [`DeferredRegistry::submit`] whenever they happen to run. Until
//! [`DeferredRegistry::initialize`] has run, submissions are parked in a [`PendingBuffer`].
//! Initialization drains that buffer through [`Coordinator::register`] exactly once and flips the
//! registry to direct delivery.
//!
//! ```text
//! Uninitialized --initialize()--> Initializing --buffer empty--> Ready
//!      ^ submit buffers              ^ submit queues behind drain     ^ submit registers
//! ```
//!
//! # Invariants
//!
//! - Every submitted contribution reaches the coordinator exactly once.
//!   - Enforced in: [`DeferredRegistry::initialize`] (buffer is moved out before draining).
//!   - Tested by: `invariants::test_no_loss`
//! - Entries of one bucket keep submission order across the buffered/direct boundary.
//!   - Enforced in: [`DeferredRegistry::initialize`] (Ready is only set once the buffer is empty).
//!   - Tested by: `invariants::test_order_preservation`, `invariants::test_late_vs_early_equivalence`
//! - A second initialization never re-drains.
//!   - Tested by: `invariants::test_idempotent_initialization`
//! - A drain aborted by a panicking observer rebuffers what it had not yet registered.
//!   - Enforced in: `DrainGuard::drop`
//!   - Tested by: `tests::panicking_observer_leaves_undelivered_contributions_buffered`
//!
//! The drain runs without holding the phase lock so coordinator observers may submit.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::contribution::Contribution;
use crate::coordinator::{Coordinator, Merge};
use crate::error::ContributionError;
use crate::merged::MergedIndex;
use crate::observer::IndexObserver;
use crate::pending::PendingBuffer;

/// Lifecycle of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
	/// Submissions are buffered.
	Uninitialized,
	/// The pending buffer is being drained; submissions queue behind it.
	Initializing,
	/// Submissions are delivered directly.
	Ready,
}

/// What happened to one submitted contribution.
///
/// Producers are free to ignore this; it exists for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
	/// Parked until initialization; `position` is the arrival index within the buffer.
	Buffered { position: usize },
	/// Merged into the index immediately.
	Delivered(Merge),
	/// Refused by the coordinator.
	Rejected(ContributionError),
}

/// Result of calling [`DeferredRegistry::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initialization {
	/// This call drained the pending buffer and made the registry ready.
	Drained {
		/// Buffered contributions processed, rejected ones included.
		contributions: usize,
		/// Entries merged into the index.
		entries: usize,
		/// Contributions the coordinator refused.
		rejected: usize,
	},
	/// A previous call already completed.
	AlreadyInitialized,
	/// Another call is draining right now; this one did nothing.
	InProgress,
}

enum Phase {
	Uninitialized(PendingBuffer),
	Initializing(PendingBuffer),
	Ready,
}

impl Phase {
	fn state(&self) -> RegistryState {
		match self {
			Phase::Uninitialized(_) => RegistryState::Uninitialized,
			Phase::Initializing(_) => RegistryState::Initializing,
			Phase::Ready => RegistryState::Ready,
		}
	}
}

/// Puts undelivered contributions back if a drain unwinds.
///
/// A panicking observer aborts the drain after its contribution was merged. Everything not yet
/// registered, followed by anything submitted meanwhile, returns to an `Uninitialized` buffer so
/// a later [`DeferredRegistry::initialize`] can finish the job.
struct DrainGuard<'a> {
	phase: &'a Mutex<Phase>,
	remaining: std::vec::IntoIter<Contribution>,
	armed: bool,
}

impl Drop for DrainGuard<'_> {
	fn drop(&mut self) {
		if !self.armed {
			return;
		}
		let mut phase = self.phase.lock();
		let late = match std::mem::replace(&mut *phase, Phase::Ready) {
			Phase::Initializing(late) => late,
			other => {
				*phase = other;
				return;
			}
		};
		let restored: PendingBuffer = self.remaining.by_ref().chain(late.drain()).collect();
		tracing::error!(pending = restored.len(), "registry.initialize.aborted");
		*phase = Phase::Uninitialized(restored);
	}
}

/// Process-wide accumulation point for implementor contributions.
pub struct DeferredRegistry {
	phase: Mutex<Phase>,
	coordinator: Coordinator,
}

impl Default for DeferredRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for DeferredRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DeferredRegistry")
			.field("state", &self.state())
			.field("pending", &self.pending_len())
			.field("coordinator", &self.coordinator)
			.finish()
	}
}

impl DeferredRegistry {
	/// Creates an uninitialized registry with a fresh coordinator.
	pub fn new() -> Self {
		Self::with_coordinator(Coordinator::new())
	}

	/// Creates an uninitialized registry around an existing coordinator.
	pub fn with_coordinator(coordinator: Coordinator) -> Self {
		Self {
			phase: Mutex::new(Phase::Uninitialized(PendingBuffer::new())),
			coordinator,
		}
	}

	/// Returns the current lifecycle state.
	pub fn state(&self) -> RegistryState {
		self.phase.lock().state()
	}

	/// Returns true once initialization has completed.
	pub fn is_ready(&self) -> bool {
		self.state() == RegistryState::Ready
	}

	/// Number of contributions waiting for delivery.
	pub fn pending_len(&self) -> usize {
		match &*self.phase.lock() {
			Phase::Uninitialized(buf) | Phase::Initializing(buf) => buf.len(),
			Phase::Ready => 0,
		}
	}

	/// Returns the coordinator.
	pub fn coordinator(&self) -> &Coordinator {
		&self.coordinator
	}

	/// Adds a merge observer to the coordinator.
	pub fn observe<O>(&self, observer: O)
	where
		O: IndexObserver + 'static,
	{
		self.coordinator.observe(observer);
	}

	/// Returns the current merged-index snapshot.
	///
	/// Before initialization this is whatever has been registered directly, usually nothing.
	pub fn merged_index(&self) -> Arc<MergedIndex> {
		self.coordinator.snapshot()
	}

	/// Hands a contribution to the coordinator, now or once it initializes.
	pub fn submit(&self, contribution: Contribution) -> Delivery {
		{
			let mut phase = self.phase.lock();
			let state = phase.state();
			match &mut *phase {
				Phase::Uninitialized(buf) | Phase::Initializing(buf) => {
					let bucket = contribution.bucket.clone();
					let entries = contribution.len();
					let position = buf.push(contribution);
					tracing::debug!(
						bucket = %bucket,
						entries,
						position,
						state = ?state,
						"registry.submit.buffered"
					);
					return Delivery::Buffered { position };
				}
				Phase::Ready => {}
			}
		}

		match self.coordinator.register(contribution) {
			Ok(merge) => Delivery::Delivered(merge),
			Err(err) => Delivery::Rejected(err),
		}
	}

	/// Makes the coordinator ready, draining everything buffered so far.
	///
	/// Safe to call more than once; only the first completed call drains. If an observer panics
	/// mid-drain the registry falls back to `Uninitialized` with the undelivered contributions
	/// still buffered in order.
	pub fn initialize(&self) -> Initialization {
		let buffer = {
			let mut phase = self.phase.lock();
			match std::mem::replace(&mut *phase, Phase::Ready) {
				Phase::Uninitialized(buf) => {
					*phase = Phase::Initializing(PendingBuffer::new());
					buf
				}
				Phase::Initializing(buf) => {
					*phase = Phase::Initializing(buf);
					tracing::debug!("registry.initialize.in_progress");
					return Initialization::InProgress;
				}
				Phase::Ready => {
					tracing::debug!("registry.initialize.already_ready");
					return Initialization::AlreadyInitialized;
				}
			}
		};

		let mut contributions = 0;
		let mut entries = 0;
		let mut rejected = 0;
		let mut drain = DrainGuard {
			phase: &self.phase,
			remaining: buffer.drain(),
			armed: true,
		};

		loop {
			for contribution in drain.remaining.by_ref() {
				contributions += 1;
				match self.coordinator.register(contribution) {
					Ok(merge) => entries += merge.added,
					Err(_) => rejected += 1,
				}
			}

			// Contributions submitted while we drained sit in the Initializing buffer.
			let mut phase = self.phase.lock();
			let Phase::Initializing(late) = &mut *phase else {
				unreachable!("only the draining call leaves the Initializing phase");
			};
			if late.is_empty() {
				*phase = Phase::Ready;
				drain.armed = false;
				break;
			}
			drain.remaining = std::mem::take(late).drain();
		}

		tracing::info!(contributions, entries, rejected, "registry.initialize.drained");
		Initialization::Drained {
			contributions,
			entries,
			rejected,
		}
	}
}
