//! Buffer for contributions that arrive before the coordinator is ready.

use crate::contribution::Contribution;

/// Arrival-ordered queue of undelivered contributions.
///
/// Draining consumes the buffer; a drained buffer is never refilled.
#[derive(Debug, Default)]
pub struct PendingBuffer {
	queue: Vec<Contribution>,
}

impl PendingBuffer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a contribution and returns its zero-based arrival position.
	pub fn push(&mut self, contribution: Contribution) -> usize {
		self.queue.push(contribution);
		self.queue.len() - 1
	}

	pub fn len(&self) -> usize {
		self.queue.len()
	}

	pub fn is_empty(&self) -> bool {
		self.queue.is_empty()
	}

	/// Total entries held across all buffered contributions.
	pub fn entry_count(&self) -> usize {
		self.queue.iter().map(Contribution::len).sum()
	}

	/// Yields the buffered contributions in arrival order.
	pub fn drain(self) -> std::vec::IntoIter<Contribution> {
		self.queue.into_iter()
	}
}

impl FromIterator<Contribution> for PendingBuffer {
	fn from_iter<I: IntoIterator<Item = Contribution>>(iter: I) -> Self {
		Self {
			queue: iter.into_iter().collect(),
		}
	}
}
