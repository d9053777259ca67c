//! Virtual clock driving deferred tasks.

use std::time::Duration;

use relay_primitives::DeferredTask;

#[derive(Debug, Clone)]
struct Scheduled {
	due: Duration,
	seq: u64,
	task: DeferredTask,
}

/// Deferred tasks ordered by due time, then by scheduling order.
#[derive(Debug, Clone, Default)]
pub(crate) struct DeferredQueue {
	now: Duration,
	next_seq: u64,
	pending: Vec<Scheduled>,
}

impl DeferredQueue {
	pub(crate) fn now(&self) -> Duration {
		self.now
	}

	pub(crate) fn len(&self) -> usize {
		self.pending.len()
	}

	pub(crate) fn push(&mut self, task: DeferredTask, delay: Duration) {
		let seq = self.next_seq;
		self.next_seq += 1;
		self.pending.push(Scheduled {
			due: self.now + delay,
			seq,
			task,
		});
	}

	/// Time until the earliest task is due.
	pub(crate) fn next_due_in(&self) -> Option<Duration> {
		self.pending
			.iter()
			.map(|s| s.due.saturating_sub(self.now))
			.min()
	}

	/// Advances the clock and drains every task that became due.
	pub(crate) fn advance(&mut self, by: Duration) -> Vec<DeferredTask> {
		self.now += by;
		let now = self.now;
		let (mut due, pending): (Vec<_>, Vec<_>) =
			self.pending.drain(..).partition(|s| s.due <= now);
		self.pending = pending;
		due.sort_by_key(|s| (s.due, s.seq));
		due.into_iter().map(|s| s.task).collect()
	}
}
