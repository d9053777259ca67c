use relay_primitives::{SessionEpoch, SurfaceId, WindowId};

use crate::delta::DeltaTracker;

/// Per-source mirroring state.
#[derive(Debug)]
pub(super) struct SyncContext {
	/// Window the source lives in.
	pub(super) window: WindowId,
	/// Bound destination, if any.
	pub(super) destination: Option<SurfaceId>,
	pub(super) tracker: DeltaTracker,
	/// Text read while no destination was bound. Always starts at source
	/// offset 0 of the current session.
	pub(super) pending: String,
	pub(super) epoch: SessionEpoch,
	/// Epoch of a scheduled, not yet completed destination creation.
	pub(super) creation_pending: Option<SessionEpoch>,
}

impl SyncContext {
	pub(super) fn new(window: WindowId) -> Self {
		Self {
			window,
			destination: None,
			tracker: DeltaTracker::new(),
			pending: String::new(),
			epoch: SessionEpoch::default(),
			creation_pending: None,
		}
	}

	/// Forgets the destination and re-reads the source from offset 0 on the
	/// next pull, so the pending buffer again covers the whole session.
	pub(super) fn unbind_and_rewind(&mut self) {
		self.destination = None;
		self.tracker.reset();
		self.pending.clear();
	}

	pub(super) fn snapshot(&self) -> ContextSnapshot {
		ContextSnapshot {
			window: self.window,
			destination: self.destination,
			last_read: self.tracker.last_read(),
			pending: self.pending.clone(),
			epoch: self.epoch,
			creation_pending: self.creation_pending.is_some(),
		}
	}
}

/// Read-only view of a source's mirroring state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSnapshot {
	/// Window the source lives in.
	pub window: WindowId,
	/// Bound destination.
	pub destination: Option<SurfaceId>,
	/// Source offset read up to, in chars.
	pub last_read: usize,
	/// Buffered text awaiting a destination.
	pub pending: String,
	/// Current session.
	pub epoch: SessionEpoch,
	/// Whether deferred destination creation is outstanding.
	pub creation_pending: bool,
}
