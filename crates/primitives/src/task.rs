use crate::ids::{SessionEpoch, SurfaceId};

/// Work the host runs after a delay and hands back to the synchronizer.
///
/// Tasks are plain values rather than closures. The epoch is compared against
/// the context's current session when the task comes back, which is how a
/// superseding session cancels it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredTask {
	/// Source surface the task belongs to.
	pub source: SurfaceId,
	/// Session the task was scheduled under.
	pub epoch: SessionEpoch,
	/// What to do.
	pub kind: DeferredKind,
}

/// Kind of deferred work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredKind {
	/// Locate or create the destination, bind it, and relocate it.
	///
	/// Carries no focus state: relocation uses whatever the user is viewing
	/// when the task runs.
	CreateDestination,
}
