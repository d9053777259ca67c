//! Errors reported by host collaborators.

use std::ops::Range;

use thiserror::Error;

use crate::ids::{SurfaceId, WindowId};

/// Failure of a single host call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
	/// The surface does not exist (closed or never created).
	#[error("{0} does not exist")]
	SurfaceNotFound(SurfaceId),

	/// The window does not exist.
	#[error("{0} does not exist")]
	WindowNotFound(WindowId),

	/// The surface rejected a write because it is read-only.
	#[error("{0} is read-only")]
	ReadOnly(SurfaceId),

	/// A char range fell outside the surface text.
	#[error("range {}..{} out of bounds for length {len}", range.start, range.end)]
	RangeOutOfBounds {
		/// Requested range.
		range: Range<usize>,
		/// Surface length in chars.
		len: usize,
	},

	/// A pane index exceeded the window's pane count.
	#[error("pane {pane} out of bounds for {count} panes")]
	PaneOutOfBounds {
		/// Requested pane.
		pane: usize,
		/// Number of panes in the window.
		count: usize,
	},
}

/// Result type for host calls.
pub type HostResult<T> = std::result::Result<T, HostError>;
