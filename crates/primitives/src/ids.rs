use std::fmt;

/// Opaque identifier for a text surface (output panel or document view).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "surface#{}", self.0)
	}
}

/// Opaque identifier for a host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "window#{}", self.0)
	}
}

/// Monotonic mirroring session generation for a single source.
///
/// Incremented by every session start. Deferred work carries the epoch it was
/// scheduled under and is discarded once a newer session exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionEpoch(pub u64);

impl SessionEpoch {
	/// Returns the epoch following this one.
	#[must_use]
	pub const fn next(self) -> Self {
		Self(self.0.wrapping_add(1))
	}
}

/// Persistent marker attribute used to re-identify a destination surface.
///
/// Markers survive across sessions, so a destination created by an earlier
/// session can be found again instead of opening a duplicate view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DestinationMarker(pub String);

impl DestinationMarker {
	/// Builds the marker for the destination mirroring `panel`.
	pub fn for_panel(key: &str, panel: &str) -> Self {
		Self(format!("{key}:{panel}"))
	}

	/// Returns the marker value.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for DestinationMarker {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
