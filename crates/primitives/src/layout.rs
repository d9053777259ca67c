use crate::ids::SurfaceId;

/// Position of a surface within a window's pane layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaneSlot {
	/// Pane index (0-based).
	pub pane: usize,
	/// Tab position within the pane (0-based).
	pub position: usize,
}

impl PaneSlot {
	/// Creates a slot at `pane`, `position`.
	pub const fn new(pane: usize, position: usize) -> Self {
		Self { pane, position }
	}
}

/// What the user is looking at before a destination is placed.
///
/// Captured before any destination is created or focused, since creating a
/// view focuses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
	/// Surface that had focus, if any.
	pub surface: Option<SurfaceId>,
	/// Active pane index.
	pub pane: usize,
}
