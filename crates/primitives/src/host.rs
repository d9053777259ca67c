//! Host collaborator traits.
//!
//! The mirroring engine is written against these traits only. A host is any
//! value implementing [`Surfaces`], [`Layout`] and [`Deferred`]; the blanket
//! [`Host`] impl bundles them.

use std::ops::Range;
use std::time::Duration;

use crate::error::HostResult;
use crate::ids::{DestinationMarker, SurfaceId, WindowId};
use crate::layout::PaneSlot;
use crate::settings::{DisplayMode, SurfaceSettings};
use crate::task::DeferredTask;

/// Text surfaces: output panels and document views.
pub trait Surfaces {
	/// Finds the output panel called `name` in `window`.
	fn find_output_panel(&self, window: WindowId, name: &str) -> Option<SurfaceId>;

	/// Finds a document view in `window` carrying `marker`.
	fn find_existing_destination(
		&self,
		window: WindowId,
		marker: &DestinationMarker,
	) -> Option<SurfaceId>;

	/// Creates a new document view in `window`'s active pane.
	///
	/// Scratch views never prompt for saving.
	fn create_surface(&mut self, window: WindowId, name: &str, scratch: bool)
	-> HostResult<SurfaceId>;

	/// Tags `surface` with a persistent marker.
	fn set_marker(&mut self, surface: SurfaceId, marker: &DestinationMarker) -> HostResult<()>;

	/// Returns the display settings of `surface`.
	fn settings(&self, surface: SurfaceId) -> HostResult<SurfaceSettings>;

	/// Applies display settings to `surface`.
	fn set_attributes(&mut self, surface: SurfaceId, settings: &SurfaceSettings)
	-> HostResult<()>;

	/// Assigns a syntax / display mode to `surface`.
	fn assign_display_mode(&mut self, surface: SurfaceId, mode: &DisplayMode) -> HostResult<()>;

	/// Returns the length of `surface` in chars.
	fn len_chars(&self, surface: SurfaceId) -> HostResult<usize>;

	/// Returns the text of `surface` in the char `range`.
	fn get_text(&self, surface: SurfaceId, range: Range<usize>) -> HostResult<String>;

	/// Replaces the char `range` of `surface` with `text`.
	///
	/// Fails with [`HostError::ReadOnly`] while the surface is read-only.
	///
	/// [`HostError::ReadOnly`]: crate::HostError::ReadOnly
	fn replace_range(&mut self, surface: SurfaceId, range: Range<usize>, text: &str)
	-> HostResult<()>;

	/// Sets the read-only flag of `surface`.
	fn set_read_only(&mut self, surface: SurfaceId, read_only: bool) -> HostResult<()>;

	/// Scrolls `surface` so that the char `offset` is visible.
	fn reveal(&mut self, surface: SurfaceId, offset: usize) -> HostResult<()>;
}

/// Window and pane layout.
pub trait Layout {
	/// Gives `surface` input focus, bringing it to the front of its pane.
	fn focus(&mut self, surface: SurfaceId) -> HostResult<()>;

	/// Number of panes in `window`.
	fn pane_count(&self, window: WindowId) -> usize;

	/// Where `surface` sits in `window`, or `None` if it is not attached.
	fn pane_of(&self, window: WindowId, surface: SurfaceId) -> Option<PaneSlot>;

	/// Moves `surface` to `slot` in `window`.
	fn set_pane(&mut self, window: WindowId, surface: SurfaceId, slot: PaneSlot)
	-> HostResult<()>;

	/// Index of the active pane in `window`.
	fn active_pane(&self, window: WindowId) -> usize;

	/// Surface with focus in `window`.
	fn active_surface(&self, window: WindowId) -> Option<SurfaceId>;
}

/// Deferred scheduling.
pub trait Deferred {
	/// Hands `task` back to the synchronizer once `delay` has elapsed.
	fn schedule_deferred(&mut self, task: DeferredTask, delay: Duration);
}

/// A complete host: surfaces, layout and deferred scheduling.
pub trait Host: Surfaces + Layout + Deferred {}

impl<T: Surfaces + Layout + Deferred + ?Sized> Host for T {}
