//! In-memory editor host.
//!
//! [`Workspace`] implements the host collaborator traits from
//! `relay-primitives` over rope-backed surfaces, windows split into panes, and
//! a virtual clock for deferred tasks. It backs the `relay` binary and the
//! mirroring tests.
//!
//! Output panels live outside the pane layout; document views are attached to
//! exactly one pane. Closing a view drops it entirely, so a mirror bound to it
//! observes a stale binding on its next session.

mod clock;
mod host;
mod surface;
mod window;

#[cfg(test)]
mod tests;

use std::time::Duration;

use relay_primitives::{
	DeferredTask, HostError, HostResult, SurfaceId, SurfaceSettings, WindowId,
};
use rustc_hash::FxHashMap;

pub use surface::{MemorySurface, SurfaceKind};

use clock::DeferredQueue;
use window::WindowState;

/// Owns surfaces and windows, and generates unique IDs.
#[derive(Debug, Default)]
pub struct Workspace {
	surfaces: FxHashMap<SurfaceId, MemorySurface>,
	windows: FxHashMap<WindowId, WindowState>,
	next_id: u64,
	deferred: DeferredQueue,
}

impl Workspace {
	/// Creates an empty workspace.
	pub fn new() -> Self {
		Self::default()
	}

	fn next_id(&mut self) -> u64 {
		self.next_id += 1;
		self.next_id
	}

	/// Opens a window split into `panes` panes (at least one).
	pub fn open_window(&mut self, panes: usize) -> WindowId {
		let id = WindowId(self.next_id());
		self.windows.insert(id, WindowState::new(panes));
		id
	}

	fn window(&self, window: WindowId) -> HostResult<&WindowState> {
		self.windows
			.get(&window)
			.ok_or(HostError::WindowNotFound(window))
	}

	fn window_mut(&mut self, window: WindowId) -> HostResult<&mut WindowState> {
		self.windows
			.get_mut(&window)
			.ok_or(HostError::WindowNotFound(window))
	}

	fn window_of(&self, surface: SurfaceId) -> Option<WindowId> {
		self.windows
			.iter()
			.find(|(_, w)| w.slot_of(surface).is_some())
			.map(|(id, _)| *id)
	}

	pub(crate) fn surface_ref(&self, surface: SurfaceId) -> HostResult<&MemorySurface> {
		self.surfaces
			.get(&surface)
			.ok_or(HostError::SurfaceNotFound(surface))
	}

	pub(crate) fn surface_mut(&mut self, surface: SurfaceId) -> HostResult<&mut MemorySurface> {
		self.surfaces
			.get_mut(&surface)
			.ok_or(HostError::SurfaceNotFound(surface))
	}

	/// Opens a document view with `text` in the active pane and focuses it.
	pub fn open_view(&mut self, window: WindowId, name: &str, text: &str) -> HostResult<SurfaceId> {
		self.window(window)?;
		let id = SurfaceId(self.next_id());
		self.surfaces
			.insert(id, MemorySurface::new(id, name, SurfaceKind::View, text));
		let state = self.window_mut(window)?;
		state.attach(id);
		state.focus(id);
		Ok(id)
	}

	/// Creates (or returns) the output panel called `name` in `window`.
	pub fn create_output_panel(
		&mut self,
		window: WindowId,
		name: &str,
		settings: SurfaceSettings,
	) -> HostResult<SurfaceId> {
		if let Some(&existing) = self.window(window)?.panels.get(name) {
			return Ok(existing);
		}
		let id = SurfaceId(self.next_id());
		let mut panel = MemorySurface::new(id, name, SurfaceKind::OutputPanel, "");
		panel.set_settings(settings);
		self.surfaces.insert(id, panel);
		self.window_mut(window)?.panels.insert(name.to_string(), id);
		tracing::trace!(%window, %id, name, "workspace.panel_created");
		Ok(id)
	}

	/// Destroys the output panel called `name`, returning its ID.
	pub fn destroy_output_panel(&mut self, window: WindowId, name: &str) -> Option<SurfaceId> {
		let id = self.windows.get_mut(&window)?.panels.remove(name)?;
		self.surfaces.remove(&id);
		Some(id)
	}

	/// Appends `text` to a surface as the host itself, ignoring read-only.
	pub fn append(&mut self, surface: SurfaceId, text: &str) -> HostResult<()> {
		let target = self.surface_mut(surface)?;
		let end = target.len_chars();
		target.replace_unchecked(end..end, text)
	}

	/// Replaces the whole text of a surface as the host itself.
	pub fn set_text(&mut self, surface: SurfaceId, text: &str) -> HostResult<()> {
		let target = self.surface_mut(surface)?;
		let len = target.len_chars();
		target.replace_unchecked(0..len, text)
	}

	/// Simulates the user typing into a surface; honors the read-only flag.
	pub fn user_edit(&mut self, surface: SurfaceId, offset: usize, text: &str) -> HostResult<()> {
		self.surface_mut(surface)?.replace(offset..offset, text)
	}

	/// Closes a document view, removing it from its pane.
	pub fn close_view(&mut self, surface: SurfaceId) -> bool {
		if let Some(window) = self.window_of(surface)
			&& let Some(state) = self.windows.get_mut(&window)
		{
			state.detach(surface);
		}
		self.surfaces.remove(&surface).is_some()
	}

	/// Focuses the first view of `pane`.
	pub fn focus_pane(&mut self, window: WindowId, pane: usize) -> HostResult<()> {
		self.window_mut(window)?.focus_pane(pane)
	}

	/// Returns a surface.
	pub fn surface(&self, surface: SurfaceId) -> Option<&MemorySurface> {
		self.surfaces.get(&surface)
	}

	/// Returns the full text of a surface.
	pub fn text(&self, surface: SurfaceId) -> Option<String> {
		self.surfaces.get(&surface).map(MemorySurface::text)
	}

	/// Returns the document views of `window`, pane by pane.
	pub fn views(&self, window: WindowId) -> Vec<SurfaceId> {
		self.windows
			.get(&window)
			.map(|w| w.views().collect())
			.unwrap_or_default()
	}

	/// Current virtual time.
	pub fn now(&self) -> Duration {
		self.deferred.now()
	}

	/// Number of deferred tasks not yet due.
	pub fn pending_tasks(&self) -> usize {
		self.deferred.len()
	}

	/// Time until the earliest deferred task is due.
	pub fn next_due_in(&self) -> Option<Duration> {
		self.deferred.next_due_in()
	}

	/// Advances the virtual clock, returning the tasks that became due.
	///
	/// The caller hands each task back to the synchronizer.
	pub fn advance(&mut self, by: Duration) -> Vec<DeferredTask> {
		self.deferred.advance(by)
	}
}
