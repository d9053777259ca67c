//! Host collaborator impls for [`Workspace`].

use std::ops::Range;
use std::time::Duration;

use relay_primitives::{
	Deferred, DeferredTask, DestinationMarker, DisplayMode, HostError, HostResult, Layout,
	PaneSlot, SurfaceId, SurfaceSettings, Surfaces, WindowId,
};

use crate::Workspace;
use crate::surface::SurfaceKind;

impl Surfaces for Workspace {
	fn find_output_panel(&self, window: WindowId, name: &str) -> Option<SurfaceId> {
		self.windows.get(&window)?.panels.get(name).copied()
	}

	fn find_existing_destination(
		&self,
		window: WindowId,
		marker: &DestinationMarker,
	) -> Option<SurfaceId> {
		let state = self.windows.get(&window)?;
		state.views().find(|id| {
			self.surfaces
				.get(id)
				.is_some_and(|s| s.marker() == Some(marker))
		})
	}

	fn create_surface(
		&mut self,
		window: WindowId,
		name: &str,
		scratch: bool,
	) -> HostResult<SurfaceId> {
		let id = self.open_view(window, name, "")?;
		if let Some(surface) = self.surfaces.get_mut(&id) {
			surface.scratch = scratch;
		}
		tracing::trace!(%window, %id, name, scratch, "workspace.view_created");
		Ok(id)
	}

	fn set_marker(&mut self, surface: SurfaceId, marker: &DestinationMarker) -> HostResult<()> {
		self.surface_mut(surface)?.set_marker(marker.clone());
		Ok(())
	}

	fn settings(&self, surface: SurfaceId) -> HostResult<SurfaceSettings> {
		Ok(self.surface_ref(surface)?.settings().clone())
	}

	fn set_attributes(
		&mut self,
		surface: SurfaceId,
		settings: &SurfaceSettings,
	) -> HostResult<()> {
		let target = self.surface_mut(surface)?;
		let mode = target.settings().display_mode.clone();
		target.set_settings(SurfaceSettings {
			display_mode: mode,
			..settings.clone()
		});
		Ok(())
	}

	fn assign_display_mode(&mut self, surface: SurfaceId, mode: &DisplayMode) -> HostResult<()> {
		self.surface_mut(surface)?.settings_mut().display_mode = mode.clone();
		Ok(())
	}

	fn len_chars(&self, surface: SurfaceId) -> HostResult<usize> {
		Ok(self.surface_ref(surface)?.len_chars())
	}

	fn get_text(&self, surface: SurfaceId, range: Range<usize>) -> HostResult<String> {
		self.surface_ref(surface)?.get_text(range)
	}

	fn replace_range(
		&mut self,
		surface: SurfaceId,
		range: Range<usize>,
		text: &str,
	) -> HostResult<()> {
		self.surface_mut(surface)?.replace(range, text)
	}

	fn set_read_only(&mut self, surface: SurfaceId, read_only: bool) -> HostResult<()> {
		self.surface_mut(surface)?.set_read_only(read_only);
		Ok(())
	}

	fn reveal(&mut self, surface: SurfaceId, offset: usize) -> HostResult<()> {
		self.surface_mut(surface)?.reveal(offset)
	}
}

impl Layout for Workspace {
	fn focus(&mut self, surface: SurfaceId) -> HostResult<()> {
		let is_view = self
			.surfaces
			.get(&surface)
			.is_some_and(|s| s.kind == SurfaceKind::View);
		if !is_view {
			return Err(HostError::SurfaceNotFound(surface));
		}
		let focused = self.windows.values_mut().any(|w| w.focus(surface));
		if focused {
			Ok(())
		} else {
			Err(HostError::SurfaceNotFound(surface))
		}
	}

	fn pane_count(&self, window: WindowId) -> usize {
		self.windows.get(&window).map_or(0, |w| w.pane_count())
	}

	fn pane_of(&self, window: WindowId, surface: SurfaceId) -> Option<PaneSlot> {
		self.windows.get(&window)?.slot_of(surface)
	}

	fn set_pane(&mut self, window: WindowId, surface: SurfaceId, slot: PaneSlot) -> HostResult<()> {
		self.window_mut(window)?.move_to(surface, slot)
	}

	fn active_pane(&self, window: WindowId) -> usize {
		self.windows.get(&window).map_or(0, |w| w.active_pane())
	}

	fn active_surface(&self, window: WindowId) -> Option<SurfaceId> {
		self.windows.get(&window)?.focused()
	}
}

impl Deferred for Workspace {
	fn schedule_deferred(&mut self, task: DeferredTask, delay: Duration) {
		tracing::trace!(
			source = %task.source,
			epoch = task.epoch.0,
			?delay,
			"workspace.defer"
		);
		self.deferred.push(task, delay);
	}
}
