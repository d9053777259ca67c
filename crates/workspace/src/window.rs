//! Per-window pane layout and focus.

use relay_primitives::{HostError, HostResult, PaneSlot, SurfaceId};
use rustc_hash::FxHashMap;

/// Panes, focus and output panels of one window.
#[derive(Debug, Clone)]
pub(crate) struct WindowState {
	/// Views per pane, in tab order.
	panes: Vec<Vec<SurfaceId>>,
	active_pane: usize,
	focused: Option<SurfaceId>,
	/// Output panels by name.
	pub(crate) panels: FxHashMap<String, SurfaceId>,
}

impl WindowState {
	pub(crate) fn new(pane_count: usize) -> Self {
		Self {
			panes: vec![Vec::new(); pane_count.max(1)],
			active_pane: 0,
			focused: None,
			panels: FxHashMap::default(),
		}
	}

	pub(crate) fn pane_count(&self) -> usize {
		self.panes.len()
	}

	pub(crate) fn active_pane(&self) -> usize {
		self.active_pane
	}

	pub(crate) fn focused(&self) -> Option<SurfaceId> {
		self.focused
	}

	pub(crate) fn views(&self) -> impl Iterator<Item = SurfaceId> + '_ {
		self.panes.iter().flatten().copied()
	}

	pub(crate) fn slot_of(&self, surface: SurfaceId) -> Option<PaneSlot> {
		self.panes.iter().enumerate().find_map(|(pane, views)| {
			views
				.iter()
				.position(|&v| v == surface)
				.map(|position| PaneSlot::new(pane, position))
		})
	}

	/// Appends `surface` to the active pane.
	pub(crate) fn attach(&mut self, surface: SurfaceId) {
		self.panes[self.active_pane].push(surface);
	}

	/// Removes `surface` from the layout. Focus falls back to the first
	/// remaining view of the same pane.
	pub(crate) fn detach(&mut self, surface: SurfaceId) -> bool {
		let Some(slot) = self.slot_of(surface) else {
			return false;
		};
		self.panes[slot.pane].remove(slot.position);
		if self.focused == Some(surface) {
			self.focused = self.panes[slot.pane].first().copied();
		}
		true
	}

	pub(crate) fn focus(&mut self, surface: SurfaceId) -> bool {
		let Some(slot) = self.slot_of(surface) else {
			return false;
		};
		self.focused = Some(surface);
		self.active_pane = slot.pane;
		true
	}

	pub(crate) fn focus_pane(&mut self, pane: usize) -> HostResult<()> {
		let count = self.pane_count();
		if pane >= count {
			return Err(HostError::PaneOutOfBounds { pane, count });
		}
		self.active_pane = pane;
		self.focused = self.panes[pane].first().copied();
		Ok(())
	}

	pub(crate) fn move_to(&mut self, surface: SurfaceId, slot: PaneSlot) -> HostResult<()> {
		let count = self.pane_count();
		if slot.pane >= count {
			return Err(HostError::PaneOutOfBounds {
				pane: slot.pane,
				count,
			});
		}
		let Some(current) = self.slot_of(surface) else {
			return Err(HostError::SurfaceNotFound(surface));
		};
		self.panes[current.pane].remove(current.position);
		let target = &mut self.panes[slot.pane];
		let position = slot.position.min(target.len());
		target.insert(position, surface);
		if self.focused == Some(surface) {
			self.active_pane = slot.pane;
		}
		Ok(())
	}
}
