//! Destination placement.
//!
//! Mirrored output goes next to the pane the user was working in, never on top
//! of it, and focus goes back to where it was once the move is done.

use relay_primitives::{HostResult, Layout, Origin, PaneSlot, SurfaceId, WindowId};

/// Pane to move the destination to, or `None` to leave it in place.
///
/// Prefers the pane after the origin and falls back to the one before it.
/// With fewer than two panes there is nowhere to go.
pub fn target_pane(origin_pane: usize, pane_count: usize) -> Option<usize> {
	if pane_count < 2 {
		return None;
	}
	let next = origin_pane + 1;
	if next < pane_count {
		Some(next)
	} else {
		origin_pane.checked_sub(1)
	}
}

/// Brings `destination` into view without keeping focus on it.
///
/// Returns the slot the destination was moved to, if it was moved. Nothing
/// happens when the user was already looking at the destination.
///
/// Focus goes back to the origin surface, or to whatever was active before
/// the move if the origin can no longer be focused.
pub fn relocate<H: Layout + ?Sized>(
	host: &mut H,
	window: WindowId,
	destination: SurfaceId,
	origin: Origin,
) -> HostResult<Option<PaneSlot>> {
	if origin.surface == Some(destination) {
		return Ok(None);
	}

	let previous = host.active_surface(window);
	host.focus(destination)?;
	let moved = match target_pane(origin.pane, host.pane_count(window)) {
		Some(pane) => {
			let slot = PaneSlot::new(pane, 0);
			host.set_pane(window, destination, slot).map(|()| Some(slot))
		}
		None => Ok(None),
	};
	restore_focus(host, destination, origin.surface, previous);
	moved
}

fn restore_focus<H: Layout + ?Sized>(
	host: &mut H,
	destination: SurfaceId,
	origin: Option<SurfaceId>,
	previous: Option<SurfaceId>,
) {
	let candidates = [origin, previous.filter(|&surface| surface != destination)];
	for surface in candidates.into_iter().flatten() {
		match host.focus(surface) {
			Ok(()) => return,
			Err(error) => tracing::debug!(%surface, %error, "mirror.refocus_failed"),
		}
	}
}

#[cfg(test)]
mod tests {
	use relay_workspace::Workspace;

	use super::*;

	#[test]
	fn prefers_next_pane() {
		assert_eq!(target_pane(0, 2), Some(1));
		assert_eq!(target_pane(1, 3), Some(2));
	}

	#[test]
	fn falls_back_to_previous_pane() {
		assert_eq!(target_pane(1, 2), Some(0));
		assert_eq!(target_pane(2, 3), Some(1));
	}

	#[test]
	fn single_pane_never_moves() {
		assert_eq!(target_pane(0, 1), None);
		assert_eq!(target_pane(0, 0), None);
	}

	#[test]
	fn moves_to_neighbor_and_restores_focus() {
		let mut ws = Workspace::new();
		let window = ws.open_window(2);
		let code = ws.open_view(window, "main.rs", "").unwrap();
		let output = ws.open_view(window, "Build results", "").unwrap();
		ws.focus(code).unwrap();
		let origin = Origin {
			surface: Some(code),
			pane: 0,
		};

		let moved = relocate(&mut ws, window, output, origin).unwrap();
		assert_eq!(moved, Some(PaneSlot::new(1, 0)));
		assert_eq!(ws.pane_of(window, output), Some(PaneSlot::new(1, 0)));
		assert_eq!(ws.active_surface(window), Some(code));
		assert_eq!(ws.active_pane(window), 0);
	}

	#[test]
	fn single_pane_keeps_slot_and_focus() {
		let mut ws = Workspace::new();
		let window = ws.open_window(1);
		let code = ws.open_view(window, "main.rs", "").unwrap();
		let output = ws.open_view(window, "Build results", "").unwrap();
		let origin = Origin {
			surface: Some(code),
			pane: 0,
		};

		assert_eq!(relocate(&mut ws, window, output, origin).unwrap(), None);
		assert_eq!(ws.pane_of(window, output), Some(PaneSlot::new(0, 1)));
		assert_eq!(ws.active_surface(window), Some(code));
	}

	#[test]
	fn closed_origin_falls_back_to_previous_focus() {
		let mut ws = Workspace::new();
		let window = ws.open_window(2);
		let code = ws.open_view(window, "main.rs", "").unwrap();
		let gone = ws.open_view(window, "lib.rs", "").unwrap();
		let output = ws.open_view(window, "Build results", "").unwrap();
		ws.close_view(gone);
		ws.focus(code).unwrap();
		let origin = Origin {
			surface: Some(gone),
			pane: 0,
		};

		let moved = relocate(&mut ws, window, output, origin).unwrap();
		assert_eq!(moved, Some(PaneSlot::new(1, 0)));
		assert_eq!(ws.active_surface(window), Some(code));
	}

	#[test]
	fn viewing_destination_is_left_alone() {
		let mut ws = Workspace::new();
		let window = ws.open_window(2);
		let output = ws.open_view(window, "Build results", "").unwrap();
		let origin = Origin {
			surface: Some(output),
			pane: 0,
		};
		assert_eq!(relocate(&mut ws, window, output, origin).unwrap(), None);
		assert_eq!(ws.pane_of(window, output), Some(PaneSlot::new(0, 0)));
	}
}
