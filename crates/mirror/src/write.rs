//! The fenced replace-range write.
//!
//! Destinations stay read-only between writes so users cannot type into
//! mirrored output. Only this function lifts the fence, and it always puts it
//! back, even when the replacement itself fails.

use std::ops::Range;

use relay_primitives::{HostResult, SurfaceId, Surfaces};

/// Replaces `range` of `destination` with `text`.
///
/// Returns the char offset just past the inserted text. With `reveal`, the
/// destination is scrolled to that offset.
pub fn apply_replace_range<H: Surfaces + ?Sized>(
	host: &mut H,
	destination: SurfaceId,
	range: Range<usize>,
	text: &str,
	reveal: bool,
) -> HostResult<usize> {
	host.set_read_only(destination, false)?;
	let replaced = host.replace_range(destination, range.clone(), text);
	let fenced = host.set_read_only(destination, true);
	replaced?;
	fenced?;

	let end = range.start + text.chars().count();
	tracing::trace!(
		%destination,
		start = range.start,
		end = range.end,
		inserted = end - range.start,
		"mirror.write"
	);
	if reveal {
		host.reveal(destination, end)?;
	}
	Ok(end)
}

/// Replaces the whole text of `destination` with `text`.
pub fn replace_all<H: Surfaces + ?Sized>(
	host: &mut H,
	destination: SurfaceId,
	text: &str,
	reveal: bool,
) -> HostResult<usize> {
	let len = host.len_chars(destination)?;
	apply_replace_range(host, destination, 0..len, text, reveal)
}

#[cfg(test)]
mod tests {
	use relay_primitives::HostError;
	use relay_workspace::Workspace;

	use super::*;

	fn destination() -> (Workspace, SurfaceId) {
		let mut ws = Workspace::new();
		let window = ws.open_window(1);
		let view = ws.create_surface(window, "Build results", true).unwrap();
		ws.set_read_only(view, true).unwrap();
		(ws, view)
	}

	#[test]
	fn writes_through_the_fence_and_restores_it() {
		let (mut ws, view) = destination();
		let end = apply_replace_range(&mut ws, view, 0..0, "Compiling...\n", true).unwrap();
		assert_eq!(end, 13);
		let surface = ws.surface(view).unwrap();
		assert_eq!(surface.text(), "Compiling...\n");
		assert!(surface.is_read_only());
		assert_eq!(surface.revealed(), Some(13));
	}

	#[test]
	fn replaces_tail_range() {
		let (mut ws, view) = destination();
		apply_replace_range(&mut ws, view, 0..0, "abcdef", false).unwrap();
		let end = apply_replace_range(&mut ws, view, 3..6, "XY", false).unwrap();
		assert_eq!(end, 5);
		assert_eq!(ws.text(view).unwrap(), "abcXY");
		assert_eq!(ws.surface(view).unwrap().revealed(), None);
	}

	#[test]
	fn failed_replace_keeps_fence() {
		let (mut ws, view) = destination();
		let err = apply_replace_range(&mut ws, view, 4..9, "x", true).unwrap_err();
		assert_eq!(err, HostError::RangeOutOfBounds { range: 4..9, len: 0 });
		assert!(ws.surface(view).unwrap().is_read_only());
	}

	#[test]
	fn replace_all_overwrites_everything() {
		let (mut ws, view) = destination();
		apply_replace_range(&mut ws, view, 0..0, "old build output\n", false).unwrap();
		let end = replace_all(&mut ws, view, "", true).unwrap();
		assert_eq!(end, 0);
		assert_eq!(ws.text(view).unwrap(), "");
		assert_eq!(ws.surface(view).unwrap().revealed(), Some(0));
	}

	#[test]
	fn missing_destination_is_reported() {
		let (mut ws, view) = destination();
		ws.close_view(view);
		let err = apply_replace_range(&mut ws, view, 0..0, "x", false).unwrap_err();
		assert_eq!(err, HostError::SurfaceNotFound(view));
	}
}
