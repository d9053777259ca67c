use std::time::Duration;

use relay_primitives::{
	Deferred, DeferredKind, DeferredTask, DestinationMarker, HostError, Layout, PaneSlot,
	SessionEpoch, SurfaceId, SurfaceSettings, Surfaces,
};

use super::*;

fn task(source: u64, epoch: u64) -> DeferredTask {
	DeferredTask {
		source: SurfaceId(source),
		epoch: SessionEpoch(epoch),
		kind: DeferredKind::CreateDestination,
	}
}

#[test]
fn read_only_rejects_user_edits() {
	let mut ws = Workspace::new();
	let window = ws.open_window(1);
	let view = ws.open_view(window, "main.rs", "fn main() {}").unwrap();

	ws.set_read_only(view, true).unwrap();
	assert_eq!(ws.user_edit(view, 0, "x"), Err(HostError::ReadOnly(view)));
	assert_eq!(
		ws.replace_range(view, 0..0, "x"),
		Err(HostError::ReadOnly(view))
	);

	ws.set_read_only(view, false).unwrap();
	ws.user_edit(view, 0, "// ").unwrap();
	assert_eq!(ws.text(view).unwrap(), "// fn main() {}");
}

#[test]
fn host_append_ignores_read_only() {
	let mut ws = Workspace::new();
	let window = ws.open_window(1);
	let panel = ws
		.create_output_panel(window, "exec", SurfaceSettings::default())
		.unwrap();
	ws.set_read_only(panel, true).unwrap();
	ws.append(panel, "Compiling...\n").unwrap();
	ws.append(panel, "Done.\n").unwrap();
	assert_eq!(ws.text(panel).unwrap(), "Compiling...\nDone.\n");
}

#[test]
fn replace_range_checks_bounds() {
	let mut ws = Workspace::new();
	let window = ws.open_window(1);
	let view = ws.open_view(window, "a", "abc").unwrap();
	assert_eq!(
		ws.replace_range(view, 2..5, "x"),
		Err(HostError::RangeOutOfBounds { range: 2..5, len: 3 })
	);
	ws.replace_range(view, 1..3, "ZZ").unwrap();
	assert_eq!(ws.get_text(view, 0..3).unwrap(), "aZZ");
}

#[test]
fn output_panels_are_not_in_layout() {
	let mut ws = Workspace::new();
	let window = ws.open_window(2);
	let panel = ws
		.create_output_panel(window, "exec", SurfaceSettings::default())
		.unwrap();
	assert_eq!(ws.find_output_panel(window, "exec"), Some(panel));
	assert_eq!(ws.pane_of(window, panel), None);
	assert!(ws.focus(panel).is_err());
	assert_eq!(
		ws.create_output_panel(window, "exec", SurfaceSettings::default())
			.unwrap(),
		panel
	);
}

#[test]
fn set_pane_moves_view_and_keeps_focus_elsewhere() {
	let mut ws = Workspace::new();
	let window = ws.open_window(2);
	let code = ws.open_view(window, "lib.rs", "").unwrap();
	let other = ws.open_view(window, "out", "").unwrap();
	assert_eq!(ws.pane_of(window, other), Some(PaneSlot::new(0, 1)));

	ws.focus(code).unwrap();
	ws.set_pane(window, other, PaneSlot::new(1, 0)).unwrap();
	assert_eq!(ws.pane_of(window, other), Some(PaneSlot::new(1, 0)));
	assert_eq!(ws.active_surface(window), Some(code));
	assert_eq!(ws.active_pane(window), 0);

	assert_eq!(
		ws.set_pane(window, other, PaneSlot::new(2, 0)),
		Err(HostError::PaneOutOfBounds { pane: 2, count: 2 })
	);
}

#[test]
fn focus_follows_pane() {
	let mut ws = Workspace::new();
	let window = ws.open_window(2);
	let left = ws.open_view(window, "left", "").unwrap();
	ws.focus_pane(window, 1).unwrap();
	let right = ws.open_view(window, "right", "").unwrap();
	assert_eq!(ws.active_pane(window), 1);

	ws.focus(left).unwrap();
	assert_eq!(ws.active_pane(window), 0);
	assert_eq!(ws.active_surface(window), Some(left));
	assert_eq!(ws.pane_of(window, right), Some(PaneSlot::new(1, 0)));
}

#[test]
fn marker_lookup_skips_closed_views() {
	let mut ws = Workspace::new();
	let window = ws.open_window(1);
	let marker = DestinationMarker::for_panel("build_result_output_view", "exec");
	let view = ws.create_surface(window, "Build results", true).unwrap();
	ws.set_marker(view, &marker).unwrap();
	assert_eq!(ws.find_existing_destination(window, &marker), Some(view));

	assert!(ws.close_view(view));
	assert_eq!(ws.find_existing_destination(window, &marker), None);
	assert_eq!(ws.pane_of(window, view), None);
	assert_eq!(ws.len_chars(view), Err(HostError::SurfaceNotFound(view)));
}

#[test]
fn attributes_keep_display_mode_separate() {
	let mut ws = Workspace::new();
	let window = ws.open_window(1);
	let view = ws.open_view(window, "out", "").unwrap();
	let settings = SurfaceSettings {
		result_file_regex: Some("^(.+):(\\d+)".into()),
		line_numbers: true,
		..SurfaceSettings::default()
	};
	ws.set_attributes(view, &settings).unwrap();
	let stored = ws.settings(view).unwrap();
	assert_eq!(stored.result_file_regex.as_deref(), Some("^(.+):(\\d+)"));
	assert!(stored.line_numbers);
}

#[test]
fn deferred_tasks_run_in_due_order() {
	let mut ws = Workspace::new();
	ws.schedule_deferred(task(1, 1), Duration::from_millis(50));
	ws.schedule_deferred(task(2, 1), Duration::from_millis(10));
	ws.schedule_deferred(task(3, 1), Duration::from_millis(10));
	assert_eq!(ws.next_due_in(), Some(Duration::from_millis(10)));

	let first = ws.advance(Duration::from_millis(10));
	assert_eq!(first, vec![task(2, 1), task(3, 1)]);
	assert_eq!(ws.pending_tasks(), 1);
	assert_eq!(ws.next_due_in(), Some(Duration::from_millis(40)));

	assert!(ws.advance(Duration::from_millis(39)).is_empty());
	assert_eq!(ws.advance(Duration::from_millis(1)), vec![task(1, 1)]);
	assert_eq!(ws.now(), Duration::from_millis(60));
}
