//! Drives a build command through the mirroring engine.
//!
//! Output lines land in the output panel of an in-memory workspace the way an
//! editor's build system appends them. The virtual clock of the workspace is
//! advanced by wall-clock time so deferred destination creation behaves as it
//! would inside an editor.

use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::Context;
use relay_mirror::{MirrorConfig, MirrorSync, ModifyOutcome, SessionOutcome};
use relay_primitives::{Layout, SessionTrigger, SurfaceId, SurfaceSettings, WindowId};
use relay_workspace::Workspace;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Upper bound on one idle wait when no deferred work is scheduled.
const IDLE_WAIT: Duration = Duration::from_secs(3600);

/// One mirrored build: a workspace, its output panel, and the synchronizer.
pub struct Session {
	ws: Workspace,
	sync: MirrorSync,
	window: WindowId,
	panel: SurfaceId,
}

impl Session {
	/// Opens a window with `panes` panes and a file view, creates the output
	/// panel, and starts the mirroring session.
	pub fn open(config: MirrorConfig, panes: usize) -> anyhow::Result<Self> {
		let mut ws = Workspace::new();
		let window = ws.open_window(panes);
		ws.open_view(window, "untitled", "")?;

		let settings = SurfaceSettings {
			result_base_dir: std::env::current_dir().ok(),
			..SurfaceSettings::default()
		};
		let panel = ws.create_output_panel(window, &config.source_panel, settings)?;

		let trigger = SessionTrigger::new(window, config.trigger_command.clone());
		let mut sync = MirrorSync::new(config);
		let outcome = sync.on_session_start_trigger(&mut ws, &trigger);
		tracing::debug!(?outcome, "relay.session");
		if matches!(outcome, SessionOutcome::Ignored | SessionOutcome::NotReady { .. }) {
			anyhow::bail!("mirroring session did not start: {outcome:?}");
		}

		Ok(Self {
			ws,
			sync,
			window,
			panel,
		})
	}

	/// Appends `text` to the output panel and mirrors it.
	pub fn emit(&mut self, text: &str) -> anyhow::Result<ModifyOutcome> {
		self.ws.append(self.panel, text)?;
		Ok(self.sync.on_source_text_changed(&mut self.ws, self.panel))
	}

	/// Advances the clock by `elapsed` and runs the deferred work that
	/// became due.
	pub fn tick(&mut self, elapsed: Duration) {
		for task in self.ws.advance(elapsed) {
			let outcome = self.sync.run_deferred(&mut self.ws, task);
			tracing::debug!(?outcome, "relay.deferred");
		}
	}

	/// Time until the next deferred task is due.
	pub fn next_due_in(&self) -> Option<Duration> {
		self.ws.next_due_in()
	}

	/// Runs all outstanding deferred work and returns the results view text.
	///
	/// Falls back to the raw panel text if no results view could be bound.
	pub fn finish(mut self) -> String {
		while let Some(due) = self.ws.next_due_in() {
			self.tick(due);
		}

		let destination = self.sync.destination_of(self.panel);
		if let Some(destination) = destination {
			tracing::info!(
				%destination,
				slot = ?self.ws.pane_of(self.window, destination),
				"relay.done"
			);
		}
		match destination.and_then(|d| self.ws.text(d)) {
			Some(text) => text,
			None => {
				tracing::warn!(panel = %self.panel, "relay.unbound");
				self.ws.text(self.panel).unwrap_or_default()
			}
		}
	}
}

/// Formats the line build panels end with.
pub fn finished_trailer(elapsed: Duration, code: Option<i32>) -> String {
	let secs = elapsed.as_secs_f64();
	match code {
		Some(0) => format!("[Finished in {secs:.1}s]\n"),
		Some(code) => format!("[Finished in {secs:.1}s with exit code {code}]\n"),
		None => format!("[Finished in {secs:.1}s (terminated)]\n"),
	}
}

/// Decodes one line of command output, replacing invalid UTF-8 the way
/// build panels do, and terminates it with a newline.
fn decode_line(bytes: &[u8]) -> String {
	let mut line = String::from_utf8_lossy(bytes).into_owned();
	if !line.ends_with('\n') {
		line.push('\n');
	}
	line
}

/// Result of [`run`].
pub struct RunOutput {
	/// Results view text, trailer included.
	pub text: String,
	/// Exit status of the command.
	pub status: ExitStatus,
}

/// Runs `command`, mirroring its stdout and stderr line by line.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD.
pub async fn run(
	command: &[String],
	config: MirrorConfig,
	panes: usize,
) -> anyhow::Result<RunOutput> {
	let (program, args) = command.split_first().context("no command given")?;
	let mut session = Session::open(config, panes)?;

	let started = Instant::now();
	let mut child = Command::new(program)
		.args(args)
		.stdin(Stdio::null())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.kill_on_drop(true)
		.spawn()
		.with_context(|| format!("failed to spawn `{program}`"))?;
	tracing::info!(program = %program, pid = ?child.id(), "relay.spawned");

	let stdout = child.stdout.take().context("stdout not captured")?;
	let stderr = child.stderr.take().context("stderr not captured")?;
	let mut out = BufReader::new(stdout);
	let mut err = BufReader::new(stderr);
	let mut out_buf = Vec::new();
	let mut err_buf = Vec::new();
	let mut out_open = true;
	let mut err_open = true;
	let mut last_tick = Instant::now();

	while out_open || err_open {
		let wait = session.next_due_in().unwrap_or(IDLE_WAIT);
		tokio::select! {
			read = out.read_until(b'\n', &mut out_buf), if out_open => {
				match read.context("reading stdout")? {
					0 => out_open = false,
					_ => {
						session.emit(&decode_line(&out_buf))?;
					}
				}
				out_buf.clear();
			}
			read = err.read_until(b'\n', &mut err_buf), if err_open => {
				match read.context("reading stderr")? {
					0 => err_open = false,
					_ => {
						session.emit(&decode_line(&err_buf))?;
					}
				}
				err_buf.clear();
			}
			() = tokio::time::sleep(wait) => {}
		}
		session.tick(last_tick.elapsed());
		last_tick = Instant::now();
	}

	let status = child.wait().await.context("waiting for command")?;
	session.tick(last_tick.elapsed());
	session.emit(&finished_trailer(started.elapsed(), status.code()))?;
	tracing::info!(%status, "relay.finished");

	Ok(RunOutput {
		text: session.finish(),
		status,
	})
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn trailer_reports_time_and_failure() {
		assert_eq!(
			finished_trailer(Duration::from_millis(1234), Some(0)),
			"[Finished in 1.2s]\n"
		);
		assert_eq!(
			finished_trailer(Duration::from_millis(60), Some(101)),
			"[Finished in 0.1s with exit code 101]\n"
		);
		assert_eq!(
			finished_trailer(Duration::from_secs(2), None),
			"[Finished in 2.0s (terminated)]\n"
		);
	}

	#[test]
	fn session_mirrors_emitted_lines() {
		let mut session = Session::open(MirrorConfig::default(), 2).unwrap();
		assert!(matches!(
			session.emit("error: could not compile\n").unwrap(),
			ModifyOutcome::Written { .. }
		));
		session.emit("[Finished in 0.3s with exit code 101]\n").unwrap();
		assert_eq!(
			session.finish(),
			"error: could not compile\n[Finished in 0.3s with exit code 101]\n"
		);
	}

	#[test]
	fn deferred_view_is_created_on_finish() {
		let config = MirrorConfig {
			creation_delay_ms: 500,
			..MirrorConfig::default()
		};
		let mut session = Session::open(config, 1).unwrap();
		assert!(matches!(
			session.emit("warning: unused import\n").unwrap(),
			ModifyOutcome::Buffered { .. }
		));
		session.tick(Duration::from_millis(100));
		assert_eq!(session.next_due_in(), Some(Duration::from_millis(400)));
		assert_eq!(session.finish(), "warning: unused import\n");
	}

	#[test]
	fn invalid_utf8_is_replaced() {
		assert_eq!(decode_line(b"caf\xe9\n"), "caf\u{FFFD}\n");
		assert_eq!(decode_line(b"no newline"), "no newline\n");
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn run_survives_invalid_utf8_output() {
		let command = [
			"sh",
			"-c",
			"echo Compiling; printf 'caf\\351\\n'; echo done; exit 2",
		]
		.map(String::from);
		let output = run(&command, MirrorConfig::default(), 2).await.unwrap();
		assert_eq!(output.status.code(), Some(2));
		assert!(
			output.text.starts_with("Compiling\ncaf\u{FFFD}\ndone\n[Finished in "),
			"{}",
			output.text
		);
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn run_mirrors_command_output() {
		let command = ["sh", "-c", "echo Compiling; echo done; exit 3"].map(String::from);
		let output = run(&command, MirrorConfig::default(), 2).await.unwrap();
		assert_eq!(output.status.code(), Some(3));
		assert!(output.text.starts_with("Compiling\ndone\n[Finished in "));
		assert!(output.text.ends_with("with exit code 3]\n"));
	}
}
