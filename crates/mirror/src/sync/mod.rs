//! Per-source mirroring state machine.
//!
//! [`MirrorSync`] keeps one context per source surface:
//!
//! ```text
//! UNBOUND ──(destination located or created)──▶ BOUND
//!    ▲                                            │
//!    └──(destination closed, write failed, ───────┘
//!        or claimed by another source)
//! ```
//!
//! While unbound, deltas accumulate in the pending buffer. Binding flushes
//! that buffer as a full replacement, so after every flush the destination
//! holds exactly the source text up to the last read offset.
//!
//! Closed destinations are noticed lazily: at the next session start, or when
//! a write to them fails. There is no subscription to close events.

mod context;


use std::ops::Range;

use relay_primitives::{
	DeferredKind, DeferredTask, Host, HostResult, Origin, PaneSlot, SessionEpoch, SessionTrigger,
	SurfaceId, Surfaces, WindowId,
};
use rustc_hash::FxHashMap;

pub use context::ContextSnapshot;
use context::SyncContext;

use crate::config::MirrorConfig;
use crate::error::MirrorError;
use crate::placement;
use crate::write::{apply_replace_range, replace_all};

/// Result of a session start or of deferred destination creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
	/// Not a session trigger, or deferred work from a superseded session.
	Ignored,
	/// Destination bound and cleared for the new session.
	Bound {
		/// The bound destination.
		destination: SurfaceId,
	},
	/// Destination creation scheduled; output is buffered until it runs.
	Deferred {
		/// Session the creation belongs to.
		epoch: SessionEpoch,
	},
	/// No destination could be obtained; output is buffered.
	Unbound,
	/// The output panel was missing and the placeholder notice was written.
	NotReady {
		/// Destination holding the notice, if one could be obtained.
		destination: Option<SurfaceId>,
	},
}

/// Result of a source modification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifyOutcome {
	/// The surface is not a tracked source.
	Untracked,
	/// Nothing new to mirror.
	Unchanged,
	/// Delta appended to the pending buffer.
	Buffered {
		/// Pending buffer length in chars.
		pending: usize,
	},
	/// Destination range replaced.
	Written {
		/// Destination range that was replaced.
		range: Range<usize>,
		/// Chars inserted.
		inserted: usize,
	},
	/// The destination vanished. Session text was rebuffered and re-creation
	/// scheduled.
	Rebuffered {
		/// Pending buffer length in chars.
		pending: usize,
	},
}

/// How a live delta lands on the destination.
struct LiveWrite {
	/// Destination offset the text continues from.
	begin: usize,
	text: String,
	/// Replace the whole destination instead of continuing at `begin`.
	resync: bool,
}

/// Mirrors output panels into persistent destination views.
///
/// One instance serves every source; contexts are created lazily on the first
/// session start for a source. All entry points recover from failures
/// internally and report what happened through their return value.
#[derive(Debug, Default)]
pub struct MirrorSync {
	config: MirrorConfig,
	contexts: FxHashMap<SurfaceId, SyncContext>,
}

impl MirrorSync {
	/// Creates a synchronizer with no tracked sources.
	pub fn new(config: MirrorConfig) -> Self {
		Self {
			config,
			contexts: FxHashMap::default(),
		}
	}

	/// Returns the configuration.
	pub fn config(&self) -> &MirrorConfig {
		&self.config
	}

	/// Returns the state tracked for `source`.
	pub fn context(&self, source: SurfaceId) -> Option<ContextSnapshot> {
		self.contexts.get(&source).map(SyncContext::snapshot)
	}

	/// Returns the destination bound to `source`.
	pub fn destination_of(&self, source: SurfaceId) -> Option<SurfaceId> {
		self.contexts.get(&source)?.destination
	}

	/// Iterates over tracked sources.
	pub fn tracked_sources(&self) -> impl Iterator<Item = SurfaceId> + '_ {
		self.contexts.keys().copied()
	}

	/// Host entry point for commands that may start a session.
	///
	/// Only the configured trigger command starts a session, and not when it
	/// merely selects a build variant.
	pub fn on_session_start_trigger<H: Host + ?Sized>(
		&mut self,
		host: &mut H,
		trigger: &SessionTrigger,
	) -> SessionOutcome {
		if trigger.command != self.config.trigger_command || trigger.args.select {
			tracing::trace!(
				command = %trigger.command,
				select = trigger.args.select,
				"mirror.trigger_ignored"
			);
			return SessionOutcome::Ignored;
		}

		match host.find_output_panel(trigger.window, &self.config.source_panel) {
			Some(source) => self.on_session_start(host, trigger.window, source),
			None => self.write_not_ready(host, trigger.window),
		}
	}

	/// Starts a new mirroring session for `source`.
	///
	/// Rewinds the read offset, drops text buffered for the previous session,
	/// and revalidates the binding. The destination is cleared right away, or
	/// its creation is scheduled when creation is deferred.
	pub fn on_session_start<H: Host + ?Sized>(
		&mut self,
		host: &mut H,
		window: WindowId,
		source: SurfaceId,
	) -> SessionOutcome {
		let origin = Origin {
			surface: host.active_surface(window),
			pane: host.active_pane(window),
		};

		let ctx = self
			.contexts
			.entry(source)
			.or_insert_with(|| SyncContext::new(window));
		ctx.window = window;
		ctx.tracker.reset();
		if !ctx.pending.is_empty() {
			tracing::debug!(%source, discarded = ctx.pending.len(), "mirror.pending_discarded");
			ctx.pending.clear();
		}
		ctx.epoch = ctx.epoch.next();
		ctx.creation_pending = None;

		if let Some(destination) = ctx.destination
			&& host.pane_of(window, destination).is_none()
		{
			tracing::warn!(
				%source,
				error = %MirrorError::StaleBinding(destination),
				"mirror.stale_binding"
			);
			ctx.destination = None;
		}
		let bound = ctx.destination;
		tracing::info!(
			%source,
			%window,
			epoch = ctx.epoch.0,
			destination = ?bound,
			"mirror.session_start"
		);

		let existing =
			bound.or_else(|| host.find_existing_destination(window, &self.config.marker()));
		if let Some(destination) = existing
			&& self.bind_destination(host, source, destination)
		{
			self.place_after_bind(host, source, origin);
			return SessionOutcome::Bound { destination };
		}
		self.request_destination(host, source, origin)
	}

	/// Host entry point for source text changes.
	///
	/// Pulls the new delta and writes it to the bound destination, or buffers
	/// it while none is bound.
	pub fn on_source_text_changed<H: Host + ?Sized>(
		&mut self,
		host: &mut H,
		source: SurfaceId,
	) -> ModifyOutcome {
		let Some(ctx) = self.contexts.get_mut(&source) else {
			return ModifyOutcome::Untracked;
		};

		let len = match host.len_chars(source) {
			Ok(len) => len,
			Err(error) => {
				tracing::debug!(%source, %error, "mirror.source_unreadable");
				return ModifyOutcome::Unchanged;
			}
		};
		let before = ctx.tracker.last_read();
		let delta = match ctx.tracker.try_pull(len, |range| host.get_text(source, range)) {
			Ok(delta) => delta,
			Err(error) => {
				tracing::debug!(%source, %error, "mirror.source_unreadable");
				return ModifyOutcome::Unchanged;
			}
		};
		if delta.resynced {
			let anomaly = MirrorError::OffsetAnomaly {
				surface: source,
				last_read: before,
				len,
			};
			tracing::warn!(error = %anomaly, "mirror.offset_anomaly");
		}

		let Some(destination) = ctx.destination else {
			if delta.resynced {
				ctx.pending = delta.text;
			} else {
				ctx.pending.push_str(&delta.text);
			}
			let pending = ctx.pending.chars().count();
			tracing::trace!(%source, pending, "mirror.buffered");
			return ModifyOutcome::Buffered { pending };
		};

		if delta.is_empty() && !delta.resynced && ctx.pending.is_empty() {
			return ModifyOutcome::Unchanged;
		}

		let residual = std::mem::take(&mut ctx.pending);
		let write = if delta.resynced {
			LiveWrite {
				begin: 0,
				text: delta.text,
				resync: true,
			}
		} else {
			LiveWrite {
				begin: before.saturating_sub(residual.chars().count()),
				text: residual + &delta.text,
				resync: false,
			}
		};

		match self.write_live(host, source, destination, write) {
			Ok((range, inserted)) => ModifyOutcome::Written { range, inserted },
			Err(error) => self.recover_stale(host, source, destination, &MirrorError::from(error)),
		}
	}

	/// Binds `destination` to `source`.
	///
	/// Propagates display settings, flushes the pending buffer as a full
	/// replacement and records the binding. A destination bound to another
	/// source is taken over; that source rewinds and rebuffers its session.
	/// Returns false if `source` is untracked or the flush failed.
	pub fn bind_destination<H: Host + ?Sized>(
		&mut self,
		host: &mut H,
		source: SurfaceId,
		destination: SurfaceId,
	) -> bool {
		if !self.contexts.contains_key(&source) {
			return false;
		}

		if let Err(error) = propagate_settings(host, source, destination) {
			tracing::warn!(%source, %destination, %error, "mirror.settings_failed");
		}

		let reveal = self.config.reveal_writes;
		let Some(ctx) = self.contexts.get_mut(&source) else {
			return false;
		};
		match replace_all(host, destination, &ctx.pending, reveal) {
			Ok(_) => {
				tracing::debug!(
					%source,
					%destination,
					flushed = ctx.pending.len(),
					"mirror.bound"
				);
				ctx.pending.clear();
				ctx.destination = Some(destination);
				ctx.creation_pending = None;
				self.release_destination(destination, Some(source));
				true
			}
			Err(error) => {
				tracing::warn!(
					%source,
					error = %MirrorError::StaleBinding(destination),
					cause = %error,
					"mirror.bind_failed"
				);
				if ctx.destination == Some(destination) {
					ctx.destination = None;
				}
				false
			}
		}
	}

	/// Brings the destination of `source` into view next to the active pane,
	/// leaving focus where it is.
	pub fn relocate_destination<H: Host + ?Sized>(
		&self,
		host: &mut H,
		source: SurfaceId,
	) -> Option<PaneSlot> {
		let window = self.contexts.get(&source)?.window;
		let origin = Origin {
			surface: host.active_surface(window),
			pane: host.active_pane(window),
		};
		self.relocate_from(host, source, origin)
	}

	/// Runs deferred work previously handed to the host.
	///
	/// Tasks from a superseded session, or whose creation was already
	/// satisfied, are ignored.
	pub fn run_deferred<H: Host + ?Sized>(
		&mut self,
		host: &mut H,
		task: DeferredTask,
	) -> SessionOutcome {
		let DeferredKind::CreateDestination = task.kind;
		let source = task.source;
		let Some(ctx) = self.contexts.get_mut(&source) else {
			return SessionOutcome::Ignored;
		};
		if ctx.epoch != task.epoch || ctx.creation_pending != Some(task.epoch) {
			tracing::debug!(
				%source,
				task_epoch = task.epoch.0,
				epoch = ctx.epoch.0,
				"mirror.deferred_stale"
			);
			return SessionOutcome::Ignored;
		}
		ctx.creation_pending = None;

		let window = ctx.window;
		if let Some(destination) = ctx.destination
			&& host.pane_of(window, destination).is_some()
		{
			return SessionOutcome::Bound { destination };
		}

		// The user may have moved on since the session started.
		let origin = Origin {
			surface: host.active_surface(window),
			pane: host.active_pane(window),
		};
		let destination = match host.find_existing_destination(window, &self.config.marker()) {
			Some(destination) => destination,
			None => match self.create_destination(host, window) {
				Ok(destination) => destination,
				Err(error) => {
					tracing::warn!(%source, %error, "mirror.create_failed");
					return SessionOutcome::Unbound;
				}
			},
		};
		if !self.bind_destination(host, source, destination) {
			return SessionOutcome::Unbound;
		}
		self.place_after_bind(host, source, origin);
		SessionOutcome::Bound { destination }
	}

	/// Host entry point for a discarded source. Drops its context.
	pub fn on_source_closed(&mut self, source: SurfaceId) -> bool {
		self.contexts.remove(&source).is_some()
	}

	fn request_destination<H: Host + ?Sized>(
		&mut self,
		host: &mut H,
		source: SurfaceId,
		origin: Origin,
	) -> SessionOutcome {
		let Some(ctx) = self.contexts.get_mut(&source) else {
			return SessionOutcome::Ignored;
		};

		if let Some(delay) = self.config.creation_delay() {
			let epoch = ctx.epoch;
			ctx.creation_pending = Some(epoch);
			host.schedule_deferred(
				DeferredTask {
					source,
					epoch,
					kind: DeferredKind::CreateDestination,
				},
				delay,
			);
			tracing::debug!(
				%source,
				epoch = epoch.0,
				?delay,
				"mirror.creation_deferred"
			);
			return SessionOutcome::Deferred { epoch };
		}

		let window = ctx.window;
		match self.create_destination(host, window) {
			Ok(destination) => {
				if !self.bind_destination(host, source, destination) {
					return SessionOutcome::Unbound;
				}
				self.place_after_bind(host, source, origin);
				SessionOutcome::Bound { destination }
			}
			Err(error) => {
				tracing::warn!(%source, %error, "mirror.create_failed");
				SessionOutcome::Unbound
			}
		}
	}

	fn create_destination<H: Host + ?Sized>(
		&self,
		host: &mut H,
		window: WindowId,
	) -> HostResult<SurfaceId> {
		let destination = host.create_surface(window, &self.config.view_name, true)?;
		host.set_marker(destination, &self.config.marker())?;
		host.set_read_only(destination, true)?;
		tracing::debug!(%window, %destination, "mirror.destination_created");
		Ok(destination)
	}

	fn write_live<H: Host + ?Sized>(
		&self,
		host: &mut H,
		source: SurfaceId,
		destination: SurfaceId,
		write: LiveWrite,
	) -> HostResult<(Range<usize>, usize)> {
		let reveal = self.config.reveal_writes;
		let len = host.len_chars(destination)?;

		if write.resync {
			let end = apply_replace_range(host, destination, 0..len, &write.text, reveal)?;
			return Ok((0..len, end));
		}

		if len != write.begin {
			tracing::warn!(
				%source,
				%destination,
				expected = write.begin,
				actual = len,
				"mirror.destination_diverged"
			);
			let last_read = self
				.contexts
				.get(&source)
				.map_or(0, |ctx| ctx.tracker.last_read());
			let full = host.get_text(source, 0..last_read)?;
			let end = apply_replace_range(host, destination, 0..len, &full, reveal)?;
			return Ok((0..len, end));
		}

		let end = apply_replace_range(host, destination, write.begin..len, &write.text, reveal)?;
		Ok((write.begin..len, end - write.begin))
	}

	/// Unbinds a destination that stopped accepting writes and schedules its
	/// replacement. The session text read so far goes back into the buffer.
	fn recover_stale<H: Host + ?Sized>(
		&mut self,
		host: &mut H,
		source: SurfaceId,
		destination: SurfaceId,
		cause: &MirrorError,
	) -> ModifyOutcome {
		tracing::warn!(
			%source,
			error = %MirrorError::StaleBinding(destination),
			%cause,
			"mirror.stale_binding"
		);
		let delay = self.config.creation_delay().unwrap_or_default();
		let Some(ctx) = self.contexts.get_mut(&source) else {
			return ModifyOutcome::Untracked;
		};

		ctx.destination = None;
		match host.get_text(source, 0..ctx.tracker.last_read()) {
			Ok(text) => ctx.pending = text,
			Err(_) => {
				ctx.tracker.reset();
				ctx.pending.clear();
			}
		}

		ctx.creation_pending = Some(ctx.epoch);
		host.schedule_deferred(
			DeferredTask {
				source,
				epoch: ctx.epoch,
				kind: DeferredKind::CreateDestination,
			},
			delay,
		);
		ModifyOutcome::Rebuffered {
			pending: ctx.pending.chars().count(),
		}
	}

	fn write_not_ready<H: Host + ?Sized>(&mut self, host: &mut H, window: WindowId) -> SessionOutcome {
		let not_ready = MirrorError::SourceNotReady {
			window,
			panel: self.config.source_panel.clone(),
		};
		tracing::warn!(error = %not_ready, "mirror.source_not_ready");

		let destination = match host.find_existing_destination(window, &self.config.marker()) {
			Some(destination) => destination,
			None => match self.create_destination(host, window) {
				Ok(destination) => destination,
				Err(error) => {
					tracing::warn!(%window, %error, "mirror.create_failed");
					return SessionOutcome::NotReady { destination: None };
				}
			},
		};
		self.release_destination(destination, None);

		match replace_all(host, destination, &self.config.not_ready_notice, false) {
			Ok(_) => SessionOutcome::NotReady {
				destination: Some(destination),
			},
			Err(error) => {
				tracing::warn!(%window, %destination, %error, "mirror.notice_failed");
				SessionOutcome::NotReady { destination: None }
			}
		}
	}

	/// Unbinds `destination` from every context except `keep`.
	fn release_destination(&mut self, destination: SurfaceId, keep: Option<SurfaceId>) {
		for (&source, ctx) in &mut self.contexts {
			if Some(source) != keep && ctx.destination == Some(destination) {
				tracing::warn!(%source, %destination, "mirror.destination_reclaimed");
				ctx.unbind_and_rewind();
			}
		}
	}

	fn place_after_bind<H: Host + ?Sized>(&self, host: &mut H, source: SurfaceId, origin: Origin) {
		if self.config.relocate {
			self.relocate_from(host, source, origin);
		}
	}

	fn relocate_from<H: Host + ?Sized>(
		&self,
		host: &mut H,
		source: SurfaceId,
		origin: Origin,
	) -> Option<PaneSlot> {
		let ctx = self.contexts.get(&source)?;
		let destination = ctx.destination?;
		match placement::relocate(host, ctx.window, destination, origin) {
			Ok(slot) => {
				tracing::trace!(%source, %destination, slot = ?slot, "mirror.relocated");
				slot
			}
			Err(error) => {
				tracing::warn!(%source, %destination, %error, "mirror.relocate_failed");
				None
			}
		}
	}
}

fn propagate_settings<H: Surfaces + ?Sized>(
	host: &mut H,
	source: SurfaceId,
	destination: SurfaceId,
) -> HostResult<()> {
	let settings = host.settings(source)?;
	host.set_attributes(destination, &settings)?;
	host.assign_display_mode(destination, &settings.display_mode)
}
