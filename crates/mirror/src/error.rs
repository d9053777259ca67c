//! Error types.

use std::path::PathBuf;

use relay_primitives::{HostError, SurfaceId, WindowId};
use thiserror::Error;

/// Conditions the synchronizer detects and recovers from.
///
/// These never cross the [`MirrorSync`](crate::MirrorSync) boundary. They are
/// logged where they are handled.
#[derive(Debug, Error)]
pub enum MirrorError {
	/// The destination is closed or no longer attached to the layout.
	#[error("destination {0} is no longer attached")]
	StaleBinding(SurfaceId),

	/// The output panel was missing when a session started.
	#[error("output panel `{panel}` does not exist in {window}")]
	SourceNotReady {
		/// Window the trigger ran in.
		window: WindowId,
		/// Panel name looked up.
		panel: String,
	},

	/// The source shrank below the last read offset.
	#[error("{surface} shrank from {last_read} to {len} chars")]
	OffsetAnomaly {
		/// Source surface.
		surface: SurfaceId,
		/// Offset read up to before the event.
		last_read: usize,
		/// Current source length.
		len: usize,
	},

	/// A host call failed.
	#[error(transparent)]
	Host(#[from] HostError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {}: {error}", path.display())]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML.
	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// A value parsed but is not usable.
	#[error("invalid config: {0}")]
	Invalid(String),
}
