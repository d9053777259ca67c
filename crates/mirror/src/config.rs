//! Mirror configuration.
//!
//! Loaded from TOML. Every key is optional:
//!
//! ```toml
//! trigger-command = "build"
//! source-panel = "exec"
//! view-name = "Build results"
//! marker-key = "build_result_output_view"
//! creation-delay-ms = 0
//! relocate = true
//! reveal-writes = true
//! not-ready-notice = "Build output is not ready yet, try again.\n"
//! ```

use std::path::Path;
use std::time::Duration;

use relay_primitives::DestinationMarker;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Result type for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings for [`MirrorSync`](crate::MirrorSync).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct MirrorConfig {
	/// Host command that starts a session.
	pub trigger_command: String,
	/// Name of the output panel to mirror.
	pub source_panel: String,
	/// Title of the destination view.
	pub view_name: String,
	/// Marker key identifying destination views across sessions.
	pub marker_key: String,
	/// Delay before creating a missing destination. Zero creates it inline.
	pub creation_delay_ms: u64,
	/// Move the destination next to the pane the user was working in.
	pub relocate: bool,
	/// Scroll the destination to the end of each write.
	pub reveal_writes: bool,
	/// Written to the destination when the output panel is missing.
	pub not_ready_notice: String,
}

impl Default for MirrorConfig {
	fn default() -> Self {
		Self {
			trigger_command: "build".to_string(),
			source_panel: "exec".to_string(),
			view_name: "Build results".to_string(),
			marker_key: "build_result_output_view".to_string(),
			creation_delay_ms: 0,
			relocate: true,
			reveal_writes: true,
			not_ready_notice: "Build output is not ready yet, try again.\n".to_string(),
		}
	}
}

impl MirrorConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads and parses a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}

	/// Rejects empty identifiers.
	pub fn validate(&self) -> Result<()> {
		for (key, value) in [
			("trigger-command", &self.trigger_command),
			("source-panel", &self.source_panel),
			("view-name", &self.view_name),
			("marker-key", &self.marker_key),
		] {
			if value.trim().is_empty() {
				return Err(ConfigError::Invalid(format!("`{key}` must not be empty")));
			}
		}
		Ok(())
	}

	/// Renders the configuration as TOML.
	pub fn to_toml_string(&self) -> String {
		toml::to_string(self).unwrap_or_default()
	}

	/// Marker identifying the destination of the configured panel.
	pub fn marker(&self) -> DestinationMarker {
		DestinationMarker::for_panel(&self.marker_key, &self.source_panel)
	}

	/// Delay before deferred destination creation, if creation is deferred.
	pub fn creation_delay(&self) -> Option<Duration> {
		(self.creation_delay_ms > 0).then(|| Duration::from_millis(self.creation_delay_ms))
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	#[test]
	fn empty_document_yields_defaults() {
		let config = MirrorConfig::from_toml_str("").unwrap();
		assert_eq!(config, MirrorConfig::default());
		assert_eq!(config.creation_delay(), None);
		assert_eq!(config.marker().as_str(), "build_result_output_view:exec");
	}

	#[test]
	fn partial_document_overrides_keys() {
		let config = MirrorConfig::from_toml_str(
			r#"
			source-panel = "cargo"
			creation-delay-ms = 25
			relocate = false
			"#,
		)
		.unwrap();
		assert_eq!(config.source_panel, "cargo");
		assert_eq!(config.creation_delay(), Some(Duration::from_millis(25)));
		assert!(!config.relocate);
		assert_eq!(config.view_name, "Build results");
		assert_eq!(config.marker().as_str(), "build_result_output_view:cargo");
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let err = MirrorConfig::from_toml_str("relocat = true").unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)), "{err}");
	}

	#[test]
	fn empty_identifiers_are_rejected() {
		let err = MirrorConfig::from_toml_str(r#"view-name = " ""#).unwrap_err();
		assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("view-name")));
	}

	#[test]
	fn round_trips_through_toml() {
		let config = MirrorConfig {
			creation_delay_ms: 40,
			..MirrorConfig::default()
		};
		let parsed = MirrorConfig::from_toml_str(&config.to_toml_string()).unwrap();
		assert_eq!(parsed, config);
	}

	#[test]
	fn load_reads_file_and_reports_missing_path() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "trigger-command = \"make\"").unwrap();
		let config = MirrorConfig::load(file.path()).unwrap();
		assert_eq!(config.trigger_command, "make");

		let missing = file.path().with_extension("missing");
		let err = MirrorConfig::load(&missing).unwrap_err();
		assert!(matches!(err, ConfigError::Io { .. }));
	}
}
