//! Display-affecting settings copied from an output panel to its mirror.

use std::path::PathBuf;

/// Syntax or display mode assigned to a surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayMode(pub String);

impl DisplayMode {
	/// The plain-text mode.
	pub fn plain() -> Self {
		Self("Plain Text".to_string())
	}

	/// Returns the mode identifier.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Default for DisplayMode {
	fn default() -> Self {
		Self::plain()
	}
}

/// The fixed set of settings propagated from source to destination.
///
/// Result regexes and base directory let the destination keep supporting
/// jump-to-error navigation once it no longer lives in the output panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSettings {
	/// Regex matching `file:line:col: message` style results.
	pub result_file_regex: Option<String>,
	/// Regex matching line-only results, used together with the file regex.
	pub result_line_regex: Option<String>,
	/// Directory relative result paths are resolved against.
	pub result_base_dir: Option<PathBuf>,
	/// Soft-wrap long lines.
	pub word_wrap: bool,
	/// Show line numbers.
	pub line_numbers: bool,
	/// Show the gutter.
	pub gutter: bool,
	/// Allow scrolling past the last line.
	pub scroll_past_end: bool,
	/// Syntax / display mode.
	pub display_mode: DisplayMode,
}

impl Default for SurfaceSettings {
	fn default() -> Self {
		Self {
			result_file_regex: None,
			result_line_regex: None,
			result_base_dir: None,
			word_wrap: true,
			line_numbers: false,
			gutter: false,
			scroll_past_end: false,
			display_mode: DisplayMode::plain(),
		}
	}
}
