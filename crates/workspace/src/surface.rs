//! Rope-backed surfaces.

use std::ops::Range;

use relay_primitives::{DestinationMarker, HostError, HostResult, SurfaceId, SurfaceSettings};
use ropey::Rope;

/// What a surface is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
	/// Output panel: not part of the pane layout.
	OutputPanel,
	/// Document view: lives in a pane.
	View,
}

/// A text surface held by the in-memory workspace.
#[derive(Debug, Clone)]
pub struct MemorySurface {
	/// Surface identifier.
	pub id: SurfaceId,
	/// Display name (tab title or panel name).
	pub name: String,
	/// Panel or view.
	pub kind: SurfaceKind,
	/// Scratch views never prompt for saving.
	pub scratch: bool,
	text: Rope,
	read_only: bool,
	settings: SurfaceSettings,
	marker: Option<DestinationMarker>,
	revealed: Option<usize>,
}

impl MemorySurface {
	pub(crate) fn new(id: SurfaceId, name: &str, kind: SurfaceKind, text: &str) -> Self {
		Self {
			id,
			name: name.to_string(),
			kind,
			scratch: false,
			text: Rope::from_str(text),
			read_only: false,
			settings: SurfaceSettings::default(),
			marker: None,
			revealed: None,
		}
	}

	/// Returns the full text.
	pub fn text(&self) -> String {
		self.text.to_string()
	}

	/// Returns the underlying rope.
	pub fn rope(&self) -> &Rope {
		&self.text
	}

	/// Length in chars.
	pub fn len_chars(&self) -> usize {
		self.text.len_chars()
	}

	/// Whether interactive edits are currently rejected.
	pub fn is_read_only(&self) -> bool {
		self.read_only
	}

	/// Current display settings.
	pub fn settings(&self) -> &SurfaceSettings {
		&self.settings
	}

	/// Persistent marker, if set.
	pub fn marker(&self) -> Option<&DestinationMarker> {
		self.marker.as_ref()
	}

	/// Last char offset scrolled into view.
	pub fn revealed(&self) -> Option<usize> {
		self.revealed
	}

	pub(crate) fn set_read_only(&mut self, read_only: bool) {
		self.read_only = read_only;
	}

	pub(crate) fn set_settings(&mut self, settings: SurfaceSettings) {
		self.settings = settings;
	}

	pub(crate) fn settings_mut(&mut self) -> &mut SurfaceSettings {
		&mut self.settings
	}

	pub(crate) fn set_marker(&mut self, marker: DestinationMarker) {
		self.marker = Some(marker);
	}

	pub(crate) fn reveal(&mut self, offset: usize) -> HostResult<()> {
		let len = self.len_chars();
		if offset > len {
			return Err(HostError::RangeOutOfBounds {
				range: offset..offset,
				len,
			});
		}
		self.revealed = Some(offset);
		Ok(())
	}

	fn check_range(&self, range: &Range<usize>) -> HostResult<()> {
		let len = self.len_chars();
		if range.start > range.end || range.end > len {
			return Err(HostError::RangeOutOfBounds {
				range: range.clone(),
				len,
			});
		}
		Ok(())
	}

	pub(crate) fn get_text(&self, range: Range<usize>) -> HostResult<String> {
		self.check_range(&range)?;
		Ok(self.text.slice(range).to_string())
	}

	/// Replaces `range`, honoring the read-only flag.
	pub(crate) fn replace(&mut self, range: Range<usize>, text: &str) -> HostResult<()> {
		if self.read_only {
			return Err(HostError::ReadOnly(self.id));
		}
		self.replace_unchecked(range, text)
	}

	/// Replaces `range` regardless of the read-only flag.
	pub(crate) fn replace_unchecked(&mut self, range: Range<usize>, text: &str) -> HostResult<()> {
		self.check_range(&range)?;
		let start = range.start;
		self.text.remove(range);
		self.text.insert(start, text);
		Ok(())
	}
}
