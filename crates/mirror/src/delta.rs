//! Read-offset tracking over a growing source text.

use std::convert::Infallible;
use std::ops::Range;

use relay_primitives::TextSource;

/// Text appended to a source since the previous pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
	/// Char range of the source that was read.
	pub range: Range<usize>,
	/// Text in `range`.
	pub text: String,
	/// Set when the source shrank below the previous offset and the whole
	/// text was re-read from offset 0.
	pub resynced: bool,
}

impl Delta {
	/// Returns true if nothing new was read.
	pub fn is_empty(&self) -> bool {
		self.range.is_empty()
	}
}

/// Owns the last-read offset of one source.
///
/// The offset only moves forward, except on [`reset`](Self::reset) and on a
/// resync after the source shrank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeltaTracker {
	last_read: usize,
}

impl DeltaTracker {
	/// Creates a tracker at offset 0.
	pub const fn new() -> Self {
		Self { last_read: 0 }
	}

	/// Offset read up to, in chars.
	pub const fn last_read(&self) -> usize {
		self.last_read
	}

	/// Starts over from offset 0.
	pub fn reset(&mut self) {
		self.rewind_to(0);
	}

	/// Moves the offset back to `offset`. Never moves it forward.
	pub fn rewind_to(&mut self, offset: usize) {
		self.last_read = self.last_read.min(offset);
	}

	/// Reads everything past the last offset and advances to the end.
	pub fn pull<S: TextSource + ?Sized>(&mut self, source: &S) -> Delta {
		match self.try_pull(source.len_chars(), |range| {
			Ok::<_, Infallible>(source.slice(range))
		}) {
			Ok(delta) => delta,
			Err(never) => match never {},
		}
	}

	/// Like [`pull`](Self::pull) for sources whose reads can fail.
	///
	/// `len` is the current source length. The offset only advances when
	/// `read` succeeds, so a failed read is retried in full on the next pull.
	pub fn try_pull<E>(
		&mut self,
		len: usize,
		read: impl FnOnce(Range<usize>) -> Result<String, E>,
	) -> Result<Delta, E> {
		let resynced = len < self.last_read;
		let start = if resynced { 0 } else { self.last_read };
		let range = start..len;
		let text = if range.is_empty() {
			String::new()
		} else {
			read(range.clone())?
		};
		self.last_read = len;
		Ok(Delta {
			range,
			text,
			resynced,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pull_returns_appended_suffix() {
		let mut tracker = DeltaTracker::new();
		let first = tracker.pull("Compiling...\n");
		assert_eq!(first.text, "Compiling...\n");
		assert_eq!(first.range, 0..13);
		assert_eq!(tracker.last_read(), 13);

		let second = tracker.pull("Compiling...\nDone.\n");
		assert_eq!(second.text, "Done.\n");
		assert_eq!(second.range, 13..19);
		assert!(!second.resynced);
	}

	#[test]
	fn unchanged_source_yields_empty_delta() {
		let mut tracker = DeltaTracker::new();
		tracker.pull("abc");
		let delta = tracker.pull("abc");
		assert!(delta.is_empty());
		assert_eq!(delta.text, "");
		assert_eq!(tracker.last_read(), 3);
	}

	#[test]
	fn shrink_resyncs_from_zero() {
		let mut tracker = DeltaTracker::new();
		tracker.pull("Compiling foo v0.1.0\n");
		let delta = tracker.pull("error\n");
		assert!(delta.resynced);
		assert_eq!(delta.range, 0..6);
		assert_eq!(delta.text, "error\n");
		assert_eq!(tracker.last_read(), 6);
	}

	#[test]
	fn offsets_count_chars() {
		let mut tracker = DeltaTracker::new();
		tracker.pull("✓ ok\n");
		assert_eq!(tracker.last_read(), 5);
		let delta = tracker.pull("✓ ok\n→ next\n");
		assert_eq!(delta.text, "→ next\n");
	}

	#[test]
	fn failed_read_does_not_advance() {
		let mut tracker = DeltaTracker::new();
		tracker.pull("abc");
		let err = tracker.try_pull(6, |_| Err::<String, _>("gone"));
		assert_eq!(err, Err("gone"));
		assert_eq!(tracker.last_read(), 3);

		let delta = tracker.try_pull(6, |range| Ok::<_, ()>(format!("{range:?}"))).unwrap();
		assert_eq!(delta.text, "3..6");
	}

	#[test]
	fn rewind_rereads_the_tail() {
		let mut tracker = DeltaTracker::new();
		tracker.pull("abcdef");
		tracker.rewind_to(9);
		assert_eq!(tracker.last_read(), 6);
		tracker.rewind_to(4);
		let delta = tracker.pull("abcdefgh");
		assert_eq!(delta.range, 4..8);
		assert_eq!(delta.text, "efgh");
	}

	#[test]
	fn reset_rereads_everything() {
		let mut tracker = DeltaTracker::new();
		tracker.pull("abc");
		tracker.reset();
		let delta = tracker.pull("abcdef");
		assert_eq!(delta.text, "abcdef");
		assert!(!delta.resynced);
	}
}
