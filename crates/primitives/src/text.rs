use std::ops::Range;

use ropey::Rope;

/// Char-indexed read access to a text.
///
/// Offsets and lengths are in chars, never bytes.
pub trait TextSource {
	/// Returns the length in chars.
	fn len_chars(&self) -> usize;

	/// Returns the text in `range`. The range is always within `0..len_chars()`.
	fn slice(&self, range: Range<usize>) -> String;
}

impl TextSource for str {
	fn len_chars(&self) -> usize {
		self.chars().count()
	}

	fn slice(&self, range: Range<usize>) -> String {
		self.chars()
			.skip(range.start)
			.take(range.end.saturating_sub(range.start))
			.collect()
	}
}

impl TextSource for String {
	fn len_chars(&self) -> usize {
		self.as_str().len_chars()
	}

	fn slice(&self, range: Range<usize>) -> String {
		self.as_str().slice(range)
	}
}

impl TextSource for Rope {
	fn len_chars(&self) -> usize {
		Rope::len_chars(self)
	}

	fn slice(&self, range: Range<usize>) -> String {
		Rope::slice(self, range).to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn str_slices_by_char() {
		let text = "héllo wörld";
		assert_eq!(TextSource::len_chars(text), 11);
		assert_eq!(TextSource::slice(text, 1..5), "éllo");
		assert_eq!(TextSource::slice(text, 6..11), "wörld");
	}

	#[test]
	fn rope_matches_str() {
		let text = "Compiling... ✓\nDone.\n";
		let rope = Rope::from_str(text);
		assert_eq!(TextSource::len_chars(&rope), TextSource::len_chars(text));
		assert_eq!(TextSource::slice(&rope, 3..16), TextSource::slice(text, 3..16));
	}
}
