use crate::ns::{NsError, Result};

/// Separator between record-field segments.
pub const NAMESPACE_SEPARATOR: char = '.';
/// Opens an index or key selector.
pub const LEFT_BRACKET: char = '[';
/// Closes an index or key selector.
pub const RIGHT_BRACKET: char = ']';

/// One selector of a namespace path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
	/// Record field name.
	Field(&'a str),
	/// Raw bracket content: a sequence index or a map key.
	Key(&'a str),
}

/// Selector plus its byte offset in the namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
	/// Byte offset where the segment starts (the `[` for keys).
	pub offset: usize,
	/// Parsed selector.
	pub selector: Selector<'a>,
}

/// Parsed namespace such as `Address.Lines[2]` or `Tags[red].Name`.
#[derive(Debug, Clone)]
pub struct NamespacePath<'a> {
	/// Original namespace text.
	pub raw: &'a str,
	/// Segments in traversal order.
	pub segments: Vec<Segment<'a>>,
}

impl<'a> NamespacePath<'a> {
	/// Split a namespace into field and bracket selectors.
	///
	/// A field runs until the next `.` or `[`. Bracket content runs until the first `]`, so keys may
	/// contain `.` (`Ratios[0.5]`). One `.` after `]` is optional: `A[0].B` and `A[0]B` are the same
	/// path, and chained brackets (`A[0][1]`) need no separator. The empty namespace has no segments.
	pub fn parse(raw: &'a str) -> Result<Self> {
		let mut segments = Vec::new();
		let mut rest = raw;

		while !rest.is_empty() {
			let offset = raw.len() - rest.len();

			if let Some(after_open) = rest.strip_prefix(LEFT_BRACKET) {
				let close = after_open.find(RIGHT_BRACKET).ok_or_else(|| invalid(raw, offset, "unclosed '['"))?;
				segments.push(Segment {
					offset,
					selector: Selector::Key(&after_open[..close]),
				});
				rest = &after_open[close + 1..];
			} else {
				let end = rest.find([NAMESPACE_SEPARATOR, LEFT_BRACKET]).unwrap_or(rest.len());
				if end == 0 {
					return Err(invalid(raw, offset, "empty field name"));
				}
				segments.push(Segment {
					offset,
					selector: Selector::Field(&rest[..end]),
				});
				rest = &rest[end..];
			}

			if let Some(after_dot) = rest.strip_prefix(NAMESPACE_SEPARATOR) {
				if after_dot.is_empty() {
					return Err(invalid(raw, raw.len() - 1, "trailing '.'"));
				}
				rest = after_dot;
			}
		}

		Ok(Self { raw, segments })
	}

	/// Unconsumed namespace text starting at segment `idx`.
	pub fn remaining(&self, idx: usize) -> &'a str {
		self.segments.get(idx).map_or("", |segment| &self.raw[segment.offset..])
	}
}

pub(crate) fn invalid(namespace: &str, offset: usize, detail: impl Into<String>) -> NsError {
	NsError::InvalidNamespace {
		namespace: namespace.to_owned(),
		offset,
		detail: detail.into(),
	}
}

#[cfg(test)]
mod tests {
	use super::{NamespacePath, Selector};

	fn selectors(raw: &str) -> Vec<Selector<'_>> {
		NamespacePath::parse(raw)
			.expect("namespace parses")
			.segments
			.into_iter()
			.map(|segment| segment.selector)
			.collect()
	}

	#[test]
	fn dotted_fields_and_brackets() {
		assert_eq!(
			selectors("Address.Lines[2]"),
			vec![Selector::Field("Address"), Selector::Field("Lines"), Selector::Key("2")]
		);
		assert_eq!(
			selectors("A.B[0].C"),
			vec![Selector::Field("A"), Selector::Field("B"), Selector::Key("0"), Selector::Field("C")]
		);
	}

	#[test]
	fn separator_after_bracket_is_optional() {
		assert_eq!(selectors("A.B[0]C"), selectors("A.B[0].C"));
		assert_eq!(selectors("A[0][1]"), vec![Selector::Field("A"), Selector::Key("0"), Selector::Key("1")]);
	}

	#[test]
	fn keys_keep_dots_and_leading_brackets_work() {
		assert_eq!(selectors("Ratios[0.5].X"), vec![Selector::Field("Ratios"), Selector::Key("0.5"), Selector::Field("X")]);
		assert_eq!(selectors("[3]"), vec![Selector::Key("3")]);
		assert_eq!(selectors("Tags[]"), vec![Selector::Field("Tags"), Selector::Key("")]);
	}

	#[test]
	fn empty_namespace_has_no_segments() {
		assert!(selectors("").is_empty());
	}

	#[test]
	fn malformed_namespaces_are_rejected() {
		for raw in ["A[0", ".A", "A..B", "A.", "A[0]."] {
			assert!(NamespacePath::parse(raw).is_err(), "expected {raw:?} to be rejected");
		}
	}

	#[test]
	fn remaining_slices_from_segment_offset() {
		let path = NamespacePath::parse("A.B[0].C").expect("namespace parses");
		assert_eq!(path.remaining(0), "A.B[0].C");
		assert_eq!(path.remaining(2), "[0].C");
		assert_eq!(path.remaining(3), "C");
		assert_eq!(path.remaining(4), "");
	}
}
