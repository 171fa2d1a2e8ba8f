//! Code-point spans.

use std::fmt;

/// A half-open `[start, end)` range measured in Unicode code points.
///
/// Multi-byte characters, including every emoji, count as one position.
///
/// # Examples
///
/// ```
/// use social_entities::Span;
///
/// let span = Span::new(14, 45);
/// assert_eq!(span.len(), 31);
/// assert!(span.overlaps(&Span::new(40, 50)));
/// assert!(!span.overlaps(&Span::new(45, 50)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// First code point, inclusive
    pub start: usize,
    /// Last code point, exclusive
    pub end: usize,
}

impl Span {
    /// Creates a span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the number of code points covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span covers nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns true if the two spans share at least one code point.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns true if `other` lies entirely within this span.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns the substring of `text` this span covers, if it is in bounds.
    #[must_use]
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        let mut indices = text.char_indices().map(|(i, _)| i).chain(Some(text.len()));
        let start = indices.nth(self.start)?;
        let end = if self.end == self.start {
            start
        } else {
            indices.nth(self.end - self.start - 1)?
        };
        text.get(start..end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl From<(usize, usize)> for Span {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

/// Converts byte offsets into code-point offsets.
///
/// Lookups are cheapest when offsets are requested in increasing order,
/// which is how every scanner walks the text.
#[derive(Debug)]
pub(crate) struct CodePointIndex<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CodePointIndex<'a> {
    pub(crate) const fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    /// Returns the code-point offset of `byte`, which must lie on a char boundary.
    pub(crate) fn at(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }

    /// Returns the code-point span of the byte range `start..end`.
    pub(crate) fn span(&mut self, start: usize, end: usize) -> Span {
        let start = self.at(start);
        let end = self.at(end);
        Span::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_half_open() {
        let a = Span::new(0, 5);
        assert!(a.overlaps(&Span::new(4, 6)));
        assert!(!a.overlaps(&Span::new(5, 6)));
        assert!(a.contains(&Span::new(1, 5)));
        assert!(!a.contains(&Span::new(1, 6)));
    }

    #[test]
    fn slice_counts_code_points() {
        let text = "@ummjackson 🤡 https://i.imgur.com/I32CQ81.jpg";
        assert_eq!(
            Span::new(14, 45).slice(text),
            Some("https://i.imgur.com/I32CQ81.jpg")
        );
        assert_eq!(Span::new(12, 13).slice(text), Some("🤡"));
        assert_eq!(Span::new(45, 46).slice(text), None);
        assert_eq!(Span::new(45, 45).slice(text), Some(""));
    }

    #[test]
    fn code_point_index_handles_multibyte() {
        let text = "é🤡a";
        let mut index = CodePointIndex::new(text);
        assert_eq!(index.at(0), 0);
        assert_eq!(index.at(2), 1);
        assert_eq!(index.at(6), 2);
        assert_eq!(index.at(7), 3);
    }

    #[test]
    fn code_point_index_rewinds() {
        let text = "ab🤡cd";
        let mut index = CodePointIndex::new(text);
        assert_eq!(index.at(6), 3);
        assert_eq!(index.at(1), 1);
        assert_eq!(index.span(2, 6), Span::new(2, 3));
    }

    #[test]
    fn display() {
        assert_eq!(Span::new(3, 7).to_string(), "[3, 7)");
    }
}
