/*!
Types describing the results of a search.
*/

use core::fmt;
use core::ops::Range;

/// A contiguous range of byte offsets into a haystack.
///
/// A span's `start` is inclusive and its `end` is exclusive, and
/// `start <= end` always holds.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    ///
    /// This panics when `start > end`.
    #[inline]
    pub fn new(start: usize, end: usize) -> Span {
        assert!(start <= end, "a span's start must not exceed its end");
        Span { start, end }
    }

    /// The inclusive start offset of this span.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// The exclusive end offset of this span.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// The number of bytes this span covers.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether this span covers zero bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// This span as a `Range`, suitable for slicing a haystack.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Span {
        Span::new(range.start, range.end)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Range<usize> {
        span.range()
    }
}

/// A match reported by one of the search engines.
///
/// The offsets are measured from the start of the haystack given to the
/// search, regardless of where inside it the match begins.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Match {
    span: Span,
}

impl Match {
    /// Create a new match from its start and end offsets.
    #[inline]
    pub fn new(start: usize, end: usize) -> Match {
        Match { span: Span::new(start, end) }
    }

    /// The span of haystack bytes this match covers.
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    /// The start offset of this match.
    #[inline]
    pub fn start(&self) -> usize {
        self.span.start()
    }

    /// The end offset of this match.
    #[inline]
    pub fn end(&self) -> usize {
        self.span.end()
    }

    /// Whether this match covers zero bytes. Empty matches are routine,
    /// e.g. for the pattern `a*`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// This match as a `Range`, suitable for slicing a haystack.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.span.range()
    }
}
