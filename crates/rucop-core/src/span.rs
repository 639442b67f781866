//! Byte-offset spans into UTF-8 source and line/column mapping

/// A half-open byte range `[start, end)` into the original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether this span fully contains another span.
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether two spans share at least one byte.
    pub fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Join two spans into the smallest span covering both.
    pub fn join(&self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// The source text covered by this span.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end.min(source.len())]
    }
}

/// Maps byte offsets to 1-based line and column numbers.
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// 1-based (line, column) for a byte offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        (line + 1, offset - self.line_starts[line] + 1)
    }

    /// 1-based line number for a byte offset.
    pub fn line(&self, offset: usize) -> usize {
        self.line_col(offset).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlaps() {
        let a = Span::new(0, 10);
        assert!(a.overlaps(Span::new(9, 12)));
        assert!(a.overlaps(Span::new(0, 1)));
        assert!(!a.overlaps(Span::new(10, 12)));
        assert!(!a.overlaps(Span::new(12, 14)));
    }

    #[test]
    fn test_text() {
        let source = "def index; end";
        assert_eq!(Span::new(0, 3).text(source), "def");
        assert_eq!(Span::new(4, 9).text(source), "index");
    }

    #[test]
    fn test_line_col() {
        let index = LineIndex::new("abc\ndef\n\nghi");
        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(2), (1, 3));
        assert_eq!(index.line_col(4), (2, 1));
        assert_eq!(index.line_col(8), (3, 1));
        assert_eq!(index.line_col(9), (4, 1));
        assert_eq!(index.line_col(11), (4, 3));
    }

    #[test]
    fn test_join() {
        assert_eq!(Span::new(3, 5).join(Span::new(8, 10)), Span::new(3, 10));
    }
}
