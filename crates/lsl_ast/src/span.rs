/// Byte range into the script source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `pos`, used for end-of-input diagnostics.
    pub fn point(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    /// Sentinel span for synthesized nodes.
    pub fn dummy() -> Self {
        Self {
            start: usize::MAX,
            end: usize::MAX,
        }
    }

    pub fn is_dummy(self) -> bool {
        self.start == usize::MAX && self.end == usize::MAX
    }

    pub fn len(self) -> usize {
        if self.is_dummy() {
            0
        } else {
            self.end.saturating_sub(self.start)
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    pub fn merge(self, other: Span) -> Span {
        if self.is_dummy() {
            return other;
        }
        if other.is_dummy() {
            return self;
        }
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned::new(f(self.node), self.span)
    }
}
