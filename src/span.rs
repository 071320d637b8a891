//! Source location information carried through the typed tree for error reporting.

use serde::{Deserialize, Serialize};

/// A byte range in the surface source that a typed node or constraint
/// originated from. The core never reads source text itself; it only
/// threads spans through so the caller can produce a highlighted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Starting byte position.
    pub start: usize,
    /// Length in bytes.
    pub len: usize,
    /// Optional source file identifier, for multi-file modules.
    pub file_id: Option<usize>,
}

impl Span {
    /// Creates a new span.
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len, file_id: None }
    }

    /// Creates a zero-width span at the given position.
    pub fn at(pos: usize) -> Self {
        Self::new(pos, 0)
    }

    /// Creates a span tagged with a source file.
    pub fn with_file(start: usize, len: usize, file_id: usize) -> Self {
        Self { start, len, file_id: Some(file_id) }
    }

    /// Returns the end position of the span.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Returns true if this is a zero-width span.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Combines this span with another to produce one spanning both.
    pub fn combine(self, other: Span) -> Span {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        Span { start, len: end - start, file_id: self.file_id.or(other.file_id) }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end.saturating_sub(range.start))
    }
}

/// Wraps a value with the span it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spanned<T> {
    /// The wrapped value.
    pub inner: T,
    /// The source location span.
    pub span: Span,
}

impl<T> Spanned<T> {
    /// Creates a new spanned value.
    pub fn new(inner: T, span: Span) -> Self {
        Self { inner, span }
    }

    /// Maps the inner value to a new type, preserving the span.
    pub fn map<U, F>(self, f: F) -> Spanned<U>
    where
        F: FnOnce(T) -> U,
    {
        Spanned::new(f(self.inner), self.span)
    }
}

impl<T> std::ops::Deref for Spanned<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> std::ops::DerefMut for Spanned<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

/// Helper to build a spanned value without naming the type.
pub fn spanned<T>(inner: T, span: Span) -> Spanned<T> {
    Spanned::new(inner, span)
}
