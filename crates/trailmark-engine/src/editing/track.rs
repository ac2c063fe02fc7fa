use thiserror::Error;
use xi_rope::delta::Transformer;

use crate::editing::buffer::Buffer;
use crate::editing::span::Span;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackError {
    #[error("span tracked against revision {tracked}, but the buffer is at revision {current}")]
    UnknownRevision { tracked: u64, current: u64 },
}

/// A revision-independent handle to a conceptual range in a [`Buffer`].
///
/// The handle pins a span to the revision it was computed against (see
/// [`Buffer::track`]). It is immutable: resolving replays the buffer's delta
/// history from the base revision each time, so one handle can be resolved
/// against any number of later revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackedSpan {
    span: Span,
    /// The revision `span` is relative to.
    base: u64,
}

impl TrackedSpan {
    pub(crate) fn new(span: Span, base: u64) -> Self {
        Self { span, base }
    }

    pub fn base_version(&self) -> u64 {
        self.base
    }

    /// The span as it was at the base revision, untranslated.
    pub fn base_span(&self) -> Span {
        self.span
    }

    /// Recompute the span against the buffer's current revision.
    ///
    /// Boundaries translate edge-inclusively: an insertion landing exactly on
    /// the start or end boundary becomes part of the resolved span. The start
    /// transforms with `after = false` (stays before text inserted at the
    /// start), the end with `after = true` (moves past text inserted at the
    /// end). Text deleted around a boundary collapses it to the deletion
    /// point.
    pub fn resolve(&self, buffer: &Buffer) -> Result<Span, TrackError> {
        let mut start = self.span.start;
        let mut end = self.span.end;

        for delta in buffer.deltas_since(self.base)? {
            let mut transformer = Transformer::new(delta);
            start = transformer.transform(start, false);
            end = transformer.transform(end, true);
        }

        Ok(Span::new(start, end))
    }
}
