use std::collections::HashMap;

use thiserror::Error;

use crate::editing::{Buffer, Span, TrackError, TrackedSpan};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    /// Raised by [`SpanCache::attach_tracker`] when no mark exists for the
    /// line. This is an observer sequencing bug (attach before upsert), not
    /// a recoverable condition: the cache cannot invent a span on its own.
    #[error("no mark cached for line {0}")]
    LineNotMarked(usize),
}

/// One cached entry per marked line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMark {
    /// Where the trailing whitespace sits, relative to the revision the mark
    /// was last written or revalidated against.
    pub span: Span,
    /// Handle for re-deriving `span` against later revisions. A mark without
    /// one cannot be revalidated and goes stale on the first edit.
    pub tracker: Option<TrackedSpan>,
}

/// The line-span cache: a line-number-keyed map of marked spans.
///
/// Keys are unique and iteration order is unspecified. One cache is owned
/// per open document (see [`WhitespaceMarker`](crate::marking::scan::WhitespaceMarker))
/// and dropped with it; entries live from the edit that introduces trailing
/// whitespace on a line until the edit that removes it.
#[derive(Debug, Default)]
pub struct SpanCache {
    marks: HashMap<usize, LineMark>,
}

impl SpanCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Insert or replace the mark for `line`. Overwriting is always legal;
    /// subsequent reads for the line return the new span.
    pub fn upsert(&mut self, line: usize, span: Span, tracker: Option<TrackedSpan>) {
        self.marks.insert(line, LineMark { span, tracker });
    }

    /// Set or replace the tracking handle on an existing mark without
    /// touching its span.
    pub fn attach_tracker(&mut self, line: usize, tracker: TrackedSpan) -> Result<(), CacheError> {
        match self.marks.get_mut(&line) {
            Some(mark) => {
                mark.tracker = Some(tracker);
                Ok(())
            }
            None => Err(CacheError::LineNotMarked(line)),
        }
    }

    /// Delete the mark for `line` if present. No-op when absent.
    pub fn remove(&mut self, line: usize) {
        self.marks.remove(&line);
    }

    pub fn mark(&self, line: usize) -> Option<&LineMark> {
        self.marks.get(&line)
    }

    /// Marked line numbers, in unspecified order.
    pub fn lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.marks.keys().copied()
    }

    /// Current spans, one per mark, in unspecified order.
    pub fn spans(&self) -> impl Iterator<Item = Span> + '_ {
        self.marks.values().map(|mark| mark.span)
    }

    /// Tracking handles of the marks that have one; marks without a handle
    /// are skipped.
    pub fn trackers(&self) -> impl Iterator<Item = TrackedSpan> + '_ {
        self.marks.values().filter_map(|mark| mark.tracker)
    }

    /// Recompute every tracked span against the buffer's current revision,
    /// using the edge-inclusive policy of [`TrackedSpan::resolve`].
    ///
    /// Marks without a tracking handle are left with their stale span rather
    /// than dropped or re-derived; such marks are only meaningful for the
    /// revision they were written against, so the observer anchors every
    /// mark it writes.
    pub fn revalidate(&mut self, buffer: &Buffer) -> Result<(), TrackError> {
        for mark in self.marks.values_mut() {
            if let Some(tracker) = mark.tracker {
                mark.span = tracker.resolve(buffer)?;
            }
        }
        Ok(())
    }
}
