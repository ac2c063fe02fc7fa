use std::ops::Range;

use crate::editing::{Buffer, Patch, Span, TrackError};
use crate::marking::cache::SpanCache;

/// Local byte range of the trailing whitespace run in `line`, excluding the
/// line terminator (`\n` or `\r\n`). `None` when the line is clean.
pub fn trailing_whitespace(line: &str) -> Option<Range<usize>> {
    // A '\r' is only a terminator as part of "\r\n"; a bare one at the end
    // of the last line is trailing whitespace content
    let content = match line.strip_suffix('\n') {
        Some(stripped) => stripped.strip_suffix('\r').unwrap_or(stripped),
        None => line,
    };
    let kept = content.trim_end();
    (kept.len() < content.len()).then(|| kept.len()..content.len())
}

/// The buffer observer: watches a [`Buffer`] through its patches and keeps a
/// [`SpanCache`] of trailing-whitespace marks synchronized with it.
///
/// One marker is constructed per open document ([`WhitespaceMarker::new`]
/// performs the initial full scan) and dropped with it. Every mark the
/// marker writes is anchored with a tracking handle, so the whole cache can
/// be revalidated after each edit.
#[derive(Debug)]
pub struct WhitespaceMarker {
    cache: SpanCache,
    /// Line count of the revision the cache was last synchronized against.
    /// A change in line count means lines were renumbered.
    line_count: usize,
}

impl WhitespaceMarker {
    /// Full scan on document open: one mark per line ending in trailing
    /// whitespace.
    pub fn new(buffer: &Buffer) -> Self {
        let mut marker = Self {
            cache: SpanCache::new(),
            line_count: buffer.line_count(),
        };
        for (line, line_ref) in buffer.lines().enumerate() {
            marker.mark_line(buffer, line, line_ref.span, &line_ref.text);
        }
        marker
    }

    pub fn cache(&self) -> &SpanCache {
        &self.cache
    }

    /// Current marked spans, in unspecified order.
    pub fn spans(&self) -> impl Iterator<Item = Span> + '_ {
        self.cache.spans()
    }

    /// Edit-notification path: bring the cache up to date with the revision
    /// `patch` produced.
    ///
    /// Revalidates every mark against the new revision first, then rescans
    /// the dirty lines: from the first changed line to the last changed
    /// line, or to the end of the buffer when the edit changed the line
    /// count and thereby renumbered every following line. Marks past the new
    /// end of the buffer are dropped.
    pub fn sync(&mut self, buffer: &Buffer, patch: &Patch) -> Result<(), TrackError> {
        debug_assert_eq!(patch.version, buffer.version(), "patch is not the latest edit");

        self.cache.revalidate(buffer)?;

        let Some(first) = patch.changed.iter().map(|range| range.start).min() else {
            return Ok(());
        };
        let last = patch.changed.iter().map(|range| range.end).max().unwrap_or(first);

        let new_count = buffer.line_count();
        let first_line = buffer.line_of_offset(first);
        let last_line = if new_count == self.line_count {
            buffer.line_of_offset(last)
        } else {
            new_count - 1
        };

        for line in first_line..=last_line {
            self.scan_line(buffer, line);
        }

        // Lines that fell off the end of a shrinking buffer
        for line in new_count..self.line_count {
            self.cache.remove(line);
        }
        self.line_count = new_count;

        Ok(())
    }

    fn scan_line(&mut self, buffer: &Buffer, line: usize) {
        let line_span = buffer.line_span(line);
        let text = buffer.slice_to_cow(line_span.into());
        self.mark_line(buffer, line, line_span, &text);
    }

    fn mark_line(&mut self, buffer: &Buffer, line: usize, line_span: Span, text: &str) {
        match trailing_whitespace(text) {
            Some(local) => {
                let span = Span::new(line_span.start + local.start, line_span.start + local.end);
                self.cache.upsert(line, span, Some(buffer.track(span)));
            }
            None => self.cache.remove(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::{HashMap, HashSet};

    #[rstest]
    #[case::clean("abc", None)]
    #[case::spaces("abc  ", Some(3..5))]
    #[case::tab_before_newline("abc\t\n", Some(3..4))]
    #[case::crlf("abc  \r\n", Some(3..5))]
    #[case::whitespace_only("   ", Some(0..3))]
    #[case::empty("", None)]
    #[case::bare_newline("\n", None)]
    #[case::bare_crlf("\r\n", None)]
    #[case::cr_without_newline_is_content("abc\r", Some(3..4))]
    #[case::lone_cr_is_content("\r", Some(0..1))]
    #[case::nbsp_counts_bytes("a\u{a0}\n", Some(1..3))]
    fn detects_trailing_whitespace(#[case] line: &str, #[case] expected: Option<Range<usize>>) {
        assert_eq!(trailing_whitespace(line), expected);
    }

    fn marks_by_line(marker: &WhitespaceMarker) -> HashMap<usize, Span> {
        marker
            .cache()
            .lines()
            .map(|line| (line, marker.cache().mark(line).unwrap().span))
            .collect()
    }

    #[test]
    fn full_scan_marks_dirty_lines_only() {
        let buffer = Buffer::from_text("fn main() {  \n    let x = 1;\t\n}\n");

        let marker = WhitespaceMarker::new(&buffer);

        assert_eq!(
            marks_by_line(&marker),
            HashMap::from([(0, Span::new(11, 13)), (1, Span::new(28, 29))])
        );
    }

    #[test]
    fn full_scan_of_clean_buffer_is_empty() {
        let buffer = Buffer::from_text("clean\nlines\n");
        let marker = WhitespaceMarker::new(&buffer);
        assert!(marker.cache().is_empty());
    }

    #[test]
    fn sync_picks_up_whitespace_introduced_by_edit() {
        let mut buffer = Buffer::from_text("ab\ncd\n");
        let mut marker = WhitespaceMarker::new(&buffer);
        assert!(marker.cache().is_empty());

        let patch = buffer.edit(5..5, "  ");
        marker.sync(&buffer, &patch).unwrap();

        assert_eq!(marks_by_line(&marker), HashMap::from([(1, Span::new(5, 7))]));
    }

    #[test]
    fn sync_drops_mark_when_whitespace_is_deleted() {
        let mut buffer = Buffer::from_text("ab \n");
        let mut marker = WhitespaceMarker::new(&buffer);
        assert_eq!(marker.cache().len(), 1);

        let patch = buffer.edit(2..3, "");
        marker.sync(&buffer, &patch).unwrap();

        assert!(marker.cache().is_empty());
    }

    #[test]
    fn sync_shifts_marks_after_edit_on_earlier_line() {
        let mut buffer = Buffer::from_text("xx\nbb \n");
        let mut marker = WhitespaceMarker::new(&buffer);
        assert_eq!(marks_by_line(&marker), HashMap::from([(1, Span::new(5, 6))]));

        // Same-line insertion before the mark: line numbers keep, offsets move
        let patch = buffer.edit(0..0, "yy");
        marker.sync(&buffer, &patch).unwrap();

        assert_eq!(marks_by_line(&marker), HashMap::from([(1, Span::new(7, 8))]));
    }

    #[test]
    fn sync_renumbers_marks_after_line_insertion() {
        let mut buffer = Buffer::from_text("aa \nbb\ncc \n");
        let mut marker = WhitespaceMarker::new(&buffer);
        assert_eq!(
            marker.cache().lines().collect::<HashSet<_>>(),
            HashSet::from([0, 2])
        );

        let patch = buffer.edit(0..0, "\n");
        marker.sync(&buffer, &patch).unwrap();

        assert_eq!(
            marks_by_line(&marker),
            HashMap::from([(1, Span::new(3, 4)), (3, Span::new(10, 11))])
        );
    }

    #[test]
    fn sync_drops_marks_past_the_end_of_a_shrinking_buffer() {
        let mut buffer = Buffer::from_text("aa \nbb \n");
        let mut marker = WhitespaceMarker::new(&buffer);
        assert_eq!(marker.cache().len(), 2);

        // Delete the whole second line
        let patch = buffer.edit(4..8, "");
        marker.sync(&buffer, &patch).unwrap();

        assert_eq!(marks_by_line(&marker), HashMap::from([(0, Span::new(2, 3))]));
    }

    #[test]
    fn sync_handles_joined_lines() {
        let mut buffer = Buffer::from_text("aa \nbb \n");
        let mut marker = WhitespaceMarker::new(&buffer);

        // Deleting the first newline joins the lines into "aa bb \n"
        let patch = buffer.edit(3..4, "");
        marker.sync(&buffer, &patch).unwrap();

        assert_eq!(marks_by_line(&marker), HashMap::from([(0, Span::new(5, 6))]));
    }
}
