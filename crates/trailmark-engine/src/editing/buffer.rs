use xi_rope::delta::Builder;
use xi_rope::{Delta, LinesMetric, Rope, RopeInfo};

use crate::editing::span::Span;
use crate::editing::track::{TrackError, TrackedSpan};

/// Result of applying an edit to a [`Buffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Ranges touched by the edit, in new-revision coordinates. Insertions
    /// cover the inserted bytes; pure deletions appear as an empty range at
    /// the deletion point so observers still learn where the edit happened.
    pub changed: Vec<std::ops::Range<usize>>,
    /// The revision the buffer moved to.
    pub version: u64,
}

/// A reference to a single line in the buffer with its byte span.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// Byte span of this line (includes the newline if present).
    pub span: Span,
    /// The line text, newline included.
    pub text: String,
}

/// Revisioned text store backing a single open document.
///
/// The rope is the single source of truth for content. Every edit compiles
/// to an xi-rope [`Delta`] which is retained in `history`, so a
/// [`TrackedSpan`] anchored at any earlier revision can be mapped forward to
/// the current one. One `Buffer` is constructed per open document and
/// dropped when the document closes; it is not safe for concurrent mutation
/// and callers sharing it across threads must serialize all access
/// externally.
pub struct Buffer {
    /// Document content, authoritative for the current revision.
    rope: Rope,
    /// Revision counter, starts at 0 and increments on every edit.
    version: u64,
    /// `history[i]` carries revision `i` to revision `i + 1`.
    history: Vec<Delta<RopeInfo>>,
}

impl Buffer {
    /// Create a buffer from raw bytes, validating UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from(text),
            version: 0,
            history: Vec::new(),
        }
    }

    /// The current revision identifier.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.rope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len() == 0
    }

    /// The current content as an owned string.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Slice the buffer to a cow string, clamping the range to buffer bounds.
    pub fn slice_to_cow(&self, range: std::ops::Range<usize>) -> std::borrow::Cow<'_, str> {
        let len = self.rope.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.rope.slice_to_cow(start..end)
    }

    /// Replace `range` with `text`, producing the next revision.
    ///
    /// An insertion is an empty `range`; a deletion is empty `text`.
    pub fn edit(&mut self, range: std::ops::Range<usize>, text: &str) -> Patch {
        let mut builder = Builder::new(self.rope.len());
        builder.replace(range, Rope::from(text));
        let delta = builder.build();

        let changed = changed_ranges(&delta);

        self.rope = delta.apply(&self.rope);
        self.history.push(delta);
        self.version += 1;

        Patch {
            changed,
            version: self.version,
        }
    }

    /// Anchor `span` to the current revision so it can be resolved against
    /// later revisions.
    pub fn track(&self, span: Span) -> TrackedSpan {
        TrackedSpan::new(span, self.version)
    }

    /// The deltas from `version` up to the current revision.
    ///
    /// Errors if `version` is newer than this buffer, which means the caller
    /// handed us a tracked span from a different buffer.
    pub(crate) fn deltas_since(&self, version: u64) -> Result<&[Delta<RopeInfo>], TrackError> {
        if version > self.version {
            return Err(TrackError::UnknownRevision {
                tracked: version,
                current: self.version,
            });
        }
        Ok(&self.history[version as usize..])
    }

    /// Number of lines in the buffer. An empty buffer has one (empty) line,
    /// and a trailing newline opens a final empty line.
    pub fn line_count(&self) -> usize {
        self.rope.measure::<LinesMetric>() + 1
    }

    /// Byte span of line `line` (0-based), newline included.
    ///
    /// # Panics
    /// Panics if `line >= line_count()`.
    pub fn line_span(&self, line: usize) -> Span {
        assert!(
            line < self.line_count(),
            "line {line} beyond last line {}",
            self.line_count() - 1
        );
        let start = self.rope.offset_of_line(line);
        let end = self.rope.offset_of_line(line + 1);
        Span::new(start, end)
    }

    /// The line containing `offset` (0-based). Offsets at or beyond the end
    /// of the buffer clamp to the last line.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.rope.line_of_offset(offset.min(self.rope.len()))
    }

    /// Returns an iterator over lines with their byte spans.
    ///
    /// Uses `lines_raw` to preserve newline characters, which is important
    /// for accurate span tracking.
    pub fn lines(&self) -> impl Iterator<Item = LineRef> + '_ {
        let mut offset = 0usize;
        self.rope.lines_raw(..).map(move |line| {
            let start = offset;
            offset += line.len();
            LineRef {
                span: Span::new(start, offset),
                text: line.into_owned(),
            }
        })
    }
}

/// Ranges touched by `delta`, in new-revision coordinates.
///
/// Walks the delta elements tracking both the old and new positions: an
/// insert covers the inserted bytes, a gap between copies is a deletion,
/// reported as an empty range at the new position. A deletion gap sitting
/// right after a recorded insert is the removal half of a replace; the
/// insert range already covers that position, so no extra marker is pushed.
fn changed_ranges(delta: &Delta<RopeInfo>) -> Vec<std::ops::Range<usize>> {
    let mut changed: Vec<std::ops::Range<usize>> = Vec::new();
    let mut old_pos = 0;
    let mut new_pos = 0;

    for el in &delta.els {
        match el {
            xi_rope::delta::DeltaElement::Copy(beg, end) => {
                if old_pos < *beg && changed.last().is_none_or(|range| range.end != new_pos) {
                    changed.push(new_pos..new_pos);
                }
                new_pos += end - beg;
                old_pos = *end;
            }
            xi_rope::delta::DeltaElement::Insert(inserted) => {
                changed.push(new_pos..new_pos + inserted.len());
                new_pos += inserted.len();
            }
        }
    }

    // A deletion running to the end of the old document leaves no trailing copy
    if old_pos < delta.base_len && changed.last().is_none_or(|range| range.end != new_pos) {
        changed.push(new_pos..new_pos);
    }

    changed
}
