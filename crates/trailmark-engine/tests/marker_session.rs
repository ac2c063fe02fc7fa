//! An editing session driven end to end: document open, edits flowing
//! through patches, and the marked spans staying valid throughout.

use pretty_assertions::assert_eq;
use trailmark_engine::{Buffer, Span, WhitespaceMarker};

fn sorted_spans(marker: &WhitespaceMarker) -> Vec<Span> {
    let mut spans: Vec<Span> = marker.spans().collect();
    spans.sort();
    spans
}

#[test]
fn marks_follow_a_live_editing_session() {
    let mut buffer = Buffer::from_text("fn demo() {   \n    let a = 1; \n    let b = 2;\n}\n");
    let mut marker = WhitespaceMarker::new(&buffer);

    // Document open: lines 0 and 1 carry trailing whitespace
    assert_eq!(
        sorted_spans(&marker),
        vec![Span::new(11, 14), Span::new(29, 30)]
    );

    // Typing at the start of line 0 shifts every mark right
    let patch = buffer.edit(0..0, "pub ");
    marker.sync(&buffer, &patch).unwrap();
    assert_eq!(
        sorted_spans(&marker),
        vec![Span::new(15, 18), Span::new(33, 34)]
    );

    // Cleaning line 1 by hand drops its mark
    let patch = buffer.edit(33..34, "");
    marker.sync(&buffer, &patch).unwrap();
    assert_eq!(sorted_spans(&marker), vec![Span::new(15, 18)]);

    // Inserting a new dirty line above renumbers the remaining mark
    let patch = buffer.edit(0..0, "// note \n");
    marker.sync(&buffer, &patch).unwrap();
    assert_eq!(
        sorted_spans(&marker),
        vec![Span::new(7, 8), Span::new(24, 27)]
    );
    assert_eq!(marker.cache().mark(1).unwrap().span, Span::new(24, 27));
}

#[test]
fn stripping_marks_one_at_a_time_converges_to_a_clean_buffer() {
    // The fix loop the CLI runs: delete the first marked span, sync, repeat.
    let mut buffer = Buffer::from_text("a  \nbb\t\nclean\nccc \n");
    let mut marker = WhitespaceMarker::new(&buffer);
    assert_eq!(marker.cache().len(), 3);

    let mut removed = 0;
    while let Some(span) = marker.spans().min() {
        let patch = buffer.edit(span.into(), "");
        marker.sync(&buffer, &patch).unwrap();
        removed += 1;
        assert!(removed <= 3, "fix loop failed to converge");
    }

    assert_eq!(removed, 3);
    assert_eq!(buffer.text(), "a\nbb\nclean\nccc\n");
    assert!(marker.cache().is_empty());
}

#[test]
fn crlf_documents_keep_their_line_endings() {
    let mut buffer = Buffer::from_text("one  \r\ntwo\r\n");
    let mut marker = WhitespaceMarker::new(&buffer);
    assert_eq!(sorted_spans(&marker), vec![Span::new(3, 5)]);

    let span = marker.spans().next().unwrap();
    let patch = buffer.edit(span.into(), "");
    marker.sync(&buffer, &patch).unwrap();

    assert_eq!(buffer.text(), "one\r\ntwo\r\n");
    assert!(marker.cache().is_empty());
}
