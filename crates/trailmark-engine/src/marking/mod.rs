/*!
 * # Marking Module
 *
 * Keeps track of which lines of a buffer currently end in trailing
 * whitespace, and where exactly the whitespace sits.
 *
 * - **`cache`**: the line-span cache — a line-number-keyed map of marked
 *   spans, each optionally anchored with a [`TrackedSpan`] so it can be
 *   re-derived after edits
 * - **`scan`**: the buffer observer — trailing-whitespace detection plus
 *   [`WhitespaceMarker`], which drives the cache from edit notifications
 *
 * The renderer-side collaborator (a reporter, a highlighter) only ever
 * reads [`SpanCache::spans`]; all mutation flows through the observer on
 * the edit-notification path. Nothing here suspends, blocks, or spawns:
 * callers sharing a marker across threads must serialize access
 * externally.
 *
 * [`TrackedSpan`]: crate::editing::TrackedSpan
 * [`SpanCache::spans`]: cache::SpanCache::spans
 */

pub mod cache;
pub mod scan;

pub use cache::{CacheError, LineMark, SpanCache};
pub use scan::{WhitespaceMarker, trailing_whitespace};
