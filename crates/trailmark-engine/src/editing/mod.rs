/*!
 * # Editing Core Module
 *
 * The buffer side of the engine: a revisioned text store and the span
 * tracking machinery the marking layer builds on.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: xi-rope Buffer
 * - The entire document is stored in a single **`xi_rope::Rope`** buffer
 * - Every edit compiles to an xi-rope **Delta** before it is applied
 * - The buffer keeps the full delta history, so any older revision's
 *   coordinates can be mapped forward to the current revision
 *
 * ### 2. Revisions
 * - A monotonically increasing `u64` version identifies each revision
 * - `history[i]` is the delta that carries revision `i` to `i + 1`
 * - A `Span` is a byte range valid against exactly one revision
 *
 * ### 3. Tracked Spans
 * - A **`TrackedSpan`** pins a span to the revision it was computed
 *   against and can be resolved against any later revision
 * - Resolution replays the intervening deltas through xi-rope's
 *   `Transformer`, using an edge-inclusive policy: insertions landing
 *   exactly on a tracked boundary become part of the tracked range
 *
 * ## Module Structure
 *
 * - **`buffer`**: `Buffer` (rope + version + history) and `Patch`
 * - **`span`**: plain byte-range `Span` type
 * - **`track`**: `TrackedSpan` resolution and its error type
 */

pub mod buffer;
pub mod span;
pub mod track;

pub use buffer::{Buffer, LineRef, Patch};
pub use span::Span;
pub use track::{TrackError, TrackedSpan};
