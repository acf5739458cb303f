//! Position-tracking text mutation primitives.
//!
//! The editing module is the algorithmic core of the crate: a string buffer
//! that threads an externally supplied caret offset through every edit it
//! performs, plus the coordinate conversions and regex span collection the
//! formatting passes are built from.
//!
//! - [`buffer`]: `TrackedBuffer`, the offset-remapping string container.
//!   Edits are plain splices; what makes them interesting is the remap math
//!   that keeps a caret pointing at the same logical spot in the text.
//! - [`position`]: pure conversion between linear byte offsets and
//!   `(line, ch)` positions, the shape host editors speak.
//! - [`matcher`]: batch capture-group matching that returns positioned
//!   [`Span`]s so callers can edit in reverse document order without
//!   re-running the regex engine per edit.
//!
//! All offsets are UTF-8 byte offsets on `char` boundaries. This is a
//! deliberate deviation from UTF-16 editor columns; hosts with UTF-16 APIs
//! convert at the boundary.

pub mod buffer;
pub mod matcher;
pub mod position;

pub use buffer::TrackedBuffer;
pub use matcher::{Span, match_captures};
pub use position::{Position, offset_to_position, position_to_offset};
