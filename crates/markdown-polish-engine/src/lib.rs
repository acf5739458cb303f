pub mod editing;
pub mod format;
pub mod io;

// Re-export key types for easier usage
pub use editing::{Position, Span, TrackedBuffer, match_captures};
pub use format::{
    CursorAwareOutput, FormatError, FormatOptions, FormatService, HostEditor, NoteMetadata,
    ParserKind, PassSettings, PassthroughFormatter, ScrollPosition, TextFormatter,
};
pub use io::IoError;
