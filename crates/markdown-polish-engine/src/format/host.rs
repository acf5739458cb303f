use relative_path::RelativePathBuf;

use crate::editing::Position;

/// Viewport offset of the host editor widget, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    pub left: f64,
    pub top: f64,
}

/// The slice of a host editor the formatting pipeline needs.
///
/// Replacing the whole document resets the viewport in typical editor
/// widgets, so the pipeline reads `scroll` before writing and restores it
/// after. Implementations back onto real editor APIs; tests use a
/// recording fake.
pub trait HostEditor {
    fn value(&self) -> String;
    fn set_value(&mut self, text: &str);

    fn cursor(&self) -> Position;
    fn set_cursor(&mut self, position: Position);

    fn selection(&self) -> String;
    fn replace_selection(&mut self, text: &str);
    fn has_selection(&self) -> bool;

    fn scroll(&self) -> ScrollPosition;
    fn scroll_to(&mut self, scroll: ScrollPosition);
}

/// Per-document facts supplied by the host's metadata layer: the path and
/// extension, plus the frontmatter flags that override global settings.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteMetadata {
    pub path: RelativePathBuf,
    pub extension: String,
    /// Frontmatter override for whether this document is formatted at all.
    /// `None` falls back to the ignore-pattern verdict.
    pub use_formatter: Option<bool>,
    /// Frontmatter opt-in for the fast path that skips cursor tracking
    /// through the external formatter.
    pub fast_mode: bool,
}

impl NoteMetadata {
    pub fn new(path: impl Into<RelativePathBuf>) -> Self {
        let path = path.into();
        let extension = path.extension().unwrap_or("md").to_owned();

        Self {
            path,
            extension,
            use_formatter: None,
            fast_mode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_derives_extension_from_path() {
        let metadata = NoteMetadata::new("notes/daily.mdx");

        assert_eq!(metadata.extension, "mdx");
        assert_eq!(metadata.use_formatter, None);
        assert!(!metadata.fast_mode);
    }

    #[test]
    fn metadata_defaults_to_md_without_extension() {
        let metadata = NoteMetadata::new("notes/README");

        assert_eq!(metadata.extension, "md");
    }
}
