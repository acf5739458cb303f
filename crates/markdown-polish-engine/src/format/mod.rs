//! Formatting pipeline: external engine invocation, whitespace cleanup
//! passes, and caret/selection/scroll preservation across the rewrite.
//!
//! [`FormatService`] is the thin composition layer host integrations call.
//! It owns the order of the stateful edits: format (with or without cursor
//! tracking), reconcile, run the cleanup passes, then write back only when
//! the text actually changed.

pub mod formatter;
pub mod host;
pub mod passes;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::editing::TrackedBuffer;

pub use formatter::{
    CursorAwareOutput, FormatOptions, ParserKind, PassthroughFormatter, TextFormatter,
};
pub use host::{HostEditor, NoteMetadata, ScrollPosition};
pub use passes::{add_trailing_spaces, remove_extra_spaces};

#[derive(Debug, Error)]
pub enum FormatError {
    /// The external engine rejected the input, typically a syntax error.
    #[error("formatter rejected input: {0}")]
    Syntax(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Toggles and knobs for one service instance, mirrored from settings.
#[derive(Debug, Clone, Default)]
pub struct PassSettings {
    pub remove_extra_spaces: bool,
    pub add_trailing_spaces: bool,
    pub format_embedded_code: bool,
    /// Opaque style knobs forwarded verbatim to the external engine.
    pub extra_options: BTreeMap<String, String>,
}

/// Sequences one formatting operation end to end.
///
/// Each entry point constructs a fresh [`TrackedBuffer`], so concurrent
/// operations on different documents never share mutable state. The host is
/// only touched after the external engine has succeeded, which keeps
/// failures free of partial edits.
pub struct FormatService<F: TextFormatter> {
    formatter: F,
    settings: PassSettings,
}

impl<F: TextFormatter> FormatService<F> {
    pub fn new(formatter: F, settings: PassSettings) -> Self {
        Self {
            formatter,
            settings,
        }
    }

    /// Whether a document should be formatted at all: an explicit
    /// frontmatter flag wins, otherwise the ignore-pattern verdict decides.
    pub fn should_format(&self, metadata: &NoteMetadata, path_ignored: bool) -> bool {
        metadata.use_formatter.unwrap_or(!path_ignored)
    }

    /// Options for one document, combining extension-derived parser choice
    /// with the service's knobs.
    pub fn options_for(&self, metadata: &NoteMetadata) -> FormatOptions {
        FormatOptions {
            parser: ParserKind::for_extension(&metadata.extension),
            format_embedded_code: self.settings.format_embedded_code,
            extra: self.settings.extra_options.clone(),
        }
    }

    /// Format the whole document in the host editor.
    ///
    /// The default path threads the caret through the external engine and
    /// the cleanup passes; fast mode skips the caret plumbing entirely.
    /// Scroll is saved before the write-back and restored after, and
    /// nothing is written when formatting produced no net change.
    pub fn format_document(
        &self,
        editor: &mut dyn HostEditor,
        metadata: &NoteMetadata,
    ) -> Result<(), FormatError> {
        let scroll = editor.scroll();
        let mut content = TrackedBuffer::new(editor.value());
        let options = self.options_for(metadata);

        let mut offset = None;
        if metadata.fast_mode {
            let formatted = self.formatter.format(content.original(), &options)?;
            content.mutate(&formatted, None);
        } else {
            let cursor = content.position_to_offset(editor.cursor());
            let output = self
                .formatter
                .format_with_cursor(content.original(), &options, cursor)?;
            content.mutate(&output.text, None);
            offset = Some(output.cursor);
        }

        let offset = self.run_passes(&mut content, offset);

        if !content.is_modified() {
            log::debug!("{}: formatting produced no change", metadata.path);
            return Ok(());
        }

        editor.set_value(content.current());
        editor.scroll_to(scroll);
        if let Some(offset) = offset {
            editor.set_cursor(content.offset_to_position(offset));
        }

        Ok(())
    }

    /// Format only the current selection.
    ///
    /// The external engine normalizes trailing newlines, so the result is
    /// reconciled with the selection's original trailing-newline state
    /// before the line-anchored cleanup passes run.
    pub fn format_selection(
        &self,
        editor: &mut dyn HostEditor,
        metadata: &NoteMetadata,
    ) -> Result<(), FormatError> {
        if !editor.has_selection() {
            return Ok(());
        }

        let mut content = TrackedBuffer::new(editor.selection());
        let options = self.options_for(metadata);

        let formatted = self.formatter.format(content.original(), &options)?;
        content.mutate(&formatted, None);

        let original_ends_newline = content.original().ends_with('\n');
        let current_ends_newline = content.current().ends_with('\n');
        if original_ends_newline && !current_ends_newline {
            content.append("\n", None);
        } else if !original_ends_newline && current_ends_newline {
            content.delete(-1, TrackedBuffer::END, None);
        }

        self.run_passes(&mut content, None);

        if !content.is_modified() {
            return Ok(());
        }

        editor.replace_selection(content.current());

        Ok(())
    }

    /// Format text outside any editor (the on-disk path). Returns the new
    /// content, or `None` when formatting changed nothing.
    pub fn format_text(
        &self,
        text: &str,
        metadata: &NoteMetadata,
    ) -> Result<Option<String>, FormatError> {
        let mut content = TrackedBuffer::new(text);
        let options = self.options_for(metadata);

        let formatted = self.formatter.format(content.original(), &options)?;
        content.mutate(&formatted, None);

        self.run_passes(&mut content, None);

        if content.is_modified() {
            Ok(Some(content.current().to_owned()))
        } else {
            Ok(None)
        }
    }

    // Fixed order: the shrinking pass runs first, since removing excess
    // space changes the line lengths the emptiness check depends on.
    fn run_passes(&self, content: &mut TrackedBuffer, mut offset: Option<usize>) -> Option<usize> {
        if self.settings.remove_extra_spaces {
            offset = passes::remove_extra_spaces(content, offset);
        }
        if self.settings.add_trailing_spaces {
            offset = passes::add_trailing_spaces(content, offset);
        }

        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct FailingFormatter;

    impl TextFormatter for FailingFormatter {
        fn format(&self, _text: &str, _options: &FormatOptions) -> Result<String, FormatError> {
            Err(FormatError::Syntax("unexpected token".into()))
        }

        fn format_with_cursor(
            &self,
            text: &str,
            options: &FormatOptions,
            _cursor: usize,
        ) -> Result<CursorAwareOutput, FormatError> {
            self.format(text, options).map(|text| CursorAwareOutput {
                text,
                cursor: 0,
            })
        }
    }

    fn cleanup_service() -> FormatService<PassthroughFormatter> {
        FormatService::new(PassthroughFormatter, PassSettings {
            remove_extra_spaces: true,
            add_trailing_spaces: true,
            ..PassSettings::default()
        })
    }

    #[rstest]
    #[case(None, false, true)]
    #[case(None, true, false)]
    #[case(Some(true), true, true)]
    #[case(Some(true), false, true)]
    #[case(Some(false), false, false)]
    #[case(Some(false), true, false)]
    fn frontmatter_flag_overrides_ignore_verdict(
        #[case] use_formatter: Option<bool>,
        #[case] path_ignored: bool,
        #[case] expected: bool,
    ) {
        let service = cleanup_service();
        let mut metadata = NoteMetadata::new("config/test.md");
        metadata.use_formatter = use_formatter;

        assert_eq!(service.should_format(&metadata, path_ignored), expected);
    }

    #[test]
    fn options_follow_extension_and_settings() {
        let service = FormatService::new(PassthroughFormatter, PassSettings {
            format_embedded_code: true,
            extra_options: BTreeMap::from([("tab_width".to_owned(), "4".to_owned())]),
            ..PassSettings::default()
        });

        let options = service.options_for(&NoteMetadata::new("note.mdx"));
        assert_eq!(options.parser, ParserKind::Mdx);
        assert!(options.format_embedded_code);
        assert_eq!(options.extra.get("tab_width").map(String::as_str), Some("4"));

        let options = service.options_for(&NoteMetadata::new("note.md"));
        assert_eq!(options.parser, ParserKind::Markdown);
    }

    #[test]
    fn format_text_applies_cleanup_passes() {
        let service = cleanup_service();
        let metadata = NoteMetadata::new("note.md");

        let result = service.format_text("-  item\n-\n", &metadata).unwrap();

        assert_eq!(result.as_deref(), Some("- item\n- \n"));
    }

    #[test]
    fn format_text_reports_no_change() {
        let service = cleanup_service();
        let metadata = NoteMetadata::new("note.md");

        assert_eq!(service.format_text("- item\n", &metadata).unwrap(), None);
    }

    #[test]
    fn format_text_propagates_formatter_failure() {
        let service = FormatService::new(FailingFormatter, PassSettings::default());
        let metadata = NoteMetadata::new("note.md");

        let error = service.format_text("- item\n", &metadata).unwrap_err();
        assert!(matches!(error, FormatError::Syntax(_)));
    }

    #[test]
    fn passes_are_opt_in() {
        let service = FormatService::new(PassthroughFormatter, PassSettings::default());
        let metadata = NoteMetadata::new("note.md");

        // Both passes disabled: dirty text passes through untouched.
        assert_eq!(service.format_text("-  item\n-\n", &metadata).unwrap(), None);
    }
}
