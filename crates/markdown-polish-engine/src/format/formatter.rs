use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::format::FormatError;

/// Parser the external engine should use, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParserKind {
    Markdown,
    Mdx,
}

impl ParserKind {
    pub fn for_extension(extension: &str) -> Self {
        if extension.eq_ignore_ascii_case("mdx") {
            Self::Mdx
        } else {
            Self::Markdown
        }
    }
}

/// Configuration bag forwarded to the external formatting engine.
///
/// `extra` carries opaque style knobs verbatim from settings; the engine
/// core never interprets them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub parser: ParserKind,
    /// Whether embedded code blocks should be formatted too.
    pub format_embedded_code: bool,
    pub extra: BTreeMap<String, String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            parser: ParserKind::Markdown,
            format_embedded_code: false,
            extra: BTreeMap::new(),
        }
    }
}

/// Output of a cursor-aware formatting call: the rewritten text plus the
/// caret offset already remapped by the engine through its own edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorAwareOutput {
    pub text: String,
    pub cursor: usize,
}

/// The external formatting engine, treated as a black box.
///
/// Implementations must be pure with respect to the host: they receive text
/// and return text, and any failure (typically a syntax error in the input)
/// must surface as an `Err` before the caller mutates anything.
pub trait TextFormatter {
    fn format(&self, text: &str, options: &FormatOptions) -> Result<String, FormatError>;

    /// Cursor-aware variant: also remaps `cursor` through the rewrite.
    fn format_with_cursor(
        &self,
        text: &str,
        options: &FormatOptions,
        cursor: usize,
    ) -> Result<CursorAwareOutput, FormatError>;
}

/// Identity formatter: returns its input untouched.
///
/// Useful for cleanup-only pipelines (the CLI host) and as a baseline in
/// tests; the whitespace passes still run on top of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFormatter;

impl TextFormatter for PassthroughFormatter {
    fn format(&self, text: &str, _options: &FormatOptions) -> Result<String, FormatError> {
        Ok(text.to_owned())
    }

    fn format_with_cursor(
        &self,
        text: &str,
        _options: &FormatOptions,
        cursor: usize,
    ) -> Result<CursorAwareOutput, FormatError> {
        Ok(CursorAwareOutput {
            text: text.to_owned(),
            cursor,
        })
    }
}
