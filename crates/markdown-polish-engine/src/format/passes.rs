use std::sync::LazyLock;

use regex::Regex;

use crate::editing::{TrackedBuffer, match_captures};

/// Unordered list items with more than one space between marker and content.
/// Group 1 captures the excess run beyond the single separating space.
static EXTRA_SPACES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[^\S\r\n]*[-*+][^\S\r\n]([^\S\r\n]+)").unwrap()
});

/// Empty list items with no trailing space: a bare unordered marker
/// (optionally with a checkbox) or a bare ordered marker, and nothing after
/// it on the line. Group 1 captures the whole line content.
static EMPTY_ITEMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^((?:[^\S\r\n]*[-*+](?:[^\S\r\n]+\[.\])?)|(?:[^\S\r\n]*\d+\.))$").unwrap()
});

/// Collapse the whitespace after unordered list markers down to one space,
/// remapping the tracked caret through each deletion.
///
/// Matches are consumed in reverse document order so earlier spans stay
/// valid while later deletions land. A caret inside a removed run collapses
/// to just after the single remaining space.
pub fn remove_extra_spaces(buffer: &mut TrackedBuffer, offset: Option<usize>) -> Option<usize> {
    let matches = match_captures(buffer, &EXTRA_SPACES);

    let mut offset = offset;
    for spans in matches.iter().rev() {
        let Some(excess) = spans.first() else {
            continue;
        };
        offset = buffer.delete(excess.start as isize, excess.end as isize, offset);
    }

    offset
}

/// Append a single space to empty list items that lack one, so the caret
/// can sit after the marker, remapping the tracked caret through each
/// insertion.
pub fn add_trailing_spaces(buffer: &mut TrackedBuffer, offset: Option<usize>) -> Option<usize> {
    let matches = match_captures(buffer, &EMPTY_ITEMS);

    let mut offset = offset;
    for spans in matches.iter().rev() {
        let Some(item) = spans.first() else {
            continue;
        };
        offset = buffer.insert(item.end as isize, " ", offset);
    }

    offset
}
