use crate::editing::position::{self, Position};

/// A single edit, kept only long enough to remap a tracked offset through it.
#[derive(Debug, Clone, Copy)]
enum EditDiff {
    Insert { start: usize, length: usize },
    Delete { start: usize, end: usize },
}

/// Remap a tracked offset through one edit.
///
/// Insertions shift any offset at or after the insertion point right by the
/// inserted length; a caret sitting exactly at the insertion point rides to
/// the right of the new text. Deletions collapse offsets strictly inside
/// `(start, end]` to `start` and shift offsets past `end` left by the
/// deleted length; a caret exactly at `start` stays put.
fn remap(offset: Option<usize>, diff: EditDiff) -> Option<usize> {
    let index = offset?;

    Some(match diff {
        EditDiff::Insert { start, length } => {
            if index >= start {
                index + length
            } else {
                index
            }
        }
        EditDiff::Delete { start, end } => {
            if index > start && index <= end {
                start
            } else if index > end {
                index - (end - start)
            } else {
                index
            }
        }
    })
}

/// String buffer that records whether it has diverged from its original
/// content and remaps an externally supplied caret offset through every
/// edit it performs.
///
/// One buffer is created per formatting operation and discarded once the
/// result is applied back to the host. Indices are signed: negative values
/// count back from the end in the style of `slice`, and
/// [`TrackedBuffer::END`] stands in for "end of buffer". All indices are
/// clamped into range, so a stale caret never panics; they must, however,
/// lie on `char` boundaries once clamped.
///
/// Passing `None` as the tracked offset disables tracking for that call;
/// the edit is still applied.
#[derive(Debug, Clone)]
pub struct TrackedBuffer {
    original: String,
    current: String,
}

impl TrackedBuffer {
    /// Sentinel index meaning "end of buffer", whatever its length.
    pub const END: isize = isize::MAX;

    pub fn new(value: impl Into<String>) -> Self {
        let original = value.into();
        let current = original.clone();
        Self { original, current }
    }

    /// Immutable snapshot taken at construction.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The working text after all edits so far.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// True once the working text differs from the original.
    pub fn is_modified(&self) -> bool {
        self.original != self.current
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Clamp any signed index into `[0, len]`. Negative indices count back
    /// from the end, with a floor of zero.
    pub fn normalize_index(&self, index: isize) -> usize {
        let len = self.current.len() as isize;

        let clamped = if index < 0 {
            len.saturating_add(index).max(0)
        } else {
            index.min(len)
        };

        clamped as usize
    }

    /// Insert `text` at the (normalized) index, remapping `offset` through
    /// the insertion.
    pub fn insert(&mut self, index: isize, text: &str, offset: Option<usize>) -> Option<usize> {
        let at = self.normalize_index(index);

        self.current.insert_str(at, text);

        remap(
            offset,
            EditDiff::Insert {
                start: at,
                length: text.len(),
            },
        )
    }

    /// Remove `[start, end)` after normalizing both bounds (swapped if
    /// reversed), remapping `offset` through the deletion.
    pub fn delete(&mut self, start: isize, end: isize, offset: Option<usize>) -> Option<usize> {
        let mut from = self.normalize_index(start);
        let mut to = self.normalize_index(end);
        if from > to {
            std::mem::swap(&mut from, &mut to);
        }

        self.current.replace_range(from..to, "");

        remap(
            offset,
            EditDiff::Delete {
                start: from,
                end: to,
            },
        )
    }

    /// Replace `[start, end)` with `text`: a deletion composed with an
    /// insertion at the same spot, in that order, for offset purposes.
    pub fn update(
        &mut self,
        start: isize,
        end: isize,
        text: &str,
        offset: Option<usize>,
    ) -> Option<usize> {
        let mut from = self.normalize_index(start);
        let mut to = self.normalize_index(end);
        if from > to {
            std::mem::swap(&mut from, &mut to);
        }

        self.current.replace_range(from..to, text);

        let offset = remap(
            offset,
            EditDiff::Delete {
                start: from,
                end: to,
            },
        );
        remap(
            offset,
            EditDiff::Insert {
                start: from,
                length: text.len(),
            },
        )
    }

    pub fn append(&mut self, text: &str, offset: Option<usize>) -> Option<usize> {
        self.insert(Self::END, text, offset)
    }

    pub fn prepend(&mut self, text: &str, offset: Option<usize>) -> Option<usize> {
        self.insert(0, text, offset)
    }

    /// Whole-buffer replacement, used to load a formatter's complete output
    /// while keeping the change log coherent.
    pub fn mutate(&mut self, text: &str, offset: Option<usize>) -> Option<usize> {
        self.update(0, Self::END, text, offset)
    }

    /// Destructively narrow the working text to `[start, end)`. For offset
    /// purposes this is a deletion of the tail followed by a deletion of
    /// the head.
    pub fn slice(&mut self, start: isize, end: isize, offset: Option<usize>) -> Option<usize> {
        let mut from = self.normalize_index(start);
        let mut to = self.normalize_index(end);
        if from > to {
            std::mem::swap(&mut from, &mut to);
        }

        let len = self.current.len();
        self.current = self.current[from..to].to_owned();

        let offset = remap(offset, EditDiff::Delete { start: to, end: len });
        remap(
            offset,
            EditDiff::Delete {
                start: 0,
                end: from,
            },
        )
    }

    /// First literal occurrence of `needle` at or after `from`, as a
    /// `(start, end)` byte span.
    pub fn find(&self, needle: &str, from: usize) -> Option<(usize, usize)> {
        let from = from.min(self.current.len());

        self.current[from..]
            .find(needle)
            .map(|i| (from + i, from + i + needle.len()))
    }

    /// Replace the first literal occurrence of `search` at or after `from`.
    /// A miss is a no-op and returns `offset` unchanged.
    pub fn replace(
        &mut self,
        search: &str,
        replacement: &str,
        from: usize,
        offset: Option<usize>,
    ) -> Option<usize> {
        match self.find(search, from) {
            Some((start, end)) => self.update(start as isize, end as isize, replacement, offset),
            None => offset,
        }
    }

    pub fn position_to_offset(&self, position: Position) -> usize {
        position::position_to_offset(&self.current, position)
    }

    pub fn offset_to_position(&self, offset: usize) -> Position {
        position::offset_to_position(&self.current, offset)
    }
}
