use regex::Regex;

use crate::editing::TrackedBuffer;

/// A matched substring together with the byte span it occupied at the time
/// of matching. Spans go stale the moment the buffer is mutated; consume a
/// whole batch and apply edits in reverse document order instead of
/// interleaving matching and mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Run `regex` against the buffer's current text and collect every match as
/// one `Span` per participating capture group, in document order. Group 0
/// (the full match) is excluded; groups that did not participate in a match
/// are omitted from that match's spans.
///
/// Matching is read-only. Callers deriving edits from multiple matches must
/// process the spans from the last match backwards so that earlier spans
/// remain valid while later edits land.
pub fn match_captures(buffer: &TrackedBuffer, regex: &Regex) -> Vec<Vec<Span>> {
    regex
        .captures_iter(buffer.current())
        .map(|captures| {
            captures
                .iter()
                .skip(1)
                .flatten()
                .map(|group| Span {
                    text: group.as_str().to_owned(),
                    start: group.start(),
                    end: group.end(),
                })
                .collect()
        })
        .collect()
}
