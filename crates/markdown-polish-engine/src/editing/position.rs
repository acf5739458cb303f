use serde::{Deserialize, Serialize};

/// Editor-facing caret coordinate: zero-indexed line and zero-indexed byte
/// column within that line.
///
/// Offsets throughout the engine are UTF-8 byte offsets on `char`
/// boundaries. `\n` is the sole line separator; a `\r` before a `\n` counts
/// as content of the preceding line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// Convert a position to a linear byte offset into `text`.
///
/// Sums the lengths (plus one for each removed `\n`) of all lines strictly
/// before `position.line`, then adds `position.ch`.
pub fn position_to_offset(text: &str, position: Position) -> usize {
    let prior: usize = text
        .split('\n')
        .take(position.line)
        .map(|line| line.len() + 1)
        .sum();

    prior + position.ch
}

/// Convert a linear byte offset into `text` to a position.
///
/// Offsets past the end of `text` clamp to the end of the last line.
pub fn offset_to_position(text: &str, offset: usize) -> Position {
    let offset = offset.min(text.len());

    let mut line = 0;
    let mut line_start = 0;
    for (i, &byte) in text.as_bytes().iter().enumerate().take(offset) {
        if byte == b'\n' {
            line += 1;
            line_start = i + 1;
        }
    }

    Position {
        line,
        ch: offset - line_start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const INPUT: &str = "1234 6789\n1234 6789";

    #[rstest]
    #[case(Position::new(0, 4), 4)]
    #[case(Position::new(0, 5), 5)]
    #[case(Position::new(0, 9), 9)]
    #[case(Position::new(1, 4), 14)]
    #[case(Position::new(1, 5), 15)]
    #[case(Position::new(1, 9), 19)]
    #[case(Position::new(0, 10), 10)]
    #[case(Position::new(1, 0), 10)]
    fn position_to_offset_cases(#[case] position: Position, #[case] expected: usize) {
        assert_eq!(position_to_offset(INPUT, position), expected);
    }

    #[rstest]
    #[case(4, Position::new(0, 4))]
    #[case(5, Position::new(0, 5))]
    #[case(9, Position::new(0, 9))]
    #[case(14, Position::new(1, 4))]
    #[case(15, Position::new(1, 5))]
    #[case(19, Position::new(1, 9))]
    #[case(10, Position::new(1, 0))]
    fn offset_to_position_cases(#[case] offset: usize, #[case] expected: Position) {
        assert_eq!(offset_to_position(INPUT, offset), expected);
    }

    #[test]
    fn offset_zero_is_origin() {
        assert_eq!(offset_to_position(INPUT, 0), Position::new(0, 0));
    }

    #[test]
    fn offset_at_end_is_end_of_last_line() {
        assert_eq!(offset_to_position(INPUT, INPUT.len()), Position::new(1, 9));
    }

    #[test]
    fn offset_past_end_clamps() {
        assert_eq!(
            offset_to_position(INPUT, INPUT.len() + 100),
            Position::new(1, 9)
        );
    }

    #[test]
    fn round_trip_every_offset() {
        let samples = [
            "",
            "a",
            "hello world",
            "1234 6789\n1234 6789",
            "\n\n\n",
            "line\r\nwith crlf\nplain",
            "trailing newline\n",
        ];

        for text in samples {
            for offset in 0..=text.len() {
                if !text.is_char_boundary(offset) {
                    continue;
                }
                let position = offset_to_position(text, offset);
                assert_eq!(
                    position_to_offset(text, position),
                    offset,
                    "round trip failed for {text:?} at {offset}"
                );
            }
        }
    }

    #[test]
    fn carriage_return_belongs_to_previous_line() {
        let text = "ab\r\ncd";
        // Offset 2 points at the '\r', still line 0.
        assert_eq!(offset_to_position(text, 2), Position::new(0, 2));
        // Offset 4 is the first byte after the '\n'.
        assert_eq!(offset_to_position(text, 4), Position::new(1, 0));
    }
}
