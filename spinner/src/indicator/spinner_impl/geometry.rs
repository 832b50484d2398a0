// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Count the terminal rows a block of text occupies.
//!
//! A logical line (text between two `\n`) wraps into
//! `ceil((indent + display_width) / columns)` rows, and even an empty logical line takes
//! one row. The display width is measured per grapheme cluster, so a wide glyph (CJK,
//! most emoji) counts as the 2 cells it occupies, and a multi code point emoji (ZWJ
//! sequence, flag) counts once. ANSI escape sequences are stripped before measuring.
//!
//! When the column count is unknown, there is no wrapping: 1 row per logical line.

use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::LINE_FEED;

/// Display width of a single line that contains no ANSI escape sequences.
#[must_use]
pub fn display_width(line: &str) -> usize {
    // ASCII fast path.
    if line.is_ascii() {
        return line.bytes().filter(|byte| !byte.is_ascii_control()).count();
    }
    line.graphemes(true).map(UnicodeWidthStr::width).sum()
}

/// Remove ANSI escape sequences (and carriage returns) from `content`. Line feeds are
/// kept.
#[must_use]
pub fn strip_ansi(content: &str) -> Cow<'_, str> {
    if content.contains(['\x1b', '\r']) {
        Cow::Owned(strip_ansi_escapes::strip_str(content).replace('\r', ""))
    } else {
        Cow::Borrowed(content)
    }
}

/// Rows one logical line (no line feeds, no ANSI) occupies.
#[must_use]
pub fn rows_for_line(line: &str, indent: u16, columns: Option<u16>) -> usize {
    match columns {
        Some(columns) if columns > 0 => {
            let cells = usize::from(indent) + display_width(line);
            cells.div_ceil(usize::from(columns)).max(1)
        }
        _ => 1,
    }
}

/// Rows the whole `content` occupies. Returns 0 only for empty content.
#[must_use]
pub fn rows_for(content: &str, indent: u16, columns: Option<u16>) -> usize {
    if content.is_empty() {
        return 0;
    }
    strip_ansi(content)
        .split(LINE_FEED)
        .map(|line| rows_for_line(line, indent, columns))
        .sum()
}

/// Longest prefix of `line` (no ANSI) that fits in `max_width` display cells. Never
/// splits a grapheme cluster.
#[must_use]
pub fn truncate_to_width(line: &str, max_width: usize) -> &str {
    let mut used = 0;
    for (byte_index, grapheme) in line.grapheme_indices(true) {
        let grapheme_width = UnicodeWidthStr::width(grapheme);
        if used + grapheme_width > max_width {
            return &line[..byte_index];
        }
        used += grapheme_width;
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("", 0, Some(80), 0 ; "empty content")]
    #[test_case("hello", 0, Some(80), 1 ; "short line")]
    #[test_case("a\n\nb", 0, Some(80), 3 ; "blank line takes a row")]
    #[test_case("a\n", 0, Some(80), 2 ; "trailing line feed")]
    #[test_case("0123456789", 0, Some(5), 2 ; "exact multiple")]
    #[test_case("01234567890", 0, Some(5), 3 ; "one cell over")]
    #[test_case("0123456789", 2, Some(5), 3 ; "indent pushes over")]
    #[test_case("0123456789\nabc", 0, Some(5), 3 ; "sum over lines")]
    #[test_case("0123456789", 0, None, 1 ; "unknown columns no wrap")]
    #[test_case("0123456789\nabc", 4, Some(0), 2 ; "zero columns no wrap")]
    fn test_rows_for_single_width(
        content: &str,
        indent: u16,
        columns: Option<u16>,
        expected: usize,
    ) {
        assert_eq!(rows_for(content, indent, columns), expected);
    }

    #[test]
    fn test_rows_for_matches_formula_for_ascii() {
        for columns in 1..=12_u16 {
            for indent in 0..4_u16 {
                for len in 0..30_usize {
                    let line = "x".repeat(len);
                    let expected = ((usize::from(indent) + len)
                        .div_ceil(usize::from(columns)))
                    .max(1);
                    let content = format!("{line}\n{line}");
                    assert_eq!(
                        rows_for(&content, indent, Some(columns)),
                        expected * 2,
                        "columns={columns} indent={indent} len={len}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_wide_glyphs_use_display_width() {
        let columns = 4;
        // 8 wide glyphs = 16 cells = 4 rows, 8 narrow chars = 8 cells = 2 rows.
        let wide = "你好你好你好你好";
        let narrow = "abcdefgh";
        assert_eq!(display_width(wide), 16);
        assert_eq!(rows_for(wide, 0, Some(columns)), 4);
        assert_eq!(rows_for(narrow, 0, Some(columns)), 2);
        assert_eq!(
            rows_for(wide, 0, Some(columns)),
            2 * rows_for(narrow, 0, Some(columns))
        );
    }

    #[test]
    fn test_emoji_width() {
        assert_eq!(display_width("👍"), 2);
        assert_eq!(rows_for("👍👍", 0, Some(3)), 2);
    }

    #[test]
    fn test_ansi_is_not_measured() {
        let styled = "\x1b[36m⠋\x1b[39m foo";
        assert_eq!(rows_for(styled, 0, Some(5)), 1);
        assert_eq!(display_width(&strip_ansi(styled)), 5);
    }

    #[test]
    fn test_truncate_to_width_keeps_graphemes_whole() {
        assert_eq!(truncate_to_width("hello", 3), "hel");
        assert_eq!(truncate_to_width("你好", 3), "你");
        assert_eq!(truncate_to_width("你好", 4), "你好");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
