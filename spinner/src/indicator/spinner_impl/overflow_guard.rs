// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::borrow::Cow;

use crate::{LINE_FEED, MIN_ROWS_FOR_TRUNCATION, TRUNCATION_NOTICE, TerminalGeometry,
            rows_for, rows_for_line, strip_ansi, truncate_to_width};

/// Make sure `content` fits in the terminal's viewport.
///
/// A cursor can't be moved above the top of the viewport, so a frame taller than the
/// terminal could never be fully cleared. When the frame would take more rows than the
/// terminal has, it is cut down to the rows left over by the notice, followed by
/// [`TRUNCATION_NOTICE`] (cut to the fewest rows it can take at this indent, usually
/// one). The result never takes more than `rows` rows, and the notice is never cut to
/// nothing.
///
/// `content` is returned unchanged when:
/// - the row count is unknown,
/// - it already fits,
/// - the terminal is shorter than [`MIN_ROWS_FOR_TRUNCATION`] (no room for content plus
///   notice),
/// - the indent is so wide that even the notice doesn't fit.
///
/// Styling is dropped from a truncated frame.
#[must_use]
pub fn fit<'a>(content: &'a str, indent: u16, geometry: TerminalGeometry) -> Cow<'a, str> {
    let Some(max_rows) = geometry.rows else {
        return Cow::Borrowed(content);
    };
    if max_rows < MIN_ROWS_FOR_TRUNCATION {
        return Cow::Borrowed(content);
    }
    let max_rows = usize::from(max_rows);
    let columns = geometry.columns;
    if rows_for(content, indent, columns) <= max_rows {
        return Cow::Borrowed(content);
    }

    let notice = notice_for(indent, columns);
    let notice_rows = rows_for_line(notice, indent, columns);
    if notice_rows > max_rows {
        return Cow::Borrowed(content);
    }

    let plain = strip_ansi(content);
    let row_budget = max_rows - notice_rows;
    let mut rows_used = 0;
    let mut kept: Vec<&str> = vec![];

    for line in plain.split(LINE_FEED) {
        let remaining = row_budget - rows_used;
        if remaining == 0 {
            break;
        }
        let line_rows = rows_for_line(line, indent, columns);
        if line_rows <= remaining {
            kept.push(line);
            rows_used += line_rows;
            continue;
        }
        // Partial line: keep as many cells as the remaining rows can hold. Only
        // reachable when columns are known, since otherwise every line takes 1 row.
        if let Some(columns) = columns {
            let cells = (usize::from(columns) * remaining).saturating_sub(usize::from(indent));
            let cut = truncate_to_width(line, cells);
            if !cut.is_empty() {
                kept.push(cut);
            }
        }
        break;
    }

    kept.push(notice);
    Cow::Owned(kept.join("\n"))
}

/// [`TRUNCATION_NOTICE`], cut to fill the rows that its first cell after `indent` starts
/// wrapping into. At least one cell is always kept.
fn notice_for(indent: u16, columns: Option<u16>) -> &'static str {
    match columns {
        Some(columns) if columns > 0 => {
            let columns = usize::from(columns);
            let indent = usize::from(indent);
            let rows = (indent + 1).div_ceil(columns);
            truncate_to_width(TRUNCATION_NOTICE, columns * rows - indent)
        }
        _ => TRUNCATION_NOTICE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(count: usize) -> String {
        (0..count)
            .map(|it| format!("line {it}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_fits_is_unchanged() {
        let content = lines(5);
        let geometry = TerminalGeometry::new(Some(80), Some(10));
        assert!(matches!(fit(&content, 0, geometry), Cow::Borrowed(_)));
    }

    #[test]
    fn test_exactly_rows_is_unchanged() {
        let content = lines(10);
        let geometry = TerminalGeometry::new(Some(80), Some(10));
        assert_eq!(fit(&content, 0, geometry), content);
    }

    #[test]
    fn test_truncates_to_rows_minus_one_plus_notice() {
        let content = lines(10);
        let geometry = TerminalGeometry::new(Some(80), Some(5));
        let fitted = fit(&content, 0, geometry);

        let fitted_lines: Vec<&str> = fitted.split('\n').collect();
        assert_eq!(fitted_lines.len(), 5);
        assert_eq!(&fitted_lines[..4], ["line 0", "line 1", "line 2", "line 3"]);
        assert_eq!(fitted_lines[4], TRUNCATION_NOTICE);
        assert!(rows_for(&fitted, 0, Some(80)) <= 5);
    }

    #[test]
    fn test_unknown_rows_is_unchanged() {
        let content = lines(100);
        let geometry = TerminalGeometry::new(Some(80), None);
        assert_eq!(fit(&content, 0, geometry), content);
    }

    #[test]
    fn test_one_row_terminal_is_unchanged() {
        let content = lines(3);
        let geometry = TerminalGeometry::new(Some(80), Some(1));
        assert_eq!(fit(&content, 0, geometry), content);
    }

    #[test]
    fn test_wrapped_line_is_cut_by_width() {
        // One 31 cell line in a 10x3 terminal needs 4 rows: 2 rows of content + notice.
        let content = "x".repeat(31);
        let geometry = TerminalGeometry::new(Some(10), Some(3));
        let fitted = fit(&content, 0, geometry);

        let fitted_lines: Vec<&str> = fitted.split('\n').collect();
        assert_eq!(fitted_lines[0], "x".repeat(20));
        assert_eq!(fitted_lines[1], "... (conte");
        assert!(rows_for(&fitted, 0, Some(10)) <= 3);
    }

    #[test]
    fn test_indent_wider_than_terminal_keeps_notice() {
        let geometry = TerminalGeometry::new(Some(5), Some(3));
        let fitted = fit("a\nb\nc\nd", 7, geometry);

        // The notice wraps onto a second row, and nothing else fits.
        assert_eq!(fitted, "...");
        assert_eq!(rows_for(&fitted, 7, Some(5)), 2);
    }

    #[test]
    fn test_indent_too_wide_for_notice_is_unchanged() {
        // Even one cell at indent 40 takes 9 rows of a 5 column terminal.
        let geometry = TerminalGeometry::new(Some(5), Some(3));
        assert_eq!(fit("a\nb\nc\nd", 40, geometry), "a\nb\nc\nd");
    }

    #[test]
    fn test_truncated_fits_and_ends_with_notice_for_any_indent() {
        let content = "你好".repeat(40) + "\n" + &lines(8);
        for indent in [0_u16, 3, 9, 10, 11, 25] {
            for rows in 2..12_u16 {
                for columns in 4..20_u16 {
                    let geometry = TerminalGeometry::new(Some(columns), Some(rows));
                    let fitted = fit(&content, indent, geometry);
                    if fitted == content {
                        continue;
                    }
                    let last_line = fitted.rsplit('\n').next().unwrap_or_default();
                    assert!(
                        !last_line.is_empty() && TRUNCATION_NOTICE.starts_with(last_line),
                        "indent={indent} rows={rows} columns={columns}"
                    );
                    assert!(
                        rows_for(&fitted, indent, Some(columns)) <= usize::from(rows),
                        "indent={indent} rows={rows} columns={columns}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_never_exceeds_rows_with_indent_and_wide_glyphs() {
        let content = "你好".repeat(40) + "\n" + &lines(8);
        for rows in 2..12_u16 {
            for columns in 4..20_u16 {
                let geometry = TerminalGeometry::new(Some(columns), Some(rows));
                let fitted = fit(&content, 2, geometry);
                assert!(
                    rows_for(&fitted, 2, Some(columns)) <= usize::from(rows),
                    "rows={rows} columns={columns}"
                );
            }
        }
    }
}
