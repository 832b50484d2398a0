// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The clear / redraw engine. It is the only code that moves the cursor.
//!
//! The terminal never reports what is visible, so the engine keeps its own bookkeeping:
//! [`RenderEngine::last_rows_drawn`] is the number of rows the previous frame took *as
//! actually written* (after truncation), and it is the single source of truth for how
//! many rows the next clear erases. After a render the cursor sits at the end of the
//! last row of the frame.
//!
//! Each render is one `Idle → Clearing → Writing → Idle` cycle, emitted between
//! [`BeginSynchronizedUpdate`] and [`EndSynchronizedUpdate`] so terminals that support
//! synchronized output never show a half erased frame.

use std::io::{self, Write};

use crossterm::{QueueableCommand,
                cursor::{MoveToColumn, MoveUp},
                terminal::{BeginSynchronizedUpdate, Clear, ClearType,
                           EndSynchronizedUpdate}};

use crate::{CRLF, LINE_FEED, TerminalGeometry, fit, rows_for};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderEngine {
    pub last_rows_drawn: usize,
    pub last_indent: u16,
}

impl RenderEngine {
    /// Erase the rows of the previous frame, bottom up, and leave the cursor at column
    /// `indent` of the topmost erased row.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying writer. [`Self::last_rows_drawn`] is only
    /// reset if every escape sequence was queued.
    pub fn clear(&mut self, writer: &mut dyn Write, indent: u16) -> io::Result<()> {
        writer.queue(MoveToColumn(0))?;

        for row in 0..self.last_rows_drawn {
            // The cursor already sits on the last drawn row.
            if row > 0 {
                writer.queue(MoveUp(1))?;
            }
            writer.queue(Clear(ClearType::CurrentLine))?;
        }

        if indent != 0 || self.last_indent != indent {
            writer.queue(MoveToColumn(indent))?;
        }

        self.last_indent = indent;
        self.last_rows_drawn = 0;
        Ok(())
    }

    /// Replace the previous frame with `content`. The content is fitted to the terminal
    /// height first, and [`Self::last_rows_drawn`] is set to the rows of what was
    /// written.
    ///
    /// When `can_move_cursor` is false (not a terminal, or disabled) nothing is erased
    /// and `content` is simply written.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying writer. The current cycle is abandoned, and
    /// not retried.
    pub fn render(
        &mut self,
        writer: &mut dyn Write,
        content: &str,
        indent: u16,
        geometry: TerminalGeometry,
        can_move_cursor: bool,
    ) -> io::Result<()> {
        writer.queue(BeginSynchronizedUpdate)?;

        if can_move_cursor {
            self.clear(writer, indent)?;
        }

        let fitted = fit(content, indent, geometry);
        // CRLF so that each line starts at column 0, even in raw mode.
        let output = fitted.replace(LINE_FEED, CRLF);
        writer.write_all(output.as_bytes())?;

        writer.queue(EndSynchronizedUpdate)?;
        writer.flush()?;

        self.last_rows_drawn = rows_for(&fitted, indent, geometry.columns);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{StdoutMock, TRUNCATION_NOTICE};

    const MOVE_UP: &str = "\x1b[1A";
    const CLEAR_LINE: &str = "\x1b[2K";
    const BEGIN_SYNC: &str = "\x1b[?2026h";
    const END_SYNC: &str = "\x1b[?2026l";

    fn geometry(columns: u16, rows: u16) -> TerminalGeometry {
        TerminalGeometry::new(Some(columns), Some(rows))
    }

    #[test]
    fn test_clear_erases_exactly_last_rows() {
        let mut mock = StdoutMock::default();
        let mut engine = RenderEngine {
            last_rows_drawn: 3,
            last_indent: 0,
        };

        engine.clear(&mut mock, 0).unwrap();

        let output = mock.get_copy_of_buffer_as_string();
        assert_eq!(output, format!("\x1b[1G{CLEAR_LINE}{MOVE_UP}{CLEAR_LINE}{MOVE_UP}{CLEAR_LINE}"));
        assert_eq!(engine.last_rows_drawn, 0);
    }

    #[test]
    fn test_clear_moves_to_indent() {
        let mut mock = StdoutMock::default();
        let mut engine = RenderEngine {
            last_rows_drawn: 1,
            last_indent: 0,
        };

        engine.clear(&mut mock, 7).unwrap();

        // Column 7 is 0 based, so the 1 based escape sequence says 8.
        assert!(mock.get_copy_of_buffer_as_string().ends_with("\x1b[8G"));
        assert_eq!(engine.last_indent, 7);

        // Back to indent 0 from 7 still moves the cursor once.
        mock.clear();
        engine.clear(&mut mock, 0).unwrap();
        assert_eq!(mock.get_copy_of_buffer_as_string(), "\x1b[1G\x1b[1G");

        mock.clear();
        engine.clear(&mut mock, 0).unwrap();
        assert_eq!(mock.get_copy_of_buffer_as_string(), "\x1b[1G");
    }

    #[test]
    fn test_render_is_synchronized_and_counts_rows() {
        let mut mock = StdoutMock::default();
        let mut engine = RenderEngine::default();

        engine
            .render(&mut mock, "one\ntwo", 0, geometry(80, 24), true)
            .unwrap();

        let output = mock.get_copy_of_buffer_as_string();
        assert!(output.starts_with(BEGIN_SYNC));
        assert!(output.ends_with(&format!("one\r\ntwo{END_SYNC}")));
        assert_eq!(engine.last_rows_drawn, 2);
    }

    #[test]
    fn test_consecutive_renders_only_erase_previous_rows() {
        let mut mock = StdoutMock::default();
        let mut engine = RenderEngine::default();

        engine
            .render(&mut mock, "a\nb\nc", 0, geometry(80, 24), true)
            .unwrap();
        mock.clear();
        engine.render(&mut mock, "x", 0, geometry(80, 24), true).unwrap();

        let output = mock.get_copy_of_buffer_as_string();
        assert_eq!(output.matches(MOVE_UP).count(), 2);
        assert_eq!(output.matches(CLEAR_LINE).count(), 3);
        assert_eq!(engine.last_rows_drawn, 1);

        mock.clear();
        engine.render(&mut mock, "x", 0, geometry(80, 24), true).unwrap();
        let output = mock.get_copy_of_buffer_as_string();
        assert_eq!(output.matches(MOVE_UP).count(), 0);
        assert_eq!(output.matches(CLEAR_LINE).count(), 1);
    }

    #[test]
    fn test_clear_then_render_keeps_row_count() {
        let mut mock = StdoutMock::default();
        let mut engine = RenderEngine::default();
        let content = "0123456789abcdef";

        engine.render(&mut mock, content, 0, geometry(5, 24), true).unwrap();
        let rows = engine.last_rows_drawn;
        assert_eq!(rows, 4);

        engine.clear(&mut mock, 0).unwrap();
        engine.render(&mut mock, content, 0, geometry(5, 24), true).unwrap();
        assert_eq!(engine.last_rows_drawn, rows);
    }

    #[test]
    fn test_rows_come_from_truncated_content() {
        let mut mock = StdoutMock::default();
        let mut engine = RenderEngine::default();
        let content = (0..10)
            .map(|it| format!("Line {it}"))
            .collect::<Vec<_>>()
            .join("\n");

        engine
            .render(&mut mock, &content, 0, geometry(80, 5), true)
            .unwrap();

        assert_eq!(engine.last_rows_drawn, 5);
        let output = mock.get_copy_of_buffer_as_string_strip_ansi();
        assert!(output.contains(TRUNCATION_NOTICE));
        assert_eq!(output.matches("Line").count(), 4);
    }

    #[test]
    fn test_render_without_cursor_movement() {
        let mut mock = StdoutMock::default();
        let mut engine = RenderEngine {
            last_rows_drawn: 2,
            last_indent: 0,
        };

        engine.render(&mut mock, "x", 0, geometry(80, 24), false).unwrap();

        let output = mock.get_copy_of_buffer_as_string();
        assert_eq!(output, format!("{BEGIN_SYNC}x{END_SYNC}"));
    }
}
