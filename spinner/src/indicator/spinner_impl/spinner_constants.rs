// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::Duration;

pub const DOTS_INTERVAL: Duration = Duration::from_millis(80);
pub const DOTS_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub const LINE_INTERVAL: Duration = Duration::from_millis(130);
pub const LINE_FRAMES: [&str; 4] = ["-", "\\", "|", "/"];

/// More info: <https://www.unicode.org/charts/script/chart_Braille.html>
pub const BRAILLE_INTERVAL: Duration = Duration::from_millis(85);
pub const BRAILLE_DOTS: [&str; 34] = [
    "⠁", "⠃", "⡇", "⠇", "⡎", "⢟", "⡯", "⡗", "⡞", "⡟", "⡷", "⡾", "⡾", "⣕", "⣗", "⣝", "⡣",
    "⡮", "⡯", "⡳", "⡵", "⣞", "⣟", "⣧", "⣮", "⣯", "⣷", "⣿", "⣼", "⡟", "⡏", "⠇", "⠃", "⠁",
];

pub const BLOCK_INTERVAL: Duration = Duration::from_millis(85);
pub const BLOCK_DOTS: [&str; 8] = ["█", "▓", "▒", "░", "░", "▒", "▓", "█"];

pub const ARC_INTERVAL: Duration = Duration::from_millis(100);
pub const ARC_FRAMES: [&str; 6] = ["◜", "◠", "◝", "◞", "◡", "◟"];

/// Printed in place of the animation when the spinner is disabled (not a terminal, or
/// running in CI).
pub const FALLBACK_GLYPH: &str = "-";

pub const SUCCESS_GLYPH: &str = "✔";
pub const FAILURE_GLYPH: &str = "✖";
pub const WARNING_GLYPH: &str = "⚠";
pub const INFO_GLYPH: &str = "ℹ";

/// Trailing row appended when the frame is taller than the terminal.
pub const TRUNCATION_NOTICE: &str = "... (content truncated to fit terminal)";

/// Truncation needs one row for the notice plus at least one row of content. Below
/// this, content is written in full even though it overflows.
pub const MIN_ROWS_FOR_TRUNCATION: u16 = 2;

pub const LINE_FEED: char = '\n';

/// Written in place of every [`LINE_FEED`] of a frame, so the cursor returns to column 0
/// even when the terminal is in raw mode (eg: while the stdin discarder is running).
pub const CRLF: &str = "\r\n";
