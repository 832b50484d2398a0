// Copyright (c) 2023-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::IsTerminal;

/// Column and row count of the terminal, read fresh before every render. Either value
/// may be unknown, eg: when the stream is piped or the platform does not report it.
///
/// A zero count is normalized to unknown, since no geometry calculation can use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerminalGeometry {
    pub columns: Option<u16>,
    pub rows: Option<u16>,
}

impl TerminalGeometry {
    #[must_use]
    pub fn new(columns: Option<u16>, rows: Option<u16>) -> Self {
        Self {
            columns: columns.filter(|it| *it > 0),
            rows: rows.filter(|it| *it > 0),
        }
    }

    #[must_use]
    pub fn unknown() -> Self { Self::default() }
}

/// Source of [`TerminalGeometry`]. Implementations must not cache: a real terminal can
/// be resized between two renders.
pub trait TerminalSizeSource: Send + Sync {
    fn geometry(&self) -> TerminalGeometry;
}

/// Reads the size of the controlling terminal using [`crossterm::terminal::size()`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveTerminalSize;

impl TerminalSizeSource for LiveTerminalSize {
    fn geometry(&self) -> TerminalGeometry {
        match crossterm::terminal::size() {
            Ok((columns, rows)) => TerminalGeometry::new(Some(columns), Some(rows)),
            Err(_) => TerminalGeometry::unknown(),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum TTYResult {
    IsInteractive,
    IsNotInteractive,
}

/// Returns [`TTYResult::IsInteractive`] if stdin is an interactive terminal (TTY). The
/// stdin discarder only engages when this is the case.
#[must_use]
pub fn is_stdin_interactive() -> TTYResult {
    if std::io::stdin().is_terminal() {
        TTYResult::IsInteractive
    } else {
        TTYResult::IsNotInteractive
    }
}

/// Returns true when running under a continuous integration service. Spinners are
/// disabled by default in this case, since CI logs are not interactive terminals.
#[must_use]
pub fn is_ci_environment() -> bool { is_ci::cached() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_are_unknown() {
        let geometry = TerminalGeometry::new(Some(0), Some(0));
        assert_eq!(geometry, TerminalGeometry::unknown());

        let geometry = TerminalGeometry::new(Some(80), Some(0));
        assert_eq!(geometry.columns, Some(80));
        assert_eq!(geometry.rows, None);
    }
}
