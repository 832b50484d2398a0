// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          io,
          sync::Arc};

use tokio::{runtime::Handle, task::JoinHandle};

use crate::{InterceptState, OutputDevice, RenderEngine, RenderState, StdMutex,
            TerminalSizeSource};

/// All the state of one spinner, behind a single lock. Redraw cycles (from the ticker, a
/// lifecycle call, or a foreign write) all run while holding this lock, so they are
/// serialized and never interleave their clear / write sequences.
pub type SafeSpinnerInner = Arc<StdMutex<SpinnerInner>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Created,
    Spinning,
    Stopped,
    Persisted,
}

/// Handle of a running redraw timer. Stays the same for as long as the spinner keeps
/// spinning, and a new one is issued for each [`crate::Spinner::start()`] after a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Default)]
pub struct Lifecycle {
    pub state: LifecycleState,
    /// Bumped on every start and stop. A timer task captures the value it was spawned
    /// with, and bails before any side effect when it no longer matches.
    pub generation: u64,
    pub ticker: Option<JoinHandle<()>>,
    pub timer_id: Option<TimerId>,
    /// Captured on start, used to arm timers from plain [`std::io::Write`] calls.
    pub runtime: Option<Handle>,
}

impl Lifecycle {
    /// Invalidate every timer spawned so far.
    pub fn cancel_timers(&mut self) {
        self.generation += 1;
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        self.timer_id = None;
    }
}

pub struct SpinnerInner {
    pub render_state: RenderState,
    pub engine: RenderEngine,
    pub intercept: InterceptState,
    pub lifecycle: Lifecycle,
    pub stream: OutputDevice,
    pub terminal_size: Arc<dyn TerminalSizeSource>,
    pub is_enabled: bool,
    pub is_silent: bool,
}

impl Debug for SpinnerInner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpinnerInner")
            .field("render_state", &self.render_state)
            .field("engine", &self.engine)
            .field("lifecycle", &self.lifecycle)
            .field("is_terminal", &self.stream.is_terminal)
            .field("is_enabled", &self.is_enabled)
            .field("is_silent", &self.is_silent)
            .finish_non_exhaustive()
    }
}

impl SpinnerInner {
    #[must_use]
    pub fn is_spinning(&self) -> bool { self.lifecycle.state == LifecycleState::Spinning }

    /// The engine may only move the cursor on an enabled spinner drawing on a terminal.
    #[must_use]
    pub fn can_move_cursor(&self) -> bool { self.is_enabled && self.stream.is_terminal }

    /// Erase the last drawn frame. No-op when the cursor may not be moved, or when a
    /// foreign partial line is on screen (the cursor is in the middle of someone else's
    /// output, and the frame was already erased before it was written).
    ///
    /// Returns true if the cursor was moved to erase the frame.
    ///
    /// # Errors
    ///
    /// Returns the error of the stream.
    pub fn clear(&mut self) -> io::Result<bool> {
        if !self.can_move_cursor() || self.intercept.partial_line_on_screen {
            return Ok(false);
        }
        let indent = self.render_state.indent;
        let mut device = self.stream.lock();
        self.engine.clear(&mut *device, indent)?;
        device.flush()?;
        Ok(true)
    }

    /// Compose the next frame and draw it over the previous one.
    ///
    /// # Errors
    ///
    /// Returns the error of the stream.
    pub fn render(&mut self) -> io::Result<()> {
        if self.is_silent || self.intercept.partial_line_on_screen {
            return Ok(());
        }
        let frame = self.render_state.compose();
        let geometry = self.terminal_size.geometry();
        let indent = self.render_state.indent;
        let can_move_cursor = self.can_move_cursor();

        let mut device = self.stream.lock();
        self.engine
            .render(&mut *device, &frame, indent, geometry, can_move_cursor)
    }

    /// Write bytes straight to the stream, bypassing interception.
    ///
    /// # Errors
    ///
    /// Returns the error of the stream.
    pub fn write_direct(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut device = self.stream.lock();
        device.write_all(bytes)?;
        device.flush()
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{test_helpers::new_mock_inner, *};

    #[test]
    fn test_render_then_clear() {
        let (mut inner, stdout_mock) = new_mock_inner(80, 24);
        inner.render_state.text = "foo".into();

        inner.render().unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string_strip_ansi(), "* foo");
        assert_eq!(inner.engine.last_rows_drawn, 1);

        assert!(inner.clear().unwrap());
        assert_eq!(inner.engine.last_rows_drawn, 0);
    }

    #[test]
    fn test_clear_is_noop_when_disabled() {
        let (mut inner, stdout_mock) = new_mock_inner(80, 24);
        inner.is_enabled = false;
        inner.engine.last_rows_drawn = 3;

        assert!(!inner.clear().unwrap());
        assert!(stdout_mock.get_copy_of_buffer().is_empty());
        assert_eq!(inner.engine.last_rows_drawn, 3);
    }

    #[test]
    fn test_silent_never_renders() {
        let (mut inner, stdout_mock) = new_mock_inner(80, 24);
        inner.is_silent = true;

        inner.render().unwrap();
        assert!(stdout_mock.get_copy_of_buffer().is_empty());
        assert_eq!(inner.render_state.frame_index(), None);
    }

    #[test]
    fn test_cancel_timers_bumps_generation() {
        let mut lifecycle = Lifecycle {
            timer_id: Some(TimerId(1)),
            ..Default::default()
        };
        let before = lifecycle.generation;
        lifecycle.cancel_timers();
        assert_eq!(lifecycle.generation, before + 1);
        assert_eq!(lifecycle.timer_id, None);
    }
}
