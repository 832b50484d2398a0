// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Keep stray keystrokes from echoing over the spinner.
//!
//! While a spinner is on screen, the terminal is put into raw mode (no echo, no line
//! buffering), and a listener reads and drops every input event. `Ctrl+C` can't generate
//! `SIGINT` in raw mode, so the listener re-raises it on unix.
//!
//! Raw mode is restored to what it was *before* the spinner started. If the caller had
//! already enabled raw mode (eg: it's running its own line editor), it stays enabled.

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind,
                       KeyModifiers};
use futures_util::StreamExt;
use miette::IntoDiagnostic;
use tokio::{runtime::Handle, task::JoinHandle};

/// Something that silences the input device while the spinner is shown. Injected with
/// [`crate::Spinner::with_input_discarder()`].
pub trait InputDiscard: Send {
    /// # Errors
    ///
    /// If the input device can't be switched to raw mode.
    fn start(&mut self, runtime: &Handle) -> miette::Result<()>;

    /// Undo [`Self::start`]. Must be a no-op if not started.
    ///
    /// # Errors
    ///
    /// If the input device can't be restored.
    fn stop(&mut self) -> miette::Result<()>;
}

/// The raw mode switch of the terminal.
pub trait RawModeControl: Send {
    /// # Errors
    ///
    /// If the terminal can't be queried.
    fn is_raw_mode_enabled(&self) -> miette::Result<bool>;

    /// # Errors
    ///
    /// If the terminal attributes can't be set.
    fn set_raw_mode(&mut self, is_enabled: bool) -> miette::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CrosstermRawMode;

impl RawModeControl for CrosstermRawMode {
    fn is_raw_mode_enabled(&self) -> miette::Result<bool> {
        crossterm::terminal::is_raw_mode_enabled().into_diagnostic()
    }

    fn set_raw_mode(&mut self, is_enabled: bool) -> miette::Result<()> {
        if is_enabled {
            crossterm::terminal::enable_raw_mode().into_diagnostic()
        } else {
            crossterm::terminal::disable_raw_mode().into_diagnostic()
        }
    }
}

#[derive(Debug)]
pub struct StdinDiscarder<R: RawModeControl = CrosstermRawMode> {
    raw_mode: R,
    /// [Some] while started: the raw mode state to restore on stop.
    prior_raw_mode: Option<bool>,
    listener: Option<JoinHandle<()>>,
    /// When false, no [`EventStream`] is read. Only raw mode is toggled.
    pub spawn_listener: bool,
}

impl Default for StdinDiscarder {
    fn default() -> Self { Self::new(CrosstermRawMode) }
}

impl<R: RawModeControl> StdinDiscarder<R> {
    pub fn new(raw_mode: R) -> Self {
        Self {
            raw_mode,
            prior_raw_mode: None,
            listener: None,
            spawn_listener: true,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool { self.prior_raw_mode.is_some() }
}

impl<R: RawModeControl> InputDiscard for StdinDiscarder<R> {
    fn start(&mut self, runtime: &Handle) -> miette::Result<()> {
        if self.is_active() {
            return Ok(());
        }

        let prior = self.raw_mode.is_raw_mode_enabled()?;
        if !prior {
            self.raw_mode.set_raw_mode(true)?;
        }
        self.prior_raw_mode = Some(prior);

        if self.spawn_listener {
            self.listener = Some(runtime.spawn(discard_events()));
        }

        Ok(())
    }

    fn stop(&mut self) -> miette::Result<()> {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
        match self.prior_raw_mode.take() {
            Some(false) => self.raw_mode.set_raw_mode(false),
            Some(true) | None => Ok(()),
        }
    }
}

async fn discard_events() {
    let mut event_stream = EventStream::new();
    while let Some(event) = event_stream.next().await {
        match event {
            Ok(Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers,
                kind: KeyEventKind::Press,
                ..
            })) if modifiers.contains(KeyModifiers::CONTROL) => raise_interrupt(),
            Ok(_) => {}
            Err(error) => {
                tracing::debug!(message = "stdin discarder stopped", ?error);
                break;
            }
        }
    }
}

#[cfg(unix)]
fn raise_interrupt() {
    if let Err(error) = signal_hook::low_level::raise(signal_hook::consts::SIGINT) {
        tracing::warn!(message = "could not re-raise SIGINT", ?error);
    }
}

#[cfg(not(unix))]
fn raise_interrupt() {}
