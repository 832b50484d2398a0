// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io,
          sync::{Arc, MutexGuard},
          time::Duration};

use crossterm::{QueueableCommand,
                cursor::{Hide, Show}};
use tokio::{runtime::Handle, time::Instant};

use crate::{ChannelId, FALLBACK_GLYPH, FrameSetSpec, InputDiscard, InterceptState,
            InterceptWriter, Lifecycle, LifecycleState, OutcomeSymbol, OutputDevice,
            PersistOptions, RenderEngine, RenderState, SafeSpinnerInner, SpinnerColor,
            SpinnerConfig, SpinnerError, SpinnerInner, StdMutex, StdinDiscarder,
            TTYResult, TextSource, TimerId, is_ci_environment, is_stdin_interactive,
            lock_recovering, validate_indent, validate_interval};

/// An animated single line status indicator.
///
/// ```text
/// Created ──start()──▶ Spinning ──stop()──▶ Stopped ──start()──▶ Spinning ...
///                         │
///                         └──stop_and_persist()──▶ Persisted
/// ```
///
/// While spinning, a ticker redraws the frame every interval, and foreign output to the
/// same terminal should go through [`Self::writer()`] (or [`Self::intercept()`] for
/// another channel) so it interleaves cleanly with the frame. The `tracing` layers in
/// [`crate::log`] can do that for logging.
///
/// When disabled (default when the stream is not a terminal, or in CI) nothing is
/// animated, and [`Self::start()`] prints one plain line instead. When silent nothing is
/// written at all.
///
/// Dropping a spinning [`Spinner`] stops it.
///
/// ```no_run
/// use r3bl_spinner::{Spinner, SpinnerConfig};
///
/// # async fn example() -> miette::Result<()> {
/// let mut spinner = Spinner::try_new(SpinnerConfig::default())?;
/// spinner.start(Some("Downloading"))?;
/// // Some work happens here...
/// spinner.succeed(Some("Downloaded"))?;
/// # Ok(())
/// # }
/// ```
#[allow(missing_debug_implementations)]
pub struct Spinner {
    safe_inner: SafeSpinnerInner,
    input_discarder: Option<Box<dyn InputDiscard>>,
    is_discarding_stdin: bool,
    discard_stdin: bool,
    hide_cursor: bool,
}

impl Spinner {
    /// Validate `config`, without writing anything.
    ///
    /// # Errors
    ///
    /// A [`SpinnerError`] naming the first invalid option.
    pub fn try_new(config: SpinnerConfig) -> Result<Self, SpinnerError> {
        let indent = validate_indent(config.indent)?;
        let frame_set = config.spinner.resolve()?;
        let interval_override = config.interval.map(validate_interval).transpose()?;
        let is_enabled = config
            .is_enabled
            .unwrap_or_else(|| config.stream.is_terminal && !is_ci_environment());

        let mut render_state = RenderState::new(frame_set);
        render_state.text = config.text;
        render_state.prefix_text = config.prefix_text;
        render_state.suffix_text = config.suffix_text;
        render_state.indent = indent;
        render_state.color = config.color;
        render_state.interval_override = interval_override;
        render_state.show_elapsed_time = config.show_elapsed_time;

        let inner = SpinnerInner {
            render_state,
            engine: RenderEngine::default(),
            intercept: InterceptState::new(config.stream.clone()),
            lifecycle: Lifecycle::default(),
            stream: config.stream,
            terminal_size: config.terminal_size,
            is_enabled,
            is_silent: config.is_silent,
        };

        Ok(Self {
            safe_inner: Arc::new(StdMutex::new(inner)),
            input_discarder: None,
            is_discarding_stdin: false,
            discard_stdin: config.discard_stdin,
            hide_cursor: config.hide_cursor,
        })
    }

    /// Replace the default [`StdinDiscarder`]. An injected discarder is used even when
    /// stdin is not a terminal.
    #[must_use]
    pub fn with_input_discarder(mut self, discarder: impl InputDiscard + 'static) -> Self {
        self.input_discarder = Some(Box::new(discarder));
        self
    }

    fn lock(&self) -> MutexGuard<'_, SpinnerInner> { lock_recovering(&self.safe_inner) }

    /// Start animating, optionally replacing the text first. Calling it again while
    /// spinning does nothing, and returns the same [`TimerId`].
    ///
    /// Returns [None] when nothing is animated (silent, or disabled).
    ///
    /// # Errors
    ///
    /// - [`SpinnerError::NoAsyncRuntime`] if an enabled spinner is started outside a tokio
    ///   runtime.
    /// - The input device can't be put in raw mode.
    /// - The stream fails to write. If only the first frame fails, the spinner is still
    ///   spinning, and the next tick draws again.
    pub fn start(&mut self, text: Option<&str>) -> miette::Result<Option<TimerId>> {
        let mut inner = lock_recovering(&self.safe_inner);

        if let Some(text) = text {
            inner.render_state.text = text.to_string();
        }

        if inner.is_silent {
            return Ok(None);
        }

        if !inner.is_enabled {
            if !inner.render_state.text.is_empty() {
                let line = format!(
                    "{indent}{FALLBACK_GLYPH} {text}\n",
                    indent = " ".repeat(usize::from(inner.render_state.indent)),
                    text = inner.render_state.text
                );
                inner.write_direct(line.as_bytes()).map_err(SpinnerError::from)?;
            }
            return Ok(None);
        }

        if inner.is_spinning() {
            return Ok(inner.lifecycle.timer_id);
        }

        let runtime = Handle::try_current().map_err(|_| SpinnerError::NoAsyncRuntime)?;

        // Take over the cursor and the input device before committing the lifecycle
        // state, so a failure here leaves the spinner as it was.
        let is_hiding_cursor = self.hide_cursor && inner.can_move_cursor();
        if is_hiding_cursor {
            write_command(&inner.stream, Hide).map_err(SpinnerError::from)?;
        }

        if self.discard_stdin
            && (self.input_discarder.is_some()
                || is_stdin_interactive() == TTYResult::IsInteractive)
        {
            let discarder = self
                .input_discarder
                .get_or_insert_with(|| Box::new(StdinDiscarder::default()));
            if let Err(error) = discarder.start(&runtime) {
                if is_hiding_cursor {
                    write_command(&inner.stream, Show).ok();
                }
                return Err(error);
            }
            self.is_discarding_stdin = true;
        }

        inner.lifecycle.cancel_timers();
        let generation = inner.lifecycle.generation;
        let timer_id = TimerId(generation);
        let started_at = Instant::now();
        inner.lifecycle.state = LifecycleState::Spinning;
        inner.lifecycle.runtime = Some(runtime.clone());
        inner.lifecycle.timer_id = Some(timer_id);
        inner.intercept.is_installed = inner.stream.is_terminal;
        inner.render_state.start_time = Some(started_at);

        inner.lifecycle.ticker = Some(runtime.spawn(redraw_until_cancelled(
            Arc::clone(&self.safe_inner),
            generation,
            started_at,
        )));

        let rendered = inner.render();
        drop(inner);

        tracing::debug!(message = "spinner started", ?timer_id);
        rendered.map_err(SpinnerError::from)?;
        Ok(Some(timer_id))
    }

    /// Stop animating and erase the frame. Every pending foreign write is flushed, the
    /// cursor is shown again, and the input device is restored. Does nothing if the
    /// spinner isn't spinning and has nothing on screen.
    ///
    /// No redraw or deadline flush happens after this returns.
    ///
    /// # Errors
    ///
    /// The first error of the teardown. The remaining steps still run.
    pub fn stop(&mut self) -> miette::Result<()> {
        let mut inner = lock_recovering(&self.safe_inner);

        let was_spinning = inner.is_spinning();
        if !was_spinning && inner.engine.last_rows_drawn == 0 {
            return Ok(());
        }

        let mut first_error = FirstError::default();

        inner.lifecycle.cancel_timers();
        if was_spinning {
            inner.lifecycle.state = LifecycleState::Stopped;
        }
        first_error.keep_io(inner.clear().map(drop));
        first_error.keep_io(inner.flush_all_foreign());
        inner.intercept.partial_line_on_screen = false;
        inner.intercept.is_installed = false;

        if was_spinning && self.hide_cursor && inner.can_move_cursor() {
            first_error.keep_io(write_command(&inner.stream, Show));
        }
        drop(inner);

        if self.is_discarding_stdin {
            if let Some(discarder) = self.input_discarder.as_mut() {
                first_error.keep(discarder.stop());
            }
            self.is_discarding_stdin = false;
        }

        tracing::debug!(message = "spinner stopped", was_spinning);
        first_error.into_result()
    }

    /// Stop, then write one final line that is never cleared:
    /// `<symbol> <prefix> <text> <suffix> <elapsed>\n`.
    ///
    /// # Errors
    ///
    /// See [`Self::stop()`], or the stream fails to write.
    pub fn stop_and_persist(&mut self, options: PersistOptions) -> miette::Result<()> {
        if self.lock().is_silent {
            return Ok(());
        }

        self.stop()?;

        let mut inner = self.lock();
        let symbol = options.symbol.unwrap_or_else(|| " ".to_string());
        let text = options
            .text
            .unwrap_or_else(|| inner.render_state.text.clone());
        let prefix_text = options
            .prefix_text
            .unwrap_or_else(|| inner.render_state.prefix_text.clone());
        let suffix_text = options
            .suffix_text
            .unwrap_or_else(|| inner.render_state.suffix_text.clone());

        let body = inner
            .render_state
            .compose_persisted(&prefix_text, &text, &suffix_text);
        let line = match (symbol.is_empty(), body.is_empty()) {
            (true, _) => format!("{body}\n"),
            (false, true) => format!("{symbol}\n"),
            (false, false) => format!("{symbol} {body}\n"),
        };

        inner.lifecycle.state = LifecycleState::Persisted;
        let written = inner.write_direct(line.as_bytes());
        drop(inner);

        tracing::debug!(message = "spinner persisted", ?line);
        written.map_err(SpinnerError::from)?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`Self::stop_and_persist()`].
    pub fn succeed(&mut self, text: Option<&str>) -> miette::Result<()> {
        self.persist_outcome(OutcomeSymbol::Success, text)
    }

    /// # Errors
    ///
    /// See [`Self::stop_and_persist()`].
    pub fn fail(&mut self, text: Option<&str>) -> miette::Result<()> {
        self.persist_outcome(OutcomeSymbol::Failure, text)
    }

    /// # Errors
    ///
    /// See [`Self::stop_and_persist()`].
    pub fn warn(&mut self, text: Option<&str>) -> miette::Result<()> {
        self.persist_outcome(OutcomeSymbol::Warning, text)
    }

    /// # Errors
    ///
    /// See [`Self::stop_and_persist()`].
    pub fn info(&mut self, text: Option<&str>) -> miette::Result<()> {
        self.persist_outcome(OutcomeSymbol::Info, text)
    }

    fn persist_outcome(
        &mut self,
        outcome: OutcomeSymbol,
        text: Option<&str>,
    ) -> miette::Result<()> {
        self.stop_and_persist(PersistOptions {
            symbol: Some(outcome.styled()),
            text: text.map(ToString::to_string),
            ..Default::default()
        })
    }

    /// Erase the current frame.
    ///
    /// # Errors
    ///
    /// The stream fails to write.
    pub fn clear(&self) -> miette::Result<()> {
        self.lock().clear().map_err(SpinnerError::from)?;
        Ok(())
    }

    /// Draw the next frame now, over the current one.
    ///
    /// # Errors
    ///
    /// The stream fails to write.
    pub fn render(&self) -> miette::Result<()> {
        self.lock().render().map_err(SpinnerError::from)?;
        Ok(())
    }

    /// Compose the next frame without drawing it. The animation still advances.
    #[must_use]
    pub fn frame(&self) -> String { self.lock().render_state.compose() }

    /// [`InterceptWriter`] for the spinner's own stream.
    #[must_use]
    pub fn writer(&self) -> InterceptWriter {
        InterceptWriter::new(Arc::clone(&self.safe_inner), ChannelId::SPINNER_STREAM)
    }

    /// [`InterceptWriter`] for another channel, eg: `stdout` while the spinner draws on
    /// `stderr`. Writes to it also clear and redraw the frame. Every `device` gets a
    /// channel that lives as long as the spinner, see [`InterceptState::channel_for`].
    #[must_use]
    pub fn intercept(&self, device: &OutputDevice) -> InterceptWriter {
        let channel = self.lock().intercept.channel_for(device);
        InterceptWriter::new(Arc::clone(&self.safe_inner), channel)
    }
}

mod accessors {
    use super::{Duration, FrameSetSpec, Spinner, SpinnerColor, SpinnerError,
                TextSource, TimerId, validate_indent, validate_interval};

    impl Spinner {
        pub fn set_text(&mut self, text: impl Into<String>) {
            self.lock().render_state.text = text.into();
        }

        #[must_use]
        pub fn text(&self) -> String { self.lock().render_state.text.clone() }

        pub fn set_prefix_text(&mut self, prefix_text: impl Into<TextSource>) {
            self.lock().render_state.prefix_text = prefix_text.into();
        }

        pub fn set_suffix_text(&mut self, suffix_text: impl Into<TextSource>) {
            self.lock().render_state.suffix_text = suffix_text.into();
        }

        pub fn set_color(&mut self, color: SpinnerColor) {
            self.lock().render_state.color = color;
        }

        #[must_use]
        pub fn color(&self) -> SpinnerColor { self.lock().render_state.color }

        /// # Errors
        ///
        /// [`SpinnerError::InvalidIndent`] if negative. The indent is left unchanged.
        pub fn set_indent(&mut self, indent: i64) -> Result<(), SpinnerError> {
            self.lock().render_state.indent = validate_indent(indent)?;
            Ok(())
        }

        #[must_use]
        pub fn indent(&self) -> u16 { self.lock().render_state.indent }

        /// Replace the frame set. The animation restarts at its first glyph, and the
        /// interval follows the new frame set unless it was overridden.
        ///
        /// # Errors
        ///
        /// [`SpinnerError::UnknownFrameSet`] for an unknown name.
        pub fn set_spinner(
            &mut self,
            spinner: impl Into<FrameSetSpec>,
        ) -> Result<(), SpinnerError> {
            let frame_set = spinner.into().resolve()?;
            self.lock().render_state.set_frame_set(frame_set);
            Ok(())
        }

        /// Override the interval of the frame set, or go back to it with [None].
        ///
        /// # Errors
        ///
        /// [`SpinnerError::InvalidInterval`] if zero.
        pub fn set_interval(&mut self, interval: Option<Duration>) -> Result<(), SpinnerError> {
            let interval = interval.map(validate_interval).transpose()?;
            self.lock().render_state.interval_override = interval;
            Ok(())
        }

        #[must_use]
        pub fn interval(&self) -> Duration { self.lock().render_state.interval() }

        pub fn set_is_enabled(&mut self, is_enabled: bool) {
            self.lock().is_enabled = is_enabled;
        }

        #[must_use]
        pub fn is_enabled(&self) -> bool { self.lock().is_enabled }

        pub fn set_is_silent(&mut self, is_silent: bool) { self.lock().is_silent = is_silent; }

        #[must_use]
        pub fn is_silent(&self) -> bool { self.lock().is_silent }

        #[must_use]
        pub fn is_spinning(&self) -> bool { self.lock().is_spinning() }

        /// [None] before the first frame is composed.
        #[must_use]
        pub fn frame_index(&self) -> Option<usize> { self.lock().render_state.frame_index() }

        /// Rows the next clear will erase.
        #[must_use]
        pub fn last_rows_drawn(&self) -> usize { self.lock().engine.last_rows_drawn }

        #[must_use]
        pub fn timer_id(&self) -> Option<TimerId> { self.lock().lifecycle.timer_id }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        let is_spinning = self.lock().is_spinning();
        if is_spinning && let Err(error) = self.stop() {
            tracing::warn!(message = "spinner failed to stop on drop", ?error);
        }
    }
}

/// Redraw every interval, counted from `started_at`, until the generation changes (stop,
/// or a restart). The interval is read again before each sleep, so a new frame set or
/// override takes effect on the next tick.
async fn redraw_until_cancelled(
    safe_inner: SafeSpinnerInner,
    generation: u64,
    started_at: Instant,
) {
    let mut last_tick = started_at;
    loop {
        let interval = {
            let inner = lock_recovering(&safe_inner);
            if inner.lifecycle.generation != generation {
                return;
            }
            inner.render_state.interval()
        };

        let next_tick = last_tick + interval;
        tokio::time::sleep_until(next_tick).await;
        // Missed ticks are skipped, not drawn in a burst.
        last_tick = match Instant::now().checked_sub(interval) {
            Some(one_interval_ago) => next_tick.max(one_interval_ago),
            None => next_tick,
        };

        let result = {
            let mut inner = lock_recovering(&safe_inner);
            if inner.lifecycle.generation != generation {
                return;
            }
            inner.render()
        };

        if let Err(error) = result {
            tracing::warn!(message = "spinner redraw failed", ?error);
        }
    }
}

fn write_command(device: &OutputDevice, command: impl crossterm::Command) -> io::Result<()> {
    let mut device = device.lock();
    device.queue(command)?;
    device.flush()
}

/// Keeps the first error of a sequence of teardown steps that must all run.
#[derive(Default)]
struct FirstError(Option<miette::Report>);

impl FirstError {
    fn keep(&mut self, result: miette::Result<()>) {
        if let Err(error) = result
            && self.0.is_none()
        {
            self.0 = Some(error);
        }
    }

    fn keep_io(&mut self, result: io::Result<()>) {
        self.keep(result.map_err(|error| SpinnerError::from(error).into()));
    }

    fn into_result(self) -> miette::Result<()> {
        match self.0 {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{FixedTerminalSize, OutputDeviceExt, StdoutMock};

    fn new_spinner(text: &str) -> (Spinner, StdoutMock) {
        let (stream, stdout_mock) = OutputDevice::new_mock_terminal();
        let spinner = Spinner::try_new(SpinnerConfig {
            text: text.into(),
            stream,
            is_enabled: Some(true),
            discard_stdin: false,
            color: SpinnerColor::Disabled,
            terminal_size: Arc::new(FixedTerminalSize::new(Some(80), Some(24))),
            ..Default::default()
        })
        .unwrap();
        (spinner, stdout_mock)
    }

    #[test]
    fn test_first_error_keeps_first() {
        let mut first_error = FirstError::default();
        first_error.keep(Ok(()));
        first_error.keep_io(Err(io::Error::other("one")));
        first_error.keep_io(Err(io::Error::other("two")));
        let error = first_error.into_result().unwrap_err();
        assert!(error.to_string().contains("one"));
    }

    #[test]
    fn test_start_outside_runtime_is_an_error() {
        let (mut spinner, stdout_mock) = new_spinner("foo");
        let error = spinner.start(None).unwrap_err();
        assert!(error.to_string().contains("tokio runtime"));
        assert!(!spinner.is_spinning());
        assert!(stdout_mock.get_copy_of_buffer().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let (mut spinner, stdout_mock) = new_spinner("foo");
        spinner.start(None).unwrap();
        spinner.stop().unwrap();
        let after_first_stop = stdout_mock.get_copy_of_buffer();

        spinner.stop().unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer(), after_first_stop);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_issues_new_timer_id() {
        let (mut spinner, _) = new_spinner("foo");
        let first = spinner.start(None).unwrap();
        spinner.stop().unwrap();
        let second = spinner.start(None).unwrap();
        assert!(first.is_some());
        assert!(second.is_some());
        assert_ne!(first, second);
        assert_eq!(spinner.timer_id(), second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops() {
        let (mut spinner, stdout_mock) = new_spinner("foo");
        spinner.start(None).unwrap();
        drop(spinner);
        // Cursor is shown again on the way out.
        assert!(stdout_mock.get_copy_of_buffer_as_string().ends_with("\x1b[?25h"));
    }
}
