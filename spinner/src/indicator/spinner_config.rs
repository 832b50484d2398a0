// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          sync::Arc,
          time::Duration};

use crate::{FrameSetSpec, LiveTerminalSize, OutputDevice, SpinnerColor, SpinnerError,
            TerminalSizeSource, TextSource};

/// Every option a [`crate::Spinner`] recognizes, with its default. Validated once in
/// [`crate::Spinner::try_new()`].
///
/// ```
/// use r3bl_spinner::{FrameSetName, SpinnerConfig};
///
/// let config = SpinnerConfig {
///     text: "Loading".into(),
///     spinner: FrameSetName::Line.into(),
///     indent: 2,
///     ..Default::default()
/// };
/// assert!(config.is_enabled.is_none());
/// ```
#[derive(Clone)]
pub struct SpinnerConfig {
    pub text: String,
    pub prefix_text: TextSource,
    pub suffix_text: TextSource,
    pub color: SpinnerColor,
    /// Defaults to the `dots` frame set.
    pub spinner: FrameSetSpec,
    /// Overrides the interval of the frame set.
    pub interval: Option<Duration>,
    /// Defaults to `stderr`.
    pub stream: OutputDevice,
    /// [None] means: enabled only when the stream is a terminal, and not running in CI.
    pub is_enabled: Option<bool>,
    /// Nothing is written at all, even if enabled.
    pub is_silent: bool,
    /// Must be `>= 0`.
    pub indent: i64,
    pub discard_stdin: bool,
    pub hide_cursor: bool,
    pub show_elapsed_time: bool,
    pub terminal_size: Arc<dyn TerminalSizeSource>,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            prefix_text: TextSource::default(),
            suffix_text: TextSource::default(),
            color: SpinnerColor::default(),
            spinner: FrameSetSpec::default(),
            interval: None,
            stream: OutputDevice::default(),
            is_enabled: None,
            is_silent: false,
            indent: 0,
            discard_stdin: true,
            hide_cursor: true,
            show_elapsed_time: false,
            terminal_size: Arc::new(LiveTerminalSize),
        }
    }
}

impl Debug for SpinnerConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpinnerConfig")
            .field("text", &self.text)
            .field("prefix_text", &self.prefix_text)
            .field("suffix_text", &self.suffix_text)
            .field("color", &self.color)
            .field("spinner", &self.spinner)
            .field("interval", &self.interval)
            .field("is_enabled", &self.is_enabled)
            .field("is_silent", &self.is_silent)
            .field("indent", &self.indent)
            .field("discard_stdin", &self.discard_stdin)
            .field("hide_cursor", &self.hide_cursor)
            .field("show_elapsed_time", &self.show_elapsed_time)
            .finish_non_exhaustive()
    }
}

/// # Errors
///
/// [`SpinnerError::InvalidIndent`] if `indent` is negative, or wider than any terminal.
pub fn validate_indent(indent: i64) -> Result<u16, SpinnerError> {
    u16::try_from(indent).map_err(|_| SpinnerError::InvalidIndent { indent })
}

/// # Errors
///
/// [`SpinnerError::InvalidInterval`] if `interval` is zero.
pub fn validate_interval(interval: Duration) -> Result<Duration, SpinnerError> {
    if interval.is_zero() {
        return Err(SpinnerError::InvalidInterval {
            interval_ms: interval.as_millis(),
        });
    }
    Ok(interval)
}

/// The final line written by [`crate::Spinner::stop_and_persist()`]. Every [None] field
/// falls back to the spinner's current value, except `symbol` which falls back to a
/// single space.
#[derive(Debug, Clone, Default)]
pub struct PersistOptions {
    pub symbol: Option<String>,
    pub text: Option<String>,
    pub prefix_text: Option<TextSource>,
    pub suffix_text: Option<TextSource>,
}

impl PersistOptions {
    #[must_use]
    pub fn new(symbol: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            symbol: Some(symbol.into()),
            text: Some(text.into()),
            ..Default::default()
        }
    }
}
