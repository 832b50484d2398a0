// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::Diagnostic;
use std::io;
use thiserror::Error;

/// Errors raised by a [`crate::Spinner`].
///
/// Configuration errors are raised synchronously at construction, or at the setter that
/// was given the bad value, before anything is written to the stream. They name the
/// offending option. Stream errors are never swallowed: they propagate to whoever
/// triggered the write (a lifecycle call, a render, or a foreign write).
#[derive(Debug, Error, Diagnostic)]
pub enum SpinnerError {
    #[error("option `indent` must be a non-negative integer, got {indent}")]
    #[diagnostic(
        code(r3bl_spinner::config::invalid_indent),
        help("Use 0 to draw the spinner at the first column.")
    )]
    InvalidIndent { indent: i64 },

    #[error("option `spinner` must have a non-empty list of frames")]
    #[diagnostic(
        code(r3bl_spinner::config::empty_frame_set),
        help("Provide at least one glyph, eg: `FrameSet::try_new([\"-\"], interval)`.")
    )]
    EmptyFrameSet,

    #[error("option `interval` must be a positive number of milliseconds, got {interval_ms}")]
    #[diagnostic(code(r3bl_spinner::config::invalid_interval))]
    InvalidInterval { interval_ms: u128 },

    #[error("option `spinner` names an unknown frame set: `{name}`")]
    #[diagnostic(
        code(r3bl_spinner::config::unknown_frame_set),
        help("Known frame sets: {known}")
    )]
    UnknownFrameSet { name: String, known: String },

    #[error("the spinner can only animate inside a tokio runtime")]
    #[diagnostic(
        code(r3bl_spinner::runtime::missing),
        help("Call `start()` from a task running on a tokio runtime, eg: `#[tokio::main]`.")
    )]
    NoAsyncRuntime,

    /// The underlying stream failed to write or flush.
    #[error(transparent)]
    #[diagnostic(code(r3bl_spinner::io))]
    IO(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_option() {
        let error = SpinnerError::InvalidIndent { indent: -1 };
        assert!(error.to_string().contains("indent"));

        let error = SpinnerError::EmptyFrameSet;
        assert!(error.to_string().contains("spinner"));

        let error = SpinnerError::UnknownFrameSet {
            name: "nope".into(),
            known: "dots".into(),
        };
        assert!(error.to_string().contains("nope"));
    }
}
