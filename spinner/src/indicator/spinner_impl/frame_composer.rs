// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::Duration;

use tokio::time::Instant;

use crate::{ElapsedTime, FrameSet, SpinnerColor, TextSource};

/// Everything that goes into a single frame. One per spinner.
///
/// [`Self::frame_index`] is [None] before the first composition (or the first frame set
/// change), and afterwards always a valid index into the *current* frame set.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub text: String,
    pub prefix_text: TextSource,
    pub suffix_text: TextSource,
    pub indent: u16,
    pub color: SpinnerColor,
    frame_set: FrameSet,
    /// Takes priority over the frame set's own interval.
    pub interval_override: Option<Duration>,
    frame_index: Option<usize>,
    pub show_elapsed_time: bool,
    pub start_time: Option<Instant>,
}

impl RenderState {
    #[must_use]
    pub fn new(frame_set: FrameSet) -> Self {
        Self {
            frame_set,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn frame_set(&self) -> &FrameSet { &self.frame_set }

    #[must_use]
    pub fn frame_index(&self) -> Option<usize> { self.frame_index }

    /// Replace the frame set, and restart the animation from its first glyph. The redraw
    /// interval follows the new frame set (unless overridden). Text sources are not
    /// evaluated.
    pub fn set_frame_set(&mut self, frame_set: FrameSet) {
        self.frame_set = frame_set;
        self.frame_index = Some(0);
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval_override
            .unwrap_or_else(|| self.frame_set.interval())
    }

    /// Eg: `(1.2s)`, when elapsed time is shown and the spinner has been started.
    #[must_use]
    pub fn elapsed_annotation(&self) -> Option<String> {
        if !self.show_elapsed_time {
            return None;
        }
        self.start_time
            .map(|start_time| ElapsedTime::from(start_time.elapsed()).annotation())
    }

    /// Build the literal text of the current frame, then advance to the next glyph.
    ///
    /// Layout: `[glyph] [prefix] [text] [suffix] [elapsed]`, where absent segments are
    /// skipped so there's exactly one space between the segments that are present.
    /// Each [`TextSource::Computed`] is called exactly once.
    pub fn compose(&mut self) -> String {
        let index = self.frame_index.unwrap_or(0) % self.frame_set.len();
        let glyph = self
            .frame_set
            .frames()
            .get(index)
            .map(|it| self.color.paint(it));

        let text = Some(self.text.clone()).filter(|it| !it.is_empty());
        let output = join_segments([
            glyph,
            self.prefix_text.evaluate(),
            text,
            self.suffix_text.evaluate(),
            self.elapsed_annotation(),
        ]);

        self.frame_index = Some((index + 1) % self.frame_set.len());
        output
    }

    /// Text of a persisted line, after the symbol: `[prefix] [text] [suffix] [elapsed]`.
    #[must_use]
    pub fn compose_persisted(
        &self,
        prefix_text: &TextSource,
        text: &str,
        suffix_text: &TextSource,
    ) -> String {
        let text = Some(text.to_string()).filter(|it| !it.is_empty());
        join_segments([
            prefix_text.evaluate(),
            text,
            suffix_text.evaluate(),
            self.elapsed_annotation(),
        ])
    }
}

/// Join the present segments with a single space.
pub fn join_segments<const N: usize>(segments: [Option<String>; N]) -> String {
    segments
        .into_iter()
        .flatten()
        .filter(|it| !it.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
