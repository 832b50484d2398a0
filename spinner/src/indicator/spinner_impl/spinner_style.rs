// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          str::FromStr,
          sync::Arc,
          time::Duration};

use crossterm::style::{Color, Stylize, style};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{ARC_FRAMES, ARC_INTERVAL, BLOCK_DOTS, BLOCK_INTERVAL, BRAILLE_DOTS,
            BRAILLE_INTERVAL, DOTS_FRAMES, DOTS_INTERVAL, FAILURE_GLYPH, INFO_GLYPH,
            LINE_FRAMES, LINE_INTERVAL, SUCCESS_GLYPH, SpinnerError, WARNING_GLYPH};

/// An ordered, non-empty list of glyphs cycled to animate the spinner, plus the redraw
/// interval that goes with them. The invariants are checked once in [`Self::try_new`],
/// so a [`FrameSet`] that exists is always valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSet {
    frames: Vec<String>,
    interval: Duration,
}

impl FrameSet {
    /// # Errors
    ///
    /// - [`SpinnerError::EmptyFrameSet`] if `frames` is empty.
    /// - [`SpinnerError::InvalidInterval`] if `interval` is zero.
    pub fn try_new<I, S>(frames: I, interval: Duration) -> Result<Self, SpinnerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let frames: Vec<String> = frames.into_iter().map(Into::into).collect();
        if frames.is_empty() {
            return Err(SpinnerError::EmptyFrameSet);
        }
        if interval.is_zero() {
            return Err(SpinnerError::InvalidInterval {
                interval_ms: interval.as_millis(),
            });
        }
        Ok(Self { frames, interval })
    }

    /// Look up one of the built in frame sets by name, eg: `"dots"`.
    ///
    /// # Errors
    ///
    /// [`SpinnerError::UnknownFrameSet`] if there's no frame set with this name.
    pub fn named(name: &str) -> Result<Self, SpinnerError> {
        FrameSetName::from_str(name)
            .map(FrameSet::from)
            .map_err(|_| SpinnerError::UnknownFrameSet {
                name: name.to_string(),
                known: FrameSetName::iter()
                    .map(|it| it.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    #[must_use]
    pub fn frames(&self) -> &[String] { &self.frames }

    #[must_use]
    pub fn interval(&self) -> Duration { self.interval }

    #[must_use]
    pub fn len(&self) -> usize { self.frames.len() }

    /// Always false, kept for the `len_without_is_empty` lint.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.frames.is_empty() }
}

impl Default for FrameSet {
    fn default() -> Self { FrameSetName::default().into() }
}

/// The built in frame sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum FrameSetName {
    #[default]
    Dots,
    Line,
    Braille,
    Block,
    Arc,
}

impl From<FrameSetName> for FrameSet {
    fn from(name: FrameSetName) -> Self {
        let (frames, interval): (&[&str], Duration) = match name {
            FrameSetName::Dots => (&DOTS_FRAMES[..], DOTS_INTERVAL),
            FrameSetName::Line => (&LINE_FRAMES[..], LINE_INTERVAL),
            FrameSetName::Braille => (&BRAILLE_DOTS[..], BRAILLE_INTERVAL),
            FrameSetName::Block => (&BLOCK_DOTS[..], BLOCK_INTERVAL),
            FrameSetName::Arc => (&ARC_FRAMES[..], ARC_INTERVAL),
        };
        Self {
            frames: frames.iter().map(ToString::to_string).collect(),
            interval,
        }
    }
}

/// How the `spinner` option is given: by name, or as an explicit frame set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSetSpec {
    Named(String),
    Custom(FrameSet),
}

impl FrameSetSpec {
    /// # Errors
    ///
    /// [`SpinnerError::UnknownFrameSet`] if a name doesn't match a built in frame set.
    pub fn resolve(&self) -> Result<FrameSet, SpinnerError> {
        match self {
            FrameSetSpec::Named(name) => FrameSet::named(name),
            FrameSetSpec::Custom(frame_set) => Ok(frame_set.clone()),
        }
    }
}

impl Default for FrameSetSpec {
    fn default() -> Self { FrameSetSpec::Custom(FrameSet::default()) }
}

impl From<FrameSetName> for FrameSetSpec {
    fn from(name: FrameSetName) -> Self { FrameSetSpec::Custom(name.into()) }
}

impl From<FrameSet> for FrameSetSpec {
    fn from(frame_set: FrameSet) -> Self { FrameSetSpec::Custom(frame_set) }
}

impl From<&str> for FrameSetSpec {
    fn from(name: &str) -> Self { FrameSetSpec::Named(name.to_string()) }
}

/// Semantic color of the spinner glyph. [`SpinnerColor::Disabled`] emits the glyph
/// unstyled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SpinnerColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    #[default]
    Cyan,
    White,
    Gray,
    Disabled,
}

impl SpinnerColor {
    #[must_use]
    pub fn paint(self, text: &str) -> String {
        let color = match self {
            SpinnerColor::Disabled => return text.to_string(),
            SpinnerColor::Black => Color::Black,
            SpinnerColor::Red => Color::Red,
            SpinnerColor::Green => Color::Green,
            SpinnerColor::Yellow => Color::Yellow,
            SpinnerColor::Blue => Color::Blue,
            SpinnerColor::Magenta => Color::Magenta,
            SpinnerColor::Cyan => Color::Cyan,
            SpinnerColor::White => Color::White,
            SpinnerColor::Gray => Color::DarkGrey,
        };
        style(text).with(color).to_string()
    }
}

/// Glyphs for the final, persisted line of a spinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeSymbol {
    Success,
    Failure,
    Warning,
    Info,
}

impl OutcomeSymbol {
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            OutcomeSymbol::Success => SUCCESS_GLYPH,
            OutcomeSymbol::Failure => FAILURE_GLYPH,
            OutcomeSymbol::Warning => WARNING_GLYPH,
            OutcomeSymbol::Info => INFO_GLYPH,
        }
    }

    #[must_use]
    pub fn color(self) -> SpinnerColor {
        match self {
            OutcomeSymbol::Success => SpinnerColor::Green,
            OutcomeSymbol::Failure => SpinnerColor::Red,
            OutcomeSymbol::Warning => SpinnerColor::Yellow,
            OutcomeSymbol::Info => SpinnerColor::Blue,
        }
    }

    #[must_use]
    pub fn styled(self) -> String { self.color().paint(self.glyph()) }
}

/// Type alias for the closure behind [`TextSource::Computed`].
pub type ComputedText = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Text that is either fixed, or computed each time a frame is composed.
///
/// A [`TextSource::Computed`] closure is only ever invoked while composing a frame (or
/// the persisted line), exactly once per composition, and never when the value is
/// assigned. Returning [None] means "no text", and the segment is left out.
///
/// The closure runs while the spinner's state is locked. It must not write through an
/// [`crate::InterceptWriter`] of the same spinner (directly, or by emitting `tracing`
/// events routed to one), or it will deadlock.
#[derive(Clone)]
pub enum TextSource {
    Literal(String),
    Computed(ComputedText),
}

impl TextSource {
    pub fn computed(it: impl Fn() -> Option<String> + Send + Sync + 'static) -> Self {
        TextSource::Computed(Arc::new(it))
    }

    /// Returns [None] when there is nothing to show: an empty literal, or a closure that
    /// returned [None] or an empty string.
    #[must_use]
    pub fn evaluate(&self) -> Option<String> {
        let it = match self {
            TextSource::Literal(text) => Some(text.clone()),
            TextSource::Computed(compute) => compute(),
        };
        it.filter(|text| !text.is_empty())
    }
}

impl Default for TextSource {
    fn default() -> Self { TextSource::Literal(String::new()) }
}

impl Debug for TextSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TextSource::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            TextSource::Computed(_) => write!(f, "Computed(..)"),
        }
    }
}

impl From<&str> for TextSource {
    fn from(text: &str) -> Self { TextSource::Literal(text.to_string()) }
}

impl From<String> for TextSource {
    fn from(text: String) -> Self { TextSource::Literal(text) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_frame_set_rejects_empty_frames() {
        let result = FrameSet::try_new(Vec::<String>::new(), Duration::from_millis(10));
        assert!(matches!(result, Err(SpinnerError::EmptyFrameSet)));
    }

    #[test]
    fn test_frame_set_rejects_zero_interval() {
        let result = FrameSet::try_new(["a"], Duration::ZERO);
        assert!(matches!(result, Err(SpinnerError::InvalidInterval { .. })));
    }

    #[test]
    fn test_named_lookup() {
        let frame_set = FrameSet::named("line").unwrap();
        assert_eq!(frame_set.frames(), ["-", "\\", "|", "/"]);
        assert_eq!(frame_set.interval(), LINE_INTERVAL);

        let Err(SpinnerError::UnknownFrameSet { name, known }) = FrameSet::named("zzz")
        else {
            panic!("expected an unknown frame set error");
        };
        assert_eq!(name, "zzz");
        assert!(known.contains("dots"));
        assert!(known.contains("braille"));
    }

    #[test]
    fn test_paint_disabled_is_unstyled() {
        assert_eq!(SpinnerColor::Disabled.paint("⠋"), "⠋");
        let painted = SpinnerColor::Cyan.paint("⠋");
        assert_ne!(painted, "⠋");
        assert_eq!(strip_ansi_escapes::strip_str(&painted), "⠋");
    }

    #[test]
    fn test_text_source_evaluate() {
        assert_eq!(TextSource::from("").evaluate(), None);
        assert_eq!(TextSource::from("hi").evaluate(), Some("hi".to_string()));
        assert_eq!(TextSource::computed(|| None).evaluate(), None);
        assert_eq!(
            TextSource::computed(|| Some(String::new())).evaluate(),
            None
        );
    }

    #[test]
    fn test_computed_runs_only_on_evaluate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let source = TextSource::computed(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            Some("x".into())
        });
        let _clone = source.clone();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        source.evaluate();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
