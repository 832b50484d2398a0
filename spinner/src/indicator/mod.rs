// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # Animated single line status indicator
//!
//! A [`Spinner`] draws one status line (an animated glyph, plus caller supplied text) on
//! a terminal stream, and keeps it stable while:
//! - the terminal wraps long lines, or contains wide glyphs (CJK, emoji),
//! - the content is taller than the terminal (it is truncated with a notice),
//! - other code writes to the same stream, eg: `tracing` logs routed through an
//!   [`InterceptWriter`].
//!
//! A tick flows through these parts (see [`spinner_impl`]):
//!
//! ```text
//! ticker ─▶ frame composer ─▶ geometry ─▶ overflow guard ─▶ render engine ─▶ stream
//!                                                               ▲
//!                                    InterceptWriter (foreign writes) ─┘
//! ```
//!
//! Every redraw cycle (clear, then write) and every foreign flush runs while holding the
//! single state lock, so cycles never interleave.

// Attach sources.
pub mod spinner;
pub mod spinner_config;
pub mod spinner_error;
pub mod spinner_impl;

// Re-export.
pub use spinner::*;
pub use spinner_config::*;
pub use spinner_error::*;
pub use spinner_impl::*;
