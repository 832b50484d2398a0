// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words ansi cjk

//! # r3bl_spinner
//!
//! An animated, single line status indicator for terminal programs. It keeps its line
//! stable while the terminal wraps, while the content is taller than the viewport, and
//! while other code (eg: `tracing` logs) writes to the same stream.
//!
//! ```no_run
//! use r3bl_spinner::{Spinner, SpinnerConfig};
//!
//! #[tokio::main]
//! async fn main() -> miette::Result<()> {
//!     let mut spinner = Spinner::try_new(SpinnerConfig {
//!         text: "Downloading".into(),
//!         ..Default::default()
//!     })?;
//!     spinner.start(None)?;
//!     tokio::time::sleep(std::time::Duration::from_secs(2)).await;
//!     spinner.succeed(Some("Downloaded"))?;
//!     Ok(())
//! }
//! ```
//!
//! # Parts
//!
//! - [`Spinner`] owns the lifecycle (`start`, `stop`, `stop_and_persist`, and the
//!   `succeed`/`fail`/`warn`/`info` shortcuts).
//! - [`mod@geometry`] measures how many terminal rows a piece of content occupies, with
//!   ANSI codes ignored and wide glyphs counted as 2 cells.
//! - [`mod@overflow_guard`] truncates content taller than the viewport.
//! - [`RenderEngine`] erases exactly what the previous frame drew, then draws the next
//!   one inside a synchronized update.
//! - [`InterceptWriter`] lets foreign output interleave with the frame without
//!   corrupting it.
//! - [`StdinDiscarder`] keeps typed keys from being echoed over the frame.
//! - [`mod@log`] routes `tracing` output through an [`InterceptWriter`].
//!
//! # Testing
//!
//! [`mod@test_fixtures`] has in memory doubles for the output stream, the terminal
//! size, and the input device, so the whole lifecycle can be driven with a paused
//! `tokio` clock.

// Enforce strict error handling in production library code only. Tests and examples are
// allowed to use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules (re-exported below to provide clean public API).
pub mod core;
pub mod indicator;

// Re-export stable public API using glob imports for a flat API surface.
#[allow(ambiguous_glob_reexports)]
pub use core::*;
#[allow(ambiguous_glob_reexports)]
pub use indicator::*;
