// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! `tracing` setup for programs that show a spinner. Pick
//! [`DisplayPreference::SpinnerWriter`] to route log output through the spinner's
//! interception layer, so log lines show up above the spinner instead of being drawn
//! over by it.

// Attach sources.
pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use rolling_file_appender_impl::*;
pub use tracing_config::*;
pub use tracing_init::*;
