// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Test doubles for the injectable seams of the spinner (the output stream, the terminal
//! size source, and the input device). These are public so that integration tests, and
//! downstream crates, can drive a spinner deterministically.

// Attach sources.
pub mod failing_writer;
pub mod fixed_terminal_size;
pub mod mock_input_discard;
pub mod output_device_ext;
pub mod stdout_mock;

// Re-export.
pub use failing_writer::*;
pub use fixed_terminal_size::*;
pub use mock_input_discard::*;
pub use output_device_ext::*;
pub use stdout_mock::*;
