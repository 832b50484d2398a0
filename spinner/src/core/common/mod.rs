// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod decl_macros;
pub mod elapsed_time;
pub mod lock_recovery;

// Re-export.
pub use elapsed_time::*;
pub use lock_recovery::*;
