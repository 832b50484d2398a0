// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod frame_composer;
pub mod geometry;
pub mod input_discard;
pub mod intercept;
pub mod overflow_guard;
pub mod render_engine;
pub mod spinner_constants;
pub mod spinner_state;
pub mod spinner_style;

// Re-export.
pub use frame_composer::*;
pub use geometry::*;
pub use input_discard::*;
pub use intercept::*;
pub use overflow_guard::*;
pub use render_engine::*;
pub use spinner_constants::*;
pub use spinner_state::*;
pub use spinner_style::*;
