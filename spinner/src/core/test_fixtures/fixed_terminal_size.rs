// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use crate::{StdMutex, TerminalGeometry, TerminalSizeSource, lock_recovering};

/// A [`TerminalSizeSource`] with a size set by the test. Clones share the size, so a
/// test can "resize the terminal" between two renders with [`Self::set`].
#[derive(Clone, Debug, Default)]
pub struct FixedTerminalSize {
    pub geometry: Arc<StdMutex<TerminalGeometry>>,
}

impl FixedTerminalSize {
    #[must_use]
    pub fn new(columns: Option<u16>, rows: Option<u16>) -> Self {
        Self {
            geometry: Arc::new(StdMutex::new(TerminalGeometry::new(columns, rows))),
        }
    }

    pub fn set(&self, columns: Option<u16>, rows: Option<u16>) {
        *lock_recovering(&self.geometry) = TerminalGeometry::new(columns, rows);
    }
}

impl TerminalSizeSource for FixedTerminalSize {
    fn geometry(&self) -> TerminalGeometry { *lock_recovering(&self.geometry) }
}
