// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::{InputDiscard, RawModeControl, StdMutex, lock_recovering};

/// In memory raw mode switch. Clones share the state, so a test can keep one clone to
/// look at after handing the other to a [`crate::StdinDiscarder`].
#[derive(Clone, Debug, Default)]
pub struct MockRawMode {
    pub is_raw: Arc<StdMutex<bool>>,
    /// Every value passed to [`RawModeControl::set_raw_mode`], in order.
    pub set_calls: Arc<StdMutex<Vec<bool>>>,
}

impl MockRawMode {
    #[must_use]
    pub fn new(is_raw: bool) -> Self {
        Self {
            is_raw: Arc::new(StdMutex::new(is_raw)),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn is_raw(&self) -> bool { *lock_recovering(&self.is_raw) }

    #[must_use]
    pub fn set_calls(&self) -> Vec<bool> { lock_recovering(&self.set_calls).clone() }
}

impl RawModeControl for MockRawMode {
    fn is_raw_mode_enabled(&self) -> miette::Result<bool> { Ok(self.is_raw()) }

    fn set_raw_mode(&mut self, is_enabled: bool) -> miette::Result<()> {
        *lock_recovering(&self.is_raw) = is_enabled;
        lock_recovering(&self.set_calls).push(is_enabled);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDiscardCall {
    Start,
    Stop,
}

/// Records [`InputDiscard`] calls instead of touching the terminal.
#[derive(Clone, Debug, Default)]
pub struct MockInputDiscard {
    pub calls: Arc<StdMutex<Vec<InputDiscardCall>>>,
}

impl MockInputDiscard {
    #[must_use]
    pub fn calls(&self) -> Vec<InputDiscardCall> { lock_recovering(&self.calls).clone() }
}

impl InputDiscard for MockInputDiscard {
    fn start(&mut self, _runtime: &Handle) -> miette::Result<()> {
        lock_recovering(&self.calls).push(InputDiscardCall::Start);
        Ok(())
    }

    fn stop(&mut self) -> miette::Result<()> {
        lock_recovering(&self.calls).push(InputDiscardCall::Stop);
        Ok(())
    }
}
