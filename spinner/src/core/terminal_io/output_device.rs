// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          io::IsTerminal,
          sync::{Arc, LazyLock}};

use crate::{SafeRawTerminal, SendRawTerminal, StdMutex, lock_recovering};

/// Process wide `stdout`, so every [`OutputDevice::new_stdout`] is the same channel.
static STDOUT: LazyLock<SafeRawTerminal> =
    LazyLock::new(|| -> SafeRawTerminal { Arc::new(StdMutex::new(std::io::stdout())) });

/// Process wide `stderr`, so every [`OutputDevice::new_stderr`] is the same channel.
static STDERR: LazyLock<SafeRawTerminal> =
    LazyLock::new(|| -> SafeRawTerminal { Arc::new(StdMutex::new(std::io::stderr())) });

pub type LockedOutputDevice<'a> = &'a mut dyn std::io::Write;

/// Macro to simplify locking and getting a mutable reference to the output device.
/// Don't call this again in the same scope, it will deadlock! A safe approach is
/// to use this macro in a separate block scope.
///
/// Usage example:
/// ```
/// use r3bl_spinner::{lock_output_device_as_mut, OutputDevice, LockedOutputDevice};
/// let device = OutputDevice::new_stdout();
/// { // Start a new block scope to avoid deadlock.
///     let mut_ref: LockedOutputDevice<'_> = lock_output_device_as_mut!(device);
///     let _ = mut_ref.write_all(b"Hello, world!\n");
/// } // The lock is released here.
/// ```
#[macro_export]
macro_rules! lock_output_device_as_mut {
    ($device:expr) => {
        &mut *$device.lock()
    };
}

/// The stream a spinner draws on, or any other channel whose writes get intercepted.
/// This is the injectable writer capability: the spinner never touches process wide
/// state, it only writes to the [`OutputDevice`] it is given.
///
/// - It is safe to clone. Clones share the same underlying resource, and two devices
///   are the same channel if [`Self::is_same_resource`] returns true. All `stdout`
///   devices share one resource, and so do all `stderr` devices. Each mock is its own
///   resource.
/// - [`Self::is_terminal`] is captured once at construction. It decides whether the
///   clear / redraw engine is allowed to move the cursor around on this device.
/// - To write to it, see [`Self::lock()`] or the [`lock_output_device_as_mut`] macro.
#[derive(Clone)]
pub struct OutputDevice {
    pub resource: SafeRawTerminal,
    pub is_mock: bool,
    pub is_terminal: bool,
}

impl Debug for OutputDevice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputDevice")
            .field("is_mock", &self.is_mock)
            .field("is_terminal", &self.is_terminal)
            .finish_non_exhaustive()
    }
}

impl Default for OutputDevice {
    /// Spinners draw on `stderr` by default, so `stdout` stays clean for pipes.
    fn default() -> Self { Self::new_stderr() }
}

impl OutputDevice {
    #[must_use]
    pub fn new_stdout() -> Self {
        Self {
            is_terminal: std::io::stdout().is_terminal(),
            resource: Arc::clone(&STDOUT),
            is_mock: false,
        }
    }

    #[must_use]
    pub fn new_stderr() -> Self {
        Self {
            is_terminal: std::io::stderr().is_terminal(),
            resource: Arc::clone(&STDERR),
            is_mock: false,
        }
    }

    /// Locks the output device for writing. A poisoned lock is recovered, since a
    /// writer holds no invariants across calls.
    ///
    /// ```
    /// use r3bl_spinner::{OutputDevice, LockedOutputDevice};
    ///
    /// let device = OutputDevice::new_stdout();
    /// let mut_ref: LockedOutputDevice<'_> = &mut *device.lock();
    /// let _ = mut_ref.write_all(b"Hello, world!\n");
    /// ```
    pub fn lock(&self) -> std::sync::MutexGuard<'_, SendRawTerminal> {
        lock_recovering(&self.resource)
    }

    /// Returns true if both devices write to the same underlying resource.
    #[must_use]
    pub fn is_same_resource(&self, other: &OutputDevice) -> bool {
        Arc::ptr_eq(&self.resource, &other.resource)
    }
}
