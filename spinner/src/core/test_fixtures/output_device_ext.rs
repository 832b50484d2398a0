// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{FailingWriter, OutputDevice, StdMutex, StdoutMock};
use std::sync::Arc;

pub trait OutputDeviceExt {
    /// A mock device that reports itself as *not* a terminal (like a pipe).
    fn new_mock() -> (OutputDevice, StdoutMock);

    /// A mock device that reports itself as a terminal, so the clear / redraw engine
    /// emits cursor movement into it.
    fn new_mock_terminal() -> (OutputDevice, StdoutMock);

    /// A terminal mock whose writes can be made to fail on demand.
    fn new_failing_mock_terminal() -> (OutputDevice, FailingWriter);
}

impl OutputDeviceExt for OutputDevice {
    fn new_mock() -> (OutputDevice, StdoutMock) {
        let stdout_mock = StdoutMock::default();
        let this = OutputDevice {
            resource: Arc::new(StdMutex::new(stdout_mock.clone())),
            is_mock: true,
            is_terminal: false,
        };
        (this, stdout_mock)
    }

    fn new_mock_terminal() -> (OutputDevice, StdoutMock) {
        let (mut this, stdout_mock) = Self::new_mock();
        this.is_terminal = true;
        (this, stdout_mock)
    }

    fn new_failing_mock_terminal() -> (OutputDevice, FailingWriter) {
        let failing_writer = FailingWriter::default();
        let this = OutputDevice {
            resource: Arc::new(StdMutex::new(failing_writer.clone())),
            is_mock: true,
            is_terminal: true,
        };
        (this, failing_writer)
    }
}

#[cfg(test)]
mod tests {
    use super::OutputDeviceExt;
    use crate::{LockedOutputDevice, OutputDevice, lock_output_device_as_mut};

    #[test]
    fn test_mock_output_device() {
        let (device, mock) = OutputDevice::new_mock();
        let mut_ref: LockedOutputDevice<'_> = lock_output_device_as_mut!(device);
        mut_ref.write_all(b"Hello, world!\n").ok();
        assert_eq!(
            mock.get_copy_of_buffer_as_string_strip_ansi(),
            "Hello, world!\n"
        );
    }

    #[test]
    fn test_mock_output_device_flags() {
        let (device, _) = OutputDevice::new_mock();
        assert!(device.is_mock);
        assert!(!device.is_terminal);

        let (device, _) = OutputDevice::new_mock_terminal();
        assert!(device.is_mock);
        assert!(device.is_terminal);
    }
}
