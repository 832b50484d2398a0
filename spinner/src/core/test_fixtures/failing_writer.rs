// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{self, Write},
          sync::{Arc,
                 atomic::{AtomicBool, Ordering}}};

use crate::StdoutMock;

/// A writer that records into a [`StdoutMock`] until it is told to fail, after which
/// every write and flush returns an [`io::Error`]. Flip it back with
/// [`FailingWriter::set_failing`] to check that a component recovers after a failed
/// write.
#[derive(Clone, Debug, Default)]
pub struct FailingWriter {
    pub stdout_mock: StdoutMock,
    pub is_failing: Arc<AtomicBool>,
}

impl FailingWriter {
    pub fn set_failing(&self, is_failing: bool) {
        self.is_failing.store(is_failing, Ordering::SeqCst);
    }

    fn check(&self) -> io::Result<()> {
        if self.is_failing.load(Ordering::SeqCst) {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream closed"))
        } else {
            Ok(())
        }
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.check()?;
        self.stdout_mock.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.check()?;
        self.stdout_mock.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failing_writer_toggles() {
        let mut writer = FailingWriter::default();
        writer.write_all(b"ok").unwrap();

        writer.set_failing(true);
        assert!(writer.write_all(b"nope").is_err());

        writer.set_failing(false);
        writer.write_all(b"!").unwrap();
        assert_eq!(writer.stdout_mock.get_copy_of_buffer_as_string(), "ok!");
    }
}
