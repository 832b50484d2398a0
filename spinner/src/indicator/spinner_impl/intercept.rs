// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The output interception layer.
//!
//! Other code (eg: logging) that writes to the same terminal as an active spinner would
//! land in the middle of a frame, and the next clear would erase the wrong rows. So
//! foreign writes go through an [`InterceptWriter`] instead of the raw stream. While the
//! spinner is active each write is handled like this:
//!
//! 1. A chunk that ends in `\n` is flushed right away: the frame is cleared, the chunk is
//!    written verbatim, and the frame is redrawn below it.
//! 2. A chunk without a trailing `\n` is withheld in the channel's [`PendingWriteBuffer`]
//!    and a deadline (one render interval) is armed. A later chunk that completes the
//!    line flushes everything together. If the deadline fires first, the buffer is
//!    flushed as is.
//!
//! No bytes are ever added or dropped, and chunks are concatenated as bytes, so a UTF-8
//! sequence split across two writes comes out whole.
//!
//! When the spinner isn't active every [`InterceptWriter`] is a plain passthrough to its
//! channel. Installation and removal are paired in [`crate::Spinner::start()`] and
//! [`crate::Spinner::stop()`] (which also runs on drop), and stop flushes every pending
//! buffer unconditionally.
//!
//! The engine itself never goes through this layer. It writes to the stream directly,
//! while holding the state lock that every [`InterceptWriter`] must also acquire.

use std::{io::{self, Write},
          mem,
          sync::Arc};

use crossterm::{QueueableCommand, cursor::MoveToColumn};
use tokio::{task::JoinHandle, time::Instant};

use crate::{OutputDevice, SafeSpinnerInner, SpinnerInner, lock_recovering};

/// Index of an intercepted channel in [`InterceptState::channels`]. The spinner's own
/// stream is always [`ChannelId::SPINNER_STREAM`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub usize);

impl ChannelId {
    pub const SPINNER_STREAM: ChannelId = ChannelId(0);
}

/// Foreign output of one channel that has not been written yet.
///
/// ```text
/// Empty ──(chunk w/out \n)──▶ Buffering ──(chunk w/ \n, deadline, flush, stop)──▶ Flushing ─▶ Empty
///                               │    ▲
///                               └────┘ (chunk w/out \n: append, re-arm deadline)
/// ```
#[derive(Debug, Default)]
pub enum PendingWriteBuffer {
    #[default]
    Empty,
    Buffering {
        bytes: Vec<u8>,
        /// Matched by the deadline task, so a re-armed (or flushed) buffer ignores a
        /// stale deadline.
        generation: u64,
        deadline: Option<JoinHandle<()>>,
    },
    Flushing,
}

impl PendingWriteBuffer {
    #[must_use]
    pub fn is_empty(&self) -> bool { !matches!(self, PendingWriteBuffer::Buffering { .. }) }

    /// Move to [`PendingWriteBuffer::Flushing`], cancel the deadline, and hand back the
    /// withheld bytes.
    fn begin_flush(&mut self) -> Vec<u8> {
        match mem::replace(self, PendingWriteBuffer::Flushing) {
            PendingWriteBuffer::Buffering {
                bytes, deadline, ..
            } => {
                if let Some(deadline) = deadline {
                    deadline.abort();
                }
                bytes
            }
            PendingWriteBuffer::Empty | PendingWriteBuffer::Flushing => vec![],
        }
    }

    /// Append `chunk` to the withheld bytes, cancelling any armed deadline.
    fn append(&mut self, chunk: &[u8], generation: u64) {
        let mut bytes = self.begin_flush();
        bytes.extend_from_slice(chunk);
        *self = PendingWriteBuffer::Buffering {
            bytes,
            generation,
            deadline: None,
        };
    }

    fn is_armed_with(&self, expected: u64) -> bool {
        matches!(
            self,
            PendingWriteBuffer::Buffering { generation, .. } if *generation == expected
        )
    }
}

#[derive(Debug)]
pub struct InterceptedChannel {
    pub device: OutputDevice,
    pub pending: PendingWriteBuffer,
}

#[derive(Debug)]
pub struct InterceptState {
    pub channels: Vec<InterceptedChannel>,
    /// True between start and stop, while foreign writes must be coordinated with the
    /// engine.
    pub is_installed: bool,
    /// True while the last foreign flush left the cursor at the end of an unterminated
    /// line. Redraws are suspended until that line is completed (or the spinner stops),
    /// since drawing would splice the frame into someone else's output.
    pub partial_line_on_screen: bool,
    next_generation: u64,
}

impl InterceptState {
    #[must_use]
    pub fn new(spinner_stream: OutputDevice) -> Self {
        Self {
            channels: vec![InterceptedChannel {
                device: spinner_stream,
                pending: PendingWriteBuffer::Empty,
            }],
            is_installed: false,
            partial_line_on_screen: false,
            next_generation: 0,
        }
    }

    /// Get the channel for `device`, registering it if needed. Clones of the same
    /// [`OutputDevice`] share a channel, and so do all `stdout` (or `stderr`) devices.
    /// Channels are kept until the spinner is dropped, so reuse a mock device rather
    /// than making a new one per call.
    pub fn channel_for(&mut self, device: &OutputDevice) -> ChannelId {
        if let Some(index) = self
            .channels
            .iter()
            .position(|it| it.device.is_same_resource(device))
        {
            return ChannelId(index);
        }
        self.channels.push(InterceptedChannel {
            device: device.clone(),
            pending: PendingWriteBuffer::Empty,
        });
        ChannelId(self.channels.len() - 1)
    }

    #[must_use]
    pub fn device(&self, channel: ChannelId) -> Option<&OutputDevice> {
        self.channels.get(channel.0).map(|it| &it.device)
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.channels.iter().any(|it| !it.pending.is_empty())
    }

    fn next_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }
}

impl SpinnerInner {
    /// Flush the withheld bytes of `channel`, followed by `chunk`, as one foreign write.
    /// The buffer is back to [`PendingWriteBuffer::Empty`] afterwards, even if the write
    /// failed.
    ///
    /// # Errors
    ///
    /// Returns the error of the stream or the channel device.
    pub fn flush_foreign(&mut self, channel: ChannelId, chunk: &[u8]) -> io::Result<()> {
        let Some(entry) = self.intercept.channels.get_mut(channel.0) else {
            return Ok(());
        };
        let mut bytes = entry.pending.begin_flush();
        bytes.extend_from_slice(chunk);
        let device = entry.device.clone();

        let result = self.write_foreign(&device, &bytes);

        if let Some(entry) = self.intercept.channels.get_mut(channel.0) {
            entry.pending = PendingWriteBuffer::Empty;
        }
        result
    }

    /// Flush every channel. Nothing is redrawn if the spinner has stopped.
    ///
    /// # Errors
    ///
    /// Returns the first error. Every channel is flushed regardless.
    pub fn flush_all_foreign(&mut self) -> io::Result<()> {
        let mut result = Ok(());
        for index in 0..self.intercept.channels.len() {
            let flushed = self.flush_foreign(ChannelId(index), &[]);
            if result.is_ok() {
                result = flushed;
            }
        }
        result
    }

    /// Clear, write `bytes` verbatim starting at column 0, then redraw.
    fn write_foreign(&mut self, device: &OutputDevice, bytes: &[u8]) -> io::Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }

        if self.clear()? && self.render_state.indent != 0 {
            let mut stream = self.stream.lock();
            stream.queue(MoveToColumn(0))?;
            stream.flush()?;
        }

        {
            let mut device = device.lock();
            device.write_all(bytes)?;
            device.flush()?;
        }

        self.intercept.partial_line_on_screen = !bytes.ends_with(b"\n");

        if self.is_spinning() {
            self.render()?;
        }
        Ok(())
    }

    /// Withhold `chunk`, and return the generation the deadline must be armed with.
    fn withhold_foreign(&mut self, channel: ChannelId, chunk: &[u8]) -> Option<u64> {
        let generation = self.intercept.next_generation();
        let entry = self.intercept.channels.get_mut(channel.0)?;
        entry.pending.append(chunk, generation);
        Some(generation)
    }
}

/// The [`Write`] entry point for foreign output. Get one from
/// [`crate::Spinner::writer()`] (for the spinner's own stream) or
/// [`crate::Spinner::intercept()`] (for any other channel, eg: `stdout` while the
/// spinner draws on `stderr`).
///
/// Clones share the same channel, and the same pending buffer.
#[derive(Clone)]
pub struct InterceptWriter {
    safe_inner: SafeSpinnerInner,
    channel: ChannelId,
}

impl std::fmt::Debug for InterceptWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptWriter")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

impl InterceptWriter {
    #[must_use]
    pub fn new(safe_inner: SafeSpinnerInner, channel: ChannelId) -> Self {
        Self {
            safe_inner,
            channel,
        }
    }

    #[must_use]
    pub fn channel(&self) -> ChannelId { self.channel }

    /// The deadline is measured from now (the write), not from when the task is first
    /// polled.
    fn arm_deadline(&self, inner: &mut SpinnerInner, generation: u64) {
        let deadline = Instant::now() + inner.render_state.interval();
        let Some(runtime) = inner.lifecycle.runtime.clone() else {
            return;
        };
        let task = runtime.spawn(flush_on_deadline(
            Arc::clone(&self.safe_inner),
            self.channel,
            generation,
            deadline,
        ));
        if let Some(InterceptedChannel {
            pending: PendingWriteBuffer::Buffering { deadline, .. },
            ..
        }) = inner.intercept.channels.get_mut(self.channel.0)
        {
            *deadline = Some(task);
        }
    }
}

async fn flush_on_deadline(
    safe_inner: SafeSpinnerInner,
    channel: ChannelId,
    generation: u64,
    deadline: Instant,
) {
    tokio::time::sleep_until(deadline).await;

    let result = {
        let mut inner = lock_recovering(&safe_inner);
        let is_armed = inner
            .intercept
            .channels
            .get(channel.0)
            .is_some_and(|it| it.pending.is_armed_with(generation));
        if !is_armed {
            return;
        }
        inner.flush_foreign(channel, &[])
    };

    match result {
        Ok(()) => tracing::trace!(message = "deadline flush", ?channel),
        Err(error) => tracing::warn!(message = "deadline flush failed", ?channel, ?error),
    }
}

impl Write for InterceptWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut inner = lock_recovering(&self.safe_inner);

        if !inner.intercept.is_installed {
            let Some(device) = inner.intercept.device(self.channel).cloned() else {
                return Ok(buf.len());
            };
            drop(inner);
            let mut device = device.lock();
            device.write_all(buf)?;
            return Ok(buf.len());
        }

        // Without a runtime there's nothing to fire the deadline, so don't withhold.
        if buf.ends_with(b"\n") || inner.lifecycle.runtime.is_none() {
            inner.flush_foreign(self.channel, buf)?;
        } else if let Some(generation) = inner.withhold_foreign(self.channel, buf) {
            self.arm_deadline(&mut inner, generation);
        }

        Ok(buf.len())
    }

    /// Flush the withheld bytes of this channel now, then the channel itself.
    fn flush(&mut self) -> io::Result<()> {
        let mut inner = lock_recovering(&self.safe_inner);
        inner.flush_foreign(self.channel, &[])?;
        let Some(device) = inner.intercept.device(self.channel).cloned() else {
            return Ok(());
        };
        drop(inner);
        device.lock().flush()
    }
}
