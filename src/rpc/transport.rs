//! Transport abstraction: any byte-oriented channel.
//!
//! Concrete implementations:
//! - UART serial ([`UartTransport`](crate::adapters::uart), ESP-IDF only)
//! - [`LoopbackTransport`]: in-memory, for host tests and fuzzing
//! - [`NullTransport`]: never reads, discards writes
//!
//! The request loop is generic over `Transport`, so adding a new
//! transport requires zero changes to the RPC logic.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Check if data is available for reading.
    fn available(&self) -> bool;
}

/// A null transport that discards all writes and never reads.
/// Useful as a default when no RPC client is connected.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn available(&self) -> bool {
        false
    }
}

/// In-memory transport: bytes pushed with [`inject`](Self::inject) are
/// read back by the request loop, and everything the loop writes lands
/// in [`written`](Self::written).
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    inbox: VecDeque<u8>,
    outbox: Vec<u8>,
    flushes: usize,
    /// Largest chunk handed out per `read`/accepted per `write` (0 = unbounded).
    max_io: usize,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit every `read` and `write` to at most `max_io` bytes, the way a
    /// UART FIFO hands out data in pieces.
    pub fn with_max_io(max_io: usize) -> Self {
        Self {
            max_io,
            ..Self::default()
        }
    }

    /// Queue bytes as if they arrived from the remote caller.
    pub fn inject(&mut self, data: &[u8]) {
        self.inbox.extend(data);
    }

    /// Bytes written by the device so far.
    pub fn written(&self) -> &[u8] {
        &self.outbox
    }

    /// Take and clear the written bytes.
    pub fn take_written(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.outbox)
    }

    /// Number of `flush` calls observed.
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    fn limit(&self, len: usize) -> usize {
        if self.max_io == 0 { len } else { len.min(self.max_io) }
    }
}

impl Transport for LoopbackTransport {
    type Error = core::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = self.limit(buf.len()).min(self.inbox.len());
        for (slot, byte) in buf.iter_mut().zip(self.inbox.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        let n = self.limit(data.len());
        self.outbox.extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }

    fn available(&self) -> bool {
        !self.inbox.is_empty()
    }
}

/// Write all of `data`, retrying short writes.
///
/// A transport that accepts zero bytes for a non-empty write is stalled;
/// that is reported instead of spinning forever.
pub(crate) fn write_all<T: Transport>(transport: &mut T, mut data: &[u8]) -> Result<(), WriteError<T::Error>> {
    while !data.is_empty() {
        match transport.write(data).map_err(WriteError::Transport)? {
            0 => return Err(WriteError::Stalled),
            n => data = &data[n..],
        }
    }
    Ok(())
}

#[derive(Debug)]
pub(crate) enum WriteError<E> {
    Transport(E),
    Stalled,
}
