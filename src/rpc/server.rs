//! Request loop: transport bytes in, dispatched procedure out.
//!
//! Called repeatedly from the firmware's single control loop. Each call:
//!
//! 1. returns immediately when the transport has nothing to read,
//! 2. drains every available byte into one receive buffer,
//! 3. resets the codec session and decodes the procedure name,
//! 4. hands the name to [`dispatch`], which decodes the remaining
//!    fields as that procedure's arguments.
//!
//! One poll is one request. Bytes are never carried over to the next
//! poll, so a request that arrives split across polls fails to decode
//! and the following poll starts from a clean buffer.

use alloc::string::String;

use heapless::Vec;
use log::debug;

use super::codec::Codec;
use super::dispatch::dispatch;
use super::registry::Registry;
use super::transport::Transport;
use crate::app::events::RpcEvent;
use crate::app::ports::EventSink;
use crate::config::RpcConfig;
use crate::error::{Result, RpcError};

/// Receive buffer capacity; the upper bound for `max_request_bytes`.
pub const RX_CAPACITY: usize = 1024;

/// Largest read chunk the loop will request from the transport.
const MAX_READ_CHUNK: usize = 256;

/// Result of one successful poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// No bytes were available.
    Idle,
    /// A request was dispatched and its reply written.
    Completed {
        procedure: String,
        response_len: usize,
    },
}

/// Owns the codec session and receive buffer for one transport.
pub struct RequestLoop<C> {
    codec: C,
    rx: Vec<u8, RX_CAPACITY>,
    max_request_bytes: usize,
    read_chunk: usize,
}

impl<C: Codec> RequestLoop<C> {
    /// `config` is expected to have passed [`RpcConfig::validate`];
    /// out-of-range sizes are clamped.
    pub fn new(codec: C, config: &RpcConfig) -> Self {
        Self {
            codec,
            rx: Vec::new(),
            max_request_bytes: config.max_request_bytes.clamp(1, RX_CAPACITY),
            read_chunk: config.read_chunk_bytes.clamp(1, MAX_READ_CHUNK),
        }
    }

    /// Service at most one request.
    ///
    /// Every non-idle poll emits exactly one [`RpcEvent`] to `sink`, and
    /// the same outcome is returned. Errors never leave state behind.
    pub fn poll<T, S>(
        &mut self,
        registry: &Registry<C>,
        transport: &mut T,
        sink: &mut S,
    ) -> Result<PollOutcome>
    where
        T: Transport,
        S: EventSink,
    {
        let outcome = self.process(registry, transport);
        match &outcome {
            Ok(PollOutcome::Idle) => {}
            Ok(PollOutcome::Completed {
                procedure,
                response_len,
            }) => sink.emit(&RpcEvent::Completed {
                procedure: procedure.clone(),
                response_len: *response_len,
            }),
            Err(e) => sink.emit(&RpcEvent::Failed(e.clone())),
        }
        outcome
    }

    fn process<T: Transport>(
        &mut self,
        registry: &Registry<C>,
        transport: &mut T,
    ) -> Result<PollOutcome> {
        if !transport.available() {
            return Ok(PollOutcome::Idle);
        }

        let result = self.drain(transport);
        if let Err(e) = result {
            self.rx.clear();
            return Err(e);
        }
        if self.rx.is_empty() {
            return Ok(PollOutcome::Idle);
        }

        self.codec.begin(&self.rx);
        self.rx.clear();

        let result = self.run(registry, transport);
        self.codec.reset();
        result
    }

    fn run<T: Transport>(
        &mut self,
        registry: &Registry<C>,
        transport: &mut T,
    ) -> Result<PollOutcome> {
        let procedure: String = self.codec.decode_next().map_err(RpcError::Envelope)?;
        let response_len = dispatch(registry, &procedure, &mut self.codec, transport)?;

        let trailing = self.codec.remaining();
        if trailing > 0 {
            debug!("RPC: '{}' ignored {} trailing bytes", procedure, trailing);
        }

        Ok(PollOutcome::Completed {
            procedure,
            response_len,
        })
    }

    /// Move every available byte into `rx`. Oversized requests are still
    /// drained completely so their tail cannot be mistaken for a new request.
    fn drain<T: Transport>(&mut self, transport: &mut T) -> Result<()> {
        self.rx.clear();
        let mut chunk = [0u8; MAX_READ_CHUNK];
        let mut total = 0usize;

        while transport.available() {
            let n = transport
                .read(&mut chunk[..self.read_chunk])
                .map_err(RpcError::transport)?;
            if n == 0 {
                break;
            }
            total += n;
            if total <= self.max_request_bytes {
                let pushed = self.rx.extend_from_slice(&chunk[..n]);
                debug_assert!(pushed.is_ok(), "max_request_bytes is clamped to RX_CAPACITY");
            }
        }

        if total > self.max_request_bytes {
            return Err(RpcError::RequestTooLarge {
                len: total,
                limit: self.max_request_bytes,
            });
        }
        Ok(())
    }
}
