//! RPC configuration parameters
//!
//! Tunables for the serial link and the request loop.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rpc::server::RX_CAPACITY;

/// Serial link and request loop configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcConfig {
    // --- Link ---
    /// UART baud rate
    pub baud_rate: u32,

    // --- Request loop ---
    /// Largest accepted request in bytes (1..=RX_CAPACITY)
    pub max_request_bytes: usize,
    /// Bytes requested from the transport per read call
    pub read_chunk_bytes: usize,
    /// Delay between polls of the transport (milliseconds)
    pub poll_interval_ms: u32,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            max_request_bytes: RX_CAPACITY,
            read_chunk_bytes: 64,
            poll_interval_ms: 10,
        }
    }
}

impl RpcConfig {
    /// Reject values the request loop cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baud_rate == 0 {
            return Err(ConfigError::OutOfRange("baud_rate"));
        }
        if self.max_request_bytes == 0 || self.max_request_bytes > RX_CAPACITY {
            return Err(ConfigError::OutOfRange("max_request_bytes"));
        }
        if self.read_chunk_bytes == 0 {
            return Err(ConfigError::OutOfRange("read_chunk_bytes"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::OutOfRange("poll_interval_ms"));
        }
        Ok(())
    }
}
