//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing RPC events to the `log` facade
//! (the ESP-IDF logger on device, which goes to the console UART).

use log::{info, warn};

use crate::app::events::RpcEvent;
use crate::app::ports::EventSink;
use crate::error::RpcError;

/// Adapter that logs every [`RpcEvent`].
pub struct LogEventSink {
    completed: u32,
    failed: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self {
            completed: 0,
            failed: 0,
        }
    }

    /// Requests served since startup.
    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Requests rejected since startup.
    pub fn failed(&self) -> u32 {
        self.failed
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &RpcEvent) {
        match event {
            RpcEvent::Completed {
                procedure,
                response_len,
            } => {
                self.completed = self.completed.wrapping_add(1);
                info!("RPC | {} -> {} bytes", procedure, response_len);
            }
            RpcEvent::Failed(e) => {
                self.failed = self.failed.wrapping_add(1);
                match e {
                    RpcError::UnknownProcedure(name) => {
                        warn!("RPC | unknown procedure '{}'", name);
                    }
                    other => warn!("RPC | request rejected: {}", other),
                }
            }
        }
    }
}
