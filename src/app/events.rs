//! Outbound RPC events.
//!
//! The [`RequestLoop`](crate::rpc::server::RequestLoop) emits one of these
//! for every poll that found bytes to process.

use alloc::string::String;

use crate::error::RpcError;

/// Structured events emitted by the request loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcEvent {
    /// A procedure ran and its reply (possibly empty) was written.
    Completed {
        procedure: String,
        response_len: usize,
    },

    /// The request was rejected; nothing was written to the transport.
    Failed(RpcError),
}
