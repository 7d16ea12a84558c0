//! Application boundary: what the RPC core reports and to whom.
//!
//! The request loop never logs failures itself. It emits [`events::RpcEvent`]s
//! through the [`ports::EventSink`] port, and adapters on the other side
//! decide where they go (serial log, test recorder, ...).

pub mod events;
pub mod ports;
