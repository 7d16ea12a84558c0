//! Port traits: the hexagonal boundary between the RPC core and the
//! outside world.
//!
//! ```text
//!   RequestLoop ──▶ EventSink ──▶ Adapter (log, recorder, ...)
//! ```

use super::events::RpcEvent;

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: core → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`RpcEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &RpcEvent);
}

/// Sink that drops every event.
pub struct DiscardSink;

impl EventSink for DiscardSink {
    fn emit(&mut self, _event: &RpcEvent) {}
}
