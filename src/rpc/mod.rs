//! Transport-agnostic RPC subsystem.
//!
//! Native functions are registered under a name; a remote caller sends
//! the name followed by the encoded arguments and gets the encoded
//! return value back.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          RPC Stack                           │
//! │                                                              │
//! │  ┌───────────┐   ┌─────────────┐   ┌──────────────────────┐  │
//! │  │ Transport │──▶│ RequestLoop │──▶│ dispatch(name)       │  │
//! │  │ (trait)   │   │ (envelope)  │   │  → Registry lookup   │  │
//! │  └───────────┘   └─────────────┘   └──────────────────────┘  │
//! │       ▲                                       │              │
//! │       │                                       ▼              │
//! │       │          ┌─────────────┐   ┌──────────────────────┐  │
//! │       └──────────│ Codec       │◀──│ Thunk: decode args,  │  │
//! │        (write)   │ (encode)    │   │ call, encode result  │  │
//! │                  └─────────────┘   └──────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod dispatch;
pub mod procedure;
pub mod registry;
pub mod server;
pub mod transport;

pub use codec::{Codec, JsonCodec, PostcardCodec};
pub use dispatch::dispatch;
pub use procedure::Procedure;
pub use registry::Registry;
pub use server::{PollOutcome, RequestLoop};
pub use transport::{LoopbackTransport, NullTransport, Transport};
