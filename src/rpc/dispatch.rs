//! Dispatcher: resolve a procedure name and run its entry.

use log::debug;

use super::codec::Codec;
use super::procedure::EntryKind;
use super::registry::Registry;
use super::transport::{Transport, WriteError, write_all};
use crate::error::{CallError, Result, RpcError};

/// Run procedure `name` against the arguments left in `codec`.
///
/// On success the encoded reply (if any) has been written to `transport`
/// and the transport flushed; the number of reply bytes is returned.
/// An unknown name or a decode/encode failure writes nothing.
pub fn dispatch<C, T>(
    registry: &Registry<C>,
    name: &str,
    codec: &mut C,
    transport: &mut T,
) -> Result<usize>
where
    C: Codec,
    T: Transport,
{
    let Some(entry) = registry.get(name) else {
        return Err(RpcError::UnknownProcedure(name.into()));
    };

    let reply = match entry.kind() {
        EntryKind::Native(thunk) => thunk.invoke(codec),
        EntryKind::Help => codec
            .encode(&registry.describe())
            .map_err(CallError::from),
    }
    .map_err(|e| RpcError::from_call(name, e))?;

    write_all(transport, &reply).map_err(|e| match e {
        WriteError::Transport(e) => RpcError::transport(e),
        WriteError::Stalled => RpcError::Transport("write stalled".into()),
    })?;
    transport.flush().map_err(RpcError::transport)?;

    debug!("RPC: '{}' -> {} bytes", name, reply.len());
    Ok(reply.len())
}
