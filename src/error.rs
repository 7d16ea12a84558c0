//! Unified error types for the RPC firmware.
//!
//! Codec-level errors are small `Copy` enums so they can be passed through
//! the thunks without allocation. [`RpcError`] is the single type the request
//! loop reports; every variant leaves the loop ready for the next poll.

use core::fmt;

use alloc::string::String;

// ---------------------------------------------------------------------------
// Codec errors
// ---------------------------------------------------------------------------

/// A value could not be materialised from the current decode session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended before the value was complete.
    Truncated,
    /// The bytes are not a valid encoding (bad varint, invalid UTF-8, ...).
    Malformed,
    /// The encoding is valid but holds a different type than requested.
    TypeMismatch,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "input truncated"),
            Self::Malformed => write!(f, "malformed encoding"),
            Self::TypeMismatch => write!(f, "type mismatch"),
        }
    }
}

/// A return value could not be serialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The codec cannot represent this shape of value.
    Unsupported,
    /// The value's own `Serialize` impl reported an error.
    Failed,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "value not representable by codec"),
            Self::Failed => write!(f, "serialisation failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Call errors (raised inside a thunk, before the procedure name is known)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallError {
    Decode(DecodeError),
    Encode(EncodeError),
}

impl From<DecodeError> for CallError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<EncodeError> for CallError {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e)
    }
}

// ---------------------------------------------------------------------------
// Top-level RPC error
// ---------------------------------------------------------------------------

/// Every failure of a poll/dispatch cycle funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// No procedure is registered under this name. Nothing was invoked.
    UnknownProcedure(String),
    /// The arguments for `procedure` could not be decoded. Nothing was invoked.
    ArgumentDecode {
        procedure: String,
        cause: DecodeError,
    },
    /// The return value of `procedure` could not be encoded. Nothing was written.
    Encode {
        procedure: String,
        cause: EncodeError,
    },
    /// The procedure name at the head of the request could not be decoded.
    Envelope(DecodeError),
    /// The request exceeded the receive buffer and was discarded.
    RequestTooLarge { len: usize, limit: usize },
    /// The transport reported an error while reading or writing.
    Transport(String),
}

impl RpcError {
    pub(crate) fn from_call(procedure: &str, e: CallError) -> Self {
        match e {
            CallError::Decode(cause) => Self::ArgumentDecode {
                procedure: procedure.into(),
                cause,
            },
            CallError::Encode(cause) => Self::Encode {
                procedure: procedure.into(),
                cause,
            },
        }
    }

    pub(crate) fn transport(e: impl fmt::Debug) -> Self {
        Self::Transport(alloc::format!("{e:?}"))
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProcedure(name) => write!(f, "unknown procedure '{name}'"),
            Self::ArgumentDecode { procedure, cause } => {
                write!(f, "'{procedure}': argument decode failed: {cause}")
            }
            Self::Encode { procedure, cause } => {
                write!(f, "'{procedure}': result encode failed: {cause}")
            }
            Self::Envelope(cause) => write!(f, "request envelope: {cause}"),
            Self::RequestTooLarge { len, limit } => {
                write!(f, "request of {len} bytes exceeds {limit} byte limit")
            }
            Self::Transport(msg) => write!(f, "transport: {msg}"),
        }
    }
}

impl std::error::Error for RpcError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field is outside its allowed range.
    OutOfRange(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(field) => write!(f, "config field '{field}' out of range"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, RpcError>;
