//! Codec sessions: typed values ⇄ bytes.
//!
//! A request is decoded field by field from one session:
//! ```text
//! ┌───────────────┬────────┬────────┬─────┬────────┐
//! │ procedure name│  arg0  │  arg1  │ ... │  argN  │
//! │ (string)      │        │        │     │        │
//! └───────────────┴────────┴────────┴─────┴────────┘
//! ```
//! There is no framing between fields: each back-end's encoding tells
//! where one value ends and the next begins. The session is reset at the
//! start of every request so no bytes from a previous call can leak into
//! the next one.

use alloc::string::String;
use alloc::vec::Vec;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{DecodeError, EncodeError};

/// Decode/encode session used by the request loop and the thunks.
pub trait Codec {
    /// Reset the session and feed it one request's bytes.
    fn begin(&mut self, bytes: &[u8]);

    /// Drop any buffered request bytes.
    fn reset(&mut self);

    /// Decode the next value. The cursor only advances on success.
    fn decode_next<T: DeserializeOwned>(&mut self) -> Result<T, DecodeError>;

    /// Encode `value` into a fresh buffer.
    fn encode<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<Vec<u8>, EncodeError>;

    /// Bytes of the current request not yet consumed.
    fn remaining(&self) -> usize;
}

// ── Postcard (compact binary) ────────────────────────────────

/// Compact binary codec built on `postcard`. The device default.
#[derive(Debug, Default)]
pub struct PostcardCodec {
    rx: Vec<u8>,
    pos: usize,
}

impl PostcardCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Codec for PostcardCodec {
    fn begin(&mut self, bytes: &[u8]) {
        self.reset();
        self.rx.extend_from_slice(bytes);
    }

    fn reset(&mut self) {
        self.rx.clear();
        self.pos = 0;
    }

    fn decode_next<T: DeserializeOwned>(&mut self) -> Result<T, DecodeError> {
        let (value, rest) = postcard::take_from_bytes::<T>(&self.rx[self.pos..])
            .map_err(postcard_decode_error)?;
        self.pos = self.rx.len() - rest.len();
        Ok(value)
    }

    fn encode<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<Vec<u8>, EncodeError> {
        postcard::to_allocvec(value).map_err(postcard_encode_error)
    }

    fn remaining(&self) -> usize {
        self.rx.len() - self.pos
    }
}

fn postcard_decode_error(e: postcard::Error) -> DecodeError {
    match e {
        postcard::Error::DeserializeUnexpectedEnd => DecodeError::Truncated,
        postcard::Error::SerdeDeCustom => DecodeError::TypeMismatch,
        _ => DecodeError::Malformed,
    }
}

fn postcard_encode_error(e: postcard::Error) -> EncodeError {
    match e {
        postcard::Error::SerdeSerCustom => EncodeError::Failed,
        _ => EncodeError::Unsupported,
    }
}

// ── JSON (self-describing text) ──────────────────────────────

/// Whitespace-separated JSON values, e.g. `"add" 2 3`.
///
/// Handy when driving the device from a plain serial terminal.
#[derive(Debug, Default)]
pub struct JsonCodec {
    rx: Vec<u8>,
    pos: usize,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Codec for JsonCodec {
    fn begin(&mut self, bytes: &[u8]) {
        self.reset();
        self.rx.extend_from_slice(bytes);
    }

    fn reset(&mut self) {
        self.rx.clear();
        self.pos = 0;
    }

    fn decode_next<T: DeserializeOwned>(&mut self) -> Result<T, DecodeError> {
        let mut stream = serde_json::Deserializer::from_slice(&self.rx[self.pos..]).into_iter::<T>();
        match stream.next() {
            Some(Ok(value)) => {
                self.pos += stream.byte_offset();
                Ok(value)
            }
            Some(Err(e)) => Err(json_decode_error(&e)),
            None => Err(DecodeError::Truncated),
        }
    }

    fn encode<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<Vec<u8>, EncodeError> {
        serde_json::to_string(value)
            .map(String::into_bytes)
            .map_err(|e| match e.classify() {
                serde_json::error::Category::Data => EncodeError::Failed,
                _ => EncodeError::Unsupported,
            })
    }

    fn remaining(&self) -> usize {
        self.rx.len() - self.pos
    }
}

fn json_decode_error(e: &serde_json::Error) -> DecodeError {
    match e.classify() {
        serde_json::error::Category::Eof => DecodeError::Truncated,
        serde_json::error::Category::Data => DecodeError::TypeMismatch,
        serde_json::error::Category::Syntax | serde_json::error::Category::Io => {
            DecodeError::Malformed
        }
    }
}

// ── Tests ────────────────────────────────────────────────────
