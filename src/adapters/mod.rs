//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements | Connects to                |
//! |------------|------------|----------------------------|
//! | `log_sink` | EventSink  | `log` facade / serial log  |
//! | `time`     | -          | ESP32 system timer         |
//! | `uart`     | Transport  | ESP-IDF UART driver        |

pub mod log_sink;
pub mod time;
#[cfg(feature = "espidf")]
pub mod uart;
