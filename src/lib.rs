//! Serial RPC library for microcontroller firmware.
//!
//! Exposes the pure-logic modules for integration testing and host-side
//! use. All ESP-IDF-specific code is guarded by the `espidf` feature.

#![deny(unused_must_use)]

extern crate alloc;

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod rpc;
