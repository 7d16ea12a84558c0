//! fwrpc firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  UART1 ──▶ RequestLoop ──▶ Registry ──▶ native procedures    │
//! │    ▲                                         │               │
//! │    └─────────────── encoded reply ◀──────────┘               │
//! │                                                              │
//! │  LogEventSink: every served / rejected request → console     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The console UART0 carries logs; RPC traffic runs on UART1 so the two
//! never interleave on the wire.
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;
use log::info;

use fwrpc::adapters::log_sink::LogEventSink;
use fwrpc::adapters::time::MonotonicClock;
use fwrpc::adapters::uart::UartTransport;
use fwrpc::config::RpcConfig;
use fwrpc::rpc::{PostcardCodec, Registry, RequestLoop};

fn register_device_procedures(registry: &mut Registry<PostcardCodec>, clock: MonotonicClock) {
    registry.register("ping", || String::from("pong"), "@brief Liveness check");
    registry.register(
        "add",
        |a: i32, b: i32| a.wrapping_add(b),
        "@brief Add two integers @param a @param b",
    );
    registry.register("echo", |s: String| s, "@brief Return the argument unchanged");
    registry.register(
        "uptime_ms",
        move || clock.uptime_ms(),
        "@brief Milliseconds since boot",
    );
    registry.register(
        "version",
        || String::from(env!("CARGO_PKG_VERSION")),
        "@brief Firmware version",
    );
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("fwrpc v{}", env!("CARGO_PKG_VERSION"));

    let config = RpcConfig::default();
    config.validate()?;

    // ── 2. Transport ──────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let mut transport = UartTransport::new(
        peripherals.uart1,
        peripherals.pins.gpio17,
        peripherals.pins.gpio18,
        config.baud_rate,
    )?;

    // ── 3. Registry (startup only, read-only afterwards) ──────
    let mut registry = Registry::<PostcardCodec>::new();
    register_device_procedures(&mut registry, MonotonicClock::new());
    info!("{} procedures registered", registry.len());

    // ── 4. Request loop ───────────────────────────────────────
    let mut server = RequestLoop::new(PostcardCodec::new(), &config);
    let mut sink = LogEventSink::new();

    info!("System ready. Entering request loop.");
    loop {
        // Failures are reported through the sink; the loop keeps going.
        let _ = server.poll(&registry, &mut transport, &mut sink);
        FreeRtos::delay_ms(config.poll_interval_ms);
    }
}
