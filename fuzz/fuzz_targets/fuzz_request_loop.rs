//! Fuzz target: `RequestLoop::poll`
//!
//! Drives arbitrary byte sequences through the request loop against a
//! registry with procedures of several signatures, and asserts that it
//! never panics, never replies to a rejected request, and serves a valid
//! request correctly right afterwards.
//!
//! cargo fuzz run fuzz_request_loop

#![no_main]

use fwrpc::app::ports::DiscardSink;
use fwrpc::config::RpcConfig;
use fwrpc::rpc::{LoopbackTransport, PostcardCodec, Registry, RequestLoop, Transport};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut registry = Registry::<PostcardCodec>::new();
    registry.register("add", |a: i32, b: i32| a.wrapping_add(b), "@brief add");
    registry.register("echo", |s: String| s, "@brief echo");
    registry.register("sum", |v: Vec<u16>| v.iter().map(|&x| u32::from(x)).sum::<u32>(), "@brief sum");
    registry.register("noop", |_flag: bool, _byte: u8| {}, "@brief noop");

    let mut server = RequestLoop::new(PostcardCodec::new(), &RpcConfig::default());
    let mut transport = LoopbackTransport::new();

    transport.inject(data);
    if server.poll(&registry, &mut transport, &mut DiscardSink).is_err() {
        assert!(transport.written().is_empty(), "rejected request must not reply");
    }
    assert!(!transport.available(), "every poll drains the transport");

    // The loop must be ready for the next request.
    transport.take_written();
    let mut request = postcard::to_allocvec("add").unwrap();
    request.extend(postcard::to_allocvec(&1i32).unwrap());
    request.extend(postcard::to_allocvec(&2i32).unwrap());
    transport.inject(&request);
    server.poll(&registry, &mut transport, &mut DiscardSink).unwrap();
    assert_eq!(transport.written(), postcard::to_allocvec(&3i32).unwrap().as_slice());
});
