//! The same registry semantics over the self-describing JSON codec.

use fwrpc::config::RpcConfig;
use fwrpc::error::{DecodeError, RpcError};
use fwrpc::rpc::{JsonCodec, LoopbackTransport, PollOutcome, Registry, RequestLoop};

use super::harness::RecordingSink;

struct JsonDevice {
    registry: Registry<JsonCodec>,
    server: RequestLoop<JsonCodec>,
    transport: LoopbackTransport,
    sink: RecordingSink,
}

impl JsonDevice {
    fn new() -> Self {
        let mut registry = Registry::new();
        registry.register("add", |a: i32, b: i32| a + b, "@brief Add two integers");
        registry.register("greet", |name: String| format!("hello {name}"), "@brief Greet");
        registry.register("led", |_on: bool| {}, "@brief Switch the status LED");
        Self {
            registry,
            server: RequestLoop::new(JsonCodec::new(), &RpcConfig::default()),
            transport: LoopbackTransport::new(),
            sink: RecordingSink::default(),
        }
    }

    fn send(&mut self, line: &str) -> Result<PollOutcome, RpcError> {
        self.transport.inject(line.as_bytes());
        self.server
            .poll(&self.registry, &mut self.transport, &mut self.sink)
    }
}

#[test]
fn add_over_json() {
    let mut device = JsonDevice::new();
    device.send("\"add\" 2 3\n").unwrap();
    assert_eq!(device.transport.written(), b"5");
}

#[test]
fn string_argument_over_json() {
    let mut device = JsonDevice::new();
    device.send(r#""greet" "world""#).unwrap();
    assert_eq!(device.transport.written(), br#""hello world""#);
}

#[test]
fn help_over_json_is_a_json_string() {
    let mut device = JsonDevice::new();
    device.send(r#""help""#).unwrap();

    let listing: String = serde_json::from_slice(device.transport.written()).unwrap();
    assert_eq!(listing.lines().count(), 4);
    assert!(listing.starts_with("@entry add - @brief Add two integers\n"));
}

#[test]
fn wrong_argument_type_over_json() {
    let mut device = JsonDevice::new();
    let err = device.send(r#""add" "two" 3"#).unwrap_err();
    assert_eq!(
        err,
        RpcError::ArgumentDecode {
            procedure: "add".into(),
            cause: DecodeError::TypeMismatch,
        }
    );
    assert!(device.transport.written().is_empty());
    assert_eq!(device.sink.events.len(), 1);
}

#[test]
fn missing_argument_over_json() {
    let mut device = JsonDevice::new();
    let err = device.send("\"add\" 2 ").unwrap_err();
    assert_eq!(
        err,
        RpcError::ArgumentDecode {
            procedure: "add".into(),
            cause: DecodeError::Truncated,
        }
    );
}

#[test]
fn unit_reply_over_json_writes_nothing() {
    let mut device = JsonDevice::new();
    let outcome = device.send("\"led\" true").unwrap();

    assert_eq!(
        outcome,
        PollOutcome::Completed {
            procedure: "led".into(),
            response_len: 0,
        }
    );
    assert!(device.transport.written().is_empty());
    assert_eq!(device.transport.flushes(), 1);
}
