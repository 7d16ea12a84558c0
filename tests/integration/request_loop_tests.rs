//! End-to-end tests: bytes in on the loopback transport, reply bytes out.

use fwrpc::app::events::RpcEvent;
use fwrpc::error::{DecodeError, EncodeError, RpcError};
use fwrpc::rpc::PollOutcome;
use serde::{Serialize, Serializer};

use super::harness::{CallLog, Device, Envelope, call_log, encode};

fn device_with_add(log: &CallLog<(i32, i32)>) -> Device {
    let mut device = Device::new();
    let calls = log.clone();
    device.registry.register(
        "add",
        move |a: i32, b: i32| {
            calls.borrow_mut().push((a, b));
            a + b
        },
        "@brief Add two integers",
    );
    device
}

// ── add / subtract scenario ──────────────────────────────────

#[test]
fn add_then_unregistered_subtract() {
    let log = call_log();
    let mut device = device_with_add(&log);

    let outcome = device
        .request(Envelope::call("add").arg(2i32).arg(3i32).bytes())
        .unwrap();
    assert_eq!(
        outcome,
        PollOutcome::Completed {
            procedure: "add".into(),
            response_len: encode(&5i32).len(),
        }
    );
    assert_eq!(*log.borrow(), [(2, 3)]);
    assert_eq!(device.transport.take_written(), encode(&5i32));

    let err = device
        .request(Envelope::call("subtract").arg(2i32).arg(3i32).bytes())
        .unwrap_err();
    assert_eq!(err, RpcError::UnknownProcedure("subtract".into()));
    assert!(device.transport.written().is_empty());
    assert_eq!(log.borrow().len(), 1, "no further native invocation");
    assert_eq!(
        device.sink.last(),
        Some(&RpcEvent::Failed(RpcError::UnknownProcedure(
            "subtract".into()
        )))
    );
}

#[test]
fn zero_arg_string_procedure_writes_exactly_its_value() {
    let mut device = Device::new();
    device
        .registry
        .register("ping", || String::from("pong"), "@brief Liveness");

    let flushes_before = device.transport.flushes();
    device.request(Envelope::call("ping").bytes()).unwrap();

    assert_eq!(device.transport.written(), encode("pong").as_slice());
    assert_eq!(device.transport.flushes(), flushes_before + 1);
}

#[test]
fn unit_procedure_writes_nothing_but_flushes() {
    let log = call_log();
    let mut device = Device::new();
    let calls = log.clone();
    device.registry.register(
        "led",
        move |on: bool| calls.borrow_mut().push(on),
        "@brief Switch the status LED",
    );

    let outcome = device.request(Envelope::call("led").arg(true).bytes()).unwrap();
    assert_eq!(
        outcome,
        PollOutcome::Completed {
            procedure: "led".into(),
            response_len: 0,
        }
    );
    assert_eq!(*log.borrow(), [true]);
    assert!(device.transport.written().is_empty());
    assert_eq!(device.transport.flushes(), 1);
}

// ── argument decode failures ─────────────────────────────────

#[test]
fn truncated_arguments_abort_the_call() {
    let log = call_log();
    let mut device = device_with_add(&log);

    let err = device
        .request(Envelope::call("add").arg(2i32).bytes())
        .unwrap_err();
    assert_eq!(
        err,
        RpcError::ArgumentDecode {
            procedure: "add".into(),
            cause: DecodeError::Truncated,
        }
    );
    assert!(log.borrow().is_empty());
    assert!(device.transport.written().is_empty());
    assert_eq!(device.sink.last(), Some(&RpcEvent::Failed(err)));
}

#[test]
fn mistyped_argument_aborts_the_call() {
    let log = call_log();
    let mut device = Device::new();
    let calls = log.clone();
    device.registry.register(
        "toggle",
        move |on: bool| calls.borrow_mut().push(on),
        "@brief Toggle",
    );

    // 0x07 is not a postcard bool.
    let mut request = Envelope::call("toggle").bytes().to_vec();
    request.push(0x07);
    let err = device.request(&request).unwrap_err();

    assert!(matches!(
        err,
        RpcError::ArgumentDecode {
            cause: DecodeError::Malformed,
            ..
        }
    ));
    assert!(log.borrow().is_empty());
}

#[test]
fn loop_recovers_after_failed_request() {
    let log = call_log();
    let mut device = device_with_add(&log);

    assert!(device.request(Envelope::call("add").arg(1i32).bytes()).is_err());
    device
        .request(Envelope::call("add").arg(40i32).arg(2i32).bytes())
        .unwrap();

    assert_eq!(*log.borrow(), [(40, 2)]);
    assert_eq!(device.reply::<i32>(), 42);
}

#[test]
fn request_split_across_polls_is_not_reassembled() {
    let log = call_log();
    let mut device = device_with_add(&log);
    let full = Envelope::call("add").arg(300i32).arg(-7i32);
    let (head, tail) = full.bytes().split_at(2);

    assert!(matches!(
        device.request(head),
        Err(RpcError::Envelope(DecodeError::Truncated))
    ));
    assert!(device.request(tail).is_err());
    assert!(log.borrow().is_empty());

    // A complete request on the next poll is unaffected.
    device.request(full.bytes()).unwrap();
    assert_eq!(*log.borrow(), [(300, -7)]);
}

#[test]
fn trailing_bytes_are_ignored() {
    let log = call_log();
    let mut device = device_with_add(&log);

    device
        .request(Envelope::call("add").arg(1i32).arg(1i32).arg(99u8).bytes())
        .unwrap();
    assert_eq!(*log.borrow(), [(1, 1)]);
    assert_eq!(device.reply::<i32>(), 2);
}

// ── encode failures ──────────────────────────────────────────

struct Unencodable;

impl Serialize for Unencodable {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("sensor offline"))
    }
}

#[test]
fn encode_failure_writes_nothing() {
    let mut device = Device::new();
    device
        .registry
        .register("broken", || Unencodable, "@brief Always fails to encode");

    let err = device.request(Envelope::call("broken").bytes()).unwrap_err();
    assert_eq!(
        err,
        RpcError::Encode {
            procedure: "broken".into(),
            cause: EncodeError::Failed,
        }
    );
    assert!(device.transport.written().is_empty());
    assert_eq!(device.transport.flushes(), 0);
}

// ── help ─────────────────────────────────────────────────────

#[test]
fn help_lists_every_entry_including_itself() {
    let mut device = Device::new();
    device.registry.register("ping", || 1u8, "@brief a");
    device.registry.register("echo", |s: String| s, "@brief b");

    let listing = device.help();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(
        lines,
        [
            "@entry echo - @brief b",
            "@entry help - @brief Built-in method describing all available procedures",
            "@entry ping - @brief a",
        ]
    );
    assert_eq!(lines.len(), device.registry.len());
    assert!(listing.ends_with('\n'));
}

#[test]
fn help_is_idempotent() {
    let mut device = Device::new();
    device.registry.register("ping", || 1u8, "@brief a");
    assert_eq!(device.help(), device.help());
}

#[test]
fn help_sees_later_registrations() {
    let mut device = Device::new();
    let before = device.help();
    device.registry.register("late", || 0u8, "@brief late");
    let after = device.help();

    assert!(!before.contains("late"));
    assert!(after.contains("@entry late - @brief late\n"));
}

#[test]
fn last_registration_wins_in_behaviour_and_listing() {
    let mut device = Device::new();
    device
        .registry
        .register("op", |a: i32, b: i32| a + b, "@brief sum");
    device
        .registry
        .register("op", |a: i32, b: i32| a * b, "@brief product");

    device
        .request(Envelope::call("op").arg(6i32).arg(7i32).bytes())
        .unwrap();
    assert_eq!(device.reply::<i32>(), 42);

    let listing = device.help();
    assert!(listing.contains("@entry op - @brief product\n"));
    assert!(!listing.contains("@brief sum"));
    assert_eq!(listing.lines().count(), 2);
}

// ── sink ─────────────────────────────────────────────────────

#[test]
fn one_event_per_non_idle_poll() {
    let log = call_log();
    let mut device = device_with_add(&log);

    // Idle poll: nothing injected.
    device.request(&[]).unwrap();
    assert!(device.sink.events.is_empty());

    device
        .request(Envelope::call("add").arg(1i32).arg(2i32).bytes())
        .unwrap();
    let _ = device.request(Envelope::call("nope").bytes());

    assert_eq!(device.sink.events.len(), 2);
    assert!(matches!(
        device.sink.events[0],
        RpcEvent::Completed { ref procedure, .. } if procedure == "add"
    ));
    assert!(matches!(device.sink.events[1], RpcEvent::Failed(_)));
}
