//! Integration tests against a scripted sensor
//!
//! Each test wires a [`Sensor`] to one end of an in-memory duplex stream
//! and plays a fixed reply script from the other end, then asserts on the
//! operation outcome and on the exact requests the driver put on the wire.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::task::JoinHandle;

use as108m::{
    FlagKind, Frame, Prompt, RetryPolicy, SearchResult, Sensor, SensorEvent, Status,
    StreamTransport,
};
use as108m_core::constants::DEFAULT_ADDRESS;

const GET_IMAGE: u8 = 0x01;
const GET_CHAR: u8 = 0x02;
const REG_MODEL: u8 = 0x05;
const STORE_CHAR: u8 = 0x06;
const CANCEL: u8 = 0x30;

/// Encode a reply frame from the device at the default address.
fn ack(payload: &[u8]) -> Vec<u8> {
    ack_from(DEFAULT_ADDRESS, payload)
}

/// Encode a reply frame from a specific device address.
fn ack_from(address: u32, payload: &[u8]) -> Vec<u8> {
    Frame::new(address, FlagKind::Ack, payload.to_vec())
        .unwrap()
        .encode()
        .to_vec()
}

/// Build a session with short timings suitable for tests.
fn sensor(host: DuplexStream) -> Sensor {
    Sensor::new(StreamTransport::new(host).with_settle_delay(Duration::from_millis(2)))
        .with_timeout(Duration::from_millis(300))
        .with_retry_policy(RetryPolicy {
            max_attempts: 5,
            delay: Duration::from_millis(2),
        })
}

/// Answer one request per scripted reply, collecting the raw requests.
fn scripted_device(mut device: DuplexStream, replies: Vec<Vec<u8>>) -> JoinHandle<Vec<Vec<u8>>> {
    tokio::spawn(async move {
        let mut requests = Vec::new();
        for reply in replies {
            let mut buf = vec![0u8; 64];
            let n = device.read(&mut buf).await.expect("device read");
            if n == 0 {
                break;
            }
            buf.truncate(n);
            requests.push(buf);
            device.write_all(&reply).await.expect("device write");
        }
        requests
    })
}

/// Instruction byte of a captured request frame.
fn instruction_of(request: &[u8]) -> u8 {
    request[9]
}

#[tokio::test]
async fn probe_is_idempotent() {
    let (host, device) = duplex(64);
    let handle = scripted_device(device, vec![ack(&[0x00]), ack(&[0x00])]);
    let mut sensor = sensor(host);

    sensor.probe().await.expect("first probe");
    sensor.probe().await.expect("second probe");

    let requests = handle.await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| instruction_of(r) == CANCEL));
}

#[tokio::test]
async fn probe_purges_power_up_byte() {
    let (host, mut device) = duplex(64);
    // The sensor announces itself with 0x55 once after power-up
    device.write_all(&[0x55]).await.unwrap();
    let handle = scripted_device(device, vec![ack(&[0x00])]);

    sensor(host).probe().await.expect("probe");

    let requests = handle.await.unwrap();
    assert_eq!(requests.len(), 1);
    // The stale byte must not reach the request stream
    assert_eq!(requests[0][0..2], [0xEF, 0x01]);
}

#[tokio::test]
async fn search_decodes_hit() {
    let (host, device) = duplex(64);
    let handle = scripted_device(
        device,
        vec![
            ack(&[0x00]),                               // image captured
            ack(&[0x00]),                               // feature encoded
            ack(&[0x00, 0x00, 0x07, 0x00, 0xB4]),       // hit: page 7, score 180
        ],
    );
    let mut sensor = sensor(host);

    let result = sensor.search().await.expect("search");
    assert_eq!(result, SearchResult::hit(7, 180));

    let requests = handle.await.unwrap();
    // Fixed scan range: buffer 1, start page 0, 0x28 slots
    let search_request = &requests[2];
    assert_eq!(instruction_of(search_request), 0x04);
    assert_eq!(search_request[10..15], [0x01, 0x00, 0x00, 0x00, 0x28]);
}

#[tokio::test]
async fn search_unmatched_is_not_an_error() {
    let (host, device) = duplex(64);
    let _handle = scripted_device(
        device,
        vec![ack(&[0x00]), ack(&[0x00]), ack(&[0x09])],
    );

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let mut sensor = sensor(host).on_event(move |e| sink.lock().unwrap().push(e));

    let result = sensor.search().await.expect("search must not fail");
    assert!(!result.matched);
    assert_eq!(result.status, Status::NotFound);

    assert!(events
        .lock()
        .unwrap()
        .contains(&SensorEvent::Fault(Status::NotFound)));
}

#[tokio::test]
async fn search_retries_capture_while_no_finger() {
    let (host, device) = duplex(64);
    let handle = scripted_device(
        device,
        vec![
            ack(&[0x02]), // no finger
            ack(&[0x02]), // no finger
            ack(&[0x00]), // captured
            ack(&[0x00]),
            ack(&[0x00, 0x00, 0x01, 0x00, 0x10]),
        ],
    );
    let mut sensor = sensor(host);

    sensor.search().await.expect("search");

    let requests = handle.await.unwrap();
    let captures = requests
        .iter()
        .filter(|r| instruction_of(r) == GET_IMAGE)
        .count();
    assert_eq!(captures, 3);
}

#[tokio::test]
async fn capture_poll_is_bounded() {
    let (host, device) = duplex(64);
    let _handle = scripted_device(device, vec![ack(&[0x02]), ack(&[0x02])]);
    let mut sensor = sensor(host).with_retry_policy(RetryPolicy {
        max_attempts: 2,
        delay: Duration::from_millis(1),
    });

    let err = sensor.search().await.expect_err("poll must expire");
    assert_eq!(err.status(), Status::NoFinger);
}

#[tokio::test]
async fn enroll_runs_the_full_sample_script() {
    let (host, device) = duplex(64);

    // Per sample: no-finger x2, captured, encoded, removal confirmed
    let mut replies = Vec::new();
    for _ in 0..3 {
        replies.extend([
            ack(&[0x02]),
            ack(&[0x02]),
            ack(&[0x00]),
            ack(&[0x00]),
            ack(&[0x02]),
        ]);
    }
    replies.push(ack(&[0x00])); // model merged
    replies.push(ack(&[0x00])); // template stored
    let handle = scripted_device(device, replies);

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let mut sensor = sensor(host).on_event(move |e| sink.lock().unwrap().push(e));

    sensor.enroll(9, 3).await.expect("enroll");

    let requests = handle.await.unwrap();
    let instructions: Vec<u8> = requests.iter().map(|r| instruction_of(r)).collect();

    let mut expected = Vec::new();
    for _ in 0..3 {
        expected.extend([GET_IMAGE, GET_IMAGE, GET_IMAGE, GET_CHAR, GET_IMAGE]);
    }
    expected.extend([REG_MODEL, STORE_CHAR]);
    assert_eq!(instructions, expected);

    // Feature buffers follow the sample index
    let encode_buffers: Vec<u8> = requests
        .iter()
        .filter(|r| instruction_of(r) == GET_CHAR)
        .map(|r| r[10])
        .collect();
    assert_eq!(encode_buffers, [1, 2, 3]);

    // Template stored from buffer 1 at the requested page
    let store = requests.last().unwrap();
    assert_eq!(store[10..13], [0x01, 0x00, 0x09]);

    // Prompts alternate touch/remove for every sample, no faults
    let seen = events.lock().unwrap();
    let expected_prompts: Vec<SensorEvent> = (0..3)
        .flat_map(|_| {
            [
                SensorEvent::Prompt(Prompt::TouchSensor),
                SensorEvent::Prompt(Prompt::RemoveFinger),
            ]
        })
        .collect();
    assert_eq!(*seen, expected_prompts);
}

#[tokio::test]
async fn enroll_aborts_on_encode_fault_without_further_samples() {
    let (host, device) = duplex(64);
    let handle = scripted_device(
        device,
        vec![
            // Sample 1 completes
            ack(&[0x02]),
            ack(&[0x02]),
            ack(&[0x00]),
            ack(&[0x00]),
            ack(&[0x02]),
            // Sample 2: capture succeeds, encode reports too few minutiae
            ack(&[0x00]),
            ack(&[0x07]),
        ],
    );
    let mut sensor = sensor(host);

    let err = sensor.enroll(4, 3).await.expect_err("enroll must abort");
    assert_eq!(err.status(), Status::TooFewMinutiae);

    let requests = handle.await.unwrap();
    assert_eq!(requests.len(), 7);
    assert_eq!(instruction_of(requests.last().unwrap()), GET_CHAR);
}

#[tokio::test]
async fn match_finger_echoes_the_queried_page() {
    let (host, device) = duplex(64);
    let handle = scripted_device(
        device,
        vec![
            ack(&[0x00]),             // captured
            ack(&[0x00]),             // encoded
            ack(&[0x00]),             // template loaded
            ack(&[0x00, 0x00, 0x5A]), // matched, score 90
        ],
    );
    let mut sensor = sensor(host);

    let result = sensor.match_finger(7).await.expect("match");
    assert_eq!(result, SearchResult::hit(7, 90));

    let requests = handle.await.unwrap();
    // Stored template loads into buffer 2 from the queried page
    let load = &requests[2];
    assert_eq!(instruction_of(load), 0x07);
    assert_eq!(load[10..13], [0x02, 0x00, 0x07]);
}

#[tokio::test]
async fn match_finger_unmatched_is_not_an_error() {
    let (host, device) = duplex(64);
    let _handle = scripted_device(
        device,
        vec![ack(&[0x00]), ack(&[0x00]), ack(&[0x00]), ack(&[0x08])],
    );
    let mut sensor = sensor(host);

    let result = sensor.match_finger(3).await.expect("match must not fail");
    assert!(!result.matched);
    assert_eq!(result.status, Status::NoMatch);
}

#[tokio::test]
async fn delete_and_clear_report_their_fault_codes() {
    let (host, device) = duplex(64);
    let handle = scripted_device(device, vec![ack(&[0x00]), ack(&[0x11])]);
    let mut sensor = sensor(host);

    sensor.delete_template(3).await.expect("delete");
    let err = sensor.empty_database().await.expect_err("clear must fail");
    assert_eq!(err.status(), Status::ClearFailed);

    let requests = handle.await.unwrap();
    assert_eq!(instruction_of(&requests[0]), 0x0C);
    assert_eq!(requests[0][10..14], [0x00, 0x03, 0x00, 0x01]);
    assert_eq!(instruction_of(&requests[1]), 0x0D);
}

/// A parameter block reply with known values at the documented offsets.
fn parameter_block() -> Vec<u8> {
    ack(&[
        0x00, // confirmation
        0x00, 0x00, // status register
        0x00, 0x09, // system id
        0x00, 0x64, // database size: 100
        0x00, 0x03, // security level: 3
        0x11, 0x22, 0x33, 0x44, // device address
        0x00, 0x02, // packet code
        0x00, 0x06, // baud multiplier: 57600 bps
    ])
}

#[tokio::test]
async fn parameter_reads_use_fixed_offsets() {
    let (host, device) = duplex(64);
    let _handle = scripted_device(device, vec![parameter_block(), parameter_block()]);
    let mut sensor = sensor(host);

    let params = sensor.read_parameters().await.expect("read parameters");
    assert_eq!(params.database_size, 100);
    assert_eq!(params.security_level, 3);
    assert_eq!(params.address, 0x1122_3344);
    assert_eq!(params.baud_rate(), 57_600);

    assert_eq!(sensor.device_address().await.unwrap(), 0x1122_3344);
}

#[tokio::test]
async fn parameter_read_failure_yields_data_error() {
    let (host, device) = duplex(64);
    let _handle = scripted_device(device, vec![ack(&[0x01])]);
    let mut sensor = sensor(host);

    let size = sensor.database_size().await;
    assert_eq!(
        size.as_ref().expect_err("must fail").status(),
        Status::PacketReceiveError
    );
    // Callers wanting the legacy 0 sentinel still get it
    assert_eq!(size.unwrap_or_default(), 0);
}

#[tokio::test]
async fn reply_with_wrong_address_is_rejected_but_retained() {
    let (host, device) = duplex(64);
    let _handle = scripted_device(device, vec![ack_from(0x0000_0001, &[0x00])]);
    let mut sensor = sensor(host);

    let err = sensor.probe().await.expect_err("probe must fail");
    assert_eq!(err.status(), Status::AddressMismatch);
    assert_eq!(sensor.replied_address(), Some(0x0000_0001));
}

#[tokio::test]
async fn corrupted_checksum_is_rejected() {
    let (host, device) = duplex(64);
    let mut reply = ack(&[0x00]);
    let last = reply.len() - 1;
    reply[last] ^= 0xFF;
    let _handle = scripted_device(device, vec![reply]);
    let mut sensor = sensor(host);

    let err = sensor.probe().await.expect_err("probe must fail");
    assert_eq!(err.status(), Status::BadChecksum);
}

#[tokio::test]
async fn silent_device_times_out() {
    let (host, _device) = duplex(64);
    let mut sensor = sensor(host).with_timeout(Duration::from_millis(50));

    let err = sensor.probe().await.expect_err("probe must time out");
    assert_eq!(err.status(), Status::ReceiveTimeout);
}

#[tokio::test]
async fn unknown_confirmation_maps_to_unknown_error() {
    let (host, device) = duplex(64);
    // Database-full is not a fault the probe step knows about
    let _handle = scripted_device(device, vec![ack(&[0x1F])]);
    let mut sensor = sensor(host);

    let err = sensor.probe().await.expect_err("probe must fail");
    assert_eq!(err.status(), Status::UnknownError);
}

#[tokio::test]
async fn set_address_follows_the_device() {
    let (host, device) = duplex(64);
    let handle = scripted_device(
        device,
        vec![
            ack(&[0x00]),                        // set-address ack at the old address
            ack_from(0x0102_0304, &[0x00]),      // probe ack at the new address
        ],
    );
    let mut sensor = sensor(host);

    sensor.set_address(0x0102_0304).await.expect("set address");
    assert_eq!(sensor.target_address(), 0x0102_0304);

    sensor.probe().await.expect("probe at new address");

    let requests = handle.await.unwrap();
    assert_eq!(instruction_of(&requests[0]), 0x15);
    assert_eq!(requests[0][10..14], [0x01, 0x02, 0x03, 0x04]);
}

#[tokio::test]
async fn register_writes_carry_register_and_value() {
    let (host, device) = duplex(64);
    let handle = scripted_device(device, vec![ack(&[0x00]), ack(&[0x00])]);
    let mut sensor = sensor(host);

    sensor.set_match_threshold(4).await.expect("set threshold");
    sensor
        .set_baud_rate(as108m::BaudRate::B57600)
        .await
        .expect("set baud");

    let requests = handle.await.unwrap();
    assert_eq!(instruction_of(&requests[0]), 0x0E);
    assert_eq!(requests[0][10..12], [0x05, 0x04]);
    assert_eq!(requests[1][10..12], [0x04, 0x06]);
}

#[tokio::test]
async fn local_validation_rejects_without_touching_the_wire() {
    let (host, device) = duplex(64);
    let handle = scripted_device(device, vec![]);
    let mut sensor = sensor(host);

    assert!(sensor.enroll(1, 0).await.is_err());
    assert!(sensor.enroll(1, 6).await.is_err());
    assert!(sensor.set_match_threshold(9).await.is_err());

    drop(sensor);
    assert!(handle.await.unwrap().is_empty());
}
