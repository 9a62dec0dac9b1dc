//! Console responder integration tests.
//!
//! Drives [`Console`] through real channels and reader threads, and checks
//! that liveness pings interleaved with control cycles never disturb the
//! controller.

use std::io::Cursor;
use std::thread;
use std::time::{Duration, Instant};

use crate::mock_hw::{ManualClock, MockLoop, RecordingSink};

use solarpump::adapters::serial::{CONSOLE_QUEUE_DEPTH, Console, ConsoleQueue, spawn_reader};
use solarpump::app::ports::Clock;
use solarpump::app::service::ControlService;
use solarpump::config::ControllerConfig;
use solarpump::console::{LineResponder, Response};

type TestConsole = Console<Vec<u8>, 32>;

/// Service the console until `want` replies are written or 2 s pass.
fn drain(console: &mut TestConsole, want: usize) -> usize {
    let deadline = Instant::now() + Duration::from_secs(2);
    let mut total = 0;
    while total < want && Instant::now() < deadline {
        total += console.service();
        thread::sleep(Duration::from_millis(1));
    }
    total
}

#[test]
fn line_split_across_service_calls_is_answered_once() {
    let queue = ConsoleQueue::new();
    let mut console: TestConsole = Console::new(queue.clone(), Vec::new());

    for &b in b"pi" {
        assert!(queue.push(b));
    }
    assert_eq!(console.service(), 0);

    for &b in b"ng\r\n" {
        assert!(queue.push(b));
    }
    assert_eq!(console.service(), 1);
    assert_eq!(console.output().as_slice(), b"pong\n");
}

#[test]
fn noise_and_overlong_lines_get_no_reply() {
    let mut input = b"status\nPING\n".to_vec();
    input.extend(std::iter::repeat_n(b'p', 100));
    input.extend_from_slice(b"\np\n");

    let queue = ConsoleQueue::new();
    let mut console: TestConsole = Console::new(queue.clone(), Vec::new());
    let mut replies = 0;
    for chunk in input.chunks(CONSOLE_QUEUE_DEPTH) {
        for &b in chunk {
            assert!(queue.push(b));
        }
        replies += console.service();
    }
    assert_eq!(replies, 1);
    assert_eq!(console.output().as_slice(), b"pong\n");
}

#[test]
fn closed_input_stops_servicing_quietly() {
    let queue = spawn_reader(Cursor::new(b"p\n".to_vec())).unwrap();
    let mut console: TestConsole = Console::new(queue, Vec::new());
    assert_eq!(drain(&mut console, 1), 1);
    thread::sleep(Duration::from_millis(20));
    for _ in 0..3 {
        assert_eq!(console.service(), 0);
    }
}

#[test]
fn pings_between_cycles_leave_control_untouched() {
    let queue = ConsoleQueue::new();
    let mut console: TestConsole = Console::new(queue.clone(), Vec::new());

    let mut hw = MockLoop::new(50.0, 55.0, 30.0, 70.0);
    let mut sink = RecordingSink::new();
    let clock = ManualClock::new();
    let mut svc = ControlService::new(ControllerConfig::basic(), clock.now());
    svc.start(&mut hw, &mut sink);

    let mut replies = 0;
    for _ in 0..20 {
        for &b in b"p\n" {
            assert!(queue.push(b));
        }
        replies += console.service();
        svc.poll(clock.advance_secs(5), &mut hw, &mut sink);
    }

    assert_eq!(replies, 20);
    assert_eq!(svc.metrics().cycles, 10);
    assert_eq!(svc.metrics().switches, 0);
    assert_eq!(hw.reads, 10 * 4);
}

#[test]
fn responder_handles_mixed_terminators() {
    let mut r = LineResponder::<8>::new();
    let mut out = Vec::new();
    r.feed_all(b"p\r\n\r\nping\n\n\rp\r", |resp| out.push(resp));
    assert_eq!(out, [Response::Pong; 3]);
    assert_eq!(r.pending(), 0);
}

#[test]
fn flood_while_loop_is_busy_keeps_queue_bounded_and_recovers() {
    let queue = ConsoleQueue::new();
    let mut console: TestConsole = Console::new(queue.clone(), Vec::new());

    // The loop is busy with a cycle while a burst arrives.
    let accepted = (0..10_000).filter(|_| queue.push(b'x')).count();
    assert_eq!(accepted, CONSOLE_QUEUE_DEPTH);
    assert_eq!(queue.len(), CONSOLE_QUEUE_DEPTH);
    assert_eq!(queue.dropped() as usize, 10_000 - CONSOLE_QUEUE_DEPTH);

    // The overflowing line is discarded; the next one is answered.
    assert_eq!(console.service(), 0);
    assert!(queue.is_empty());
    for &b in b"\nping\n" {
        assert!(queue.push(b));
    }
    assert_eq!(console.service(), 1);
    assert_eq!(console.output().as_slice(), b"pong\n");
}
