//! Fuzz target: `LineResponder::feed`
//!
//! Drives arbitrary byte sequences into the console line responder and
//! asserts that it never panics, never buffers past its capacity, and
//! still answers a clean ping afterwards.
//!
//! cargo fuzz run fuzz_console_line

#![no_main]

use libfuzzer_sys::fuzz_target;
use solarpump::console::{DEFAULT_LINE_CAPACITY, LineResponder, Response, respond};

fuzz_target!(|data: &[u8]| {
    let mut responder = LineResponder::<DEFAULT_LINE_CAPACITY>::new();

    for &b in data {
        if let Some(resp) = responder.feed(b) {
            assert_eq!(resp, Response::Pong);
        }
        assert!(responder.pending() <= DEFAULT_LINE_CAPACITY);
    }

    // Whatever came before, a fresh line must be answered.
    responder.feed(b'\n');
    assert_eq!(responder.pending(), 0);
    let mut replies = 0;
    responder.feed_all(b"p\n", |_| replies += 1);
    assert_eq!(replies, 1);

    // The stateless matcher takes any input.
    let _ = respond(data);
});
