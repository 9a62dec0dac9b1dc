//! Line-oriented console responder.
//!
//! Bytes arrive one at a time from the serial console.  The responder
//! accumulates them into a bounded line buffer and answers liveness pings:
//!
//! ```text
//!  "p\n"    -> "pong"
//!  "ping\r" -> "pong"
//!  other    -> (ignored)
//! ```
//!
//! A line ends at `\r` or `\n`; empty lines are ignored, so `\r\n` counts
//! once.  A line longer than the buffer is discarded whole: everything up
//! to the next terminator is dropped.  The responder owns no control state.

use heapless::Vec;
use log::debug;

/// Default line buffer capacity (bytes).
pub const DEFAULT_LINE_CAPACITY: usize = 32;

/// A reply to a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Pong,
}

impl Response {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pong => "pong",
        }
    }
}

/// Map one complete line (terminator stripped) to a response.
pub fn respond(line: &[u8]) -> Option<Response> {
    match line.trim_ascii() {
        b"p" | b"ping" => Some(Response::Pong),
        _ => None,
    }
}

/// Streaming line accumulator.
pub struct LineResponder<const N: usize = DEFAULT_LINE_CAPACITY> {
    line: Vec<u8, N>,
    /// Current line overflowed; drop bytes until the next terminator.
    discarding: bool,
}

impl<const N: usize> Default for LineResponder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineResponder<N> {
    pub const fn new() -> Self {
        Self {
            line: Vec::new(),
            discarding: false,
        }
    }

    /// Feed one byte.  Returns a response when it completes a recognised line.
    pub fn feed(&mut self, byte: u8) -> Option<Response> {
        if byte == b'\r' || byte == b'\n' {
            let response = if self.discarding {
                debug!("console: overlong line discarded");
                None
            } else {
                respond(&self.line)
            };
            self.line.clear();
            self.discarding = false;
            return response;
        }

        if !self.discarding && self.line.push(byte).is_err() {
            self.line.clear();
            self.discarding = true;
        }
        None
    }

    /// Feed a chunk of bytes, calling `on_response` for every reply.
    pub fn feed_all(&mut self, data: &[u8], mut on_response: impl FnMut(Response)) {
        for &b in data {
            if let Some(r) = self.feed(b) {
                on_response(r);
            }
        }
    }

    /// Bytes buffered for the current, unterminated line.
    pub fn pending(&self) -> usize {
        self.line.len()
    }
}
