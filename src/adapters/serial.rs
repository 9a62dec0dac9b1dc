//! Serial console transport.
//!
//! A dedicated reader thread pulls bytes from the console (stdin, which is
//! UART0 through the ESP-IDF VFS on the board) and pushes them into a
//! bounded `embassy-sync` channel.  The control loop drains the channel
//! without blocking and feeds a
//! [`LineResponder`](crate::console::LineResponder); replies go back out on
//! stdout.
//!
//! ```text
//!  ┌──────────────┐ ConsoleQueue ┌──────────────────────────┐
//!  │ reader thread│ ───────────▶ │ control loop: pop()      │
//!  │ stdin.read() │  (64 bytes)  │  -> LineResponder -> out │
//!  └──────────────┘              └──────────────────────────┘
//! ```
//!
//! When the loop falls behind, the queue fills and further bytes are
//! dropped at the producer.  Memory use stays fixed whatever the input
//! rate.

use std::io::{self, Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{info, warn};

use crate::console::{LineResponder, Response};

/// Bytes the queue holds before input is dropped.
pub const CONSOLE_QUEUE_DEPTH: usize = 64;

const READ_CHUNK: usize = 64;
const READER_STACK_SIZE: usize = 4 * 1024;

// ───────────────────────────────────────────────────────────────
// ConsoleQueue
// ───────────────────────────────────────────────────────────────

struct Shared {
    channel: Channel<CriticalSectionRawMutex, u8, CONSOLE_QUEUE_DEPTH>,
    dropped: AtomicU32,
}

/// Bounded byte queue from the reader thread to the control loop.
/// Clones share the same queue.
#[derive(Clone)]
pub struct ConsoleQueue {
    shared: Arc<Shared>,
}

impl Default for ConsoleQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleQueue {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                channel: Channel::new(),
                dropped: AtomicU32::new(0),
            }),
        }
    }

    /// Enqueue one byte.  Returns `false` (and counts the byte as dropped)
    /// when the queue is full.
    pub fn push(&self, byte: u8) -> bool {
        if self.shared.channel.try_send(byte).is_ok() {
            return true;
        }
        self.shared.dropped.fetch_add(1, Ordering::Relaxed);
        false
    }

    /// Dequeue one byte, if any.  Never blocks.
    pub fn pop(&self) -> Option<u8> {
        self.shared.channel.try_receive().ok()
    }

    /// Bytes currently queued.
    pub fn len(&self) -> usize {
        self.shared.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.channel.is_empty()
    }

    /// Bytes dropped because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    /// No other handle is left: the consumer has gone away.
    fn is_orphaned(&self) -> bool {
        Arc::strong_count(&self.shared) == 1
    }
}

// ───────────────────────────────────────────────────────────────
// Reader thread
// ───────────────────────────────────────────────────────────────

/// Spawn the console reader and return the consuming end.
pub fn spawn_console_reader() -> io::Result<ConsoleQueue> {
    spawn_reader(io::stdin())
}

/// Spawn a reader thread over any byte source.  The thread exits when the
/// source reaches EOF or every other queue handle is dropped.
pub fn spawn_reader<R: Read + Send + 'static>(mut source: R) -> io::Result<ConsoleQueue> {
    let queue = ConsoleQueue::new();
    let producer = queue.clone();
    thread::Builder::new()
        .name("console-rx".into())
        .stack_size(READER_STACK_SIZE)
        .spawn(move || {
            let mut buf = [0u8; READ_CHUNK];
            loop {
                if producer.is_orphaned() {
                    return;
                }
                match source.read(&mut buf) {
                    Ok(0) => {
                        info!("console: input closed");
                        return;
                    }
                    Ok(n) => {
                        let lost = buf[..n].iter().filter(|&&b| !producer.push(b)).count();
                        if lost > 0 {
                            warn!("console: queue full, dropped {} bytes", lost);
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => {
                        warn!("console: read failed: {}", e);
                        return;
                    }
                }
            }
        })?;
    Ok(queue)
}

// ───────────────────────────────────────────────────────────────
// Console
// ───────────────────────────────────────────────────────────────

/// Console front-end owned by the control loop.
pub struct Console<W: Write, const N: usize> {
    queue: ConsoleQueue,
    responder: LineResponder<N>,
    out: W,
}

impl<W: Write, const N: usize> Console<W, N> {
    pub fn new(queue: ConsoleQueue, out: W) -> Self {
        Self {
            queue,
            responder: LineResponder::new(),
            out,
        }
    }

    /// Drain every byte received so far and answer complete lines.
    /// Never blocks.  Returns the number of responses written.
    pub fn service(&mut self) -> usize {
        let mut answered = 0;
        while let Some(b) = self.queue.pop() {
            if let Some(resp) = self.responder.feed(b) {
                self.reply(resp);
                answered += 1;
            }
        }
        answered
    }

    fn reply(&mut self, resp: Response) {
        let res = writeln!(self.out, "{}", resp.as_str()).and_then(|()| self.out.flush());
        if let Err(e) = res {
            warn!("console: write failed: {}", e);
        }
    }

    /// Output writer (tests inspect the captured replies).
    pub fn output(&self) -> &W {
        &self.out
    }
}
