//! CR-terminated line framer.
//!
//! The stove terminates every AT command with a carriage return. The
//! framer accumulates incoming bytes and yields one line per CR. This
//! handles partial reads gracefully: a single `Transport::read` call may
//! return part of a line, or several lines concatenated.
//!
//! ```text
//!  A T + C M G R = 1 \r  A T E 0 \r
//!  └──────────────┘      └─────┘
//!     line #1            line #2
//! ```
//!
//! Bytes `>= 0x7F` are stored as `?` so a completed line is always plain
//! ASCII and safe to log. A line longer than [`LINE_CAPACITY`] without a
//! terminator is discarded and accumulation restarts from empty.

use heapless::Vec;

/// Maximum line length (protects against a stove that never sends CR).
pub const LINE_CAPACITY: usize = 255;

pub(crate) const ASCII_CR: u8 = 0x0D;

/// Replace non-ASCII bytes so buffered text is always printable.
pub(crate) fn sanitize(byte: u8) -> u8 {
    if byte >= 0x7F { b'?' } else { byte }
}

/// Streaming line decoder.
pub struct LineFramer {
    buf: Vec<u8, LINE_CAPACITY>,
    overflows: u32,
}

impl LineFramer {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflows: 0,
        }
    }

    /// Feed one byte into the framer.
    ///
    /// Returns `Some(line)` when `byte` is a CR. The terminator is not
    /// part of the line.
    pub fn feed(&mut self, byte: u8) -> Option<String> {
        if byte == ASCII_CR {
            let line = self.buf.iter().map(|&b| b as char).collect();
            self.buf.clear();
            return Some(line);
        }

        if self.buf.is_full() {
            // Overflowing partial line is lost.
            self.buf.clear();
            self.overflows = self.overflows.wrapping_add(1);
        }
        // Cannot fail: the buffer was just cleared if it was full.
        let _ = self.buf.push(sanitize(byte));
        None
    }

    /// Number of bytes accumulated since the last terminator.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Total partial lines discarded because they overran the buffer.
    pub fn overflows(&self) -> u32 {
        self.overflows
    }

    /// Drop any partial line (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.buf.clear();
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}
