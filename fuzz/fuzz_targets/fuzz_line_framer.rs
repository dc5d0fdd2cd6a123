//! Fuzz target: `LineFramer::feed`
//!
//! Drives arbitrary byte sequences into the line framer and asserts that
//! it never panics, never yields a line longer than its capacity, and
//! only ever yields printable-safe bytes.
//!
//! cargo fuzz run fuzz_line_framer

#![no_main]

use libfuzzer_sys::fuzz_target;
use rikastove::protocol::framer::{LINE_CAPACITY, LineFramer};

fuzz_target!(|data: &[u8]| {
    let mut framer = LineFramer::new();

    for &byte in data {
        if let Some(line) = framer.feed(byte) {
            assert!(line.len() <= LINE_CAPACITY, "line exceeds LINE_CAPACITY");
            assert!(line.bytes().all(|b| b < 0x7F), "unsanitized byte in line");
            assert!(!line.contains('\r'), "terminator leaked into line");
        }
        assert!(framer.pending() <= LINE_CAPACITY);
    }

    // After a reset the framer must accept bytes cleanly again.
    framer.reset();
    assert_eq!(framer.pending(), 0);
    for &byte in data {
        let _ = framer.feed(byte);
    }
});
