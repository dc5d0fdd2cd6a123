//! Fuzz target: `StoveReply::parse`
//!
//! Arbitrary status bodies must always classify without panicking, and
//! the classification must be stable under surrounding whitespace.
//!
//! cargo fuzz run fuzz_stove_reply

#![no_main]

use libfuzzer_sys::fuzz_target;
use rikastove::protocol::reply::StoveReply;

fuzz_target!(|data: &[u8]| {
    let text: String = data.iter().map(|&b| b as char).collect();
    let reply = StoveReply::parse(&text);

    let padded = format!("\r\n{text}\r\n");
    assert_eq!(StoveReply::parse(&padded), reply);
});
