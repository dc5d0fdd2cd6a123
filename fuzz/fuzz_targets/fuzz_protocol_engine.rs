//! Fuzz target: `ProtocolEngine::poll`
//!
//! Replays arbitrary stove output through the AT engine with a clock
//! that advances on every chunk. The engine must never panic and must
//! only ever answer with the scripted reply vocabulary.
//!
//! cargo fuzz run fuzz_protocol_engine

#![no_main]

use std::collections::VecDeque;

use libfuzzer_sys::fuzz_target;
use rikastove::app::events::StoveEvent;
use rikastove::app::ports::EventSink;
use rikastove::config::StoveConfig;
use rikastove::protocol::{ProtocolEngine, SessionSettings, Transport};

struct Link {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

impl Transport for Link {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let n = buf.len().min(self.rx.len()).min(7);
        for slot in buf.iter_mut().take(n) {
            *slot = self.rx.pop_front().unwrap_or(0);
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        self.tx.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn available(&self) -> bool {
        !self.rx.is_empty()
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &StoveEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let mut engine = ProtocolEngine::new(SessionSettings::from_config(&StoveConfig::default()));
    let mut link = Link {
        rx: data.iter().copied().collect(),
        tx: Vec::new(),
    };

    let mut now_ms = 0u64;
    for _ in 0..=data.len() {
        let _ = engine.poll(&mut link, now_ms, &mut Discard);
        now_ms += 500;
        if link.rx.is_empty() {
            break;
        }
    }
    assert!(link.tx.iter().all(|&b| b == b'\r' || b == b'\n' || (0x20..0x7F).contains(&b)));
});
