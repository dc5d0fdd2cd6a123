//! Mock adapters for integration tests.
//!
//! A scripted serial link stands in for the stove's UART, and the other
//! ports record every call so tests can assert on the full history.

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use rikastove::app::events::StoveEvent;
use rikastove::app::ports::{ClimatePort, Clock, EventSink, StorageError, StoragePort};
use rikastove::climate::ClimateState;
use rikastove::protocol::Transport;

// ── ScriptedLink ──────────────────────────────────────────────

/// In-memory serial link. `rx` holds what the stove has sent and not yet
/// been read; `tx` collects everything the bridge wrote.
pub struct ScriptedLink {
    rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    /// Upper bound per `read` call, to exercise partial reads.
    pub max_read: usize,
    /// Number of individual `write` calls seen.
    pub writes: usize,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl ScriptedLink {
    pub fn new() -> Self {
        Self {
            rx: VecDeque::new(),
            tx: Vec::new(),
            max_read: usize::MAX,
            writes: 0,
            fail_writes: false,
        }
    }

    /// Queue bytes as if the stove had sent them.
    pub fn stove_sends(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    pub fn unread(&self) -> usize {
        self.rx.len()
    }

    /// Everything written since the last call, as text.
    pub fn take_output(&mut self) -> String {
        String::from_utf8(std::mem::take(&mut self.tx)).expect("bridge wrote non-UTF-8")
    }
}

impl Default for ScriptedLink {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ScriptedLink {
    type Error = &'static str;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.rx.len()).min(self.max_read);
        for slot in buf.iter_mut().take(n) {
            *slot = self.rx.pop_front().unwrap_or_default();
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        if self.fail_writes {
            return Err("link down");
        }
        self.writes += 1;
        self.tx.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn available(&self) -> bool {
        !self.rx.is_empty()
    }
}

// ── ManualClock ───────────────────────────────────────────────

/// Clock advanced by hand. Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock(Rc<Cell<u64>>);

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

// ── MemStore ──────────────────────────────────────────────────

#[derive(Default, Clone)]
pub struct MemStore {
    store: HashMap<String, Vec<u8>>,
    pub writes: usize,
}

#[allow(dead_code)]
impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoragePort for MemStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        match self.store.get(&format!("{}::{}", namespace, key)) {
            Some(v) => {
                let n = v.len().min(buf.len());
                buf[..n].copy_from_slice(&v[..n]);
                Ok(n)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.writes += 1;
        self.store
            .insert(format!("{}::{}", namespace, key), data.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        self.store.remove(&format!("{}::{}", namespace, key));
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store.contains_key(&format!("{}::{}", namespace, key))
    }
}

// ── Recording climate port ────────────────────────────────────

#[derive(Default)]
pub struct RecordingClimate {
    pub published: Vec<ClimateState>,
}

#[allow(dead_code)]
impl RecordingClimate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&ClimateState> {
        self.published.last()
    }
}

impl ClimatePort for RecordingClimate {
    fn publish_state(&mut self, state: &ClimateState) {
        self.published.push(*state);
    }
}

// ── Recording event sink ──────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<StoveEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&StoveEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &StoveEvent) {
        self.events.push(event.clone());
    }
}
