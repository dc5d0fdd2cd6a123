//! AT-command engine: emulates the GSM modem the stove believes it is
//! talking to.
//!
//! The stove drives the conversation; the engine only reacts. Each
//! CR-terminated line from the [`LineFramer`] is dispatched on its prefix:
//!
//! | Prefix                         | Reply                                          |
//! |--------------------------------|------------------------------------------------|
//! | `AT+CMGS`                      | `\r\n>` then read the status body up to Ctrl-Z |
//! | `AT+CMGR`                      | queued command as an SMS, or just `OK`         |
//! | `AT+CMGD`                      | pop the delivered command, `OK`                |
//! | `ATE0`, `AT+CNMI`, `AT+CMGF`   | `OK`                                           |
//! | empty, `\n`, Ctrl-Z, `\r`      | nothing                                        |
//! | anything else                  | `ERROR`                                        |
//!
//! The replies are byte-exact: the stove firmware parses them literally.
//!
//! Two transient sub-states replace the blocking waits of a naive
//! implementation, so the engine never spins inside a call:
//!
//! ```text
//!            AT+CMGS                        Ctrl-Z
//!   Idle ─────────────▶ AwaitingBody ───────────────▶ Idle
//!    │                      │ deadline / cancel
//!    │                      └───────────────────────▶ Idle
//!    │       AT+CMGR (command sent)         settle elapsed
//!    └────────────────▶ Holding ────────────────────▶ Idle
//! ```
//!
//! In `Holding` the engine leaves input unread so the stove has time to
//! act on the command before its next request is processed.

use heapless::{Deque, Vec as FixedVec};
use log::{debug, error, warn};

use crate::app::events::StoveEvent;
use crate::app::ports::EventSink;
use crate::config::{PHONE_NUMBER_LEN, PIN_CODE_LEN, StoveConfig};
use crate::diagnostics::ProtocolStats;
use crate::error::{Result, TransportError};

use super::framer::{ASCII_CR, LineFramer, sanitize};
use super::queue::CommandQueue;
use super::reply::StoveReply;
use super::transport::Transport;
use super::translate::StoveCommand;

pub const ASCII_LF: u8 = 0x0A;
/// Ctrl-Z, the SMS body terminator.
pub const ASCII_SUB: u8 = 0x1A;

/// Maximum status body length; the tail of a longer body is dropped.
pub const BODY_CAPACITY: usize = 255;

/// Bytes pulled from the transport per read call.
const READ_CHUNK: usize = 64;

/// Fixed timestamp of every synthesized SMS. The stove ignores it but
/// requires the field to be present.
const SMS_DATE: &str = "70/01/01";
const SMS_TIME: &str = "01:00:00";

/// Prompt reply to `AT+CMGS`, sent after the body was read.
const CMGS_REFERENCE: &str = "+CMGS : 01";

/// Engine sub-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Waiting for the next AT line.
    Idle,
    /// `>` was sent; collecting the status body until Ctrl-Z.
    AwaitingBody { deadline_ms: u64 },
    /// A command was delivered; input is left unread until `until_ms`.
    Holding { until_ms: u64 },
}

/// Classification of one framed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AtRequest {
    SendSms,
    ReadSms,
    DeleteSms,
    Setup,
    Ignored,
    Unknown,
}

impl AtRequest {
    fn classify(line: &str) -> Self {
        if line.starts_with("AT+CMGS") {
            Self::SendSms
        } else if line.starts_with("AT+CMGR") {
            Self::ReadSms
        } else if line.starts_with("AT+CMGD") {
            Self::DeleteSms
        } else if ["ATE0", "AT+CNMI", "AT+CMGF"]
            .iter()
            .any(|prefix| line.starts_with(prefix))
        {
            Self::Setup
        } else if matches!(line, "" | "\n" | "\x1A" | "\r") {
            Self::Ignored
        } else {
            Self::Unknown
        }
    }
}

/// Identity and timing the engine needs from the configuration.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub phone_number: heapless::String<PHONE_NUMBER_LEN>,
    pub pin_code: heapless::String<PIN_CODE_LEN>,
    pub body_timeout_ms: u64,
    pub read_settle_ms: u64,
}

impl SessionSettings {
    pub fn from_config(config: &StoveConfig) -> Self {
        Self {
            phone_number: config.phone_number.clone(),
            pin_code: config.pin_code.clone(),
            body_timeout_ms: u64::from(config.body_timeout_ms),
            read_settle_ms: u64::from(config.read_settle_ms),
        }
    }
}

/// The AT dispatcher plus its command queue.
pub struct ProtocolEngine {
    settings: SessionSettings,
    framer: LineFramer,
    queue: CommandQueue,
    state: EngineState,
    body: FixedVec<u8, BODY_CAPACITY>,
    body_overflowed: bool,
    /// Bytes read ahead of a `Holding` transition, replayed first.
    backlog: Deque<u8, READ_CHUNK>,
    /// A command was delivered and not yet deleted by the stove.
    query_pending: bool,
    /// Status replies parsed and not yet handed to the caller.
    completed: Vec<StoveReply>,
    stats: ProtocolStats,
}

impl ProtocolEngine {
    /// Create the engine with a telemetry request already queued, so the
    /// first exchange after reset makes the stove report its state.
    pub fn new(settings: SessionSettings) -> Self {
        let mut queue = CommandQueue::new();
        queue.push(StoveCommand::Telemetry.wire());

        Self {
            settings,
            framer: LineFramer::new(),
            queue,
            state: EngineState::Idle,
            body: FixedVec::new(),
            body_overflowed: false,
            backlog: Deque::new(),
            query_pending: false,
            completed: Vec::new(),
            stats: ProtocolStats::new(),
        }
    }

    // ── Queue access ──────────────────────────────────────────

    /// Append a wire command; returns the number of pending commands.
    pub fn enqueue(&mut self, wire: impl Into<String>) -> usize {
        self.queue.push(wire);
        self.queue.len()
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    // ── State queries ─────────────────────────────────────────

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Whether a delivered command is still awaiting `AT+CMGD`.
    pub fn query_pending(&self) -> bool {
        self.query_pending
    }

    pub fn stats(&self) -> &ProtocolStats {
        &self.stats
    }

    // ── Polling ───────────────────────────────────────────────

    /// Drain the transport and dispatch every completed line.
    ///
    /// Returns the status replies completed during this call, in order.
    /// On a transport error, replies parsed before the failure stay in
    /// the engine (see [`take_completed`](Self::take_completed)) and the
    /// unprocessed rest of the read chunk is kept for the next poll.
    pub fn poll<T: Transport>(
        &mut self,
        transport: &mut T,
        now_ms: u64,
        sink: &mut impl EventSink,
    ) -> Result<Vec<StoveReply>> {
        self.check_deadlines(now_ms, sink);
        self.drain(transport, now_ms, sink)?;
        Ok(self.take_completed())
    }

    /// Hand out status replies parsed but not yet returned by `poll`.
    pub fn take_completed(&mut self) -> Vec<StoveReply> {
        std::mem::take(&mut self.completed)
    }

    fn drain<T: Transport>(
        &mut self,
        transport: &mut T,
        now_ms: u64,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        while !self.is_holding() {
            let Some(byte) = self.backlog.pop_front() else {
                break;
            };
            self.process_byte(byte, transport, now_ms, sink)?;
        }

        let mut buf = [0u8; READ_CHUNK];
        while !self.is_holding() && self.backlog.is_empty() && transport.available() {
            let n = transport.read(&mut buf).map_err(|e| {
                warn!("AT: serial read failed: {:?}", e);
                TransportError::ReadFailed
            })?;
            if n == 0 {
                break;
            }
            for (i, &byte) in buf[..n].iter().enumerate() {
                if self.is_holding() {
                    self.defer(&buf[i..n]);
                    break;
                }
                if let Err(e) = self.process_byte(byte, transport, now_ms, sink) {
                    self.defer(&buf[i + 1..n]);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Keep bytes already read for the next pass. The backlog is empty
    /// whenever a fresh chunk is read, so a chunk always fits.
    fn defer(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            let _ = self.backlog.push_back(byte);
        }
    }

    /// Abort an in-progress status body wait. Returns `true` if a wait
    /// was actually aborted.
    pub fn cancel_body_wait(&mut self, sink: &mut impl EventSink) -> bool {
        if !matches!(self.state, EngineState::AwaitingBody { .. }) {
            return false;
        }
        warn!("AT: SMS body wait cancelled");
        self.abort_body();
        self.stats.body_cancels = self.stats.body_cancels.wrapping_add(1);
        sink.emit(&StoveEvent::BodyCancelled);
        true
    }

    /// Drop partial input and return to `Idle` (e.g. after a UART reset).
    /// Queued commands are kept.
    pub fn reset(&mut self) {
        self.framer.reset();
        self.backlog.clear();
        self.abort_body();
    }

    // ── Internal ──────────────────────────────────────────────

    fn is_holding(&self) -> bool {
        matches!(self.state, EngineState::Holding { .. })
    }

    fn check_deadlines(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        match self.state {
            EngineState::Holding { until_ms } if now_ms >= until_ms => {
                debug!("AT: settle time elapsed, resuming reads");
                self.state = EngineState::Idle;
            }
            EngineState::AwaitingBody { deadline_ms } if now_ms >= deadline_ms => {
                warn!(
                    "AT: no Ctrl-Z after {}ms, abandoning SMS body ({} bytes)",
                    self.settings.body_timeout_ms,
                    self.body.len()
                );
                self.abort_body();
                self.stats.body_timeouts = self.stats.body_timeouts.wrapping_add(1);
                sink.emit(&StoveEvent::BodyTimeout);
            }
            _ => {}
        }
    }

    fn abort_body(&mut self) {
        self.body.clear();
        self.body_overflowed = false;
        self.state = EngineState::Idle;
    }

    fn process_byte<T: Transport>(
        &mut self,
        byte: u8,
        transport: &mut T,
        now_ms: u64,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        if let EngineState::AwaitingBody { .. } = self.state {
            if byte == ASCII_SUB {
                let reply = self.finish_body(sink);
                self.completed.push(reply);
                send_retour(transport)?;
                send(transport, CMGS_REFERENCE.as_bytes())?;
                send_retour(transport)?;
                send_ok(transport)?;
                flush(transport)?;
            } else if self.body.push(sanitize(byte)).is_err() && !self.body_overflowed {
                warn!("AT: SMS body exceeds {} bytes, truncating", BODY_CAPACITY);
                self.body_overflowed = true;
                self.stats.body_overflows = self.stats.body_overflows.wrapping_add(1);
                sink.emit(&StoveEvent::BodyOverflow);
            }
            return Ok(());
        }

        let overflows = self.framer.overflows();
        let line = self.framer.feed(byte);
        if self.framer.overflows() != overflows {
            warn!("AT: line exceeds buffer without CR, discarding");
            self.stats.framer_overflows = self.stats.framer_overflows.wrapping_add(1);
            sink.emit(&StoveEvent::FramerOverflow);
        }

        match line {
            Some(line) => self.handle_line(&line, transport, now_ms, sink),
            None => Ok(()),
        }
    }

    fn handle_line<T: Transport>(
        &mut self,
        line: &str,
        transport: &mut T,
        now_ms: u64,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.stats.lines = self.stats.lines.wrapping_add(1);
        debug!("AT: received {:?}", line);

        match AtRequest::classify(line) {
            AtRequest::SendSms => {
                send_retour(transport)?;
                send(transport, b">")?;
                flush(transport)?;
                debug!("AT: -> send SMS, awaiting body");
                self.body.clear();
                self.body_overflowed = false;
                self.state = EngineState::AwaitingBody {
                    deadline_ms: now_ms.saturating_add(self.settings.body_timeout_ms),
                };
            }
            AtRequest::ReadSms => self.deliver_front(transport, now_ms, sink)?,
            AtRequest::DeleteSms => {
                match self.queue.pop() {
                    Some(command) => {
                        debug!("AT: -> deleted message: {}", command);
                        self.stats.commands_deleted = self.stats.commands_deleted.wrapping_add(1);
                        sink.emit(&StoveEvent::CommandDeleted(command));
                    }
                    None => {
                        warn!("AT: delete requested with an empty queue");
                        sink.emit(&StoveEvent::DeleteWithoutCommand);
                    }
                }
                self.query_pending = false;
                send_ok(transport)?;
                flush(transport)?;
            }
            AtRequest::Setup => {
                send_ok(transport)?;
                flush(transport)?;
            }
            AtRequest::Ignored => {}
            AtRequest::Unknown => {
                send_error(transport)?;
                flush(transport)?;
                self.stats.unknown_commands = self.stats.unknown_commands.wrapping_add(1);
                sink.emit(&StoveEvent::UnknownCommand(line.to_string()));
            }
        }
        Ok(())
    }

    /// Answer `AT+CMGR`: present the queue front as a stored SMS.
    fn deliver_front<T: Transport>(
        &mut self,
        transport: &mut T,
        now_ms: u64,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let Some(command) = self.queue.front().cloned() else {
            debug!("AT: -> read SMS: NONE");
            send_retour(transport)?;
            send_ok(transport)?;
            return flush(transport);
        };

        let header = format!(
            "+CMGR: \"REC READ\",\"{}\",,\"{},{}+08\"",
            self.settings.phone_number, SMS_DATE, SMS_TIME
        );
        let body = format!("{} {}", self.settings.pin_code, command);

        send_retour(transport)?;
        send(transport, header.as_bytes())?;
        debug!("AT: -> message: {}", header);
        send_retour(transport)?;
        send(transport, body.as_bytes())?;
        debug!("AT: -> message: {} {}", "*".repeat(self.settings.pin_code.len()), command);
        send_retour(transport)?;
        send_retour(transport)?;
        send_ok(transport)?;
        flush(transport)?;

        self.stats.commands_delivered = self.stats.commands_delivered.wrapping_add(1);
        self.query_pending = true;
        sink.emit(&StoveEvent::CommandDelivered(command));

        if self.settings.read_settle_ms > 0 {
            self.state = EngineState::Holding {
                until_ms: now_ms.saturating_add(self.settings.read_settle_ms),
            };
        }
        Ok(())
    }

    /// Ctrl-Z received: classify the collected body and return to `Idle`.
    fn finish_body(&mut self, sink: &mut impl EventSink) -> StoveReply {
        let text: String = self.body.iter().map(|&b| b as char).collect();
        self.abort_body();

        let reply = StoveReply::parse(&text);
        match &reply {
            StoveReply::Failure { reason } => {
                error!("Stove reply: FAILURE: {}", reason);
                self.stats.record_failure(reason);
                sink.emit(&StoveEvent::ApplianceFailure(reason.clone()));
            }
            StoveReply::Unknown { raw } => {
                warn!("Stove reply: UNKNOWN: {:?}", raw);
                self.stats.unknown_replies = self.stats.unknown_replies.wrapping_add(1);
                sink.emit(&StoveEvent::UnknownReply(raw.clone()));
            }
            _ => debug!("Stove reply: OK: {}", text.trim()),
        }
        sink.emit(&StoveEvent::StatusReceived(reply.clone()));
        reply
    }
}

// ── Wire helpers ─────────────────────────────────────────────

fn send<T: Transport>(transport: &mut T, mut data: &[u8]) -> Result<()> {
    while !data.is_empty() {
        let n = transport.write(data).map_err(|e| {
            warn!("AT: serial write failed: {:?}", e);
            TransportError::WriteFailed
        })?;
        if n == 0 {
            return Err(TransportError::WriteFailed.into());
        }
        data = &data[n.min(data.len())..];
    }
    Ok(())
}

fn flush<T: Transport>(transport: &mut T) -> Result<()> {
    transport.flush().map_err(|e| {
        warn!("AT: serial flush failed: {:?}", e);
        TransportError::FlushFailed.into()
    })
}

/// Line terminator: CR and LF as two separate writes.
fn send_retour<T: Transport>(transport: &mut T) -> Result<()> {
    send(transport, &[ASCII_CR])?;
    send(transport, &[ASCII_LF])
}

fn send_ok<T: Transport>(transport: &mut T) -> Result<()> {
    send(transport, b"OK")?;
    debug!("AT: -> response: OK");
    send_retour(transport)
}

fn send_error<T: Transport>(transport: &mut T) -> Result<()> {
    send(transport, b"ERROR")?;
    debug!("AT: -> response: ERROR");
    send_retour(transport)
}
