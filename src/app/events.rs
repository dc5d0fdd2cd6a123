//! Outbound application events.
//!
//! The [`StoveService`](super::service::StoveService) and the
//! [`ProtocolEngine`](crate::protocol::engine::ProtocolEngine) emit these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on
//! the other side decide what to do with them: log to serial, expose a
//! diagnostics sensor, etc.

use crate::climate::{ClimateMode, ClimateState};
use crate::protocol::reply::StoveReply;

/// Structured events emitted by the protocol core.
#[derive(Debug, Clone, PartialEq)]
pub enum StoveEvent {
    /// The service has started (carries the restored or default state).
    Started(ClimateState),

    /// A command was appended to the outbound queue.
    CommandQueued { wire: String, pending: usize },

    /// The stove fetched the queue front with `AT+CMGR`.
    CommandDelivered(String),

    /// The stove acknowledged the delivered command with `AT+CMGD`.
    CommandDeleted(String),

    /// `AT+CMGD` arrived while nothing was queued.
    DeleteWithoutCommand,

    /// A status SMS body was received and parsed.
    StatusReceived(StoveReply),

    /// The stove reported a failure line.
    ApplianceFailure(String),

    /// A status body could not be classified.
    UnknownReply(String),

    /// An AT line matched no known verb and was answered with `ERROR`.
    UnknownCommand(String),

    /// The line framer discarded a partial line that overran its buffer.
    FramerOverflow,

    /// The status body overran its buffer; the tail was dropped.
    BodyOverflow,

    /// The stove never terminated its status body.
    BodyTimeout,

    /// The status body wait was aborted on request.
    BodyCancelled,

    /// A new current temperature was derived from a stove report.
    TemperatureUpdated(f32),

    /// A control call asked for a mode the traits do not advertise.
    ModeRejected(ClimateMode),
}
