//! Log-based adapters.
//!
//! [`LogEventSink`] implements [`EventSink`] by writing structured
//! protocol events to the ESP-IDF logger (which goes to UART0 / USB-CDC
//! in production). [`LogClimatePublisher`] stands in for a network
//! control surface by logging every published climate state.

use log::{debug, error, info, warn};

use crate::app::events::StoveEvent;
use crate::app::ports::{ClimatePort, EventSink};
use crate::climate::ClimateState;

/// Adapter that logs every [`StoveEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &StoveEvent) {
        match event {
            StoveEvent::Started(state) => {
                info!(
                    "START | mode={} target={:.1} current={:.1}",
                    state.mode.as_str(),
                    state.target_temperature,
                    state.current_temperature
                );
            }
            StoveEvent::CommandQueued { wire, pending } => {
                info!("QUEUE | +{} ({} pending)", wire, pending);
            }
            StoveEvent::CommandDelivered(wire) => debug!("QUEUE | delivered {}", wire),
            StoveEvent::CommandDeleted(wire) => debug!("QUEUE | deleted {}", wire),
            StoveEvent::DeleteWithoutCommand => warn!("QUEUE | delete with nothing queued"),
            StoveEvent::StatusReceived(reply) => debug!("STOVE | {:?}", reply),
            StoveEvent::ApplianceFailure(reason) => error!("STOVE | failure: {}", reason),
            StoveEvent::UnknownReply(raw) => warn!("STOVE | unknown reply {:?}", raw),
            StoveEvent::UnknownCommand(line) => debug!("AT    | ERROR for {:?}", line),
            StoveEvent::FramerOverflow => warn!("AT    | line overflow"),
            StoveEvent::BodyOverflow => warn!("AT    | body overflow"),
            StoveEvent::BodyTimeout => warn!("AT    | body timeout"),
            StoveEvent::BodyCancelled => info!("AT    | body wait cancelled"),
            StoveEvent::TemperatureUpdated(t) => info!("TEMP  | current={:.1}", t),
            StoveEvent::ModeRejected(mode) => warn!("CTRL  | mode {} rejected", mode.as_str()),
        }
    }
}

/// Climate publisher that only logs; remembers the last published state.
#[derive(Debug, Default)]
pub struct LogClimatePublisher {
    last: Option<ClimateState>,
}

impl LogClimatePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&ClimateState> {
        self.last.as_ref()
    }
}

impl ClimatePort for LogClimatePublisher {
    fn publish_state(&mut self, state: &ClimateState) {
        info!(
            "CLIMATE | mode={} target={:.1} current={:.1}",
            state.mode.as_str(),
            state.target_temperature,
            state.current_temperature
        );
        self.last = Some(*state);
    }
}
