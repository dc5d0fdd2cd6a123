//! Runtime: drives the service from the serial link and the intent
//! channel.
//!
//! [`StoveRuntime`] bundles the service with the adapters it needs so
//! that one object can be shared between the cooperative tasks in
//! [`task`]. Each method is a single synchronous step; the async loops
//! only decide *when* to call them.

pub mod channels;
pub mod task;
pub mod task_pin;

use log::{info, warn};

use crate::app::commands::ClimateCall;
use crate::app::ports::{ClimatePort, Clock, EventSink, StoragePort};
use crate::app::service::StoveService;
use crate::error::Result;
use crate::protocol::reply::StoveReply;
use crate::protocol::transport::Transport;

pub use channels::{cancel_body_wait, submit_intent};

/// The service plus every adapter it talks to.
pub struct StoveRuntime<T, C, P, E, S> {
    service: StoveService,
    transport: T,
    clock: C,
    climate: P,
    sink: E,
    storage: S,
    last_anomalies: u32,
}

impl<T, C, P, E, S> StoveRuntime<T, C, P, E, S>
where
    T: Transport,
    C: Clock,
    P: ClimatePort,
    E: EventSink,
    S: StoragePort,
{
    pub fn new(service: StoveService, transport: T, clock: C, climate: P, sink: E, storage: S) -> Self {
        Self {
            service,
            transport,
            clock,
            climate,
            sink,
            storage,
            last_anomalies: 0,
        }
    }

    /// Restore the saved setpoint and publish the initial state.
    pub fn start(&mut self) {
        self.service
            .start(&self.storage, &mut self.climate, &mut self.sink);
    }

    /// Apply one control intent.
    pub fn handle_intent(&mut self, call: ClimateCall) {
        self.service
            .control(call, &mut self.storage, &mut self.climate, &mut self.sink);
    }

    /// Apply every intent waiting in [`channels::INTENT_CHANNEL`].
    /// Returns how many were applied.
    pub fn drain_intents(&mut self) -> usize {
        let mut applied = 0;
        while let Some(call) = channels::try_recv_intent() {
            self.handle_intent(call);
            applied += 1;
        }
        applied
    }

    /// One serial step: honour a pending cancel request, then drain the
    /// UART through the protocol engine.
    pub fn poll_serial(&mut self) -> Result<Vec<StoveReply>> {
        if channels::take_cancel_request() {
            self.service.cancel_body_wait(&mut self.sink);
        }
        let now_ms = self.clock.now_ms();
        self.service
            .poll(&mut self.transport, now_ms, &mut self.climate, &mut self.sink)
    }

    /// Log the diagnostics counters if anything degraded since the last
    /// report. Returns `true` if a report was written.
    pub fn report_stats(&mut self) -> bool {
        let stats = self.service.stats();
        let anomalies = stats.anomalies();
        if anomalies == self.last_anomalies {
            return false;
        }
        if stats.last_failure.is_some() {
            warn!("STATS | {}", stats.to_json());
        } else {
            info!("STATS | {}", stats.to_json());
        }
        self.last_anomalies = anomalies;
        true
    }

    pub fn service(&self) -> &StoveService {
        &self.service
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn climate(&self) -> &P {
        &self.climate
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
