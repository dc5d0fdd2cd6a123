//! Application service: the hexagonal core.
//!
//! [`StoveService`] owns the protocol engine, the translator and the
//! climate state. It exposes a clean, hardware-agnostic API. All I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  ClimateCall ──▶ ┌────────────────────────┐ ──▶ ClimatePort
//!                  │      StoveService      │
//!    Transport ◀──▶│ Engine · Translator    │ ──▶ EventSink
//!                  └────────────────────────┘ ──▶ StoragePort
//! ```

use log::{debug, info, warn};

use crate::climate::{ClimateState, ClimateTraits};
use crate::config::StoveConfig;
use crate::diagnostics::ProtocolStats;
use crate::error::Result;
use crate::persist::SavedClimate;
use crate::protocol::engine::{EngineState, ProtocolEngine, SessionSettings};
use crate::protocol::queue::CommandQueue;
use crate::protocol::reply::StoveReply;
use crate::protocol::translate::{StateTranslator, StoveCommand};
use crate::protocol::transport::Transport;

use super::commands::ClimateCall;
use super::events::StoveEvent;
use super::ports::{ClimatePort, EventSink, StoragePort};

// ───────────────────────────────────────────────────────────────
// StoveService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct StoveService {
    config: StoveConfig,
    traits: ClimateTraits,
    translator: StateTranslator,
    engine: ProtocolEngine,
    state: ClimateState,
}

impl StoveService {
    /// Construct the service from configuration.
    ///
    /// The engine already holds the initial telemetry request. Call
    /// [`start`](Self::start) next to restore the saved setpoint.
    pub fn new(config: StoveConfig) -> Self {
        let traits = ClimateTraits::from_config(&config);
        let translator = StateTranslator::new(&config);
        let engine = ProtocolEngine::new(SessionSettings::from_config(&config));
        let state = ClimateState::initial(config.default_current_temperature);

        Self {
            config,
            traits,
            translator,
            engine,
            state,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Restore the saved setpoint (or fall back to defaults) and publish
    /// the initial state.
    pub fn start(
        &mut self,
        storage: &impl StoragePort,
        climate: &mut impl ClimatePort,
        sink: &mut impl EventSink,
    ) {
        self.state = ClimateState::initial(self.config.default_current_temperature);

        if let Some(saved) = SavedClimate::load(storage) {
            if self.traits.supports_mode(saved.mode) {
                self.state.mode = saved.mode;
            } else {
                warn!("Saved mode {} is no longer supported, using OFF", saved.mode.as_str());
            }
            self.state.target_temperature = saved.target_temperature;
            info!(
                "StoveService restored mode={} target={:.1}",
                self.state.mode.as_str(),
                self.state.target_temperature
            );
        } else {
            info!("StoveService started with defaults");
        }

        sink.emit(&StoveEvent::Started(self.state));
        climate.publish_state(&self.state);
    }

    // ── Control ───────────────────────────────────────────────

    /// Apply one control event: update mode and target, queue the
    /// matching stove command, persist the setpoint and republish.
    pub fn control(
        &mut self,
        call: ClimateCall,
        storage: &mut impl StoragePort,
        climate: &mut impl ClimatePort,
        sink: &mut impl EventSink,
    ) {
        let mut call = call;
        if let Some(mode) = call.get_mode() {
            if !self.traits.supports_mode(mode) {
                warn!("Control: mode {} not supported, ignoring", mode.as_str());
                sink.emit(&StoveEvent::ModeRejected(mode));
                call.mode = None;
                if call.is_empty() {
                    return;
                }
            }
        }

        let mode_changed = match call.get_mode() {
            Some(mode) => {
                self.state.mode = mode;
                true
            }
            None => false,
        };
        if let Some(target) = call.get_target_temperature() {
            self.state.target_temperature = target;
        }

        let command = self.translator.encode(
            self.state.mode,
            self.state.target_temperature,
            mode_changed,
        );
        self.enqueue(command, sink);

        if let Err(e) = SavedClimate::from_state(&self.state).save(storage) {
            warn!("Control: saving climate state failed: {}", e);
        }
        climate.publish_state(&self.state);
    }

    /// Push a command onto the queue outside of a control event.
    pub fn enqueue(&mut self, command: StoveCommand, sink: &mut impl EventSink) {
        let wire = command.wire();
        info!("Sending message: {} (wire {})", command.token(), wire);
        let pending = self.engine.enqueue(wire.clone());
        sink.emit(&StoveEvent::CommandQueued { wire, pending });
    }

    // ── Serial polling ────────────────────────────────────────

    /// Drive the protocol engine once and fold any status replies into
    /// the climate state.
    ///
    /// Replies parsed before a transport error are still applied before
    /// the error is returned.
    pub fn poll<T: Transport>(
        &mut self,
        transport: &mut T,
        now_ms: u64,
        climate: &mut impl ClimatePort,
        sink: &mut impl EventSink,
    ) -> Result<Vec<StoveReply>> {
        match self.engine.poll(transport, now_ms, sink) {
            Ok(replies) => {
                for reply in &replies {
                    self.apply_reply(reply, climate, sink);
                }
                Ok(replies)
            }
            Err(e) => {
                for reply in self.engine.take_completed() {
                    self.apply_reply(&reply, climate, sink);
                }
                Err(e)
            }
        }
    }

    /// Abort a pending status body wait.
    pub fn cancel_body_wait(&mut self, sink: &mut impl EventSink) -> bool {
        self.engine.cancel_body_wait(sink)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &ClimateState {
        &self.state
    }

    pub fn traits(&self) -> &ClimateTraits {
        &self.traits
    }

    pub fn config(&self) -> &StoveConfig {
        &self.config
    }

    pub fn queue(&self) -> &CommandQueue {
        self.engine.queue()
    }

    pub fn engine_state(&self) -> EngineState {
        self.engine.state()
    }

    pub fn stats(&self) -> &ProtocolStats {
        self.engine.stats()
    }

    /// Log the effective configuration and traits.
    pub fn dump_config(&self) {
        self.config.dump();
        info!(
            "  modes: auto={} heat={} cool={}",
            self.traits.supports_auto_mode,
            self.traits.supports_heat_mode,
            self.traits.supports_cool_mode
        );
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_reply(
        &mut self,
        reply: &StoveReply,
        climate: &mut impl ClimatePort,
        sink: &mut impl EventSink,
    ) {
        let Some(temperature) = self.translator.current_temperature(reply) else {
            debug!("Stove reply carries no temperature: {:?}", reply);
            return;
        };
        self.state.current_temperature = temperature;
        sink.emit(&StoveEvent::TemperatureUpdated(temperature));
        climate.publish_state(&self.state);
    }
}
