//! Integration tests for `StoveService`: control events in, queued
//! commands and published climate state out.

use super::mock_hw::{MemStore, RecordingClimate, RecordingSink, ScriptedLink};

use rikastove::app::commands::ClimateCall;
use rikastove::app::events::StoveEvent;
use rikastove::app::service::StoveService;
use rikastove::climate::ClimateMode;
use rikastove::config::StoveConfig;
use rikastove::protocol::{StoveCommand, StoveMode};

struct Harness {
    svc: StoveService,
    store: MemStore,
    climate: RecordingClimate,
    sink: RecordingSink,
    link: ScriptedLink,
}

impl Harness {
    fn new(config: StoveConfig) -> Self {
        Self::with_store(config, MemStore::new())
    }

    fn with_store(config: StoveConfig, store: MemStore) -> Self {
        let mut h = Self {
            svc: StoveService::new(config),
            store,
            climate: RecordingClimate::new(),
            sink: RecordingSink::new(),
            link: ScriptedLink::new(),
        };
        h.svc.start(&h.store, &mut h.climate, &mut h.sink);
        h
    }

    fn control(&mut self, call: ClimateCall) {
        self.svc
            .control(call, &mut self.store, &mut self.climate, &mut self.sink);
    }

    fn queued(&self) -> Vec<&str> {
        self.svc.queue().iter().map(String::as_str).collect()
    }

    /// Play one status report from the stove through the engine.
    fn stove_reports(&mut self, body: &str) {
        self.link.stove_sends(b"AT+CMGS=\"+436508012415\"\r");
        self.link.stove_sends(body.as_bytes());
        self.link.stove_sends(b"\x1A");
        self.svc
            .poll(&mut self.link, 0, &mut self.climate, &mut self.sink)
            .unwrap();
    }
}

fn cool_config() -> StoveConfig {
    StoveConfig {
        supports_cool: true,
        ..Default::default()
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn fresh_start_queues_telemetry_only() {
    let h = Harness::new(StoveConfig::default());
    assert_eq!(h.svc.state().mode, ClimateMode::Off);
    assert_eq!(h.queued(), ["TEL"]);
    assert_eq!(h.climate.published.len(), 1);
    assert!(matches!(h.sink.events[0], StoveEvent::Started(_)));
}

#[test]
fn setpoint_survives_restart() {
    let mut h = Harness::new(StoveConfig::default());
    h.control(
        ClimateCall::new()
            .with_mode(ClimateMode::Heat)
            .with_target_temperature(25.0),
    );
    assert_eq!(h.store.writes, 1);

    let restarted = Harness::with_store(StoveConfig::default(), h.store.clone());
    assert_eq!(restarted.svc.state().mode, ClimateMode::Heat);
    assert_eq!(restarted.svc.state().target_temperature, 25.0);
    // A restart never replays the last command; only telemetry is queued.
    assert_eq!(restarted.queued(), ["TEL"]);
}

#[test]
fn restored_mode_dropped_when_no_longer_supported() {
    let mut h = Harness::new(cool_config());
    h.control(ClimateCall::new().with_mode(ClimateMode::Cool));

    let restarted = Harness::with_store(StoveConfig::default(), h.store.clone());
    assert_eq!(restarted.svc.state().mode, ClimateMode::Off);
}

// ── Control flows ─────────────────────────────────────────────

#[test]
fn mode_change_then_target_change() {
    let mut h = Harness::new(StoveConfig::default());
    h.control(ClimateCall::new().with_mode(ClimateMode::Heat));
    h.control(ClimateCall::new().with_target_temperature(30.0));
    h.control(ClimateCall::new().with_target_temperature(17.0));
    assert_eq!(h.queued(), ["TEL", "HEAT", "h100", "h30"]);
}

#[test]
fn mode_and_target_in_one_call_sends_mode() {
    let mut h = Harness::new(StoveConfig::default());
    h.control(
        ClimateCall::new()
            .with_mode(ClimateMode::Heat)
            .with_target_temperature(30.0),
    );
    assert_eq!(h.queued(), ["TEL", "HEAT"]);
    assert_eq!(h.svc.state().target_temperature, 30.0);
}

#[test]
fn cool_maps_to_room_mode() {
    let mut h = Harness::new(cool_config());
    h.control(ClimateCall::new().with_mode(ClimateMode::Cool));
    h.control(ClimateCall::new().with_target_temperature(22.0));
    assert_eq!(h.queued(), ["TEL", "ROOM", "r22"]);
}

#[test]
fn off_ignores_target() {
    let mut h = Harness::new(StoveConfig::default());
    h.control(ClimateCall::new().with_mode(ClimateMode::Off));
    h.control(ClimateCall::new().with_target_temperature(25.0));
    assert_eq!(h.queued(), ["TEL", "OFF", "OFF"]);
}

#[test]
fn auto_is_delivered_as_telemetry() {
    let mut h = Harness::new(StoveConfig::default());
    h.control(ClimateCall::new().with_mode(ClimateMode::Auto));
    h.control(ClimateCall::new().with_target_temperature(21.0));
    assert_eq!(h.queued(), ["TEL", "TEL", "?"]);

    assert_eq!(StoveCommand::SelectMode(StoveMode::Auto).token(), "AUTO");
}

#[test]
fn repeated_calls_are_not_collapsed() {
    let mut h = Harness::new(StoveConfig::default());
    h.control(ClimateCall::new().with_mode(ClimateMode::Heat));
    for _ in 0..3 {
        h.control(ClimateCall::new().with_target_temperature(24.0));
    }
    assert_eq!(h.svc.queue().len(), 5);
    assert_eq!(
        h.sink
            .count(|e| matches!(e, StoveEvent::CommandQueued { .. })),
        4
    );
}

#[test]
fn unsupported_mode_keeps_target_change() {
    let mut h = Harness::new(StoveConfig::default());
    h.control(ClimateCall::new().with_mode(ClimateMode::Heat));
    h.control(
        ClimateCall::new()
            .with_mode(ClimateMode::Cool)
            .with_target_temperature(30.0),
    );
    assert_eq!(h.svc.state().mode, ClimateMode::Heat);
    assert_eq!(h.queued(), ["TEL", "HEAT", "h100"]);
    assert_eq!(
        h.sink
            .count(|e| *e == StoveEvent::ModeRejected(ClimateMode::Cool)),
        1
    );
}

#[test]
fn control_publishes_new_state() {
    let mut h = Harness::new(StoveConfig::default());
    h.control(ClimateCall::new().with_mode(ClimateMode::Heat));
    let last = h.climate.last().unwrap();
    assert_eq!(last.mode, ClimateMode::Heat);
}

// ── Status reports ────────────────────────────────────────────

#[test]
fn heat_report_maps_power_to_temperature() {
    let mut h = Harness::new(StoveConfig::default());
    h.stove_reports("STOVE ON - HEAT 30");
    assert_eq!(h.svc.state().current_temperature, 17.0);
    assert_eq!(h.climate.last().unwrap().current_temperature, 17.0);
    assert_eq!(h.link.take_output(), "\r\n>\r\n+CMGS : 01\r\nOK\r\n");
}

#[test]
fn room_report_is_taken_directly() {
    let mut h = Harness::new(StoveConfig::default());
    h.stove_reports("STOVE ON - ROOM 22");
    assert_eq!(h.svc.state().current_temperature, 22.0);
    assert_eq!(
        h.sink
            .count(|e| *e == StoveEvent::TemperatureUpdated(22.0)),
        1
    );
}

#[test]
fn off_report_leaves_temperature() {
    let mut h = Harness::new(StoveConfig::default());
    h.stove_reports("STOVE ON - ROOM 23");
    let published = h.climate.published.len();
    h.stove_reports("STOVE OFF");
    assert_eq!(h.svc.state().current_temperature, 23.0);
    assert_eq!(h.climate.published.len(), published);
}

#[test]
fn failure_report_is_counted() {
    let mut h = Harness::new(StoveConfig::default());
    h.stove_reports("FAILURE: E12 flue gas");
    assert_eq!(h.svc.stats().appliance_failures, 1);
    assert_eq!(
        h.svc.stats().last_failure.as_deref(),
        Some("E12 flue gas")
    );
    assert_eq!(
        h.sink
            .count(|e| matches!(e, StoveEvent::ApplianceFailure(_))),
        1
    );
}

#[test]
fn malformed_report_is_unknown() {
    let mut h = Harness::new(StoveConfig::default());
    h.stove_reports("STOVE ON - HEAT abc");
    assert_eq!(h.svc.stats().unknown_replies, 1);
    assert_eq!(h.svc.state().current_temperature, 20.0);
}

#[test]
fn report_applied_even_if_acknowledgement_fails() {
    let mut h = Harness::new(StoveConfig::default());
    h.link.stove_sends(b"AT+CMGS\r");
    h.svc
        .poll(&mut h.link, 0, &mut h.climate, &mut h.sink)
        .unwrap();

    h.link.fail_writes = true;
    h.link.stove_sends(b"STOVE ON - ROOM 25\x1A");
    let result = h.svc.poll(&mut h.link, 10, &mut h.climate, &mut h.sink);

    assert!(result.is_err());
    assert_eq!(h.svc.state().current_temperature, 25.0);
    assert_eq!(h.climate.last().unwrap().current_temperature, 25.0);
    assert_eq!(
        h.sink
            .count(|e| *e == StoveEvent::TemperatureUpdated(25.0)),
        1
    );
}
