//! Integration tests for the AT engine against a scripted stove session.
//!
//! The byte sequences mirror what the stove's GSM board sends after
//! power-up: modem setup, a read/delete cycle for the queued telemetry
//! request, then a status report.

use super::mock_hw::{RecordingSink, ScriptedLink};

use rikastove::app::events::StoveEvent;
use rikastove::config::{StoveConfig, fixed_str};
use rikastove::protocol::{EngineState, ProtocolEngine, ReplyMode, SessionSettings, StoveReply};

const CMGR_HEADER: &str = "+CMGR: \"REC READ\",\"+436508012415\",,\"70/01/01,01:00:00+08\"";

fn engine() -> ProtocolEngine {
    ProtocolEngine::new(SessionSettings::from_config(&StoveConfig::default()))
}

// ── Full power-up session ─────────────────────────────────────

#[test]
fn power_up_session() {
    let mut engine = engine();
    let mut link = ScriptedLink::new();
    let mut sink = RecordingSink::new();

    link.stove_sends(b"ATE0\rAT+CNMI=2,1,0,0,0\rAT+CMGF=1\r");
    engine.poll(&mut link, 0, &mut sink).unwrap();
    assert_eq!(link.take_output(), "OK\r\nOK\r\nOK\r\n");

    link.stove_sends(b"AT+CMGR=1\r");
    engine.poll(&mut link, 10, &mut sink).unwrap();
    assert_eq!(
        link.take_output(),
        format!("\r\n{CMGR_HEADER}\r\n1211 TEL\r\n\r\nOK\r\n")
    );
    assert!(engine.query_pending());

    link.stove_sends(b"AT+CMGD=1\r");
    engine.poll(&mut link, 2_010, &mut sink).unwrap();
    assert_eq!(link.take_output(), "OK\r\n");
    assert!(engine.queue().is_empty());
    assert!(!engine.query_pending());

    link.stove_sends(b"AT+CMGS=\"+436508012415\"\r");
    engine.poll(&mut link, 2_020, &mut sink).unwrap();
    assert_eq!(link.take_output(), "\r\n>");

    link.stove_sends(b"STOVE ON - HEAT 65\x1A");
    let replies = engine.poll(&mut link, 2_030, &mut sink).unwrap();
    assert_eq!(
        replies,
        [StoveReply::On {
            mode: ReplyMode::Heat,
            value: Some(65)
        }]
    );
    assert_eq!(link.take_output(), "\r\n+CMGS : 01\r\nOK\r\n");

    let stats = engine.stats();
    assert_eq!(stats.commands_delivered, 1);
    assert_eq!(stats.commands_deleted, 1);
    assert_eq!(stats.anomalies(), 0);
}

// ── Wire-level details ────────────────────────────────────────

#[test]
fn line_terminator_is_two_separate_writes() {
    let mut engine = engine();
    let mut link = ScriptedLink::new();
    let mut sink = RecordingSink::new();

    link.stove_sends(b"ATE0\r");
    engine.poll(&mut link, 0, &mut sink).unwrap();
    // "OK", CR, LF
    assert_eq!(link.writes, 3);
}

#[test]
fn read_with_empty_queue_has_no_header() {
    let mut engine = engine();
    let mut link = ScriptedLink::new();
    let mut sink = RecordingSink::new();

    link.stove_sends(b"AT+CMGR=1\r");
    engine.poll(&mut link, 0, &mut sink).unwrap();
    link.stove_sends(b"AT+CMGD=1\r");
    engine.poll(&mut link, 5_000, &mut sink).unwrap();
    link.take_output();

    link.stove_sends(b"AT+CMGR=1\r");
    engine.poll(&mut link, 5_010, &mut sink).unwrap();
    let out = link.take_output();
    assert_eq!(out, "\r\nOK\r\n");
    assert!(!out.contains("+CMGR"));
}

#[test]
fn read_uses_configured_identity() {
    let config = StoveConfig {
        phone_number: fixed_str("+4912345"),
        pin_code: fixed_str("0007"),
        ..Default::default()
    };
    let mut engine = ProtocolEngine::new(SessionSettings::from_config(&config));
    let mut link = ScriptedLink::new();
    let mut sink = RecordingSink::new();

    link.stove_sends(b"AT+CMGR=1\r");
    engine.poll(&mut link, 0, &mut sink).unwrap();
    let out = link.take_output();
    assert!(out.contains("\"+4912345\""));
    assert!(out.contains("\r\n0007 TEL\r\n"));
}

#[test]
fn queued_commands_are_delivered_in_order() {
    let mut engine = engine();
    let mut link = ScriptedLink::new();
    let mut sink = RecordingSink::new();
    engine.enqueue("h85");
    engine.enqueue("h85");

    let mut delivered = Vec::new();
    let mut bodies = Vec::new();
    let mut now = 0;
    for _ in 0..3 {
        link.stove_sends(b"AT+CMGR=1\r");
        engine.poll(&mut link, now, &mut sink).unwrap();
        bodies.push(link.take_output().lines().nth(2).map(str::to_string));
        now += 2_000;
        link.stove_sends(b"AT+CMGD=1\r");
        engine.poll(&mut link, now, &mut sink).unwrap();
        assert_eq!(link.take_output(), "OK\r\n");
        now += 10;
    }
    for event in &sink.events {
        if let StoveEvent::CommandDelivered(wire) = event {
            delivered.push(wire.clone());
        }
    }
    assert_eq!(delivered, ["TEL", "h85", "h85"]);
    assert_eq!(bodies[1].as_deref(), Some("1211 h85"));
    assert!(engine.queue().is_empty());
}

#[test]
fn unknown_and_ignored_lines() {
    let mut engine = engine();
    let mut link = ScriptedLink::new();
    let mut sink = RecordingSink::new();

    link.stove_sends(b"FOO\r");
    engine.poll(&mut link, 0, &mut sink).unwrap();
    assert_eq!(link.take_output(), "ERROR\r\n");

    link.stove_sends(b"\r\n\r\x1A\r");
    engine.poll(&mut link, 0, &mut sink).unwrap();
    assert_eq!(link.take_output(), "");
}

// ── Partial reads and sub-states ──────────────────────────────

#[test]
fn byte_at_a_time_reads() {
    let mut engine = engine();
    let mut link = ScriptedLink::new();
    link.max_read = 1;
    let mut sink = RecordingSink::new();

    link.stove_sends(b"AT+CMGS\rSTOVE OFF\x1AATE0\r");
    let replies = engine.poll(&mut link, 0, &mut sink).unwrap();
    assert_eq!(replies, [StoveReply::Off]);
    assert_eq!(link.take_output(), "\r\n>\r\n+CMGS : 01\r\nOK\r\nOK\r\n");
}

#[test]
fn status_body_split_across_polls() {
    let mut engine = engine();
    let mut link = ScriptedLink::new();
    let mut sink = RecordingSink::new();

    link.stove_sends(b"AT+CMGS\rSTOVE ON ");
    assert!(engine.poll(&mut link, 0, &mut sink).unwrap().is_empty());
    link.stove_sends(b"- ROOM 22");
    assert!(engine.poll(&mut link, 100, &mut sink).unwrap().is_empty());
    link.stove_sends(b"\x1A");
    let replies = engine.poll(&mut link, 200, &mut sink).unwrap();
    assert_eq!(
        replies,
        [StoveReply::On {
            mode: ReplyMode::Room,
            value: Some(22)
        }]
    );
}

#[test]
fn holding_leaves_input_unread() {
    let mut engine = engine();
    let mut link = ScriptedLink::new();
    let mut sink = RecordingSink::new();

    link.stove_sends(b"AT+CMGR=1\r");
    engine.poll(&mut link, 0, &mut sink).unwrap();
    assert_eq!(engine.state(), EngineState::Holding { until_ms: 2_000 });
    link.take_output();

    link.stove_sends(b"AT+CMGD=1\r");
    engine.poll(&mut link, 500, &mut sink).unwrap();
    assert_eq!(link.unread(), 10);
    assert_eq!(link.take_output(), "");

    engine.poll(&mut link, 2_000, &mut sink).unwrap();
    assert_eq!(link.unread(), 0);
    assert_eq!(link.take_output(), "OK\r\n");
}

#[test]
fn zero_settle_time_never_holds() {
    let config = StoveConfig {
        read_settle_ms: 0,
        ..Default::default()
    };
    let mut engine = ProtocolEngine::new(SessionSettings::from_config(&config));
    let mut link = ScriptedLink::new();
    let mut sink = RecordingSink::new();

    link.stove_sends(b"AT+CMGR=1\rAT+CMGD=1\r");
    engine.poll(&mut link, 0, &mut sink).unwrap();
    assert_eq!(engine.state(), EngineState::Idle);
    assert!(engine.queue().is_empty());
}

#[test]
fn body_timeout_sends_nothing_and_recovers() {
    let mut engine = engine();
    let mut link = ScriptedLink::new();
    let mut sink = RecordingSink::new();

    link.stove_sends(b"AT+CMGS\rSTOVE");
    engine.poll(&mut link, 0, &mut sink).unwrap();
    link.take_output();

    engine.poll(&mut link, 9_999, &mut sink).unwrap();
    assert!(matches!(engine.state(), EngineState::AwaitingBody { .. }));

    engine.poll(&mut link, 10_000, &mut sink).unwrap();
    assert_eq!(engine.state(), EngineState::Idle);
    assert_eq!(link.take_output(), "");
    assert_eq!(sink.count(|e| *e == StoveEvent::BodyTimeout), 1);

    // Late body bytes are framed as an ordinary (unknown) line.
    link.stove_sends(b" OFF\x1A\rATE0\r");
    let replies = engine.poll(&mut link, 10_100, &mut sink).unwrap();
    assert!(replies.is_empty());
    assert_eq!(link.take_output(), "ERROR\r\nOK\r\n");
}

#[test]
fn cancel_aborts_body_wait() {
    let mut engine = engine();
    let mut link = ScriptedLink::new();
    let mut sink = RecordingSink::new();

    link.stove_sends(b"AT+CMGS\rSTOVE ON");
    engine.poll(&mut link, 0, &mut sink).unwrap();
    assert!(engine.cancel_body_wait(&mut sink));
    assert!(!engine.cancel_body_wait(&mut sink));
    assert_eq!(engine.stats().body_cancels, 1);
    assert_eq!(sink.count(|e| *e == StoveEvent::BodyCancelled), 1);
}

#[test]
fn write_failure_is_reported() {
    let mut engine = engine();
    let mut link = ScriptedLink::new();
    link.fail_writes = true;
    let mut sink = RecordingSink::new();

    link.stove_sends(b"ATE0\r");
    let err = engine.poll(&mut link, 0, &mut sink).unwrap_err();
    assert_eq!(err.to_string(), "transport: write failed");

    // The link recovers; the engine keeps answering.
    link.fail_writes = false;
    link.stove_sends(b"ATE0\r");
    engine.poll(&mut link, 10, &mut sink).unwrap();
    assert_eq!(link.take_output(), "OK\r\n");
}

#[test]
fn write_failure_keeps_rest_of_chunk() {
    let mut engine = engine();
    let mut link = ScriptedLink::new();
    let mut sink = RecordingSink::new();

    link.stove_sends(b"AT+CMGR=1\r");
    engine.poll(&mut link, 0, &mut sink).unwrap();
    link.take_output();

    link.fail_writes = true;
    link.stove_sends(b"ATE0\rAT+CMGD=1\r");
    assert!(engine.poll(&mut link, 2_000, &mut sink).is_err());
    assert_eq!(engine.queue().len(), 1);

    link.fail_writes = false;
    engine.poll(&mut link, 2_010, &mut sink).unwrap();
    assert_eq!(link.take_output(), "OK\r\n");
    assert!(engine.queue().is_empty());
    assert_eq!(sink.count(|e| *e == StoveEvent::CommandDeleted("TEL".into())), 1);
}

#[test]
fn write_failure_after_body_keeps_reply() {
    let mut engine = engine();
    let mut link = ScriptedLink::new();
    let mut sink = RecordingSink::new();

    link.stove_sends(b"AT+CMGS\r");
    engine.poll(&mut link, 0, &mut sink).unwrap();

    link.fail_writes = true;
    link.stove_sends(b"STOVE ON - ROOM 25\x1A");
    assert!(engine.poll(&mut link, 10, &mut sink).is_err());
    assert_eq!(
        engine.take_completed(),
        [StoveReply::On {
            mode: ReplyMode::Room,
            value: Some(25)
        }]
    );
    assert!(engine.take_completed().is_empty());
}

#[test]
fn replies_kept_after_error_come_with_next_poll() {
    let mut engine = engine();
    let mut link = ScriptedLink::new();
    let mut sink = RecordingSink::new();

    link.stove_sends(b"AT+CMGS\r");
    engine.poll(&mut link, 0, &mut sink).unwrap();
    link.fail_writes = true;
    link.stove_sends(b"STOVE OFF\x1A");
    assert!(engine.poll(&mut link, 10, &mut sink).is_err());

    link.fail_writes = false;
    let replies = engine.poll(&mut link, 20, &mut sink).unwrap();
    assert_eq!(replies, [StoveReply::Off]);
}

#[test]
fn reset_keeps_queue() {
    let mut engine = engine();
    let mut link = ScriptedLink::new();
    let mut sink = RecordingSink::new();

    link.stove_sends(b"AT+CMGS\rSTO");
    engine.poll(&mut link, 0, &mut sink).unwrap();
    engine.reset();
    assert_eq!(engine.state(), EngineState::Idle);
    assert_eq!(engine.queue().len(), 1);
}
