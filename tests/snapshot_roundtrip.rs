// Snapshot persistence: round-trips, staleness, malformed input, caps.

use std::fs;
use std::time::Duration;

use serde_json::{json, Value};
use tempfile::tempdir;

use request_pacer::{Outcome, RequestPacer};

mod helpers;
use helpers::default_config;

#[test]
fn round_trip_reproduces_controller_state() {
    let dir = tempdir().unwrap();
    let config = default_config(dir.path());

    let mut first = RequestPacer::new(config.clone());
    first.record_outcome(
        Outcome::Success,
        Duration::from_secs(3),
        Duration::from_millis(420),
        "",
    );
    first.record_outcome(
        Outcome::RateLimited,
        Duration::from_secs(3),
        Duration::ZERO,
        "HTTP 429",
    );
    first.record_outcome(
        Outcome::Error,
        Duration::from_secs(6),
        Duration::from_millis(90),
        "connection reset",
    );
    first.persist();

    let resumed = RequestPacer::new(config);
    assert_eq!(resumed.current_delay(), first.current_delay());
    assert_eq!(resumed.consecutive_successes(), 0);
    assert_eq!(resumed.consecutive_failures(), 2);
    assert!(resumed.rate_limit_detected());
    assert_eq!(resumed.event_count(), 3);

    // Order is preserved through the round trip.
    let report = resumed.status_report();
    assert_eq!(report.events_last_hour, 3);
    assert_eq!(report.success_rate, Some(1.0 / 3.0));
}

#[test]
fn stale_snapshot_yields_fresh_state() {
    let dir = tempdir().unwrap();
    let config = default_config(dir.path());

    let stale = json!({
        "current_delay": 22.5,
        "consecutive_successes": 0,
        "consecutive_failures": 4,
        "rate_limit_detected": true,
        "last_updated": 0.0,
        "recent_events": []
    });
    fs::write(&config.snapshot_path, stale.to_string()).unwrap();

    let pacer = RequestPacer::new(config);
    assert_eq!(pacer.current_delay(), pacer.config().min_delay);
    assert_eq!(pacer.consecutive_failures(), 0);
    assert!(!pacer.rate_limit_detected());
    assert_eq!(pacer.event_count(), 0);
}

#[test]
fn malformed_snapshot_yields_fresh_state() {
    let dir = tempdir().unwrap();
    let config = default_config(dir.path());
    fs::write(&config.snapshot_path, "][ not json at all").unwrap();

    let pacer = RequestPacer::new(config);
    assert_eq!(pacer.current_delay(), pacer.config().min_delay);
    assert_eq!(pacer.event_count(), 0);
}

#[test]
fn restored_delay_is_clamped_into_configured_bounds() {
    let dir = tempdir().unwrap();
    let config = default_config(dir.path());

    let oversized = json!({
        "current_delay": 900.0,
        "consecutive_successes": 0,
        "consecutive_failures": 2,
        "rate_limit_detected": false,
        "last_updated": chrono::Utc::now().timestamp() as f64,
        "recent_events": []
    });
    fs::write(&config.snapshot_path, oversized.to_string()).unwrap();

    let pacer = RequestPacer::new(config);
    assert_eq!(pacer.current_delay(), pacer.config().max_dynamic_delay);
}

#[test]
fn unknown_event_kinds_are_skipped_on_load() {
    let dir = tempdir().unwrap();
    let config = default_config(dir.path());
    let now = chrono::Utc::now().timestamp() as f64;

    let snapshot = json!({
        "current_delay": 3.0,
        "consecutive_successes": 1,
        "consecutive_failures": 0,
        "rate_limit_detected": false,
        "last_updated": now,
        "recent_events": [
            {"timestamp": now, "event_type": "success", "delay_used": 3.0, "response_time": 0.5, "error_message": ""},
            {"timestamp": now, "event_type": "captcha_challenge", "delay_used": 3.0, "response_time": 0.0, "error_message": ""}
        ]
    });
    fs::write(&config.snapshot_path, snapshot.to_string()).unwrap();

    let pacer = RequestPacer::new(config);
    assert_eq!(pacer.event_count(), 1);
}

#[test]
fn snapshot_caps_persisted_events_at_one_hundred() {
    let dir = tempdir().unwrap();
    let config = default_config(dir.path());

    let mut pacer = RequestPacer::new(config.clone());
    for _ in 0..230 {
        pacer.record_outcome(Outcome::Success, Duration::from_secs(3), Duration::ZERO, "");
    }
    pacer.persist();

    let raw = fs::read_to_string(&config.snapshot_path).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["recent_events"].as_array().unwrap().len(), 100);

    // The in-memory log is trimmed to the same cap on persistence.
    assert!(pacer.event_count() <= 110);

    let resumed = RequestPacer::new(config);
    assert_eq!(resumed.event_count(), 100);
}

#[test]
fn snapshot_wire_format_matches_expected_fields() {
    let dir = tempdir().unwrap();
    let config = default_config(dir.path());

    let mut pacer = RequestPacer::new(config.clone());
    pacer.record_outcome(
        Outcome::Timeout,
        Duration::from_secs_f64(4.5),
        Duration::from_secs(300),
        "deadline exceeded",
    );
    pacer.persist();

    let raw = fs::read_to_string(&config.snapshot_path).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();

    assert!(value["current_delay"].is_f64());
    assert!(value["consecutive_successes"].is_u64());
    assert!(value["consecutive_failures"].is_u64());
    assert!(value["rate_limit_detected"].is_boolean());
    assert!(value["last_updated"].is_f64());

    let event = &value["recent_events"][0];
    assert_eq!(event["event_type"], "timeout");
    assert_eq!(event["delay_used"], 4.5);
    assert_eq!(event["response_time"], 300.0);
    assert_eq!(event["error_message"], "deadline exceeded");
    assert!(event["timestamp"].is_f64());
}

#[test]
fn pacer_works_without_writable_filesystem() {
    let config = request_pacer::PacerConfig {
        snapshot_path: "/proc/request_pacer_test/denied.json".into(),
        ..Default::default()
    };

    let mut pacer = RequestPacer::new(config);
    for _ in 0..30 {
        pacer.record_outcome(Outcome::Success, Duration::from_secs(3), Duration::ZERO, "");
    }
    pacer.persist();

    // In-memory state stays authoritative even though every save failed.
    assert_eq!(pacer.event_count(), 30);
    assert_eq!(pacer.consecutive_successes(), 30);
}
