// Controller invariants and end-to-end pacing scenarios.

use std::time::Duration;

use rand::Rng;
use tempfile::tempdir;

use request_pacer::{Outcome, PacerConfig, RequestPacer};

mod helpers;
use helpers::default_config;

fn record(pacer: &mut RequestPacer, outcome: Outcome) {
    pacer.record_outcome(outcome, Duration::from_secs(1), Duration::ZERO, "");
}

#[test]
fn delay_bounds_hold_for_random_outcome_sequences() {
    let dir = tempdir().unwrap();
    let mut pacer = RequestPacer::new(default_config(dir.path()));
    let outcomes = [
        Outcome::Success,
        Outcome::RateLimited,
        Outcome::Error,
        Outcome::Timeout,
    ];
    let mut rng = rand::rng();

    for i in 0..1000 {
        let outcome = outcomes[rng.random_range(0..outcomes.len())];
        record(&mut pacer, outcome);

        let delay = pacer.current_delay();
        let config = pacer.config();
        assert!(
            delay >= config.min_delay && delay <= config.max_dynamic_delay,
            "delay {:?} out of bounds after event {} ({})",
            delay,
            i,
            outcome
        );
        assert!(
            pacer.consecutive_successes() == 0 || pacer.consecutive_failures() == 0,
            "both streak counters nonzero after event {}",
            i
        );
    }
}

#[test]
fn rate_limit_flag_tracks_outcomes() {
    let dir = tempdir().unwrap();
    let mut pacer = RequestPacer::new(default_config(dir.path()));

    record(&mut pacer, Outcome::RateLimited);
    assert!(pacer.rate_limit_detected());

    record(&mut pacer, Outcome::Timeout);
    assert!(pacer.rate_limit_detected(), "flag stays set through failures");

    record(&mut pacer, Outcome::Success);
    assert!(!pacer.rate_limit_detected(), "next success clears the flag");
}

#[test]
fn five_successes_strictly_decrease_delay_until_floor() {
    let dir = tempdir().unwrap();
    let config = PacerConfig {
        min_delay: Duration::from_secs(1),
        ..default_config(dir.path())
    };
    let mut pacer = RequestPacer::new(config);

    // Push the delay to the ceiling first.
    for _ in 0..10 {
        record(&mut pacer, Outcome::Error);
    }
    assert_eq!(pacer.current_delay(), Duration::from_secs(30));

    for _ in 0..4 {
        record(&mut pacer, Outcome::Success);
    }
    assert_eq!(
        pacer.current_delay(),
        Duration::from_secs(30),
        "delay unchanged before the streak reaches 5"
    );

    let mut previous = pacer.current_delay();
    for _ in 0..40 {
        record(&mut pacer, Outcome::Success);
        let current = pacer.current_delay();
        if previous > pacer.config().min_delay {
            assert!(current < previous, "delay must strictly decrease until the floor");
        } else {
            assert_eq!(current, pacer.config().min_delay);
        }
        previous = current;
    }
    assert_eq!(pacer.current_delay(), pacer.config().min_delay);
}

#[test]
fn two_failures_strictly_increase_delay_until_ceiling() {
    let dir = tempdir().unwrap();
    let mut pacer = RequestPacer::new(default_config(dir.path()));

    record(&mut pacer, Outcome::Error);
    let mut previous = pacer.current_delay();

    for _ in 0..10 {
        record(&mut pacer, Outcome::Timeout);
        let current = pacer.current_delay();
        if previous < pacer.config().max_dynamic_delay {
            assert!(current > previous, "delay must strictly increase until the ceiling");
        } else {
            assert_eq!(current, pacer.config().max_dynamic_delay);
        }
        previous = current;
    }
    assert_eq!(pacer.current_delay(), pacer.config().max_dynamic_delay);
}

#[test]
fn rate_limited_then_error_compounds_both_rules() {
    let dir = tempdir().unwrap();
    let mut pacer = RequestPacer::new(default_config(dir.path()));

    // From 3s: flag set, one failure, doubling rule -> 6s.
    pacer.record_outcome(
        Outcome::RateLimited,
        Duration::from_secs(3),
        Duration::ZERO,
        "429 from remote",
    );
    assert!(pacer.rate_limit_detected());
    assert_eq!(pacer.current_delay(), Duration::from_secs(6));

    // Second failure: x1.5 then x2 -> 18s.
    pacer.record_outcome(
        Outcome::Error,
        Duration::from_secs(6),
        Duration::ZERO,
        "connection reset",
    );
    assert_eq!(pacer.current_delay(), Duration::from_secs(18));

    // Further failures clamp at the ceiling.
    record(&mut pacer, Outcome::Error);
    assert_eq!(pacer.current_delay(), Duration::from_secs(30));
}

#[test]
fn batch_breaks_fall_on_exact_multiples() {
    let dir = tempdir().unwrap();
    let pacer = RequestPacer::new(default_config(dir.path()));

    assert!(!pacer.should_take_break(0));
    for n in 1..=100u32 {
        assert_eq!(
            pacer.should_take_break(n),
            n % 10 == 0,
            "unexpected break decision at {n}"
        );
    }
}

#[test]
fn next_delay_never_exceeds_ceiling_even_when_rate_limited() {
    let dir = tempdir().unwrap();
    let mut pacer = RequestPacer::new(default_config(dir.path()));

    // Drive the learned delay to the ceiling with the flag set.
    for _ in 0..10 {
        record(&mut pacer, Outcome::RateLimited);
    }

    for _ in 0..500 {
        assert!(pacer.next_delay() <= pacer.config().max_dynamic_delay);
    }
}
