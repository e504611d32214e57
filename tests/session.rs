// Integration tests (native) for the session state machine.
// These tests avoid wasm-specific functionality and exercise pure Rust logic so
// they can run under `cargo test` on the host.

use fast_break::{
    Action, ActionOutcome, COURSE_BOUND, FinishCause, Phase, SESSION_SECONDS, STEP_DISTANCE,
    Session, StartError, TickOutcome,
};

fn started(name: &str) -> Session {
    let mut s = Session::new();
    s.set_player_name(name);
    s.start().expect("start should succeed with a name");
    s
}

// Scenario A: alternate to the hoop with time remaining -> early finish.
#[test]
fn alternating_to_the_hoop_finishes_early() {
    let mut s = started("Alice");
    let steps_to_hoop = COURSE_BOUND / STEP_DISTANCE;
    for i in 0..steps_to_hoop {
        let action = if i % 2 == 0 { Action::Left } else { Action::Right };
        let outcome = s.submit_action(action);
        if i + 1 == steps_to_hoop {
            assert_eq!(outcome, ActionOutcome::ReachedHoop);
        } else {
            assert_eq!(outcome, ActionOutcome::Advanced);
        }
    }
    assert_eq!(s.phase(), Phase::Finished);
    assert_eq!(s.finish_cause(), Some(FinishCause::ReachedHoop));
    assert_eq!(s.step_count(), steps_to_hoop);
    assert_eq!(s.position(), COURSE_BOUND);
    // Scored exactly once, at the transition, with the full clock untouched.
    let result = s.result().expect("finished session has a frozen result");
    let expected = fast_break::compute_result(steps_to_hoop, SESSION_SECONDS, 0);
    assert_eq!(result.total_score, expected.total_score);
    assert_eq!(result.stars, expected.stars);
}

// A flawless sprint (all steps in before the clock moves) freezes the full
// time bonus and earns the top rating.
#[test]
fn flawless_sprint_earns_three_stars() {
    let mut s = started("Walt");
    let steps_to_hoop = COURSE_BOUND / STEP_DISTANCE;
    for i in 0..steps_to_hoop {
        let action = if i % 2 == 0 { Action::Left } else { Action::Right };
        s.submit_action(action);
    }
    assert_eq!(s.phase(), Phase::Finished);
    assert_eq!(s.remaining_time(), SESSION_SECONDS as f64);
    assert_eq!(s.result().map(|r| r.stars), Some(3));
}

// Scenario B: no inputs, countdown runs out -> time-out finish with zero stars.
#[test]
fn idle_hands_time_out_with_zero_stars() {
    let mut s = started("Bob");
    let mut expired = false;
    // 10s at one hundredth per tick; generous upper bound to catch a stuck clock.
    for _ in 0..(SESSION_SECONDS * 100 + 10) {
        if s.tick() == TickOutcome::Expired {
            expired = true;
            break;
        }
    }
    assert!(expired, "countdown never expired");
    assert_eq!(s.phase(), Phase::Finished);
    assert_eq!(s.finish_cause(), Some(FinishCause::TimeExpired));
    assert_eq!(s.step_count(), 0);
    assert_eq!(s.remaining_time(), 0.0);
    assert_eq!(s.result().map(|r| r.stars), Some(0));
}

// Scenario C: a repeated action is debounced, not counted.
#[test]
fn repeated_action_counts_once() {
    let mut s = started("Carol");
    assert_eq!(s.submit_action(Action::Left), ActionOutcome::Advanced);
    assert_eq!(s.submit_action(Action::Left), ActionOutcome::Ignored);
    assert_eq!(s.step_count(), 1);
    assert_eq!(s.position(), STEP_DISTANCE);
}

// Property 1: step count equals the number of accepted alternating inputs.
#[test]
fn step_count_matches_accepted_inputs() {
    let mut s = started("Dana");
    let inputs = [
        Action::Left,
        Action::Left,  // rejected
        Action::Right,
        Action::Right, // rejected
        Action::Left,
        Action::Right,
        Action::Right, // rejected
    ];
    let mut accepted = 0;
    let mut last = None;
    for &a in &inputs {
        s.submit_action(a);
        if last != Some(a) {
            accepted += 1;
            last = Some(a);
        }
    }
    assert_eq!(s.step_count(), accepted);
}

// Property 2: position is monotone, clamped, and the bound forces Finished
// within the same event.
#[test]
fn position_is_monotone_and_bounded() {
    let mut s = started("Erin");
    let mut prev = s.position();
    for i in 0..200 {
        let action = if i % 2 == 0 { Action::Left } else { Action::Right };
        s.submit_action(action);
        assert!(s.position() >= prev);
        assert!(s.position() <= COURSE_BOUND);
        prev = s.position();
        if s.position() == COURSE_BOUND {
            assert_eq!(s.phase(), Phase::Finished);
            break;
        }
    }
    assert_eq!(s.position(), COURSE_BOUND);
}

// Property 3: counters freeze the instant the session finishes.
#[test]
fn finished_session_is_immutable_until_reset() {
    let mut s = started("Frank");
    s.submit_action(Action::Left);
    s.tick();
    while s.phase() == Phase::Playing {
        s.tick();
    }
    let steps = s.step_count();
    let position = s.position();
    let secs = s.secs_left();
    let hundredths = s.hundredths_left();
    let score = s.result().map(|r| r.total_score);

    assert_eq!(s.submit_action(Action::Right), ActionOutcome::Ignored);
    assert_eq!(s.tick(), TickOutcome::Idle);
    assert_eq!(s.step_count(), steps);
    assert_eq!(s.position(), position);
    assert_eq!(s.secs_left(), secs);
    assert_eq!(s.hundredths_left(), hundredths);
    assert_eq!(s.result().map(|r| r.total_score), score);
}

// Property 8: reset returns every field to its Idle default and drops the
// frozen result (so nothing is left to resubmit).
#[test]
fn reset_restores_idle_defaults() {
    let mut s = started("Grace");
    s.submit_action(Action::Left);
    s.submit_action(Action::Right);
    while s.phase() == Phase::Playing {
        s.tick();
    }
    s.reset();
    assert_eq!(s.phase(), Phase::Idle);
    assert_eq!(s.step_count(), 0);
    assert_eq!(s.position(), 0);
    assert_eq!(s.player_name(), "");
    assert_eq!(s.secs_left(), SESSION_SECONDS);
    assert_eq!(s.hundredths_left(), 0);
    assert!(s.result().is_none());
    assert!(s.finish_cause().is_none());
}

// Reset while Playing discards the session without scoring.
#[test]
fn reset_while_playing_discards_without_scoring() {
    let mut s = started("Heidi");
    s.submit_action(Action::Left);
    s.reset();
    assert_eq!(s.phase(), Phase::Idle);
    assert!(s.result().is_none());
}

#[test]
fn blank_name_start_is_rejected_without_mutation() {
    let mut s = Session::new();
    s.set_player_name(" \t ");
    assert_eq!(s.start(), Err(StartError::BlankName));
    assert_eq!(s.phase(), Phase::Idle);
    assert_eq!(s.secs_left(), SESSION_SECONDS);
}

#[test]
fn start_is_only_legal_from_idle() {
    let mut s = started("Ivan");
    assert_eq!(s.start(), Err(StartError::NotIdle));
    assert_eq!(s.phase(), Phase::Playing);
}
