// Integration tests (native) for the scoring engine.
// Pure arithmetic, no wasm functionality involved.

use fast_break::{
    ONE_STAR_THRESHOLD, THREE_STAR_THRESHOLD, TIME_BONUS_FACTOR, TWO_STAR_THRESHOLD,
    compute_result, remaining_time, star_rating,
};

// Property 4: pure and deterministic.
#[test]
fn compute_result_is_pure() {
    let a = compute_result(13, 4, 37);
    let b = compute_result(13, 4, 37);
    assert_eq!(a.total_score, b.total_score);
    assert_eq!(a.stars, b.stars);
}

// Property 4: under the time-bonus mapping, 20 steps with no time left and
// zero steps with a full 20 points of time bonus land on the same rating.
#[test]
fn steps_and_time_bonus_are_interchangeable() {
    let all_steps = compute_result(20, 0, 0);
    // 10.00s remaining * factor 2 = 20 bonus points.
    let all_time = compute_result(0, 10, 0);
    assert_eq!(all_steps.total_score, all_time.total_score);
    assert_eq!(all_steps.stars, all_time.stars);
    assert_eq!(all_steps.stars, 1);
}

// The rejected step-only mapping (thresholds 10/15/20 on raw steps) would
// rate 20 steps at three stars; the time-bonus mapping must not.
#[test]
fn variants_are_not_conflated() {
    let r = compute_result(20, 0, 0);
    assert_eq!(r.stars, 1, "20 steps alone is one star under the time-bonus mapping");
}

// Every star tier must be reachable: the ceiling of a real session is 20
// steps (course bound) plus the full-clock time bonus, and that ceiling has
// to clear the top threshold.
#[test]
fn top_rating_is_reachable_by_a_flawless_sprint() {
    let max_steps = fast_break::COURSE_BOUND / fast_break::STEP_DISTANCE;
    let ceiling = compute_result(max_steps, fast_break::SESSION_SECONDS, 0);
    assert!(ceiling.total_score >= THREE_STAR_THRESHOLD);
    assert_eq!(ceiling.stars, 3);
}

#[test]
fn remaining_time_combines_both_counter_levels() {
    assert!((remaining_time(7, 42) - 7.42).abs() < 1e-9);
    assert_eq!(remaining_time(0, 0), 0.0);
}

#[test]
fn total_score_applies_the_bonus_factor() {
    let r = compute_result(12, 3, 50);
    assert_eq!(r.total_score, 12.0 + 3.5 * TIME_BONUS_FACTOR);
}

#[test]
fn star_rating_is_monotone_across_thresholds() {
    let samples = [
        (0.0, 0),
        (ONE_STAR_THRESHOLD - 0.5, 0),
        (ONE_STAR_THRESHOLD, 1),
        (TWO_STAR_THRESHOLD - 0.5, 1),
        (TWO_STAR_THRESHOLD, 2),
        (THREE_STAR_THRESHOLD - 0.5, 2),
        (THREE_STAR_THRESHOLD, 3),
        (THREE_STAR_THRESHOLD + 100.0, 3),
    ];
    let mut prev = 0;
    for (score, expected) in samples {
        let stars = star_rating(score);
        assert_eq!(stars, expected, "score {score}");
        assert!(stars >= prev, "rating dipped at score {score}");
        prev = stars;
    }
}
