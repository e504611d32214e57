//! Scoring engine: step count + remaining-time bonus → total score and stars.
//!
//! Two mappings exist in the wild for this game: a step-only one (no time
//! bonus, star thresholds 10 / 15 / 20 on the raw step count) and the refined
//! time-bonus one implemented here, where leftover countdown is worth
//! [`TIME_BONUS_FACTOR`] points per second and the star thresholds apply to
//! the combined total. The two are materially different designs; this crate
//! commits to the time-bonus mapping and keeps every knob as a named constant
//! so the choice is explicit rather than buried in arithmetic.

/// Points awarded per second left on the clock at the finish.
pub const TIME_BONUS_FACTOR: f64 = 2.0;

/// Minimum total score for one star. A full-course sprint that uses the whole
/// clock (20 steps, 0.00 left) lands exactly here.
pub const ONE_STAR_THRESHOLD: f64 = 20.0;
/// Minimum total score for two stars.
pub const TWO_STAR_THRESHOLD: f64 = 30.0;
/// Minimum total score for three stars. A flawless sprint tops out at 40
/// (20 steps plus the full 20-point time bonus), so the top tier sits below
/// that and stays reachable.
pub const THREE_STAR_THRESHOLD: f64 = 38.0;

/// Frozen outcome of one finished session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameResult {
    pub total_score: f64,
    /// Discrete 0–3 quality tier.
    pub stars: u8,
}

/// Remaining countdown as fractional seconds.
pub fn remaining_time(secs_left: u32, hundredths_left: u32) -> f64 {
    secs_left as f64 + hundredths_left as f64 / 100.0
}

/// Monotone step function of the total score against the three thresholds.
pub fn star_rating(total_score: f64) -> u8 {
    if total_score >= THREE_STAR_THRESHOLD {
        3
    } else if total_score >= TWO_STAR_THRESHOLD {
        2
    } else if total_score >= ONE_STAR_THRESHOLD {
        1
    } else {
        0
    }
}

/// Pure and deterministic; the session calls this exactly once, at the
/// Playing→Finished transition, with the frozen counters.
pub fn compute_result(step_count: u32, secs_left: u32, hundredths_left: u32) -> GameResult {
    let total_score =
        step_count as f64 + remaining_time(secs_left, hundredths_left) * TIME_BONUS_FACTOR;
    GameResult {
        total_score,
        stars: star_rating(total_score),
    }
}
