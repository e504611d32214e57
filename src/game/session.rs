//! Session state machine: one play attempt from start to time-out or hoop.
//!
//! Pure Rust, no browser imports, so the whole lifecycle can be exercised by
//! native `cargo test`. The harness in `game::mod` owns the real interval
//! timer and feeds `tick()` / `submit_action()` into this type; every mutation
//! here is a complete, atomic transition.

use crate::game::scoring::{self, GameResult};

/// Distance the runner advances per accepted alternating input (canvas units).
pub const STEP_DISTANCE: u32 = 20;
/// Maximum advance distance; reaching it ends the session early ("reached the hoop").
pub const COURSE_BOUND: u32 = 400;
/// Countdown length armed on every start.
pub const SESSION_SECONDS: u32 = 10;
/// Player display names are truncated to this many characters.
pub const NAME_MAX_CHARS: usize = 20;
/// Real-time period of one countdown tick (one hundredth of a second).
pub const TICK_MS: u32 = 10;

/// The two mutually-exclusive player inputs. Keyboard A / on-screen A button
/// map to `Left`, keyboard D / on-screen D button to `Right`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Playing,
    Finished,
}

/// Which trigger ended the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinishCause {
    ReachedHoop,
    TimeExpired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartError {
    /// Trimmed player name is empty; the session stays Idle untouched.
    BlankName,
    /// `start()` is only legal from Idle.
    NotIdle,
}

/// Outcome of feeding one input event to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Repeat of the last action, or not Playing. No state change.
    Ignored,
    /// Accepted alternating input; runner advanced one step.
    Advanced,
    /// Accepted input that hit the course bound; session is now Finished.
    ReachedHoop,
}

/// Outcome of one countdown tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not Playing; tick ignored (a late interval firing must never mutate state).
    Idle,
    Running,
    /// Countdown hit 0.00; session is now Finished.
    Expired,
}

/// One complete play attempt.
///
/// Countdown is a two-level counter (whole seconds + hundredths) decremented
/// once per `tick()`; hundredths underflow wraps to 99 and borrows a second.
/// Counters freeze the instant the phase becomes `Finished` and only
/// `reset()` clears them.
#[derive(Clone, Debug)]
pub struct Session {
    phase: Phase,
    step_count: u32,
    last_action: Option<Action>,
    position: u32,
    secs_left: u32,
    hundredths_left: u32,
    player_name: String,
    result: Option<GameResult>,
    finish_cause: Option<FinishCause>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            step_count: 0,
            last_action: None,
            position: 0,
            secs_left: SESSION_SECONDS,
            hundredths_left: 0,
            player_name: String::new(),
            result: None,
            finish_cause: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn secs_left(&self) -> u32 {
        self.secs_left
    }

    pub fn hundredths_left(&self) -> u32 {
        self.hundredths_left
    }

    /// Remaining countdown as fractional seconds (for display and scoring checks).
    pub fn remaining_time(&self) -> f64 {
        scoring::remaining_time(self.secs_left, self.hundredths_left)
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Frozen score/stars, present exactly from the Playing→Finished transition
    /// until the next `reset()`.
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn finish_cause(&self) -> Option<FinishCause> {
        self.finish_cause
    }

    /// Update the display name (Idle only; truncated to [`NAME_MAX_CHARS`]).
    pub fn set_player_name(&mut self, name: &str) {
        if self.phase == Phase::Idle {
            self.player_name = name.chars().take(NAME_MAX_CHARS).collect();
        }
    }

    /// Idle → Playing. Rejects a blank/whitespace-only name without touching
    /// any counter; on success every counter is re-armed to its start value.
    pub fn start(&mut self) -> Result<(), StartError> {
        if self.phase != Phase::Idle {
            return Err(StartError::NotIdle);
        }
        if self.player_name.trim().is_empty() {
            return Err(StartError::BlankName);
        }
        self.step_count = 0;
        self.last_action = None;
        self.position = 0;
        self.secs_left = SESSION_SECONDS;
        self.hundredths_left = 0;
        self.result = None;
        self.finish_cause = None;
        self.phase = Phase::Playing;
        Ok(())
    }

    /// Feed one input event. Accepted iff Playing and the action differs from
    /// the previously accepted one (edge-triggered debounce); a repeat is a
    /// defined no-op, not an error. Hitting the course bound finishes the
    /// session within this same call.
    pub fn submit_action(&mut self, action: Action) -> ActionOutcome {
        if self.phase != Phase::Playing {
            return ActionOutcome::Ignored;
        }
        let accepted = match self.last_action {
            None => true,
            Some(last) => last != action,
        };
        if !accepted {
            return ActionOutcome::Ignored;
        }
        self.last_action = Some(action);
        self.step_count += 1;
        self.position = (self.position + STEP_DISTANCE).min(COURSE_BOUND);
        if self.position >= COURSE_BOUND {
            self.finish(FinishCause::ReachedHoop);
            return ActionOutcome::ReachedHoop;
        }
        ActionOutcome::Advanced
    }

    /// Advance the countdown by one hundredth of a second. Reaching 0.00
    /// forces the time-out finish regardless of position.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Playing {
            return TickOutcome::Idle;
        }
        if self.hundredths_left == 0 {
            if self.secs_left == 0 {
                // Zero-length countdown configured; expire on the first tick.
                self.finish(FinishCause::TimeExpired);
                return TickOutcome::Expired;
            }
            self.secs_left -= 1;
            self.hundredths_left = 99;
        } else {
            self.hundredths_left -= 1;
        }
        if self.secs_left == 0 && self.hundredths_left == 0 {
            self.finish(FinishCause::TimeExpired);
            return TickOutcome::Expired;
        }
        TickOutcome::Running
    }

    /// Any phase → Idle. Clears counters, name and the frozen result. From
    /// Playing this discards the session outright: no score is computed and
    /// nothing is submitted (the harness releases the interval on this path).
    pub fn reset(&mut self) {
        *self = Session::new();
    }

    fn finish(&mut self, cause: FinishCause) {
        self.phase = Phase::Finished;
        self.finish_cause = Some(cause);
        // Exactly one scoring computation per session, on the frozen counters.
        self.result = Some(scoring::compute_result(
            self.step_count,
            self.secs_left,
            self.hundredths_left,
        ));
    }
}
