//! Fast Break core crate.
//!
//! A two-key arcade sprint compiled to WebAssembly: the player alternates A
//! and D (keyboard or on-screen buttons) to drive a runner toward the hoop
//! before a ten-second clock runs out, earns a step count plus a time-bonus
//! score with a 0–3 star rating, and the result is submitted to a shared
//! leaderboard service. Gameplay rules live in pure modules (session,
//! scoring, leaderboard wire model) exercised by native tests;
//! `start_game()` mounts the browser harness.

use wasm_bindgen::prelude::*;

mod game;

pub use game::leaderboard::{
    DEFAULT_API_BASE, GAME_TYPE, LEADERBOARD_LIMIT, LeaderboardClient, LeaderboardSnapshot,
    ScoreRecord, ScoreSubmission, parse_snapshot,
};
pub use game::scoring::{
    GameResult, ONE_STAR_THRESHOLD, THREE_STAR_THRESHOLD, TIME_BONUS_FACTOR, TWO_STAR_THRESHOLD,
    compute_result, remaining_time, star_rating,
};
pub use game::session::{
    Action, ActionOutcome, COURSE_BOUND, FinishCause, NAME_MAX_CHARS, Phase, SESSION_SECONDS,
    STEP_DISTANCE, Session, StartError, TICK_MS, TickOutcome,
};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Mount the game against the default scoring-service address.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    game::launch(DEFAULT_API_BASE)
}

/// Mount the game against a custom scoring-service base address. The wire
/// shapes are fixed; only the host changes.
#[wasm_bindgen]
pub fn start_game_at(api_base: &str) -> Result<(), JsValue> {
    game::launch(api_base)
}
