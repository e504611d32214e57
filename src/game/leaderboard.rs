//! Leaderboard wire model and HTTP client.
//!
//! The scoring service is an external collaborator; this module only speaks
//! its fixed contract: `POST {base}/score` with a JSON submission body and
//! `GET {base}/leaderboard?game_type=...&limit=N` returning ranked records.
//! The serde types and `parse_snapshot` are plain Rust and covered by native
//! tests; the fetch plumbing runs through `web_sys` + `JsFuture` and every
//! failure degrades to "leaderboard unavailable" rather than an escaping
//! error — the session's own score/stars are computed locally and never
//! depend on these calls.

use serde::{Deserialize, Serialize};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response, window};

use crate::game::scoring::GameResult;

/// Constant tag identifying this game among others on the shared service.
pub const GAME_TYPE: &str = "fast_break";
/// Default scoring-service address; override via `start_game_at`.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
/// How many records the board display asks for.
pub const LEADERBOARD_LIMIT: u32 = 10;

/// One ranked record as returned by the service (read-only to this crate).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: i64,
    pub player_id: String,
    pub game_type: String,
    pub score: i64,
    pub stars: u8,
    pub timestamp: String,
}

/// Ordered records plus a total count. Ranking order is decided by the
/// service; this snapshot is refreshed by re-fetch, never mutated locally.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct LeaderboardSnapshot {
    pub scores: Vec<ScoreRecord>,
    pub total: u32,
}

/// Body of `POST /score`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreSubmission {
    pub player_id: String,
    pub game_type: String,
    pub score: i64,
    pub stars: u8,
}

impl ScoreSubmission {
    /// The service stores an integer score column, so the fractional
    /// time-bonus total is rounded on the way out.
    pub fn from_result(player_id: &str, result: &GameResult) -> Self {
        Self {
            player_id: player_id.to_string(),
            game_type: GAME_TYPE.to_string(),
            score: result.total_score.round() as i64,
            stars: result.stars,
        }
    }
}

/// Decode a leaderboard response body; a malformed body yields the empty
/// snapshot instead of an error.
pub fn parse_snapshot(body: &str) -> LeaderboardSnapshot {
    serde_json::from_str(body).unwrap_or_default()
}

/// Thin client bound to one service base address.
pub struct LeaderboardClient {
    base: String,
}

impl LeaderboardClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Submit one finished session. Any 2xx is success and the response body
    /// is not parsed. Errors are returned so the caller can log and swallow
    /// them; they must never block returning to Idle.
    pub async fn submit(&self, submission: &ScoreSubmission) -> Result<(), JsValue> {
        let body = serde_json::to_string(submission)
            .map_err(|e| JsValue::from_str(&format!("encode submission: {e}")))?;
        let init = RequestInit::new();
        init.set_method("POST");
        init.set_body(&JsValue::from_str(&body));
        let url = format!("{}/score", self.base);
        let request = Request::new_with_str_and_init(&url, &init)?;
        request.headers().set("Content-Type", "application/json")?;
        let (status, _body) = run_fetch(&request).await?;
        if !(200..300).contains(&status) {
            return Err(JsValue::from_str(&format!(
                "score submit rejected with status {status}"
            )));
        }
        Ok(())
    }

    /// Fetch the top records for this game. Network errors, non-2xx statuses
    /// and malformed bodies all collapse to the empty snapshot.
    pub async fn fetch_top(&self, limit: u32) -> LeaderboardSnapshot {
        match self.fetch_top_inner(limit).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                web_sys::console::error_1(&err);
                LeaderboardSnapshot::default()
            }
        }
    }

    async fn fetch_top_inner(&self, limit: u32) -> Result<LeaderboardSnapshot, JsValue> {
        let url = format!(
            "{}/leaderboard?game_type={}&limit={}",
            self.base, GAME_TYPE, limit
        );
        let init = RequestInit::new();
        init.set_method("GET");
        let request = Request::new_with_str_and_init(&url, &init)?;
        let (status, body) = run_fetch(&request).await?;
        if !(200..300).contains(&status) {
            return Err(JsValue::from_str(&format!(
                "leaderboard fetch rejected with status {status}"
            )));
        }
        Ok(parse_snapshot(&body))
    }
}

async fn run_fetch(request: &Request) -> Result<(u16, String), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response_value = JsFuture::from(win.fetch_with_request(request)).await?;
    let response: Response = response_value.dyn_into()?;
    let status = response.status();
    let text = JsFuture::from(response.text()?).await?;
    Ok((status, text.as_string().unwrap_or_default()))
}
