//! Browser harness for the Fast Break sprint game.
//!
//! This module owns everything that touches the page: the court canvas, the
//! DOM overlays (name entry, HUD, A/D buttons, result panel, leaderboard),
//! the keyboard/click listeners, the 10 ms countdown interval and the
//! requestAnimationFrame render loop. All gameplay rules live in the pure
//! submodules (`session`, `scoring`, `leaderboard`) so they stay testable
//! without a browser; the harness only feeds events into the [`Session`] and
//! draws whatever state comes back.
use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlInputElement, window};

pub mod leaderboard;
pub mod scoring;
pub mod session;

use self::leaderboard::{LEADERBOARD_LIMIT, LeaderboardClient, LeaderboardSnapshot, ScoreSubmission};
use self::session::{
    Action, ActionOutcome, COURSE_BOUND, Phase, STEP_DISTANCE, Session, StartError, TICK_MS,
    TickOutcome,
};

// --- Harness state -----------------------------------------------------------

const COURT_W: u32 = 640;
const COURT_H: u32 = 240;
/// Horizontal padding between the canvas edge and the runnable lane.
const LANE_MARGIN: f64 = 50.0;
/// Duration of the runner ease between two accepted steps.
const STEP_ANIM_MS: f64 = 180.0;

/// Everything the running page instance owns. One live instance at a time;
/// `launch` is idempotent so a second call cannot spawn a rival session.
struct GameUi {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    session: Session,
    api_base: String,
    /// Opaque id generated once per page load, stable until reload.
    player_id: String,
    /// Live countdown interval; must be released on every terminal transition.
    interval_handle: Option<i32>,
    leaderboard: LeaderboardSnapshot,
    // Runner ease between the previous and current step position.
    run_from: f64,
    run_to: f64,
    run_start_ms: f64,
    /// Message shown when a start attempt is rejected (blank name).
    notice: String,
}

// RefCell::new isn't const on this toolchain; allow Clippy lint until a const initializer is feasible.
thread_local! {
    static GAME_STATE: RefCell<Option<GameUi>> = RefCell::new(None);
}

// --- Entry point -------------------------------------------------------------

pub fn launch(api_base: &str) -> Result<(), JsValue> {
    // Already mounted: keep the existing state (and its page-stable player id).
    let mounted = GAME_STATE.with(|cell| cell.borrow().is_some());
    if mounted {
        return Ok(());
    }

    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    // Create / reuse the court canvas.
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("fb-court") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("fb-court");
        c.set_width(COURT_W);
        c.set_height(COURT_H);
        c.set_attribute("style", "position:fixed; left:50%; top:34%; transform:translate(-50%,-50%); box-shadow:0 0 32px 0 rgba(0,0,0,0.18); border-radius:14px; border:2px solid #222; background:#123a18; z-index:20;").ok();
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas.get_context("2d")?.unwrap().dyn_into()?;

    build_overlays(&doc)?;

    let now = win.performance().map(|p| p.now()).unwrap_or(0.0);
    let start_px = runner_px(COURT_W as f64, 0);
    let ui = GameUi {
        canvas,
        ctx,
        session: Session::new(),
        api_base: api_base.to_string(),
        player_id: fresh_player_id(),
        interval_handle: None,
        leaderboard: LeaderboardSnapshot::default(),
        run_from: start_px,
        run_to: start_px,
        run_start_ms: now,
        notice: String::new(),
    };
    GAME_STATE.with(|cell| cell.replace(Some(ui)));

    attach_listeners(&doc)?;

    // Populate the board once on mount; a failure just leaves it empty.
    let client = LeaderboardClient::new(api_base.to_string());
    wasm_bindgen_futures::spawn_local(async move {
        let snapshot = client.fetch_top(LEADERBOARD_LIMIT).await;
        GAME_STATE.with(|cell| {
            if let Some(st) = cell.borrow_mut().as_mut() {
                st.leaderboard = snapshot;
            }
        });
    });

    start_render_loop();
    Ok(())
}

// --- DOM construction --------------------------------------------------------

fn ensure_div(doc: &Document, id: &str, style: &str) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let el = doc.create_element("div")?;
    el.set_id(id);
    el.set_attribute("style", style).ok();
    doc.body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .append_child(&el)?;
    Ok(el)
}

fn ensure_button(doc: &Document, id: &str, label: &str, style: &str) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let el = doc.create_element("button")?;
    el.set_id(id);
    el.set_text_content(Some(label));
    el.set_attribute("style", style).ok();
    doc.body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .append_child(&el)?;
    Ok(el)
}

fn build_overlays(doc: &Document) -> Result<(), JsValue> {
    let title = ensure_div(doc, "fb-title", "position:fixed; top:6%; left:50%; transform:translateX(-50%); font-family:'Fira Code', monospace; font-size:22px; color:#ffd166; text-shadow:0 2px 6px rgba(0,0,0,0.4); z-index:30;")?;
    title.set_text_content(Some("Fast Break — alternate A and D to sprint to the hoop!"));

    // Name entry + start (Idle only).
    if doc.get_element_by_id("fb-name").is_none() {
        let input: HtmlInputElement = doc.create_element("input")?.dyn_into()?;
        input.set_id("fb-name");
        input.set_attribute("placeholder", "Your name").ok();
        input.set_attribute("maxlength", "20").ok();
        input.set_attribute("style", "position:fixed; left:50%; top:58%; transform:translateX(-50%); font-family:'Fira Code', monospace; font-size:18px; padding:8px 12px; border:1px solid #333; border-radius:6px; z-index:30;").ok();
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&input)?;
    }
    ensure_button(doc, "fb-start", "Start Game", "position:fixed; left:50%; top:66%; transform:translateX(-50%); font-family:'Fira Code', monospace; font-size:18px; padding:10px 28px; background:#3949ab; color:#fff; border:none; border-radius:8px; cursor:pointer; z-index:30;")?;

    // Blank-name notice.
    ensure_div(doc, "fb-notice", "position:fixed; left:50%; top:73%; transform:translateX(-50%); font-family:'Fira Code', monospace; font-size:15px; color:#ff6b6b; z-index:30;")?;

    // HUD (Playing only).
    ensure_div(doc, "fb-hud", "position:fixed; top:10px; left:50%; transform:translateX(-50%); font-family:'Fira Code', monospace; font-size:16px; padding:6px 14px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:45; letter-spacing:0.5px;")?;

    // On-screen action buttons (Playing only).
    ensure_button(doc, "fb-btn-a", "A", "position:fixed; left:calc(50% - 90px); top:62%; width:72px; height:72px; font-family:'Fira Code', monospace; font-size:28px; font-weight:bold; background:#c62828; color:#fff; border:none; border-radius:50%; cursor:pointer; box-shadow:0 4px 12px rgba(0,0,0,0.35); z-index:30;")?;
    ensure_button(doc, "fb-btn-d", "D", "position:fixed; left:calc(50% + 18px); top:62%; width:72px; height:72px; font-family:'Fira Code', monospace; font-size:28px; font-weight:bold; background:#1565c0; color:#fff; border:none; border-radius:50%; cursor:pointer; box-shadow:0 4px 12px rgba(0,0,0,0.35); z-index:30;")?;

    // Result panel + replay (Finished only).
    ensure_div(doc, "fb-result", "position:fixed; left:50%; top:56%; transform:translateX(-50%); font-family:'Fira Code', monospace; font-size:18px; text-align:center; padding:14px 22px; background:rgba(0,0,0,0.55); border:1px solid #333; border-radius:10px; color:#fff; z-index:35;")?;
    ensure_button(doc, "fb-reset", "Play Again", "position:fixed; left:50%; top:70%; transform:translateX(-50%); font-family:'Fira Code', monospace; font-size:18px; padding:10px 28px; background:#3949ab; color:#fff; border:none; border-radius:8px; cursor:pointer; z-index:35;")?;

    // Leaderboard panel (Idle + Finished).
    ensure_div(doc, "fb-board", "position:fixed; right:24px; top:50%; transform:translateY(-50%); min-width:230px; font-family:'Fira Code', monospace; font-size:14px; padding:10px 14px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:8px; color:#eee; z-index:30; line-height:1.7;")?;

    Ok(())
}

// --- Event listeners ---------------------------------------------------------

fn attach_listeners(doc: &Document) -> Result<(), JsValue> {
    // Keyboard: A / D regardless of case, ignored outside Playing by the session.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            match evt.key().to_ascii_uppercase().as_str() {
                "A" => dispatch_action(Action::Left),
                "D" => dispatch_action(Action::Right),
                _ => {}
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    attach_click(doc, "fb-start", || try_start())?;
    attach_click(doc, "fb-btn-a", || dispatch_action(Action::Left))?;
    attach_click(doc, "fb-btn-d", || dispatch_action(Action::Right))?;
    attach_click(doc, "fb-reset", || do_reset())?;
    Ok(())
}

fn attach_click(doc: &Document, id: &str, handler: impl Fn() + 'static) -> Result<(), JsValue> {
    let el = doc
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str("missing overlay element"))?;
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        handler();
    }) as Box<dyn FnMut(_)>);
    el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// --- Session control ---------------------------------------------------------

fn try_start() {
    let name = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("fb-name"))
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default();
    GAME_STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            st.session.set_player_name(&name);
            match st.session.start() {
                Ok(()) => {
                    st.notice.clear();
                    let px = runner_px(st.canvas.width() as f64, 0);
                    st.run_from = px;
                    st.run_to = px;
                    arm_countdown(st);
                }
                Err(StartError::BlankName) => {
                    st.notice = "Please enter your name to start!".to_string();
                }
                Err(StartError::NotIdle) => {}
            }
        }
    });
}

fn dispatch_action(action: Action) {
    GAME_STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            match st.session.submit_action(action) {
                ActionOutcome::Advanced => begin_step_anim(st),
                ActionOutcome::ReachedHoop => {
                    begin_step_anim(st);
                    on_session_finished(st);
                }
                ActionOutcome::Ignored => {}
            }
        }
    });
}

fn do_reset() {
    GAME_STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            // Covers reset-while-playing too: the countdown dies with the session.
            release_countdown(st);
            st.session.reset();
            st.notice.clear();
            let px = runner_px(st.canvas.width() as f64, 0);
            st.run_from = px;
            st.run_to = px;
        }
    });
    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id("fb-name") {
            if let Ok(input) = el.dyn_into::<HtmlInputElement>() {
                input.set_value("");
            }
        }
    }
}

fn arm_countdown(st: &mut GameUi) {
    release_countdown(st);
    let closure = Closure::wrap(Box::new(move || {
        GAME_STATE.with(|cell| {
            if let Some(st) = cell.borrow_mut().as_mut() {
                if st.session.tick() == TickOutcome::Expired {
                    on_session_finished(st);
                }
            }
        });
    }) as Box<dyn FnMut()>);
    if let Some(w) = window() {
        if let Ok(handle) = w.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            TICK_MS as i32,
        ) {
            st.interval_handle = Some(handle);
        }
    }
    closure.forget();
}

fn release_countdown(st: &mut GameUi) {
    if let Some(handle) = st.interval_handle.take() {
        if let Some(w) = window() {
            w.clear_interval_with_handle(handle);
        }
    }
}

/// Terminal transition housekeeping. The session has already computed and
/// frozen its score synchronously; only afterwards does the submit/refetch
/// pair go out, so the displayed result never waits on the network.
fn on_session_finished(st: &mut GameUi) {
    release_countdown(st);
    let Some(result) = st.session.result().copied() else {
        return;
    };
    let submission = ScoreSubmission::from_result(&st.player_id, &result);
    let client = LeaderboardClient::new(st.api_base.clone());
    wasm_bindgen_futures::spawn_local(async move {
        match client.submit(&submission).await {
            Ok(()) => web_sys::console::log_1(&"score saved".into()),
            Err(err) => web_sys::console::error_1(&err),
        }
        // Refresh unconditionally; a failed refresh never rolls back the submit.
        let snapshot = client.fetch_top(LEADERBOARD_LIMIT).await;
        GAME_STATE.with(|cell| {
            if let Some(st) = cell.borrow_mut().as_mut() {
                // Display-only: if a reset raced this fetch, the snapshot may
                // still land on the board but never touches session counters.
                st.leaderboard = snapshot;
            }
        });
    });
}

// --- Render loop -------------------------------------------------------------

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_render_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        GAME_STATE.with(|cell| {
            if let Some(st) = cell.borrow_mut().as_mut() {
                game_frame(st, ts);
            }
        });
        if let Some(w) = window() {
            let _ =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

fn game_frame(st: &mut GameUi, now: f64) {
    render_court(st, now);
    if let Some(doc) = window().and_then(|w| w.document()) {
        sync_overlays(st, &doc);
    }
}

fn begin_step_anim(st: &mut GameUi) {
    st.run_from = current_runner_px(st, performance_now());
    st.run_to = runner_px(st.canvas.width() as f64, st.session.position());
    st.run_start_ms = performance_now();
}

/// Map a course offset onto the canvas lane.
fn runner_px(canvas_w: f64, position: u32) -> f64 {
    let lane = canvas_w - 2.0 * LANE_MARGIN - 40.0;
    LANE_MARGIN + lane * position as f64 / COURSE_BOUND as f64
}

fn current_runner_px(st: &GameUi, now: f64) -> f64 {
    let t = ((now - st.run_start_ms) / STEP_ANIM_MS).clamp(0.0, 1.0);
    // ease-in-out-ish (simple quadratic ease)
    let ease_t = 1.0 - (1.0 - t).powf(2.0);
    st.run_from + (st.run_to - st.run_from) * ease_t
}

fn render_court(st: &mut GameUi, now: f64) {
    let w = st.canvas.width() as f64;
    let h = st.canvas.height() as f64;

    // Court floor with a subtle pulse while the clock runs.
    let pulse = if st.session.phase() == Phase::Playing {
        ((now / 600.0 * std::f64::consts::TAU).sin() * 0.5 + 0.5) * 0.2
    } else {
        0.0
    };
    let g = (58.0 + pulse * 40.0) as i32;
    st.ctx
        .set_fill_style_str(&format!("rgb(18,{},24)", g.clamp(0, 255)));
    st.ctx.fill_rect(0.0, 0.0, w, h);

    // Lane markings.
    st.ctx.set_stroke_style_str("rgba(255,255,255,0.25)");
    st.ctx.set_line_width(2.0);
    let baseline = h - 40.0;
    line(&st.ctx, LANE_MARGIN, baseline + 14.0, w - LANE_MARGIN, baseline + 14.0);

    // Finish line just short of the hoop.
    let finish_x = runner_px(w, COURSE_BOUND);
    st.ctx.set_stroke_style_str("#e53935");
    st.ctx.set_line_width(3.0);
    line(&st.ctx, finish_x, 20.0, finish_x, h - 20.0);

    // Hoop: backboard pole + orange rim.
    let hoop_x = finish_x + 28.0;
    st.ctx.set_stroke_style_str("#8d4f13");
    st.ctx.set_line_width(5.0);
    line(&st.ctx, hoop_x, baseline + 14.0, hoop_x, baseline - 60.0);
    st.ctx.set_stroke_style_str("#fb8c00");
    st.ctx.set_line_width(4.0);
    st.ctx.begin_path();
    st.ctx
        .arc(hoop_x - 10.0, baseline - 58.0, 12.0, 0.0, std::f64::consts::TAU)
        .ok();
    st.ctx.stroke();

    // Runner with a small hop arc while easing between steps.
    let t = ((now - st.run_start_ms) / STEP_ANIM_MS).clamp(0.0, 1.0);
    let hop = (t * std::f64::consts::PI).sin() * 8.0;
    let rx = current_runner_px(st, now);
    st.ctx.set_fill_style_str("#1e88e5");
    st.ctx.begin_path();
    st.ctx
        .arc(rx, baseline - hop, 12.0, 0.0, std::f64::consts::TAU)
        .ok();
    st.ctx.fill();
    st.ctx.set_fill_style_str("#ffcc80");
    st.ctx.begin_path();
    st.ctx
        .arc(rx, baseline - hop - 16.0, 6.0, 0.0, std::f64::consts::TAU)
        .ok();
    st.ctx.fill();
}

// --- Overlay sync ------------------------------------------------------------

fn sync_overlays(st: &GameUi, doc: &Document) {
    let phase = st.session.phase();
    let idle = phase == Phase::Idle;
    let playing = phase == Phase::Playing;
    let finished = phase == Phase::Finished;

    set_visible(doc, "fb-name", idle);
    set_visible(doc, "fb-start", idle);
    set_visible(doc, "fb-notice", idle && !st.notice.is_empty());
    set_visible(doc, "fb-hud", playing);
    set_visible(doc, "fb-btn-a", playing);
    set_visible(doc, "fb-btn-d", playing);
    set_visible(doc, "fb-result", finished);
    set_visible(doc, "fb-reset", finished);
    set_visible(doc, "fb-board", !playing);

    if let Some(el) = doc.get_element_by_id("fb-notice") {
        el.set_text_content(Some(&st.notice));
    }
    if playing {
        if let Some(el) = doc.get_element_by_id("fb-hud") {
            let s = &st.session;
            el.set_text_content(Some(&format!(
                "Steps {}  |  {}.{:02} s  |  Progress {}/{}",
                s.step_count(),
                s.secs_left(),
                s.hundredths_left(),
                s.position() / STEP_DISTANCE,
                COURSE_BOUND / STEP_DISTANCE,
            )));
        }
    }
    if finished {
        if let Some(el) = doc.get_element_by_id("fb-result") {
            el.set_inner_html(&result_html(st));
        }
    }
    if let Some(el) = doc.get_element_by_id("fb-board") {
        el.set_inner_html(&board_html(&st.leaderboard));
    }
}

fn set_visible(doc: &Document, id: &str, visible: bool) {
    if let Some(el) = doc.get_element_by_id(id) {
        if visible {
            el.remove_attribute("hidden").ok();
        } else {
            el.set_attribute("hidden", "hidden").ok();
        }
    }
}

fn result_html(st: &GameUi) -> String {
    let s = &st.session;
    let (score, stars) = s
        .result()
        .map(|r| (r.total_score, r.stars))
        .unwrap_or((0.0, 0));
    format!(
        "<b>Game Over, {}!</b><br>{} steps — score {}<br><span style='font-size:26px;'>{}</span>",
        html_escape(s.player_name()),
        s.step_count(),
        score.round() as i64,
        star_glyphs(stars),
    )
}

fn board_html(snapshot: &LeaderboardSnapshot) -> String {
    if snapshot.scores.is_empty() {
        return "<b>🏆 Leaderboard</b><br><em>No scores yet. Be the first to play!</em>".to_string();
    }
    let mut html = String::from("<b>🏆 Leaderboard</b>");
    for (i, rec) in snapshot.scores.iter().enumerate() {
        html.push_str(&format!(
            "<div>#{} {} — {} {}</div>",
            i + 1,
            html_escape(&rec.player_id),
            rec.score,
            star_glyphs(rec.stars),
        ));
    }
    html
}

fn star_glyphs(stars: u8) -> String {
    "⭐".repeat(stars as usize)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;")
}

// --- Small helpers -----------------------------------------------------------

fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// `player_<epoch ms>`, derived from the performance clock so no extra
/// dependency is needed for wall time.
fn fresh_player_id() -> String {
    let epoch_ms = window()
        .and_then(|w| w.performance())
        .map(|p| p.time_origin() + p.now())
        .unwrap_or(0.0);
    format!("player_{}", epoch_ms as u64)
}

fn line(ctx: &CanvasRenderingContext2d, x1: f64, y1: f64, x2: f64, y2: f64) {
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_px_maps_course_ends_onto_lane() {
        let start = runner_px(COURT_W as f64, 0);
        let end = runner_px(COURT_W as f64, COURSE_BOUND);
        assert!((start - LANE_MARGIN).abs() < 1e-9);
        assert!(end > start);
        assert!(end < COURT_W as f64 - LANE_MARGIN);
    }

    #[test]
    fn star_glyphs_repeat() {
        assert_eq!(star_glyphs(0), "");
        assert_eq!(star_glyphs(3), "⭐⭐⭐");
    }

    #[test]
    fn html_escape_neutralizes_markup() {
        assert_eq!(html_escape("<img>&x"), "&lt;img>&amp;x");
    }
}
