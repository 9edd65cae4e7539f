use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;

use engine::{GameMode, ItemId, PlayState, Session, Vec3};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};

use super::bootstrap::AppWiring;
use super::demo::{self, FrameInput};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct DemoReport {
    pub(crate) ticks: u64,
    pub(crate) elapsed_seconds: f32,
    pub(crate) state_history: Vec<PlayState>,
    pub(crate) final_state: PlayState,
    pub(crate) previous_state: PlayState,
    pub(crate) game_mode: GameMode,
    pub(crate) items: Vec<ItemId>,
    pub(crate) rejected_actions: usize,
    pub(crate) blocked_movement_ticks: u64,
    pub(crate) timed_out: bool,
}

#[derive(Debug, Error)]
pub(crate) enum DemoError {
    #[error("demo did not settle within {limit_seconds}s (state {state:?})")]
    TimedOut { limit_seconds: f32, state: PlayState },
    #[error("failed to serialize demo report: {0}")]
    Report(#[from] serde_json::Error),
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let limit = app.max_duration;
    let report = run_demo(app);
    match summarize(&report, limit) {
        Ok(json) => {
            info!(report = %json, "demo_finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "demo_failed");
            ExitCode::FAILURE
        }
    }
}

fn summarize(report: &DemoReport, limit: Duration) -> Result<String, DemoError> {
    if report.timed_out {
        return Err(DemoError::TimedOut {
            limit_seconds: limit.as_secs_f32(),
            state: report.final_state,
        });
    }
    Ok(serde_json::to_string(report)?)
}

/// Fixed-step loop that replays the script until it is exhausted and no view
/// transition is still blending.
pub(crate) fn run_demo(app: AppWiring) -> DemoReport {
    let AppWiring {
        mut session,
        mut script,
        window_size,
        max_duration,
    } = app;

    let history = Rc::new(RefCell::new(Vec::new()));
    let history_sink = Rc::clone(&history);
    let token = session
        .play_state()
        .subscribe(move |state| history_sink.borrow_mut().push(*state));

    let fixed_dt = session.config().fixed_dt();
    let mut stats = LoopStats::default();
    let mut input = FrameInput::default();
    let mut timed_out = false;

    info!(
        fixed_dt_ms = fixed_dt.as_secs_f64() * 1_000.0,
        "demo_loop_started"
    );
    loop {
        if script.is_finished() && !session.is_transition_pending() {
            break;
        }
        if session.elapsed() >= max_duration {
            timed_out = true;
            break;
        }

        for action in script.due(session.elapsed()) {
            if !demo::apply(&mut session, action, &mut input) {
                stats.rejected_actions += 1;
            }
        }
        run_tick(&mut session, &mut input, window_size, fixed_dt, &mut stats);
    }
    session.play_state().unsubscribe(token);

    let record = session.play_state().record();
    let state_history = history.borrow().clone();
    DemoReport {
        ticks: stats.ticks,
        elapsed_seconds: session.elapsed().as_secs_f32(),
        state_history,
        final_state: record.current,
        previous_state: record.previous,
        game_mode: session.game_mode(),
        items: session.items().collected().to_vec(),
        rejected_actions: stats.rejected_actions,
        blocked_movement_ticks: stats.blocked_movement_ticks,
        timed_out,
    }
}

#[derive(Debug, Default)]
struct LoopStats {
    ticks: u64,
    rejected_actions: usize,
    blocked_movement_ticks: u64,
}

fn run_tick(
    session: &mut Session,
    input: &mut FrameInput,
    window_size: (u32, u32),
    fixed_dt: Duration,
    stats: &mut LoopStats,
) {
    let raw = std::mem::take(&mut input.snapshot);
    let gated = session.gate_input(raw);

    if raw.movement() != gated.movement() {
        stats.blocked_movement_ticks += 1;
        debug!(
            state = session.current_state().as_token(),
            "movement_input_blocked"
        );
    }
    if gated.movement() != Vec3::default() {
        debug!(movement = ?gated.movement(), "pawn_move");
    }
    if gated.pause_pressed() {
        session.toggle_pause();
    }

    let arm_offset =
        session.update_camera_offset(fixed_dt.as_secs_f32(), input.cursor_px, window_size);
    if arm_offset != engine::Vec2::ZERO {
        debug!(x = arm_offset.x, y = arm_offset.y, "camera_arm_offset");
    }

    let completed = session.update(fixed_dt);
    if completed > 0 {
        debug!(completed, "view_transitions_completed");
    }
    stats.ticks += 1;
}
