use std::time::Duration;

use engine::{
    BlendParams, CameraHandle, CameraRig, GameMode, InputAction, InputSnapshot, ItemId,
    MiniGameTrigger, Observable, SequenceHandle, SequencePlayer, Session, SessionConfig, Vec2,
    ViewTarget,
};
use tracing::{debug, info, trace, warn};

const PAWN_CAMERA: CameraHandle = CameraHandle(1);
const INTRO_SEQUENCE: &str = "intro";
const KNOWN_SEQUENCES: [&str; 2] = [INTRO_SEQUENCE, "credits"];

struct ActiveBlend {
    target: ViewTarget,
    params: BlendParams,
    elapsed: Duration,
}

/// Stand-in camera manager that tracks one blend at a time.
pub(crate) struct DemoCamera {
    current: ViewTarget,
    blend: Option<ActiveBlend>,
}

impl DemoCamera {
    pub(crate) fn new() -> Self {
        Self {
            current: ViewTarget::Pawn(PAWN_CAMERA),
            blend: None,
        }
    }
}

impl CameraRig for DemoCamera {
    fn set_view_target(&mut self, target: ViewTarget, params: BlendParams) {
        info!(
            ?target,
            blend_seconds = params.blend_time_seconds,
            function = ?params.function,
            "camera_blend_requested"
        );
        self.blend = Some(ActiveBlend {
            target,
            params,
            elapsed: Duration::ZERO,
        });
    }

    fn player_pawn(&self) -> Option<CameraHandle> {
        Some(PAWN_CAMERA)
    }

    fn advance(&mut self, dt: Duration) {
        let Some(blend) = self.blend.as_mut() else {
            return;
        };
        blend.elapsed += dt;
        trace!(
            progress = blend.params.progress(blend.elapsed),
            "camera_blend_progress"
        );
        if blend.elapsed >= blend.params.duration() {
            self.current = blend.target;
            self.blend = None;
            debug!(target = ?self.current, "camera_blend_finished");
        }
    }
}

/// Plays named sequences for a fixed wall-clock duration.
pub(crate) struct DemoSequencePlayer {
    next_handle: u64,
    playing: Vec<(SequenceHandle, Duration)>,
}

impl DemoSequencePlayer {
    pub(crate) fn new() -> Self {
        Self {
            next_handle: 0,
            playing: Vec::new(),
        }
    }
}

impl SequencePlayer for DemoSequencePlayer {
    fn create(&mut self, sequence: &str) -> Option<SequenceHandle> {
        if !KNOWN_SEQUENCES.contains(&sequence) {
            warn!(sequence, "sequence_asset_missing");
            return None;
        }
        self.next_handle += 1;
        Some(SequenceHandle(self.next_handle))
    }

    fn play(&mut self, handle: SequenceHandle, duration: Duration) {
        info!(
            handle = handle.0,
            seconds = duration.as_secs_f32(),
            "sequence_playing"
        );
        self.playing.push((handle, duration));
    }

    fn poll_stopped(&mut self, dt: Duration) -> Vec<SequenceHandle> {
        let mut stopped = Vec::new();
        self.playing.retain_mut(|(handle, remaining)| {
            *remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                stopped.push(*handle);
                return false;
            }
            true
        });
        stopped
    }
}

/// Level prop the player can inspect up close.
pub(crate) struct InspectableProp {
    name: &'static str,
    camera: CameraHandle,
}

impl Observable for InspectableProp {
    fn view_target(&self) -> CameraHandle {
        self.camera
    }

    fn on_start_observe(&mut self) {
        info!(prop = self.name, "prop_inspection_started");
    }

    fn on_end_observe(&mut self) {
        info!(prop = self.name, "prop_inspection_ended");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScriptAction {
    Observe(&'static str),
    ReturnToPlayer,
    Trigger(MiniGameTrigger),
    PlayCutscene {
        sequence: &'static str,
        seconds: f32,
    },
    Press(InputAction),
    CollectItem(&'static str),
    SetGameMode(GameMode),
    MoveCursor(Option<Vec2>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScriptStep {
    pub(crate) at: Duration,
    pub(crate) action: ScriptAction,
}

/// Timed list of player actions replayed by the loop runner.
#[derive(Debug, Clone)]
pub(crate) struct DemoScript {
    steps: Vec<ScriptStep>,
    next: usize,
}

impl DemoScript {
    pub(crate) fn new(mut steps: Vec<ScriptStep>) -> Self {
        steps.sort_by_key(|step| step.at);
        Self { steps, next: 0 }
    }

    pub(crate) fn standard() -> Self {
        let step = |seconds: f32, action| ScriptStep {
            at: Duration::from_secs_f32(seconds),
            action,
        };
        Self::new(vec![
            step(
                0.1,
                ScriptAction::PlayCutscene {
                    sequence: INTRO_SEQUENCE,
                    seconds: 1.0,
                },
            ),
            step(1.5, ScriptAction::Observe("journal")),
            step(1.75, ScriptAction::Observe("music_box")),
            step(3.0, ScriptAction::CollectItem("old_key")),
            step(3.5, ScriptAction::ReturnToPlayer),
            step(4.0, ScriptAction::MoveCursor(Some(Vec2 { x: 600.0, y: 200.0 }))),
            step(4.2, ScriptAction::Observe("boulder")),
            step(4.8, ScriptAction::MoveCursor(None)),
            step(5.0, ScriptAction::Trigger(MiniGameTrigger::start("fishing"))),
            step(5.5, ScriptAction::Press(InputAction::MoveForward)),
            step(6.0, ScriptAction::Trigger(MiniGameTrigger::end("fishing"))),
            step(6.5, ScriptAction::Press(InputAction::TogglePause)),
            step(7.0, ScriptAction::Press(InputAction::TogglePause)),
            step(7.5, ScriptAction::SetGameMode(GameMode::ThirdPerson)),
        ])
    }

    /// Returns every step scheduled at or before `now` that has not run yet.
    pub(crate) fn due(&mut self, now: Duration) -> Vec<ScriptAction> {
        let start = self.next;
        while self.next < self.steps.len() && self.steps[self.next].at <= now {
            self.next += 1;
        }
        self.steps[start..self.next]
            .iter()
            .map(|step| step.action.clone())
            .collect()
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.next >= self.steps.len()
    }
}

/// Per-tick input assembled from script actions. The cursor persists across
/// ticks; the snapshot does not.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FrameInput {
    pub(crate) snapshot: InputSnapshot,
    pub(crate) cursor_px: Option<Vec2>,
}

/// Applies one scripted action. Returns false when the session rejected it.
pub(crate) fn apply(session: &mut Session, action: ScriptAction, input: &mut FrameInput) -> bool {
    debug!(?action, "script_action");
    match action {
        ScriptAction::Observe(name) => {
            let Some(id) = session.objects().find_by_name(name) else {
                warn!(name, "script_target_missing");
                return false;
            };
            report(session.observe(id), "observe")
        }
        ScriptAction::ReturnToPlayer => report(session.return_to_player(), "return_to_player"),
        ScriptAction::Trigger(trigger) => {
            trigger.on_begin_overlap(session);
            true
        }
        ScriptAction::PlayCutscene { sequence, seconds } => report(
            session
                .play_sequence(sequence, Duration::from_secs_f32(seconds))
                .map(|_| ()),
            "play_sequence",
        ),
        ScriptAction::Press(action) => {
            input.snapshot = input.snapshot.with_action_down(action, true);
            true
        }
        ScriptAction::CollectItem(item) => {
            if !session.collect_item(ItemId::from(item)) {
                debug!(item, "item_already_collected");
            }
            true
        }
        ScriptAction::SetGameMode(mode) => {
            session.set_game_mode(mode);
            true
        }
        ScriptAction::MoveCursor(cursor_px) => {
            input.cursor_px = cursor_px;
            true
        }
    }
}

fn report(result: Result<(), engine::ViewError>, request: &'static str) -> bool {
    match result {
        Ok(()) => true,
        Err(error) => {
            warn!(request, error = %error, "view_request_rejected");
            false
        }
    }
}

/// Builds the session with the demo collaborators, the level props and HUD
/// listeners.
pub(crate) fn build_session(config: SessionConfig) -> Session {
    let mut session = Session::new(
        config,
        Box::new(DemoCamera::new()),
        Box::new(DemoSequencePlayer::new()),
    );

    let objects = session.objects_mut();
    objects.spawn_observable(
        "journal",
        InspectableProp {
            name: "journal",
            camera: CameraHandle(10),
        },
    );
    objects.spawn_observable(
        "music_box",
        InspectableProp {
            name: "music_box",
            camera: CameraHandle(11),
        },
    );
    objects.spawn_inert("boulder");

    session.play_state().subscribe(|state| {
        info!(state = state.as_token(), "hud_play_state");
    });
    session.items().on_collected().subscribe(|item| {
        info!(item = %item, "hud_item_collected");
    });
    session.on_game_mode_changed().subscribe(|mode| {
        info!(game_mode = mode.as_token(), "hud_game_mode");
    });
    session
}
