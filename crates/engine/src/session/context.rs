use std::time::Duration;

use tracing::{debug, info};

use super::activity::{ActivityGateway, ActivityKind, ActivitySession};
use super::blend::BlendParams;
use super::collaborators::{CameraRig, SequenceHandle, SequencePlayer};
use super::config::SessionConfig;
use super::game_mode::GameMode;
use super::items::{ItemId, ItemLedger};
use super::notifier::Notifier;
use super::observation::{ObjectId, ObservationRegistry, Observables};
use super::play_state::{PlayState, PlayStateStore};
use super::scheduler::TimerQueue;
use super::view::{ViewContext, ViewError, ViewTransitionCoordinator};
use crate::camera::{CameraOffsetSettings, CursorOffset, Vec2};
use crate::input::InputSnapshot;

/// Everything that lives for one play session. Created at startup and passed
/// by reference to whatever needs it.
pub struct Session {
    config: SessionConfig,
    state: PlayStateStore,
    objects: Observables,
    view: ViewTransitionCoordinator,
    activities: ActivityGateway,
    items: ItemLedger,
    game_mode: GameMode,
    game_mode_changed: Notifier<GameMode>,
    cursor_offset: CursorOffset,
    timers: TimerQueue,
    camera: Box<dyn CameraRig>,
    sequences: Box<dyn SequencePlayer>,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        camera: Box<dyn CameraRig>,
        sequences: Box<dyn SequencePlayer>,
    ) -> Self {
        let game_mode = config.initial_game_mode;
        info!(
            game_mode = game_mode.as_token(),
            test_mode = config.test_mode,
            "session_started"
        );
        Self {
            config,
            state: PlayStateStore::new(),
            objects: Observables::new(),
            view: ViewTransitionCoordinator::new(),
            activities: ActivityGateway::new(),
            items: ItemLedger::new(),
            game_mode,
            game_mode_changed: Notifier::new(),
            cursor_offset: CursorOffset::default(),
            timers: TimerQueue::new(),
            camera,
            sequences,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn play_state(&self) -> &PlayStateStore {
        &self.state
    }

    pub fn current_state(&self) -> PlayState {
        self.state.current()
    }

    pub fn objects(&self) -> &Observables {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut Observables {
        &mut self.objects
    }

    pub fn observation(&self) -> &ObservationRegistry {
        self.view.registry()
    }

    pub fn view(&self) -> &ViewTransitionCoordinator {
        &self.view
    }

    pub fn is_observed(&self, candidate: ObjectId) -> bool {
        self.view.registry().is_observed(&self.objects, candidate)
    }

    pub fn current_observed(&self) -> Option<ObjectId> {
        self.view.registry().current_target(&self.objects)
    }

    pub fn observe(&mut self, candidate: ObjectId) -> Result<(), ViewError> {
        let params = self.config.observe_blend;
        self.observe_with(candidate, params)
    }

    pub fn observe_with(
        &mut self,
        candidate: ObjectId,
        params: BlendParams,
    ) -> Result<(), ViewError> {
        let (view, mut cx) = self.view_parts();
        view.observe(&mut cx, candidate, params)
    }

    pub fn return_to_player(&mut self) -> Result<(), ViewError> {
        let params = self.config.return_blend;
        self.return_to_player_with(params)
    }

    pub fn return_to_player_with(&mut self, params: BlendParams) -> Result<(), ViewError> {
        let (view, mut cx) = self.view_parts();
        view.return_to_player(&mut cx, params)
    }

    pub fn play_sequence(
        &mut self,
        sequence: &str,
        duration: Duration,
    ) -> Result<SequenceHandle, ViewError> {
        let (view, mut cx) = self.view_parts();
        view.play_sequence(&mut cx, sequence, duration)
    }

    pub fn sequence_stopped(&mut self, handle: SequenceHandle) -> bool {
        self.view.sequence_stopped(&self.state, handle)
    }

    pub fn start_activity(&mut self, kind: ActivityKind) {
        self.activities.start_activity(&self.state, kind);
    }

    pub fn end_activity(&mut self, kind: ActivityKind) {
        self.activities.end_activity(&self.state, kind);
    }

    pub fn active_activity(&self) -> Option<ActivitySession> {
        self.activities.active_session()
    }

    pub fn pause(&mut self) -> bool {
        self.state.set_state(PlayState::Paused)
    }

    pub fn resume(&mut self) -> bool {
        self.state.restore_previous()
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.state.current() == PlayState::Paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    pub fn game_mode(&self) -> GameMode {
        self.game_mode
    }

    pub fn is_interaction_mode(&self) -> bool {
        self.game_mode == GameMode::Interaction
    }

    /// Broadcasts even when the mode is unchanged.
    pub fn set_game_mode(&mut self, mode: GameMode) {
        self.game_mode = mode;
        debug!(game_mode = mode.as_token(), "game_mode_set");
        self.game_mode_changed.broadcast(&mode);
    }

    pub fn on_game_mode_changed(&self) -> &Notifier<GameMode> {
        &self.game_mode_changed
    }

    pub fn items(&self) -> &ItemLedger {
        &self.items
    }

    pub fn collect_item(&mut self, item: ItemId) -> bool {
        self.items.collect(item)
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.items.has_item(item)
    }

    pub fn gate_input(&self, input: InputSnapshot) -> InputSnapshot {
        input.gated(&self.state, self.config.test_mode)
    }

    pub fn camera_offset_settings(&self) -> &CameraOffsetSettings {
        &self.config.camera_offset
    }

    pub fn set_camera_offset_follow_cursor_enabled(&mut self, enabled: bool) {
        self.config.camera_offset.follow_cursor_enabled = enabled;
    }

    pub fn set_camera_offset_scale_x(&mut self, scale: f32) {
        self.config.camera_offset.scale_x = scale;
    }

    pub fn set_camera_offset_scale_y(&mut self, scale: f32) {
        self.config.camera_offset.scale_y = scale;
    }

    pub fn update_camera_offset(
        &mut self,
        dt_seconds: f32,
        cursor_px: Option<Vec2>,
        window_size: (u32, u32),
    ) -> Vec2 {
        self.cursor_offset.update(
            dt_seconds,
            cursor_px,
            window_size,
            &self.config.camera_offset,
            self.game_mode,
        )
    }

    pub fn is_transition_pending(&self) -> bool {
        self.view.is_transition_pending()
    }

    pub fn elapsed(&self) -> Duration {
        self.timers.now()
    }

    /// Advances one step of the cooperative loop: camera blend, due view
    /// timers, then sequence stop events. Returns how many view transitions
    /// completed.
    pub fn update(&mut self, dt: Duration) -> usize {
        self.camera.advance(dt);

        let mut completed = 0;
        for timer in self.timers.advance(dt) {
            let (view, mut cx) = self.view_parts();
            if view.on_timer_fired(&mut cx, timer) {
                completed += 1;
            }
        }

        for handle in self.sequences.poll_stopped(dt) {
            self.view.sequence_stopped(&self.state, handle);
        }
        completed
    }

    fn view_parts(&mut self) -> (&mut ViewTransitionCoordinator, ViewContext<'_>) {
        (
            &mut self.view,
            ViewContext {
                state: &self.state,
                objects: &mut self.objects,
                camera: self.camera.as_mut(),
                scheduler: &mut self.timers,
                sequences: self.sequences.as_mut(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::session::collaborators::{CameraHandle, ViewTarget};
    use crate::session::test_support::{
        hook_log, HookLog, Prop, RecordingCamera, ScriptedSequences, PAWN_CAMERA,
    };

    struct Harness {
        session: Session,
        camera: RecordingCamera,
        sequences: ScriptedSequences,
        log: HookLog,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_collaborators(RecordingCamera::default(), ScriptedSequences::default())
        }

        fn with_collaborators(camera: RecordingCamera, sequences: ScriptedSequences) -> Self {
            let session = Session::new(
                SessionConfig::default(),
                Box::new(camera.clone()),
                Box::new(sequences.clone()),
            );
            Self {
                session,
                camera,
                sequences,
                log: hook_log(),
            }
        }

        fn spawn_prop(&mut self, name: &'static str, camera: u64) -> ObjectId {
            let prop = Prop {
                name,
                camera: CameraHandle(camera),
                log: Rc::clone(&self.log),
            };
            self.session.objects_mut().spawn_observable(name, prop)
        }

        fn hooks(&self) -> Vec<String> {
            self.log.borrow().clone()
        }

        fn advance_secs(&mut self, seconds: f32) -> usize {
            self.session.update(Duration::from_secs_f32(seconds))
        }
    }

    fn secs(seconds: f32) -> BlendParams {
        BlendParams::over_seconds(seconds)
    }

    #[test]
    fn observe_blends_then_settles_into_observing() {
        let mut h = Harness::new();
        let journal = h.spawn_prop("journal", 7);

        h.session.observe_with(journal, secs(2.0)).expect("observe");

        assert_eq!(h.session.current_state(), PlayState::Cutscene);
        assert!(h.session.is_observed(journal));
        assert_eq!(
            *h.camera.requests.borrow(),
            vec![(ViewTarget::Camera(CameraHandle(7)), secs(2.0))]
        );
        assert!(h.hooks().is_empty());

        assert_eq!(h.advance_secs(1.5), 0);
        assert_eq!(h.session.current_state(), PlayState::Cutscene);

        assert_eq!(h.advance_secs(0.5), 1);
        assert_eq!(h.session.current_state(), PlayState::Observing);
        assert_eq!(h.hooks(), vec!["start:journal"]);

        h.advance_secs(10.0);
        assert_eq!(h.hooks(), vec!["start:journal"]);
        assert!(!h.session.is_transition_pending());
    }

    #[test]
    fn observe_rejects_objects_without_the_capability() {
        let mut h = Harness::new();
        let rock = h.session.objects_mut().spawn_inert("rock");

        let err = h.session.observe(rock).expect_err("rock is not observable");

        assert_eq!(err, ViewError::NotObservable { object: rock });
        assert_eq!(h.session.current_state(), PlayState::Exploring);
        assert_eq!(h.session.current_observed(), None);
        assert!(h.camera.requests.borrow().is_empty());
    }

    #[test]
    fn observe_during_cutscene_is_busy_and_keeps_target() {
        let mut h = Harness::new();
        let journal = h.spawn_prop("journal", 7);
        let map = h.spawn_prop("map", 8);
        h.session.observe_with(journal, secs(2.0)).expect("observe");

        let err = h.session.observe_with(map, secs(1.0)).expect_err("busy");

        assert_eq!(
            err,
            ViewError::Busy {
                state: PlayState::Cutscene
            }
        );
        assert_eq!(h.session.current_observed(), Some(journal));
        assert_eq!(h.camera.requests.borrow().len(), 1);
    }

    #[test]
    fn replacing_a_pending_observe_cancels_its_timer() {
        let mut h = Harness::new();
        let journal = h.spawn_prop("journal", 7);
        let map = h.spawn_prop("map", 8);
        h.session.observe_with(journal, secs(2.0)).expect("observe journal");
        // Pausing mid-blend lifts the busy guard.
        assert!(h.session.pause());

        h.session.observe_with(map, secs(3.0)).expect("observe map");

        // The journal never reached Observing, so it gets no end hook either.
        assert!(h.hooks().is_empty());
        assert_eq!(
            h.session.view().pending_target(),
            Some(ViewTarget::Camera(CameraHandle(8)))
        );
        assert_eq!(h.advance_secs(2.0), 0);
        assert_eq!(h.session.current_state(), PlayState::Cutscene);
        assert_eq!(h.advance_secs(1.0), 1);
        assert_eq!(h.session.current_state(), PlayState::Observing);
        assert_eq!(h.hooks(), vec!["start:map"]);
        assert!(h.session.is_observed(map));
        assert!(!h.session.is_observed(journal));
        assert_eq!(h.session.view().pending_target(), None);
    }

    #[test]
    fn oversized_blend_time_keeps_the_blend_pending() {
        let mut h = Harness::new();
        let journal = h.spawn_prop("journal", 7);

        h.session
            .observe_with(journal, secs(1.0e20))
            .expect("observe");
        assert_eq!(h.advance_secs(3_600.0), 0);

        assert_eq!(h.session.current_state(), PlayState::Cutscene);
        assert!(h.session.is_transition_pending());
        assert!(h.hooks().is_empty());
    }

    #[test]
    fn observing_another_object_ends_the_current_one_first() {
        let mut h = Harness::new();
        let journal = h.spawn_prop("journal", 7);
        let map = h.spawn_prop("map", 8);
        h.session.observe_with(journal, secs(1.0)).expect("observe journal");
        h.advance_secs(1.0);

        h.session.observe_with(map, secs(1.0)).expect("observe map");
        h.advance_secs(1.0);

        assert_eq!(h.hooks(), vec!["start:journal", "end:journal", "start:map"]);
        assert!(h.session.is_observed(map));
    }

    #[test]
    fn observing_the_current_target_again_pairs_its_hooks() {
        let mut h = Harness::new();
        let journal = h.spawn_prop("journal", 7);
        h.session.observe_with(journal, secs(1.0)).expect("observe");
        h.advance_secs(1.0);

        h.session.observe_with(journal, secs(1.0)).expect("observe again");
        assert_eq!(h.hooks(), vec!["start:journal", "end:journal"]);
        h.advance_secs(1.0);
        h.session.return_to_player_with(secs(0.0)).expect("return");

        assert_eq!(
            h.hooks(),
            vec!["start:journal", "end:journal", "start:journal", "end:journal"]
        );
    }

    #[test]
    fn return_to_player_ends_observation_and_resumes_exploring() {
        let mut h = Harness::new();
        let journal = h.spawn_prop("journal", 7);
        h.session.observe_with(journal, secs(1.0)).expect("observe");
        h.advance_secs(1.0);

        h.session.return_to_player_with(secs(0.5)).expect("return");

        assert_eq!(h.session.current_state(), PlayState::Cutscene);
        assert_eq!(h.session.current_observed(), None);
        assert_eq!(h.hooks(), vec!["start:journal", "end:journal"]);
        assert_eq!(
            h.camera.requests.borrow().last().copied(),
            Some((ViewTarget::Pawn(PAWN_CAMERA), secs(0.5)))
        );

        assert_eq!(h.advance_secs(0.5), 1);
        assert_eq!(h.session.current_state(), PlayState::Exploring);
        assert_eq!(h.session.play_state().previous(), PlayState::Cutscene);
    }

    #[test]
    fn return_to_player_during_blend_is_busy() {
        let mut h = Harness::new();
        let journal = h.spawn_prop("journal", 7);
        h.session.observe_with(journal, secs(1.0)).expect("observe");

        assert!(matches!(
            h.session.return_to_player(),
            Err(ViewError::Busy { .. })
        ));
        assert!(h.hooks().is_empty());
    }

    #[test]
    fn return_to_player_without_pawn_leaves_state_alone() {
        let camera = RecordingCamera {
            without_pawn: true,
            ..RecordingCamera::default()
        };
        let mut h = Harness::with_collaborators(camera, ScriptedSequences::default());
        let journal = h.spawn_prop("journal", 7);
        h.session.observe_with(journal, secs(0.0)).expect("observe");
        h.advance_secs(0.0);
        let before = h.session.play_state().record();

        let err = h.session.return_to_player().expect_err("no pawn");

        assert_eq!(
            err,
            ViewError::MissingCollaborator {
                collaborator: "player pawn"
            }
        );
        assert_eq!(h.session.play_state().record(), before);
        assert_eq!(h.session.current_observed(), Some(journal));
    }

    #[test]
    fn target_despawned_during_blend_falls_back_to_exploring() {
        let mut h = Harness::new();
        let journal = h.spawn_prop("journal", 7);
        h.session.observe_with(journal, secs(1.0)).expect("observe");

        h.session.objects_mut().despawn(journal);
        assert_eq!(h.advance_secs(1.0), 1);

        assert_eq!(h.session.current_state(), PlayState::Exploring);
        assert_eq!(h.session.current_observed(), None);
        assert!(h.hooks().is_empty());
    }

    #[test]
    fn despawned_target_skips_end_hook_on_return() {
        let mut h = Harness::new();
        let journal = h.spawn_prop("journal", 7);
        h.session.observe_with(journal, secs(0.0)).expect("observe");
        h.advance_secs(0.0);
        h.session.objects_mut().despawn(journal);

        h.session.return_to_player_with(secs(0.0)).expect("return");
        h.advance_secs(0.0);

        assert_eq!(h.hooks(), vec!["start:journal"]);
        assert_eq!(h.session.current_state(), PlayState::Exploring);
    }

    #[test]
    fn sequence_stop_restores_previous_once() {
        let mut h = Harness::new();
        h.session.start_activity(ActivityKind::MiniGame);

        let handle = h
            .session
            .play_sequence("intro", Duration::from_secs(4))
            .expect("sequence");

        assert_eq!(h.session.current_state(), PlayState::Cutscene);
        assert_eq!(
            *h.sequences.played.borrow(),
            vec![(handle, Duration::from_secs(4))]
        );

        h.sequences.stops.borrow_mut().extend([handle, handle]);
        h.advance_secs(0.1);
        assert_eq!(h.session.current_state(), PlayState::MiniGame);
        assert_eq!(h.session.play_state().previous(), PlayState::Cutscene);

        assert!(!h.session.sequence_stopped(handle));
        assert_eq!(h.session.current_state(), PlayState::MiniGame);
    }

    #[test]
    fn sequence_creation_failure_commits_nothing() {
        let sequences = ScriptedSequences {
            fail_create: true,
            ..ScriptedSequences::default()
        };
        let mut h = Harness::with_collaborators(RecordingCamera::default(), sequences);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        h.session
            .play_state()
            .subscribe(move |state| sink.borrow_mut().push(*state));

        let err = h
            .session
            .play_sequence("missing", Duration::from_secs(1))
            .expect_err("no player");

        assert_eq!(
            err,
            ViewError::MissingCollaborator {
                collaborator: "sequence player"
            }
        );
        assert_eq!(h.session.current_state(), PlayState::Exploring);
        assert!(seen.borrow().is_empty());
        assert!(h.sequences.played.borrow().is_empty());
    }

    #[test]
    fn mini_game_round_trip() {
        let mut h = Harness::new();

        h.session.start_activity(ActivityKind::MiniGame);
        assert_eq!(h.session.current_state(), PlayState::MiniGame);
        assert_eq!(h.session.play_state().previous(), PlayState::Exploring);

        h.session.end_activity(ActivityKind::MiniGame);
        assert_eq!(h.session.current_state(), PlayState::Exploring);
    }

    #[test]
    fn ending_mini_game_after_observation_restores_latest_previous() {
        let mut h = Harness::new();
        let journal = h.spawn_prop("journal", 7);
        h.session.start_activity(ActivityKind::MiniGame);

        h.session.observe_with(journal, secs(1.0)).expect("observe");
        assert_eq!(h.session.current_state(), PlayState::Cutscene);
        assert_eq!(h.session.play_state().previous(), PlayState::MiniGame);

        h.advance_secs(1.0);
        assert_eq!(h.session.current_state(), PlayState::Observing);
        assert_eq!(h.session.play_state().previous(), PlayState::Cutscene);

        h.session.end_activity(ActivityKind::MiniGame);

        // Not the Exploring state the mini-game was entered from.
        assert_ne!(h.session.current_state(), PlayState::Exploring);
        assert_eq!(h.session.current_state(), PlayState::Cutscene);
        assert_eq!(h.session.play_state().previous(), PlayState::Observing);
    }

    #[test]
    fn pause_and_resume_restore_the_interrupted_state() {
        let mut h = Harness::new();
        h.session.start_activity(ActivityKind::MiniGame);

        assert!(h.session.toggle_pause());
        assert_eq!(h.session.current_state(), PlayState::Paused);
        assert!(!h.session.play_state().is_input_allowed());

        assert!(h.session.toggle_pause());
        assert_eq!(h.session.current_state(), PlayState::MiniGame);
    }

    #[test]
    fn game_mode_broadcasts_every_set() {
        let mut h = Harness::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        h.session
            .on_game_mode_changed()
            .subscribe(move |mode: &GameMode| sink.borrow_mut().push(*mode));

        h.session.set_game_mode(GameMode::ThirdPerson);
        h.session.set_game_mode(GameMode::ThirdPerson);

        assert!(!h.session.is_interaction_mode());
        assert_eq!(*seen.borrow(), vec![GameMode::ThirdPerson, GameMode::ThirdPerson]);
    }

    #[test]
    fn camera_offset_follows_session_settings_and_mode() {
        let mut h = Harness::new();
        h.session.set_camera_offset_scale_x(1.0);
        h.session.set_camera_offset_scale_y(1.0);

        let arm = h
            .session
            .update_camera_offset(0.016, Some(Vec2 { x: 10.0, y: 20.0 }), (20, 20));
        assert_eq!(arm, Vec2 { x: 0.0, y: 10.0 });

        h.session.set_camera_offset_follow_cursor_enabled(false);
        let frozen = h
            .session
            .update_camera_offset(0.016, Some(Vec2 { x: 0.0, y: 0.0 }), (20, 20));
        assert_eq!(frozen, arm);
    }
}
