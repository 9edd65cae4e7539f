use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::blend::BlendParams;
use super::collaborators::{CameraRig, SequenceHandle, SequencePlayer, ViewTarget};
use super::observation::{ObjectId, ObservationRegistry, Observables};
use super::play_state::{PlayState, PlayStateStore};
use super::scheduler::{Scheduler, TimerHandle};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("object {} does not support observation", object.0)]
    NotObservable { object: ObjectId },
    #[error("a view transition is already running (play state {})", state.as_token())]
    Busy { state: PlayState },
    #[error("required collaborator is unavailable: {collaborator}")]
    MissingCollaborator { collaborator: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Observe(ObjectId),
    ReturnToPlayer,
}

/// The single blend that is waiting for its completion timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransition {
    pub kind: TransitionKind,
    pub target: ViewTarget,
    pub params: BlendParams,
    pub timer: TimerHandle,
}

/// Borrowed session pieces a view request needs.
pub struct ViewContext<'a> {
    pub state: &'a PlayStateStore,
    pub objects: &'a mut Observables,
    pub camera: &'a mut dyn CameraRig,
    pub scheduler: &'a mut dyn Scheduler,
    pub sequences: &'a mut dyn SequencePlayer,
}

#[derive(Debug, Default)]
pub struct ViewTransitionCoordinator {
    registry: ObservationRegistry,
    // Target whose start hook ran and whose end hook has not.
    started: Option<ObjectId>,
    pending: Option<ViewTransition>,
    playing_sequences: Vec<SequenceHandle>,
}

impl ViewTransitionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &ObservationRegistry {
        &self.registry
    }

    pub fn pending(&self) -> Option<&ViewTransition> {
        self.pending.as_ref()
    }

    pub fn pending_target(&self) -> Option<ViewTarget> {
        self.pending.map(|pending| pending.target)
    }

    pub fn is_transition_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_sequence_playing(&self, handle: SequenceHandle) -> bool {
        self.playing_sequences.contains(&handle)
    }

    pub fn observe(
        &mut self,
        cx: &mut ViewContext<'_>,
        candidate: ObjectId,
        params: BlendParams,
    ) -> Result<(), ViewError> {
        let Some(view_camera) = cx.objects.view_target(candidate) else {
            warn!(object = candidate.0, "observe_rejected_not_observable");
            return Err(ViewError::NotObservable { object: candidate });
        };
        let state = cx.state.current();
        if state == PlayState::Cutscene {
            warn!(object = candidate.0, "observe_rejected_busy");
            return Err(ViewError::Busy { state });
        }

        cx.state.set_state(PlayState::Cutscene);
        self.registry.track(candidate);
        self.end_started(cx.objects);
        let target = ViewTarget::Camera(view_camera);
        cx.camera.set_view_target(target, params);
        self.arm(cx.scheduler, TransitionKind::Observe(candidate), target, params);
        info!(
            object = candidate.0,
            name = cx.objects.debug_name(candidate).unwrap_or("?"),
            blend_seconds = params.duration().as_secs_f32(),
            "observe_started"
        );
        Ok(())
    }

    pub fn return_to_player(
        &mut self,
        cx: &mut ViewContext<'_>,
        params: BlendParams,
    ) -> Result<(), ViewError> {
        let state = cx.state.current();
        if state == PlayState::Cutscene {
            warn!("return_to_player_rejected_busy");
            return Err(ViewError::Busy { state });
        }
        let Some(pawn) = cx.camera.player_pawn() else {
            warn!("return_to_player_without_pawn");
            return Err(ViewError::MissingCollaborator {
                collaborator: "player pawn",
            });
        };

        self.registry.clear();
        self.end_started(cx.objects);
        cx.state.set_state(PlayState::Cutscene);
        let target = ViewTarget::Pawn(pawn);
        cx.camera.set_view_target(target, params);
        self.arm(cx.scheduler, TransitionKind::ReturnToPlayer, target, params);
        info!(
            blend_seconds = params.duration().as_secs_f32(),
            "return_to_player_started"
        );
        Ok(())
    }

    /// Starts a cutscene. The play state is restored by the matching stop
    /// event rather than by a timer.
    pub fn play_sequence(
        &mut self,
        cx: &mut ViewContext<'_>,
        sequence: &str,
        duration: Duration,
    ) -> Result<SequenceHandle, ViewError> {
        let Some(handle) = cx.sequences.create(sequence) else {
            warn!(sequence, "sequence_player_unavailable");
            return Err(ViewError::MissingCollaborator {
                collaborator: "sequence player",
            });
        };

        cx.state.set_state(PlayState::Cutscene);
        self.playing_sequences.push(handle);
        cx.sequences.play(handle, duration);
        info!(sequence, handle = handle.0, "sequence_started");
        Ok(handle)
    }

    /// Only the first stop report for a playing sequence restores the
    /// previous state; repeats are ignored.
    pub fn sequence_stopped(&mut self, state: &PlayStateStore, handle: SequenceHandle) -> bool {
        let Some(index) = self
            .playing_sequences
            .iter()
            .position(|playing| *playing == handle)
        else {
            debug!(handle = handle.0, "sequence_stop_ignored");
            return false;
        };

        self.playing_sequences.remove(index);
        state.restore_previous();
        info!(
            handle = handle.0,
            state = state.current().as_token(),
            "sequence_stopped"
        );
        true
    }

    pub fn on_timer_fired(&mut self, cx: &mut ViewContext<'_>, timer: TimerHandle) -> bool {
        match self.pending {
            Some(pending) if pending.timer == timer => {
                self.pending = None;
                match pending.kind {
                    TransitionKind::Observe(target) => self.finish_observe(cx, target),
                    TransitionKind::ReturnToPlayer => {
                        cx.state.set_state(PlayState::Exploring);
                        info!("player_view_attained");
                    }
                }
                true
            }
            _ => {
                debug!(timer = timer.raw(), "stale_view_timer_ignored");
                false
            }
        }
    }

    fn finish_observe(&mut self, cx: &mut ViewContext<'_>, target: ObjectId) {
        if !cx.objects.supports_observation(target) {
            warn!(object = target.0, "observed_object_gone_before_blend_finished");
            self.registry.clear();
            cx.state.set_state(PlayState::Exploring);
            return;
        }

        cx.state.set_state(PlayState::Observing);
        if let Some(observable) = cx.objects.observable_mut(target) {
            observable.on_start_observe();
            self.started = Some(target);
        }
        info!(object = target.0, "observe_attained");
    }

    /// Runs the end hook for the object whose start hook ran last, so every
    /// start is paired with exactly one end.
    fn end_started(&mut self, objects: &mut Observables) {
        let Some(id) = self.started.take() else {
            return;
        };
        match objects.observable_mut(id) {
            Some(observable) => observable.on_end_observe(),
            None => warn!(object = id.0, "observed_object_gone_before_end_hook"),
        }
    }

    fn arm(
        &mut self,
        scheduler: &mut dyn Scheduler,
        kind: TransitionKind,
        target: ViewTarget,
        params: BlendParams,
    ) {
        if let Some(replaced) = self.pending.take() {
            scheduler.cancel(replaced.timer);
            debug!(timer = replaced.timer.raw(), "view_transition_replaced");
        }
        let timer = scheduler.schedule(params.duration());
        self.pending = Some(ViewTransition {
            kind,
            target,
            params,
            timer,
        });
    }
}
