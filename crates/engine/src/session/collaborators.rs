use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::blend::BlendParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CameraHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewTarget {
    Pawn(CameraHandle),
    Camera(CameraHandle),
}

impl ViewTarget {
    pub fn camera(self) -> CameraHandle {
        match self {
            ViewTarget::Pawn(handle) | ViewTarget::Camera(handle) => handle,
        }
    }
}

/// Capability of a scene object that can take over the view.
pub trait Observable {
    fn view_target(&self) -> CameraHandle;
    fn on_start_observe(&mut self);
    fn on_end_observe(&mut self);
}

/// Camera subsystem. Blend requests are fire-and-forget; completion is
/// tracked by the session's own timers.
pub trait CameraRig {
    fn set_view_target(&mut self, target: ViewTarget, params: BlendParams);
    fn player_pawn(&self) -> Option<CameraHandle>;
    fn advance(&mut self, _dt: Duration) {}
}

/// Cutscene playback.
pub trait SequencePlayer {
    /// `None` when no player could be created for `sequence`.
    fn create(&mut self, sequence: &str) -> Option<SequenceHandle>;
    fn play(&mut self, handle: SequenceHandle, duration: Duration);
    /// Stop events raised since the previous poll. A player may report the
    /// same handle more than once.
    fn poll_stopped(&mut self, _dt: Duration) -> Vec<SequenceHandle> {
        Vec::new()
    }
}
