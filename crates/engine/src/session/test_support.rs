use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::blend::BlendParams;
use super::collaborators::{
    CameraHandle, CameraRig, Observable, SequenceHandle, SequencePlayer, ViewTarget,
};

pub(crate) const PAWN_CAMERA: CameraHandle = CameraHandle(1);

pub(crate) type HookLog = Rc<RefCell<Vec<String>>>;

pub(crate) fn hook_log() -> HookLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) struct Prop {
    pub(crate) name: &'static str,
    pub(crate) camera: CameraHandle,
    pub(crate) log: HookLog,
}

impl Observable for Prop {
    fn view_target(&self) -> CameraHandle {
        self.camera
    }

    fn on_start_observe(&mut self) {
        self.log.borrow_mut().push(format!("start:{}", self.name));
    }

    fn on_end_observe(&mut self) {
        self.log.borrow_mut().push(format!("end:{}", self.name));
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingCamera {
    pub(crate) requests: Rc<RefCell<Vec<(ViewTarget, BlendParams)>>>,
    pub(crate) without_pawn: bool,
}

impl CameraRig for RecordingCamera {
    fn set_view_target(&mut self, target: ViewTarget, params: BlendParams) {
        self.requests.borrow_mut().push((target, params));
    }

    fn player_pawn(&self) -> Option<CameraHandle> {
        (!self.without_pawn).then_some(PAWN_CAMERA)
    }
}

#[derive(Clone, Default)]
pub(crate) struct ScriptedSequences {
    pub(crate) fail_create: bool,
    pub(crate) next_handle: Rc<RefCell<u64>>,
    pub(crate) played: Rc<RefCell<Vec<(SequenceHandle, Duration)>>>,
    pub(crate) stops: Rc<RefCell<Vec<SequenceHandle>>>,
}

impl SequencePlayer for ScriptedSequences {
    fn create(&mut self, _sequence: &str) -> Option<SequenceHandle> {
        if self.fail_create {
            return None;
        }
        let mut next = self.next_handle.borrow_mut();
        *next += 1;
        Some(SequenceHandle(*next))
    }

    fn play(&mut self, handle: SequenceHandle, duration: Duration) {
        self.played.borrow_mut().push((handle, duration));
    }

    fn poll_stopped(&mut self, _dt: Duration) -> Vec<SequenceHandle> {
        std::mem::take(&mut *self.stops.borrow_mut())
    }
}
