pub mod camera;
pub mod input;
pub mod session;

pub use camera::{CameraOffsetSettings, CursorOffset, Vec2, Vec3};
pub use input::{InputAction, InputSnapshot};
pub use session::{
    ActivityGateway, ActivityKind, ActivitySession, BlendFunction, BlendParams, CameraHandle,
    CameraRig, GameMode, ItemId, ItemLedger, MiniGameTrigger, Notifier, ObjectId, Observable,
    Observables, ObservationRegistry, PlayState, PlayStateRecord, PlayStateStore, Scheduler,
    SequenceHandle, SequencePlayer, Session, SessionConfig, SubscriptionToken, TimerHandle,
    TimerQueue, TransitionKind, TriggerKind, ViewContext, ViewError, ViewTarget, ViewTransition,
    ViewTransitionCoordinator, DEFAULT_BLEND_EXPONENT, DEFAULT_TARGET_TPS,
};
