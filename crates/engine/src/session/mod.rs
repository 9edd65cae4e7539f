mod activity;
mod blend;
mod collaborators;
mod config;
mod context;
mod game_mode;
mod items;
mod notifier;
mod observation;
mod play_state;
mod scheduler;
#[cfg(test)]
mod test_support;
mod trigger;
mod view;

pub use activity::{ActivityGateway, ActivityKind, ActivitySession};
pub use blend::{BlendFunction, BlendParams, DEFAULT_BLEND_EXPONENT};
pub use collaborators::{
    CameraHandle, CameraRig, Observable, SequenceHandle, SequencePlayer, ViewTarget,
};
pub use config::{SessionConfig, DEFAULT_TARGET_TPS};
pub use context::Session;
pub use game_mode::GameMode;
pub use items::{ItemId, ItemLedger};
pub use notifier::{Notifier, SubscriptionToken};
pub use observation::{ObjectId, ObservationRegistry, Observables};
pub use play_state::{PlayState, PlayStateRecord, PlayStateStore};
pub use scheduler::{Scheduler, TimerHandle, TimerQueue};
pub use trigger::{MiniGameTrigger, TriggerKind};
pub use view::{
    TransitionKind, ViewContext, ViewError, ViewTransition, ViewTransitionCoordinator,
};
