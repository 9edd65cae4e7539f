use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::play_state::{PlayState, PlayStateStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    MiniGame,
    Cutscene,
}

impl ActivityKind {
    pub fn play_state(self) -> PlayState {
        match self {
            ActivityKind::MiniGame => PlayState::MiniGame,
            ActivityKind::Cutscene => PlayState::Cutscene,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivitySession {
    pub kind: ActivityKind,
    pub entered_from: PlayState,
}

/// Entry and exit for transient activities.
///
/// Ending an activity restores whatever the store holds as `previous` at that
/// moment. If another transition happened while the activity ran, that is not
/// the state the activity was entered from.
#[derive(Debug, Default)]
pub struct ActivityGateway {
    active: Option<ActivitySession>,
}

impl ActivityGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_session(&self) -> Option<ActivitySession> {
        self.active
    }

    pub fn start_activity(&mut self, state: &PlayStateStore, kind: ActivityKind) {
        if !state.set_state(kind.play_state()) {
            debug!(?kind, "activity_already_running");
            return;
        }

        let session = ActivitySession {
            kind,
            entered_from: state.previous(),
        };
        self.active = Some(session);
        info!(?kind, entered_from = session.entered_from.as_token(), "activity_started");
    }

    pub fn end_activity(&mut self, state: &PlayStateStore, kind: ActivityKind) {
        let restore_to = state.previous();
        match self.active {
            Some(session) if session.kind == kind => {
                self.active = None;
                if session.entered_from != restore_to {
                    warn!(
                        ?kind,
                        entered_from = session.entered_from.as_token(),
                        restoring = restore_to.as_token(),
                        "activity_restore_diverged"
                    );
                }
            }
            _ => debug!(?kind, "activity_end_without_matching_start"),
        }

        state.restore_previous();
        info!(?kind, state = state.current().as_token(), "activity_ended");
    }
}
