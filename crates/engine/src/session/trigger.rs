use serde::{Deserialize, Serialize};
use tracing::info;

use super::activity::ActivityKind;
use super::context::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    StartMiniGame,
    EndMiniGame,
}

/// Volume placed in the level that starts or ends a mini-game when the player
/// walks into it. Overlap detection belongs to the physics layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniGameTrigger {
    pub kind: TriggerKind,
    pub mini_game: String,
}

impl MiniGameTrigger {
    pub fn start(mini_game: impl Into<String>) -> Self {
        Self {
            kind: TriggerKind::StartMiniGame,
            mini_game: mini_game.into(),
        }
    }

    pub fn end(mini_game: impl Into<String>) -> Self {
        Self {
            kind: TriggerKind::EndMiniGame,
            mini_game: mini_game.into(),
        }
    }

    pub fn on_begin_overlap(&self, session: &mut Session) {
        info!(mini_game = %self.mini_game, kind = ?self.kind, "mini_game_trigger_entered");
        match self.kind {
            TriggerKind::StartMiniGame => session.start_activity(ActivityKind::MiniGame),
            TriggerKind::EndMiniGame => session.end_activity(ActivityKind::MiniGame),
        }
    }
}
