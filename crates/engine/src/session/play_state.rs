use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::notifier::{Notifier, SubscriptionToken};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayState {
    #[default]
    Exploring,
    Cutscene,
    Paused,
    MiniGame,
    Observing,
}

impl PlayState {
    pub const ALL: [PlayState; 5] = [
        PlayState::Exploring,
        PlayState::Cutscene,
        PlayState::Paused,
        PlayState::MiniGame,
        PlayState::Observing,
    ];

    pub fn allows_input(self) -> bool {
        !matches!(self, PlayState::Cutscene | PlayState::Paused)
    }

    pub fn allows_keyboard_movement(self) -> bool {
        !matches!(
            self,
            PlayState::Cutscene | PlayState::Paused | PlayState::MiniGame
        )
    }

    pub fn as_token(self) -> &'static str {
        match self {
            PlayState::Exploring => "exploring",
            PlayState::Cutscene => "cutscene",
            PlayState::Paused => "paused",
            PlayState::MiniGame => "mini_game",
            PlayState::Observing => "observing",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayStateRecord {
    pub current: PlayState,
    pub previous: PlayState,
}

/// Session-wide play state with one level of history.
///
/// Clones share the same record and subscriber list, so a subscriber may keep
/// a clone and request further transitions from inside a broadcast.
#[derive(Debug, Clone, Default)]
pub struct PlayStateStore {
    record: Rc<Cell<PlayStateRecord>>,
    changed: Notifier<PlayState>,
}

impl PlayStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> PlayState {
        self.record.get().current
    }

    pub fn previous(&self) -> PlayState {
        self.record.get().previous
    }

    pub fn record(&self) -> PlayStateRecord {
        self.record.get()
    }

    /// Returns `false` without notifying when `next` is already current.
    pub fn set_state(&self, next: PlayState) -> bool {
        let record = self.record.get();
        if next == record.current {
            return false;
        }

        self.record.set(PlayStateRecord {
            current: next,
            previous: record.current,
        });
        debug!(
            from = record.current.as_token(),
            to = next.as_token(),
            "play_state_changed"
        );
        self.changed.broadcast(&next);
        true
    }

    pub fn restore_previous(&self) -> bool {
        self.set_state(self.previous())
    }

    pub fn is_input_allowed(&self) -> bool {
        self.current().allows_input()
    }

    pub fn is_keyboard_movement_allowed(&self) -> bool {
        self.current().allows_keyboard_movement()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionToken
    where
        F: Fn(&PlayState) + 'static,
    {
        self.changed.subscribe(callback)
    }

    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        self.changed.unsubscribe(token)
    }

    pub fn on_changed(&self) -> &Notifier<PlayState> {
        &self.changed
    }
}
