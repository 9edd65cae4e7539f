use crate::camera::{Vec2, Vec3};
use crate::session::PlayStateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    TogglePause,
}

const ACTION_COUNT: usize = 7;

const MOVEMENT_ACTIONS: [InputAction; 6] = [
    InputAction::MoveForward,
    InputAction::MoveBackward,
    InputAction::MoveLeft,
    InputAction::MoveRight,
    InputAction::MoveUp,
    InputAction::MoveDown,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveForward => 0,
            InputAction::MoveBackward => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::MoveUp => 4,
            InputAction::MoveDown => 5,
            InputAction::TogglePause => 6,
        }
    }
}

/// One frame of pawn input after device binding.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    actions: ActionStates,
    look_delta: Vec2,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_look_delta(mut self, look_delta: Vec2) -> Self {
        self.look_delta = look_delta;
        self
    }

    pub fn look_delta(&self) -> Vec2 {
        self.look_delta
    }

    pub fn pause_pressed(&self) -> bool {
        self.is_down(InputAction::TogglePause)
    }

    /// Movement axes: `x` right, `y` forward, `z` up.
    pub fn movement(&self) -> Vec3 {
        let axis = |positive: InputAction, negative: InputAction| {
            f32::from(u8::from(self.is_down(positive))) - f32::from(u8::from(self.is_down(negative)))
        };
        Vec3 {
            x: axis(InputAction::MoveRight, InputAction::MoveLeft),
            y: axis(InputAction::MoveForward, InputAction::MoveBackward),
            z: axis(InputAction::MoveUp, InputAction::MoveDown),
        }
    }

    /// Drops whatever the current play state forbids. Pawn movement and look
    /// are only honoured in test mode; the pause toggle always passes.
    pub fn gated(mut self, state: &PlayStateStore, test_mode: bool) -> Self {
        if !test_mode || !state.is_keyboard_movement_allowed() {
            for action in MOVEMENT_ACTIONS {
                self.actions.set(action, false);
            }
        }
        if !test_mode || !state.is_input_allowed() {
            self.look_delta = Vec2::ZERO;
        }
        self
    }
}
