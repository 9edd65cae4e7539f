use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::blend::{BlendFunction, BlendParams};
use super::game_mode::GameMode;
use crate::camera::CameraOffsetSettings;

pub const DEFAULT_TARGET_TPS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub observe_blend: BlendParams,
    pub return_blend: BlendParams,
    pub camera_offset: CameraOffsetSettings,
    pub initial_game_mode: GameMode,
    pub test_mode: bool,
    pub target_tps: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            observe_blend: BlendParams::over_seconds(1.0).with_function(BlendFunction::Cubic),
            return_blend: BlendParams::over_seconds(1.0).with_function(BlendFunction::Cubic),
            camera_offset: CameraOffsetSettings::default(),
            initial_game_mode: GameMode::Interaction,
            test_mode: false,
            target_tps: DEFAULT_TARGET_TPS,
        }
    }
}

impl SessionConfig {
    pub fn fixed_dt(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.target_tps.max(1)))
    }
}
