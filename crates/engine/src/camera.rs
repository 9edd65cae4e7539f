use serde::{Deserialize, Serialize};

use crate::session::GameMode;

const OFFSET_SNAP_DISTANCE_SQUARED: f32 = 1.0e-4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOffsetSettings {
    pub follow_cursor_enabled: bool,
    pub scale_x: f32,
    pub scale_y: f32,
    pub interp_speed: f32,
}

impl Default for CameraOffsetSettings {
    fn default() -> Self {
        Self {
            follow_cursor_enabled: true,
            scale_x: 0.1,
            scale_y: 0.1,
            interp_speed: 5.0,
        }
    }
}

/// Camera arm offset that leans toward the cursor in interaction mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorOffset {
    cursor_offset_px: Vec2,
}

impl CursorOffset {
    pub fn cursor_offset_px(&self) -> Vec2 {
        self.cursor_offset_px
    }

    /// Returns the scaled arm offset (`x` lateral, `y` vertical). The offset is
    /// frozen while the feature is disabled or outside interaction mode.
    pub fn update(
        &mut self,
        dt_seconds: f32,
        cursor_px: Option<Vec2>,
        window_size: (u32, u32),
        settings: &CameraOffsetSettings,
        mode: GameMode,
    ) -> Vec2 {
        if settings.follow_cursor_enabled && mode == GameMode::Interaction {
            let (width, height) = (window_size.0 as f32, window_size.1 as f32);
            let inside = cursor_px.filter(|cursor| {
                (0.0..=width).contains(&cursor.x) && (0.0..=height).contains(&cursor.y)
            });
            self.cursor_offset_px = match inside {
                Some(cursor) => Vec2 {
                    x: cursor.x - width * 0.5,
                    y: cursor.y - height * 0.5,
                },
                None => interp_to_zero(self.cursor_offset_px, dt_seconds, settings.interp_speed),
            };
        }

        Vec2 {
            x: self.cursor_offset_px.x * settings.scale_x,
            y: self.cursor_offset_px.y * settings.scale_y,
        }
    }
}

fn interp_to_zero(current: Vec2, dt_seconds: f32, speed: f32) -> Vec2 {
    if speed <= 0.0 || current.length_squared() < OFFSET_SNAP_DISTANCE_SQUARED {
        return Vec2::ZERO;
    }
    let keep = 1.0 - (dt_seconds * speed).clamp(0.0, 1.0);
    Vec2 {
        x: current.x * keep,
        y: current.y * keep,
    }
}
