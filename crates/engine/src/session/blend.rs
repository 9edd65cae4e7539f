use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BLEND_EXPONENT: f32 = 2.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendFunction {
    #[default]
    Linear,
    Cubic,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl BlendFunction {
    /// Maps linear progress in `[0, 1]` onto the blend curve.
    pub fn apply(self, alpha: f32, exponent: f32) -> f32 {
        let alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let exponent = if exponent.is_finite() && exponent > 0.0 {
            exponent
        } else {
            DEFAULT_BLEND_EXPONENT
        };
        match self {
            BlendFunction::Linear => alpha,
            BlendFunction::Cubic => alpha * alpha * (3.0 - 2.0 * alpha),
            BlendFunction::EaseIn => alpha.powf(exponent),
            BlendFunction::EaseOut => 1.0 - (1.0 - alpha).powf(exponent),
            BlendFunction::EaseInOut => {
                if alpha < 0.5 {
                    0.5 * (2.0 * alpha).powf(exponent)
                } else {
                    1.0 - 0.5 * (2.0 * (1.0 - alpha)).powf(exponent)
                }
            }
        }
    }
}

/// Camera blend request. The blend time doubles as the delay before a view
/// transition completes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendParams {
    pub blend_time_seconds: f32,
    pub function: BlendFunction,
    pub exponent: f32,
}

impl Default for BlendParams {
    fn default() -> Self {
        Self {
            blend_time_seconds: 0.0,
            function: BlendFunction::Linear,
            exponent: DEFAULT_BLEND_EXPONENT,
        }
    }
}

impl BlendParams {
    pub fn over_seconds(blend_time_seconds: f32) -> Self {
        Self {
            blend_time_seconds,
            ..Self::default()
        }
    }

    pub fn with_function(mut self, function: BlendFunction) -> Self {
        self.function = function;
        self
    }

    /// Negative or non-finite blend times collapse to an immediate cut.
    /// Times too large for a `Duration` saturate to `Duration::MAX`.
    pub fn duration(&self) -> Duration {
        if !self.blend_time_seconds.is_finite() || self.blend_time_seconds <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f32(self.blend_time_seconds).unwrap_or(Duration::MAX)
    }

    pub fn progress(&self, elapsed: Duration) -> f32 {
        let duration = self.duration();
        if duration.is_zero() {
            return 1.0;
        }
        let alpha = elapsed.as_secs_f32() / duration.as_secs_f32();
        self.function.apply(alpha, self.exponent)
    }
}
