use serde::{Deserialize, Serialize};

use crate::traits::ColorMode;

/// Desired output state for a light.
///
/// Brightness and color channels are fractions in `0.0..=1.0`; the RGB
/// channels only apply in [`ColorMode::Rgb`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightState {
    pub on: bool,
    pub brightness: f32,
    pub color_mode: ColorMode,
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl LightState {
    /// Full-brightness warm white, off.
    pub fn new() -> Self {
        Self {
            on: false,
            brightness: 1.0,
            color_mode: ColorMode::Brightness,
            red: 0.0,
            green: 0.0,
            blue: 0.0,
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// RGB channels as driven on the wire: zero outside RGB mode, which
    /// selects the warm-white payload.
    pub fn rgb(&self) -> (f32, f32, f32) {
        if self.color_mode == ColorMode::Rgb {
            (self.red, self.green, self.blue)
        } else {
            (0.0, 0.0, 0.0)
        }
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}
