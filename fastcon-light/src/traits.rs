use serde::{Deserialize, Serialize};

/// Color modes a light can be driven in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Rgb,
    White,
    Brightness,
}

/// Capabilities a light advertises to the light subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightTraits {
    pub supported_color_modes: Vec<ColorMode>,
    pub min_mireds: u16,
    pub max_mireds: u16,
}

impl LightTraits {
    pub fn supports(&self, mode: ColorMode) -> bool {
        self.supported_color_modes.contains(&mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports() {
        let traits = LightTraits {
            supported_color_modes: vec![ColorMode::Rgb, ColorMode::Brightness],
            min_mireds: 153,
            max_mireds: 500,
        };
        assert!(traits.supports(ColorMode::Rgb));
        assert!(!traits.supports(ColorMode::White));
    }
}
