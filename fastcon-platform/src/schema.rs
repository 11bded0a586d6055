use fastcon_controller::AdvertisingSettings;
use serde::{Deserialize, Serialize};

/// Controller id a light falls back to when `controller_id` is omitted.
pub const DEFAULT_CONTROLLER_ID: &str = "fastcon_controller";

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub controllers: Vec<ControllerConfig>,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
}

impl EngineConfig {
    /// Parse a YAML configuration document.
    pub fn from_yaml(source: &str) -> crate::error::Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }
}

/// Raw controller declaration. The mesh key is an 8-character hex string;
/// it is decoded and checked during validation, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default = "default_controller_id")]
    pub id: String,
    pub mesh_key: String,
    #[serde(default)]
    pub queue_capacity: Option<usize>,
    #[serde(default)]
    pub advertising: AdvertisingSettings,
}

fn default_controller_id() -> String {
    DEFAULT_CONTROLLER_ID.to_string()
}

/// Raw light declaration.
///
/// `light_id` is kept wide here so that out-of-range values reach
/// validation and produce a range error naming the field instead of an
/// opaque parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightConfig {
    /// Component id; generated when omitted.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub light_id: i64,
    #[serde(default)]
    pub controller_id: Option<String>,
    #[serde(default)]
    pub default_brightness: Option<f32>,
    #[serde(default)]
    pub restore_mode: RestoreMode,
}

/// What a light does on boot, before any state write arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreMode {
    #[default]
    RestoreDefaultOff,
    RestoreDefaultOn,
    AlwaysOff,
    AlwaysOn,
}

impl RestoreMode {
    pub fn starts_on(self) -> bool {
        matches!(self, Self::RestoreDefaultOn | Self::AlwaysOn)
    }
}
