use std::collections::HashSet;

use fastcon_controller::ControllerSettings;
use fastcon_light::{ColorMode, LightState};

use crate::error::{PlatformError, Result};
use crate::schema::{ControllerConfig, EngineConfig, RestoreMode, DEFAULT_CONTROLLER_ID};

const LIGHT_ID_MIN: i64 = 1;
const LIGHT_ID_MAX: i64 = 255;

/// A fully validated configuration: every id is concrete and unique, every
/// range checked, every controller reference resolved. Only this form is
/// allowed to drive wiring.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub controllers: Vec<ValidatedController>,
    pub lights: Vec<ValidatedLight>,
}

#[derive(Debug, Clone)]
pub struct ValidatedController {
    pub id: String,
    pub settings: ControllerSettings,
}

#[derive(Debug, Clone)]
pub struct ValidatedLight {
    pub id: String,
    pub name: String,
    pub light_id: u8,
    pub controller_id: String,
    pub default_brightness: f32,
    pub restore_mode: RestoreMode,
}

impl ValidatedLight {
    /// The state this light boots with, per its restore mode.
    pub fn initial_state(&self) -> LightState {
        LightState {
            on: self.restore_mode.starts_on(),
            brightness: self.default_brightness,
            color_mode: ColorMode::Brightness,
            red: 0.0,
            green: 0.0,
            blue: 0.0,
        }
    }
}

/// Validate a whole configuration document. Fails on the first offending
/// record, before any component is constructed.
pub fn validate_config(config: &EngineConfig) -> Result<ValidatedConfig> {
    let mut declared: HashSet<String> = HashSet::new();

    let mut controllers = Vec::with_capacity(config.controllers.len());
    for controller in &config.controllers {
        let validated = validate_controller(controller)?;
        if !declared.insert(validated.id.clone()) {
            return Err(PlatformError::DuplicateId {
                id: validated.id.clone(),
            });
        }
        controllers.push(validated);
    }

    let controller_ids: HashSet<&str> = controllers.iter().map(|c| c.id.as_str()).collect();

    let mut lights = Vec::with_capacity(config.lights.len());
    let mut generated = 0usize;
    for light in &config.lights {
        let light_id = validate_light_id(light.light_id)?;
        let default_brightness = validate_default_brightness(light.default_brightness)?;

        let id = match &light.id {
            Some(id) => {
                if !declared.insert(id.clone()) {
                    return Err(PlatformError::DuplicateId { id: id.clone() });
                }
                id.clone()
            }
            None => loop {
                generated += 1;
                let candidate = format!("fastcon_light_{generated}");
                if declared.insert(candidate.clone()) {
                    break candidate;
                }
            },
        };

        let controller_id = light
            .controller_id
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTROLLER_ID.to_string());
        if !controller_ids.contains(controller_id.as_str()) {
            return Err(PlatformError::UnresolvedReference { id: controller_id });
        }

        lights.push(ValidatedLight {
            id,
            name: light.name.clone(),
            light_id,
            controller_id,
            default_brightness,
            restore_mode: light.restore_mode,
        });
    }

    Ok(ValidatedConfig {
        controllers,
        lights,
    })
}

/// Validate a single controller declaration.
pub fn validate_controller(config: &ControllerConfig) -> Result<ValidatedController> {
    let mesh_key = validate_mesh_key(&config.mesh_key)?;

    let mut settings = ControllerSettings::new(mesh_key);
    if let Some(capacity) = config.queue_capacity {
        if capacity == 0 {
            return Err(PlatformError::Validation {
                field: "queue_capacity",
                message: "must be at least 1".to_string(),
            });
        }
        settings.queue_capacity = capacity;
    }
    settings.advertising = config.advertising.clone();

    Ok(ValidatedController {
        id: config.id.clone(),
        settings,
    })
}

/// The light's mesh address: an integer in `[1, 255]`.
pub fn validate_light_id(light_id: i64) -> Result<u8> {
    if !(LIGHT_ID_MIN..=LIGHT_ID_MAX).contains(&light_id) {
        return Err(PlatformError::Validation {
            field: "light_id",
            message: format!(
                "must be an integer in range [{LIGHT_ID_MIN}, {LIGHT_ID_MAX}], got {light_id}"
            ),
        });
    }
    Ok(light_id as u8)
}

/// The controller mesh key: exactly 4 bytes, given as hex.
pub fn validate_mesh_key(mesh_key: &str) -> Result<[u8; 4]> {
    let bytes = hex::decode(mesh_key).map_err(|err| PlatformError::Validation {
        field: "mesh_key",
        message: format!("not a valid hex string: {err}"),
    })?;

    <[u8; 4]>::try_from(bytes.as_slice()).map_err(|_| PlatformError::Validation {
        field: "mesh_key",
        message: format!("must be exactly 4 bytes, got {}", bytes.len()),
    })
}

fn validate_default_brightness(value: Option<f32>) -> Result<f32> {
    let brightness = value.unwrap_or(1.0);
    if !(0.0..=1.0).contains(&brightness) {
        return Err(PlatformError::Validation {
            field: "default_brightness",
            message: format!("must be a fraction in range [0.0, 1.0], got {brightness}"),
        });
    }
    Ok(brightness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LightConfig;

    fn light(light_id: i64) -> LightConfig {
        LightConfig {
            id: None,
            name: "Test".to_string(),
            light_id,
            controller_id: None,
            default_brightness: None,
            restore_mode: RestoreMode::default(),
        }
    }

    fn controller(id: &str) -> ControllerConfig {
        ControllerConfig {
            id: id.to_string(),
            mesh_key: "5e367bc4".to_string(),
            queue_capacity: None,
            advertising: Default::default(),
        }
    }

    #[test]
    fn test_every_light_id_in_range_validates() {
        for n in 1..=255i64 {
            assert_eq!(validate_light_id(n).unwrap(), n as u8);
        }
    }

    #[test]
    fn test_light_id_out_of_range_fails_naming_the_field() {
        for n in [-1, 0, 256, 1000, i64::MAX] {
            let err = validate_light_id(n).unwrap_err();
            match err {
                PlatformError::Validation { field, message } => {
                    assert_eq!(field, "light_id");
                    assert!(message.contains("[1, 255]"));
                }
                other => panic!("expected a validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_mesh_key_must_be_four_hex_bytes() {
        assert_eq!(validate_mesh_key("5e367bc4").unwrap(), [0x5e, 0x36, 0x7b, 0xc4]);
        assert!(validate_mesh_key("xyz").is_err());
        assert!(validate_mesh_key("5e367b").is_err());
        assert!(validate_mesh_key("5e367bc4ff").is_err());
    }

    #[test]
    fn test_omitted_controller_id_resolves_default() {
        let config = EngineConfig {
            controllers: vec![controller(DEFAULT_CONTROLLER_ID)],
            lights: vec![light(5)],
        };
        let validated = validate_config(&config).unwrap();
        assert_eq!(validated.lights[0].controller_id, DEFAULT_CONTROLLER_ID);
    }

    #[test]
    fn test_omitted_controller_id_without_default_controller_fails() {
        let config = EngineConfig {
            controllers: vec![controller("bedroom_mesh")],
            lights: vec![light(5)],
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(
            err,
            PlatformError::UnresolvedReference { id } if id == DEFAULT_CONTROLLER_ID
        ));
    }

    #[test]
    fn test_explicit_controller_id_resolves() {
        let mut light = light(5);
        light.controller_id = Some("bedroom_mesh".to_string());
        let config = EngineConfig {
            controllers: vec![controller("bedroom_mesh")],
            lights: vec![light],
        };
        let validated = validate_config(&config).unwrap();
        assert_eq!(validated.lights[0].controller_id, "bedroom_mesh");
    }

    #[test]
    fn test_unknown_explicit_controller_id_fails() {
        let mut light = light(5);
        light.controller_id = Some("nonexistent".to_string());
        let config = EngineConfig {
            controllers: vec![controller(DEFAULT_CONTROLLER_ID)],
            lights: vec![light],
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(
            err,
            PlatformError::UnresolvedReference { id } if id == "nonexistent"
        ));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let config = EngineConfig {
            controllers: vec![controller(DEFAULT_CONTROLLER_ID)],
            lights: vec![light(1), light(2), light(3)],
        };
        let validated = validate_config(&config).unwrap();
        let ids: HashSet<_> = validated.lights.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_generated_ids_avoid_explicit_ones() {
        let mut first = light(1);
        first.id = Some("fastcon_light_1".to_string());
        let config = EngineConfig {
            controllers: vec![controller(DEFAULT_CONTROLLER_ID)],
            lights: vec![first, light(2)],
        };
        let validated = validate_config(&config).unwrap();
        assert_eq!(validated.lights[0].id, "fastcon_light_1");
        assert_ne!(validated.lights[1].id, "fastcon_light_1");
    }

    #[test]
    fn test_duplicate_ids_fail() {
        let mut first = light(1);
        first.id = Some("dupe".to_string());
        let mut second = light(2);
        second.id = Some("dupe".to_string());
        let config = EngineConfig {
            controllers: vec![controller(DEFAULT_CONTROLLER_ID)],
            lights: vec![first, second],
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, PlatformError::DuplicateId { id } if id == "dupe"));
    }

    #[test]
    fn test_light_id_conflicting_with_controller_id_fails() {
        let mut light = light(1);
        light.id = Some(DEFAULT_CONTROLLER_ID.to_string());
        let config = EngineConfig {
            controllers: vec![controller(DEFAULT_CONTROLLER_ID)],
            lights: vec![light],
        };
        assert!(matches!(
            validate_config(&config).unwrap_err(),
            PlatformError::DuplicateId { .. }
        ));
    }

    #[test]
    fn test_restore_modes() {
        assert!(!RestoreMode::RestoreDefaultOff.starts_on());
        assert!(RestoreMode::AlwaysOn.starts_on());

        let mut config = light(5);
        config.restore_mode = RestoreMode::RestoreDefaultOn;
        config.default_brightness = Some(0.4);
        let validated = validate_config(&EngineConfig {
            controllers: vec![controller(DEFAULT_CONTROLLER_ID)],
            lights: vec![config],
        })
        .unwrap();

        let state = validated.lights[0].initial_state();
        assert!(state.on);
        assert_eq!(state.brightness, 0.4);
    }
}
