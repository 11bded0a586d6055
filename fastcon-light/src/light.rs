use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, error, info};

use fastcon_controller::FastconController;

use crate::error::{LightError, Result};
use crate::state::LightState;
use crate::traits::{ColorMode, LightTraits};

/// A single Fastcon light on the mesh.
///
/// Constructed by the platform from a validated configuration record and
/// bound to its controller during wiring. `light_id` is the device's
/// address on the mesh; `id` is the component identifier it is registered
/// under.
pub struct FastconLight {
    id: String,
    name: String,
    light_id: u8,
    controller: RwLock<Option<Arc<FastconController>>>,
}

impl FastconLight {
    pub fn new(id: impl Into<String>, name: impl Into<String>, light_id: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            light_id,
            controller: RwLock::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn light_id(&self) -> u8 {
        self.light_id
    }

    /// Bind the controller that broadcasts for this light.
    pub async fn set_controller(&self, controller: Arc<FastconController>) {
        *self.controller.write().await = Some(controller);
    }

    /// Lifecycle hook: a light that reaches setup without a bound
    /// controller is mis-wired and fails its component.
    pub async fn setup(&self) -> Result<()> {
        if self.controller.read().await.is_none() {
            error!(light_id = self.light_id, "controller not set for light");
            return Err(LightError::ControllerNotBound {
                light_id: self.light_id,
            });
        }

        info!(id = %self.id, light_id = self.light_id, "setting up Fastcon BLE light");
        Ok(())
    }

    pub fn get_traits(&self) -> LightTraits {
        LightTraits {
            supported_color_modes: vec![ColorMode::Rgb, ColorMode::White, ColorMode::Brightness],
            min_mireds: 153,
            max_mireds: 500,
        }
    }

    /// Push a new output state to the device: encode it through the bound
    /// controller and queue the resulting broadcast.
    pub async fn write_state(&self, state: &LightState) -> Result<()> {
        let controller = self
            .controller
            .read()
            .await
            .clone()
            .ok_or(LightError::ControllerNotBound {
                light_id: self.light_id,
            })?;

        let is_on = state.is_on();
        let brightness = if is_on { state.brightness } else { 0.0 };
        let (red, green, blue) = state.rgb();

        debug!(
            light_id = self.light_id,
            on = is_on,
            brightness_pct = brightness * 100.0,
            r = (red * 255.0) as u8,
            g = (green * 255.0) as u8,
            b = (blue * 255.0) as u8,
            "writing state"
        );

        let advertisement = controller.light_advertisement(
            u32::from(self.light_id),
            is_on,
            brightness,
            red,
            green,
            blue,
        );
        debug!(
            len = advertisement.len(),
            payload = %hex::encode_upper(&advertisement),
            "advertisement payload"
        );

        controller
            .queue_command(u32::from(self.light_id), advertisement)
            .await;
        Ok(())
    }
}
