use std::sync::Arc;

use fastcon_controller::{BleAdvertiser, FastconController};
use fastcon_light::FastconLight;
use tracing::info;

use crate::error::Result;
use crate::registry::ComponentRegistry;
use crate::schema::EngineConfig;
use crate::validation::{validate_config, ValidatedConfig, ValidatedController, ValidatedLight};

/// One recorded wiring effect. The pass that turns validated configuration
/// into live components is auditable: for every light it performs exactly
/// these four steps, in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WiringStep {
    Instantiate { id: String, light_id: u8 },
    RegisterComponent { id: String },
    RegisterLight { id: String },
    BindController { id: String, controller_id: String },
}

/// Wires validated configuration records into the registry, recording each
/// effect as a [`WiringStep`].
pub struct EngineBuilder {
    advertiser: Arc<dyn BleAdvertiser>,
    registry: Arc<ComponentRegistry>,
    steps: Vec<WiringStep>,
}

impl EngineBuilder {
    pub fn new(advertiser: Arc<dyn BleAdvertiser>) -> Self {
        Self {
            advertiser,
            registry: Arc::new(ComponentRegistry::new()),
            steps: Vec::new(),
        }
    }

    /// Construct a controller from its validated declaration and make it
    /// resolvable for the lights that follow.
    pub async fn declare_controller(
        &mut self,
        config: &ValidatedController,
    ) -> Result<Arc<FastconController>> {
        let controller = Arc::new(FastconController::new(
            config.settings.clone(),
            self.advertiser.clone(),
        ));
        self.registry
            .declare_controller(&config.id, controller.clone())
            .await?;
        Ok(controller)
    }

    /// Wire one validated light: instantiate, register as a component,
    /// register with the light subsystem, bind its controller.
    pub async fn add_light(&mut self, config: &ValidatedLight) -> Result<Arc<FastconLight>> {
        let light = Arc::new(FastconLight::new(
            &config.id,
            &config.name,
            config.light_id,
        ));
        self.steps.push(WiringStep::Instantiate {
            id: config.id.clone(),
            light_id: config.light_id,
        });

        self.registry.register_component(light.clone()).await?;
        self.steps.push(WiringStep::RegisterComponent {
            id: config.id.clone(),
        });

        self.registry.register_light(light.clone()).await?;
        self.steps.push(WiringStep::RegisterLight {
            id: config.id.clone(),
        });

        let controller = self.registry.resolve_controller(&config.controller_id).await?;
        light.set_controller(controller).await;
        self.steps.push(WiringStep::BindController {
            id: config.id.clone(),
            controller_id: config.controller_id.clone(),
        });

        Ok(light)
    }

    pub fn wiring_steps(&self) -> &[WiringStep] {
        &self.steps
    }

    /// Finish wiring: bring every component up in registration order.
    pub async fn build(self) -> Result<Engine> {
        self.registry.setup_all().await?;
        Ok(Engine {
            registry: self.registry,
            steps: self.steps,
        })
    }
}

/// A fully wired engine: the populated registry plus the audit trail of
/// the wiring pass that produced it.
pub struct Engine {
    registry: Arc<ComponentRegistry>,
    steps: Vec<WiringStep>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Validate and wire a whole configuration document. Validation runs
    /// to completion before the first component is constructed.
    pub async fn load(config: &EngineConfig, advertiser: Arc<dyn BleAdvertiser>) -> Result<Engine> {
        let validated = validate_config(config)?;
        Self::wire(&validated, advertiser).await
    }

    /// Wire an already validated configuration.
    pub async fn wire(
        validated: &ValidatedConfig,
        advertiser: Arc<dyn BleAdvertiser>,
    ) -> Result<Engine> {
        let mut builder = EngineBuilder::new(advertiser);
        for controller in &validated.controllers {
            builder.declare_controller(controller).await?;
        }
        for light in &validated.lights {
            builder.add_light(light).await?;
        }

        let engine = builder.build().await?;
        info!(
            controllers = validated.controllers.len(),
            lights = validated.lights.len(),
            "engine wired"
        );
        Ok(engine)
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn wiring_steps(&self) -> &[WiringStep] {
        &self.steps
    }

    pub async fn controllers(&self) -> Vec<Arc<FastconController>> {
        self.registry.controllers().await
    }

    pub async fn lights(&self) -> Vec<Arc<FastconLight>> {
        self.registry.lights().await
    }
}
