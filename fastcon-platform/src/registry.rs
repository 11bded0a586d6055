use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use fastcon_controller::FastconController;
use fastcon_light::FastconLight;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{PlatformError, Result};

/// A lifecycle-managed instance: anything the registry brings up during
/// engine setup, in registration order.
#[async_trait]
pub trait Component: Send + Sync {
    fn component_id(&self) -> &str;

    async fn setup(&self) -> Result<()>;
}

#[async_trait]
impl Component for FastconLight {
    fn component_id(&self) -> &str {
        self.id()
    }

    async fn setup(&self) -> Result<()> {
        FastconLight::setup(self)
            .await
            .map_err(|err| PlatformError::SetupFailed {
                id: self.id().to_string(),
                message: err.to_string(),
            })
    }
}

/// Controller handle registered under a configuration id.
struct RegisteredController {
    id: String,
    inner: Arc<FastconController>,
}

#[async_trait]
impl Component for RegisteredController {
    fn component_id(&self) -> &str {
        &self.id
    }

    async fn setup(&self) -> Result<()> {
        self.inner.setup();
        Ok(())
    }
}

/// Registry of everything the configuration declared: lifecycle components
/// in registration order, controller handles by id, and the light
/// subsystem's view of registered lights.
pub struct ComponentRegistry {
    components: RwLock<Vec<Arc<dyn Component>>>,
    component_ids: RwLock<HashSet<String>>,
    controllers: RwLock<HashMap<String, Arc<FastconController>>>,
    lights: RwLock<HashMap<String, Arc<FastconLight>>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self {
            components: RwLock::new(Vec::new()),
            component_ids: RwLock::new(HashSet::new()),
            controllers: RwLock::new(HashMap::new()),
            lights: RwLock::new(HashMap::new()),
        }
    }

    // ========================================================================
    // CONTROLLERS
    // ========================================================================

    /// Declare a controller under its configuration id, making it
    /// resolvable by lights and part of the lifecycle.
    pub async fn declare_controller(
        &self,
        id: &str,
        controller: Arc<FastconController>,
    ) -> Result<()> {
        self.claim_id(id).await?;

        self.controllers
            .write()
            .await
            .insert(id.to_string(), controller.clone());
        self.components
            .write()
            .await
            .push(Arc::new(RegisteredController {
                id: id.to_string(),
                inner: controller,
            }));

        debug!(id, "controller declared");
        Ok(())
    }

    /// Resolve a controller reference from a configuration record.
    pub async fn resolve_controller(&self, id: &str) -> Result<Arc<FastconController>> {
        self.controllers
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| PlatformError::UnresolvedReference { id: id.to_string() })
    }

    pub async fn controllers(&self) -> Vec<Arc<FastconController>> {
        self.controllers.read().await.values().cloned().collect()
    }

    // ========================================================================
    // COMPONENTS
    // ========================================================================

    /// Register a lifecycle component. Ids must be unique across all
    /// component kinds.
    pub async fn register_component(&self, component: Arc<dyn Component>) -> Result<()> {
        self.claim_id(component.component_id()).await?;
        debug!(id = component.component_id(), "component registered");
        self.components.write().await.push(component);
        Ok(())
    }

    /// Bring every registered component up, in registration order.
    pub async fn setup_all(&self) -> Result<()> {
        let components = self.components.read().await.clone();
        for component in components {
            component.setup().await?;
        }
        Ok(())
    }

    // ========================================================================
    // LIGHTS
    // ========================================================================

    /// Register a light with the light subsystem.
    pub async fn register_light(&self, light: Arc<FastconLight>) -> Result<()> {
        let mut lights = self.lights.write().await;
        if lights.contains_key(light.id()) {
            return Err(PlatformError::DuplicateId {
                id: light.id().to_string(),
            });
        }
        debug!(id = light.id(), light_id = light.light_id(), "light registered");
        lights.insert(light.id().to_string(), light);
        Ok(())
    }

    pub async fn get_light(&self, id: &str) -> Result<Arc<FastconLight>> {
        self.lights
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound { id: id.to_string() })
    }

    pub async fn lights(&self) -> Vec<Arc<FastconLight>> {
        self.lights.read().await.values().cloned().collect()
    }

    async fn claim_id(&self, id: &str) -> Result<()> {
        let mut ids = self.component_ids.write().await;
        if !ids.insert(id.to_string()) {
            return Err(PlatformError::DuplicateId { id: id.to_string() });
        }
        Ok(())
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastcon_controller::{ControllerSettings, LogAdvertiser};

    fn controller() -> Arc<FastconController> {
        Arc::new(FastconController::new(
            ControllerSettings::default(),
            Arc::new(LogAdvertiser),
        ))
    }

    #[tokio::test]
    async fn test_declare_and_resolve_controller() {
        let registry = ComponentRegistry::new();
        registry
            .declare_controller("fastcon_controller", controller())
            .await
            .unwrap();

        registry.resolve_controller("fastcon_controller").await.unwrap();
    }

    #[tokio::test]
    async fn test_resolving_unknown_controller_fails() {
        let registry = ComponentRegistry::new();
        let err = registry.resolve_controller("missing").await.unwrap_err();
        assert!(matches!(
            err,
            PlatformError::UnresolvedReference { id } if id == "missing"
        ));
    }

    #[tokio::test]
    async fn test_duplicate_controller_id_fails() {
        let registry = ComponentRegistry::new();
        registry.declare_controller("c", controller()).await.unwrap();
        let err = registry
            .declare_controller("c", controller())
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::DuplicateId { .. }));
    }

    #[tokio::test]
    async fn test_component_id_shared_across_kinds() {
        let registry = ComponentRegistry::new();
        registry.declare_controller("c", controller()).await.unwrap();

        let light = Arc::new(FastconLight::new("c", "Duplicate", 1));
        let err = registry.register_component(light).await.unwrap_err();
        assert!(matches!(err, PlatformError::DuplicateId { .. }));
    }

    #[tokio::test]
    async fn test_setup_all_fails_on_unbound_light() {
        let registry = ComponentRegistry::new();
        let light = Arc::new(FastconLight::new("l", "Unbound", 9));
        registry.register_component(light).await.unwrap();

        let err = registry.setup_all().await.unwrap_err();
        assert!(matches!(err, PlatformError::SetupFailed { id, .. } if id == "l"));
    }
}
