//! End-to-end registration flow tests: configuration document in, wired
//! component graph out.

use std::sync::Arc;

use fastcon_controller::LogAdvertiser;
use fastcon_platform::{Engine, EngineConfig, PlatformError, WiringStep, DEFAULT_CONTROLLER_ID};

async fn load(yaml: &str) -> Result<Engine, PlatformError> {
    let config = EngineConfig::from_yaml(yaml)?;
    Engine::load(&config, Arc::new(LogAdvertiser)).await
}

#[tokio::test]
async fn test_valid_config_wires_in_order() {
    let engine = load(
        r"
        controllers:
          - mesh_key: 5e367bc4
        lights:
          - id: kitchen
            name: Kitchen
            light_id: 5
        ",
    )
    .await
    .unwrap();

    assert_eq!(
        engine.wiring_steps(),
        &[
            WiringStep::Instantiate {
                id: "kitchen".to_string(),
                light_id: 5,
            },
            WiringStep::RegisterComponent {
                id: "kitchen".to_string(),
            },
            WiringStep::RegisterLight {
                id: "kitchen".to_string(),
            },
            WiringStep::BindController {
                id: "kitchen".to_string(),
                controller_id: DEFAULT_CONTROLLER_ID.to_string(),
            },
        ]
    );

    let light = engine.registry().get_light("kitchen").await.unwrap();
    assert_eq!(light.light_id(), 5);
}

#[tokio::test]
async fn test_each_light_gets_its_own_wiring_quartet() {
    let engine = load(
        r"
        controllers:
          - mesh_key: 5e367bc4
        lights:
          - name: Kitchen
            light_id: 1
          - name: Bedroom
            light_id: 2
        ",
    )
    .await
    .unwrap();

    let steps = engine.wiring_steps();
    assert_eq!(steps.len(), 8);
    for quartet in steps.chunks(4) {
        assert!(matches!(quartet[0], WiringStep::Instantiate { .. }));
        assert!(matches!(quartet[1], WiringStep::RegisterComponent { .. }));
        assert!(matches!(quartet[2], WiringStep::RegisterLight { .. }));
        assert!(matches!(quartet[3], WiringStep::BindController { .. }));
    }

    assert_eq!(engine.lights().await.len(), 2);
}

#[tokio::test]
async fn test_out_of_range_light_id_fails_before_wiring() {
    let err = load(
        r"
        controllers:
          - mesh_key: 5e367bc4
        lights:
          - name: Kitchen
            light_id: 300
        ",
    )
    .await
    .unwrap_err();

    match err {
        PlatformError::Validation { field, message } => {
            assert_eq!(field, "light_id");
            assert!(message.contains("[1, 255]"));
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_record_anywhere_fails_the_whole_document() {
    // The second record is invalid; validation runs before wiring, so the
    // first light must not have been wired either.
    let err = load(
        r"
        controllers:
          - mesh_key: 5e367bc4
        lights:
          - name: Kitchen
            light_id: 1
          - name: Bedroom
            light_id: 0
        ",
    )
    .await
    .unwrap_err();
    assert!(matches!(err, PlatformError::Validation { field: "light_id", .. }));
}

#[tokio::test]
async fn test_default_controller_reference_requires_declaration() {
    let err = load(
        r"
        lights:
          - name: Kitchen
            light_id: 5
        ",
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        PlatformError::UnresolvedReference { id } if id == DEFAULT_CONTROLLER_ID
    ));
}

#[tokio::test]
async fn test_explicit_controller_reference() {
    let engine = load(
        r"
        controllers:
          - id: bedroom_mesh
            mesh_key: 5e367bc4
        lights:
          - name: Bedroom
            light_id: 9
            controller_id: bedroom_mesh
        ",
    )
    .await
    .unwrap();

    assert!(matches!(
        engine.wiring_steps().last(),
        Some(WiringStep::BindController { controller_id, .. }) if controller_id == "bedroom_mesh"
    ));
}

#[tokio::test]
async fn test_wired_light_writes_through_its_controller() {
    let engine = load(
        r"
        controllers:
          - mesh_key: 5e367bc4
        lights:
          - id: kitchen
            name: Kitchen
            light_id: 5
        ",
    )
    .await
    .unwrap();

    let light = engine.registry().get_light("kitchen").await.unwrap();
    let mut state = fastcon_light::LightState::new();
    state.on = true;
    light.write_state(&state).await.unwrap();

    let controllers = engine.controllers().await;
    assert_eq!(controllers.len(), 1);
    assert_eq!(controllers[0].queue_len().await, 1);
}
