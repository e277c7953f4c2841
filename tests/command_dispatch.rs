//! Command Dispatch Integration Tests
//!
//! End-to-end tests driving the plugin registry, command router, and the
//! create command through the public API.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use plugin_core::command::{Command, CommandPattern, CommandRouter, CommandRouterError, CommandSource};
use plugin_core::plugin::{CreateCommandPlugin, CreationService, PluginRegistry, PluginState};
use plugin_core::{PluginError, Result};

/// Creation service that succeeds and echoes the validated field
struct EchoCreationService;

#[async_trait]
impl CreationService for EchoCreationService {
    async fn create(&self, params: Map<String, Value>) -> Result<Value> {
        let field = params
            .get("field")
            .cloned()
            .ok_or_else(|| PluginError::ServiceError("missing field".to_string()))?;
        Ok(json!({ "created": true, "field": field }))
    }
}

fn create_command(args: Value) -> Command {
    Command::new(
        CommandPattern::new("plugin", "create"),
        args,
        CommandSource::Client {
            id: "integration_client".to_string(),
        },
    )
}

#[tokio::test]
async fn test_end_to_end_create_success() {
    plugin_core::logging::init_structured_logging();

    let router = CommandRouter::new();
    let registry = PluginRegistry::new();

    registry
        .register_plugin(
            Arc::new(CreateCommandPlugin::new(Arc::new(EchoCreationService))),
            &router,
        )
        .await
        .expect("Plugin registration failed");

    let plugin = registry.get_plugin("plugin").await.expect("Plugin not recorded");
    assert_eq!(plugin.state, PluginState::Enabled);

    let command = create_command(json!({ "field": "value" }));
    let command_id = command.command_id.clone();
    let reply = router.route(command).await.expect("Routing failed");

    assert!(reply.is_ok());
    assert_eq!(reply.command_id.as_deref(), Some(command_id.as_str()));

    let result = reply.result.expect("Success reply must carry a result");
    assert_eq!(result["created"], json!(true));
    assert_eq!(result["field"], json!("value"));
}

#[tokio::test]
async fn test_end_to_end_stub_service_failure() {
    let router = CommandRouter::new();
    let registry = PluginRegistry::new();

    registry
        .register_plugin(Arc::new(CreateCommandPlugin::with_stub_service()), &router)
        .await
        .expect("Plugin registration failed");

    let reply = router
        .route(create_command(json!({ "field": "value" })))
        .await
        .expect("Routing failed");

    assert!(!reply.is_ok());
    assert_eq!(reply.message.as_deref(), Some("Error"));
    assert!(reply.result.is_none());
}

#[tokio::test]
async fn test_end_to_end_validation_failure_collects_violations() {
    let router = CommandRouter::new();
    let registry = PluginRegistry::new();

    registry
        .register_plugin(
            Arc::new(CreateCommandPlugin::new(Arc::new(EchoCreationService))),
            &router,
        )
        .await
        .expect("Plugin registration failed");

    // Missing "field" entirely; unknown fields are dropped by the pick, so
    // the reply reports the missing requirement rather than the extras.
    let reply = router
        .route(create_command(json!({ "unrelated": 1, "other": true })))
        .await
        .expect("Routing failed");

    assert!(!reply.is_ok());
    assert_eq!(reply.message.as_deref(), Some("Validation failed"));
    assert!(!reply.details.is_empty());
}

#[tokio::test]
async fn test_unregistered_pattern_is_a_routing_error() {
    let router = CommandRouter::new();

    let command = Command::new(
        CommandPattern::new("plugin", "delete"),
        json!({}),
        CommandSource::Client {
            id: "integration_client".to_string(),
        },
    );

    let result = router.route(command).await;
    assert!(matches!(
        result,
        Err(CommandRouterError::HandlerNotFound { .. })
    ));
}

#[tokio::test]
async fn test_router_stats_after_mixed_outcomes() {
    let router = CommandRouter::new();
    let registry = PluginRegistry::new();

    registry
        .register_plugin(
            Arc::new(CreateCommandPlugin::new(Arc::new(EchoCreationService))),
            &router,
        )
        .await
        .expect("Plugin registration failed");

    router
        .route(create_command(json!({ "field": "ok" })))
        .await
        .expect("Routing failed");
    router
        .route(create_command(json!({})))
        .await
        .expect("Routing failed");

    let stats = router.stats().await;
    assert_eq!(stats.registered_handlers, 1);
    assert_eq!(stats.total_commands_processed, 2);
    assert_eq!(stats.successful_commands, 1);
    assert_eq!(stats.failed_commands, 1);
}

#[tokio::test]
async fn test_reply_wire_shapes() {
    let router = CommandRouter::new();
    let registry = PluginRegistry::new();

    registry
        .register_plugin(
            Arc::new(CreateCommandPlugin::new(Arc::new(EchoCreationService))),
            &router,
        )
        .await
        .expect("Plugin registration failed");

    let success = router
        .route(create_command(json!({ "field": "value" })))
        .await
        .expect("Routing failed");
    let success_wire = serde_json::to_value(&success).expect("Serialization failed");
    assert_eq!(success_wire["status"], json!(true));
    assert!(success_wire.get("message").is_none());

    let failure = router
        .route(create_command(json!({})))
        .await
        .expect("Routing failed");
    let failure_wire = serde_json::to_value(&failure).expect("Serialization failed");
    assert_eq!(failure_wire["status"], json!(false));
    assert!(failure_wire.get("result").is_none());
}
