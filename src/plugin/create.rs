//! The `plugin/create` command
//!
//! Registers a create handler under the `plugin/create` pattern. The handler
//! merge-validates the inbound args against the create schema with a fixed
//! field allowlist, hands the picked params to a [`CreationService`], and
//! replies with the creation result or a failure envelope.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;

use crate::command::message::{Command, CommandPattern, CommandReply};
use crate::command::router::{CommandHandler, CommandRouter};
use crate::error::{PluginError, Result};
use crate::plugin::Plugin;
use crate::validation::{MergeValidate, ValidateOptions, ValidateRequest};

/// Top-level fields the create command accepts; everything else is dropped
pub const PICK_FIELDS: &[&str] = &["field"];

/// JSON Schema the picked create params must satisfy
pub fn create_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "properties": {
            "field": { "type": "string", "minLength": 1 }
        },
        "required": ["field"],
        "additionalProperties": false
    })
}

/// The seam between the create command and whatever performs the creation
#[async_trait]
pub trait CreationService: Send + Sync {
    /// Create a resource from validated params and return its representation
    async fn create(&self, params: Map<String, Value>) -> Result<Value>;
}

/// Creation service that always fails
///
/// Stands in until a real service is injected; every call returns a service
/// error whose reply shape is `{ "status": false, "message": "Error" }`.
pub struct StubCreationService;

#[async_trait]
impl CreationService for StubCreationService {
    async fn create(&self, _params: Map<String, Value>) -> Result<Value> {
        Err(PluginError::ServiceError("Error".to_string()))
    }
}

/// Handler for the `plugin/create` pattern
pub struct CreateHandler {
    service: Arc<dyn CreationService>,
    validator: MergeValidate,
}

impl CreateHandler {
    pub fn new(service: Arc<dyn CreationService>) -> Result<Self> {
        Ok(Self {
            service,
            validator: MergeValidate::new(&create_schema())?,
        })
    }
}

#[async_trait]
impl CommandHandler for CreateHandler {
    async fn handle(&self, command: Command) -> std::result::Result<CommandReply, PluginError> {
        let params = match self.validator.validate(ValidateRequest {
            args: &command.args,
            pick: PICK_FIELDS,
            options: ValidateOptions { abort_early: false },
        }) {
            Ok(params) => params,
            Err(PluginError::ValidationError(failure)) => {
                debug!(
                    command_id = %command.command_id,
                    violations = failure.len(),
                    "Create command args rejected"
                );
                return Ok(CommandReply::fail_with_details(
                    "Validation failed",
                    failure.violations().iter().map(|v| v.to_string()).collect(),
                ));
            }
            Err(PluginError::InvalidInput(reason)) => {
                return Ok(CommandReply::fail(reason));
            }
            Err(other) => return Err(other),
        };

        match self.service.create(params).await {
            Ok(result) => Ok(CommandReply::ok(result)),
            Err(PluginError::ServiceError(message)) => Ok(CommandReply::fail(message)),
            Err(other) => Ok(CommandReply::fail(other.to_string())),
        }
    }

    fn handler_name(&self) -> &str {
        "create"
    }
}

/// Plugin wiring the create command into a router
pub struct CreateCommandPlugin {
    service: Arc<dyn CreationService>,
}

impl CreateCommandPlugin {
    pub fn new(service: Arc<dyn CreationService>) -> Self {
        Self { service }
    }

    /// Build the plugin with the always-failing stub service
    pub fn with_stub_service() -> Self {
        Self::new(Arc::new(StubCreationService))
    }
}

#[async_trait]
impl Plugin for CreateCommandPlugin {
    fn name(&self) -> &str {
        "plugin"
    }

    fn version(&self) -> &str {
        "0.1.0"
    }

    fn description(&self) -> &str {
        "Create command with merge-validated arguments"
    }

    async fn register(&self, router: &CommandRouter) -> Result<()> {
        let handler = CreateHandler::new(self.service.clone())?;
        router
            .register_handler(CommandPattern::new("plugin", "create"), Arc::new(handler))
            .await
            .map_err(|e| PluginError::RegistrationError(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::message::CommandSource;
    use tokio::sync::Mutex;

    /// Creation service that records the params it was called with
    struct RecordingCreationService {
        calls: Mutex<Vec<Map<String, Value>>>,
    }

    impl RecordingCreationService {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CreationService for RecordingCreationService {
        async fn create(&self, params: Map<String, Value>) -> Result<Value> {
            let field = params.get("field").cloned().unwrap_or(Value::Null);
            self.calls.lock().await.push(params);
            Ok(json!({ "created": true, "field": field }))
        }
    }

    fn create_command(args: Value) -> Command {
        Command::new(
            CommandPattern::new("plugin", "create"),
            args,
            CommandSource::Client {
                id: "test_client".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_create_succeeds_with_valid_args() {
        let service = Arc::new(RecordingCreationService::new());
        let handler = CreateHandler::new(service.clone()).unwrap();

        let reply = handler
            .handle(create_command(json!({ "field": "value" })))
            .await
            .unwrap();

        assert!(reply.is_ok());
        let result = reply.result.unwrap();
        assert_eq!(result["created"], json!(true));
        assert_eq!(result["field"], json!("value"));
    }

    #[tokio::test]
    async fn test_unpicked_fields_are_dropped_before_the_service() {
        let service = Arc::new(RecordingCreationService::new());
        let handler = CreateHandler::new(service.clone()).unwrap();

        let reply = handler
            .handle(create_command(
                json!({ "field": "value", "role": "admin", "unrelated": 42 }),
            ))
            .await
            .unwrap();

        assert!(reply.is_ok());
        let calls = service.calls.lock().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 1);
        assert!(calls[0].contains_key("field"));
    }

    #[tokio::test]
    async fn test_missing_field_yields_failure_reply() {
        let service = Arc::new(RecordingCreationService::new());
        let handler = CreateHandler::new(service.clone()).unwrap();

        let reply = handler.handle(create_command(json!({}))).await.unwrap();

        assert!(!reply.is_ok());
        assert_eq!(reply.message.as_deref(), Some("Validation failed"));
        assert!(!reply.details.is_empty());
        assert!(service.calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_all_violations_are_reported() {
        let service = Arc::new(RecordingCreationService::new());
        let handler = CreateHandler::new(service).unwrap();

        // Empty string violates minLength; the reply carries the violation
        let reply = handler
            .handle(create_command(json!({ "field": "" })))
            .await
            .unwrap();

        assert!(!reply.is_ok());
        assert_eq!(reply.details.len(), 1);
    }

    #[tokio::test]
    async fn test_stub_service_replies_with_error() {
        let handler = CreateHandler::new(Arc::new(StubCreationService)).unwrap();

        let reply = handler
            .handle(create_command(json!({ "field": "value" })))
            .await
            .unwrap();

        assert!(!reply.is_ok());
        assert_eq!(reply.message.as_deref(), Some("Error"));
        assert!(reply.result.is_none());
    }

    #[tokio::test]
    async fn test_plugin_registers_create_pattern() {
        let router = CommandRouter::new();
        let plugin = CreateCommandPlugin::with_stub_service();

        plugin.register(&router).await.unwrap();

        assert!(router.has_handler(&CommandPattern::new("plugin", "create")).await);
    }
}
