//! Command Router for pattern-keyed dispatch

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::command::message::{Command, CommandPattern, CommandReply};
use crate::error::PluginError;

/// Central command routing and dispatch system
///
/// The CommandRouter manages command handlers and provides unified routing
/// for all registered patterns. It supports handler registration, envelope
/// validation, and execution history with proper error handling.
///
/// # Examples
///
/// ```rust
/// use plugin_core::command::router::CommandRouter;
/// use plugin_core::command::message::*;
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() {
///     let router = CommandRouter::new();
///
///     // Handler registration would be done here
///     // router.register_handler(CommandPattern::new("plugin", "create"), handler).await;
///
///     let command = Command::new(
///         CommandPattern::new("plugin", "create"),
///         json!({ "field": "value" }),
///         CommandSource::Client { id: "client_1".to_string() },
///     );
///
///     match router.route(command).await {
///         Ok(reply) => println!("Command completed: {:?}", reply),
///         Err(e) => println!("Command failed: {}", e),
///     }
/// }
/// ```
pub struct CommandRouter {
    /// Registry of command handlers by pattern
    handlers: Arc<RwLock<HashMap<CommandPattern, Arc<dyn CommandHandler>>>>,

    /// Command execution history for debugging
    history: Arc<RwLock<Vec<CommandExecution>>>,

    /// Router configuration
    config: CommandRouterConfig,
}

impl CommandRouter {
    /// Create new command router with default configuration
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            history: Arc::new(RwLock::new(Vec::new())),
            config: CommandRouterConfig::default(),
        }
    }

    /// Create command router with custom configuration
    pub fn with_config(config: CommandRouterConfig) -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            history: Arc::new(RwLock::new(Vec::new())),
            config,
        }
    }

    /// Register a command handler for a specific pattern
    pub async fn register_handler(
        &self,
        pattern: CommandPattern,
        handler: Arc<dyn CommandHandler>,
    ) -> Result<(), CommandRouterError> {
        let mut handlers = self.handlers.write().await;

        if handlers.contains_key(&pattern) {
            warn!("Replacing existing handler for pattern: {}", pattern);
        }

        handlers.insert(pattern.clone(), handler);
        info!("Registered command handler for pattern: {}", pattern);

        Ok(())
    }

    /// Unregister a command handler
    pub async fn unregister_handler(&self, pattern: &CommandPattern) -> bool {
        let mut handlers = self.handlers.write().await;
        let removed = handlers.remove(pattern).is_some();

        if removed {
            info!("Unregistered command handler for pattern: {}", pattern);
        } else {
            warn!("Attempted to unregister non-existent handler: {}", pattern);
        }

        removed
    }

    /// Route and execute a command
    ///
    /// Handler failures become failure replies (`status: false`); only
    /// envelope or routing problems surface as `Err`.
    pub async fn route(&self, command: Command) -> Result<CommandReply, CommandRouterError> {
        debug!(
            "Routing command: pattern={}, id={}, correlation_id={:?}",
            command.pattern, command.command_id, command.correlation_id
        );

        // Validate envelope
        self.validate_command(&command)?;

        // Find handler
        let handlers = self.handlers.read().await;
        let handler = handlers
            .get(&command.pattern)
            .ok_or_else(|| CommandRouterError::HandlerNotFound {
                pattern: command.pattern.clone(),
            })?
            .clone();
        drop(handlers);

        // Execute command
        let execution_start = std::time::Instant::now();
        let reply = match handler.handle(command.clone()).await {
            Ok(reply) => {
                let execution_time = execution_start.elapsed().as_millis() as u64;
                if reply.is_ok() {
                    info!(
                        "Command executed successfully: pattern={}, id={}, time={}ms",
                        command.pattern, command.command_id, execution_time
                    );
                } else {
                    info!(
                        "Command completed with failure reply: pattern={}, id={}, time={}ms",
                        command.pattern, command.command_id, execution_time
                    );
                }
                reply.for_command(&command.command_id)
            }
            Err(e) => {
                let execution_time = execution_start.elapsed().as_millis() as u64;
                error!(
                    "Command execution failed: pattern={}, id={}, error={}, time={}ms",
                    command.pattern, command.command_id, e, execution_time
                );

                failure_reply(&e).for_command(&command.command_id)
            }
        };

        // Record execution history if enabled
        if self.config.enable_history {
            let execution = CommandExecution {
                command,
                reply: reply.clone(),
                duration_ms: execution_start.elapsed().as_millis() as u64,
                timestamp: chrono::Utc::now(),
            };

            let mut history = self.history.write().await;
            history.push(execution);

            // Limit history size
            if history.len() > self.config.max_history_size {
                let excess = history.len() - self.config.max_history_size;
                history.drain(0..excess);
            }
        }

        Ok(reply)
    }

    /// Get command execution history
    pub async fn history(&self) -> Vec<CommandExecution> {
        self.history.read().await.clone()
    }

    /// Get registered patterns
    pub async fn registered_patterns(&self) -> Vec<CommandPattern> {
        self.handlers.read().await.keys().cloned().collect()
    }

    /// Check if a handler is registered for a pattern
    pub async fn has_handler(&self, pattern: &CommandPattern) -> bool {
        self.handlers.read().await.contains_key(pattern)
    }

    /// Get router statistics
    pub async fn stats(&self) -> CommandRouterStats {
        let handlers = self.handlers.read().await;
        let history = self.history.read().await;

        let successful_commands = history.iter().filter(|e| e.reply.is_ok()).count();
        let failed_commands = history.iter().filter(|e| !e.reply.is_ok()).count();

        CommandRouterStats {
            registered_handlers: handlers.len(),
            total_commands_processed: history.len(),
            successful_commands,
            failed_commands,
            history_enabled: self.config.enable_history,
        }
    }

    /// Clear command history
    pub async fn clear_history(&self) {
        self.history.write().await.clear();
        info!("Command history cleared");
    }

    /// Validate command envelope before routing
    fn validate_command(&self, command: &Command) -> Result<(), CommandRouterError> {
        if command.command_id.is_empty() {
            return Err(CommandRouterError::InvalidCommand {
                reason: "Command ID cannot be empty".to_string(),
            });
        }

        if !command.args.is_object() {
            return Err(CommandRouterError::InvalidCommand {
                reason: "Command args must be a JSON object".to_string(),
            });
        }

        if let Some(timeout_ms) = command.metadata.timeout_ms {
            if timeout_ms == 0 {
                return Err(CommandRouterError::InvalidCommand {
                    reason: "Timeout cannot be zero".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Default for CommandRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a handler error into a failure reply, preserving validation detail
fn failure_reply(error: &PluginError) -> CommandReply {
    match error {
        PluginError::ValidationError(failure) => CommandReply::fail_with_details(
            "Validation failed",
            failure.violations().iter().map(|v| v.to_string()).collect(),
        ),
        PluginError::ServiceError(message) => CommandReply::fail(message.clone()),
        other => CommandReply::fail(other.to_string()),
    }
}

/// Trait for command handlers
///
/// All command handlers must implement this trait to be registered with the
/// CommandRouter. Handlers own the validation and execution logic for their
/// pattern; a returned `Err` is converted to a failure reply at the router
/// boundary.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Handle a command and produce a reply
    async fn handle(&self, command: Command) -> Result<CommandReply, PluginError>;

    /// Get handler name for debugging
    fn handler_name(&self) -> &str;
}

/// Command router configuration
#[derive(Debug, Clone)]
pub struct CommandRouterConfig {
    /// Enable command execution history tracking
    pub enable_history: bool,

    /// Maximum number of command executions to keep in history
    pub max_history_size: usize,

    /// Default command timeout in milliseconds
    pub default_timeout_ms: u64,
}

impl Default for CommandRouterConfig {
    fn default() -> Self {
        Self {
            enable_history: true,
            max_history_size: 1000,
            default_timeout_ms: 30000,
        }
    }
}

/// Command execution record for history tracking
#[derive(Debug, Clone)]
pub struct CommandExecution {
    pub command: Command,
    pub reply: CommandReply,
    pub duration_ms: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Command router statistics
#[derive(Debug, Clone)]
pub struct CommandRouterStats {
    pub registered_handlers: usize,
    pub total_commands_processed: usize,
    pub successful_commands: usize,
    pub failed_commands: usize,
    pub history_enabled: bool,
}

/// Command router errors
#[derive(Debug, thiserror::Error)]
pub enum CommandRouterError {
    #[error("Handler not found for pattern: {pattern}")]
    HandlerNotFound { pattern: CommandPattern },

    #[error("Invalid command: {reason}")]
    InvalidCommand { reason: String },

    #[error("Handler registration failed: {reason}")]
    RegistrationFailed { reason: String },
}
