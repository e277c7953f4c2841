//! Command envelope and reply types
//!
//! A [`Command`] is one inbound message addressed by a role/cmd
//! [`CommandPattern`]. Completion is a [`CommandReply`] whose wire shape is
//! `{ "status": true, "result": ... }` on success and
//! `{ "status": false, "message": ... }` on failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Routing key for command dispatch
///
/// # Examples
///
/// ```rust
/// use plugin_core::command::message::CommandPattern;
///
/// let pattern = CommandPattern::new("plugin", "create");
/// assert_eq!(pattern.to_string(), "plugin/create");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CommandPattern {
    pub role: String,
    pub cmd: String,
}

impl CommandPattern {
    pub fn new(role: &str, cmd: &str) -> Self {
        Self {
            role: role.to_string(),
            cmd: cmd.to_string(),
        }
    }
}

impl std::fmt::Display for CommandPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.role, self.cmd)
    }
}

/// Command source identification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CommandSource {
    Client { id: String },
    Plugin { name: String },
    Router { id: String },
}

/// Command metadata for routing and execution control
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// When this command was created
    pub timestamp: DateTime<Utc>,

    /// Source of the command
    pub source: CommandSource,

    /// Command timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

impl CommandMetadata {
    /// Create new metadata with current timestamp
    pub fn new(source: CommandSource) -> Self {
        Self {
            timestamp: Utc::now(),
            source,
            timeout_ms: None,
        }
    }

    /// Set timeout for this command
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// One inbound command message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    /// Pattern this command is addressed to
    pub pattern: CommandPattern,

    /// Unique identifier for this command
    pub command_id: String,

    /// Optional correlation ID for request/response tracking
    pub correlation_id: Option<String>,

    /// Command metadata for routing and execution
    pub metadata: CommandMetadata,

    /// Command arguments, expected to be a JSON object
    pub args: Value,
}

impl Command {
    /// Create a new command with generated ID and current timestamp
    pub fn new(pattern: CommandPattern, args: Value, source: CommandSource) -> Self {
        Self {
            pattern,
            command_id: Uuid::new_v4().to_string(),
            correlation_id: None,
            metadata: CommandMetadata::new(source),
            args,
        }
    }

    /// Create a follow-up command correlated to this one
    pub fn create_followup(
        &self,
        pattern: CommandPattern,
        args: Value,
        source: CommandSource,
    ) -> Self {
        Self {
            pattern,
            command_id: Uuid::new_v4().to_string(),
            correlation_id: Some(self.command_id.clone()),
            metadata: CommandMetadata::new(source),
            args,
        }
    }

    /// Check if this command was issued in response to another command
    pub fn is_response(&self) -> bool {
        self.correlation_id.is_some()
    }
}

/// Completion envelope for a routed command
///
/// Success and failure are discriminated by the boolean `status` field;
/// `result` is only present on success, `message` only on failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandReply {
    pub status: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Per-violation detail lines for validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,

    /// Command this reply completes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
}

impl CommandReply {
    /// Successful completion carrying a result value
    pub fn ok(result: Value) -> Self {
        Self {
            status: true,
            result: Some(result),
            message: None,
            details: Vec::new(),
            command_id: None,
        }
    }

    /// Failed completion carrying an error message
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: false,
            result: None,
            message: Some(message.into()),
            details: Vec::new(),
            command_id: None,
        }
    }

    /// Failed completion with per-violation detail lines
    pub fn fail_with_details(message: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            status: false,
            result: None,
            message: Some(message.into()),
            details,
            command_id: None,
        }
    }

    /// Record the command this reply completes
    pub fn for_command(mut self, command_id: &str) -> Self {
        self.command_id = Some(command_id.to_string());
        self
    }

    pub fn is_ok(&self) -> bool {
        self.status
    }
}
