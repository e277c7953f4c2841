//! Plugin abstraction and lifecycle management
//!
//! A [`Plugin`] contributes command handlers to a [`CommandRouter`] through
//! its `register` hook. The [`registry::PluginRegistry`] tracks registered
//! plugins and their lifecycle state.

use async_trait::async_trait;

use crate::command::router::CommandRouter;
use crate::error::PluginError;

pub mod create;
pub mod registry;

pub use create::{CreateCommandPlugin, CreationService, StubCreationService, PICK_FIELDS};
pub use registry::{PluginMetadata, PluginRegistry, PluginState, PluginStats, RegisteredPlugin};

/// Trait implemented by plugins that contribute command handlers
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Plugin name, unique within a registry
    fn name(&self) -> &str;

    /// Plugin version
    fn version(&self) -> &str;

    /// Human-readable plugin description
    fn description(&self) -> &str;

    /// Wire this plugin's command handlers into the router
    async fn register(&self, router: &CommandRouter) -> Result<(), PluginError>;
}
