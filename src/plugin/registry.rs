//! # Plugin Registry
//!
//! Registry for plugin registration and lifecycle with thread-safe management.
//!
//! ## Overview
//!
//! The PluginRegistry provides a centralized way to register and manage
//! plugins at runtime. Registering a plugin invokes its `register` hook to
//! wire command handlers into the router, then tracks the plugin's metadata
//! and lifecycle state.
//!
//! ## Key Features
//!
//! - **Thread-safe plugin management** using RwLock for concurrent access
//! - **Plugin lifecycle management** (register, enable, disable)
//! - **Plugin metadata** tracking
//! - **Registry statistics** by lifecycle state
//!
//! ## Usage
//!
//! ```rust
//! use plugin_core::command::router::CommandRouter;
//! use plugin_core::plugin::registry::PluginRegistry;
//! use plugin_core::plugin::create::CreateCommandPlugin;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let router = CommandRouter::new();
//! let registry = PluginRegistry::new();
//!
//! // Register a plugin; its command handlers are wired into the router
//! registry
//!     .register_plugin(Arc::new(CreateCommandPlugin::with_stub_service()), &router)
//!     .await?;
//!
//! // List registered plugins
//! let plugins = registry.list_plugins().await;
//! println!("Registered plugins: {:?}", plugins);
//! # Ok(())
//! # }
//! ```

use crate::command::router::CommandRouter;
use crate::error::{PluginError, Result};
use crate::logging;
use crate::plugin::Plugin;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Plugin metadata recorded at registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub name: String,
    pub version: String,
    pub description: String,
    pub enabled: bool,
}

/// Plugin state for runtime management
#[derive(Debug, Clone, PartialEq)]
pub enum PluginState {
    Enabled,
    Disabled,
    Failed,
}

/// Plugin record with state management
#[derive(Debug, Clone)]
pub struct RegisteredPlugin {
    pub metadata: PluginMetadata,
    pub state: PluginState,
    pub error_message: Option<String>,
    pub registered_at: chrono::DateTime<chrono::Utc>,
}

/// Registry for managing plugins
pub struct PluginRegistry {
    /// Registered plugins by name
    plugins: Arc<RwLock<HashMap<String, RegisteredPlugin>>>,
}

impl PluginRegistry {
    /// Create a new plugin registry
    pub fn new() -> Self {
        Self {
            plugins: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a plugin and wire its command handlers into the router
    ///
    /// On success the plugin is recorded as `Enabled`. If the plugin's
    /// `register` hook fails, the plugin is recorded as `Failed` with the
    /// error message and the error is returned.
    pub async fn register_plugin(
        &self,
        plugin: Arc<dyn Plugin>,
        router: &CommandRouter,
    ) -> Result<()> {
        let name = plugin.name().to_string();
        let mut metadata = PluginMetadata {
            name: name.clone(),
            version: plugin.version().to_string(),
            description: plugin.description().to_string(),
            enabled: false,
        };

        {
            let plugins = self.plugins.read().await;
            if plugins.contains_key(&name) {
                warn!("Replacing existing plugin registration '{}'", name);
            }
        }

        match plugin.register(router).await {
            Ok(()) => {
                metadata.enabled = true;
                let record = RegisteredPlugin {
                    metadata,
                    state: PluginState::Enabled,
                    error_message: None,
                    registered_at: chrono::Utc::now(),
                };

                let mut plugins = self.plugins.write().await;
                plugins.insert(name.clone(), record);

                logging::log_registry_operation(
                    "register",
                    Some(&name),
                    Some(plugin.version()),
                    "enabled",
                    None,
                );
                Ok(())
            }
            Err(e) => {
                let record = RegisteredPlugin {
                    metadata,
                    state: PluginState::Failed,
                    error_message: Some(e.to_string()),
                    registered_at: chrono::Utc::now(),
                };

                let mut plugins = self.plugins.write().await;
                plugins.insert(name.clone(), record);

                logging::log_error(
                    "PluginRegistry",
                    "register",
                    &e.to_string(),
                    Some(&name),
                );
                Err(PluginError::RegistrationError(format!(
                    "Plugin '{name}' failed to register: {e}"
                )))
            }
        }
    }

    /// Enable a previously disabled plugin
    pub async fn enable_plugin(&self, name: &str) -> Result<()> {
        let mut plugins = self.plugins.write().await;

        if let Some(plugin) = plugins.get_mut(name) {
            if plugin.state == PluginState::Disabled {
                plugin.state = PluginState::Enabled;
                plugin.metadata.enabled = true;
                info!("Enabled plugin '{}'", name);
                Ok(())
            } else {
                Err(PluginError::RegistrationError(format!(
                    "Plugin '{}' cannot be enabled from state {:?}",
                    name, plugin.state
                )))
            }
        } else {
            Err(PluginError::RegistrationError(format!(
                "Plugin '{name}' not found"
            )))
        }
    }

    /// Disable a plugin
    pub async fn disable_plugin(&self, name: &str) -> Result<()> {
        let mut plugins = self.plugins.write().await;

        if let Some(plugin) = plugins.get_mut(name) {
            if plugin.state == PluginState::Enabled {
                plugin.state = PluginState::Disabled;
                plugin.metadata.enabled = false;
                info!("Disabled plugin '{}'", name);
                Ok(())
            } else {
                Err(PluginError::RegistrationError(format!(
                    "Plugin '{name}' is not enabled"
                )))
            }
        } else {
            Err(PluginError::RegistrationError(format!(
                "Plugin '{name}' not found"
            )))
        }
    }

    /// List all registered plugins
    pub async fn list_plugins(&self) -> Vec<RegisteredPlugin> {
        let plugins = self.plugins.read().await;
        plugins.values().cloned().collect()
    }

    /// Get plugin by name
    pub async fn get_plugin(&self, name: &str) -> Option<RegisteredPlugin> {
        let plugins = self.plugins.read().await;
        plugins.get(name).cloned()
    }

    /// Check if plugin is enabled
    pub async fn is_plugin_enabled(&self, name: &str) -> bool {
        let plugins = self.plugins.read().await;
        plugins
            .get(name)
            .map(|p| p.state == PluginState::Enabled)
            .unwrap_or(false)
    }

    /// Get plugin statistics
    pub async fn stats(&self) -> PluginStats {
        let plugins = self.plugins.read().await;
        let mut stats = PluginStats::default();

        for plugin in plugins.values() {
            stats.total_plugins += 1;
            match plugin.state {
                PluginState::Enabled => stats.enabled_plugins += 1,
                PluginState::Disabled => stats.disabled_plugins += 1,
                PluginState::Failed => stats.failed_plugins += 1,
            }
        }

        stats
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about registered plugins
#[derive(Debug, Clone, Default)]
pub struct PluginStats {
    pub total_plugins: usize,
    pub enabled_plugins: usize,
    pub disabled_plugins: usize,
    pub failed_plugins: usize,
}
