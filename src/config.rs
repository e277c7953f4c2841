use crate::command::router::CommandRouterConfig;
use crate::error::{PluginError, Result};

#[derive(Debug, Clone)]
pub struct PluginCoreConfig {
    pub default_timeout_ms: u64,
    pub max_history_size: usize,
    pub history_enabled: bool,
    pub log_json: bool,
}

impl Default for PluginCoreConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 30000,
            max_history_size: 1000,
            history_enabled: true,
            log_json: false,
        }
    }
}

impl PluginCoreConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(timeout) = std::env::var("PLUGIN_CORE_DEFAULT_TIMEOUT_MS") {
            config.default_timeout_ms = timeout.parse().map_err(|e| {
                PluginError::ConfigurationError(format!("Invalid default_timeout_ms: {e}"))
            })?;
        }

        if let Ok(history_size) = std::env::var("PLUGIN_CORE_MAX_HISTORY_SIZE") {
            config.max_history_size = history_size.parse().map_err(|e| {
                PluginError::ConfigurationError(format!("Invalid max_history_size: {e}"))
            })?;
        }

        if let Ok(history_enabled) = std::env::var("PLUGIN_CORE_HISTORY_ENABLED") {
            config.history_enabled = history_enabled.parse().map_err(|e| {
                PluginError::ConfigurationError(format!("Invalid history_enabled: {e}"))
            })?;
        }

        if let Ok(log_json) = std::env::var("PLUGIN_CORE_LOG_JSON") {
            config.log_json = log_json.parse().map_err(|e| {
                PluginError::ConfigurationError(format!("Invalid log_json: {e}"))
            })?;
        }

        Ok(config)
    }

    /// Project the router-facing subset of this configuration
    pub fn router_config(&self) -> CommandRouterConfig {
        CommandRouterConfig {
            enable_history: self.history_enabled,
            max_history_size: self.max_history_size,
            default_timeout_ms: self.default_timeout_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PluginCoreConfig::default();
        assert_eq!(config.default_timeout_ms, 30000);
        assert_eq!(config.max_history_size, 1000);
        assert!(config.history_enabled);
        assert!(!config.log_json);
    }

    #[test]
    fn test_router_config_projection() {
        let config = PluginCoreConfig {
            default_timeout_ms: 5000,
            max_history_size: 50,
            history_enabled: false,
            log_json: true,
        };

        let router_config = config.router_config();
        assert_eq!(router_config.default_timeout_ms, 5000);
        assert_eq!(router_config.max_history_size, 50);
        assert!(!router_config.enable_history);
    }
}
