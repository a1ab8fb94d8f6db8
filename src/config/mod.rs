//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `CIVIS` prefix and nested values use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use civis::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Chat webhook: {}", config.workflow.chat_webhook_url);
//! ```

mod error;
mod storage;
mod workflow;

pub use error::{ConfigError, ValidationError};
pub use storage::StorageConfig;
pub use workflow::WorkflowConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Workflow webhook configuration (chat + report sink)
    pub workflow: WorkflowConfig,

    /// Local ticket store configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CIVIS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `CIVIS__WORKFLOW__CHAT_WEBHOOK_URL=...` -> `workflow.chat_webhook_url`
    /// - `CIVIS__STORAGE__PATH=...` -> `storage.path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().prefix("CIVIS").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.workflow.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

fn default_log_level() -> String {
    "civis=info,warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_a_complete_config() {
        let config = AppConfig {
            workflow: WorkflowConfig {
                chat_webhook_url: "https://n8n.example.com/webhook/chat".to_string(),
                report_webhook_url: Some("https://n8n.example.com/webhook/report".to_string()),
                timeout_secs: 60,
            },
            storage: StorageConfig::default(),
            log_level: default_log_level(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_propagates_workflow_errors() {
        let config = AppConfig {
            workflow: WorkflowConfig {
                chat_webhook_url: String::new(),
                report_webhook_url: None,
                timeout_secs: 60,
            },
            storage: StorageConfig::default(),
            log_level: default_log_level(),
        };
        assert!(config.validate().is_err());
    }
}
