//! Workflow webhook configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Chat workflow and report webhook configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// Chat workflow webhook URL (required)
    pub chat_webhook_url: String,

    /// Report sink webhook URL; dispatch is a no-op when unset
    pub report_webhook_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl WorkflowConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if the report sink is configured
    pub fn has_report_sink(&self) -> bool {
        self.report_webhook_url
            .as_ref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    /// Validate workflow configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.chat_webhook_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("CIVIS__WORKFLOW__CHAT_WEBHOOK_URL"));
        }
        if !has_http_scheme(&self.chat_webhook_url) {
            return Err(ValidationError::InvalidWebhookUrl("chat_webhook_url"));
        }
        if let Some(url) = &self.report_webhook_url {
            if !url.trim().is_empty() && !has_http_scheme(url) {
                return Err(ValidationError::InvalidWebhookUrl("report_webhook_url"));
            }
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn has_http_scheme(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn default_timeout() -> u64 {
    60
}
