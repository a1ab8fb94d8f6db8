//! Ticket storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Local ticket store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON file holding the ticket collection
    #[serde(default = "default_path")]
    pub path: String,
}

impl StorageConfig {
    /// Get the storage path
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.path.trim().is_empty() {
            return Err(ValidationError::EmptyStoragePath);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

fn default_path() -> String {
    "tickets.json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_file() {
        let config = StorageConfig::default();
        assert_eq!(config.path(), PathBuf::from("tickets.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_path_fails_validation() {
        let config = StorageConfig {
            path: " ".to_string(),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::EmptyStoragePath)
        ));
    }
}
