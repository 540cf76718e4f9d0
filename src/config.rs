//! Actor system configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Largest accepted mailbox batch.
pub const MAILBOX_BATCH_SIZE_MAX: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Address every local [Addr](crate::addr::Addr) carries.
    #[serde(default = "default_address")]
    pub address: String,

    /// User messages handed to an actor per drain, unless the props override it.
    #[serde(default = "default_mailbox_batch_size")]
    pub mailbox_batch_size: usize,

    /// Log messages sent to addresses that no longer resolve.
    #[serde(default = "default_log_dead_letters")]
    pub log_dead_letters: bool,
}

fn default_address() -> String {
    "nonhost".to_string()
}

fn default_mailbox_batch_size() -> usize {
    1
}

fn default_log_dead_letters() -> bool {
    true
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            mailbox_batch_size: default_mailbox_batch_size(),
            log_dead_letters: default_log_dead_letters(),
        }
    }
}

impl SystemConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address.is_empty() {
            return Err(ConfigError::Invalid {
                field: "address".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.mailbox_batch_size == 0 || self.mailbox_batch_size > MAILBOX_BATCH_SIZE_MAX {
            return Err(ConfigError::Invalid {
                field: "mailbox_batch_size".into(),
                reason: format!("must be between 1 and {MAILBOX_BATCH_SIZE_MAX}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SystemConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let config = SystemConfig {
            mailbox_batch_size: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "mailbox_batch_size"));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: SystemConfig = serde_json::from_str(r#"{"mailbox_batch_size": 8}"#).unwrap();
        assert_eq!(config.mailbox_batch_size, 8);
        assert_eq!(config.address, "nonhost");
        assert!(config.log_dead_letters);
    }
}
