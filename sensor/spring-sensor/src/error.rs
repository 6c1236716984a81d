//! Error types for the spring sensor.

use thiserror::Error;

/// Errors that can occur when configuring or reading the spring sensor.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpringSensorError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// A pose or position reported by the host is not finite.
    #[error("non-finite {what} reported by host")]
    NonFiniteInput {
        /// Which quantity was not finite.
        what: &'static str,
    },
}

impl SpringSensorError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Check if this is a configuration error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}
