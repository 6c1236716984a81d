//! Error types for the stereo rig.

use thiserror::Error;

/// Errors that can occur when configuring the rig or handling its frames.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RigError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// A mode tag did not name a known trajectory.
    #[error("unknown orbit mode '{tag}' (expected 'circle' or 'linear')")]
    UnknownMode {
        /// The rejected tag.
        tag: String,
    },

    /// Pixel buffer length does not match the frame size.
    #[error("buffer size mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch {
        /// Expected buffer size.
        expected: usize,
        /// Actual buffer size.
        actual: usize,
    },
}

impl RigError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a buffer size mismatch error.
    #[must_use]
    pub const fn buffer_mismatch(expected: usize, actual: usize) -> Self {
        Self::BufferSizeMismatch { expected, actual }
    }

    /// Check if this error comes from bad configuration.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. } | Self::UnknownMode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_mode_message() {
        let err = RigError::UnknownMode {
            tag: "spiral".into(),
        };
        assert!(err.to_string().contains("spiral"));
        assert!(err.is_config_error());
    }

    #[test]
    fn buffer_mismatch_message() {
        let err = RigError::buffer_mismatch(16, 12);
        assert_eq!(err.to_string(), "buffer size mismatch: expected 16, got 12");
        assert!(!err.is_config_error());
    }
}
