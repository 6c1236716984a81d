//! Error types for the reference host.

use spring_sensor::SpringSensorError;
use stereo_rig::RigError;
use thiserror::Error;

/// Errors raised while building or stepping the reference host.
#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// An unknown scene mode tag.
    #[error("unknown scene mode '{tag}' (expected 'diy' or 'import')")]
    UnknownSceneMode {
        /// The rejected tag.
        tag: String,
    },

    /// The scene mode needs host features this reference host lacks.
    #[error("scene mode '{mode}' is not supported by the reference host")]
    UnsupportedScene {
        /// The requested mode.
        mode: String,
    },

    /// Spring sensor error.
    #[error(transparent)]
    Sensor(#[from] SpringSensorError),

    /// Stereo rig error.
    #[error(transparent)]
    Rig(#[from] RigError),
}

impl SimError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_crate_errors() {
        let err: SimError = RigError::invalid_config("baseline").into();
        assert!(err.to_string().contains("baseline"));

        let err: SimError = SpringSensorError::invalid_config("stiffness").into();
        assert!(matches!(err, SimError::Sensor(_)));
    }

    #[test]
    fn unsupported_scene_message() {
        let err = SimError::UnsupportedScene {
            mode: "import".into(),
        };
        assert!(err.to_string().contains("import"));
    }
}
