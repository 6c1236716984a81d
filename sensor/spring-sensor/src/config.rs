//! Sensor and joint configuration.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Result, SpringSensorError};

/// Configuration of the virtual spring sensor.
///
/// The probe hangs from the base through a joint anchored at
/// `anchor_offset` in the base frame. The Z drive pulls it a further
/// `rest_length` down, so in equilibrium without load the probe sits at
/// [`rest_offset`](Self::rest_offset) relative to the base.
///
/// # Example
///
/// ```
/// use spring_sensor::SpringSensorConfig;
///
/// let config = SpringSensorConfig::default()
///     .with_stiffness(500.0)
///     .with_rest_length(0.2);
///
/// assert!(config.validate().is_ok());
/// assert!((config.rest_offset()[2] + 1.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpringSensorConfig {
    /// Linear drive stiffness (N/m), shared by all translational axes.
    pub stiffness: f64,
    /// Linear drive damping (N·s/m), shared by all translational axes.
    pub damping: f64,
    /// Rest extension of the Z drive below the anchor (m).
    pub rest_length: f64,
    /// Joint anchor on the base, in the base frame (m).
    pub anchor_offset: [f64; 3],
}

impl Default for SpringSensorConfig {
    fn default() -> Self {
        Self {
            stiffness: 1000.0,
            damping: 1000.0,
            rest_length: 0.3,
            anchor_offset: [0.0, 0.0, -1.0],
        }
    }
}

impl SpringSensorConfig {
    /// Create a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the drive stiffness.
    #[must_use]
    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    /// Set the drive damping.
    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the rest length of the Z drive.
    #[must_use]
    pub fn with_rest_length(mut self, rest_length: f64) -> Self {
        self.rest_length = rest_length;
        self
    }

    /// Set the joint anchor on the base.
    #[must_use]
    pub fn with_anchor_offset(mut self, anchor_offset: [f64; 3]) -> Self {
        self.anchor_offset = anchor_offset;
        self
    }

    /// Anchor offset as a vector.
    #[must_use]
    pub fn anchor(&self) -> Vector3<f64> {
        Vector3::from(self.anchor_offset)
    }

    /// Unloaded probe position relative to the base, in the base frame.
    #[must_use]
    pub fn rest_offset(&self) -> Vector3<f64> {
        self.anchor() - Vector3::z() * self.rest_length
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SpringSensorError::InvalidConfig`] if stiffness or damping is
    /// negative or not finite, the rest length is not strictly positive, or
    /// the anchor has a non-finite component.
    pub fn validate(&self) -> Result<()> {
        if !self.stiffness.is_finite() || self.stiffness < 0.0 {
            return Err(SpringSensorError::invalid_config(format!(
                "stiffness must be finite and >= 0, got {}",
                self.stiffness
            )));
        }
        if !self.damping.is_finite() || self.damping < 0.0 {
            return Err(SpringSensorError::invalid_config(format!(
                "damping must be finite and >= 0, got {}",
                self.damping
            )));
        }
        if !self.rest_length.is_finite() || self.rest_length <= 0.0 {
            return Err(SpringSensorError::invalid_config(format!(
                "rest length must be finite and > 0, got {}",
                self.rest_length
            )));
        }
        if self.anchor_offset.iter().any(|v| !v.is_finite()) {
            return Err(SpringSensorError::invalid_config(
                "anchor offset must be finite",
            ));
        }
        Ok(())
    }

    /// Joint description for a host to build its constraint from.
    #[must_use]
    pub fn joint_spec(&self) -> SpringJointSpec {
        SpringJointSpec::from_config(self)
    }
}

/// Translational axis of the spring joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DriveAxis {
    /// Base-frame X.
    X,
    /// Base-frame Y.
    Y,
    /// Base-frame Z.
    Z,
}

impl DriveAxis {
    /// All translational axes, in index order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Component index of this axis.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// A force-type linear drive on one joint axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearDrive {
    /// Axis the drive acts along.
    pub axis: DriveAxis,
    /// Stiffness (N/m).
    pub stiffness: f64,
    /// Damping (N·s/m).
    pub damping: f64,
    /// Target position along the axis, relative to the anchor (m).
    pub target: f64,
}

impl LinearDrive {
    /// Drive force for a joint displacement and velocity along this axis.
    #[must_use]
    pub fn force(&self, position: f64, velocity: f64) -> f64 {
        -self.stiffness * (position - self.target) - self.damping * velocity
    }
}

/// Description of the spring joint between base and probe.
///
/// Rotation is locked on all three axes. Each translational axis carries a
/// [`LinearDrive`]; X and Y target zero, Z targets `-rest_length`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpringJointSpec {
    /// Anchor on the base, in the base frame.
    pub base_anchor: [f64; 3],
    /// Anchor on the probe, in the probe frame.
    pub probe_anchor: [f64; 3],
    /// Linear drives in X, Y, Z order.
    pub drives: [LinearDrive; 3],
    /// Whether rotational axes are locked.
    pub rotation_locked: bool,
}

impl SpringJointSpec {
    /// Build the joint description from a sensor configuration.
    #[must_use]
    pub fn from_config(config: &SpringSensorConfig) -> Self {
        let drive = |axis: DriveAxis, target: f64| LinearDrive {
            axis,
            stiffness: config.stiffness,
            damping: config.damping,
            target,
        };
        Self {
            base_anchor: config.anchor_offset,
            probe_anchor: [0.0, 0.0, 0.0],
            drives: [
                drive(DriveAxis::X, 0.0),
                drive(DriveAxis::Y, 0.0),
                drive(DriveAxis::Z, -config.rest_length),
            ],
            rotation_locked: true,
        }
    }

    /// Drive on the given axis.
    #[must_use]
    pub fn drive(&self, axis: DriveAxis) -> &LinearDrive {
        &self.drives[axis.index()]
    }

    /// Drive targets as a vector relative to the base anchor.
    #[must_use]
    pub fn targets(&self) -> Vector3<f64> {
        Vector3::new(
            self.drives[0].target,
            self.drives[1].target,
            self.drives[2].target,
        )
    }
}
