//! Deterministic rig-center trajectories.

use std::fmt;
use std::str::FromStr;

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Result, RigError};

/// How the rig center moves across a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OrbitMode {
    /// One full revolution at fixed radius and height.
    #[default]
    Circle,
    /// Straight line from point A to point B.
    Linear,
}

impl OrbitMode {
    /// Tag used in configuration files and metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Linear => "linear",
        }
    }
}

impl fmt::Display for OrbitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrbitMode {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(Self::Circle),
            "linear" => Ok(Self::Linear),
            _ => Err(RigError::UnknownMode { tag: s.to_string() }),
        }
    }
}

/// Parameters of the rig-center trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrajectoryConfig {
    /// Trajectory shape.
    pub mode: OrbitMode,
    /// Frames in a full capture.
    pub num_frames: usize,
    /// Circle radius around the target (m).
    pub radius: f64,
    /// Circle height (m, world Z).
    pub height: f64,
    /// Linear start point.
    pub point_a: [f64; 3],
    /// Linear end point.
    pub point_b: [f64; 3],
    /// Look-at target.
    pub target: [f64; 3],
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            mode: OrbitMode::Circle,
            num_frames: 50,
            radius: 0.4,
            height: 0.4,
            point_a: [0.5, 0.5, 0.5],
            point_b: [0.2, 0.2, 0.2],
            target: [0.0, 0.0, 0.0],
        }
    }
}

impl TrajectoryConfig {
    /// Set the trajectory mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: OrbitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the frame count.
    #[must_use]
    pub const fn with_num_frames(mut self, num_frames: usize) -> Self {
        self.num_frames = num_frames;
        self
    }

    /// Set the circle radius and height.
    #[must_use]
    pub const fn with_circle(mut self, radius: f64, height: f64) -> Self {
        self.radius = radius;
        self.height = height;
        self
    }

    /// Set the linear endpoints.
    #[must_use]
    pub const fn with_line(mut self, a: [f64; 3], b: [f64; 3]) -> Self {
        self.point_a = a;
        self.point_b = b;
        self
    }

    /// Look-at target as a point.
    #[must_use]
    pub fn target_point(&self) -> Point3<f64> {
        Point3::from(self.target)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::InvalidConfig`] for a zero frame count, a negative
    /// radius or any non-finite coordinate.
    pub fn validate(&self) -> Result<()> {
        if self.num_frames == 0 {
            return Err(RigError::invalid_config("frame count must be > 0"));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(RigError::invalid_config(format!(
                "radius must be >= 0, got {}",
                self.radius
            )));
        }
        let mut coords = self
            .point_a
            .iter()
            .chain(&self.point_b)
            .chain(&self.target)
            .chain(std::iter::once(&self.height));
        if coords.any(|v| !v.is_finite()) {
            return Err(RigError::invalid_config("trajectory points must be finite"));
        }
        Ok(())
    }

    /// Rig center for `frame` out of `total`.
    ///
    /// Circle mode sweeps `frame / total` of a revolution around the target
    /// at the configured height. Linear mode interpolates with
    /// `frame / (total - 1)`, so the last frame lands on point B; with a
    /// single frame it returns point A.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::InvalidConfig`] if `total` is zero.
    pub fn center_at(&self, frame: usize, total: usize) -> Result<Point3<f64>> {
        if total == 0 {
            return Err(RigError::invalid_config("frame count must be > 0"));
        }
        let center = match self.mode {
            OrbitMode::Circle => {
                let angle = (frame as f64 / total as f64) * std::f64::consts::TAU;
                let (sin, cos) = angle.sin_cos();
                Point3::new(
                    self.target[0] + self.radius * cos,
                    self.target[1] + self.radius * sin,
                    self.height,
                )
            }
            OrbitMode::Linear => {
                let a = Point3::from(self.point_a);
                if total == 1 {
                    return Ok(a);
                }
                let b = Point3::from(self.point_b);
                if frame == total - 1 {
                    return Ok(b);
                }
                let progress = frame as f64 / (total - 1) as f64;
                a + (b - a) * progress
            }
        };
        Ok(center)
    }

    /// All centers for the configured frame count.
    ///
    /// # Errors
    ///
    /// Returns the validation error if the configuration is invalid.
    pub fn centers(&self) -> Result<Vec<Point3<f64>>> {
        self.validate()?;
        (0..self.num_frames)
            .map(|i| self.center_at(i, self.num_frames))
            .collect()
    }
}
