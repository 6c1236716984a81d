//! Rig configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{CameraIntrinsics, Result, RigError};

/// Static configuration shared by both cameras of the rig.
///
/// Focal length and aperture use the host's lens units (centimetres), so a
/// focal length of `1.32383` is a 13.2383 mm lens.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StereoRigConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Lens focal length.
    pub focal_length: f64,
    /// Horizontal sensor aperture, same units as the focal length.
    pub horizontal_aperture: f64,
    /// Distance between the two camera centers (m).
    pub baseline: f64,
    /// Near clipping distance (m).
    pub near_clip: f64,
    /// Far clipping distance (m).
    pub far_clip: f64,
}

impl Default for StereoRigConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            focal_length: 1.32383,
            horizontal_aperture: 2.0955,
            baseline: 0.032,
            near_clip: 0.01,
            far_clip: 10000.0,
        }
    }
}

impl StereoRigConfig {
    /// Set the image resolution.
    #[must_use]
    pub const fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the focal length.
    #[must_use]
    pub const fn with_focal_length(mut self, focal_length: f64) -> Self {
        self.focal_length = focal_length;
        self
    }

    /// Set the baseline.
    #[must_use]
    pub const fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = baseline;
        self
    }

    /// Set the clipping range.
    #[must_use]
    pub const fn with_clipping(mut self, near: f64, far: f64) -> Self {
        self.near_clip = near;
        self.far_clip = far;
        self
    }

    /// Focal length in millimetres.
    #[must_use]
    pub fn focal_length_mm(&self) -> f64 {
        self.focal_length * 10.0
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::InvalidConfig`] if the resolution has a zero side,
    /// the focal length, aperture or baseline is not positive, or the
    /// clipping range is not `0 < near < far`.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RigError::invalid_config(format!(
                "resolution must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        for (name, value) in [
            ("focal length", self.focal_length),
            ("horizontal aperture", self.horizontal_aperture),
            ("baseline", self.baseline),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RigError::invalid_config(format!(
                    "{name} must be > 0, got {value}"
                )));
            }
        }
        if !(self.near_clip > 0.0 && self.near_clip < self.far_clip) {
            return Err(RigError::invalid_config(format!(
                "clipping range must satisfy 0 < near < far, got {}..{}",
                self.near_clip, self.far_clip
            )));
        }
        Ok(())
    }

    /// Pixel intrinsics implied by the lens and resolution.
    #[must_use]
    pub fn intrinsics(&self) -> CameraIntrinsics {
        CameraIntrinsics::from_lens(
            self.width,
            self.height,
            self.focal_length,
            self.horizontal_aperture,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_validate() {
        let config = StereoRigConfig::default();
        assert!(config.validate().is_ok());
        assert_relative_eq!(config.focal_length_mm(), 13.2383, epsilon = 1e-9);
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            StereoRigConfig::default().with_resolution(0, 400),
            StereoRigConfig::default().with_focal_length(0.0),
            StereoRigConfig::default().with_baseline(-0.01),
            StereoRigConfig::default().with_clipping(1.0, 0.5),
            StereoRigConfig::default().with_clipping(0.0, 10.0),
        ];
        for config in bad {
            assert!(config.validate().unwrap_err().is_config_error(), "{config:?}");
        }
    }

    #[test]
    fn intrinsics_follow_resolution() {
        let k = StereoRigConfig::default().with_resolution(640, 480).intrinsics();
        assert_eq!((k.width, k.height), (640, 480));
        assert_relative_eq!(k.cx, 320.0);
        assert_relative_eq!(k.cy, 240.0);
    }
}
