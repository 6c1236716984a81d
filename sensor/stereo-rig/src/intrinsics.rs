//! Pinhole intrinsics derived from lens parameters.

use nalgebra::Matrix3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Camera intrinsic parameters (pinhole model, no distortion).
///
/// Pixel coordinates use the optical convention: `u` to the right, `v` down,
/// depth along the optical axis.
///
/// ```text
/// u = fx * X/Z + cx
/// v = fy * Y/Z + cy
/// ```
///
/// # Example
///
/// ```
/// use stereo_rig::CameraIntrinsics;
///
/// let k = CameraIntrinsics::from_lens(400, 400, 1.32383, 2.0955);
/// assert!((k.fx - 252.7).abs() < 0.1);
/// assert_eq!(k.flattened()[8], 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraIntrinsics {
    /// Focal length in pixels (x direction).
    pub fx: f64,
    /// Focal length in pixels (y direction).
    pub fy: f64,
    /// Principal point x-coordinate in pixels.
    pub cx: f64,
    /// Principal point y-coordinate in pixels.
    pub cy: f64,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl CameraIntrinsics {
    /// Creates intrinsics from pixel focal lengths and principal point.
    #[must_use]
    pub const fn new(fx: f64, fy: f64, cx: f64, cy: f64, width: u32, height: u32) -> Self {
        Self {
            fx,
            fy,
            cx,
            cy,
            width,
            height,
        }
    }

    /// Derives intrinsics from a lens focal length and horizontal aperture.
    ///
    /// The vertical aperture follows the image aspect ratio, so pixels are
    /// square. The principal point is the image center.
    #[must_use]
    pub fn from_lens(width: u32, height: u32, focal_length: f64, horizontal_aperture: f64) -> Self {
        let w = f64::from(width);
        let h = f64::from(height);
        let vertical_aperture = horizontal_aperture * h / w;
        Self {
            fx: w * focal_length / horizontal_aperture,
            fy: h * focal_length / vertical_aperture,
            cx: w / 2.0,
            cy: h / 2.0,
            width,
            height,
        }
    }

    /// The 3×3 intrinsic matrix K.
    #[must_use]
    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.fx, 0.0, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        )
    }

    /// K in row-major order.
    #[must_use]
    pub fn flattened(&self) -> [f64; 9] {
        [
            self.fx, 0.0, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        ]
    }

    /// Horizontal field of view in radians.
    #[must_use]
    pub fn fov_x(&self) -> f64 {
        2.0 * (f64::from(self.width) / (2.0 * self.fx)).atan()
    }

    /// Projects an optical-frame point to pixel coordinates.
    ///
    /// Returns `None` if the point is behind the camera (Z <= 0).
    #[must_use]
    pub fn project(&self, point: [f64; 3]) -> Option<[f64; 2]> {
        let [x, y, z] = point;
        if z <= 0.0 {
            return None;
        }
        Some([self.fx * x / z + self.cx, self.fy * y / z + self.cy])
    }

    /// Unprojects a pixel to a normalized optical-frame ray direction.
    #[must_use]
    pub fn unproject(&self, pixel: [f64; 2]) -> [f64; 3] {
        let x = (pixel[0] - self.cx) / self.fx;
        let y = (pixel[1] - self.cy) / self.fy;
        let norm = x.mul_add(x, y.mul_add(y, 1.0)).sqrt();
        [x / norm, y / norm, 1.0 / norm]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_lens_square_pixels() {
        let k = CameraIntrinsics::from_lens(640, 480, 1.8, 2.0955);
        assert_relative_eq!(k.fx, k.fy, epsilon = 1e-9);
        assert_relative_eq!(k.fx, 640.0 * 1.8 / 2.0955, epsilon = 1e-9);
        assert_relative_eq!(k.cx, 320.0);
        assert_relative_eq!(k.cy, 240.0);
    }

    #[test]
    fn matrix_matches_flattened() {
        let k = CameraIntrinsics::from_lens(400, 400, 1.32383, 2.0955);
        let m = k.matrix();
        let flat = k.flattened();
        for r in 0..3 {
            for c in 0..3 {
                assert_relative_eq!(m[(r, c)], flat[r * 3 + c]);
            }
        }
    }

    #[test]
    fn project_unproject_center() {
        let k = CameraIntrinsics::new(100.0, 100.0, 50.0, 40.0, 100, 80);
        assert_eq!(k.project([0.0, 0.0, 2.0]), Some([50.0, 40.0]));
        assert_eq!(k.project([0.0, 0.0, -1.0]), None);

        let ray = k.unproject([150.0, 40.0]);
        assert_relative_eq!(ray[0], std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(ray[2], std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn fov_of_default_lens() {
        let k = CameraIntrinsics::from_lens(400, 400, 1.32383, 2.0955);
        // 2 * atan(aperture / (2 * focal))
        assert_relative_eq!(k.fov_x(), 2.0 * (2.0955_f64 / (2.0 * 1.32383)).atan(), epsilon = 1e-9);
    }
}
