//! Ray-cast pinhole camera.

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use stereo_rig::{CameraIntrinsics, ImageSource, PoseSettable, RgbaFrame, StereoRigConfig};

use crate::{PrimitiveScene, Ray};

/// Camera that renders a [`PrimitiveScene`] with one ray per pixel.
///
/// Body frame follows the rig convention: `+X` forward, `+Y` left, `+Z` up.
#[derive(Debug, Clone)]
pub struct SyntheticCamera {
    intrinsics: CameraIntrinsics,
    near: f64,
    far: f64,
    pose: Isometry3<f64>,
    frame: Option<RgbaFrame>,
}

impl SyntheticCamera {
    /// Creates a camera from a rig configuration.
    #[must_use]
    pub fn new(config: &StereoRigConfig) -> Self {
        Self {
            intrinsics: config.intrinsics(),
            near: config.near_clip,
            far: config.far_clip,
            pose: Isometry3::identity(),
            frame: None,
        }
    }

    /// Current world pose.
    #[must_use]
    pub fn pose(&self) -> &Isometry3<f64> {
        &self.pose
    }

    /// World-space ray through the center of pixel `(u, v)`.
    #[must_use]
    pub fn pixel_ray(&self, u: u32, v: u32) -> Ray {
        let [x, y, z] = self
            .intrinsics
            .unproject([f64::from(u) + 0.5, f64::from(v) + 0.5]);
        // Optical (right, down, forward) to body (forward, left, up).
        let body = Vector3::new(z, -x, -y);
        Ray::new(
            Point3::from(self.pose.translation.vector),
            self.pose.rotation * body,
        )
    }

    /// Renders the scene and stores the frame.
    pub fn render(&mut self, scene: &PrimitiveScene) {
        let (w, h) = (self.intrinsics.width, self.intrinsics.height);
        let mut frame = RgbaFrame::filled(w, h, [0, 0, 0, 255]);
        for v in 0..h {
            for u in 0..w {
                let rgba = scene.shade(&self.pixel_ray(u, v), self.near, self.far);
                if let Some(px) = frame.pixel_mut(u, v) {
                    px.copy_from_slice(&rgba);
                }
            }
        }
        self.frame = Some(frame);
    }
}

impl PoseSettable for SyntheticCamera {
    fn set_world_pose(&mut self, position: Point3<f64>, orientation: UnitQuaternion<f64>) {
        self.pose = Isometry3::from_parts(Translation3::from(position.coords), orientation);
    }
}

impl ImageSource for SyntheticCamera {
    fn latest_rgba(&self) -> Option<RgbaFrame> {
        self.frame.clone()
    }
}
