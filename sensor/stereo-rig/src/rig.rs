//! The paired-camera rig.

use nalgebra::Point3;
use tracing::{debug, trace};

use crate::host::{ImageSource, PoseSettable};
use crate::{CameraIntrinsics, Result, RgbaFrame, StereoPose, StereoRigConfig};

/// Frames retrieved from both cameras.
///
/// A side is `None` until its camera has rendered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StereoCapture {
    /// Left camera frame.
    pub left: Option<RgbaFrame>,
    /// Right camera frame.
    pub right: Option<RgbaFrame>,
}

impl StereoCapture {
    /// Whether both frames are available.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// Both frames, if both are available.
    #[must_use]
    pub fn into_pair(self) -> Option<(RgbaFrame, RgbaFrame)> {
        match (self.left, self.right) {
            (Some(l), Some(r)) => Some((l, r)),
            _ => None,
        }
    }
}

/// Two cameras placed by a shared [`StereoPose`].
#[derive(Debug)]
pub struct StereoRig<C> {
    config: StereoRigConfig,
    left: C,
    right: C,
    pose: Option<StereoPose>,
}

impl<C: PoseSettable + ImageSource> StereoRig<C> {
    /// Builds a rig from two host cameras.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RigError::InvalidConfig`] if the configuration does
    /// not validate.
    pub fn new(config: StereoRigConfig, left: C, right: C) -> Result<Self> {
        config.validate()?;
        debug!(
            width = config.width,
            height = config.height,
            baseline = config.baseline,
            "stereo rig created"
        );
        Ok(Self {
            config,
            left,
            right,
            pose: None,
        })
    }

    /// Rig configuration.
    #[must_use]
    pub fn config(&self) -> &StereoRigConfig {
        &self.config
    }

    /// Pixel intrinsics shared by both cameras.
    #[must_use]
    pub fn intrinsics(&self) -> CameraIntrinsics {
        self.config.intrinsics()
    }

    /// The pose last applied, if any.
    #[must_use]
    pub fn pose(&self) -> Option<&StereoPose> {
        self.pose.as_ref()
    }

    /// Moves the rig to `center` looking at `target` and places both cameras.
    pub fn set_stereo_pose(&mut self, center: Point3<f64>, target: Point3<f64>) -> StereoPose {
        let pose = StereoPose::compute(center, target, self.config.baseline);
        self.left.set_world_pose(pose.left, pose.orientation);
        self.right.set_world_pose(pose.right, pose.orientation);
        trace!(
            cx = center.x,
            cy = center.y,
            cz = center.z,
            "stereo pose applied"
        );
        self.pose = Some(pose);
        pose
    }

    /// Most recently rendered frame from each camera, unmodified.
    ///
    /// Frames with empty buffers are reported as not ready.
    #[must_use]
    pub fn capture(&self) -> StereoCapture {
        let ready = |frame: Option<RgbaFrame>| frame.filter(RgbaFrame::is_ready);
        StereoCapture {
            left: ready(self.left.latest_rgba()),
            right: ready(self.right.latest_rgba()),
        }
    }

    /// Left camera.
    #[must_use]
    pub fn left(&self) -> &C {
        &self.left
    }

    /// Right camera.
    #[must_use]
    pub fn right(&self) -> &C {
        &self.right
    }

    /// Mutable access to both cameras, left first.
    pub fn cameras_mut(&mut self) -> (&mut C, &mut C) {
        (&mut self.left, &mut self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    #[derive(Default)]
    struct MockCamera {
        position: Option<Point3<f64>>,
        orientation: Option<UnitQuaternion<f64>>,
        frame: Option<RgbaFrame>,
    }

    impl PoseSettable for MockCamera {
        fn set_world_pose(&mut self, position: Point3<f64>, orientation: UnitQuaternion<f64>) {
            self.position = Some(position);
            self.orientation = Some(orientation);
        }
    }

    impl ImageSource for MockCamera {
        fn latest_rgba(&self) -> Option<RgbaFrame> {
            self.frame.clone()
        }
    }

    fn rig() -> StereoRig<MockCamera> {
        StereoRig::new(
            StereoRigConfig::default(),
            MockCamera::default(),
            MockCamera::default(),
        )
        .unwrap()
    }

    #[test]
    fn set_pose_places_both_cameras() {
        let mut rig = rig();
        let pose = rig.set_stereo_pose(Point3::new(0.4, 0.0, 0.4), Point3::origin());

        assert_eq!(rig.left().position, Some(pose.left));
        assert_eq!(rig.right().position, Some(pose.right));
        assert_eq!(rig.left().orientation, rig.right().orientation);
        assert_relative_eq!(
            (pose.left - pose.right).norm(),
            rig.config().baseline,
            epsilon = 1e-12
        );
        assert_eq!(rig.pose(), Some(&pose));
    }

    #[test]
    fn capture_before_render_is_not_ready() {
        let mut rig = rig();
        assert!(!rig.capture().is_ready());

        // Empty buffers count as not rendered.
        let (left, _) = rig.cameras_mut();
        left.frame = Some(RgbaFrame::default());
        assert_eq!(rig.capture(), StereoCapture::default());
    }

    #[test]
    fn capture_returns_frames_unmodified() {
        let mut rig = rig();
        let (left, right) = rig.cameras_mut();
        left.frame = Some(RgbaFrame::filled(2, 2, [1, 2, 3, 4]));
        right.frame = Some(RgbaFrame::filled(2, 2, [5, 6, 7, 8]));

        let (l, r) = rig.capture().into_pair().unwrap();
        assert_eq!(l.pixel(0, 0), Some([1, 2, 3, 4]));
        assert_eq!(r.pixel(1, 1), Some([5, 6, 7, 8]));
    }

    #[test]
    fn invalid_config_rejected() {
        let config = StereoRigConfig::default().with_baseline(0.0);
        assert!(StereoRig::new(config, MockCamera::default(), MockCamera::default()).is_err());
    }
}
