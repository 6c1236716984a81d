//! Host-side camera and render loop interfaces.

use nalgebra::{Point3, UnitQuaternion};

use crate::{RgbaFrame, StereoRig};

/// A camera whose world pose can be set.
pub trait PoseSettable {
    /// Place the camera. `orientation` follows the rig convention: local
    /// `+X` forward, local `+Z` up.
    fn set_world_pose(&mut self, position: Point3<f64>, orientation: UnitQuaternion<f64>);
}

/// A camera that exposes its most recently rendered frame.
pub trait ImageSource {
    /// The last rendered RGBA frame, or `None` before the first render.
    fn latest_rgba(&self) -> Option<RgbaFrame>;
}

/// The simulation application that owns the render loop.
pub trait RenderHost {
    /// Camera type the host renders into.
    type Camera: PoseSettable + ImageSource;

    /// Error raised when a step fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Advance physics and render both cameras of `rig` at their current
    /// poses.
    ///
    /// # Errors
    ///
    /// Returns the host's error if the step cannot be completed.
    fn step(&mut self, rig: &mut StereoRig<Self::Camera>) -> Result<(), Self::Error>;

    /// Simulation time after the last step (s).
    fn current_time(&self) -> f64;
}
