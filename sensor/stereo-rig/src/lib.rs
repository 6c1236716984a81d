//! Stereo camera rig for synthetic dataset capture.
//!
//! Two cameras share one orientation and sit half a baseline to either side
//! of a center point, offset along the horizontal direction orthogonal to the
//! view. This crate holds the pose math and capture plumbing; rendering
//! belongs to the host.
//!
//! # Layer 0 Crate
//!
//! No renderer or engine dependencies. The host is reached through
//! the traits in [`host`]:
//! - [`PoseSettable`] - a camera whose world pose can be set
//! - [`ImageSource`] - a camera that hands back its last RGBA frame
//! - [`RenderHost`] - steps the simulation and renders the rig's cameras
//!
//! # Conventions
//!
//! - World up is `+Z`.
//! - Cameras look along their local `+X` with local `+Z` up (local `+Y` is
//!   the camera's left).
//! - The left camera is offset along the target-to-center direction rotated
//!   `+90°` about `+Z`, which is the camera's local `-Y`.
//! - Quaternions are exported as `[w, x, y, z]`.
//!
//! # Example
//!
//! ```
//! use nalgebra::Point3;
//! use stereo_rig::StereoPose;
//!
//! let pose = StereoPose::compute(Point3::new(0.4, 0.0, 0.4), Point3::origin(), 0.032);
//! let gap = (pose.left - pose.right).norm();
//! assert!((gap - 0.032).abs() < 1e-12);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]

mod config;
mod error;
mod frame;
pub mod host;
mod intrinsics;
mod pose;
mod rig;
mod trajectory;

pub use config::StereoRigConfig;
pub use error::RigError;
pub use frame::RgbaFrame;
pub use host::{ImageSource, PoseSettable, RenderHost};
pub use intrinsics::CameraIntrinsics;
pub use pose::{
    compute_orientation, compute_stereo_positions, StereoPose, DEFAULT_SIDE, HORIZONTAL_EPSILON,
    WORLD_UP,
};
pub use rig::{StereoCapture, StereoRig};
pub use trajectory::{OrbitMode, TrajectoryConfig};

/// Result type for rig operations.
pub type Result<T> = std::result::Result<T, RigError>;
