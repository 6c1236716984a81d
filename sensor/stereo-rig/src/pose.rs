//! Look-at orientation and baseline offsets.

use nalgebra::{Matrix3, Point3, Rotation3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// World up axis.
pub const WORLD_UP: Vector3<f64> = Vector3::new(0.0, 0.0, 1.0);

/// Side vector used when the view direction has no horizontal component.
pub const DEFAULT_SIDE: Vector3<f64> = Vector3::new(0.0, 1.0, 0.0);

/// Horizontal magnitudes at or below this are treated as vertical views.
pub const HORIZONTAL_EPSILON: f64 = 1e-6;

/// Orientation of a camera at `eye` looking at `target`.
///
/// The camera's local `+X` points at the target, local `+Z` is the world up
/// projected orthogonal to the view, and local `+Y` completes a right-handed
/// frame (the camera's left). This is the OpenGL look-at frame
/// (`[right, up, -forward]`) followed by `-90°` about local X and `+90°`
/// about local Y.
///
/// Looking straight up or down, the left axis falls back to
/// [`DEFAULT_SIDE`]. If `eye == target` the identity is returned.
#[must_use]
pub fn compute_orientation(eye: &Point3<f64>, target: &Point3<f64>) -> UnitQuaternion<f64> {
    let view = target - eye;
    let distance = view.norm();
    if distance <= f64::EPSILON {
        return UnitQuaternion::identity();
    }
    let forward = view / distance;

    let cross = forward.cross(&WORLD_UP);
    let right = if cross.norm() > HORIZONTAL_EPSILON {
        cross.normalize()
    } else {
        -DEFAULT_SIDE
    };
    let up = right.cross(&forward);

    let basis = Matrix3::from_columns(&[forward, -right, up]);
    UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis))
}

/// Horizontal unit side vector: the target-to-center direction rotated 90°
/// counter-clockwise about the up axis.
fn side_vector(center: &Point3<f64>, target: &Point3<f64>) -> Vector3<f64> {
    let outward = center - target;
    let horizontal = Vector3::new(outward.x, outward.y, 0.0);
    let len = horizontal.norm();
    if len > HORIZONTAL_EPSILON {
        let h = horizontal / len;
        Vector3::new(-h.y, h.x, 0.0)
    } else {
        DEFAULT_SIDE
    }
}

/// Left and right camera positions around `center`.
///
/// The horizontal direction from `target` to `center` is rotated 90°
/// counter-clockwise about the up axis to get the side vector; the left
/// camera sits half a baseline along it and the right camera half a baseline
/// against it. A vertical view uses [`DEFAULT_SIDE`].
#[must_use]
pub fn compute_stereo_positions(
    center: &Point3<f64>,
    target: &Point3<f64>,
    baseline: f64,
) -> (Point3<f64>, Point3<f64>) {
    let offset = side_vector(center, target) * (baseline / 2.0);
    (center + offset, center - offset)
}

/// Poses of both cameras for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StereoPose {
    /// Rig center.
    pub center: Point3<f64>,
    /// Look-at target.
    pub target: Point3<f64>,
    /// Left camera position.
    pub left: Point3<f64>,
    /// Right camera position.
    pub right: Point3<f64>,
    /// Shared camera orientation, computed at the center.
    pub orientation: UnitQuaternion<f64>,
}

impl StereoPose {
    /// Computes both camera poses for a rig at `center` looking at `target`.
    #[must_use]
    pub fn compute(center: Point3<f64>, target: Point3<f64>, baseline: f64) -> Self {
        let (left, right) = compute_stereo_positions(&center, &target, baseline);
        Self {
            center,
            target,
            left,
            right,
            orientation: compute_orientation(&center, &target),
        }
    }

    /// Orientation as `[w, x, y, z]` with non-negative `w`.
    #[must_use]
    pub fn orientation_wxyz(&self) -> [f64; 4] {
        let q = self.orientation.quaternion();
        let sign = if q.w < 0.0 { -1.0 } else { 1.0 };
        [sign * q.w, sign * q.i, sign * q.j, sign * q.k]
    }

    /// Distance between the camera centers.
    #[must_use]
    pub fn baseline(&self) -> f64 {
        (self.left - self.right).norm()
    }
}
