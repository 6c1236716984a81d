//! Rays and primitive intersection tests.

use nalgebra::{Point3, Vector3};

/// A ray with an origin and a direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin of the ray.
    pub origin: Point3<f64>,
    /// The direction of the ray (not necessarily normalized).
    pub direction: Vector3<f64>,
}

/// The nearest surface hit along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Ray parameter at the hit.
    pub t: f64,
    /// World-space hit point.
    pub point: Point3<f64>,
    /// Outward unit surface normal.
    pub normal: Vector3<f64>,
    /// Surface albedo.
    pub color: [u8; 3],
}

impl Ray {
    /// Creates a new ray.
    #[must_use]
    pub const fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    /// Returns `origin + t * direction`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }

    /// Nearest positive intersection with a sphere, with the outward normal.
    #[must_use]
    pub fn intersect_sphere(&self, center: &Point3<f64>, radius: f64) -> Option<(f64, Vector3<f64>)> {
        let oc = self.origin - center;
        let a = self.direction.norm_squared();
        let half_b = oc.dot(&self.direction);
        let c = oc.norm_squared() - radius * radius;
        let disc = half_b * half_b - a * c;
        if disc < 0.0 || a < f64::EPSILON {
            return None;
        }
        let sqrt_d = disc.sqrt();
        let mut t = (-half_b - sqrt_d) / a;
        if t <= 0.0 {
            t = (-half_b + sqrt_d) / a;
            if t <= 0.0 {
                return None;
            }
        }
        let normal = (self.point_at(t) - center) / radius;
        Some((t, normal))
    }

    /// Nearest positive intersection with an axis-aligned box (slab test).
    #[must_use]
    pub fn intersect_aabb(&self, min: &Point3<f64>, max: &Point3<f64>) -> Option<(f64, Vector3<f64>)> {
        let mut t_near = f64::NEG_INFINITY;
        let mut t_far = f64::INFINITY;
        let mut near_axis = 0;
        let mut near_sign = -1.0;

        for axis in 0..3 {
            let o = self.origin[axis];
            let d = self.direction[axis];
            if d.abs() < f64::EPSILON {
                if o < min[axis] || o > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (t0, t1) = ((min[axis] - o) * inv, (max[axis] - o) * inv);
            let (t0, t1, sign) = if t0 <= t1 { (t0, t1, -1.0) } else { (t1, t0, 1.0) };
            if t0 > t_near {
                t_near = t0;
                near_axis = axis;
                near_sign = sign;
            }
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        if t_far <= 0.0 {
            return None;
        }
        let mut normal = Vector3::zeros();
        if t_near > 0.0 {
            normal[near_axis] = near_sign;
            Some((t_near, normal))
        } else {
            // Origin inside the box: report the exit face.
            let p = self.point_at(t_far);
            let axis = (0..3)
                .min_by(|&a, &b| {
                    let da = (p[a] - min[a]).abs().min((p[a] - max[a]).abs());
                    let db = (p[b] - min[b]).abs().min((p[b] - max[b]).abs());
                    da.total_cmp(&db)
                })
                .unwrap_or(0);
            normal[axis] = if (p[axis] - max[axis]).abs() < (p[axis] - min[axis]).abs() {
                1.0
            } else {
                -1.0
            };
            Some((t_far, normal))
        }
    }

    /// Intersection with the horizontal plane `z = height`, from either side.
    #[must_use]
    pub fn intersect_ground(&self, height: f64) -> Option<(f64, Vector3<f64>)> {
        let dz = self.direction.z;
        if dz.abs() < f64::EPSILON {
            return None;
        }
        let t = (height - self.origin.z) / dz;
        if t <= 0.0 {
            return None;
        }
        let normal = if self.origin.z >= height {
            Vector3::z()
        } else {
            -Vector3::z()
        };
        Some((t, normal))
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Point3::origin(), Vector3::x())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn point_at() {
        let ray = Ray::new(Point3::origin(), Vector3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(ray.point_at(3.0), Point3::new(6.0, 0.0, 0.0));
    }

    #[test]
    fn sphere_hit_and_miss() {
        let ray = Ray::new(Point3::new(-5.0, 0.0, 0.0), Vector3::x());
        let (t, n) = ray.intersect_sphere(&Point3::origin(), 1.0).unwrap();
        assert_relative_eq!(t, 4.0, epsilon = 1e-12);
        assert_relative_eq!(n, -Vector3::x(), epsilon = 1e-12);

        let miss = Ray::new(Point3::new(-5.0, 2.0, 0.0), Vector3::x());
        assert!(miss.intersect_sphere(&Point3::origin(), 1.0).is_none());

        let behind = Ray::new(Point3::new(5.0, 0.0, 0.0), Vector3::x());
        assert!(behind.intersect_sphere(&Point3::origin(), 1.0).is_none());
    }

    #[test]
    fn box_faces() {
        let min = Point3::new(-1.0, -1.0, -1.0);
        let max = Point3::new(1.0, 1.0, 1.0);

        let down = Ray::new(Point3::new(0.2, 0.3, 5.0), -Vector3::z());
        let (t, n) = down.intersect_aabb(&min, &max).unwrap();
        assert_relative_eq!(t, 4.0, epsilon = 1e-12);
        assert_relative_eq!(n, Vector3::z());

        let side = Ray::new(Point3::new(-3.0, 0.0, 0.0), Vector3::x());
        let (_, n) = side.intersect_aabb(&min, &max).unwrap();
        assert_relative_eq!(n, -Vector3::x());

        let miss = Ray::new(Point3::new(-3.0, 2.0, 0.0), Vector3::x());
        assert!(miss.intersect_aabb(&min, &max).is_none());
    }

    #[test]
    fn ground_plane() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 2.0), Vector3::new(1.0, 0.0, -1.0));
        let (t, n) = ray.intersect_ground(0.0).unwrap();
        assert_relative_eq!(t, 2.0);
        assert_relative_eq!(n, Vector3::z());

        let parallel = Ray::new(Point3::new(0.0, 0.0, 2.0), Vector3::x());
        assert!(parallel.intersect_ground(0.0).is_none());
    }
}
