//! Primitive studio scene: checkered ground, a sphere and a box.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Hit, Ray, Result, SimError};

/// How the studio scene is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SceneMode {
    /// Built-in sphere and box on a ground plane.
    #[default]
    Diy,
    /// An external asset referenced by path.
    Import,
}

impl SceneMode {
    /// Tag used in configuration files and metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Diy => "diy",
            Self::Import => "import",
        }
    }
}

impl fmt::Display for SceneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diy" => Ok(Self::Diy),
            "import" => Ok(Self::Import),
            _ => Err(SimError::UnknownSceneMode { tag: s.to_string() }),
        }
    }
}

/// Scene description.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SceneConfig {
    /// Scene mode.
    pub mode: SceneMode,
    /// Sphere radius (m).
    pub sphere_radius: f64,
    /// Sphere center.
    pub sphere_center: [f64; 3],
    /// Box half extents (m), like the scale of a size-2 unit cube.
    pub cube_scale: [f64; 3],
    /// Box center.
    pub cube_center: [f64; 3],
    /// Asset path for [`SceneMode::Import`].
    pub import_path: String,
    /// Uniform scale for the imported asset.
    pub import_scale: f64,
    /// Position of the imported asset.
    pub import_position: [f64; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            mode: SceneMode::Diy,
            sphere_radius: 0.1,
            sphere_center: [0.0, 0.0, 0.1],
            cube_scale: [0.05, 0.05, 0.1],
            cube_center: [0.12, -0.12, 0.1],
            import_path: String::new(),
            import_scale: 1.0,
            import_position: [0.0, 0.0, 0.0],
        }
    }
}

/// A renderable shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Sphere.
    Sphere {
        /// Center.
        center: Point3<f64>,
        /// Radius.
        radius: f64,
        /// Albedo.
        color: [u8; 3],
    },
    /// Axis-aligned box.
    Cuboid {
        /// Minimum corner.
        min: Point3<f64>,
        /// Maximum corner.
        max: Point3<f64>,
        /// Albedo.
        color: [u8; 3],
    },
}

impl Primitive {
    fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let (t, normal, color) = match *self {
            Self::Sphere {
                center,
                radius,
                color,
            } => {
                let (t, n) = ray.intersect_sphere(&center, radius)?;
                (t, n, color)
            }
            Self::Cuboid { min, max, color } => {
                let (t, n) = ray.intersect_aabb(&min, &max)?;
                (t, n, color)
            }
        };
        Some(Hit {
            t,
            point: ray.point_at(t),
            normal,
            color,
        })
    }
}

const SPHERE_COLOR: [u8; 3] = [200, 60, 50];
const CUBE_COLOR: [u8; 3] = [60, 110, 200];
const CHECKER_LIGHT: [u8; 3] = [210, 210, 210];
const CHECKER_DARK: [u8; 3] = [90, 90, 90];
const SKY: [u8; 3] = [150, 180, 220];

/// Ground plane plus primitives, shaded with one directional light.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveScene {
    /// Shapes above the ground.
    pub primitives: Vec<Primitive>,
    /// Ground checker tile size (m).
    pub checker_size: f64,
    /// Direction toward the light.
    pub light_dir: Vector3<f64>,
}

impl PrimitiveScene {
    /// An empty scene with just the ground.
    #[must_use]
    pub fn ground_only() -> Self {
        Self {
            primitives: Vec::new(),
            checker_size: 0.1,
            light_dir: Vector3::new(0.3, 0.2, 1.0).normalize(),
        }
    }

    /// Builds the scene for a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnsupportedScene`] for [`SceneMode::Import`] and
    /// [`SimError::InvalidConfig`] for non-positive sizes.
    pub fn from_config(config: &SceneConfig) -> Result<Self> {
        if config.mode == SceneMode::Import {
            return Err(SimError::UnsupportedScene {
                mode: config.mode.to_string(),
            });
        }
        if config.sphere_radius <= 0.0 || config.cube_scale.iter().any(|s| *s <= 0.0) {
            return Err(SimError::invalid_config("scene sizes must be > 0"));
        }
        let half = Vector3::from(config.cube_scale);
        let cube_center = Point3::from(config.cube_center);
        let mut scene = Self::ground_only();
        scene.primitives = vec![
            Primitive::Sphere {
                center: Point3::from(config.sphere_center),
                radius: config.sphere_radius,
                color: SPHERE_COLOR,
            },
            Primitive::Cuboid {
                min: cube_center - half,
                max: cube_center + half,
                color: CUBE_COLOR,
            },
        ];
        Ok(scene)
    }

    /// Nearest hit within `[t_min, t_max]`.
    #[must_use]
    pub fn intersect(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<Hit> {
        let ground = ray.intersect_ground(0.0).map(|(t, normal)| {
            let point = ray.point_at(t);
            Hit {
                t,
                point,
                normal,
                color: self.checker(&point),
            }
        });
        self.primitives
            .iter()
            .filter_map(|p| p.intersect(ray))
            .chain(ground)
            .filter(|hit| hit.t >= t_min && hit.t <= t_max)
            .min_by(|a, b| a.t.total_cmp(&b.t))
    }

    /// Shaded RGBA color seen along a ray.
    #[must_use]
    pub fn shade(&self, ray: &Ray, t_min: f64, t_max: f64) -> [u8; 4] {
        let Some(hit) = self.intersect(ray, t_min, t_max) else {
            return [SKY[0], SKY[1], SKY[2], 255];
        };
        let lambert = hit.normal.dot(&self.light_dir).max(0.0);
        let intensity = 0.25 + 0.75 * lambert;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let scale = |c: u8| (f64::from(c) * intensity).round().clamp(0.0, 255.0) as u8;
        [
            scale(hit.color[0]),
            scale(hit.color[1]),
            scale(hit.color[2]),
            255,
        ]
    }

    #[allow(clippy::cast_possible_truncation)]
    fn checker(&self, point: &Point3<f64>) -> [u8; 3] {
        let ix = (point.x / self.checker_size).floor() as i64;
        let iy = (point.y / self.checker_size).floor() as i64;
        if (ix + iy).rem_euclid(2) == 0 {
            CHECKER_LIGHT
        } else {
            CHECKER_DARK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parse_scene_mode() {
        assert_eq!("diy".parse::<SceneMode>().unwrap(), SceneMode::Diy);
        assert_eq!("IMPORT".parse::<SceneMode>().unwrap(), SceneMode::Import);
        assert!(matches!(
            "mesh".parse::<SceneMode>(),
            Err(SimError::UnknownSceneMode { .. })
        ));
    }

    #[test]
    fn import_is_unsupported() {
        let config = SceneConfig {
            mode: SceneMode::Import,
            import_path: "assets/part.usd".into(),
            ..SceneConfig::default()
        };
        assert!(matches!(
            PrimitiveScene::from_config(&config),
            Err(SimError::UnsupportedScene { .. })
        ));
    }

    #[test]
    fn looking_down_hits_sphere_top() {
        let scene = PrimitiveScene::from_config(&SceneConfig::default()).unwrap();
        let ray = Ray::new(Point3::new(0.0, 0.0, 1.0), -Vector3::z());
        let hit = scene.intersect(&ray, 0.01, 100.0).unwrap();
        assert_relative_eq!(hit.point.z, 0.2, epsilon = 1e-12);
        assert_eq!(hit.color, SPHERE_COLOR);
    }

    #[test]
    fn box_top_and_ground() {
        let scene = PrimitiveScene::from_config(&SceneConfig::default()).unwrap();
        let ray = Ray::new(Point3::new(0.12, -0.12, 1.0), -Vector3::z());
        let hit = scene.intersect(&ray, 0.01, 100.0).unwrap();
        assert_relative_eq!(hit.point.z, 0.2, epsilon = 1e-12);
        assert_eq!(hit.color, CUBE_COLOR);

        let ray = Ray::new(Point3::new(1.0, 1.0, 1.0), -Vector3::z());
        let hit = scene.intersect(&ray, 0.01, 100.0).unwrap();
        assert_relative_eq!(hit.point.z, 0.0);
    }

    #[test]
    fn box_rests_on_ground() {
        let scene = PrimitiveScene::from_config(&SceneConfig::default()).unwrap();
        // Just above the ground, from the +X side.
        let ray = Ray::new(Point3::new(0.5, -0.12, 0.01), -Vector3::x());
        let hit = scene.intersect(&ray, 0.0, 100.0).unwrap();
        assert_eq!(hit.color, CUBE_COLOR);
        assert_relative_eq!(hit.point.x, 0.17, epsilon = 1e-12);
        assert_relative_eq!(hit.normal, Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn far_clip_shows_sky() {
        let scene = PrimitiveScene::ground_only();
        let ray = Ray::new(Point3::new(0.0, 0.0, 1.0), -Vector3::z());
        assert_eq!(scene.shade(&ray, 0.01, 0.5), [SKY[0], SKY[1], SKY[2], 255]);
        assert_ne!(scene.shade(&ray, 0.01, 2.0), [SKY[0], SKY[1], SKY[2], 255]);
    }
}
