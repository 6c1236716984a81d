//! Reference simulation host for the spring probe and the stereo rig.
//!
//! The sensor and rig crates only know their hosts through traits. This
//! crate provides small in-process implementations of those traits so the
//! press experiment and the dataset capture can run headless:
//!
//! - [`SpringProbeWorld`] - kinematic base, point-mass probe, spring-damper
//!   joint and an optional penalty contact plane
//! - [`SyntheticStudio`] - a primitive scene rendered by [`SyntheticCamera`]
//!   with one ray per pixel
//!
//! Neither is a general physics engine or renderer.
//!
//! # Example
//!
//! ```
//! use probe_sim::{ProbeWorldConfig, SpringProbeWorld};
//! use spring_sensor::{SpringForceSensor, SpringSensorConfig};
//! use nalgebra::Vector3;
//!
//! let sensor_config = SpringSensorConfig::default();
//! let mut world = SpringProbeWorld::new(
//!     sensor_config,
//!     ProbeWorldConfig::default(),
//!     Vector3::new(0.0, 0.0, 2.4),
//! )
//! .unwrap();
//! world.run_for(15.0);
//!
//! let sensor = SpringForceSensor::new(sensor_config).unwrap();
//! let reading = sensor.read_geometric(&world, world.time()).unwrap();
//! assert!((reading.force.z + 9.81).abs() < 1e-3);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod camera;
mod error;
mod ray;
mod scene;
mod studio;
mod world;

pub use camera::SyntheticCamera;
pub use error::SimError;
pub use ray::{Hit, Ray};
pub use scene::{Primitive, PrimitiveScene, SceneConfig, SceneMode};
pub use studio::SyntheticStudio;
pub use world::{ContactPlane, ProbeWorldConfig, SpringProbeWorld};

/// Result type for reference host operations.
pub type Result<T> = std::result::Result<T, SimError>;
