//! Virtual spring-damper force sensor.
//!
//! A kinematic *base* body is driven along a commanded path. A free *probe*
//! body hangs from it through a constrained joint whose translational axes
//! carry linear drives (stiffness + damping) and whose rotational axes are
//! locked. The joint behaves as a spring-damper, so the displacement of the
//! probe away from its rest offset is proportional to the load it carries.
//!
//! This crate provides:
//!
//! - [`SpringSensorConfig`] - stiffness, damping, rest length and anchor
//! - [`SpringJointSpec`] - the joint description a host builds its constraint from
//! - [`SpringForceSensor`] - geometric and reaction-force readouts
//! - [`PressProfile`] - the wait / move / hold base trajectory of a press run
//! - [`StaticCheck`] - hanging-mass verification against `-m * g`
//!
//! # Host Abstraction
//!
//! Rigid-body dynamics and constraint solving belong to the host. The sensor
//! only talks to it through the narrow traits in [`host`]:
//!
//! - [`PoseProvider`] - world pose of the base, world position of the probe
//! - [`ReactionForceSource`] - the solver's joint reaction force, if any
//! - [`BaseActuator`] - commanded base position for the next step
//!
//! # Layer 0
//!
//! Zero rendering or engine dependencies. The math is plain `nalgebra`, so
//! everything here can be unit-tested without a running simulation.
//!
//! # Example
//!
//! ```
//! use nalgebra::{Isometry3, Point3};
//! use spring_sensor::{SpringForceSensor, SpringSensorConfig};
//!
//! let sensor = SpringForceSensor::new(SpringSensorConfig::default()).unwrap();
//!
//! // Base at z = 2.4, probe resting exactly at the configured offset.
//! let base = Isometry3::translation(0.0, 0.0, 2.4);
//! let probe = Point3::new(0.0, 0.0, 2.4 - 1.3);
//!
//! let force = sensor.equivalent_force(&base, &probe);
//! assert!(force.norm() < 1e-9);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::missing_const_for_fn, clippy::suboptimal_flops)]

mod config;
mod error;
pub mod host;
mod profile;
mod sensor;
mod verification;

pub use config::{DriveAxis, LinearDrive, SpringJointSpec, SpringSensorConfig};
pub use error::SpringSensorError;
pub use host::{BaseActuator, PoseProvider, ReactionForceSource};
pub use profile::{PressPhase, PressProfile};
pub use sensor::{ForceReading, ForceSource, SensorState, SpringForceSensor};
pub use verification::{StaticCheck, STANDARD_GRAVITY};

/// Result type for sensor operations.
pub type Result<T> = std::result::Result<T, SpringSensorError>;
