//! Narrow interfaces onto the simulation host.
//!
//! The host owns rigid-body state and the constraint solver. The sensor
//! reads poses and reaction forces through these traits and issues base
//! commands; it never writes the probe state.

use nalgebra::{Isometry3, Point3, Vector3};

/// Read access to the current base and probe poses.
pub trait PoseProvider {
    /// World pose of the kinematic base (rigid, unscaled).
    fn base_pose(&self) -> Isometry3<f64>;

    /// World position of the free probe.
    fn probe_position(&self) -> Point3<f64>;
}

/// Access to the constraint solver's joint reaction force.
pub trait ReactionForceSource {
    /// Reaction force of the spring joint, or `None` if the solver has not
    /// produced data yet.
    fn joint_reaction_force(&self) -> Option<Vector3<f64>>;
}

/// Command interface for the kinematic base.
pub trait BaseActuator {
    /// Set the commanded world position of the base for the next step.
    fn set_base_target(&mut self, position: Vector3<f64>);
}
