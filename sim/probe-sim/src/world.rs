//! Spring probe world: kinematic base, point-mass probe, spring-damper joint.
//!
//! The joint drive is integrated implicitly per axis (backward Euler on the
//! spring-damper, velocity first, then position), so stiff drives stay
//! stable at display-rate timesteps:
//!
//! ```text
//! v' = (v + dt/m * (f_ext - k (x - x*) + c v*)) / (1 + dt c/m + dt² k/m)
//! x' = x + dt v'
//! ```
//!
//! where `x*` is the drive target (base position plus rest offset) and `v*`
//! the base velocity.

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use spring_sensor::{
    BaseActuator, PoseProvider, ReactionForceSource, SpringJointSpec, SpringSensorConfig,
};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Result, SimError};

/// Integration settings and probe properties.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProbeWorldConfig {
    /// Probe mass (kg).
    pub probe_mass: f64,
    /// Gravity (m/s²).
    pub gravity: [f64; 3],
    /// Time advanced by one [`SpringProbeWorld::step`] (s).
    pub timestep: f64,
    /// Integration substeps per step.
    pub substeps: u32,
}

impl Default for ProbeWorldConfig {
    fn default() -> Self {
        Self {
            probe_mass: 1.0,
            gravity: [0.0, 0.0, -9.81],
            timestep: 1.0 / 60.0,
            substeps: 4,
        }
    }
}

impl ProbeWorldConfig {
    /// Set the probe mass.
    #[must_use]
    pub fn with_probe_mass(mut self, mass: f64) -> Self {
        self.probe_mass = mass;
        self
    }

    /// Set the step size.
    #[must_use]
    pub fn with_timestep(mut self, timestep: f64) -> Self {
        self.timestep = timestep;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for a non-positive mass or
    /// timestep, zero substeps, or non-finite gravity.
    pub fn validate(&self) -> Result<()> {
        if !self.probe_mass.is_finite() || self.probe_mass <= 0.0 {
            return Err(SimError::invalid_config(format!(
                "probe mass must be > 0, got {}",
                self.probe_mass
            )));
        }
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(SimError::invalid_config(format!(
                "timestep must be > 0, got {}",
                self.timestep
            )));
        }
        if self.substeps == 0 {
            return Err(SimError::invalid_config("substeps must be >= 1"));
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            return Err(SimError::invalid_config("gravity must be finite"));
        }
        Ok(())
    }
}

/// Horizontal penalty contact plane below the probe.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContactPlane {
    /// Plane height (m, world Z).
    pub height: f64,
    /// Probe tip radius (m).
    pub probe_radius: f64,
    /// Penalty stiffness (N/m).
    pub stiffness: f64,
    /// Penalty damping (N·s/m).
    pub damping: f64,
}

impl Default for ContactPlane {
    fn default() -> Self {
        Self {
            height: 1.0,
            probe_radius: 0.05,
            stiffness: 1.0e5,
            damping: 1.0e3,
        }
    }
}

impl ContactPlane {
    /// Probe center height at which contact begins.
    #[must_use]
    pub fn contact_height(&self) -> f64 {
        self.height + self.probe_radius
    }
}

/// Point-mass probe hanging from a kinematic base.
#[derive(Debug, Clone)]
pub struct SpringProbeWorld {
    joint: SpringJointSpec,
    rest_offset: Vector3<f64>,
    config: ProbeWorldConfig,
    contact: Option<ContactPlane>,

    base_rotation: UnitQuaternion<f64>,
    base_position: Vector3<f64>,
    base_target: Vector3<f64>,

    probe_position: Point3<f64>,
    probe_velocity: Vector3<f64>,

    reaction: Option<Vector3<f64>>,
    time: f64,
    steps: u64,
}

impl SpringProbeWorld {
    /// Creates a world with the probe resting at its unloaded offset below
    /// `base_position`.
    ///
    /// # Errors
    ///
    /// Returns an error if either configuration does not validate.
    pub fn new(
        sensor: SpringSensorConfig,
        config: ProbeWorldConfig,
        base_position: Vector3<f64>,
    ) -> Result<Self> {
        sensor.validate()?;
        config.validate()?;
        let rest_offset = sensor.rest_offset();
        debug!(
            mass = config.probe_mass,
            dt = config.timestep,
            substeps = config.substeps,
            "spring probe world created"
        );
        Ok(Self {
            joint: sensor.joint_spec(),
            rest_offset,
            config,
            contact: None,
            base_rotation: UnitQuaternion::identity(),
            base_position,
            base_target: base_position,
            probe_position: Point3::from(base_position + rest_offset),
            probe_velocity: Vector3::zeros(),
            reaction: None,
            time: 0.0,
            steps: 0,
        })
    }

    /// Adds a contact plane.
    #[must_use]
    pub fn with_contact(mut self, contact: ContactPlane) -> Self {
        self.contact = Some(contact);
        self
    }

    /// Simulation time (s).
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Steps taken so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Step size (s).
    #[must_use]
    pub fn timestep(&self) -> f64 {
        self.config.timestep
    }

    /// World configuration.
    #[must_use]
    pub fn config(&self) -> &ProbeWorldConfig {
        &self.config
    }

    /// Current probe velocity.
    #[must_use]
    pub fn probe_velocity(&self) -> Vector3<f64> {
        self.probe_velocity
    }

    /// Current base position.
    #[must_use]
    pub fn base_position(&self) -> Vector3<f64> {
        self.base_position
    }

    /// Advances one timestep.
    pub fn step(&mut self) {
        let n = self.config.substeps;
        let h = self.config.timestep / f64::from(n);
        let start = self.base_position;
        let delta = self.base_target - start;
        let base_velocity = delta / self.config.timestep;

        for i in 1..=n {
            let base = start + delta * (f64::from(i) / f64::from(n));
            self.substep(base, base_velocity, h);
        }

        self.base_position = self.base_target;
        self.time += self.config.timestep;
        self.steps += 1;
    }

    /// Steps until at least `duration` seconds have elapsed.
    pub fn run_for(&mut self, duration: f64) {
        let end = self.time + duration;
        while self.time < end - 1e-12 {
            self.step();
        }
    }

    fn substep(&mut self, base: Vector3<f64>, base_velocity: Vector3<f64>, h: f64) {
        let m = self.config.probe_mass;
        let gravity = Vector3::from(self.config.gravity);
        let target = base + self.base_rotation * self.rest_offset;

        let mut velocity = Vector3::zeros();
        for axis in 0..3 {
            let drive = &self.joint.drives[axis];
            let (k, c) = (drive.stiffness, drive.damping);
            let x = self.probe_position[axis];
            let v = self.probe_velocity[axis];
            let f_ext = m * gravity[axis];

            let solve = |k_total: f64, c_total: f64, spring: f64, damp: f64| {
                (v + h / m * (f_ext + spring + damp)) / (1.0 + h * c_total / m + h * h * k_total / m)
            };
            let spring = -k * (x - target[axis]);
            let damp = c * base_velocity[axis];
            let mut v_new = solve(k, c, spring, damp);

            if axis == 2 {
                if let Some(plane) = self.contact {
                    let surface = plane.contact_height();
                    if x + h * v_new < surface {
                        let (kc, cc) = (plane.stiffness, plane.damping);
                        let v_contact = solve(k + kc, c + cc, spring - kc * (x - surface), damp);
                        let push = -kc * (x + h * v_contact - surface) - cc * v_contact;
                        if push > 0.0 {
                            v_new = v_contact;
                        }
                    }
                }
            }
            velocity[axis] = v_new;
        }

        self.probe_velocity = velocity;
        self.probe_position += velocity * h;

        let stretch = self.probe_position.coords - target;
        let relative_velocity = self.probe_velocity - base_velocity;
        let mut on_base = Vector3::zeros();
        for axis in 0..3 {
            let drive = &self.joint.drives[axis];
            on_base[axis] =
                drive.stiffness * stretch[axis] + drive.damping * relative_velocity[axis];
        }
        self.reaction = Some(self.base_rotation.inverse() * on_base);
    }
}

impl PoseProvider for SpringProbeWorld {
    fn base_pose(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.base_position), self.base_rotation)
    }

    fn probe_position(&self) -> Point3<f64> {
        self.probe_position
    }
}

impl ReactionForceSource for SpringProbeWorld {
    fn joint_reaction_force(&self) -> Option<Vector3<f64>> {
        self.reaction
    }
}

impl BaseActuator for SpringProbeWorld {
    fn set_base_target(&mut self, position: Vector3<f64>) {
        self.base_target = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use spring_sensor::{PressProfile, SpringForceSensor};

    fn world(mass: f64) -> SpringProbeWorld {
        SpringProbeWorld::new(
            SpringSensorConfig::default(),
            ProbeWorldConfig::default().with_probe_mass(mass),
            Vector3::new(0.0, 0.0, 2.4),
        )
        .unwrap()
    }

    #[test]
    fn no_reaction_before_first_step() {
        let w = world(1.0);
        assert!(w.joint_reaction_force().is_none());
        assert_relative_eq!(w.time(), 0.0);
    }

    #[test]
    fn hanging_mass_settles_to_weight() {
        let sensor = SpringForceSensor::new(SpringSensorConfig::default()).unwrap();
        for mass in [0.5, 1.0, 3.0] {
            let mut w = world(mass);
            w.run_for(15.0);

            let geometric = sensor.read_geometric(&w, w.time()).unwrap().force;
            let expected = -9.81 * mass;
            assert_relative_eq!(geometric.z, expected, epsilon = 1e-3);
            assert_relative_eq!(geometric.x, 0.0, epsilon = 1e-9);

            let reaction = sensor.reaction_force(&w);
            assert_relative_eq!(reaction.z, geometric.z, epsilon = 1e-3);
        }
    }

    #[test]
    fn base_follows_target_and_time_advances() {
        let mut w = world(1.0);
        w.set_base_target(Vector3::new(0.0, 0.0, 2.3));
        w.step();
        assert_relative_eq!(w.base_position().z, 2.3);
        assert_eq!(w.steps(), 1);
        assert_relative_eq!(w.time(), 1.0 / 60.0, epsilon = 1e-15);
    }

    #[test]
    fn pressing_into_plane_gives_upward_force() {
        let sensor = SpringForceSensor::new(SpringSensorConfig::default()).unwrap();
        let profile = PressProfile::default();
        let mut w = world(1.0).with_contact(ContactPlane::default());

        while w.time() < profile.end_time() + 2.0 {
            let z = profile.target_z(w.time());
            sensor.set_base_target(&mut w, Vector3::new(0.0, 0.0, z));
            w.step();
        }

        let force = sensor.read_geometric(&w, w.time()).unwrap().force;
        assert!(force.z > 100.0, "expected contact load, got {}", force.z);
        // Probe stays near the surface.
        let plane = ContactPlane::default();
        assert!((w.probe_position().z - plane.contact_height()).abs() < 0.01);
    }

    #[test]
    fn rejects_bad_config() {
        let err = SpringProbeWorld::new(
            SpringSensorConfig::default(),
            ProbeWorldConfig::default().with_probe_mass(0.0),
            Vector3::zeros(),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig { .. }));

        let err = SpringProbeWorld::new(
            SpringSensorConfig::default().with_damping(-1.0),
            ProbeWorldConfig::default(),
            Vector3::zeros(),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::Sensor(_)));
    }
}
