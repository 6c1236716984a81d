//! Spring force sensor readout.

use nalgebra::{Isometry3, Point3, Vector3};
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::host::{BaseActuator, PoseProvider, ReactionForceSource};
use crate::{Result, SpringJointSpec, SpringSensorConfig, SpringSensorError};

/// Where a force reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ForceSource {
    /// Stiffness times probe displacement from its rest offset.
    Geometric,
    /// Joint reaction force reported by the host solver.
    Reaction,
}

/// A timestamped force sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForceReading {
    /// Simulation time of the sample (s).
    pub time: f64,
    /// Force vector in the base frame (N).
    pub force: Vector3<f64>,
    /// How the force was obtained.
    pub source: ForceSource,
}

impl ForceReading {
    /// Force magnitude.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.force.norm()
    }

    /// Whether any component exceeds `threshold` in magnitude.
    #[must_use]
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.force.iter().any(|f| f.abs() > threshold)
    }
}

/// Snapshot of base and probe positions.
///
/// The base is driven externally; the probe is owned by the solver. Both are
/// read-only here.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorState {
    /// World position of the base.
    pub base_position: Point3<f64>,
    /// World position of the probe.
    pub probe_position: Point3<f64>,
}

impl SensorState {
    /// Read the current positions from the host.
    pub fn capture(host: &impl PoseProvider) -> Self {
        Self {
            base_position: Point3::from(host.base_pose().translation.vector),
            probe_position: host.probe_position(),
        }
    }

    /// Probe position minus base position, in world axes.
    #[must_use]
    pub fn separation(&self) -> Vector3<f64> {
        self.probe_position - self.base_position
    }
}

/// Spring-damper force sensor between a kinematic base and a free probe.
#[derive(Debug, Clone)]
pub struct SpringForceSensor {
    config: SpringSensorConfig,
    rest_offset: Vector3<f64>,
}

impl SpringForceSensor {
    /// Create a sensor from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SpringSensorError::InvalidConfig`] if the configuration does
    /// not validate.
    pub fn new(config: SpringSensorConfig) -> Result<Self> {
        config.validate()?;
        let rest_offset = config.rest_offset();
        debug!(
            stiffness = config.stiffness,
            damping = config.damping,
            rest_z = rest_offset.z,
            "spring sensor configured"
        );
        Ok(Self {
            config,
            rest_offset,
        })
    }

    /// Sensor configuration.
    #[must_use]
    pub fn config(&self) -> &SpringSensorConfig {
        &self.config
    }

    /// Probe rest offset in the base frame.
    #[must_use]
    pub fn rest_offset(&self) -> Vector3<f64> {
        self.rest_offset
    }

    /// Joint description for the host.
    #[must_use]
    pub fn joint_spec(&self) -> SpringJointSpec {
        self.config.joint_spec()
    }

    /// Equivalent force from the probe displacement.
    ///
    /// The probe position is expressed in the base frame, the rest offset is
    /// subtracted, and the displacement is scaled by the stiffness. The result
    /// is in base-frame axes.
    #[must_use]
    pub fn equivalent_force(
        &self,
        base_pose: &Isometry3<f64>,
        probe_world: &Point3<f64>,
    ) -> Vector3<f64> {
        let local = base_pose.inverse_transform_point(probe_world).coords;
        (local - self.rest_offset) * self.config.stiffness
    }

    /// Geometric force reading from the host's current poses.
    ///
    /// # Errors
    ///
    /// Returns [`SpringSensorError::NonFiniteInput`] if the host reports a
    /// non-finite base pose or probe position.
    pub fn read_geometric(&self, host: &impl PoseProvider, time: f64) -> Result<ForceReading> {
        let base = host.base_pose();
        let probe = host.probe_position();
        if !base.translation.vector.iter().all(|v| v.is_finite())
            || !base.rotation.coords.iter().all(|v| v.is_finite())
        {
            return Err(SpringSensorError::NonFiniteInput { what: "base pose" });
        }
        if !probe.coords.iter().all(|v| v.is_finite()) {
            return Err(SpringSensorError::NonFiniteInput {
                what: "probe position",
            });
        }
        let force = self.equivalent_force(&base, &probe);
        trace!(time, fx = force.x, fy = force.y, fz = force.z, "geometric force");
        Ok(ForceReading {
            time,
            force,
            source: ForceSource::Geometric,
        })
    }

    /// Joint reaction force, or zero when the host has no data.
    pub fn reaction_force(&self, host: &impl ReactionForceSource) -> Vector3<f64> {
        host.joint_reaction_force().unwrap_or_else(Vector3::zeros)
    }

    /// Reaction force reading for cross-validation.
    pub fn read_reaction(&self, host: &impl ReactionForceSource, time: f64) -> ForceReading {
        ForceReading {
            time,
            force: self.reaction_force(host),
            source: ForceSource::Reaction,
        }
    }

    /// Command the base position for the next solve step.
    ///
    /// The probe is not moved; its position is resolved by the host.
    pub fn set_base_target(&self, actuator: &mut impl BaseActuator, position: Vector3<f64>) {
        trace!(x = position.x, y = position.y, z = position.z, "base target");
        actuator.set_base_target(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    struct FixedHost {
        base: Isometry3<f64>,
        probe: Point3<f64>,
        reaction: Option<Vector3<f64>>,
        commanded: Option<Vector3<f64>>,
    }

    impl FixedHost {
        fn new(base: Isometry3<f64>, probe: Point3<f64>) -> Self {
            Self {
                base,
                probe,
                reaction: None,
                commanded: None,
            }
        }
    }

    impl PoseProvider for FixedHost {
        fn base_pose(&self) -> Isometry3<f64> {
            self.base
        }
        fn probe_position(&self) -> Point3<f64> {
            self.probe
        }
    }

    impl ReactionForceSource for FixedHost {
        fn joint_reaction_force(&self) -> Option<Vector3<f64>> {
            self.reaction
        }
    }

    impl BaseActuator for FixedHost {
        fn set_base_target(&mut self, position: Vector3<f64>) {
            self.commanded = Some(position);
        }
    }

    /// Anchor and rest length cancel, so the rest offset is zero.
    fn zero_offset_sensor(k: f64) -> SpringForceSensor {
        let config = SpringSensorConfig::default()
            .with_stiffness(k)
            .with_rest_length(0.5)
            .with_anchor_offset([0.0, 0.0, 0.5]);
        SpringForceSensor::new(config).unwrap()
    }

    #[test]
    fn force_is_stiffness_times_displacement() {
        let k = 250.0;
        let sensor = zero_offset_sensor(k);
        assert_relative_eq!(sensor.rest_offset(), Vector3::zeros());

        let base = Isometry3::translation(1.0, -2.0, 3.0);
        for (axis, delta) in [(0, 0.02), (1, -0.05), (2, 0.1)] {
            let mut offset = Vector3::zeros();
            offset[axis] = delta;
            let probe = Point3::from(base.translation.vector + offset);
            let force = sensor.equivalent_force(&base, &probe);
            for i in 0..3 {
                let expected = if i == axis { k * delta } else { 0.0 };
                assert_relative_eq!(force[i], expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn probe_at_rest_reads_zero() {
        let sensor = SpringForceSensor::new(SpringSensorConfig::default()).unwrap();
        let base = Isometry3::translation(0.0, 0.0, 2.4);
        let probe = Point3::new(0.0, 0.0, 1.1);
        assert_relative_eq!(
            sensor.equivalent_force(&base, &probe),
            Vector3::zeros(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn force_is_expressed_in_base_frame() {
        let sensor = zero_offset_sensor(100.0);
        // Base yawed 90 degrees: world +X is base -Y.
        let base = Isometry3::from_parts(
            nalgebra::Translation3::new(0.0, 0.0, 1.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2),
        );
        let probe = Point3::new(0.01, 0.0, 1.0);
        let force = sensor.equivalent_force(&base, &probe);
        assert_relative_eq!(force, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn read_geometric_tags_source_and_time() {
        let sensor = SpringForceSensor::new(SpringSensorConfig::default()).unwrap();
        let host = FixedHost::new(
            Isometry3::translation(0.0, 0.0, 2.4),
            Point3::new(0.0, 0.0, 1.09),
        );
        let reading = sensor.read_geometric(&host, 5.5).unwrap();
        assert_eq!(reading.source, ForceSource::Geometric);
        assert_relative_eq!(reading.time, 5.5);
        assert_relative_eq!(reading.force.z, -10.0, epsilon = 1e-9);
        assert!(reading.exceeds(0.01));
    }

    #[test]
    fn read_geometric_rejects_nan() {
        let sensor = SpringForceSensor::new(SpringSensorConfig::default()).unwrap();
        let host = FixedHost::new(Isometry3::identity(), Point3::new(f64::NAN, 0.0, 0.0));
        let err = sensor.read_geometric(&host, 0.0).unwrap_err();
        assert!(matches!(err, SpringSensorError::NonFiniteInput { .. }));
    }

    #[test]
    fn reaction_force_defaults_to_zero() {
        let sensor = SpringForceSensor::new(SpringSensorConfig::default()).unwrap();
        let mut host = FixedHost::new(Isometry3::identity(), Point3::origin());
        assert_relative_eq!(sensor.reaction_force(&host), Vector3::zeros());

        host.reaction = Some(Vector3::new(0.0, 0.0, -9.81));
        let reading = sensor.read_reaction(&host, 1.0);
        assert_eq!(reading.source, ForceSource::Reaction);
        assert_relative_eq!(reading.force.z, -9.81);
    }

    #[test]
    fn set_base_target_does_not_touch_probe() {
        let sensor = SpringForceSensor::new(SpringSensorConfig::default()).unwrap();
        let mut host = FixedHost::new(Isometry3::identity(), Point3::new(0.0, 0.0, -1.3));
        sensor.set_base_target(&mut host, Vector3::new(0.0, 0.0, 2.3));
        assert_eq!(host.commanded, Some(Vector3::new(0.0, 0.0, 2.3)));
        assert_eq!(host.probe, Point3::new(0.0, 0.0, -1.3));
    }

    #[test]
    fn state_capture() {
        let host = FixedHost::new(
            Isometry3::translation(0.0, 0.0, 2.4),
            Point3::new(0.0, 0.0, 1.1),
        );
        let state = SensorState::capture(&host);
        assert_relative_eq!(state.base_position.z, 2.4);
        assert_relative_eq!(state.separation().z, -1.3, epsilon = 1e-12);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SpringSensorConfig::default().with_rest_length(-1.0);
        assert!(SpringForceSensor::new(config).is_err());
    }
}
