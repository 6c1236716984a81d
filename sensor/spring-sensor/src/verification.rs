//! Static hanging-mass verification.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gravitational acceleration used for the theoretical load (m/s²).
pub const STANDARD_GRAVITY: f64 = 9.81;

/// A measured vertical force for a probe of known mass at rest.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StaticCheck {
    /// Probe mass (kg).
    pub mass: f64,
    /// Measured vertical force (N).
    pub measured_fz: f64,
}

impl StaticCheck {
    /// Create a check for a mass and its measured force.
    #[must_use]
    pub fn new(mass: f64, measured_fz: f64) -> Self {
        Self { mass, measured_fz }
    }

    /// Expected vertical force: the weight, pointing down.
    #[must_use]
    pub fn theoretical_fz(&self) -> f64 {
        -STANDARD_GRAVITY * self.mass
    }

    /// Relative error against the theoretical force, in percent.
    ///
    /// Zero mass has no meaningful relative error and yields `NaN`.
    #[must_use]
    pub fn error_rate_percent(&self) -> f64 {
        let theory = self.theoretical_fz();
        if theory == 0.0 {
            return f64::NAN;
        }
        (self.measured_fz - theory).abs() * 100.0 / theory.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_measurement_has_no_error() {
        let check = StaticCheck::new(2.0, -19.62);
        assert_relative_eq!(check.theoretical_fz(), -19.62);
        assert_relative_eq!(check.error_rate_percent(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn error_rate_is_positive_percent() {
        let check = StaticCheck::new(1.0, -9.3195);
        assert_relative_eq!(check.error_rate_percent(), 5.0, epsilon = 1e-9);
        let check = StaticCheck::new(1.0, -10.3);
        assert_relative_eq!(check.error_rate_percent(), 4.994903160040775, epsilon = 1e-9);
    }

    #[test]
    fn zero_mass_is_nan() {
        assert!(StaticCheck::new(0.0, 0.0).error_rate_percent().is_nan());
    }
}
