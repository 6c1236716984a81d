//! Base trajectory for a press run.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Result, SpringSensorError};

/// Phase of a press run at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PressPhase {
    /// Base held at the start height while the probe settles.
    Waiting,
    /// Base moving toward the end height at constant speed.
    Moving,
    /// Base held at the end height.
    Holding,
}

/// Vertical press trajectory of the base.
///
/// The base waits at `start_z` for `wait_time` seconds, then moves at
/// `speed` toward `end_z` and holds there.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PressProfile {
    /// Initial base height (m).
    pub start_z: f64,
    /// Final base height (m).
    pub end_z: f64,
    /// Base speed while moving (m/s).
    pub speed: f64,
    /// Settling time before the move starts (s).
    pub wait_time: f64,
}

impl Default for PressProfile {
    fn default() -> Self {
        Self {
            start_z: 2.4,
            end_z: 2.1,
            speed: 0.1,
            wait_time: 5.0,
        }
    }
}

impl PressProfile {
    /// Set start and end heights.
    #[must_use]
    pub fn with_heights(mut self, start_z: f64, end_z: f64) -> Self {
        self.start_z = start_z;
        self.end_z = end_z;
        self
    }

    /// Set the move speed.
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Set the settling time.
    #[must_use]
    pub fn with_wait_time(mut self, wait_time: f64) -> Self {
        self.wait_time = wait_time;
        self
    }

    /// Validate the profile.
    ///
    /// # Errors
    ///
    /// Returns [`SpringSensorError::InvalidConfig`] if the speed is not
    /// strictly positive, the wait time is negative, or any value is not
    /// finite.
    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(SpringSensorError::invalid_config(format!(
                "press speed must be > 0, got {}",
                self.speed
            )));
        }
        if !self.wait_time.is_finite() || self.wait_time < 0.0 {
            return Err(SpringSensorError::invalid_config(format!(
                "wait time must be >= 0, got {}",
                self.wait_time
            )));
        }
        if !self.start_z.is_finite() || !self.end_z.is_finite() {
            return Err(SpringSensorError::invalid_config(
                "press heights must be finite",
            ));
        }
        Ok(())
    }

    /// Duration of the moving phase (s).
    #[must_use]
    pub fn move_duration(&self) -> f64 {
        (self.start_z - self.end_z).abs() / self.speed
    }

    /// Time at which the base reaches `end_z` (s).
    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.wait_time + self.move_duration()
    }

    /// Phase at time `t`.
    #[must_use]
    pub fn phase(&self, t: f64) -> PressPhase {
        if t <= self.wait_time {
            PressPhase::Waiting
        } else if t <= self.end_time() {
            PressPhase::Moving
        } else {
            PressPhase::Holding
        }
    }

    /// Commanded base height at time `t`.
    #[must_use]
    pub fn target_z(&self, t: f64) -> f64 {
        match self.phase(t) {
            PressPhase::Waiting => self.start_z,
            PressPhase::Holding => self.end_z,
            PressPhase::Moving => {
                let travelled = (t - self.wait_time) * self.speed;
                if self.end_z < self.start_z {
                    (self.start_z - travelled).max(self.end_z)
                } else {
                    (self.start_z + travelled).min(self.end_z)
                }
            }
        }
    }

    /// Whether samples at time `t` belong in the force log.
    #[must_use]
    pub fn is_recording(&self, t: f64) -> bool {
        t > self.wait_time
    }
}
