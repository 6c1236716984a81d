//! TOML run configurations.
//!
//! Every field has a default, so a config file only lists what it changes.
//! Command-line flags are applied on top of the loaded file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use probe_sim::{ContactPlane, ProbeWorldConfig, SceneConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use spring_sensor::{PressProfile, SpringSensorConfig};
use stereo_rig::{StereoRigConfig, TrajectoryConfig};

/// Loads a config file, or the defaults when no path is given.
///
/// # Errors
///
/// Fails if the file cannot be read or does not parse.
pub fn load<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config '{}'", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config '{}'", path.display()))
}

/// Press experiment settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressRunConfig {
    /// Spring joint.
    pub sensor: SpringSensorConfig,
    /// Probe and integrator.
    pub world: ProbeWorldConfig,
    /// Whether the probe presses into [`Self::contact`]; off means free
    /// hanging.
    pub contact_enabled: bool,
    /// Contact surface under the probe.
    pub contact: ContactPlane,
    /// Base trajectory.
    pub profile: PressProfile,
    /// Time to keep logging after the base stops (s).
    pub hold_time: f64,
    /// Directory for timestamped force logs.
    pub output_dir: PathBuf,
    /// Status line interval (s).
    pub status_interval: f64,
}

impl Default for PressRunConfig {
    fn default() -> Self {
        Self {
            sensor: SpringSensorConfig::default(),
            world: ProbeWorldConfig::default(),
            contact_enabled: true,
            contact: ContactPlane::default(),
            profile: PressProfile::default(),
            hold_time: 2.0,
            output_dir: PathBuf::from("force_logs"),
            status_interval: 0.2,
        }
    }
}

impl PressRunConfig {
    /// The contact plane, if enabled.
    #[must_use]
    pub fn contact_plane(&self) -> Option<ContactPlane> {
        self.contact_enabled.then_some(self.contact)
    }
}

/// Stereo capture settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StereoRunConfig {
    /// Camera pair.
    pub rig: StereoRigConfig,
    /// Rig-center path.
    pub trajectory: TrajectoryConfig,
    /// Studio contents.
    pub scene: SceneConfig,
    /// Dataset root; replaced on every run.
    pub output_dir: PathBuf,
    /// Render steps before the first captured frame.
    pub warmup_steps: u32,
    /// Progress log interval in frames.
    pub log_every: usize,
}

impl Default for StereoRunConfig {
    fn default() -> Self {
        Self {
            rig: StereoRigConfig::default(),
            trajectory: TrajectoryConfig::default(),
            scene: SceneConfig::default(),
            output_dir: PathBuf::from("output_dataset"),
            warmup_steps: 30,
            log_every: 10,
        }
    }
}

/// Hanging-mass verification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyRunConfig {
    /// Spring joint.
    pub sensor: SpringSensorConfig,
    /// Integrator settings; the probe mass is overridden per run.
    pub world: ProbeWorldConfig,
    /// Probe masses to test (kg).
    pub masses: Vec<f64>,
    /// Settling time per mass (s).
    pub settle_time: f64,
    /// Output table.
    pub output: PathBuf,
}

impl Default for VerifyRunConfig {
    fn default() -> Self {
        Self {
            sensor: SpringSensorConfig::default(),
            world: ProbeWorldConfig::default(),
            masses: vec![0.5, 1.0, 2.0, 5.0, 10.0],
            settle_time: 15.0,
            output: PathBuf::from("verification.csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stereo_rig::OrbitMode;

    #[test]
    fn missing_path_gives_defaults() {
        let config: StereoRunConfig = load(None).unwrap();
        assert_eq!(config, StereoRunConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.toml");
        fs::write(
            &path,
            r#"
output_dir = "captures/run1"

[trajectory]
mode = "linear"
num_frames = 12

[rig]
baseline = 0.05
"#,
        )
        .unwrap();

        let config: StereoRunConfig = load(Some(&path)).unwrap();
        assert_eq!(config.trajectory.mode, OrbitMode::Linear);
        assert_eq!(config.trajectory.num_frames, 12);
        assert_eq!(config.trajectory.point_a, [0.5, 0.5, 0.5]);
        assert_eq!(config.rig.width, 400);
        assert!((config.rig.baseline - 0.05).abs() < 1e-12);
        assert_eq!(config.output_dir, PathBuf::from("captures/run1"));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.toml");
        fs::write(&path, "[trajectory]\nmode = \"spiral\"\n").unwrap();
        let err = load::<StereoRunConfig>(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("spiral"));
    }

    #[test]
    fn press_config_round_trips_through_toml() {
        let config = PressRunConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: PressRunConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn contact_can_be_disabled_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("press.toml");
        fs::write(&path, "contact_enabled = false\n\n[contact]\nheight = 0.5\n").unwrap();

        let config: PressRunConfig = load(Some(&path)).unwrap();
        assert!(config.contact_plane().is_none());
        assert!((config.contact.height - 0.5).abs() < 1e-12);
        assert!(PressRunConfig::default().contact_plane().is_some());
    }

    #[test]
    fn disabled_contact_survives_round_trip() {
        let config = PressRunConfig {
            contact_enabled: false,
            ..PressRunConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        let back: PressRunConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
        assert!(back.contact_plane().is_none());
    }
}
