//! Press run: lower the base into the contact plane and log the sensor.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use dataset_io::{ForceLogWriter, ForceSample};
use nalgebra::Vector3;
use probe_sim::SpringProbeWorld;
use spring_sensor::{PressPhase, SpringForceSensor};
use tracing::{info, instrument};

use crate::config::PressRunConfig;

/// Outcome of a press run.
#[derive(Debug, Clone, PartialEq)]
pub struct PressOutcome {
    /// Force log written.
    pub path: PathBuf,
    /// Rows in the log.
    pub rows: usize,
    /// Simulated time at the end of the run (s).
    pub end_time: f64,
}

/// Force log name for the current local time (`%Y%m%d_%H%M%S.csv`).
#[must_use]
pub fn timestamped_name() -> String {
    format!("{}.csv", Local::now().format("%Y%m%d_%H%M%S"))
}

/// Runs a press experiment and writes a timestamped log into
/// `config.output_dir`.
///
/// # Errors
///
/// Fails on invalid configuration or if the log cannot be written.
pub fn run(config: &PressRunConfig) -> Result<PressOutcome> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "failed to create output directory '{}'",
            config.output_dir.display()
        )
    })?;
    let path = config.output_dir.join(timestamped_name());
    run_to(config, &path)
}

/// Runs a press experiment and writes the log to `path`.
///
/// Rows are recorded once the wait phase is over. `base_z` is the commanded
/// height for that step.
///
/// # Errors
///
/// Fails on invalid configuration or if the log cannot be written.
#[instrument(skip(config), fields(path = %path.display()))]
pub fn run_to(config: &PressRunConfig, path: &Path) -> Result<PressOutcome> {
    let profile = config.profile;
    profile.validate().context("invalid press profile")?;

    let sensor = SpringForceSensor::new(config.sensor).context("invalid sensor config")?;
    let start = Vector3::new(0.0, 0.0, profile.start_z);
    let mut world = SpringProbeWorld::new(config.sensor, config.world, start)
        .context("invalid world config")?;
    if let Some(contact) = config.contact_plane() {
        world = world.with_contact(contact);
    }

    let mut log = ForceLogWriter::create(path)?;
    let end_time = profile.end_time() + config.hold_time.max(0.0);
    let status_every = config.status_interval.max(world.timestep());
    let mut next_status = 0.0;

    info!(
        start_z = profile.start_z,
        end_z = profile.end_z,
        speed = profile.speed,
        wait = profile.wait_time,
        "press run started"
    );

    while world.time() < end_time {
        let t = world.time();
        let target_z = profile.target_z(t);
        sensor.set_base_target(&mut world, Vector3::new(0.0, 0.0, target_z));
        world.step();

        let t = world.time();
        let reading = sensor.read_geometric(&world, t)?;
        if profile.is_recording(t) {
            log.write(&ForceSample {
                time: t,
                force: reading.force.into(),
                base_z: target_z,
            })?;
        }

        if t >= next_status {
            let phase = match profile.phase(t) {
                PressPhase::Waiting => "waiting",
                PressPhase::Moving => "moving",
                PressPhase::Holding => "holding",
            };
            info!(phase, t, z = target_z, fz = reading.force.z, "press status");
            next_status += status_every;
        }
    }

    let rows = log.rows();
    info!(rows, path = %path.display(), "force log saved");
    Ok(PressOutcome {
        path: path.to_path_buf(),
        rows,
        end_time: world.time(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset_io::{ForceLog, DEFAULT_CONTACT_THRESHOLD};
    use spring_sensor::PressProfile;

    fn quick_config(dir: &Path) -> PressRunConfig {
        PressRunConfig {
            profile: PressProfile::default()
                .with_wait_time(0.5)
                .with_heights(2.4, 2.2)
                .with_speed(0.5),
            hold_time: 0.5,
            output_dir: dir.to_path_buf(),
            ..PressRunConfig::default()
        }
    }

    #[test]
    fn timestamped_name_shape() {
        let name = timestamped_name();
        assert_eq!(name.len(), "20250101_120000.csv".len());
        assert!(name.ends_with(".csv"));
        assert_eq!(&name[8..9], "_");
    }

    #[test]
    fn only_records_after_wait() {
        let dir = tempfile::tempdir().unwrap();
        let config = quick_config(dir.path());
        let outcome = run_to(&config, &dir.path().join("run.csv")).unwrap();
        assert!(outcome.rows > 0);

        let log = ForceLog::read(&outcome.path).unwrap();
        assert_eq!(log.len(), outcome.rows);
        assert!(log.time.iter().all(|&t| t > 0.5));
        assert!(log.time.windows(2).all(|w| w[1] > w[0]));
        let base_z = log.base_z.as_ref().unwrap();
        assert!(base_z.iter().all(|&z| (2.2 - 1e-9..=2.4 + 1e-9).contains(&z)));
    }

    #[test]
    fn pressing_reaches_contact() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = run(&quick_config(dir.path())).unwrap();
        assert_eq!(outcome.path.parent(), Some(dir.path()));

        let log = ForceLog::read(&outcome.path).unwrap();
        let summary = log.summary(DEFAULT_CONTACT_THRESHOLD).unwrap();
        assert!(summary.fz_max > 0.0);
        assert!(summary.fz_final > summary.fz_min);
    }

    #[test]
    fn invalid_profile_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = quick_config(dir.path());
        config.profile = config.profile.with_speed(0.0);
        assert!(run_to(&config, &dir.path().join("x.csv")).is_err());
    }
}
