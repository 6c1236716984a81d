//! Hanging-mass verification of the geometric force estimate.

use anyhow::{Context, Result};
use dataset_io::{VerificationRow, VerificationWriter};
use nalgebra::Vector3;
use probe_sim::SpringProbeWorld;
use spring_sensor::{SpringForceSensor, StaticCheck};
use tracing::info;

use crate::config::VerifyRunConfig;

/// Settles a hanging probe of `mass` and compares the measured force with
/// its weight.
///
/// # Errors
///
/// Fails if the configuration does not validate.
pub fn check_mass(config: &VerifyRunConfig, mass: f64) -> Result<StaticCheck> {
    let sensor = SpringForceSensor::new(config.sensor).context("invalid sensor config")?;
    let world_config = config.world.with_probe_mass(mass);
    let mut world = SpringProbeWorld::new(config.sensor, world_config, Vector3::zeros())
        .with_context(|| format!("invalid world config for mass {mass}"))?;
    world.run_for(config.settle_time);
    let reading = sensor.read_geometric(&world, world.time())?;
    Ok(StaticCheck::new(mass, reading.force.z))
}

/// Runs every configured mass and writes the result table.
///
/// # Errors
///
/// Fails on invalid configuration or if the table cannot be written.
pub fn run(config: &VerifyRunConfig) -> Result<Vec<StaticCheck>> {
    let mut writer = VerificationWriter::create(&config.output)?;
    let mut checks = Vec::with_capacity(config.masses.len());
    for &mass in &config.masses {
        let check = check_mass(config, mass)?;
        let row = VerificationRow {
            mass,
            fz: check.measured_fz,
            fz_theory: check.theoretical_fz(),
            err_rate: check.error_rate_percent(),
        };
        info!(
            mass,
            fz = row.fz,
            fz_theory = row.fz_theory,
            err_rate = row.err_rate,
            "mass verified"
        );
        writer.write(&row)?;
        checks.push(check);
    }
    info!(rows = writer.rows(), path = %config.output.display(), "verification saved");
    Ok(checks)
}
