//! Stereo capture: move the rig along its trajectory and write a dataset.

use anyhow::{Context, Result};
use dataset_io::{DatasetMetadata, SceneDetails, StereoDatasetWriter, METADATA_FILE};
use probe_sim::{SceneConfig, SceneMode, SyntheticStudio};
use stereo_rig::{ImageSource, PoseSettable, RenderHost, StereoRig, TrajectoryConfig};
use tracing::{info, warn};

use crate::config::StereoRunConfig;

/// Pacing of a capture loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSettings {
    /// Host steps before the first frame.
    pub warmup_steps: u32,
    /// Progress log interval in frames; 0 disables it.
    pub log_every: usize,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            warmup_steps: 30,
            log_every: 10,
        }
    }
}

/// Metadata describing a capture.
#[must_use]
pub fn metadata<C: PoseSettable + ImageSource>(
    rig: &StereoRig<C>,
    trajectory: &TrajectoryConfig,
    scene: &SceneConfig,
) -> DatasetMetadata {
    let config = rig.config();
    let details = match scene.mode {
        SceneMode::Diy => SceneDetails::Primitives {
            sphere_radius: scene.sphere_radius,
            cube_scale: scene.cube_scale,
        },
        SceneMode::Import => SceneDetails::Imported {
            path: scene.import_path.clone(),
        },
    };
    DatasetMetadata {
        scene_mode: scene.mode.to_string(),
        orbit_mode: trajectory.mode.to_string(),
        width: config.width,
        height: config.height,
        focal_length: config.focal_length,
        baseline: config.baseline,
        intrinsics: rig.intrinsics(),
        scene: details,
    }
}

/// Runs the capture loop against any render host.
///
/// Each frame moves the rig, steps the host once, and writes the pair if
/// both images are available. Frames without images are skipped, so the
/// written indices can have gaps. The writer is closed on success; on error
/// it is dropped and whatever was already written stays on disk.
///
/// # Errors
///
/// Fails if the trajectory is invalid, the host fails to step, or a frame
/// cannot be written.
pub fn run_capture<H: RenderHost>(
    host: &mut H,
    rig: &mut StereoRig<H::Camera>,
    trajectory: &TrajectoryConfig,
    mut writer: StereoDatasetWriter,
    settings: CaptureSettings,
) -> Result<usize> {
    trajectory.validate().context("invalid trajectory")?;
    let total = trajectory.num_frames;
    let target = trajectory.target_point();

    for _ in 0..settings.warmup_steps {
        host.step(rig).context("render host failed during warm-up")?;
    }
    info!(frames = total, mode = %trajectory.mode, "capture started");

    for index in 0..total {
        let center = trajectory.center_at(index, total)?;
        let pose = rig.set_stereo_pose(center, target);
        host.step(rig).context("render host failed to step")?;
        let time = host.current_time();

        match rig.capture().into_pair() {
            Some((left, right)) => {
                writer
                    .write_frame(index, time, &pose, &left, &right)
                    .with_context(|| format!("failed to write frame {index}"))?;
            }
            None => warn!(frame = index, "images not ready, frame skipped"),
        }

        if settings.log_every > 0 && index % settings.log_every == 0 {
            info!("Captured {}/{}", index, total);
        }
    }

    let written = writer.close()?;
    info!(written, "capture finished");
    Ok(written)
}

/// Runs a capture in the synthetic studio from a run config.
///
/// # Errors
///
/// Fails on invalid configuration or any write error.
pub fn run(config: &StereoRunConfig) -> Result<usize> {
    config.rig.validate().context("invalid rig config")?;
    config.trajectory.validate().context("invalid trajectory")?;

    let mut studio = SyntheticStudio::new(&config.scene).context("failed to build scene")?;
    let mut rig = SyntheticStudio::rig(config.rig)?;

    let writer = StereoDatasetWriter::create(&config.output_dir)?;
    metadata(&rig, &config.trajectory, &config.scene)
        .write(config.output_dir.join(METADATA_FILE))?;

    run_capture(
        &mut studio,
        &mut rig,
        &config.trajectory,
        writer,
        CaptureSettings {
            warmup_steps: config.warmup_steps,
            log_every: config.log_every,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use stereo_rig::{OrbitMode, StereoRigConfig};

    #[test]
    fn metadata_reflects_config() {
        let rig = SyntheticStudio::rig(StereoRigConfig::default().with_resolution(32, 24)).unwrap();
        let trajectory = TrajectoryConfig::default().with_mode(OrbitMode::Linear);
        let meta = metadata(&rig, &trajectory, &SceneConfig::default());
        assert_eq!(meta.orbit_mode, "linear");
        assert_eq!(meta.scene_mode, "diy");
        assert_eq!((meta.width, meta.height), (32, 24));
        assert!(matches!(meta.scene, SceneDetails::Primitives { .. }));
    }

    #[test]
    fn import_scene_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = StereoRunConfig {
            scene: SceneConfig {
                mode: SceneMode::Import,
                ..SceneConfig::default()
            },
            output_dir: dir.path().join("out"),
            ..StereoRunConfig::default()
        };
        assert!(run(&config).is_err());
        assert!(!config.output_dir.exists());
    }
}
