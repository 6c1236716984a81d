//! Render host for the stereo rig.

use stereo_rig::{RenderHost, StereoRig, StereoRigConfig};
use tracing::{debug, info};

use crate::{PrimitiveScene, Result, SceneConfig, SimError, SyntheticCamera};

/// Studio that steps time and renders both rig cameras each step.
#[derive(Debug, Clone)]
pub struct SyntheticStudio {
    scene: PrimitiveScene,
    timestep: f64,
    time: f64,
    steps: u64,
}

impl SyntheticStudio {
    /// Default step size (s).
    pub const DEFAULT_TIMESTEP: f64 = 1.0 / 60.0;

    /// Builds the studio for a scene configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene cannot be built.
    pub fn new(scene: &SceneConfig) -> Result<Self> {
        let scene = PrimitiveScene::from_config(scene)?;
        info!(primitives = scene.primitives.len(), "studio scene ready");
        Ok(Self::with_scene(scene))
    }

    /// Wraps an already built scene.
    #[must_use]
    pub fn with_scene(scene: PrimitiveScene) -> Self {
        Self {
            scene,
            timestep: Self::DEFAULT_TIMESTEP,
            time: 0.0,
            steps: 0,
        }
    }

    /// Sets the step size.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if `timestep` is not positive.
    pub fn with_timestep(mut self, timestep: f64) -> Result<Self> {
        if !timestep.is_finite() || timestep <= 0.0 {
            return Err(SimError::invalid_config(format!(
                "timestep must be > 0, got {timestep}"
            )));
        }
        self.timestep = timestep;
        Ok(self)
    }

    /// Builds a rig with two synthetic cameras for this studio.
    ///
    /// # Errors
    ///
    /// Returns an error if the rig configuration does not validate.
    pub fn rig(config: StereoRigConfig) -> Result<StereoRig<SyntheticCamera>> {
        let left = SyntheticCamera::new(&config);
        let right = SyntheticCamera::new(&config);
        Ok(StereoRig::new(config, left, right)?)
    }

    /// The rendered scene.
    #[must_use]
    pub fn scene(&self) -> &PrimitiveScene {
        &self.scene
    }

    /// Steps taken so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl RenderHost for SyntheticStudio {
    type Camera = SyntheticCamera;
    type Error = SimError;

    fn step(&mut self, rig: &mut StereoRig<SyntheticCamera>) -> Result<()> {
        self.time += self.timestep;
        self.steps += 1;
        let (left, right) = rig.cameras_mut();
        left.render(&self.scene);
        right.render(&self.scene);
        debug!(step = self.steps, time = self.time, "studio step");
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.time
    }
}
