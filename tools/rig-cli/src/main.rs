//! `rig`: press experiments, stereo captures and force log reports.
//!
//! # Commands
//!
//! - `rig press` - run a press and write a timestamped force log
//! - `rig stereo` - capture a synthetic stereo dataset
//! - `rig verify` - check the force estimate against hanging masses
//! - `rig force-report <FILE>` - summarize a force log

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dataset_io::DEFAULT_CONTACT_THRESHOLD;
use probe_sim::SceneMode;
use rig_cli::config::{self, PressRunConfig, StereoRunConfig, VerifyRunConfig};
use rig_cli::{logging, press, report, stereo, verify};
use stereo_rig::OrbitMode;
use tracing::info;

/// Spring probe and stereo rig drivers.
#[derive(Parser)]
#[command(name = "rig")]
#[command(about = "Spring probe press runs and synthetic stereo captures", long_about = None)]
#[command(version)]
struct Cli {
    /// Log filter (overrides RUST_LOG), e.g. "debug" or "probe_sim=trace"
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Press the probe into the contact plane and log the sensed force
    Press {
        /// TOML run configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory for the force log
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Probe mass (kg)
        #[arg(long)]
        mass: Option<f64>,

        /// Run without the contact plane
        #[arg(long)]
        no_contact: bool,
    },

    /// Capture a stereo dataset in the synthetic studio
    Stereo {
        /// TOML run configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Trajectory: "circle" or "linear"
        #[arg(long)]
        mode: Option<OrbitMode>,

        /// Scene: "diy" or "import"
        #[arg(long)]
        scene: Option<SceneMode>,

        /// Number of frames
        #[arg(long)]
        frames: Option<usize>,

        /// Dataset directory (replaced if it exists)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Compare settled forces of hanging masses with their weight
    Verify {
        /// TOML run configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Masses to test (kg), comma separated
        #[arg(long, value_delimiter = ',')]
        masses: Vec<f64>,

        /// Output table
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Summarize a recorded force log
    ForceReport {
        /// Force log CSV
        #[arg(name = "FILE")]
        path: PathBuf,

        /// |f_z| above this counts as contact (N)
        #[arg(long, default_value_t = DEFAULT_CONTACT_THRESHOLD)]
        threshold: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log.as_deref());
    logging::log_failure(dispatch(cli.command))
}

fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Press {
            config,
            output_dir,
            mass,
            no_contact,
        } => {
            let mut run: PressRunConfig = config::load(config.as_deref())?;
            if let Some(dir) = output_dir {
                run.output_dir = dir;
            }
            if let Some(mass) = mass {
                run.world = run.world.with_probe_mass(mass);
            }
            if no_contact {
                run.contact_enabled = false;
            }
            let outcome = press::run(&run)?;
            info!(path = %outcome.path.display(), rows = outcome.rows, "press complete");
        }
        Commands::Stereo {
            config,
            mode,
            scene,
            frames,
            output,
        } => {
            let mut run: StereoRunConfig = config::load(config.as_deref())?;
            if let Some(mode) = mode {
                run.trajectory = run.trajectory.with_mode(mode);
            }
            if let Some(scene) = scene {
                run.scene.mode = scene;
            }
            if let Some(frames) = frames {
                run.trajectory = run.trajectory.with_num_frames(frames);
            }
            if let Some(output) = output {
                run.output_dir = output;
            }
            let written = stereo::run(&run)?;
            info!(written, path = %run.output_dir.display(), "dataset complete");
        }
        Commands::Verify {
            config,
            masses,
            output,
        } => {
            let mut run: VerifyRunConfig = config::load(config.as_deref())?;
            if !masses.is_empty() {
                run.masses = masses;
            }
            if let Some(output) = output {
                run.output = output;
            }
            verify::run(&run)?;
        }
        Commands::ForceReport { path, threshold } => report::run(&path, threshold)?,
    }

    Ok(())
}
