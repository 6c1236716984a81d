//! `dataset_info.txt` metadata file.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use stereo_rig::CameraIntrinsics;
use tracing::info;

use crate::{DatasetError, Result};

const TITLE: &str = "=== Synthetic Stereo Dataset Metadata ===";
const EASY_COPY_HEADER: &str = "=== Easy Copy Format (K_flat and Baseline) ===";

/// What the scene contained.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneDetails {
    /// Built-in sphere and box.
    Primitives {
        /// Sphere radius (m).
        sphere_radius: f64,
        /// Box half extents (m).
        cube_scale: [f64; 3],
    },
    /// An imported asset.
    Imported {
        /// Asset path.
        path: String,
    },
}

/// Capture configuration recorded next to the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetMetadata {
    /// Scene mode tag.
    pub scene_mode: String,
    /// Orbit mode tag.
    pub orbit_mode: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Focal length in lens units (centimetres).
    pub focal_length: f64,
    /// Stereo baseline (m).
    pub baseline: f64,
    /// Pixel intrinsics.
    pub intrinsics: CameraIntrinsics,
    /// Scene contents.
    pub scene: SceneDetails,
}

/// The machine-readable block at the end of the metadata file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasyCopyBlock {
    /// K in row-major order.
    pub k: [f64; 9],
    /// Stereo baseline (m).
    pub baseline: f64,
}

fn fmt_vec(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:?}")).collect();
    format!("[{}]", parts.join(", "))
}

impl DatasetMetadata {
    /// Renders the file contents.
    #[must_use]
    pub fn render(&self) -> String {
        let rule = "-".repeat(40);
        let k = self.intrinsics.flattened();
        let mut out = String::new();

        // Writing to a String cannot fail.
        let _ = writeln!(out, "{TITLE}");
        let _ = writeln!(out, "Scene Mode: {}", self.scene_mode);
        let _ = writeln!(out, "Orbit Mode: {}", self.orbit_mode);
        let _ = writeln!(out, "Resolution: {}x{}", self.width, self.height);
        let _ = writeln!(out, "Focal Length: {}mm", 10.0 * self.focal_length);
        let _ = writeln!(out, "Stereo Baseline: {}m", self.baseline);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Camera Intrinsic Matrix (K):");
        let _ = writeln!(
            out,
            "[{},\n {},\n {}]",
            fmt_vec(&k[0..3]),
            fmt_vec(&k[3..6]),
            fmt_vec(&k[6..9])
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Scene Details:");
        match &self.scene {
            SceneDetails::Primitives {
                sphere_radius,
                cube_scale,
            } => {
                let _ = writeln!(out, " - Sphere Radius: {sphere_radius}m");
                let _ = writeln!(out, " - Cube Scale: {}m", fmt_vec(cube_scale));
            }
            SceneDetails::Imported { path } => {
                let _ = writeln!(out, " - Imported USD: {path}");
            }
        }
        let _ = writeln!(out, "{EASY_COPY_HEADER}");
        let flat: Vec<String> = k.iter().map(|v| format!("{v:?}")).collect();
        let _ = writeln!(out, "{}", flat.join(" "));
        let _ = writeln!(out, "{}", self.baseline);
        out
    }

    /// Writes the metadata file.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] on write failure.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.render()).map_err(|e| DatasetError::io(path, e))?;
        info!(path = %path.display(), "metadata written");
        Ok(())
    }
}

/// Parses the easy-copy block out of metadata text.
///
/// Returns `None` if the header is missing or the two lines after it do not
/// hold nine numbers and a baseline.
#[must_use]
pub fn parse_easy_copy(text: &str) -> Option<EasyCopyBlock> {
    let mut lines = text
        .lines()
        .skip_while(|l| l.trim() != EASY_COPY_HEADER)
        .skip(1)
        .filter(|l| !l.trim().is_empty());

    let values: Vec<f64> = lines
        .next()?
        .split_whitespace()
        .map(str::parse)
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    let k: [f64; 9] = values.try_into().ok()?;
    let baseline = lines.next()?.trim().parse().ok()?;
    Some(EasyCopyBlock { k, baseline })
}

/// Reads the easy-copy block from a metadata file.
///
/// # Errors
///
/// Returns [`DatasetError::Io`] if the file cannot be read, or
/// [`DatasetError::MissingBlock`] if the block is absent or malformed.
pub fn read_easy_copy_block(path: impl AsRef<Path>) -> Result<EasyCopyBlock> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
    parse_easy_copy(&text).ok_or_else(|| DatasetError::MissingBlock {
        path: path.to_path_buf(),
    })
}
