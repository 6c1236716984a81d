//! Stereo dataset directory writer.

use std::fs;
use std::path::{Path, PathBuf};

use stereo_rig::{RgbaFrame, StereoPose};
use tracing::{info, warn};

use crate::{write_rgb_png, CsvWriter, DatasetError, Result};

/// Left image directory name.
pub const LEFT_DIR: &str = "left";
/// Right image directory name.
pub const RIGHT_DIR: &str = "right";
/// Pose table file name.
pub const POSES_FILE: &str = "camera_poses.csv";
/// Metadata file name.
pub const METADATA_FILE: &str = "dataset_info.txt";

/// Header of `camera_poses.csv`.
pub const POSES_HEADER: [&str; 12] = [
    "frame", "time", "p_l_x", "p_l_y", "p_l_z", "q_w", "q_x", "q_y", "q_z", "p_r_x", "p_r_y",
    "p_r_z",
];

/// Image file name for a frame index (`0000.png`).
#[must_use]
pub fn frame_file_name(index: usize) -> String {
    format!("{index:04}.png")
}

/// Writes paired PNG frames and the pose table of one capture.
///
/// Creating the writer replaces any existing dataset at the root. Rows are
/// flushed as they are written; dropping the writer flushes what is left.
#[derive(Debug)]
pub struct StereoDatasetWriter {
    root: PathBuf,
    left_dir: PathBuf,
    right_dir: PathBuf,
    poses: CsvWriter,
}

impl StereoDatasetWriter {
    /// Prepares a fresh dataset directory.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the old directory cannot be removed or
    /// the new layout cannot be created.
    pub fn create(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if root.exists() {
            warn!(path = %root.display(), "removing existing output directory");
            fs::remove_dir_all(&root).map_err(|e| DatasetError::io(&root, e))?;
        }
        let left_dir = root.join(LEFT_DIR);
        let right_dir = root.join(RIGHT_DIR);
        for dir in [&left_dir, &right_dir] {
            fs::create_dir_all(dir).map_err(|e| DatasetError::io(dir, e))?;
        }
        let poses = CsvWriter::create(root.join(POSES_FILE), &POSES_HEADER)?;
        info!(path = %root.display(), "stereo dataset created");
        Ok(Self {
            root,
            left_dir,
            right_dir,
            poses,
        })
    }

    /// Dataset root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Frames written so far.
    #[must_use]
    pub fn frames_written(&self) -> usize {
        self.poses.rows()
    }

    /// Writes both images of a frame, then its pose row.
    ///
    /// # Errors
    ///
    /// Returns an error if either frame is empty or a write fails. Nothing is
    /// added to the pose table in that case.
    pub fn write_frame(
        &mut self,
        index: usize,
        time: f64,
        pose: &StereoPose,
        left: &RgbaFrame,
        right: &RgbaFrame,
    ) -> Result<()> {
        let name = frame_file_name(index);
        write_rgb_png(&self.left_dir.join(&name), left, index)?;
        write_rgb_png(&self.right_dir.join(&name), right, index)?;

        let q = pose.orientation_wxyz();
        let (l, r) = (pose.left, pose.right);
        self.poses.write_row(&[
            index.to_string(),
            format!("{time:.4}"),
            l.x.to_string(),
            l.y.to_string(),
            l.z.to_string(),
            q[0].to_string(),
            q[1].to_string(),
            q[2].to_string(),
            q[3].to_string(),
            r.x.to_string(),
            r.y.to_string(),
            r.z.to_string(),
        ])
    }

    /// Flushes and closes the pose table.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the final flush fails.
    pub fn close(mut self) -> Result<usize> {
        self.poses.flush()?;
        let frames = self.poses.rows();
        info!(frames, path = %self.root.display(), "stereo dataset closed");
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CsvTable;
    use nalgebra::Point3;
    use tempfile::tempdir;

    fn frame() -> RgbaFrame {
        RgbaFrame::filled(4, 3, [1, 2, 3, 255])
    }

    #[test]
    fn create_replaces_existing_dataset() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("out");
        fs::create_dir_all(root.join("left")).unwrap();
        fs::write(root.join("left").join("stale.png"), b"old").unwrap();

        let writer = StereoDatasetWriter::create(&root).unwrap();
        assert!(root.join(LEFT_DIR).is_dir());
        assert!(root.join(RIGHT_DIR).is_dir());
        assert!(!root.join("left").join("stale.png").exists());
        assert_eq!(writer.close().unwrap(), 0);
    }

    #[test]
    fn frames_and_rows() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("out");
        let mut writer = StereoDatasetWriter::create(&root).unwrap();
        for i in 0..3 {
            let pose = StereoPose::compute(Point3::new(0.4, 0.1 * i as f64, 0.4), Point3::origin(), 0.032);
            writer
                .write_frame(i, 0.1 * (i + 1) as f64, &pose, &frame(), &frame())
                .unwrap();
        }
        assert_eq!(writer.frames_written(), 3);
        writer.close().unwrap();

        let table = CsvTable::read(root.join(POSES_FILE)).unwrap();
        assert_eq!(table.header(), POSES_HEADER);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[1][1], "0.2000");
        assert!(root.join(RIGHT_DIR).join("0002.png").is_file());
    }

    #[test]
    fn failed_frame_adds_no_row() {
        let dir = tempdir().unwrap();
        let mut writer = StereoDatasetWriter::create(dir.path().join("out")).unwrap();
        let pose = StereoPose::compute(Point3::new(0.4, 0.0, 0.4), Point3::origin(), 0.032);
        assert!(writer
            .write_frame(0, 0.0, &pose, &frame(), &RgbaFrame::default())
            .is_err());
        assert_eq!(writer.frames_written(), 0);
    }

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(frame_file_name(0), "0000.png");
        assert_eq!(frame_file_name(42), "0042.png");
        assert_eq!(frame_file_name(12345), "12345.png");
    }
}
