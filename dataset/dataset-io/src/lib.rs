//! Dataset artifacts for the press experiment and stereo captures.
//!
//! - [`ForceLogWriter`] / [`ForceLog`] - `time,f_x,f_y,f_z,base_z` force runs
//! - [`VerificationWriter`] - hanging-mass check results
//! - [`StereoDatasetWriter`] - `left/`, `right/` PNG frames and `camera_poses.csv`
//! - [`DatasetMetadata`] - `dataset_info.txt` with the easy-copy K/baseline block
//!
//! Every CSV row is flushed as soon as it is written, so an interrupted run
//! leaves a valid prefix on disk.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod csv;
mod error;
mod force_log;
mod metadata;
mod png;
mod stereo;
mod verification;

pub use csv::{escape_csv, CsvTable, CsvWriter};
pub use error::DatasetError;
pub use force_log::{
    ForceLog, ForceLogWriter, ForceSample, ForceSummary, DEFAULT_CONTACT_THRESHOLD,
    FORCE_LOG_HEADER,
};
pub use metadata::{
    parse_easy_copy, read_easy_copy_block, DatasetMetadata, EasyCopyBlock, SceneDetails,
};
pub use png::write_rgb_png;
pub use stereo::{
    frame_file_name, StereoDatasetWriter, LEFT_DIR, METADATA_FILE, POSES_FILE, POSES_HEADER,
    RIGHT_DIR,
};
pub use verification::{VerificationRow, VerificationWriter, VERIFICATION_HEADER};

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
