//! Force-run CSV logs.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::{CsvTable, CsvWriter, DatasetError, Result};

/// Header of a force-run log.
pub const FORCE_LOG_HEADER: [&str; 5] = ["time", "f_x", "f_y", "f_z", "base_z"];

/// |f_z| above this counts as contact (N).
pub const DEFAULT_CONTACT_THRESHOLD: f64 = 0.01;

/// One force-log row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceSample {
    /// Simulation time (s).
    pub time: f64,
    /// Force `[f_x, f_y, f_z]` (N).
    pub force: [f64; 3],
    /// Base height (m).
    pub base_z: f64,
}

/// Writes `time,f_x,f_y,f_z,base_z` rows.
///
/// Time and base height are rounded to four decimals.
#[derive(Debug)]
pub struct ForceLogWriter {
    csv: CsvWriter,
}

impl ForceLogWriter {
    /// Creates the log file and writes the header.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let csv = CsvWriter::create(path, &FORCE_LOG_HEADER)?;
        info!(path = %csv.path().display(), "force log opened");
        Ok(Self { csv })
    }

    /// Appends one sample.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] on write failure.
    pub fn write(&mut self, sample: &ForceSample) -> Result<()> {
        self.csv.write_row(&[
            format!("{:.4}", sample.time),
            sample.force[0].to_string(),
            sample.force[1].to_string(),
            sample.force[2].to_string(),
            format!("{:.4}", sample.base_z),
        ])
    }

    /// Samples written so far.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.csv.rows()
    }

    /// Output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.csv.path()
    }
}

/// A force log loaded for analysis.
///
/// Only `time` and `f_z` are required; other columns are read if present.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceLog {
    /// Source file.
    pub path: PathBuf,
    /// Sample times (s).
    pub time: Vec<f64>,
    /// Vertical force (N).
    pub f_z: Vec<f64>,
    /// Base height, when logged.
    pub base_z: Option<Vec<f64>>,
}

impl ForceLog {
    /// Reads a force log.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::MissingColumn`] if `time` or `f_z` is absent,
    /// or an I/O or parse error.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let table = CsvTable::read(path.as_ref())?;
        let time = table.numeric_column("time")?;
        let f_z = table.numeric_column("f_z")?;
        let base_z = match table.numeric_column("base_z") {
            Ok(values) => Some(values),
            Err(e) if e.is_missing_column() => None,
            Err(e) => return Err(e),
        };
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            time,
            f_z,
            base_z,
        })
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the log has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// First sample with `|f_z| > threshold`, as `(time, f_z)`.
    #[must_use]
    pub fn first_contact(&self, threshold: f64) -> Option<(f64, f64)> {
        self.time
            .iter()
            .zip(&self.f_z)
            .find(|(_, f)| f.abs() > threshold)
            .map(|(t, f)| (*t, *f))
    }

    /// Summary statistics of the run.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Empty`] if the log has no samples.
    pub fn summary(&self, threshold: f64) -> Result<ForceSummary> {
        let (Some(&t_start), Some(&t_end), Some(&fz_final)) =
            (self.time.first(), self.time.last(), self.f_z.last())
        else {
            return Err(DatasetError::Empty {
                path: self.path.clone(),
            });
        };
        let fz_min = self.f_z.iter().copied().fold(f64::INFINITY, f64::min);
        let fz_max = self.f_z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(ForceSummary {
            samples: self.len(),
            t_start,
            t_end,
            fz_min,
            fz_max,
            fz_final,
            first_contact: self.first_contact(threshold),
        })
    }
}

/// Textual summary of a force run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceSummary {
    /// Number of samples.
    pub samples: usize,
    /// First sample time (s).
    pub t_start: f64,
    /// Last sample time (s).
    pub t_end: f64,
    /// Minimum f_z (N).
    pub fz_min: f64,
    /// Maximum f_z (N).
    pub fz_max: f64,
    /// Last f_z (N).
    pub fz_final: f64,
    /// First contact `(time, f_z)`, if any.
    pub first_contact: Option<(f64, f64)>,
}

impl fmt::Display for ForceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "samples:       {}", self.samples)?;
        writeln!(f, "time span:     {:.4} .. {:.4} s", self.t_start, self.t_end)?;
        writeln!(f, "f_z min/max:   {:.4} / {:.4} N", self.fz_min, self.fz_max)?;
        writeln!(f, "f_z final:     {:.4} N", self.fz_final)?;
        match self.first_contact {
            Some((t, fz)) => write!(f, "first contact: t = {t:.4} s, f_z = {fz:.4} N"),
            None => write!(f, "first contact: none"),
        }
    }
}
