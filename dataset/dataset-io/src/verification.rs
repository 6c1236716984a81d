//! Hanging-mass verification results.

use std::path::Path;

use crate::{CsvWriter, Result};

/// Header of the verification table.
pub const VERIFICATION_HEADER: [&str; 4] = ["m", "fz", "fz_theory", "err_rate"];

/// One verification result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerificationRow {
    /// Probe mass (kg).
    pub mass: f64,
    /// Measured vertical force (N).
    pub fz: f64,
    /// Theoretical vertical force (N).
    pub fz_theory: f64,
    /// Relative error (%).
    pub err_rate: f64,
}

/// Writes `m,fz,fz_theory,err_rate` rows.
#[derive(Debug)]
pub struct VerificationWriter {
    csv: CsvWriter,
}

impl VerificationWriter {
    /// Creates the file and writes the header.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DatasetError::Io`] if the file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            csv: CsvWriter::create(path, &VERIFICATION_HEADER)?,
        })
    }

    /// Appends one result.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DatasetError::Io`] on write failure.
    pub fn write(&mut self, row: &VerificationRow) -> Result<()> {
        self.csv.write_row(&[
            row.mass.to_string(),
            format!("{:.6}", row.fz),
            format!("{:.6}", row.fz_theory),
            format!("{:.4}", row.err_rate),
        ])
    }

    /// Rows written so far.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.csv.rows()
    }
}
