//! Minimal CSV writing and reading.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::{DatasetError, Result};

/// Escape special characters for CSV.
#[must_use]
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Row-at-a-time CSV writer that flushes after every row.
#[derive(Debug)]
pub struct CsvWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    rows: usize,
}

impl CsvWriter {
    /// Creates (truncating) the file and writes the header.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the file cannot be created or written.
    pub fn create(path: impl AsRef<Path>, header: &[&str]) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| DatasetError::io(&path, e))?;
        let mut writer = Self {
            path,
            writer: BufWriter::new(file),
            rows: 0,
        };
        let header: Vec<String> = header.iter().map(|h| escape_csv(h)).collect();
        writer.write_line(&header.join(","))?;
        Ok(writer)
    }

    /// Writes one row of already formatted fields and flushes it.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] on write failure.
    pub fn write_row<S: AsRef<str>>(&mut self, fields: &[S]) -> Result<()> {
        let line = fields
            .iter()
            .map(|f| escape_csv(f.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        self.write_line(&line)?;
        self.rows += 1;
        Ok(())
    }

    /// Data rows written so far.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes buffered output.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] on flush failure.
    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| DatasetError::io(&self.path, e))
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}").map_err(|e| DatasetError::io(&self.path, e))?;
        self.flush()
    }
}

/// A CSV file loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    path: PathBuf,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Reads a CSV file with a header row.
    ///
    /// Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the file cannot be read, or
    /// [`DatasetError::Parse`] if a row has the wrong number of fields.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| DatasetError::io(&path, e))?;
        let mut lines = BufReader::new(file).lines().enumerate();

        let header = match lines.next() {
            Some((_, line)) => split_line(&line.map_err(|e| DatasetError::io(&path, e))?),
            None => return Err(DatasetError::Empty { path }),
        };

        let mut rows = Vec::new();
        for (i, line) in lines {
            let line = line.map_err(|e| DatasetError::io(&path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_line(&line);
            if fields.len() != header.len() {
                return Err(DatasetError::parse(
                    &path,
                    i + 1,
                    format!("expected {} fields, got {}", header.len(), fields.len()),
                ));
            }
            rows.push(fields);
        }

        Ok(Self { path, header, rows })
    }

    /// Column names.
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw data rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Index of a column, if present.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// A column parsed as numbers.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::MissingColumn`] if the column does not exist,
    /// or [`DatasetError::Parse`] if a value is not a number.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| DatasetError::MissingColumn {
                path: self.path.clone(),
                column: name.to_string(),
            })?;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row[idx].trim().parse::<f64>().map_err(|e| {
                    DatasetError::parse(&self.path, i + 2, format!("{name}: {e}"))
                })
            })
            .collect()
    }
}

fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();
    while let Some(c) = chars.next() {
        match (c, quoted) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', _) => quoted = !quoted,
            (',', false) => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }

    #[test]
    fn split_handles_quotes() {
        assert_eq!(split_line("a,\"b,c\",d"), vec!["a", "b,c", "d"]);
        assert_eq!(split_line("\"x\"\"y\""), vec!["x\"y"]);
        assert_eq!(split_line("1,2\r"), vec!["1", "2"]);
    }

    #[test]
    fn rows_are_on_disk_before_close() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let mut writer = CsvWriter::create(&path, &["a", "b"]).unwrap();
        writer.write_row(&["1", "2"]).unwrap();

        // Writer still open: the row must already be readable.
        let table = CsvTable::read(&path).unwrap();
        assert_eq!(table.header(), ["a", "b"]);
        assert_eq!(table.len(), 1);
        assert_eq!(writer.rows(), 1);
    }

    #[test]
    fn numeric_column_and_missing_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "time,f_z\n0.1,1.5\n0.2,-2\n\n").unwrap();

        let table = CsvTable::read(&path).unwrap();
        assert_eq!(table.numeric_column("f_z").unwrap(), vec![1.5, -2.0]);
        assert!(table.numeric_column("f_x").unwrap_err().is_missing_column());
    }

    #[test]
    fn ragged_row_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "a,b\n1\n").unwrap();
        assert!(matches!(
            CsvTable::read(&path),
            Err(DatasetError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn empty_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(CsvTable::read(&path), Err(DatasetError::Empty { .. })));
    }
}
