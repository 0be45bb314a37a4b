//! Magnitude reader trait and common types
//!
//! The `MagnitudeReader` trait provides a uniform interface for pulling a
//! single magnitude column out of a catalog file.

use std::fmt;

use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid value {value:?} in column {column} at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for IoError {
    fn from(err: std::io::Error) -> Self {
        IoError::Io(err.to_string())
    }
}

impl From<csv::Error> for IoError {
    fn from(err: csv::Error) -> Self {
        IoError::Csv(err.to_string())
    }
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Which catalog column holds the magnitudes.
///
/// Multi-band magnitudes are stored one column per band, named
/// `{name}_{band}`; `mag_auto` band 2 is read from `mag_auto_2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagnitudeColumn {
    /// Base column name
    pub name: String,
    /// Band index, if the magnitude is band-split
    pub band: Option<usize>,
}

impl MagnitudeColumn {
    /// A single-band column
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            band: None,
        }
    }

    /// One band of a multi-band column
    pub fn with_band(mut self, band: usize) -> Self {
        self.band = Some(band);
        self
    }

    /// Column header as it appears in the file
    pub fn column_name(&self) -> String {
        match self.band {
            Some(band) => format!("{}_{}", self.name, band),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for MagnitudeColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column_name())
    }
}

/// Trait for reading magnitudes from catalog formats
pub trait MagnitudeReader: Send + Sync {
    /// Column headers in file order
    fn column_names(&self) -> &[String];

    /// Read every value of one magnitude column.
    ///
    /// Empty cells are returned as NaN.
    fn read_magnitudes(&self, column: &MagnitudeColumn) -> IoResult<Vec<f64>>;

    /// Number of data rows
    fn num_records(&self) -> usize;

    /// Get the file path (if applicable)
    fn path(&self) -> Option<&str> {
        None
    }

    /// Get the format name
    fn format_name(&self) -> &'static str;
}

/// A boxed reader for dynamic dispatch
pub type BoxedReader = Box<dyn MagnitudeReader>;

/// Open a catalog and return an appropriate reader
///
/// The format is auto-detected from the file extension.
pub fn open_file(path: &str) -> IoResult<BoxedReader> {
    let extension = path
        .rsplit('.')
        .next()
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => {
            use crate::csv_reader::CsvReader;
            Ok(Box::new(CsvReader::open(path)?))
        }

        "tsv" => {
            use crate::csv_reader::CsvReader;
            Ok(Box::new(CsvReader::open_with_delimiter(path, b'\t')?))
        }

        _ => Err(IoError::UnsupportedFormat(format!(
            "Unknown file extension: {}",
            extension
        ))),
    }
}

/// List supported file extensions
pub fn supported_extensions() -> Vec<&'static str> {
    vec!["csv", "tsv"]
}
