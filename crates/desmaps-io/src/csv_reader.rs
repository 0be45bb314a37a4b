//! CSV/TSV catalog reader

use crate::reader::{IoError, IoResult, MagnitudeColumn, MagnitudeReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// Delimited-text catalog reader.
///
/// Lines starting with `#` are treated as comments, so files written by
/// [`write_records`](crate::writer::write_records) can be read back.
pub struct CsvReader {
    path: String,
    headers: Vec<String>,
    num_records: usize,
    delimiter: u8,
}

impl CsvReader {
    /// Open a comma-separated file
    pub fn open(path: &str) -> IoResult<Self> {
        Self::open_with_delimiter(path, b',')
    }

    /// Open a delimited file with the given delimiter
    pub fn open_with_delimiter(path: &str, delimiter: u8) -> IoResult<Self> {
        if !Path::new(path).exists() {
            return Err(IoError::FileNotFound(path.to_string()));
        }

        let mut reader = Self::csv_reader(path, delimiter)?;
        let headers = reader
            .headers()
            .map_err(|e| IoError::InvalidFormat(e.to_string()))?
            .iter()
            .map(|s| s.trim().to_string())
            .collect::<Vec<_>>();

        let mut num_records = 0;
        for result in reader.records() {
            result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
            num_records += 1;
        }

        debug!(path, columns = headers.len(), num_records, "opened catalog");

        Ok(Self {
            path: path.to_string(),
            headers,
            num_records,
            delimiter,
        })
    }

    fn csv_reader(path: &str, delimiter: u8) -> IoResult<csv::Reader<BufReader<File>>> {
        let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        Ok(csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file)))
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

impl MagnitudeReader for CsvReader {
    fn column_names(&self) -> &[String] {
        &self.headers
    }

    fn read_magnitudes(&self, column: &MagnitudeColumn) -> IoResult<Vec<f64>> {
        let name = column.column_name();
        let col_index = self
            .column_index(&name)
            .ok_or_else(|| IoError::ColumnNotFound(name.clone()))?;

        let mut reader = Self::csv_reader(&self.path, self.delimiter)?;
        let mut values = Vec::with_capacity(self.num_records);

        for (row, result) in reader.records().enumerate() {
            let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
            let cell = record.get(col_index).unwrap_or("");
            values.push(parse_magnitude(cell).ok_or_else(|| IoError::InvalidValue {
                row,
                column: name.clone(),
                value: cell.to_string(),
            })?);
        }

        info!(path = %self.path, column = %name, count = values.len(), "read magnitudes");
        Ok(values)
    }

    fn num_records(&self) -> usize {
        self.num_records
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn format_name(&self) -> &'static str {
        if self.delimiter == b'\t' {
            "TSV"
        } else {
            "CSV"
        }
    }
}

/// Parse one magnitude cell; empty cells are missing values (NaN)
fn parse_magnitude(cell: &str) -> Option<f64> {
    if cell.is_empty() {
        return Some(f64::NAN);
    }
    cell.parse().ok()
}
