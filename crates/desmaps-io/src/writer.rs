//! Table persistence
//!
//! Records are written as CSV with a header block of `# key = value` lines
//! carrying the parameters that produced them. Readers skip the header
//! block as comments. Existing files are overwritten.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::reader::{IoError, IoResult};

/// Parameter lines written ahead of the records
pub type Header = Vec<(String, String)>;

/// Write `records` to `path`, preceded by `header`
pub fn write_records<T, P>(path: P, records: &[T], header: &[(String, String)]) -> IoResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
    let mut out = BufWriter::new(file);

    for (key, value) in header {
        writeln!(out, "# {} = {}", key, value)?;
    }

    let mut writer = csv::Writer::from_writer(&mut out);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    drop(writer);
    out.flush()?;

    info!(path = %path.display(), rows = records.len(), "wrote table");
    Ok(())
}

/// Read records written by [`write_records`]
pub fn read_records<T, P>(path: P) -> IoResult<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::FileNotFound(path.display().to_string()));
    }
    let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let records = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| IoError::InvalidFormat(e.to_string()))?;

    info!(path = %path.display(), rows = records.len(), "read table");
    Ok(records)
}

/// Read the `# key = value` header block of a table file
pub fn read_header<P: AsRef<Path>>(path: P) -> IoResult<Header> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;

    let mut header = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let Some(entry) = line.strip_prefix('#') else {
            break;
        };
        if let Some((key, value)) = entry.split_once('=') {
            header.push((key.trim().to_string(), value.trim().to_string()));
        }
    }
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        maglim: f64,
        neff: f64,
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("neff-vs-maglim.csv");
        let rows = vec![
            Row { maglim: 23.0, neff: 1200.5 },
            Row { maglim: 21.0, neff: 310.25 },
        ];
        let header = vec![("nint".to_string(), "100".to_string())];

        write_records(&path, &rows, &header).unwrap();

        let read: Vec<Row> = read_records(&path).unwrap();
        assert_eq!(read, rows);
        assert_eq!(read_header(&path).unwrap(), header);
    }

    #[test]
    fn test_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        write_records(&path, &[Row { maglim: 1.0, neff: 1.0 }], &[]).unwrap();
        write_records(&path, &[Row { maglim: 2.0, neff: 2.0 }], &[]).unwrap();

        let read: Vec<Row> = read_records(&path).unwrap();
        assert_eq!(read, vec![Row { maglim: 2.0, neff: 2.0 }]);
        assert!(read_header(&path).unwrap().is_empty());
    }

    #[test]
    fn test_written_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let header = vec![("nofm_nbin".to_string(), "200".to_string())];
        write_records(&path, &[Row { maglim: 22.5, neff: 3.0 }], &header).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "# nofm_nbin = 200\nmaglim,neff\n22.5,3.0\n");
    }

    #[test]
    fn test_read_missing_file() {
        let result: IoResult<Vec<Row>> = read_records("/nonexistent/table.csv");
        assert!(matches!(result, Err(IoError::FileNotFound(_))));
    }
}
