//! desmaps-io - Catalog and table I/O for desmaps
//!
//! - **Catalogs**: magnitude columns from CSV/TSV catalogs, with band
//!   selection for multi-band magnitudes
//! - **Tables**: serde records written as CSV with a `# key = value`
//!   parameter header, and read back
//!
//! # Design
//!
//! Catalog readers implement the `MagnitudeReader` trait for uniform access.
//! The table writer is generic over serde records and knows nothing about
//! histograms or depth-limit tables.

pub mod csv_reader;
pub mod reader;
pub mod writer;

pub use csv_reader::CsvReader;
pub use reader::*;
pub use writer::*;
