//! CSV input for the migration.
//!
//! The reader turns a delimited file with a header line into [`RawRow`]s,
//! one per data line, in file order, without buffering the file.
//!
//! Values keep their surrounding whitespace: trimming belongs to the
//! normalizer so the error report can show the original text.
//!
//! [`RawRow`]: crate::customer::row::RawRow

/// A module providing facilities for reading CSV rows.
pub mod csv_reader;

pub use csv_reader::{CsvRowReader, CsvRowReaderBuilder};
