//! Spreadsheet output.
//!
//! Workbooks are rendered in memory and returned as bytes. Writing them
//! somewhere is left to the caller.

/// A module rendering single-sheet `.xlsx` workbooks.
pub mod xlsx_writer;

pub use xlsx_writer::render_sheet;
