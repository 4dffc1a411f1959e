use std::cell::RefCell;

use crate::core::item::{ItemWriter, ItemWriterResult};

use super::processor::ProcessedRow;

/// Name of the sheet holding the report.
pub const REPORT_SHEET_NAME: &str = "Migration errors";

/// Header row of the report.
pub const REPORT_HEADER: [&str; 2] = ["Row", "Errors"];

/// One failing row: its original text and the names of the failing fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub row: String,
    pub error: String,
}

impl From<&ProcessedRow> for ErrorEntry {
    fn from(row: &ProcessedRow) -> Self {
        Self {
            row: row.raw.clone(),
            error: row.outcome.joined(),
        }
    }
}

/// Collects an [`ErrorEntry`] for every row with a failing field.
///
/// Rows inserted with an unknown location are reported too.
#[derive(Debug, Default)]
pub struct ErrorReportCollector {
    entries: RefCell<Vec<ErrorEntry>>,
}

impl ErrorReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in the order the rows were read.
    pub fn entries(&self) -> Vec<ErrorEntry> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl ItemWriter<ProcessedRow> for ErrorReportCollector {
    fn write(&self, items: &[ProcessedRow]) -> ItemWriterResult {
        self.entries.borrow_mut().extend(
            items
                .iter()
                .filter(|row| !row.outcome.is_valid())
                .map(ErrorEntry::from),
        );
        Ok(())
    }
}

/// Renders `entries` as a workbook with a single [`REPORT_SHEET_NAME`] sheet.
///
/// Returns the bytes of the `.xlsx` file. An empty slice gives a sheet with
/// only the header row.
#[cfg(feature = "xlsx")]
pub fn render_report(entries: &[ErrorEntry]) -> Result<Vec<u8>, crate::BatchError> {
    let rows: Vec<[&str; 2]> = entries
        .iter()
        .map(|entry| [entry.row.as_str(), entry.error.as_str()])
        .collect();

    crate::item::xlsx::render_sheet(REPORT_SHEET_NAME, &REPORT_HEADER, &rows)
}
