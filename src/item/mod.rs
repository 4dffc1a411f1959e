#[cfg(feature = "csv")]
/// This module provides the CSV row reader of the migration.
pub mod csv;

#[cfg(feature = "rdbc-sqlite")]
/// This module provides the SQLite store of the migration.
pub mod rdbc;

#[cfg(feature = "xlsx")]
/// This module provides the spreadsheet renderer used by the error report.
pub mod xlsx;
