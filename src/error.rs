use thiserror::Error;

#[derive(Error, Debug)]
/// Batch error
pub enum BatchError {
    #[error("ItemWriter from: {0}")]
    ItemWriter(String),

    #[error("ItemReader from: {0}")]
    ItemReader(String),

    #[error("ItemProcessor from: {0}")]
    ItemProcessor(String),

    /// A data row whose field count differs from the header.
    #[error("line {line}: expected {expected} fields, found {found}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Some items of a chunk were refused by the writer, the others were written.
    #[error("{failed} items not written, last error: {message}")]
    PartialWrite { failed: usize, message: String },

    #[error("Step failed: {0}")]
    Step(String),

    #[error("Tasklet failed: {0}")]
    Tasklet(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Report rendering failed: {0}")]
    Report(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
