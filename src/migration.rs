//! Wiring of the customer migration job.
//!
//! The job has two steps:
//!
//! 1. `import-customers`, a chunk-oriented step reading the CSV file,
//!    validating every row and feeding both the error report collector and
//!    the persistence sink.
//! 2. `write-error-report`, a tasklet writing the `.xlsx` report.
//!
//! # Examples
//!
//! ```
//! use customer_batch::customer::repository::InMemoryCustomerRepository;
//! use customer_batch::migration::{MigrationOptions, run_migration};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let input = dir.path().join("customers.csv");
//! std::fs::write(
//!     &input,
//!     "id,name,email,age,location\n\
//!      7,John Smith,john@example.com,30,Germany\n\
//!      8,Jane Doe,not-an-email,16,Mars\n",
//! )
//! .unwrap();
//!
//! let repository = InMemoryCustomerRepository::new();
//! let options = MigrationOptions::new(&input, dir.path().join("errors.xlsx"));
//! let summary = run_migration(&options, &repository).unwrap();
//!
//! assert_eq!(summary.stats.created, 1);
//! assert_eq!(summary.stats.validation_errors, 1);
//! assert_eq!(summary.report_entries, 1);
//! ```

use std::path::{Path, PathBuf};

use log::info;

use crate::{
    BatchError,
    core::{
        item::CompositeItemWriter,
        job::{Job, JobBuilder, JobExecution},
        step::StepBuilder,
    },
    customer::{
        processor::{CustomerProcessorBuilder, ProcessedRow},
        report::ErrorReportCollector,
        repository::CustomerRepository,
        row::RawRow,
        validator::CUSTOMER_COLUMNS,
        writer::{CustomerItemWriterBuilder, MigrationStats},
    },
    item::csv::CsvRowReaderBuilder,
    tasklet::report::ReportTasklet,
};

pub const IMPORT_STEP: &str = "import-customers";
pub const REPORT_STEP: &str = "write-error-report";

/// Settings of one migration run.
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// CSV file to import
    pub input: PathBuf,
    /// Where the `.xlsx` error report goes
    pub errors: PathBuf,
    pub delimiter: u8,
    /// Rows per chunk
    pub chunk_size: usize,
    /// Rows that may fail to be read or stored before the run aborts
    pub skip_limit: usize,
    /// Print running totals to stdout after every row
    pub progress: bool,
}

impl MigrationOptions {
    /// Options with a comma delimiter, chunks of 100 rows, no skip limit and
    /// no progress output.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(input: P, errors: Q) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            errors: errors.as_ref().to_path_buf(),
            delimiter: b',',
            chunk_size: 100,
            skip_limit: usize::MAX,
            progress: false,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct MigrationSummary {
    pub stats: MigrationStats,
    /// Rows written to the error report
    pub report_entries: usize,
    /// Rows skipped because they could not be read or stored
    pub skipped_rows: usize,
    pub execution: JobExecution,
}

/// Runs the migration against `repository`.
///
/// # Errors
///
/// - [`BatchError::Io`] if the input file cannot be opened
/// - [`BatchError::Step`] naming the step that failed, when the skip limit is
///   exceeded, the input breaks while being read, or the report cannot be
///   written
pub fn run_migration(
    options: &MigrationOptions,
    repository: &dyn CustomerRepository,
) -> Result<MigrationSummary, BatchError> {
    info!(
        "Migrating customers from {} (errors to {})",
        options.input.display(),
        options.errors.display()
    );

    let reader = CsvRowReaderBuilder::new()
        .delimiter(options.delimiter)
        .expected_columns(&CUSTOMER_COLUMNS)
        .from_path(&options.input)?;

    let processor = CustomerProcessorBuilder::new()
        .delimiter(char::from(options.delimiter))
        .build();

    let collector = ErrorReportCollector::new();
    let mut sink_builder = CustomerItemWriterBuilder::new().repository(repository);
    if options.progress {
        sink_builder = sink_builder.progress(std::io::stdout());
    }
    let sink = sink_builder.build();

    // The collector goes first so a failing store does not drop report entries.
    let writer = CompositeItemWriter::new(&collector, &sink);

    let import_step = StepBuilder::new(IMPORT_STEP)
        .chunk::<RawRow, ProcessedRow>(options.chunk_size)
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .skip_limit(options.skip_limit)
        .build();

    let report_tasklet = ReportTasklet::new(&collector, &options.errors);
    let report_step = StepBuilder::new(REPORT_STEP)
        .tasklet(&report_tasklet)
        .build();

    let job = JobBuilder::new()
        .name("customers-migration".to_string())
        .start(&import_step)
        .next(&report_step)
        .build();

    let execution = job.run()?;

    let skipped_rows = execution
        .step_execution(IMPORT_STEP)
        .map_or(0, |step| step.error_count());
    let stats = sink.stats();

    info!(
        "{}, duplicates {}, store failures {}, skipped {}",
        stats, stats.duplicates, stats.failed, skipped_rows
    );

    Ok(MigrationSummary {
        stats,
        report_entries: collector.len(),
        skipped_rows,
        execution,
    })
}
