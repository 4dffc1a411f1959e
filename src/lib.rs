#![cfg_attr(docsrs, feature(doc_cfg))]
//#![warn(missing_docs)]

/*!
 # Customer Batch

 A one-shot batch migration of customer records: read a CSV file, validate
 every row, insert the new customers into a relational store and write the
 rows that failed validation to a spreadsheet report.

 The migration is built on a small chunk-oriented batch toolkit.

 ## Core Concepts

- **Job:** the whole migration. A `Job` runs its `Step`s in order and stops at the first failure.
- **Step:** one phase of the job. A chunk-oriented step reads, processes and writes items
  chunk by chunk; a tasklet step runs a single task.
- **ItemReader:** produces the input of a step one item at a time (here, one CSV row).
- **ItemProcessor:** turns an item into the step output (here, a validated row and the customer to store).
- **ItemWriter:** consumes the output one chunk at a time (here, the store and the error report).

 ## Row handling

| Failing fields               | Stored                                  | In error report |
|------------------------------|-----------------------------------------|-----------------|
| none                         | yes, unless the id already exists       | no              |
| `location` only              | yes, location `Unknown`, no country code | yes            |
| anything else                | no                                      | yes             |

 ## Features

| **Feature**   | **Description**                                          |
|---------------|----------------------------------------------------------|
| csv           | Enables the CSV row reader                               |
| rdbc-sqlite   | Enables the SQLite customer repository                   |
| xlsx          | Enables the spreadsheet renderer and the report tasklet  |
| full          | Enables all available features                           |

 ## Getting Started

```rust
use customer_batch::core::item::CompositeItemWriter;
use customer_batch::core::job::{Job, JobBuilder};
use customer_batch::core::step::StepBuilder;
use customer_batch::customer::processor::{CustomerProcessor, ProcessedRow};
use customer_batch::customer::report::ErrorReportCollector;
use customer_batch::customer::repository::InMemoryCustomerRepository;
use customer_batch::customer::row::RawRow;
use customer_batch::customer::writer::CustomerItemWriterBuilder;
use customer_batch::item::csv::CsvRowReaderBuilder;
use customer_batch::BatchError;

fn main() -> Result<(), BatchError> {
    let csv = "id,name,email,age,location
7,John Smith,john@example.com,30,Germany
8,Jane Doe,not-an-email,16,Mars
9,Bob,,,Atlantis";

    let reader = CsvRowReaderBuilder::new().from_reader(csv.as_bytes())?;
    let processor = CustomerProcessor::default();

    let repository = InMemoryCustomerRepository::new();
    let sink = CustomerItemWriterBuilder::new().repository(&repository).build();
    let collector = ErrorReportCollector::new();
    let writer = CompositeItemWriter::new(&collector, &sink);

    let step = StepBuilder::new("import-customers")
        .chunk::<RawRow, ProcessedRow>(100)
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .build();

    let job = JobBuilder::new().start(&step).build();
    job.run()?;

    assert_eq!(sink.stats().created, 2);
    assert_eq!(repository.get(9).unwrap().location.as_deref(), Some("Unknown"));
    assert_eq!(collector.len(), 2);
    Ok(())
}
```

 The `customers-migration` binary wires the same job to a SQLite database and
 writes the error report with [`tasklet::report::ReportTasklet`]; see
 [`migration::run_migration`].
 */

/// Core module for batch operations
pub mod core;

/// Error types for batch operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Customer records, validation and reporting
pub mod customer;

/// Set of item readers and writers (csv reader, sqlite store, xlsx renderer)
pub mod item;

/// Set of tasklets
pub mod tasklet;

#[cfg(all(feature = "csv", feature = "xlsx"))]
pub mod migration;
