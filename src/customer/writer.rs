use std::{
    cell::{Cell, RefCell},
    fmt,
    io::Write,
};

use log::{debug, error};

use crate::{
    BatchError,
    core::item::{ItemWriter, ItemWriterResult},
};

use super::{processor::ProcessedRow, record::Customer, repository::CustomerRepository};

/// Running totals of a migration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationStats {
    /// Rows handed to the sink. Rows the reader skipped as malformed never
    /// get here and are only counted by the step.
    pub total: usize,
    /// Customers inserted
    pub created: usize,
    /// Rows with at least one failing field, tolerated ones included
    pub validation_errors: usize,
    /// Insertable rows skipped because their id was already stored
    pub duplicates: usize,
    /// Insertable rows the repository failed to check or store
    pub failed: usize,
}

impl fmt::Display for MigrationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Created {} of {} rows, validation errors {}",
            self.created, self.total, self.validation_errors
        )
    }
}

/// Persistence sink of the migration.
///
/// Rows are stored one at a time in the order they arrive. A row whose id is
/// already in the repository is skipped, including an id inserted earlier in
/// the same run.
pub struct CustomerItemWriter<'a> {
    repository: &'a dyn CustomerRepository,
    progress: RefCell<Option<Box<dyn Write + 'a>>>,
    stats: Cell<MigrationStats>,
}

impl CustomerItemWriter<'_> {
    pub fn stats(&self) -> MigrationStats {
        self.stats.get()
    }

    fn persist(&self, row: &ProcessedRow, stats: &mut MigrationStats) -> Result<(), BatchError> {
        stats.total += 1;
        if !row.outcome.is_valid() {
            stats.validation_errors += 1;
        }

        let result = match &row.customer {
            Some(customer) => self.store(row.line, customer, stats),
            None => Ok(()),
        };
        if result.is_err() {
            stats.failed += 1;
        }

        self.report_progress(stats)?;
        result
    }

    fn store(
        &self,
        line: u64,
        customer: &Customer,
        stats: &mut MigrationStats,
    ) -> Result<(), BatchError> {
        if self.repository.exists(customer.id)? {
            debug!("Line {}: customer {} already exists", line, customer.id);
            stats.duplicates += 1;
        } else {
            self.repository.insert(customer)?;
            stats.created += 1;
        }
        Ok(())
    }

    fn report_progress(&self, stats: &MigrationStats) -> Result<(), BatchError> {
        if let Some(progress) = self.progress.borrow_mut().as_mut() {
            writeln!(progress, "{}", stats)?;
        }
        Ok(())
    }
}

impl ItemWriter<ProcessedRow> for CustomerItemWriter<'_> {
    /// Stores every row of the chunk. A row the repository fails on is
    /// logged and skipped; the rows after it are still stored.
    fn write(&self, items: &[ProcessedRow]) -> ItemWriterResult {
        let mut stats = self.stats.get();
        let mut failed = 0;
        let mut last_error = None;

        for row in items {
            match self.persist(row, &mut stats) {
                Ok(()) => {}
                // Progress output is broken, nothing sensible to skip.
                Err(BatchError::Io(err)) => {
                    self.stats.set(stats);
                    return Err(BatchError::Io(err));
                }
                Err(err) => {
                    error!("Line {}: failed to persist customer: {}", row.line, err);
                    failed += 1;
                    last_error = Some(err);
                }
            }
        }
        self.stats.set(stats);

        match last_error {
            None => Ok(()),
            Some(err) => Err(BatchError::PartialWrite {
                failed,
                message: err.to_string(),
            }),
        }
    }

    fn flush(&self) -> ItemWriterResult {
        if let Some(progress) = self.progress.borrow_mut().as_mut() {
            progress.flush()?;
        }
        Ok(())
    }
}

/// Builder for [`CustomerItemWriter`].
///
/// # Examples
///
/// ```
/// use customer_batch::core::item::ItemWriter;
/// use customer_batch::customer::processor::ProcessedRow;
/// use customer_batch::customer::repository::InMemoryCustomerRepository;
/// use customer_batch::customer::writer::CustomerItemWriterBuilder;
///
/// let repository = InMemoryCustomerRepository::new();
/// let writer = CustomerItemWriterBuilder::new().repository(&repository).build();
///
/// writer.write(&[]).unwrap();
/// assert_eq!(writer.stats().total, 0);
/// ```
#[derive(Default)]
pub struct CustomerItemWriterBuilder<'a> {
    repository: Option<&'a dyn CustomerRepository>,
    progress: Option<Box<dyn Write + 'a>>,
}

impl<'a> CustomerItemWriterBuilder<'a> {
    pub fn new() -> Self {
        Self {
            repository: None,
            progress: None,
        }
    }

    pub fn repository(mut self, repository: &'a dyn CustomerRepository) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Prints the running totals to `progress` after every row.
    pub fn progress(mut self, progress: impl Write + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Builds the writer.
    ///
    /// # Panics
    ///
    /// Panics if no repository was set.
    pub fn build(self) -> CustomerItemWriter<'a> {
        CustomerItemWriter {
            repository: self.repository.expect("repository is required"),
            progress: RefCell::new(self.progress),
            stats: Cell::new(MigrationStats::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::customer::{
        record::Customer, repository::InMemoryCustomerRepository, validator::ValidationOutcome,
    };

    fn customer(id: i64) -> Customer {
        Customer {
            id,
            name: Some("Ann".to_string()),
            surname: Some("Lee".to_string()),
            email: None,
            age: Some(40),
            location: None,
            country_code: None,
        }
    }

    fn row(line: u64, failing: &[&str], customer: Option<Customer>) -> ProcessedRow {
        ProcessedRow {
            line,
            raw: String::new(),
            outcome: ValidationOutcome::new(failing.iter().copied()),
            customer,
        }
    }

    /// Write sink whose buffer stays readable after it is moved into the writer.
    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn stores_valid_rows_and_counts_them() {
        let repository = InMemoryCustomerRepository::new();
        let writer = CustomerItemWriterBuilder::new().repository(&repository).build();

        writer
            .write(&[row(2, &[], Some(customer(1))), row(3, &[], Some(customer(2)))])
            .unwrap();

        assert_eq!(repository.len(), 2);
        assert_eq!(
            writer.stats(),
            MigrationStats {
                total: 2,
                created: 2,
                validation_errors: 0,
                duplicates: 0,
                failed: 0,
            }
        );
    }

    #[test]
    fn rejected_rows_are_only_counted() {
        let repository = InMemoryCustomerRepository::new();
        let writer = CustomerItemWriterBuilder::new().repository(&repository).build();

        writer.write(&[row(2, &["email", "age"], None)]).unwrap();

        assert!(repository.is_empty());
        assert_eq!(writer.stats().validation_errors, 1);
        assert_eq!(writer.stats().created, 0);
    }

    #[test]
    fn tolerated_rows_are_stored_and_counted_as_errors() {
        let repository = InMemoryCustomerRepository::new();
        let writer = CustomerItemWriterBuilder::new().repository(&repository).build();

        writer.write(&[row(2, &["location"], Some(customer(9)))]).unwrap();

        assert_eq!(repository.len(), 1);
        assert_eq!(writer.stats().created, 1);
        assert_eq!(writer.stats().validation_errors, 1);
    }

    #[test]
    fn existing_ids_are_skipped() {
        let mut stored = customer(1);
        stored.name = Some("Original".to_string());
        let repository = InMemoryCustomerRepository::with_customers([stored.clone()]);
        let writer = CustomerItemWriterBuilder::new().repository(&repository).build();

        writer.write(&[row(2, &[], Some(customer(1)))]).unwrap();

        assert_eq!(repository.get(1), Some(stored));
        assert_eq!(writer.stats().duplicates, 1);
        assert_eq!(writer.stats().created, 0);
    }

    #[test]
    fn duplicate_ids_within_a_run_keep_the_first_row() {
        let repository = InMemoryCustomerRepository::new();
        let writer = CustomerItemWriterBuilder::new().repository(&repository).build();

        let mut second = customer(4);
        second.name = Some("Second".to_string());
        writer
            .write(&[row(2, &[], Some(customer(4))), row(3, &[], Some(second))])
            .unwrap();

        assert_eq!(repository.get(4).unwrap().name.as_deref(), Some("Ann"));
        assert_eq!(writer.stats().created, 1);
        assert_eq!(writer.stats().duplicates, 1);
    }

    #[test]
    fn stats_accumulate_across_chunks() {
        let repository = InMemoryCustomerRepository::new();
        let writer = CustomerItemWriterBuilder::new().repository(&repository).build();

        writer.write(&[row(2, &[], Some(customer(1)))]).unwrap();
        writer.write(&[row(3, &["id"], None)]).unwrap();

        assert_eq!(writer.stats().total, 2);
        assert_eq!(writer.stats().to_string(), "Created 1 of 2 rows, validation errors 1");
    }

    /// Repository refusing one id and storing the others.
    struct RefusingRepository {
        refused: i64,
        inner: InMemoryCustomerRepository,
    }

    impl CustomerRepository for RefusingRepository {
        fn exists(&self, id: i64) -> Result<bool, BatchError> {
            self.inner.exists(id)
        }

        fn insert(&self, customer: &Customer) -> Result<(), BatchError> {
            if customer.id == self.refused {
                return Err(BatchError::Database("UNIQUE constraint failed".to_string()));
            }
            self.inner.insert(customer)
        }
    }

    #[test]
    fn a_failing_row_does_not_stop_the_chunk() {
        let repository = RefusingRepository {
            refused: 1,
            inner: InMemoryCustomerRepository::new(),
        };
        let writer = CustomerItemWriterBuilder::new().repository(&repository).build();

        let result = writer.write(&[
            row(2, &[], Some(customer(1))),
            row(3, &[], Some(customer(2))),
            row(4, &[], Some(customer(3))),
        ]);

        match result {
            Err(BatchError::PartialWrite { failed, message }) => {
                assert_eq!(failed, 1);
                assert!(message.contains("UNIQUE"));
            }
            other => panic!("Expected BatchError::PartialWrite, got {:?}", other),
        }
        assert_eq!(
            repository.inner.customers().iter().map(|c| c.id).collect::<Vec<_>>(),
            [2, 3]
        );
        assert_eq!(writer.stats().created, 2);
        assert_eq!(writer.stats().failed, 1);
        assert_eq!(writer.stats().total, 3);
    }

    #[test]
    fn progress_is_printed_after_every_row() {
        let repository = InMemoryCustomerRepository::new();
        let buffer = SharedBuffer::default();
        let writer = CustomerItemWriterBuilder::new()
            .repository(&repository)
            .progress(buffer.clone())
            .build();

        writer
            .write(&[row(2, &[], Some(customer(1))), row(3, &["age"], None)])
            .unwrap();
        writer.flush().unwrap();

        let output = String::from_utf8(buffer.0.borrow().clone()).unwrap();
        assert_eq!(
            output,
            "Created 1 of 1 rows, validation errors 0\nCreated 1 of 2 rows, validation errors 1\n"
        );
    }
}
