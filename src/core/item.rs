use crate::error::BatchError;

/// Result of reading one item: `Ok(None)` once the source is exhausted.
pub type ItemReaderResult<I> = Result<Option<I>, BatchError>;

/// Result of processing one item.
pub type ItemProcessorResult<O> = Result<O, BatchError>;

/// Result of a writer operation.
pub type ItemWriterResult = Result<(), BatchError>;

/// A source of items, read one at a time.
pub trait ItemReader<I> {
    /// Reads the next item.
    ///
    /// # Returns
    /// - `Ok(Some(item))` when an item was read
    /// - `Ok(None)` when there is nothing left to read
    /// - `Err(BatchError)` when the current item could not be read; the reader
    ///   stays usable and the next call moves on to the following item
    fn read(&self) -> ItemReaderResult<I>;
}

/// Business logic applied to every item between reading and writing.
pub trait ItemProcessor<I, O> {
    fn process(&self, item: &I) -> ItemProcessorResult<O>;
}

/// The output side of a step, receiving items one chunk at a time.
pub trait ItemWriter<O> {
    fn write(&self, items: &[O]) -> ItemWriterResult;

    fn flush(&self) -> ItemWriterResult {
        Ok(())
    }

    fn open(&self) -> ItemWriterResult {
        Ok(())
    }

    fn close(&self) -> ItemWriterResult {
        Ok(())
    }
}

/// Processor handing items through unchanged.
#[derive(Default)]
pub struct PassThroughProcessor;

impl<T: Clone> ItemProcessor<T, T> for PassThroughProcessor {
    fn process(&self, item: &T) -> ItemProcessorResult<T> {
        Ok(item.clone())
    }
}

/// Writer delegating every call to two writers, first then second.
///
/// The second writer only sees a chunk once the first one accepted it.
///
/// # Examples
///
/// ```
/// use customer_batch::core::item::{CompositeItemWriter, ItemWriter, ItemWriterResult};
/// use std::cell::RefCell;
///
/// #[derive(Default)]
/// struct Collect(RefCell<Vec<u32>>);
///
/// impl ItemWriter<u32> for Collect {
///     fn write(&self, items: &[u32]) -> ItemWriterResult {
///         self.0.borrow_mut().extend_from_slice(items);
///         Ok(())
///     }
/// }
///
/// let first = Collect::default();
/// let second = Collect::default();
/// let writer = CompositeItemWriter::new(&first, &second);
/// writer.write(&[1, 2]).unwrap();
///
/// assert_eq!(*first.0.borrow(), vec![1, 2]);
/// assert_eq!(*second.0.borrow(), vec![1, 2]);
/// ```
pub struct CompositeItemWriter<'a, O> {
    first: &'a dyn ItemWriter<O>,
    second: &'a dyn ItemWriter<O>,
}

impl<'a, O> CompositeItemWriter<'a, O> {
    pub fn new(first: &'a dyn ItemWriter<O>, second: &'a dyn ItemWriter<O>) -> Self {
        Self { first, second }
    }
}

impl<O> ItemWriter<O> for CompositeItemWriter<'_, O> {
    fn write(&self, items: &[O]) -> ItemWriterResult {
        self.first.write(items)?;
        self.second.write(items)
    }

    fn flush(&self) -> ItemWriterResult {
        self.first.flush()?;
        self.second.flush()
    }

    fn open(&self) -> ItemWriterResult {
        self.first.open()?;
        self.second.open()
    }

    fn close(&self) -> ItemWriterResult {
        // Both writers get closed even if the first one fails.
        let first = self.first.close();
        let second = self.second.close();
        first.and(second)
    }
}
