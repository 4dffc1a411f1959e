use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::BatchError;

use super::{
    build_name,
    item::{ItemProcessor, ItemReader, ItemWriter},
};

/// Status of a step execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// The step has been created but not run yet.
    Starting,
    /// The step is running.
    Started,
    /// The step ran to completion.
    Success,
    /// The step stopped because reading failed too often.
    ReadError,
    /// The step stopped because processing failed too often.
    ProcessorError,
    /// The step stopped because writing failed too often, or the writer could not be opened or closed.
    WriteError,
    /// The tasklet of the step failed.
    TaskletError,
}

/// Whether a tasklet wants to be called again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatStatus {
    /// The tasklet can continue to execute.
    Continuable,
    /// The tasklet has finished executing.
    Finished,
}

/// Upper bound on the items reserved up front for a chunk.
const MAX_PREALLOCATED_ITEMS: usize = 1024;

#[derive(Debug, PartialEq)]
enum ChunkStatus {
    /// The chunk reached its size, more items may follow.
    Full,
    /// The reader is exhausted.
    Finished,
}

/// Execution details of one run of a step.
#[derive(Debug, Clone)]
pub struct StepExecution {
    /// Unique identifier for this step execution
    pub id: Uuid,
    /// Human-readable name for the step
    pub name: String,
    /// Current status of the step execution
    pub status: StepStatus,
    pub start_time: Instant,
    pub end_time: Instant,
    pub duration: Duration,
    /// Number of items successfully read
    pub read_count: usize,
    /// Number of items successfully written
    pub write_count: usize,
    /// Number of errors encountered during reading
    pub read_error_count: usize,
    /// Number of errors encountered during processing
    pub process_error_count: usize,
    /// Number of items whose write failed
    pub write_error_count: usize,
}

impl StepExecution {
    pub fn new(name: &str) -> Self {
        let now = Instant::now();
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            status: StepStatus::Starting,
            start_time: now,
            end_time: now,
            duration: Duration::default(),
            read_count: 0,
            write_count: 0,
            read_error_count: 0,
            process_error_count: 0,
            write_error_count: 0,
        }
    }

    /// Total number of read, process and write errors.
    pub fn error_count(&self) -> usize {
        self.read_error_count + self.process_error_count + self.write_error_count
    }
}

/// An independent, sequential phase of a job.
pub trait Step {
    fn get_name(&self) -> &str;

    /// Executes the step, recording counts and status into `step_execution`.
    ///
    /// # Returns
    /// - `Ok(())`: the step completed successfully
    /// - `Err(BatchError::Step)`: the step failed, `step_execution.status` tells why
    fn execute(&self, step_execution: &mut StepExecution) -> Result<(), BatchError>;
}

/// A single unit of work not following the read/process/write pattern.
pub trait Tasklet {
    fn execute(&self, step_execution: &StepExecution) -> Result<RepeatStatus, BatchError>;
}

/// Step running a tasklet until it reports [`RepeatStatus::Finished`].
pub struct TaskletStep<'a> {
    name: String,
    tasklet: &'a dyn Tasklet,
}

impl Step for TaskletStep<'_> {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn execute(&self, step_execution: &mut StepExecution) -> Result<(), BatchError> {
        let start_time = Instant::now();
        step_execution.status = StepStatus::Started;
        info!(
            "Start of step: {}, id: {}",
            step_execution.name, step_execution.id
        );

        loop {
            match self.tasklet.execute(step_execution) {
                Ok(RepeatStatus::Continuable) => continue,
                Ok(RepeatStatus::Finished) => {
                    step_execution.status = StepStatus::Success;
                    break;
                }
                Err(err) => {
                    error!("Tasklet of step {} failed: {}", self.name, err);
                    step_execution.status = StepStatus::TaskletError;
                    break;
                }
            }
        }

        info!(
            "End of step: {}, id: {}",
            step_execution.name, step_execution.id
        );
        step_execution.start_time = start_time;
        step_execution.end_time = Instant::now();
        step_execution.duration = start_time.elapsed();

        if step_execution.status == StepStatus::Success {
            Ok(())
        } else {
            Err(BatchError::Step(self.name.clone()))
        }
    }
}

/// Step reading, processing and writing items chunk by chunk.
pub struct ChunkOrientedStep<'a, I, O> {
    name: String,
    /// Component responsible for reading items from the source
    reader: &'a dyn ItemReader<I>,
    /// Component responsible for processing items
    processor: &'a dyn ItemProcessor<I, O>,
    /// Component responsible for writing items to the destination
    writer: &'a dyn ItemWriter<O>,
    /// Number of items to process in each chunk
    chunk_size: usize,
    /// Maximum number of errors allowed before failing the step
    skip_limit: usize,
}

impl<I, O> Step for ChunkOrientedStep<'_, I, O> {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn execute(&self, step_execution: &mut StepExecution) -> Result<(), BatchError> {
        let start_time = Instant::now();
        step_execution.status = StepStatus::Started;

        info!(
            "Start of step: {}, id: {}",
            step_execution.name, step_execution.id
        );

        if let Err(err) = self.writer.open() {
            error!("Unable to open writer of step {}: {}", self.name, err);
            step_execution.status = StepStatus::WriteError;
        } else {
            self.run_chunks(step_execution);

            if let Err(err) = self.writer.close() {
                error!("Unable to close writer of step {}: {}", self.name, err);
                step_execution.status = StepStatus::WriteError;
            }
        }

        info!(
            "End of step: {}, id: {}, read: {}, written: {}, errors: {}",
            step_execution.name,
            step_execution.id,
            step_execution.read_count,
            step_execution.write_count,
            step_execution.error_count()
        );

        step_execution.start_time = start_time;
        step_execution.end_time = Instant::now();
        step_execution.duration = start_time.elapsed();

        if step_execution.status == StepStatus::Success {
            Ok(())
        } else {
            Err(BatchError::Step(self.name.clone()))
        }
    }
}

impl<I, O> ChunkOrientedStep<'_, I, O> {
    fn run_chunks(&self, step_execution: &mut StepExecution) {
        loop {
            let (read_items, chunk_status) = match self.read_chunk(step_execution) {
                Ok(chunk) => chunk,
                Err(_) => {
                    step_execution.status = StepStatus::ReadError;
                    return;
                }
            };

            if !read_items.is_empty() {
                let processed_items = match self.process_chunk(step_execution, &read_items) {
                    Ok(items) => items,
                    Err(_) => {
                        step_execution.status = StepStatus::ProcessorError;
                        return;
                    }
                };

                if self.write_chunk(step_execution, &processed_items).is_err() {
                    step_execution.status = StepStatus::WriteError;
                    return;
                }
            }

            if chunk_status == ChunkStatus::Finished {
                step_execution.status = StepStatus::Success;
                return;
            }
        }
    }

    /// Reads up to `chunk_size` items.
    ///
    /// Read errors are skipped until the skip limit is exceeded, in which case
    /// the last error is returned. An I/O error is returned at once.
    fn read_chunk(
        &self,
        step_execution: &mut StepExecution,
    ) -> Result<(Vec<I>, ChunkStatus), BatchError> {
        debug!("Start reading chunk");

        let mut read_items = Vec::with_capacity(self.chunk_size.min(MAX_PREALLOCATED_ITEMS));

        loop {
            match self.reader.read() {
                Ok(Some(item)) => {
                    read_items.push(item);
                    step_execution.read_count += 1;

                    if read_items.len() >= self.chunk_size {
                        debug!("End reading chunk: FULL");
                        return Ok((read_items, ChunkStatus::Full));
                    }
                }
                Ok(None) => {
                    debug!("End reading chunk: FINISHED");
                    return Ok((read_items, ChunkStatus::Finished));
                }
                Err(err @ BatchError::Io(_)) => {
                    error!("Input of step {} failed: {}", self.name, err);
                    step_execution.read_error_count += 1;
                    return Err(err);
                }
                Err(err) => {
                    warn!("Skipping unreadable item: {}", err);
                    step_execution.read_error_count += 1;

                    if self.is_skip_limit_reached(step_execution) {
                        error!("Skip limit of {} reached while reading", self.skip_limit);
                        return Err(err);
                    }
                }
            }
        }
    }

    fn process_chunk(
        &self,
        step_execution: &mut StepExecution,
        read_items: &[I],
    ) -> Result<Vec<O>, BatchError> {
        debug!("Processing chunk of {} items", read_items.len());
        let mut result = Vec::with_capacity(read_items.len());

        for item in read_items {
            match self.processor.process(item) {
                Ok(processed_item) => result.push(processed_item),
                Err(err) => {
                    warn!("Error processing item: {}", err);
                    step_execution.process_error_count += 1;

                    if self.is_skip_limit_reached(step_execution) {
                        error!("Skip limit of {} reached while processing", self.skip_limit);
                        return Err(err);
                    }
                }
            }
        }

        Ok(result)
    }

    fn write_chunk(
        &self,
        step_execution: &mut StepExecution,
        processed_items: &[O],
    ) -> Result<(), BatchError> {
        if processed_items.is_empty() {
            debug!("No items to write, skipping write call");
            return Ok(());
        }

        debug!("Writing chunk of {} items", processed_items.len());

        // Flushed even after a failed write, the items that made it are kept.
        let written = self.writer.write(processed_items);
        let flushed = self.writer.flush();

        match written.and(flushed) {
            Ok(()) => {
                step_execution.write_count += processed_items.len();
                Ok(())
            }
            Err(err) => {
                warn!("Error writing items: {}", err);
                // A partial write names the refused items; anything else loses the chunk.
                let failed = match &err {
                    BatchError::PartialWrite { failed, .. } => (*failed).min(processed_items.len()),
                    _ => processed_items.len(),
                };
                step_execution.write_count += processed_items.len() - failed;
                step_execution.write_error_count += failed;

                if self.is_skip_limit_reached(step_execution) {
                    error!("Skip limit of {} reached while writing", self.skip_limit);
                    return Err(err);
                }
                Ok(())
            }
        }
    }

    fn is_skip_limit_reached(&self, step_execution: &StepExecution) -> bool {
        step_execution.error_count() > self.skip_limit
    }
}

/// Entry point for building steps.
///
/// # Examples
///
/// ```
/// use customer_batch::core::item::{ItemReader, ItemReaderResult, ItemWriter, ItemWriterResult, PassThroughProcessor};
/// use customer_batch::core::step::{Step, StepBuilder, StepExecution, StepStatus};
/// use std::cell::{Cell, RefCell};
///
/// struct Countdown(Cell<u32>);
///
/// impl ItemReader<u32> for Countdown {
///     fn read(&self) -> ItemReaderResult<u32> {
///         let n = self.0.get();
///         if n == 0 {
///             return Ok(None);
///         }
///         self.0.set(n - 1);
///         Ok(Some(n))
///     }
/// }
///
/// #[derive(Default)]
/// struct Sink(RefCell<Vec<u32>>);
///
/// impl ItemWriter<u32> for Sink {
///     fn write(&self, items: &[u32]) -> ItemWriterResult {
///         self.0.borrow_mut().extend_from_slice(items);
///         Ok(())
///     }
/// }
///
/// let reader = Countdown(Cell::new(5));
/// let processor = PassThroughProcessor;
/// let writer = Sink::default();
///
/// let step = StepBuilder::new("countdown")
///     .chunk::<u32, u32>(2)
///     .reader(&reader)
///     .processor(&processor)
///     .writer(&writer)
///     .build();
///
/// let mut execution = StepExecution::new(step.get_name());
/// step.execute(&mut execution).unwrap();
///
/// assert_eq!(execution.status, StepStatus::Success);
/// assert_eq!(*writer.0.borrow(), vec![5, 4, 3, 2, 1]);
/// ```
pub struct StepBuilder {
    name: String,
}

impl StepBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Builder for a step with a random name.
    pub fn unnamed() -> Self {
        Self::new(&build_name())
    }

    pub fn tasklet(self, tasklet: &dyn Tasklet) -> TaskletStepBuilder<'_> {
        TaskletStepBuilder {
            name: self.name,
            tasklet: Some(tasklet),
        }
    }

    pub fn chunk<'a, I, O>(self, chunk_size: usize) -> ChunkOrientedStepBuilder<'a, I, O> {
        ChunkOrientedStepBuilder::new(&self.name).chunk_size(chunk_size)
    }
}

pub struct TaskletStepBuilder<'a> {
    name: String,
    tasklet: Option<&'a dyn Tasklet>,
}

impl<'a> TaskletStepBuilder<'a> {
    pub fn build(self) -> TaskletStep<'a> {
        TaskletStep {
            name: self.name,
            tasklet: self
                .tasklet
                .expect("Tasklet is required for building a step"),
        }
    }
}

pub struct ChunkOrientedStepBuilder<'a, I, O> {
    name: String,
    reader: Option<&'a dyn ItemReader<I>>,
    processor: Option<&'a dyn ItemProcessor<I, O>>,
    writer: Option<&'a dyn ItemWriter<O>>,
    chunk_size: usize,
    skip_limit: usize,
}

impl<'a, I, O> ChunkOrientedStepBuilder<'a, I, O> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            reader: None,
            processor: None,
            writer: None,
            chunk_size: 10,
            skip_limit: 0,
        }
    }

    pub fn reader(mut self, reader: &'a dyn ItemReader<I>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn processor(mut self, processor: &'a dyn ItemProcessor<I, O>) -> Self {
        self.processor = Some(processor);
        self
    }

    pub fn writer(mut self, writer: &'a dyn ItemWriter<O>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Commit interval; values below 1 are raised to 1.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn skip_limit(mut self, skip_limit: usize) -> Self {
        self.skip_limit = skip_limit;
        self
    }

    pub fn build(self) -> ChunkOrientedStep<'a, I, O> {
        ChunkOrientedStep {
            name: self.name,
            reader: self.reader.expect("Reader is required for building a step"),
            processor: self
                .processor
                .expect("Processor is required for building a step"),
            writer: self.writer.expect("Writer is required for building a step"),
            chunk_size: self.chunk_size,
            skip_limit: self.skip_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::core::item::{ItemReaderResult, ItemWriterResult, PassThroughProcessor};

    /// Yields the given items, `Err` entries becoming read errors.
    struct ScriptedReader {
        items: RefCell<Vec<Result<u32, ()>>>,
    }

    impl ScriptedReader {
        fn new(mut items: Vec<Result<u32, ()>>) -> Self {
            items.reverse();
            Self {
                items: RefCell::new(items),
            }
        }
    }

    impl ItemReader<u32> for ScriptedReader {
        fn read(&self) -> ItemReaderResult<u32> {
            match self.items.borrow_mut().pop() {
                Some(Ok(item)) => Ok(Some(item)),
                Some(Err(())) => Err(BatchError::ItemReader("bad item".to_string())),
                None => Ok(None),
            }
        }
    }

    #[derive(Default)]
    struct VecWriter {
        chunks: RefCell<Vec<Vec<u32>>>,
        fail: bool,
        refused: Option<u32>,
        opened: Cell<bool>,
        closed: Cell<bool>,
    }

    impl ItemWriter<u32> for VecWriter {
        fn write(&self, items: &[u32]) -> ItemWriterResult {
            if self.fail {
                return Err(BatchError::ItemWriter("store down".to_string()));
            }
            let kept: Vec<u32> = items
                .iter()
                .copied()
                .filter(|item| Some(*item) != self.refused)
                .collect();
            let failed = items.len() - kept.len();
            self.chunks.borrow_mut().push(kept);
            if failed > 0 {
                return Err(BatchError::PartialWrite {
                    failed,
                    message: "duplicate key".to_string(),
                });
            }
            Ok(())
        }

        fn open(&self) -> ItemWriterResult {
            self.opened.set(true);
            Ok(())
        }

        fn close(&self) -> ItemWriterResult {
            self.closed.set(true);
            Ok(())
        }
    }

    struct CountingTasklet {
        calls: Cell<u32>,
        finish_after: u32,
    }

    impl Tasklet for CountingTasklet {
        fn execute(&self, _step_execution: &StepExecution) -> Result<RepeatStatus, BatchError> {
            self.calls.set(self.calls.get() + 1);
            if self.calls.get() >= self.finish_after {
                Ok(RepeatStatus::Finished)
            } else {
                Ok(RepeatStatus::Continuable)
            }
        }
    }

    struct FailingTasklet;

    impl Tasklet for FailingTasklet {
        fn execute(&self, _step_execution: &StepExecution) -> Result<RepeatStatus, BatchError> {
            Err(BatchError::Tasklet("disk full".to_string()))
        }
    }

    #[test]
    fn chunks_are_written_in_order() {
        let reader = ScriptedReader::new(vec![Ok(1), Ok(2), Ok(3), Ok(4), Ok(5)]);
        let processor = PassThroughProcessor;
        let writer = VecWriter::default();

        let step = StepBuilder::new("chunks")
            .chunk::<u32, u32>(2)
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .build();

        let mut execution = StepExecution::new(step.get_name());
        assert!(step.execute(&mut execution).is_ok());

        assert_eq!(execution.status, StepStatus::Success);
        assert_eq!(execution.read_count, 5);
        assert_eq!(execution.write_count, 5);
        assert_eq!(*writer.chunks.borrow(), vec![vec![1, 2], vec![3, 4], vec![5]]);
        assert!(writer.opened.get());
        assert!(writer.closed.get());
    }

    #[test]
    fn empty_reader_succeeds_without_writing() {
        let reader = ScriptedReader::new(vec![]);
        let processor = PassThroughProcessor;
        let writer = VecWriter::default();

        let step = StepBuilder::new("empty")
            .chunk::<u32, u32>(3)
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .build();

        let mut execution = StepExecution::new(step.get_name());
        assert!(step.execute(&mut execution).is_ok());
        assert!(writer.chunks.borrow().is_empty());
    }

    #[test]
    fn read_errors_within_skip_limit_are_skipped() {
        let reader = ScriptedReader::new(vec![Ok(1), Err(()), Ok(3), Err(())]);
        let processor = PassThroughProcessor;
        let writer = VecWriter::default();

        let step = StepBuilder::new("skip")
            .chunk::<u32, u32>(10)
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .skip_limit(2)
            .build();

        let mut execution = StepExecution::new(step.get_name());
        assert!(step.execute(&mut execution).is_ok());
        assert_eq!(execution.read_count, 2);
        assert_eq!(execution.read_error_count, 2);
        assert_eq!(*writer.chunks.borrow(), vec![vec![1, 3]]);
    }

    #[test]
    fn read_errors_beyond_skip_limit_fail_the_step() {
        let reader = ScriptedReader::new(vec![Ok(1), Err(()), Ok(3)]);
        let processor = PassThroughProcessor;
        let writer = VecWriter::default();

        let step = StepBuilder::new("strict")
            .chunk::<u32, u32>(10)
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .build();

        let mut execution = StepExecution::new(step.get_name());
        let result = step.execute(&mut execution);

        assert!(matches!(result, Err(BatchError::Step(name)) if name == "strict"));
        assert_eq!(execution.status, StepStatus::ReadError);
        assert!(writer.chunks.borrow().is_empty());
        assert!(writer.closed.get());
    }

    struct BrokenInput;

    impl ItemReader<u32> for BrokenInput {
        fn read(&self) -> ItemReaderResult<u32> {
            Err(BatchError::Io(std::io::Error::other("connection reset")))
        }
    }

    #[test]
    fn io_errors_fail_the_step_whatever_the_skip_limit() {
        let processor = PassThroughProcessor;
        let writer = VecWriter::default();

        let step = StepBuilder::new("input")
            .chunk::<u32, u32>(10)
            .reader(&BrokenInput)
            .processor(&processor)
            .writer(&writer)
            .skip_limit(usize::MAX)
            .build();

        let mut execution = StepExecution::new(step.get_name());
        assert!(step.execute(&mut execution).is_err());
        assert_eq!(execution.status, StepStatus::ReadError);
        assert_eq!(execution.read_error_count, 1);
    }

    #[test]
    fn write_errors_fail_the_step() {
        let reader = ScriptedReader::new(vec![Ok(1)]);
        let processor = PassThroughProcessor;
        let writer = VecWriter {
            fail: true,
            ..VecWriter::default()
        };

        let step = StepBuilder::new("write")
            .chunk::<u32, u32>(1)
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .build();

        let mut execution = StepExecution::new(step.get_name());
        assert!(step.execute(&mut execution).is_err());
        assert_eq!(execution.status, StepStatus::WriteError);
        assert_eq!(execution.write_error_count, 1);
    }

    #[test]
    fn partial_write_counts_only_the_refused_items() {
        let reader = ScriptedReader::new(vec![Ok(1), Ok(2), Ok(3), Ok(4)]);
        let processor = PassThroughProcessor;
        let writer = VecWriter {
            refused: Some(1),
            ..VecWriter::default()
        };

        let step = StepBuilder::new("partial")
            .chunk::<u32, u32>(3)
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .skip_limit(1)
            .build();

        let mut execution = StepExecution::new(step.get_name());
        assert!(step.execute(&mut execution).is_ok());
        assert_eq!(execution.write_error_count, 1);
        assert_eq!(execution.write_count, 3);
        assert_eq!(*writer.chunks.borrow(), vec![vec![2, 3], vec![4]]);
    }

    #[test]
    fn partial_write_beyond_skip_limit_fails_the_step() {
        let reader = ScriptedReader::new(vec![Ok(1), Ok(2)]);
        let processor = PassThroughProcessor;
        let writer = VecWriter {
            refused: Some(2),
            ..VecWriter::default()
        };

        let step = StepBuilder::new("partial")
            .chunk::<u32, u32>(2)
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .build();

        let mut execution = StepExecution::new(step.get_name());
        assert!(step.execute(&mut execution).is_err());
        assert_eq!(execution.status, StepStatus::WriteError);
        assert_eq!(execution.write_error_count, 1);
        assert_eq!(execution.write_count, 1);
    }

    #[test]
    fn huge_chunk_size_does_not_reserve_memory_up_front() {
        let reader = ScriptedReader::new(vec![Ok(1), Ok(2)]);
        let processor = PassThroughProcessor;
        let writer = VecWriter::default();

        let step = StepBuilder::new("huge")
            .chunk::<u32, u32>(1 << 60)
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .build();

        let mut execution = StepExecution::new(step.get_name());
        assert!(step.execute(&mut execution).is_ok());
        assert_eq!(*writer.chunks.borrow(), vec![vec![1, 2]]);
    }

    #[test]
    fn tasklet_runs_until_finished() {
        let tasklet = CountingTasklet {
            calls: Cell::new(0),
            finish_after: 3,
        };
        let step = StepBuilder::new("tasklet").tasklet(&tasklet).build();

        let mut execution = StepExecution::new(step.get_name());
        assert!(step.execute(&mut execution).is_ok());
        assert_eq!(tasklet.calls.get(), 3);
        assert_eq!(execution.status, StepStatus::Success);
    }

    #[test]
    fn failing_tasklet_fails_the_step() {
        let step = StepBuilder::new("broken").tasklet(&FailingTasklet).build();

        let mut execution = StepExecution::new(step.get_name());
        assert!(step.execute(&mut execution).is_err());
        assert_eq!(execution.status, StepStatus::TaskletError);
    }

    #[test]
    fn unnamed_builder_generates_a_name() {
        let step = StepBuilder::unnamed().tasklet(&FailingTasklet).build();
        assert_eq!(step.get_name().len(), 8);
    }
}
