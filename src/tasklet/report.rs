//! # Error Report Tasklet
//!
//! Writes the migration error report once the import step is over.
//!
//! The report is written even when no row failed, in which case the sheet
//! only holds its header row.
//!
//! ```rust
//! use customer_batch::core::step::{Step, StepBuilder, StepExecution, StepStatus};
//! use customer_batch::customer::report::ErrorReportCollector;
//! use customer_batch::tasklet::report::ReportTasklet;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let target = dir.path().join("out").join("errors.xlsx");
//!
//! let collector = ErrorReportCollector::new();
//! let tasklet = ReportTasklet::new(&collector, &target);
//!
//! let step = StepBuilder::new("write-report").tasklet(&tasklet).build();
//! let mut execution = StepExecution::new(step.get_name());
//! step.execute(&mut execution).unwrap();
//!
//! assert_eq!(execution.status, StepStatus::Success);
//! assert!(target.exists());
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    BatchError,
    core::step::{RepeatStatus, StepExecution, Tasklet},
    customer::report::{ErrorReportCollector, render_report},
};

/// Renders the collected entries and writes them to `target_path`.
///
/// Missing parent directories are created.
pub struct ReportTasklet<'a> {
    collector: &'a ErrorReportCollector,
    target_path: PathBuf,
}

impl<'a> ReportTasklet<'a> {
    pub fn new<P: AsRef<Path>>(collector: &'a ErrorReportCollector, target_path: P) -> Self {
        Self {
            collector,
            target_path: target_path.as_ref().to_path_buf(),
        }
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }
}

impl Tasklet for ReportTasklet<'_> {
    fn execute(&self, _step_execution: &StepExecution) -> Result<RepeatStatus, BatchError> {
        let entries = self.collector.entries();
        let bytes = render_report(&entries)?;

        if let Some(parent) = self.target_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.target_path, &bytes)?;

        info!(
            "Error report with {} entries written to {}",
            entries.len(),
            self.target_path.display()
        );
        Ok(RepeatStatus::Finished)
    }
}
