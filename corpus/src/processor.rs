//! Resumable streaming record processor.
//!
//! A run loads the whole input, processes records in order and appends each
//! success to the results sink. Whatever was not committed (the failing
//! record, everything after it, or everything after the limit) is written
//! back and replaces the input when the run ends. Re-running the same
//! command resumes where the previous run stopped.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Error, RunError};
use crate::format::Format;
use crate::record::{RawRecord, Tabular};
use crate::sink::ResultsSink;
use crate::store::{RecordStore, RequeueBuffer};

/// Per-record work of a job.
#[async_trait]
pub trait RecordProcessor: Send + Sync {
    /// Record appended to the sink on success.
    type Output: Serialize + Tabular + Send;

    /// Processes the record at `index`. Any error requeues it.
    async fn process(&self, index: usize, record: &RawRecord) -> anyhow::Result<Self::Output>;
}

/// How a run ended.
#[derive(Debug)]
pub enum Outcome {
    /// Every record was committed.
    Completed,
    /// The record at `index` was the last one allowed by the limit.
    LimitReached { index: usize },
    /// The record at `index` failed. It and all later records were requeued.
    RowFailed { index: usize, cause: anyhow::Error },
    /// Input, sink or requeue I/O failed.
    Fatal(Error),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }

    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Completed => 0,
            _ => 1,
        }
    }

    pub fn into_result(self) -> Result<(), RunError> {
        match self {
            Outcome::Completed => Ok(()),
            Outcome::LimitReached { index } => Err(RunError::LimitReached { index }),
            Outcome::RowFailed { index, cause } => Err(RunError::RowFailed { index, cause }),
            Outcome::Fatal(e) => Err(RunError::Fatal(e)),
        }
    }
}

/// Summary of a run.
#[derive(Debug)]
pub struct RunReport {
    pub outcome: Outcome,
    /// Records in the input at start.
    pub total: usize,
    /// Records appended to the sink.
    pub processed: usize,
    /// Records written back to the input.
    pub requeued: usize,
}

impl RunReport {
    fn fatal(total: usize, error: Error) -> Self {
        Self {
            outcome: Outcome::Fatal(error),
            total,
            processed: 0,
            requeued: 0,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }

    pub fn into_result(self) -> Result<(), RunError> {
        self.outcome.into_result()
    }
}

/// Where iteration over the snapshot stopped.
enum Stop {
    Exhausted,
    Limit(usize),
    Row(usize, anyhow::Error),
    Fatal(usize, Error),
}

impl Stop {
    /// First index that must be requeued.
    fn requeue_from(&self, len: usize) -> usize {
        match self {
            Stop::Exhausted => len,
            Stop::Limit(index) => index + 1,
            Stop::Row(index, _) | Stop::Fatal(index, _) => *index,
        }
    }
}

/// Drives a [`RecordProcessor`] over a [`RecordStore`] into a results sink.
#[derive(Debug, Clone)]
pub struct Runner {
    store: RecordStore,
    sink_path: PathBuf,
    sink_format: Format,
    limit: Option<usize>,
}

impl Runner {
    pub fn new(store: RecordStore, sink_path: impl Into<PathBuf>) -> Self {
        let sink_path = sink_path.into();
        let sink_format = Format::from_path(&sink_path);
        Self {
            store,
            sink_path,
            sink_format,
            limit: None,
        }
    }

    /// Stops after the record at this 0-based index is committed.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Runs the processor to completion, limit, or first failure.
    ///
    /// Records are processed one at a time. The input file is replaced
    /// exactly once, after iteration stops.
    pub async fn run<P: RecordProcessor>(&self, processor: &P) -> RunReport {
        let snapshot = match self.store.load() {
            Ok(snapshot) => snapshot,
            Err(e) => return RunReport::fatal(0, e),
        };
        let total = snapshot.len();

        let buffer = match self.store.requeue_buffer(snapshot.header.as_deref()) {
            Ok(buffer) => buffer,
            Err(e) => return RunReport::fatal(total, e),
        };

        if snapshot.is_empty() {
            info!(path = %self.store.path().display(), "input is empty, nothing to process");
            return self.finish(buffer, &[], 0, Stop::Exhausted);
        }

        info!(
            input = %self.store.path().display(),
            output = %self.sink_path.display(),
            total,
            limit = ?self.limit,
            "processing records"
        );

        let records = snapshot.records;
        let (processed, stop) =
            match ResultsSink::<P::Output>::open_with_format(&self.sink_path, self.sink_format) {
                Ok(mut sink) => self.iterate(processor, &records, &mut sink).await,
                Err(e) => (0, Stop::Fatal(0, e)),
            };
        self.finish(buffer, &records, processed, stop)
    }

    async fn iterate<P: RecordProcessor>(
        &self,
        processor: &P,
        records: &[RawRecord],
        sink: &mut ResultsSink<P::Output>,
    ) -> (usize, Stop) {
        let total = records.len();
        let mut processed = 0;

        for (index, record) in records.iter().enumerate() {
            let output = match processor.process(index, record).await {
                Ok(output) => output,
                Err(cause) => {
                    warn!(index, error = %format!("{cause:#}"), "record failed");
                    return (processed, Stop::Row(index, cause));
                }
            };
            if let Err(e) = sink.append(&output) {
                warn!(index, error = %e, "results sink write failed");
                return (processed, Stop::Row(index, e.into()));
            }
            processed += 1;
            info!(index, total, "record committed");

            if self.limit == Some(index) {
                info!(index, "limit reached");
                return (processed, Stop::Limit(index));
            }
        }
        (processed, Stop::Exhausted)
    }

    fn finish(
        &self,
        mut buffer: RequeueBuffer,
        records: &[RawRecord],
        processed: usize,
        stop: Stop,
    ) -> RunReport {
        let total = records.len();
        let from = stop.requeue_from(total);

        if let Err(e) = buffer.extend(&records[from..]) {
            warn!(error = %e, "requeue write failed, input left unchanged");
            buffer.discard();
            return RunReport {
                outcome: Outcome::Fatal(e),
                total,
                processed,
                requeued: 0,
            };
        }

        let requeued = match buffer.commit() {
            Ok(n) => n,
            Err(e) => {
                if let Stop::Row(index, cause) = &stop {
                    warn!(index, error = %format!("{cause:#}"), "record failed before replace error");
                }
                return RunReport {
                    outcome: Outcome::Fatal(e),
                    total,
                    processed,
                    requeued: 0,
                };
            }
        };

        let outcome = match stop {
            Stop::Exhausted => Outcome::Completed,
            Stop::Limit(index) => Outcome::LimitReached { index },
            Stop::Row(index, cause) => Outcome::RowFailed { index, cause },
            Stop::Fatal(_, e) => Outcome::Fatal(e),
        };
        info!(total, processed, requeued, "run finished");

        RunReport {
            outcome,
            total,
            processed,
            requeued,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requeue_from() {
        assert_eq!(Stop::Exhausted.requeue_from(5), 5);
        assert_eq!(Stop::Limit(2).requeue_from(5), 3);
        assert_eq!(Stop::Row(1, anyhow::anyhow!("x")).requeue_from(5), 1);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Outcome::Completed.exit_code(), 0);
        assert_eq!(Outcome::LimitReached { index: 0 }.exit_code(), 1);
        assert!(Outcome::Completed.into_result().is_ok());
        let err = Outcome::LimitReached { index: 3 }.into_result().unwrap_err();
        assert!(err.is_limit());
    }
}
