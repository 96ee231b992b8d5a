//! Resumable record processing for TTS dataset preparation.
//!
//! Every job in the pipeline has the same shape: a line-oriented input file
//! is the durable work queue, each record is turned into one output line,
//! and the input is rewritten to hold only what still needs work.
//!
//! # Example
//!
//! ```ignore
//! use ttsprep_corpus::{RecordStore, Runner};
//!
//! let runner = Runner::new(RecordStore::new("input.jsonl"), "output.jsonl")
//!     .with_limit(Some(99));
//! let report = runner.run(&processor).await;
//! std::process::exit(report.exit_code());
//! ```

mod error;
mod format;
mod hash;
mod processor;
mod record;
mod sink;
mod store;

pub use error::{Error, Result, RunError};
pub use format::Format;
pub use hash::text_hash;
pub use processor::{Outcome, RecordProcessor, RunReport, Runner};
pub use record::{BaseRecord, DEFAULT_STYLE, DerivedRecord, RawRecord, RecordId, Tabular};
pub use sink::ResultsSink;
pub use store::{RecordStore, RequeueBuffer, Snapshot, TEMP_SUFFIX};
