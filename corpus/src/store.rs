//! Input record store with atomic replacement.

use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::format::{Format, RecordWriter, tsv_reader_builder};
use crate::record::RawRecord;

/// Suffix of the sibling file that receives requeued records.
pub const TEMP_SUFFIX: &str = ".processing_temp";

/// All records of an input file, read once at the start of a run.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Header row of a delimited file.
    pub header: Option<Arc<[String]>>,
    pub records: Vec<RawRecord>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The input file of a run.
///
/// Readers see either the old content or the new content, never a partial
/// rewrite: replacements go through [`RequeueBuffer::commit`].
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    format: Format,
}

impl RecordStore {
    /// Creates a store whose format follows the file extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = Format::from_path(&path);
        Self { path, format }
    }

    pub fn with_format(path: impl Into<PathBuf>, format: Format) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Path of the requeue file next to the input.
    pub fn temp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(TEMP_SUFFIX);
        PathBuf::from(name)
    }

    /// Reads every record. Blank lines are skipped.
    pub fn load(&self) -> Result<Snapshot> {
        let snapshot = match self.format {
            Format::Tsv => self.load_tsv()?,
            Format::Jsonl => self.load_lines(RawRecord::Json)?,
            Format::Lines => self.load_lines(RawRecord::Line)?,
        };
        debug!(path = %self.path.display(), records = snapshot.len(), "loaded input");
        Ok(snapshot)
    }

    fn load_lines(&self, wrap: fn(String) -> RawRecord) -> Result<Snapshot> {
        let content = fs::read_to_string(&self.path).map_err(|e| Error::file(&self.path, e))?;
        let records = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| wrap(line.trim_end().to_string()))
            .collect();
        Ok(Snapshot {
            header: None,
            records,
        })
    }

    fn load_tsv(&self) -> Result<Snapshot> {
        let file = File::open(&self.path).map_err(|e| Error::file(&self.path, e))?;
        let mut reader = tsv_reader_builder().from_reader(file);

        let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if header.iter().all(|h| h.is_empty()) {
            return Ok(Snapshot::default());
        }
        let header: Arc<[String]> = header.into();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            if row.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            records.push(RawRecord::Row {
                header: Arc::clone(&header),
                fields: row.iter().map(str::to_string).collect(),
            });
        }
        Ok(Snapshot {
            header: Some(header),
            records,
        })
    }

    /// Opens a fresh requeue file next to the input.
    ///
    /// Any stale temp file left by an interrupted run is truncated.
    pub fn requeue_buffer(&self, header: Option<&[String]>) -> Result<RequeueBuffer> {
        let temp_path = self.temp_path();
        let file = File::create(&temp_path).map_err(|e| Error::file(&temp_path, e))?;
        let mut writer = RecordWriter::new(file, self.format);
        if self.format.has_header() {
            if let Some(header) = header {
                writer.write_fields(header)?;
            }
        }
        Ok(RequeueBuffer {
            writer,
            temp_path,
            target_path: self.path.clone(),
            count: 0,
        })
    }

    /// Replaces the input with `remaining` in one step.
    pub fn commit_remainder(
        &self,
        header: Option<&[String]>,
        remaining: &[RawRecord],
    ) -> Result<usize> {
        let mut buffer = self.requeue_buffer(header)?;
        if let Err(e) = buffer.extend(remaining) {
            buffer.discard();
            return Err(e);
        }
        buffer.commit()
    }
}

/// Records that have not been committed to the sink, staged for the
/// replacement input file.
pub struct RequeueBuffer {
    writer: RecordWriter,
    temp_path: PathBuf,
    target_path: PathBuf,
    count: usize,
}

impl RequeueBuffer {
    /// Writes a record back verbatim.
    pub fn push(&mut self, record: &RawRecord) -> Result<()> {
        self.writer.write_raw(record)?;
        self.count += 1;
        Ok(())
    }

    pub fn extend<'a>(&mut self, records: impl IntoIterator<Item = &'a RawRecord>) -> Result<()> {
        for record in records {
            self.push(record)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Syncs the temp file and renames it over the input.
    ///
    /// Returns the number of records written.
    pub fn commit(self) -> Result<usize> {
        let RequeueBuffer {
            mut writer,
            temp_path,
            target_path,
            count,
        } = self;
        writer.sync()?;
        drop(writer);
        fs::rename(&temp_path, &target_path).map_err(|e| Error::file(&target_path, e))?;
        debug!(path = %target_path.display(), requeued = count, "input replaced");
        Ok(count)
    }

    /// Drops the temp file and leaves the input untouched.
    pub fn discard(self) {
        let RequeueBuffer {
            writer, temp_path, ..
        } = self;
        drop(writer);
        if let Err(e) = fs::remove_file(&temp_path) {
            debug!(path = %temp_path.display(), error = %e, "could not remove temp file");
        }
    }
}
