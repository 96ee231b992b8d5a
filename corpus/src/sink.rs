//! Append-only results sink.

use std::fs::{self, OpenOptions};
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::format::{Format, RecordWriter};
use crate::record::Tabular;

/// Output file receiving one line per committed record.
///
/// Existing content is never rewritten. A delimited sink gets its header
/// only when the file is created or found empty at open.
pub struct ResultsSink<T> {
    path: PathBuf,
    format: Format,
    writer: RecordWriter,
    fresh: bool,
    written: usize,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Serialize + Tabular> ResultsSink<T> {
    /// Opens the sink with the format implied by its extension.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = Format::from_path(&path);
        Self::open_with_format(path, format)
    }

    /// Opens the sink, creating parent directories as needed.
    pub fn open_with_format(path: impl Into<PathBuf>, format: Format) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::file(parent, e))?;
            }
        }

        let fresh = match fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => return Err(Error::file(&path, e)),
        };

        let mut options = OpenOptions::new();
        if fresh {
            options.write(true).create(true).truncate(true);
        } else {
            options.append(true);
        }
        let file = options.open(&path).map_err(|e| Error::file(&path, e))?;

        let mut writer = RecordWriter::new(file, format);
        if fresh && format.has_header() {
            writer.write_fields(T::columns())?;
            writer.flush()?;
        }
        debug!(path = %path.display(), fresh, "results sink opened");

        Ok(Self {
            path,
            format,
            writer,
            fresh,
            written: 0,
            _marker: PhantomData,
        })
    }

    /// Serializes one record as one line and flushes it.
    pub fn append(&mut self, record: &T) -> Result<()> {
        match self.format {
            Format::Tsv => self.writer.write_fields(record.row())?,
            Format::Jsonl | Format::Lines => {
                let line = serde_json::to_string(record)?;
                self.writer.write_line(&line)?;
            }
        }
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if the file was created (or was empty) when the sink opened.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Records appended through this handle.
    pub fn written(&self) -> usize {
        self.written
    }
}
