//! On-disk record formats and the line writer shared by stores and sinks.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::record::RawRecord;

/// Serialization of a record file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// One JSON object per line.
    #[default]
    Jsonl,
    /// Tab-separated values with a header row.
    Tsv,
    /// One plain-text item per line.
    Lines,
}

impl Format {
    /// Picks the format from a file extension. Unknown extensions read as JSONL.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("tsv") => Format::Tsv,
            Some("txt") => Format::Lines,
            _ => Format::Jsonl,
        }
    }

    pub fn has_header(self) -> bool {
        self == Format::Tsv
    }
}

pub(crate) fn tsv_reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.delimiter(b'\t').has_headers(true).flexible(true);
    builder
}

/// Buffered writer that emits one record per line in a given format.
pub(crate) struct RecordWriter {
    inner: Inner,
}

enum Inner {
    Text(BufWriter<File>),
    Tsv(csv::Writer<File>),
}

impl RecordWriter {
    pub(crate) fn new(file: File, format: Format) -> Self {
        let inner = match format {
            Format::Tsv => Inner::Tsv(
                csv::WriterBuilder::new()
                    .delimiter(b'\t')
                    .has_headers(false)
                    .flexible(true)
                    .from_writer(file),
            ),
            Format::Jsonl | Format::Lines => Inner::Text(BufWriter::new(file)),
        };
        Self { inner }
    }

    pub(crate) fn write_fields<I, S>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        match &mut self.inner {
            Inner::Tsv(w) => Ok(w.write_record(fields)?),
            Inner::Text(_) => Err(Error::FormatMismatch(
                "delimited row written to a line file".into(),
            )),
        }
    }

    pub(crate) fn write_line(&mut self, line: &str) -> Result<()> {
        match &mut self.inner {
            Inner::Text(w) => {
                w.write_all(line.as_bytes())?;
                w.write_all(b"\n")?;
                Ok(())
            }
            Inner::Tsv(_) => Err(Error::FormatMismatch(
                "text line written to a delimited file".into(),
            )),
        }
    }

    /// Writes a record back in the form it was read.
    pub(crate) fn write_raw(&mut self, record: &RawRecord) -> Result<()> {
        match record {
            RawRecord::Json(line) | RawRecord::Line(line) => self.write_line(line),
            RawRecord::Row { fields, .. } => self.write_fields(fields),
        }
    }

    pub(crate) fn flush(&mut self) -> Result<()> {
        match &mut self.inner {
            Inner::Text(w) => w.flush()?,
            Inner::Tsv(w) => w.flush()?,
        }
        Ok(())
    }

    /// Flushes buffered bytes and fsyncs the file.
    pub(crate) fn sync(&mut self) -> Result<()> {
        self.flush()?;
        let file = match &self.inner {
            Inner::Text(w) => w.get_ref(),
            Inner::Tsv(w) => w.get_ref(),
        };
        file.sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a/b.jsonl")), Format::Jsonl);
        assert_eq!(Format::from_path(Path::new("a/b.TSV")), Format::Tsv);
        assert_eq!(Format::from_path(Path::new("topics.txt")), Format::Lines);
        assert_eq!(Format::from_path(Path::new("noext")), Format::Jsonl);
        assert!(Format::Tsv.has_header());
        assert!(!Format::Jsonl.has_header());
    }

    #[test]
    fn test_writer_rejects_mismatch() {
        let file = tempfile::tempfile().unwrap();
        let mut w = RecordWriter::new(file, Format::Jsonl);
        assert!(w.write_fields(["a", "b"]).is_err());
        assert!(w.write_line("{}").is_ok());
    }
}
