//! Record shapes flowing through a run.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Default synthesis style written to metadata rows.
pub const DEFAULT_STYLE: &str = "default";

/// Stable record identifier. Input files carry either integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Str(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Str(s.to_string())
    }
}

/// Minimal unit of work: an id and the text payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRecord {
    pub id: RecordId,
    pub text: String,
}

impl BaseRecord {
    pub fn new(id: impl Into<RecordId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A base record extended with synthesis provenance.
///
/// Only produced after the audio for `id` has been written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRecord {
    pub id: RecordId,
    pub text: String,
    pub source: String,
    /// Audio path relative to the output directory.
    pub file_name: String,
    #[serde(default = "default_style")]
    pub style: String,
    pub voice: String,
}

fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

impl DerivedRecord {
    /// Builds the derived record for `base` with the default style.
    pub fn from_base(
        base: BaseRecord,
        source: impl Into<String>,
        file_name: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            id: base.id,
            text: base.text,
            source: source.into(),
            file_name: file_name.into(),
            style: default_style(),
            voice: voice.into(),
        }
    }
}

/// Column layout of a record written to a delimited-text sink.
pub trait Tabular {
    /// Header columns, in row order.
    fn columns() -> &'static [&'static str];

    /// Field values, aligned with [`Tabular::columns`].
    fn row(&self) -> Vec<String>;
}

impl Tabular for BaseRecord {
    fn columns() -> &'static [&'static str] {
        &["id", "text"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.id.to_string(), self.text.clone()]
    }
}

impl Tabular for DerivedRecord {
    fn columns() -> &'static [&'static str] {
        &["id", "path", "text", "source", "style", "speaker"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.file_name.clone(),
            self.text.clone(),
            self.source.clone(),
            self.style.clone(),
            self.voice.clone(),
        ]
    }
}

/// One input record exactly as it was read.
///
/// Requeued records are written back from this form, so content the
/// processor never touched survives byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRecord {
    /// One JSON document (a JSONL line without its newline).
    Json(String),
    /// One delimited row with the header of its file.
    Row {
        header: Arc<[String]>,
        fields: Vec<String>,
    },
    /// One plain-text line.
    Line(String),
}

impl RawRecord {
    /// Deserializes the record into a typed shape.
    ///
    /// Delimited rows are mapped column by column into string values; a
    /// missing trailing field reads as an empty string.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            RawRecord::Json(line) => Ok(serde_json::from_str(line)?),
            RawRecord::Row { header, fields } => {
                let values = fields
                    .iter()
                    .map(String::as_str)
                    .chain(std::iter::repeat(""));
                let map: Map<String, Value> = header
                    .iter()
                    .zip(values)
                    .map(|(k, v)| (k.clone(), Value::String(v.to_string())))
                    .collect();
                Ok(serde_json::from_value(Value::Object(map))?)
            }
            RawRecord::Line(text) => Ok(serde_json::from_value(Value::String(text.clone()))?),
        }
    }

    /// Returns a column of a delimited row.
    pub fn get(&self, column: &str) -> Option<&str> {
        match self {
            RawRecord::Row { header, fields } => header
                .iter()
                .position(|h| h == column)
                .map(|i| fields.get(i).map(String::as_str).unwrap_or("")),
            _ => None,
        }
    }
}
