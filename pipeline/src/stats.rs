//! Dataset statistics.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;
use ttsprep_corpus::RecordStore;

use crate::audio::{format_duration, wav_duration};

#[derive(Debug, Deserialize)]
struct AudioEntry {
    #[serde(alias = "path")]
    file_name: String,
}

/// Total audio duration of a metadata file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetDuration {
    /// WAV files measured.
    pub files: usize,
    /// Entries whose file does not exist.
    pub missing: usize,
    /// Entries that are not WAV files.
    pub skipped: usize,
    pub seconds: f64,
    pub formatted: String,
}

/// Sums the durations of the WAV files listed in `metadata`.
///
/// Accepts JSONL metadata (`file_name`) and TSV metadata (`path`). Paths
/// are relative to the metadata file's directory.
pub fn dataset_duration(metadata: &Path) -> anyhow::Result<DatasetDuration> {
    let snapshot = RecordStore::new(metadata).load()?;
    let root = metadata.parent().unwrap_or(Path::new(""));

    let mut files = 0;
    let mut missing = 0;
    let mut skipped = 0;
    let mut seconds = 0.0;
    for record in &snapshot.records {
        let entry: AudioEntry = record.decode()?;
        let path = root.join(&entry.file_name);
        let is_wav = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
        if !is_wav {
            skipped += 1;
            continue;
        }
        if !path.exists() {
            warn!(path = %path.display(), "audio file missing");
            missing += 1;
            continue;
        }
        seconds += wav_duration(&path)?;
        files += 1;
    }

    Ok(DatasetDuration {
        files,
        missing,
        skipped,
        seconds,
        formatted: format_duration(seconds),
    })
}
