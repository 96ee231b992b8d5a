//! Audio synthesis over a text corpus.
//!
//! Two layouts are supported. A JSONL corpus takes its source label from
//! the input file name and writes everything under `<output>/<source>/`:
//!
//! ```text
//! <output>/<source>/audio/<source>_<id>.wav
//! <output>/<source>/metadata.jsonl
//! ```
//!
//! A TSV corpus carries a `source` column per row:
//!
//! ```text
//! <output>/audio/<source>/<source>_<id>.wav
//! <output>/elevenlabs_audio.tsv
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use ttsprep_corpus::{BaseRecord, DerivedRecord, RawRecord, RecordProcessor};

use crate::audio::{AudioFormat, save_audio};
use crate::synth::Synthesizer;

/// Metadata file of a JSONL corpus.
pub const JSONL_METADATA: &str = "metadata.jsonl";

/// Metadata file of a TSV corpus.
pub const TSV_METADATA: &str = "elevenlabs_audio.tsv";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Layout {
    Jsonl { source: String },
    Tsv,
}

#[derive(Debug, Deserialize)]
struct SourcedRow {
    id: String,
    text: String,
    #[serde(default)]
    source: String,
}

/// Synthesizes one audio file per record and emits its metadata row.
pub struct SynthesisJob<S> {
    synth: S,
    out_dir: PathBuf,
    layout: Layout,
    format: AudioFormat,
}

impl<S: Synthesizer> SynthesisJob<S> {
    /// Job for a JSONL corpus; the source label is the input file stem.
    pub fn jsonl(synth: S, input: &Path, output_dir: &Path, format: AudioFormat) -> Self {
        let source = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            synth,
            out_dir: output_dir.join(&source),
            layout: Layout::Jsonl { source },
            format,
        }
    }

    /// Job for a TSV corpus with `id`, `text` and `source` columns.
    pub fn tsv(synth: S, output_dir: &Path, format: AudioFormat) -> Self {
        Self {
            synth,
            out_dir: output_dir.to_path_buf(),
            layout: Layout::Tsv,
            format,
        }
    }

    /// Directory holding the metadata file and the `audio/` tree.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn sink_path(&self) -> PathBuf {
        match self.layout {
            Layout::Jsonl { .. } => self.out_dir.join(JSONL_METADATA),
            Layout::Tsv => self.out_dir.join(TSV_METADATA),
        }
    }

    pub fn synthesizer(&self) -> &S {
        &self.synth
    }

    /// Relative (metadata) and absolute paths of a record's audio file.
    fn audio_paths(&self, source: &str, id: &str) -> (String, PathBuf) {
        let name = format!("{}_{}{}", source, id, self.format.extension());
        match self.layout {
            Layout::Jsonl { .. } => (
                format!("audio/{}", name),
                self.out_dir.join("audio").join(&name),
            ),
            Layout::Tsv => (
                format!("audio/{}/{}", source, name),
                self.out_dir.join("audio").join(source).join(&name),
            ),
        }
    }

    fn decode(&self, record: &RawRecord) -> anyhow::Result<(BaseRecord, String)> {
        match &self.layout {
            Layout::Jsonl { source } => Ok((record.decode()?, source.clone())),
            Layout::Tsv => {
                let row: SourcedRow = record.decode()?;
                if row.source.is_empty() {
                    anyhow::bail!("row {} has no source", row.id);
                }
                Ok((BaseRecord::new(row.id, row.text), row.source))
            }
        }
    }
}

/// Source labels and ids become file and directory names, so they must
/// stay a single path component.
fn check_path_part(what: &str, value: &str) -> anyhow::Result<()> {
    if value == "." || value == ".." || value.contains(['/', '\\']) {
        anyhow::bail!("{} '{}' is not a valid file name part", what, value);
    }
    Ok(())
}

#[async_trait]
impl<S: Synthesizer> RecordProcessor for SynthesisJob<S> {
    type Output = DerivedRecord;

    async fn process(&self, index: usize, record: &RawRecord) -> anyhow::Result<DerivedRecord> {
        let (base, source) = self.decode(record)?;
        if base.text.trim().is_empty() {
            anyhow::bail!("record {} has empty text", base.id);
        }

        let id = base.id.to_string();
        check_path_part("source", &source)?;
        check_path_part("id", &id)?;

        let (relative, full) = self.audio_paths(&source, &id);
        if let Some(dir) = full.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        let audio = self
            .synth
            .synthesize(&base.text, self.format.output_format())
            .await?;
        save_audio(&full, audio, self.format).await?;
        debug!(index, id = %base.id, path = %full.display(), "audio written");

        Ok(DerivedRecord::from_base(
            base,
            source,
            relative,
            self.synth.voice_name(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use ttsprep_corpus::{Outcome, RecordStore, Runner};
    use ttsprep_elevenlabs::OutputFormat;

    /// Returns 0.01 s of silence per call and fails on the listed texts.
    struct FakeVoice {
        fail_on: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeVoice {
        fn new(fail_on: Vec<&'static str>) -> Self {
            Self {
                fail_on,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Synthesizer for FakeVoice {
        fn voice_name(&self) -> &str {
            "Prince Nuri"
        }

        async fn synthesize(&self, text: &str, format: OutputFormat) -> anyhow::Result<Vec<u8>> {
            self.calls.lock().unwrap().push(text.to_string());
            if self.fail_on.contains(&text) {
                anyhow::bail!("quota exceeded");
            }
            match format {
                OutputFormat::Pcm48000 => Ok(vec![0u8; 960]),
                _ => Ok(b"ID3".to_vec()),
            }
        }
    }

    #[tokio::test]
    async fn test_jsonl_layout() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("den4ikai.jsonl");
        std::fs::write(
            &input,
            "{\"id\":\"1\",\"text\":\"Привет\"}\n{\"id\":2,\"text\":\"Пока\"}\n",
        )
        .unwrap();
        let output = dir.path().join("out");

        let job = SynthesisJob::jsonl(FakeVoice::new(vec![]), &input, &output, AudioFormat::Wav);
        assert_eq!(job.out_dir(), output.join("den4ikai"));

        let report = Runner::new(RecordStore::new(&input), job.sink_path())
            .run(&job)
            .await;
        assert!(report.outcome.is_completed());
        assert_eq!(report.processed, 2);

        let wav = output.join("den4ikai/audio/den4ikai_2.wav");
        assert!((crate::audio::wav_duration(&wav).unwrap() - 0.01).abs() < 1e-9);

        let metadata = std::fs::read_to_string(output.join("den4ikai/metadata.jsonl")).unwrap();
        let rows: Vec<DerivedRecord> = metadata
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(rows[0].file_name, "audio/den4ikai_1.wav");
        assert_eq!(rows[0].source, "den4ikai");
        assert_eq!(rows[0].style, "default");
        assert_eq!(rows[1].voice, "Prince Nuri");
        assert_eq!(std::fs::read_to_string(&input).unwrap(), "");
    }

    #[tokio::test]
    async fn test_tsv_layout_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("denchik.tsv");
        std::fs::write(
            &input,
            "id\ttext\tsource\n1\tраз\tdenchik\n2\tдва\tdenchik\n3\tтри\tdenchik\n",
        )
        .unwrap();
        let output = dir.path().join("out");

        let job = SynthesisJob::tsv(FakeVoice::new(vec!["два"]), &output, AudioFormat::Mp3);
        let report = Runner::new(RecordStore::new(&input), job.sink_path())
            .run(&job)
            .await;

        assert!(matches!(report.outcome, Outcome::RowFailed { index: 1, .. }));
        assert!(output.join("audio/denchik/denchik_1.mp3").exists());
        assert!(!output.join("audio/denchik/denchik_2.mp3").exists());

        let metadata = std::fs::read_to_string(output.join(TSV_METADATA)).unwrap();
        assert_eq!(
            metadata,
            "id\tpath\ttext\tsource\tstyle\tspeaker\n\
             1\taudio/denchik/denchik_1.mp3\tраз\tdenchik\tdefault\tPrince Nuri\n"
        );
        assert_eq!(
            std::fs::read_to_string(&input).unwrap(),
            "id\ttext\tsource\n2\tдва\tdenchik\n3\tтри\tdenchik\n"
        );
        // Nothing after the failing row was attempted.
        assert_eq!(job.synthesizer().calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_tsv_row_without_source_fails() {
        let job = SynthesisJob::tsv(FakeVoice::new(vec![]), Path::new("/nonexistent"), AudioFormat::Wav);
        let record = RawRecord::Row {
            header: vec!["id".to_string(), "text".to_string()].into(),
            fields: vec!["7".to_string(), "текст".to_string()],
        };
        let err = job.process(0, &record).await.unwrap_err();
        assert!(err.to_string().contains("no source"));
        assert!(job.synthesizer().calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tsv_source_cannot_leave_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out");
        let job = SynthesisJob::tsv(FakeVoice::new(vec![]), &output, AudioFormat::Wav);

        for source in ["../x", "/tmp/abs", "..", "a\\b"] {
            let record = RawRecord::Row {
                header: vec!["id".to_string(), "text".to_string(), "source".to_string()].into(),
                fields: vec!["7".to_string(), "текст".to_string(), source.to_string()],
            };
            let err = job.process(0, &record).await.unwrap_err();
            assert!(err.to_string().contains("source"), "{source}: {err}");
        }

        let record = RawRecord::Row {
            header: vec!["id".to_string(), "text".to_string(), "source".to_string()].into(),
            fields: vec!["../7".to_string(), "текст".to_string(), "denchik".to_string()],
        };
        let err = job.process(0, &record).await.unwrap_err();
        assert!(err.to_string().contains("id"));

        assert!(job.synthesizer().calls.lock().unwrap().is_empty());
        assert!(!dir.path().join("x").exists());
        assert!(!output.exists());
    }
}
