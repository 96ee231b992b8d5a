//! Flattening of dialogue pairs into synthesis-ready records.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use anyhow::Context;
use tracing::info;
use ttsprep_corpus::{BaseRecord, RecordStore, ResultsSink, text_hash};

use crate::dialogue::DialoguePair;

/// Counts from one flatten call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenReport {
    pub pairs: usize,
    pub written: usize,
    /// Texts skipped because their id was already written.
    pub duplicates: usize,
    /// Blank texts skipped.
    pub empty: usize,
}

/// Writes each pair's query and response as two `{id, text}` records with
/// content-hash ids. The output file is replaced.
pub fn flatten_dialogues(input: &Path, output: &Path) -> anyhow::Result<FlattenReport> {
    let snapshot = RecordStore::new(input).load()?;

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    File::create(output).with_context(|| format!("cannot create {}", output.display()))?;
    let mut sink = ResultsSink::<BaseRecord>::open(output)?;

    let mut report = FlattenReport::default();
    let mut seen = HashSet::new();
    for (index, record) in snapshot.records.iter().enumerate() {
        let pair: DialoguePair = record
            .decode()
            .with_context(|| format!("{}: record {}", input.display(), index))?;
        report.pairs += 1;

        for text in [pair.user_query, pair.ai_response] {
            let text = text.trim();
            if text.is_empty() {
                report.empty += 1;
                continue;
            }
            let id = text_hash(text);
            if !seen.insert(id.clone()) {
                report.duplicates += 1;
                continue;
            }
            sink.append(&BaseRecord::new(id, text))?;
            report.written += 1;
        }
    }

    info!(
        pairs = report.pairs,
        written = report.written,
        duplicates = report.duplicates,
        output = %output.display(),
        "dialogues flattened"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_dedupes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("Спорт.jsonl");
        std::fs::write(
            &input,
            concat!(
                "{\"id\":1,\"user_query\":\"Как бегать?\",\"ai_response\":\"Медленно.\"}\n",
                "{\"id\":2,\"user_query\":\"Как бегать? \",\"ai_response\":\"Каждый день.\"}\n",
                "{\"id\":3,\"user_query\":\"\",\"ai_response\":\"Медленно.\"}\n",
            ),
        )
        .unwrap();
        let output = dir.path().join("flat/sport.jsonl");
        std::fs::create_dir_all(output.parent().unwrap()).unwrap();
        std::fs::write(&output, "stale\n").unwrap();

        let report = flatten_dialogues(&input, &output).unwrap();
        assert_eq!(
            report,
            FlattenReport {
                pairs: 3,
                written: 3,
                duplicates: 2,
                empty: 1,
            }
        );

        let records: Vec<BaseRecord> = std::fs::read_to_string(&output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].text, "Как бегать?");
        assert_eq!(records[0].id.to_string(), text_hash("Как бегать?"));
        assert_eq!(records[2].text, "Каждый день.");
        // Input is read, never rewritten.
        assert!(std::fs::read_to_string(&input).unwrap().contains("Каждый день."));
    }

    #[test]
    fn test_flatten_bad_record() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.jsonl");
        std::fs::write(&input, "{\"id\":1}\n").unwrap();
        let err = flatten_dialogues(&input, &dir.path().join("out.jsonl")).unwrap_err();
        assert!(format!("{:#}", err).contains("record 0"));
    }
}
