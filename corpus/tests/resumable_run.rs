//! End-to-end runs over temp files with a scripted processor.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;
use ttsprep_corpus::{
    BaseRecord, DerivedRecord, Outcome, RawRecord, RecordId, RecordProcessor, RecordStore,
    Runner, TEMP_SUFFIX,
};

/// Echoes each record, failing on the listed ids.
struct Scripted {
    fail_ids: HashSet<String>,
    seen: Mutex<Vec<usize>>,
}

impl Scripted {
    fn new() -> Self {
        Self::failing(&[])
    }

    fn failing(ids: &[&str]) -> Self {
        Self {
            fail_ids: ids.iter().map(|s| s.to_string()).collect(),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn seen(&self) -> Vec<usize> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordProcessor for Scripted {
    type Output = BaseRecord;

    async fn process(&self, index: usize, record: &RawRecord) -> anyhow::Result<BaseRecord> {
        self.seen.lock().unwrap().push(index);
        let base: BaseRecord = record.decode()?;
        if self.fail_ids.contains(&base.id.to_string()) {
            anyhow::bail!("scripted failure for {}", base.id);
        }
        Ok(base)
    }
}

fn jsonl(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| format!("{{\"id\": {id}, \"text\": \"text number {id}\"}}\n"))
        .collect()
}

fn write_input(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn sink_ids(path: &Path) -> Vec<RecordId> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str::<BaseRecord>(l).unwrap().id)
        .collect()
}

fn ints(ids: &[i64]) -> Vec<RecordId> {
    ids.iter().map(|&n| RecordId::Int(n)).collect()
}

#[tokio::test]
async fn test_completed_run_empties_input() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.jsonl", &jsonl(&[1, 2, 3]));
    let output = dir.path().join("out.jsonl");

    let report = Runner::new(RecordStore::new(&input), &output)
        .run(&Scripted::new())
        .await;

    assert!(report.outcome.is_completed());
    assert_eq!(report.exit_code(), 0);
    assert_eq!((report.total, report.processed, report.requeued), (3, 3, 0));
    assert_eq!(sink_ids(&output), ints(&[1, 2, 3]));
    assert_eq!(fs::read_to_string(&input).unwrap(), "");
    assert!(!dir.path().join(format!("in.jsonl{TEMP_SUFFIX}")).exists());
}

#[tokio::test]
async fn test_limit_with_later_failure() {
    // Five records, limit 2, record 4 would fail if reached.
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.jsonl", &jsonl(&[1, 2, 3, 4, 5]));
    let output = dir.path().join("out.jsonl");
    let processor = Scripted::failing(&["4"]);

    let report = Runner::new(RecordStore::new(&input), &output)
        .with_limit(Some(2))
        .run(&processor)
        .await;

    assert!(matches!(report.outcome, Outcome::LimitReached { index: 2 }));
    assert_eq!(report.exit_code(), 1);
    assert_eq!(processor.seen(), vec![0, 1, 2]);
    assert_eq!(sink_ids(&output), ints(&[1, 2, 3]));
    assert_eq!(fs::read_to_string(&input).unwrap(), jsonl(&[4, 5]));
}

#[tokio::test]
async fn test_row_failure_requeues_tail() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.jsonl", &jsonl(&[10, 20, 30, 40]));
    let output = dir.path().join("out.jsonl");

    let report = Runner::new(RecordStore::new(&input), &output)
        .run(&Scripted::failing(&["20"]))
        .await;

    match &report.outcome {
        Outcome::RowFailed { index, cause } => {
            assert_eq!(*index, 1);
            assert!(cause.to_string().contains("scripted failure"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.requeued, 3);
    assert_eq!(sink_ids(&output), ints(&[10]));
    assert_eq!(fs::read_to_string(&input).unwrap(), jsonl(&[20, 30, 40]));
}

#[tokio::test]
async fn test_failure_then_resume() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.jsonl", &jsonl(&[1, 2, 3, 4, 5, 6]));
    let output = dir.path().join("out.jsonl");
    let runner = Runner::new(RecordStore::new(&input), &output);

    let first = runner.run(&Scripted::failing(&["4"])).await;
    assert!(matches!(first.outcome, Outcome::RowFailed { index: 3, .. }));

    // The failing record comes first on the next run and is retried.
    let second = runner.run(&Scripted::new()).await;
    assert!(second.outcome.is_completed());
    assert_eq!(second.total, 3);

    assert_eq!(sink_ids(&output), ints(&[1, 2, 3, 4, 5, 6]));
    assert_eq!(fs::read_to_string(&input).unwrap(), "");
}

#[tokio::test]
async fn test_limit_beyond_input_completes() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.jsonl", &jsonl(&[1, 2]));
    let output = dir.path().join("out.jsonl");

    let report = Runner::new(RecordStore::new(&input), &output)
        .with_limit(Some(2))
        .run(&Scripted::new())
        .await;

    assert!(report.outcome.is_completed());
    assert_eq!(sink_ids(&output), ints(&[1, 2]));
}

#[tokio::test]
async fn test_limit_zero_processes_one() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.jsonl", &jsonl(&[1, 2, 3]));
    let output = dir.path().join("out.jsonl");

    let report = Runner::new(RecordStore::new(&input), &output)
        .with_limit(Some(0))
        .run(&Scripted::new())
        .await;

    assert!(matches!(report.outcome, Outcome::LimitReached { index: 0 }));
    assert_eq!(sink_ids(&output), ints(&[1]));
    assert_eq!(fs::read_to_string(&input).unwrap(), jsonl(&[2, 3]));
}

#[tokio::test]
async fn test_empty_input_does_not_touch_sink() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.jsonl", "\n\n");
    let output = dir.path().join("out.jsonl");

    let report = Runner::new(RecordStore::new(&input), &output)
        .run(&Scripted::new())
        .await;

    assert!(report.outcome.is_completed());
    assert_eq!(report.total, 0);
    assert!(!output.exists());
    assert_eq!(fs::read_to_string(&input).unwrap(), "");
}

#[tokio::test]
async fn test_missing_input_is_fatal() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("absent.jsonl");
    let output = dir.path().join("out.jsonl");

    let report = Runner::new(RecordStore::new(&input), &output)
        .run(&Scripted::new())
        .await;

    assert!(matches!(report.outcome, Outcome::Fatal(_)));
    assert_eq!(report.exit_code(), 1);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_sink_open_failure_keeps_every_record() {
    let dir = TempDir::new().unwrap();
    let content = jsonl(&[1, 2, 3]);
    let input = write_input(&dir, "in.jsonl", &content);
    // A directory where the sink file should be.
    let output = dir.path().join("out.jsonl");
    fs::create_dir(&output).unwrap();

    let processor = Scripted::new();
    let report = Runner::new(RecordStore::new(&input), &output)
        .run(&processor)
        .await;

    assert!(matches!(report.outcome, Outcome::Fatal(_)));
    assert!(processor.seen().is_empty());
    assert_eq!(fs::read_to_string(&input).unwrap(), content);
}

#[tokio::test]
async fn test_undecodable_record_is_a_row_failure() {
    let dir = TempDir::new().unwrap();
    let content = "{\"id\": 1, \"text\": \"ok\"}\n{\"id\": 2, \"broken\n{\"id\": 3, \"text\": \"ok\"}\n";
    let input = write_input(&dir, "in.jsonl", content);
    let output = dir.path().join("out.jsonl");

    let report = Runner::new(RecordStore::new(&input), &output)
        .run(&Scripted::new())
        .await;

    assert!(matches!(report.outcome, Outcome::RowFailed { index: 1, .. }));
    assert_eq!(
        fs::read_to_string(&input).unwrap(),
        "{\"id\": 2, \"broken\n{\"id\": 3, \"text\": \"ok\"}\n"
    );
}

#[tokio::test]
async fn test_tsv_input_requeue_keeps_header() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "in.tsv",
        "id\ttext\tsource\na\tfirst\tds\nb\tsecond\tds\nc\tthird\tds\n",
    );
    let output = dir.path().join("out.jsonl");

    let report = Runner::new(RecordStore::new(&input), &output)
        .with_limit(Some(0))
        .run(&Scripted::new())
        .await;

    assert!(matches!(report.outcome, Outcome::LimitReached { index: 0 }));
    assert_eq!(sink_ids(&output), vec![RecordId::from("a")]);
    assert_eq!(
        fs::read_to_string(&input).unwrap(),
        "id\ttext\tsource\nb\tsecond\tds\nc\tthird\tds\n"
    );
}

/// Emits derived rows so the sink can be delimited.
struct Derive;

#[async_trait]
impl RecordProcessor for Derive {
    type Output = DerivedRecord;

    async fn process(&self, _index: usize, record: &RawRecord) -> anyhow::Result<DerivedRecord> {
        let base: BaseRecord = record.decode()?;
        let file_name = format!("audio/ds/ds_{}.wav", base.id);
        Ok(DerivedRecord::from_base(base, "ds", file_name, "voice"))
    }
}

#[tokio::test]
async fn test_tsv_sink_header_written_once_across_runs() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out/metadata.tsv");

    let first = write_input(&dir, "a.jsonl", &jsonl(&[1, 2]));
    let report = Runner::new(RecordStore::new(&first), &output).run(&Derive).await;
    assert!(report.outcome.is_completed());

    let second = write_input(&dir, "b.jsonl", &jsonl(&[3]));
    let report = Runner::new(RecordStore::new(&second), &output).run(&Derive).await;
    assert!(report.outcome.is_completed());

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "id\tpath\ttext\tsource\tstyle\tspeaker",
            "1\taudio/ds/ds_1.wav\ttext number 1\tds\tdefault\tvoice",
            "2\taudio/ds/ds_2.wav\ttext number 2\tds\tdefault\tvoice",
            "3\taudio/ds/ds_3.wav\ttext number 3\tds\tdefault\tvoice",
        ]
    );
}
