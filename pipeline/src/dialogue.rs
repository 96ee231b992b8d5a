//! Synthetic dialogue generation per topic.
//!
//! Every topic yields a batch of user/assistant pairs appended to
//! `<output>/<topic>.jsonl`. The committed output row of a topic is its
//! [`GeneratedTopic`] manifest entry, so a topic list can be resumed like
//! any other corpus.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ttsprep_corpus::{RawRecord, RecordProcessor, ResultsSink, Tabular, text_hash};
use ttsprep_llm::{ChatClient, ChatRequest, json_utils};

use crate::prompts::{GENERATION_PROMPT, NUMBERS_TO_WORDS_PROMPT, generation_request, numbers_request};

/// Sampling temperature for generation.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Sampling temperature for the numbers-to-words pass.
pub const CONVERT_TEMPERATURE: f32 = 0.3;

/// Pairs requested per topic unless configured.
pub const DEFAULT_SAMPLES: usize = 5;

/// Manifest of processed topics inside the output directory.
pub const MANIFEST_FILE: &str = "topics_manifest.jsonl";

/// Characters of the topic kept in its file name.
const TOPIC_FILE_CHARS: usize = 30;

/// One user query with the assistant's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DialoguePair {
    /// Position of the pair within its batch.
    pub id: i64,
    pub user_query: String,
    pub ai_response: String,
}

impl Tabular for DialoguePair {
    fn columns() -> &'static [&'static str] {
        &["id", "user_query", "ai_response"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.user_query.clone(),
            self.ai_response.clone(),
        ]
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct GeneratedPairs {
    /// Query/response pairs.
    pairs: Vec<DialoguePair>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ConvertedText {
    /// Text with numbers spelled out.
    converted_text: String,
}

/// Manifest entry written once a topic's pairs are on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTopic {
    /// Content hash of the topic.
    pub id: String,
    pub topic: String,
    /// Pairs file, relative to the output directory.
    pub file_name: String,
    pub pairs: usize,
}

impl Tabular for GeneratedTopic {
    fn columns() -> &'static [&'static str] {
        &["id", "topic", "file_name", "pairs"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.topic.clone(),
            self.file_name.clone(),
            self.pairs.to_string(),
        ]
    }
}

/// File name for a topic's pairs: spaces become underscores and the name is
/// cut to 30 characters.
pub fn topic_file_name(topic: &str) -> String {
    let stem: String = topic
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .take(TOPIC_FILE_CHARS)
        .collect();
    format!("{}.jsonl", stem)
}

/// Generates dialogue pairs for topics read one per line.
pub struct DialogueJob {
    client: Arc<dyn ChatClient>,
    out_dir: PathBuf,
    samples: usize,
    temperature: f32,
    convert_numbers: bool,
}

impl DialogueJob {
    pub fn new(client: Arc<dyn ChatClient>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            out_dir: out_dir.into(),
            samples: DEFAULT_SAMPLES,
            temperature: DEFAULT_TEMPERATURE,
            convert_numbers: true,
        }
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Enables the second pass that spells out numbers in every answer.
    pub fn with_convert_numbers(mut self, convert: bool) -> Self {
        self.convert_numbers = convert;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.out_dir.join(MANIFEST_FILE)
    }

    /// Asks the model for pairs on `topic`.
    pub async fn generate(&self, topic: &str) -> anyhow::Result<Vec<DialoguePair>> {
        let topic = topic.trim();
        if topic.is_empty() {
            anyhow::bail!("topic cannot be empty");
        }

        let request = ChatRequest::new(GENERATION_PROMPT, generation_request(self.samples, topic))
            .with_temperature(self.temperature)
            .with_schema::<GeneratedPairs>();
        let reply = self.client.chat(&request).await?;
        let mut pairs = json_utils::parse_reply::<GeneratedPairs>(&reply)?.pairs;

        if pairs.is_empty() {
            anyhow::bail!("model returned no pairs for topic '{}'", topic);
        }
        if pairs.len() != self.samples {
            warn!(topic, requested = self.samples, got = pairs.len(), "pair count differs");
        }

        if self.convert_numbers {
            for pair in &mut pairs {
                pair.ai_response = self.spell_numbers(&pair.ai_response).await?;
            }
        }
        Ok(pairs)
    }

    /// Rewrites numbers and symbols in `text` as words.
    pub async fn spell_numbers(&self, text: &str) -> anyhow::Result<String> {
        let request = ChatRequest::new(NUMBERS_TO_WORDS_PROMPT, numbers_request(text))
            .with_temperature(CONVERT_TEMPERATURE)
            .with_schema::<ConvertedText>();
        let reply = self.client.chat(&request).await?;
        Ok(json_utils::parse_reply::<ConvertedText>(&reply)?.converted_text)
    }

    /// Generates pairs for one topic and appends them to its file.
    pub async fn run_topic(&self, topic: &str) -> anyhow::Result<GeneratedTopic> {
        let pairs = self.generate(topic).await?;
        let topic = topic.trim();
        let file_name = topic_file_name(topic);

        let mut sink = ResultsSink::<DialoguePair>::open(self.out_dir.join(&file_name))?;
        for pair in &pairs {
            sink.append(pair)?;
        }
        info!(topic, pairs = pairs.len(), file = %sink.path().display(), "dialogues saved");

        Ok(GeneratedTopic {
            id: text_hash(topic),
            topic: topic.to_string(),
            file_name,
            pairs: pairs.len(),
        })
    }
}

#[async_trait]
impl RecordProcessor for DialogueJob {
    type Output = GeneratedTopic;

    async fn process(&self, _index: usize, record: &RawRecord) -> anyhow::Result<GeneratedTopic> {
        let topic: String = record.decode()?;
        self.run_topic(&topic).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use ttsprep_corpus::{Outcome, RecordStore, Runner};
    use ttsprep_llm::{LlmError, Result as LlmResult};

    /// Answers generation with two pairs and conversion with an upper-cased
    /// copy of the text. Fails generation for topics containing "сбой".
    struct Scripted {
        calls: Mutex<Vec<ChatRequest>>,
    }

    impl Scripted {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
            })
        }

        fn count(&self, prompt: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.system_prompt() == Some(prompt))
                .count()
        }
    }

    #[async_trait]
    impl ChatClient for Scripted {
        fn provider(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-1"
        }

        async fn chat(&self, request: &ChatRequest) -> LlmResult<String> {
            self.calls.lock().unwrap().push(request.clone());
            let user = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
            if request.system_prompt() == Some(GENERATION_PROMPT) {
                if user.contains("сбой") {
                    return Err(LlmError::EmptyResponse("mock".into()));
                }
                return Ok(r#"{"pairs": [
                    {"id": 1, "user_query": "Сколько пить воды?", "ai_response": "2 литра"},
                    {"id": 2, "user_query": "А чай?", "ai_response": "Можно"},
                ]}"#
                .to_string());
            }
            let text = user.rsplit("\n\n").next().unwrap_or_default();
            Ok(serde_json::json!({ "converted_text": text.to_uppercase() }).to_string())
        }
    }

    fn read_pairs(path: &Path) -> Vec<DialoguePair> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_topic_file_name() {
        assert_eq!(topic_file_name("Здоровое питание"), "Здоровое_питание.jsonl");
        let long = "Очень длинная тема про путешествия по России";
        let name = topic_file_name(long);
        assert_eq!(name.trim_end_matches(".jsonl").chars().count(), 30);
        assert_eq!(topic_file_name("a/b"), "a_b.jsonl");
    }

    #[tokio::test]
    async fn test_run_topic_appends() {
        let dir = tempfile::tempdir().unwrap();
        let client = Scripted::new();
        let job = DialogueJob::new(client.clone(), dir.path()).with_samples(2);

        let first = job.run_topic("Здоровое питание").await.unwrap();
        job.run_topic("Здоровое питание ").await.unwrap();

        assert_eq!(first.file_name, "Здоровое_питание.jsonl");
        assert_eq!(first.pairs, 2);
        assert_eq!(first.id, text_hash("Здоровое питание"));

        let pairs = read_pairs(&dir.path().join(&first.file_name));
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0].ai_response, "2 ЛИТРА");
        assert_eq!(client.count(NUMBERS_TO_WORDS_PROMPT), 4);

        let calls = client.calls.lock().unwrap();
        assert_eq!(
            calls[0].messages[1].content,
            "Сгенерируй 2 пар запрос-ответ на тему: \"Здоровое питание\""
        );
        assert_eq!(calls[1].temperature, Some(CONVERT_TEMPERATURE));
    }

    #[tokio::test]
    async fn test_without_number_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let client = Scripted::new();
        let job = DialogueJob::new(client.clone(), dir.path()).with_convert_numbers(false);

        let pairs = job.generate("Спорт").await.unwrap();
        assert_eq!(pairs[0].ai_response, "2 литра");
        assert_eq!(client.count(NUMBERS_TO_WORDS_PROMPT), 0);
        assert!(job.generate("  ").await.is_err());
    }

    #[tokio::test]
    async fn test_topics_file_resumes() {
        let dir = tempfile::tempdir().unwrap();
        let topics = dir.path().join("topics.txt");
        std::fs::write(&topics, "Спорт\nсбой сети\nКино\n").unwrap();
        let out = dir.path().join("datasets");

        let job = DialogueJob::new(Scripted::new(), &out).with_convert_numbers(false);
        let report = Runner::new(RecordStore::new(&topics), job.manifest_path())
            .run(&job)
            .await;

        assert!(matches!(report.outcome, Outcome::RowFailed { index: 1, .. }));
        assert_eq!(std::fs::read_to_string(&topics).unwrap(), "сбой сети\nКино\n");
        assert_eq!(read_pairs(&out.join("Спорт.jsonl")).len(), 2);

        let manifest = std::fs::read_to_string(job.manifest_path()).unwrap();
        let entry: GeneratedTopic = serde_json::from_str(manifest.trim()).unwrap();
        assert_eq!(entry.topic, "Спорт");
        assert!(!out.join("Кино.jsonl").exists());
    }
}
