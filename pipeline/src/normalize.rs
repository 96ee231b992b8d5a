//! LLM text normalization for speech synthesis.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;
use ttsprep_corpus::{BaseRecord, RawRecord, RecordId, RecordProcessor, Tabular};
use ttsprep_llm::{ChatClient, ChatRequest, json_utils};

use crate::prompts::NORMALIZE_PROMPT;

/// Sampling temperature for normalization.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Structured reply of the normalization prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizeReply {
    /// Quality of the original text, 0.0 to 1.0.
    pub quality_score: f64,
    /// Text ready for TTS.
    pub processed_text: String,
    /// Explanation of the score.
    pub summary: String,
}

/// A record after normalization. `text` holds the processed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub id: RecordId,
    pub text: String,
    pub original_text: String,
    pub quality_score: f64,
    pub summary: String,
}

impl Tabular for NormalizedRecord {
    fn columns() -> &'static [&'static str] {
        &["id", "text", "original_text", "quality_score", "summary"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.text.clone(),
            self.original_text.clone(),
            self.quality_score.to_string(),
            self.summary.clone(),
        ]
    }
}

/// Normalizes each `{id, text}` record with a chat model.
pub struct NormalizeJob {
    client: Arc<dyn ChatClient>,
    temperature: f32,
}

impl NormalizeJob {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self {
            client,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sends one text to the model. Blank text is rejected without a call.
    pub async fn normalize(&self, text: &str) -> anyhow::Result<NormalizeReply> {
        let text = text.trim();
        if text.is_empty() {
            anyhow::bail!("no text provided");
        }

        let request = ChatRequest::new(NORMALIZE_PROMPT, text)
            .with_temperature(self.temperature)
            .with_schema::<NormalizeReply>();
        let reply = self.client.chat(&request).await?;
        let reply: NormalizeReply = json_utils::parse_reply(&reply)?;

        if reply.processed_text.trim().is_empty() {
            anyhow::bail!("model returned empty processed_text");
        }
        Ok(reply)
    }
}

#[async_trait]
impl RecordProcessor for NormalizeJob {
    type Output = NormalizedRecord;

    async fn process(&self, index: usize, record: &RawRecord) -> anyhow::Result<NormalizedRecord> {
        let base: BaseRecord = record.decode()?;
        let reply = self.normalize(&base.text).await?;
        info!(index, id = %base.id, quality_score = reply.quality_score, "text normalized");

        Ok(NormalizedRecord {
            id: base.id,
            text: reply.processed_text,
            original_text: base.text.trim().to_string(),
            quality_score: reply.quality_score,
            summary: reply.summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use ttsprep_llm::Result as LlmResult;

    struct Canned {
        reply: String,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl Canned {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatClient for Canned {
        fn provider(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-1"
        }

        async fn chat(&self, request: &ChatRequest) -> LlmResult<String> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn test_process_record() {
        let client = Canned::new(
            "```json\n{\"quality_score\": 0.85, \"processed_text\": \"Десять человек.\", \"summary\": \"Оценка 0.85\"}\n```",
        );
        let job = NormalizeJob::new(client.clone());
        let record = RawRecord::Json(r#"{"id": 3, "text": "  10 человек. "}"#.to_string());

        let out = job.process(0, &record).await.unwrap();
        assert_eq!(out.id, RecordId::Int(3));
        assert_eq!(out.text, "Десять человек.");
        assert_eq!(out.original_text, "10 человек.");
        assert!((out.quality_score - 0.85).abs() < 1e-9);

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen[0].system_prompt(), Some(NORMALIZE_PROMPT));
        assert_eq!(seen[0].messages[1].content, "10 человек.");
        assert_eq!(seen[0].temperature, Some(DEFAULT_TEMPERATURE));
        assert!(seen[0].schema.is_some());
    }

    #[tokio::test]
    async fn test_blank_text_is_a_failure() {
        let client = Canned::new("{}");
        let job = NormalizeJob::new(client.clone());
        let record = RawRecord::Json(r#"{"id": "a", "text": "   "}"#.to_string());

        assert!(job.process(0, &record).await.is_err());
        assert!(client.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_reply_is_a_failure() {
        let job = NormalizeJob::new(Canned::new("not json at all"));
        assert!(job.normalize("текст").await.is_err());
    }

    #[test]
    fn test_tabular_row() {
        let rec = NormalizedRecord {
            id: RecordId::from("x"),
            text: "t".into(),
            original_text: "o".into(),
            quality_score: 0.5,
            summary: "s".into(),
        };
        assert_eq!(rec.row().len(), NormalizedRecord::columns().len());
        assert_eq!(rec.row()[3], "0.5");
    }
}
