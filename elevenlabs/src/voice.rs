//! Voice library service.

use std::sync::Arc;

use tracing::debug;

use super::{
    error::{Error, Result},
    http::HttpClient,
    types::{Voice, VoiceList},
};

/// Voice library service.
pub struct VoiceService {
    http: Arc<HttpClient>,
}

impl VoiceService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Searches voices by name, description or labels.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let voices = client.voices().search("Prince Nuri").await?;
    /// ```
    pub async fn search(&self, query: &str) -> Result<Vec<Voice>> {
        let list: VoiceList = self
            .http
            .get_json("/v2/voices", &[("search", query)])
            .await?;
        debug!(query, found = list.voices.len(), "voice search");
        Ok(list.voices)
    }

    /// Returns the first voice matching `name`.
    pub async fn find(&self, name: &str) -> Result<Voice> {
        first_match(self.search(name).await?, name)
    }
}

fn first_match(voices: Vec<Voice>, name: &str) -> Result<Voice> {
    voices
        .into_iter()
        .next()
        .ok_or_else(|| Error::VoiceNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn voice(id: &str) -> Voice {
        Voice {
            voice_id: id.to_string(),
            name: format!("name-{id}"),
            category: None,
            labels: HashMap::new(),
        }
    }

    #[test]
    fn test_first_match() {
        let v = first_match(vec![voice("a"), voice("b")], "x").unwrap();
        assert_eq!(v.voice_id, "a");
    }

    #[test]
    fn test_no_match() {
        let err = first_match(vec![], "Ghost").unwrap_err();
        assert!(matches!(err, Error::VoiceNotFound(ref n) if n == "Ghost"));
    }
}
