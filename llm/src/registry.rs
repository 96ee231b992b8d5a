//! Provider registry mapping tags to client factories.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{LlmError, Result};
use crate::gemini::{self, GeminiClient};
use crate::ollama::{self, OllamaClient};
use crate::openai::{self, OpenAiCompatible};
use crate::types::ChatClient;

/// Settings handed to a factory.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Overrides the provider's default model.
    pub model: Option<String>,
}

impl ProviderConfig {
    fn require_key(&self, provider: &str) -> Result<String> {
        match &self.api_key {
            Some(key) if !key.is_empty() => Ok(key.clone()),
            _ => Err(LlmError::MissingApiKey(provider.to_string())),
        }
    }
}

/// Builds a client from its settings.
pub type Factory = Box<dyn Fn(&ProviderConfig) -> Result<Arc<dyn ChatClient>> + Send + Sync>;

/// Registry of chat providers keyed by tag.
pub struct Registry {
    factories: BTreeMap<String, Factory>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry with `ollama`, `deepseek`, `gemini` and `openrouter`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(ollama::PROVIDER, Box::new(build_ollama));
        registry.insert(openai::DEEPSEEK, Box::new(build_deepseek));
        registry.insert(gemini::PROVIDER, Box::new(build_gemini));
        registry.insert(openai::OPENROUTER, Box::new(build_openrouter));
        registry
    }

    fn insert(&mut self, tag: &str, factory: Factory) {
        self.factories.insert(tag.to_string(), factory);
    }

    /// Registers a factory. Fails if the tag is taken.
    pub fn register(&mut self, tag: impl Into<String>, factory: Factory) -> Result<()> {
        let tag = tag.into();
        if self.factories.contains_key(&tag) {
            return Err(LlmError::DuplicateProvider(tag));
        }
        self.factories.insert(tag, factory);
        Ok(())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Registered tags in sorted order.
    pub fn providers(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Builds a client for `tag`.
    pub fn create(&self, tag: &str, config: &ProviderConfig) -> Result<Arc<dyn ChatClient>> {
        let factory = self
            .factories
            .get(tag)
            .ok_or_else(|| LlmError::UnknownProvider(tag.to_string()))?;
        factory(config)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Default model for a built-in provider tag.
pub fn default_model(tag: &str) -> Option<&'static str> {
    match tag {
        ollama::PROVIDER => Some(ollama::DEFAULT_MODEL),
        openai::DEEPSEEK => Some(openai::DEEPSEEK_MODEL),
        gemini::PROVIDER => Some(gemini::DEFAULT_MODEL),
        openai::OPENROUTER => Some(openai::OPENROUTER_MODEL),
        _ => None,
    }
}

/// True if the built-in provider needs an API key.
pub fn requires_api_key(tag: &str) -> bool {
    tag != ollama::PROVIDER
}

fn build_ollama(config: &ProviderConfig) -> Result<Arc<dyn ChatClient>> {
    let host = config.base_url.as_deref().unwrap_or(ollama::DEFAULT_HOST);
    let model = config.model.as_deref().unwrap_or(ollama::DEFAULT_MODEL);
    Ok(Arc::new(OllamaClient::new(host, model)?))
}

fn build_deepseek(config: &ProviderConfig) -> Result<Arc<dyn ChatClient>> {
    let key = config.require_key(openai::DEEPSEEK)?;
    let mut client = OpenAiCompatible::deepseek(key, config.model.clone())?;
    if let Some(url) = &config.base_url {
        client = client.with_base_url(url.clone());
    }
    Ok(Arc::new(client))
}

fn build_gemini(config: &ProviderConfig) -> Result<Arc<dyn ChatClient>> {
    let key = config.require_key(gemini::PROVIDER)?;
    let model = config.model.as_deref().unwrap_or(gemini::DEFAULT_MODEL);
    let mut client = GeminiClient::new(key, model)?;
    if let Some(url) = &config.base_url {
        client = client.with_base_url(url.clone());
    }
    Ok(Arc::new(client))
}

fn build_openrouter(config: &ProviderConfig) -> Result<Arc<dyn ChatClient>> {
    let key = config.require_key(openai::OPENROUTER)?;
    let mut client = OpenAiCompatible::openrouter(key, config.model.clone())?;
    if let Some(url) = &config.base_url {
        client = client.with_base_url(url.clone());
    }
    Ok(Arc::new(client))
}
