//! Credential resolution: environment first, then config contexts.

use crate::config::{Config, Context};

/// Environment variable holding the API key for a provider.
pub fn api_key_env(provider: &str) -> Option<&'static str> {
    match provider {
        "elevenlabs" => Some("ELEVENLABS_TOKEN"),
        "deepseek" => Some("DEEPSEEK_TOKEN"),
        "gemini" => Some("GEMINI_TOKEN"),
        "openrouter" => Some("OPENROUTER_TOKEN"),
        _ => None,
    }
}

/// Environment variable holding the base URL for a provider.
pub fn base_url_env(provider: &str) -> Option<&'static str> {
    match provider {
        "ollama" => Some("OLLAMA_HOST"),
        _ => None,
    }
}

/// Settings resolved for one provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    pub provider: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub default_model: Option<String>,
    pub default_voice: Option<String>,
    pub max_retries: Option<u32>,
    /// Name of the context the values came from, if any.
    pub context: Option<String>,
}

impl Credentials {
    /// Returns the API key or an error naming where to set it.
    pub fn require_api_key(&self) -> anyhow::Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => match api_key_env(&self.provider) {
                Some(var) => anyhow::bail!(
                    "missing API key for {}: set {} or add a context with --api-key",
                    self.provider,
                    var
                ),
                None => anyhow::bail!("missing API key for {}", self.provider),
            },
        }
    }
}

/// Resolves credentials with an injectable environment lookup.
pub struct Resolver<'a, E> {
    config: Option<&'a Config>,
    context: Option<&'a str>,
    env: E,
}

impl<'a> Resolver<'a, fn(&str) -> Option<String>> {
    /// Resolver reading the process environment.
    pub fn from_env(config: Option<&'a Config>, context: Option<&'a str>) -> Self {
        Self::new(config, context, process_env)
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl<'a, E> Resolver<'a, E>
where
    E: Fn(&str) -> Option<String>,
{
    pub fn new(config: Option<&'a Config>, context: Option<&'a str>, env: E) -> Self {
        Self {
            config,
            context,
            env,
        }
    }

    /// Resolves settings for `provider`. Environment values win over the
    /// context; an explicitly named context must exist.
    pub fn resolve(&self, provider: &str) -> anyhow::Result<Credentials> {
        let ctx: Option<&Context> = match self.config {
            Some(cfg) => cfg.context_for(provider, self.context)?,
            None => None,
        };
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        let api_key = api_key_env(provider)
            .and_then(|var| (self.env)(var))
            .or_else(|| ctx.and_then(|c| non_empty(c.api_key.as_str())));
        let base_url = base_url_env(provider)
            .and_then(|var| (self.env)(var))
            .or_else(|| ctx.and_then(|c| non_empty(c.base_url.as_str())));

        Ok(Credentials {
            provider: provider.to_string(),
            api_key,
            base_url,
            default_model: ctx.and_then(|c| non_empty(c.default_model.as_str())),
            default_voice: ctx.and_then(|c| non_empty(c.default_voice.as_str())),
            max_retries: ctx.and_then(|c| u32::try_from(c.max_retries).ok().filter(|n| *n > 0)),
            context: ctx.map(|c| c.name.clone()),
        })
    }
}
