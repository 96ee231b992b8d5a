//! Configuration management for the CLI.
//!
//! Configuration is stored in ~/.ttsprep/{app_name}/config.yaml as a set of
//! named contexts, similar to kubectl.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::paths::Paths;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Application name (not serialized).
    #[serde(skip)]
    pub app_name: String,

    /// Name of the currently active context.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub current_context: String,

    /// Map of context name to context configuration.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub contexts: HashMap<String, Context>,

    /// Path to the config file (not serialized).
    #[serde(skip)]
    config_path: PathBuf,
}

/// Settings for one provider account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Context name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Provider tag: elevenlabs, ollama, deepseek, gemini or openrouter.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    /// API base URL (optional, uses default if empty).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_url: String,

    /// Request timeout in seconds (optional).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub timeout: i32,

    /// Maximum number of retries (optional).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_retries: i32,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_model: String,

    /// Default voice name for synthesis.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_voice: String,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl Config {
    /// Gets the default config file path.
    pub fn default_config_path(app_name: &str) -> Option<PathBuf> {
        Paths::new(app_name).ok().map(|p| p.config_file())
    }

    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Saves the configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Adds or replaces a context.
    pub fn add_context(&mut self, name: &str, mut ctx: Context) -> anyhow::Result<()> {
        ctx.name = name.to_string();
        self.contexts.insert(name.to_string(), ctx);
        if self.current_context.is_empty() {
            self.current_context = name.to_string();
        }
        self.save()
    }

    /// Deletes a context.
    pub fn delete_context(&mut self, name: &str) -> anyhow::Result<()> {
        if self.contexts.remove(name).is_none() {
            anyhow::bail!("context '{}' not found", name);
        }
        if self.current_context == name {
            self.current_context.clear();
        }
        self.save()
    }

    /// Sets the current context.
    pub fn use_context(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.contexts.contains_key(name) {
            anyhow::bail!("context '{}' not found", name);
        }
        self.current_context = name.to_string();
        self.save()
    }

    /// Gets a specific context.
    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    /// Gets the current context.
    pub fn get_current_context(&self) -> Option<&Context> {
        if self.current_context.is_empty() {
            return None;
        }
        self.contexts.get(&self.current_context)
    }

    /// Picks the context for a provider.
    ///
    /// An explicit name must exist. Otherwise a context named after the
    /// provider wins, then the current context if it is not bound to
    /// another provider.
    pub fn context_for(&self, provider: &str, explicit: Option<&str>) -> anyhow::Result<Option<&Context>> {
        if let Some(name) = explicit.filter(|n| !n.is_empty()) {
            return match self.get_context(name) {
                Some(ctx) => Ok(Some(ctx)),
                None => anyhow::bail!("context '{}' not found", name),
            };
        }
        Ok(self.get_context(provider).or_else(|| {
            self.get_current_context()
                .filter(|ctx| ctx.provider.is_empty() || ctx.provider == provider)
        }))
    }

    /// Lists all context names, sorted.
    pub fn list_contexts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.contexts.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Context {
    /// A copy safe to print: the API key is masked.
    pub fn masked(&self) -> Context {
        Context {
            api_key: mask_api_key(&self.api_key),
            ..self.clone()
        }
    }
}

/// Loads configuration for the specified app, creating an empty file on
/// first use.
pub fn load_config(app_name: &str, custom_path: Option<&str>) -> anyhow::Result<Config> {
    let config_path = match custom_path {
        Some(p) => PathBuf::from(p),
        None => Config::default_config_path(app_name)
            .ok_or_else(|| anyhow::anyhow!("cannot determine config path"))?,
    };

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut cfg = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        }
    } else {
        let cfg = Config::default();
        std::fs::write(&config_path, serde_yaml::to_string(&cfg)?)?;
        cfg
    };

    cfg.app_name = app_name.to_string();
    cfg.config_path = config_path;

    Ok(cfg)
}

/// Masks the API key for display.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_config(dir: &TempDir) -> Config {
        let path = dir.path().join("sub/config.yaml");
        load_config("ttsprep", path.to_str()).unwrap()
    }

    fn ctx(provider: &str, key: &str) -> Context {
        Context {
            provider: provider.into(),
            api_key: key.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_load_creates_file() {
        let dir = TempDir::new().unwrap();
        let cfg = temp_config(&dir);
        assert!(cfg.path().exists());
        assert!(cfg.contexts.is_empty());
        assert_eq!(cfg.app_name, "ttsprep");
    }

    #[test]
    fn test_context_roundtrip_on_disk() {
        let dir = TempDir::new().unwrap();
        let mut cfg = temp_config(&dir);
        cfg.add_context("work", ctx("elevenlabs", "sk-123456789")).unwrap();
        cfg.add_context("deepseek", ctx("deepseek", "ds-key")).unwrap();
        assert_eq!(cfg.current_context, "work");

        let path = cfg.path().to_path_buf();
        let reloaded = load_config("ttsprep", path.to_str()).unwrap();
        assert_eq!(reloaded.list_contexts(), vec!["deepseek", "work"]);
        assert_eq!(reloaded.get_context("work").unwrap().name, "work");
        assert_eq!(reloaded.get_context("work").unwrap().provider, "elevenlabs");
    }

    #[test]
    fn test_delete_and_use() {
        let dir = TempDir::new().unwrap();
        let mut cfg = temp_config(&dir);
        cfg.add_context("a", ctx("gemini", "k")).unwrap();
        cfg.add_context("b", ctx("gemini", "k")).unwrap();
        cfg.use_context("b").unwrap();
        assert_eq!(cfg.current_context, "b");
        cfg.delete_context("b").unwrap();
        assert!(cfg.current_context.is_empty());
        assert!(cfg.delete_context("b").is_err());
        assert!(cfg.use_context("missing").is_err());
    }

    #[test]
    fn test_context_for() {
        let dir = TempDir::new().unwrap();
        let mut cfg = temp_config(&dir);
        cfg.add_context("main", ctx("elevenlabs", "el")).unwrap();
        cfg.add_context("gemini", ctx("gemini", "gm")).unwrap();

        let picked = cfg.context_for("gemini", None).unwrap().unwrap();
        assert_eq!(picked.api_key, "gm");
        assert!(cfg.context_for("deepseek", None).unwrap().is_none());
        let picked = cfg.context_for("gemini", Some("main")).unwrap().unwrap();
        assert_eq!(picked.api_key, "el");
        assert!(cfg.context_for("gemini", Some("nope")).is_err());

        cfg.add_context("shared", ctx("", "any")).unwrap();
        cfg.use_context("shared").unwrap();
        let picked = cfg.context_for("deepseek", None).unwrap().unwrap();
        assert_eq!(picked.name, "shared");
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("short"), "*****");
        assert_eq!(mask_api_key("sk-1234567890abcd"), "sk-1*********abcd");
        assert_eq!(mask_api_key("ключ-ключ-ключ"), "ключ******ключ");
    }

    #[test]
    fn test_masked_context() {
        let c = ctx("gemini", "AIzaSyExampleKey1234").masked();
        assert!(c.api_key.starts_with("AIza"));
        assert!(c.api_key.contains('*'));
    }
}
