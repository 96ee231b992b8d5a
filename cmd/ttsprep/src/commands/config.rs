//! Configuration management commands.

use clap::{Args, Subcommand};

use ttsprep_cli::{Context as CliContext, api_key_env};
use ttsprep_llm::default_model;

use super::{ELEVENLABS, get_config, print_success, print_warning};
use crate::Cli;

const PROVIDERS: &[&str] = &[ELEVENLABS, "ollama", "deepseek", "gemini", "openrouter"];

/// Manage CLI configuration.
///
/// Contexts hold provider credentials and defaults, similar to kubectl's
/// context management. Environment variables override context values.
///
/// Configuration is stored in ~/.ttsprep/ttsprep/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Add a new context
    #[command(name = "add-context")]
    AddContext {
        /// Context name
        name: String,
        /// Provider: elevenlabs, ollama, deepseek, gemini or openrouter
        #[arg(long)]
        provider: String,
        /// API key
        #[arg(long)]
        api_key: Option<String>,
        /// API base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<i32>,
        /// Maximum retries
        #[arg(long)]
        max_retries: Option<i32>,
        /// Default model
        #[arg(long)]
        default_model: Option<String>,
        /// Default voice name
        #[arg(long)]
        default_voice: Option<String>,
    },
    /// Delete a context
    #[command(name = "delete-context")]
    DeleteContext {
        /// Context name
        name: String,
    },
    /// Set the current context
    #[command(name = "use-context")]
    UseContext {
        /// Context name
        name: String,
    },
    /// Display the current context
    #[command(name = "get-context")]
    GetContext,
    /// List all contexts
    #[command(name = "list-contexts", alias = "get-contexts")]
    ListContexts,
    /// View the current configuration
    View,
}

impl ConfigCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::AddContext {
                name,
                provider,
                api_key,
                base_url,
                timeout,
                max_retries,
                default_model: model,
                default_voice,
            } => {
                if !PROVIDERS.contains(&provider.as_str()) {
                    anyhow::bail!(
                        "unknown provider '{}', expected one of: {}",
                        provider,
                        PROVIDERS.join(", ")
                    );
                }
                if api_key.is_none() {
                    if let Some(var) = api_key_env(provider) {
                        print_warning(&format!(
                            "No --api-key given; {} must be set when using this context",
                            var
                        ));
                    }
                }

                let mut cfg = get_config(cli)?;
                let ctx = CliContext {
                    provider: provider.clone(),
                    api_key: api_key.clone().unwrap_or_default(),
                    base_url: base_url.clone().unwrap_or_default(),
                    timeout: timeout.unwrap_or(0),
                    max_retries: max_retries.unwrap_or(0),
                    default_model: model.clone().unwrap_or_default(),
                    default_voice: default_voice.clone().unwrap_or_default(),
                    ..Default::default()
                };

                cfg.add_context(name, ctx)?;
                print_success(&format!("Context \"{}\" added successfully", name));
                Ok(())
            }

            ConfigSubcommand::DeleteContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.delete_context(name)?;
                print_success(&format!("Context \"{}\" deleted", name));
                Ok(())
            }

            ConfigSubcommand::UseContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.use_context(name)?;
                print_success(&format!("Switched to context \"{}\"", name));
                Ok(())
            }

            ConfigSubcommand::GetContext => {
                let cfg = get_config(cli)?;
                if cfg.current_context.is_empty() {
                    println!("No current context set");
                } else {
                    println!("{}", cfg.current_context);
                }
                Ok(())
            }

            ConfigSubcommand::ListContexts => {
                let cfg = get_config(cli)?;

                if cfg.contexts.is_empty() {
                    println!("No contexts configured");
                    return Ok(());
                }

                println!(
                    "{:<8} {:<20} {:<12} {:<30} {}",
                    "CURRENT", "NAME", "PROVIDER", "BASE_URL", "DEFAULT_MODEL"
                );

                for name in cfg.list_contexts() {
                    let Some(ctx) = cfg.get_context(name) else {
                        continue;
                    };
                    let current = if name == cfg.current_context { "*" } else { "" };
                    let base_url = if ctx.base_url.is_empty() {
                        "(default)"
                    } else {
                        &ctx.base_url
                    };
                    let model = if ctx.default_model.is_empty() {
                        default_model(&ctx.provider).unwrap_or("")
                    } else {
                        &ctx.default_model
                    };
                    println!(
                        "{:<8} {:<20} {:<12} {:<30} {}",
                        current, name, ctx.provider, base_url, model
                    );
                }

                Ok(())
            }

            ConfigSubcommand::View => {
                let cfg = get_config(cli)?;

                println!("Config file: {}", cfg.path().display());
                println!("Current context: {}", cfg.current_context);
                println!("Contexts: {}", cfg.contexts.len());

                if !cfg.contexts.is_empty() {
                    println!("\nContext details:");

                    for name in cfg.list_contexts() {
                        let Some(ctx) = cfg.get_context(name).map(CliContext::masked) else {
                            continue;
                        };
                        println!("\n  {}:", name);
                        println!("    Provider: {}", ctx.provider);
                        println!("    API Key: {}", ctx.api_key);
                        if !ctx.base_url.is_empty() {
                            println!("    Base URL: {}", ctx.base_url);
                        }
                        if ctx.timeout > 0 {
                            println!("    Timeout: {}s", ctx.timeout);
                        }
                        if ctx.max_retries > 0 {
                            println!("    Max Retries: {}", ctx.max_retries);
                        }
                        if !ctx.default_model.is_empty() {
                            println!("    Default Model: {}", ctx.default_model);
                        }
                        if !ctx.default_voice.is_empty() {
                            println!("    Default Voice: {}", ctx.default_voice);
                        }
                    }
                }

                Ok(())
            }
        }
    }
}
