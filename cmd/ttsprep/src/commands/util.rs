//! Utility functions for CLI commands.

use std::sync::Arc;

use tracing::debug;
use ttsprep_cli::{Config, Credentials, Resolver, load_config};
use ttsprep_corpus::{Outcome, RunReport};
use ttsprep_elevenlabs::Client;
use ttsprep_llm::{ChatClient, ProviderConfig, Registry, requires_api_key};
use ttsprep_pipeline::ElevenLabsSynthesizer;

use crate::Cli;

const APP_NAME: &str = "ttsprep";

/// Provider tag of the speech service.
pub const ELEVENLABS: &str = "elevenlabs";

/// Gets the global configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(APP_NAME, cli.config.as_deref())
}

/// Resolves credentials for a provider from the environment and config.
pub fn resolve_credentials(cli: &Cli, provider: &str) -> anyhow::Result<Credentials> {
    let cfg = get_config(cli)?;
    let creds = Resolver::from_env(Some(&cfg), cli.context.as_deref()).resolve(provider)?;
    debug!(
        provider,
        context = ?creds.context,
        has_key = creds.api_key.is_some(),
        "credentials resolved"
    );
    Ok(creds)
}

/// Creates and checks a chat client for `provider`.
pub async fn create_chat_client(
    cli: &Cli,
    provider: &str,
    model: Option<&str>,
) -> anyhow::Result<Arc<dyn ChatClient>> {
    let registry = Registry::builtin();
    if !registry.contains(provider) {
        anyhow::bail!(
            "unknown provider '{}', expected one of: {}",
            provider,
            registry.providers().join(", ")
        );
    }

    let creds = resolve_credentials(cli, provider)?;
    if requires_api_key(provider) {
        creds.require_api_key()?;
    }

    let config = ProviderConfig {
        api_key: creds.api_key.clone(),
        base_url: creds.base_url.clone(),
        model: model.map(str::to_string).or_else(|| creds.default_model.clone()),
    };
    let client = registry.create(provider, &config)?;
    client.preflight().await?;

    print_info(&format!("Provider: {} ({})", client.provider(), client.model()));
    Ok(client)
}

/// Creates the ElevenLabs synthesizer and resolves its voice.
///
/// The voice comes from the flag, then the context, then `fallback_voice`.
pub async fn create_synthesizer(
    cli: &Cli,
    voice: Option<&str>,
    fallback_voice: &str,
) -> anyhow::Result<ElevenLabsSynthesizer> {
    let creds = resolve_credentials(cli, ELEVENLABS)?;
    let mut builder = Client::builder(creds.require_api_key()?);
    if let Some(url) = &creds.base_url {
        builder = builder.base_url(url);
    }
    if let Some(retries) = creds.max_retries {
        builder = builder.max_retries(retries);
    }
    let client = builder.build()?;

    let voice = voice
        .map(str::to_string)
        .or_else(|| creds.default_voice.clone())
        .unwrap_or_else(|| fallback_voice.to_string());
    let synth = ElevenLabsSynthesizer::connect(client, &voice).await?;
    print_success(&format!("voice '{}' found", synth.voice().voice_id));
    Ok(synth)
}

/// Prints a run summary. A run that did not complete becomes an error, so
/// the process exits with status 1.
pub fn report_run(report: RunReport) -> anyhow::Result<()> {
    let RunReport {
        outcome,
        total,
        processed,
        requeued,
    } = report;

    match &outcome {
        Outcome::Completed => {
            print_success(&format!("Done: {} of {} records processed", processed, total));
        }
        Outcome::LimitReached { .. } => {
            print_warning(&format!(
                "Stopped at limit: {} processed, {} left in input",
                processed, requeued
            ));
        }
        Outcome::RowFailed { .. } => {
            print_error(&format!(
                "Stopped on failure: {} processed, {} left in input",
                processed, requeued
            ));
        }
        Outcome::Fatal(_) => {
            print_error(&format!("Aborted: {} processed", processed));
        }
    }

    Ok(outcome.into_result()?)
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Prints error message.
pub fn print_error(msg: &str) {
    eprintln!("\x1b[31m✗\x1b[0m {}", msg);
}

/// Prints info message.
pub fn print_info(msg: &str) {
    eprintln!("\x1b[34mℹ\x1b[0m {}", msg);
}

/// Prints warning message.
pub fn print_warning(msg: &str) {
    eprintln!("\x1b[33m⚠\x1b[0m {}", msg);
}
