//! LLM text processing commands.

use std::path::{Path, PathBuf};

use clap::{ArgGroup, Args, Subcommand};

use ttsprep_corpus::{RecordStore, ResultsSink, Runner};
use ttsprep_pipeline::{DialogueJob, GeneratedTopic, NormalizeJob, flatten_dialogues};
use ttsprep_pipeline::{dialogue, normalize};

use super::{create_chat_client, print_info, print_success, report_run};
use crate::Cli;

/// LLM text processing.
///
/// Providers: ollama (default), deepseek, gemini, openrouter.
#[derive(Args)]
pub struct NeuralCommand {
    #[command(subcommand)]
    command: NeuralSubcommand,
}

#[derive(Subcommand)]
enum NeuralSubcommand {
    /// Normalize {id, text} records for speech synthesis
    Normalize {
        /// Input JSONL file
        #[arg(long)]
        input: PathBuf,
        /// Output JSONL file (default: <input>_processed.jsonl)
        #[arg(long)]
        output: Option<PathBuf>,
        /// LLM provider
        #[arg(long, default_value = "ollama")]
        provider: String,
        /// Model name (default per provider)
        #[arg(long)]
        model: Option<String>,
        /// Sampling temperature
        #[arg(long, default_value_t = normalize::DEFAULT_TEMPERATURE)]
        temperature: f32,
        /// Stop after the record at this 0-based index
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Generate dialogue pairs for one topic or a file of topics
    #[command(group(ArgGroup::new("topics").required(true).args(["topic", "topics_file"])))]
    Generate {
        /// Single topic
        #[arg(long)]
        topic: Option<String>,
        /// File with one topic per line; processed topics are removed
        #[arg(long)]
        topics_file: Option<PathBuf>,
        /// Output directory
        #[arg(long)]
        output_dir: PathBuf,
        /// Pairs per topic
        #[arg(long, default_value_t = dialogue::DEFAULT_SAMPLES as u16,
              value_parser = clap::value_parser!(u16).range(1..=1000))]
        samples: u16,
        /// LLM provider
        #[arg(long, default_value = "ollama")]
        provider: String,
        /// Model name (default per provider)
        #[arg(long)]
        model: Option<String>,
        /// Sampling temperature
        #[arg(long, default_value_t = dialogue::DEFAULT_TEMPERATURE)]
        temperature: f32,
        /// Keep numbers as digits in answers
        #[arg(long)]
        no_convert_numbers: bool,
        /// Stop after the topic at this 0-based index
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Split dialogue pairs into {id, text} records with content-hash ids
    Flatten {
        /// Input JSONL file of dialogue pairs
        #[arg(long)]
        input: PathBuf,
        /// Output JSONL file
        #[arg(long)]
        output: PathBuf,
    },
}

impl NeuralCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            NeuralSubcommand::Normalize {
                input,
                output,
                provider,
                model,
                temperature,
                limit,
            } => {
                let output = output.clone().unwrap_or_else(|| default_output(input));
                let client = create_chat_client(cli, provider, model.as_deref()).await?;
                let job = NormalizeJob::new(client).with_temperature(*temperature);

                print_info(&format!("Output file: {}", output.display()));
                let report = Runner::new(RecordStore::new(input), output)
                    .with_limit(*limit)
                    .run(&job)
                    .await;
                report_run(report)
            }

            NeuralSubcommand::Generate {
                topic,
                topics_file,
                output_dir,
                samples,
                provider,
                model,
                temperature,
                no_convert_numbers,
                limit,
            } => {
                let client = create_chat_client(cli, provider, model.as_deref()).await?;
                let job = DialogueJob::new(client, output_dir)
                    .with_samples(usize::from(*samples))
                    .with_temperature(*temperature)
                    .with_convert_numbers(!no_convert_numbers);

                if let Some(topic) = topic {
                    let entry = job.run_topic(topic).await?;
                    let mut manifest = ResultsSink::<GeneratedTopic>::open(job.manifest_path())?;
                    manifest.append(&entry)?;
                    print_success(&format!(
                        "{} pairs for '{}' saved to {}",
                        entry.pairs,
                        entry.topic,
                        job.out_dir().join(&entry.file_name).display()
                    ));
                    return Ok(());
                }

                let Some(topics_file) = topics_file else {
                    anyhow::bail!("either --topic or --topics-file is required");
                };
                let report = Runner::new(RecordStore::new(topics_file), job.manifest_path())
                    .with_limit(*limit)
                    .run(&job)
                    .await;
                report_run(report)
            }

            NeuralSubcommand::Flatten { input, output } => {
                let report = flatten_dialogues(input, output)?;
                print_success(&format!(
                    "{} records from {} pairs written to {} ({} duplicates skipped)",
                    report.written,
                    report.pairs,
                    output.display(),
                    report.duplicates
                ));
                Ok(())
            }
        }
    }
}

/// `<dir>/<stem>_processed.jsonl` next to the input. Stable across runs so a
/// resumed normalization appends to the same file.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_processed.jsonl", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttsprep_corpus::BaseRecord;

    #[test]
    fn test_default_output() {
        let out = default_output(Path::new("data/texts.jsonl"));
        assert_eq!(out, PathBuf::from("data/texts_processed.jsonl"));
        assert_eq!(default_output(Path::new("data/texts.jsonl")), out);
    }

    #[test]
    fn test_reruns_append_to_one_default_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("texts.jsonl");

        for (id, text) in [(1_i64, "первый"), (2, "второй")] {
            let mut sink = ResultsSink::<BaseRecord>::open(default_output(&input)).unwrap();
            sink.append(&BaseRecord::new(id, text)).unwrap();
        }

        let content = std::fs::read_to_string(dir.path().join("texts_processed.jsonl")).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
