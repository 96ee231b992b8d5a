//! Speech synthesis commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use ttsprep_corpus::{RecordStore, Runner};
use ttsprep_pipeline::{AudioFormat, ElevenLabsSynthesizer, SynthesisJob};

use super::{create_synthesizer, print_info, report_run};
use crate::Cli;

/// Voice used for JSONL corpora when none is configured.
const DEFAULT_JSONL_VOICE: &str = "Prince Nuri";

/// Voice used for TSV corpora when none is configured.
const DEFAULT_TSV_VOICE: &str = "Arcades";

/// Speech synthesis for text corpora.
///
/// Synthesized records are removed from the input file; rerun the same
/// command to continue after a limit or a failure.
#[derive(Args)]
pub struct AudioCommand {
    #[command(subcommand)]
    command: AudioSubcommand,
}

#[derive(Args)]
struct SynthesisArgs {
    /// Input corpus
    #[arg(long)]
    input: PathBuf,
    /// Output directory
    #[arg(long)]
    output_dir: PathBuf,
    /// Voice name (default from context)
    #[arg(long)]
    voice: Option<String>,
    /// Stop after the record at this 0-based index
    #[arg(long)]
    limit: Option<usize>,
    /// Audio format: .wav or .mp3
    #[arg(long, default_value = ".wav")]
    format: AudioFormat,
}

#[derive(Subcommand)]
enum AudioSubcommand {
    /// Synthesize a JSONL corpus of {id, text} records
    Jsonl(SynthesisArgs),
    /// Synthesize a TSV corpus with id, text and source columns
    Tsv(SynthesisArgs),
}

impl AudioCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            AudioSubcommand::Jsonl(args) => {
                let synth = create_synthesizer(cli, args.voice.as_deref(), DEFAULT_JSONL_VOICE).await?;
                let job = SynthesisJob::jsonl(synth, &args.input, &args.output_dir, args.format);
                run_job(&job, args).await
            }
            AudioSubcommand::Tsv(args) => {
                let synth = create_synthesizer(cli, args.voice.as_deref(), DEFAULT_TSV_VOICE).await?;
                let job = SynthesisJob::tsv(synth, &args.output_dir, args.format);
                run_job(&job, args).await
            }
        }
    }
}

async fn run_job(
    job: &SynthesisJob<ElevenLabsSynthesizer>,
    args: &SynthesisArgs,
) -> anyhow::Result<()> {
    let sink = job.sink_path();
    print_info(&format!("Metadata: {}", sink.display()));

    let report = Runner::new(RecordStore::new(&args.input), sink)
        .with_limit(args.limit)
        .run(job)
        .await;
    report_run(report)
}
