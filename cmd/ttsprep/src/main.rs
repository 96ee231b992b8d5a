//! ttsprep - TTS dataset preparation from the command line.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{AudioCommand, ConfigCommand, DatasetCommand, NeuralCommand};

/// ttsprep - build TTS training corpora.
///
/// Every long-running job reads its input file, appends results to an
/// output file and writes the unprocessed records back to the input, so
/// rerunning the same command continues where the last run stopped:
///   - audio: synthesize speech for JSONL or TSV corpora
///   - neural: normalize text, generate and flatten dialogues with an LLM
///   - dataset: statistics over synthesized datasets
///
/// Provider credentials come from the environment (ELEVENLABS_TOKEN,
/// DEEPSEEK_TOKEN, GEMINI_TOKEN, OPENROUTER_TOKEN, OLLAMA_HOST) or from
/// contexts stored in ~/.ttsprep/ttsprep/config.yaml.
#[derive(Parser)]
#[command(name = "ttsprep")]
#[command(about = "TTS dataset preparation tool")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.ttsprep/ttsprep/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Context name to use
    #[arg(short = 'c', long, global = true)]
    pub context: Option<String>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage CLI configuration
    Config(ConfigCommand),
    /// Speech synthesis for text corpora
    Audio(AudioCommand),
    /// LLM text processing
    Neural(NeuralCommand),
    /// Dataset statistics
    Dataset(DatasetCommand),
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Config(cmd) => cmd.run(&cli).await,
        Commands::Audio(cmd) => cmd.run(&cli).await,
        Commands::Neural(cmd) => cmd.run(&cli).await,
        Commands::Dataset(cmd) => cmd.run(&cli).await,
    }
}
