//! Dataset statistics commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use ttsprep_cli::{Output, OutputFormat};
use ttsprep_pipeline::dataset_duration;

use super::print_warning;
use crate::Cli;

/// Dataset statistics.
#[derive(Args)]
pub struct DatasetCommand {
    #[command(subcommand)]
    command: DatasetSubcommand,
}

#[derive(Subcommand)]
enum DatasetSubcommand {
    /// Total duration of the WAV files listed in a metadata file
    Duration {
        /// metadata.jsonl or elevenlabs_audio.tsv
        #[arg(long)]
        metadata: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Output file (default: stdout)
        #[arg(short = 'o', long)]
        output: Option<String>,
    },
}

impl DatasetCommand {
    pub async fn run(&self, _cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            DatasetSubcommand::Duration {
                metadata,
                json,
                output,
            } => {
                let stats = dataset_duration(metadata)?;
                if stats.missing > 0 {
                    print_warning(&format!("{} audio files listed but missing", stats.missing));
                }

                let format = if *json {
                    OutputFormat::Json
                } else {
                    OutputFormat::Yaml
                };
                Output::new(format, output.clone()).write(&stats)
            }
        }
    }
}
