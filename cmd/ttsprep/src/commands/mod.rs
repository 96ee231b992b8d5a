//! CLI commands module.

mod audio;
mod config;
mod dataset;
mod neural;
mod util;

pub use audio::AudioCommand;
pub use config::ConfigCommand;
pub use dataset::DatasetCommand;
pub use neural::NeuralCommand;

// Re-export utils for use in commands
pub(crate) use util::*;
