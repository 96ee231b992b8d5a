//! Jobs of the TTS dataset pipeline.
//!
//! Each job implements [`ttsprep_corpus::RecordProcessor`] and is driven by
//! a [`ttsprep_corpus::Runner`], so every stage resumes where it stopped:
//!
//! - [`SynthesisJob`]: text records to audio files plus metadata rows
//! - [`NormalizeJob`]: LLM cleanup of text for speech synthesis
//! - [`DialogueJob`]: synthetic dialogue pairs per topic
//!
//! [`flatten_dialogues`] and [`dataset_duration`] are one-shot helpers.

pub mod audio;
pub mod dialogue;
pub mod flatten;
pub mod normalize;
pub mod prompts;
pub mod stats;
pub mod synth;
pub mod synthesis;

pub use audio::{AudioFormat, format_duration, wav_duration};
pub use dialogue::{DialogueJob, DialoguePair, GeneratedTopic, topic_file_name};
pub use flatten::{FlattenReport, flatten_dialogues};
pub use normalize::{NormalizeJob, NormalizeReply, NormalizedRecord};
pub use stats::{DatasetDuration, dataset_duration};
pub use synth::{ElevenLabsSynthesizer, Synthesizer};
pub use synthesis::SynthesisJob;
