//! Audio files on disk: WAV wrapping of raw PCM, durations.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use ttsprep_elevenlabs::OutputFormat;

/// Sample rate of synthesized WAV files.
pub const WAV_SAMPLE_RATE: u32 = 48_000;

/// Container written for each synthesized record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioFormat {
    /// 16-bit mono PCM at 48 kHz in a WAV container.
    #[default]
    Wav,
    /// MP3 at 44.1 kHz / 192 kbps, stored as returned.
    Mp3,
}

impl AudioFormat {
    /// File extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => ".wav",
            AudioFormat::Mp3 => ".mp3",
        }
    }

    /// Encoding requested from the TTS provider.
    pub fn output_format(&self) -> OutputFormat {
        match self {
            AudioFormat::Wav => OutputFormat::Pcm48000,
            AudioFormat::Mp3 => OutputFormat::Mp3_44100_192,
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for AudioFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "wav" => Ok(AudioFormat::Wav),
            "mp3" => Ok(AudioFormat::Mp3),
            _ => anyhow::bail!("unsupported audio format '{}': expected .wav or .mp3", s),
        }
    }
}

/// Writes signed 16-bit little-endian mono PCM as a WAV file.
///
/// A trailing odd byte is dropped.
pub fn write_wav(path: &Path, pcm: &[u8], sample_rate: u32) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for pair in pcm.chunks_exact(2) {
        writer.write_sample(i16::from_le_bytes([pair[0], pair[1]]))?;
    }
    writer.finalize()?;
    Ok(())
}

/// Stores provider audio at `path` in the given container.
pub async fn save_audio(path: &Path, audio: Vec<u8>, format: AudioFormat) -> anyhow::Result<()> {
    match format {
        AudioFormat::Wav => {
            let path = path.to_path_buf();
            tokio::task::spawn_blocking(move || write_wav(&path, &audio, WAV_SAMPLE_RATE)).await?
        }
        AudioFormat::Mp3 => {
            tokio::fs::write(path, audio).await?;
            Ok(())
        }
    }
}

/// Duration of a WAV file in seconds.
pub fn wav_duration(path: &Path) -> anyhow::Result<f64> {
    let reader = WavReader::open(path)?;
    let rate = reader.spec().sample_rate;
    if rate == 0 {
        anyhow::bail!("{}: zero sample rate", path.display());
    }
    Ok(f64::from(reader.duration()) / f64::from(rate))
}

/// Formats seconds as `1h 2m 3s 40ms`, omitting leading zero units.
pub fn format_duration(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let whole = seconds.trunc() as u64;
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;
    let millis = ((seconds.fract() * 1000.0).round() as u64).min(999);

    if hours > 0 {
        format!("{}h {}m {}s {}ms", hours, minutes, secs, millis)
    } else if minutes > 0 {
        format!("{}m {}s {}ms", minutes, secs, millis)
    } else {
        format!("{}s {}ms", secs, millis)
    }
}
