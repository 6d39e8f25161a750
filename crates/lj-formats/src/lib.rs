//! File formats for the Lissajous generator.
//!
//! Parameter presets (flat comma-delimited text) and 16-bit PCM WAV output.

mod preset;
mod wav;

pub use preset::{format_rows, load_preset, parse_rows, save_preset};
pub use wav::{frames_to_wav, write_wav, WavRecorder};

/// Error type for reading and writing files.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A preset line had fewer than three fields
    #[error("line {line}: expected 3 fields, found {found}")]
    MissingFields { line: usize, found: usize },
    /// A preset field was not a number
    #[error("line {line}: invalid number {value:?}")]
    InvalidNumber { line: usize, value: String },
    /// WAV encoding error
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}
