//! WAV encoding for 16-bit stereo PCM.

use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::{Path, PathBuf};

use lj_engine::Frame;

use crate::FormatError;

fn spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

fn write_frames<W: Write + Seek>(
    writer: &mut hound::WavWriter<W>,
    frames: &[Frame],
) -> Result<(), FormatError> {
    for frame in frames {
        let (left, right) = frame.to_pcm16();
        writer.write_sample(left)?;
        writer.write_sample(right)?;
    }
    Ok(())
}

/// Write a complete WAV file.
pub fn write_wav(path: &Path, frames: &[Frame], sample_rate: u32) -> Result<(), FormatError> {
    let mut writer = hound::WavWriter::create(path, spec(sample_rate))?;
    write_frames(&mut writer, frames)?;
    writer.finalize()?;
    Ok(())
}

/// Encode frames as an in-memory WAV file.
pub fn frames_to_wav(frames: &[Frame], sample_rate: u32) -> Result<Vec<u8>, FormatError> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec(sample_rate))?;
        write_frames(&mut writer, frames)?;
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Streams live output to a WAV file until finalized.
pub struct WavRecorder {
    path: PathBuf,
    sample_rate: u32,
    writer: hound::WavWriter<BufWriter<File>>,
    frames_written: u64,
}

impl WavRecorder {
    pub fn create(path: &Path, sample_rate: u32) -> Result<Self, FormatError> {
        let writer = hound::WavWriter::create(path, spec(sample_rate))?;
        Ok(Self {
            path: path.to_path_buf(),
            sample_rate,
            writer,
            frames_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn write(&mut self, frames: &[Frame]) -> Result<(), FormatError> {
        write_frames(&mut self.writer, frames)?;
        self.frames_written += frames.len() as u64;
        Ok(())
    }

    /// Patch the header lengths and close the file.
    pub fn finalize(self) -> Result<PathBuf, FormatError> {
        self.writer.finalize()?;
        Ok(self.path)
    }
}
