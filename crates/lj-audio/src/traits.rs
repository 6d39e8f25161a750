//! Audio output trait and error types.

use lj_engine::Frame;

/// Error type for audio operations.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// Failed to initialize audio device
    #[error("Device init error: {0}")]
    DeviceInit(String),
    /// Failed to create audio stream
    #[error("Stream create error: {0}")]
    StreamCreate(String),
    /// Playback error
    #[error("Playback error: {0}")]
    Playback(String),
    /// No audio device available
    #[error("No audio device available")]
    NoDevice,
}

/// Trait for audio output backends.
pub trait AudioOutput {
    /// Get the sample rate.
    fn sample_rate(&self) -> u32;

    /// Queue frames for the device, spinning until all of them fit.
    fn write(&mut self, frames: &[Frame]);

    /// Let queued frames reach the device.
    fn start(&mut self) -> Result<(), AudioError>;

    /// Keep draining queued frames but emit silence.
    fn stop(&mut self) -> Result<(), AudioError>;

    /// Whether frames currently reach the device.
    fn is_running(&self) -> bool;
}
