//! Output to the default device through cpal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use lj_engine::Frame;
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};

use crate::traits::{AudioError, AudioOutput};

/// Smallest ring, in frames.
const MIN_RING_FRAMES: usize = 256;

/// Default output device fed from a lock-free ring.
///
/// The device callback always drains the ring so the producer stays
/// paced by the device clock; while stopped it writes silence instead of
/// the drained frames.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    producer: HeapProd<Frame>,
    running: Arc<AtomicBool>,
}

impl CpalOutput {
    /// Open the default output device in stereo. The returned consumer is
    /// handed to [`build_stream`](Self::build_stream).
    pub fn new() -> Result<(Self, HeapCons<Frame>), AudioError> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or(AudioError::NoDevice)?;
        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        let mut config: StreamConfig = supported.into();
        config.channels = 2;

        let (producer, consumer) = HeapRb::<Frame>::new(ring_frames(config.sample_rate.0)).split();
        tracing::debug!(
            device = %device.name().unwrap_or_default(),
            sample_rate = config.sample_rate.0,
            "output device opened"
        );

        Ok((
            Self {
                device,
                config,
                stream: None,
                producer,
                running: Arc::new(AtomicBool::new(false)),
            },
            consumer,
        ))
    }

    /// Create the device stream and let it run. Output stays silent until
    /// [`start`](AudioOutput::start).
    pub fn build_stream(&mut self, mut consumer: HeapCons<Frame>) -> Result<(), AudioError> {
        let running = self.running.clone();
        let channels = self.config.channels as usize;

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let audible = running.load(Ordering::Relaxed);
                    fill_interleaved(data, channels, audible, || consumer.try_pop());
                },
                |err| tracing::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Queue one frame, spinning while the ring is full.
    pub fn write_spin(&mut self, frame: Frame) {
        while self.producer.try_push(frame).is_err() {
            std::hint::spin_loop();
        }
    }
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn write(&mut self, frames: &[Frame]) {
        for &frame in frames {
            self.write_spin(frame);
        }
    }

    fn start(&mut self) -> Result<(), AudioError> {
        if self.stream.is_none() {
            return Err(AudioError::Playback("stream not built".to_string()));
        }
        self.running.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.running.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

/// About 50 ms of audio, so control changes are heard quickly.
fn ring_frames(sample_rate: u32) -> usize {
    (sample_rate as usize / 20).max(MIN_RING_FRAMES)
}

/// Write one popped frame per device frame. Missing frames and muted output
/// become silence; channels past the first two are zeroed.
fn fill_interleaved(
    data: &mut [f32],
    channels: usize,
    audible: bool,
    mut pop: impl FnMut() -> Option<Frame>,
) {
    for chunk in data.chunks_mut(channels.max(1)) {
        let frame = pop().filter(|_| audible).unwrap_or_default();
        for (i, sample) in chunk.iter_mut().enumerate() {
            *sample = match i {
                0 => frame.left,
                1 => frame.right,
                _ => 0.0,
            };
        }
    }
}
