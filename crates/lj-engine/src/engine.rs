//! Main synthesis engine.

use alloc::vec::Vec;

use crate::bank::ChannelBank;
use crate::frame::Frame;
use crate::params::ParamRow;
use crate::sample_buffer::SampleBuffer;

/// Frames rendered per lock of the shared engine on the audio thread.
pub const BLOCK_FRAMES: usize = 64;

/// Channel bank plus the scope capture table it feeds.
///
/// Mixing runs whenever frames are pulled, whether or not they reach a
/// device; gating output is the caller's concern.
#[derive(Clone, Debug)]
pub struct Engine {
    bank: ChannelBank,
    capture: SampleBuffer,
    sample_rate: u32,
}

impl Engine {
    /// Create an engine with one channel per row and a capture window of
    /// `capture_window` seconds.
    pub fn new(sample_rate: u32, rows: &[ParamRow], capture_window: f32) -> Self {
        Self {
            bank: ChannelBank::new(sample_rate, rows),
            capture: SampleBuffer::new(capture_window, sample_rate),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Retune every oscillator and resize the capture table.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        if sample_rate == self.sample_rate {
            return;
        }
        self.sample_rate = sample_rate;
        self.bank.set_sample_rate(sample_rate);
        self.capture.set_sample_rate(sample_rate);
    }

    pub fn bank(&self) -> &ChannelBank {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut ChannelBank {
        &mut self.bank
    }

    pub fn capture(&self) -> &SampleBuffer {
        &self.capture
    }

    pub fn capture_mut(&mut self) -> &mut SampleBuffer {
        &mut self.capture
    }

    /// Generate one frame of audio.
    pub fn render_frame(&mut self) -> Frame {
        let frame = self.bank.render_frame();
        self.capture.record(core::slice::from_ref(&frame));
        frame
    }

    /// Fill `out` with consecutive frames. Allocation-free.
    pub fn render_block(&mut self, out: &mut [Frame]) {
        for slot in out.iter_mut() {
            *slot = self.bank.render_frame();
        }
        self.capture.record(out);
    }

    /// Render `count` frames into a new buffer (offline use).
    pub fn render_frames(&mut self, count: usize) -> Vec<Frame> {
        let mut frames = alloc::vec![Frame::silence(); count];
        for chunk in frames.chunks_mut(BLOCK_FRAMES) {
            self.render_block(chunk);
        }
        frames
    }
}
