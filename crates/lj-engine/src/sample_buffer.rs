//! Fixed-length capture table for the XY scope.

use alloc::vec;
use alloc::vec::Vec;

use crate::frame::{Frame, Point};

/// Captures a short window of mixed stereo output.
///
/// Arming rewinds the write position and records until the table is full,
/// then capture stops by itself. Reading never clears the table, so a read
/// without re-arming returns the previous window again.
#[derive(Clone, Debug)]
pub struct SampleBuffer {
    table: Vec<Frame>,
    write_pos: usize,
    armed: bool,
    /// Window length in seconds
    window: f32,
}

impl SampleBuffer {
    pub fn new(window: f32, sample_rate: u32) -> Self {
        Self {
            table: vec![Frame::silence(); capacity_for(window, sample_rate)],
            write_pos: 0,
            armed: false,
            window,
        }
    }

    /// Number of frames in one capture window.
    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    pub fn window(&self) -> f32 {
        self.window
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Start (from the beginning of the table) or halt capture.
    pub fn arm(&mut self, enabled: bool) {
        if enabled {
            self.write_pos = 0;
        }
        self.armed = enabled;
    }

    /// Resize for a new sample rate. The table is cleared and disarmed state kept.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.table = vec![Frame::silence(); capacity_for(self.window, sample_rate)];
        self.write_pos = 0;
    }

    /// Feed rendered frames. Does nothing unless armed; never allocates.
    #[inline]
    pub fn record(&mut self, frames: &[Frame]) {
        if !self.armed {
            return;
        }
        let room = self.table.len() - self.write_pos;
        let n = room.min(frames.len());
        self.table[self.write_pos..self.write_pos + n].copy_from_slice(&frames[..n]);
        self.write_pos += n;
        if self.write_pos >= self.table.len() {
            self.armed = false;
        }
    }

    /// Current table contents as scope points, oldest first.
    pub fn read(&self) -> Vec<Point> {
        self.table.iter().copied().map(Point::from).collect()
    }
}

fn capacity_for(window: f32, sample_rate: u32) -> usize {
    let frames = libm::roundf(window.max(0.0) * sample_rate as f32) as usize;
    frames.max(1)
}
