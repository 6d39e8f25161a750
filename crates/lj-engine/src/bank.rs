//! Channel bank: oscillator slots split into a left and a right group.

use alloc::vec::Vec;

use crate::frame::Frame;
use crate::oscillator::SineOsc;
use crate::params::ParamRow;

/// Post-mix scale applied to each group sum so a few full-scale
/// oscillators don't clip.
pub const GROUP_GAIN: f32 = 0.5;

/// Which stereo side a channel is mixed into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Group {
    Left,
    Right,
}

/// One oscillator slot together with the parameters it was last given.
#[derive(Clone, Debug)]
pub struct Channel {
    index: usize,
    group: Group,
    params: ParamRow,
    osc: SineOsc,
}

impl Channel {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn params(&self) -> ParamRow {
        self.params
    }

    pub fn oscillator(&self) -> &SineOsc {
        &self.osc
    }
}

/// Initial table: every channel at the given frequency and phase, with only
/// the first channel of each group audible.
pub fn default_rows(count: usize, frequency: f32, amplitude: f32, phase: f32) -> Vec<ParamRow> {
    let split = count / 2;
    (0..count)
        .map(|i| {
            let gain = if i == 0 || i == split { amplitude } else { 0.0 };
            ParamRow::new(frequency, gain, phase)
        })
        .collect()
}

/// Fixed-size bank of sine channels. Channels `0..len/2` feed the left
/// output, the rest feed the right.
#[derive(Clone, Debug)]
pub struct ChannelBank {
    channels: Vec<Channel>,
    split: usize,
}

impl ChannelBank {
    pub fn new(sample_rate: u32, rows: &[ParamRow]) -> Self {
        let split = rows.len() / 2;
        let channels = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let params = row.clamped();
                Channel {
                    index,
                    group: if index < split { Group::Left } else { Group::Right },
                    params,
                    osc: SineOsc::new(sample_rate, params),
                }
            })
            .collect();
        Self { channels, split }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn group_of(&self, index: usize) -> Option<Group> {
        self.channels.get(index).map(|c| c.group)
    }

    /// Current parameter table in channel order.
    pub fn rows(&self) -> Vec<ParamRow> {
        self.channels.iter().map(|c| c.params).collect()
    }

    // --- Per-channel setters (out-of-range index is a no-op) ---

    pub fn set_frequency(&mut self, index: usize, hz: f32) {
        if let Some(ch) = self.channels.get_mut(index) {
            ch.osc.set_frequency(hz);
            ch.params.frequency = ch.osc.frequency();
        }
    }

    pub fn set_amplitude(&mut self, index: usize, gain: f32) {
        if let Some(ch) = self.channels.get_mut(index) {
            ch.osc.set_amplitude(gain);
            ch.params.amplitude = ch.osc.amplitude();
        }
    }

    /// Store a new phase offset. Relative alignment with the other channels
    /// is only guaranteed after [`reset_phase_all`](Self::reset_phase_all).
    pub fn set_phase(&mut self, index: usize, fraction: f32) {
        if let Some(ch) = self.channels.get_mut(index) {
            ch.osc.set_phase(fraction);
            ch.params.phase = ch.osc.phase();
        }
    }

    /// Restart every accumulator together and re-apply the stored phases.
    pub fn reset_phase_all(&mut self) {
        for ch in &mut self.channels {
            ch.osc.reset();
            ch.osc.set_phase(ch.params.phase);
        }
    }

    /// Apply a parameter table in channel order. Extra rows are ignored,
    /// channels past the end of `rows` keep their current settings.
    pub fn apply_rows(&mut self, rows: &[ParamRow]) {
        for (ch, row) in self.channels.iter_mut().zip(rows) {
            let row = row.clamped();
            ch.osc.stop();
            ch.osc.reset();
            ch.osc.set_frequency(row.frequency);
            ch.osc.set_amplitude(row.amplitude);
            ch.osc.set_phase(row.phase);
            ch.osc.play();
            ch.params = row;
        }
        self.reset_phase_all();
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        for ch in &mut self.channels {
            ch.osc.set_sample_rate(sample_rate);
        }
    }

    /// Mix one frame: each group summed, scaled by [`GROUP_GAIN`] and panned
    /// hard to its side.
    #[inline]
    pub fn render_frame(&mut self) -> Frame {
        let (left, right) = self.channels.split_at_mut(self.split);
        let left: f32 = left.iter_mut().map(|c| c.osc.next_sample()).sum();
        let right: f32 = right.iter_mut().map(|c| c.osc.next_sample()).sum();
        Frame::new(left * GROUP_GAIN, right * GROUP_GAIN)
    }
}
