//! Sine oscillator with a free-running phase accumulator.

use core::f64::consts::TAU;

use crate::params::{clamp_amplitude, clamp_frequency, clamp_phase, ParamRow};

/// A single sine voice.
///
/// Output is `sin(2π · (accumulator + phase)) · amplitude`. The accumulator
/// advances by `frequency / sample_rate` per sample and wraps at 1.0; the
/// phase offset is applied on top, so two oscillators only stay aligned if
/// their accumulators were reset together.
#[derive(Clone, Debug)]
pub struct SineOsc {
    frequency: f32,
    amplitude: f32,
    phase: f32,
    /// Position within the current cycle (0.0..1.0)
    accumulator: f64,
    /// Cycles per sample
    increment: f64,
    sample_rate: u32,
    playing: bool,
}

impl SineOsc {
    pub fn new(sample_rate: u32, row: ParamRow) -> Self {
        let row = row.clamped();
        let mut osc = Self {
            frequency: row.frequency,
            amplitude: row.amplitude,
            phase: row.phase,
            accumulator: 0.0,
            increment: 0.0,
            sample_rate: sample_rate.max(1),
            playing: true,
        };
        osc.update_increment();
        osc
    }

    fn update_increment(&mut self) {
        self.increment = self.frequency as f64 / self.sample_rate as f64;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_frequency(&mut self, hz: f32) {
        self.frequency = clamp_frequency(hz);
        self.update_increment();
    }

    pub fn set_amplitude(&mut self, gain: f32) {
        self.amplitude = clamp_amplitude(gain);
    }

    pub fn set_phase(&mut self, fraction: f32) {
        self.phase = clamp_phase(fraction);
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate.max(1);
        self.update_increment();
    }

    /// Rewind the accumulator to the start of a cycle.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Silence the oscillator; the accumulator is frozen.
    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Produce one sample and advance.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if !self.playing {
            return 0.0;
        }
        let angle = TAU * (self.accumulator + self.phase as f64);
        let value = libm::sin(angle) as f32 * self.amplitude;

        self.accumulator += self.increment;
        if self.accumulator >= 1.0 {
            self.accumulator -= libm::floor(self.accumulator);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 48000;

    fn osc(freq: f32, amp: f32, phase: f32) -> SineOsc {
        SineOsc::new(SR, ParamRow::new(freq, amp, phase))
    }

    #[test]
    fn starts_at_zero_crossing() {
        let mut o = osc(1000.0, 1.0, 0.0);
        assert!(o.next_sample().abs() < 1e-6);
    }

    #[test]
    fn quarter_cycle_phase_starts_at_peak() {
        let mut o = osc(1000.0, 0.5, 0.25);
        assert!((o.next_sample() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn quarter_period_reaches_peak() {
        // 1200 Hz at 48 kHz = 40 samples per cycle, peak at sample 10
        let mut o = osc(1200.0, 1.0, 0.0);
        let samples: Vec<f32> = (0..11).map(|_| o.next_sample()).collect();
        assert!((samples[10] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn accumulator_wraps() {
        let mut o = osc(12000.0, 1.0, 0.0);
        for _ in 0..1000 {
            o.next_sample();
            assert!(o.accumulator() >= 0.0 && o.accumulator() < 1.0);
        }
    }

    #[test]
    fn stopped_oscillator_is_silent_and_frozen() {
        let mut o = osc(440.0, 1.0, 0.25);
        o.next_sample();
        let acc = o.accumulator();
        o.stop();
        assert_eq!(o.next_sample(), 0.0);
        assert_eq!(o.accumulator(), acc);
        o.play();
        assert!(o.next_sample() != 0.0);
    }

    #[test]
    fn reset_rewinds_accumulator() {
        let mut o = osc(440.0, 1.0, 0.0);
        for _ in 0..17 {
            o.next_sample();
        }
        o.reset();
        assert_eq!(o.accumulator(), 0.0);
    }

    #[test]
    fn setters_clamp() {
        let mut o = osc(440.0, 0.5, 0.0);
        o.set_frequency(1.0);
        o.set_amplitude(9.0);
        o.set_phase(2.0);
        assert_eq!(o.frequency(), 20.0);
        assert_eq!(o.amplitude(), 1.05);
        assert_eq!(o.phase(), 1.0);
    }
}
