//! Per-channel parameter ranges and control-unit conversions.
//!
//! The GUI works in control units (Hz, slider percent, degrees); the engine
//! works in gain and cycle fractions. Every value entering the engine passes
//! through one of the clamps below.

/// Lowest allowed oscillator frequency in Hz.
pub const FREQ_MIN: f32 = 20.0;
/// Highest allowed oscillator frequency in Hz.
pub const FREQ_MAX: f32 = 20000.0;

/// Amplitude range. Slightly above unity to allow mild overdrive.
pub const AMP_MIN: f32 = 0.0;
pub const AMP_MAX: f32 = 1.05;

/// Phase range as a fraction of one cycle.
pub const PHASE_MIN: f32 = 0.0;
pub const PHASE_MAX: f32 = 1.0;

/// Amplitude slider range in percent.
pub const AMP_SLIDER_MAX: i32 = 105;

/// Phase control range in degrees.
pub const PHASE_DEGREES_MAX: f32 = 360.0;

/// One row of the parameter table: the persisted unit, row index = channel index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamRow {
    /// Hz
    pub frequency: f32,
    /// Linear gain
    pub amplitude: f32,
    /// Fraction of a cycle
    pub phase: f32,
}

impl ParamRow {
    pub const fn new(frequency: f32, amplitude: f32, phase: f32) -> Self {
        Self {
            frequency,
            amplitude,
            phase,
        }
    }

    /// Same row with every field forced into its declared range.
    pub fn clamped(self) -> Self {
        Self {
            frequency: clamp_frequency(self.frequency),
            amplitude: clamp_amplitude(self.amplitude),
            phase: clamp_phase(self.phase),
        }
    }
}

pub fn clamp_frequency(hz: f32) -> f32 {
    clamp_or_min(hz, FREQ_MIN, FREQ_MAX)
}

pub fn clamp_amplitude(gain: f32) -> f32 {
    clamp_or_min(gain, AMP_MIN, AMP_MAX)
}

pub fn clamp_phase(fraction: f32) -> f32 {
    clamp_or_min(fraction, PHASE_MIN, PHASE_MAX)
}

/// `f32::clamp` passes NaN through; treat it as the bottom of the range.
fn clamp_or_min(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Slider percent (0–105) to gain (0.0–1.05).
pub fn slider_to_gain(percent: i32) -> f32 {
    percent.clamp(0, AMP_SLIDER_MAX) as f32 / 100.0
}

/// Gain to the nearest slider percent.
pub fn gain_to_slider(gain: f32) -> i32 {
    libm::roundf(clamp_amplitude(gain) * 100.0) as i32
}

/// Degrees (0–360) to cycle fraction (0.0–1.0).
pub fn degrees_to_fraction(degrees: f32) -> f32 {
    clamp_or_min(degrees, 0.0, PHASE_DEGREES_MAX) / PHASE_DEGREES_MAX
}

pub fn fraction_to_degrees(fraction: f32) -> f32 {
    clamp_phase(fraction) * PHASE_DEGREES_MAX
}
