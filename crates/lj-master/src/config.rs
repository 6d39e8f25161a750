//! Startup configuration.

use std::time::Duration;

use lj_engine::{default_rows, ParamRow};

use crate::ControllerError;

/// Fallback rate used before (or without) an audio device.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Longest scope window, in seconds.
pub const MAX_CAPTURE_WINDOW: f32 = 10.0;

/// Behavioural constants. `Default` gives the stock generator: six
/// channels, a 10 ms scope window refreshed every 200 ms, and 10 s per
/// file in multi-file playback.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Total oscillator count, split evenly left/right
    pub channel_count: usize,
    /// How long each file plays when several are queued
    pub play_time: Duration,
    /// Interval between scope redraws
    pub frame_rate: Duration,
    /// Seconds of audio captured per scope frame
    pub capture_window: f32,
    pub init_frequency: f32,
    pub init_amplitude: f32,
    pub init_phase: f32,
    /// Used until a device reports its own rate
    pub sample_rate: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_count: 6,
            play_time: Duration::from_millis(10_000),
            frame_rate: Duration::from_millis(200),
            capture_window: 0.01,
            init_frequency: 400.0,
            init_amplitude: 0.5,
            init_phase: 0.0,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ControllerError> {
        if self.channel_count == 0 || self.channel_count % 2 != 0 {
            return Err(ControllerError::Config(format!(
                "channel count must be a positive even number, got {}",
                self.channel_count
            )));
        }
        if !self.capture_window.is_finite()
            || self.capture_window <= 0.0
            || self.capture_window > MAX_CAPTURE_WINDOW
        {
            return Err(ControllerError::Config(format!(
                "capture window must be in (0, {}] seconds, got {}",
                MAX_CAPTURE_WINDOW, self.capture_window
            )));
        }
        if self.play_time.is_zero() || self.frame_rate.is_zero() {
            return Err(ControllerError::Config(
                "play time and frame rate must be non-zero".to_string(),
            ));
        }
        if self.sample_rate == 0 {
            return Err(ControllerError::Config("sample rate must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Parameter table the bank starts with.
    pub fn initial_rows(&self) -> Vec<ParamRow> {
        default_rows(
            self.channel_count,
            self.init_frequency,
            self.init_amplitude,
            self.init_phase,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_odd_and_zero_channel_counts() {
        for count in [0, 3, 7] {
            let cfg = Config {
                channel_count: count,
                ..Config::default()
            };
            assert!(matches!(cfg.validate(), Err(ControllerError::Config(_))));
        }
    }

    #[test]
    fn rejects_empty_capture_window() {
        let cfg = Config {
            capture_window: 0.0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = Config {
            capture_window: f32::NAN,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_unbounded_capture_window() {
        for window in [f32::INFINITY, 1e6, MAX_CAPTURE_WINDOW * 2.0] {
            let cfg = Config {
                capture_window: window,
                ..Config::default()
            };
            assert!(matches!(cfg.validate(), Err(ControllerError::Config(_))));
        }
        let cfg = Config {
            capture_window: MAX_CAPTURE_WINDOW,
            ..Config::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_intervals() {
        let cfg = Config {
            frame_rate: Duration::ZERO,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn initial_rows_follow_config() {
        let rows = Config::default().initial_rows();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0], ParamRow::new(400.0, 0.5, 0.0));
        assert_eq!(rows[1].amplitude, 0.0);
        assert_eq!(rows[3].amplitude, 0.5);
    }
}
