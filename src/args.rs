//! Command-line overrides and logging setup shared by both binaries.

use std::time::Duration;

use clap::Args;
use lj_master::Config;
use tracing_subscriber::EnvFilter;

/// Overrides for the generator's behavioural constants.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Total oscillator channels, split evenly left/right
    #[arg(long, value_name = "N")]
    pub channels: Option<usize>,

    /// Milliseconds each file plays when several are loaded
    #[arg(long, value_name = "MS")]
    pub play_time_ms: Option<u64>,

    /// Milliseconds between scope redraws
    #[arg(long, value_name = "MS")]
    pub frame_rate_ms: Option<u64>,

    /// Seconds of audio shown per scope frame (at least one period of the lowest frequency)
    #[arg(long, value_name = "SECONDS")]
    pub capture_secs: Option<f32>,

    /// Starting frequency for every channel
    #[arg(long, value_name = "HZ")]
    pub init_freq: Option<f32>,
}

impl ConfigArgs {
    pub fn to_config(&self) -> Config {
        let mut config = Config::default();
        if let Some(n) = self.channels {
            config.channel_count = n;
        }
        if let Some(ms) = self.play_time_ms {
            config.play_time = Duration::from_millis(ms);
        }
        if let Some(ms) = self.frame_rate_ms {
            config.frame_rate = Duration::from_millis(ms);
        }
        if let Some(secs) = self.capture_secs {
            config.capture_window = secs;
        }
        if let Some(hz) = self.init_freq {
            config.init_frequency = hz;
        }
        config
    }
}

/// Install the global `tracing` subscriber. `RUST_LOG` wins over the
/// default `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
