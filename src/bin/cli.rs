//! lj-cli: headless preset playback and WAV export.
//!
//! Usage:
//!   lj-cli a.txt b.txt              play each preset for --play-time-ms
//!   lj-cli a.txt --seconds 5        play a single preset for 5 s
//!   lj-cli a.txt b.txt --wav out.wav --seconds 2

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use lissajous::args::{init_logging, ConfigArgs};
use lj_master::{render_presets_to_wav, Config, Controller, PlaybackQueue, QueueEvent};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "lj-cli")]
#[command(about = "Play or render Lissajous presets without a window", long_about = None)]
struct Cli {
    /// Preset files (one "frequency,amplitude,phase" row per channel)
    presets: Vec<PathBuf>,

    /// Render offline to this WAV file instead of playing
    #[arg(long, value_name = "FILE")]
    wav: Option<PathBuf>,

    /// Seconds per preset when rendering, or total time for a single preset
    #[arg(long)]
    seconds: Option<f32>,

    /// Sample rate for offline rendering
    #[arg(long, default_value_t = lj_master::DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,

    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = cli.config.to_config();
    let seconds = cli.seconds.unwrap_or(config.play_time.as_secs_f32());
    if seconds.is_nan() || seconds <= 0.0 {
        anyhow::bail!("--seconds must be positive");
    }

    match &cli.wav {
        Some(out) => render(&config, &cli.presets, cli.sample_rate, seconds, out),
        None => play(config, cli.presets, seconds),
    }
}

fn render(
    config: &Config,
    presets: &[PathBuf],
    sample_rate: u32,
    seconds: f32,
    out: &Path,
) -> anyhow::Result<()> {
    info!(path = %out.display(), sample_rate, "rendering");
    let frames = render_presets_to_wav(config, presets, sample_rate, seconds, out)
        .with_context(|| format!("rendering {}", out.display()))?;
    println!(
        "Rendered {} frames ({:.2} s) to {}",
        frames,
        frames as f32 / sample_rate as f32,
        out.display()
    );
    Ok(())
}

fn play(config: Config, presets: Vec<PathBuf>, seconds: f32) -> anyhow::Result<()> {
    let mut ctrl = Controller::new(config.clone())?;
    ctrl.boot();
    ctrl.enable_output(true);

    let start = Instant::now();
    let mut queue = PlaybackQueue::new(config.play_time);
    if let Some(event) = queue.load(presets, start, &ctrl) {
        report(&event);
    }
    let single = !queue.is_active();
    println!("Playing...");

    loop {
        std::thread::sleep(Duration::from_millis(10));
        let now = Instant::now();
        match queue.tick(now, &ctrl) {
            Some(QueueEvent::Complete) => break,
            Some(event) => report(&event),
            None => {}
        }
        if single && now.duration_since(start).as_secs_f32() >= seconds {
            ctrl.enable_output(false);
            break;
        }
    }

    ctrl.shutdown();
    println!("\rDone.          ");
    Ok(())
}

fn report(event: &QueueEvent) {
    match event {
        QueueEvent::Loaded(path) => {
            print!("\rNow playing {}", path.display());
            let _ = std::io::stdout().flush();
        }
        QueueEvent::Failed { path, error } => {
            warn!(path = %path.display(), %error, "skipping preset");
        }
        QueueEvent::Complete => {}
    }
}
