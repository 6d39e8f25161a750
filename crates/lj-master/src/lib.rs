//! Headless controller for the Lissajous generator.
//!
//! Provides one control surface for the GUI and the CLI: per-channel
//! parameters, preset load/save, output gating, WAV recording and the
//! scope capture, all backed by an engine shared with the audio thread.

mod config;
mod display;
mod offline;
mod queue;
mod timer;

use lj_audio::{AudioOutput, CpalOutput};
use lj_engine::{Engine, BLOCK_FRAMES};
use lj_formats::WavRecorder;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

// Re-export common types so callers don't need lj-engine/lj-formats directly.
pub use config::{Config, DEFAULT_SAMPLE_RATE, MAX_CAPTURE_WINDOW};
pub use display::{DisplayLoop, GraphState};
pub use lj_audio::AudioError;
pub use lj_engine::{params, Frame, ParamRow, Point};
pub use lj_formats::FormatError;
pub use offline::{render_presets, render_presets_to_wav};
pub use queue::{PlaybackQueue, QueueEvent};
pub use timer::Ticker;

/// Where recordings go when the caller has no better idea.
pub const DEFAULT_RECORD_PATH: &str = "record.wav";

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error("Invalid config: {0}")]
    Config(String),
}

/// Everything the render thread touches.
struct Rig {
    engine: Engine,
    recorder: Option<WavRecorder>,
}

impl Rig {
    /// Render one block; audible blocks also go to the recorder.
    fn render(&mut self, block: &mut [Frame], audible: bool) {
        #[cfg(feature = "alloc_check")]
        assert_no_alloc::assert_no_alloc(|| self.engine.render_block(block));
        #[cfg(not(feature = "alloc_check"))]
        self.engine.render_block(block);
        if !audible {
            return;
        }
        if let Some(rec) = self.recorder.as_mut() {
            if let Err(e) = rec.write(block) {
                tracing::error!("Recording to {} failed: {}", rec.path().display(), e);
                self.recorder = None;
            }
        }
    }
}

impl Rig {
    /// Retune the engine. A recording in progress is restarted at the new
    /// rate so the file header matches its data.
    fn set_sample_rate(&mut self, sample_rate: u32) {
        self.engine.set_sample_rate(sample_rate);
        if self.recorder.as_ref().map_or(true, |r| r.sample_rate() == sample_rate) {
            return;
        }
        let Some(rec) = self.recorder.take() else { return };
        let path = rec.path().to_path_buf();
        if let Err(e) = rec.finalize() {
            tracing::error!("Failed to finalize recording: {}", e);
        }
        match WavRecorder::create(&path, sample_rate) {
            Ok(rec) => {
                tracing::warn!("Sample rate changed; recording restarted at {} Hz", sample_rate);
                self.recorder = Some(rec);
            }
            Err(e) => tracing::error!("Recording to {} failed: {}", path.display(), e),
        }
    }
}

fn lock(rig: &Mutex<Rig>) -> MutexGuard<'_, Rig> {
    rig.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Generator controller. Owns the engine and, once booted, the audio thread.
pub struct Controller {
    config: Config,
    rig: Arc<Mutex<Rig>>,
    output_enabled: Arc<AtomicBool>,
    audio: Option<AudioHandle>,
}

struct AudioHandle {
    stop_signal: Arc<AtomicBool>,
    failed: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Controller {
    /// Create a controller with no audio device attached. Call
    /// [`boot`](Self::boot) to start the audio thread.
    pub fn new(config: Config) -> Result<Self, ControllerError> {
        config.validate()?;
        let engine = Engine::new(
            config.sample_rate,
            &config.initial_rows(),
            config.capture_window,
        );
        Ok(Self {
            config,
            rig: Arc::new(Mutex::new(Rig {
                engine,
                recorder: None,
            })),
            output_enabled: Arc::new(AtomicBool::new(false)),
            audio: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn rig(&self) -> MutexGuard<'_, Rig> {
        lock(&self.rig)
    }

    // --- Audio device ---

    /// Spawn the render thread and open the default output device.
    /// If no device can be opened the controller keeps running headless.
    pub fn boot(&mut self) {
        if self.audio.is_some() {
            return;
        }

        let stop_signal = Arc::new(AtomicBool::new(false));
        let failed = Arc::new(AtomicBool::new(false));

        let rig = self.rig.clone();
        let enabled = self.output_enabled.clone();
        let stop = stop_signal.clone();
        let fail = failed.clone();

        let thread = std::thread::spawn(move || {
            audio_thread(rig, enabled, stop, fail);
        });

        self.audio = Some(AudioHandle {
            stop_signal,
            failed,
            thread: Some(thread),
        });
    }

    /// True while a render thread is feeding a device.
    pub fn is_booted(&self) -> bool {
        self.audio
            .as_ref()
            .is_some_and(|a| !a.failed.load(Ordering::Relaxed))
    }

    /// Stop the render thread and close any recording in progress.
    pub fn shutdown(&mut self) {
        if let Some(mut audio) = self.audio.take() {
            audio.stop_signal.store(true, Ordering::Relaxed);
            if let Some(handle) = audio.thread.take() {
                let _ = handle.join();
            }
        }
        if let Some(rec) = self.rig().recorder.take() {
            match rec.finalize() {
                Ok(path) => tracing::info!("Recording saved to {}", path.display()),
                Err(e) => tracing::error!("Failed to finalize recording: {}", e),
            }
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.rig().engine.sample_rate()
    }

    /// Gate whether rendered audio reaches the device. Mixing and scope
    /// capture continue either way.
    pub fn enable_output(&self, enable: bool) {
        self.output_enabled.store(enable, Ordering::Relaxed);
    }

    pub fn is_output_enabled(&self) -> bool {
        self.output_enabled.load(Ordering::Relaxed)
    }

    // --- Parameters ---

    pub fn channel_count(&self) -> usize {
        self.rig().engine.bank().len()
    }

    pub fn rows(&self) -> Vec<ParamRow> {
        self.rig().engine.bank().rows()
    }

    pub fn row(&self, index: usize) -> Option<ParamRow> {
        self.rig().engine.bank().channel(index).map(|c| c.params())
    }

    pub fn set_frequency(&self, index: usize, hz: f32) {
        self.rig().engine.bank_mut().set_frequency(index, hz);
    }

    pub fn set_amplitude(&self, index: usize, gain: f32) {
        self.rig().engine.bank_mut().set_amplitude(index, gain);
    }

    /// Store a new phase and restart every channel so they stay locked.
    pub fn set_phase(&self, index: usize, fraction: f32) {
        let mut rig = self.rig();
        let bank = rig.engine.bank_mut();
        bank.set_phase(index, fraction);
        bank.reset_phase_all();
    }

    pub fn reset_phase_all(&self) {
        self.rig().engine.bank_mut().reset_phase_all();
    }

    pub fn apply_rows(&self, rows: &[ParamRow]) {
        self.rig().engine.bank_mut().apply_rows(rows);
    }

    // --- Presets ---

    /// Load a preset and apply it. The file is parsed completely first, so
    /// a malformed file changes nothing. Returns the number of channels set.
    pub fn load_preset(&self, path: &Path) -> Result<usize, ControllerError> {
        let rows = lj_formats::load_preset(path)?;
        let applied = rows.len().min(self.channel_count());
        self.apply_rows(&rows);
        tracing::info!("File loaded {} ({} channels)", path.display(), applied);
        Ok(applied)
    }

    pub fn save_preset(&self, path: &Path) -> Result<(), ControllerError> {
        lj_formats::save_preset(path, &self.rows())?;
        tracing::info!("File written {}", path.display());
        Ok(())
    }

    // --- Recording ---

    pub fn is_recording(&self) -> bool {
        self.rig().recorder.is_some()
    }

    /// Start recording to `path`, or stop and finalize the current file.
    /// Returns whether a recording is now in progress.
    pub fn toggle_recording(&self, path: &Path) -> Result<bool, ControllerError> {
        let mut rig = self.rig();
        match rig.recorder.take() {
            Some(rec) => {
                let saved = rec.finalize()?;
                tracing::info!("Recording saved to {}", saved.display());
                Ok(false)
            }
            None => {
                let sample_rate = rig.engine.sample_rate();
                rig.recorder = Some(WavRecorder::create(path, sample_rate)?);
                tracing::info!("Recording to {}", path.display());
                Ok(true)
            }
        }
    }

    // --- Scope capture ---

    pub fn arm_capture(&self, enabled: bool) {
        self.rig().engine.capture_mut().arm(enabled);
    }

    pub fn is_capture_armed(&self) -> bool {
        self.rig().engine.capture().is_armed()
    }

    pub fn capture_capacity(&self) -> usize {
        self.rig().engine.capture().capacity()
    }

    pub fn capture_points(&self) -> Vec<Point> {
        self.rig().engine.capture().read()
    }

    /// Render `count` frames on the calling thread exactly as the audio
    /// thread would, discarding the output. Frames count as played (and
    /// are recorded) while output is enabled.
    pub fn pump(&self, count: usize) {
        self.render_here(count, self.is_output_enabled());
    }

    /// Fill one scope window without a device. These frames are never
    /// recorded.
    pub fn refill_scope(&self) {
        self.render_here(self.capture_capacity(), false);
    }

    fn render_here(&self, count: usize, audible: bool) {
        let mut block = [Frame::silence(); BLOCK_FRAMES];
        let mut rig = self.rig();
        let mut remaining = count;
        while remaining > 0 {
            let n = remaining.min(BLOCK_FRAMES);
            rig.render(&mut block[..n], audible);
            remaining -= n;
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn audio_thread(
    rig: Arc<Mutex<Rig>>,
    enabled: Arc<AtomicBool>,
    stop_signal: Arc<AtomicBool>,
    failed: Arc<AtomicBool>,
) {
    let (mut output, consumer) = match CpalOutput::new() {
        Ok(pair) => pair,
        Err(e) => {
            tracing::warn!("Audio unavailable, running headless: {}", e);
            failed.store(true, Ordering::Relaxed);
            return;
        }
    };

    let sample_rate = output.sample_rate();
    lock(&rig).set_sample_rate(sample_rate);

    if let Err(e) = output.build_stream(consumer) {
        tracing::warn!("Audio unavailable, running headless: {}", e);
        failed.store(true, Ordering::Relaxed);
        return;
    }
    tracing::info!("Audio server booted at {} Hz", sample_rate);

    let mut block = [Frame::silence(); BLOCK_FRAMES];

    while !stop_signal.load(Ordering::Relaxed) {
        let audible = enabled.load(Ordering::Relaxed);
        if audible != output.is_running() {
            let result = if audible { output.start() } else { output.stop() };
            if let Err(e) = result {
                tracing::error!("{}", e);
            }
        }

        lock(&rig).render(&mut block, audible);
        output.write(&block);
    }

    let _ = output.stop();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> Controller {
        Controller::new(Config::default()).unwrap()
    }

    #[test]
    fn starts_with_config_rows() {
        let ctrl = controller();
        assert_eq!(ctrl.channel_count(), 6);
        assert_eq!(ctrl.rows(), Config::default().initial_rows());
        assert!(!ctrl.is_output_enabled());
        assert!(!ctrl.is_recording());
        assert!(!ctrl.is_booted());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = Config {
            channel_count: 5,
            ..Config::default()
        };
        assert!(matches!(Controller::new(cfg), Err(ControllerError::Config(_))));
    }

    #[test]
    fn setters_round_trip() {
        let ctrl = controller();
        ctrl.set_frequency(2, 523.25);
        ctrl.set_amplitude(2, 0.8);
        ctrl.set_phase(2, 0.75);
        assert_eq!(ctrl.row(2), Some(ParamRow::new(523.25, 0.8, 0.75)));
        assert_eq!(ctrl.row(6), None);
    }

    #[test]
    fn pump_fills_armed_capture() {
        let ctrl = controller();
        ctrl.arm_capture(true);
        ctrl.pump(ctrl.capture_capacity());
        assert!(!ctrl.is_capture_armed());
        assert!(ctrl.capture_points().iter().any(|p| p.x != 0.0));
    }

    #[test]
    fn recording_only_captures_audible_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.wav");
        let ctrl = controller();

        assert!(ctrl.toggle_recording(&path).unwrap());
        ctrl.pump(100);
        ctrl.enable_output(true);
        ctrl.pump(250);
        assert!(!ctrl.toggle_recording(&path).unwrap());

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.duration(), 250);
        assert_eq!(reader.spec().sample_rate, ctrl.sample_rate());
    }

    #[test]
    fn scope_refill_is_never_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.wav");
        let ctrl = controller();
        ctrl.enable_output(true);
        ctrl.toggle_recording(&path).unwrap();

        ctrl.arm_capture(true);
        ctrl.refill_scope();
        assert!(!ctrl.is_capture_armed());
        ctrl.pump(100);
        ctrl.toggle_recording(&path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.duration(), 100);
    }

    #[test]
    fn rate_change_restarts_recording_at_new_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.wav");
        let ctrl = controller();
        ctrl.enable_output(true);
        ctrl.toggle_recording(&path).unwrap();
        ctrl.pump(64);

        ctrl.rig().set_sample_rate(48000);
        ctrl.pump(128);
        ctrl.toggle_recording(&path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 48000);
        assert_eq!(reader.duration(), 128);
    }

    #[test]
    fn same_rate_keeps_recording() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.wav");
        let ctrl = controller();
        ctrl.enable_output(true);
        ctrl.toggle_recording(&path).unwrap();
        ctrl.pump(64);
        ctrl.rig().set_sample_rate(DEFAULT_SAMPLE_RATE);
        ctrl.pump(64);
        ctrl.toggle_recording(&path).unwrap();

        assert_eq!(hound::WavReader::open(&path).unwrap().duration(), 128);
    }

    #[test]
    fn recording_to_bad_path_fails_without_state_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("take.wav");
        let ctrl = controller();
        assert!(ctrl.toggle_recording(&path).is_err());
        assert!(!ctrl.is_recording());
    }
}
