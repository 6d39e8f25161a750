//! Offline rendering of presets straight to WAV.

use std::path::{Path, PathBuf};

use lj_engine::{Engine, Frame};

use crate::{Config, ControllerError};

/// Render each preset in turn for `seconds_each`, starting from the
/// configured initial table. With no presets, renders the initial table once.
pub fn render_presets(
    config: &Config,
    paths: &[PathBuf],
    sample_rate: u32,
    seconds_each: f32,
) -> Result<Vec<Frame>, ControllerError> {
    config.validate()?;
    let mut engine = Engine::new(sample_rate, &config.initial_rows(), config.capture_window);
    let per_preset = (seconds_each.max(0.0) * sample_rate as f32).round() as usize;

    if paths.is_empty() {
        return Ok(engine.render_frames(per_preset));
    }

    let mut frames = Vec::with_capacity(per_preset * paths.len());
    for path in paths {
        let rows = lj_formats::load_preset(path)?;
        engine.bank_mut().apply_rows(&rows);
        tracing::info!("File loaded {}", path.display());
        frames.extend(engine.render_frames(per_preset));
    }
    Ok(frames)
}

/// [`render_presets`] into a 16-bit WAV file. Returns the frame count.
pub fn render_presets_to_wav(
    config: &Config,
    paths: &[PathBuf],
    sample_rate: u32,
    seconds_each: f32,
    out: &Path,
) -> Result<usize, ControllerError> {
    let frames = render_presets(config, paths, sample_rate, seconds_each)?;
    lj_formats::write_wav(out, &frames, sample_rate)?;
    Ok(frames.len())
}
