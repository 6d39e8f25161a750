//! UI modules and layout composition.

mod channels;
mod scope;
mod transport;

use std::path::PathBuf;
use std::time::Instant;

use lj_master::params::{degrees_to_fraction, slider_to_gain};
use lj_master::{
    Config, Controller, ControllerError, DisplayLoop, PlaybackQueue, Point, QueueEvent,
    DEFAULT_RECORD_PATH,
};
use tracing::{error, info, warn};

/// Everything a panel can ask for. Panels only push actions; state changes
/// happen in [`process_actions`].
#[derive(Clone, Debug, PartialEq)]
pub enum UiAction {
    SetFrequency { channel: usize, hz: f32 },
    /// Slider position, 0..=105
    SetAmplitude { channel: usize, percent: i32 },
    SetPhase { channel: usize, degrees: f32 },
    ToggleOutput,
    /// `None` stops an active recording or reuses the last path
    ToggleRecording(Option<PathBuf>),
    ToggleGraph,
    Save(PathBuf),
    Load(Vec<PathBuf>),
}

/// UI-facing state bundle, passed to all panel functions.
/// No GL/imgui/renderer fields.
pub struct GuiState {
    pub controller: Controller,
    pub display: DisplayLoop,
    pub queue: PlaybackQueue,
    /// Last scope frame
    pub points: Vec<Point>,
    pub record_path: PathBuf,
    pub status: String,
}

impl GuiState {
    /// Build the controller and start the scope running.
    pub fn new(config: Config) -> Result<Self, ControllerError> {
        let now = Instant::now();
        let controller = Controller::new(config.clone())?;
        let mut display = DisplayLoop::new(config.frame_rate, now);
        display.toggle(&controller);
        Ok(Self {
            controller,
            display,
            queue: PlaybackQueue::new(config.play_time),
            points: Vec::new(),
            record_path: PathBuf::from(DEFAULT_RECORD_PATH),
            status: String::new(),
        })
    }

    pub fn output_label(&self) -> &'static str {
        if self.controller.is_output_enabled() {
            "Stop"
        } else {
            "Start"
        }
    }

    pub fn record_label(&self) -> &'static str {
        if self.controller.is_recording() {
            "Record Stop"
        } else {
            "Record Start"
        }
    }

    /// Run the scope and playlist timers.
    pub fn tick(&mut self, now: Instant) {
        if let Some(points) = self.display.tick(now, &self.controller) {
            self.points = points;
        }
        if let Some(event) = self.queue.tick(now, &self.controller) {
            self.report(event);
        }
    }

    fn report(&mut self, event: QueueEvent) {
        self.status = match event {
            QueueEvent::Loaded(path) => format!("Loaded {}", file_name(&path)),
            QueueEvent::Failed { path, error } => {
                warn!(path = %path.display(), %error, "preset load failed");
                format!("Load error ({}): {}", file_name(&path), error)
            }
            QueueEvent::Complete => "Playlist finished".to_string(),
        };
    }
}

pub fn build_ui(ui: &imgui::Ui, gui: &mut GuiState) {
    gui.tick(Instant::now());

    let mut actions = Vec::new();
    let display_size = ui.io().display_size;
    ui.window("lissajous")
        .position([0.0, 0.0], imgui::Condition::Always)
        .size(display_size, imgui::Condition::Always)
        .flags(
            imgui::WindowFlags::NO_TITLE_BAR
                | imgui::WindowFlags::NO_RESIZE
                | imgui::WindowFlags::NO_MOVE
                | imgui::WindowFlags::NO_COLLAPSE
                | imgui::WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS,
        )
        .build(|| {
            let avail = ui.content_region_avail();
            let bar_h = 56.0_f32;
            let side = (avail[1] - bar_h).min(avail[0] * 0.5).max(120.0);

            ui.child_window("scope")
                .size([side, side])
                .build(|| scope::scope_panel(ui, &gui.points));
            ui.same_line();
            ui.child_window("channels")
                .size([0.0, side])
                .build(|| channels::channels_panel(ui, gui, &mut actions));

            ui.separator();
            transport::transport_panel(ui, gui, &mut actions);
        });

    process_actions(gui, &actions, Instant::now());
}

/// Apply UI actions in order. Also the entry point for scripted input in tests.
pub fn process_actions(gui: &mut GuiState, actions: &[UiAction], now: Instant) {
    for action in actions {
        match action {
            UiAction::SetFrequency { channel, hz } => {
                gui.controller.set_frequency(*channel, *hz);
            }
            UiAction::SetAmplitude { channel, percent } => {
                gui.controller.set_amplitude(*channel, slider_to_gain(*percent));
            }
            UiAction::SetPhase { channel, degrees } => {
                gui.controller.set_phase(*channel, degrees_to_fraction(*degrees));
            }
            UiAction::ToggleOutput => {
                let enable = !gui.controller.is_output_enabled();
                gui.controller.enable_output(enable);
                gui.status = if enable { "Playing" } else { "Stopped" }.to_string();
            }
            UiAction::ToggleRecording(path) => {
                if let Some(path) = path {
                    gui.record_path = path.clone();
                }
                toggle_recording(gui);
            }
            UiAction::ToggleGraph => {
                gui.display.toggle(&gui.controller);
            }
            UiAction::Save(path) => match gui.controller.save_preset(path) {
                Ok(()) => {
                    info!(path = %path.display(), "preset saved");
                    gui.status = format!("Saved {}", file_name(path));
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "preset save failed");
                    gui.status = format!("Save error: {}", e);
                }
            },
            UiAction::Load(paths) => {
                if let Some(event) = gui.queue.load(paths.clone(), now, &gui.controller) {
                    gui.report(event);
                }
            }
        }
    }
}

fn toggle_recording(gui: &mut GuiState) {
    match gui.controller.toggle_recording(&gui.record_path) {
        Ok(true) => {
            gui.status = format!("Recording to {}", gui.record_path.display());
        }
        Ok(false) => {
            gui.status = format!("Recorded {}", gui.record_path.display());
        }
        Err(e) => {
            error!(path = %gui.record_path.display(), error = %e, "recording failed");
            gui.status = format!("Record error: {}", e);
        }
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
