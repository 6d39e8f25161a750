//! Transport bar: output and recording toggles, scope toggle, preset save/load, status.

use super::{GuiState, UiAction};

pub fn transport_panel(ui: &imgui::Ui, gui: &GuiState, actions: &mut Vec<UiAction>) {
    if ui.button(format!("{}###output", gui.output_label())) {
        actions.push(UiAction::ToggleOutput);
    }
    ui.same_line();
    if ui.button(format!("{}###record", gui.record_label())) {
        if gui.controller.is_recording() {
            actions.push(UiAction::ToggleRecording(None));
        } else if let Some(path) = record_dialog(gui) {
            actions.push(UiAction::ToggleRecording(Some(path)));
        }
    }
    ui.same_line();
    if ui.button(format!("{}###graph", gui.display.label())) {
        actions.push(UiAction::ToggleGraph);
    }
    ui.same_line();
    ui.separator();
    ui.same_line();

    if ui.button("Save Function") {
        let file = rfd::FileDialog::new()
            .set_title("Save File")
            .set_directory(".")
            .save_file();
        if let Some(path) = file {
            actions.push(UiAction::Save(path));
        }
    }
    ui.same_line();
    if ui.button("Load Function(s)") {
        let files = rfd::FileDialog::new()
            .set_title("Load File(s)")
            .set_directory(".")
            .pick_files();
        if let Some(paths) = files {
            actions.push(UiAction::Load(paths));
        }
    }

    if gui.queue.is_active() {
        ui.same_line();
        ui.text(format!("Queued: {}", gui.queue.pending()));
    }
    if !gui.status.is_empty() {
        ui.same_line();
        ui.text(&gui.status);
    }
}

fn record_dialog(gui: &GuiState) -> Option<std::path::PathBuf> {
    let name = gui
        .record_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| lj_master::DEFAULT_RECORD_PATH.to_string());
    rfd::FileDialog::new()
        .set_title("Record WAV")
        .add_filter("WAV audio", &["wav", "WAV"])
        .set_file_name(name)
        .save_file()
}
