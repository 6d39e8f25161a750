//! Parameter grids: one column set per stereo group.

use lj_master::params::{
    clamp_frequency, fraction_to_degrees, gain_to_slider, AMP_SLIDER_MAX, PHASE_DEGREES_MAX,
};
use lj_master::ParamRow;

use super::{GuiState, UiAction};

const FREQ_W: f32 = 110.0;
const AMP_W: f32 = 120.0;
const PHASE_W: f32 = 100.0;

pub fn channels_panel(ui: &imgui::Ui, gui: &GuiState, actions: &mut Vec<UiAction>) {
    let rows = gui.controller.rows();
    let split = rows.len() / 2;

    group_grid(ui, "L", 0, &rows[..split], actions);
    ui.spacing();
    group_grid(ui, "R", split, &rows[split..], actions);
}

fn group_grid(
    ui: &imgui::Ui,
    side: &str,
    first: usize,
    rows: &[ParamRow],
    actions: &mut Vec<UiAction>,
) {
    let x0 = ui.cursor_pos()[0];
    let gap = ui.clone_style().item_spacing[0];
    let amp_x = x0 + FREQ_W + gap;
    let phase_x = amp_x + AMP_W + gap;

    ui.text(format!("{side} Frequency"));
    ui.same_line_with_pos(amp_x);
    ui.text(format!("{side} Amplitude"));
    ui.same_line_with_pos(phase_x);
    ui.text(format!("{side} Phase"));

    for (offset, row) in rows.iter().enumerate() {
        let channel = first + offset;

        let mut hz = row.frequency;
        ui.set_next_item_width(FREQ_W);
        if ui
            .input_float(format!("##freq{channel}"), &mut hz)
            .step(1.0)
            .display_format("%.1f")
            .build()
        {
            actions.push(UiAction::SetFrequency {
                channel,
                hz: clamp_frequency(hz),
            });
        }
        ui.same_line();

        let mut percent = gain_to_slider(row.amplitude);
        ui.set_next_item_width(AMP_W);
        if ui.slider(format!("##amp{channel}"), 0, AMP_SLIDER_MAX, &mut percent) {
            actions.push(UiAction::SetAmplitude { channel, percent });
        }
        ui.same_line();

        let mut degrees = fraction_to_degrees(row.phase);
        ui.set_next_item_width(PHASE_W);
        if ui
            .input_float(format!("##phase{channel}"), &mut degrees)
            .step(1.0)
            .display_format("%.1f")
            .build()
        {
            actions.push(UiAction::SetPhase {
                channel,
                degrees: degrees.clamp(0.0, PHASE_DEGREES_MAX),
            });
        }
    }
}
