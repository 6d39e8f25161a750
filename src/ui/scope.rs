//! XY scope: left channel on x, right channel on y, drawn with the imgui DrawList.

use lj_master::Point;

const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const AXIS_COLOR: [f32; 4] = [0.35, 0.35, 0.35, 1.0];
const GRID_COLOR: [f32; 4] = [0.18, 0.18, 0.18, 1.0];
const TRACE_COLOR: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
const TEXT_COLOR: [f32; 4] = [0.78, 0.78, 0.78, 1.0];
const DOT: f32 = 1.0;

pub fn scope_panel(ui: &imgui::Ui, points: &[Point]) {
    let avail = ui.content_region_avail();
    let side = avail[0].min(avail[1]).max(1.0);
    let origin = ui.cursor_screen_pos();
    ui.dummy([side, side]);

    let draw_list = ui.get_window_draw_list();
    let max = [origin[0] + side, origin[1] + side];
    draw_list
        .add_rect(origin, max, BACKGROUND)
        .filled(true)
        .build();

    for tick in [-0.5_f32, 0.5] {
        let [x, y] = to_screen(Point { x: tick, y: tick }, origin, side);
        draw_list.add_line([x, origin[1]], [x, max[1]], GRID_COLOR).build();
        draw_list.add_line([origin[0], y], [max[0], y], GRID_COLOR).build();
    }
    let [cx, cy] = to_screen(Point::default(), origin, side);
    draw_list.add_line([cx, origin[1]], [cx, max[1]], AXIS_COLOR).build();
    draw_list.add_line([origin[0], cy], [max[0], cy], AXIS_COLOR).build();

    let title_w = ui.calc_text_size("XY")[0];
    draw_list.add_text(
        [origin[0] + (side - title_w) / 2.0, origin[1] + 4.0],
        TEXT_COLOR,
        "XY",
    );

    for p in points.iter().copied().filter(|p| in_view(*p)) {
        let [x, y] = to_screen(p, origin, side);
        draw_list
            .add_rect([x - DOT, y - DOT], [x + DOT, y + DOT], TRACE_COLOR)
            .filled(true)
            .build();
    }
}

/// Both axes span [-1, 1]; points outside are not drawn.
fn in_view(p: Point) -> bool {
    (-1.0..=1.0).contains(&p.x) && (-1.0..=1.0).contains(&p.y)
}

/// Map a sample pair into a square of `side` pixels at `origin`, y up.
fn to_screen(p: Point, origin: [f32; 2], side: f32) -> [f32; 2] {
    [
        origin[0] + (p.x + 1.0) * 0.5 * side,
        origin[1] + (1.0 - p.y) * 0.5 * side,
    ]
}
