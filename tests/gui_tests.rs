//! Headed GUI integration tests (custom harness, runs on main thread).
//!
//! Run with:
//!   cargo test --features test-harness --test gui_tests -- [filter]
//!
//! Screenshots saved to tests/output/ (gitignored).
//! Uses harness=false so the EventLoop runs on the macOS main thread.

use std::path::Path;
use std::time::Duration;

use lissajous::app::App;
use lissajous::ui::{GuiState, UiAction};
use lj_master::{Config, ParamRow};

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::EventLoopExtPumpEvents;
use winit::window::WindowId;

// ---------------------------------------------------------------------------
// Test framework
// ---------------------------------------------------------------------------

struct TestHarness {
    event_loop: EventLoop<()>,
    handler: TestHandler,
}

struct TestHandler {
    app: Option<App>,
    frames_rendered: usize,
    max_frames: usize,
}

impl TestHarness {
    fn new() -> Self {
        Self {
            event_loop: EventLoop::new().unwrap(),
            handler: TestHandler {
                app: None,
                frames_rendered: 0,
                max_frames: 5,
            },
        }
    }

    fn boot(&mut self) {
        for _ in 0..100 {
            self.event_loop
                .pump_app_events(Some(Duration::from_millis(16)), &mut self.handler);
            if self.handler.app.is_some() && self.handler.frames_rendered >= 3 {
                return;
            }
        }
        panic!("App did not become ready after pumping event loop");
    }

    fn app(&self) -> &App {
        self.handler.app.as_ref().unwrap()
    }

    fn app_mut(&mut self) -> &mut App {
        self.handler.app.as_mut().unwrap()
    }

    fn inject(&mut self, actions: &[UiAction]) {
        self.app_mut().inject_actions(actions);
    }

    fn render(&mut self, count: usize) {
        let target = self.handler.frames_rendered + count;
        self.handler.max_frames = target + 10;
        for _ in 0..count * 20 {
            if let Some(app) = &self.handler.app {
                app.window().request_redraw();
            }
            self.event_loop
                .pump_app_events(Some(Duration::from_millis(16)), &mut self.handler);
            if self.handler.frames_rendered >= target {
                return;
            }
        }
    }

    /// Render until the scope timer has fired at least once more.
    fn wait_for_scope(&mut self) {
        let period = self.app().gui.controller.config().frame_rate;
        std::thread::sleep(period + Duration::from_millis(20));
        self.render(2);
    }

    fn screenshot(&self, name: &str) {
        let path = Path::new("tests/output").join(name);
        self.app().screenshot(&path).expect("screenshot failed");
    }
}

impl ApplicationHandler for TestHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }
        // No audio device in tests; the scope renders on the UI thread
        let gui = GuiState::new(Config::default()).expect("default config is valid");
        self.app = Some(App::new(event_loop, 900.0, 540.0, gui).expect("window"));
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = &mut self.app else { return };

        let wrapped = winit::event::Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        app.handle_event(&wrapped);

        if let WindowEvent::RedrawRequested = event {
            app.render_frame();
            self.frames_rendered += 1;
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(app) = &self.app {
            if self.frames_rendered < self.max_frames {
                app.window().request_redraw();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Test runner
// ---------------------------------------------------------------------------

type TestFn = fn(&mut TestHarness);

const TESTS: &[(&str, TestFn)] = &[
    ("app_boots_and_renders", test_app_boots_and_renders),
    ("scope_draws_trace", test_scope_draws_trace),
    ("widget_actions_reach_controller", test_widget_actions_reach_controller),
    ("paused_graph_keeps_last_plot", test_paused_graph_keeps_last_plot),
    ("load_preset_updates_grid", test_load_preset_updates_grid),
];

fn main() {
    let filter = std::env::args().nth(1).unwrap_or_default();

    let mut h = TestHarness::new();
    h.boot();

    let mut passed = 0;
    let mut failed = 0;

    for (name, test_fn) in TESTS {
        if !filter.is_empty() && !name.contains(filter.as_str()) {
            continue;
        }
        eprint!("  {name} ... ");
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| test_fn(&mut h))) {
            Ok(()) => {
                eprintln!("ok");
                passed += 1;
            }
            Err(e) => {
                let msg = if let Some(s) = e.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = e.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                eprintln!("FAILED: {msg}");
                failed += 1;
            }
        }
    }

    eprintln!("\n{passed} passed, {failed} failed");
    if failed > 0 {
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

fn is_trace_pixel(px: &[u8]) -> bool {
    px[0] > 200 && px[1] > 200 && px[2] < 60
}

fn test_app_boots_and_renders(h: &mut TestHarness) {
    let (pixels, w, height) = h.app().capture_pixels();
    assert!(w > 0 && height > 0, "Window has nonzero dimensions");
    assert_eq!(pixels.len(), (w * height * 4) as usize);
    assert!(pixels.iter().any(|&p| p != 0), "Framebuffer not all-black");
    assert_eq!(h.app().window().title(), lissajous::app::WINDOW_TITLE);
    h.screenshot("boot.png");
}

fn test_scope_draws_trace(h: &mut TestHarness) {
    h.wait_for_scope();
    assert!(!h.app().gui.points.is_empty(), "Scope has points");

    let (pixels, _, _) = h.app().capture_pixels();
    assert!(
        pixels.chunks_exact(4).any(is_trace_pixel),
        "Yellow trace visible"
    );
    h.screenshot("scope.png");
}

fn test_widget_actions_reach_controller(h: &mut TestHarness) {
    h.inject(&[
        UiAction::SetFrequency { channel: 0, hz: 300.0 },
        UiAction::SetAmplitude { channel: 3, percent: 40 },
        UiAction::SetPhase { channel: 3, degrees: 90.0 },
    ]);
    h.wait_for_scope();

    let ctrl = &h.app().gui.controller;
    assert_eq!(ctrl.row(0), Some(ParamRow::new(300.0, 0.5, 0.0)));
    assert_eq!(ctrl.row(3), Some(ParamRow::new(400.0, 0.4, 0.25)));
    h.screenshot("edited.png");
}

fn test_paused_graph_keeps_last_plot(h: &mut TestHarness) {
    h.inject(&[UiAction::ToggleGraph]);
    assert!(!h.app().gui.display.is_running());
    let frozen = h.app().gui.points.clone();

    h.inject(&[UiAction::SetFrequency { channel: 0, hz: 1000.0 }]);
    h.wait_for_scope();
    assert_eq!(h.app().gui.points, frozen, "Plot unchanged while paused");

    h.inject(&[UiAction::ToggleGraph]);
    assert!(h.app().gui.display.is_running());
    h.screenshot("resumed.png");
}

fn test_load_preset_updates_grid(h: &mut TestHarness) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gui_preset.txt");
    std::fs::write(&path, "220,0.9,0\n330,0.1,0.5\n").unwrap();

    h.inject(&[UiAction::Load(vec![path])]);
    h.render(3);

    let gui = &h.app().gui;
    assert_eq!(gui.status, "Loaded gui_preset.txt");
    assert_eq!(gui.controller.row(0), Some(ParamRow::new(220.0, 0.9, 0.0)));
    assert_eq!(gui.controller.row(1), Some(ParamRow::new(330.0, 0.1, 0.5)));
    h.screenshot("loaded.png");
}
