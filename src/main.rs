//! lissajous - stereo sine generator with a live XY scope.
//! Uses winit + glutin + glow + imgui-rs for the GUI.

use clap::Parser;
use lissajous::app::App;
use lissajous::args::{init_logging, ConfigArgs};
use lissajous::ui::GuiState;

use tracing::error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::WindowId;

#[cfg(all(feature = "alloc_check", debug_assertions))]
#[global_allocator]
static A: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;

#[derive(Parser, Debug)]
#[command(name = "lissajous")]
#[command(about = "Stereo sine generator with a live XY plot", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Don't open an audio device; the scope is rendered on the UI thread
    #[arg(long)]
    headless: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut gui = GuiState::new(cli.config.to_config())?;
    if !cli.headless {
        gui.controller.boot();
    }

    let event_loop = EventLoop::new()?;
    let mut state = AppState {
        app: None,
        pending: Some(gui),
    };
    event_loop.run_app(&mut state)?;
    Ok(())
}

struct AppState {
    app: Option<App>,
    /// Handed to the App once the window exists
    pending: Option<GuiState>,
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }
        let Some(gui) = self.pending.take() else { return };
        match App::new(event_loop, 960.0, 540.0, gui) {
            Ok(app) => self.app = Some(app),
            Err(e) => {
                error!(error = %e, "failed to open window");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = &mut self.app else { return };

        let wrapped: winit::event::Event<()> = winit::event::Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        app.handle_event(&wrapped);

        match event {
            WindowEvent::CloseRequested => {
                app.gui.controller.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => app.handle_resize(size),
            WindowEvent::RedrawRequested => app.render_frame(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(app) = &self.app {
            app.window().request_redraw();
        }
    }
}
