//! Window, GL context and imgui renderer around a [`GuiState`].
//!
//! Used by the real app (main.rs) and by headed GUI tests.

use std::num::NonZeroU32;
use std::time::Instant;

use anyhow::{anyhow, Context as _};
use glow::HasContext;
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::DisplayBuilder;
use imgui_glow_renderer::AutoRenderer;
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use raw_window_handle::HasWindowHandle;
use tracing::error;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use crate::ui::{self, GuiState, UiAction};

pub const WINDOW_TITLE: &str = "Lissajous Audio Generator";

pub struct App {
    window: Window,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    imgui: imgui::Context,
    platform: WinitPlatform,
    renderer: AutoRenderer,
    pub gui: GuiState,
}

impl App {
    /// Open the window and take ownership of `gui`. Call from `resumed()`
    /// or test setup.
    pub fn new(
        event_loop: &ActiveEventLoop,
        width: f32,
        height: f32,
        gui: GuiState,
    ) -> anyhow::Result<Self> {
        let mut imgui = imgui_context();
        let mut platform = WinitPlatform::new(&mut imgui);
        let (window, gl_config) = open_window(event_loop, width, height)?;
        let (surface, context) = window_surface(&window, &gl_config)?;

        let gl = {
            let display = gl_config.display();
            unsafe { glow::Context::from_loader_function_cstr(|s| display.get_proc_address(s)) }
        };
        let renderer = AutoRenderer::new(gl, &mut imgui)
            .map_err(|e| anyhow!("imgui renderer init failed: {e:?}"))?;
        platform.attach_window(imgui.io_mut(), &window, HiDpiMode::Default);

        Ok(Self {
            window,
            surface,
            context,
            imgui,
            platform,
            renderer,
            gui,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Forward a winit event to the imgui platform layer.
    pub fn handle_event(&mut self, event: &winit::event::Event<()>) {
        self.platform
            .handle_event(self.imgui.io_mut(), &self.window, event);
    }

    pub fn handle_resize(&self, size: winit::dpi::PhysicalSize<u32>) {
        if let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
            self.surface.resize(&self.context, w, h);
        }
    }

    /// Build the UI, draw it and present. Failures are logged and the frame dropped.
    pub fn render_frame(&mut self) {
        if let Err(e) = self.draw() {
            error!(error = %e, "frame dropped");
        }
    }

    fn draw(&mut self) -> anyhow::Result<()> {
        self.platform
            .prepare_frame(self.imgui.io_mut(), &self.window)
            .map_err(|e| anyhow!("prepare_frame: {e}"))?;

        let ui = self.imgui.new_frame();
        ui::build_ui(ui, &mut self.gui);
        self.platform.prepare_render(ui, &self.window);
        let draw_data = self.imgui.render();

        unsafe {
            let gl = self.renderer.gl_context();
            gl.clear_color(0.08, 0.08, 0.08, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }
        self.renderer
            .render(draw_data)
            .map_err(|e| anyhow!("imgui render: {e:?}"))?;
        self.surface
            .swap_buffers(&self.context)
            .context("swap_buffers")?;
        Ok(())
    }

    /// Read the framebuffer as top-down RGBA. Returns (data, width, height).
    pub fn capture_pixels(&self) -> (Vec<u8>, u32, u32) {
        let size = self.window.inner_size();
        let (w, h) = (size.width, size.height);
        let mut pixels = vec![0u8; (w * h * 4) as usize];

        unsafe {
            self.renderer.gl_context().read_pixels(
                0,
                0,
                w as i32,
                h as i32,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(&mut pixels),
            );
        }

        flip_rows(&mut pixels, (w * 4) as usize);
        (pixels, w, h)
    }

    /// Save the framebuffer as a PNG (test builds only).
    #[cfg(feature = "test-harness")]
    pub fn screenshot(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let (pixels, w, h) = self.capture_pixels();
        write_png(path, &pixels, w, h)
    }

    /// Feed actions through the same path as widget input.
    pub fn inject_actions(&mut self, actions: &[UiAction]) {
        ui::process_actions(&mut self.gui, actions, Instant::now());
    }
}

fn imgui_context() -> imgui::Context {
    let mut imgui = imgui::Context::create();
    imgui.set_ini_filename(None);
    imgui.style_mut().use_dark_colors();
    imgui.fonts().add_font(&[imgui::FontSource::DefaultFontData {
        config: Some(imgui::FontConfig {
            size_pixels: 14.0,
            ..Default::default()
        }),
    }]);
    imgui
}

fn open_window(
    event_loop: &ActiveEventLoop,
    width: f32,
    height: f32,
) -> anyhow::Result<(Window, glutin::config::Config)> {
    let attrs = WindowAttributes::default()
        .with_inner_size(LogicalSize::new(width, height))
        .with_title(WINDOW_TITLE);

    let (window, gl_config) = DisplayBuilder::new()
        .with_window_attributes(Some(attrs))
        .build(event_loop, ConfigTemplateBuilder::new(), |configs| {
            // Prefer the most multisampled config
            configs
                .max_by_key(|c| c.num_samples())
                .expect("display offered no GL configs")
        })
        .map_err(|e| anyhow!("GL window creation failed: {e}"))?;

    let window = window.ok_or_else(|| anyhow!("no window created"))?;
    Ok((window, gl_config))
}

fn window_surface(
    window: &Window,
    gl_config: &glutin::config::Config,
) -> anyhow::Result<(Surface<WindowSurface>, PossiblyCurrentContext)> {
    let raw_handle = window
        .window_handle()
        .map_err(|e| anyhow!("window handle: {e}"))?
        .as_raw();
    let display = gl_config.display();

    let context_attrs = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .build(Some(raw_handle));
    let not_current = unsafe { display.create_context(gl_config, &context_attrs) }
        .context("GL context")?;

    let size = window.inner_size();
    let surface_attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        raw_handle,
        NonZeroU32::new(size.width.max(1)).unwrap_or(NonZeroU32::MIN),
        NonZeroU32::new(size.height.max(1)).unwrap_or(NonZeroU32::MIN),
    );
    let surface = unsafe { display.create_window_surface(gl_config, &surface_attrs) }
        .context("GL surface")?;
    let context = not_current
        .make_current(&surface)
        .context("make GL context current")?;

    Ok((surface, context))
}

/// glReadPixels returns rows bottom-up.
fn flip_rows(pixels: &mut [u8], row_bytes: usize) {
    let rows = pixels.len() / row_bytes.max(1);
    for y in 0..rows / 2 {
        let (head, tail) = pixels.split_at_mut((rows - 1 - y) * row_bytes);
        head[y * row_bytes..(y + 1) * row_bytes].swap_with_slice(&mut tail[..row_bytes]);
    }
}

#[cfg(feature = "test-harness")]
fn write_png(path: &std::path::Path, pixels: &[u8], width: u32, height: u32) -> anyhow::Result<()> {
    use std::fs::File;
    use std::io::BufWriter;

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(file, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixels)?;
    Ok(())
}
