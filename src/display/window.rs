// Window module - native presentation layer
//
// Owns the winit window and the pixels surface, drives the render loop
// from the redraw cadence and feeds dropped files into ROM intake.
//
// One redraw = one tick. After a completed tick the window requests the
// next redraw, so the tick chain follows the platform's paint scheduling;
// a skipped frame delays the next step, it never double-executes one.

use pixels::{Pixels, SurfaceTexture};
use std::path::PathBuf;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::DisplayConfig;
use crate::engine::Engine;
use crate::rom;

use super::canvas::{window_scale, Canvas};
use super::runloop::RenderLoop;

/// Frontend window: canvas, render loop and presentation surface
pub struct FrontendWindow<E: Engine> {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    canvas: Canvas,
    run_loop: RenderLoop<E>,
    relative_size: f64,
    initial_rom: Option<PathBuf>,
}

impl<E: Engine> FrontendWindow<E> {
    /// Create the frontend around an idle render loop
    ///
    /// The window itself is created once the event loop starts.
    pub fn new(
        run_loop: RenderLoop<E>,
        canvas: Canvas,
        relative_size: f64,
        initial_rom: Option<PathBuf>,
    ) -> Self {
        Self {
            window: None,
            pixels: None,
            canvas,
            run_loop,
            relative_size,
            initial_rom,
        }
    }

    /// Feed one user-selected file through ROM intake
    ///
    /// A failed intake is reported and changes nothing; a successful one
    /// starts the tick chain unless one is already running.
    fn intake_rom(&mut self, path: &std::path::Path) {
        match rom::load_and_start(&mut self.run_loop, path) {
            Ok(true) => {
                println!("Loaded ROM '{}'", path.display());
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            Ok(false) => {
                // Existing chain picks up the new program
                println!("Loaded ROM '{}' into the running session", path.display());
            }
            Err(err) => {
                eprintln!("ROM intake failed: {}", err);
            }
        }
    }

    /// Blit the canvas into the surface texture and present it
    fn present(&mut self) -> Result<(), pixels::Error> {
        if let Some(pixels) = &mut self.pixels {
            self.canvas.blit_to(pixels.frame_mut());
            pixels.render()?;
        }
        Ok(())
    }
}

impl<E: Engine> ApplicationHandler for FrontendWindow<E> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        // Scale the window's on-screen footprint to a fraction of the
        // viewport while preserving the canvas aspect ratio
        let scale = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .map(|monitor| {
                let size = monitor.size();
                window_scale(
                    self.canvas.width(),
                    self.canvas.height(),
                    size.width,
                    size.height,
                    self.relative_size,
                )
            })
            .unwrap_or(1.0);

        let window_attributes = Window::default_attributes()
            .with_title(format!(
                "viper - {}x{}",
                self.run_loop.engine().display_width(),
                self.run_loop.engine().display_height()
            ))
            .with_inner_size(LogicalSize::new(
                self.canvas.width() as f64 * scale,
                self.canvas.height() as f64 * scale,
            ))
            .with_resizable(false);

        let window = event_loop
            .create_window(window_attributes)
            .expect("Failed to create window");

        // Wrap window in Arc for shared ownership
        let window = Arc::new(window);
        let window_size = window.inner_size();

        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());

        let pixels = Pixels::new(self.canvas.width(), self.canvas.height(), surface_texture)
            .expect("Failed to create pixel buffer");

        self.window = Some(window);
        self.pixels = Some(pixels);

        // A ROM passed on the command line goes through the same intake
        // as a dropped file
        if let Some(path) = self.initial_rom.take() {
            self.intake_rom(&path);
        }

        // Paint the background once even before any ROM is loaded
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                println!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::DroppedFile(path) => {
                self.intake_rom(&path);
            }
            WindowEvent::RedrawRequested => {
                // One tick per redraw; a step fault ends the current run
                // but keeps the window alive for the next ROM
                if let Err(err) = self.run_loop.tick(&mut self.canvas) {
                    eprintln!("Engine fault, stopping run: {}", err);
                }

                if let Err(err) = self.present() {
                    eprintln!("Render error: {}", err);
                    event_loop.exit();
                    return;
                }

                // Schedule the next tick of the chain
                if self.run_loop.is_running() {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }
            _ => {}
        }
    }
}

/// Build the canvas and run the frontend until the window closes
///
/// # Arguments
/// * `engine` - Emulation core to drive
/// * `config` - Display configuration
/// * `initial_rom` - Optional ROM path to load at startup
///
/// A missing or broken frame asset degrades to a flat background sized to
/// the display grid; it never blocks ROM loading or rendering.
pub fn run_frontend<E: Engine>(
    engine: E,
    config: &DisplayConfig,
    initial_rom: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let style = config.render_style();

    let canvas = match Canvas::with_frame_image(&config.frame.image_path) {
        Ok(canvas) => canvas,
        Err(err) => {
            eprintln!("Frame asset unavailable ({}), using plain background", err);
            let width = style.origin_x * 2 + engine.display_width() as u32 * style.pixel_size;
            let height = style.origin_y * 2 + engine.display_height() as u32 * style.pixel_size;
            Canvas::new(width, height, style.off_color)
        }
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let run_loop = RenderLoop::new(engine, style);
    let mut frontend = FrontendWindow::new(run_loop, canvas, config.frame.relative_size, initial_rom);

    event_loop.run_app(&mut frontend)?;

    Ok(())
}
