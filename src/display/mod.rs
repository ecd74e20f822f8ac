// Display module - the display refresh pipeline
//
// This module provides:
// - Bit-grid decoding of packed monochrome framebuffers
// - Full-frame rendering onto a drawing surface
// - The guarded render loop coupling engine steps to paint cadence
// - The CPU-side canvas and decorative frame compositing
// - The winit/pixels presentation window

pub mod canvas;
pub mod decoder;
pub mod renderer;
pub mod runloop;
pub mod window;

pub use canvas::{window_scale, Canvas, FrameAssetError};
pub use decoder::pixel_on;
pub use renderer::{render_frame, Color, DrawSurface, RenderStyle};
pub use runloop::{LoopState, RenderLoop};
pub use window::{run_frontend, FrontendWindow};
