// viper - CHIP-8 style emulator frontend
// Display refresh pipeline plus the built-in CHIP-8 core

// Public modules
pub mod chip8;
pub mod config;
pub mod display;
pub mod engine;
pub mod rom;

// Re-export main types for convenience
pub use chip8::Chip8;
pub use config::{DisplayConfig, FrameConfig, VideoConfig};
pub use display::{
    pixel_on, render_frame, run_frontend, Canvas, Color, DrawSurface, FrameAssetError,
    FrontendWindow, LoopState, RenderLoop, RenderStyle,
};
pub use engine::{Engine, EngineError};
pub use rom::{load_and_start, read_rom_file, RomError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_components() {
        // Test that the pipeline can be assembled end to end
        let engine = Chip8::new();
        let _canvas = Canvas::new(64, 32, [0, 0, 0, 0xFF]);
        let run_loop = RenderLoop::new(engine, RenderStyle::default());
        assert_eq!(run_loop.state(), LoopState::Idle);
    }
}
