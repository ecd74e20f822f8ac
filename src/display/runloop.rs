// Render loop controller - couples engine stepping to the paint cadence
//
// The loop is a two-state machine: Idle until the first successful ROM
// load, Running from then on. One tick is { step the engine, re-fetch the
// framebuffer view, paint one full frame }; scheduling of the next tick
// belongs to the presentation layer (one tick per redraw).
//
// Starting while already Running is a no-op. Without that guard a second
// ROM load would spawn a second tick chain and double-step the engine on
// every frame.

use crate::engine::{Engine, EngineError};

use super::renderer::{render_frame, DrawSurface, RenderStyle};

/// Lifecycle state of the render loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No program loaded yet, ticks do nothing
    Idle,
    /// Ticks step and render
    Running,
}

/// The render loop: engine, style and lifecycle in one session object
///
/// Owns the engine for the duration of a session. The presentation layer
/// drives it by calling [`RenderLoop::tick`] once per animation frame.
pub struct RenderLoop<E: Engine> {
    engine: E,
    style: RenderStyle,
    state: LoopState,
    ticks: u64,
}

impl<E: Engine> RenderLoop<E> {
    /// Create an idle loop around an engine
    pub fn new(engine: E, style: RenderStyle) -> Self {
        Self {
            engine,
            style,
            state: LoopState::Idle,
            ticks: 0,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Whether the loop is running
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Number of completed ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Borrow the engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Start the loop
    ///
    /// # Returns
    /// `true` if a new tick chain began, `false` if the loop was already
    /// running and the call was a no-op. Only a fresh chain should trigger
    /// the initial redraw request; the existing chain keeps scheduling
    /// itself.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = LoopState::Running;
        true
    }

    /// Load a program image into the engine and start the loop
    ///
    /// # Returns
    /// `Ok(true)` if this load started a new tick chain, `Ok(false)` if
    /// the loop was already running (the new program is picked up by the
    /// existing chain, since the engine state is what changed).
    ///
    /// A rejected image leaves both the engine and the loop state exactly
    /// as they were.
    pub fn load(&mut self, image: &[u8]) -> Result<bool, EngineError> {
        self.engine.load(image)?;
        Ok(self.start())
    }

    /// Execute one tick: step the engine once and paint one full frame
    ///
    /// Does nothing while Idle. The framebuffer view and the display
    /// geometry are re-queried from the engine on every tick, never cached
    /// across steps.
    ///
    /// A step failure is fatal to the current run: the loop drops back to
    /// Idle and stays there until the next successful load.
    pub fn tick(&mut self, surface: &mut dyn DrawSurface) -> Result<(), EngineError> {
        if !self.is_running() {
            return Ok(());
        }

        if let Err(err) = self.engine.step() {
            self.state = LoopState::Idle;
            return Err(err);
        }

        let width = self.engine.display_width();
        let height = self.engine.display_height();
        render_frame(surface, width, height, self.engine.pixels(), &self.style);

        self.ticks += 1;
        Ok(())
    }
}
