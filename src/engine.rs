// Engine boundary - the capability set the display pipeline consumes
//
// The frontend is polymorphic over any core that can load a program image,
// advance by one step, report its display geometry, and expose its packed
// framebuffer. The built-in CHIP-8 core (crate::chip8) is one such engine.

/// Errors reported by an emulation engine
#[derive(Debug)]
pub enum EngineError {
    /// Program image does not fit in engine memory
    ImageTooLarge { size: usize, capacity: usize },

    /// Engine fetched an opcode it cannot decode
    InvalidOpcode { opcode: u16, pc: u16 },

    /// Program counter ran past the end of memory
    ProgramCounterOutOfRange { pc: u16 },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::ImageTooLarge { size, capacity } => {
                write!(
                    f,
                    "Program image too large: {} bytes (capacity {} bytes)",
                    size, capacity
                )
            }
            EngineError::InvalidOpcode { opcode, pc } => {
                write!(f, "Invalid opcode {:04X} at {:04X}", opcode, pc)
            }
            EngineError::ProgramCounterOutOfRange { pc } => {
                write!(f, "Program counter out of range: {:04X}", pc)
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// An emulation core driven by the display pipeline
///
/// The pipeline calls `step` once per tick, then reads the framebuffer
/// through `pixels` and paints it. Everything behind this trait is opaque:
/// instruction decoding, timers and memory belong to the engine.
pub trait Engine {
    /// Load a program image, replacing any previously loaded program and
    /// resetting execution state
    ///
    /// A rejected image (e.g. too large) must leave the engine exactly as
    /// it was before the call.
    fn load(&mut self, image: &[u8]) -> Result<(), EngineError>;

    /// Advance engine state by one logical unit
    ///
    /// May mutate the framebuffer in place.
    fn step(&mut self) -> Result<(), EngineError>;

    /// Display width in pixels, always a multiple of 8
    fn display_width(&self) -> usize;

    /// Display height in pixels
    fn display_height(&self) -> usize;

    /// Packed monochrome framebuffer, one bit per pixel, row-major,
    /// MSB-first within each byte
    ///
    /// The returned slice is `ceil(width * height / 8)` bytes and is only
    /// valid until the next `step` or `load`. Callers must re-borrow it
    /// every tick rather than hold onto a copy.
    fn pixels(&self) -> &[u8];
}
