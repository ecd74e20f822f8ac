// ROM intake - from a user-selected file to a running loop
//
// The whole file is buffered before anything else happens; a failed read
// or a rejected image leaves the engine and the loop exactly as they
// were. Only a fully successful load reaches the loop start.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::display::RenderLoop;
use crate::engine::{Engine, EngineError};

/// Errors during ROM intake
#[derive(Debug)]
pub enum RomError {
    /// ROM file could not be read
    Read { path: PathBuf, source: io::Error },

    /// Engine rejected the program image
    Rejected(EngineError),
}

impl std::fmt::Display for RomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RomError::Read { path, source } => {
                write!(f, "Failed to read ROM '{}': {}", path.display(), source)
            }
            RomError::Rejected(e) => write!(f, "Engine rejected ROM: {}", e),
        }
    }
}

impl std::error::Error for RomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RomError::Read { source, .. } => Some(source),
            RomError::Rejected(e) => Some(e),
        }
    }
}

/// Read a ROM file into raw bytes
///
/// Single-shot: the result is either the complete file contents or an
/// error, never a partial read.
pub fn read_rom_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, RomError> {
    let path = path.as_ref();
    fs::read(path).map_err(|source| RomError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a ROM file, load it into the engine and start the render loop
///
/// # Returns
/// `Ok(true)` if this intake started a new tick chain, `Ok(false)` if the
/// loop was already running and simply picks up the new program.
///
/// On any failure nothing has been loaded and the loop state is
/// unchanged.
pub fn load_and_start<E: Engine, P: AsRef<Path>>(
    run_loop: &mut RenderLoop<E>,
    path: P,
) -> Result<bool, RomError> {
    let image = read_rom_file(path)?;
    run_loop.load(&image).map_err(RomError::Rejected)
}
