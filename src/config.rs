// Configuration management
//
// Display settings persisted as TOML next to the executable, loaded at
// startup with a write-back default on first run.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::display::{Color, RenderStyle};

/// Default configuration file path
const CONFIG_FILE: &str = "viper_config.toml";

/// Frontend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Video settings
    pub video: VideoConfig,

    /// Decorative frame settings
    pub frame: FrameConfig,
}

/// Video configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Side length of one logical pixel on the canvas, in canvas pixels
    pub pixel_size: u32,

    /// Horizontal offset of the display grid on the canvas
    pub origin_x: u32,

    /// Vertical offset of the display grid on the canvas
    pub origin_y: u32,

    /// RGB color of lit pixels
    pub on_color: [u8; 3],

    /// RGB color of unlit pixels
    pub off_color: [u8; 3],
}

/// Decorative frame configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Path to the PNG frame image the canvas is sized to
    pub image_path: PathBuf,

    /// Fraction of the viewport the window may occupy (0.0-1.0)
    pub relative_size: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            video: VideoConfig {
                pixel_size: 8,
                origin_x: 0,
                origin_y: 0,
                on_color: [0xE0, 0xE0, 0xE0],
                off_color: [0x10, 0x10, 0x10],
            },
            frame: FrameConfig {
                image_path: PathBuf::from("img/frame.png"),
                relative_size: 0.8,
            },
        }
    }
}

impl DisplayConfig {
    /// Load the configuration, falling back to defaults
    ///
    /// If no config file exists the default configuration is written out
    /// so the user has something to edit.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|_| {
            let config = Self::default();
            // Try to save the default config, but don't fail if we can't
            let _ = config.save();
            config
        })
    }

    /// Load configuration from file
    pub fn load() -> Result<Self, io::Error> {
        let contents = fs::read_to_string(CONFIG_FILE)?;
        toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), io::Error> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(CONFIG_FILE, contents)
    }

    /// The render style described by the video section
    pub fn render_style(&self) -> RenderStyle {
        RenderStyle {
            pixel_size: self.video.pixel_size.max(1),
            origin_x: self.video.origin_x,
            origin_y: self.video.origin_y,
            on_color: opaque(self.video.on_color),
            off_color: opaque(self.video.off_color),
        }
    }
}

fn opaque(rgb: [u8; 3]) -> Color {
    [rgb[0], rgb[1], rgb[2], 0xFF]
}
