// Canvas - CPU-side RGBA drawing surface
//
// The renderer fills logical pixel cells into this buffer; the window
// layer blits the whole buffer into the `pixels` surface texture once per
// tick. The canvas background is either a flat color or a decorative
// frame image decoded once at startup.

use std::fs::File;
use std::io;
use std::path::Path;

use super::renderer::{Color, DrawSurface};

/// Errors while loading the decorative frame asset
///
/// These are cosmetic failures: the frontend degrades to a flat
/// background and keeps going.
#[derive(Debug)]
pub enum FrameAssetError {
    /// Asset file could not be opened
    Io(io::Error),

    /// Asset is not a decodable PNG
    Decode(png::DecodingError),

    /// PNG color type the canvas cannot composite
    UnsupportedFormat(png::ColorType),
}

impl std::fmt::Display for FrameAssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameAssetError::Io(e) => write!(f, "Failed to open frame asset: {}", e),
            FrameAssetError::Decode(e) => write!(f, "Failed to decode frame asset: {}", e),
            FrameAssetError::UnsupportedFormat(ct) => {
                write!(f, "Unsupported frame asset color type: {:?}", ct)
            }
        }
    }
}

impl std::error::Error for FrameAssetError {}

impl From<io::Error> for FrameAssetError {
    fn from(e: io::Error) -> Self {
        FrameAssetError::Io(e)
    }
}

impl From<png::DecodingError> for FrameAssetError {
    fn from(e: png::DecodingError) -> Self {
        FrameAssetError::Decode(e)
    }
}

/// An owned RGBA pixel buffer implementing the renderer's fill primitive
#[derive(Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Create a canvas filled with a flat background color
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        let mut data = vec![0u8; width as usize * height as usize * 4];
        for px in data.chunks_exact_mut(4) {
            px.copy_from_slice(&background);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Create a canvas sized to a PNG frame image, with the image as its
    /// background
    ///
    /// # Arguments
    /// * `path` - Path to the PNG asset
    ///
    /// # Returns
    /// A canvas whose dimensions are the image's natural pixel size.
    pub fn with_frame_image<P: AsRef<Path>>(path: P) -> Result<Self, FrameAssetError> {
        let file = File::open(path)?;
        let decoder = png::Decoder::new(file);
        let mut reader = decoder.read_info()?;

        let mut buf = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        buf.truncate(info.buffer_size());

        let data = match info.color_type {
            png::ColorType::Rgba => buf,
            png::ColorType::Rgb => {
                let mut rgba = Vec::with_capacity(buf.len() / 3 * 4);
                for px in buf.chunks_exact(3) {
                    rgba.extend_from_slice(px);
                    rgba.push(0xFF);
                }
                rgba
            }
            png::ColorType::Grayscale => {
                let mut rgba = Vec::with_capacity(buf.len() * 4);
                for &g in &buf {
                    rgba.extend_from_slice(&[g, g, g, 0xFF]);
                }
                rgba
            }
            other => return Err(FrameAssetError::UnsupportedFormat(other)),
        };

        Ok(Self {
            width: info.width,
            height: info.height,
            data,
        })
    }

    /// Canvas width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA pixel data, row-major
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Copy the canvas into a `pixels` frame of the same dimensions
    pub fn blit_to(&self, frame: &mut [u8]) {
        let len = self.data.len().min(frame.len());
        frame[..len].copy_from_slice(&self.data[..len]);
    }

    /// Read one pixel; test helper for surface-state assertions
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }
}

impl DrawSurface for Canvas {
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let x_end = (x + width).min(self.width);
        let y_end = (y + height).min(self.height);

        for row in y..y_end {
            let row_start = (row as usize * self.width as usize + x as usize) * 4;
            let row_end = (row as usize * self.width as usize + x_end as usize) * 4;
            for px in self.data[row_start..row_end].chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
        }
    }
}

/// Compute the uniform window scale factor for a canvas inside a viewport
///
/// `relative_size * min(viewport_h / canvas_h, viewport_w / canvas_w)`:
/// the window's on-screen footprint fits within `relative_size` of the
/// viewport while preserving the canvas aspect ratio.
pub fn window_scale(
    canvas_width: u32,
    canvas_height: u32,
    viewport_width: u32,
    viewport_height: u32,
    relative_size: f64,
) -> f64 {
    let fit_x = viewport_width as f64 / canvas_width as f64;
    let fit_y = viewport_height as f64 / canvas_height as f64;
    relative_size * fit_x.min(fit_y)
}
