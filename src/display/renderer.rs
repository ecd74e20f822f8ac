// Frame renderer - paints one full frame of the emulator display
//
// Every cell of the grid is filled on every call: "off" means background
// color, never "leave untouched". Partial or differential updates are
// deliberately not supported, so surface state is always a pure function
// of the current framebuffer.

use super::decoder::pixel_on;

/// RGBA color, matching the frame format of the `pixels` surface
pub type Color = [u8; 4];

/// A drawing surface with a solid-fill rectangle primitive
///
/// The renderer needs nothing else; tests substitute a recording surface
/// and the frontend provides the CPU-side canvas.
pub trait DrawSurface {
    /// Fill an axis-aligned rectangle with a solid color
    ///
    /// Coordinates are in surface pixels. Implementations clip to their
    /// own bounds.
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Color);
}

/// Rendering style for the emulator display
#[derive(Debug, Clone, Copy)]
pub struct RenderStyle {
    /// Side length of one logical pixel, in surface pixels
    pub pixel_size: u32,

    /// Horizontal offset of the grid on the surface
    pub origin_x: u32,

    /// Vertical offset of the grid on the surface
    pub origin_y: u32,

    /// Color of "on" pixels
    pub on_color: Color,

    /// Color of "off" pixels
    pub off_color: Color,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            pixel_size: 8,
            origin_x: 0,
            origin_y: 0,
            on_color: [0xE0, 0xE0, 0xE0, 0xFF],
            off_color: [0x10, 0x10, 0x10, 0xFF],
        }
    }
}

/// Paint one full frame onto a surface
///
/// # Arguments
/// * `surface` - Target surface
/// * `width` - Display width in pixels, multiple of 8
/// * `height` - Display height in pixels
/// * `buffer` - Packed framebuffer, `width * height / 8` bytes
/// * `style` - Pixel size, grid origin and colors
///
/// Each cell `(row, col)` receives exactly one `pixel_size` square fill at
/// `(origin_x + col * pixel_size, origin_y + row * pixel_size)`.
pub fn render_frame(
    surface: &mut dyn DrawSurface,
    width: usize,
    height: usize,
    buffer: &[u8],
    style: &RenderStyle,
) {
    for row in 0..height {
        for col in 0..width {
            let color = if pixel_on(row, col, buffer, width) {
                style.on_color
            } else {
                style.off_color
            };

            surface.fill_rect(
                style.origin_x + col as u32 * style.pixel_size,
                style.origin_y + row as u32 * style.pixel_size,
                style.pixel_size,
                style.pixel_size,
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every fill call for assertions
    struct RecordingSurface {
        fills: Vec<(u32, u32, u32, u32, Color)>,
    }

    impl RecordingSurface {
        fn new() -> Self {
            Self { fills: Vec::new() }
        }
    }

    impl DrawSurface for RecordingSurface {
        fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Color) {
            self.fills.push((x, y, width, height, color));
        }
    }

    #[test]
    fn test_every_cell_filled_once() {
        let mut surface = RecordingSurface::new();
        let buffer = [0u8; 16 * 4 / 8];
        render_frame(&mut surface, 16, 4, &buffer, &RenderStyle::default());

        assert_eq!(surface.fills.len(), 16 * 4);
    }

    #[test]
    fn test_on_and_off_colors() {
        let mut surface = RecordingSurface::new();
        let style = RenderStyle {
            pixel_size: 1,
            ..RenderStyle::default()
        };
        // Only column 0 is on
        let buffer = [0b1000_0000];
        render_frame(&mut surface, 8, 1, &buffer, &style);

        assert_eq!(surface.fills[0], (0, 0, 1, 1, style.on_color));
        for fill in &surface.fills[1..] {
            assert_eq!(fill.4, style.off_color);
        }
    }

    #[test]
    fn test_cell_placement_and_size() {
        let mut surface = RecordingSurface::new();
        let style = RenderStyle {
            pixel_size: 20,
            origin_x: 5,
            origin_y: 7,
            ..RenderStyle::default()
        };
        let buffer = [0u8; 2];
        render_frame(&mut surface, 8, 2, &buffer, &style);

        // Row-major order: cell (row, col) at fills[row * 8 + col]
        let (x, y, w, h, _) = surface.fills[1 * 8 + 3];
        assert_eq!((x, y), (5 + 3 * 20, 7 + 20));
        assert_eq!((w, h), (20, 20));
    }

    #[test]
    fn test_full_repaint_is_idempotent() {
        let buffer = [0xA5, 0x5A, 0xFF, 0x00];
        let style = RenderStyle::default();

        let mut first = RecordingSurface::new();
        render_frame(&mut first, 16, 2, &buffer, &style);

        let mut second = RecordingSurface::new();
        render_frame(&mut second, 16, 2, &buffer, &style);
        render_frame(&mut second, 16, 2, &buffer, &style);

        // The second pass repeats the first exactly
        assert_eq!(second.fills[second.fills.len() / 2..], first.fills[..]);
        assert_eq!(second.fills[..second.fills.len() / 2], first.fills[..]);
    }
}
