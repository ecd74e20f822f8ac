// Bit-grid decoder - maps a packed framebuffer to on/off pixels
//
// Framebuffers are packed one bit per pixel, row-major, MSB-first within
// each byte. This is the mirror image of the engine's packing and must
// match it bit-for-bit.

/// Decode one pixel from a packed monochrome framebuffer
///
/// # Arguments
/// * `row` - Pixel row, `0..height`
/// * `col` - Pixel column, `0..width`
/// * `buffer` - Packed framebuffer, at least `row * width/8 + col/8 + 1` bytes
/// * `width` - Display width in pixels, must be a multiple of 8
///
/// # Returns
/// `true` if the pixel is on
///
/// Pure and deterministic; geometry violations are contract bugs on the
/// caller's side and trip debug assertions.
#[inline]
pub fn pixel_on(row: usize, col: usize, buffer: &[u8], width: usize) -> bool {
    debug_assert!(width % 8 == 0, "width {} is not a multiple of 8", width);
    debug_assert!(col < width, "column {} out of bounds (width {})", col, width);

    let byte_index = row * (width / 8) + col / 8;
    let bit_mask = 0x80 >> (col % 8);

    buffer[byte_index] & bit_mask != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_is_column_zero() {
        let buffer = [0b1000_0000];
        assert!(pixel_on(0, 0, &buffer, 8));
        for col in 1..8 {
            assert!(!pixel_on(0, col, &buffer, 8));
        }
    }

    #[test]
    fn test_lsb_is_column_seven() {
        let buffer = [0b0000_0001];
        assert!(pixel_on(0, 7, &buffer, 8));
        for col in 0..7 {
            assert!(!pixel_on(0, col, &buffer, 8));
        }
    }

    #[test]
    fn test_multi_byte_row_indexing() {
        // width=16: column 15 is the LSB of the second byte
        let buffer = [0x00, 0x01];
        assert!(pixel_on(0, 15, &buffer, 16));
        for col in 0..15 {
            assert!(!pixel_on(0, col, &buffer, 16));
        }
    }

    #[test]
    fn test_row_stride() {
        // width=8: row 2 lives in byte 2
        let buffer = [0x00, 0x00, 0b0100_0000];
        assert!(pixel_on(2, 1, &buffer, 8));
        assert!(!pixel_on(0, 1, &buffer, 8));
        assert!(!pixel_on(1, 1, &buffer, 8));
    }

    #[test]
    fn test_byte_boundaries_within_row() {
        // width=24: every byte's first and last column
        let buffer = [0b1000_0001, 0b1000_0001, 0b1000_0001];
        for byte in 0..3 {
            assert!(pixel_on(0, byte * 8, &buffer, 24));
            assert!(pixel_on(0, byte * 8 + 7, &buffer, 24));
            for col in 1..7 {
                assert!(!pixel_on(0, byte * 8 + col, &buffer, 24));
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let buffer = [0xA5, 0x5A];
        for col in 0..16 {
            assert_eq!(
                pixel_on(0, col, &buffer, 16),
                pixel_on(0, col, &buffer, 16)
            );
        }
    }
}
