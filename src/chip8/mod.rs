// CHIP-8 core - the built-in emulation engine
//
// Implements the CHIP-8 subset used by the frontend: 4KB memory, 64x32
// monochrome display, 16 variable registers, an index register and a
// stack. The display is stored packed, one bit per pixel, row-major,
// MSB-first - exactly the layout the display decoder expects.

use crate::engine::{Engine, EngineError};

/// Memory size in bytes
pub const MEM_SIZE: usize = 4096;

/// Display width in pixels
pub const DISPLAY_WIDTH: usize = 64;

/// Display height in pixels
pub const DISPLAY_HEIGHT: usize = 32;

/// Packed display size in bytes (one bit per pixel)
pub const DISPLAY_BYTES: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT / 8;

/// Number of variable registers (V0-VF)
const VAR_REG_COUNT: usize = 16;

/// Address where program images are loaded and execution begins
const START_ADDR: u16 = 0x200;

/// CHIP-8 CPU state
///
/// Created in a powered-on, empty state; a program image must be loaded
/// through [`Engine::load`] before stepping produces anything useful.
pub struct Chip8 {
    /// 4KB of addressable memory; program images live at 0x200
    memory: [u8; MEM_SIZE],

    /// Packed 64x32 framebuffer, MSB-first within each byte
    display: [u8; DISPLAY_BYTES],

    /// Program counter
    pc: u16,

    /// Index register (I)
    index_reg: u16,

    /// Subroutine stack
    stack: Vec<u16>,

    /// Variable registers V0-VF; VF doubles as the flag register
    var_regs: [u8; VAR_REG_COUNT],
}

impl Chip8 {
    /// Create a new core in its power-on state
    pub fn new() -> Self {
        Chip8 {
            memory: [0; MEM_SIZE],
            display: [0; DISPLAY_BYTES],
            pc: START_ADDR,
            index_reg: 0,
            stack: Vec::new(),
            var_regs: [0; VAR_REG_COUNT],
        }
    }

    /// Handle the 0x0 opcode group (currently only 00E0, clear screen)
    fn handle_misc(&mut self, upper: u8, lower: u8) -> Result<(), EngineError> {
        match (upper, lower) {
            (0x00, 0xE0) => {
                self.display = [0; DISPLAY_BYTES];
                Ok(())
            }
            _ => Err(EngineError::InvalidOpcode {
                opcode: (upper as u16) << 8 | lower as u16,
                pc: self.pc.wrapping_sub(2),
            }),
        }
    }

    /// Handle the 0x8 opcode group (register-to-register operations)
    ///
    /// VF is set to the carry/borrow/shifted-out bit where the operation
    /// defines one.
    fn handle_assign(
        &mut self,
        reg_idx_a: usize,
        reg_idx_b: usize,
        short_val: u8,
    ) -> Result<(), EngineError> {
        let reg_val_a = self.var_regs[reg_idx_a];
        let reg_val_b = self.var_regs[reg_idx_b];

        match short_val {
            0x0 => self.var_regs[reg_idx_a] = reg_val_b,
            0x1 => self.var_regs[reg_idx_a] |= reg_val_b,
            0x2 => self.var_regs[reg_idx_a] &= reg_val_b,
            0x3 => self.var_regs[reg_idx_a] ^= reg_val_b,
            0x4 => {
                self.var_regs[0xF] = if reg_val_a > u8::MAX - reg_val_b { 1 } else { 0 };
                self.var_regs[reg_idx_a] = reg_val_a.wrapping_add(reg_val_b);
            }
            0x5 => {
                self.var_regs[0xF] = if reg_val_a < reg_val_b { 1 } else { 0 };
                self.var_regs[reg_idx_a] = reg_val_a.wrapping_sub(reg_val_b);
            }
            0x6 => {
                self.var_regs[0xF] = reg_val_a & 0x1;
                self.var_regs[reg_idx_a] >>= 1;
            }
            0x7 => {
                self.var_regs[0xF] = if reg_val_b < reg_val_a { 1 } else { 0 };
                self.var_regs[reg_idx_a] = reg_val_b.wrapping_sub(reg_val_a);
            }
            0xE => {
                self.var_regs[0xF] = reg_val_a >> 7;
                self.var_regs[reg_idx_a] <<= 1;
            }
            _ => {
                return Err(EngineError::InvalidOpcode {
                    opcode: 0x8000
                        | (reg_idx_a as u16) << 8
                        | (reg_idx_b as u16) << 4
                        | short_val as u16,
                    pc: self.pc.wrapping_sub(2),
                })
            }
        }

        Ok(())
    }

    /// Handle DXYN: XOR an N-row sprite at (VX, VY) into the display
    ///
    /// Sprite rows are read from memory starting at the index register.
    /// Rows are XORed at arbitrary column alignment, so a row may straddle
    /// two display bytes. Rows falling past the end of the display are
    /// clipped.
    fn handle_draw(&mut self, reg_idx_a: usize, reg_idx_b: usize, short_val: u8) {
        let x = self.var_regs[reg_idx_a] as usize;
        let y = self.var_regs[reg_idx_b] as usize;

        let mut addr: usize = self.index_reg.into();

        for i in 0..short_val as usize {
            let sprite_row = self.memory[addr % MEM_SIZE];
            let bit_start = (y + i) * DISPLAY_WIDTH + x;
            self.xor_bits(bit_start, sprite_row);
            addr += 1;
        }
    }

    /// XOR one byte of sprite data into the packed display at a bit offset
    fn xor_bits(&mut self, bit_start: usize, sprite_row: u8) {
        let byte_idx = bit_start / 8;
        let shift = bit_start % 8;

        if byte_idx < DISPLAY_BYTES {
            self.display[byte_idx] ^= sprite_row >> shift;
        }
        if shift > 0 && byte_idx + 1 < DISPLAY_BYTES {
            self.display[byte_idx + 1] ^= sprite_row << (8 - shift);
        }
    }
}

impl Engine for Chip8 {
    /// Load a program image at 0x200 and reset execution state
    ///
    /// The image is validated before any state is touched: a rejected
    /// image leaves the previously loaded program running as if the call
    /// never happened.
    fn load(&mut self, image: &[u8]) -> Result<(), EngineError> {
        let capacity = MEM_SIZE - START_ADDR as usize;
        if image.len() > capacity {
            return Err(EngineError::ImageTooLarge {
                size: image.len(),
                capacity,
            });
        }

        self.memory = [0; MEM_SIZE];
        self.display = [0; DISPLAY_BYTES];
        self.pc = START_ADDR;
        self.index_reg = 0;
        self.stack.clear();
        self.var_regs = [0; VAR_REG_COUNT];

        let start = START_ADDR as usize;
        self.memory[start..start + image.len()].copy_from_slice(image);

        Ok(())
    }

    /// Fetch, decode and execute one instruction
    fn step(&mut self) -> Result<(), EngineError> {
        if self.pc as usize + 1 >= MEM_SIZE {
            return Err(EngineError::ProgramCounterOutOfRange { pc: self.pc });
        }

        let upper = self.memory[self.pc as usize];
        let lower = self.memory[self.pc as usize + 1];

        self.pc += 2;

        let opcode = upper >> 4;
        let reg_idx_a: usize = (upper & 0xf) as usize;
        let reg_idx_b: usize = (lower >> 4) as usize;
        let long_val: u16 = ((upper as u16) << 8 | lower as u16) & 0xfff;
        let short_val: u8 = lower & 0xf;

        match opcode {
            0x0 => self.handle_misc(upper, lower)?,
            0x1 => self.pc = long_val,
            0x3 => {
                if self.var_regs[reg_idx_a] == lower {
                    self.pc += 2;
                }
            }
            0x4 => {
                if self.var_regs[reg_idx_a] != lower {
                    self.pc += 2;
                }
            }
            0x5 => {
                if self.var_regs[reg_idx_a] == self.var_regs[reg_idx_b] {
                    self.pc += 2;
                }
            }
            0x6 => self.var_regs[reg_idx_a] = lower,
            0x7 => {
                self.var_regs[reg_idx_a] = self.var_regs[reg_idx_a].wrapping_add(lower);
            }
            0x8 => self.handle_assign(reg_idx_a, reg_idx_b, short_val)?,
            0x9 => {
                if self.var_regs[reg_idx_a] != self.var_regs[reg_idx_b] {
                    self.pc += 2;
                }
            }
            0xA => self.index_reg = long_val,
            0xD => self.handle_draw(reg_idx_a, reg_idx_b, short_val),
            _ => {
                return Err(EngineError::InvalidOpcode {
                    opcode: (upper as u16) << 8 | lower as u16,
                    pc: self.pc.wrapping_sub(2),
                })
            }
        };

        Ok(())
    }

    fn display_width(&self) -> usize {
        DISPLAY_WIDTH
    }

    fn display_height(&self) -> usize {
        DISPLAY_HEIGHT
    }

    fn pixels(&self) -> &[u8] {
        &self.display
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Display byte index for pixel row/col, for packed assertions
    fn display_byte(cpu: &Chip8, row: usize, col: usize) -> u8 {
        cpu.display[row * DISPLAY_WIDTH / 8 + col / 8]
    }

    #[test]
    fn test_pc_init() {
        let cpu = Chip8::new();
        assert_eq!(cpu.pc, START_ADDR);
    }

    #[test]
    fn test_load() {
        let mut cpu = Chip8::new();
        let img = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        cpu.load(&img).unwrap();

        assert_eq!(cpu.memory[START_ADDR as usize..(START_ADDR + 8) as usize], img);
    }

    #[test]
    fn test_load_resets_state() {
        let mut cpu = Chip8::new();
        cpu.pc = 0x400;
        cpu.index_reg = 0x123;
        cpu.var_regs[0x3] = 0xAB;
        cpu.display[0] = 0xFF;
        cpu.stack.push(0x300);

        cpu.load(&[0x00, 0xE0]).unwrap();

        assert_eq!(cpu.pc, START_ADDR);
        assert_eq!(cpu.index_reg, 0);
        assert_eq!(cpu.var_regs[0x3], 0);
        assert_eq!(cpu.display[0], 0);
        assert!(cpu.stack.is_empty());
    }

    #[test]
    fn test_load_rejects_oversized_image() {
        let mut cpu = Chip8::new();
        cpu.load(&[0x6A, 0x23]).unwrap();
        cpu.step().unwrap();

        let img = vec![0u8; MEM_SIZE];
        let err = cpu.load(&img).unwrap_err();
        assert!(matches!(err, EngineError::ImageTooLarge { .. }));

        // Prior program state is untouched by the rejected load
        assert_eq!(cpu.var_regs[0xA], 0x23);
        assert_eq!(cpu.pc, START_ADDR + 2);
    }

    #[test]
    fn test_clear_screen() {
        let mut cpu = Chip8::new();
        cpu.load(&[0x00, 0xE0]).unwrap();
        cpu.display[0] = 0xFF;
        cpu.step().unwrap();

        assert_eq!(cpu.display[0], 0x00);
    }

    #[test]
    fn test_jump() {
        let mut cpu = Chip8::new();
        cpu.load(&[0x12, 0x34]).unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.pc, 0x234);
    }

    #[test]
    fn test_set() {
        let mut cpu = Chip8::new();
        cpu.load(&[0x6A, 0x23]).unwrap();
        cpu.step().unwrap();

        assert_eq!(cpu.var_regs[0xA], 0x23);
    }

    #[test]
    fn test_add() {
        let mut cpu = Chip8::new();
        cpu.load(&[0x7A, 0x23]).unwrap();
        cpu.var_regs[0xA] = 0x45;
        cpu.step().unwrap();

        assert_eq!(cpu.var_regs[0xA], 0x68);
    }

    #[test]
    fn test_add_wraps_without_flag() {
        let mut cpu = Chip8::new();
        cpu.load(&[0x7A, 0x10]).unwrap();
        cpu.var_regs[0xA] = 0xF8;
        cpu.var_regs[0xF] = 0;
        cpu.step().unwrap();

        assert_eq!(cpu.var_regs[0xA], 0x08);
        assert_eq!(cpu.var_regs[0xF], 0);
    }

    #[test]
    fn test_set_index() {
        let mut cpu = Chip8::new();
        cpu.load(&[0xA1, 0x23]).unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.index_reg, 0x123);
    }

    #[test]
    fn test_draw_byte_aligned() {
        let mut cpu = Chip8::new();
        cpu.load(&[0xDA, 0xB3, 0x55, 0xAA, 0x55]).unwrap();
        cpu.index_reg = START_ADDR + 0x2;
        cpu.var_regs[0xA] = 8;
        cpu.var_regs[0xB] = 4;
        cpu.step().unwrap();

        assert_eq!(display_byte(&cpu, 4, 8), 0x55);
        assert_eq!(display_byte(&cpu, 5, 8), 0xAA);
        assert_eq!(display_byte(&cpu, 6, 8), 0x55);
    }

    #[test]
    fn test_draw_unaligned() {
        let mut cpu = Chip8::new();
        cpu.load(&[0xDA, 0xB1, 0xFF]).unwrap();
        cpu.index_reg = START_ADDR + 0x2;
        cpu.var_regs[0xA] = 3;
        cpu.var_regs[0xB] = 0;
        cpu.step().unwrap();

        // 0xFF at column 3 straddles the first two display bytes
        assert_eq!(cpu.display[0], 0b0001_1111);
        assert_eq!(cpu.display[1], 0b1110_0000);
    }

    #[test]
    fn test_draw_xor_erases() {
        let mut cpu = Chip8::new();
        // Draw the same sprite twice at the same position
        cpu.load(&[0xDA, 0xB1, 0xDA, 0xB1, 0x3C]).unwrap();
        cpu.index_reg = START_ADDR + 0x4;
        cpu.var_regs[0xA] = 0;
        cpu.var_regs[0xB] = 0;

        cpu.step().unwrap();
        assert_eq!(cpu.display[0], 0x3C);

        cpu.step().unwrap();
        assert_eq!(cpu.display[0], 0x00);
    }

    #[test]
    fn test_skip_if_equal() {
        let mut cpu = Chip8::new();
        let img = [0x35, 0xC8];

        cpu.load(&img).unwrap();
        cpu.var_regs[0x5] = 0xC7;
        cpu.step().unwrap();
        assert_eq!(cpu.pc, 0x202);

        cpu.load(&img).unwrap();
        cpu.var_regs[0x5] = 0xC8;
        cpu.step().unwrap();
        assert_eq!(cpu.pc, 0x204);
    }

    #[test]
    fn test_skip_if_not_equal() {
        let mut cpu = Chip8::new();
        let img = [0x45, 0xC8];

        cpu.load(&img).unwrap();
        cpu.var_regs[0x5] = 0xC7;
        cpu.step().unwrap();
        assert_eq!(cpu.pc, 0x204);

        cpu.load(&img).unwrap();
        cpu.var_regs[0x5] = 0xC8;
        cpu.step().unwrap();
        assert_eq!(cpu.pc, 0x202);
    }

    #[test]
    fn test_skip_if_regs_equal() {
        let mut cpu = Chip8::new();
        let img = [0x5A, 0x60];

        cpu.load(&img).unwrap();
        cpu.var_regs[0xA] = 0xB2;
        cpu.var_regs[0x6] = 0xB2;
        cpu.step().unwrap();
        assert_eq!(cpu.pc, 0x204);

        cpu.load(&img).unwrap();
        cpu.var_regs[0xA] = 0xB2;
        cpu.var_regs[0x6] = 0xB3;
        cpu.step().unwrap();
        assert_eq!(cpu.pc, 0x202);
    }

    #[test]
    fn test_skip_if_regs_not_equal() {
        let mut cpu = Chip8::new();
        let img = [0x9A, 0x60];

        cpu.load(&img).unwrap();
        cpu.var_regs[0xA] = 0xB2;
        cpu.var_regs[0x6] = 0xB2;
        cpu.step().unwrap();
        assert_eq!(cpu.pc, 0x202);

        cpu.load(&img).unwrap();
        cpu.var_regs[0xA] = 0xB2;
        cpu.var_regs[0x6] = 0xB3;
        cpu.step().unwrap();
        assert_eq!(cpu.pc, 0x204);
    }

    #[test]
    fn test_assign() {
        let mut cpu = Chip8::new();
        cpu.load(&[0x8B, 0xC0]).unwrap();
        cpu.var_regs[0xC] = 0x2C;
        cpu.step().unwrap();
        assert_eq!(cpu.var_regs[0xB], 0x2C);
    }

    #[test]
    fn test_or_assign() {
        let mut cpu = Chip8::new();
        cpu.load(&[0x8B, 0xC1]).unwrap();
        cpu.var_regs[0xB] = 0xAA;
        cpu.var_regs[0xC] = 0x55;
        cpu.step().unwrap();
        assert_eq!(cpu.var_regs[0xB], 0xFF);
    }

    #[test]
    fn test_and_assign() {
        let mut cpu = Chip8::new();
        cpu.load(&[0x8B, 0xC2]).unwrap();
        cpu.var_regs[0xB] = 0xAA;
        cpu.var_regs[0xC] = 0xA5;
        cpu.step().unwrap();
        assert_eq!(cpu.var_regs[0xB], 0xA0);
    }

    #[test]
    fn test_xor_assign() {
        let mut cpu = Chip8::new();
        cpu.load(&[0x8B, 0xC3]).unwrap();
        cpu.var_regs[0xB] = 0xAA;
        cpu.var_regs[0xC] = 0xA5;
        cpu.step().unwrap();
        assert_eq!(cpu.var_regs[0xB], 0x0F);
    }

    #[test]
    fn test_add_assign() {
        let mut cpu = Chip8::new();
        cpu.load(&[0x8B, 0xC4]).unwrap();
        cpu.var_regs[0xB] = 0xF3;
        cpu.var_regs[0xC] = 0x45;
        cpu.step().unwrap();
        assert_eq!(cpu.var_regs[0xB], 0x38);
        assert_eq!(cpu.var_regs[0xF], 1);
    }

    #[test]
    fn test_sub_assign() {
        let mut cpu = Chip8::new();
        cpu.load(&[0x8B, 0xC5]).unwrap();
        cpu.var_regs[0xB] = 0x45;
        cpu.var_regs[0xC] = 0xF3;
        cpu.step().unwrap();
        assert_eq!(cpu.var_regs[0xB], 0x52);
        assert_eq!(cpu.var_regs[0xF], 1);
    }

    #[test]
    fn test_right_shift_assign() {
        let mut cpu = Chip8::new();
        cpu.load(&[0x8B, 0xC6]).unwrap();
        cpu.var_regs[0xB] = 0x45;
        cpu.step().unwrap();
        assert_eq!(cpu.var_regs[0xB], 0x22);
        assert_eq!(cpu.var_regs[0xF], 1);
    }

    #[test]
    fn test_reverse_sub_assign() {
        let mut cpu = Chip8::new();
        cpu.load(&[0x8B, 0xC7]).unwrap();
        cpu.var_regs[0xB] = 0xF3;
        cpu.var_regs[0xC] = 0x45;
        cpu.step().unwrap();
        assert_eq!(cpu.var_regs[0xB], 0x52);
        assert_eq!(cpu.var_regs[0xF], 1);
    }

    #[test]
    fn test_left_shift_assign() {
        let mut cpu = Chip8::new();
        cpu.load(&[0x8B, 0xCE]).unwrap();
        cpu.var_regs[0xB] = 0xFF;
        cpu.step().unwrap();
        assert_eq!(cpu.var_regs[0xB], 0xFE);
        assert_eq!(cpu.var_regs[0xF], 1);
    }

    #[test]
    fn test_invalid_opcode_is_error_not_panic() {
        let mut cpu = Chip8::new();
        cpu.load(&[0xF0, 0x00]).unwrap();

        let err = cpu.step().unwrap_err();
        assert!(matches!(err, EngineError::InvalidOpcode { opcode: 0xF000, .. }));
    }

    #[test]
    fn test_geometry() {
        let cpu = Chip8::new();
        assert_eq!(cpu.display_width(), 64);
        assert_eq!(cpu.display_height(), 32);
        assert_eq!(cpu.display_width() % 8, 0);
        assert_eq!(cpu.pixels().len(), 64 * 32 / 8);
    }
}
