use crate::error::Chip8Error;
use crate::{MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_ADDR};
use log::debug;

// NB. addresses are u16 as per the chip-8 and wrap at the top of RAM; lengths
//     are usize to stop endless casting

/// Represents the memory map. Every access wraps modulo the size of RAM so a
/// runaway index register can never take the interpreter down.
pub trait MemoryMap {
    /// read one byte
    fn read(&self, addr: u16) -> u8;

    /// write one byte
    fn write(&mut self, addr: u16, value: u8);

    /// get a big-endian two-byte word (instruction fetch)
    fn get_word(&self, addr: u16) -> u16 {
        ((self.read(addr) as u16) << 8) | (self.read(addr.wrapping_add(1)) as u16)
    }

    /// write a chunk of bytes starting at addr
    fn write_all(&mut self, data: &[u8], addr: u16) {
        for (n, b) in data.iter().enumerate() {
            self.write(addr.wrapping_add(n as u16), *b);
        }
    }

    /// get a r/o view of the underlying memory
    fn get_ro_slice(&self) -> &[u8];
}

/// The CHIP-8 4K memory map as laid out by this interpreter:
///   0x0000-0x004f  font, 16 glyphs of 5 bytes
///   0x0050-0x01ff  unused (interpreter area on the original hardware)
///   0x0200-0x0fff  program
///
/// the call stack, registers and display live outside of addressable RAM
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
    pub program_addr: u16,
}

impl MemoryMap for Chip8MemoryMap {
    fn read(&self, addr: u16) -> u8 {
        self.bytes[addr as usize % MEMORY_SIZE]
    }
    fn write(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize % MEMORY_SIZE] = value;
    }
    fn get_ro_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Chip8MemoryMap {
    /// zeroed RAM with the font baked in at 0x000
    pub fn new() -> Self {
        let mut mm = Chip8MemoryMap {
            bytes: vec![0u8; MEMORY_SIZE].into_boxed_slice(),
            program_addr: PROGRAM_ADDR,
        };
        mm.write_all(&CHIP8_FONT, CHIP8_FONT_ADDR);
        mm
    }

    /// load a CHIP-8 program at 0x200; RAM is untouched if it doesn't fit
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: program.len(),
                max_size: MAX_PROGRAM_SIZE,
            });
        }
        debug!(
            "loading {} byte program at {:#05x}",
            program.len(),
            self.program_addr
        );
        self.write_all(program, self.program_addr);
        Ok(())
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

/// where the font lives, and how big each glyph is
pub const CHIP8_FONT_ADDR: u16 = 0x000;
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

pub const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
