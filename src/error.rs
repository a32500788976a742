use std::io;

/// Everything the interpreter core can report. None of these are fatal to the
/// VM itself; the caller decides what to do with them.
#[derive(Debug, thiserror::Error)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("Unknown instruction: {opcode:#06X}")]
    UnknownInstruction { opcode: u16 },

    #[error("couldn't read program: {0}")]
    Io(#[from] io::Error),
}
