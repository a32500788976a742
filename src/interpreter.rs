/// # interpreter
///
/// All of the VM state lives in one owned `Chip8Interpreter`:
///  - 4K of RAM, font at 0x000, program at 0x200
///  - V0-VF, 8 bit; VF doubles as the carry/borrow/collision flag
///  - I, the 16 bit index register
///  - the program counter, starting at 0x200
///  - a 16 deep call stack with its own pointer
///  - delay and sound timers
///  - 16 key states, overwritten by the caller before each cycle
///  - the 64x32 framebuffer and its redraw flag
///
/// `cycle()` runs one fetch/decode/execute then ticks both timers. Nothing in
/// here blocks or does I/O; pacing is the caller's job. The only state that
/// survives between cycles apart from the above is "waiting for a key", which
/// FX0A enters when nothing is held down.
use crate::config::Config;
use crate::display::Framebuffer;
use crate::error::Chip8Error;
use crate::instruction::Instruction;
use crate::memory::{self, MemoryMap};
use crate::timer::CountdownTimer;
use crate::{KEY_COUNT, PROGRAM_ADDR};
use log::{trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

const STACK_DEPTH: usize = 16;
const VF: usize = 0xF;

/// what happened during one cycle, for the caller to act on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cycle {
    /// the sound timer ran out this cycle
    pub tone: bool,
    /// the word at pc didn't decode; it was skipped
    pub unknown: Option<u16>,
}

pub struct Chip8Interpreter {
    memory: memory::Chip8MemoryMap,
    v: [u8; 16],
    i: u16,
    program_counter: u16,
    stack: [u16; STACK_DEPTH],
    stack_pointer: u16,
    delay_timer: CountdownTimer,
    sound_timer: CountdownTimer,
    keys: [bool; KEY_COUNT],
    framebuffer: Framebuffer,
    awaiting_key: Option<u8>,
    rng: StdRng,
    config: Config,
}

impl Chip8Interpreter {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Chip8Interpreter {
            memory: memory::Chip8MemoryMap::new(),
            v: [0; 16],
            i: 0x0000,
            program_counter: PROGRAM_ADDR,
            stack: [0; STACK_DEPTH],
            stack_pointer: 0,
            delay_timer: CountdownTimer::new(config.initial_timers),
            sound_timer: CountdownTimer::new(config.initial_timers),
            keys: [false; KEY_COUNT],
            framebuffer: Framebuffer::new(),
            awaiting_key: None,
            rng,
            config,
        }
    }

    /// load a chip8 program image at 0x200
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        self.memory.load_program(program)
    }

    /// load a chip8 program from something readable
    pub fn load_from(&mut self, reader: &mut impl io::Read) -> Result<(), Chip8Error> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.load_program(&buf)
    }

    /// one machine cycle: fetch, decode, execute, then tick the timers
    pub fn cycle(&mut self) -> Cycle {
        let mut report = Cycle::default();

        match self.awaiting_key {
            Some(x) => self.resume_wait_for_key(x),
            None => {
                let word = self.memory.get_word(self.program_counter);
                match Instruction::decode(word) {
                    Ok(instruction) => {
                        trace!("{:#05x}: {:04x} {:?}", self.program_counter, word, instruction);
                        self.execute(instruction);
                    }
                    Err(e) => {
                        warn!("{} at {:#05x}", e, self.program_counter);
                        report.unknown = Some(word);
                        self.advance();
                    }
                }
            }
        }

        self.delay_timer.tick();
        report.tone = self.sound_timer.tick();
        report
    }

    /// run one decoded instruction against the current state. doesn't fetch
    /// and doesn't touch the timers' countdown
    pub fn execute(&mut self, instruction: Instruction) {
        use Instruction::*;
        match instruction {
            ClearScreen => {
                self.framebuffer.clear();
                self.advance();
            }
            Return => {
                if self.stack_pointer == 0 {
                    warn!("return with empty call stack at {:#05x}", self.program_counter);
                }
                self.stack_pointer = self.stack_pointer.wrapping_sub(1);
                self.program_counter = self.stack[self.stack_slot()];
                self.advance();
            }
            Jump { nnn } => self.program_counter = nnn,
            Call { nnn } => {
                if self.stack_pointer as usize >= STACK_DEPTH {
                    warn!("call stack overflow at {:#05x}", self.program_counter);
                }
                self.stack[self.stack_slot()] = self.program_counter;
                self.stack_pointer = self.stack_pointer.wrapping_add(1);
                self.program_counter = nnn;
            }
            SkipIfEqual { x, nn } => self.skip_if(self.vx(x) == nn),
            SkipIfNotEqual { x, nn } => self.skip_if(self.vx(x) != nn),
            SkipIfRegistersEqual { x, y } => self.skip_if(self.vx(x) == self.vx(y)),
            SkipIfRegistersNotEqual { x, y } => self.skip_if(self.vx(x) != self.vx(y)),
            Load { x, nn } => self.set_vx(x, nn),
            Add { x, nn } => self.set_vx(x, self.vx(x).wrapping_add(nn)),
            Copy { x, y } => self.set_vx(x, self.vx(y)),
            Or { x, y } => self.set_vx(x, self.vx(x) | self.vx(y)),
            And { x, y } => self.set_vx(x, self.vx(x) & self.vx(y)),
            Xor { x, y } => self.set_vx(x, self.vx(x) ^ self.vx(y)),
            AddRegisters { x, y } => {
                self.set_flag(self.vx(y) > 0xFF - self.vx(x));
                self.set_vx(x, self.vx(x).wrapping_add(self.vx(y)));
            }
            Subtract { x, y } => {
                self.set_flag(self.vx(y) <= self.vx(x));
                self.set_vx(x, self.vx(x).wrapping_sub(self.vx(y)));
            }
            SubtractReversed { x, y } => {
                self.set_flag(self.vx(x) <= self.vx(y));
                self.set_vx(x, self.vx(y).wrapping_sub(self.vx(x)));
            }
            ShiftRight { x } => {
                self.set_flag(self.vx(x) & 0x01 != 0);
                self.set_vx(x, self.vx(x) >> 1);
            }
            ShiftLeft { x } => {
                self.set_flag(self.vx(x) & 0x80 != 0);
                self.set_vx(x, self.vx(x) << 1);
            }
            SetIndex { nnn } => {
                self.i = nnn;
                self.advance();
            }
            JumpOffset { nnn } => self.program_counter = nnn.wrapping_add(self.v[0] as u16),
            Random { x, nn } => {
                let r: u8 = self.rng.gen();
                self.set_vx(x, r & nn);
            }
            Draw { x, y, n } => self.draw_sprite(x, y, n),
            SkipIfKeyPressed { x } => self.skip_if(self.key(self.vx(x))),
            SkipIfKeyNotPressed { x } => self.skip_if(!self.key(self.vx(x))),
            ReadDelayTimer { x } => self.set_vx(x, self.delay_timer.get()),
            WaitForKey { x } => self.resume_wait_for_key(x),
            SetDelayTimer { x } => {
                self.delay_timer.set(self.vx(x));
                self.advance();
            }
            SetSoundTimer { x } => {
                self.sound_timer.set(self.vx(x));
                self.advance();
            }
            AddToIndex { x } => {
                let sum = self.i.wrapping_add(self.vx(x) as u16);
                if self.config.index_overflow_flag {
                    self.set_flag(sum > 0x0FFF);
                }
                self.i = sum;
                self.advance();
            }
            FontGlyph { x } => {
                self.i = memory::CHIP8_FONT_ADDR
                    + (self.vx(x) & 0x0F) as u16 * memory::CHIP8_FONT_GLYPH_BYTES;
                self.advance();
            }
            StoreBcd { x } => {
                let a = self.vx(x);
                self.memory.write(self.i, a / 100);
                self.memory.write(self.i.wrapping_add(1), (a / 10) % 10);
                self.memory.write(self.i.wrapping_add(2), a % 10);
                self.advance();
            }
            DumpRegisters { x } => {
                let x = x & 0x0F;
                for r in 0..=x {
                    let value = self.vx(r);
                    self.memory.write(self.i.wrapping_add(r as u16), value);
                }
                self.i = self.i.wrapping_add(x as u16 + 1);
                self.advance();
            }
            LoadRegisters { x } => {
                let x = x & 0x0F;
                for r in 0..=x {
                    self.v[r as usize] = self.memory.read(self.i.wrapping_add(r as u16));
                }
                self.i = self.i.wrapping_add(x as u16 + 1);
                self.advance();
            }
        }
    }

    // write VX and move on
    fn set_vx(&mut self, x: u8, value: u8) {
        self.v[(x & 0x0F) as usize] = value;
        self.advance();
    }

    // every instruction that touches VF as a flag goes through here, before
    // its result is computed. so with VF as an operand the result sees the
    // flag, and with VF as the destination the result overwrites it
    fn set_flag(&mut self, flag: bool) {
        self.v[VF] = flag as u8;
    }

    fn draw_sprite(&mut self, x: u8, y: u8, n: u8) {
        let x = self.vx(x) as usize;
        let y = self.vx(y) as usize;
        let mut collision = false;
        for row in 0..n {
            let bits = self.memory.read(self.i.wrapping_add(row as u16));
            collision |= self.framebuffer.draw_row(x, y + row as usize, bits);
        }
        // N=0 still counts as a draw
        self.framebuffer.set_redraw();
        self.set_flag(collision);
        self.advance();
    }

    // FX0A, either first time through or resumed at the top of a cycle. the
    // highest numbered key held down wins
    fn resume_wait_for_key(&mut self, x: u8) {
        let x = x & 0x0F;
        match (0..KEY_COUNT).rev().find(|k| self.keys[*k]) {
            Some(k) => {
                self.v[x as usize] = k as u8;
                self.awaiting_key = None;
                self.advance();
            }
            None => self.awaiting_key = Some(x),
        }
    }

    fn skip_if(&mut self, condition: bool) {
        self.program_counter = self
            .program_counter
            .wrapping_add(if condition { 4 } else { 2 });
    }

    fn advance(&mut self) {
        self.program_counter = self.program_counter.wrapping_add(2);
    }

    fn vx(&self, x: u8) -> u8 {
        self.v[(x & 0x0F) as usize]
    }

    fn key(&self, k: u8) -> bool {
        self.keys[(k & 0x0F) as usize]
    }

    fn stack_slot(&self) -> usize {
        self.stack_pointer as usize % STACK_DEPTH
    }

    /// overwrite the whole keypad
    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys = keys;
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.keys[(key & 0x0F) as usize] = pressed;
    }

    pub fn pc(&self) -> u16 {
        self.program_counter
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn v(&self, x: u8) -> u8 {
        self.vx(x)
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn stack_pointer(&self) -> u16 {
        self.stack_pointer
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.get()
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.get()
    }

    pub fn memory(&self) -> &[u8] {
        self.memory.get_ro_slice()
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn needs_redraw(&self) -> bool {
        self.framebuffer.needs_redraw()
    }

    /// the renderer has consumed the current frame
    pub fn clear_redraw(&mut self) {
        self.framebuffer.clear_redraw()
    }

    /// register FX0A is waiting to fill, if it's waiting
    pub fn awaiting_key(&self) -> Option<u8> {
        self.awaiting_key
    }
}

impl Default for Chip8Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
