//! CHIP-8 virtual machine, with a terminal front end.
//!
//! ## Design
//!
//! * the interpreter core is one owned state object, stepped one cycle at a
//!   time by whoever holds it; it never blocks, sleeps or does I/O
//! * one cycle is fetch, decode, execute, then tick both timers once, so the
//!   caller runs cycles at 60Hz to get authentic timer rates
//! * decode is a pure function from the instruction word to a closed enum with
//!   its fields already pulled out; execute matches on that
//! * abstract display so can plug alternatives; starting with TUI in-console
//! * input, display and sound sit behind traits so the interpreter doesn't need
//!   to know how they work, and tests can swap in dummies
//!
//! Model
//!
//! ```text
//! main
//!  |-- config(cli)
//!  |-- interpreter(config)
//!  |    `-- load program; reject anything over 3584 bytes
//!  |-- display, input, sound
//!  `-- environment(interpreter, display, input, sound)
//!       `-- main loop, once per frame
//!            |-- keys = input.poll_keys(); interpreter.set_keys(keys)
//!            |-- cycle = interpreter.cycle()
//!            |-- if cycle.tone { sound.beep() }
//!            |-- if interpreter.needs_redraw() { display.draw(); interpreter.clear_redraw() }
//!            `-- sleep until the next frame
//! ```
pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod sound;
pub mod timer;

/// how much RAM we have
pub const MEMORY_SIZE: usize = 4096;

/// where the program is loaded
pub const PROGRAM_ADDR: u16 = 0x0200;

/// the biggest program that fits between PROGRAM_ADDR and the top of RAM
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_ADDR as usize;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// hex keypad, 0-F
pub const KEY_COUNT: usize = 16;

pub use config::Config;
pub use error::Chip8Error;
pub use instruction::Instruction;
pub use interpreter::{Chip8Interpreter, Cycle};
