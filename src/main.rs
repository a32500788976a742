use std::error::Error;
use std::fs;
use std::path::PathBuf;

use chip8vm::config::DEFAULT_INITIAL_TIMERS;
use chip8vm::display::MonoTermDisplay;
use chip8vm::environment::Environment;
use chip8vm::input::{TermInput, CHIP8_CONVENTIONAL_KEYMAP, CHIP8_LITERAL_KEYMAP};
use chip8vm::sound::{Mute, SimpleBeep, Sound};
use chip8vm::{Chip8Interpreter, Config};
use clap::{Parser, ValueEnum};
use log::info;

#[derive(Parser)]
#[command(author, version, about = "Run a CHIP-8 program in the terminal")]
struct Args {
    /// program image to load at 0x200
    rom: PathBuf,

    /// cycles per second; the timers count down once per cycle
    #[arg(long, default_value_t = 60.0, value_parser = parse_hz)]
    hz: f64,

    /// stop after this many cycles
    #[arg(long)]
    cycles: Option<u64>,

    /// don't use the PC speaker
    #[arg(long)]
    mute: bool,

    /// seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// start both timers at zero instead of 60
    #[arg(long)]
    zero_timers: bool,

    /// how the keyboard maps onto the hex keypad
    #[arg(long, value_enum, default_value_t = Keymap::Conventional)]
    keymap: Keymap,
}

#[derive(Clone, Copy, ValueEnum)]
enum Keymap {
    /// 1234/qwer/asdf/zxcv
    Conventional,
    /// 0-9 and a-f
    Literal,
}

/// a usable cycle rate: finite and above zero
fn parse_hz(s: &str) -> Result<f64, String> {
    let hz: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if hz.is_finite() && hz > 0.0 {
        Ok(hz)
    } else {
        Err(format!("{} isn't a positive number of cycles per second", s))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    // initialise; the program is loaded before the terminal goes raw so a bad
    // ROM reports cleanly
    let config = Config {
        seed: args.seed,
        initial_timers: if args.zero_timers {
            0
        } else {
            DEFAULT_INITIAL_TIMERS
        },
        ..Config::default()
    };
    let mut interpreter = Chip8Interpreter::with_config(config);
    let program = fs::read(&args.rom)?;
    interpreter.load_program(&program)?;
    info!("loaded {} ({} bytes)", args.rom.display(), program.len());

    let keymap = match args.keymap {
        Keymap::Conventional => &CHIP8_CONVENTIONAL_KEYMAP,
        Keymap::Literal => &CHIP8_LITERAL_KEYMAP,
    };
    let mut input = TermInput::new(keymap)?;
    let mut display = MonoTermDisplay::new()?;
    let mut sound: Box<dyn Sound> = if args.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };

    let mut environment =
        Environment::new(interpreter, &mut display, &mut input, sound.as_mut());
    let cycles = environment.main_loop(args.hz, args.cycles)?;
    drop(environment);
    drop(display);
    drop(input);

    // shove something on stdout to stop the cli messing up the last frame
    println!("\r\nran {} cycles\r", cycles);
    Ok(())
}
