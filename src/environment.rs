/// # environment
///
/// Sets everything up and runs the main loop. One frame is:
///
///   poll input -> overwrite keypad -> one interpreter cycle
///     -> start/stop the beeper -> redraw if the framebuffer changed
///     -> sleep until the next frame
///
/// The interpreter's timers count in cycles, so running at 60Hz keeps them
/// honest. Faster rates speed the whole machine up.
use crate::display::Display;
use crate::input::Input;
use crate::interpreter::Chip8Interpreter;
use crate::sound::Sound;
use log::debug;
use std::error::Error;
use std::time::{Duration, Instant};

/// how long the beeper sounds for after the sound timer runs out
const BEEP_FRAMES: u8 = 8;

pub struct Environment<'a> {
    interpreter: Chip8Interpreter,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    beep_frames_left: u8,
    cycles: u64,
}

impl<'a> Environment<'a> {
    pub fn new(
        interpreter: Chip8Interpreter,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
    ) -> Self {
        Environment {
            interpreter,
            display,
            input,
            sound,
            beep_frames_left: 0,
            cycles: 0,
        }
    }

    pub fn interpreter(&self) -> &Chip8Interpreter {
        &self.interpreter
    }

    /// cycles run so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// run at `hz` frames a second until the user quits or, if given,
    /// `max_cycles` have run. returns the number of cycles run
    pub fn main_loop(&mut self, hz: f64, max_cycles: Option<u64>) -> Result<u64, Box<dyn Error>> {
        if !(hz.is_finite() && hz > 0.0) {
            return Err(format!("can't run at {} cycles/s", hz).into());
        }
        let frame_time = Duration::from_secs_f64(1.0 / hz);
        let mut next_frame = Instant::now();
        let mut report_at = next_frame + Duration::from_secs(1);
        let mut report_cycles = self.cycles;

        while !self.done(max_cycles) {
            self.frame()?;

            let now = Instant::now();
            if now >= report_at {
                debug!("running at {} cycles/s", self.cycles - report_cycles);
                report_at = now + Duration::from_secs(1);
                report_cycles = self.cycles;
            }
            // if we've fallen behind, don't try to catch up
            next_frame += frame_time;
            if next_frame > now {
                spin_sleep::sleep(next_frame - now);
            } else {
                next_frame = now;
            }
        }

        if self.sound.is_beeping() {
            self.sound.stop()?;
        }
        Ok(self.cycles)
    }

    /// one frame, without any pacing
    pub fn frame(&mut self) -> Result<(), Box<dyn Error>> {
        let keys = self.input.poll_keys()?;
        self.interpreter.set_keys(keys);

        let cycle = self.interpreter.cycle();
        self.cycles += 1;

        if cycle.tone {
            self.sound.beep()?;
            self.beep_frames_left = BEEP_FRAMES;
        } else if self.beep_frames_left > 0 {
            self.beep_frames_left -= 1;
            if self.beep_frames_left == 0 {
                self.sound.stop()?;
            }
        }

        if self.interpreter.needs_redraw() {
            self.display.draw(self.interpreter.framebuffer())?;
            self.interpreter.clear_redraw();
        }
        Ok(())
    }

    fn done(&self, max_cycles: Option<u64>) -> bool {
        if self.input.quit_requested() {
            return true;
        }
        match max_cycles {
            Some(max) => self.cycles >= max,
            None => false,
        }
    }
}
