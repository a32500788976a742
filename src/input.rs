use crate::KEY_COUNT;
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::debug;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

/// map of characters typed on the keyboard to what the chip8 might expect
/// where '1' => 0x01 and 'a' => 0x0a
pub const CHIP8_LITERAL_KEYMAP: [(char, u8); 16] = [
    ('0', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('4', 0x04),
    ('5', 0x05),
    ('6', 0x06),
    ('7', 0x07),
    ('8', 0x08),
    ('9', 0x09),
    ('a', 0x0a),
    ('b', 0x0b),
    ('c', 0x0c),
    ('d', 0x0d),
    ('e', 0x0e),
    ('f', 0x0f),
];

/// ditto using left-hand side of qwerty keyboard
///   1 2 3 4      1 2 3 C
///   q w e r  =>  4 5 6 D
///   a s d f      7 8 9 E
///   z x c v      A 0 B F
pub const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// terminals only tell us about presses, so a key counts as held for this
/// many frames after the last press (or auto-repeat) we saw
const KEY_HOLD_FRAMES: u8 = 6;

/// provides the state of the 16 key hex keypad, once per frame
pub trait Input {
    /// the whole keypad as it is now; index is the key's hex value
    fn poll_keys(&mut self) -> Result<[bool; KEY_COUNT], io::Error>;

    /// the user has asked to leave
    fn quit_requested(&self) -> bool;
}

/// per-key countdown of frames a key still counts as held
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct KeyHold {
    frames: [u8; KEY_COUNT],
}

impl KeyHold {
    /// a new frame: everything held gets one frame closer to release
    fn decay(&mut self) {
        self.frames.iter_mut().for_each(|h| *h = h.saturating_sub(1));
    }

    fn press(&mut self, key: u8) {
        self.frames[(key & 0x0f) as usize] = KEY_HOLD_FRAMES;
    }

    fn keys(&self) -> [bool; KEY_COUNT] {
        let mut keys = [false; KEY_COUNT];
        for (k, h) in keys.iter_mut().zip(self.frames.iter()) {
            *k = *h > 0;
        }
        keys
    }
}

/// Input from the terminal, read with crossterm in raw mode
pub struct TermInput {
    held: KeyHold,
    keymap: HashMap<char, u8>,
    quit: bool,
}

impl TermInput {
    pub fn new(keymap: &[(char, u8)]) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            held: KeyHold::default(),
            keymap: keymap.iter().copied().collect(),
            quit: false,
        })
    }

    fn read_events(&mut self) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Esc => self.quit = true,
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.quit = true
                    }
                    KeyCode::Char(key) => {
                        let key = key.to_ascii_lowercase();
                        match self.keymap.get(&key) {
                            Some(mapped_key) => self.held.press(*mapped_key),
                            None => debug!("can't map {:?} to a COSMAC key", key),
                        }
                    }
                    _ => debug!("unknown key event received"),
                },
                _ => debug!("unknown event received"),
            }
        }
        Ok(())
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for TermInput {
    fn poll_keys(&mut self) -> Result<[bool; KEY_COUNT], io::Error> {
        self.held.decay();
        self.read_events()?;
        Ok(self.held.keys())
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// dummy Input implementation for testing; plays back a script of keypad
/// states, one per frame, then holds the last one. asks to quit once the
/// script is used up if told to
pub struct DummyInput {
    frames: Vec<[bool; KEY_COUNT]>,
    next: usize,
    quit_when_done: bool,
}

impl DummyInput {
    pub fn new(keys: &[u8]) -> Self {
        let mut frame = [false; KEY_COUNT];
        for k in keys {
            frame[(*k & 0x0f) as usize] = true;
        }
        DummyInput {
            frames: vec![frame],
            next: 0,
            quit_when_done: false,
        }
    }

    pub fn scripted(frames: Vec<[bool; KEY_COUNT]>, quit_when_done: bool) -> Self {
        DummyInput {
            frames,
            next: 0,
            quit_when_done,
        }
    }
}

impl Input for DummyInput {
    fn poll_keys(&mut self) -> Result<[bool; KEY_COUNT], io::Error> {
        let frame = match self.frames.get(self.next) {
            Some(f) => *f,
            None => self.frames.last().copied().unwrap_or([false; KEY_COUNT]),
        };
        self.next += 1;
        Ok(frame)
    }

    fn quit_requested(&self) -> bool {
        self.quit_when_done && self.next >= self.frames.len()
    }
}
