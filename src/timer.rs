/// An 8 bit countdown timer. The caller ticks it at 60Hz; it stops at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountdownTimer {
    value: u8,
}

impl CountdownTimer {
    pub fn new(value: u8) -> Self {
        CountdownTimer { value }
    }

    pub fn get(&self) -> u8 {
        self.value
    }

    pub fn set(&mut self, value: u8) {
        self.value = value;
    }

    /// count down once; true only on the tick that takes it from 1 to 0
    pub fn tick(&mut self) -> bool {
        match self.value {
            0 => false,
            1 => {
                self.value = 0;
                true
            }
            _ => {
                self.value -= 1;
                false
            }
        }
    }
}
