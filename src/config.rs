/// knobs for the interpreter core; the defaults reproduce the reference
/// behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// value both timers hold at power-on
    pub initial_timers: u8,
    /// whether FX1E sets VF when I runs past 0xFFF
    pub index_overflow_flag: bool,
    /// fixed seed for CXNN; None draws one from the OS
    pub seed: Option<u64>,
}

pub const DEFAULT_INITIAL_TIMERS: u8 = 60;

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_timers: DEFAULT_INITIAL_TIMERS,
            index_overflow_flag: true,
            seed: None,
        }
    }
}
