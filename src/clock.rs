/// Tick counters driven by the 1 Hz timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameClock {
    elapsed_ticks: u32,
    appear_ticks: u32,
}

impl GameClock {
    pub const fn new() -> Self {
        Self {
            elapsed_ticks: 0,
            appear_ticks: 0,
        }
    }

    /// Advances both counters by one second.
    pub fn tick(&mut self) {
        self.elapsed_ticks += 1;
        self.appear_ticks += 1;
    }

    /// Seconds since the round started. Never reset during a round.
    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed_ticks
    }

    /// Seconds since the mole last moved.
    pub fn appear_ticks(&self) -> u32 {
        self.appear_ticks
    }

    pub(crate) fn reset_appear(&mut self) {
        self.appear_ticks = 0;
    }

    /// Countdown value shown on the HUD: `duration_secs + 1` before the first
    /// tick, `duration_secs` after it, and `1` during the last live second.
    pub fn remaining(&self, duration_secs: u32) -> u32 {
        (duration_secs + 1).saturating_sub(self.elapsed_ticks)
    }

    /// True once the terminal tick (`duration_secs + 1`) has been counted.
    pub fn expired(&self, duration_secs: u32) -> bool {
        self.elapsed_ticks > duration_secs
    }
}
