use core::fmt;

/// Rejections raised while putting a game together. Nothing fails once a
/// round is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Relocation needs at least two slots to pick from.
    TooFewSlots,
    ZeroDuration,
    /// `duration_secs + 1` must fit the tick counter.
    DurationTooLong,
    ZeroAppearDuration,
    StartSlotOutOfRange,
    InvalidTimer,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::TooFewSlots => "at least two slots are required",
            Error::ZeroDuration => "round duration must be at least one second",
            Error::DurationTooLong => "round duration overflows the tick counter",
            Error::ZeroAppearDuration => "appearance time must be at least one second",
            Error::StartSlotOutOfRange => "start slot is not a playable slot",
            Error::InvalidTimer => "timer settings do not yield a usable compare value",
        };
        f.write_str(msg)
    }
}

/// Round timing and the button that starts a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameConfig {
    pub duration_secs: u32,
    /// How long the mole stays in one slot before moving on its own.
    pub appear_secs: u32,
    pub start_slot: usize,
}

impl GameConfig {
    pub const CANONICAL: GameConfig = GameConfig {
        duration_secs: 60,
        appear_secs: 1,
        start_slot: 0,
    };

    pub fn validate(&self, slots: usize) -> Result<(), Error> {
        if slots < 2 {
            return Err(Error::TooFewSlots);
        }
        if self.duration_secs == 0 {
            return Err(Error::ZeroDuration);
        }
        if self.duration_secs == u32::MAX {
            return Err(Error::DurationTooLong);
        }
        if self.appear_secs == 0 {
            return Err(Error::ZeroAppearDuration);
        }
        if self.start_slot >= slots {
            return Err(Error::StartSlotOutOfRange);
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// Settings for the periodic compare-match timer behind the 1 Hz tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickConfig {
    pub clock_hz: u32,
    pub prescaler: u32,
    pub period_secs: u32,
}

impl TickConfig {
    /// RP2040 system timer: a fixed 1 MHz microsecond counter.
    pub const RP2040_TIMER: TickConfig = TickConfig {
        clock_hz: 1_000_000,
        prescaler: 1,
        period_secs: 1,
    };

    /// 16 MHz AVR Timer1 in CTC mode with the /1024 prescaler.
    pub const ATMEGA328P: TickConfig = TickConfig {
        clock_hz: 16_000_000,
        prescaler: 1024,
        period_secs: 1,
    };

    /// Counter value at which the timer should fire, `(clock / prescaler) * period`.
    pub fn compare_value(&self) -> Result<u32, Error> {
        if self.prescaler == 0 || self.period_secs == 0 {
            return Err(Error::InvalidTimer);
        }
        match (self.clock_hz / self.prescaler).checked_mul(self.period_secs) {
            Some(0) | None => Err(Error::InvalidTimer),
            Some(value) => Ok(value),
        }
    }
}
