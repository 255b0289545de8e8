//! Active-low push buttons, one per slot, debounced by waiting for release.

use embedded_hal::digital::v2::InputPin;

/// Whether a blocking wait should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hold {
    Wait,
    Abort,
}

pub struct Buttons<P, const N: usize> {
    pins: [P; N],
}

impl<P: InputPin, const N: usize> Buttons<P, N> {
    /// Pins must be configured as pull-up inputs; low means pressed.
    pub fn new(pins: [P; N]) -> Self {
        Self { pins }
    }

    pub fn is_pressed(&self, slot: usize) -> bool {
        self.pins
            .get(slot)
            .map(|pin| pin.is_low().unwrap_or(false))
            .unwrap_or(false)
    }

    /// Lowest asserted slot, without waiting.
    pub fn first_pressed(&self) -> Option<usize> {
        (0..N).find(|&slot| self.is_pressed(slot))
    }

    /// Spins until `slot` is released, calling `while_held` on every pass so
    /// the caller can keep the screen live. Returns `false` if `while_held`
    /// aborted the wait.
    pub fn wait_release<E>(
        &self,
        slot: usize,
        mut while_held: impl FnMut() -> Result<Hold, E>,
    ) -> Result<bool, E> {
        while self.is_pressed(slot) {
            if while_held()? == Hold::Abort {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Reports one press per press-release cycle. Slots are scanned in
    /// ascending order and the lowest asserted one wins; others held at the
    /// same time are ignored. Returns immediately with `None` when nothing
    /// is pressed, and also when the wait for release was aborted.
    pub fn poll<E>(
        &self,
        while_held: impl FnMut() -> Result<Hold, E>,
    ) -> Result<Option<usize>, E> {
        let Some(slot) = self.first_pressed() else {
            return Ok(None);
        };
        if self.wait_release(slot, while_held)? {
            Ok(Some(slot))
        } else {
            Ok(None)
        }
    }
}
