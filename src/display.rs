//! 84x48 monochrome frame buffer laid out the way the PCD8544 stores it.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

pub const WIDTH: usize = 84;
pub const HEIGHT: usize = 48;
/// Eight-pixel-tall horizontal bands.
pub const BANKS: usize = HEIGHT / 8;
pub const BUFFER_LEN: usize = WIDTH * BANKS;

/// One byte per column per bank, LSB at the top of the bank.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bytes: [u8; BUFFER_LEN],
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: [0; BUFFER_LEN],
        }
    }

    pub fn clear_all(&mut self) {
        self.bytes = [0; BUFFER_LEN];
    }

    /// Pixel at `(x, y)`; anything off-screen reads as off.
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        match Self::locate(x, y) {
            Some((index, bit)) => self.bytes[index] & bit != 0,
            None => false,
        }
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if let Some((index, bit)) = Self::locate(x, y) {
            if on {
                self.bytes[index] |= bit;
            } else {
                self.bytes[index] &= !bit;
            }
        }
    }

    /// Bytes in controller RAM order, ready to stream after addressing (0, 0).
    pub fn as_bytes(&self) -> &[u8; BUFFER_LEN] {
        &self.bytes
    }

    pub fn lit_pixels(&self) -> u32 {
        self.bytes.iter().map(|b| b.count_ones()).sum()
    }

    fn locate(x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x as usize >= WIDTH || y as usize >= HEIGHT {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some(((y / 8) * WIDTH + x, 1 << (y % 8)))
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}
