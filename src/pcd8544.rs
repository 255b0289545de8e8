//! Nokia 5110 (PCD8544) LCD controller over SPI.

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::blocking::spi::Write;
use embedded_hal::digital::v2::OutputPin;

use crate::display::FrameBuffer;
use crate::surface::Panel;

const FUNCTION_SET: u8 = 0x20;
const EXTENDED: u8 = 0x01;
const POWER_DOWN: u8 = 0x04;
const DISPLAY_NORMAL: u8 = 0x0C;
const TEMP_COEFFICIENT: u8 = 0x04;
const BIAS_1_48: u8 = 0x14;
const SET_VOP: u8 = 0x80;
const SET_Y: u8 = 0x40;
const SET_X: u8 = 0x80;

pub const DEFAULT_CONTRAST: u8 = 0x40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    Spi,
    Pin,
}

pub struct Pcd8544<SPI, DC, CE, RST> {
    spi: SPI,
    dc: DC,
    ce: CE,
    rst: RST,
    contrast: u8,
}

impl<SPI, DC, CE, RST> Pcd8544<SPI, DC, CE, RST>
where
    SPI: Write<u8>,
    DC: OutputPin,
    CE: OutputPin,
    RST: OutputPin,
{
    pub fn new(spi: SPI, dc: DC, ce: CE, rst: RST) -> Self {
        Self {
            spi,
            dc,
            ce,
            rst,
            contrast: DEFAULT_CONTRAST,
        }
    }

    /// Contrast is the 7-bit operating voltage (Vop) setting.
    pub fn with_contrast(mut self, contrast: u8) -> Self {
        self.contrast = contrast & 0x7F;
        self
    }

    /// Pulses reset and runs the controller setup. Leaves the display on.
    pub fn init(&mut self, delay: &mut impl DelayUs<u32>) -> Result<(), Error> {
        self.ce.set_high().map_err(|_| Error::Pin)?;
        self.rst.set_low().map_err(|_| Error::Pin)?;
        delay.delay_us(10_000);
        self.rst.set_high().map_err(|_| Error::Pin)?;

        self.command(&[
            FUNCTION_SET | EXTENDED,
            SET_VOP | self.contrast,
            TEMP_COEFFICIENT,
            BIAS_1_48,
            FUNCTION_SET,
            DISPLAY_NORMAL,
        ])?;
        debug!("pcd8544 ready, contrast {=u8:#x}", self.contrast);
        Ok(())
    }

    pub fn release(self) -> (SPI, DC, CE, RST) {
        (self.spi, self.dc, self.ce, self.rst)
    }

    fn command(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.dc.set_low().map_err(|_| Error::Pin)?;
        self.transfer(bytes)
    }

    fn data(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.dc.set_high().map_err(|_| Error::Pin)?;
        self.transfer(bytes)
    }

    fn transfer(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.ce.set_low().map_err(|_| Error::Pin)?;
        let written = self.spi.write(bytes).map_err(|_| Error::Spi);
        self.ce.set_high().map_err(|_| Error::Pin)?;
        written
    }
}

impl<SPI, DC, CE, RST> Panel for Pcd8544<SPI, DC, CE, RST>
where
    SPI: Write<u8>,
    DC: OutputPin,
    CE: OutputPin,
    RST: OutputPin,
{
    type Error = Error;

    fn flush(&mut self, frame: &FrameBuffer) -> Result<(), Error> {
        self.command(&[SET_Y, SET_X])?;
        self.data(frame.as_bytes())
    }

    fn set_power(&mut self, on: bool) -> Result<(), Error> {
        debug!("pcd8544 power {}", on);
        let mode = if on {
            FUNCTION_SET
        } else {
            FUNCTION_SET | POWER_DOWN
        };
        self.command(&[mode])
    }
}
