//! The drawing service the game talks to: a cursor-and-glyph text API plus a
//! few primitives over a persistent frame buffer.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_5X8};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::display::FrameBuffer;

/// Character cell matching the Nokia LCD libraries: 5 px glyph, 1 px gap.
const SMALL_FONT: MonoFont<'static> = MonoFont {
    character_spacing: 1,
    ..FONT_5X8
};
const LARGE_FONT: MonoFont<'static> = FONT_10X20;

/// Codes below this are user-definable glyphs.
pub const CUSTOM_GLYPHS: usize = 32;
pub type GlyphPattern = [u8; 5];

pub trait Surface {
    type Error;

    fn clear(&mut self);
    fn set_cursor(&mut self, x: i32, y: i32);
    /// Draws one character at the cursor and advances it. `scale` 1 is the
    /// small face, anything larger the big one.
    fn write_glyph(&mut self, code: char, scale: u8);
    fn write_string(&mut self, text: &str, scale: u8);
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);
    /// Outline with both corners inclusive.
    fn draw_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);
    fn draw_circle(&mut self, cx: i32, cy: i32, radius: u32);
    fn define_custom_glyph(&mut self, code: u8, pattern: GlyphPattern);
    /// Pushes the buffer to the glass.
    fn render(&mut self) -> Result<(), Self::Error>;
    fn power(&mut self, on: bool) -> Result<(), Self::Error>;
}

impl<S: Surface + ?Sized> Surface for &mut S {
    type Error = S::Error;

    fn clear(&mut self) {
        (**self).clear()
    }
    fn set_cursor(&mut self, x: i32, y: i32) {
        (**self).set_cursor(x, y)
    }
    fn write_glyph(&mut self, code: char, scale: u8) {
        (**self).write_glyph(code, scale)
    }
    fn write_string(&mut self, text: &str, scale: u8) {
        (**self).write_string(text, scale)
    }
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        (**self).draw_line(x1, y1, x2, y2)
    }
    fn draw_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        (**self).draw_rect(x1, y1, x2, y2)
    }
    fn draw_circle(&mut self, cx: i32, cy: i32, radius: u32) {
        (**self).draw_circle(cx, cy, radius)
    }
    fn define_custom_glyph(&mut self, code: u8, pattern: GlyphPattern) {
        (**self).define_custom_glyph(code, pattern)
    }
    fn render(&mut self) -> Result<(), Self::Error> {
        (**self).render()
    }
    fn power(&mut self, on: bool) -> Result<(), Self::Error> {
        (**self).power(on)
    }
}

/// The physical end of an [`Lcd`].
pub trait Panel {
    type Error;

    fn flush(&mut self, frame: &FrameBuffer) -> Result<(), Self::Error>;
    fn set_power(&mut self, on: bool) -> Result<(), Self::Error>;
}

/// [`Surface`] over a [`FrameBuffer`], flushed to a [`Panel`].
pub struct Lcd<P> {
    panel: P,
    frame: FrameBuffer,
    cursor: Point,
    custom: [Option<GlyphPattern>; CUSTOM_GLYPHS],
}

impl<P: Panel> Lcd<P> {
    pub fn new(panel: P) -> Self {
        Self {
            panel,
            frame: FrameBuffer::new(),
            cursor: Point::zero(),
            custom: [None; CUSTOM_GLYPHS],
        }
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    fn custom_glyph(&self, code: char) -> Option<GlyphPattern> {
        let index = code as usize;
        self.custom.get(index).copied().flatten()
    }

    fn draw_custom(&mut self, pattern: GlyphPattern, scale: u8) {
        let scale = i32::from(scale.max(1));
        for (column, bits) in pattern.iter().enumerate() {
            for row in 0..8 {
                if bits & (1 << row) == 0 {
                    continue;
                }
                let x = self.cursor.x + column as i32 * scale;
                let y = self.cursor.y + row * scale;
                for dx in 0..scale {
                    for dy in 0..scale {
                        self.frame.set_pixel(x + dx, y + dy, true);
                    }
                }
            }
        }
        self.cursor.x += 5 * scale + 1;
    }

    fn stroke() -> PrimitiveStyle<BinaryColor> {
        PrimitiveStyle::with_stroke(BinaryColor::On, 1)
    }
}

impl<P: Panel> Surface for Lcd<P> {
    type Error = P::Error;

    fn clear(&mut self) {
        self.frame.clear_all();
        self.cursor = Point::zero();
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Point::new(x, y);
    }

    fn write_glyph(&mut self, code: char, scale: u8) {
        if let Some(pattern) = self.custom_glyph(code) {
            self.draw_custom(pattern, scale);
            return;
        }
        let mut utf8 = [0; 4];
        self.write_string(code.encode_utf8(&mut utf8), scale);
    }

    fn write_string(&mut self, text: &str, scale: u8) {
        if text.chars().any(|c| self.custom_glyph(c).is_some()) {
            for c in text.chars() {
                self.write_glyph(c, scale);
            }
            return;
        }
        let font = if scale > 1 { &LARGE_FONT } else { &SMALL_FONT };
        let style = MonoTextStyle::new(font, BinaryColor::On);
        let next = Text::with_baseline(text, self.cursor, style, Baseline::Top)
            .draw(&mut self.frame)
            .unwrap_or(self.cursor);
        self.cursor = next;
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        Line::new(Point::new(x1, y1), Point::new(x2, y2))
            .into_styled(Self::stroke())
            .draw(&mut self.frame)
            .ok();
    }

    fn draw_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        Rectangle::with_corners(Point::new(x1, y1), Point::new(x2, y2))
            .into_styled(Self::stroke())
            .draw(&mut self.frame)
            .ok();
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, radius: u32) {
        Circle::with_center(Point::new(cx, cy), diameter(radius))
            .into_styled(Self::stroke())
            .draw(&mut self.frame)
            .ok();
    }

    fn define_custom_glyph(&mut self, code: u8, pattern: GlyphPattern) {
        match self.custom.get_mut(usize::from(code)) {
            Some(slot) => *slot = Some(pattern),
            None => warn!("glyph code {} is not customisable", code),
        }
    }

    fn render(&mut self) -> Result<(), Self::Error> {
        self.panel.flush(&self.frame)
    }

    fn power(&mut self, on: bool) -> Result<(), Self::Error> {
        self.panel.set_power(on)
    }
}

/// Bounding diameter of a circle, saturating for huge radii.
fn diameter(radius: u32) -> u32 {
    radius.saturating_mul(2).saturating_add(1)
}
