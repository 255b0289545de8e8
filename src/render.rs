//! Fixed-layout frames for an 84x48 screen. Every frame is a full redraw.

use core::fmt::{self, Write as _};

use embedded_graphics::prelude::Point;
use heapless::String;

use crate::session::Snapshot;
use crate::surface::Surface;

pub const EMPTY_GLYPH: char = 'O';
pub const MOLE_GLYPH: char = '&';

/// Screen anchor of each slot, a cross of five holes.
pub const SLOT_ANCHORS: [Point; 5] = [
    Point::new(37, 0),
    Point::new(0, 13),
    Point::new(37, 13),
    Point::new(72, 13),
    Point::new(37, 28),
];

const DIVIDER_Y: i32 = 38;
const HUD_ANCHOR: Point = Point::new(0, 41);
const HUD_VALUE_X: i32 = 39;
const POINTS_ANCHOR: Point = Point::new(0, 40);
const POINTS_VALUE_X: i32 = 45;

/// Formats into a fixed buffer. Capacities below are sized for `u32::MAX`
/// in every field, so truncation means a caller changed a format string.
fn text<const C: usize>(args: fmt::Arguments<'_>) -> String<C> {
    let mut line = String::new();
    if line.write_fmt(args).is_err() {
        warn!("text truncated to {} bytes", C);
    }
    line
}

/// Title card shown while waiting for the start press.
pub fn title<S: Surface>(surface: &mut S, duration_secs: u32) -> Result<(), S::Error> {
    surface.clear();
    surface.draw_rect(0, 0, 83, 47);
    surface.set_cursor(7, 10);
    surface.write_string("WHAC-A-MOLE!", 1);
    surface.set_cursor(6, 20);
    surface.write_string("(W to start)", 1);

    let line: String<20> = text(format_args!("You have {}s", duration_secs));
    surface.set_cursor(5, 35);
    surface.write_string(&line, 1);
    surface.render()
}

/// Clears the buffer and draws the countdown and score line. Not flushed;
/// [`grid`] finishes the frame.
pub fn hud<S: Surface>(surface: &mut S, snapshot: &Snapshot) {
    surface.clear();
    surface.set_cursor(HUD_ANCHOR.x, HUD_ANCHOR.y);
    surface.write_string("T/Pts: ", 1);
    let value: String<21> = text(format_args!("{}/{}", snapshot.remaining_secs, snapshot.hits));
    surface.set_cursor(HUD_VALUE_X, HUD_ANCHOR.y);
    surface.write_string(&value, 1);
}

/// Draws every slot, the active one as the mole, then flushes.
pub fn grid<S: Surface>(surface: &mut S, anchors: &[Point], active: usize) -> Result<(), S::Error> {
    for (slot, anchor) in anchors.iter().enumerate() {
        let glyph = if slot == active {
            MOLE_GLYPH
        } else {
            EMPTY_GLYPH
        };
        surface.set_cursor(anchor.x, anchor.y);
        surface.write_glyph(glyph, 1);
    }
    surface.draw_line(0, DIVIDER_Y, 84, DIVIDER_Y);
    surface.render()
}

/// One live play frame: HUD plus grid.
pub fn play<S: Surface>(
    surface: &mut S,
    snapshot: &Snapshot,
    anchors: &[Point],
    active: usize,
) -> Result<(), S::Error> {
    hud(surface, snapshot);
    grid(surface, anchors, active)
}

pub fn game_over<S: Surface>(surface: &mut S, hits: u32) -> Result<(), S::Error> {
    surface.clear();
    surface.set_cursor(20, 0);
    surface.write_string("GAME", 2);
    surface.set_cursor(20, 20);
    surface.write_string("OVER", 2);

    surface.set_cursor(POINTS_ANCHOR.x, POINTS_ANCHOR.y);
    surface.write_string("Points: ", 1);
    let value: String<10> = text(format_args!("{}", hits));
    surface.set_cursor(POINTS_VALUE_X, POINTS_ANCHOR.y);
    surface.write_string(&value, 1);
    surface.render()
}
