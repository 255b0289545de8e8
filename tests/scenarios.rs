//! Whole-round behaviour with scripted buttons and a surface that lets the
//! "timer" fire whenever a frame is flushed.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::v2::InputPin;
use rtic_core::Mutex;
use whac_a_mole::render::SLOT_ANCHORS;
use whac_a_mole::surface::GlyphPattern;
use whac_a_mole::{
    Buttons, Game, GameConfig, GameState, Session, Step, Surface, TickOutcome, SLOTS,
};

/// Button line: replays `script` first, then holds `low`.
#[derive(Clone, Default)]
struct Line {
    low: Rc<Cell<bool>>,
    script: Rc<RefCell<VecDeque<bool>>>,
    reads: Rc<Cell<u32>>,
}

impl Line {
    fn scripted(levels: &[bool]) -> Self {
        let line = Line::default();
        line.script.borrow_mut().extend(levels.iter().copied());
        line
    }

    fn hold(&self, pressed: bool) {
        self.low.set(pressed);
    }
}

impl InputPin for Line {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        self.reads.set(self.reads.get() + 1);
        let scripted = self.script.borrow_mut().pop_front();
        Ok(scripted.unwrap_or_else(|| self.low.get()))
    }
}

#[derive(Clone)]
struct SharedSession(Rc<RefCell<Session>>);

impl Mutex for SharedSession {
    type T = Session;

    fn lock<R>(&mut self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }
}

type Hook = Box<dyn FnMut(u32, &Rc<RefCell<Session>>)>;

/// Keeps every line of text written and calls `on_render` with the running
/// render count after each flush. Consecutive writes on one row are joined.
struct Probe {
    session: Rc<RefCell<Session>>,
    texts: Vec<String>,
    row: i32,
    last_row: Option<i32>,
    glyphs: Vec<char>,
    renders: u32,
    on_render: Hook,
}

impl Probe {
    fn new(session: &Rc<RefCell<Session>>, on_render: Hook) -> Self {
        Self {
            session: session.clone(),
            texts: Vec::new(),
            row: 0,
            last_row: None,
            glyphs: Vec::new(),
            renders: 0,
            on_render,
        }
    }

    fn hud_lines(&self) -> Vec<&str> {
        self.texts
            .iter()
            .filter(|t| t.starts_with("T/Pts: "))
            .map(String::as_str)
            .collect()
    }
}

impl Surface for Probe {
    type Error = Infallible;

    fn clear(&mut self) {
        self.glyphs.clear();
        self.last_row = None;
    }
    fn set_cursor(&mut self, _x: i32, y: i32) {
        self.row = y;
    }
    fn write_glyph(&mut self, code: char, _scale: u8) {
        self.glyphs.push(code);
        self.last_row = None;
    }
    fn write_string(&mut self, text: &str, _scale: u8) {
        match self.texts.last_mut() {
            Some(line) if self.last_row == Some(self.row) => line.push_str(text),
            _ => self.texts.push(text.to_string()),
        }
        self.last_row = Some(self.row);
    }
    fn draw_line(&mut self, _x1: i32, _y1: i32, _x2: i32, _y2: i32) {}
    fn draw_rect(&mut self, _x1: i32, _y1: i32, _x2: i32, _y2: i32) {}
    fn draw_circle(&mut self, _cx: i32, _cy: i32, _radius: u32) {}
    fn define_custom_glyph(&mut self, _code: u8, _pattern: GlyphPattern) {}
    fn render(&mut self) -> Result<(), Infallible> {
        self.renders += 1;
        (self.on_render)(self.renders, &self.session);
        Ok(())
    }
    fn power(&mut self, _on: bool) -> Result<(), Infallible> {
        Ok(())
    }
}

fn quiet() -> Hook {
    Box::new(|_: u32, _: &Rc<RefCell<Session>>| {})
}

fn tick_every_render() -> Hook {
    Box::new(|_: u32, session: &Rc<RefCell<Session>>| {
        session.borrow_mut().tick();
    })
}

struct Rig {
    game: Game<Probe, Line, SLOTS>,
    session: SharedSession,
    lines: [Line; SLOTS],
}

fn rig(config: GameConfig, hook: Hook) -> Rig {
    rig_with_lines(config, hook, Default::default())
}

fn rig_with_lines(config: GameConfig, hook: Hook, lines: [Line; SLOTS]) -> Rig {
    let session = Rc::new(RefCell::new(Session::new(&config)));
    let probe = Probe::new(&session, hook);
    let game = Game::new(probe, Buttons::new(lines.clone()), config, SLOT_ANCHORS).unwrap();
    Rig {
        game,
        session: SharedSession(session),
        lines,
    }
}

fn config(duration_secs: u32, appear_secs: u32) -> GameConfig {
    GameConfig {
        duration_secs,
        appear_secs,
        start_slot: 0,
    }
}

impl Rig {
    fn state(&self) -> GameState {
        self.session.0.borrow().state()
    }

    fn hits(&self) -> u32 {
        self.session.0.borrow().hits()
    }

    fn tick(&self) -> TickOutcome {
        self.session.0.borrow_mut().tick()
    }
}

#[test]
fn round_without_presses_ends_after_duration_plus_one_ticks() {
    let ticking = Rc::new(Cell::new(false));
    let armed = ticking.clone();
    let hook: Hook = Box::new(move |_: u32, session: &Rc<RefCell<Session>>| {
        if armed.get() {
            session.borrow_mut().tick();
        }
    });

    let mut lines: [Line; SLOTS] = Default::default();
    lines[0] = Line::scripted(&[false, false, false, true, true]);
    let mut rig = rig_with_lines(config(5, 1), hook, lines);

    let session = rig.session.clone();
    let hits = rig
        .game
        .run(
            &mut rig.session,
            || 0xDEAD_BEEF,
            || {
                assert_eq!(session.0.borrow().state(), GameState::Playing);
                assert_eq!(session.0.borrow().clock().elapsed_ticks(), 0);
                ticking.set(true);
            },
        )
        .unwrap();

    assert_eq!(hits, 0);
    assert_eq!(rig.state(), GameState::GameOver);
    assert_eq!(rig.session.0.borrow().clock().elapsed_ticks(), 6);

    let probe = rig.game.surface();
    assert_eq!(
        probe.hud_lines(),
        [
            "T/Pts: 6/0",
            "T/Pts: 5/0",
            "T/Pts: 4/0",
            "T/Pts: 3/0",
            "T/Pts: 2/0",
            "T/Pts: 1/0",
        ]
    );
    assert_eq!(
        &probe.texts[probe.texts.len() - 3..],
        ["GAME", "OVER", "Points: 0"]
    );
}

#[test]
fn hitting_the_mole_scores_and_moves_it() {
    let mut rig = rig(config(60, 10), quiet());
    let mut mole = rig.game.start(&mut rig.session, 42).unwrap();
    rig.tick();
    rig.tick();

    let target = mole.current();
    rig.lines[target]
        .script
        .borrow_mut()
        .extend([true, true, true]);

    let step = rig.game.step(&mut rig.session, &mut mole).unwrap();
    assert_eq!(step, Step::Continue);
    assert_eq!(rig.hits(), 1);
    assert_ne!(mole.current(), target);

    let session = rig.session.0.borrow();
    assert_eq!(session.clock().appear_ticks(), 0);
    assert_eq!(session.clock().elapsed_ticks(), 2);
}

#[test]
fn missing_moves_the_mole_without_scoring() {
    let mut rig = rig(config(60, 10), quiet());
    let mut mole = rig.game.start(&mut rig.session, 7).unwrap();
    rig.tick();

    let target = mole.current();
    let wrong = (target + 1) % SLOTS;
    rig.lines[wrong].script.borrow_mut().extend([true, false]);

    rig.game.step(&mut rig.session, &mut mole).unwrap();
    assert_eq!(rig.hits(), 0);
    assert_ne!(mole.current(), target);
    assert_eq!(rig.session.0.borrow().clock().appear_ticks(), 0);
}

#[test]
fn mole_relocates_on_its_own_after_appear_time() {
    let mut rig = rig(config(60, 1), quiet());
    let mut mole = rig.game.start(&mut rig.session, 0).unwrap();

    let first = mole.current();
    rig.game.step(&mut rig.session, &mut mole).unwrap();
    assert_eq!(mole.current(), first, "moved before any tick");

    rig.tick();
    rig.game.step(&mut rig.session, &mut mole).unwrap();
    let second = mole.current();
    assert_ne!(second, first);
    assert_eq!(rig.session.0.borrow().clock().appear_ticks(), 0);

    rig.tick();
    rig.game.step(&mut rig.session, &mut mole).unwrap();
    assert_ne!(mole.current(), second);
    assert_eq!(rig.hits(), 0);

    let glyphs = &rig.game.surface().glyphs;
    assert_eq!(glyphs.iter().position(|&g| g == '&'), Some(mole.current()));
    assert_eq!(glyphs.iter().filter(|&&g| g == 'O').count(), SLOTS - 1);
}

#[test]
fn simultaneous_presses_report_the_lowest_slot_and_wait_for_its_release() {
    let lines: [Line; SLOTS] = Default::default();
    lines[1].hold(true);
    lines[3].hold(true);

    let release = lines[1].clone();
    let hook: Hook = Box::new(move |renders: u32, _: &Rc<RefCell<Session>>| {
        // Render 1 is the grid before polling; let four more go by held.
        if renders == 5 {
            release.hold(false);
        }
    });
    let mut rig = rig_with_lines(config(60, 10), hook, lines);
    let mut mole = rig.game.start(&mut rig.session, 99).unwrap();
    let before = mole.current();
    let reads_of_three = rig.lines[3].reads.get();

    rig.game.step(&mut rig.session, &mut mole).unwrap();

    assert_eq!(rig.game.surface().renders, 5);
    assert_eq!(rig.hits(), u32::from(before == 1));
    assert_ne!(mole.current(), before);
    assert_eq!(rig.lines[3].reads.get(), reads_of_three, "slot 3 was sampled");
    assert!(rig.lines[3].is_low().unwrap());
}

#[test]
fn held_press_counts_once() {
    let mut rig = rig(config(60, 10), quiet());
    let mut mole = rig.game.start(&mut rig.session, 5).unwrap();
    let target = mole.current();

    // Down for several polls' worth of reads, then up for good.
    rig.lines[target]
        .script
        .borrow_mut()
        .extend([true; 20]);
    for _ in 0..3 {
        rig.game.step(&mut rig.session, &mut mole).unwrap();
    }
    assert_eq!(rig.hits(), 1);
}

#[test]
fn screen_keeps_counting_down_while_a_button_is_held() {
    let lines: [Line; SLOTS] = Default::default();
    lines[4].hold(true);
    let release = lines[4].clone();
    let hook: Hook = Box::new(move |renders: u32, session: &Rc<RefCell<Session>>| {
        if renders > 1 {
            session.borrow_mut().tick();
        }
        if renders == 4 {
            release.hold(false);
        }
    });
    let mut rig = rig_with_lines(config(60, 100), hook, lines);
    let mut mole = rig.game.start(&mut rig.session, 3).unwrap();

    rig.game.step(&mut rig.session, &mut mole).unwrap();

    assert_eq!(
        rig.game.surface().hud_lines(),
        ["T/Pts: 61/0", "T/Pts: 61/0", "T/Pts: 60/0", "T/Pts: 59/0"]
    );
}

#[test]
fn expiry_while_held_aborts_the_press() {
    let lines: [Line; SLOTS] = Default::default();
    for line in &lines {
        line.hold(true);
    }
    let mut rig = rig_with_lines(config(2, 10), tick_every_render(), lines);
    let mut mole = rig.game.start(&mut rig.session, 11).unwrap();

    let step = rig.game.step(&mut rig.session, &mut mole).unwrap();

    assert_eq!(step, Step::GameOver);
    assert_eq!(rig.state(), GameState::GameOver);
    assert_eq!(rig.hits(), 0);
    assert_eq!(rig.game.surface().renders, 3);

    let renders = rig.game.surface().renders;
    assert_eq!(rig.game.step(&mut rig.session, &mut mole).unwrap(), Step::GameOver);
    assert_eq!(rig.game.surface().renders, renders, "drew after game over");
}

#[test]
fn game_over_frame_shows_final_points() {
    let mut rig = rig(config(60, 10), quiet());
    let mut mole = rig.game.start(&mut rig.session, 1234).unwrap();
    for _ in 0..3 {
        let target = mole.current();
        rig.lines[target].script.borrow_mut().extend([true, false]);
        rig.game.step(&mut rig.session, &mut mole).unwrap();
    }
    assert_eq!(rig.hits(), 3);

    let hits = rig.game.game_over(&mut rig.session).unwrap();
    assert_eq!(hits, 3);
    assert_eq!(rig.game.surface().texts.last().unwrap(), "Points: 3");
}
