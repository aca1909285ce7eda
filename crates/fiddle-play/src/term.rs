//! Terminal output and input through crossterm.

use std::{
    collections::HashMap,
    io::{self, Stdout, Write},
    mem,
    time::{Duration, Instant},
};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        MouseEventKind,
    },
    style::{self, Color, Colors},
    terminal,
};
use geom::{Point, Rect};
use unicode_width::UnicodeWidthChar;

use crate::{
    game::{Game, Input},
    hud::Hud,
};

/// World units per cell horizontally at zoom 1.
pub const CELL_WIDTH: f32 = 10.0;
/// World units per cell vertically at zoom 1. Cells are about twice as tall
/// as they are wide.
pub const CELL_HEIGHT: f32 = 20.0;
/// Background outside the map.
const SKY: Color = Color::Rgb {
    r: 102,
    g: 191,
    b: 255,
};
/// Outer player marker radius in world units.
const PLAYER_OUTER: f32 = 10.0;
/// Inner player marker radius in world units.
const PLAYER_INNER: f32 = 8.0;
/// How long a key counts as held after its last press or repeat, when the
/// terminal can't report releases.
const HOLD: Duration = Duration::from_millis(250);

/// Enter raw mode and the alternate screen.
fn enter(fp: &mut Stdout) -> io::Result<bool> {
    terminal::enable_raw_mode()?;
    fp.execute(terminal::EnterAlternateScreen)?;
    fp.execute(event::EnableMouseCapture)?;
    fp.execute(cursor::Hide)?;
    let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        fp.execute(event::PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }
    Ok(enhanced)
}

/// Leave the alternate screen and restore the terminal. Safe to call when the
/// terminal was never set up.
pub fn restore(fp: &mut impl Write, enhanced: bool) -> io::Result<()> {
    if enhanced {
        fp.execute(event::PopKeyboardEnhancementFlags)?;
    }
    fp.execute(terminal::LeaveAlternateScreen)?;
    fp.execute(event::DisableMouseCapture)?;
    fp.execute(cursor::Show)?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// Guard that pairs terminal setup with teardown.
pub struct Session {
    /// Output handle.
    fp: Stdout,
    /// Whether the terminal is currently set up.
    active: bool,
    /// Whether key release events are reported.
    enhanced: bool,
}

impl Session {
    /// Set up the terminal.
    pub fn start() -> io::Result<Self> {
        let mut fp = io::stdout();
        let enhanced = enter(&mut fp)?;
        Ok(Self {
            fp,
            active: true,
            enhanced,
        })
    }

    /// Whether the terminal reports key releases.
    pub fn enhanced(&self) -> bool {
        self.enhanced
    }

    /// Restore the terminal if it is still set up.
    pub fn stop(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            restore(&mut self.fp, self.enhanced)?;
        }
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        drop(self.stop());
    }
}

/// Tracks which keys are down between frames.
#[derive(Debug, Default)]
pub struct Keys {
    /// Last press or repeat per key.
    held: HashMap<char, Instant>,
    /// Releases are reported, so keys stay held until released.
    enhanced: bool,
    /// One-shot actions and wheel notches since the last sample.
    pending: Input,
}

impl Keys {
    /// Construct key state. `enhanced` says whether releases are reported.
    pub fn new(enhanced: bool) -> Self {
        Self {
            enhanced,
            ..Self::default()
        }
    }

    /// Feed one event. Returns false when the user asked to quit.
    pub fn apply(&mut self, event: &Event, now: Instant) -> bool {
        match event {
            Event::Key(key) => return self.apply_key(key, now),
            Event::Mouse(m) => match m.kind {
                MouseEventKind::ScrollUp => self.pending.wheel += 1.0,
                MouseEventKind::ScrollDown => self.pending.wheel -= 1.0,
                _ => {}
            },
            _ => {}
        }
        true
    }

    /// Feed a key event.
    fn apply_key(&mut self, key: &KeyEvent, now: Instant) -> bool {
        if key.kind == KeyEventKind::Release {
            if let KeyCode::Char(c) = key.code {
                self.held.remove(&c.to_ascii_lowercase());
            }
            return true;
        }
        match key.code {
            KeyCode::Esc => return false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return false,
            KeyCode::Tab if key.kind == KeyEventKind::Press => self.pending.toggle_split = true,
            KeyCode::Char(c) => {
                let c = c.to_ascii_lowercase();
                if key.kind == KeyEventKind::Press {
                    match c {
                        'r' => self.pending.reset = true,
                        'c' => self.pending.toggle_check = true,
                        _ => {}
                    }
                }
                self.held.insert(c, now);
            }
            _ => {}
        }
        true
    }

    /// Whether a key counts as down at `now`.
    fn down(&self, c: char, now: Instant) -> bool {
        self.held
            .get(&c)
            .is_some_and(|t| self.enhanced || now.duration_since(*t) < HOLD)
    }

    /// Produce this frame's input and clear one-shot actions.
    pub fn sample(&mut self, now: Instant) -> Input {
        let pending = mem::take(&mut self.pending);
        Input {
            left: self.down('a', now),
            right: self.down('d', now),
            up: self.down('w', now),
            down: self.down('s', now),
            rotate_cw: self.down('e', now),
            rotate_ccw: self.down('q', now),
            ..pending
        }
    }

    /// Read events until `deadline`. Returns false when the user asked to
    /// quit.
    pub fn poll_until(&mut self, deadline: Instant) -> io::Result<bool> {
        loop {
            let now = Instant::now();
            let Some(timeout) = deadline.checked_duration_since(now) else {
                return Ok(true);
            };
            if !event::poll(timeout)? {
                return Ok(true);
            }
            if !self.apply(&event::read()?, Instant::now()) {
                return Ok(false);
            }
        }
    }
}

/// Screen point, in world units at zoom 1, at the center of a cell.
pub fn cell_center(x: u16, y: u16) -> Point {
    Point::new(
        (f32::from(x) + 0.5) * CELL_WIDTH,
        (f32::from(y) + 0.5) * CELL_HEIGHT,
    )
}

/// Screen point, in world units at zoom 1, at the center of a rect of cells.
pub fn view_center(view: Rect) -> Point {
    Point::new(
        (view.tl.x + view.w / 2.0) * CELL_WIDTH,
        (view.tl.y + view.h / 2.0) * CELL_HEIGHT,
    )
}

/// Color of the world at a point.
pub fn world_color(game: &Game, world: Point) -> Color {
    let d = world - game.player.pos;
    let dist = (d.x * d.x + d.y * d.y).sqrt();
    if dist < PLAYER_INNER {
        Color::Magenta
    } else if dist < PLAYER_OUTER {
        Color::DarkYellow
    } else {
        game.map.tile_at(world).map_or(SKY, |t| t.color())
    }
}

/// The part of `text` that falls in columns `skip..skip + width`. Wide
/// characters that straddle either edge are dropped.
fn clip(text: &str, skip: usize, width: usize) -> String {
    let mut col = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if col >= skip && col + w <= skip + width {
            out.push(c);
        }
        col += w;
        if col >= skip + width {
            break;
        }
    }
    out
}

/// Cell coordinates of a rect's top-left corner.
fn origin(r: Rect) -> (u16, u16) {
    (r.tl.x as u16, r.tl.y as u16)
}

/// Draws frames to a writer.
pub struct Screen<W: Write> {
    /// Output handle.
    out: W,
}

impl<W: Write> Screen<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Draw one frame. Everything is clipped to the screen.
    pub fn draw(&mut self, game: &Game, hud: &Hud) -> io::Result<()> {
        if let Some(view) = hud.view.intersect(&hud.screen) {
            self.world(game, view)?;
        }
        if let Some(panel) = hud.panel {
            self.panel(panel, hud.screen)?;
        }
        self.out
            .queue(style::SetColors(Colors::new(Color::DarkGrey, Color::White)))?;
        for label in &hud.labels {
            let Some(visible) = label.rect.intersect(&hud.screen) else {
                continue;
            };
            let skip = (visible.tl.x - label.rect.tl.x) as usize;
            let (x, y) = origin(visible);
            self.out.queue(cursor::MoveTo(x, y))?;
            self.out
                .queue(style::Print(clip(&label.text, skip, visible.w as usize)))?;
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }

    /// Paint the overhead view into `view`, one run of spaces per color.
    fn world(&mut self, game: &Game, view: Rect) -> io::Result<()> {
        let (x0, y0) = (view.tl.x as u16, view.tl.y as u16);
        let (w, h) = (view.w as u16, view.h as u16);
        for y in y0..y0.saturating_add(h) {
            self.out.queue(cursor::MoveTo(x0, y))?;
            let mut run: Option<(Color, usize)> = None;
            for x in x0..x0.saturating_add(w) {
                let color = world_color(game, game.camera.to_world(cell_center(x, y)));
                run = match run {
                    Some((c, n)) if c == color => Some((c, n + 1)),
                    Some((c, n)) => {
                        self.fill(c, n)?;
                        Some((color, 1))
                    }
                    None => Some((color, 1)),
                };
            }
            if let Some((c, n)) = run {
                self.fill(c, n)?;
            }
        }
        Ok(())
    }

    /// Print `n` spaces on a background color.
    fn fill(&mut self, color: Color, n: usize) -> io::Result<()> {
        self.out.queue(style::SetBackgroundColor(color))?;
        self.out.queue(style::Print(" ".repeat(n)))?;
        Ok(())
    }

    /// Draw the side panel's background and border, clipped to `screen`.
    fn panel(&mut self, panel: Rect, screen: Rect) -> io::Result<()> {
        let (w, h) = (panel.w as usize, panel.h as u16);
        if w < 2 || h < 2 {
            return Ok(());
        }
        let Some(visible) = panel.intersect(&screen) else {
            return Ok(());
        };
        let skip = (visible.tl.x - panel.tl.x) as usize;
        let first = (visible.tl.y - panel.tl.y) as u16;
        let (x, y0) = origin(visible);
        self.out
            .queue(style::SetColors(Colors::new(Color::Grey, Color::Black)))?;
        for dy in first..first.saturating_add(visible.h as u16).min(h) {
            let line = if dy == 0 {
                format!("┌{}┐", "─".repeat(w - 2))
            } else if dy == h - 1 {
                format!("└{}┘", "─".repeat(w - 2))
            } else {
                format!("│{}│", " ".repeat(w - 2))
            };
            self.out.queue(cursor::MoveTo(x, y0 + (dy - first)))?;
            self.out
                .queue(style::Print(clip(&line, skip, visible.w as usize)))?;
        }
        Ok(())
    }
}
