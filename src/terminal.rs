/// A crossterm-backed [`Surface`].
///
/// The logical field is scaled onto a grid of terminal cells. Each cell holds
/// a background colour and an optional glyph; `present` writes the grid out
/// with true-colour escape codes. Row 0 carries the score readout and the
/// last row the controls hint, so the canvas sits between them.

use std::io::Write;

use crossterm::{
    cursor,
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::assets::Sprite;
use crate::entities::{Rect, FIELD_HEIGHT, FIELD_WIDTH};
use crate::error::{GameError, Result};
use crate::surface::{DrawError, Rgba, ScoreSink, Shadow, Surface, TextAlign};

pub const MIN_COLS: u16 = 40;
pub const MIN_ROWS: u16 = 14;

/// Opacity of the glow laid under shadowed fills.
const SHADOW_ALPHA: f32 = 0.4;

const C_HUD: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;
const CONTROLS_HINT: &str = "← → / A D : Move   S / SPACE : Shoot   ENTER / Click : Button   Q : Quit";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub bg: Rgba,
    pub glyph: Option<(char, Rgba)>,
}

impl Cell {
    const BLANK: Cell = Cell { bg: Rgba::rgb(0, 0, 0), glyph: None };
}

pub struct TerminalSurface<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
    shadow: Option<Shadow>,
    score: u32,
}

/// Half-open cell span `[start, end)` covering `[from, from + len)` at
/// `scale` logical pixels per cell. Empty when the range misses the canvas,
/// otherwise at least one cell wide.
fn span(from: f32, len: f32, scale: f32, limit: usize) -> (usize, usize) {
    let extent = limit as f32 * scale;
    if limit == 0 || len <= 0.0 || from + len <= 0.0 || from >= extent {
        return (0, 0);
    }
    let start = ((from.max(0.0) / scale).round() as usize).min(limit - 1);
    let end = ((from + len).min(extent) / scale).round() as usize;
    (start, end.max(start + 1).min(limit))
}

fn to_color(c: Rgba) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

impl<W: Write> TerminalSurface<W> {
    /// Fails fast when the terminal is too small to show the field.
    pub fn new(out: W, cols: u16, rows: u16) -> Result<Self> {
        check_size(cols, rows)?;
        let canvas_rows = (rows - 2) as usize;
        Ok(Self {
            out,
            cols,
            rows,
            cells: vec![Cell::BLANK; cols as usize * canvas_rows],
            shadow: None,
            score: 0,
        })
    }

    pub fn resize(&mut self, cols: u16, rows: u16) -> Result<()> {
        check_size(cols, rows)?;
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![Cell::BLANK; cols as usize * self.canvas_rows()];
        Ok(())
    }

    fn canvas_cols(&self) -> usize {
        self.cols as usize
    }

    fn canvas_rows(&self) -> usize {
        (self.rows - 2) as usize
    }

    fn scale_x(&self) -> f32 {
        FIELD_WIDTH / self.canvas_cols() as f32
    }

    fn scale_y(&self) -> f32 {
        FIELD_HEIGHT / self.canvas_rows() as f32
    }

    /// Cell spans `(cols, rows)` covered by `rect`.
    fn cell_spans(&self, rect: Rect) -> ((usize, usize), (usize, usize)) {
        (
            span(rect.x, rect.width, self.scale_x(), self.canvas_cols()),
            span(rect.y, rect.height, self.scale_y(), self.canvas_rows()),
        )
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col >= self.canvas_cols() {
            return None;
        }
        self.cells.get(row * self.canvas_cols() + col)
    }

    fn blend(&mut self, col: usize, row: usize, color: Rgba) {
        let width = self.canvas_cols();
        if let Some(cell) = self.cells.get_mut(row * width + col) {
            cell.bg = color.over(cell.bg);
            if color.a >= 1.0 {
                cell.glyph = None;
            }
        }
    }

    fn paint(&mut self, rect: Rect, color: Rgba) {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let ((c0, c1), (r0, r1)) = self.cell_spans(rect);
        for row in r0..r1 {
            for col in c0..c1 {
                self.blend(col, row, color);
            }
        }
    }

    /// Map a terminal cell (as reported by a mouse event) to the logical
    /// field point at the cell's centre. `None` outside the canvas.
    pub fn to_logical(&self, column: u16, row: u16) -> Option<(f32, f32)> {
        if row == 0 || row as usize > self.canvas_rows() || column >= self.cols {
            return None;
        }
        let canvas_row = (row - 1) as f32;
        Some((
            (column as f32 + 0.5) * self.scale_x(),
            (canvas_row + 0.5) * self.scale_y(),
        ))
    }

    /// Consume the surface and hand back its writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

fn check_size(cols: u16, rows: u16) -> Result<()> {
    if cols < MIN_COLS || rows < MIN_ROWS {
        return Err(GameError::SurfaceUnavailable(format!(
            "terminal is {cols}x{rows}, need at least {MIN_COLS}x{MIN_ROWS}"
        )));
    }
    Ok(())
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn size(&self) -> (f32, f32) {
        (FIELD_WIDTH, FIELD_HEIGHT)
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        if let Some(shadow) = self.shadow {
            let glow = Rect::new(
                rect.x - shadow.blur,
                rect.y - shadow.blur,
                rect.width + 2.0 * shadow.blur,
                rect.height + 2.0 * shadow.blur,
            );
            self.paint(glow, Rgba { a: SHADOW_ALPHA, ..shadow.color });
        }
        self.paint(rect, color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, _line_width: f32) {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        // A cell is the thinnest line a terminal can show.
        let ((c0, c1), (r0, r1)) = self.cell_spans(rect);
        for row in r0..r1 {
            for col in c0..c1 {
                if row == r0 || row + 1 == r1 || col == c0 || col + 1 == c1 {
                    self.blend(col, row, color);
                }
            }
        }
    }

    fn draw_image(&mut self, sprite: &Sprite, dest: Rect) -> std::result::Result<(), DrawError> {
        if sprite.width == 0 || sprite.height == 0 || sprite.pixels.is_empty() {
            return Err(DrawError::EmptyImage);
        }
        if dest.width <= 0.0 || dest.height <= 0.0 {
            return Err(DrawError::EmptyDestination(dest));
        }

        // Nearest-neighbour sample at each cell centre.
        let ((c0, c1), (r0, r1)) = self.cell_spans(dest);
        let (cols, rows) = ((c1 - c0).max(1) as f32, (r1 - r0).max(1) as f32);
        for row in r0..r1 {
            let sy = (((row - r0) as f32 + 0.5) / rows * sprite.height as f32) as usize;
            for col in c0..c1 {
                let sx = (((col - c0) as f32 + 0.5) / cols * sprite.width as f32) as usize;
                if let Some(color) = sprite.pixel(sx.min(sprite.width - 1), sy.min(sprite.height - 1)) {
                    self.blend(col, row, color);
                }
            }
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Rgba, align: TextAlign) {
        // Glyphs sit on the row through the middle of the text's height.
        let row = ((y - size / 2.0) / self.scale_y()).floor();
        if row < 0.0 || row as usize >= self.canvas_rows() {
            return;
        }
        let row = row as usize;
        let len = text.chars().count() as isize;
        let anchor = (x / self.scale_x()).round() as isize;
        let start = match align {
            TextAlign::Left => anchor,
            TextAlign::Center => anchor - len / 2,
        };

        let width = self.canvas_cols();
        for (i, ch) in text.chars().enumerate() {
            let col = start + i as isize;
            if col < 0 || col as usize >= width {
                continue;
            }
            self.cells[row * width + col as usize].glyph = Some((ch, color));
        }
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.shadow = shadow;
    }

    fn present(&mut self) -> std::io::Result<()> {
        let width = self.canvas_cols();

        // HUD row
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD))?;
        self.out.queue(Print(format!("{:<w$}", format!(" Score: {}", self.score), w = width)))?;

        for (row, line) in self.cells.chunks(width).enumerate() {
            self.out.queue(cursor::MoveTo(0, row as u16 + 1))?;
            let mut last: Option<(Rgba, Rgba)> = None;
            for cell in line {
                let (ch, fg) = cell.glyph.unwrap_or((' ', cell.bg));
                if last != Some((cell.bg, fg)) {
                    self.out.queue(style::SetBackgroundColor(to_color(cell.bg)))?;
                    self.out.queue(style::SetForegroundColor(to_color(fg)))?;
                    last = Some((cell.bg, fg));
                }
                self.out.queue(Print(ch))?;
            }
        }

        // Controls hint row
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows - 1))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        let hint: String = CONTROLS_HINT.chars().take(width).collect();
        self.out.queue(Print(format!("{hint:<width$}")))?;

        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}

impl<W: Write> ScoreSink for TerminalSurface<W> {
    fn show_score(&mut self, score: u32) {
        self.score = score;
    }
}

// ── Terminal mode ─────────────────────────────────────────────────────────────

/// Holds the terminal in game mode (raw input, alternate screen, hidden
/// cursor, mouse capture) and puts it back when dropped.
pub struct TerminalGuard<W: Write> {
    out: W,
    keyboard_enhanced: bool,
}

impl<W: Write> TerminalGuard<W> {
    /// A guard for a terminal that is already in game mode.
    pub fn new(out: W) -> Self {
        Self { out, keyboard_enhanced: false }
    }

    /// Switch the terminal into game mode. A step that fails drops the guard,
    /// which undoes the steps before it.
    pub fn enter(out: W) -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut guard = Self::new(out);
        guard.out.execute(terminal::EnterAlternateScreen)?;
        guard.out.execute(cursor::Hide)?;
        guard.out.execute(EnableMouseCapture)?;

        // Request key-release events; terminals without the protocol fall
        // back to the hold window.
        guard.keyboard_enhanced = guard
            .out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = self.out.queue(PopKeyboardEnhancementFlags);
        }
        let _ = self.out.queue(DisableMouseCapture);
        let _ = self.out.queue(cursor::Show);
        let _ = self.out.queue(terminal::LeaveAlternateScreen);
        let _ = self.out.flush();
        let _ = terminal::disable_raw_mode();
    }
}
