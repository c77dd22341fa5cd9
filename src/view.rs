//! Minimal terminal presenter: draws a [`GameSnapshot`] with crossterm commands.
//!
//! Each board cell is two columns wide. Frames are queued into a byte buffer and
//! written in one go; identical frames are skipped.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};

use blockfall::core::{GameSnapshot, Piece};
use blockfall::types::{Cell, GameEvent, PieceKind, Rgb, BOARD_HEIGHT, BOARD_WIDTH, EMPTY};

const PANEL_X: u16 = (BOARD_WIDTH as u16) * 2 + 4;

pub struct TerminalView {
    stdout: io::Stdout,
    buf: Vec<u8>,
    last: Option<GameSnapshot>,
    message: Option<String>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(16 * 1024),
            last: None,
            message: None,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to repaint, e.g. after a resize.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Update the status line from a game event.
    ///
    /// A game over shows its final score until the first piece of the new game locks.
    pub fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::GameOver { final_score } => {
                self.message = Some(format!("GAME OVER  {final_score}"));
                self.invalidate();
            }
            GameEvent::Locked { .. } if self.message.is_some() => {
                self.message = None;
                self.invalidate();
            }
            _ => {}
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn draw(&mut self, snap: &GameSnapshot) -> Result<()> {
        if self.last.as_ref() == Some(snap) {
            return Ok(());
        }

        self.buf.clear();
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        self.queue_board(snap)?;
        self.queue_panel(snap)?;
        self.buf.queue(ResetColor)?;
        self.flush_buf()?;

        self.last = Some(*snap);
        Ok(())
    }

    fn queue_board(&mut self, snap: &GameSnapshot) -> Result<()> {
        let width = BOARD_WIDTH as usize;
        for y in 0..BOARD_HEIGHT as usize {
            self.buf.queue(cursor::MoveTo(0, y as u16))?;
            self.buf.queue(ResetColor)?;
            self.buf.queue(Print("<!"))?;
            for x in 0..width {
                let (tag, ghost) = snap.cell_at(x, y);
                self.queue_cell(tag, ghost)?;
            }
            self.buf.queue(ResetColor)?;
            self.buf.queue(Print("!>"))?;
        }
        self.buf.queue(cursor::MoveTo(0, BOARD_HEIGHT as u16))?;
        self.buf.queue(Print(format!("<!{}!>", "=".repeat(width * 2))))?;
        Ok(())
    }

    fn queue_cell(&mut self, tag: Cell, ghost: bool) -> Result<()> {
        match PieceKind::from_tag(tag) {
            None => {
                self.buf.queue(ResetColor)?;
                self.buf.queue(Print(" ."))?;
            }
            Some(kind) => {
                self.buf.queue(SetForegroundColor(color(kind.color())))?;
                self.buf.queue(Print(if ghost { "[]" } else { "██" }))?;
            }
        }
        Ok(())
    }

    fn queue_panel(&mut self, snap: &GameSnapshot) -> Result<()> {
        let status = snap.status;
        let lines = [
            format!("SCORE  {}", status.score),
            format!("HIGH   {}", status.high_score),
            format!("LEVEL  {}", status.level),
            format!("LINES  {}", status.lines),
        ];
        for (row, line) in lines.iter().enumerate() {
            self.buf.queue(cursor::MoveTo(PANEL_X, row as u16))?;
            self.buf.queue(ResetColor)?;
            self.buf.queue(Print(line))?;
        }

        self.queue_preview("NEXT", snap.next.as_ref(), 5)?;
        let hold_label = if snap.hold_used { "HOLD (used)" } else { "HOLD" };
        self.queue_preview(hold_label, snap.held.as_ref(), 11)?;

        let mut row = 17;
        if snap.paused {
            self.buf.queue(cursor::MoveTo(PANEL_X, row))?;
            self.buf.queue(ResetColor)?;
            self.buf.queue(Print("PAUSED"))?;
            row += 1;
        }
        if let Some(message) = self.message().map(str::to_owned) {
            self.buf.queue(cursor::MoveTo(PANEL_X, row))?;
            self.buf.queue(ResetColor)?;
            self.buf.queue(Print(message))?;
        }
        Ok(())
    }

    fn queue_preview(&mut self, label: &str, piece: Option<&Piece>, top: u16) -> Result<()> {
        self.buf.queue(cursor::MoveTo(PANEL_X, top))?;
        self.buf.queue(ResetColor)?;
        self.buf.queue(Print(label))?;

        let Some(piece) = piece else {
            return Ok(());
        };
        for (y, row) in piece.matrix.rows().enumerate() {
            self.buf.queue(cursor::MoveTo(PANEL_X, top + 1 + y as u16))?;
            for &tag in row {
                if tag == EMPTY {
                    self.buf.queue(ResetColor)?;
                    self.buf.queue(Print("  "))?;
                } else {
                    self.queue_cell(tag, false)?;
                }
            }
        }
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    let Rgb(r, g, b) = rgb;
    Color::Rgb { r, g, b }
}
