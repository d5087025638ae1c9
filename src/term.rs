use crate::{TermInt, Coords};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

/// Thin wrapper over crossterm: everything is queued and only hits the
/// terminal on `flush`.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    active: bool,
}

impl TermManager {
    pub fn new() -> crossterm::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager { width, height, stdout: stdout(), active: false })
    }

    pub fn setup(&mut self) -> crossterm::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        self.active = true;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        self.clear()
    }

    pub fn restore(&mut self) -> crossterm::Result<()> {
        if !self.active {
            return Ok(());
        }

        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking)?;
        execute!(self.stdout, LeaveAlternateScreen)
    }

    pub fn read_key_events_queue(&self) -> crossterm::Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(0))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    /// Re-reads the terminal size, returns true if it changed.
    pub fn refresh_size(&mut self) -> crossterm::Result<bool> {
        let size = terminal::size()?;
        if size == (self.width, self.height) {
            return Ok(false);
        }

        self.width = size.0;
        self.height = size.1;
        self.clear()?;
        Ok(true)
    }

    pub fn draw_box(&mut self, top_left: Coords, size: Coords) -> crossterm::Result<()> {
        let (width, height) = size;
        let end_x = top_left.0 + width - 1;
        let end_y = top_left.1 + height - 1;

        for x in top_left.0..=end_x {
            let ch = if x == top_left.0 || x == end_x {'+'} else {'-'};
            self.print_at((x, top_left.1), ch, Color::DarkGreen)?;
            self.print_at((x, end_y), ch, Color::DarkGreen)?;
        }

        for y in top_left.1 + 1..end_y {
            self.print_at((top_left.0, y), '|', Color::DarkGreen)?;
            self.print_at((end_x, y), '|', Color::DarkGreen)?;
        }

        Ok(())
    }

    /// Draws `lines` centered on `center` inside a blank frame.
    pub fn show_message(&mut self, center: Coords, lines: &[&str]) -> crossterm::Result<()> {
        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        // Print the top and bottom empty lines
        let blank = " ".repeat(msg_width as usize);
        self.print_str_at(top_left, &blank, Color::White)?;
        self.print_str_at((top_left.0, top_left.1 + msg_height - 1), &blank, Color::White)?;

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            self.print_str_at((top_left.0, y), &padded_line, Color::White)?;
        }

        Ok(())
    }

    pub fn print_at(&mut self, pos: Coords, ch: char, color: Color) -> crossterm::Result<()> {
        if !self.fits(pos, 1) {
            return Ok(());
        }

        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::SetForegroundColor(color),
            style::Print(ch)
        )
    }

    pub fn print_str_at(&mut self, pos: Coords, text: &str, color: Color) -> crossterm::Result<()> {
        if !self.fits(pos, text.chars().count()) {
            return Ok(());
        }

        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::SetForegroundColor(color),
            style::Print(text)
        )
    }

    pub fn clear(&mut self) -> crossterm::Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))
    }

    pub fn flush(&mut self) -> crossterm::Result<()> {
        queue!(self.stdout, style::ResetColor)?;
        self.stdout.flush()?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    // Writing past the last column wraps and scrolls the alternate screen
    fn fits(&self, pos: Coords, len: usize) -> bool {
        pos.1 < self.height && pos.0 as usize + len <= self.width as usize
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
