use crossterm::style::Color;

use crate::game::{GamePhase, GameView};
use crate::grid::Cell;
use crate::rain::{MatrixRain, Region, Shade};
use crate::term::TermManager;
use crate::{Coords, TermInt};

const SNAKE_BODY: &str = "██";
const FOOD: &str = "<>";
const DEAD_SNAKE: &str = "XX";
const EMPTY_CELL: &str = "  ";

const PANEL_WIDTH: TermInt = 24;
const PANEL_GAP: TermInt = 2;

/// Draws a full frame from a snapshot. Implementations keep no memory of
/// previous frames.
pub trait Renderer {
    fn render(&mut self, view: &GameView) -> Result<(), String>;
}

/// Screen positions derived from the grid size. Each cell is two columns
/// wide so the board looks square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    grid_size: TermInt,
}

impl Layout {
    pub fn new(grid_size: i32) -> Self {
        Layout { grid_size: grid_size.max(0) as TermInt }
    }

    /// Size of the board including its border.
    pub fn board_size(&self) -> Coords {
        (self.grid_size * 2 + 2, self.grid_size + 2)
    }

    pub fn cell_to_screen(&self, cell: Cell) -> Coords {
        (1 + cell.x as TermInt * 2, 1 + cell.y as TermInt)
    }

    pub fn board_center(&self) -> Coords {
        let (w, h) = self.board_size();
        (w / 2, h / 2)
    }

    pub fn panel_left(&self) -> TermInt {
        self.board_size().0 + PANEL_GAP
    }

    /// Whatever is left right of the side panel, if anything.
    pub fn rain_region(&self, term_size: Coords) -> Region {
        let left = self.panel_left() + PANEL_WIDTH;
        Region {
            left,
            top: 0,
            width: term_size.0.saturating_sub(left),
            height: term_size.1,
        }
    }

    pub fn fits(&self, term_size: Coords) -> bool {
        let (w, h) = self.board_size();
        term_size.0 >= self.panel_left() + PANEL_WIDTH && term_size.1 >= h.max(12) && w > 2
    }
}

pub struct TermRenderer {
    term: TermManager,
    layout: Layout,
}

impl TermRenderer {
    pub fn new(term: TermManager, grid_size: i32) -> Self {
        TermRenderer { term, layout: Layout::new(grid_size) }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn terminal_size(&self) -> Coords {
        self.term.get_terminal_size()
    }

    pub fn term_mut(&mut self) -> &mut TermManager {
        &mut self.term
    }

    pub fn render_rain(&mut self, rain: &MatrixRain) -> Result<(), String> {
        self.draw_rain(rain).map_err(|e| format!("Failed to draw rain: {}", e))
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw(&mut self, view: &GameView) -> crossterm::Result<()> {
        let term_size = self.term.get_terminal_size();
        if !self.layout.fits(term_size) {
            let (_, h) = self.layout.board_size();
            let needed = format!(
                "Terminal too small, need {}x{}",
                self.layout.panel_left() + PANEL_WIDTH,
                h.max(12)
            );
            self.term.clear()?;
            self.term.print_str_at((0, 0), &needed, Color::Red)?;
            return self.term.flush();
        }

        self.term.draw_box((0, 0), self.layout.board_size())?;
        self.draw_board(view)?;
        self.draw_panel(view)?;
        self.draw_overlay(view)?;
        self.term.flush()
    }

    fn draw_board(&mut self, view: &GameView) -> crossterm::Result<()> {
        let blank_row = EMPTY_CELL.repeat(view.grid_size.max(0) as usize);
        for y in 0..view.grid_size {
            let pos = self.layout.cell_to_screen(Cell::new(0, y));
            self.term.print_str_at(pos, &blank_row, Color::Reset)?;
        }

        if let Some(food) = view.food {
            self.term.print_str_at(self.layout.cell_to_screen(food), FOOD, Color::Red)?;
        }

        let dead = view.phase == GamePhase::GameOver;
        for (i, cell) in view.snake.iter().enumerate() {
            let pos = self.layout.cell_to_screen(*cell);
            if dead {
                self.term.print_str_at(pos, DEAD_SNAKE, Color::DarkRed)?;
            } else if i == 0 {
                let head = view.direction.head_char().to_string().repeat(2);
                self.term.print_str_at(pos, &head, Color::Yellow)?;
            } else {
                self.term.print_str_at(pos, SNAKE_BODY, Color::Green)?;
            }
        }

        Ok(())
    }

    fn draw_panel(&mut self, view: &GameView) -> crossterm::Result<()> {
        let left = self.layout.panel_left();
        let lines = [
            (format!("SCORE      {}", view.score), Color::Green),
            (format!("SPEED LV   {}", view.level), Color::Green),
            (format!("HIGH SCORE {}", view.high_score), Color::Green),
            (String::new(), Color::Reset),
            ("Arrows/WASD  move".to_string(), Color::DarkGreen),
            ("Space        start".to_string(), Color::DarkGreen),
            ("P / Esc      pause".to_string(), Color::DarkGreen),
            ("R            restart".to_string(), Color::DarkGreen),
            ("Q / Ctrl+C   quit".to_string(), Color::DarkGreen),
        ];

        for (i, (text, color)) in lines.iter().enumerate() {
            let padded = format!("{:<width$}", text, width = PANEL_WIDTH as usize);
            self.term.print_str_at((left, 1 + i as TermInt), &padded, *color)?;
        }

        Ok(())
    }

    fn draw_overlay(&mut self, view: &GameView) -> crossterm::Result<()> {
        let score_line = format!("Score: {}", view.score);
        let high_line = format!("High score: {}", view.high_score);

        let lines: Vec<&str> = match view.phase {
            GamePhase::Running => return Ok(()),
            GamePhase::Ready => vec!["MATRIX SNAKE", "", "Press Space to start"],
            GamePhase::Paused => vec!["Paused", "", "Space or Esc to resume"],
            GamePhase::GameOver | GamePhase::Won => {
                let title = if view.phase == GamePhase::Won {"You won!"} else {"Game over!"};
                let mut lines = vec![title, score_line.as_str(), high_line.as_str()];
                if view.new_record {
                    lines.push("New record!");
                }
                lines.extend_from_slice(&["", "R to play again", "Q to quit"]);
                lines
            }
        };

        let center = self.layout.board_center();
        self.term.show_message(center, &lines)
    }

    fn draw_rain(&mut self, rain: &MatrixRain) -> crossterm::Result<()> {
        let region = rain.region();
        if region.width == 0 || !self.layout.fits(self.term.get_terminal_size()) {
            return Ok(());
        }

        let blank = " ".repeat(region.width as usize);
        for y in region.top..region.top + region.height {
            self.term.print_str_at((region.left, y), &blank, Color::Reset)?;
        }

        for (pos, ch, shade) in rain.glyphs() {
            let color = match shade {
                Shade::Head => Color::White,
                Shade::Bright => Color::Green,
                Shade::Dim => Color::DarkGreen,
            };
            self.term.print_at(pos, ch, color)?;
        }

        self.term.flush()
    }
}

impl Renderer for TermRenderer {
    fn render(&mut self, view: &GameView) -> Result<(), String> {
        self.draw(view).map_err(|e| format!("Failed to draw game: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_are_two_columns_inside_border() {
        let layout = Layout::new(20);
        assert_eq!(layout.board_size(), (42, 22));
        assert_eq!(layout.cell_to_screen(Cell::new(0, 0)), (1, 1));
        assert_eq!(layout.cell_to_screen(Cell::new(19, 19)), (39, 20));
    }

    #[test]
    fn test_rain_region_is_right_of_panel() {
        let layout = Layout::new(20);
        let region = layout.rain_region((120, 40));
        assert_eq!(region.left, 42 + PANEL_GAP + PANEL_WIDTH);
        assert_eq!(region.width, 120 - region.left);
        assert_eq!(region.height, 40);
    }

    #[test]
    fn test_narrow_terminal_has_no_rain() {
        let layout = Layout::new(20);
        assert_eq!(layout.rain_region((60, 30)).width, 0);
    }

    #[test]
    fn test_fits() {
        let layout = Layout::new(20);
        assert!(layout.fits((80, 24)));
        assert!(!layout.fits((60, 24)));
        assert!(!layout.fits((80, 20)));
    }
}
