use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction::{self, *};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Start,
    Pause,
    TogglePause,
    Restart,
    Quit,
}

impl Command {
    /// Keys without a binding map to `None` and are dropped by the caller.
    pub fn from_key_event(ev: &KeyEvent) -> Option<Command> {
        if is_ctrl_c(ev) {
            return Some(Command::Quit);
        }

        match ev.code {
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Command::Turn(Up)),
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Command::Turn(Left)),
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Command::Turn(Down)),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Command::Turn(Right)),
            KeyCode::Char(' ') | KeyCode::Enter => Some(Command::Start),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::Pause),
            KeyCode::Esc => Some(Command::TogglePause),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
            _ => None,
        }
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
