use std::collections::{HashSet, VecDeque};

use crate::grid::Cell;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit step on the board, y grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }

    pub fn head_char(&self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

/// Occupied cells, head first. `cell_set` mirrors `body` for membership
/// checks and relies on the cells being distinct.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
    cell_set: HashSet<Cell>,
}

impl Snake {
    pub fn new(start: Cell) -> Self {
        Snake::from_cells(&[start])
    }

    /// Builds a snake from explicit segments, head first.
    pub fn from_cells(cells: &[Cell]) -> Self {
        assert!(!cells.is_empty(), "a snake needs at least one segment");

        let body: VecDeque<Cell> = cells.iter().copied().collect();
        let cell_set = body.iter().copied().collect();
        Snake { body, cell_set }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    pub fn cell_set(&self) -> &HashSet<Cell> {
        &self.cell_set
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.cell_set.contains(&cell)
    }

    /// Moves the head onto `new_head`, keeping the tail when the snake grew.
    /// The caller checks for collisions first.
    pub fn advance(&mut self, new_head: Cell, grew: bool) {
        if !grew {
            if let Some(old_tail) = self.body.pop_back() {
                self.cell_set.remove(&old_tail);
            }
        }

        self.body.push_front(new_head);
        self.cell_set.insert(new_head);
    }
}
