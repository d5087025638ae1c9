use std::fmt;

use crate::snake::Direction;

pub const GRID_SIZE: i32 = 20;

/// A position on the board. Coordinates may fall outside the grid, which is
/// how a proposed head that left the board is represented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(&self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Square playing field, `size` cells per side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    size: i32,
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new(GRID_SIZE)
    }
}

impl Grid {
    pub fn new(size: i32) -> Self {
        Grid { size }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.size && cell.y >= 0 && cell.y < self.size
    }

    /// Where a fresh snake starts.
    pub fn origin(&self) -> Cell {
        Cell::new(self.size / 2, self.size / 2)
    }

    pub fn cell_count(&self) -> usize {
        (self.size * self.size) as usize
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| Cell::new(x, y)))
    }
}
