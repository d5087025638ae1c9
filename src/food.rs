use std::collections::HashSet;

use crate::grid::{Cell, Grid};
use crate::rng::GameRng;

/// Random probes per free cell before giving up on sampling and picking
/// from the enumerated free cells instead.
const SAMPLES_PER_CELL: usize = 4;

/// Picks a uniformly random cell that is not in `occupied`.
/// Returns `None` when the snake covers the whole grid.
pub fn place_food(grid: &Grid, occupied: &HashSet<Cell>, rng: &mut GameRng) -> Option<Cell> {
    let in_grid = occupied.iter().filter(|c| grid.in_bounds(**c)).count();
    if in_grid >= grid.cell_count() {
        return None;
    }

    for _ in 0..grid.cell_count() * SAMPLES_PER_CELL {
        let cell = Cell::new(rng.gen_range(0..grid.size()), rng.gen_range(0..grid.size()));
        if !occupied.contains(&cell) {
            return Some(cell);
        }
    }

    // Nearly full board, sampling keeps hitting the snake
    let free: Vec<Cell> = grid.cells().filter(|c| !occupied.contains(c)).collect();
    rng.choose(&free).copied()
}
