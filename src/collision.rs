use crate::grid::{Cell, Grid};
use crate::snake::Snake;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionKind {
    Wall,
    SelfCollision,
}

/// Checks a proposed head against the board and the body as it is before
/// the move. The current tail counts: it has not vacated its cell yet.
pub fn check_collision(grid: &Grid, head: Cell, snake: &Snake) -> Option<CollisionKind> {
    if !grid.in_bounds(head) {
        return Some(CollisionKind::Wall);
    }

    if snake.occupies(head) {
        return Some(CollisionKind::SelfCollision);
    }

    None
}
