mod direction;
mod frontier;
mod jps;
mod node;
mod scanner;

pub use direction::{octile, Direction, DIAGONAL_COST, STRAIGHT_COST};
pub use jps::JumpPointSearch;

use crate::common::Position;

// Walkability oracle the search runs against. Cells outside the grid count
// as obstacles, so the boundary behaves like a wall.
pub trait Grid {
    fn is_walkable(&self, position: Position) -> bool;

    fn is_obstacle(&self, position: Position) -> bool {
        !self.is_walkable(position)
    }
}
