use serde::{Deserialize, Serialize};

use crate::search::{octile, Direction, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

// Search result: the jump-point waypoints of an optimal route in start to
// goal order, plus its total cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Path {
    pub waypoints: Vec<Position>,
    pub cost: usize,
}

impl Path {
    // Expands the waypoints into the full cell-by-cell route.
    pub fn interpolate(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        let Some(&first) = self.waypoints.first() else {
            return cells;
        };
        cells.push(first);
        for pair in self.waypoints.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let step = Direction::toward(from, to);
            let steps = (to.x - from.x).abs().max((to.y - from.y).abs());
            let mut current = from;
            for _ in 0..steps {
                current = current + step;
                cells.push(current);
            }
            debug_assert_eq!(current, to);
        }
        cells
    }

    // Consecutive waypoints must line up straight or on an exact diagonal,
    // every traversed cell must be walkable and the stored cost must match
    // the segment sum.
    pub fn verify(&self, grid: &impl Grid) -> bool {
        if self.waypoints.is_empty() {
            return false;
        }
        for pair in self.waypoints.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let dx = (to.x - from.x).abs();
            let dy = (to.y - from.y).abs();
            if (dx == 0 && dy == 0) || (dx != 0 && dy != 0 && dx != dy) {
                return false;
            }
        }
        if self.interpolate().iter().any(|cell| !grid.is_walkable(*cell)) {
            return false;
        }
        let segment_sum: usize = self
            .waypoints
            .windows(2)
            .map(|pair| octile(pair[0], pair[1]))
            .sum();
        segment_sum == self.cost
    }
}
