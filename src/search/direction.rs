use std::ops::Add;

use crate::common::Position;

pub const STRAIGHT_COST: usize = 10;
pub const DIAGONAL_COST: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    pub dx: i32,
    pub dy: i32,
}

impl Direction {
    pub const UP: Direction = Direction { dx: 0, dy: 1 };
    pub const DOWN: Direction = Direction { dx: 0, dy: -1 };
    pub const LEFT: Direction = Direction { dx: -1, dy: 0 };
    pub const RIGHT: Direction = Direction { dx: 1, dy: 0 };
    pub const UP_LEFT: Direction = Direction { dx: -1, dy: 1 };
    pub const UP_RIGHT: Direction = Direction { dx: 1, dy: 1 };
    pub const DOWN_LEFT: Direction = Direction { dx: -1, dy: -1 };
    pub const DOWN_RIGHT: Direction = Direction { dx: 1, dy: -1 };

    pub const ALL: [Direction; 8] = [
        Direction::UP,
        Direction::DOWN,
        Direction::LEFT,
        Direction::RIGHT,
        Direction::UP_LEFT,
        Direction::UP_RIGHT,
        Direction::DOWN_LEFT,
        Direction::DOWN_RIGHT,
    ];

    pub fn is_straight(&self) -> bool {
        (self.dx == 0) != (self.dy == 0)
    }

    pub fn is_diagonal(&self) -> bool {
        self.dx != 0 && self.dy != 0
    }

    pub fn horizontal(&self) -> Direction {
        Direction { dx: self.dx, dy: 0 }
    }

    pub fn vertical(&self) -> Direction {
        Direction { dx: 0, dy: self.dy }
    }

    // Only meaningful for straight directions.
    pub fn perpendicular(&self) -> [Direction; 2] {
        match (self.dx, self.dy) {
            (dx, 0) if dx != 0 => [Direction::UP, Direction::DOWN],
            (0, dy) if dy != 0 => [Direction::LEFT, Direction::RIGHT],
            _ => unreachable!(),
        }
    }

    pub fn toward(from: Position, to: Position) -> Direction {
        Direction {
            dx: (to.x - from.x).signum(),
            dy: (to.y - from.y).signum(),
        }
    }
}

impl Add<Direction> for Position {
    type Output = Position;

    fn add(self, rhs: Direction) -> Position {
        Position {
            x: self.x + rhs.dx,
            y: self.y + rhs.dy,
        }
    }
}

impl Add for Direction {
    type Output = Direction;

    fn add(self, rhs: Direction) -> Direction {
        let direction = Direction {
            dx: self.dx + rhs.dx,
            dy: self.dy + rhs.dy,
        };
        debug_assert!(direction.dx.abs() <= 1 && direction.dy.abs() <= 1);
        direction
    }
}

pub fn octile(a: Position, b: Position) -> usize {
    let dx = (a.x - b.x).unsigned_abs() as usize;
    let dy = (a.y - b.y).unsigned_abs() as usize;
    let diagonal = dx.min(dy);
    let straight = dx.abs_diff(dy);
    diagonal * DIAGONAL_COST + straight * STRAIGHT_COST
}
