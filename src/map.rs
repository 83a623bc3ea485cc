use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::{anyhow, Context, Result};

use crate::common::Position;
use crate::search::{Direction, Grid, DIAGONAL_COST, STRAIGHT_COST};

#[derive(Debug, Clone)]
pub struct GridMap {
    pub height: usize,
    pub width: usize,
    cells: Vec<Vec<bool>>, // cells[y][x], true when walkable
}

impl GridMap {
    pub fn new(width: usize, height: usize) -> Self {
        GridMap {
            height,
            width,
            cells: vec![vec![true; width]; height],
        }
    }

    // MovingAI format: type, height and width lines, a map marker, then one
    // row of cells per line with '.' passable.
    pub fn from_file(path: &str) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("cannot open map file {path}"))?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let _type = lines.next().context("missing type line")??;
        let height = lines
            .next()
            .context("missing height line")??
            .split_whitespace()
            .last()
            .context("malformed height line")?
            .parse::<usize>()?;
        let width = lines
            .next()
            .context("missing width line")??
            .split_whitespace()
            .last()
            .context("malformed width line")?
            .parse::<usize>()?;
        let _map = lines.next().context("missing map marker line")??;

        let mut cells = Vec::with_capacity(height);
        for line in lines.take(height) {
            let row: Vec<bool> = line?.chars().map(|ch| ch == '.').collect();
            if row.len() != width {
                return Err(anyhow!(
                    "map row {} has {} cells, expected {}",
                    cells.len(),
                    row.len(),
                    width
                ));
            }
            cells.push(row);
        }
        if cells.len() != height {
            return Err(anyhow!("map body has {} rows, expected {}", cells.len(), height));
        }

        Ok(GridMap {
            height,
            width,
            cells,
        })
    }

    pub fn from_ascii(rows: &[&str]) -> Self {
        let cells: Vec<Vec<bool>> = rows
            .iter()
            .map(|row| row.chars().map(|ch| ch == '.').collect())
            .collect();
        let height = cells.len();
        let width = cells.first().map_or(0, Vec::len);
        assert!(
            cells.iter().all(|row| row.len() == width),
            "ascii rows must share one width"
        );
        GridMap {
            height,
            width,
            cells,
        }
    }

    pub fn set_obstacle(&mut self, position: Position, blocked: bool) {
        self.cells[position.y as usize][position.x as usize] = !blocked;
    }

    // Dijkstra distance from every cell to goal over the eight-connected
    // graph, usize::MAX where unreachable. Diagonal steps obey the same
    // corner rule as the search. Used as the optimality reference.
    pub fn octile_distance_field(&self, goal: Position) -> Vec<Vec<usize>> {
        let mut field = vec![vec![usize::MAX; self.width]; self.height];
        let mut heap = BinaryHeap::new();

        field[goal.y as usize][goal.x as usize] = 0;
        heap.push((Reverse(0), (goal.x, goal.y)));

        while let Some((Reverse(cost), (x, y))) = heap.pop() {
            if cost > field[y as usize][x as usize] {
                continue;
            }

            let position = Position::new(x, y);
            for direction in Direction::ALL {
                let next = position + direction;
                if !self.is_walkable(next) {
                    continue;
                }
                if direction.is_diagonal()
                    && self.is_obstacle(position + direction.horizontal())
                    && self.is_obstacle(position + direction.vertical())
                {
                    continue;
                }

                let step = if direction.is_diagonal() {
                    DIAGONAL_COST
                } else {
                    STRAIGHT_COST
                };
                let next_cost = cost + step;
                if next_cost < field[next.y as usize][next.x as usize] {
                    field[next.y as usize][next.x as usize] = next_cost;
                    heap.push((Reverse(next_cost), (next.x, next.y)));
                }
            }
        }

        field
    }
}

impl Grid for GridMap {
    fn is_walkable(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as usize) < self.width
            && (position.y as usize) < self.height
            && self.cells[position.y as usize][position.x as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand::rngs::StdRng;

    use crate::search::octile;

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_read_map() {
        let map = GridMap::from_file("map_file/demo/demo.map").unwrap();

        assert_eq!(map.height, 16);
        assert_eq!(map.width, 16);

        assert!(map.is_walkable(pos(0, 0)));
        assert!(map.is_walkable(pos(15, 15)));
        assert!(!map.is_walkable(pos(2, 2)));
        assert!(!map.is_walkable(pos(4, 7)));
    }

    #[test]
    fn test_read_map_rejects_truncated_body() {
        let path = std::env::temp_dir().join("jps_truncated.map");
        std::fs::write(&path, "type octile\nheight 4\nwidth 4\nmap\n....\n....\n").unwrap();

        // Fewer body rows than the header promises must fail at load time,
        // not panic later on an out-of-range row.
        assert!(GridMap::from_file(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_read_map_rejects_ragged_row() {
        let path = std::env::temp_dir().join("jps_ragged.map");
        std::fs::write(&path, "type octile\nheight 2\nwidth 4\nmap\n....\n..\n").unwrap();

        assert!(GridMap::from_file(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_bounds_count_as_obstacles() {
        let map = GridMap::new(4, 4);

        assert!(!map.is_walkable(pos(-1, 0)));
        assert!(!map.is_walkable(pos(0, -1)));
        assert!(!map.is_walkable(pos(4, 0)));
        assert!(!map.is_walkable(pos(0, 4)));
        assert!(map.is_obstacle(pos(-1, -1)));
        assert!(map.is_walkable(pos(3, 3)));
    }

    #[test]
    fn test_set_obstacle_toggles_cell() {
        let mut map = GridMap::new(4, 4);

        map.set_obstacle(pos(1, 2), true);
        assert!(map.is_obstacle(pos(1, 2)));

        map.set_obstacle(pos(1, 2), false);
        assert!(map.is_walkable(pos(1, 2)));
    }

    #[test]
    fn test_distance_field_open_grid() {
        let map = GridMap::new(3, 3);
        let field = map.octile_distance_field(pos(2, 2));

        assert_eq!(field[2][2], 0);
        assert_eq!(field[0][2], 20);
        assert_eq!(field[2][0], 20);
        assert_eq!(field[0][0], 28);
    }

    #[test]
    fn test_distance_field_detours_around_obstacle() {
        let map = GridMap::from_ascii(&[
            "...", //
            ".#.", //
            "...",
        ]);
        let field = map.octile_distance_field(pos(2, 2));

        // The center is blocked, so the corner route needs one straight
        // segment on each side of a diagonal.
        assert_eq!(field[0][0], 34);
        assert_eq!(field[1][1], usize::MAX);
    }

    #[test]
    fn test_distance_field_respects_corner_squeeze_rule() {
        let map = GridMap::from_ascii(&[
            ".#.", //
            "#..", //
            "...",
        ]);
        let field = map.octile_distance_field(pos(2, 2));

        // Both component cells beside the start are blocked, so the diagonal
        // out of the corner is illegal and the corner is cut off entirely.
        assert_eq!(field[0][0], usize::MAX);
    }

    #[test]
    fn test_octile_heuristic_is_admissible() {
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..10 {
            let mut map = GridMap::new(10, 10);
            for y in 0..10 {
                for x in 0..10 {
                    if rng.gen_bool(0.2) {
                        map.set_obstacle(pos(x, y), true);
                    }
                }
            }

            let open_cells: Vec<Position> = (0..10)
                .flat_map(|y| (0..10).map(move |x| pos(x, y)))
                .filter(|cell| map.is_walkable(*cell))
                .collect();
            let Some(&goal) = open_cells.choose(&mut rng) else {
                continue;
            };

            let field = map.octile_distance_field(goal);
            for cell in open_cells {
                let distance = field[cell.y as usize][cell.x as usize];
                if distance != usize::MAX {
                    assert!(octile(cell, goal) <= distance);
                }
            }
        }
    }
}
