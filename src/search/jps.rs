use std::time::Instant;

use tracing::{debug, instrument, trace};

use crate::common::{Path, Position};
use crate::search::direction::Direction;
use crate::search::frontier::NodeRegistry;
use crate::search::scanner::{diagonal_search, straight_search};
use crate::search::Grid;
use crate::stat::Stats;

// Jump point search over a uniform-cost eight-connected grid. One value
// serves any number of queries back to back; every find starts from a clean
// registry.
#[derive(Debug)]
pub struct JumpPointSearch {
    registry: NodeRegistry,
    stats: Stats,
}

impl JumpPointSearch {
    pub fn new() -> Self {
        JumpPointSearch {
            registry: NodeRegistry::new(),
            stats: Stats::default(),
        }
    }

    #[instrument(skip_all, name="jps", fields(start = format!("{:?}", start), goal = format!("{:?}", goal)), level = "debug")]
    pub fn find(&mut self, grid: &impl Grid, start: Position, goal: Position) -> Option<Path> {
        debug_assert!(grid.is_walkable(start) && grid.is_walkable(goal));

        let timer = Instant::now();
        self.stats = Stats::default();
        self.registry.reset(goal);
        self.registry.register(None, start, Direction::ALL.to_vec(), 0);

        while let Some((position, directions, g_cost)) = self.registry.pop_cheapest() {
            trace!("expand node: {position:?} g {g_cost:?} directions {directions:?}");
            self.stats.expand_nodes += 1;

            if position == goal {
                self.stats.cost = g_cost;
                self.stats.time_us = timer.elapsed().as_micros() as usize;
                return Some(self.construct_path(start, g_cost));
            }

            for direction in directions {
                if direction.is_straight() {
                    straight_search(
                        grid,
                        &mut self.registry,
                        position,
                        direction,
                        g_cost,
                        &mut self.stats,
                    );
                } else {
                    diagonal_search(
                        grid,
                        &mut self.registry,
                        position,
                        direction,
                        g_cost,
                        &mut self.stats,
                    );
                }
            }
        }

        self.stats.time_us = timer.elapsed().as_micros() as usize;
        debug!("cannot find path");
        None
    }

    fn construct_path(&self, start: Position, cost: usize) -> Path {
        let mut current = self.registry.goal();
        let mut waypoints = vec![current];
        while let Some(previous) = self.registry.predecessor(current) {
            waypoints.push(previous);
            current = previous;
        }
        debug_assert_eq!(current, start);
        waypoints.reverse();
        Path { waypoints, cost }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }
}

impl Default for JumpPointSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::GridMap;
    use rand::prelude::*;
    use rand::rngs::StdRng;
    use tracing_subscriber;

    // Helper function to setup tracing
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("trace")
            .try_init();
    }

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_open_grid_straight_goal() {
        init_tracing();
        let map = GridMap::new(5, 5);
        let mut finder = JumpPointSearch::new();

        let path = finder.find(&map, pos(0, 0), pos(4, 0)).unwrap();

        assert_eq!(path.waypoints, vec![pos(0, 0), pos(4, 0)]);
        assert_eq!(path.cost, 40);
        assert!(path.verify(&map));
    }

    #[test]
    fn test_open_grid_diagonal_goal() {
        init_tracing();
        let map = GridMap::new(5, 5);
        let mut finder = JumpPointSearch::new();

        let path = finder.find(&map, pos(0, 0), pos(4, 4)).unwrap();

        assert_eq!(path.waypoints, vec![pos(0, 0), pos(4, 4)]);
        assert_eq!(path.cost, 56);
        assert_eq!(finder.stats().expand_nodes, 2);
        assert!(path.verify(&map));
    }

    #[test]
    fn test_start_equals_goal() {
        init_tracing();
        let map = GridMap::new(5, 5);
        let mut finder = JumpPointSearch::new();

        let path = finder.find(&map, pos(2, 2), pos(2, 2)).unwrap();

        assert_eq!(path.waypoints, vec![pos(2, 2)]);
        assert_eq!(path.cost, 0);
    }

    #[test]
    fn test_detour_around_center_obstacle() {
        init_tracing();
        let mut map = GridMap::new(5, 5);
        map.set_obstacle(pos(2, 2), true);
        let mut finder = JumpPointSearch::new();

        let path = finder.find(&map, pos(0, 0), pos(4, 4)).unwrap();

        // One straight segment more than the free diagonal run.
        assert_eq!(path.cost, 62);
        assert_eq!(
            path.waypoints,
            vec![
                pos(0, 0),
                pos(1, 1),
                pos(2, 1),
                pos(3, 2),
                pos(4, 3),
                pos(4, 4),
            ]
        );
        assert!(path.verify(&map));
    }

    #[test]
    fn test_walled_in_start_returns_none() {
        init_tracing();
        let mut map = GridMap::new(5, 5);
        for x in 1..4 {
            for y in 1..4 {
                if (x, y) != (2, 2) {
                    map.set_obstacle(pos(x, y), true);
                }
            }
        }
        let mut finder = JumpPointSearch::new();

        let path = finder.find(&map, pos(2, 2), pos(0, 0));

        assert!(path.is_none());
        assert_eq!(finder.stats().expand_nodes, 1);
    }

    #[test]
    fn test_disconnected_goal_returns_none() {
        init_tracing();
        let mut map = GridMap::new(5, 5);
        for y in 0..5 {
            map.set_obstacle(pos(2, y), true);
        }
        let mut finder = JumpPointSearch::new();

        let path = finder.find(&map, pos(0, 0), pos(4, 4));

        assert!(path.is_none());
        assert!(!finder.registry.is_settled(pos(4, 4)));
    }

    #[test]
    fn test_repeated_find_is_idempotent() {
        init_tracing();
        let mut map = GridMap::new(5, 5);
        map.set_obstacle(pos(2, 2), true);
        let mut finder = JumpPointSearch::new();

        let first = finder.find(&map, pos(0, 0), pos(4, 4)).unwrap();
        // An unrelated query in between must not leak into the next one.
        finder.find(&map, pos(4, 0), pos(0, 4)).unwrap();
        let second = finder.find(&map, pos(0, 0), pos(4, 4)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_matches_dijkstra_reference_on_random_grids() {
        init_tracing();
        let mut rng = StdRng::seed_from_u64(7);
        let mut finder = JumpPointSearch::new();

        for _ in 0..40 {
            let mut map = GridMap::new(12, 12);
            for y in 0..12 {
                for x in 0..12 {
                    if rng.gen_bool(0.25) {
                        map.set_obstacle(pos(x, y), true);
                    }
                }
            }

            let open_cells: Vec<Position> = (0..12)
                .flat_map(|y| (0..12).map(move |x| pos(x, y)))
                .filter(|cell| map.is_walkable(*cell))
                .collect();
            if open_cells.len() < 2 {
                continue;
            }
            let start = *open_cells.choose(&mut rng).unwrap();
            let goal = *open_cells.choose(&mut rng).unwrap();

            let reference = map.octile_distance_field(goal);
            let expected = reference[start.y as usize][start.x as usize];

            match finder.find(&map, start, goal) {
                Some(path) => {
                    assert_eq!(path.cost, expected);
                    assert!(path.verify(&map));
                }
                None => assert_eq!(expected, usize::MAX),
            }
        }
    }
}
