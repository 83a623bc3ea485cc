use tracing::trace;

use crate::common::Position;
use crate::search::direction::{Direction, DIAGONAL_COST, STRAIGHT_COST};
use crate::search::frontier::NodeRegistry;
use crate::search::Grid;
use crate::stat::Stats;

// Scans from origin until a wall, registering the goal or the first jump
// point it runs into. Reports whether anything was registered.
pub(crate) fn straight_search(
    grid: &impl Grid,
    registry: &mut NodeRegistry,
    origin: Position,
    direction: Direction,
    mut g_cost: usize,
    stats: &mut Stats,
) -> bool {
    debug_assert!(direction.is_straight());

    let mut position = origin + direction;
    while grid.is_walkable(position) {
        g_cost += STRAIGHT_COST;
        stats.scan_steps += 1;

        if position == registry.goal() {
            registry.register(Some(origin), position, Vec::new(), g_cost);
            return true;
        }

        let mut directions = forced_straight(grid, position, direction);
        if !directions.is_empty() {
            // Keep scanning ahead of the jump point too.
            directions.push(direction);
            trace!("jump point {position:?} heading {direction:?} from {origin:?}");
            registry.register(Some(origin), position, directions, g_cost);
            return true;
        }

        position = position + direction;
    }
    false
}

// A neighbor is forced when the cell beside the scan line is blocked but the
// cell diagonally past it is open.
fn forced_straight(grid: &impl Grid, position: Position, direction: Direction) -> Vec<Direction> {
    let mut directions = Vec::new();
    for perpendicular in direction.perpendicular() {
        let blocked = position + perpendicular;
        if grid.is_obstacle(blocked) && grid.is_walkable(blocked + direction) {
            directions.push(perpendicular + direction);
        }
    }
    directions
}

// Steps along a diagonal while at least one component cell stays open. A
// stop becomes a jump point when a component scan finds something or an
// obstacle exposes a forced neighbor behind it.
pub(crate) fn diagonal_search(
    grid: &impl Grid,
    registry: &mut NodeRegistry,
    origin: Position,
    direction: Direction,
    mut g_cost: usize,
    stats: &mut Stats,
) {
    debug_assert!(direction.is_diagonal());

    let mut position = origin;
    loop {
        let horizontal = position + direction.horizontal();
        let vertical = position + direction.vertical();
        if grid.is_obstacle(horizontal) && grid.is_obstacle(vertical) {
            return;
        }

        position = position + direction;
        if !grid.is_walkable(position) {
            return;
        }
        g_cost += DIAGONAL_COST;
        stats.scan_steps += 1;

        if position == registry.goal() {
            registry.register(Some(origin), position, Vec::new(), g_cost);
            return;
        }

        let mut directions = Vec::new();
        if grid.is_obstacle(vertical) {
            let opening = vertical + direction.vertical();
            if grid.is_walkable(opening) {
                directions.push(Direction::toward(position, opening));
            }
        } else if grid.is_obstacle(horizontal) {
            let opening = horizontal + direction.horizontal();
            if grid.is_walkable(opening) {
                directions.push(Direction::toward(position, opening));
            }
        }

        let split_found = diagonal_split_search(grid, registry, position, direction, g_cost, stats);
        if split_found || !directions.is_empty() {
            directions.push(direction);
            trace!("jump point {position:?} heading {direction:?} from {origin:?}");
            registry.register(Some(origin), position, directions, g_cost);
            return;
        }
    }
}

// Both component scans always run and register whatever they find; the
// return value only says whether either scan hit something.
fn diagonal_split_search(
    grid: &impl Grid,
    registry: &mut NodeRegistry,
    position: Position,
    direction: Direction,
    g_cost: usize,
    stats: &mut Stats,
) -> bool {
    debug_assert!(direction.is_diagonal());

    let horizontal = straight_search(
        grid,
        registry,
        position,
        direction.horizontal(),
        g_cost,
        stats,
    );
    let vertical = straight_search(
        grid,
        registry,
        position,
        direction.vertical(),
        g_cost,
        stats,
    );
    horizontal || vertical
}
