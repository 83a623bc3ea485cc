use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::common::Position;
use crate::search::direction::{octile, Direction};
use crate::search::node::JumpNode;

#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f_cost: usize,
    seq: usize,
    position: Position,
}

impl OpenEntry {
    // Ties in f cost break by insertion order, keeping pops deterministic.
    fn key(&self) -> (usize, usize) {
        (self.f_cost, self.seq)
    }
}

// Array binary min-heap over f cost with a position-to-slot index, so
// membership checks and in-place relaxation stay O(log n).
#[derive(Debug, Default)]
struct OpenHeap {
    entries: Vec<OpenEntry>,
    slots: HashMap<Position, usize>,
    next_seq: usize,
}

impl OpenHeap {
    fn push(&mut self, position: Position, f_cost: usize) {
        debug_assert!(!self.slots.contains_key(&position));
        let entry = OpenEntry {
            f_cost,
            seq: self.next_seq,
            position,
        };
        self.next_seq += 1;
        let index = self.entries.len();
        self.entries.push(entry);
        self.slots.insert(position, index);
        self.sift_up(index);
    }

    fn decrease(&mut self, position: Position, f_cost: usize) {
        let index = self.slots[&position];
        debug_assert!(f_cost <= self.entries[index].f_cost);
        self.entries[index].f_cost = f_cost;
        self.sift_up(index);
    }

    fn pop_min(&mut self) -> Option<Position> {
        let last = self.entries.len().checked_sub(1)?;
        self.swap_entries(0, last);
        let entry = self.entries.pop()?;
        self.slots.remove(&entry.position);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(entry.position)
    }

    fn contains(&self, position: Position) -> bool {
        self.slots.contains_key(&position)
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.slots.clear();
        self.next_seq = 0;
    }

    fn swap_entries(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.slots.insert(self.entries[a].position, a);
        self.slots.insert(self.entries[b].position, b);
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.entries[index].key() >= self.entries[parent].key() {
                break;
            }
            self.swap_entries(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;
            if left < self.entries.len() && self.entries[left].key() < self.entries[smallest].key()
            {
                smallest = left;
            }
            if right < self.entries.len()
                && self.entries[right].key() < self.entries[smallest].key()
            {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.swap_entries(index, smallest);
            index = smallest;
        }
    }
}

// Per-search bookkeeping: one node per discovered position, the open heap
// over the undecided ones and the set of settled ones.
#[derive(Debug)]
pub(crate) struct NodeRegistry {
    nodes: HashMap<Position, JumpNode>,
    open: OpenHeap,
    closed: HashSet<Position>,
    goal: Position,
}

impl NodeRegistry {
    pub(crate) fn new() -> Self {
        NodeRegistry {
            nodes: HashMap::new(),
            open: OpenHeap::default(),
            closed: HashSet::new(),
            goal: Position::new(0, 0),
        }
    }

    pub(crate) fn reset(&mut self, goal: Position) {
        self.nodes.clear();
        self.open.clear();
        self.closed.clear();
        self.goal = goal;
    }

    pub(crate) fn goal(&self) -> Position {
        self.goal
    }

    // An unknown position becomes a new open node. A known one is relaxed in
    // place when the new cost is strictly lower, reopening it if it was
    // already settled. Anything else is a no-op.
    pub(crate) fn register(
        &mut self,
        predecessor: Option<Position>,
        position: Position,
        directions: Vec<Direction>,
        g_cost: usize,
    ) {
        // Only the start carries all eight directions.
        debug_assert!(predecessor.is_none() || directions.len() <= 3);

        match self.nodes.entry(position) {
            Entry::Vacant(entry) => {
                let node = entry.insert(JumpNode {
                    position,
                    predecessor,
                    directions,
                    g_cost,
                    h_cost: octile(position, self.goal),
                });
                trace!("open node: {node:?}");
                self.open.push(position, node.f_cost());
            }
            Entry::Occupied(mut entry) => {
                let node = entry.get_mut();
                if g_cost >= node.g_cost {
                    return;
                }
                node.predecessor = predecessor;
                node.directions = directions;
                node.g_cost = g_cost;
                trace!("relax node: {node:?}");
                let f_cost = node.f_cost();
                if self.closed.remove(&position) {
                    self.open.push(position, f_cost);
                } else {
                    debug_assert!(self.open.contains(position));
                    self.open.decrease(position, f_cost);
                }
            }
        }
    }

    pub(crate) fn pop_cheapest(&mut self) -> Option<(Position, Vec<Direction>, usize)> {
        let position = self.open.pop_min()?;
        self.closed.insert(position);
        let node = &self.nodes[&position];
        Some((node.position, node.directions.clone(), node.g_cost))
    }

    #[cfg(test)]
    pub(crate) fn node(&self, position: Position) -> Option<&JumpNode> {
        self.nodes.get(&position)
    }

    // Panics when the position was never registered: predecessor links only
    // come from the registry itself.
    pub(crate) fn predecessor(&self, position: Position) -> Option<Position> {
        self.nodes[&position].predecessor
    }

    #[cfg(test)]
    pub(crate) fn is_settled(&self, position: Position) -> bool {
        self.closed.contains(&position)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
