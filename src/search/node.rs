use crate::common::Position;
use crate::search::direction::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JumpNode {
    pub(crate) position: Position,
    pub(crate) predecessor: Option<Position>,
    pub(crate) directions: Vec<Direction>,
    pub(crate) g_cost: usize,
    pub(crate) h_cost: usize,
}

impl JumpNode {
    pub(crate) fn f_cost(&self) -> usize {
        self.g_cost + self.h_cost
    }
}
