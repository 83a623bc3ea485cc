use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub cost: usize,
    pub time_us: usize,
    pub expand_nodes: usize,
    pub scan_steps: usize,
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            cost: 0,
            time_us: 0,
            expand_nodes: 0,
            scan_steps: 0,
        }
    }
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Cost {:?} Time(microseconds) {:?} Expand nodes number {:?} Scan steps number {:?}",
            self.cost, self.time_us, self.expand_nodes, self.scan_steps
        );
    }
}
