use anyhow::anyhow;
use clap::Parser;

use crate::common::Position;

#[derive(Parser, Debug)]
#[command(
    name = "Rust JPS",
    about = "Jump point search pathfinding on uniform-cost grids.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(
        long,
        help = "Path to the map file",
        default_value = "map_file/demo/demo.map"
    )]
    pub map_path: String,

    #[arg(long, help = "Path to the MovingAI scenario file")]
    pub scen_path: Option<String>,

    #[arg(
        long,
        help = "Start position as x,y",
        use_value_delimiter = true,
        default_value = "0,0"
    )]
    pub start: Vec<i32>,

    #[arg(
        long,
        help = "Goal position as x,y",
        use_value_delimiter = true,
        default_value = "15,15"
    )]
    pub goal: Vec<i32>,

    #[arg(
        long,
        help = "Number of routes sampled from the scenario file",
        default_value_t = 1
    )]
    pub num_routes: usize,

    #[arg(
        long,
        help = "Seed for the random number generator",
        default_value_t = 0
    )]
    pub seed: usize,

    #[arg(
        long,
        help = "Path to the output file",
        default_value = "result/result.json"
    )]
    pub output_path: String,

    #[arg(
        long,
        help = "Check results against a Dijkstra reference search",
        default_value_t = false
    )]
    pub verify: bool,

    #[arg(
        long,
        help = "Write sampled routes to debug.yaml",
        default_value_t = false
    )]
    pub debug_scen: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub map_path: String,
    pub scen_path: Option<String>,
    pub start: Vec<i32>,
    pub goal: Vec<i32>,
    pub num_routes: usize,
    pub seed: usize,
    pub output_path: String,
    pub verify: bool,
    pub debug_scen: bool,
}

impl Config {
    pub fn new(cli: &Cli) -> Self {
        Self {
            map_path: cli.map_path.clone(),
            scen_path: cli.scen_path.clone(),
            start: cli.start.clone(),
            goal: cli.goal.clone(),
            num_routes: cli.num_routes,
            seed: cli.seed,
            output_path: cli.output_path.clone(),
            verify: cli.verify,
            debug_scen: cli.debug_scen,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.start.len() != 2 {
            return Err(anyhow!("start must be given as x,y, got {:?}", self.start));
        }
        if self.goal.len() != 2 {
            return Err(anyhow!("goal must be given as x,y, got {:?}", self.goal));
        }
        if self.num_routes == 0 {
            return Err(anyhow!("number of routes must be at least 1"));
        }
        Ok(())
    }

    pub fn start_position(&self) -> Position {
        Position::new(self.start[0], self.start[1])
    }

    pub fn goal_position(&self) -> Position {
        Position::new(self.goal[0], self.goal[1])
    }
}
