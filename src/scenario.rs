use anyhow::{anyhow, Context, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use tracing::info;

use crate::common::Position;
use crate::map::GridMap;
use crate::search::Grid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Route {
    pub start_x: i32,
    pub start_y: i32,
    pub goal_x: i32,
    pub goal_y: i32,
}

impl Route {
    pub fn start(&self) -> Position {
        Position::new(self.start_x, self.start_y)
    }

    pub fn goal(&self) -> Position {
        Position::new(self.goal_x, self.goal_y)
    }

    pub fn verify(&self, map: &GridMap) -> bool {
        map.is_walkable(self.start()) && map.is_walkable(self.goal())
    }
}

#[derive(Debug)]
pub struct Scenario {
    pub map: String,
    pub map_width: usize,
    pub map_height: usize,
    pub routes: Vec<Route>,
}

impl Scenario {
    pub fn load_from_scen(path: &str) -> Result<Scenario> {
        let file = File::open(path).with_context(|| format!("cannot open scen file {path}"))?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        // First line is "version x.x" which we can skip
        let _version = lines.next().context("empty scen file")??;

        let mut scenario = Scenario {
            map: String::new(),
            map_width: 0,
            map_height: 0,
            routes: Vec::new(),
        };

        for line in lines {
            let line = line?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }
            if parts.len() < 8 {
                return Err(anyhow!("malformed scen line {line:?}"));
            }

            let route = Route {
                start_x: parts[4].parse()?,
                start_y: parts[5].parse()?,
                goal_x: parts[6].parse()?,
                goal_y: parts[7].parse()?,
            };

            if scenario.map.is_empty() {
                // Map details come from the first route entry
                scenario.map = parts[1].to_string();
                scenario.map_width = parts[2].parse()?;
                scenario.map_height = parts[3].parse()?;
            }

            scenario.routes.push(route);
        }

        Ok(scenario)
    }

    pub fn sample_routes<R: Rng + ?Sized>(
        &self,
        num_routes: usize,
        rng: &mut R,
    ) -> Result<Vec<Route>> {
        let mut available: Vec<Route> = self.routes.clone();
        available.sort();
        available.dedup();

        if available.len() < num_routes {
            return Err(anyhow!(
                "scen file offers {} unique routes, requested {}",
                available.len(),
                num_routes
            ));
        }

        // Shuffle the available routes to randomize the selection
        available.shuffle(rng);
        available.truncate(num_routes);

        info!("Sampled routes: {available:?}");
        Ok(available)
    }

    pub fn load_routes_from_yaml(path: &str) -> Result<Vec<Route>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let routes = serde_yaml::from_reader(reader)?;
        Ok(routes)
    }

    pub fn write_routes_to_yaml(path: &str, routes: &[Route]) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = io::BufWriter::new(file);
        let yaml_data = serde_yaml::to_string(&routes)?;
        writer.write_all(yaml_data.as_bytes())?;

        Ok(())
    }
}
