use jps_rust::common::Position;
use jps_rust::config::{Cli, Config};
use jps_rust::map::GridMap;
use jps_rust::scenario::{Route, Scenario};
use jps_rust::search::JumpPointSearch;
use jps_rust::stat::Stats;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use tracing::{info, Level};
use tracing_subscriber;

#[derive(Debug, Serialize)]
struct RouteReport {
    route: Route,
    cost: Option<usize>,
    waypoints: Option<Vec<Position>>,
    stats: Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();
    let cli = Cli::parse();

    let config = Config::new(&cli);
    config.validate()?;

    let map = GridMap::from_file(&config.map_path)
        .with_context(|| format!("error loading map {}", config.map_path))?;

    let routes = if let Some(scen_path) = config.scen_path.as_ref() {
        let scenario = Scenario::load_from_scen(scen_path)
            .with_context(|| format!("error loading scenario {scen_path}"))?;
        let mut rng = StdRng::seed_from_u64(config.seed as u64);
        let routes = scenario.sample_routes(config.num_routes, &mut rng)?;
        if config.debug_scen {
            Scenario::write_routes_to_yaml("debug.yaml", &routes)?;
        }
        routes
    } else {
        let (start, goal) = (config.start_position(), config.goal_position());
        vec![Route {
            start_x: start.x,
            start_y: start.y,
            goal_x: goal.x,
            goal_y: goal.y,
        }]
    };
    for route in &routes {
        assert!(
            route.verify(&map),
            "route endpoints must be walkable: {route:?}"
        );
    }

    let mut finder = JumpPointSearch::new();
    let mut reports = Vec::new();
    for route in routes {
        let (start, goal) = (route.start(), route.goal());
        let result = finder.find(&map, start, goal);

        match &result {
            Some(path) => {
                assert!(path.verify(&map));
                if config.verify {
                    let reference = map.octile_distance_field(goal);
                    assert_eq!(path.cost, reference[start.y as usize][start.x as usize]);
                }
                info!("route {route:?} solved with cost {}", path.cost);
            }
            None => {
                if config.verify {
                    let reference = map.octile_distance_field(goal);
                    assert_eq!(reference[start.y as usize][start.x as usize], usize::MAX);
                }
                info!("route {route:?} has no path");
            }
        }
        finder.stats().print();

        reports.push(RouteReport {
            route,
            cost: result.as_ref().map(|path| path.cost),
            waypoints: result.map(|path| path.waypoints),
            stats: finder.stats().clone(),
        });
    }

    if let Some(parent) = std::path::Path::new(&config.output_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut output = File::create(&config.output_path)
        .with_context(|| format!("cannot create output file {}", config.output_path))?;
    output.write_all(serde_json::to_string_pretty(&reports)?.as_bytes())?;
    info!("Wrote {} route reports to {}", reports.len(), config.output_path);

    Ok(())
}
