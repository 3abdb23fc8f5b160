//! Headless navigation demo
//!
//! Usage: `wayfinder [config.ron|config.json]`

use wayfinder::prelude::*;

const TICK: f32 = 1.0 / 30.0;
const MAX_TICKS: usize = 30 * 60;

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => demo_config(),
    };

    let mut sim = Simulation::new(config);
    let (start, goal) = corners(&sim);
    log::info!("Planning from {start} to {goal}");

    let runner = sim.spawn_agent("runner", start);
    let planned = sim.plan_between(start, goal);
    if !sim.send_along(runner, &planned) {
        log::error!("No route: {:?}", planned.node_search.status);
        return;
    }
    log::info!(
        "Route of {} waypoints (cost {}, {} nodes expanded)",
        planned.route.len(),
        planned.node_search.cost,
        planned.node_search.closed.len()
    );

    let drifter = sim.spawn_agent("drifter", Vec3::ZERO);
    sim.start_wandering(drifter);

    for tick in 0..MAX_TICKS {
        sim.tick(TICK);

        let mut done = false;
        for event in sim.events().iter() {
            match event {
                NavEvent::WaypointReached { index, position, .. } => {
                    log::info!("Tick {tick}: waypoint {index} at {position}");
                }
                NavEvent::PathCompleted { entity } if *entity == runner => {
                    log::info!("Tick {tick}: runner arrived");
                    done = true;
                }
                _ => {}
            }
        }
        if done {
            break;
        }
    }

    if let Some(position) = sim.agent_position(runner) {
        log::info!("Runner finished at {position}");
    }
}

/// Opposite corners of the generated grid
fn corners(sim: &Simulation) -> (Vec3, Vec3) {
    let grid = &sim.config().grid;
    let half = Vec3::new(
        (grid.columns - 1).max(0) as f32 * grid.cell_size / 2.0,
        0.0,
        (grid.rows - 1).max(0) as f32 * grid.cell_size / 2.0,
    );
    (grid.origin - half, grid.origin + half)
}

fn demo_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.grid = config.grid.with_size(12, 12).with_cluster_block(Some(4));
    config.pathfinding.mode = SearchMode::Clusters;
    config.obstacles = vec![
        wayfinder::core::ObstacleConfig {
            center: Vec3::new(-1.0, 0.0, 0.0),
            half_extents: Vec3::new(3.0, 1.0, 0.4),
        },
        wayfinder::core::ObstacleConfig {
            center: Vec3::new(2.0, 0.0, -3.0),
            half_extents: Vec3::new(0.4, 1.0, 2.0),
        },
    ];
    config
}
