//! Navigation session
//!
//! [`Simulation`] owns everything a running navigation scene needs: the
//! obstacle world, the grid graph, the agents, and the event queue. It is
//! constructed explicitly and passed around by reference.

use glam::Vec3;
use hecs::Entity;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rustc_hash::FxHashMap;

use super::config::SimConfig;
use super::events::{EventQueue, NavEvent};
use crate::ai::pathfinding::{GridGraph, NodeId, PathPlanner, PlannedPath, SearchStatus};
use crate::ai::{
    Agent, Arrive, Behavior, LookWhereYouAreGoing, MotionModel, PathFollower, Target, Trackable,
    Wander,
};
use crate::ecs::{Name, Transform, World};
use crate::physics::{ColliderHandle, Physics};

/// A running navigation scene
pub struct Simulation {
    config: SimConfig,
    physics: Physics,
    graph: GridGraph,
    planner: PathPlanner,
    world: World,
    events: EventQueue,
    rng: SmallRng,
}

impl Simulation {
    /// Build the obstacle world from `config` and generate the graph
    pub fn new(config: SimConfig) -> Self {
        let mut physics = Physics::new();
        for obstacle in &config.obstacles {
            physics.add_obstacle(obstacle.center, obstacle.half_extents);
        }

        let mut sim = Self {
            planner: PathPlanner::from_config(&config.pathfinding),
            rng: SmallRng::seed_from_u64(config.seed),
            physics,
            graph: GridGraph::new(),
            world: World::new(),
            events: EventQueue::new(),
            config,
        };
        sim.regenerate_graph();

        log::info!(
            "Simulation ready: {} obstacles, {} nodes",
            sim.physics.obstacle_count(),
            sim.graph.len()
        );
        sim
    }

    /// Add a box obstacle. The graph is not rebuilt until
    /// [`regenerate_graph`](Self::regenerate_graph) is called.
    pub fn add_obstacle(&mut self, center: Vec3, half_extents: Vec3) -> ColliderHandle {
        self.physics.add_obstacle(center, half_extents)
    }

    pub fn remove_obstacle(&mut self, handle: ColliderHandle) -> bool {
        self.physics.remove_obstacle(handle)
    }

    /// Rebuild the graph from the grid config and current obstacles
    pub fn regenerate_graph(&mut self) {
        self.graph.generate(&self.config.grid, &self.physics);
        if let Some(block) = self.config.grid.cluster_block {
            self.graph.partition_clusters(block);
        }

        log::debug!(
            "Graph regenerated: {} nodes, {} edges, {} clusters",
            self.graph.len(),
            self.graph.edge_count(),
            self.graph.cluster_count()
        );
        self.events.push(NavEvent::GraphRegenerated {
            nodes: self.graph.len(),
            edges: self.graph.edge_count(),
            clusters: self.graph.cluster_count(),
        });
    }

    /// Plan between two graph nodes
    pub fn plan_path(&mut self, start: NodeId, goal: NodeId) -> PlannedPath {
        let planned = self.planner.plan(&self.graph, &self.physics, start, goal);
        self.report(&planned);
        planned
    }

    /// Plan between the nodes nearest to two world points
    pub fn plan_between(&mut self, from: Vec3, to: Vec3) -> PlannedPath {
        match (self.graph.nearest_node(from), self.graph.nearest_node(to)) {
            (Some(start), Some(goal)) => self.plan_path(start, goal),
            _ => {
                log::warn!("No graph nodes near {from} or {to}");
                let planned = PlannedPath::failed(None, SearchStatus::InvalidEndpoint);
                self.report(&planned);
                planned
            }
        }
    }

    fn report(&mut self, planned: &PlannedPath) {
        let event = if planned.is_found() {
            log::debug!(
                "Path found: {} waypoints, cost {}",
                planned.route.len(),
                planned.node_search.cost
            );
            NavEvent::PathPlanned {
                waypoints: planned.route.len(),
                cost: planned.node_search.cost,
            }
        } else {
            log::debug!("Path search failed: {:?}", planned.node_search.status);
            NavEvent::PathFailed {
                status: planned.node_search.status,
            }
        };
        self.events.push(event);
    }

    /// Spawn an idle agent using the configured agent defaults
    pub fn spawn_agent(&mut self, name: &str, position: Vec3) -> Entity {
        let defaults = &self.config.agent;
        let agent = Agent::new(position, defaults.max_speed)
            .with_model(defaults.model)
            .with_turn_rate(defaults.max_degrees_delta)
            .with_bound(self.config.max_offset);

        let entity = self
            .world
            .spawn((Name::new(name), Transform::from_position(position), agent));
        log::debug!("Spawned agent '{name}' at {position}");
        entity
    }

    pub fn despawn_agent(&mut self, entity: Entity) -> bool {
        self.world.despawn(entity).is_ok()
    }

    /// Walk an agent along a planned route. Returns `false` when the plan
    /// failed or the entity is not an agent.
    pub fn send_along(&mut self, entity: Entity, planned: &PlannedPath) -> bool {
        if !planned.is_found() {
            return false;
        }
        let follower = PathFollower::new(planned.waypoints(&self.graph));
        let arrive = Arrive::new(self.config.agent.slow_radius, self.config.agent.stop_radius);

        {
            let Ok(mut agent) = self.world.get_mut::<Agent>(entity) else {
                log::warn!("Cannot send {entity:?} along a path, it is not an agent");
                return false;
            };
            let model = agent.model;
            agent.switch_to(
                model,
                [
                    Behavior::Arrive(arrive),
                    Behavior::LookWhereYouAreGoing(LookWhereYouAreGoing),
                ],
            );
            follower.start(&mut *agent);
        }

        self.world.insert_one(entity, follower).is_ok()
    }

    /// Let an agent drift around under the kinematic model
    pub fn start_wandering(&mut self, entity: Entity) -> bool {
        let defaults = &self.config.agent;
        let wander = Wander::new(defaults.wander_degrees, defaults.wander_interval);
        self.set_behaviors(
            entity,
            MotionModel::Kinematic,
            [
                Behavior::Wander(wander),
                Behavior::LookWhereYouAreGoing(LookWhereYouAreGoing),
            ],
        )
    }

    /// Replace an agent's model and behaviors, dropping any path it follows
    pub fn set_behaviors(
        &mut self,
        entity: Entity,
        model: MotionModel,
        behaviors: impl IntoIterator<Item = Behavior>,
    ) -> bool {
        let Ok(mut agent) = self.world.get_mut::<Agent>(entity) else {
            return false;
        };
        agent.switch_to(model, behaviors);
        drop(agent);
        // Idle agents have no follower to drop
        if self.world.remove_one::<PathFollower>(entity).is_ok() {
            log::debug!("{entity:?} abandoned its path");
        }
        true
    }

    pub fn set_target(&mut self, entity: Entity, target: Target) -> bool {
        let Ok(mut agent) = self.world.get_mut::<Agent>(entity) else {
            return false;
        };
        agent.set_target(target);
        true
    }

    /// Advance every agent by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.events.swap();

        let states: FxHashMap<Entity, (Vec3, Vec3)> = self
            .world
            .query::<&Agent>()
            .iter()
            .map(|(entity, agent)| (entity, (agent.position, agent.velocity)))
            .collect();

        let mut finished = Vec::new();
        for (entity, (agent, transform, follower)) in self
            .world
            .query_mut::<(&mut Agent, &mut Transform, Option<&mut PathFollower>)>()
        {
            if let Some(Target::Entity(target)) = agent.target() {
                match states.get(&target) {
                    Some(&(position, velocity)) => agent.resolve_target(position, velocity),
                    None => {
                        log::warn!("{entity:?} lost its target {target:?}");
                        agent.clear_target();
                    }
                }
            }

            if let Some(follower) = follower {
                let reached = follower.index();
                if follower.update(agent).is_some() {
                    let position = follower.waypoints().get(reached).copied().unwrap_or_default();
                    log::trace!("{entity:?} reached waypoint {reached} at {position}");
                    self.events.push(NavEvent::WaypointReached {
                        entity,
                        index: reached,
                        position,
                    });
                } else if follower.is_on_last() && agent.has_arrived() {
                    log::debug!("{entity:?} completed its path");
                    self.events.push(NavEvent::PathCompleted { entity });
                    finished.push(entity);
                }
            }

            agent.update(dt, &mut self.rng);
            *transform = Transform::from_yaw(agent.position, agent.yaw);
        }

        for entity in finished {
            if let Err(e) = self.world.remove_one::<PathFollower>(entity) {
                log::warn!("Could not detach follower from {entity:?}: {e}");
            }
        }
    }

    /// Events produced during the previous tick
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next regeneration,
    /// except for search settings which apply immediately.
    pub fn set_config(&mut self, config: SimConfig) {
        self.planner = PathPlanner::from_config(&config.pathfinding);
        self.config = config;
    }

    pub fn graph(&self) -> &GridGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut GridGraph {
        &mut self.graph
    }

    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    pub fn planner(&self) -> &PathPlanner {
        &self.planner
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn agent_count(&self) -> u32 {
        self.world.len()
    }

    /// Current position of an agent
    pub fn agent_position(&self, entity: Entity) -> Option<Vec3> {
        self.world.get::<Agent>(entity).ok().map(|agent| agent.position)
    }

    /// Is the agent still walking a path?
    pub fn is_following(&self, entity: Entity) -> bool {
        self.world.get::<PathFollower>(entity).is_ok()
    }
}
