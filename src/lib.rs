//! Grid navigation for agents moving on a plane
//!
//! This crate provides:
//! - Grid graph generation over a rapier3d obstacle world
//! - A* search over nodes or coarse clusters, with line-of-sight smoothing
//! - Path following and steering behaviors for agents stored in hecs
//! - A session type that ties them together and reports events

pub mod ai;
pub mod core;
pub mod ecs;
pub mod physics;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use rapier3d;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::pathfinding::{
        GridGraph, Heuristic, NodeId, PathPlanner, PlannedPath, SearchMode, SearchStatus,
    };
    pub use crate::ai::{Agent, Behavior, MotionModel, PathFollower, Target};
    pub use crate::core::{NavEvent, SimConfig, Simulation};
    pub use crate::ecs::{Name, Transform, World};
    pub use crate::physics::{ObstacleProbe, Physics};
    pub use glam::Vec3;
}
