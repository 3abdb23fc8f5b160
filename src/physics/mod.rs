//! Obstacle queries for navigation
//!
//! Built on top of rapier3d

mod probe;
mod world;

pub use probe::{ObstacleProbe, OpenField};
pub use world::{ColliderHandle, Physics, RaycastHit};
