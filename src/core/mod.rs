//! Core module
//!
//! Contains the navigation session, its configuration, and events

mod config;
mod events;
mod session;

pub use config::{
    AgentConfig, ConfigError, GridConfig, ObstacleConfig, PathfindingConfig, SimConfig,
};
pub use events::{EventQueue, NavEvent};
pub use session::Simulation;
