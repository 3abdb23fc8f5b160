//! Simulation configuration
//!
//! Loaded from RON (preferred) or JSON. Every field has a default, so a
//! config file only needs to name what it changes.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ai::MotionModel;
use crate::ai::pathfinding::{Heuristic, SearchMode};

/// Layout of the navigation grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: i32,
    pub columns: i32,
    /// Distance between neighboring nodes
    pub cell_size: f32,
    /// World-space center of the grid
    pub origin: Vec3,
    /// Probe obstacles while generating
    pub check_collisions: bool,
    /// Half extent of the box probed at each node
    pub node_clearance: f32,
    /// Partition into square clusters of this many nodes per side
    pub cluster_block: Option<usize>,
}

impl GridConfig {
    #[must_use]
    pub fn with_size(mut self, rows: i32, columns: i32) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }

    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_collisions(mut self, check_collisions: bool) -> Self {
        self.check_collisions = check_collisions;
        self
    }

    #[must_use]
    pub fn with_node_clearance(mut self, node_clearance: f32) -> Self {
        self.node_clearance = node_clearance;
        self
    }

    #[must_use]
    pub fn with_cluster_block(mut self, block: Option<usize>) -> Self {
        self.cluster_block = block;
        self
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 1,
            columns: 1,
            cell_size: 1.0,
            origin: Vec3::ZERO,
            check_collisions: true,
            node_clearance: 0.5,
            cluster_block: None,
        }
    }
}

/// Search settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindingConfig {
    pub mode: SearchMode,
    pub heuristic: Heuristic,
    pub admissible: bool,
    pub smoothing: bool,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::Manhattan,
            heuristic: Heuristic::Manhattan,
            admissible: true,
            smoothing: true,
        }
    }
}

/// Defaults applied to spawned agents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub max_speed: f32,
    /// Turn rate limit in degrees per second
    pub max_degrees_delta: f32,
    pub model: MotionModel,
    pub slow_radius: f32,
    pub stop_radius: f32,
    pub wander_degrees: f32,
    pub wander_interval: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_speed: 4.0,
            max_degrees_delta: 360.0,
            model: MotionModel::Steering,
            slow_radius: 2.0,
            stop_radius: 0.25,
            wander_degrees: 45.0,
            wander_interval: 0.75,
        }
    }
}

/// An axis-aligned box obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub center: Vec3,
    pub half_extents: Vec3,
}

/// Top-level simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub grid: GridConfig,
    pub pathfinding: PathfindingConfig,
    pub agent: AgentConfig,
    /// Agents wrap around past this distance from the world origin
    pub max_offset: Option<f32>,
    /// Seed for behavior randomness
    pub seed: u64,
    pub obstacles: Vec<ObstacleConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            pathfinding: PathfindingConfig::default(),
            agent: AgentConfig::default(),
            max_offset: Some(40.0),
            seed: 0,
            obstacles: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Parse a config from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }

    /// Save the config to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Save the config to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }

    /// Load by extension: `.json` as JSON, anything else as RON
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::load_json(path),
            _ => Self::load_ron(path),
        }
    }
}

/// Errors that can occur while loading or saving configuration
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization_ron() {
        let mut config = SimConfig::default();
        config.grid = config.grid.with_size(8, 12).with_cluster_block(Some(4));
        config.pathfinding.mode = SearchMode::Clusters;
        config.obstacles.push(ObstacleConfig {
            center: Vec3::new(1.0, 0.0, 2.0),
            half_extents: Vec3::splat(0.5),
        });

        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        assert!(ron_str.contains("Clusters"));

        let loaded = SimConfig::from_ron_str(&ron_str).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_serialization_json() {
        let mut config = SimConfig::default();
        config.agent.model = MotionModel::Kinematic;
        config.pathfinding.heuristic = Heuristic::Weighted(2.0);

        let json_str = serde_json::to_string(&config).unwrap();

        let loaded: SimConfig = serde_json::from_str(&json_str).unwrap();
        assert_eq!(loaded.agent.model, MotionModel::Kinematic);
        assert_eq!(loaded.pathfinding.heuristic, Heuristic::Weighted(2.0));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = SimConfig::from_ron_str("(grid: (rows: 5, columns: 7), seed: 9)").unwrap();

        assert_eq!(config.grid.rows, 5);
        assert_eq!(config.grid.columns, 7);
        assert_eq!(config.grid.cell_size, 1.0);
        assert!((config.grid.node_clearance - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.seed, 9);
        assert_eq!(config.pathfinding, PathfindingConfig::default());
        assert_eq!(config.max_offset, Some(40.0));
    }

    #[test]
    fn test_bundled_demo_config() {
        let config = SimConfig::from_ron_str(include_str!("../../configs/demo.ron")).unwrap();
        assert_eq!(config.grid.cluster_block, Some(4));
        assert_eq!(config.pathfinding.mode, SearchMode::Clusters);
        assert_eq!(config.obstacles.len(), 3);
    }

    #[test]
    fn test_invalid_config() {
        let error = SimConfig::from_ron_str("(grid: 3)").unwrap_err();
        assert!(matches!(error, ConfigError::DeserializeError(_)));

        let error = SimConfig::load_ron("does/not/exist.ron").unwrap_err();
        assert!(error.to_string().starts_with("IO error"));
    }
}
