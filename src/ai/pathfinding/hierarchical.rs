//! Flat and two-level path planning
//!
//! In cluster mode the coarse search picks a chain of clusters, and the
//! node search is confined to the members of those clusters. A node path
//! that needs a cluster off that chain is not found; that is the price of
//! the smaller search space.

use glam::Vec3;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::graph::{ClusterId, GridGraph, NodeId};
use super::search::{
    ClusterSpace, NodeSpace, SearchOptions, SearchOutcome, SearchStatus, find_path,
};
use super::smoothing::smooth_path;
use crate::core::PathfindingConfig;
use crate::physics::ObstacleProbe;

/// Which graph levels a plan searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchMode {
    /// Node graph only
    #[default]
    Manhattan,
    /// Cluster graph first, then the node graph inside the chosen clusters
    Clusters,
}

/// Result of [`PathPlanner::plan`]
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPath {
    /// Coarse search, present in cluster mode when both endpoints have a cluster
    pub cluster_search: Option<SearchOutcome<ClusterId>>,
    /// Node search
    pub node_search: SearchOutcome<NodeId>,
    /// Final route: the smoothed node path, or the raw one with smoothing off
    pub route: Vec<NodeId>,
}

impl PlannedPath {
    /// A plan that failed before or during the node search
    #[must_use]
    pub fn failed(cluster_search: Option<SearchOutcome<ClusterId>>, status: SearchStatus) -> Self {
        Self {
            cluster_search,
            node_search: SearchOutcome::failed(status),
            route: Vec::new(),
        }
    }

    /// Check if a route was found
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.node_search.is_found()
    }

    /// World positions of the route
    #[must_use]
    pub fn waypoints(&self, graph: &GridGraph) -> Vec<Vec3> {
        self.route
            .iter()
            .filter_map(|id| graph.position(*id))
            .collect()
    }
}

/// Composes cluster search, node search and smoothing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPlanner {
    pub mode: SearchMode,
    pub options: SearchOptions,
    pub smoothing: bool,
}

impl PathPlanner {
    /// Create a planner with default search options and smoothing on
    #[must_use]
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            options: SearchOptions::default(),
            smoothing: true,
        }
    }

    /// Build a planner from configuration
    #[must_use]
    pub fn from_config(config: &PathfindingConfig) -> Self {
        Self {
            mode: config.mode,
            options: SearchOptions {
                heuristic: config.heuristic,
                admissible: config.admissible,
            },
            smoothing: config.smoothing,
        }
    }

    /// Set whether routes are smoothed
    #[must_use]
    pub fn with_smoothing(mut self, smoothing: bool) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Plan a route between two nodes
    pub fn plan<P: ObstacleProbe + ?Sized>(
        &self,
        graph: &GridGraph,
        probe: &P,
        start: NodeId,
        goal: NodeId,
    ) -> PlannedPath {
        let (cluster_search, node_search) = match self.mode {
            SearchMode::Manhattan => (None, self.find_node_path(graph, start, goal, None)),
            SearchMode::Clusters => {
                let Some(clusters) = self.find_cluster_path(graph, start, goal) else {
                    log::warn!("Cluster search needs both {start:?} and {goal:?} in a cluster");
                    return PlannedPath::failed(None, SearchStatus::InvalidEndpoint);
                };
                if !clusters.is_found() {
                    let status = clusters.status;
                    return PlannedPath::failed(Some(clusters), status);
                }

                let allowed = cluster_members(graph, &clusters.path);
                let nodes = self.find_node_path(graph, start, goal, Some(&allowed));
                (Some(clusters), nodes)
            }
        };

        let route = if self.smoothing {
            smooth_path(graph, probe, &node_search.path)
        } else {
            node_search.path.clone()
        };

        PlannedPath {
            cluster_search,
            node_search,
            route,
        }
    }

    /// Node-level search, optionally confined to `restrict`
    #[must_use]
    pub fn find_node_path(
        &self,
        graph: &GridGraph,
        start: NodeId,
        goal: NodeId,
        restrict: Option<&FxHashSet<NodeId>>,
    ) -> SearchOutcome<NodeId> {
        find_path(&NodeSpace(graph), start, goal, &self.options, restrict)
    }

    /// Cluster-level search between the clusters owning `start` and `goal`.
    ///
    /// Returns `None` when either node is missing or has no cluster.
    #[must_use]
    pub fn find_cluster_path(
        &self,
        graph: &GridGraph,
        start: NodeId,
        goal: NodeId,
    ) -> Option<SearchOutcome<ClusterId>> {
        let start_cluster = graph.node(start)?.cluster()?;
        let goal_cluster = graph.node(goal)?.cluster()?;
        Some(find_path(
            &ClusterSpace(graph),
            start_cluster,
            goal_cluster,
            &self.options,
            None,
        ))
    }
}

impl Default for PathPlanner {
    fn default() -> Self {
        Self::new(SearchMode::default())
    }
}

/// Every member node of the given clusters
#[must_use]
pub fn cluster_members(graph: &GridGraph, clusters: &[ClusterId]) -> FxHashSet<NodeId> {
    clusters
        .iter()
        .filter_map(|id| graph.cluster(*id))
        .flat_map(|cluster| cluster.members().iter().copied())
        .collect()
}
