//! Grid graph pathfinding
//!
//! Graph generation over an obstacle field, A* over nodes or clusters,
//! hierarchical composition and line-of-sight smoothing.

mod frontier;
mod graph;
mod hierarchical;
mod search;
mod smoothing;

pub use frontier::OpenList;
pub use graph::{Cluster, ClusterId, GridCell, GridGraph, GridNode, NodeId};
pub use hierarchical::{PathPlanner, PlannedPath, SearchMode, cluster_members};
pub use search::{
    ClusterSpace, Heuristic, NodeSpace, SearchOptions, SearchOutcome, SearchSpace, SearchStatus,
    find_path, manhattan_distance,
};
pub use smoothing::smooth_path;
