//! Best-first (A*) search over node or cluster graphs

use std::fmt;
use std::hash::Hash;

use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::frontier::OpenList;
use super::graph::{ClusterId, GridGraph, NodeId};

/// Manhattan distance on the XZ plane
#[must_use]
pub fn manhattan_distance(a: Vec3, b: Vec3) -> f32 {
    (a.x - b.x).abs() + (a.z - b.z).abs()
}

/// Graph view a search can walk
pub trait SearchSpace {
    /// Element identity
    type Id: Copy + Eq + Hash + fmt::Debug;

    /// Position of an element, `None` if it isn't in the graph
    fn position(&self, id: Self::Id) -> Option<Vec3>;

    /// Outgoing neighbors of an element
    fn neighbors(&self, id: Self::Id) -> &[Self::Id];
}

/// Node-level view of a [`GridGraph`]
#[derive(Debug, Clone, Copy)]
pub struct NodeSpace<'a>(pub &'a GridGraph);

impl SearchSpace for NodeSpace<'_> {
    type Id = NodeId;

    fn position(&self, id: NodeId) -> Option<Vec3> {
        self.0.position(id)
    }

    fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.0.neighbors(id)
    }
}

/// Cluster-level view of a [`GridGraph`]
#[derive(Debug, Clone, Copy)]
pub struct ClusterSpace<'a>(pub &'a GridGraph);

impl SearchSpace for ClusterSpace<'_> {
    type Id = ClusterId;

    fn position(&self, id: ClusterId) -> Option<Vec3> {
        self.0.cluster(id).map(|cluster| cluster.position)
    }

    fn neighbors(&self, id: ClusterId) -> &[ClusterId] {
        self.0.cluster_neighbors(id)
    }
}

/// Remaining-cost estimate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Heuristic {
    /// |dx| + |dz|, admissible with Manhattan edge costs
    #[default]
    Manhattan,
    /// Always zero (uniform-cost search)
    Zero,
    /// Manhattan scaled by a factor; overestimates when the factor is above 1
    Weighted(f32),
}

impl Heuristic {
    /// Estimate the cost from `from` to `goal`
    #[must_use]
    pub fn estimate(self, from: Vec3, goal: Vec3) -> f32 {
        match self {
            Self::Manhattan => manhattan_distance(from, goal),
            Self::Zero => 0.0,
            Self::Weighted(weight) => manhattan_distance(from, goal) * weight,
        }
    }
}

/// Per-search settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub heuristic: Heuristic,
    /// Stop as soon as the goal is popped. When off, the search keeps
    /// expanding until no frontier entry has a lower g than the goal. The
    /// goal's cost is fixed once it is closed, so the extra expansions never
    /// change the route; with an overestimating heuristic the route may be
    /// longer than the cheapest one.
    pub admissible: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::Manhattan,
            admissible: true,
        }
    }
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Goal reached, path is valid
    Found,
    /// Frontier exhausted without closing the goal
    Unreachable,
    /// Start or goal is not part of the graph
    InvalidEndpoint,
}

/// Result of a search, including the final open and closed lists
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<Id> {
    pub status: SearchStatus,
    /// Start to goal inclusive; empty unless `status` is `Found`
    pub path: Vec<Id>,
    /// Cost of `path` (0 when not found)
    pub cost: f32,
    /// Frontier left when the search stopped, front to back
    pub open: Vec<Id>,
    /// Expanded elements in expansion order
    pub closed: Vec<Id>,
}

impl<Id> SearchOutcome<Id> {
    /// A failed search that expanded nothing
    #[must_use]
    pub fn failed(status: SearchStatus) -> Self {
        Self {
            status,
            path: Vec::new(),
            cost: 0.0,
            open: Vec::new(),
            closed: Vec::new(),
        }
    }

    /// Check if a path was found
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.status == SearchStatus::Found
    }
}

/// Ephemeral bookkeeping for one search call
struct SearchState<Id> {
    g_costs: FxHashMap<Id, f32>,
    came_from: FxHashMap<Id, Id>,
    open: OpenList<Id>,
    closed: Vec<Id>,
    closed_set: FxHashSet<Id>,
}

impl<Id: Copy + Eq + Hash> SearchState<Id> {
    fn new(start: Id, start_f: f32) -> Self {
        let mut state = Self {
            g_costs: FxHashMap::default(),
            came_from: FxHashMap::default(),
            open: OpenList::new(),
            closed: Vec::new(),
            closed_set: FxHashSet::default(),
        };
        state.g_costs.insert(start, 0.0);
        state.open.push(start, start_f);
        state
    }

    fn g(&self, id: Id) -> f32 {
        self.g_costs.get(&id).copied().unwrap_or(f32::INFINITY)
    }

    fn is_closed(&self, id: Id) -> bool {
        self.closed_set.contains(&id)
    }

    /// Returns `false` if the element was already closed
    fn close(&mut self, id: Id) -> bool {
        if !self.closed_set.insert(id) {
            return false;
        }
        self.closed.push(id);
        true
    }

    /// No frontier entry can still beat the goal's cost
    fn goal_is_settled(&self, goal: Id) -> bool {
        let g_goal = self.g(goal);
        self.open.iter().all(|id| self.g(id) >= g_goal)
    }

    fn relax(&mut self, id: Id, parent: Id, g: f32, f: f32) {
        self.g_costs.insert(id, g);
        self.came_from.insert(id, parent);
        self.open.push(id, f);
    }

    fn reconstruct(&self, start: Id, goal: Id) -> Vec<Id> {
        let mut path = vec![goal];
        let mut current = goal;
        while current != start {
            match self.came_from.get(&current) {
                Some(&previous) => {
                    path.push(previous);
                    current = previous;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

/// Find a path from `start` to `goal`.
///
/// When `restrict` is given, neighbors outside the set are never relaxed.
/// Edge cost is the Manhattan distance between positions, so diagonal
/// steps cost more than axis steps.
#[must_use]
pub fn find_path<S: SearchSpace>(
    space: &S,
    start: S::Id,
    goal: S::Id,
    options: &SearchOptions,
    restrict: Option<&FxHashSet<S::Id>>,
) -> SearchOutcome<S::Id> {
    let (Some(start_pos), Some(goal_pos)) = (space.position(start), space.position(goal)) else {
        log::warn!("Search endpoints {start:?} -> {goal:?} are not in the graph");
        return SearchOutcome::failed(SearchStatus::InvalidEndpoint);
    };

    let heuristic = options.heuristic;
    let mut state = SearchState::new(start, heuristic.estimate(start_pos, goal_pos));
    let mut solved = false;

    while let Some(current) = state.open.pop() {
        // Stale duplicate of an element expanded earlier
        if !state.close(current) {
            continue;
        }

        if current == goal && options.admissible {
            solved = true;
            break;
        }

        if state.is_closed(goal) && state.goal_is_settled(goal) {
            break;
        }

        let Some(current_pos) = space.position(current) else {
            continue;
        };
        let g_current = state.g(current);

        for &neighbor in space.neighbors(current) {
            if restrict.is_some_and(|set| !set.contains(&neighbor)) {
                continue;
            }
            if state.is_closed(neighbor) {
                continue;
            }
            let Some(neighbor_pos) = space.position(neighbor) else {
                continue;
            };

            let g_neighbor = g_current + manhattan_distance(current_pos, neighbor_pos);
            if state
                .g_costs
                .get(&neighbor)
                .is_none_or(|&known| g_neighbor < known)
            {
                let f_neighbor = g_neighbor + heuristic.estimate(neighbor_pos, goal_pos);
                state.relax(neighbor, current, g_neighbor, f_neighbor);
            }
        }
    }

    solved |= state.is_closed(goal);

    let outcome = if solved {
        SearchOutcome {
            status: SearchStatus::Found,
            path: state.reconstruct(start, goal),
            cost: state.g(goal),
            open: state.open.iter().collect(),
            closed: state.closed,
        }
    } else {
        SearchOutcome {
            status: SearchStatus::Unreachable,
            path: Vec::new(),
            cost: 0.0,
            open: Vec::new(),
            closed: state.closed,
        }
    };

    log::debug!(
        "Search {start:?} -> {goal:?}: {:?}, {} expanded, cost {:.2}",
        outcome.status,
        outcome.closed.len(),
        outcome.cost
    );
    outcome
}
