//! Grid graph: nodes, clusters and obstacle-aware generation
//!
//! Nodes and clusters live in arenas owned by [`GridGraph`]. Ids are stable
//! indices into those arenas; removing an element leaves a vacant slot so the
//! remaining ids stay valid. Cross references (adjacency, cluster membership,
//! a node's owning cluster) are plain ids and never own anything.

use glam::Vec3;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::GridConfig;
use crate::physics::ObstacleProbe;

/// Neighbor offsets in (row, column), in the order edges are created.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Stable handle to a node in a [`GridGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Stable handle to a cluster in a [`GridGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub usize);

/// Grid coordinates of a generated node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: i32,
    pub column: i32,
}

/// A single traversable point
#[derive(Debug, Clone)]
pub struct GridNode {
    /// World position (cost only looks at X and Z)
    pub position: Vec3,
    /// Cell this node was generated for, `None` for hand-placed nodes
    cell: Option<GridCell>,
    /// Outgoing edges in creation order
    adjacency: SmallVec<[NodeId; 8]>,
    /// Owning cluster (lookup only)
    cluster: Option<ClusterId>,
}

impl GridNode {
    fn new(position: Vec3, cell: Option<GridCell>) -> Self {
        Self {
            position,
            cell,
            adjacency: SmallVec::new(),
            cluster: None,
        }
    }

    /// Grid cell, if the node came from grid generation
    #[must_use]
    pub fn cell(&self) -> Option<GridCell> {
        self.cell
    }

    /// Outgoing neighbors in creation order
    #[must_use]
    pub fn neighbors(&self) -> &[NodeId] {
        &self.adjacency
    }

    /// Cluster this node belongs to
    #[must_use]
    pub fn cluster(&self) -> Option<ClusterId> {
        self.cluster
    }
}

/// A group of nodes used by the coarse level of hierarchical search
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Representative position for heuristic and edge cost
    pub position: Vec3,
    /// Aggregate traversal cost (not read by search)
    pub cost: f32,
    members: Vec<NodeId>,
    adjacent: Vec<ClusterId>,
}

impl Cluster {
    fn new(position: Vec3) -> Self {
        Self {
            position,
            cost: 0.0,
            members: Vec::new(),
            adjacent: Vec::new(),
        }
    }

    /// Member nodes
    #[must_use]
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// Adjacent clusters
    #[must_use]
    pub fn neighbors(&self) -> &[ClusterId] {
        &self.adjacent
    }
}

/// Cell lookup table from the last generation pass
#[derive(Debug, Clone, Default)]
struct GridLayout {
    rows: usize,
    columns: usize,
    cells: Vec<Option<NodeId>>,
}

impl GridLayout {
    fn index(&self, row: i32, column: i32) -> Option<usize> {
        let (row, column) = (usize::try_from(row).ok()?, usize::try_from(column).ok()?);
        (row < self.rows && column < self.columns).then_some(row * self.columns + column)
    }

    fn get(&self, row: i32, column: i32) -> Option<NodeId> {
        self.index(row, column).and_then(|i| self.cells[i])
    }
}

/// Owns every node and cluster of the navigation graph
#[derive(Debug, Clone, Default)]
pub struct GridGraph {
    nodes: Vec<Option<GridNode>>,
    clusters: Vec<Option<Cluster>>,
    layout: GridLayout,
}

impl GridGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a grid description
    #[must_use]
    pub fn generated<P: ObstacleProbe + ?Sized>(config: &GridConfig, probe: &P) -> Self {
        let mut graph = Self::new();
        graph.generate(config, probe);
        graph
    }

    /// Remove every node and cluster
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.clusters.clear();
        self.layout = GridLayout::default();
    }

    /// Rebuild the graph from scratch.
    ///
    /// Nodes are laid out on a grid centred on `config.origin`, rows along +Z
    /// and columns along +X. With collision checks on, cells whose box overlaps
    /// an obstacle are skipped and edges whose segment hits one are dropped.
    /// Each node only records its own outgoing edges; the mirrored scan from
    /// the neighbor adds the reverse edge.
    pub fn generate<P: ObstacleProbe + ?Sized>(&mut self, config: &GridConfig, probe: &P) {
        self.clear();

        let rows = usize::try_from(config.rows).unwrap_or(0);
        let columns = usize::try_from(config.columns).unwrap_or(0);
        if rows == 0 || columns == 0 {
            log::debug!("Grid {}x{} is empty, no nodes generated", config.rows, config.columns);
            return;
        }

        let size = config.cell_size;
        let width = (columns - 1) as f32 * size;
        let height = (rows - 1) as f32 * size;
        let corner = config.origin - Vec3::new(width / 2.0, 0.0, height / 2.0);
        let half_extents = Vec3::splat(config.node_clearance);

        let mut layout = GridLayout {
            rows,
            columns,
            cells: vec![None; rows * columns],
        };

        // First pass: place nodes
        let mut skipped = 0usize;
        for row in 0..rows {
            for column in 0..columns {
                let position = corner + Vec3::new(column as f32 * size, 0.0, row as f32 * size);
                if config.check_collisions && probe.box_blocked(position, half_extents) {
                    skipped += 1;
                    continue;
                }

                let cell = GridCell {
                    row: row as i32,
                    column: column as i32,
                };
                let id = self.push_node(GridNode::new(position, Some(cell)));
                layout.cells[row * columns + column] = Some(id);
            }
        }

        // Second pass: edges
        for row in 0..rows as i32 {
            for column in 0..columns as i32 {
                let Some(id) = layout.get(row, column) else {
                    continue;
                };
                let Some(from) = self.position(id) else {
                    continue;
                };

                for (dr, dc) in NEIGHBOR_OFFSETS {
                    let Some(neighbor) = layout.get(row + dr, column + dc) else {
                        continue;
                    };
                    let Some(to) = self.position(neighbor) else {
                        continue;
                    };
                    if config.check_collisions && probe.segment_blocked(from, to) {
                        continue;
                    }
                    if let Some(node) = self.node_mut(id) {
                        node.adjacency.push(neighbor);
                    }
                }
            }
        }

        self.layout = layout;
        log::debug!(
            "Generated {}x{} grid: {} nodes, {} edges, {} cells blocked",
            rows,
            columns,
            self.len(),
            self.edge_count(),
            skipped
        );
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// Add a free-standing node with no edges
    pub fn add_node(&mut self, position: Vec3) -> NodeId {
        self.push_node(GridNode::new(position, None))
    }

    fn push_node(&mut self, node: GridNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(node));
        id
    }

    /// Add a directed edge. Returns `false` if either end is missing, the
    /// edge is a self loop, or it already exists.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> bool {
        if from == to || !self.contains(to) {
            return false;
        }
        match self.node_mut(from) {
            Some(node) if !node.adjacency.contains(&to) => {
                node.adjacency.push(to);
                true
            }
            _ => false,
        }
    }

    /// Remove a node and every reference to it. Unknown ids are ignored.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get_mut(id.0).and_then(Option::take) else {
            return false;
        };

        // Edges are not guaranteed symmetric, so every list is scanned
        for other in self.nodes.iter_mut().flatten() {
            other.adjacency.retain(|n| *n != id);
        }

        if let Some(cluster) = node.cluster.and_then(|c| self.cluster_mut(c)) {
            cluster.members.retain(|n| *n != id);
        }

        if let Some(cell) = node.cell {
            if let Some(index) = self.layout.index(cell.row, cell.column) {
                self.layout.cells[index] = None;
            }
        }

        true
    }

    /// Does the graph hold this node?
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Look up a node
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&GridNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut GridNode> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Position of a node
    #[must_use]
    pub fn position(&self, id: NodeId) -> Option<Vec3> {
        self.node(id).map(|node| node.position)
    }

    /// Outgoing neighbors of a node (empty for unknown ids)
    #[must_use]
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(GridNode::neighbors).unwrap_or_default()
    }

    /// Iterate live nodes in id order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &GridNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| node.as_ref().map(|node| (NodeId(i), node)))
    }

    /// Node generated for a grid cell
    #[must_use]
    pub fn node_at(&self, row: i32, column: i32) -> Option<NodeId> {
        self.layout.get(row, column)
    }

    /// Node closest to a world point on the XZ plane
    #[must_use]
    pub fn nearest_node(&self, point: Vec3) -> Option<NodeId> {
        self.nodes()
            .map(|(id, node)| {
                let dx = node.position.x - point.x;
                let dz = node.position.z - point.z;
                (id, dx * dx + dz * dz)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Number of live nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// Whether the graph has no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of directed edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().flatten().map(|n| n.adjacency.len()).sum()
    }

    /// True when every edge has its reverse edge
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.nodes()
            .all(|(id, node)| node.adjacency.iter().all(|n| self.neighbors(*n).contains(&id)))
    }

    // ------------------------------------------------------------------
    // Clusters
    // ------------------------------------------------------------------

    /// Add an empty cluster
    pub fn add_cluster(&mut self, position: Vec3) -> ClusterId {
        let id = ClusterId(self.clusters.len());
        self.clusters.push(Some(Cluster::new(position)));
        id
    }

    /// Make `node` a member of `cluster`, leaving any previous cluster
    pub fn assign_to_cluster(&mut self, node: NodeId, cluster: ClusterId) -> bool {
        if !self.contains_cluster(cluster) {
            return false;
        }
        let Some(previous) = self.node(node).map(GridNode::cluster) else {
            return false;
        };
        if previous == Some(cluster) {
            return true;
        }

        if let Some(old) = previous.and_then(|c| self.cluster_mut(c)) {
            old.members.retain(|n| *n != node);
        }
        if let Some(new) = self.cluster_mut(cluster) {
            new.members.push(node);
        }
        if let Some(n) = self.node_mut(node) {
            n.cluster = Some(cluster);
        }
        true
    }

    /// Add a directed cluster edge
    pub fn connect_clusters(&mut self, from: ClusterId, to: ClusterId) -> bool {
        if from == to || !self.contains_cluster(to) {
            return false;
        }
        match self.cluster_mut(from) {
            Some(cluster) if !cluster.adjacent.contains(&to) => {
                cluster.adjacent.push(to);
                true
            }
            _ => false,
        }
    }

    /// Remove a cluster. Members stay in the graph without a cluster.
    pub fn remove_cluster(&mut self, id: ClusterId) -> bool {
        let Some(cluster) = self.clusters.get_mut(id.0).and_then(Option::take) else {
            return false;
        };

        for other in self.clusters.iter_mut().flatten() {
            other.adjacent.retain(|c| *c != id);
        }
        for member in cluster.members {
            if let Some(node) = self.node_mut(member) {
                node.cluster = None;
            }
        }
        true
    }

    /// Does the graph hold this cluster?
    #[must_use]
    pub fn contains_cluster(&self, id: ClusterId) -> bool {
        self.cluster(id).is_some()
    }

    /// Look up a cluster
    #[must_use]
    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id.0).and_then(Option::as_ref)
    }

    fn cluster_mut(&mut self, id: ClusterId) -> Option<&mut Cluster> {
        self.clusters.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Adjacent clusters (empty for unknown ids)
    #[must_use]
    pub fn cluster_neighbors(&self, id: ClusterId) -> &[ClusterId] {
        self.cluster(id).map(Cluster::neighbors).unwrap_or_default()
    }

    /// Iterate live clusters in id order
    pub fn clusters(&self) -> impl Iterator<Item = (ClusterId, &Cluster)> {
        self.clusters
            .iter()
            .enumerate()
            .filter_map(|(i, cluster)| cluster.as_ref().map(|cluster| (ClusterId(i), cluster)))
    }

    /// Number of live clusters
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.clusters.iter().flatten().count()
    }

    /// Replace all clusters with square blocks of `block` x `block` cells.
    ///
    /// Each cluster sits at the centroid of its members. Two clusters are
    /// linked when any node edge crosses between them, in the edge's
    /// direction. Hand-placed nodes without a cell are left unclustered.
    /// Returns the number of clusters created.
    pub fn partition_clusters(&mut self, block: usize) -> usize {
        self.clusters.clear();
        for node in self.nodes.iter_mut().flatten() {
            node.cluster = None;
        }
        let Ok(block) = i32::try_from(block) else {
            return 0;
        };
        if block == 0 {
            return 0;
        }

        let mut by_block: FxHashMap<(i32, i32), ClusterId> = FxHashMap::default();
        let cells: Vec<(NodeId, GridCell)> = self
            .nodes()
            .filter_map(|(id, node)| node.cell.map(|cell| (id, cell)))
            .collect();

        for (id, cell) in cells {
            let key = (cell.row.div_euclid(block), cell.column.div_euclid(block));
            let cluster = match by_block.get(&key) {
                Some(&cluster) => cluster,
                None => {
                    let cluster = self.add_cluster(Vec3::ZERO);
                    by_block.insert(key, cluster);
                    cluster
                }
            };
            self.assign_to_cluster(id, cluster);
        }

        let centroids: Vec<(ClusterId, Vec3)> = self
            .clusters()
            .map(|(id, cluster)| {
                let sum: Vec3 = cluster
                    .members
                    .iter()
                    .filter_map(|m| self.position(*m))
                    .sum();
                (id, sum / cluster.members.len().max(1) as f32)
            })
            .collect();
        for (id, centroid) in centroids {
            if let Some(cluster) = self.cluster_mut(id) {
                cluster.position = centroid;
            }
        }

        let crossings: Vec<(ClusterId, ClusterId)> = self
            .nodes()
            .flat_map(|(_, node)| {
                node.adjacency
                    .iter()
                    .filter_map(|n| Some((node.cluster?, self.node(*n)?.cluster?)))
                    .collect::<Vec<_>>()
            })
            .filter(|(a, b)| a != b)
            .collect();
        for (from, to) in crossings {
            self.connect_clusters(from, to);
        }

        let count = self.cluster_count();
        log::debug!("Partitioned {} nodes into {} clusters", self.len(), count);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::pathfinding::{NodeSpace, SearchOptions, find_path};
    use crate::physics::{OpenField, Physics};

    fn grid(rows: i32, columns: i32) -> GridConfig {
        GridConfig::default().with_size(rows, columns)
    }

    #[test]
    fn test_empty_grid() {
        for (rows, columns) in [(0, 5), (5, 0), (-2, 3), (0, 0)] {
            let graph = GridGraph::generated(&grid(rows, columns), &OpenField);
            assert!(graph.is_empty());
            assert_eq!(graph.edge_count(), 0);
        }
    }

    #[test]
    fn test_open_grid_layout() {
        let graph = GridGraph::generated(&grid(3, 3), &OpenField);
        assert_eq!(graph.len(), 9);
        // 4 corners x 3 + 4 edges x 5 + centre x 8
        assert_eq!(graph.edge_count(), 40);
        assert!(graph.is_symmetric());

        // Centred on the origin, columns along X, rows along Z
        let corner = graph.node_at(0, 0).unwrap();
        assert_eq!(graph.position(corner), Some(Vec3::new(-1.0, 0.0, -1.0)));
        let far = graph.node_at(2, 2).unwrap();
        assert_eq!(graph.position(far), Some(Vec3::new(1.0, 0.0, 1.0)));
        let along_x = graph.node_at(0, 1).unwrap();
        assert_eq!(graph.position(along_x), Some(Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_scaled_offset_layout() {
        let config = grid(3, 3)
            .with_cell_size(2.0)
            .with_origin(Vec3::new(10.0, 0.0, 5.0));
        let graph = GridGraph::generated(&config, &OpenField);

        let first = graph.node_at(0, 0).unwrap();
        let centre = graph.node_at(1, 1).unwrap();
        let last = graph.node_at(2, 2).unwrap();
        assert_eq!(graph.position(first), Some(Vec3::new(8.0, 0.0, 3.0)));
        assert_eq!(graph.position(centre), Some(Vec3::new(10.0, 0.0, 5.0)));
        assert_eq!(graph.position(last), Some(Vec3::new(12.0, 0.0, 7.0)));
        assert_eq!(
            graph.position(graph.node_at(0, 2).unwrap()),
            Some(Vec3::new(12.0, 0.0, 3.0))
        );

        let outcome = find_path(&NodeSpace(&graph), first, last, &SearchOptions::default(), None);
        assert_eq!(outcome.path, vec![first, centre, last]);
        assert!((outcome.cost - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_adjacency_scan_order() {
        let graph = GridGraph::generated(&grid(3, 3), &OpenField);
        let centre = graph.node_at(1, 1).unwrap();
        let expected: Vec<NodeId> = [(1, 2), (1, 0), (2, 1), (0, 1), (2, 2), (2, 0), (0, 2), (0, 0)]
            .into_iter()
            .map(|(r, c)| graph.node_at(r, c).unwrap())
            .collect();
        assert_eq!(graph.neighbors(centre), expected.as_slice());
    }

    #[test]
    fn test_obstacle_skips_cell() {
        let mut physics = Physics::new();
        physics.add_obstacle(Vec3::ZERO, Vec3::new(0.25, 1.0, 0.25));

        let graph = GridGraph::generated(&grid(3, 3), &physics);
        assert_eq!(graph.len(), 8);
        assert!(graph.node_at(1, 1).is_none());
        assert!(graph.is_symmetric());
    }

    #[test]
    fn test_obstacle_prunes_edges_without_removing_nodes() {
        // A thin wall between rows 0 and 1 that doesn't cover any cell box
        let mut physics = Physics::new();
        physics.add_obstacle(Vec3::new(0.0, 0.0, -0.5), Vec3::new(5.0, 1.0, 0.02));

        let config = grid(3, 3).with_node_clearance(0.4);
        let graph = GridGraph::generated(&config, &physics);
        assert_eq!(graph.len(), 9);

        let top = graph.node_at(0, 1).unwrap();
        let below = graph.node_at(1, 1).unwrap();
        assert!(!graph.neighbors(top).contains(&below));
        assert!(!graph.neighbors(below).contains(&top));
        assert!(graph.neighbors(top).contains(&graph.node_at(0, 0).unwrap()));
    }

    #[test]
    fn test_collision_checks_disabled() {
        let mut physics = Physics::new();
        physics.add_obstacle(Vec3::ZERO, Vec3::splat(0.5));

        let config = grid(3, 3).with_collisions(false);
        let graph = GridGraph::generated(&config, &physics);
        assert_eq!(graph.len(), 9);
        assert_eq!(graph.edge_count(), 40);
    }

    #[test]
    fn test_regenerate_replaces_everything() {
        let mut graph = GridGraph::generated(&grid(4, 4), &OpenField);
        graph.partition_clusters(2);
        let extra = graph.add_node(Vec3::splat(10.0));

        graph.generate(&grid(2, 2), &OpenField);
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.cluster_count(), 0);
        assert!(!graph.contains(extra));
    }

    #[test]
    fn test_isolated_node_is_kept() {
        let mut graph = GridGraph::generated(&grid(2, 2), &OpenField);
        let lonely = graph.add_node(Vec3::new(50.0, 0.0, 50.0));
        assert!(graph.contains(lonely));
        assert!(graph.neighbors(lonely).is_empty());
    }

    #[test]
    fn test_connect_is_directed() {
        let mut graph = GridGraph::new();
        let a = graph.add_node(Vec3::ZERO);
        let b = graph.add_node(Vec3::X);

        assert!(graph.connect(a, b));
        assert!(!graph.connect(a, b));
        assert!(!graph.connect(a, a));
        assert!(!graph.connect(a, NodeId(99)));
        assert_eq!(graph.neighbors(a), &[b]);
        assert!(graph.neighbors(b).is_empty());
        assert!(!graph.is_symmetric());
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut graph = GridGraph::generated(&grid(3, 3), &OpenField);
        graph.partition_clusters(3);
        let centre = graph.node_at(1, 1).unwrap();
        let cluster = graph.node(centre).unwrap().cluster().unwrap();

        // One-way edge into the centre from a hand-placed node
        let outsider = graph.add_node(Vec3::new(5.0, 0.0, 5.0));
        graph.connect(outsider, centre);

        assert!(graph.remove_node(centre));
        assert!(!graph.contains(centre));
        assert!(graph.node_at(1, 1).is_none());
        assert!(graph.nodes().all(|(_, n)| !n.neighbors().contains(&centre)));
        assert!(!graph.cluster(cluster).unwrap().members().contains(&centre));

        // Second removal is a no-op
        assert!(!graph.remove_node(centre));
        assert_eq!(graph.len(), 9);
    }

    #[test]
    fn test_remove_cluster_cascades() {
        let mut graph = GridGraph::generated(&grid(2, 4), &OpenField);
        assert_eq!(graph.partition_clusters(2), 2);
        let (left, right) = (ClusterId(0), ClusterId(1));
        assert_eq!(graph.cluster_neighbors(left), &[right]);

        assert!(graph.remove_cluster(right));
        assert!(!graph.remove_cluster(right));
        assert!(graph.cluster_neighbors(left).is_empty());
        assert!(graph.nodes().all(|(_, n)| n.cluster() != Some(right)));
        assert_eq!(graph.cluster_count(), 1);
    }

    #[test]
    fn test_assign_moves_between_clusters() {
        let mut graph = GridGraph::new();
        let node = graph.add_node(Vec3::ZERO);
        let a = graph.add_cluster(Vec3::ZERO);
        let b = graph.add_cluster(Vec3::X);

        assert!(graph.assign_to_cluster(node, a));
        assert!(graph.assign_to_cluster(node, b));
        assert!(graph.cluster(a).unwrap().members().is_empty());
        assert_eq!(graph.cluster(b).unwrap().members(), &[node]);
        assert_eq!(graph.node(node).unwrap().cluster(), Some(b));

        assert!(!graph.assign_to_cluster(NodeId(7), a));
        assert!(!graph.assign_to_cluster(node, ClusterId(7)));
    }

    #[test]
    fn test_partition_clusters() {
        let mut graph = GridGraph::generated(&grid(4, 4), &OpenField);
        assert_eq!(graph.partition_clusters(2), 4);

        for (_, cluster) in graph.clusters() {
            assert_eq!(cluster.members().len(), 4);
            // Diagonal edges link every block to every other block
            assert_eq!(cluster.neighbors().len(), 3);
        }

        let first = graph.cluster(ClusterId(0)).unwrap();
        assert!((first.position - Vec3::new(-1.0, 0.0, -1.0)).length() < 1e-5);
        assert!(graph.nodes().all(|(_, n)| n.cluster().is_some()));
    }

    #[test]
    fn test_nearest_node() {
        let graph = GridGraph::generated(&grid(3, 3), &OpenField);
        let nearest = graph.nearest_node(Vec3::new(0.9, 3.0, 1.2)).unwrap();
        assert_eq!(Some(nearest), graph.node_at(2, 2));
        assert!(GridGraph::new().nearest_node(Vec3::ZERO).is_none());
    }
}
