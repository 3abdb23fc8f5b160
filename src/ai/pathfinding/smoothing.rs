//! Line-of-sight path reduction

use super::graph::{GridGraph, NodeId};
use crate::physics::ObstacleProbe;

/// Reduce a node path to the waypoints needed around obstacles.
///
/// The first node is the initial anchor. Walking from the third node on, a
/// blocked segment from the anchor to the candidate keeps the node just
/// before the candidate, which becomes the new anchor. The last node is
/// always kept. Paths of two nodes or fewer come back unchanged.
#[must_use]
pub fn smooth_path<P: ObstacleProbe + ?Sized>(
    graph: &GridGraph,
    probe: &P,
    path: &[NodeId],
) -> Vec<NodeId> {
    let [first, .., last] = path else {
        return path.to_vec();
    };
    if path.len() <= 2 {
        return path.to_vec();
    }

    let mut smoothed = vec![*first];
    let mut anchor = *first;

    for (i, &candidate) in path.iter().enumerate().skip(2) {
        let (Some(from), Some(to)) = (graph.position(anchor), graph.position(candidate)) else {
            continue;
        };
        if probe.segment_blocked(from, to) {
            let keep = path[i - 1];
            smoothed.push(keep);
            anchor = keep;
        }
    }

    smoothed.push(*last);
    log::trace!("Smoothed path from {} to {} nodes", path.len(), smoothed.len());
    smoothed
}
