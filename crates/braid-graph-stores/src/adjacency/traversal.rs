//! Bounded breadth-first chain traversal over an adjacency index.

use std::collections::{HashSet, VecDeque};

use braid_core::types::ChainResult;

use super::index::AdjacencyIndex;

/// Walk outgoing edges from `start` for at most `max_hops` hops.
///
/// Nodes are marked visited when dequeued, not when enqueued. A node reached
/// from several parents before its first dequeue is therefore emitted once per
/// reaching edge, but expanded only once. Emission follows adjacency insertion
/// order, so results are in first-discovery order and hop distances are not
/// guaranteed to be shortest paths.
///
/// Each result's `path` runs from `start` up to the node the edge left from.
pub fn traverse_chain(
    index: &AdjacencyIndex,
    start: &str,
    max_hops: usize,
    min_strength: f32,
) -> Vec<ChainResult> {
    let mut results = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut frontier: VecDeque<(String, usize, Vec<String>)> = VecDeque::new();
    frontier.push_back((start.to_string(), 0, vec![start.to_string()]));

    while let Some((id, hops, path)) = frontier.pop_front() {
        if !visited.insert(id.clone()) {
            continue;
        }
        if hops >= max_hops {
            continue;
        }

        for link in index.links(&id) {
            if link.strength < min_strength || visited.contains(&link.to_id) {
                continue;
            }

            results.push(ChainResult {
                id: link.to_id.clone(),
                path: path.clone(),
                link_type: link.link_type,
                link_strength: link.strength,
                hop_distance: hops + 1,
                discovered_at: link.created_at,
            });

            let mut next_path = path.clone();
            next_path.push(link.to_id.clone());
            frontier.push_back((link.to_id.clone(), hops + 1, next_path));
        }
    }

    results
}
