use std::collections::VecDeque;

use hashbrown::HashSet;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

/// Generic worklist fixpoint propagation over a graph.
///
/// Each node carries an optional decoration of type `D`. The worklist is
/// seeded with the given `(node, decoration)` pairs. Popping a node walks
/// every edge in `direction` (outgoing for [`Direction::Outgoing`], incoming
/// for [`Direction::Incoming`]), computes `propagate(decoration, edge_weight)`
/// for the node at the far end, joins the result with that node's current
/// decoration via `supremum`, and re-enqueues the node if the joined value
/// differs from what it had (nodes already queued are not queued twice).
/// The loop ends when the worklist is empty.
///
/// Termination is a caller contract: `supremum` must be monotone and must not
/// produce an unbounded chain of distinct values per node. Nothing here
/// verifies that; a misbehaving join loops forever.
///
/// `propagate` returning `None` means the edge does not transport the
/// decoration and is skipped.
pub fn decorate<N, E, D>(
    graph: &DiGraph<N, E>,
    direction: Direction,
    seeds: impl IntoIterator<Item = (NodeIndex, D)>,
    mut propagate: impl FnMut(&D, &E) -> Option<D>,
    mut supremum: impl FnMut(&D, &D) -> D,
) -> Vec<Option<D>>
where
    D: Clone + PartialEq,
{
    let mut decorations: Vec<Option<D>> = vec![None; graph.node_count()];
    let mut worklist = VecDeque::new();
    let mut queued = HashSet::new();

    for (node, decoration) in seeds {
        let slot = &mut decorations[node.index()];
        let joined = match slot {
            Some(current) => supremum(current, &decoration),
            None => decoration,
        };
        if slot.as_ref() != Some(&joined) {
            *slot = Some(joined);
            if queued.insert(node) {
                worklist.push_back(node);
            }
        }
    }

    while let Some(node) = worklist.pop_front() {
        queued.remove(&node);

        let current = decorations[node.index()]
            .clone()
            .expect("queued nodes are decorated");

        for edge in graph.edges_directed(node, direction) {
            let far = match direction {
                Direction::Outgoing => edge.target(),
                Direction::Incoming => edge.source(),
            };

            let Some(propagated) = propagate(&current, edge.weight()) else {
                continue;
            };

            let slot = &mut decorations[far.index()];
            let joined = match slot {
                Some(existing) => supremum(existing, &propagated),
                None => propagated,
            };

            if slot.as_ref() != Some(&joined) {
                *slot = Some(joined);
                if queued.insert(far) {
                    worklist.push_back(far);
                }
            }
        }
    }

    decorations
}

/// The set of nodes reachable from `starts` following edges in `direction`.
pub fn reachable_from<N, E>(
    graph: &DiGraph<N, E>,
    starts: impl IntoIterator<Item = NodeIndex>,
    direction: Direction,
) -> HashSet<NodeIndex> {
    let decorations = decorate(
        graph,
        direction,
        starts.into_iter().map(|n| (n, ())),
        |_, _| Some(()),
        |_, _| (),
    );

    decorations
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_some())
        .map(|(i, _)| NodeIndex::new(i))
        .collect()
}

/// The minimal number of edges from `start` to each node, `None` for
/// unreachable nodes.
pub fn state_depths<N, E>(graph: &DiGraph<N, E>, start: NodeIndex) -> Vec<Option<usize>> {
    decorate(
        graph,
        Direction::Outgoing,
        [(start, 0usize)],
        |depth, _| Some(depth + 1),
        |a, b| *a.min(b),
    )
}
