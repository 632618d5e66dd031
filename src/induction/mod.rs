//! Grammar induction: learning a DFA from a labeled sample by merging
//! states of its prefix tree acceptor.
//!
//! The search state is a [`UnionFind`] over PTA state ids whose group data
//! records each group's flags and outgoing transitions. Trial merges run
//! inside union-find transactions; an incompatible merge is a sentinel
//! result, not an error, and is undone by rollback.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use petgraph::{Direction, visit::EdgeRef};

use crate::{
    automaton::{
        AutBuild, Letter,
        dfa::{Dfa, node::StateNode},
    },
    induction::union_find::UnionFind,
};

pub mod blue_fringe;
pub mod pta;
pub mod rpni;
pub mod union_find;

pub use blue_fringe::BlueFringe;
pub use pta::build_pta;
pub use rpni::Rpni;

/// The per-group record of the merge search: the merged flags of the group's
/// PTA states, a representative `master` id, and the group's outgoing
/// transitions. The `BTreeMap` keeps delta traversal in symbol order, which
/// makes the whole search deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupData<L: Letter> {
    pub initial: bool,
    pub accepting: bool,
    pub error: bool,
    pub master: usize,
    pub delta: BTreeMap<L, usize>,
}

/// One singleton group per PTA state, with delta built from its outgoing
/// edges.
pub fn seed_union_find<L: Letter>(pta: &Dfa<(), L>) -> UnionFind<GroupData<L>> {
    UnionFind::new(pta.graph.node_indices().map(|node| {
        let delta = pta
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| (edge.weight().clone(), edge.target().index()))
            .collect();

        GroupData {
            initial: node == pta.start(),
            accepting: pta.graph[node].accepting,
            error: pta.graph[node].error,
            master: node.index(),
            delta,
        }
    }))
}

/// Merges the groups of `a` and `b` and determinizes the result: whenever
/// the combined delta maps one symbol to two different targets, those
/// targets are forced to merge as well, transitively.
///
/// Returns `None` if any involved group would become both accepting and
/// error. This is the incompatibility sentinel; the union-find is left
/// partially refined and the caller rolls back. On success returns the
/// merge score: the number of unified pairs that agreed on an accepting or
/// error flag, the heuristic BlueFringe ranks candidates by.
pub fn merge_groups<L: Letter>(
    uf: &mut UnionFind<GroupData<L>>,
    a: usize,
    b: usize,
) -> Option<usize> {
    let mut score = 0;
    let mut pending = vec![(a, b)];

    while let Some((a, b)) = pending.pop() {
        let leader_a = uf.find(a);
        let leader_b = uf.find(b);
        if leader_a == leader_b {
            continue;
        }

        let data_a = uf.data(leader_a).clone();
        let data_b = uf.data(leader_b).clone();

        let accepting = data_a.accepting || data_b.accepting;
        let error = data_a.error || data_b.error;
        if accepting && error {
            return None;
        }

        if (data_a.accepting && data_b.accepting) || (data_a.error && data_b.error) {
            score += 1;
        }

        // delta union; a symbol mapped to two different targets keeps the
        // lower one and forces the pair to merge
        let mut delta = data_a.delta.clone();
        for (symbol, target) in data_b.delta {
            match delta.get_mut(&symbol) {
                Some(existing) => {
                    if *existing != target {
                        pending.push((*existing, target));
                        *existing = (*existing).min(target);
                    }
                }
                None => {
                    delta.insert(symbol, target);
                }
            }
        }

        uf.union(
            leader_a,
            leader_b,
            GroupData {
                initial: data_a.initial || data_b.initial,
                accepting,
                error,
                master: data_a.master.min(data_b.master),
                delta,
            },
        );
    }

    Some(score)
}

/// The quotient DFA of the current partition: one state per surviving
/// leader, its group's accepting flag, and its delta with every target
/// resolved to its leader. The error flag is evidence for the search, not
/// part of the learned language, and is dropped here.
pub fn quotient<L: Letter>(uf: &UnionFind<GroupData<L>>, alphabet: Vec<L>) -> Dfa<(), L> {
    let mut dfa = Dfa::new(alphabet);
    let mut states = HashMap::new();

    for leader in uf.leaders() {
        let data = uf.data(leader);
        let state = dfa.add_state(StateNode::new(data.accepting, false, ()));
        if data.initial {
            dfa.set_start(state);
        }
        states.insert(leader, state);
    }

    for leader in uf.leaders() {
        for (symbol, target) in &uf.data(leader).delta {
            dfa.add_transition(
                states[&leader],
                states[&uf.find(*target)],
                symbol.clone(),
            );
        }
    }

    dfa
}
