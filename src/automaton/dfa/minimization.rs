use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use petgraph::{Direction, graph::NodeIndex, visit::EdgeRef};

use crate::automaton::{
    Alphabet, AutBuild, AutomatonNode, Letter,
    dfa::{Dfa, node::StateNode},
};

pub trait Minimizable {
    /// Produces an equivalent automaton with the minimal number of states.
    fn minimize(&self) -> Self;

    /// Alternate minimizer: iterated signature re-keying instead of
    /// partition refinement. Asymptotically slower, much easier to check by
    /// hand. Both minimizers must produce equivalent automata.
    fn minimize_scan(&self) -> Self;

    fn is_minimal(&self) -> bool;
}

impl<N: AutomatonNode + Default, L: Letter> Minimizable for Dfa<N, L> {
    fn minimize(&self) -> Self {
        let prepared = prepare(self);
        let partition = hopcroft_partition(&prepared);
        quotient(&prepared, partition)
    }

    fn minimize_scan(&self) -> Self {
        let prepared = prepare(self);
        let partition = scan_partition(&prepared);
        quotient(&prepared, partition)
    }

    fn is_minimal(&self) -> bool {
        self.minimize().state_count() == self.state_count()
    }
}

/// Minimization preamble: drop unreachable states, then complete with a sink
/// so every partition class has full out-degree over the alphabet.
fn prepare<N: AutomatonNode + Default, L: Letter>(dfa: &Dfa<N, L>) -> Dfa<N, L> {
    assert!(dfa.get_start().is_some(), "DFA must have a start state");

    let mut prepared = dfa.clone();
    prepared.strip_unreachable();
    prepared.complete_with_sink(N::default());
    prepared
}

/// Hopcroft partition refinement. Blocks are kept as sorted index vectors so
/// that block identity is plain equality.
fn hopcroft_partition<N: AutomatonNode, L: Letter>(dfa: &Dfa<N, L>) -> Vec<Vec<NodeIndex>> {
    let (accepting, rest): (Vec<NodeIndex>, Vec<NodeIndex>) = dfa
        .graph
        .node_indices()
        .partition(|&n| dfa.graph[n].accepting);

    let mut partition: Vec<Vec<NodeIndex>> = [accepting, rest]
        .into_iter()
        .filter(|block| !block.is_empty())
        .collect();

    let mut worklist: VecDeque<Vec<NodeIndex>> = partition.iter().cloned().collect();

    while let Some(splitter) = worklist.pop_front() {
        for symbol in dfa.alphabet() {
            // all states with an edge labeled `symbol` into the splitter
            let mut reverse_image = HashSet::new();
            for &state in &splitter {
                for edge in dfa.graph.edges_directed(state, Direction::Incoming) {
                    if edge.weight() == symbol {
                        reverse_image.insert(edge.source());
                    }
                }
            }

            if reverse_image.is_empty() {
                continue;
            }

            let mut next_partition = Vec::with_capacity(partition.len());

            for block in partition.drain(..) {
                let (inside, outside): (Vec<NodeIndex>, Vec<NodeIndex>) = block
                    .iter()
                    .copied()
                    .partition(|n| reverse_image.contains(n));

                if inside.is_empty() || outside.is_empty() {
                    next_partition.push(block);
                    continue;
                }

                // block straddles the reverse image: split it, and keep the
                // worklist consistent. A block still pending is replaced by
                // both halves; otherwise only the smaller half is enqueued.
                if let Some(pos) = worklist.iter().position(|pending| *pending == block) {
                    worklist.remove(pos);
                    worklist.push_back(inside.clone());
                    worklist.push_back(outside.clone());
                } else if inside.len() <= outside.len() {
                    worklist.push_back(inside.clone());
                } else {
                    worklist.push_back(outside.clone());
                }

                next_partition.push(inside);
                next_partition.push(outside);
            }

            partition = next_partition;
        }
    }

    partition
}

/// The scan minimizer: every state is keyed by its current class and the
/// classes of its per-symbol successors; re-keying repeats until the number
/// of distinct keys stabilizes.
fn scan_partition<N: AutomatonNode, L: Letter>(dfa: &Dfa<N, L>) -> Vec<Vec<NodeIndex>> {
    let node_count = dfa.graph.node_count();

    let mut class: Vec<usize> = dfa
        .graph
        .node_indices()
        .map(|n| usize::from(dfa.graph[n].accepting))
        .collect();
    let mut class_count = class.iter().collect::<HashSet<_>>().len();

    loop {
        let mut keys: HashMap<(usize, Vec<usize>), usize> = HashMap::new();
        let mut next_class = vec![0; node_count];

        for node in dfa.graph.node_indices() {
            let successors = dfa
                .alphabet()
                .iter()
                .map(|symbol| {
                    let target = dfa
                        .successor(node, symbol)
                        .expect("DFA must be complete to minimize");
                    class[target.index()]
                })
                .collect::<Vec<_>>();

            let key = (class[node.index()], successors);
            let fresh = keys.len();
            next_class[node.index()] = *keys.entry(key).or_insert(fresh);
        }

        let next_count = keys.len();
        class = next_class;

        if next_count == class_count {
            break;
        }
        class_count = next_count;
    }

    let mut blocks: Vec<Vec<NodeIndex>> = vec![vec![]; class_count];
    for node in dfa.graph.node_indices() {
        blocks[class[node.index()]].push(node);
    }
    blocks.retain(|block| !block.is_empty());
    blocks
}

/// Builds the quotient automaton: one state per block, flags ORed over the
/// members, one transition per distinct `(block, symbol)` pair through an
/// arbitrary representative. Dead blocks (non-accepting, all self-loops) are
/// pruned afterwards.
fn quotient<N: AutomatonNode, L: Letter>(
    dfa: &Dfa<N, L>,
    partition: Vec<Vec<NodeIndex>>,
) -> Dfa<N, L> {
    let mut block_of = vec![0usize; dfa.graph.node_count()];
    for (block_id, block) in partition.iter().enumerate() {
        for &member in block {
            block_of[member.index()] = block_id;
        }
    }

    let mut minimized = Dfa::new(dfa.alphabet().to_vec());
    let mut block_states = Vec::with_capacity(partition.len());

    for block in &partition {
        let accepting = block.iter().any(|&n| dfa.graph[n].accepting);
        let error = block.iter().any(|&n| dfa.graph[n].error);
        let representative = block[0];
        let state = minimized.add_state(StateNode::new(
            accepting,
            error,
            dfa.graph[representative].data.clone(),
        ));
        block_states.push(state);
    }

    minimized.set_start(block_states[block_of[dfa.start().index()]]);

    for (block_id, block) in partition.iter().enumerate() {
        let representative = block[0];
        for symbol in dfa.alphabet() {
            let target = dfa
                .successor(representative, symbol)
                .expect("DFA must be complete to minimize");
            minimized.add_transition(
                block_states[block_id],
                block_states[block_of[target.index()]],
                symbol.clone(),
            );
        }
    }

    // prune dead blocks: a non-accepting state whose transitions all loop
    // back to itself can never contribute to acceptance
    let dead = minimized
        .graph
        .node_indices()
        .filter(|&n| {
            !minimized.graph[n].accepting
                && n != minimized.start()
                && minimized
                    .graph
                    .edges_directed(n, Direction::Outgoing)
                    .all(|edge| edge.target() == n)
        })
        .collect::<Vec<_>>();

    if dead.is_empty() {
        minimized.set_complete_unchecked();
    } else {
        minimized
            .drop_states(&dead)
            .expect("dead states come from the quotient itself");
    }

    minimized
}
