use petgraph::{Direction, graph::NodeIndex};

use crate::automaton::{
    Alphabet, AutomatonNode, Letter,
    decorate::decorate,
    dfa::Dfa,
};

/// Structural equivalence of two canonical DFAs.
///
/// Both operands are assumed deterministic; behavior on nondeterministic
/// input is unspecified. Two automata are equivalent iff they agree on state
/// and edge counts and alphabet, their start states agree on the
/// accepting/error flags, and a single decoration pass mapping every
/// reachable state of `a` to a counterpart state of `b` completes without
/// conflict. A conflict is a missing same-symbol edge on either side, a
/// state mapped to two different counterparts, or a flag mismatch between
/// mapped states.
///
/// For language-level comparison of non-canonical automata see
/// [`crate::validation::same_language`].
pub fn equivalent<NA, NB, L>(a: &Dfa<NA, L>, b: &Dfa<NB, L>) -> bool
where
    NA: AutomatonNode,
    NB: AutomatonNode,
    L: Letter,
{
    if a.state_count() != b.state_count() || a.edge_count() != b.edge_count() {
        return false;
    }
    if a.alphabet() != b.alphabet() {
        return false;
    }

    let (start_a, start_b) = match (a.get_start(), b.get_start()) {
        (Some(sa), Some(sb)) => (sa, sb),
        (None, None) => return true,
        _ => return false,
    };

    let node_a = &a.graph[start_a];
    let node_b = &b.graph[start_b];
    if node_a.accepting != node_b.accepting || node_a.error != node_b.error {
        return false;
    }

    // The decoration of a state of `a` is its counterpart in `b`. The join
    // poisons on disagreement, propagation poisons on a missing edge; both
    // amount to "the pass failed".
    let poison = NodeIndex::end();

    let counterparts = decorate(
        &a.graph,
        Direction::Outgoing,
        [(start_a, start_b)],
        |counterpart, symbol| {
            if *counterpart == poison {
                Some(poison)
            } else {
                Some(b.successor(*counterpart, symbol).unwrap_or(poison))
            }
        },
        |d0, d1| if d0 == d1 { *d0 } else { poison },
    );

    for (index, counterpart) in counterparts.iter().enumerate() {
        let Some(counterpart) = counterpart else {
            continue;
        };
        if *counterpart == poison {
            return false;
        }

        let node_a = &a.graph[NodeIndex::new(index)];
        let node_b = &b.graph[*counterpart];
        if node_a.accepting != node_b.accepting || node_a.error != node_b.error {
            return false;
        }

        // every edge of `a` must have a same-symbol counterpart edge;
        // equal edge counts then rule out extras on `b`'s side
        for symbol in a.alphabet() {
            let has_a = a.successor(NodeIndex::new(index), symbol).is_some();
            let has_b = b.successor(*counterpart, symbol).is_some();
            if has_a != has_b {
                return false;
            }
        }
    }

    true
}
