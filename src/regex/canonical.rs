use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use petgraph::{Direction, graph::NodeIndex, visit::EdgeRef};

use crate::{
    automaton::{Alphabet, AutomatonNode, Language, Letter, decorate::decorate, dfa::Dfa},
    sample::{InputString, Label, Sample},
};

/// Canonical-form analysis of a minimal DFA.
///
/// All fields index states by their graph index, which for a compiled
/// expression matches breadth-first visitation order.
#[derive(Debug, Clone)]
pub struct CanonicalInfo<L: Letter> {
    /// Per state, the shortest input reaching it; ties go to the word found
    /// first from the start state.
    pub short_prefixes: Vec<Vec<L>>,
    /// The empty word plus every short prefix extended by one defined
    /// outgoing symbol; one entry per transition of the automaton.
    pub kernel: Vec<Vec<L>>,
    /// Per state, a shortest suffix leading to acceptance, if any.
    pub positive_suffixes: Vec<Option<Vec<L>>>,
    /// Per state, a shortest suffix leading to rejection. Falls back to a
    /// single symbol missing from the state's outgoing edges.
    pub negative_suffixes: Vec<Option<Vec<L>>>,
    /// Shortest suffix telling two states apart, keyed by the pair with the
    /// lower index first. States not in the map are not distinguishable.
    pub distinguishing: HashMap<(NodeIndex, NodeIndex), Vec<L>>,
    /// The minimal sample pinning down the automaton for a merge-based
    /// learner: a non-emptiness witness, one word per kernel entry, and one
    /// labeled pair per distinguishable (kernel entry, short prefix) pair.
    pub characteristic_sample: Sample<L>,
}

impl<L: Letter> CanonicalInfo<L> {
    pub fn analyze<N: AutomatonNode>(dfa: &Dfa<N, L>) -> CanonicalInfo<L> {
        assert!(dfa.get_start().is_some(), "DFA must have a start state");

        let short_prefixes = short_prefixes(dfa);
        let kernel = kernel(dfa, &short_prefixes);

        let positive_suffixes = dfa
            .graph
            .node_indices()
            .map(|state| shortest_suffix(dfa, state, true))
            .collect_vec();

        let negative_suffixes = dfa
            .graph
            .node_indices()
            .map(|state| {
                shortest_suffix(dfa, state, false).or_else(|| {
                    let outgoing = outgoing_symbols(dfa, state);
                    dfa.alphabet()
                        .iter()
                        .find(|symbol| !outgoing.contains(symbol))
                        .map(|symbol| vec![symbol.clone()])
                })
            })
            .collect_vec();

        let distinguishing = distinguishing_suffixes(dfa);

        let characteristic_sample = characteristic_sample(
            dfa,
            &short_prefixes,
            &kernel,
            &positive_suffixes,
            &negative_suffixes,
            &distinguishing,
        );

        CanonicalInfo {
            short_prefixes,
            kernel,
            positive_suffixes,
            negative_suffixes,
            distinguishing,
            characteristic_sample,
        }
    }
}

/// Shortest input per state via decoration: propagation appends the edge
/// symbol, the join keeps the shorter word and the incumbent on ties.
fn short_prefixes<N: AutomatonNode, L: Letter>(dfa: &Dfa<N, L>) -> Vec<Vec<L>> {
    let decorations = decorate(
        &dfa.graph,
        Direction::Outgoing,
        [(dfa.start(), Vec::new())],
        |prefix: &Vec<L>, symbol: &L| {
            let mut extended = prefix.clone();
            extended.push(symbol.clone());
            Some(extended)
        },
        |existing, incoming| {
            if existing.len() <= incoming.len() {
                existing.clone()
            } else {
                incoming.clone()
            }
        },
    );

    decorations
        .into_iter()
        .map(|prefix| prefix.expect("every state of a canonical DFA is reachable"))
        .collect()
}

fn kernel<N: AutomatonNode, L: Letter>(
    dfa: &Dfa<N, L>,
    short_prefixes: &[Vec<L>],
) -> Vec<Vec<L>> {
    let mut kernel = vec![vec![]];

    for state in dfa.graph.node_indices() {
        for symbol in outgoing_symbols(dfa, state) {
            let mut word = short_prefixes[state.index()].clone();
            word.push(symbol);
            kernel.push(word);
        }
    }

    kernel.into_iter().sorted().dedup().collect()
}

fn outgoing_symbols<N: AutomatonNode, L: Letter>(dfa: &Dfa<N, L>, state: NodeIndex) -> Vec<L> {
    dfa.graph
        .edges_directed(state, Direction::Outgoing)
        .map(|edge| edge.weight().clone())
        .sorted()
        .dedup()
        .collect()
}

/// Breadth-first search from `from` for the nearest state whose accepting
/// flag equals `accepting`, returning the input leading there. Distance zero
/// (the state itself) wins over everything else.
fn shortest_suffix<N: AutomatonNode, L: Letter>(
    dfa: &Dfa<N, L>,
    from: NodeIndex,
    accepting: bool,
) -> Option<Vec<L>> {
    if dfa.graph[from].accepting == accepting {
        return Some(vec![]);
    }

    let mut visited: HashSet<NodeIndex> = HashSet::new();
    visited.insert(from);
    let mut queue = VecDeque::from([(from, Vec::new())]);

    while let Some((state, suffix)) = queue.pop_front() {
        let targets = dfa
            .graph
            .edges_directed(state, Direction::Outgoing)
            .map(|edge| (edge.weight().clone(), edge.target()))
            .sorted()
            .collect_vec();

        for (symbol, target) in targets {
            if !visited.insert(target) {
                continue;
            }

            let mut extended = suffix.clone();
            extended.push(symbol);

            if dfa.graph[target].accepting == accepting {
                return Some(extended);
            }

            queue.push_back((target, extended));
        }
    }

    None
}

/// Backward breadth-first search over state pairs: every (accepting,
/// non-accepting) pair is distinguished by the empty suffix; a predecessor
/// pair along synchronized same-symbol edges is distinguished by the symbol
/// prepended to the pair's suffix. The first suffix found per pair is the
/// shortest.
fn distinguishing_suffixes<N: AutomatonNode, L: Letter>(
    dfa: &Dfa<N, L>,
) -> HashMap<(NodeIndex, NodeIndex), Vec<L>> {
    let mut matrix: HashMap<(NodeIndex, NodeIndex), Vec<L>> = HashMap::new();
    let mut queue = VecDeque::new();

    for accepting in dfa.graph.node_indices() {
        if !dfa.graph[accepting].accepting {
            continue;
        }
        for other in dfa.graph.node_indices() {
            if dfa.graph[other].accepting {
                continue;
            }
            let pair = normalize(accepting, other);
            matrix.insert(pair, vec![]);
            queue.push_back(pair);
        }
    }

    while let Some((p, q)) = queue.pop_front() {
        let suffix = matrix[&(p, q)].clone();

        for symbol in dfa.alphabet() {
            let p_predecessors = predecessors(dfa, p, symbol);
            let q_predecessors = predecessors(dfa, q, symbol);

            for &p_pred in &p_predecessors {
                for &q_pred in &q_predecessors {
                    if p_pred == q_pred {
                        continue;
                    }

                    let pair = normalize(p_pred, q_pred);
                    if matrix.contains_key(&pair) {
                        continue;
                    }

                    let mut extended = vec![symbol.clone()];
                    extended.extend(suffix.iter().cloned());
                    matrix.insert(pair, extended);
                    queue.push_back(pair);
                }
            }
        }
    }

    matrix
}

fn normalize(a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
    if a.index() <= b.index() { (a, b) } else { (b, a) }
}

fn predecessors<N: AutomatonNode, L: Letter>(
    dfa: &Dfa<N, L>,
    state: NodeIndex,
    symbol: &L,
) -> Vec<NodeIndex> {
    dfa.graph
        .edges_directed(state, Direction::Incoming)
        .filter(|edge| edge.weight() == symbol)
        .map(|edge| edge.source())
        .collect()
}

fn characteristic_sample<N: AutomatonNode, L: Letter>(
    dfa: &Dfa<N, L>,
    short_prefixes: &[Vec<L>],
    kernel: &[Vec<L>],
    positive_suffixes: &[Option<Vec<L>>],
    negative_suffixes: &[Option<Vec<L>>],
    distinguishing: &HashMap<(NodeIndex, NodeIndex), Vec<L>>,
) -> Sample<L> {
    let mut sample = Sample::new();
    let mut seen: HashSet<Vec<L>> = HashSet::new();

    let mut add = |word: Vec<L>| {
        if !seen.insert(word.clone()) {
            return;
        }
        let label = if dfa.accepts(word.iter()) {
            Label::Positive
        } else {
            Label::Negative
        };
        sample
            .insert(InputString::new(word, label))
            .expect("the automaton labels its own words consistently");
    };

    // non-emptiness witness: the shortest accepted word
    let witness = dfa
        .graph
        .node_indices()
        .filter(|&state| dfa.graph[state].accepting)
        .map(|state| &short_prefixes[state.index()])
        .min_by_key(|prefix| prefix.len());
    if let Some(witness) = witness {
        add(witness.clone());
    }

    // one word per kernel entry, witnessing the transition it encodes
    for entry in kernel {
        let Some(state) = dfa.walk(entry.iter()) else {
            continue;
        };

        let suffix = positive_suffixes[state.index()]
            .as_ref()
            .or(negative_suffixes[state.index()].as_ref());

        if let Some(suffix) = suffix {
            let mut word = entry.clone();
            word.extend(suffix.iter().cloned());
            add(word);
        }
    }

    // one labeled pair per distinguishable (kernel entry, short prefix) pair
    for entry in kernel {
        let Some(reached) = dfa.walk(entry.iter()) else {
            continue;
        };

        for state in dfa.graph.node_indices() {
            if state == reached {
                continue;
            }

            let Some(suffix) = distinguishing.get(&normalize(reached, state)) else {
                continue;
            };

            let mut from_entry = entry.clone();
            from_entry.extend(suffix.iter().cloned());
            add(from_entry);

            let mut from_prefix = short_prefixes[state.index()].clone();
            from_prefix.extend(suffix.iter().cloned());
            add(from_prefix);
        }
    }

    sample
}
