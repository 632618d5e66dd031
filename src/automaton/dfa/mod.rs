use std::{collections::VecDeque, fmt::Debug};

use hashbrown::HashMap;
use itertools::Itertools;
use node::StateNode;
use petgraph::{
    Direction,
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};

use crate::{
    Error, Result,
    automaton::{Alphabet, AutBuild, AutomatonNode, Language, Letter, decorate},
};

pub mod minimization;
pub mod node;

/// A deterministic finite automaton.
///
/// States and edges live in an owned [`DiGraph`]; every cross-reference is a
/// graph index, never a pointer. Adding states or edges never invalidates
/// existing indices; removals compact the index space in one pass.
#[derive(Clone)]
pub struct Dfa<N: AutomatonNode, L: Letter> {
    start: Option<NodeIndex>,
    pub graph: DiGraph<StateNode<N>, L>,
    alphabet: Vec<L>,
    complete: bool,
}

impl<N: AutomatonNode, L: Letter> Dfa<N, L> {
    pub fn new(alphabet: Vec<L>) -> Self {
        Dfa {
            alphabet,
            start: None,
            graph: DiGraph::new(),
            complete: false,
        }
    }

    pub fn set_start(&mut self, start: NodeIndex) {
        self.start = Some(start);
    }

    pub fn get_start(&self) -> Option<NodeIndex> {
        self.start
    }

    pub fn start(&self) -> NodeIndex {
        self.start.expect("DFA must have a start state")
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Marks the DFA as complete without checking. Useful when completeness
    /// is known by construction.
    pub fn set_complete_unchecked(&mut self) {
        self.complete = true;
    }

    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn get_state(&self, state: NodeIndex) -> Option<&StateNode<N>> {
        self.graph.node_weight(state)
    }

    /// Looks up the first state whose payload satisfies `pred`, in index
    /// order.
    pub fn find_state(&self, pred: impl Fn(&StateNode<N>) -> bool) -> Option<NodeIndex> {
        self.graph.node_indices().find(|&n| pred(&self.graph[n]))
    }

    /// The unique successor of `state` under `symbol`, if any.
    pub fn successor(&self, state: NodeIndex, symbol: &L) -> Option<NodeIndex> {
        self.graph
            .edges_directed(state, Direction::Outgoing)
            .find(|edge| edge.weight() == symbol)
            .map(|edge| edge.target())
    }

    /// Runs the automaton over `input` from the start state. Returns the
    /// state reached, or `None` if a transition is missing.
    pub fn walk<'a>(&self, input: impl IntoIterator<Item = &'a L>) -> Option<NodeIndex>
    where
        L: 'a,
    {
        let mut current = self.start();
        for symbol in input {
            current = self.successor(current, symbol)?;
        }
        Some(current)
    }

    /// Splits `word` against the automaton: follows transitions from the
    /// start state as far as possible and returns the last state reached
    /// together with the unmatched suffix.
    pub fn split<'w>(&self, word: &'w [L]) -> (NodeIndex, &'w [L]) {
        let mut current = self.start();

        for (i, symbol) in word.iter().enumerate() {
            match self.successor(current, symbol) {
                Some(next) => current = next,
                None => return (current, &word[i..]),
            }
        }

        (current, &word[word.len()..])
    }

    /// Adds a transition, failing if the endpoints are invalid or the edge
    /// would make the automaton nondeterministic.
    pub fn try_add_transition(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        label: L,
    ) -> Result<EdgeIndex> {
        if self.graph.node_weight(from).is_none() {
            return Err(Error::InvalidArgument(format!(
                "source state {:?} does not exist",
                from
            )));
        }
        if self.graph.node_weight(to).is_none() {
            return Err(Error::InvalidArgument(format!(
                "target state {:?} does not exist",
                to
            )));
        }

        let existing = self
            .graph
            .edges_directed(from, Direction::Outgoing)
            .find(|edge| *edge.weight() == label);
        if let Some(edge) = existing {
            let target = edge.target();
            if target != to {
                return Err(Error::InvalidArgument(format!(
                    "transition conflict: {:?} -{:?}-> {:?} already exists, cannot also go to {:?}",
                    from,
                    label,
                    target,
                    to
                )));
            }
        }

        Ok(self.graph.add_edge(from, to, label))
    }

    /// Removes the given states in a single compacting pass. Surviving
    /// states keep their relative order and are renumbered exactly once,
    /// not once per removed state.
    pub fn drop_states(&mut self, states: &[NodeIndex]) -> Result<()> {
        for &state in states {
            if self.graph.node_weight(state).is_none() {
                return Err(Error::InvalidArgument(format!(
                    "state {:?} does not exist",
                    state
                )));
            }
        }

        let doomed: hashbrown::HashSet<NodeIndex> = states.iter().copied().collect();
        self.rebuild_keeping(|n| !doomed.contains(&n));
        Ok(())
    }

    /// Removes the given edges in a single compacting pass. Surviving edges
    /// are renumbered once, keeping their relative order; state indices are
    /// untouched.
    pub fn drop_edges(&mut self, edges: &[EdgeIndex]) -> Result<()> {
        for &edge in edges {
            if self.graph.edge_weight(edge).is_none() {
                return Err(Error::InvalidArgument(format!(
                    "edge {:?} does not exist",
                    edge
                )));
            }
        }

        let doomed: hashbrown::HashSet<EdgeIndex> = edges.iter().copied().collect();
        let mut rebuilt = DiGraph::new();

        for node in self.graph.node_indices() {
            rebuilt.add_node(self.graph[node].clone());
        }
        for edge in self.graph.edge_references() {
            if !doomed.contains(&edge.id()) {
                rebuilt.add_edge(edge.source(), edge.target(), edge.weight().clone());
            }
        }

        self.graph = rebuilt;
        self.complete = false;
        Ok(())
    }

    pub fn drop_edge(&mut self, edge: EdgeIndex) -> Result<()> {
        self.drop_edges(&[edge])
    }

    /// Rebuilds the graph with only the states satisfying `keep`, in index
    /// order, dropping edges touching removed states. One compacting
    /// renumbering pass.
    fn rebuild_keeping(&mut self, keep: impl Fn(NodeIndex) -> bool) {
        let mut rebuilt = DiGraph::new();
        let mut mapping = HashMap::new();
        let mut new_start = None;

        for node in self.graph.node_indices() {
            if !keep(node) {
                continue;
            }
            let new_node = rebuilt.add_node(self.graph[node].clone());
            mapping.insert(node, new_node);
            if Some(node) == self.start {
                new_start = Some(new_node);
            }
        }

        for edge in self.graph.edge_references() {
            if let (Some(&from), Some(&to)) =
                (mapping.get(&edge.source()), mapping.get(&edge.target()))
            {
                rebuilt.add_edge(from, to, edge.weight().clone());
            }
        }

        self.graph = rebuilt;
        self.start = new_start;
        self.complete = false;
    }

    /// Adds a sink state if any transition is missing. This turns the DFA
    /// into a complete DFA, which some algorithms need. Returns the sink if
    /// one was added.
    pub fn complete_with_sink(&mut self, data: N) -> Option<NodeIndex> {
        let mut missing = Vec::new();

        for state in self.graph.node_indices() {
            for letter in self.alphabet.iter() {
                if self.successor(state, letter).is_none() {
                    missing.push((state, letter.clone()));
                }
            }
        }

        if missing.is_empty() {
            self.complete = true;
            return None;
        }

        let sink = self.add_state(StateNode::non_accepting(data));

        for (state, letter) in missing {
            self.add_transition(state, sink, letter);
        }

        for letter in self.alphabet.clone() {
            self.add_transition(sink, sink, letter);
        }

        self.complete = true;

        Some(sink)
    }

    /// Assert that the DFA is complete, meaning every state has a transition
    /// for every letter in the alphabet. Panics otherwise.
    pub fn assert_complete(&self) {
        for state in self.graph.node_indices() {
            for letter in self.alphabet.iter() {
                assert!(
                    self.successor(state, letter).is_some(),
                    "DFA is not complete. State {:?} has no transition for {:?}",
                    state,
                    letter
                );
            }
        }
    }

    /// Inverts self, creating a new DFA where the accepting states are
    /// flipped. The DFA must have a start state and be complete.
    ///
    /// See [`Dfa::invert_mut`] for a version that modifies in place.
    pub fn invert(&self) -> Dfa<N, L> {
        assert!(self.start.is_some(), "DFA must have a start state");
        assert!(self.complete, "DFA must be complete to invert");

        let mut inverted = Dfa::new(self.alphabet.clone());
        for node in self.graph.node_indices() {
            let new_node = inverted.add_state(self.graph[node].invert());

            if node == self.start() {
                inverted.set_start(new_node);
            }
        }

        for edge in self.graph.edge_references() {
            inverted.add_transition(edge.source(), edge.target(), edge.weight().clone());
        }

        inverted.set_complete_unchecked();

        inverted
    }

    /// Inverts self in place. The DFA must be complete.
    pub fn invert_mut(&mut self) {
        assert!(self.complete, "DFA must be complete to invert");

        for node in self.graph.node_indices() {
            self.graph[node].invert_mut();
        }
    }

    /// The complement automaton: complete with a sink, then flip every
    /// accepting flag.
    pub fn complement(&self) -> Dfa<N, L>
    where
        N: Default,
    {
        let mut result = self.clone();
        result.complete_with_sink(N::default());
        result.invert_mut();
        result
    }

    /// Builds the synchronized product of two deterministic automata.
    ///
    /// The product runs over the union of both alphabets. On a symbol that
    /// is missing from one operand's alphabet, that operand passes through
    /// unchanged; an operand that has the symbol in its alphabet but no
    /// matching edge blocks the combination, which is then simply never
    /// materialized. A product state is accepting when both components are.
    ///
    /// With identical alphabets this is plain intersection.
    pub fn intersect<NO: AutomatonNode>(&self, other: &Dfa<NO, L>) -> Dfa<N, L> {
        assert!(self.start.is_some(), "Self must have a start state");
        assert!(other.start.is_some(), "Other must have a start state");

        let mut union_alphabet = self.alphabet.clone();
        union_alphabet.extend(other.alphabet.iter().cloned());
        union_alphabet.sort();
        union_alphabet.dedup();

        let self_start = self.start();
        let other_start = other.start();

        // state map from combinations of states to the new product states
        let mut state_map = HashMap::new();
        let mut stack = vec![(self_start, other_start)];

        let mut product = Dfa::new(union_alphabet.clone());

        let start_state =
            product.add_state(self.graph[self_start].join_left(&other.graph[other_start]));
        product.set_start(start_state);
        state_map.insert((self_start, other_start), start_state);

        while let Some((state1, state2)) = stack.pop() {
            let from = state_map[&(state1, state2)];

            for symbol in &union_alphabet {
                let next1 = if self.alphabet.contains(symbol) {
                    match self.successor(state1, symbol) {
                        Some(next) => next,
                        None => continue,
                    }
                } else {
                    state1
                };

                let next2 = if other.alphabet.contains(symbol) {
                    match other.successor(state2, symbol) {
                        Some(next) => next,
                        None => continue,
                    }
                } else {
                    state2
                };

                let to = *state_map.entry((next1, next2)).or_insert_with(|| {
                    let new_state =
                        product.add_state(self.graph[next1].join_left(&other.graph[next2]));
                    stack.push((next1, next2));
                    new_state
                });

                product.add_transition(from, to, symbol.clone());
            }
        }

        if self.complete && other.complete && self.alphabet == other.alphabet {
            product.set_complete_unchecked();
        }

        product
    }

    /// Removes states that cannot be reached from the start state, in one
    /// compacting pass.
    pub fn strip_unreachable(&mut self) {
        let reachable =
            decorate::reachable_from(&self.graph, [self.start()], Direction::Outgoing);
        self.rebuild_keeping(|n| reachable.contains(&n));
    }

    /// The prefix closure: accepts exactly the prefixes of accepted words.
    /// States from which no accepting state is reachable are removed, every
    /// remaining state becomes accepting.
    pub fn prefix_closure(&self) -> Dfa<N, L> {
        assert!(self.start.is_some(), "DFA must have a start state");

        let co_reachable = decorate::reachable_from(
            &self.graph,
            self.graph
                .node_indices()
                .filter(|&n| self.graph[n].accepting),
            Direction::Incoming,
        );

        let mut closed = Dfa::new(self.alphabet.clone());
        let mut mapping = HashMap::new();

        for node in self.graph.node_indices() {
            if !co_reachable.contains(&node) {
                continue;
            }
            let new_node = closed.add_state(StateNode::new(
                true,
                self.graph[node].error,
                self.graph[node].data.clone(),
            ));
            mapping.insert(node, new_node);
            if node == self.start() {
                closed.set_start(new_node);
            }
        }

        for edge in self.graph.edge_references() {
            if let (Some(&from), Some(&to)) =
                (mapping.get(&edge.source()), mapping.get(&edge.target()))
            {
                closed.add_transition(from, to, edge.weight().clone());
            }
        }

        closed
    }

    /// Renumbers the states by breadth-first traversal from the start state,
    /// visiting the outgoing edges of each state in symbol order. After
    /// this, index order matches visitation order, which the induction
    /// algorithms require. Unreachable states are dropped.
    pub fn renumber_bfs(&self) -> Dfa<N, L> {
        assert!(self.start.is_some(), "DFA must have a start state");

        let mut renumbered = Dfa::new(self.alphabet.clone());
        let mut mapping = HashMap::new();
        let mut queue = VecDeque::new();

        let start = self.start();
        let new_start = renumbered.add_state(self.graph[start].clone());
        renumbered.set_start(new_start);
        mapping.insert(start, new_start);
        queue.push_back(start);

        let mut visit_order = vec![start];

        while let Some(state) = queue.pop_front() {
            let targets = self
                .graph
                .edges_directed(state, Direction::Outgoing)
                .map(|edge| (edge.weight().clone(), edge.target()))
                .sorted()
                .collect_vec();

            for (_, target) in targets {
                if !mapping.contains_key(&target) {
                    let new_target = renumbered.add_state(self.graph[target].clone());
                    mapping.insert(target, new_target);
                    queue.push_back(target);
                    visit_order.push(target);
                }
            }
        }

        for state in visit_order {
            let edges = self
                .graph
                .edges_directed(state, Direction::Outgoing)
                .map(|edge| (edge.weight().clone(), edge.target()))
                .sorted()
                .collect_vec();

            for (symbol, target) in edges {
                if let Some(&to) = mapping.get(&target) {
                    renumbered.add_transition(mapping[&state], to, symbol);
                }
            }
        }

        renumbered.complete = self.complete && mapping.len() == self.graph.node_count();
        renumbered
    }

    /// Checks if the automaton accepts any word at all.
    pub fn has_accepting_run(&self) -> bool {
        if self
            .graph
            .node_indices()
            .all(|node| !self.graph[node].accepting)
        {
            return false;
        }

        let reachable =
            decorate::reachable_from(&self.graph, [self.start()], Direction::Outgoing);

        reachable.iter().any(|&n| self.graph[n].accepting)
    }

    /// Checks if `L(Self) = ∅`.
    pub fn is_language_empty(&self) -> bool {
        !self.has_accepting_run()
    }

    /// Checks if `L(Self) ⊆ L(Other)`, which holds iff
    /// `L(Self) ∩ L(complement(Other)) = ∅`.
    pub fn is_subset_of<NO: AutomatonNode + Default>(&self, other: &Dfa<NO, L>) -> bool {
        let complemented = other.complement();
        self.intersect(&complemented).is_language_empty()
    }

    pub fn to_graphviz(&self) -> String {
        let mut dot = String::new();
        dot.push_str("digraph finite_state_machine {\n");
        dot.push_str("rankdir=LR;\n");
        dot.push_str("node [shape=point,label=\"\"]START\n");

        let accepting_states = self
            .graph
            .node_indices()
            .filter(|node| self.graph[*node].accepting)
            .collect_vec();

        dot.push_str(&format!(
            "node [shape = doublecircle]; {};\n",
            accepting_states
                .iter()
                .map(|node| node.index().to_string())
                .join(" ")
        ));
        dot.push_str("node [shape = circle];\n");

        if let Some(start) = self.start {
            dot.push_str(&format!("START -> {:?};\n", start.index()));
        }

        for edge in self.graph.edge_references() {
            dot.push_str(&format!(
                "{:?} -> {:?} [ label=\"{:?}\" ];\n",
                edge.source().index(),
                edge.target().index(),
                edge.weight()
            ));
        }

        dot.push_str("}\n");

        dot
    }
}

impl<N: AutomatonNode, L: Letter> AutBuild<NodeIndex, EdgeIndex, StateNode<N>, L> for Dfa<N, L> {
    fn add_state(&mut self, data: StateNode<N>) -> NodeIndex {
        self.complete = false;
        self.graph.add_node(data)
    }

    /// Adds a transition, panicking on a determinism conflict. Use
    /// [`Dfa::try_add_transition`] when the input is not trusted.
    fn add_transition(&mut self, from: NodeIndex, to: NodeIndex, label: L) -> EdgeIndex {
        match self.try_add_transition(from, to, label) {
            Ok(edge) => edge,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<N: AutomatonNode, L: Letter> Alphabet for Dfa<N, L> {
    type Letter = L;

    fn alphabet(&self) -> &[L] {
        self.alphabet.as_slice()
    }
}

impl<N: AutomatonNode, L: Letter> Language for Dfa<N, L> {
    fn accepts<'a>(&self, input: impl IntoIterator<Item = &'a L>) -> bool
    where
        L: 'a,
    {
        match self.walk(input) {
            Some(state) => self.graph[state].accepting,
            None => false,
        }
    }
}

impl<N: AutomatonNode, L: Letter> Debug for Dfa<N, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dfa")
            .field("alphabet", &self.alphabet)
            .field("state_count", &self.graph.node_count())
            .field(
                "states",
                &self
                    .graph
                    .node_indices()
                    .map(|node| (node, &self.graph[node]))
                    .collect_vec(),
            )
            .field("start", &self.start)
            .field("edge_count", &self.graph.edge_count())
            .field(
                "edges",
                &self
                    .graph
                    .edge_references()
                    .map(|edge| {
                        format!(
                            "{:?} --- {:?} --> {:?}",
                            edge.source(),
                            edge.weight(),
                            edge.target()
                        )
                    })
                    .collect_vec(),
            )
            .finish()
    }
}
