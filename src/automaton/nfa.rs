use hashbrown::HashMap;
use petgraph::{
    Direction,
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};

use crate::automaton::{
    Alphabet, AutBuild, AutomatonNode, Language, Letter,
    dfa::{Dfa, node::StateNode},
};

/// An edge label in an NFA. Epsilon is a reserved variant instead of an
/// `Option<L>` so that "no symbol" cannot be confused with a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NfaEdge<L: Letter> {
    Epsilon,
    Symbol(L),
}

impl<L: Letter> NfaEdge<L> {
    pub fn is_epsilon(&self) -> bool {
        matches!(self, NfaEdge::Epsilon)
    }

    pub fn matches(&self, letter: &L) -> bool {
        match self {
            NfaEdge::Symbol(s) => s == letter,
            NfaEdge::Epsilon => false,
        }
    }

    pub fn symbol(&self) -> Option<&L> {
        match self {
            NfaEdge::Symbol(s) => Some(s),
            NfaEdge::Epsilon => None,
        }
    }
}

/// A nondeterministic finite automaton with epsilon transitions and a set of
/// initial states.
#[derive(Debug, Clone)]
pub struct Nfa<N: AutomatonNode, L: Letter> {
    initials: Vec<NodeIndex>,
    pub graph: DiGraph<StateNode<N>, NfaEdge<L>>,
    alphabet: Vec<L>,
}

impl<N: AutomatonNode, L: Letter> Nfa<N, L> {
    pub fn new(alphabet: Vec<L>) -> Self {
        Nfa {
            alphabet,
            initials: vec![],
            graph: DiGraph::new(),
        }
    }

    pub fn add_initial(&mut self, state: NodeIndex) {
        if !self.initials.contains(&state) {
            self.initials.push(state);
        }
    }

    pub fn set_initial(&mut self, state: NodeIndex) {
        self.initials = vec![state];
    }

    pub fn initials(&self) -> &[NodeIndex] {
        &self.initials
    }

    pub fn set_accepting(&mut self, state: NodeIndex) {
        self.graph[state].accepting = true;
    }

    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_accepting(&self, state: NodeIndex) -> bool {
        self.graph[state].accepting
    }

    /// Checks if a set of states contains an accepting state.
    pub fn is_accepting_set(&self, states: &[NodeIndex]) -> bool {
        states.iter().any(|&x| self.is_accepting(x))
    }

    /// Checks if a set of states contains an error state.
    pub fn is_error_set(&self, states: &[NodeIndex]) -> bool {
        states.iter().any(|&x| self.graph[x].error)
    }

    /// Extends a set of states to its epsilon closure, meaning all states
    /// reachable from the set by epsilon transitions only. Iterative on
    /// purpose: closure depth is bounded by the automaton, not by the call
    /// stack.
    pub fn extend_to_e_closure(&self, states: &mut Vec<NodeIndex>) {
        let mut stack = states.clone();

        while let Some(state) = stack.pop() {
            for edge in self.graph.edges_directed(state, Direction::Outgoing) {
                if edge.weight().is_epsilon() {
                    let target = edge.target();

                    if !states.contains(&target) {
                        states.push(target);
                        stack.push(target);
                    }
                }
            }
        }
    }

    /// The epsilon closure of a single state.
    pub fn e_closure(&self, state: NodeIndex) -> Vec<NodeIndex> {
        let mut states = vec![state];
        self.extend_to_e_closure(&mut states);
        states
    }

    /// Determinizes this NFA to a DFA by the subset construction.
    /// Each DFA state is a sorted, duplicate-free set of NFA states; a
    /// distinct reachable subset maps to exactly one DFA state. A compound
    /// state is accepting/error if any member is. Empty subsets are not
    /// materialized, so the result may be incomplete; it is deterministic
    /// but not minimal.
    pub fn determinize(&self) -> Dfa<(), L> {
        assert!(!self.initials.is_empty(), "NFA must have an initial state");

        let mut state_map = HashMap::new();
        let mut dfa = Dfa::new(self.alphabet.clone());

        let mut start_set = self.initials.clone();
        self.extend_to_e_closure(&mut start_set);
        start_set.sort();
        start_set.dedup();

        let dfa_start = dfa.add_state(self.state_from_set(&start_set));
        dfa.set_start(dfa_start);
        state_map.insert(start_set.clone(), dfa_start);

        let mut stack = vec![start_set];

        while let Some(state) = stack.pop() {
            for symbol in &self.alphabet {
                let mut target_set = vec![];

                for &node in &state {
                    for edge in self.graph.edges_directed(node, Direction::Outgoing) {
                        if edge.weight().matches(symbol) {
                            target_set.push(edge.target());
                        }
                    }
                }

                self.extend_to_e_closure(&mut target_set);

                if target_set.is_empty() {
                    continue;
                }

                target_set.sort();
                target_set.dedup();

                let target_dfa_state = if let Some(&x) = state_map.get(&target_set) {
                    x
                } else {
                    let new_state = dfa.add_state(self.state_from_set(&target_set));
                    state_map.insert(target_set.clone(), new_state);
                    stack.push(target_set);
                    new_state
                };

                dfa.add_transition(state_map[&state], target_dfa_state, symbol.clone());
            }
        }

        dfa
    }

    fn state_from_set(&self, states: &[NodeIndex]) -> StateNode<()> {
        StateNode::new(self.is_accepting_set(states), self.is_error_set(states), ())
    }

    /// Copies every state and edge of `other` into this NFA, keeping flags
    /// and labels. Returns the mapping from `other`'s node indices to the
    /// new indices. Initial states of `other` are not marked initial here;
    /// the caller wires them up.
    pub fn add_automaton<NO: AutomatonNode>(&mut self, other: &Nfa<NO, L>) -> Vec<NodeIndex>
    where
        N: Default,
    {
        let mut mapping = Vec::with_capacity(other.graph.node_count());

        for node in other.graph.node_indices() {
            let data = &other.graph[node];
            mapping.push(self.graph.add_node(StateNode::new(
                data.accepting,
                data.error,
                N::default(),
            )));
        }

        for edge in other.graph.edge_references() {
            self.graph.add_edge(
                mapping[edge.source().index()],
                mapping[edge.target().index()],
                edge.weight().clone(),
            );
        }

        mapping
    }

    /// Copies every state and edge of a DFA into this NFA as symbol edges.
    /// Returns the mapping from the DFA's node indices to the new indices.
    pub fn add_dfa<NO: AutomatonNode>(&mut self, other: &Dfa<NO, L>) -> Vec<NodeIndex>
    where
        N: Default,
    {
        let mut mapping = Vec::with_capacity(other.graph.node_count());

        for node in other.graph.node_indices() {
            let data = &other.graph[node];
            mapping.push(self.graph.add_node(StateNode::new(
                data.accepting,
                data.error,
                N::default(),
            )));
        }

        for edge in other.graph.edge_references() {
            self.graph.add_edge(
                mapping[edge.source().index()],
                mapping[edge.target().index()],
                NfaEdge::Symbol(edge.weight().clone()),
            );
        }

        mapping
    }
}

impl<N: AutomatonNode, L: Letter> AutBuild<NodeIndex, EdgeIndex, StateNode<N>, NfaEdge<L>>
    for Nfa<N, L>
{
    fn add_state(&mut self, data: StateNode<N>) -> NodeIndex {
        self.graph.add_node(data)
    }

    fn add_transition(&mut self, from: NodeIndex, to: NodeIndex, label: NfaEdge<L>) -> EdgeIndex {
        self.graph.add_edge(from, to, label)
    }
}

impl<N: AutomatonNode, L: Letter> Alphabet for Nfa<N, L> {
    type Letter = L;

    fn alphabet(&self) -> &[L] {
        self.alphabet.as_slice()
    }
}

impl<N: AutomatonNode, L: Letter> Language for Nfa<N, L> {
    fn accepts<'a>(&self, input: impl IntoIterator<Item = &'a L>) -> bool
    where
        L: 'a,
    {
        assert!(!self.initials.is_empty(), "NFA must have an initial state");

        let mut current_states = self.initials.clone();
        self.extend_to_e_closure(&mut current_states);

        for symbol in input {
            let mut next_states = vec![];

            for &state in &current_states {
                for edge in self.graph.edges_directed(state, Direction::Outgoing) {
                    if edge.weight().matches(symbol) {
                        next_states.push(edge.target());
                    }
                }
            }

            if next_states.is_empty() {
                return false;
            }

            self.extend_to_e_closure(&mut next_states);

            current_states = next_states;
        }

        self.is_accepting_set(&current_states)
    }
}
