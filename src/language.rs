use itertools::Itertools;

use crate::automaton::{
    Alphabet, AutBuild, AutomatonNode, Language, Letter,
    dfa::{Dfa, minimization::Minimizable, node::StateNode},
    equivalence::equivalent,
    nfa::{Nfa, NfaEdge},
};
use crate::regex::Regex;
use petgraph::visit::EdgeRef;

/// A regular language, represented by its canonical minimal DFA. All
/// algebraic operators return canonical results, so two values denote the
/// same language iff they are structurally equivalent.
#[derive(Debug, Clone)]
pub struct RegLang<L: Letter> {
    dfa: Dfa<(), L>,
}

impl<L: Letter> RegLang<L> {
    pub fn from_regex(regex: &Regex<L>) -> Self {
        RegLang {
            dfa: regex.compile(),
        }
    }

    /// Wraps an arbitrary DFA, canonicalizing it first. The state payload is
    /// dropped.
    pub fn from_dfa<N: AutomatonNode>(dfa: &Dfa<N, L>) -> Self {
        RegLang {
            dfa: canonical(erase(dfa)),
        }
    }

    pub fn dfa(&self) -> &Dfa<(), L> {
        &self.dfa
    }

    pub fn is_empty(&self) -> bool {
        self.dfa.is_language_empty()
    }

    /// Language equality, via structural equivalence of the canonical DFAs.
    pub fn is_equivalent(&self, other: &RegLang<L>) -> bool {
        equivalent(&self.dfa, &other.dfa)
    }

    pub fn union(&self, other: &RegLang<L>) -> RegLang<L> {
        let mut alphabet = self.dfa.alphabet().to_vec();
        alphabet.extend(other.dfa.alphabet().iter().cloned());
        alphabet.sort();
        alphabet.dedup();

        let mut nfa: Nfa<(), L> = Nfa::new(alphabet);

        let self_states = nfa.add_dfa(&self.dfa);
        let other_states = nfa.add_dfa(&other.dfa);

        let entry = nfa.add_state(StateNode::non_accepting(()));
        nfa.add_transition(
            entry,
            self_states[self.dfa.start().index()],
            NfaEdge::Epsilon,
        );
        nfa.add_transition(
            entry,
            other_states[other.dfa.start().index()],
            NfaEdge::Epsilon,
        );
        nfa.set_initial(entry);

        RegLang {
            dfa: canonical(nfa.determinize()),
        }
    }

    pub fn intersection(&self, other: &RegLang<L>) -> RegLang<L> {
        RegLang {
            dfa: canonical(self.dfa.intersect(&other.dfa)),
        }
    }

    pub fn complement(&self) -> RegLang<L> {
        RegLang {
            dfa: canonical(self.dfa.complement()),
        }
    }

    pub fn difference(&self, other: &RegLang<L>) -> RegLang<L> {
        self.intersection(&other.complement())
    }

    /// Hides the given symbols: every transition labeled with one of them
    /// becomes unobservable (epsilon), and the symbols leave the alphabet.
    pub fn hide(&self, hidden: &[L]) -> RegLang<L> {
        let alphabet = self
            .dfa
            .alphabet()
            .iter()
            .filter(|symbol| !hidden.contains(symbol))
            .cloned()
            .collect_vec();

        let mut nfa: Nfa<(), L> = Nfa::new(alphabet);
        let mut mapping = Vec::with_capacity(self.dfa.state_count());

        for node in self.dfa.graph.node_indices() {
            let state = &self.dfa.graph[node];
            mapping.push(nfa.add_state(StateNode::new(state.accepting, state.error, ())));
        }

        for edge in self.dfa.graph.edge_references() {
            let label = if hidden.contains(edge.weight()) {
                NfaEdge::Epsilon
            } else {
                NfaEdge::Symbol(edge.weight().clone())
            };
            nfa.add_transition(
                mapping[edge.source().index()],
                mapping[edge.target().index()],
                label,
            );
        }

        nfa.set_initial(mapping[self.dfa.start().index()]);

        RegLang {
            dfa: canonical(nfa.determinize()),
        }
    }

    /// Projects the language onto the given symbols, hiding everything else.
    pub fn project(&self, kept: &[L]) -> RegLang<L> {
        let hidden = self
            .dfa
            .alphabet()
            .iter()
            .filter(|symbol| !kept.contains(symbol))
            .cloned()
            .collect_vec();

        self.hide(&hidden)
    }
}

impl<L: Letter> Alphabet for RegLang<L> {
    type Letter = L;

    fn alphabet(&self) -> &[L] {
        self.dfa.alphabet()
    }
}

impl<L: Letter> Language for RegLang<L> {
    fn accepts<'a>(&self, input: impl IntoIterator<Item = &'a L>) -> bool
    where
        L: 'a,
    {
        self.dfa.accepts(input)
    }
}

fn canonical<L: Letter>(dfa: Dfa<(), L>) -> Dfa<(), L> {
    dfa.minimize().renumber_bfs()
}

fn erase<N: AutomatonNode, L: Letter>(dfa: &Dfa<N, L>) -> Dfa<(), L> {
    let mut erased = Dfa::new(dfa.alphabet().to_vec());

    for node in dfa.graph.node_indices() {
        let state = &dfa.graph[node];
        let new_node = erased.add_state(StateNode::new(state.accepting, state.error, ()));
        if dfa.get_start() == Some(node) {
            erased.set_start(new_node);
        }
    }

    for edge in dfa.graph.edge_references() {
        erased.add_transition(edge.source(), edge.target(), edge.weight().clone());
    }

    if dfa.is_complete() {
        erased.set_complete_unchecked();
    }

    erased
}
