use petgraph::graph::NodeIndex;

use crate::{
    automaton::{
        AutBuild, Letter,
        dfa::{Dfa, minimization::Minimizable, node::StateNode},
        nfa::{Nfa, NfaEdge},
    },
    regex::Regex,
};

impl<L: Letter> Regex<L> {
    /// Builds the Thompson fragment for this expression into `nfa` and
    /// returns its `(entry, exit)` states. The fragment is wired purely with
    /// epsilon transitions around single-symbol edges, so nesting composes
    /// without rewriting existing states.
    pub fn build_fragment(&self, nfa: &mut Nfa<(), L>) -> (NodeIndex, NodeIndex) {
        match self {
            Regex::Symbol(symbol) => {
                let entry = nfa.add_state(StateNode::non_accepting(()));
                let exit = nfa.add_state(StateNode::non_accepting(()));
                nfa.add_transition(entry, exit, NfaEdge::Symbol(symbol.clone()));
                (entry, exit)
            }
            Regex::Sequence(parts) => {
                let fragments = parts
                    .iter()
                    .map(|part| part.build_fragment(nfa))
                    .collect::<Vec<_>>();

                for window in fragments.windows(2) {
                    let (_, exit) = window[0];
                    let (entry, _) = window[1];
                    nfa.add_transition(exit, entry, NfaEdge::Epsilon);
                }

                (fragments[0].0, fragments[fragments.len() - 1].1)
            }
            Regex::Alternative(branches) => {
                let entry = nfa.add_state(StateNode::non_accepting(()));
                let exit = nfa.add_state(StateNode::non_accepting(()));

                for branch in branches {
                    let (branch_entry, branch_exit) = branch.build_fragment(nfa);
                    nfa.add_transition(entry, branch_entry, NfaEdge::Epsilon);
                    nfa.add_transition(branch_exit, exit, NfaEdge::Epsilon);
                }

                (entry, exit)
            }
            Regex::Question(inner) => {
                // fresh entry/exit with an epsilon bypass; splicing the
                // bypass onto the inner fragment's own states would leak
                // iterations of a nested repetition past the operator
                let entry = nfa.add_state(StateNode::non_accepting(()));
                let exit = nfa.add_state(StateNode::non_accepting(()));
                let (inner_entry, inner_exit) = inner.build_fragment(nfa);

                nfa.add_transition(entry, inner_entry, NfaEdge::Epsilon);
                nfa.add_transition(inner_exit, exit, NfaEdge::Epsilon);
                nfa.add_transition(entry, exit, NfaEdge::Epsilon);

                (entry, exit)
            }
            Regex::Plus(inner) => {
                // fresh entry/exit with a back-edge for repetition
                let entry = nfa.add_state(StateNode::non_accepting(()));
                let exit = nfa.add_state(StateNode::non_accepting(()));
                let (inner_entry, inner_exit) = inner.build_fragment(nfa);

                nfa.add_transition(entry, inner_entry, NfaEdge::Epsilon);
                nfa.add_transition(inner_exit, exit, NfaEdge::Epsilon);
                nfa.add_transition(inner_exit, inner_entry, NfaEdge::Epsilon);

                (entry, exit)
            }
            Regex::Star(inner) => {
                // star is question composed with plus: bypass and back-edge
                let entry = nfa.add_state(StateNode::non_accepting(()));
                let exit = nfa.add_state(StateNode::non_accepting(()));
                let (inner_entry, inner_exit) = inner.build_fragment(nfa);

                nfa.add_transition(entry, inner_entry, NfaEdge::Epsilon);
                nfa.add_transition(inner_exit, exit, NfaEdge::Epsilon);
                nfa.add_transition(inner_exit, inner_entry, NfaEdge::Epsilon);
                nfa.add_transition(entry, exit, NfaEdge::Epsilon);

                (entry, exit)
            }
        }
    }

    /// The epsilon-NFA of this expression: the Thompson fragment wrapped
    /// with a designated initial/accepting state pair.
    pub fn to_nfa(&self) -> Nfa<(), L> {
        let mut nfa = Nfa::new(self.alphabet());

        let (entry, exit) = self.build_fragment(&mut nfa);

        let initial = nfa.add_state(StateNode::non_accepting(()));
        let accepting = nfa.add_state(StateNode::accepting(()));
        nfa.add_transition(initial, entry, NfaEdge::Epsilon);
        nfa.add_transition(exit, accepting, NfaEdge::Epsilon);
        nfa.set_initial(initial);

        nfa
    }

    /// Compiles the expression to its canonical DFA: determinized, minimized
    /// and renumbered by breadth-first traversal, so that two expressions
    /// denote the same language iff their compiled automata are structurally
    /// equivalent.
    pub fn compile(&self) -> Dfa<(), L> {
        self.to_nfa().determinize().minimize().renumber_bfs()
    }
}
