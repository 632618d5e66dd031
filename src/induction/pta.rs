use crate::{
    Error, Result,
    automaton::{
        AutBuild, Letter,
        dfa::{Dfa, node::StateNode},
    },
    sample::{Label, Sample},
};

/// Builds the prefix tree acceptor of a sample.
///
/// Every string is split against the tree built so far; the unmatched suffix
/// extends the tree as a chain of fresh states, and the final state is marked
/// accepting (positive string) or error (negative string). The result is
/// renumbered by breadth-first traversal in symbol order, so state index
/// order matches visitation order, which the merge search requires.
///
/// The sample's own insertion check already rules out conflicting labels,
/// but the flag conflict is re-checked here as a safety net.
pub fn build_pta<L: Letter>(sample: &Sample<L>) -> Result<Dfa<(), L>> {
    let mut pta = Dfa::new(sample.alphabet());
    let root = pta.add_state(StateNode::non_accepting(()));
    pta.set_start(root);

    for string in sample.iter() {
        let (mut state, suffix) = pta.split(string.symbols());

        for symbol in suffix {
            let next = pta.add_state(StateNode::non_accepting(()));
            pta.add_transition(state, next, symbol.clone());
            state = next;
        }

        match string.label() {
            Label::Positive => {
                if pta.graph[state].error {
                    return Err(Error::Inconsistent(format!(
                        "{:?} ends in a state already marked as rejected",
                        string.symbols()
                    )));
                }
                pta.graph[state].accepting = true;
            }
            Label::Negative => {
                if pta.graph[state].accepting {
                    return Err(Error::Inconsistent(format!(
                        "{:?} ends in a state already marked as accepted",
                        string.symbols()
                    )));
                }
                pta.graph[state].error = true;
            }
            Label::Unlabeled => {}
        }
    }

    Ok(pta.renumber_bfs())
}
