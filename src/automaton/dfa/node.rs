use crate::automaton::AutomatonNode;

/// A state in an automaton.
/// It carries some payload of type `T`, a flag indicating whether the state
/// is accepting, and a flag indicating whether the state is an error state.
///
/// Error states encode negative evidence: a prefix tree acceptor marks the
/// end of every negative sample string as an error state, and the induction
/// engine refuses any merge that would make a state both accepting and an
/// error. Outside induction the flag is carried along (ORed through
/// determinization and minimization like `accepting`) but has no effect on
/// acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateNode<T: AutomatonNode> {
    pub accepting: bool,
    pub error: bool,
    pub data: T,
}

impl<T: AutomatonNode> StateNode<T> {
    pub fn new(accepting: bool, error: bool, data: T) -> Self {
        StateNode {
            accepting,
            error,
            data,
        }
    }

    pub fn accepting(data: T) -> Self {
        StateNode::new(true, false, data)
    }

    pub fn non_accepting(data: T) -> Self {
        StateNode::new(false, false, data)
    }

    pub fn error(data: T) -> Self {
        StateNode::new(false, true, data)
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    /// The same state with the accepting flag flipped. The error flag does
    /// not participate in complementation.
    pub fn invert(&self) -> Self {
        StateNode::new(!self.accepting, self.error, self.data.clone())
    }

    pub fn invert_mut(&mut self) {
        self.accepting = !self.accepting;
    }

    /// Joins two states for a product construction. Accepting only if both
    /// are, an error if either is.
    pub fn join_left<TO: AutomatonNode>(&self, other: &StateNode<TO>) -> StateNode<T> {
        StateNode::new(
            self.accepting && other.accepting,
            self.error || other.error,
            self.data.clone(),
        )
    }
}

impl<T: Default + AutomatonNode> Default for StateNode<T> {
    fn default() -> Self {
        StateNode::new(false, false, T::default())
    }
}
