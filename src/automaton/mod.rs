use std::{fmt::Debug, hash::Hash};

pub mod decorate;
pub mod dfa;
pub mod equivalence;
pub mod nfa;

/// This trait represents types that can be used as extra node data in an
/// automaton.
pub trait AutomatonNode: Debug + Clone + PartialEq + Eq + Hash {}
impl<T> AutomatonNode for T where T: Debug + Clone + PartialEq + Eq + Hash {}

/// This trait represents types that can be used as the letters along the
/// edges of an automaton.
pub trait Letter: Debug + Clone + PartialEq + Eq + Hash + Ord {}
impl<T> Letter for T where T: Debug + Clone + PartialEq + Eq + Hash + Ord {}

pub trait Alphabet {
    type Letter: Letter;

    fn alphabet(&self) -> &[Self::Letter];
}

/// The basic trait for anything that defines a language over a set alphabet.
pub trait Language: Alphabet {
    fn accepts<'a>(&self, input: impl IntoIterator<Item = &'a Self::Letter>) -> bool
    where
        Self::Letter: 'a;
}

/// Construction interface shared by the NFA and DFA builders.
pub trait AutBuild<NIndex, EIndex, N, E> {
    fn add_state(&mut self, data: N) -> NIndex;
    fn add_transition(&mut self, from: NIndex, to: NIndex, label: E) -> EIndex;
}
