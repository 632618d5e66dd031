use itertools::Itertools;

use crate::{
    Error, Result,
    automaton::{AutomatonNode, Language, Letter, dfa::Dfa},
};

/// The polarity of a sample string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Positive,
    Negative,
    Unlabeled,
}

impl Label {
    pub fn marker(&self) -> char {
        match self {
            Label::Positive => '+',
            Label::Negative => '-',
            Label::Unlabeled => '?',
        }
    }

    pub fn from_marker(c: char) -> Option<Label> {
        match c {
            '+' => Some(Label::Positive),
            '-' => Some(Label::Negative),
            '?' => Some(Label::Unlabeled),
            _ => None,
        }
    }
}

/// An immutable labeled symbol sequence. Equality and hashing cover both the
/// symbols and the label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputString<L: Letter> {
    symbols: Vec<L>,
    label: Label,
}

impl<L: Letter> InputString<L> {
    pub fn new(symbols: Vec<L>, label: Label) -> Self {
        InputString { symbols, label }
    }

    pub fn positive(symbols: Vec<L>) -> Self {
        InputString::new(symbols, Label::Positive)
    }

    pub fn negative(symbols: Vec<L>) -> Self {
        InputString::new(symbols, Label::Negative)
    }

    pub fn symbols(&self) -> &[L] {
        &self.symbols
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// An ordered collection of labeled input strings.
///
/// Invariant: the same symbol sequence never occurs both positive and
/// negative. Violations are rejected at insertion time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sample<L: Letter> {
    strings: Vec<InputString<L>>,
}

impl<L: Letter> Sample<L> {
    pub fn new() -> Self {
        Sample { strings: vec![] }
    }

    pub fn insert(&mut self, string: InputString<L>) -> Result<()> {
        let conflicting = match string.label() {
            Label::Positive => Label::Negative,
            Label::Negative => Label::Positive,
            Label::Unlabeled => {
                self.strings.push(string);
                return Ok(());
            }
        };

        if self
            .strings
            .iter()
            .any(|s| s.label() == conflicting && s.symbols() == string.symbols())
        {
            return Err(Error::Inconsistent(format!(
                "{:?} occurs with both labels",
                string.symbols()
            )));
        }

        self.strings.push(string);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputString<L>> {
        self.strings.iter()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// The sorted distinct set of symbols occurring in the sample.
    pub fn alphabet(&self) -> Vec<L> {
        self.strings
            .iter()
            .flat_map(|s| s.symbols().iter().cloned())
            .sorted()
            .dedup()
            .collect()
    }

    /// The classification vector of the labeled strings, in sample order.
    /// `true` for positive, `false` for negative; unlabeled strings do not
    /// participate.
    pub fn signature(&self) -> Vec<bool> {
        self.strings
            .iter()
            .filter_map(|s| match s.label() {
                Label::Positive => Some(true),
                Label::Negative => Some(false),
                Label::Unlabeled => None,
            })
            .collect()
    }

    /// The classification the given automaton assigns to the labeled strings
    /// of this sample, in the same order as [`Sample::signature`].
    pub fn signature_of<N: AutomatonNode>(&self, dfa: &Dfa<N, L>) -> Vec<bool> {
        self.strings
            .iter()
            .filter(|s| s.label() != Label::Unlabeled)
            .map(|s| dfa.accepts(s.symbols()))
            .collect()
    }

    /// Checks that the automaton accepts every positive string and rejects
    /// every negative one. Unlabeled strings are ignored.
    pub fn correctly_classified_by<N: AutomatonNode>(&self, dfa: &Dfa<N, L>) -> bool {
        self.strings.iter().all(|s| match s.label() {
            Label::Positive => dfa.accepts(s.symbols()),
            Label::Negative => !dfa.accepts(s.symbols()),
            Label::Unlabeled => true,
        })
    }
}

impl<L: Letter> FromIterator<InputString<L>> for Sample<L> {
    /// Panics if the strings are inconsistent; use [`Sample::insert`] to
    /// handle the error.
    fn from_iter<T: IntoIterator<Item = InputString<L>>>(iter: T) -> Self {
        let mut sample = Sample::new();
        for string in iter {
            if let Err(e) = sample.insert(string) {
                panic!("{}", e);
            }
        }
        sample
    }
}
