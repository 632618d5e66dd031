use itertools::{Itertools, repeat_n};

use crate::automaton::Language;

/// Checks if two automata accept the same language.
/// This is done by checking if the alphabets are the same and then checking
/// if the automata accept the same words up to a certain length.
pub fn same_language<A, B>(a: &A, b: &B, max_word_length: usize) -> bool
where
    A: Language,
    B: Language<Letter = A::Letter>,
{
    // first we need to check if the alphabets are the same
    if a.alphabet() != b.alphabet() {
        return false;
    }

    for i in 0..max_word_length {
        let combinations = repeat_n(a.alphabet(), i).multi_cartesian_product();

        for word in combinations {
            let word = word.into_iter().cloned().collect_vec();
            if a.accepts(&word) != b.accepts(&word) {
                println!("{:?}", word);
                return false;
            }
        }
    }

    true
}

pub fn assert_same_language<A, B>(a: &A, b: &B, max_word_length: usize)
where
    A: Language,
    B: Language<Letter = A::Letter>,
{
    if a.alphabet() != b.alphabet() {
        panic!("Alphabets are not the same");
    }

    for i in 0..max_word_length {
        let combinations = repeat_n(a.alphabet(), i).multi_cartesian_product();

        for word in combinations {
            let word = word.into_iter().cloned().collect_vec();
            match (a.accepts(&word), b.accepts(&word)) {
                (true, false) => {
                    panic!(
                        "{:?} is accepted by automaton `a` but not by automaton `b`. Thus their languages are not equal.",
                        word
                    );
                }
                (false, true) => {
                    panic!(
                        "{:?} is accepted by automaton `b` but not by automaton `a`. Thus their languages are not equal.",
                        word
                    );
                }
                _ => {}
            }
        }
    }
}

/// Assert that the language accepted by automaton `a` is the inverse of the
/// language accepted by automaton `b`. Meaning no word is accepted by both
/// and no word is accepted by none.
pub fn assert_inverse_language<A, B>(a: &A, b: &B, max_word_length: usize)
where
    A: Language,
    B: Language<Letter = A::Letter>,
{
    if a.alphabet() != b.alphabet() {
        panic!("Alphabets are not the same");
    }

    for i in 0..max_word_length {
        let combinations = repeat_n(a.alphabet(), i).multi_cartesian_product();

        for word in combinations {
            let word = word.into_iter().cloned().collect_vec();
            match (a.accepts(&word), b.accepts(&word)) {
                (true, true) => {
                    panic!(
                        "{:?} is accepted by both automata. Thus their languages are not inverse.",
                        word
                    );
                }
                (false, false) => {
                    panic!(
                        "{:?} is accepted by neither automaton. Thus their languages are not inverse.",
                        word
                    );
                }
                _ => {}
            }
        }
    }
}
