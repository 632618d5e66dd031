use reglearn::{
    automaton::{Language, dfa::minimization::Minimizable, equivalence::equivalent},
    regex::Regex,
    validation::assert_same_language,
};

fn word(input: &str) -> Vec<String> {
    input
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_compile_symbol() {
    let dfa = Regex::parse("a").unwrap().compile();

    assert!(dfa.accepts(&word("a")));
    assert!(!dfa.accepts(&word("")));
    assert!(!dfa.accepts(&word("a a")));
    assert_eq!(dfa.state_count(), 2);
}

#[test]
fn test_compile_sequence_and_alternative() {
    let dfa = Regex::parse("a b | c").unwrap().compile();

    assert!(dfa.accepts(&word("a b")));
    assert!(dfa.accepts(&word("c")));
    assert!(!dfa.accepts(&word("a")));
    assert!(!dfa.accepts(&word("a c")));
}

#[test]
fn test_compile_question() {
    let dfa = Regex::parse("a? b").unwrap().compile();

    assert!(dfa.accepts(&word("b")));
    assert!(dfa.accepts(&word("a b")));
    assert!(!dfa.accepts(&word("a")));
    assert!(!dfa.accepts(&word("a a b")));
}

#[test]
fn test_compile_plus_and_star() {
    let plus = Regex::parse("a+").unwrap().compile();
    assert!(!plus.accepts(&word("")));
    assert!(plus.accepts(&word("a")));
    assert!(plus.accepts(&word("a a a")));

    let star = Regex::parse("a*").unwrap().compile();
    assert!(star.accepts(&word("")));
    assert!(star.accepts(&word("a")));
    assert!(star.accepts(&word("a a a")));
}

#[test]
fn test_compile_ab_star() {
    let dfa = Regex::parse("(a b)*").unwrap().compile();

    assert!(dfa.accepts(&word("")));
    assert!(dfa.accepts(&word("a b")));
    assert!(dfa.accepts(&word("a b a b")));
    assert!(!dfa.accepts(&word("a")));
    assert!(!dfa.accepts(&word("a b a")));
    assert!(!dfa.accepts(&word("b a")));
}

#[test]
fn test_compiled_automaton_is_canonical() {
    let dfa = Regex::parse("(a b)*").unwrap().compile();

    assert!(dfa.is_minimal());
    assert_eq!(dfa.start().index(), 0);

    // two spellings of the same language compile to the same structure
    let other = Regex::parse("(a b)* (a b)*").unwrap().compile();
    assert!(equivalent(&dfa, &other));
}

#[test]
fn test_different_languages_compile_differently() {
    let a = Regex::parse("(a b)*").unwrap().compile();
    let b = Regex::parse("(a b)+").unwrap().compile();

    assert!(!equivalent(&a, &b));
}

#[test]
fn test_prefix_closure_of_ab_star() {
    let closed = Regex::parse("(a b)*").unwrap().compile().prefix_closure();

    assert!(closed.accepts(&word("")));
    assert!(closed.accepts(&word("a")));
    assert!(closed.accepts(&word("a b")));
    assert!(closed.accepts(&word("a b a")));
    assert!(!closed.accepts(&word("a b b")));
}

#[test]
fn test_nested_postfix_operators_stay_separate() {
    // the optional group must not let the inner star swallow the leading b
    let dfa = Regex::parse("(b (a | b)*)?").unwrap().compile();

    assert!(dfa.accepts(&word("")));
    assert!(dfa.accepts(&word("b")));
    assert!(dfa.accepts(&word("b a b")));
    assert!(!dfa.accepts(&word("a")));
    assert!(!dfa.accepts(&word("a b")));

    // a plus under a question stays a single optional repetition
    let dfa = Regex::parse("(a b+)?").unwrap().compile();
    assert!(dfa.accepts(&word("")));
    assert!(dfa.accepts(&word("a b b")));
    assert!(!dfa.accepts(&word("b")));
    assert!(!dfa.accepts(&word("a b a")));
}

#[test]
fn test_nfa_and_dfa_agree() {
    let regex = Regex::parse("(a | b b)+ c?").unwrap();

    let nfa = regex.to_nfa();
    let dfa = regex.compile();

    assert_same_language(&nfa, &dfa, 6);
}
