use reglearn::{
    Error,
    automaton::{Alphabet, AutBuild, Language, dfa::Dfa, dfa::node::StateNode, nfa::Nfa},
    automaton::nfa::NfaEdge,
    format::{parse_dfa, parse_nfa, parse_sample, serialize_dfa, serialize_nfa, serialize_sample},
    sample::Label,
};

const AB_LOOP: &str = "\
2 2
0 true false
1 false true
0 1 a
1 0 b
";

fn word(input: &str) -> Vec<String> {
    input
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_parse_ab_loop() {
    let dfa = parse_dfa(AB_LOOP).unwrap();

    assert_eq!(dfa.state_count(), 2);
    assert_eq!(dfa.edge_count(), 2);
    assert_eq!(dfa.alphabet(), &["a".to_string(), "b".to_string()]);

    assert!(dfa.accepts(&word("a")));
    assert!(dfa.accepts(&word("a b a")));
    assert!(!dfa.accepts(&word("")));
    assert!(!dfa.accepts(&word("a b")));
}

#[test]
fn test_parse_comments_blanks_and_names() {
    let input = "
# a two state automaton
2 1

start  true   false   # the start state
other  false  true    true

start other go  # a named edge
";
    let dfa = parse_dfa(input).unwrap();

    assert_eq!(dfa.state_count(), 2);
    assert_eq!(dfa.graph[dfa.start()].data, "start");
    let target = dfa.walk(&word("go")).unwrap();
    assert_eq!(dfa.graph[target].data, "other");
    assert!(dfa.graph[target].error);
}

#[test]
fn test_parse_error_line_numbers() {
    // the broken state line is physical line 3
    let input = "# header\n2 1\n0 yes false\n1 false true\n0 1 a\n";
    match parse_dfa(input) {
        Err(Error::Parse { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_parse_unknown_state() {
    let input = "1 1\n0 true true\n0 missing a\n";
    match parse_dfa(input) {
        Err(Error::Parse { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_parse_overflowing_counts() {
    // a count wider than the machine word is a parse error, not a panic
    match parse_dfa("99999999999999999999999999 0\n") {
        Err(Error::Parse { line, .. }) => assert_eq!(line, 1),
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_parse_truncated_input() {
    assert!(parse_dfa("3 0\n0 true false\n").is_err());
    assert!(parse_dfa("").is_err());
}

#[test]
fn test_parse_trailing_content() {
    let input = "1 0\n0 true false\n0 0 a\n";
    assert!(parse_dfa(input).is_err());
}

#[test]
fn test_parse_rejects_nondeterminism() {
    let input = "3 2\n0 true false\n1 false true\n2 false true\n0 1 a\n0 2 a\n";
    match parse_dfa(input) {
        Err(Error::Parse { line, .. }) => assert_eq!(line, 6),
        other => panic!("expected a parse error, got {:?}", other),
    }

    // the same text is a perfectly fine NFA
    let nfa = parse_nfa(input).unwrap();
    assert_eq!(nfa.state_count(), 3);
    assert!(nfa.accepts(&word("a")));
}

#[test]
fn test_parse_rejects_two_initials() {
    let input = "2 0\n0 true false\n1 true true\n";
    assert!(parse_dfa(input).is_err());
    assert_eq!(parse_nfa(input).unwrap().initials().len(), 2);
}

#[test]
fn test_serialize_parse_round_trip() {
    let dfa = parse_dfa(AB_LOOP).unwrap();
    let text = serialize_dfa(&dfa);
    let reparsed = parse_dfa(&text).unwrap();

    // the serializer always writes the optional error column
    assert_eq!(
        text,
        "2 2\n0 true false false\n1 false true false\n0 1 a\n1 0 b\n"
    );
    assert_eq!(reparsed.state_count(), dfa.state_count());
    assert!(reparsed.accepts(&word("a b a")));
}

#[test]
fn test_serialize_nfa_rejects_epsilon() {
    let mut nfa = Nfa::<u32, String>::new(vec!["a".to_string()]);
    let q0 = nfa.add_state(StateNode::non_accepting(0));
    let q1 = nfa.add_state(StateNode::accepting(1));
    nfa.set_initial(q0);
    nfa.add_transition(q0, q1, NfaEdge::Epsilon);

    assert!(matches!(
        serialize_nfa(&nfa),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_parse_sample() {
    let input = "
+ a b
- b     # a counterexample
+       # the empty word
? a
";
    let sample = parse_sample(input).unwrap();

    assert_eq!(sample.len(), 4);
    assert_eq!(sample.alphabet(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(sample.signature(), vec![true, false, true]);

    let labels: Vec<Label> = sample.iter().map(|s| s.label()).collect();
    assert_eq!(
        labels,
        vec![
            Label::Positive,
            Label::Negative,
            Label::Positive,
            Label::Unlabeled
        ]
    );
}

#[test]
fn test_parse_sample_rejects_conflicts() {
    let input = "+ a b\n- a b\n";
    assert!(matches!(
        parse_sample(input),
        Err(Error::Inconsistent(_))
    ));
}

#[test]
fn test_sample_round_trip() {
    let sample = parse_sample("+ a b\n-\n? b\n").unwrap();
    let text = serialize_sample(&sample);

    assert_eq!(text, "+ a b\n-\n? b\n");
    assert_eq!(parse_sample(&text).unwrap(), sample);
}

#[test]
fn test_serialize_uses_index_order() {
    let mut dfa = Dfa::<u32, String>::new(vec!["x".to_string()]);
    let q0 = dfa.add_state(StateNode::non_accepting(0));
    let q1 = dfa.add_state(StateNode::new(true, true, 1));
    dfa.set_start(q0);
    dfa.add_transition(q0, q1, "x".to_string());

    assert_eq!(
        serialize_dfa(&dfa),
        "2 1\n0 true false false\n1 false true true\n0 1 x\n"
    );
}
