use reglearn::{
    automaton::{Alphabet, Language, dfa::Dfa, equivalence::equivalent},
    config::BlueFringeConfig,
    format::{parse_dfa, parse_sample},
    induction::{BlueFringe, Rpni, build_pta, merge_groups, seed_union_find},
    sample::Sample,
    validation::same_language,
};

fn word(input: &str) -> Vec<String> {
    input
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn ab_loop_sample() -> Sample<String> {
    parse_sample("+\n+ a\n+ b b\n- b\n- a b\n").unwrap()
}

#[test]
fn test_pta_shape() {
    let pta = build_pta(&ab_loop_sample()).unwrap();

    // one state per distinct prefix: ε, a, b, bb, ab
    assert_eq!(pta.state_count(), 5);
    assert_eq!(pta.start().index(), 0);

    assert!(pta.graph[pta.walk(&word("")).unwrap()].accepting);
    assert!(pta.graph[pta.walk(&word("a")).unwrap()].accepting);
    assert!(pta.graph[pta.walk(&word("b b")).unwrap()].accepting);
    assert!(pta.graph[pta.walk(&word("b")).unwrap()].error);
    assert!(pta.graph[pta.walk(&word("a b")).unwrap()].error);
}

#[test]
fn test_pta_bfs_numbering() {
    let pta = build_pta(&ab_loop_sample()).unwrap();

    // breadth first in symbol order: ε, a, b, ab, bb
    assert_eq!(pta.walk(&word("a")).unwrap().index(), 1);
    assert_eq!(pta.walk(&word("b")).unwrap().index(), 2);
    assert_eq!(pta.walk(&word("a b")).unwrap().index(), 3);
    assert_eq!(pta.walk(&word("b b")).unwrap().index(), 4);
}

#[test]
fn test_pta_rejects_inconsistent_flags() {
    // consistent as strings but the labels collide on the same state
    let mut sample = Sample::new();
    sample
        .insert(reglearn::sample::InputString::positive(word("a")))
        .unwrap();
    sample
        .insert(reglearn::sample::InputString::negative(word("a b")))
        .unwrap();
    assert!(build_pta(&sample).is_ok());

    let conflicting = parse_sample("+ a\n- a\n");
    assert!(conflicting.is_err());
}

#[test]
fn test_merge_incompatibility_is_a_sentinel() {
    let pta = build_pta(&ab_loop_sample()).unwrap();
    let mut uf = seed_union_find(&pta);

    // state 0 accepts the empty word, state 2 is the error state after "b"
    uf.save_point();
    assert_eq!(merge_groups(&mut uf, 2, 0), None);
    uf.rollback();

    // state 1 ("a") is accepting like state 0, and merging them forces no
    // conflicting flags
    uf.save_point();
    assert!(merge_groups(&mut uf, 1, 0).is_some());
    uf.rollback();
}

#[test]
fn test_rpni_learns_ab_loop() {
    let sample = ab_loop_sample();
    let learned = Rpni::new().execute(&sample).unwrap();

    assert_eq!(learned.state_count(), 2);
    assert!(sample.correctly_classified_by(&learned));
    assert_eq!(sample.signature_of(&learned), sample.signature());

    assert!(learned.accepts(&word("")));
    assert!(learned.accepts(&word("a")));
    assert!(learned.accepts(&word("b b")));
    assert!(!learned.accepts(&word("b")));
    assert!(!learned.accepts(&word("a b")));
}

#[test]
fn test_rpni_matches_text_fixture() {
    // the learner recovers the alternating automaton from four strings
    let sample = parse_sample("+ a\n+ a b a\n-\n- a b\n").unwrap();
    let learned = Rpni::new().execute(&sample).unwrap();

    let target = parse_dfa("2 2\n0 true false\n1 false true\n0 1 a\n1 0 b\n").unwrap();
    assert!(sample.correctly_classified_by(&learned));
    assert!(same_language(&target, &learned, 7));
}

#[test]
fn test_blue_fringe_learns_ab_loop() {
    let sample = ab_loop_sample();
    let learned = BlueFringe::new(BlueFringeConfig::default())
        .execute(&sample)
        .unwrap();

    assert!(sample.correctly_classified_by(&learned));
    assert_eq!(sample.signature_of(&learned), sample.signature());
}

#[test]
fn test_learners_agree_on_simple_target() {
    let sample = parse_sample("+\n+ a b\n+ a b a b\n- a\n- a b a\n").unwrap();

    let rpni = Rpni::new().execute(&sample).unwrap();
    let blue = BlueFringe::new(BlueFringeConfig::default())
        .execute(&sample)
        .unwrap();

    assert!(sample.correctly_classified_by(&rpni));
    assert!(sample.correctly_classified_by(&blue));
    assert!(same_language(&rpni, &blue, 7));
}

#[test]
fn test_blue_fringe_step_limit_preserves_correctness() {
    let sample = ab_loop_sample();
    let learned = BlueFringe::new(BlueFringeConfig { max_steps: Some(1) })
        .execute(&sample)
        .unwrap();

    // the search stops early but never breaks classification
    assert!(sample.correctly_classified_by(&learned));
}

#[test]
fn test_induction_without_negative_evidence_collapses() {
    // all-positive samples merge everything into one accepting state
    let sample = parse_sample("+\n+ a\n+ a a a\n").unwrap();
    let learned = Rpni::new().execute(&sample).unwrap();

    assert_eq!(learned.state_count(), 1);
    assert!(learned.accepts(&word("a a a a a a")));
}

#[test]
fn test_learned_automaton_is_deterministic() {
    let sample = ab_loop_sample();
    let learned: Dfa<(), String> = Rpni::new().execute(&sample).unwrap();

    for state in learned.graph.node_indices() {
        for symbol in learned.alphabet() {
            // successor would not be unique otherwise; also exercised by
            // the builder's own determinism check
            let _ = learned.successor(state, symbol);
        }
    }

    let relearned = Rpni::new().execute(&sample).unwrap();
    assert!(equivalent(&learned.renumber_bfs(), &relearned.renumber_bfs()));
}
