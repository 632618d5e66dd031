use itertools::Itertools;
use reglearn::{
    automaton::{
        Alphabet, AutBuild, Language,
        dfa::{Dfa, node::StateNode},
    },
    validation::{assert_inverse_language, assert_same_language},
};

#[test]
fn test_dfa_walk() {
    let mut dfa = Dfa::<u32, char>::new(vec!['a', 'b']);
    let q0 = dfa.add_state(StateNode::non_accepting(0));
    let q1 = dfa.add_state(StateNode::non_accepting(1));
    let q2 = dfa.add_state(StateNode::accepting(2));
    dfa.set_start(q0);

    dfa.add_transition(q0, q1, 'a');
    dfa.add_transition(q1, q2, 'b');
    dfa.add_transition(q2, q1, 'a');

    dfa.complete_with_sink(3);

    let chars = "ababab".chars().collect_vec();
    assert!(dfa.accepts(&chars));

    let chars = "ababa".chars().collect_vec();
    assert!(!dfa.accepts(&chars));
}

// accepts "a" and "aba", rejects "" and "ab"
#[test]
fn test_alternating_ab() {
    let mut dfa = Dfa::<u32, char>::new(vec!['a', 'b']);
    let q0 = dfa.add_state(StateNode::non_accepting(0));
    let q1 = dfa.add_state(StateNode::accepting(1));
    dfa.set_start(q0);

    dfa.add_transition(q0, q1, 'a');
    dfa.add_transition(q1, q0, 'b');

    assert!(dfa.accepts(&['a']));
    assert!(dfa.accepts(&['a', 'b', 'a']));
    assert!(!dfa.accepts(&[]));
    assert!(!dfa.accepts(&['a', 'b']));
}

#[test]
fn test_find_state_by_payload() {
    let mut dfa = Dfa::<u32, char>::new(vec!['a']);
    let q0 = dfa.add_state(StateNode::non_accepting(3));
    let q1 = dfa.add_state(StateNode::accepting(7));
    let q2 = dfa.add_state(StateNode::accepting(7));
    dfa.set_start(q0);
    dfa.add_transition(q0, q1, 'a');
    dfa.add_transition(q1, q2, 'a');

    // first match in index order
    assert_eq!(dfa.find_state(|s| s.data == 7), Some(q1));
    assert_eq!(dfa.find_state(|s| s.accepting), Some(q1));
    assert_eq!(dfa.find_state(|s| s.data == 9), None);
}

#[test]
fn test_dfa_split() {
    let mut dfa = Dfa::<u32, char>::new(vec!['a', 'b']);
    let q0 = dfa.add_state(StateNode::non_accepting(0));
    let q1 = dfa.add_state(StateNode::accepting(1));
    dfa.set_start(q0);
    dfa.add_transition(q0, q1, 'a');

    let word = ['a', 'b', 'a'];
    let (state, suffix) = dfa.split(&word);
    assert_eq!(state, q1);
    assert_eq!(suffix, &['b', 'a']);

    let (state, suffix) = dfa.split(&[]);
    assert_eq!(state, q0);
    assert!(suffix.is_empty());
}

#[test]
fn test_nondeterminism_rejected() {
    let mut dfa = Dfa::<u32, char>::new(vec!['a']);
    let q0 = dfa.add_state(StateNode::non_accepting(0));
    let q1 = dfa.add_state(StateNode::non_accepting(1));
    let q2 = dfa.add_state(StateNode::non_accepting(2));
    dfa.set_start(q0);

    dfa.add_transition(q0, q1, 'a');
    assert!(dfa.try_add_transition(q0, q2, 'a').is_err());
    // re-adding the same transition is fine
    assert!(dfa.try_add_transition(q0, q1, 'a').is_ok());
}

#[test]
fn test_dfa_inversion() {
    let mut dfa = Dfa::<u32, char>::new(vec!['a', 'b']);
    let q0 = dfa.add_state(StateNode::non_accepting(0));
    let q1 = dfa.add_state(StateNode::non_accepting(1));
    let q2 = dfa.add_state(StateNode::accepting(2));
    dfa.set_start(q0);

    dfa.add_transition(q0, q1, 'a');
    dfa.add_transition(q1, q2, 'b');
    dfa.add_transition(q2, q1, 'a');

    dfa.complete_with_sink(3);

    let inverted = dfa.invert();
    assert_inverse_language(&dfa, &inverted, 6);

    let double_inverted = inverted.invert();
    assert_same_language(&dfa, &double_inverted, 6);
}

#[test]
fn test_double_complement() {
    // a* b, not complete on purpose
    let mut dfa = Dfa::<u32, char>::new(vec!['a', 'b']);
    let q0 = dfa.add_state(StateNode::non_accepting(0));
    let q1 = dfa.add_state(StateNode::accepting(1));
    dfa.set_start(q0);
    dfa.add_transition(q0, q0, 'a');
    dfa.add_transition(q0, q1, 'b');

    let double = dfa.complement().complement();
    assert_same_language(&dfa, &double, 6);
}

#[test]
fn test_dfa_intersection() {
    // a* b b*
    let mut dfa1 = Dfa::<u32, char>::new(vec!['a', 'b']);
    let q0 = dfa1.add_state(StateNode::non_accepting(0));
    let q1 = dfa1.add_state(StateNode::accepting(1));
    dfa1.set_start(q0);
    dfa1.add_transition(q0, q0, 'a');
    dfa1.add_transition(q0, q1, 'b');
    dfa1.add_transition(q1, q1, 'b');

    // (a | b)* with an even number of b's, accepting anything ending in b
    let mut dfa2 = Dfa::<u32, char>::new(vec!['a', 'b']);
    let p0 = dfa2.add_state(StateNode::non_accepting(0));
    let p1 = dfa2.add_state(StateNode::accepting(1));
    dfa2.set_start(p0);
    dfa2.add_transition(p0, p0, 'a');
    dfa2.add_transition(p0, p1, 'b');
    dfa2.add_transition(p1, p1, 'a');
    dfa2.add_transition(p1, p1, 'b');

    let product = dfa1.intersect(&dfa2);

    // intersection is still a* b b*
    assert_same_language(&dfa1, &product, 6);
}

#[test]
fn test_intersection_pass_through() {
    // over {a}: a a*
    let mut dfa1 = Dfa::<u32, char>::new(vec!['a']);
    let q0 = dfa1.add_state(StateNode::non_accepting(0));
    let q1 = dfa1.add_state(StateNode::accepting(1));
    dfa1.set_start(q0);
    dfa1.add_transition(q0, q1, 'a');
    dfa1.add_transition(q1, q1, 'a');

    // over {b}: b*
    let mut dfa2 = Dfa::<u32, char>::new(vec!['b']);
    let p0 = dfa2.add_state(StateNode::accepting(0));
    dfa2.set_start(p0);
    dfa2.add_transition(p0, p0, 'b');

    // the product runs over {a, b}; each operand passes through on the
    // other's symbols, so the result is all words with at least one a
    let product = dfa1.intersect(&dfa2);
    assert_eq!(product.alphabet(), &['a', 'b']);
    assert!(product.accepts(&['a']));
    assert!(product.accepts(&['b', 'a', 'b']));
    assert!(!product.accepts(&[]));
    assert!(!product.accepts(&['b', 'b']));
}

#[test]
fn test_strip_unreachable() {
    let mut dfa = Dfa::<u32, char>::new(vec!['a']);
    let q0 = dfa.add_state(StateNode::non_accepting(0));
    let q1 = dfa.add_state(StateNode::accepting(1));
    let orphan = dfa.add_state(StateNode::accepting(2));
    dfa.set_start(q0);
    dfa.add_transition(q0, q1, 'a');
    dfa.add_transition(orphan, q0, 'a');

    dfa.strip_unreachable();

    assert_eq!(dfa.state_count(), 2);
    assert_eq!(dfa.edge_count(), 1);
    assert!(dfa.accepts(&['a']));
}

#[test]
fn test_drop_states_renumbers_once() {
    let mut dfa = Dfa::<u32, char>::new(vec!['a']);
    let q0 = dfa.add_state(StateNode::non_accepting(0));
    let q1 = dfa.add_state(StateNode::non_accepting(1));
    let q2 = dfa.add_state(StateNode::non_accepting(2));
    let q3 = dfa.add_state(StateNode::accepting(3));
    dfa.set_start(q0);
    dfa.add_transition(q0, q3, 'a');

    dfa.drop_states(&[q1, q2]).unwrap();

    // survivors keep their relative order and the start is remapped
    assert_eq!(dfa.state_count(), 2);
    assert_eq!(dfa.graph[dfa.start()].data, 0);
    assert!(dfa.accepts(&['a']));
}

#[test]
fn test_drop_states_invalid_index() {
    let mut dfa = Dfa::<u32, char>::new(vec!['a']);
    let q0 = dfa.add_state(StateNode::non_accepting(0));
    dfa.set_start(q0);
    dfa.drop_states(&[q0]).unwrap();

    assert!(dfa.drop_states(&[q0]).is_err());
}

#[test]
fn test_drop_edges_keeps_state_indices() {
    let mut dfa = Dfa::<u32, char>::new(vec!['a', 'b']);
    let q0 = dfa.add_state(StateNode::non_accepting(0));
    let q1 = dfa.add_state(StateNode::accepting(1));
    dfa.set_start(q0);
    let by_a = dfa.add_transition(q0, q1, 'a');
    dfa.add_transition(q0, q1, 'b');
    dfa.add_transition(q1, q0, 'a');

    dfa.drop_edges(&[by_a]).unwrap();

    assert_eq!(dfa.state_count(), 2);
    assert_eq!(dfa.edge_count(), 2);
    assert!(!dfa.accepts(&['a']));
    assert!(dfa.accepts(&['b']));

    // the index is gone after the compacting pass
    assert!(dfa.drop_edge(petgraph::graph::EdgeIndex::new(2)).is_err());
}

#[test]
fn test_prefix_closure() {
    // language a b over {a, b}
    let mut dfa = Dfa::<u32, char>::new(vec!['a', 'b']);
    let q0 = dfa.add_state(StateNode::non_accepting(0));
    let q1 = dfa.add_state(StateNode::non_accepting(1));
    let q2 = dfa.add_state(StateNode::accepting(2));
    let dead = dfa.add_state(StateNode::non_accepting(3));
    dfa.set_start(q0);
    dfa.add_transition(q0, q1, 'a');
    dfa.add_transition(q1, q2, 'b');
    dfa.add_transition(q2, dead, 'a');

    let closed = dfa.prefix_closure();

    assert!(closed.accepts(&[]));
    assert!(closed.accepts(&['a']));
    assert!(closed.accepts(&['a', 'b']));
    assert!(!closed.accepts(&['a', 'a']));
    assert!(!closed.accepts(&['a', 'b', 'a']));
}

#[test]
fn test_subset() {
    // a b ⊆ (a b)*
    let mut small = Dfa::<u32, char>::new(vec!['a', 'b']);
    let q0 = small.add_state(StateNode::non_accepting(0));
    let q1 = small.add_state(StateNode::non_accepting(1));
    let q2 = small.add_state(StateNode::accepting(2));
    small.set_start(q0);
    small.add_transition(q0, q1, 'a');
    small.add_transition(q1, q2, 'b');

    let mut big = Dfa::<u32, char>::new(vec!['a', 'b']);
    let p0 = big.add_state(StateNode::accepting(0));
    let p1 = big.add_state(StateNode::non_accepting(1));
    big.set_start(p0);
    big.add_transition(p0, p1, 'a');
    big.add_transition(p1, p0, 'b');

    assert!(small.is_subset_of(&big));
    assert!(!big.is_subset_of(&small));
}

#[test]
fn test_renumber_bfs() {
    let mut dfa = Dfa::<u32, char>::new(vec!['a', 'b']);
    // states added in an order that does not match traversal order
    let q2 = dfa.add_state(StateNode::accepting(2));
    let q0 = dfa.add_state(StateNode::non_accepting(0));
    let q1 = dfa.add_state(StateNode::non_accepting(1));
    let orphan = dfa.add_state(StateNode::non_accepting(9));
    dfa.set_start(q0);
    dfa.add_transition(q0, q1, 'a');
    dfa.add_transition(q0, q2, 'b');
    dfa.add_transition(orphan, q2, 'a');

    let renumbered = dfa.renumber_bfs();

    // start first, then its successors in symbol order; the orphan is gone
    assert_eq!(renumbered.state_count(), 3);
    assert_eq!(renumbered.start().index(), 0);
    assert_eq!(renumbered.graph[renumbered.start()].data, 0);
    let by_a = renumbered.successor(renumbered.start(), &'a').unwrap();
    let by_b = renumbered.successor(renumbered.start(), &'b').unwrap();
    assert_eq!(by_a.index(), 1);
    assert_eq!(by_b.index(), 2);
    assert_same_language(&dfa, &renumbered, 4);
}
