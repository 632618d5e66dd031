//! Line-oriented text formats for automata and samples.
//!
//! Automaton format: the first significant line is `<state_count>
//! <edge_count>`, followed by exactly `state_count` lines
//! `<id> <initial> <accepting> [<error>]` (booleans `true|false`, ids are
//! arbitrary whitespace-free tokens) and exactly `edge_count` lines
//! `<source_id> <target_id> <symbol>`. `#` starts a comment to the end of the
//! line; blank lines are skipped. The alphabet is the sorted distinct set of
//! edge symbols.
//!
//! Sample format: each significant line is `+|-|? sym sym ...` with zero or
//! more symbol tokens.
//!
//! Malformed input fails with the 1-based line number. Epsilon transitions
//! are not representable; serializing one is an invalid-argument error.

use std::fmt::Display;

use hashbrown::HashMap;
use itertools::Itertools;
use nom::{
    Parser,
    bytes::complete::tag,
    character::complete::space1,
    error::{FromExternalError, ParseError},
};
use petgraph::visit::EdgeRef;

use crate::{
    Error, Result,
    automaton::{
        AutBuild, AutomatonNode, Letter,
        dfa::{Dfa, node::StateNode},
        nfa::{Nfa, NfaEdge},
    },
    sample::{InputString, Label, Sample},
};

fn token<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, &'a str, E> {
    nom::bytes::complete::take_while1(|c: char| !c.is_whitespace())(input)
}

fn integer<'a, E>(input: &'a str) -> nom::IResult<&'a str, usize, E>
where
    E: ParseError<&'a str> + FromExternalError<&'a str, std::num::ParseIntError>,
{
    nom::combinator::map_res(nom::character::complete::digit1, str::parse).parse(input)
}

fn boolean<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, bool, E> {
    nom::branch::alt((
        nom::combinator::value(true, tag("true")),
        nom::combinator::value(false, tag("false")),
    ))
    .parse(input)
}

// <state_count> <edge_count>
fn counts_line<'a, E>(input: &'a str) -> nom::IResult<&'a str, (usize, usize), E>
where
    E: ParseError<&'a str> + FromExternalError<&'a str, std::num::ParseIntError>,
{
    let (input, states) = integer(input)?;
    let (input, _) = space1(input)?;
    let (input, edges) = integer(input)?;
    Ok((input, (states, edges)))
}

// <id> <initial> <accepting> [<error>]
fn state_line<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> nom::IResult<&'a str, (&'a str, bool, bool, bool), E> {
    let (input, id) = token(input)?;
    let (input, _) = space1(input)?;
    let (input, initial) = boolean(input)?;
    let (input, _) = space1(input)?;
    let (input, accepting) = boolean(input)?;
    let (input, error) =
        nom::combinator::opt(nom::sequence::preceded(space1, boolean)).parse(input)?;

    Ok((input, (id, initial, accepting, error.unwrap_or(false))))
}

// <source_id> <target_id> <symbol>
fn edge_line<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> nom::IResult<&'a str, (&'a str, &'a str, &'a str), E> {
    let (input, source) = token(input)?;
    let (input, _) = space1(input)?;
    let (input, target) = token(input)?;
    let (input, _) = space1(input)?;
    let (input, symbol) = token(input)?;
    Ok((input, (source, target, symbol)))
}

// +|-|? sym sym ...
fn sample_line<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> nom::IResult<&'a str, (Label, Vec<&'a str>), E> {
    let (input, marker) = nom::character::complete::one_of("+-?")(input)?;
    let (input, symbols) =
        nom::multi::many0(nom::sequence::preceded(space1, token)).parse(input)?;

    let label = match marker {
        '+' => Label::Positive,
        '-' => Label::Negative,
        _ => Label::Unlabeled,
    };

    Ok((input, (label, symbols)))
}

/// Runs a per-line payload parser over a whole significant line, converting
/// nom's error into a line-numbered parse error.
fn run_line<'a, T>(
    line: usize,
    parser: impl Parser<&'a str, Output = T, Error = nom::error::Error<&'a str>>,
    input: &'a str,
) -> Result<T> {
    match nom::combinator::all_consuming(parser).parse(input) {
        Ok((_, value)) => Ok(value),
        Err(e) => Err(Error::Parse {
            line,
            message: e.to_string(),
        }),
    }
}

/// The significant lines of the input: comments stripped, blanks skipped,
/// paired with their 1-based line number.
fn significant_lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let payload = line.find('#').map_or(line, |pos| &line[..pos]).trim();
            (i + 1, payload)
        })
        .filter(|(_, payload)| !payload.is_empty())
}

struct RawAutomaton<'a> {
    // (line, id, initial, accepting, error)
    states: Vec<(usize, &'a str, bool, bool, bool)>,
    // (line, source, target, symbol)
    edges: Vec<(usize, &'a str, &'a str, &'a str)>,
}

impl<'a> RawAutomaton<'a> {
    fn parse(input: &'a str) -> Result<RawAutomaton<'a>> {
        let mut lines = significant_lines(input);
        let last_line = input.lines().count();

        let truncated = |context: &str| Error::Parse {
            line: last_line,
            message: format!("unexpected end of input, expected {context}"),
        };

        let (line, payload) = lines.next().ok_or_else(|| truncated("counts"))?;
        let (state_count, edge_count) = run_line(line, counts_line, payload)?;

        let mut states = Vec::with_capacity(state_count);
        let mut seen = HashMap::new();

        for _ in 0..state_count {
            let (line, payload) = lines.next().ok_or_else(|| truncated("a state"))?;
            let (id, initial, accepting, error) = run_line(line, state_line, payload)?;

            if let Some(previous) = seen.insert(id, line) {
                return Err(Error::Parse {
                    line,
                    message: format!("state '{id}' already declared on line {previous}"),
                });
            }

            states.push((line, id, initial, accepting, error));
        }

        let mut edges = Vec::with_capacity(edge_count);

        for _ in 0..edge_count {
            let (line, payload) = lines.next().ok_or_else(|| truncated("an edge"))?;
            let (source, target, symbol) = run_line(line, edge_line, payload)?;

            for endpoint in [source, target] {
                if !seen.contains_key(endpoint) {
                    return Err(Error::Parse {
                        line,
                        message: format!("unknown state '{endpoint}'"),
                    });
                }
            }

            edges.push((line, source, target, symbol));
        }

        if let Some((line, _)) = lines.next() {
            return Err(Error::Parse {
                line,
                message: "trailing content after the declared states and edges".to_string(),
            });
        }

        Ok(RawAutomaton { states, edges })
    }

    fn alphabet(&self) -> Vec<String> {
        self.edges
            .iter()
            .map(|&(_, _, _, symbol)| symbol.to_string())
            .sorted()
            .dedup()
            .collect()
    }
}

/// Parses the automaton text format into an NFA. State ids become the state
/// payloads; the alphabet is derived from the edge symbols.
pub fn parse_nfa(input: &str) -> Result<Nfa<String, String>> {
    let raw = RawAutomaton::parse(input)?;

    let mut nfa = Nfa::new(raw.alphabet());
    let mut by_name = HashMap::new();

    for &(_, id, initial, accepting, error) in &raw.states {
        let state = nfa.add_state(StateNode::new(accepting, error, id.to_string()));
        by_name.insert(id, state);
        if initial {
            nfa.add_initial(state);
        }
    }

    for &(_, source, target, symbol) in &raw.edges {
        nfa.add_transition(
            by_name[source],
            by_name[target],
            NfaEdge::Symbol(symbol.to_string()),
        );
    }

    Ok(nfa)
}

/// Parses the automaton text format into a DFA. Fails with the offending
/// line number if the text declares more than one initial state, none at
/// all, or a nondeterministic transition.
pub fn parse_dfa(input: &str) -> Result<Dfa<String, String>> {
    let raw = RawAutomaton::parse(input)?;

    let mut dfa = Dfa::new(raw.alphabet());
    let mut by_name = HashMap::new();

    for &(line, id, initial, accepting, error) in &raw.states {
        let state = dfa.add_state(StateNode::new(accepting, error, id.to_string()));
        by_name.insert(id, state);

        if initial {
            if dfa.get_start().is_some() {
                return Err(Error::Parse {
                    line,
                    message: format!("state '{id}' is a second initial state"),
                });
            }
            dfa.set_start(state);
        }
    }

    if dfa.get_start().is_none() {
        return Err(Error::Parse {
            line: raw.states.last().map_or(1, |&(line, ..)| line),
            message: "no initial state declared".to_string(),
        });
    }

    for &(line, source, target, symbol) in &raw.edges {
        dfa.try_add_transition(by_name[source], by_name[target], symbol.to_string())
            .map_err(|e| Error::Parse {
                line,
                message: e.to_string(),
            })?;
    }

    Ok(dfa)
}

/// Parses the sample text format. Conflicting labels for the same symbol
/// sequence surface as an inconsistency error.
pub fn parse_sample(input: &str) -> Result<Sample<String>> {
    let mut sample = Sample::new();

    for (line, payload) in significant_lines(input) {
        let (label, symbols) = run_line(line, sample_line, payload)?;
        let symbols = symbols.into_iter().map(str::to_string).collect();
        sample.insert(InputString::new(symbols, label))?;
    }

    Ok(sample)
}

/// Serializes a DFA into the automaton text format, using state indices as
/// ids, in index order.
pub fn serialize_dfa<N: AutomatonNode, L: Letter + Display>(dfa: &Dfa<N, L>) -> String {
    let mut out = String::new();

    out.push_str(&format!("{} {}\n", dfa.state_count(), dfa.edge_count()));

    for node in dfa.graph.node_indices() {
        let state = &dfa.graph[node];
        out.push_str(&format!(
            "{} {} {} {}\n",
            node.index(),
            dfa.get_start() == Some(node),
            state.accepting,
            state.error,
        ));
    }

    for edge in dfa.graph.edge_references() {
        out.push_str(&format!(
            "{} {} {}\n",
            edge.source().index(),
            edge.target().index(),
            edge.weight(),
        ));
    }

    out
}

/// Serializes an NFA into the automaton text format. Epsilon transitions
/// have no textual representation, so their presence is an invalid-argument
/// error.
pub fn serialize_nfa<N: AutomatonNode, L: Letter + Display>(nfa: &Nfa<N, L>) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!("{} {}\n", nfa.state_count(), nfa.edge_count()));

    for node in nfa.graph.node_indices() {
        let state = &nfa.graph[node];
        out.push_str(&format!(
            "{} {} {} {}\n",
            node.index(),
            nfa.initials().contains(&node),
            state.accepting,
            state.error,
        ));
    }

    for edge in nfa.graph.edge_references() {
        let Some(symbol) = edge.weight().symbol() else {
            return Err(Error::InvalidArgument(format!(
                "epsilon transition {:?} -> {:?} is not representable in the text format",
                edge.source(),
                edge.target()
            )));
        };
        out.push_str(&format!(
            "{} {} {}\n",
            edge.source().index(),
            edge.target().index(),
            symbol,
        ));
    }

    Ok(out)
}

/// Serializes a sample into the sample text format, one string per line in
/// sample order.
pub fn serialize_sample<L: Letter + Display>(sample: &Sample<L>) -> String {
    let mut out = String::new();

    for string in sample.iter() {
        out.push(string.label().marker());
        for symbol in string.symbols() {
            out.push_str(&format!(" {symbol}"));
        }
        out.push('\n');
    }

    out
}
